//! looplab CLI: interactive control panel and scenario runner.

use std::io::{self, BufRead, Write};
use std::process;
use std::time::Duration;

use looplab_engine::{scenario, Engine, EngineConfig};

mod output;

fn main() {
    output::init();

    let mut config = EngineConfig::default();
    let mut positional: Vec<String> = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--latency-ms" => {
                let value = args.next().unwrap_or_default();
                match value.parse::<u64>() {
                    Ok(ms) => config.worker_latency = Duration::from_millis(ms),
                    Err(_) => {
                        eprintln!(
                            "{}: --latency-ms expects a number of milliseconds",
                            output::error_label()
                        );
                        process::exit(1);
                    }
                }
            }
            other => positional.push(other.to_string()),
        }
    }

    match positional.first().map(String::as_str) {
        None => interactive(config),
        Some("run") => {
            let name = positional.get(1).map(String::as_str).unwrap_or("");
            cmd_run(name, config);
        }
        Some("help") | Some("--help") | Some("-h") => print_usage(),
        Some("version") | Some("--version") | Some("-V") => {
            println!("looplab {}", env!("CARGO_PKG_VERSION"));
        }
        Some(other) => {
            eprintln!("{}: unknown command `{}`", output::error_label(), other);
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    println!("{} - a pedagogical event-loop engine", output::title("looplab"));
    println!();
    println!("Usage: looplab [options] [command]");
    println!();
    println!("Commands:");
    println!("  (none)              Interactive control panel");
    println!("  run <scenario>      Run one scenario and exit");
    println!("                      (fetch-then | dom-click | both)");
    println!("  help                Show this help");
    println!("  version             Show version");
    println!();
    println!("Options:");
    println!("  --latency-ms <n>    Simulated api worker latency (default 2000)");
}

/// The interactive control loop: read one choice, inject, pause so the
/// actor narration settles, reprint the menu.
fn interactive(config: EngineConfig) {
    let latency = config.worker_latency;
    let engine = Engine::start(config);
    // Let the actors start up and park before the first menu.
    std::thread::sleep(Duration::from_millis(100));

    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print_menu();
        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => process::exit(0), // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: failed to read input: {}", output::error_label(), e);
                process::exit(1);
            }
        }

        match line.trim().chars().next() {
            Some('1') => {
                scenario::chained_promise(&engine);
                // Two hops through the workers before the chain settles.
                settle(latency * 2 + Duration::from_millis(500));
            }
            Some('2') => {
                scenario::dom_click(&engine);
                settle(Duration::from_millis(500));
            }
            Some('q') | Some('Q') => {
                println!("shutdown requested; goodbye");
                process::exit(0);
            }
            _ => println!("Invalid option. Please try again."),
        }
    }
}

fn print_menu() {
    println!();
    println!("{}", output::banner("looplab control panel"));
    println!("Choose an action to inject into the engine:");
    println!(
        "  {}  simulate a chained promise (fetch().then())",
        output::menu_key("1")
    );
    println!(
        "  {}  simulate a dom click event (macrotask)",
        output::menu_key("2")
    );
    println!("  {}  quit", output::menu_key("q"));
    print!("{} ", output::prompt());
    let _ = io::stdout().flush();
}

fn cmd_run(name: &str, config: EngineConfig) {
    let latency = config.worker_latency;
    let engine = Engine::start(config);
    std::thread::sleep(Duration::from_millis(100));

    match name {
        "fetch-then" => {
            scenario::chained_promise(&engine);
        }
        "dom-click" => {
            scenario::dom_click(&engine);
        }
        "both" => {
            scenario::chained_promise(&engine);
            scenario::dom_click(&engine);
        }
        "" => {
            eprintln!("{}: `run` needs a scenario name", output::error_label());
            print_usage();
            process::exit(1);
        }
        other => {
            eprintln!("{}: unknown scenario `{}`", output::error_label(), other);
            print_usage();
            process::exit(1);
        }
    }

    // Wait out the worker hops, then let the final narration flush.
    settle(latency * 2 + Duration::from_secs(1));
}

fn settle(duration: Duration) {
    std::thread::sleep(duration);
}
