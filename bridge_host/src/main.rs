//! # Bridge Host
//!
//! Main entry point for the bridge host runtime.

use bridge_host::{exported_schema, HostRuntime, HostRuntimeConfig};
use std::env;
use std::fs;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("bridge-host");

    let config = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(program);
        process::exit(1);
    });

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .init();

    if config.print_schema {
        match exported_schema() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to export schema: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    let mut runtime = HostRuntime::new(config).unwrap_or_else(|e| {
        eprintln!("Failed to create runtime: {}", e);
        process::exit(1);
    });

    let reports = runtime.run().await;
    for report in &reports {
        println!("{}", report);
    }
    runtime.shutdown();
}

fn parse_args(args: &[String]) -> Result<HostRuntimeConfig, String> {
    let mut config = HostRuntimeConfig::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--script" | "-s" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --script".to_string());
                }
                let script_path = &args[i];
                let script_text = fs::read_to_string(script_path)
                    .map_err(|e| format!("Failed to read script file: {}", e))?;
                config.script = Some(script_text);
            }
            "--timeout-ms" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --timeout-ms".to_string());
                }
                let millis: u64 = args[i]
                    .parse()
                    .map_err(|_| format!("Invalid timeout value: {}", args[i]))?;
                config.call_timeout = Duration::from_millis(millis);
            }
            "--log-level" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --log-level".to_string());
                }
                config.log_level = args[i]
                    .parse()
                    .map_err(|_| format!("Invalid log level: {}", args[i]))?;
            }
            "--schema" => {
                config.print_schema = true;
            }
            "--help" | "-h" => {
                print_usage(args.first().map(String::as_str).unwrap_or("bridge-host"));
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    Ok(config)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --script <FILE>      Editor script to run (built-in demo otherwise)");
    eprintln!("  --timeout-ms <N>         Bound on every acknowledged call (default 5000)");
    eprintln!("  --log-level <LEVEL>      trace, debug, info (default), warn or error");
    eprintln!("  --schema                 Print the exported bridge schema and exit");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} --script demos/hello_line.bridge", program);
    eprintln!("  {} --schema > bridge-schema.json", program);
}
