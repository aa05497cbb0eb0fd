//! polygrow - grow self-limiting polygon structures
//!
//! Usage:
//!   polygrow grow [-v variant] [-s seed]   Grow a tree and export it
//!   polygrow config [-v variant] [-s seed] Print a seeded config as JSON
//!   polygrow variants                      List available variants
//!
//! Set `RUST_LOG=debug` (or `trace`) to follow individual growth steps.

mod cli;

use std::env;

use cli::{cmd_config, cmd_grow, cmd_variants};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("polygrow");

    if args.len() < 2 {
        print_usage(prog);
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "grow" => cmd_grow(&args[2..]),
        "config" => cmd_config(&args[2..]),
        "variants" => {
            cmd_variants();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage(prog);
            Ok(())
        }
        other => Err(format!("Unknown command: {}", other)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_usage(prog: &str) {
    eprintln!("polygrow - self-limiting polygon growth");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} grow [options]       Grow a tree and export SVG (see grow --help)", prog);
    eprintln!("  {} config [options]     Print a seeded config as JSON", prog);
    eprintln!("  {} variants             List available variants", prog);
    eprintln!();
    eprintln!("Grow options:");
    eprintln!("  -v, --variant <name>    regular, scaled, edge-walk, thorn (default: regular)");
    eprintln!("  -s, --seed <n>          Seed (default: 0)");
    eprintln!("  --random                Pick a random seed");
    eprintln!("  -n, --steps <n>         Step limit");
    eprintln!("  -o, --output <file>     Output SVG");
    eprintln!("  --config <file>         Load a saved config (.json, .yaml)");
    eprintln!("  --save-config <file>    Write the config used");
    eprintln!("  --png                   Also write a PNG");
    eprintln!("  --mask                  Also write the occupancy mask");
    eprintln!();
    eprintln!("Logging:");
    eprintln!("  RUST_LOG=info|debug|trace  Growth summaries, accepts, discards");
}
