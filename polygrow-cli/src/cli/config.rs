//! Config command: print the configuration a variant builds from a seed.

use std::fs;

use polygrow::{TreeConfig, Variant};

use super::common::{load_config, parse_variant};

/// Execute the config command.
pub fn cmd_config(args: &[String]) -> Result<(), String> {
    let mut variant = Variant::default();
    let mut seed: u64 = 0;
    let mut input: Option<&str> = None;
    let mut output_path: Option<&str> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-v" | "--variant" => {
                i += 1;
                if i < args.len() {
                    variant = parse_variant(&args[i])?;
                }
            }
            "-s" | "--seed" => {
                i += 1;
                if i < args.len() {
                    seed = args[i].parse().map_err(|_| format!("Invalid seed: {}", args[i]))?;
                }
            }
            "--from" => {
                i += 1;
                if i < args.len() {
                    input = Some(&args[i]);
                }
            }
            "-o" | "--output" => {
                i += 1;
                if i < args.len() {
                    output_path = Some(&args[i]);
                }
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    // --from normalizes a saved (possibly YAML) config to JSON
    let config = match input {
        Some(path) => load_config(path)?,
        None => TreeConfig::seeded(variant, seed).map_err(|e| e.to_string())?,
    };
    let json = config.to_json_string().map_err(|e| e.to_string())?;

    match output_path {
        Some(path) if path != "-" => {
            fs::write(path, json + "\n").map_err(|e| format!("Failed to write {}: {}", path, e))?;
            eprintln!("Wrote: {}", path);
        }
        _ => println!("{}", json),
    }
    Ok(())
}

/// Print usage information.
pub fn print_usage() {
    eprintln!("polygrow config - Print a seeded tree config as JSON");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    polygrow config [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -v, --variant <name>   Shape family (default: regular)");
    eprintln!("    -s, --seed <n>         Seed (default: 0)");
    eprintln!("    --from <file>          Re-emit a saved .json/.yaml config");
    eprintln!("    -o, --output <file>    Output file (- for stdout, default: stdout)");
}
