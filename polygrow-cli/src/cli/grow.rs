//! Grow command: seed (or load) a tree, run it, export the result.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use log::debug;
use serde::Serialize;

use polygrow::{Tree, TreeConfig, Variant};

use super::common::{default_output, load_config, parse_variant, random_seed, sibling_path};
use super::export::{DEFAULT_IMAGE_SIZE, tree_to_svg, write_mask, write_png};

/// Step limit when `-n` is not given.
const DEFAULT_STEPS: usize = 100_000;

/// Run summary for `--json`.
#[derive(Serialize)]
struct GrowReport {
    variant: &'static str,
    seed: u64,
    steps: usize,
    accepted: usize,
    discarded: usize,
    exhausted: bool,
    filled_cells: usize,
    output: String,
}

/// Execute the grow command.
pub fn cmd_grow(args: &[String]) -> Result<(), String> {
    let mut variant = Variant::default();
    let mut seed: u64 = 0;
    let mut random = false;
    let mut steps = DEFAULT_STEPS;
    let mut output_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut save_config: Option<PathBuf> = None;
    let mut png = false;
    let mut mask = false;
    let mut json = false;
    let mut size = DEFAULT_IMAGE_SIZE;

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
            "--random" => random = true,
            "-n" | "--steps" => {
                i += 1;
                if i < args.len() {
                    steps = args[i].parse().unwrap_or(DEFAULT_STEPS);
                }
            }
            "-o" | "--output" => {
                i += 1;
                if i < args.len() {
                    output_path = Some(PathBuf::from(&args[i]));
                }
            }
            "--config" => {
                i += 1;
                if i < args.len() {
                    config_path = Some(PathBuf::from(&args[i]));
                }
            }
            "--save-config" => {
                i += 1;
                if i < args.len() {
                    save_config = Some(PathBuf::from(&args[i]));
                }
            }
            "--png" => png = true,
            "--mask" => mask = true,
            "--json" => json = true,
            "--size" => {
                i += 1;
                if i < args.len() {
                    size = args[i].parse().unwrap_or(DEFAULT_IMAGE_SIZE);
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

    if random {
        seed = random_seed();
    }

    let config = match config_path {
        Some(path) => {
            debug!("loading config from {}", path.display());
            load_config(&path)?
        }
        None => TreeConfig::seeded(variant, seed).map_err(|e| e.to_string())?,
    };
    let output_path = output_path.unwrap_or_else(|| default_output(&config));

    if let Some(path) = &save_config {
        let json = config.to_json_string().map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        eprintln!("Wrote: {}", path.display());
    }

    let mask = mask || config.variant.persists_field_mask();
    eprintln!(
        "Growing {} (seed {}, {} transforms, radius {}, {} cells/unit)...",
        config.variant.name(),
        config.random_seed,
        config.transforms.len(),
        config.max_radius,
        config.field_resolution
    );

    let mut tree = Tree::new(config).map_err(|e| e.to_string())?;
    let start = Instant::now();
    let summary = tree.run(steps);
    eprintln!(
        "  {} steps in {:.2?}: {} accepted, {} discarded{}",
        summary.steps,
        start.elapsed(),
        summary.accepted,
        summary.discarded,
        if summary.exhausted { " (done)" } else { ", stopped at step limit" }
    );

    let svg = tree_to_svg(&tree, size);
    fs::write(&output_path, &svg).map_err(|e| format!("Failed to write {}: {}", output_path.display(), e))?;
    eprintln!("Wrote: {}", output_path.display());

    if png {
        let png_path = sibling_path(&output_path, "png");
        write_png(&svg, &png_path, size)?;
        eprintln!("Wrote: {} ({}x{})", png_path.display(), size, size);
    }

    if mask {
        let mask_path = sibling_path(&output_path, "mask.png");
        write_mask(tree.field(), &mask_path)?;
        eprintln!("Wrote: {} ({}x{})", mask_path.display(), tree.field().side(), tree.field().side());
    }

    if json {
        let report = GrowReport {
            variant: tree.config().variant.name(),
            seed: tree.config().random_seed,
            steps: summary.steps,
            accepted: summary.accepted,
            discarded: summary.discarded,
            exhausted: summary.exhausted,
            filled_cells: tree.field().filled_cells(),
            output: output_path.display().to_string(),
        };
        let text = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{}", text);
    }

    Ok(())
}

/// Print usage information.
pub fn print_usage() {
    eprintln!("polygrow grow - Grow a tree and export it");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    polygrow grow [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -v, --variant <name>   Shape family (default: regular)");
    eprintln!("    -s, --seed <n>         Seed for the shape family (default: 0)");
    eprintln!("    --random               Pick a random seed");
    eprintln!("    -n, --steps <n>        Step limit (default: {})", DEFAULT_STEPS);
    eprintln!("    -o, --output <file>    Output SVG (default: timestamped name)");
    eprintln!("    --config <file>        Load a saved config (.json, .yaml) instead of seeding");
    eprintln!("    --save-config <file>   Write the config used as JSON");
    eprintln!("    --png                  Also write <output>.png");
    eprintln!("    --mask                 Also write <output>.mask.png (always on for thorn)");
    eprintln!("    --size <px>            Image size (default: {})", DEFAULT_IMAGE_SIZE);
    eprintln!("    --json                 Print a run summary as JSON to stdout");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("    polygrow grow -v scaled -s 3 -o scaled.svg --png");
    eprintln!("    polygrow grow -v thorn --random");
    eprintln!("    polygrow grow --config saved.json -n 500");
}
