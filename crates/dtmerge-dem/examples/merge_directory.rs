//! Example: Merge every ASCII grid tile in a directory.
//!
//! Usage: cargo run --example merge_directory -- <input_dir> [output_dir]

use dtmerge_dem::{merge_directory, MergeOptions};
use std::env;
use std::time::Instant;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <input_dir> [output_dir]", args[0]);
        eprintln!("Example: {} ./dtm_tiles ./out", args[0]);
        std::process::exit(1);
    }

    let input_dir = &args[1];
    let output_dir = args.get(2).map(|s| s.as_str()).unwrap_or(".");

    println!("Merging tiles from {}...", input_dir);
    let start = Instant::now();

    match merge_directory(input_dir, output_dir, &MergeOptions::default()) {
        Ok(merged) => {
            let stats = &merged.report.statistics;
            println!(
                "Merged {} tiles ({} x {} layout) in {:.2}s",
                merged.report.datasets,
                merged.report.layout.tiles_x,
                merged.report.layout.tiles_y,
                start.elapsed().as_secs_f64()
            );
            println!(
                "Coverage: x {:.2} to {:.2}, y {:.2} to {:.2}",
                stats.min_x, stats.max_x, stats.min_y, stats.max_y
            );
            println!("Output: {}", merged.output_path.display());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
