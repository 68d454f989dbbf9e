use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use leepath::{config::Config, parse_img, util::render_img, PathSolver, Point, Solution, Strategy};
use log::{debug, info};

/// Find the shortest route through a maze image and draw it in.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Maze image, bright pixels are walkable
    input: Option<PathBuf>,
    /// Where to write the solution image
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Start cell as ROW,COL (defaults to the top left corner)
    #[arg(long, value_name = "ROW,COL")]
    source: Option<Point>,
    /// Goal cell as ROW,COL (defaults to the bottom right corner)
    #[arg(long, value_name = "ROW,COL")]
    target: Option<Point>,
    /// Pixels at least this bright are walkable
    #[arg(long, value_name = "LUMA")]
    threshold: Option<u8>,
    /// How to recover the path from the wave
    #[arg(long, value_name = "STRATEGY")]
    strategy: Option<Strategy>,
    /// TOML file with defaults for all of the above
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Command line values win over the config file
    fn into_config(self) -> Result<Config, anyhow::Error> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(input) = self.input {
            config.input = Some(input);
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(source) = self.source {
            config.source = Some(source);
        }
        if let Some(target) = self.target {
            config.target = Some(target);
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }

        Ok(config)
    }
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = args.into_config()?;
    debug!("{:?}", config);

    let input = config
        .input
        .clone()
        .context("No input image given, pass one or set `input` in the config file")?;
    let img = image::open(&input).with_context(|| format!("Failed to open {}", input.display()))?;
    let mut map = parse_img(&img, config.threshold)?;
    info!(
        "Loaded {} ({}x{}, {} open cells)",
        input.display(),
        map.columns(),
        map.rows(),
        map.open_cells()
    );

    let source = config.source_or_default();
    let target = config.target_or_default(map.rows(), map.columns());

    println!("Finding the shortest path from {} to {}...", source, target);
    let solution = PathSolver::new(config.strategy).solve(&mut map, source, target)?;

    match &solution {
        Solution::Found(result) => {
            println!(
                "The shortest path from source to destination has length of {} pixels.",
                result.total_cost
            );
        }
        Solution::Unreachable => {
            println!("Destination can't be reached from given source");
            return Ok(());
        }
    }

    render_img(&map)
        .save(&config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    println!(
        "File highlighting the shortest path can be found at: {}",
        config.output.display()
    );

    Ok(())
}
