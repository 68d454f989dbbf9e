use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use log::{debug, info};
use serde::Deserialize;

use crate::{backtrace::Strategy, grid::Point};

/// Settings for one run of the command line tool. Every field can be left
/// out of the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Image to read the maze from
    pub input: Option<PathBuf>,
    /// Where to write the image with the path drawn in
    pub output: PathBuf,
    /// Pixels at least this bright are walkable
    pub threshold: u8,
    /// Defaults to the top left cell
    pub source: Option<Point>,
    /// Defaults to the bottom right cell
    pub target: Option<Point>,
    pub strategy: Strategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            output: default_output(),
            threshold: 128,
            source: None,
            target: None,
            strategy: Strategy::default(),
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("solution.png")
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        info!("Loaded configuration from {}", path.display());
        debug!("{:?}", config);
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self, anyhow::Error> {
        Ok(toml::from_str(contents)?)
    }

    /// The configured source, or the top left cell
    pub fn source_or_default(&self) -> Point {
        self.source.unwrap_or(Point::new(0, 0))
    }

    /// The configured target, or the bottom right cell of a `rows` x `columns` grid
    pub fn target_or_default(&self, rows: usize, columns: usize) -> Point {
        self.target.unwrap_or(Point::new(
            rows.saturating_sub(1),
            columns.saturating_sub(1),
        ))
    }
}
