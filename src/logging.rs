//! Log setup. The terminal belongs to the UI while a game runs, so records go
//! to a file instead of stderr.

use anyhow::{Context, Result};
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::Path;

/// Route `log` records at or above `level` into the file at `path`, truncating it
pub fn init(path: &Path, level: LevelFilter) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;
    WriteLogger::init(level, Config::default(), file).context("Failed to initialize logger")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_records_land_in_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snake.log");

        init(&path, LevelFilter::Info).unwrap();
        log::info!("session started");
        log::debug!("filtered out");
        log::logger().flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("session started"));
        assert!(!contents.contains("filtered out"));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("snake.log");

        let err = init(&path, LevelFilter::Info).unwrap_err();
        assert!(err.to_string().contains("Failed to create log file"));
    }
}
