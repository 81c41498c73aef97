pub mod output;

pub use output::{create_writer, OutputFormat, OutputWriter};

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Open `path` for writing, creating parent directories as needed.
pub fn create_output_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(fs::File::create(path)?)
}
