use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = r#"# a11ymap Configuration

[store]
# Dotted path holding <test>.<test>.details for every test category
field_prefix = "results.accessibility.tests"

[aggregation]
default_issue_identifier = "element"
section_aware = true

# Per-test overrides
# [tests.color_contrast]
# issue_identifier = "type"
# extra_fields = []

[output]
default_format = "terminal"
top_issues = 10
"#;

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force).map(|path| {
        println!("Created {} configuration file", path.display());
    })
}

pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    Ok(config_path)
}
