use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use wordbook_config::Config;

/// Load a config file. Sections or fields it leaves out take their defaults.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading config from {}", path.display());
    let file = File::open(path)
        .with_context(|| format!("Failed to open config file {}", path.display()))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}
