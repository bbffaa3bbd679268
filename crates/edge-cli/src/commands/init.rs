use std::path::Path;

use anyhow::bail;
use edge_core::StackConfig;

pub fn init(path: &str, thing: &str) -> anyhow::Result<()> {
    let config_path = Path::new(path).join("edgestack.toml");
    if config_path.exists() {
        bail!("{} already exists", config_path.display());
    }

    let config = StackConfig::scaffold(thing);
    std::fs::write(&config_path, config.to_toml_string()?)?;
    println!("✓ Wrote {}", config_path.display());
    Ok(())
}
