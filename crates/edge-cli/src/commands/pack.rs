use std::path::Path;

use edge_core::StackConfig;

pub fn pack(path: &str) -> anyhow::Result<()> {
    let project = Path::new(path);
    let config = StackConfig::from_file(&project.join("edgestack.toml"))?;
    let source = project.join(&config.function.source);

    match edge_pack::pack(&source, config.function.manifest.as_deref()) {
        Ok(artifact) => {
            println!("✓ Packaged artifact ({:.1} KiB)", artifact.size_bytes as f64 / 1024.0);
            println!("  Output: {}", artifact.path);
            println!("  SHA256: {}", artifact.sha256);
            Ok(())
        }
        Err(e) => {
            eprintln!("Pack failed: {e}");
            Err(e.into())
        }
    }
}
