use std::path::Path;

use edge_core::{StackConfig, stack, template};

pub fn synth(path: &str, credential: &str, out: Option<&str>) -> anyhow::Result<()> {
    let project = Path::new(path);
    let config = StackConfig::from_file(&project.join("edgestack.toml"))?;

    let source = project.join(&config.function.source);
    let artifact = edge_pack::pack(&source, config.function.manifest.as_deref())?;

    let group = stack::assemble(&config, artifact, credential)?;
    let rendered = serde_json::to_string_pretty(&template::emit(&group))?;

    match out {
        Some(file) => {
            std::fs::write(file, rendered)?;
            println!("✓ Synthesized group '{}' to {file}", group.name);
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
