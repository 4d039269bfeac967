use dockta_core::config::CONFIG_FILE;
use std::path::Path;

const DOCKTA_TOML: &str = r#"[build]
# base_version = "18.04"
# from_image = "myorg/base:latest"
# comments = true
# runtime_install = false

[python]
# major_version = 3

[javascript]
# node_major_version = 10
# execution_host = "stencila-node@0.28.15"
"#;

/// Initialize dockta in an existing project folder.
pub fn init_project(folder: &Path) -> anyhow::Result<()> {
    if !folder.is_dir() {
        anyhow::bail!("project folder {} not found", folder.display());
    }

    let config_path = folder.join(CONFIG_FILE);
    if config_path.exists() {
        eprintln!("{CONFIG_FILE} already exists, skipping");
        return Ok(());
    }

    std::fs::write(&config_path, DOCKTA_TOML)?;
    println!("Created {CONFIG_FILE}");
    println!();
    println!("Next steps:");
    println!();
    println!("  1. Describe your packages in requirements.txt, package.json or environ.json");
    println!();
    println!("  2. Generate the Dockerfile:");
    println!("     dockta generate");
    Ok(())
}
