use std::path::Path;

pub fn eject(folder: &Path) -> anyhow::Result<()> {
    let path = dockta_build::eject::eject(folder)?;

    println!("Ejected generated Dockerfile to {}", path.display());
    println!("You can now edit it directly. dockta will no longer manage it.");
    Ok(())
}
