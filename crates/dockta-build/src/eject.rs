use std::path::{Path, PathBuf};

use crate::dockerfile::GENERATED_DOCKERFILE;

/// Name a user-owned Dockerfile takes once ejected.
pub const EJECTED_DOCKERFILE: &str = "Dockerfile";

/// Takes ownership of the generated Dockerfile.
///
/// Copies `.Dockerfile` to `Dockerfile` in the project folder. From then
/// on the user edits `Dockerfile` directly and dockta leaves it alone.
pub fn eject(project_dir: &Path) -> Result<PathBuf, EjectError> {
    let generated = project_dir.join(GENERATED_DOCKERFILE);
    if !generated.exists() {
        return Err(EjectError::NotGenerated(generated));
    }

    let dockerfile_path = project_dir.join(EJECTED_DOCKERFILE);
    if dockerfile_path.exists() {
        return Err(EjectError::AlreadyEjected(dockerfile_path));
    }

    let content = std::fs::read_to_string(&generated).map_err(|e| EjectError::Read {
        path: generated.clone(),
        source: e,
    })?;
    std::fs::write(&dockerfile_path, content).map_err(|e| EjectError::Write {
        path: dockerfile_path.clone(),
        source: e,
    })?;

    tracing::info!(path = %dockerfile_path.display(), "ejected dockerfile");
    Ok(dockerfile_path)
}

/// Check if the project has an ejected Dockerfile.
pub fn is_ejected(project_dir: &Path) -> bool {
    project_dir.join(EJECTED_DOCKERFILE).exists()
}

#[derive(Debug, thiserror::Error)]
pub enum EjectError {
    #[error("no generated Dockerfile at {0}; run `dockta generate` first")]
    NotGenerated(PathBuf),
    #[error("Dockerfile already ejected at {0}; edit it directly or delete it to re-eject")]
    AlreadyEjected(PathBuf),
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
