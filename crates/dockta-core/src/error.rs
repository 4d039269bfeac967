use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Environment descriptor ──
    #[error("failed to read environment descriptor {path}")]
    EnvironRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse environment descriptor {path}")]
    EnvironParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
