use serde::{Deserialize, Serialize};

/// Name of the per-project configuration file.
pub const CONFIG_FILE: &str = "dockta.toml";

/// dockta.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocktaConfig {
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub python: PythonConfig,
    #[serde(default)]
    pub javascript: JavascriptConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Image to inherit FROM. When None, the active ecosystem's base image is used.
    #[serde(default)]
    pub from_image: Option<String>,
    /// Ubuntu release the ecosystems build on. Also selects the codename of
    /// extra apt repositories, so it must match an Ubuntu `from_image`.
    #[serde(default)]
    pub base_version: Option<String>,
    /// Annotate the generated Dockerfile with explanatory comments
    #[serde(default = "default_comments")]
    pub comments: bool,
    /// Install the ecosystem's execution host package into the image
    #[serde(default)]
    pub runtime_install: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PythonConfig {
    /// Python major version (2 selects the unsuffixed `python`/`pip` commands)
    #[serde(default = "default_python_major_version")]
    pub major_version: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JavascriptConfig {
    /// Node.js major version installed from the NodeSource repository
    #[serde(default = "default_node_major_version")]
    pub node_major_version: u32,
    /// npm package spec of the execution host installed with `--runtime-install`
    #[serde(default = "default_execution_host")]
    pub execution_host: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            from_image: None,
            base_version: None,
            comments: default_comments(),
            runtime_install: false,
        }
    }
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            major_version: default_python_major_version(),
        }
    }
}

impl Default for JavascriptConfig {
    fn default() -> Self {
        Self {
            node_major_version: default_node_major_version(),
            execution_host: default_execution_host(),
        }
    }
}

impl DocktaConfig {
    /// Load from dockta.toml in the given directory, or return defaults if not found.
    pub fn load(project_dir: &std::path::Path) -> crate::Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);
        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading config");
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            Ok(Self::default())
        }
    }
}

fn default_comments() -> bool {
    true
}

fn default_python_major_version() -> u8 {
    3
}

fn default_node_major_version() -> u32 {
    10
}

fn default_execution_host() -> String {
    "stencila-node@0.28.15".to_owned()
}
