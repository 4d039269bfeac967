//! The software-environment descriptor consumed by the generators.
//!
//! The descriptor is produced and validated upstream; here it is plain data
//! read from JSON with camelCase keys:
//!
//! ```json
//! {
//!   "name": "my-analysis",
//!   "softwareRequirements": [
//!     { "name": "numpy", "version": "==1.2", "runtimePlatform": "Python" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A software environment: the packages a project needs, per ecosystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareEnvironment {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub software_requirements: Vec<SoftwarePackage>,
}

/// A single package requirement.
///
/// # Examples
///
/// ```
/// use dockta_core::SoftwarePackage;
///
/// let pkg = SoftwarePackage::new("numpy", "==1.2", "Python");
/// assert_eq!(pkg.requirement(), "numpy==1.2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwarePackage {
    pub name: String,
    /// Version specifier, e.g. `==1.2` or `>=3`. Empty means unconstrained.
    #[serde(default, alias = "versionSpec")]
    pub version: String,
    /// Ecosystem the package belongs to, e.g. `Python` or `JavaScript`
    #[serde(default)]
    pub runtime_platform: Option<String>,
}

impl SoftwarePackage {
    pub fn new(name: &str, version: &str, runtime_platform: &str) -> Self {
        Self {
            name: name.to_owned(),
            version: version.to_owned(),
            runtime_platform: Some(runtime_platform.to_owned()),
        }
    }

    /// Name immediately followed by the version specifier.
    pub fn requirement(&self) -> String {
        format!("{}{}", self.name, self.version)
    }
}

impl SoftwareEnvironment {
    /// Load a descriptor from a JSON file.
    pub fn load(path: &Path) -> crate::Result<Self> {
        tracing::debug!(path = %path.display(), "loading environment descriptor");
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::EnvironRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| crate::Error::EnvironParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Packages whose runtime platform matches one of `platforms`
    /// (case-insensitive), in descriptor order.
    pub fn packages_for<'a>(&'a self, platforms: &[&str]) -> Vec<&'a SoftwarePackage> {
        self.software_requirements
            .iter()
            .filter(|pkg| {
                pkg.runtime_platform
                    .as_deref()
                    .is_some_and(|p| platforms.iter().any(|want| want.eq_ignore_ascii_case(p)))
            })
            .collect()
    }
}
