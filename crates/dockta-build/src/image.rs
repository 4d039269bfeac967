use std::fmt;

use crate::dockerfile::GenerateError;

/// Base image used when no ecosystem applies.
pub const DEFAULT_BASE_NAME: &str = "ubuntu";
pub const DEFAULT_BASE_VERSION: &str = "19.10";

/// Ubuntu release versions and their codenames.
const UBUNTU_CODENAMES: &[(&str, &str)] = &[
    ("14.04", "trusty"),
    ("16.04", "xenial"),
    ("18.04", "bionic"),
    ("18.10", "cosmic"),
    ("19.04", "disco"),
    ("19.10", "eoan"),
    ("20.04", "focal"),
];

/// The image a Dockerfile inherits FROM.
///
/// # Examples
///
/// ```
/// use dockta_build::BaseImage;
///
/// let base = BaseImage::new("ubuntu", "18.04");
/// assert_eq!(base.to_string(), "ubuntu:18.04");
/// assert_eq!(base.codename().unwrap(), "bionic");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseImage {
    pub name: String,
    pub version: String,
}

impl BaseImage {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_owned(),
            version: version.to_owned(),
        }
    }

    /// Release codename of this image's OS version, as used in apt sources.
    ///
    /// # Errors
    ///
    /// [`GenerateError::UnsupportedOsVersion`] if the version has no known codename.
    pub fn codename(&self) -> Result<&'static str, GenerateError> {
        ubuntu_codename(&self.version)
    }
}

impl Default for BaseImage {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_NAME, DEFAULT_BASE_VERSION)
    }
}

impl fmt::Display for BaseImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}:{}", self.name, self.version)
        }
    }
}

/// Look up the codename of an Ubuntu version such as `18.04`.
pub fn ubuntu_codename(version: &str) -> Result<&'static str, GenerateError> {
    UBUNTU_CODENAMES
        .iter()
        .find(|(v, _)| *v == version)
        .map(|(_, name)| *name)
        .ok_or_else(|| GenerateError::UnsupportedOsVersion {
            version: version.to_owned(),
        })
}
