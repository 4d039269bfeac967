//! Core types and configuration for dockta.
//!
//! This crate defines the `dockta.toml` schema ([`DocktaConfig`]), the
//! software-environment descriptor ([`SoftwareEnvironment`]), and shared
//! error types.

pub mod config;
pub mod environ;
pub mod error;

pub use config::{BuildConfig, DocktaConfig, JavascriptConfig, PythonConfig};
pub use environ::{SoftwareEnvironment, SoftwarePackage};
pub use error::{Error, Result};
