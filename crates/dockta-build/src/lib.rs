//! Dockerfile generation and eject for dockta.
//!
//! # Generation pipeline
//!
//! ```text
//! dockta generate
//!   1. Select     ── first Ecosystem whose applies() is true (or none)
//!   2. Directives ── DockerfileGenerator::directives(), fixed order
//!   3. Render     ── directive::render() → text
//!   4. Persist    ── ProjectFs::write(".Dockerfile")
//! ```
//!
//! # Layer order
//!
//! System-level work (apt keys, repositories, env vars, apt packages, the
//! execution host) runs as root and comes first so it caches independently
//! of the project. The image then drops to an unprivileged `guest` account
//! before copying requirement files, installing language packages and
//! copying project sources, so editing a source file only invalidates the
//! final layers.
//!
//! # Managed region
//!
//! When the active ecosystem has an install command, a `# dockta` marker
//! line is emitted just before the requirement-file copies. Everything after
//! it is owned by dockta and may be rewritten by later tooling.

pub mod directive;
pub mod dockerfile;
pub mod ecosystem;
pub mod eject;
pub mod fs;
pub mod image;

pub use directive::{CopyPair, Directive};
pub use dockerfile::{DockerfileGenerator, GenerateError, GenerateOptions};
pub use ecosystem::{Ecosystem, JavascriptEcosystem, PythonEcosystem};
pub use fs::{FsError, LocalFs, ProjectFs};
pub use image::BaseImage;
