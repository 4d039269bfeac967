//! Per-language hook implementations driving the generator.

mod javascript;
mod python;

pub use javascript::JavascriptEcosystem;
pub use python::PythonEcosystem;

use crate::directive::CopyPair;
use crate::dockerfile::GenerateError;
use crate::fs::ProjectFs;
use crate::image::BaseImage;

/// The hooks a language ecosystem provides to [`DockerfileGenerator`].
///
/// Every method is required: an ecosystem with nothing to say for a step
/// returns an empty list or `None`, and the generator skips that step.
/// Methods taking a [`BaseImage`] receive the ecosystem's own base image,
/// even when the FROM line is overridden.
///
/// [`DockerfileGenerator`]: crate::DockerfileGenerator
pub trait Ecosystem {
    /// Short name used in logs, e.g. `python`.
    fn name(&self) -> &'static str;

    /// Does this ecosystem apply to the project?
    fn applies(&self, fs: &dyn ProjectFs) -> bool;

    fn base_name(&self) -> String;

    fn base_version(&self) -> String;

    /// Shell command adding apt signing keys.
    fn apt_keys_command(&self, base: &BaseImage) -> Option<String>;

    /// Extra apt repositories, as `apt-add-repository` arguments.
    fn apt_repos(&self, base: &BaseImage) -> Result<Vec<String>, GenerateError>;

    fn apt_packages(&self, base: &BaseImage) -> Vec<String>;

    /// Environment variables as `(name, value)` pairs.
    fn env_vars(&self, base: &BaseImage) -> Vec<(String, String)>;

    /// Command installing the ecosystem's execution host.
    fn runtime_bootstrap(&self, base: &BaseImage) -> Option<String>;

    /// Requirement files copied in before `install_command` runs.
    ///
    /// May write a synthesized manifest into the project folder.
    fn install_files(&self, fs: &dyn ProjectFs) -> Result<Vec<CopyPair>, GenerateError>;

    /// Command installing language packages from the install files.
    fn install_command(&self, base: &BaseImage) -> Option<String>;

    /// Project files copied in after packages are installed.
    fn project_files(&self, fs: &dyn ProjectFs) -> Result<Vec<CopyPair>, GenerateError>;

    /// Default command of the container.
    fn run_command(&self, fs: &dyn ProjectFs) -> Result<Option<String>, GenerateError>;

    /// The image this ecosystem builds on.
    fn base_image(&self) -> BaseImage {
        BaseImage {
            name: self.base_name(),
            version: self.base_version(),
        }
    }
}

/// Pick the first candidate that applies to the project.
pub fn select<'a>(candidates: &[&'a dyn Ecosystem], fs: &dyn ProjectFs) -> Option<&'a dyn Ecosystem> {
    let selected = candidates.iter().copied().find(|eco| eco.applies(fs));
    match selected {
        Some(eco) => tracing::info!(ecosystem = eco.name(), "selected ecosystem"),
        None => tracing::info!("no ecosystem applies"),
    }
    selected
}

/// Pick the entrypoint among sorted source files: the first preferred name
/// present, otherwise the lexically first file.
fn entrypoint<'a>(files: &'a [String], preferred: &[&str]) -> Option<&'a str> {
    preferred
        .iter()
        .find_map(|name| files.iter().find(|f| f.as_str() == *name))
        .or_else(|| files.first())
        .map(String::as_str)
}
