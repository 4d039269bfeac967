use dockta_core::SoftwareEnvironment;

use super::{Ecosystem, entrypoint};
use crate::directive::CopyPair;
use crate::dockerfile::GenerateError;
use crate::fs::ProjectFs;
use crate::image::BaseImage;

const REQUIREMENTS_FILE: &str = "requirements.txt";
const GENERATED_REQUIREMENTS_FILE: &str = ".requirements.txt";
const SOURCE_PATTERN: &str = "**/*.py";
const PLATFORMS: &[&str] = &["Python"];

/// Python projects: apt-installed interpreter, pip requirements, `*.py` sources.
#[derive(Debug, Clone)]
pub struct PythonEcosystem<'a> {
    environ: &'a SoftwareEnvironment,
    major_version: u8,
    base: BaseImage,
}

impl<'a> PythonEcosystem<'a> {
    pub fn new(environ: &'a SoftwareEnvironment, major_version: u8) -> Self {
        Self {
            environ,
            major_version,
            base: BaseImage::default(),
        }
    }

    /// Build on `base` instead of the default Ubuntu release.
    pub fn with_base(mut self, base: BaseImage) -> Self {
        self.base = base;
        self
    }

    /// Suffix for `python`/`pip` commands: empty for Python 2, else the major version.
    pub fn version_suffix(&self) -> String {
        if self.major_version == 2 {
            String::new()
        } else {
            self.major_version.to_string()
        }
    }

    /// Requirements file content built from the descriptor's Python packages,
    /// one `name+version` per line. Empty when there are none.
    pub fn requirements_content(&self) -> String {
        self.environ
            .packages_for(PLATFORMS)
            .iter()
            .map(|pkg| pkg.requirement())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn sources(&self, fs: &dyn ProjectFs) -> Result<Vec<String>, GenerateError> {
        let mut files = fs.glob(SOURCE_PATTERN)?;
        files.sort();
        Ok(files)
    }
}

impl Ecosystem for PythonEcosystem<'_> {
    fn name(&self) -> &'static str {
        "python"
    }

    fn applies(&self, fs: &dyn ProjectFs) -> bool {
        fs.exists(REQUIREMENTS_FILE)
    }

    fn base_name(&self) -> String {
        self.base.name.clone()
    }

    fn base_version(&self) -> String {
        self.base.version.clone()
    }

    fn apt_keys_command(&self, _base: &BaseImage) -> Option<String> {
        None
    }

    fn apt_repos(&self, _base: &BaseImage) -> Result<Vec<String>, GenerateError> {
        Ok(Vec::new())
    }

    fn apt_packages(&self, _base: &BaseImage) -> Vec<String> {
        let suffix = self.version_suffix();
        vec![format!("python{suffix}"), format!("python{suffix}-pip")]
    }

    fn env_vars(&self, _base: &BaseImage) -> Vec<(String, String)> {
        Vec::new()
    }

    fn runtime_bootstrap(&self, _base: &BaseImage) -> Option<String> {
        None
    }

    fn install_files(&self, fs: &dyn ProjectFs) -> Result<Vec<CopyPair>, GenerateError> {
        let content = self.requirements_content();
        if !content.is_empty() {
            tracing::debug!(path = GENERATED_REQUIREMENTS_FILE, "writing generated requirements");
            fs.write(GENERATED_REQUIREMENTS_FILE, &content)?;
            return Ok(vec![CopyPair::new(
                GENERATED_REQUIREMENTS_FILE,
                REQUIREMENTS_FILE,
            )]);
        }

        if fs.exists(REQUIREMENTS_FILE) {
            return Ok(vec![CopyPair::same(REQUIREMENTS_FILE)]);
        }

        Ok(Vec::new())
    }

    fn install_command(&self, _base: &BaseImage) -> Option<String> {
        Some(format!(
            "pip{} install --user --requirement {REQUIREMENTS_FILE}",
            self.version_suffix()
        ))
    }

    fn project_files(&self, fs: &dyn ProjectFs) -> Result<Vec<CopyPair>, GenerateError> {
        Ok(self
            .sources(fs)?
            .iter()
            .map(|file| CopyPair::same(file))
            .collect())
    }

    fn run_command(&self, fs: &dyn ProjectFs) -> Result<Option<String>, GenerateError> {
        let files = self.sources(fs)?;
        Ok(entrypoint(&files, &["main.py", "cmd.py"])
            .map(|script| format!("python{} {script}", self.version_suffix())))
    }
}
