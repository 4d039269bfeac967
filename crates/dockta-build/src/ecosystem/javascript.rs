use dockta_core::SoftwareEnvironment;

use super::{Ecosystem, entrypoint};
use crate::directive::CopyPair;
use crate::dockerfile::GenerateError;
use crate::fs::ProjectFs;
use crate::image::BaseImage;

const PACKAGE_JSON: &str = "package.json";
const GENERATED_PACKAGE_JSON: &str = ".package.json";
const SOURCE_PATTERN: &str = "**/*.js";
const PLATFORMS: &[&str] = &["JavaScript", "Node.js", "Node"];
const NODESOURCE_KEY_COMMAND: &str =
    "curl -sSL https://deb.nodesource.com/gpgkey/nodesource.gpg.key | apt-key add -";

/// Node.js projects: NodeSource apt repository, npm packages, `*.js` sources.
#[derive(Debug, Clone)]
pub struct JavascriptEcosystem<'a> {
    environ: &'a SoftwareEnvironment,
    node_major_version: u32,
    execution_host: String,
    base: BaseImage,
}

impl<'a> JavascriptEcosystem<'a> {
    pub fn new(environ: &'a SoftwareEnvironment, node_major_version: u32) -> Self {
        Self {
            environ,
            node_major_version,
            execution_host: "stencila-node@0.28.15".to_owned(),
            base: BaseImage::default(),
        }
    }

    /// Build on `base`; its version selects the NodeSource repository codename.
    pub fn with_base(mut self, base: BaseImage) -> Self {
        self.base = base;
        self
    }

    /// npm package spec installed as the runtime bootstrap.
    pub fn with_execution_host(mut self, package: &str) -> Self {
        self.execution_host = package.to_owned();
        self
    }

    /// `package.json` content listing the descriptor's JavaScript packages
    /// as unpinned dependencies.
    pub fn package_json_content(&self) -> Result<String, GenerateError> {
        let dependencies: serde_json::Map<String, serde_json::Value> = self
            .environ
            .packages_for(PLATFORMS)
            .iter()
            .map(|pkg| (pkg.name.clone(), serde_json::Value::from("*")))
            .collect();
        let manifest = serde_json::json!({ "dependencies": dependencies });
        serde_json::to_string_pretty(&manifest).map_err(|e| GenerateError::Manifest {
            path: GENERATED_PACKAGE_JSON.to_owned(),
            source: e,
        })
    }

    fn sources(&self, fs: &dyn ProjectFs) -> Result<Vec<String>, GenerateError> {
        let mut files: Vec<String> = fs
            .glob(SOURCE_PATTERN)?
            .into_iter()
            .filter(|f| !f.split('/').any(|part| part == "node_modules"))
            .collect();
        files.sort();
        Ok(files)
    }
}

impl Ecosystem for JavascriptEcosystem<'_> {
    fn name(&self) -> &'static str {
        "javascript"
    }

    fn applies(&self, fs: &dyn ProjectFs) -> bool {
        fs.exists(PACKAGE_JSON) || !self.environ.packages_for(PLATFORMS).is_empty()
    }

    fn base_name(&self) -> String {
        self.base.name.clone()
    }

    fn base_version(&self) -> String {
        self.base.version.clone()
    }

    fn apt_keys_command(&self, _base: &BaseImage) -> Option<String> {
        Some(NODESOURCE_KEY_COMMAND.to_owned())
    }

    fn apt_repos(&self, base: &BaseImage) -> Result<Vec<String>, GenerateError> {
        let codename = base.codename()?;
        Ok(vec![format!(
            "deb https://deb.nodesource.com/node_{}.x {codename} main",
            self.node_major_version
        )])
    }

    fn apt_packages(&self, _base: &BaseImage) -> Vec<String> {
        vec!["nodejs".to_owned()]
    }

    fn env_vars(&self, _base: &BaseImage) -> Vec<(String, String)> {
        Vec::new()
    }

    fn runtime_bootstrap(&self, _base: &BaseImage) -> Option<String> {
        Some(format!("npm install {}", self.execution_host))
    }

    fn install_files(&self, fs: &dyn ProjectFs) -> Result<Vec<CopyPair>, GenerateError> {
        if fs.exists(PACKAGE_JSON) {
            return Ok(vec![CopyPair::same(PACKAGE_JSON)]);
        }

        let content = self.package_json_content()?;
        tracing::debug!(path = GENERATED_PACKAGE_JSON, "writing generated package.json");
        fs.write(GENERATED_PACKAGE_JSON, &content)?;
        Ok(vec![CopyPair::new(GENERATED_PACKAGE_JSON, PACKAGE_JSON)])
    }

    fn install_command(&self, _base: &BaseImage) -> Option<String> {
        Some("npm install".to_owned())
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
        Ok(entrypoint(&files, &["main.js", "index.js"]).map(|script| format!("node {script}")))
    }
}
