use chrono::{DateTime, SecondsFormat, Utc};

use crate::directive::{self, Directive};
use crate::ecosystem::Ecosystem;
use crate::fs::{FsError, ProjectFs};
use crate::image::BaseImage;

/// File the generated Dockerfile is written to, relative to the project folder.
pub const GENERATED_DOCKERFILE: &str = ".Dockerfile";

/// Unprivileged account the image runs as.
pub const DOCKER_USER: &str = "guest";

/// Tools needed before `apt-add-repository` and keyed repositories work.
const REPO_PREREQUISITES: &[&str] = &[
    "apt-transport-https",
    "ca-certificates",
    "curl",
    "software-properties-common",
];

/// Flags controlling a single generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Annotate sections with explanatory comments and a header
    pub comments: bool,
    /// Install the ecosystem's execution host
    pub runtime_install: bool,
    /// Version reported in the header comment
    pub tool_version: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            comments: true,
            runtime_install: false,
            tool_version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

/// Generates a Dockerfile from the hooks of the active ecosystem.
///
/// With no ecosystem, or one that does not apply, the Dockerfile is just
/// the `FROM` line.
pub struct DockerfileGenerator<'a> {
    fs: &'a dyn ProjectFs,
    ecosystem: Option<&'a dyn Ecosystem>,
    from_image: Option<String>,
}

impl<'a> DockerfileGenerator<'a> {
    pub fn new(fs: &'a dyn ProjectFs, ecosystem: Option<&'a dyn Ecosystem>) -> Self {
        Self {
            fs,
            ecosystem,
            from_image: None,
        }
    }

    /// Inherit FROM `image` instead of the ecosystem's base image.
    pub fn with_from_image(mut self, image: impl Into<String>) -> Self {
        self.from_image = Some(image.into());
        self
    }

    /// The ecosystem's base image, or the default one.
    pub fn base_image(&self) -> BaseImage {
        self.ecosystem
            .map(|eco| eco.base_image())
            .unwrap_or_default()
    }

    /// Image named in the `FROM` line.
    pub fn from_identifier(&self) -> String {
        match &self.from_image {
            Some(image) => image.clone(),
            None => self.base_image().to_string(),
        }
    }

    /// Generate the Dockerfile, write it to [`GENERATED_DOCKERFILE`] and return it.
    pub fn generate(&self, opts: &GenerateOptions) -> Result<String, GenerateError> {
        self.generate_at(opts, Utc::now())
    }

    /// As [`generate`](Self::generate), stamping the header with `timestamp`.
    pub fn generate_at(
        &self,
        opts: &GenerateOptions,
        timestamp: DateTime<Utc>,
    ) -> Result<String, GenerateError> {
        let mut directives = Vec::new();
        if opts.comments {
            directives.push(Directive::Comment(format!(
                "Generated by Dockta {} at {}\n\
                 To stop Dockta generating this file and start editing it yourself,\n\
                 rename it to \"Dockerfile\".",
                opts.tool_version,
                timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
            )));
        }
        directives.extend(self.directives(opts)?);

        let dockerfile = directive::render(&directives);
        self.fs.write(GENERATED_DOCKERFILE, &dockerfile)?;

        tracing::info!(
            path = GENERATED_DOCKERFILE,
            directives = directives.len(),
            "dockerfile generated"
        );
        Ok(dockerfile)
    }

    /// The ordered directives, without the header comment.
    ///
    /// Hooks that synthesize manifests write them through the project
    /// filesystem as a side effect.
    pub fn directives(&self, opts: &GenerateOptions) -> Result<Vec<Directive>, GenerateError> {
        let mut out = Sequence::new(opts.comments);
        let base = self.base_image();

        out.comment("This tells Docker which base image to use.");
        out.push(Directive::From(self.from_identifier()));

        let Some(eco) = self.ecosystem.filter(|eco| eco.applies(self.fs)) else {
            tracing::debug!("no applicable ecosystem; emitting FROM only");
            return Ok(out.finish());
        };
        tracing::debug!(ecosystem = eco.name(), base = %base, "assembling directives");

        let apt_keys_command = eco.apt_keys_command(&base);
        let apt_repos = eco.apt_repos(&base)?;

        // In case the inherited image drops down to a different user
        out.push(Directive::User("root".to_owned()));

        if !apt_repos.is_empty() || apt_keys_command.is_some() {
            out.comment("This section installs system packages needed to add extra system repositories.");
            out.push(Directive::Run(vec![
                "apt-get update".to_owned(),
                apt_install(REPO_PREREQUISITES),
            ]));

            out.comment("This section adds system repositories required to install extra system packages.");
            if let Some(command) = apt_keys_command {
                out.push(Directive::run(command));
            }
            if !apt_repos.is_empty() {
                out.push(Directive::Run(
                    apt_repos
                        .iter()
                        .map(|repo| format!("apt-add-repository \"{repo}\""))
                        .collect(),
                ));
            }
        }

        // Set after the repository layers to improve caching
        let env_vars = eco.env_vars(&base);
        if !env_vars.is_empty() {
            out.comment("This section sets environment variables within the image.");
            out.push(Directive::Env(env_vars));
        }

        let apt_packages = eco.apt_packages(&base);
        if !apt_packages.is_empty() {
            out.comment(
                "This section installs system packages required for your project\n\
                 If you need extra system packages add them here.",
            );
            out.push(Directive::Run(vec![
                "apt-get update".to_owned(),
                apt_install(apt_packages.as_slice()),
                "apt-get autoremove -y".to_owned(),
                "apt-get clean".to_owned(),
                "rm -rf /var/lib/apt/lists/*".to_owned(),
            ]));
        }

        if opts.runtime_install {
            if let Some(command) = eco.runtime_bootstrap(&base) {
                out.comment("This section runs commands to install the execution host.");
                out.push(Directive::run(command));
            }
        }

        out.comment(
            "It's good practice to run Docker images as a non-root user.\n\
             This section creates a new user and its home directory as the default working directory.",
        );
        out.push(Directive::run(format!(
            "id -u {DOCKER_USER} >/dev/null 2>&1 || useradd --create-home --uid 1001 -s /bin/bash {DOCKER_USER}"
        )));
        out.push(Directive::Workdir(format!("/home/{DOCKER_USER}")));

        let install_files = eco.install_files(self.fs)?;
        let install_command = eco.install_command(&base);
        let project_files = eco.project_files(self.fs)?;
        let run_command = eco.run_command(self.fs)?;

        if install_command.is_some() {
            out.comment("This is a special comment to tell Dockta to manage the build from here on");
            out.push(Directive::Marker);
        }

        if !install_files.is_empty() {
            out.comment("This section copies package requirement files into the image");
            out.extend(install_files.into_iter().map(Directive::Copy));
        }

        if let Some(command) = install_command {
            out.comment("This section runs commands to install the packages specified in the requirement file/s");
            out.push(Directive::run(command));
        }

        if !project_files.is_empty() {
            out.comment("This section copies your project's files into the image");
            out.extend(project_files.into_iter().map(Directive::Copy));
        }

        out.comment("This sets the default user when the container is run");
        out.push(Directive::User(DOCKER_USER.to_owned()));

        if let Some(command) = run_command {
            out.comment("This tells Docker the default command to run when the container is started");
            out.push(Directive::Cmd(command));
        }

        Ok(out.finish())
    }
}

/// Directive list that drops comments when they are disabled.
struct Sequence {
    comments: bool,
    directives: Vec<Directive>,
}

impl Sequence {
    fn new(comments: bool) -> Self {
        Self {
            comments,
            directives: Vec::new(),
        }
    }

    fn comment(&mut self, text: &str) {
        if self.comments {
            self.directives.push(Directive::comment(text));
        }
    }

    fn push(&mut self, directive: Directive) {
        self.directives.push(directive);
    }

    fn extend(&mut self, directives: impl IntoIterator<Item = Directive>) {
        self.directives.extend(directives);
    }

    fn finish(self) -> Vec<Directive> {
        self.directives
    }
}

/// Non-interactive `apt-get install` step, one package per continuation line.
fn apt_install<S: AsRef<str>>(packages: &[S]) -> String {
    let packages: Vec<&str> = packages.iter().map(AsRef::as_ref).collect();
    format!(
        "DEBIAN_FRONTEND=noninteractive apt-get install -y \\\n      {}",
        packages.join(" \\\n      ")
    )
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("unsupported OS version {version:?}: no known release codename")]
    UnsupportedOsVersion { version: String },
    #[error("failed to serialize generated manifest {path}")]
    Manifest {
        path: String,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Fs(#[from] FsError),
}
