use dockta_build::ecosystem::{self, Ecosystem};
use dockta_build::eject::{EJECTED_DOCKERFILE, is_ejected};
use dockta_build::image::DEFAULT_BASE_NAME;
use dockta_build::{
    BaseImage, DockerfileGenerator, GenerateOptions, JavascriptEcosystem, LocalFs,
    PythonEcosystem,
};
use dockta_core::{DocktaConfig, SoftwareEnvironment};
use std::path::PathBuf;

/// Descriptor picked up from the project folder when `--environ` is not given.
const DEFAULT_ENVIRON_FILE: &str = "environ.json";

pub struct GenerateArgs {
    pub folder: PathBuf,
    pub no_comments: bool,
    pub runtime_install: bool,
    pub from_image: Option<String>,
    pub environ: Option<PathBuf>,
}

/// Generate `.Dockerfile` in the project folder and print it.
pub fn generate(args: &GenerateArgs) -> anyhow::Result<()> {
    if !args.folder.is_dir() {
        anyhow::bail!("project folder {} not found", args.folder.display());
    }

    if is_ejected(&args.folder) {
        tracing::warn!(
            path = %args.folder.join(EJECTED_DOCKERFILE).display(),
            "project has an ejected Dockerfile; only .Dockerfile will be regenerated"
        );
    }

    let config = DocktaConfig::load(&args.folder)?;
    let environ = load_environ(args)?;
    let fs = LocalFs::new(&args.folder);
    let base = config
        .build
        .base_version
        .as_deref()
        .map(|version| BaseImage::new(DEFAULT_BASE_NAME, version))
        .unwrap_or_default();

    let python = PythonEcosystem::new(&environ, config.python.major_version)
        .with_base(base.clone());
    let javascript = JavascriptEcosystem::new(&environ, config.javascript.node_major_version)
        .with_execution_host(&config.javascript.execution_host)
        .with_base(base);
    let candidates: [&dyn Ecosystem; 2] = [&python, &javascript];
    let active = ecosystem::select(&candidates, &fs);

    let mut generator = DockerfileGenerator::new(&fs, active);
    if let Some(image) = args
        .from_image
        .as_deref()
        .or(config.build.from_image.as_deref())
    {
        generator = generator.with_from_image(image);
    }

    let opts = GenerateOptions {
        comments: config.build.comments && !args.no_comments,
        runtime_install: args.runtime_install || config.build.runtime_install,
        tool_version: env!("CARGO_PKG_VERSION").to_owned(),
    };
    let dockerfile = generator.generate(&opts)?;

    print!("{dockerfile}");
    Ok(())
}

fn load_environ(args: &GenerateArgs) -> anyhow::Result<SoftwareEnvironment> {
    if let Some(path) = &args.environ {
        return Ok(SoftwareEnvironment::load(path)?);
    }

    let default_path = args.folder.join(DEFAULT_ENVIRON_FILE);
    if default_path.exists() {
        Ok(SoftwareEnvironment::load(&default_path)?)
    } else {
        tracing::debug!("no environment descriptor; using project files only");
        Ok(SoftwareEnvironment::default())
    }
}
