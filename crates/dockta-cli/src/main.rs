mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dockta", about = "Generate Dockerfiles from software environments")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate .Dockerfile for a project folder
    Generate {
        /// Project folder
        #[arg(default_value = ".")]
        folder: PathBuf,
        /// Omit explanatory comments
        #[arg(long)]
        no_comments: bool,
        /// Install the execution host into the image
        #[arg(long)]
        runtime_install: bool,
        /// Image to inherit FROM, overriding the ecosystem's base image
        #[arg(long = "from", value_name = "IMAGE")]
        from_image: Option<String>,
        /// Software environment descriptor (JSON); defaults to environ.json in the folder
        #[arg(long, value_name = "FILE")]
        environ: Option<PathBuf>,
    },
    /// Copy .Dockerfile to Dockerfile for manual customization
    Eject {
        /// Project folder
        #[arg(default_value = ".")]
        folder: PathBuf,
    },
    /// Create a dockta.toml in a project folder
    Init {
        /// Project folder
        #[arg(default_value = ".")]
        folder: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            folder,
            no_comments,
            runtime_install,
            from_image,
            environ,
        } => commands::generate(&commands::GenerateArgs {
            folder,
            no_comments,
            runtime_install,
            from_image,
            environ,
        })?,
        Commands::Eject { folder } => commands::eject(&folder)?,
        Commands::Init { folder } => commands::init_project(&folder)?,
    }

    Ok(())
}
