use std::sync::Arc;

use autosass::{Autocompiler, ConsoleChannel, GrassCompiler, SettingsStore};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};

/// Compile SCSS/Sass stylesheets on save
#[derive(Debug, Parser)]
#[command(name = "autosass", version)]
struct Args {
    /// Where to start looking for `.config/autosass.yaml` [default: current directory]
    #[arg(long, global = true)]
    root: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Watch the project and compile stylesheets as they are saved (default)
    Watch,
    /// Compile every stylesheet in the project that is not excluded
    CompileAll,
    /// Compile one stylesheet, ignoring directives and exclusion
    Compile {
        /// Stylesheet to compile
        file: Utf8PathBuf,
    },
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::try_from(cwd).map_err(|e| {
        eyre!(
            "Current directory is not valid UTF-8: {}",
            e.as_path().display()
        )
    })
}

fn absolute(cwd: &Utf8Path, path: Utf8PathBuf) -> Utf8PathBuf {
    if path.is_absolute() { path } else { cwd.join(path) }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("autosass=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let cwd = current_dir()?;
    let start = args.root.map_or_else(|| cwd.clone(), |root| absolute(&cwd, root));

    let settings = SettingsStore::discover_from(&start);
    if let Some(config_file) = settings.config_file() {
        tracing::info!("Using configuration from {config_file}");
    }

    let autocompiler = Autocompiler::new(
        settings,
        Arc::new(GrassCompiler),
        Arc::new(ConsoleChannel),
    )?;

    match args.command.unwrap_or(Command::Watch) {
        Command::Watch => {
            autocompiler
                .watch(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        tracing::error!("Failed to listen for Ctrl-C: {e}");
                        std::future::pending::<()>().await;
                    }
                })
                .await?;
        }
        Command::CompileAll => {
            let summary = autocompiler.compile_all()?;
            autocompiler.wait_idle().await;
            if summary.failed > 0 {
                return Err(eyre!(
                    "{} of {} stylesheets could not be compiled",
                    summary.failed,
                    summary.compiled + summary.failed
                ));
            }
        }
        Command::Compile { file } => {
            autocompiler.compile_one(&absolute(&cwd, file))?;
            autocompiler.wait_idle().await;
        }
    }

    Ok(())
}
