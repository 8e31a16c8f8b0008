use anyhow::{Context as _, Result};
use class_stores_codegen::config::PluginConfig;
use class_stores_codegen::context::Context;
use class_stores_codegen::transform::transform_boot_call;
use class_stores_codegen::watcher::watch_stores;
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use tracing::{debug, info};

/// Generate the store loader and component typings for class-based Vue stores
#[derive(Parser, Debug)]
#[command(name = "class-stores")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
struct Cli {
    #[command(flatten)]
    project: ProjectArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct ProjectArgs {
    /// Project root (defaults to the current directory)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Stores directory, relative to the project root
    #[arg(long, global = true)]
    stores_path: Option<PathBuf>,

    /// File name of the generated component typings
    #[arg(long, global = true)]
    stores_file_name: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze the stores once and write the generated files
    #[command(visible_alias = "b")]
    Build,
    /// Build, then rebuild whenever a store file changes
    #[command(visible_alias = "w")]
    Watch,
    /// Print a module with its `StoreManager.boot()` call rewritten
    Transform {
        /// Path to the module to transform
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let root = match &cli.project.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };
    let root = root
        .canonicalize()
        .with_context(|| format!("Project root '{}' does not exist", root.display()))?;

    let mut options = PluginConfig::load(&root)?;
    if let Some(stores_path) = cli.project.stores_path {
        options = options.with_stores_path(stores_path);
    }
    if let Some(file_name) = cli.project.stores_file_name {
        options = options.with_stores_file_name(file_name);
    }
    let config = options.resolve(&root);
    debug!("Resolved configuration: {:?}", config);

    match cli.command {
        Commands::Build => build_command(Context::init(config)?),
        Commands::Watch => watch_command(Context::init(config)?),
        Commands::Transform { file } => transform_command(&file, &config.loader_path),
    }
}

fn build_command(mut context: Context) -> Result<()> {
    let report = context.write_files()?;
    context.take_diagnostics().print();

    if !report.skipped {
        info!(
            "Done: {} written, {} unchanged",
            report.written.len(),
            report.unchanged.len()
        );
    }
    Ok(())
}

fn watch_command(mut context: Context) -> Result<()> {
    context.write_files()?;
    context.take_diagnostics().print();

    let running = AtomicBool::new(true);
    watch_stores(&mut context, &running)?;
    Ok(())
}

fn transform_command(file: &Path, loader_path: &Path) -> Result<()> {
    let file = file
        .canonicalize()
        .with_context(|| format!("Module '{}' does not exist", file.display()))?;
    let code = fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    match transform_boot_call(&code, &file.to_string_lossy(), loader_path) {
        Some(transformed) => print!("{}", transformed),
        None => {
            info!("No boot call to rewrite in {}", file.display());
            print!("{}", code);
        }
    }
    Ok(())
}
