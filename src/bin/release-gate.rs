//! Release Gate CLI
//!
//! Single-package release gate and publish orchestrator

use anyhow::Result;
use clap::{Parser, Subcommand};
use release_gate::{
    CargoPackager, CratesIoRegistry, GithubReleases, Manifest, PublishCoordinator, RegistryClient,
    ReleaseConfig, VersionGate, exit_code,
};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

/// Release gate and publish orchestrator for a single package
#[derive(Parser)]
#[command(name = "release-gate")]
#[command(version = "0.1.0")]
#[command(about = "Release gate and publish orchestrator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the gate, publish and announce pipeline
    Run {
        /// Checkout path (defaults to current directory)
        #[arg(value_name = "PROJECT_PATH")]
        project_path: Option<PathBuf>,

        /// Release-host repository (owner/name)
        #[arg(short, long)]
        repo: Option<String>,

        /// Prefix for the release tag
        #[arg(long)]
        tag_prefix: Option<String>,
    },

    /// Evaluate the version gate without side effects
    Check {
        /// Checkout path (defaults to current directory)
        #[arg(value_name = "PROJECT_PATH")]
        project_path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let result = run().await;

    match result {
        Ok(exit) => process::exit(exit),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            project_path,
            repo,
            tag_prefix,
        } => {
            let path = project_path.unwrap_or_else(|| PathBuf::from("."));
            run_command(path, repo, tag_prefix).await
        }
        Commands::Check { project_path } => {
            let path = project_path.unwrap_or_else(|| PathBuf::from("."));
            check_command(path).await
        }
    }
}

fn build_registry(project_path: &Path, config: &ReleaseConfig) -> Result<CratesIoRegistry> {
    let mut registry = CratesIoRegistry::new(project_path)?;
    if let Some(api) = &config.registry_api {
        registry = registry.with_api_base(api.clone());
    }
    Ok(registry)
}

async fn run_command(
    project_path: PathBuf,
    repo: Option<String>,
    tag_prefix: Option<String>,
) -> Result<i32> {
    println!("\n🚦 release-gate\n");

    let mut config = ReleaseConfig::load(&project_path).await?;

    // CLI arguments take priority over the configuration file
    if repo.is_some() {
        config.repository = repo;
    }
    if tag_prefix.is_some() {
        config.tag_prefix = tag_prefix;
    }

    let registry = build_registry(&project_path, &config)?;
    let host = GithubReleases::new(&project_path)?;
    let packager = CargoPackager::new(&project_path)?;

    let mut coordinator = PublishCoordinator::new(
        &project_path,
        config,
        Arc::new(registry),
        Arc::new(host),
        Arc::new(packager),
    );

    let result = coordinator.run().await;

    match &result {
        Ok(report) if report.skipped() => {
            println!("\n⏭️  Nothing to publish (gate closed), exiting cleanly");
        }
        Ok(report) => {
            println!("\n✅ Release completed in {} ms", report.duration_ms);
            if let Some(record) = &report.release {
                if let Some(url) = &record.url {
                    println!("   {}", url);
                }
            }
        }
        Err(e) => {
            eprintln!("\n❌ [{}] {}", e.stage(), e);
            for action in e.suggested_actions() {
                eprintln!("  - {}", action);
            }
            if e.registry_touched() {
                eprintln!(
                    "\n⚠️  The registry publish already completed; manual reconciliation required"
                );
            }
            eprintln!("\nPipeline history:\n{}", coordinator.history());
        }
    }

    Ok(exit_code(&result))
}

async fn check_command(project_path: PathBuf) -> Result<i32> {
    println!("\n🔍 Gate Check\n");

    let config = ReleaseConfig::load(&project_path).await?;
    let manifest = Manifest::load(&project_path.join(config.manifest_path())).await?;
    let registry = build_registry(&project_path, &config)?;

    let registry_version = registry.lookup_latest(&manifest.name).await?;
    let decision = VersionGate::new().decide(&manifest.version, registry_version.as_ref());

    println!("📦 {} {}", manifest.name, manifest.version);
    match &decision.registry {
        Some(version) => println!("   registry: {}", version),
        None => println!("   registry: (no prior release)"),
    }

    if decision.publish {
        println!("\n🔓 {}", decision.reason());
    } else {
        println!("\n⏭️  {}", decision.reason());
    }

    Ok(0)
}
