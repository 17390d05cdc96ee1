//! dscs-export - DSCS model export tool
//!
//! Reads a host scene dump (JSON) and writes the flattened intermediate model
//! (split vertices, flattened skeleton, synchronized animation curves).

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use dscs_export::{ExportConfig, SourceScene, export_model, output};

#[derive(Parser)]
#[command(name = "dscs-export")]
#[command(about = "DSCS model export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a scene dump to an intermediate model
    Export {
        /// Host scene dump (JSON)
        input: PathBuf,

        /// Output model file (default: <input>.model.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export settings (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run the export without writing anything
    Check {
        /// Host scene dump (JSON)
        input: PathBuf,

        /// Export settings (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List bones, meshes and actions in a scene dump
    List {
        /// Host scene dump (JSON)
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            config,
        } => {
            let output = output.unwrap_or_else(|| output::default_output_path(&input));
            run_export(&input, Some(output.as_path()), config.as_deref())?;
            tracing::info!("Wrote {:?}", output);
        }
        Commands::Check { input, config } => {
            run_export(&input, None, config.as_deref())?;
            tracing::info!("{:?} exports cleanly", input);
        }
        Commands::List { input } => {
            list_scene(&input)?;
        }
    }

    Ok(())
}

fn run_export(input: &Path, destination: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let config = ExportConfig::load_or_default(config)?;
    let scene = SourceScene::load(input)?;
    let model = export_model(&scene, &config)?;
    if let Some(path) = destination {
        output::write_model(&model, path)?;
    }
    Ok(())
}

fn list_scene(input: &Path) -> Result<()> {
    let scene = SourceScene::load(input)?;

    tracing::info!("Scene '{}' in {:?}:", scene.name, input);
    tracing::info!(
        "  Skeleton '{}': {} bones",
        scene.skeleton.name,
        scene.skeleton.bones.len()
    );
    for bone in &scene.skeleton.bones {
        tracing::info!(
            "    {} (parent: {})",
            bone.name,
            bone.parent.as_deref().unwrap_or("-")
        );
    }

    tracing::info!("  Meshes: {}", scene.meshes.len());
    for mesh in &scene.meshes {
        tracing::info!(
            "    {}: {} vertices, {} polygons, material {}",
            mesh.name,
            mesh.vertices.len(),
            mesh.polygons.len(),
            mesh.material.as_deref().unwrap_or("-")
        );
    }

    tracing::info!("  Actions: {}", scene.actions.len());
    for action in &scene.actions {
        tracing::info!(
            "    {}: frames {}..={}, {} channels",
            action.name,
            action.frame_range[0],
            action.frame_range[1],
            action.channels.len()
        );
    }

    Ok(())
}
