//! Pipeline command - mesh stage then texture stage
//!
//! One manifest load, both stages back to back. Stage-level fatal errors
//! propagate; everything else is already handled (warn and continue) inside
//! the stages themselves.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::manifest::PipelineManifest;
use crate::mesh::{self, OverwritePolicy};
use crate::texture;

/// Arguments for the pipeline command
#[derive(Args)]
pub struct PipelineArgs {
    /// Path to meshkiln.toml manifest file
    #[arg(short, long, default_value = "meshkiln.toml")]
    pub manifest: PathBuf,

    /// Overwrite existing mesh-stage outputs without prompting
    #[arg(long, conflicts_with = "skip_existing")]
    pub overwrite: bool,

    /// Skip assets with existing mesh-stage outputs without prompting
    #[arg(long)]
    pub skip_existing: bool,
}

/// Execute the pipeline command
pub fn execute(args: PipelineArgs) -> Result<()> {
    let manifest = PipelineManifest::load(&args.manifest)?;

    let mesh_summary = mesh::run(
        &manifest,
        OverwritePolicy::from_flags(args.overwrite, args.skip_existing),
    )?;
    println!();

    let texture_summary = texture::run(&manifest)?;

    println!();
    println!("=== Pipeline complete ===");
    println!(
        "  Mesh stage: {} processed, {} skipped",
        mesh_summary.processed, mesh_summary.skipped
    );
    println!(
        "  Texture stage: {} exported, {} skipped, {} unconfirmed",
        texture_summary.processed, texture_summary.skipped, texture_summary.errored
    );

    Ok(())
}
