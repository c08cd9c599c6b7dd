//! Texture command - batch Painter texturing
//!
//! Scans the mesh-stage output folder for `*_low.obj` meshes, requires the
//! `_high.obj` sibling, and runs six remote operations per asset: create
//! project, rename texture set, apply smart material, bake, save, export.
//! Only the initial connectivity check is fatal; every later step warns and
//! proceeds, so one bad asset (or one unconfirmed step) never stops the
//! batch.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::manifest::PipelineManifest;
use crate::painter::ops;
use crate::painter::remote::PainterRemote;
use meshkiln_shared::naming;

/// Arguments for the texture command
#[derive(Args)]
pub struct TextureArgs {
    /// Path to meshkiln.toml manifest file
    #[arg(short, long, default_value = "meshkiln.toml")]
    pub manifest: PathBuf,
}

/// Outcome counters for the texture stage
#[derive(Debug, Default)]
pub struct TextureSummary {
    /// Assets whose export step was confirmed
    pub processed: usize,
    /// Assets skipped before any remote call (missing high mesh)
    pub skipped: usize,
    /// Assets that ran the step sequence but whose export was not confirmed
    pub errored: usize,
}

/// Execute the texture command
pub fn execute(args: TextureArgs) -> Result<TextureSummary> {
    let manifest = PipelineManifest::load(&args.manifest)?;
    run(&manifest)
}

/// Run the texture stage with an already loaded manifest
pub fn run(manifest: &PipelineManifest) -> Result<TextureSummary> {
    let mesh_dir = &manifest.paths.mesh_output_folder;
    if !mesh_dir.is_dir() {
        anyhow::bail!(
            "Mesh output folder not found: {}\nRun 'meshkiln mesh' first.",
            mesh_dir.display()
        );
    }

    let assets = find_low_meshes(mesh_dir)?;

    println!("=== Texture stage ===");
    println!("  Scanning: {}", mesh_dir.display());
    println!("  Found {} low-poly meshes", assets.len());

    let mut summary = TextureSummary::default();
    if assets.is_empty() {
        println!("  Nothing to texture.");
        return Ok(summary);
    }

    let cfg = &manifest.painter;

    // One up-front liveness check; a Painter we cannot reach fails the batch
    // before any asset is touched.
    PainterRemote::connect(&cfg.host, cfg.port)
        .and_then(|remote| remote.check_connection())
        .with_context(|| {
            format!(
                "Could not connect to Painter at {}:{}.\n\
                 Ensure Painter is running with --enable-remote-scripting.",
                cfg.host, cfg.port
            )
        })?;
    println!("  Connected to Painter at {}:{}", cfg.host, cfg.port);

    let waits = &cfg.waits;
    for asset in &assets {
        println!();
        println!("=== Texturing asset: {} ===", asset.name);
        println!("  Low: {}", asset.low.display());
        println!("  High: {}", asset.high.display());

        if !asset.high.exists() {
            eprintln!(
                "Warning: no high-poly sibling '{}', skipping '{}'",
                asset.high.display(),
                asset.name
            );
            summary.skipped += 1;
            continue;
        }

        let texture_set = naming::texture_set_name(&asset.name);
        let out_dir =
            naming::texture_output_dir(&manifest.paths.texture_output_folder, &asset.name);
        let spp_path = naming::project_file(&out_dir, &asset.name);

        println!("--- Step 1/6: create project ---");
        if !ops::create_project(cfg, &asset.low) {
            eprintln!("Warning: project creation unconfirmed for '{}'", asset.name);
        }
        wait(waits.after_create, "project creation");

        println!("--- Step 2/6: rename texture set to '{}' ---", texture_set);
        if !ops::rename_texture_set(cfg, &texture_set) {
            eprintln!("Warning: texture set rename unconfirmed for '{}'", asset.name);
        }
        wait(waits.after_rename, "rename");

        println!(
            "--- Step 3/6: apply smart material '{}' from shelf '{}' ---",
            cfg.smart_material, cfg.smart_material_shelf
        );
        if !ops::apply_smart_material(cfg) {
            eprintln!("Warning: smart material unconfirmed for '{}'", asset.name);
        }
        wait(waits.after_material, "smart material");

        println!("--- Step 4/6: bake mesh maps ---");
        if ops::bake(cfg, &texture_set, &asset.high) {
            // Initiation only; the bake itself finishes on its own clock.
            wait(waits.bake_observation, "bake observation");
        } else {
            eprintln!("Warning: bake initiation unconfirmed for '{}'", asset.name);
        }
        wait(waits.after_bake, "bake");

        println!("--- Step 5/6: save project ---");
        if !ops::save_project(cfg, &spp_path) {
            eprintln!("Warning: project save unconfirmed for '{}'", asset.name);
        }
        wait(waits.after_save, "save");

        println!("--- Step 6/6: export textures ---");
        if ops::export_textures(cfg, &texture_set, &out_dir) {
            summary.processed += 1;
        } else {
            eprintln!("Warning: texture export unconfirmed for '{}'", asset.name);
            summary.errored += 1;
        }

        println!("--- Finished asset: {} ---", asset.name);
    }

    println!();
    println!("=== Texture stage complete ===");
    println!("  Exported: {} assets", summary.processed);
    println!("  Skipped (missing high mesh): {} assets", summary.skipped);
    if summary.errored > 0 {
        println!("  Unconfirmed exports: {} assets", summary.errored);
    }

    Ok(summary)
}

/// One textured asset: base name plus its low/high mesh pair
#[derive(Debug, PartialEq, Eq)]
pub struct TextureAsset {
    pub name: String,
    pub low: PathBuf,
    pub high: PathBuf,
}

/// Find `*_low.obj` files (non-recursive) and derive their high siblings.
///
/// Sorted by name for deterministic batch order. Existence of the high mesh
/// is checked later, per asset, so the skip is visible in the per-asset log.
pub fn find_low_meshes(mesh_dir: &Path) -> Result<Vec<TextureAsset>> {
    let mut assets: Vec<TextureAsset> = std::fs::read_dir(mesh_dir)
        .with_context(|| format!("Failed to read mesh folder: {}", mesh_dir.display()))?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter_map(|e| {
            let file_name = e.file_name();
            let name = naming::asset_base_name(file_name.to_str()?)?.to_string();
            let low = e.path();
            let high = naming::high_mesh_for(&low)?;
            Some(TextureAsset { name, low, high })
        })
        .collect();
    assets.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(assets)
}

fn wait(seconds: u64, what: &str) {
    if seconds == 0 {
        return;
    }
    println!("  Waiting {}s after {}...", seconds, what);
    std::thread::sleep(Duration::from_secs(seconds));
}
