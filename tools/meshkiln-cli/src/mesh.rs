//! Mesh command - batch Blender processing
//!
//! Scans the input folder for per-asset subfolders, copies each asset's
//! source .obj into the working folder and runs Blender headless on it.
//! Per-asset failures warn and continue; a missing input folder or an
//! unresolvable Blender executable halts the run.

use anyhow::{Context, Result};
use clap::Args;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::blender;
use crate::manifest::PipelineManifest;
use meshkiln_shared::naming::MeshArtifacts;

/// Arguments for the mesh command
#[derive(Args)]
pub struct MeshArgs {
    /// Path to meshkiln.toml manifest file
    #[arg(short, long, default_value = "meshkiln.toml")]
    pub manifest: PathBuf,

    /// Overwrite existing outputs without prompting
    #[arg(long, conflicts_with = "skip_existing")]
    pub overwrite: bool,

    /// Skip assets with existing outputs without prompting
    #[arg(long)]
    pub skip_existing: bool,
}

/// Outcome counters for the mesh stage
#[derive(Debug, Default)]
pub struct MeshSummary {
    pub processed: usize,
    pub skipped: usize,
}

/// Once-per-run answer to the existing-output conflict prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwritePolicy {
    Undecided,
    OverwriteAll,
    SkipAll,
}

impl OverwritePolicy {
    /// Preseed the decision from CLI flags (both unset leaves it to the prompt)
    pub fn from_flags(overwrite: bool, skip_existing: bool) -> Self {
        if overwrite {
            Self::OverwriteAll
        } else if skip_existing {
            Self::SkipAll
        } else {
            Self::Undecided
        }
    }
}

/// Execute the mesh command
pub fn execute(args: MeshArgs) -> Result<MeshSummary> {
    let manifest = PipelineManifest::load(&args.manifest)?;
    run(
        &manifest,
        OverwritePolicy::from_flags(args.overwrite, args.skip_existing),
    )
}

/// Run the mesh stage with an already loaded manifest
pub fn run(manifest: &PipelineManifest, mut policy: OverwritePolicy) -> Result<MeshSummary> {
    let input_dir = &manifest.paths.input_folder;
    if !input_dir.is_dir() {
        anyhow::bail!(
            "Input folder not found: {}\nCheck paths.input_folder in meshkiln.toml.",
            input_dir.display()
        );
    }

    let output_dir = &manifest.paths.mesh_output_folder;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output folder: {}", output_dir.display()))?;

    let blender_exe = blender::resolve_executable(manifest.blender_executable())?;
    let script = blender::materialize_script()?;

    println!("=== Mesh stage ===");
    println!("  Input: {}", input_dir.display());
    println!("  Output: {}", output_dir.display());
    println!("  Blender: {}", blender_exe.display());

    let scan = scan_input(input_dir)?;
    let mut summary = MeshSummary::default();

    for name in &scan.missing_mesh {
        eprintln!("Warning: no .obj file in asset folder '{}', skipping", name);
        summary.skipped += 1;
    }

    for asset in &scan.assets {
        println!();
        println!("Processing asset: {}", asset.name);

        let artifacts = MeshArtifacts::new(output_dir, &asset.name);
        let conflict = artifacts.all().iter().any(|p| p.exists());
        let skip = conflict_action(&mut policy, conflict, || prompt_overwrite(&asset.name))?;
        if skip {
            println!("  Outputs exist, skipping '{}'", asset.name);
            summary.skipped += 1;
            continue;
        }
        if conflict {
            println!("  Outputs exist and will be overwritten");
        }

        if let Err(e) = std::fs::copy(&asset.source_obj, &artifacts.source_copy) {
            eprintln!(
                "Warning: could not copy '{}' to '{}': {}",
                asset.source_obj.display(),
                artifacts.source_copy.display(),
                e
            );
            summary.skipped += 1;
            continue;
        }

        let args = blender::invocation_args(&script, &artifacts, &manifest.blender.params);
        println!("  Launching Blender...");
        match Command::new(&blender_exe).args(&args).output() {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                if !stdout.trim().is_empty() {
                    println!("  Blender stdout:\n{}", stdout.trim());
                }
                if !stderr.trim().is_empty() {
                    println!("  Blender stderr:\n{}", stderr.trim());
                }

                if output.status.success() {
                    println!("  Blender processing successful for '{}'", asset.name);
                    summary.processed += 1;
                } else {
                    eprintln!(
                        "Warning: Blender failed for '{}' (exit: {})",
                        asset.name,
                        output
                            .status
                            .code()
                            .map(|c| c.to_string())
                            .unwrap_or_else(|| "signal".to_string())
                    );
                    summary.skipped += 1;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // The executable vanished mid-run; nothing further can succeed
                anyhow::bail!("Blender executable not found: {}", blender_exe.display());
            }
            Err(e) => {
                eprintln!("Warning: could not run Blender for '{}': {}", asset.name, e);
                summary.skipped += 1;
            }
        }
    }

    println!();
    println!("=== Mesh stage complete ===");
    println!("  Processed: {} assets", summary.processed);
    println!("  Skipped: {} assets", summary.skipped);

    Ok(summary)
}

/// One discovered asset: subfolder name plus its source mesh
#[derive(Debug, PartialEq, Eq)]
pub struct AssetSource {
    pub name: String,
    pub source_obj: PathBuf,
}

/// Input-folder scan result
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub assets: Vec<AssetSource>,
    /// Subfolders that held no .obj file
    pub missing_mesh: Vec<String>,
}

/// Scan the input folder: one asset per subfolder, first .obj inside wins.
///
/// Sorted by name so runs are deterministic regardless of readdir order.
pub fn scan_input(input_dir: &Path) -> Result<ScanOutcome> {
    let mut entries: Vec<_> = std::fs::read_dir(input_dir)
        .with_context(|| format!("Failed to read input folder: {}", input_dir.display()))?
        .filter_map(|e| e.ok())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut outcome = ScanOutcome::default();
    for entry in entries {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        match first_obj_in(&path)? {
            Some(source_obj) => outcome.assets.push(AssetSource { name, source_obj }),
            None => outcome.missing_mesh.push(name),
        }
    }

    Ok(outcome)
}

/// First file with a .obj extension (case-insensitive) in a folder
fn first_obj_in(dir: &Path) -> Result<Option<PathBuf>> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read asset folder: {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();

    Ok(entries.into_iter().find(|p| {
        p.is_file()
            && p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("obj"))
                .unwrap_or(false)
    }))
}

/// Resolve the conflict policy for one asset; prompts at most once per run.
///
/// Returns whether the asset should be skipped.
fn conflict_action(
    policy: &mut OverwritePolicy,
    conflict: bool,
    prompt: impl FnOnce() -> Result<OverwritePolicy>,
) -> Result<bool> {
    if !conflict {
        return Ok(false);
    }
    if *policy == OverwritePolicy::Undecided {
        *policy = prompt()?;
    }
    Ok(*policy == OverwritePolicy::SkipAll)
}

/// Ask once for the run-wide overwrite/skip decision
fn prompt_overwrite(name: &str) -> Result<OverwritePolicy> {
    let stdin = std::io::stdin();
    loop {
        print!(
            "  Output files for '{}' (and potentially others) already exist.\n  \
             (O)verwrite all existing / (S)kip all existing? [O/S]: ",
            name
        );
        std::io::stdout().flush()?;

        let mut line = String::new();
        let read = stdin.lock().read_line(&mut line)?;
        if read == 0 {
            anyhow::bail!(
                "No interactive input available; pass --overwrite or --skip-existing"
            );
        }

        match line.trim().to_ascii_uppercase().as_str() {
            "O" => {
                println!("  Overwriting all existing outputs this run.");
                return Ok(OverwritePolicy::OverwriteAll);
            }
            "S" => {
                println!("  Skipping all assets with existing outputs this run.");
                return Ok(OverwritePolicy::SkipAll);
            }
            _ => println!("  Invalid choice. Please enter O or S."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_input_one_asset_per_subfolder() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("Hull019");
        let b = dir.path().join("Turret02");
        std::fs::create_dir(&a).unwrap();
        std::fs::create_dir(&b).unwrap();
        std::fs::write(a.join("hull.obj"), "").unwrap();
        std::fs::write(a.join("notes.txt"), "").unwrap();
        std::fs::write(b.join("Turret.OBJ"), "").unwrap();
        // loose files at the top level are not assets
        std::fs::write(dir.path().join("stray.obj"), "").unwrap();

        let scan = scan_input(dir.path()).unwrap();
        assert_eq!(scan.assets.len(), 2);
        assert_eq!(scan.assets[0].name, "Hull019");
        assert_eq!(scan.assets[0].source_obj, a.join("hull.obj"));
        // extension match is case-insensitive
        assert_eq!(scan.assets[1].name, "Turret02");
        assert_eq!(scan.assets[1].source_obj, b.join("Turret.OBJ"));
        assert!(scan.missing_mesh.is_empty());
    }

    #[test]
    fn test_scan_input_counts_folders_without_mesh() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("NoMeshHere");
        std::fs::create_dir(&empty).unwrap();
        std::fs::write(empty.join("readme.md"), "").unwrap();

        let scan = scan_input(dir.path()).unwrap();
        assert!(scan.assets.is_empty());
        assert_eq!(scan.missing_mesh, vec!["NoMeshHere".to_string()]);
    }

    #[test]
    fn test_scan_input_missing_folder_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_input(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_policy_from_flags() {
        assert_eq!(
            OverwritePolicy::from_flags(false, false),
            OverwritePolicy::Undecided
        );
        assert_eq!(
            OverwritePolicy::from_flags(true, false),
            OverwritePolicy::OverwriteAll
        );
        assert_eq!(
            OverwritePolicy::from_flags(false, true),
            OverwritePolicy::SkipAll
        );
    }

    #[test]
    fn test_conflict_prompts_at_most_once() {
        let mut policy = OverwritePolicy::Undecided;
        let mut prompts = 0;

        // no conflict: no prompt, no skip
        let skip = conflict_action(&mut policy, false, || {
            prompts += 1;
            Ok(OverwritePolicy::SkipAll)
        })
        .unwrap();
        assert!(!skip);
        assert_eq!(prompts, 0);

        // first conflict prompts and records the answer
        let skip = conflict_action(&mut policy, true, || {
            prompts += 1;
            Ok(OverwritePolicy::SkipAll)
        })
        .unwrap();
        assert!(skip);
        assert_eq!(prompts, 1);

        // every later conflict reuses the recorded answer
        let skip = conflict_action(&mut policy, true, || {
            prompts += 1;
            Ok(OverwritePolicy::OverwriteAll)
        })
        .unwrap();
        assert!(skip);
        assert_eq!(prompts, 1);
    }

    #[test]
    fn test_conflict_overwrite_all_does_not_skip() {
        let mut policy = OverwritePolicy::OverwriteAll;
        let skip = conflict_action(&mut policy, true, || unreachable!()).unwrap();
        assert!(!skip);
    }
}
