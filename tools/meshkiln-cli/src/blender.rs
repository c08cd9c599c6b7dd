//! Blender invocation plumbing
//!
//! Resolves the headless Blender executable, materializes the bundled batch
//! script, and builds the fully enumerated argument list. The flag surface is
//! the wire protocol between driver and script: every processing parameter is
//! passed explicitly, none are defaulted on either side.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::manifest::BlenderParams;
use meshkiln_shared::naming::MeshArtifacts;

/// The Blender-side batch script, shipped inside the binary.
const DECIMATE_UNWRAP_PY: &str = include_str!("../scripts/decimate_unwrap.py");

/// Resolve the Blender executable.
///
/// Uses the manifest path for the current OS when it exists, otherwise falls
/// back to whatever `blender` is on PATH. Unresolvable is fatal for the run.
pub fn resolve_executable(configured: &Path) -> Result<PathBuf> {
    if configured.exists() {
        return Ok(configured.to_path_buf());
    }

    if let Ok(path) = which::which("blender") {
        eprintln!(
            "Warning: configured Blender '{}' not found, using '{}' from PATH",
            configured.display(),
            path.display()
        );
        return Ok(path);
    }

    anyhow::bail!(
        "Could not find Blender.\n\
        Options:\n\
        - Fix the blender executable path in meshkiln.toml\n\
        - Install blender onto PATH"
    )
}

/// Write the bundled batch script to a temp path and return it.
///
/// Rewritten on every run so a stale copy from an older binary never runs.
pub fn materialize_script() -> Result<PathBuf> {
    let path = std::env::temp_dir().join("meshkiln-decimate-unwrap.py");
    std::fs::write(&path, DECIMATE_UNWRAP_PY)
        .with_context(|| format!("Failed to write Blender script: {}", path.display()))?;
    Ok(path)
}

/// Build the complete Blender command line for one asset.
///
/// `--` separates Blender's own arguments from the script's.
pub fn invocation_args(
    script: &Path,
    artifacts: &MeshArtifacts,
    params: &BlenderParams,
) -> Vec<String> {
    let mut args = vec![
        "--background".to_string(),
        "--python".to_string(),
        script.display().to_string(),
        "--".to_string(),
    ];

    let mut flag = |name: &str, value: String| {
        args.push(name.to_string());
        args.push(value);
    };

    flag("--input_mesh", artifacts.source_copy.display().to_string());
    flag("--output_mesh", artifacts.low.display().to_string());
    flag("--decimate_ratio", params.decimate_ratio.to_string());
    flag("--scale_factor", params.scale_factor.to_string());
    flag("--sp_angle", params.uv_angle_degrees.to_string());
    flag("--sp_margin", params.uv_island_margin.to_string());
    flag("--sp_area_weight", params.uv_area_weight.to_string());
    flag("--sp_correct_aspect", params.uv_correct_aspect.to_string());
    flag("--sp_scale_to_bounds", params.uv_scale_to_bounds.to_string());
    flag("--sp_margin_method", params.uv_margin_method.as_arg().to_string());
    flag("--sp_rotate_method", params.uv_rotate_method.as_arg().to_string());
    flag("--uv_fill_holes", params.uv_fill_holes.to_string());
    flag("--apply_scale", params.apply_original_scale.to_string());

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshkiln_shared::params::{MarginMethod, RotateMethod};

    fn params() -> BlenderParams {
        BlenderParams {
            decimate_ratio: 0.1,
            scale_factor: 10.0,
            uv_angle_degrees: 66.0,
            uv_island_margin: 0.003,
            uv_area_weight: 0.0,
            uv_correct_aspect: true,
            uv_scale_to_bounds: false,
            uv_margin_method: MarginMethod::Scaled,
            uv_rotate_method: RotateMethod::AxisAligned,
            uv_fill_holes: true,
            apply_original_scale: true,
        }
    }

    #[test]
    fn test_invocation_args_enumerate_every_flag() {
        let artifacts = MeshArtifacts::new(Path::new("Meshes"), "Hull019");
        let args = invocation_args(Path::new("/tmp/script.py"), &artifacts, &params());

        assert_eq!(
            args,
            vec![
                "--background",
                "--python",
                "/tmp/script.py",
                "--",
                "--input_mesh",
                "Meshes/Hull019.obj",
                "--output_mesh",
                "Meshes/Hull019_low.obj",
                "--decimate_ratio",
                "0.1",
                "--scale_factor",
                "10",
                "--sp_angle",
                "66",
                "--sp_margin",
                "0.003",
                "--sp_area_weight",
                "0",
                "--sp_correct_aspect",
                "true",
                "--sp_scale_to_bounds",
                "false",
                "--sp_margin_method",
                "SCALED",
                "--sp_rotate_method",
                "AXIS_ALIGNED",
                "--uv_fill_holes",
                "true",
                "--apply_scale",
                "true",
            ]
        );
    }

    #[test]
    fn test_resolve_prefers_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("blender");
        std::fs::write(&exe, "").unwrap();
        assert_eq!(resolve_executable(&exe).unwrap(), exe);
    }

    #[test]
    fn test_materialized_script_matches_bundle() {
        let path = materialize_script().unwrap();
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, DECIMATE_UNWRAP_PY);
    }
}
