//! Init command - write a starter meshkiln.toml
//!
//! Refuses to overwrite an existing manifest.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the init command
#[derive(Args)]
pub struct InitArgs {
    /// Where to write the manifest
    #[arg(short, long, default_value = "meshkiln.toml")]
    pub output: PathBuf,
}

const MANIFEST_TEMPLATE: &str = r#"# Meshkiln pipeline manifest

[paths]
# Folder of per-asset subfolders, each holding one source .obj
input_folder = "RawAssets"
# Working folder: <name>.obj, <name>.blend, <name>_high.obj, <name>_low.obj
mesh_output_folder = "Meshes"
# Per-asset texture output: <name>/<name>.spp plus exported maps
texture_output_folder = "Textured"

[blender]
executable_windows = "C:/Program Files/Blender Foundation/Blender 4.1/blender.exe"
executable_macos = "/Applications/Blender.app/Contents/MacOS/Blender"
executable_linux = "/usr/bin/blender"

# Every parameter below is required; the Blender script has no defaults.
[blender.params]
decimate_ratio = 0.1
scale_factor = 10.0
uv_angle_degrees = 66.0
uv_island_margin = 0.003
uv_area_weight = 0.0
uv_correct_aspect = true
uv_scale_to_bounds = false
# SCALED | ABSOLUTE | FRACTION
uv_margin_method = "SCALED"
# AXIS_ALIGNED | AXIS_ALIGNED_X | AXIS_ALIGNED_Y
uv_rotate_method = "AXIS_ALIGNED"
uv_fill_holes = true
apply_original_scale = true

[painter]
# Painter must be running with --enable-remote-scripting
#host = "127.0.0.1"
#port = 60041
smart_material = "HullTextureColor"
smart_material_shelf = "Yourassets"
bakers = ["Normal", "AO", "Curvature", "Position", "Thickness"]
#texture_resolution = 4096
# DirectX | OpenGL
#normal_map_format = "DirectX"

# Fixed inter-step waits in seconds; raise bake waits for heavy meshes.
#[painter.waits]
#after_create = 30
#after_rename = 1
#after_material = 5
#bake_observation = 1
#after_bake = 60
#after_save = 10
"#;

/// Execute the init command
pub fn execute(args: InitArgs) -> Result<()> {
    if args.output.exists() {
        anyhow::bail!("{} already exists, not overwriting", args.output.display());
    }

    std::fs::write(&args.output, MANIFEST_TEMPLATE)?;
    println!("Created {}", args.output.display());
    println!("Edit the paths and Painter shelf settings, then run 'meshkiln pipeline'.");
    Ok(())
}
