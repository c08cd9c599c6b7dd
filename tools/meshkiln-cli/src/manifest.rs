//! Meshkiln.toml manifest parsing
//!
//! One manifest drives both stages. Every Blender processing parameter is
//! required - the script surface has no defaults, so the manifest must not
//! invent any either. Painter project settings and the inter-step waits have
//! defaults matching what the pipeline always used.

use anyhow::{Context, Result};
use meshkiln_shared::params::{MarginMethod, RotateMethod};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Meshkiln.toml manifest structure
#[derive(Debug, Deserialize)]
pub struct PipelineManifest {
    pub paths: PathsSection,
    pub blender: BlenderSection,
    pub painter: PainterSection,
}

/// Pipeline folder layout
#[derive(Debug, Deserialize)]
pub struct PathsSection {
    /// Folder of per-asset subfolders, each holding one source .obj
    pub input_folder: PathBuf,
    /// Working folder the mesh stage fills with .obj/.blend/_high/_low
    pub mesh_output_folder: PathBuf,
    /// Base folder for per-asset texture output (.spp + exported maps)
    pub texture_output_folder: PathBuf,
}

/// Blender host configuration
#[derive(Debug, Deserialize)]
pub struct BlenderSection {
    pub executable_windows: PathBuf,
    pub executable_macos: PathBuf,
    pub executable_linux: PathBuf,
    pub params: BlenderParams,
}

/// Parameters forwarded verbatim to the Blender batch script.
///
/// All required: the script rejects a missing flag at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct BlenderParams {
    /// Edge-collapse decimation target ratio, (0, 1]
    pub decimate_ratio: f64,
    /// Uniform scale baked into the mesh before export
    pub scale_factor: f64,
    /// Smart-project angle threshold in degrees (script converts to radians)
    pub uv_angle_degrees: f64,
    pub uv_island_margin: f64,
    pub uv_area_weight: f64,
    pub uv_correct_aspect: bool,
    pub uv_scale_to_bounds: bool,
    pub uv_margin_method: MarginMethod,
    pub uv_rotate_method: RotateMethod,
    /// Attempt to fill topological holes before unwrapping (non-fatal)
    pub uv_fill_holes: bool,
    /// Bake down any pre-existing object scale before the uniform scale
    pub apply_original_scale: bool,
}

/// Painter host and texturing configuration
#[derive(Debug, Deserialize)]
pub struct PainterSection {
    /// Remote-scripting endpoint host
    #[serde(default = "default_host")]
    pub host: String,
    /// Remote-scripting endpoint port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Smart material resource name, searched on the shelf below
    pub smart_material: String,
    /// Shelf the smart material lives on
    pub smart_material_shelf: String,
    /// Bake passes to enable, by name (e.g. "Normal", "AO", "Curvature")
    pub bakers: Vec<String>,

    #[serde(default = "default_texture_resolution")]
    pub texture_resolution: u32,
    #[serde(default)]
    pub normal_map_format: NormalMapFormat,
    /// Compute tangent space per fragment (vs per vertex)
    #[serde(default = "default_true")]
    pub tangent_per_fragment: bool,
    /// UDIM workflow; the pipeline is single-tile by default
    #[serde(default)]
    pub uv_tile_workflow: bool,
    #[serde(default)]
    pub import_cameras: bool,

    #[serde(default)]
    pub waits: WaitsSection,
}

/// Normal map convention for created projects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum NormalMapFormat {
    #[default]
    DirectX,
    OpenGL,
}

impl NormalMapFormat {
    /// Variant name of Painter's NormalMapFormat enum.
    pub fn painter_variant(self) -> &'static str {
        match self {
            Self::DirectX => "DirectX",
            Self::OpenGL => "OpenGL",
        }
    }
}

/// Fixed inter-step waits, in seconds.
///
/// The hosts finish several operations asynchronously (baking above all)
/// without a completion signal this pipeline can observe, so the driver
/// blocks for a fixed duration instead. Known-fragile; tune per machine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaitsSection {
    pub after_create: u64,
    pub after_rename: u64,
    pub after_material: u64,
    /// Observation wait after a *confirmed* bake initiation
    pub bake_observation: u64,
    pub after_bake: u64,
    pub after_save: u64,
}

impl Default for WaitsSection {
    fn default() -> Self {
        Self {
            after_create: 30,
            after_rename: 1,
            after_material: 5,
            bake_observation: 1,
            after_bake: 60,
            after_save: 10,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    60041
}

fn default_texture_resolution() -> u32 {
    4096
}

fn default_true() -> bool {
    true
}

impl PipelineManifest {
    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        let manifest = Self::parse(&content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse meshkiln.toml")
    }

    /// The Blender executable configured for the current OS
    pub fn blender_executable(&self) -> &Path {
        if cfg!(target_os = "windows") {
            &self.blender.executable_windows
        } else if cfg!(target_os = "macos") {
            &self.blender.executable_macos
        } else {
            &self.blender.executable_linux
        }
    }

    /// Validate manifest fields
    pub fn validate(&self) -> Result<()> {
        let p = &self.blender.params;

        if !(p.decimate_ratio > 0.0 && p.decimate_ratio <= 1.0) {
            anyhow::bail!(
                "Invalid decimate_ratio {} in meshkiln.toml (must be in (0, 1])",
                p.decimate_ratio
            );
        }

        if p.scale_factor <= 0.0 {
            anyhow::bail!(
                "Invalid scale_factor {} in meshkiln.toml (must be > 0)",
                p.scale_factor
            );
        }

        if !(p.uv_angle_degrees > 0.0 && p.uv_angle_degrees <= 90.0) {
            anyhow::bail!(
                "Invalid uv_angle_degrees {} in meshkiln.toml (must be in (0, 90])",
                p.uv_angle_degrees
            );
        }

        if self.painter.port == 0 {
            anyhow::bail!("Invalid painter port 0 in meshkiln.toml");
        }

        if self.painter.bakers.is_empty() {
            anyhow::bail!("painter.bakers is empty in meshkiln.toml (nothing would be baked)");
        }

        if !self.painter.texture_resolution.is_power_of_two()
            || !(128..=8192).contains(&self.painter.texture_resolution)
        {
            anyhow::bail!(
                "Invalid texture_resolution {} in meshkiln.toml (power of two, 128-8192)",
                self.painter.texture_resolution
            );
        }

        for name in &self.painter.bakers {
            if !crate::painter::script::KNOWN_BAKERS.contains(&name.as_str()) {
                eprintln!(
                    "Warning: unknown baker '{}' in meshkiln.toml; Painter will skip it",
                    name
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> String {
        r#"
[paths]
input_folder = "RawAssets"
mesh_output_folder = "Meshes"
texture_output_folder = "Textured"

[blender]
executable_windows = "C:/Program Files/Blender Foundation/Blender 4.1/blender.exe"
executable_macos = "/Applications/Blender.app/Contents/MacOS/Blender"
executable_linux = "/usr/bin/blender"

[blender.params]
decimate_ratio = 0.1
scale_factor = 10.0
uv_angle_degrees = 66.0
uv_island_margin = 0.003
uv_area_weight = 0.0
uv_correct_aspect = true
uv_scale_to_bounds = false
uv_margin_method = "SCALED"
uv_rotate_method = "AXIS_ALIGNED"
uv_fill_holes = true
apply_original_scale = true

[painter]
smart_material = "HullTextureColor"
smart_material_shelf = "Yourassets"
bakers = ["Normal", "AO", "Curvature", "Position", "Thickness"]
"#
        .to_string()
    }

    #[test]
    fn test_manifest_minimal() {
        let manifest = PipelineManifest::parse(&minimal()).unwrap();
        assert!(manifest.validate().is_ok());

        assert_eq!(manifest.paths.input_folder, PathBuf::from("RawAssets"));
        assert_eq!(manifest.blender.params.decimate_ratio, 0.1);
        assert_eq!(
            manifest.blender.params.uv_margin_method,
            MarginMethod::Scaled
        );
        assert_eq!(manifest.painter.smart_material, "HullTextureColor");
        assert_eq!(manifest.painter.bakers.len(), 5);
    }

    #[test]
    fn test_manifest_defaults() {
        let manifest = PipelineManifest::parse(&minimal()).unwrap();

        assert_eq!(manifest.painter.host, "127.0.0.1");
        assert_eq!(manifest.painter.port, 60041);
        assert_eq!(manifest.painter.texture_resolution, 4096);
        assert_eq!(manifest.painter.normal_map_format, NormalMapFormat::DirectX);
        assert!(manifest.painter.tangent_per_fragment);
        assert!(!manifest.painter.uv_tile_workflow);
        assert!(!manifest.painter.import_cameras);

        let waits = &manifest.painter.waits;
        assert_eq!(waits.after_create, 30);
        assert_eq!(waits.after_rename, 1);
        assert_eq!(waits.after_material, 5);
        assert_eq!(waits.bake_observation, 1);
        assert_eq!(waits.after_bake, 60);
        assert_eq!(waits.after_save, 10);
    }

    #[test]
    fn test_manifest_wait_override() {
        let mut content = minimal();
        content.push_str(
            r#"
[painter.waits]
after_bake = 120
"#,
        );
        let manifest = PipelineManifest::parse(&content).unwrap();
        assert_eq!(manifest.painter.waits.after_bake, 120);
        // untouched keys keep their defaults
        assert_eq!(manifest.painter.waits.after_create, 30);
    }

    #[test]
    fn test_missing_required_key_is_an_error() {
        // drop a required Blender parameter
        let content = minimal().replace("scale_factor = 10.0\n", "");
        assert!(PipelineManifest::parse(&content).is_err());
    }

    #[test]
    fn test_missing_section_is_an_error() {
        let content = minimal().replace("[painter]", "[painter_disabled]");
        assert!(PipelineManifest::parse(&content).is_err());
    }

    #[test]
    fn test_decimate_ratio_invalid() {
        let content = minimal().replace("decimate_ratio = 0.1", "decimate_ratio = 1.5");
        let manifest = PipelineManifest::parse(&content).unwrap();
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_scale_factor_invalid() {
        let content = minimal().replace("scale_factor = 10.0", "scale_factor = 0.0");
        let manifest = PipelineManifest::parse(&content).unwrap();
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_empty_bakers_invalid() {
        let content = minimal().replace(
            r#"bakers = ["Normal", "AO", "Curvature", "Position", "Thickness"]"#,
            "bakers = []",
        );
        let manifest = PipelineManifest::parse(&content).unwrap();
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_unknown_margin_method_rejected_at_parse() {
        let content = minimal().replace("\"SCALED\"", "\"DIAGONAL\"");
        assert!(PipelineManifest::parse(&content).is_err());
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = PipelineManifest::load(&dir.path().join("meshkiln.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read manifest"));
    }
}
