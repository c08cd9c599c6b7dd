//! Per-asset artifact naming scheme.
//!
//! Every asset is identified by a base name (its input subfolder). The mesh
//! stage produces `<name>.obj`, `<name>.blend`, `<name>_high.obj` and
//! `<name>_low.obj` in one shared output folder; the texture stage finds
//! assets again purely through these suffixes. There is no mapping table -
//! the convention itself is the schema.

use std::path::{Path, PathBuf};

/// Suffix of the decimated, unwrapped mesh the texture stage scans for.
pub const LOW_SUFFIX: &str = "_low.obj";

/// Suffix of the pre-decimation reference mesh used as bake source.
pub const HIGH_SUFFIX: &str = "_high.obj";

/// Prefix of the texture-set name derived from the asset base name.
pub const TEXTURE_SET_PREFIX: &str = "M_";

/// Extension of the Painter project file saved per asset.
pub const PROJECT_EXT: &str = "spp";

/// The four mesh-stage artifacts of one asset, all under the same folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshArtifacts {
    /// Copied source mesh, input to the Blender script (`<name>.obj`).
    pub source_copy: PathBuf,
    /// Native project file saved pre-decimation (`<name>.blend`).
    pub blend: PathBuf,
    /// Scaled reference export (`<name>_high.obj`).
    pub high: PathBuf,
    /// Decimated, unwrapped export (`<name>_low.obj`).
    pub low: PathBuf,
}

impl MeshArtifacts {
    /// Derive all four artifact paths for `name` under `output_dir`.
    pub fn new(output_dir: &Path, name: &str) -> Self {
        Self {
            source_copy: output_dir.join(format!("{name}.obj")),
            blend: output_dir.join(format!("{name}.blend")),
            high: output_dir.join(format!("{name}{HIGH_SUFFIX}")),
            low: output_dir.join(format!("{name}{LOW_SUFFIX}")),
        }
    }

    /// All artifact paths, for existence checks.
    pub fn all(&self) -> [&Path; 4] {
        [&self.source_copy, &self.blend, &self.high, &self.low]
    }
}

/// Extract the asset base name from a low-mesh file name.
///
/// Returns `None` for anything not ending in `_low.obj`.
pub fn asset_base_name(file_name: &str) -> Option<&str> {
    file_name.strip_suffix(LOW_SUFFIX).filter(|s| !s.is_empty())
}

/// Sibling high-mesh path for a low-mesh path.
pub fn high_mesh_for(low_path: &Path) -> Option<PathBuf> {
    let file_name = low_path.file_name()?.to_str()?;
    let base = asset_base_name(file_name)?;
    Some(low_path.with_file_name(format!("{base}{HIGH_SUFFIX}")))
}

/// Texture-set name for an asset. Used identically as the rename target,
/// the bake lookup key and the export rootPath.
pub fn texture_set_name(base: &str) -> String {
    format!("{TEXTURE_SET_PREFIX}{base}")
}

/// Per-asset texture-stage output folder.
pub fn texture_output_dir(base_dir: &Path, name: &str) -> PathBuf {
    base_dir.join(name)
}

/// Painter project file path inside the asset's output folder.
pub fn project_file(asset_output_dir: &Path, name: &str) -> PathBuf {
    asset_output_dir.join(format!("{name}.{PROJECT_EXT}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_base_name() {
        assert_eq!(asset_base_name("Hull019_low.obj"), Some("Hull019"));
        assert_eq!(asset_base_name("Foo_low.obj"), Some("Foo"));
        assert_eq!(asset_base_name("Foo_high.obj"), None);
        assert_eq!(asset_base_name("Foo.obj"), None);
        assert_eq!(asset_base_name("_low.obj"), None);
    }

    #[test]
    fn test_texture_set_name() {
        assert_eq!(texture_set_name("Hull019"), "M_Hull019");
    }

    #[test]
    fn test_mesh_artifacts_paths() {
        let arts = MeshArtifacts::new(Path::new("Meshes"), "Hull019");
        assert_eq!(arts.source_copy, Path::new("Meshes/Hull019.obj"));
        assert_eq!(arts.blend, Path::new("Meshes/Hull019.blend"));
        assert_eq!(arts.high, Path::new("Meshes/Hull019_high.obj"));
        assert_eq!(arts.low, Path::new("Meshes/Hull019_low.obj"));
    }

    #[test]
    fn test_high_mesh_for() {
        let high = high_mesh_for(Path::new("Meshes/Hull019_low.obj")).unwrap();
        assert_eq!(high, Path::new("Meshes/Hull019_high.obj"));
        assert!(high_mesh_for(Path::new("Meshes/Hull019.obj")).is_none());
    }

    #[test]
    fn test_project_file() {
        let dir = texture_output_dir(Path::new("Textured"), "Hull019");
        assert_eq!(dir, Path::new("Textured/Hull019"));
        assert_eq!(
            project_file(&dir, "Hull019"),
            Path::new("Textured/Hull019/Hull019.spp")
        );
    }
}
