//! The six per-asset Painter operations.
//!
//! Each builds its script, reconnects (connections are cheap), executes, and
//! scans the response for the step's marker. Every function returns a plain
//! success flag: the texture driver warns on `false` and proceeds - there is
//! no rollback and no retry. Response text is passed through to the console
//! so painter-side exception detail is never swallowed.

use std::path::Path;

use crate::manifest::PainterSection;
use crate::painter::remote::PainterRemote;
use crate::painter::script;
use meshkiln_shared::markers;

/// Step success: marker present in the captured response text.
pub fn response_confirms(response: &str, marker: &str) -> bool {
    response.contains(marker)
}

/// Step 1: create the project from the low mesh.
pub fn create_project(cfg: &PainterSection, low_mesh: &Path) -> bool {
    if !low_mesh.exists() {
        eprintln!("Warning: low mesh does not exist: {}", low_mesh.display());
        return false;
    }
    confirm(
        cfg,
        &script::create_project(cfg, low_mesh),
        markers::PROJECT_CREATED,
        "project creation",
    )
}

/// Step 2: rename the first texture set to the derived name.
pub fn rename_texture_set(cfg: &PainterSection, desired_name: &str) -> bool {
    confirm(
        cfg,
        &script::rename_texture_set(desired_name),
        markers::TEXTURE_SET_RENAMED,
        "texture set rename",
    )
}

/// Step 3: apply the configured smart material.
pub fn apply_smart_material(cfg: &PainterSection) -> bool {
    confirm(
        cfg,
        &script::apply_smart_material(&cfg.smart_material, &cfg.smart_material_shelf),
        markers::SMART_MATERIAL_APPLIED,
        "smart material apply",
    )
}

/// Step 4: start the bake against the high mesh. Confirms initiation only.
pub fn bake(cfg: &PainterSection, texture_set_name: &str, high_mesh: &Path) -> bool {
    if !high_mesh.exists() {
        eprintln!("Warning: high mesh does not exist: {}", high_mesh.display());
        return false;
    }
    confirm(
        cfg,
        &script::bake(texture_set_name, high_mesh, &cfg.bakers),
        markers::BAKE_INITIATED,
        "bake initiation",
    )
}

/// Step 5: save the project file, creating its folder first.
pub fn save_project(cfg: &PainterSection, spp_path: &Path) -> bool {
    if let Some(dir) = spp_path.parent() {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!(
                "Warning: could not create project folder '{}': {}",
                dir.display(),
                e
            );
            return false;
        }
    }
    confirm(
        cfg,
        &script::save_project(spp_path),
        markers::PROJECT_SAVED,
        "project save",
    )
}

/// Step 6: export textures into the asset's output folder.
///
/// The warning marker is a prefix-extension of the success marker, so a
/// single scan accepts both "success" and "success with warnings".
pub fn export_textures(cfg: &PainterSection, texture_set_name: &str, output_dir: &Path) -> bool {
    if let Err(e) = std::fs::create_dir_all(output_dir) {
        eprintln!(
            "Warning: could not create texture output folder '{}': {}",
            output_dir.display(),
            e
        );
        return false;
    }
    confirm(
        cfg,
        &script::export_textures(texture_set_name, output_dir),
        markers::TEXTURES_EXPORTED,
        "texture export",
    )
}

/// Reconnect, execute, pass the response through and scan for the marker.
fn confirm(cfg: &PainterSection, source: &str, marker: &str, what: &str) -> bool {
    let remote = match PainterRemote::connect(&cfg.host, cfg.port) {
        Ok(remote) => remote,
        Err(e) => {
            eprintln!("Warning: could not connect to Painter for {}: {}", what, e);
            return false;
        }
    };

    match remote.exec_script(source) {
        Ok(response) => {
            if !response.trim().is_empty() {
                println!("  Painter response ({}):\n{}", what, response.trim());
            }
            let confirmed = response_confirms(&response, marker);
            if !confirmed {
                eprintln!("Warning: {} not confirmed by Painter", what);
            }
            confirmed
        }
        Err(e) => {
            eprintln!("Warning: {} script execution failed: {}", what, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_absent_means_unconfirmed() {
        let response = "ERROR: no project is open\n";
        assert!(!response_confirms(response, markers::PROJECT_CREATED));
    }

    #[test]
    fn test_marker_present_confirms() {
        let response = format!("noise before\n{}\nnoise after", markers::BAKE_INITIATED);
        assert!(response_confirms(&response, markers::BAKE_INITIATED));
    }

    #[test]
    fn test_export_warning_marker_also_confirms() {
        // scanning for the plain marker accepts the with-warnings variant too
        let warned = format!("WARNING: dilation\n{}", markers::TEXTURES_EXPORTED_WITH_WARNINGS);
        assert!(response_confirms(&warned, markers::TEXTURES_EXPORTED));

        let clean = format!("{}\n", markers::TEXTURES_EXPORTED);
        assert!(response_confirms(&clean, markers::TEXTURES_EXPORTED));
    }

    #[test]
    fn test_partial_marker_does_not_confirm() {
        assert!(!response_confirms("MESHKILN_", markers::PROJECT_SAVED));
    }
}
