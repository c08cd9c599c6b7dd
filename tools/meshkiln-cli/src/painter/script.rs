//! Painter-side Python source builders.
//!
//! Pure string construction: parameters arrive as Rust values and leave as
//! escaped Python literals. Each script prints its success marker only after
//! verifying the operation painter-side; exceptions are caught and printed so
//! the response text carries the failure detail back to the driver.

use std::path::Path;

use crate::manifest::PainterSection;
use meshkiln_shared::markers;

/// Bake pass names the generated script can map to Painter mesh-map usages.
/// Unknown names are forwarded anyway and skipped painter-side with a warning.
pub const KNOWN_BAKERS: &[&str] = &[
    "Normal",
    "WorldSpaceNormal",
    "ID",
    "AO",
    "Curvature",
    "Position",
    "Thickness",
];

/// Predefined Painter export preset (glTF PBR Metal Roughness)
const GLTF_PRESET_URL: &str = "export-preset-generator://gltf";

/// Quote a string as a Python literal, escaping backslashes and quotes.
pub fn py_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn py_bool(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

/// Windows paths handed to QUrl/save_as want forward slashes.
pub fn forward_slashes(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

/// Step 1: create a project from the low mesh, closing any open project first.
pub fn create_project(cfg: &PainterSection, low_mesh: &Path) -> String {
    let tangent = if cfg.tangent_per_fragment {
        "PerFragment"
    } else {
        "PerVertex"
    };
    let workflow = if cfg.uv_tile_workflow { "UVTile" } else { "Default" };

    format!(
        r#"import time
import substance_painter.project

mesh_path = {mesh}
settings = substance_painter.project.Settings()
settings.default_texture_resolution = {resolution}
settings.normal_map_format = substance_painter.project.NormalMapFormat.{normal}
settings.tangent_space_mode = substance_painter.project.TangentSpace.{tangent}
settings.project_workflow = substance_painter.project.ProjectWorkflow.{workflow}
settings.import_cameras = {cameras}

try:
    if substance_painter.project.is_open():
        substance_painter.project.close()
        time.sleep(0.5)
    substance_painter.project.create(mesh_file_path=mesh_path, settings=settings)
    if substance_painter.project.is_open():
        print("{marker}")
    else:
        print("ERROR: create() returned but no project is open")
except Exception as e:
    print("!!! EXCEPTION during project creation: " + str(e))
"#,
        mesh = py_str(&forward_slashes(low_mesh)),
        resolution = cfg.texture_resolution,
        normal = cfg.normal_map_format.painter_variant(),
        tangent = tangent,
        workflow = workflow,
        cameras = py_bool(cfg.import_cameras),
        marker = markers::PROJECT_CREATED,
    )
}

/// Step 2: rename the first texture set; success requires reading the new
/// name back.
pub fn rename_texture_set(desired_name: &str) -> String {
    format!(
        r#"import time
import substance_painter.project
import substance_painter.textureset

desired = {desired}
if not substance_painter.project.is_open():
    print("ERROR: no project is open")
else:
    try:
        sets = substance_painter.textureset.all_texture_sets()
        if not sets:
            print("ERROR: no texture sets in project")
        else:
            ts = sets[0]
            ts.name = desired
            time.sleep(0.1)
            if ts.name == desired:
                print("{marker}")
            else:
                print("ERROR: rename not applied, name is still " + ts.name)
    except Exception as e:
        print("!!! EXCEPTION during rename: " + str(e))
"#,
        desired = py_str(desired_name),
        marker = markers::TEXTURE_SET_RENAMED,
    )
}

/// Step 3: find the smart material on its shelf (exact, then wildcard) and
/// insert it at the top of the first texture set's stack.
pub fn apply_smart_material(name: &str, shelf: &str) -> String {
    format!(
        r#"import substance_painter.project
import substance_painter.textureset
import substance_painter.layerstack
import substance_painter.resource

sm_name = {name}
sm_shelf = {shelf}
if not substance_painter.project.is_open():
    print("ERROR: no project is open")
else:
    try:
        sets = substance_painter.textureset.all_texture_sets()
        if not sets:
            print("ERROR: no texture sets in project")
        else:
            query = "s:" + sm_shelf + " u:smartmaterial n:" + sm_name
            found = substance_painter.resource.search(query)
            if not found:
                query = "s:" + sm_shelf + " u:smartmaterial n:*" + sm_name + "*"
                found = substance_painter.resource.search(query)
            if not found:
                print("ERROR: smart material " + sm_name + " not found on shelf " + sm_shelf)
            else:
                stack = sets[0].get_stack()
                pos = substance_painter.layerstack.InsertPosition.from_textureset_stack(stack)
                node = substance_painter.layerstack.insert_smart_material(pos, found[0].identifier())
                if node:
                    print("{marker}")
                else:
                    print("ERROR: insert_smart_material returned nothing")
    except Exception as e:
        print("!!! EXCEPTION during smart material apply: " + str(e))
"#,
        name = py_str(name),
        shelf = py_str(shelf),
        marker = markers::SMART_MATERIAL_APPLIED,
    )
}

/// Step 4: point baking at the high mesh, enable the configured passes and
/// start an asynchronous bake. The marker confirms initiation only.
pub fn bake(texture_set_name: &str, high_mesh: &Path, bakers: &[String]) -> String {
    let baker_list = bakers
        .iter()
        .map(|b| py_str(b))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"import substance_painter.project
import substance_painter.textureset
import substance_painter.baking
from PySide6 import QtCore

ts_name = {ts_name}
high_path = {high_path}
requested = [{baker_list}]
usages = {{
    "Normal": substance_painter.baking.MeshMapUsage.Normal,
    "WorldSpaceNormal": substance_painter.baking.MeshMapUsage.WorldSpaceNormal,
    "ID": substance_painter.baking.MeshMapUsage.ID,
    "AO": substance_painter.baking.MeshMapUsage.AO,
    "Curvature": substance_painter.baking.MeshMapUsage.Curvature,
    "Position": substance_painter.baking.MeshMapUsage.Position,
    "Thickness": substance_painter.baking.MeshMapUsage.Thickness,
}}

if not substance_painter.project.is_open():
    print("ERROR: no project is open")
else:
    try:
        target = None
        for ts in substance_painter.textureset.all_texture_sets():
            if ts.name == ts_name:
                target = ts
                break
        if target is None:
            print("ERROR: texture set " + ts_name + " not found")
        else:
            params = substance_painter.baking.BakingParameters.from_texture_set(target)
            common = params.common()
            url = QtCore.QUrl.fromLocalFile(high_path).toString()
            substance_painter.baking.BakingParameters.set({{common["HipolyMesh"]: url}})

            enabled = []
            for name in requested:
                if name in usages:
                    enabled.append(usages[name])
                else:
                    print("WARNING: unknown baker " + name + ", skipping")
            if enabled:
                params.set_enabled_bakers(enabled)
            else:
                print("WARNING: no valid bakers enabled, bake will produce no maps")

            handle = substance_painter.baking.bake_async(target)
            if handle:
                print("{marker}")
            else:
                print("ERROR: bake_async did not start")
    except Exception as e:
        print("!!! EXCEPTION during bake setup: " + str(e))
"#,
        ts_name = py_str(texture_set_name),
        high_path = py_str(&forward_slashes(high_mesh)),
        baker_list = baker_list,
        marker = markers::BAKE_INITIATED,
    )
}

/// Step 5: save the project. Lenient: any non-raising save counts, even if
/// Painter reports a different current path afterwards.
pub fn save_project(spp_path: &Path) -> String {
    format!(
        r#"import time
import substance_painter.project

save_path = {path}
if not substance_painter.project.is_open():
    print("ERROR: no project is open")
else:
    try:
        substance_painter.project.save_as(save_path, mode=substance_painter.project.ProjectSaveMode.Full)
        time.sleep(0.5)
        current = substance_painter.project.file_path()
        if current and current.replace("\\", "/").lower() == save_path.lower():
            print("{marker}")
        else:
            print("WARNING: reported project path is " + str(current))
            print("{marker}")
    except Exception as e:
        print("!!! EXCEPTION during save: " + str(e))
"#,
        path = py_str(&forward_slashes(spp_path)),
        marker = markers::PROJECT_SAVED,
    )
}

/// Step 6: export textures with the predefined glTF preset into the asset's
/// output folder. Warning status still counts as success.
pub fn export_textures(texture_set_name: &str, output_dir: &Path) -> String {
    let config = serde_json::json!({
        "exportShaderParams": false,
        "exportPath": forward_slashes(output_dir),
        "defaultExportPreset": GLTF_PRESET_URL,
        "exportList": [
            { "rootPath": texture_set_name }
        ],
        "exportParameters": [
            {
                "parameters": {
                    "paddingAlgorithm": "infinite",
                    "dilationDistance": 16
                }
            }
        ]
    });

    format!(
        r#"import json
import substance_painter.project
import substance_painter.export

config = json.loads({config})
if not substance_painter.project.is_open():
    print("ERROR: no project is open")
else:
    try:
        result = substance_painter.export.export_project_textures(config)
        if result.status == substance_painter.export.ExportStatus.Success:
            print("{ok}")
        elif result.status == substance_painter.export.ExportStatus.Warning:
            print("WARNING: " + str(result.message))
            print("{warn}")
        elif result.status == substance_painter.export.ExportStatus.Cancelled:
            print("ERROR: export was cancelled")
        else:
            print("ERROR: export failed: " + str(result.message))
    except Exception as e:
        print("!!! EXCEPTION during export: " + str(e))
"#,
        config = py_str(&config.to_string()),
        ok = markers::TEXTURES_EXPORTED,
        warn = markers::TEXTURES_EXPORTED_WITH_WARNINGS,
    )
}
