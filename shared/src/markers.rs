//! Success markers printed by the generated Painter scripts.
//!
//! The remote channel returns captured stdout as free text; a step counts as
//! confirmed only if its marker appears verbatim in that text. Markers are
//! emitted and scanned exclusively by this repository, so they double as the
//! step protocol version - change one and both sides change together.

/// Project created and open.
pub const PROJECT_CREATED: &str = "MESHKILN_PROJECT_CREATED";

/// Texture set renamed and the new name read back.
pub const TEXTURE_SET_RENAMED: &str = "MESHKILN_TEXTURE_SET_RENAMED";

/// Smart material inserted at the top of the stack.
pub const SMART_MATERIAL_APPLIED: &str = "MESHKILN_SMART_MATERIAL_APPLIED";

/// Asynchronous bake started (initiation only, not completion).
pub const BAKE_INITIATED: &str = "MESHKILN_BAKE_INITIATED";

/// Project saved (lenient: also printed when the reported path differs).
pub const PROJECT_SAVED: &str = "MESHKILN_PROJECT_SAVED";

/// Texture export finished cleanly.
pub const TEXTURES_EXPORTED: &str = "MESHKILN_TEXTURES_EXPORTED";

/// Texture export finished with warnings; still counts as success.
pub const TEXTURES_EXPORTED_WITH_WARNINGS: &str = "MESHKILN_TEXTURES_EXPORTED_WITH_WARNINGS";
