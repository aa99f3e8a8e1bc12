use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Viewer", inline)]
#[serde(default)]
/// Structure viewer toggles.
pub struct ViewerOptions {
    /// Whether ligands of visible chains are rendered.
    #[schemars(title = "Render Ligands")]
    pub render_ligands: bool,
    /// Center the camera on the reference chain when a selection is locked.
    #[schemars(title = "Center On Lock")]
    pub center_on_lock: bool,
    /// Per-residue feature used to color the structure, if any.
    #[schemars(title = "Coloring Feature")]
    pub coloring_feature: Option<String>,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            render_ligands: false,
            center_on_lock: true,
            coloring_feature: None,
        }
    }
}
