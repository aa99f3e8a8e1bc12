use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::selection::DEFAULT_WINDOW_RADIUS;

/// Hover/lock window parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Selection", inline)]
#[serde(default)]
pub struct SelectionOptions {
    /// Columns highlighted on each side of the focus column. Fixed for the
    /// lifetime of a session.
    #[schemars(title = "Window Radius", range(max = 50))]
    pub window_radius: u32,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            window_radius: DEFAULT_WINDOW_RADIUS,
        }
    }
}
