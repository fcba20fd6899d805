//! Serde types describing a batch of edits to apply to an animation.
//!
//! An [`EditRequest`] is the data form of the editor's controls: which file to
//! read, which layers count as trees, an ordered list of operations, and how to
//! emit the result.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EditRequest {
    /// Animation to read. The CLI may override it.
    #[serde(default)]
    pub input: Option<PathBuf>,
    /// Where to write the edited animation. Stdout when absent.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Case-insensitive substring identifying tree layers (default: "tree").
    #[serde(default = "default_matcher")]
    pub matcher: String,
    /// Pretty-print the JSON output (default: true).
    #[serde(default = "default_pretty")]
    pub pretty: bool,
    /// Operations, applied in order to a single working copy.
    #[serde(default)]
    pub ops: Vec<EditOp>,
    /// Emit an HTML player fragment instead of raw JSON.
    #[serde(default)]
    pub embed: Option<EmbedConfig>,
}

impl Default for EditRequest {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            matcher: default_matcher(),
            pretty: default_pretty(),
            ops: Vec::new(),
            embed: None,
        }
    }
}

fn default_matcher() -> String {
    "tree".to_string()
}

fn default_pretty() -> bool {
    true
}

/// One edit. Tree ordinals are 0-based positions among matching layers;
/// shape numbers are 1-based (or the shape's own `ix`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    /// Add `(dx, dy)` to every tree's position.
    Offset { dx: f64, dy: f64 },
    /// Set every tree's x/y scale to `value` percent.
    SetScale { value: f64 },
    /// Multiply every tree's x/y scale by `factor`.
    ScaleBy { factor: f64 },
    /// Per-tree slider values, in tree order.
    Controls { trees: Vec<TreeControl> },
    /// Copy a tree, shift the copy and append it.
    Duplicate {
        #[serde(default)]
        template: usize,
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
        /// Name for the copy. Defaults to "<template name> <new count>".
        #[serde(default)]
        name: Option<String>,
    },
    /// Remove the last tree.
    RemoveLast,
    /// Remove trees from the end until `target` remain.
    Trim { target: usize },
    /// Grow or shrink to exactly `target` trees. New trees step by `(dx, dy)`.
    SetCount {
        target: usize,
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
    },
    /// Keep only the listed shape numbers on every tree. Uses the built-in
    /// allow-list when `allow` is omitted.
    FilterShapes {
        #[serde(default)]
        allow: Option<Vec<usize>>,
    },
    /// Lay the first `count` trees out on a row-major grid.
    Grid {
        count: usize,
        columns: usize,
        #[serde(default)]
        origin_x: Option<f64>,
        #[serde(default)]
        origin_y: Option<f64>,
        #[serde(default)]
        spacing_x: Option<f64>,
        #[serde(default)]
        spacing_y: Option<f64>,
    },
    /// Show or hide trees by ordinal.
    LayerVisibility { entries: Vec<VisibilityEntry> },
    /// Show or hide shapes by shape number on every tree.
    ShapeVisibility { entries: Vec<VisibilityEntry> },
    /// Shape filter plus fixed placement for "rows of trees" layers.
    PrepareRowsOfTrees {
        #[serde(default)]
        allow: Option<Vec<usize>>,
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
        #[serde(default)]
        scale: Option<f64>,
    },
}

/// One checkbox: the tree ordinal or shape number, and whether it is shown.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityEntry {
    pub index: usize,
    pub visible: bool,
}

/// Slider state for one tree. Absent fields leave the tree unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TreeControl {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub scale: Option<f64>,
}

/// Which flavour of HTML to produce.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmbedMode {
    /// Fragment that loads the player script, then the animation.
    #[default]
    Initial,
    /// Fragment that destroys the previous player and reloads the animation.
    Update,
    /// Standalone HTML page.
    Page,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmbedConfig {
    #[serde(default)]
    pub mode: EmbedMode,
    #[serde(default = "default_container_id")]
    pub container_id: String,
    /// CSS height of the player container.
    #[serde(default = "default_height")]
    pub height: String,
    #[serde(default = "default_renderer")]
    pub renderer: String,
    #[serde(default = "default_true", rename = "loop")]
    pub loop_animation: bool,
    #[serde(default = "default_true")]
    pub autoplay: bool,
    /// Player script URL. Defaults to the lottie-web 5.7.4 CDN build.
    #[serde(default)]
    pub player_url: Option<String>,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            mode: EmbedMode::default(),
            container_id: default_container_id(),
            height: default_height(),
            renderer: default_renderer(),
            loop_animation: true,
            autoplay: true,
            player_url: None,
        }
    }
}

fn default_container_id() -> String {
    "lottie-animation".to_string()
}

fn default_height() -> String {
    "400px".to_string()
}

fn default_renderer() -> String {
    "svg".to_string()
}

fn default_true() -> bool {
    true
}
