//! # lottie-edit
//!
//! Edits applied to the "tree" layers of a Lottie animation.
//!
//! Every operation takes a [`Document`](lottie_data::Document), a
//! [`NameMatcher`] selecting the layers to touch, and plain scalar parameters.
//! Operations are O(layers), mutate the document in place, observe source
//! order only, and skip anything whose shape they do not recognise.
//!
//! ```rust,no_run
//! use glam::DVec2;
//! use lottie_data::Document;
//! use lottie_edit::{count_layers, offset_layers, NameMatcher};
//!
//! let mut doc = Document::load("tree.json")?;
//! let trees = NameMatcher::trees();
//! println!("{} trees", count_layers(&doc, &trees));
//! offset_layers(&mut doc, &trees, DVec2::new(40.0, 0.0));
//! doc.save("tree_out.json", true)?;
//! # Ok::<(), lottie_data::DocumentError>(())
//! ```

pub mod count;
pub mod embed;
pub mod error;
pub mod layout;
pub mod matcher;
pub mod pipeline;
pub mod population;
pub mod preset;
pub mod shapes;
pub mod store;
pub mod transform;
pub mod visibility;

pub use count::{count_layers, count_shapes};
pub use embed::{from_base64, render_html, to_base64, LOTTIE_PLAYER_URL};
pub use error::{EditError, EditResult};
pub use layout::{arrange_grid, GridLayout};
pub use matcher::{NameMatcher, DEFAULT_NEEDLE};
pub use pipeline::{
    apply_op, apply_ops, check_output, load_request, render_output, EditReport, Edited, OpReport,
};
pub use population::{duplicate_layer, remove_last, set_count, trim_to, CountChange};
pub use preset::{prepare_rows_of_trees, PrepareSummary, RowsOfTrees};
pub use shapes::{filter_shapes, ALLOWED_SHAPES};
pub use store::DocumentStore;
pub use transform::{apply_controls, offset_layers, scale_layers, ScaleMode, SliderBounds};
pub use visibility::{
    set_layer_visibility, set_shape_visibility, visibility_map, VisibilityMap,
};

pub use director_schema::{EmbedConfig, EmbedMode, TreeControl};
