//! # Tree Director
//!
//! `tree-director` edits the layers of a Lottie animation whose names mark
//! them as trees: it counts them, moves and scales them, duplicates or trims
//! them, filters their shapes, lays them out on a grid, toggles visibility and
//! wraps the result in an HTML player.
//!
//! The work is split across three crates, re-exported here:
//! - [`lottie_data`]: the schema-tolerant document model.
//! - [`lottie_edit`]: the edit operations, the request pipeline and HTML embedding.
//! - [`director_schema`]: serde types for JSON edit requests.

pub use director_schema;
pub use lottie_data;
pub use lottie_edit;

pub mod prelude {
    pub use director_schema::{EditOp, EditRequest, EmbedConfig, EmbedMode};
    pub use lottie_data::{Document, Layer, LayerMut};
    pub use lottie_edit::{DocumentStore, EditReport, NameMatcher, SliderBounds};
}

use anyhow::{Context, Result};
use director_schema::EditRequest;
use lottie_edit::{check_output, load_request, render_output, DocumentStore, EditReport, SliderBounds};
use std::fs;

/// Result of [`edit_file`]: the rendered output and what the edits did.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub text: String,
    pub report: EditReport,
}

/// Runs a request end to end: loads the input, applies every operation,
/// renders JSON or HTML and writes it to `request.output` when one is set.
pub fn edit_file(request: &EditRequest, in_place: bool) -> Result<Rendered> {
    let input = request.input.as_deref().context("edit request has no input")?;
    if let Some(output) = request.output.as_deref() {
        check_output(Some(input), output, in_place)?;
    }

    let edited = load_request(request, &DocumentStore::new(), &SliderBounds::default())
        .with_context(|| format!("Failed to edit {}", input.display()))?;
    let text = render_output(&edited.document, request)?;
    if let Some(output) = request.output.as_deref() {
        fs::write(output, &text).with_context(|| format!("Failed to write {}", output.display()))?;
    }
    Ok(Rendered {
        text,
        report: edited.report,
    })
}
