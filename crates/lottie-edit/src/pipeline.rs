use crate::count::count_layers;
use crate::embed::render_html;
use crate::error::{EditError, EditResult};
use crate::layout::{arrange_grid, GridLayout};
use crate::matcher::NameMatcher;
use crate::population::{duplicate_layer, remove_last, set_count, trim_to};
use crate::preset::{prepare_rows_of_trees, RowsOfTrees};
use crate::shapes::{filter_shapes, ALLOWED_SHAPES};
use crate::store::DocumentStore;
use crate::transform::{apply_controls, offset_layers, scale_layers, ScaleMode, SliderBounds};
use crate::visibility::{set_layer_visibility, set_shape_visibility, visibility_map};
use director_schema::{EditOp, EditRequest};
use glam::DVec2;
use lottie_data::Document;
use std::fs;
use std::path::Path;
use tracing::{info, info_span};

/// What one operation did. `affected` counts layers, shapes or trees depending
/// on the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpReport {
    pub op: &'static str,
    pub affected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditReport {
    pub trees_before: usize,
    pub trees_after: usize,
    pub ops: Vec<OpReport>,
}

/// Short name used in logs and reports.
pub fn op_name(op: &EditOp) -> &'static str {
    match op {
        EditOp::Offset { .. } => "offset",
        EditOp::SetScale { .. } => "set_scale",
        EditOp::ScaleBy { .. } => "scale_by",
        EditOp::Controls { .. } => "controls",
        EditOp::Duplicate { .. } => "duplicate",
        EditOp::RemoveLast => "remove_last",
        EditOp::Trim { .. } => "trim",
        EditOp::SetCount { .. } => "set_count",
        EditOp::FilterShapes { .. } => "filter_shapes",
        EditOp::Grid { .. } => "grid",
        EditOp::LayerVisibility { .. } => "layer_visibility",
        EditOp::ShapeVisibility { .. } => "shape_visibility",
        EditOp::PrepareRowsOfTrees { .. } => "prepare_rows_of_trees",
    }
}

/// Applies a single operation.
pub fn apply_op(
    doc: &mut Document,
    matcher: &NameMatcher,
    op: &EditOp,
    bounds: &SliderBounds,
) -> EditResult<usize> {
    let affected = match op {
        EditOp::Offset { dx, dy } => offset_layers(doc, matcher, DVec2::new(*dx, *dy)),
        EditOp::SetScale { value } => scale_layers(doc, matcher, ScaleMode::Absolute(*value)),
        EditOp::ScaleBy { factor } => scale_layers(doc, matcher, ScaleMode::Factor(*factor)),
        EditOp::Controls { trees } => apply_controls(doc, matcher, trees, bounds),
        EditOp::Duplicate {
            template,
            dx,
            dy,
            name,
        } => {
            duplicate_layer(doc, matcher, *template, DVec2::new(*dx, *dy), name.as_deref())?;
            1
        }
        EditOp::RemoveLast => usize::from(remove_last(doc, matcher).is_some()),
        EditOp::Trim { target } => trim_to(doc, matcher, *target),
        EditOp::SetCount { target, dx, dy } => {
            let change = set_count(doc, matcher, *target, DVec2::new(*dx, *dy))?;
            change.added + change.removed
        }
        EditOp::FilterShapes { allow } => {
            let allow = allow.as_deref().unwrap_or(&ALLOWED_SHAPES);
            filter_shapes(doc, matcher, allow)
        }
        EditOp::Grid {
            count,
            columns,
            origin_x,
            origin_y,
            spacing_x,
            spacing_y,
        } => {
            let defaults = GridLayout::default();
            let grid = GridLayout {
                count: *count,
                columns: *columns,
                origin: DVec2::new(
                    origin_x.unwrap_or(defaults.origin.x),
                    origin_y.unwrap_or(defaults.origin.y),
                ),
                spacing: DVec2::new(
                    spacing_x.unwrap_or(defaults.spacing.x),
                    spacing_y.unwrap_or(defaults.spacing.y),
                ),
            };
            arrange_grid(doc, matcher, &grid)
        }
        EditOp::LayerVisibility { entries } => {
            set_layer_visibility(doc, matcher, &visibility_map(entries))
        }
        EditOp::ShapeVisibility { entries } => {
            set_shape_visibility(doc, matcher, &visibility_map(entries))
        }
        EditOp::PrepareRowsOfTrees {
            allow,
            x,
            y,
            scale,
        } => {
            let defaults = RowsOfTrees::default();
            let preset = RowsOfTrees {
                allow: allow.clone().unwrap_or(defaults.allow),
                position: DVec2::new(
                    x.unwrap_or(defaults.position.x),
                    y.unwrap_or(defaults.position.y),
                ),
                scale: scale.unwrap_or(defaults.scale),
            };
            let summary = prepare_rows_of_trees(doc, matcher, &preset);
            summary.placed
        }
    };
    Ok(affected)
}

/// Applies `ops` in order to one working copy. Stops at the first failing
/// operation; earlier edits stay applied to `doc`.
pub fn apply_ops(
    doc: &mut Document,
    matcher: &NameMatcher,
    ops: &[EditOp],
    bounds: &SliderBounds,
) -> EditResult<EditReport> {
    let mut report = EditReport {
        trees_before: count_layers(doc, matcher),
        ..EditReport::default()
    };
    for op in ops {
        let name = op_name(op);
        let _span = info_span!("op", kind = name).entered();
        let affected = apply_op(doc, matcher, op, bounds)?;
        report.ops.push(OpReport { op: name, affected });
    }
    report.trees_after = count_layers(doc, matcher);
    info!(
        ops = report.ops.len(),
        trees_before = report.trees_before,
        trees_after = report.trees_after,
        "edit request applied"
    );
    Ok(report)
}

/// An edited animation and what was done to it.
#[derive(Debug, Clone)]
pub struct Edited {
    pub document: Document,
    pub report: EditReport,
}

/// Checks out the request's input from `store` and applies its operations.
pub fn load_request(
    request: &EditRequest,
    store: &DocumentStore,
    bounds: &SliderBounds,
) -> EditResult<Edited> {
    let input = request.input.as_deref().ok_or(EditError::MissingInput)?;
    let mut document = store.checkout(input)?;
    let matcher = NameMatcher::new(&request.matcher);
    let report = apply_ops(&mut document, &matcher, &request.ops, bounds)?;
    Ok(Edited { document, report })
}

/// Serializes the document the way the request asks: an HTML player when
/// `embed` is set, JSON otherwise.
pub fn render_output(doc: &Document, request: &EditRequest) -> EditResult<String> {
    match &request.embed {
        Some(config) => render_html(doc, config),
        None => {
            let mut text = doc.to_json_string(request.pretty)?;
            text.push('\n');
            Ok(text)
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Fails when `output` would overwrite `input`, unless `in_place` is set.
pub fn check_output(input: Option<&Path>, output: &Path, in_place: bool) -> EditResult<()> {
    match input {
        Some(input) if !in_place && same_file(input, output) => {
            Err(EditError::OutputIsInput(output.to_path_buf()))
        }
        _ => Ok(()),
    }
}
