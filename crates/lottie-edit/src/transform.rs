use crate::matcher::NameMatcher;
use director_schema::TreeControl;
use glam::DVec2;
use lottie_data::{AxisEdit, Document, LayerMut, VectorEdit};
use std::ops::RangeInclusive;
use tracing::{debug, info, warn};

/// How [`scale_layers`] interprets its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleMode {
    /// Set x and y scale to this percentage.
    Absolute(f64),
    /// Multiply x and y scale by this factor.
    Factor(f64),
}

impl ScaleMode {
    fn edit(self) -> VectorEdit {
        match self {
            ScaleMode::Absolute(value) => VectorEdit::set_uniform(value),
            ScaleMode::Factor(factor) => VectorEdit::scale_by(factor),
        }
    }
}

/// Runs `f` on every matching layer and returns how many layers it changed.
pub(crate) fn for_each_match<F>(doc: &mut Document, matcher: &NameMatcher, mut f: F) -> usize
where
    F: FnMut(usize, &mut LayerMut<'_>) -> bool,
{
    let mut ordinal = 0;
    let mut changed = 0;
    for mut layer in doc.layers_mut() {
        if !matcher.matches(&layer.as_layer()) {
            continue;
        }
        if f(ordinal, &mut layer) {
            changed += 1;
        }
        ordinal += 1;
    }
    changed
}

/// Adds `delta` to the position of every matching layer. Layers without a
/// recognisable position are skipped. Returns the number of layers moved.
pub fn offset_layers(doc: &mut Document, matcher: &NameMatcher, delta: DVec2) -> usize {
    let edit = VectorEdit::translate(delta.x, delta.y);
    let moved = for_each_match(doc, matcher, |ordinal, layer| {
        let touched = layer.edit_position(edit);
        if touched == 0 {
            warn!(ordinal, name = ?layer.name(), "tree has no position, skipped");
        }
        debug!(ordinal, name = ?layer.name(), touched, "offset layer");
        touched > 0
    });
    info!(dx = delta.x, dy = delta.y, moved, "offset trees");
    moved
}

/// Rescales every matching layer. Returns the number of layers changed.
pub fn scale_layers(doc: &mut Document, matcher: &NameMatcher, mode: ScaleMode) -> usize {
    let edit = mode.edit();
    let scaled = for_each_match(doc, matcher, |ordinal, layer| {
        let touched = layer.edit_scale(edit);
        if touched == 0 {
            warn!(ordinal, name = ?layer.name(), "tree has no scale, skipped");
        }
        debug!(ordinal, name = ?layer.name(), touched, "scale layer");
        touched > 0
    });
    info!(?mode, scaled, "scaled trees");
    scaled
}

/// Ranges the editor's sliders allow. Control values are clamped into them.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderBounds {
    pub x: RangeInclusive<f64>,
    pub y: RangeInclusive<f64>,
    pub scale: RangeInclusive<f64>,
}

impl Default for SliderBounds {
    fn default() -> Self {
        Self {
            x: 0.0..=1600.0,
            y: 0.0..=1200.0,
            scale: 50.0..=1000.0,
        }
    }
}

impl SliderBounds {
    /// Accepts any value.
    pub fn unbounded() -> Self {
        Self {
            x: f64::NEG_INFINITY..=f64::INFINITY,
            y: f64::NEG_INFINITY..=f64::INFINITY,
            scale: f64::NEG_INFINITY..=f64::INFINITY,
        }
    }
}

fn clamp(value: f64, range: &RangeInclusive<f64>) -> f64 {
    value.clamp(*range.start(), *range.end())
}

fn axis(value: Option<f64>, range: &RangeInclusive<f64>) -> AxisEdit {
    value.map_or(AxisEdit::Keep, |v| AxisEdit::Set(clamp(v, range)))
}

/// Applies per-tree slider values. `controls[i]` goes to the i-th matching
/// layer; trees beyond the end of `controls` and absent fields are left as
/// they are. Returns the number of layers changed.
pub fn apply_controls(
    doc: &mut Document,
    matcher: &NameMatcher,
    controls: &[TreeControl],
    bounds: &SliderBounds,
) -> usize {
    let changed = for_each_match(doc, matcher, |ordinal, layer| {
        let Some(control) = controls.get(ordinal) else {
            return false;
        };
        let position = VectorEdit {
            x: axis(control.x, &bounds.x),
            y: axis(control.y, &bounds.y),
        };
        let mut touched = 0;
        if position != VectorEdit::default() {
            touched += layer.edit_position(position);
        }
        if let Some(scale) = control.scale {
            touched += layer.edit_scale(VectorEdit::set_uniform(clamp(scale, &bounds.scale)));
        }
        debug!(ordinal, ?control, touched, "applied tree controls");
        touched > 0
    });
    info!(controls = controls.len(), changed, "applied controls");
    changed
}
