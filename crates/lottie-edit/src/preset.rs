use crate::matcher::NameMatcher;
use crate::shapes::{filter_shapes, ALLOWED_SHAPES};
use crate::transform::for_each_match;
use glam::DVec2;
use lottie_data::Document;
use tracing::info;

/// Layers whose name contains this get the fixed placement.
pub const ROWS_OF_TREES: &str = "rows of trees";
pub const DEFAULT_POSITION: DVec2 = DVec2::new(1160.0, 710.0);
pub const DEFAULT_SCALE: f64 = 400.0;

/// Preparation applied before the rows-of-trees scene is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct RowsOfTrees {
    pub allow: Vec<usize>,
    pub position: DVec2,
    pub scale: f64,
}

impl Default for RowsOfTrees {
    fn default() -> Self {
        Self {
            allow: ALLOWED_SHAPES.to_vec(),
            position: DEFAULT_POSITION,
            scale: DEFAULT_SCALE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrepareSummary {
    pub shapes_removed: usize,
    pub placed: usize,
}

/// Filters the shapes of every matching layer to `preset.allow`, then pins
/// matching layers named like "rows of trees" to the preset position
/// (`[x, y, 0]`) and scale (`[s, s, 100]`).
pub fn prepare_rows_of_trees(
    doc: &mut Document,
    matcher: &NameMatcher,
    preset: &RowsOfTrees,
) -> PrepareSummary {
    let shapes_removed = filter_shapes(doc, matcher, &preset.allow);

    let rows = NameMatcher::new(ROWS_OF_TREES);
    let placed = for_each_match(doc, matcher, |_, layer| {
        if !rows.matches(&layer.as_layer()) {
            return false;
        }
        let moved = layer.set_position([preset.position.x, preset.position.y, 0.0]);
        let scaled = layer.set_scale([preset.scale, preset.scale, 100.0]);
        moved || scaled
    });

    info!(shapes_removed, placed, "prepared rows of trees");
    PrepareSummary {
        shapes_removed,
        placed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn pins_rows_and_filters_every_tree() {
        let shapes: Vec<Value> = (1..=8).map(|i| json!({ "nm": format!("s{i}") })).collect();
        let mut doc = Document::from_value(json!({
            "layers": [
                {
                    "nm": "Rows of Trees",
                    "ks": { "p": { "a": 1, "k": [ { "t": 0, "s": [0, 0, 0] } ] }, "s": { "a": 0, "k": [100, 100, 100] } },
                    "shapes": shapes.clone()
                },
                { "nm": "Tree", "ks": { "p": { "a": 0, "k": [5, 5, 0] } }, "shapes": shapes },
                { "nm": "rows of bushes", "ks": { "p": { "a": 0, "k": [1, 1, 0] } } }
            ]
        }))
        .unwrap();

        let summary = prepare_rows_of_trees(&mut doc, &NameMatcher::trees(), &RowsOfTrees::default());
        assert_eq!(summary, PrepareSummary { shapes_removed: 14, placed: 1 });

        let rows = doc.layer(0).unwrap();
        assert_eq!(rows.position(), Some([1160.0, 710.0, 0.0]));
        assert_eq!(rows.scale(), Some([400.0, 400.0, 100.0]));
        assert_eq!(rows.shapes().len(), 1);
        assert_eq!(doc.layer(1).unwrap().position(), Some([5.0, 5.0, 0.0]));
        assert_eq!(doc.layer(1).unwrap().shapes()[0]["nm"], "s7");
        assert_eq!(doc.layer(2).unwrap().position(), Some([1.0, 1.0, 0.0]));
    }
}
