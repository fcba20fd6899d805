use crate::matcher::NameMatcher;
use crate::transform::for_each_match;
use lottie_data::{shape_number, Document};
use serde_json::Value;
use std::mem;
use tracing::{debug, info};

/// Shape numbers kept by the "rows of trees" preparation.
pub const ALLOWED_SHAPES: [usize; 12] = [7, 9, 10, 11, 14, 15, 17, 19, 20, 21, 22, 25];

/// Records the shape number a kept shape was selected by, so that filtering
/// the result again with the same list keeps everything.
fn pin_shape_number(shape: &mut Value, number: usize) {
    let has_ix = shape
        .get("ix")
        .and_then(Value::as_u64)
        .is_some_and(|ix| ix > 0);
    if has_ix {
        return;
    }
    if let Some(obj) = shape.as_object_mut() {
        obj.insert("ix".to_string(), Value::from(number));
    }
}

/// Keeps only the shapes whose shape number is in `allow`, on every matching
/// layer that has a shape list. Kept shapes stay in source order.
///
/// Returns the number of shapes removed.
pub fn filter_shapes(doc: &mut Document, matcher: &NameMatcher, allow: &[usize]) -> usize {
    let mut removed = 0;
    for_each_match(doc, matcher, |ordinal, layer| {
        let Some(shapes) = layer.shapes_mut() else {
            return false;
        };
        let before = shapes.len();
        *shapes = mem::take(shapes)
            .into_iter()
            .enumerate()
            .filter_map(|(position, mut shape)| {
                let number = shape_number(&shape, position);
                allow.contains(&number).then(|| {
                    pin_shape_number(&mut shape, number);
                    shape
                })
            })
            .collect();
        let dropped = before - shapes.len();
        debug!(ordinal, kept = shapes.len(), dropped, "filtered shapes");
        removed += dropped;
        dropped > 0
    });
    info!(allowed = allow.len(), removed, "filtered tree shapes");
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn layer_with_shapes(n: usize) -> Document {
        let shapes: Vec<Value> = (1..=n).map(|i| json!({ "nm": format!("Shape {i}") })).collect();
        Document::from_value(json!({
            "layers": [
                { "nm": "Tree", "shapes": shapes.clone() },
                { "nm": "Grass", "shapes": shapes }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn filters_by_position_and_pins_number() {
        let mut doc = layer_with_shapes(5);
        let removed = filter_shapes(&mut doc, &NameMatcher::trees(), &[2, 4, 9]);
        assert_eq!(removed, 3);
        let tree = doc.layer(0).unwrap();
        assert_eq!(
            tree.shapes(),
            &[json!({ "nm": "Shape 2", "ix": 2 }), json!({ "nm": "Shape 4", "ix": 4 })]
        );
        assert_eq!(doc.layer(1).unwrap().shapes().len(), 5);
    }

    #[test]
    fn existing_ix_wins_over_position() {
        let mut doc = Document::from_value(json!({
            "layers": [ { "nm": "tree", "shapes": [ { "ix": 7 }, { "ix": 3 }, { "nm": "third" } ] } ]
        }))
        .unwrap();
        filter_shapes(&mut doc, &NameMatcher::trees(), &[3, 7]);
        assert_eq!(
            doc.layer(0).unwrap().shapes(),
            &[json!({ "ix": 7 }), json!({ "ix": 3 }), json!({ "nm": "third", "ix": 3 })]
        );
    }

    #[test]
    fn filtering_is_idempotent() {
        let mut doc = layer_with_shapes(30);
        let m = NameMatcher::trees();
        filter_shapes(&mut doc, &m, &ALLOWED_SHAPES);
        let once = doc.clone();
        assert_eq!(doc.layer(0).unwrap().shapes().len(), ALLOWED_SHAPES.len());
        assert_eq!(filter_shapes(&mut doc, &m, &ALLOWED_SHAPES), 0);
        assert_eq!(doc, once);
    }

    #[test]
    fn layers_without_shapes_are_skipped() {
        let mut doc = Document::from_value(json!({ "layers": [ { "nm": "Tree" } ] })).unwrap();
        let before = doc.clone();
        assert_eq!(filter_shapes(&mut doc, &NameMatcher::trees(), &ALLOWED_SHAPES), 0);
        assert_eq!(doc, before);
    }
}
