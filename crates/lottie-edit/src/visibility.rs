use crate::matcher::NameMatcher;
use crate::transform::for_each_match;
use director_schema::VisibilityEntry;
use lottie_data::{model, shape_number, Document};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Index -> visible. For layers the index is the tree ordinal (0-based); for
/// shapes it is the shape number (1-based or the shape's `ix`). Indices not in
/// the map are left as they are.
pub type VisibilityMap = BTreeMap<usize, bool>;

/// Builds a map from checkbox entries. Later entries win.
pub fn visibility_map(entries: &[VisibilityEntry]) -> VisibilityMap {
    entries.iter().map(|e| (e.index, e.visible)).collect()
}

/// Hides (`hd: true`) or shows (removes `hd`) trees by ordinal. Returns how
/// many trees the map addressed.
pub fn set_layer_visibility(doc: &mut Document, matcher: &NameMatcher, map: &VisibilityMap) -> usize {
    let changed = for_each_match(doc, matcher, |ordinal, layer| {
        let Some(&visible) = map.get(&ordinal) else {
            return false;
        };
        layer.set_hidden(!visible);
        debug!(ordinal, visible, "set tree visibility");
        true
    });
    info!(entries = map.len(), changed, "applied tree visibility");
    changed
}

/// Hides or shows shapes by shape number on every matching layer. Returns the
/// number of shapes addressed.
pub fn set_shape_visibility(doc: &mut Document, matcher: &NameMatcher, map: &VisibilityMap) -> usize {
    let mut addressed = 0;
    for_each_match(doc, matcher, |ordinal, layer| {
        let Some(shapes) = layer.shapes_mut() else {
            return false;
        };
        let mut touched = 0;
        for (position, shape) in shapes.iter_mut().enumerate() {
            let number = shape_number(shape, position);
            if let Some(&visible) = map.get(&number) {
                model::set_hidden(shape, !visible);
                touched += 1;
            }
        }
        debug!(ordinal, touched, "set shape visibility");
        addressed += touched;
        touched > 0
    });
    info!(entries = map.len(), addressed, "applied shape visibility");
    addressed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Document {
        Document::from_value(json!({
            "layers": [
                { "nm": "Tree 1", "shapes": [ { "nm": "trunk" }, { "nm": "crown", "hd": false } ] },
                { "nm": "Tree 2", "hd": true },
                { "nm": "River" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn layer_toggle_round_trips() {
        let mut d = doc();
        let original = d.clone();
        let m = NameMatcher::trees();

        let hide = visibility_map(&[VisibilityEntry { index: 0, visible: false }]);
        assert_eq!(set_layer_visibility(&mut d, &m, &hide), 1);
        assert!(d.layer(0).unwrap().is_hidden());

        let show = visibility_map(&[VisibilityEntry { index: 0, visible: true }]);
        set_layer_visibility(&mut d, &m, &show);
        assert_eq!(d, original);
    }

    #[test]
    fn hidden_tree_can_be_shown() {
        let mut d = doc();
        let m = NameMatcher::trees();
        let map = VisibilityMap::from([(1, true), (5, false)]);
        assert_eq!(set_layer_visibility(&mut d, &m, &map), 1);
        assert!(!d.layer(1).unwrap().is_hidden());
        assert!(!d.layer(2).unwrap().is_hidden());
    }

    #[test]
    fn shape_toggle_restores_hidden_value() {
        let mut d = doc();
        let m = NameMatcher::trees();
        let off = VisibilityMap::from([(1, false), (2, false)]);
        assert_eq!(set_shape_visibility(&mut d, &m, &off), 2);
        let shapes = d.layer(0).unwrap().shapes();
        assert_eq!(shapes[0]["hd"], true);
        assert_eq!(shapes[1]["hd"], true);

        let on = VisibilityMap::from([(1, true), (2, true)]);
        set_shape_visibility(&mut d, &m, &on);
        let shapes = d.layer(0).unwrap().shapes();
        assert!(shapes[0].get("hd").is_none());
        assert!(shapes[1].get("hd").is_none());
    }
}
