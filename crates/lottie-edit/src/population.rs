//! Adding and removing tree layers.

use crate::error::{EditError, EditResult};
use crate::matcher::NameMatcher;
use glam::DVec2;
use lottie_data::{Document, LayerMut, VectorEdit};
use serde_json::Value;
use tracing::{debug, info};

/// Result of [`set_count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountChange {
    pub added: usize,
    pub removed: usize,
}

/// Name for the n-th tree derived from a template name: trailing digits are
/// replaced by `n` ("Tree 1" -> "Tree 3").
fn numbered_name(template: Option<&str>, n: usize) -> String {
    let base = template
        .unwrap_or("Layer")
        .trim_end_matches(|c: char| c.is_ascii_digit())
        .trim_end();
    if base.is_empty() {
        format!("Layer {n}")
    } else {
        format!("{base} {n}")
    }
}

/// Copies the `template`-th matching layer, shifts the copy by `delta`, renames
/// it and appends it to the layer list. Every other field, including `ind`, is
/// copied as is. A default name that would stop matching falls back to the
/// template's own name, so the copy is always counted as a tree.
///
/// Returns the layer-list index of the copy.
pub fn duplicate_layer(
    doc: &mut Document,
    matcher: &NameMatcher,
    template: usize,
    delta: DVec2,
    name: Option<&str>,
) -> EditResult<usize> {
    let indices = matcher.indices(doc);
    let count = indices.len();
    if count == 0 {
        return Err(EditError::NoTemplate(matcher.needle().to_string()));
    }
    let source = *indices
        .get(template)
        .ok_or(EditError::TemplateOutOfRange { index: template, count })?;

    let layers = doc
        .layer_values_mut()
        .ok_or_else(|| EditError::NoTemplate(matcher.needle().to_string()))?;
    let mut copy: Value = layers[source].clone();

    let mut view = LayerMut::new(&mut copy);
    let new_name = match name {
        Some(name) => name.to_string(),
        None => {
            let numbered = numbered_name(view.name(), count + 1);
            if matcher.matches_name(&numbered) {
                numbered
            } else {
                view.name().unwrap_or_default().to_string()
            }
        }
    };
    view.set_name(&new_name);
    view.edit_position(VectorEdit::translate(delta.x, delta.y));

    layers.push(copy);
    let index = layers.len() - 1;
    info!(template, source, index, name = %new_name, "duplicated tree");
    Ok(index)
}

/// Removes the last matching layer and returns it.
pub fn remove_last(doc: &mut Document, matcher: &NameMatcher) -> Option<Value> {
    let last = *matcher.indices(doc).last()?;
    let removed = doc.layer_values_mut()?.remove(last);
    debug!(index = last, "removed tree");
    Some(removed)
}

/// Removes matching layers from the end until at most `target` remain.
/// Returns how many were removed.
pub fn trim_to(doc: &mut Document, matcher: &NameMatcher, target: usize) -> usize {
    let indices = matcher.indices(doc);
    if indices.len() <= target {
        return 0;
    }
    let Some(layers) = doc.layer_values_mut() else {
        return 0;
    };
    let excess = &indices[target..];
    for &index in excess.iter().rev() {
        layers.remove(index);
    }
    info!(target, removed = excess.len(), "trimmed trees");
    excess.len()
}

/// Brings the number of matching layers to exactly `target`. Growing copies
/// the last tree, each copy stepping `delta` further than the one before.
pub fn set_count(
    doc: &mut Document,
    matcher: &NameMatcher,
    target: usize,
    delta: DVec2,
) -> EditResult<CountChange> {
    let current = matcher.indices(doc).len();
    if target <= current {
        let removed = trim_to(doc, matcher, target);
        return Ok(CountChange { added: 0, removed });
    }

    if current == 0 {
        return Err(EditError::NoTemplate(matcher.needle().to_string()));
    }

    for n in current..target {
        duplicate_layer(doc, matcher, n - 1, delta, None)?;
    }
    Ok(CountChange {
        added: target - current,
        removed: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count::count_layers;
    use serde_json::json;

    fn two_trees() -> Document {
        Document::from_value(json!({
            "layers": [
                { "nm": "Tree 1", "ind": 1, "ks": { "p": { "a": 0, "k": [100, 500, 0] } } },
                { "nm": "Hill", "ind": 2 },
                { "nm": "Tree 2", "ind": 3, "ks": { "p": { "a": 0, "k": [400, 500, 0] } } }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn numbered_names() {
        assert_eq!(numbered_name(Some("Tree 1"), 3), "Tree 3");
        assert_eq!(numbered_name(Some("rows of trees"), 2), "rows of trees 2");
        assert_eq!(numbered_name(Some("42"), 2), "Layer 2");
        assert_eq!(numbered_name(None, 5), "Layer 5");
    }

    #[test]
    fn duplicate_appends_shifted_copy() {
        let mut doc = two_trees();
        let m = NameMatcher::trees();
        let index = duplicate_layer(&mut doc, &m, 0, DVec2::new(50.0, 0.0), None).unwrap();
        assert_eq!(index, 3);
        let copy = doc.layer(3).unwrap();
        assert_eq!(copy.name(), Some("Tree 3"));
        assert_eq!(copy.position(), Some([150.0, 500.0, 0.0]));
        assert_eq!(copy.index(), Some(1));
    }

    #[test]
    fn duplicate_errors() {
        let mut doc = two_trees();
        let m = NameMatcher::trees();
        assert!(matches!(
            duplicate_layer(&mut doc, &m, 2, DVec2::ZERO, None),
            Err(EditError::TemplateOutOfRange { index: 2, count: 2 })
        ));
        assert!(matches!(
            duplicate_layer(&mut doc, &NameMatcher::new("cloud"), 0, DVec2::ZERO, None),
            Err(EditError::NoTemplate(_))
        ));
    }

    #[test]
    fn remove_last_skips_other_layers() {
        let mut doc = two_trees();
        let m = NameMatcher::trees();
        let removed = remove_last(&mut doc, &m).unwrap();
        assert_eq!(removed["nm"], "Tree 2");
        assert_eq!(doc.layer_count(), 2);
        assert!(remove_last(&mut doc, &m).is_some());
        assert!(remove_last(&mut doc, &m).is_none());
        assert_eq!(doc.layer(0).unwrap().name(), Some("Hill"));
    }

    #[test]
    fn set_count_grows_from_last_tree() {
        let mut doc = two_trees();
        let m = NameMatcher::trees();
        let change = set_count(&mut doc, &m, 4, DVec2::new(100.0, 0.0)).unwrap();
        assert_eq!(change, CountChange { added: 2, removed: 0 });
        assert_eq!(count_layers(&doc, &m), 4);
        assert_eq!(doc.layer(3).unwrap().position(), Some([500.0, 500.0, 0.0]));
        assert_eq!(doc.layer(4).unwrap().position(), Some([600.0, 500.0, 0.0]));
        assert_eq!(doc.layer(4).unwrap().name(), Some("Tree 4"));
    }

    #[test]
    fn set_count_keeps_copies_matching_a_numbered_needle() {
        let mut doc = two_trees();
        let m = NameMatcher::new("tree 1");
        let change = set_count(&mut doc, &m, 3, DVec2::new(100.0, 0.0)).unwrap();
        assert_eq!(change, CountChange { added: 2, removed: 0 });
        assert_eq!(count_layers(&doc, &m), 3);
        assert_eq!(doc.layer(3).unwrap().name(), Some("Tree 1"));
        assert_eq!(doc.layer(4).unwrap().name(), Some("Tree 1"));
        assert_eq!(doc.layer(4).unwrap().position(), Some([300.0, 500.0, 0.0]));
    }

    #[test]
    fn set_count_cannot_grow_from_nothing() {
        let mut doc = Document::from_value(json!({ "layers": [] })).unwrap();
        let m = NameMatcher::trees();
        assert_eq!(set_count(&mut doc, &m, 0, DVec2::ZERO).unwrap(), CountChange::default());
        assert!(matches!(
            set_count(&mut doc, &m, 1, DVec2::ZERO),
            Err(EditError::NoTemplate(_))
        ));
    }
}
