use crate::matcher::NameMatcher;
use lottie_data::Document;

/// Number of layers whose name matches.
pub fn count_layers(doc: &Document, matcher: &NameMatcher) -> usize {
    doc.layers().filter(|layer| matcher.matches(layer)).count()
}

/// Number of top-level shapes, across all layers, whose name matches. Groups
/// are not descended into.
pub fn count_shapes(doc: &Document, matcher: &NameMatcher) -> usize {
    doc.layers()
        .flat_map(|layer| layer.shape_names())
        .filter(|name| matcher.matches_name(name.unwrap_or_default()))
        .count()
}
