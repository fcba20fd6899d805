use lottie_data::{Document, Layer};

/// Needle used when nothing else is configured.
pub const DEFAULT_NEEDLE: &str = "tree";

/// Identifies layers by a case-insensitive substring of their name.
///
/// Unnamed layers only match an empty needle. Two layers with the same name are
/// indistinguishable; ordinals (position among matches) are the only identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatcher {
    needle: String,
}

impl NameMatcher {
    pub fn new(needle: &str) -> Self {
        Self {
            needle: needle.to_lowercase(),
        }
    }

    pub fn trees() -> Self {
        Self::new(DEFAULT_NEEDLE)
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn matches_name(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.needle)
    }

    pub fn matches(&self, layer: &Layer<'_>) -> bool {
        self.matches_name(layer.name().unwrap_or_default())
    }

    /// Indices into the layer list of every matching layer, in source order.
    pub fn indices(&self, doc: &Document) -> Vec<usize> {
        doc.layers()
            .enumerate()
            .filter(|(_, layer)| self.matches(layer))
            .map(|(index, _)| index)
            .collect()
    }
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::trees()
    }
}
