use crate::error::{DocumentError, DocumentResult};
use crate::property::{self, Vec3, VectorEdit, VectorKind};
use serde_json::{Map, Value};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// A Lottie animation held as raw JSON.
///
/// Nothing beyond "the root is an object" is validated. Layers, transforms and
/// shapes are reached through the [`Layer`] and [`LayerMut`] views, which skip
/// anything that is absent or has an unexpected type. Unknown fields are kept
/// verbatim and written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    pub fn from_value(root: Value) -> DocumentResult<Self> {
        match root {
            Value::Object(_) => Ok(Self { root }),
            Value::Null => Err(DocumentError::NotAnObject("null")),
            Value::Bool(_) => Err(DocumentError::NotAnObject("a boolean")),
            Value::Number(_) => Err(DocumentError::NotAnObject("a number")),
            Value::String(_) => Err(DocumentError::NotAnObject("a string")),
            Value::Array(_) => Err(DocumentError::NotAnObject("an array")),
        }
    }

    pub fn from_json_str(s: &str) -> DocumentResult<Self> {
        Self::from_value(serde_json::from_str(s)?)
    }

    pub fn from_slice(bytes: &[u8]) -> DocumentResult<Self> {
        Self::from_value(serde_json::from_slice(bytes)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> DocumentResult<Self> {
        Self::from_value(serde_json::from_reader(reader)?)
    }

    /// Reads and parses an animation file.
    pub fn load(path: impl AsRef<Path>) -> DocumentResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::from_slice(&bytes)?;
        debug!(path = %path.display(), layers = doc.layer_count(), "loaded animation");
        Ok(doc)
    }

    /// Serializes and writes the animation to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>, pretty: bool) -> DocumentResult<()> {
        let path = path.as_ref();
        let mut text = self.to_json_string(pretty)?;
        text.push('\n');
        fs::write(path, text).map_err(|source| DocumentError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "saved animation");
        Ok(())
    }

    pub fn to_json_string(&self, pretty: bool) -> DocumentResult<String> {
        let text = if pretty {
            serde_json::to_string_pretty(&self.root)?
        } else {
            serde_json::to_string(&self.root)?
        };
        Ok(text)
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    fn meta_f64(&self, key: &str) -> Option<f64> {
        self.root.get(key).and_then(Value::as_f64)
    }

    /// Canvas width (`w`).
    pub fn width(&self) -> Option<f64> {
        self.meta_f64("w")
    }

    /// Canvas height (`h`).
    pub fn height(&self) -> Option<f64> {
        self.meta_f64("h")
    }

    /// Frame rate (`fr`).
    pub fn frame_rate(&self) -> Option<f64> {
        self.meta_f64("fr")
    }

    /// The raw layer list, or an empty slice when `layers` is missing.
    pub fn layer_values(&self) -> &[Value] {
        self.root
            .get("layers")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Mutable access to the layer list, or `None` when `layers` is missing or
    /// not a list.
    pub fn layer_values_mut(&mut self) -> Option<&mut Vec<Value>> {
        self.root.get_mut("layers").and_then(Value::as_array_mut)
    }

    pub fn layer_count(&self) -> usize {
        self.layer_values().len()
    }

    pub fn layers(&self) -> impl Iterator<Item = Layer<'_>> {
        self.layer_values().iter().map(Layer)
    }

    pub fn layer(&self, index: usize) -> Option<Layer<'_>> {
        self.layer_values().get(index).map(Layer)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<LayerMut<'_>> {
        self.layer_values_mut()?.get_mut(index).map(LayerMut)
    }

    /// Mutable views over every layer, in source order.
    pub fn layers_mut(&mut self) -> impl Iterator<Item = LayerMut<'_>> {
        self.layer_values_mut()
            .into_iter()
            .flatten()
            .map(LayerMut)
    }
}

/// Shape number used by filters and visibility maps: the shape's `ix` when it
/// is a positive integer, otherwise its 1-based list position. Exports normally
/// set `ix` to the position; when they disagree, `ix` wins.
pub fn shape_number(shape: &Value, position: usize) -> usize {
    shape
        .get("ix")
        .and_then(Value::as_u64)
        .filter(|ix| *ix > 0)
        .map(|ix| ix as usize)
        .unwrap_or(position + 1)
}

fn name_of(value: &Value) -> Option<&str> {
    value.get("nm").and_then(Value::as_str)
}

fn is_hidden(value: &Value) -> bool {
    value.get("hd").and_then(Value::as_bool).unwrap_or(false)
}

/// Sets or clears the `hd` flag. Clearing removes the key so that a document
/// which never carried the flag comes back unchanged.
pub fn set_hidden(value: &mut Value, hidden: bool) {
    let Some(obj) = value.as_object_mut() else {
        return;
    };
    if hidden {
        obj.insert("hd".to_string(), Value::Bool(true));
    } else {
        obj.remove("hd");
    }
}

/// Read-only view of one layer.
#[derive(Debug, Clone, Copy)]
pub struct Layer<'a>(&'a Value);

impl<'a> Layer<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &'a Value {
        self.0
    }

    pub fn name(&self) -> Option<&'a str> {
        name_of(self.0)
    }

    /// Layer index (`ind`) used for parenting.
    pub fn index(&self) -> Option<u64> {
        self.0.get("ind").and_then(Value::as_u64)
    }

    pub fn is_hidden(&self) -> bool {
        is_hidden(self.0)
    }

    fn transform(&self, key: &str) -> Option<&'a Value> {
        self.0.get("ks")?.get(key)
    }

    /// Static position, z filled with 0 when absent.
    pub fn position(&self) -> Option<Vec3> {
        property::static_vector(self.transform("p")?, VectorKind::Position)
    }

    /// Static scale in percent, z filled with 100 when absent.
    pub fn scale(&self) -> Option<Vec3> {
        property::static_vector(self.transform("s")?, VectorKind::Scale)
    }

    /// Static opacity (`ks.o`).
    pub fn opacity(&self) -> Option<f64> {
        property::static_scalar(self.transform("o")?)
    }

    pub fn shapes(&self) -> &'a [Value] {
        self.0
            .get("shapes")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn shape_names(&self) -> impl Iterator<Item = Option<&'a str>> {
        self.shapes().iter().map(name_of)
    }
}

/// Mutable view of one layer.
#[derive(Debug)]
pub struct LayerMut<'a>(&'a mut Value);

impl<'a> LayerMut<'a> {
    pub fn new(value: &'a mut Value) -> Self {
        Self(value)
    }

    pub fn as_layer(&self) -> Layer<'_> {
        Layer(&*self.0)
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut *self.0
    }

    pub fn name(&self) -> Option<&str> {
        name_of(&*self.0)
    }

    pub fn set_name(&mut self, name: &str) {
        if let Some(obj) = self.0.as_object_mut() {
            obj.insert("nm".to_string(), Value::String(name.to_string()));
        }
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        set_hidden(&mut *self.0, hidden);
    }

    fn transform_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.0.get_mut("ks")?.as_object_mut()
    }

    /// Applies `edit` to the position. Returns how many values changed; zero
    /// when the layer has no recognisable position.
    pub fn edit_position(&mut self, edit: VectorEdit) -> usize {
        match self.transform_mut().and_then(|ks| ks.get_mut("p")) {
            Some(p) => property::edit_vector_property(p, edit),
            None => 0,
        }
    }

    /// Applies `edit` to the scale. Same contract as [`LayerMut::edit_position`].
    pub fn edit_scale(&mut self, edit: VectorEdit) -> usize {
        match self.transform_mut().and_then(|ks| ks.get_mut("s")) {
            Some(s) => property::edit_vector_property(s, edit),
            None => 0,
        }
    }

    /// Overwrites the position with a static vector. Layers without a transform
    /// block are skipped and `false` is returned.
    pub fn set_position(&mut self, value: Vec3) -> bool {
        self.set_transform_vector("p", value)
    }

    /// Overwrites the scale with a static vector.
    pub fn set_scale(&mut self, value: Vec3) -> bool {
        self.set_transform_vector("s", value)
    }

    fn set_transform_vector(&mut self, key: &str, value: Vec3) -> bool {
        let Some(ks) = self.transform_mut() else {
            return false;
        };
        let prop = ks
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        property::set_static_vector(prop, value);
        true
    }

    pub fn shapes_mut(&mut self) -> Option<&mut Vec<Value>> {
        self.0.get_mut("shapes").and_then(Value::as_array_mut)
    }
}
