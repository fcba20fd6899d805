//! Numeric access to Lottie animatable properties.
//!
//! A property is an object of the form `{"a": 0, "k": ...}` where `k` is either
//! a static value or a list of keyframes carrying `s`/`e` values. Positions may
//! also be split into independent `x`/`y`/`z` scalar properties. Everything
//! here is tolerant: shapes that do not look like a property are left alone and
//! reported as "nothing touched".

use serde_json::{Number, Value};

pub type Vec2 = [f64; 2];
pub type Vec3 = [f64; 3];

/// Selects the default for a missing third component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorKind {
    /// Positions and anchors: z defaults to 0.
    Position,
    /// Scales: z defaults to 100 (percent).
    Scale,
}

impl VectorKind {
    pub fn default_z(self) -> f64 {
        match self {
            VectorKind::Position => 0.0,
            VectorKind::Scale => 100.0,
        }
    }
}

/// Edit applied to one component of a vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AxisEdit {
    #[default]
    Keep,
    Add(f64),
    Mul(f64),
    Set(f64),
}

impl AxisEdit {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            AxisEdit::Keep => value,
            AxisEdit::Add(d) => value + d,
            AxisEdit::Mul(f) => value * f,
            AxisEdit::Set(v) => v,
        }
    }
}

/// Edit applied to the x/y components of a vector property. The z component,
/// when present, is never touched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VectorEdit {
    pub x: AxisEdit,
    pub y: AxisEdit,
}

impl VectorEdit {
    pub fn translate(dx: f64, dy: f64) -> Self {
        Self {
            x: AxisEdit::Add(dx),
            y: AxisEdit::Add(dy),
        }
    }

    pub fn scale_by(factor: f64) -> Self {
        Self {
            x: AxisEdit::Mul(factor),
            y: AxisEdit::Mul(factor),
        }
    }

    pub fn set(x: f64, y: f64) -> Self {
        Self {
            x: AxisEdit::Set(x),
            y: AxisEdit::Set(y),
        }
    }

    pub fn set_uniform(value: f64) -> Self {
        Self::set(value, value)
    }
}

/// Converts a float into a JSON number, keeping integral values as integers so
/// that integer fixtures stay integer-valued after an edit.
pub fn number(value: f64) -> Value {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
        return Value::from(value as i64);
    }
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Like [`number`], but a float-typed `source` stays float-typed so that an
/// edit which cancels out writes back the original representation.
pub fn number_like(value: f64, source: &Number) -> Value {
    if source.is_f64() {
        return Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null);
    }
    number(value)
}

fn is_split(prop: &serde_json::Map<String, Value>) -> bool {
    match prop.get("s").and_then(Value::as_bool) {
        Some(split) => split,
        None => prop.contains_key("x") && !prop.contains_key("k"),
    }
}

fn is_numeric_vector(items: &[Value]) -> bool {
    items.len() >= 2 && items[..2].iter().all(Value::is_number)
}

fn edit_array(items: &mut [Value], edit: VectorEdit) -> bool {
    if !is_numeric_vector(items) {
        return false;
    }
    for (slot, axis) in items.iter_mut().zip([edit.x, edit.y]) {
        if let Value::Number(n) = slot {
            let current = n.as_f64().unwrap_or_default();
            let edited = number_like(axis.apply(current), n);
            *slot = edited;
        }
    }
    true
}

fn edit_scalar(value: &mut Value, axis: AxisEdit) -> bool {
    match value {
        Value::Number(n) => {
            let current = n.as_f64().unwrap_or_default();
            let edited = number_like(axis.apply(current), n);
            *value = edited;
            true
        }
        // Scalars are sometimes wrapped in a one-element list.
        Value::Array(items) if items.first().is_some_and(Value::is_number) => {
            edit_scalar(&mut items[0], axis)
        }
        _ => false,
    }
}

/// Applies `edit` to a vector property: the static value, or every keyframe's
/// `s` and `e` values when animated. Split positions route x and y to their
/// scalar sub-properties.
///
/// Returns how many values were changed.
pub fn edit_vector_property(prop: &mut Value, edit: VectorEdit) -> usize {
    let Some(obj) = prop.as_object_mut() else {
        return 0;
    };

    if is_split(obj) {
        let mut touched = 0;
        if let Some(x) = obj.get_mut("x") {
            touched += edit_scalar_property(x, edit.x);
        }
        if let Some(y) = obj.get_mut("y") {
            touched += edit_scalar_property(y, edit.y);
        }
        return touched;
    }

    let Some(Value::Array(items)) = obj.get_mut("k") else {
        return 0;
    };
    if edit_array(items, edit) {
        return 1;
    }

    let mut touched = 0;
    for keyframe in items.iter_mut().filter_map(Value::as_object_mut) {
        for key in ["s", "e"] {
            if let Some(Value::Array(values)) = keyframe.get_mut(key) {
                if edit_array(values, edit) {
                    touched += 1;
                }
            }
        }
    }
    touched
}

/// Scalar counterpart of [`edit_vector_property`].
pub fn edit_scalar_property(prop: &mut Value, axis: AxisEdit) -> usize {
    let Some(k) = prop.get_mut("k") else {
        return 0;
    };
    if edit_scalar(k, axis) {
        return 1;
    }

    let Value::Array(items) = k else {
        return 0;
    };
    let mut touched = 0;
    for keyframe in items.iter_mut().filter_map(Value::as_object_mut) {
        for key in ["s", "e"] {
            if let Some(value) = keyframe.get_mut(key) {
                if edit_scalar(value, axis) {
                    touched += 1;
                }
            }
        }
    }
    touched
}

/// Reads a non-animated scalar property.
pub fn static_scalar(prop: &Value) -> Option<f64> {
    match prop.get("k")? {
        Value::Number(n) => n.as_f64(),
        Value::Array(items) => items.first()?.as_f64(),
        _ => None,
    }
}

/// Reads a non-animated vector property, filling a missing z from `kind`.
pub fn static_vector(prop: &Value, kind: VectorKind) -> Option<Vec3> {
    let obj = prop.as_object()?;
    if is_split(obj) {
        let x = static_scalar(obj.get("x")?)?;
        let y = static_scalar(obj.get("y")?)?;
        let z = obj
            .get("z")
            .and_then(static_scalar)
            .unwrap_or(kind.default_z());
        return Some([x, y, z]);
    }

    let items = obj.get("k")?.as_array()?;
    if !is_numeric_vector(items) {
        return None;
    }
    let x = items[0].as_f64()?;
    let y = items[1].as_f64()?;
    let z = items
        .get(2)
        .and_then(Value::as_f64)
        .unwrap_or(kind.default_z());
    Some([x, y, z])
}

/// Replaces the property's value with a static three-component vector. An
/// animated property becomes static. Split positions keep their split form.
pub fn set_static_vector(prop: &mut Value, value: Vec3) {
    let vector = Value::Array(value.iter().copied().map(number).collect());

    let Some(obj) = prop.as_object_mut() else {
        *prop = serde_json::json!({ "a": 0, "k": vector });
        return;
    };

    if is_split(obj) {
        for (key, component) in ["x", "y", "z"].into_iter().zip(value) {
            if let Some(axis) = obj.get_mut(key).and_then(Value::as_object_mut) {
                axis.insert("k".to_string(), number(component));
                if axis.contains_key("a") {
                    axis.insert("a".to_string(), Value::from(0));
                }
            }
        }
        return;
    }

    obj.insert("k".to_string(), vector);
    if obj.contains_key("a") {
        obj.insert("a".to_string(), Value::from(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integral_results_stay_integers() {
        assert_eq!(number(12.0), json!(12));
        assert_eq!(number(-3.0), json!(-3));
        assert_eq!(number(1.5), json!(1.5));
        assert_eq!(number(f64::NAN), Value::Null);
    }

    #[test]
    fn static_vector_edit_keeps_z() {
        let mut prop = json!({ "a": 0, "k": [100, 200, 0] });
        assert_eq!(edit_vector_property(&mut prop, VectorEdit::translate(10.0, -20.0)), 1);
        assert_eq!(prop, json!({ "a": 0, "k": [110, 180, 0] }));
    }

    #[test]
    fn float_typed_values_survive_an_offset_round_trip() {
        let original = json!({ "a": 0, "k": [100.0, 200.5, 0.0] });
        let mut prop = original.clone();
        edit_vector_property(&mut prop, VectorEdit::translate(10.0, 0.0));
        assert_eq!(prop["k"][0], json!(110.0));
        assert!(prop["k"][0].is_f64());
        edit_vector_property(&mut prop, VectorEdit::translate(-10.0, 0.0));
        assert_eq!(prop, original);

        let mut split = json!({ "s": true, "x": { "a": 0, "k": 10.0 }, "y": { "a": 0, "k": 20 } });
        edit_vector_property(&mut split, VectorEdit::translate(0.0, 0.0));
        assert!(split["x"]["k"].is_f64());
        assert!(split["y"]["k"].is_i64());
    }

    #[test]
    fn animated_vector_edits_every_keyframe() {
        let mut prop = json!({
            "a": 1,
            "k": [
                { "t": 0, "s": [0, 0, 0], "e": [50, 50, 0] },
                { "t": 30, "s": [50, 50, 0] }
            ]
        });
        assert_eq!(edit_vector_property(&mut prop, VectorEdit::translate(5.0, 5.0)), 3);
        assert_eq!(prop["k"][0]["s"], json!([5, 5, 0]));
        assert_eq!(prop["k"][0]["e"], json!([55, 55, 0]));
        assert_eq!(prop["k"][1]["s"], json!([55, 55, 0]));
    }

    #[test]
    fn split_position_routes_axes() {
        let mut prop = json!({ "s": true, "x": { "a": 0, "k": 10 }, "y": { "a": 0, "k": [20] } });
        assert_eq!(edit_vector_property(&mut prop, VectorEdit::translate(1.0, 2.0)), 2);
        assert_eq!(static_vector(&prop, VectorKind::Position), Some([11.0, 22.0, 0.0]));
    }

    #[test]
    fn static_vector_defaults_z_by_kind() {
        let prop = json!({ "k": [100, 100] });
        assert_eq!(static_vector(&prop, VectorKind::Scale), Some([100.0, 100.0, 100.0]));
        assert_eq!(static_vector(&prop, VectorKind::Position), Some([100.0, 100.0, 0.0]));
    }

    #[test]
    fn unrecognised_shapes_are_untouched() {
        let mut prop = json!({ "k": "not a vector" });
        assert_eq!(edit_vector_property(&mut prop, VectorEdit::translate(1.0, 1.0)), 0);
        assert_eq!(prop, json!({ "k": "not a vector" }));
        assert_eq!(static_vector(&prop, VectorKind::Position), None);
    }

    #[test]
    fn set_static_vector_flattens_animation() {
        let mut prop = json!({ "a": 1, "k": [{ "t": 0, "s": [1, 2, 0] }], "ix": 2 });
        set_static_vector(&mut prop, [1160.0, 710.0, 0.0]);
        assert_eq!(prop, json!({ "a": 0, "k": [1160, 710, 0], "ix": 2 }));
    }
}
