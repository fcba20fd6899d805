// lottie-data: schema-tolerant views over Lottie JSON
pub mod error;
pub mod model;
pub mod property;

pub use error::{DocumentError, DocumentResult};
pub use model::{shape_number, Document, Layer, LayerMut};
pub use property::{AxisEdit, Vec2, Vec3, VectorEdit, VectorKind};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let text = r#"{"v":"5.7.4","ip":0,"op":60,"fr":30,"w":1600,"h":1200,"meta":{"g":"LottieFiles"},"layers":[{"ty":4,"nm":"Tree","ks":{"p":{"a":0,"k":[1,2,0]}},"zz":[1,{"q":null}]}],"markers":[]}"#;
        let doc = Document::from_json_str(text).unwrap();
        assert_eq!(doc.to_json_string(false).unwrap(), text);
    }

    #[test]
    fn test_deserialize_shape_layer() {
        let doc = Document::from_value(json!({
            "v": "5.5.2",
            "ip": 0, "op": 60, "fr": 60, "w": 100, "h": 100,
            "layers": [
                {
                    "ty": 4,
                    "ind": 1,
                    "nm": "MyShape",
                    "ks": {},
                    "shapes": [
                        { "ty": "rc", "nm": "Rect", "ix": 1 },
                        { "ty": "fl", "c": { "a": 0, "k": [1, 0, 0, 1] }, "hd": true }
                    ]
                }
            ]
        }))
        .unwrap();
        let layer = doc.layer(0).unwrap();
        assert_eq!(layer.shapes().len(), 2);
        let names: Vec<_> = layer.shape_names().collect();
        assert_eq!(names, vec![Some("Rect"), None]);
        assert_eq!(doc.frame_rate(), Some(60.0));
    }
}
