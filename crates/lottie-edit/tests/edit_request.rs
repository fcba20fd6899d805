use director_schema::EditRequest;
use lottie_edit::{
    count_layers, from_base64, load_request, render_output, DocumentStore, NameMatcher,
    SliderBounds,
};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/tree.json");

fn request(body: &str) -> EditRequest {
    let mut request: EditRequest = serde_json::from_str(body).expect("invalid request");
    request.input = Some(FIXTURE.into());
    request
}

#[test]
fn rows_of_trees_request() {
    let req = request(
        r#"{
            "ops": [
                { "op": "prepare_rows_of_trees" },
                { "op": "set_count", "target": 6, "dx": 120 },
                { "op": "grid", "count": 6, "columns": 3, "origin_x": 200, "origin_y": 300, "spacing_x": 400, "spacing_y": 350 }
            ]
        }"#,
    );
    let store = DocumentStore::new();
    let edited = load_request(&req, &store, &SliderBounds::default()).unwrap();

    assert_eq!(edited.report.trees_before, 4);
    assert_eq!(edited.report.trees_after, 6);
    let ops: Vec<_> = edited.report.ops.iter().map(|r| r.op).collect();
    assert_eq!(ops, vec!["prepare_rows_of_trees", "set_count", "grid"]);

    let doc = &edited.document;
    let rows = doc.layer(3).unwrap();
    assert_eq!(rows.scale(), Some([400.0, 400.0, 100.0]));
    // The grid overrides the preset position: rows of trees is the fourth tree.
    assert_eq!(rows.position(), Some([200.0, 650.0, 0.0]));
    assert_eq!(doc.layer(7).unwrap().position(), Some([1000.0, 650.0, 0.0]));
    assert_eq!(doc.layer(7).unwrap().name(), Some("Rows of Trees 6"));

    // The store still holds the untouched original.
    let fresh = store.checkout(FIXTURE).unwrap();
    assert_eq!(count_layers(&fresh, &NameMatcher::trees()), 4);
}

#[test]
fn embed_request_produces_player_markup() {
    let req = request(
        r#"{
            "ops": [ { "op": "scale_by", "factor": 2 } ],
            "embed": { "mode": "update", "container_id": "forest" }
        }"#,
    );
    let edited = load_request(&req, &DocumentStore::new(), &SliderBounds::default()).unwrap();
    let html = render_output(&edited.document, &req).unwrap();

    assert!(html.contains(r#"<div id="forest""#));
    assert!(html.contains("window.anim.destroy();"));

    let start = html.find("atob(\"").unwrap() + 6;
    let end = start + html[start..].find('"').unwrap();
    let decoded = from_base64(&html[start..end]).unwrap();
    assert_eq!(decoded, edited.document);
    assert_eq!(decoded.layer(0).unwrap().scale(), Some([200.0, 200.0, 100.0]));
}

#[test]
fn unknown_matcher_leaves_document_untouched() {
    let req = request(
        r#"{ "matcher": "cactus", "ops": [ { "op": "offset", "dx": 5, "dy": 5 }, { "op": "trim", "target": 0 } ] }"#,
    );
    let store = DocumentStore::new();
    let edited = load_request(&req, &store, &SliderBounds::default()).unwrap();
    assert_eq!(edited.report.ops.iter().map(|r| r.affected).sum::<usize>(), 0);
    assert_eq!(edited.document, store.checkout(FIXTURE).unwrap());
}
