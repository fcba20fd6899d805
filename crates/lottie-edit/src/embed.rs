//! HTML embedding of an animation for the lottie-web player.
//!
//! The animation travels as base64 inside the markup and is decoded in the
//! browser with `JSON.parse(atob(..))`.

use crate::error::EditResult;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use director_schema::{EmbedConfig, EmbedMode};
use lottie_data::Document;
use serde_json::Value;

/// lottie-web build the player fragments load by default.
pub const LOTTIE_PLAYER_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/lottie-web/5.7.4/lottie.min.js";

/// Compact JSON, base64 encoded.
pub fn to_base64(doc: &Document) -> EditResult<String> {
    let json = doc.to_json_string(false)?;
    Ok(BASE64_STANDARD.encode(json.as_bytes()))
}

pub fn from_base64(encoded: &str) -> EditResult<Document> {
    let bytes = BASE64_STANDARD.decode(encoded.trim())?;
    Ok(Document::from_slice(&bytes)?)
}

fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A JSON string literal is a valid JS string literal. `<` is escaped so the
/// value cannot close the surrounding script element.
fn js_string(raw: &str) -> String {
    Value::String(raw.to_string())
        .to_string()
        .replace('<', "\\u003c")
}

fn player_script(config: &EmbedConfig, payload: &str, destroy_previous: bool) -> String {
    let destroy = if destroy_previous {
        "    if (window.anim) {\n        window.anim.destroy();\n    }\n"
    } else {
        ""
    };
    format!(
        r#"<script>
    var animationData = JSON.parse(atob("{payload}"));
{destroy}    var params = {{
        container: document.getElementById({container}),
        renderer: {renderer},
        loop: {loop_animation},
        autoplay: {autoplay},
        animationData: animationData
    }};
    window.anim = lottie.loadAnimation(params);
</script>"#,
        container = js_string(&config.container_id),
        renderer = js_string(&config.renderer),
        loop_animation = config.loop_animation,
        autoplay = config.autoplay,
    )
}

fn fragment(config: &EmbedConfig, payload: &str, mode: EmbedMode) -> String {
    let container = format!(
        r#"<div id="{}" style="width:100%; height:{};"></div>"#,
        escape_attr(&config.container_id),
        escape_attr(&config.height),
    );
    match mode {
        EmbedMode::Update => {
            format!("{container}\n{}\n", player_script(config, payload, true))
        }
        EmbedMode::Initial | EmbedMode::Page => {
            let url = config.player_url.as_deref().unwrap_or(LOTTIE_PLAYER_URL);
            format!(
                "{container}\n<script src=\"{}\"></script>\n{}\n",
                escape_attr(url),
                player_script(config, payload, false)
            )
        }
    }
}

/// Renders the player markup selected by `config.mode`.
pub fn render_html(doc: &Document, config: &EmbedConfig) -> EditResult<String> {
    let payload = to_base64(doc)?;
    let body = fragment(config, &payload, config.mode);
    if config.mode != EmbedMode::Page {
        return Ok(body);
    }

    let title = doc
        .as_value()
        .get("nm")
        .and_then(Value::as_str)
        .unwrap_or("Animation");
    Ok(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape_attr(title)
    ))
}
