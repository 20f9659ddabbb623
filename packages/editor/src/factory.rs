//! # Element Factory
//!
//! Builds elements from loosely-typed JSON field maps, the shape clients and
//! draft files send.
//!
//! Recognized keys (camelCase): `content`, `level`, `url`, `altText`,
//! `items`, `ordered`, `headers`, `rows`, `language`. Missing keys fall back
//! to empty values. Heading levels accept numbers or numeric strings, default
//! to 1 and are clamped into `1..=6`. An unknown type tag yields a paragraph
//! carrying the raw `content`.

use crate::element::{Element, ElementType, Heading};
use serde_json::{Map, Value};

pub struct ElementFactory;

impl ElementFactory {
    pub fn create(type_tag: &str, fields: &Map<String, Value>) -> Element {
        let content = || string_field(fields, "content").unwrap_or_default();

        match ElementType::parse(type_tag) {
            Some(ElementType::Paragraph) => Element::paragraph(content()),
            Some(ElementType::Heading) => {
                Element::heading(content(), level_field(fields).unwrap_or(1))
            }
            Some(ElementType::Image) => Element::image(
                string_field(fields, "url").unwrap_or_default(),
                string_field(fields, "altText"),
            ),
            Some(ElementType::List) => Element::list(
                string_list(fields, "items").unwrap_or_default(),
                bool_field(fields, "ordered").unwrap_or(false),
            ),
            Some(ElementType::Table) => Element::table(
                string_list(fields, "headers").unwrap_or_default(),
                rows_field(fields).unwrap_or_default(),
            ),
            Some(ElementType::Code) => {
                Element::code(content(), string_field(fields, "language"))
            }
            None => {
                tracing::debug!(type_tag, "unknown element type, creating paragraph");
                Element::paragraph(content())
            }
        }
    }

    /// Patch the fields present in `fields` onto a copy of `element`
    ///
    /// Style layers and identity are kept; only the innermost element changes.
    /// Keys that do not apply to the element's type are ignored.
    pub fn update(element: &Element, fields: &Map<String, Value>) -> Element {
        let mut updated = element.clone();

        match updated.innermost_mut() {
            Element::Paragraph(p) => {
                if let Some(content) = string_field(fields, "content") {
                    p.content = content;
                }
            }
            Element::Heading(h) => {
                if let Some(content) = string_field(fields, "content") {
                    h.content = content;
                }
                if let Some(level) = level_field(fields) {
                    h.level = Heading::clamp_level(level);
                }
            }
            Element::Image(i) => {
                if let Some(url) = string_field(fields, "url") {
                    i.url = url;
                }
                if fields.contains_key("altText") {
                    i.alt_text = string_field(fields, "altText");
                }
            }
            Element::List(l) => {
                if let Some(items) = string_list(fields, "items") {
                    l.items = items;
                }
                if let Some(ordered) = bool_field(fields, "ordered") {
                    l.ordered = ordered;
                }
            }
            Element::Table(t) => {
                if let Some(headers) = string_list(fields, "headers") {
                    t.headers = headers;
                }
                if let Some(rows) = rows_field(fields) {
                    t.rows = rows;
                }
            }
            Element::Code(c) => {
                if let Some(content) = string_field(fields, "content") {
                    c.content = content;
                }
                if fields.contains_key("language") {
                    c.language = string_field(fields, "language");
                }
            }
            Element::Styled(_) => {}
        }

        updated
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(scalar_to_string)
}

fn level_field(fields: &Map<String, Value>) -> Option<i64> {
    match fields.get("level")? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn bool_field(fields: &Map<String, Value>, key: &str) -> Option<bool> {
    match fields.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn string_list(fields: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    match fields.get(key)? {
        Value::Array(values) => Some(values.iter().filter_map(scalar_to_string).collect()),
        _ => None,
    }
}

fn rows_field(fields: &Map<String, Value>) -> Option<Vec<Vec<String>>> {
    match fields.get("rows")? {
        Value::Array(rows) => Some(
            rows.iter()
                .map(|row| match row {
                    Value::Array(cells) => cells.iter().filter_map(scalar_to_string).collect(),
                    _ => Vec::new(),
                })
                .collect(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Renderable;
    use crate::style::apply_styles;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_create_heading_level_variants() {
        let numeric = ElementFactory::create("heading", &fields(json!({"content": "A", "level": 3})));
        assert_eq!(numeric.render(), "<h3>A</h3>");

        let text = ElementFactory::create("heading", &fields(json!({"content": "B", "level": "2"})));
        assert_eq!(text.render(), "<h2>B</h2>");

        let missing = ElementFactory::create("heading", &fields(json!({"content": "C"})));
        assert_eq!(missing.render(), "<h1>C</h1>");

        let high = ElementFactory::create("heading", &fields(json!({"content": "D", "level": 42})));
        assert_eq!(high.render(), "<h6>D</h6>");
    }

    #[test]
    fn test_create_each_type() {
        let image = ElementFactory::create(
            "image",
            &fields(json!({"url": "a.png", "altText": "A"})),
        );
        assert_eq!(image.render(), "<img src=\"a.png\" alt=\"A\" />");

        let list = ElementFactory::create(
            "list",
            &fields(json!({"items": ["x", "y"], "ordered": true})),
        );
        assert_eq!(list.render(), "<ol><li>x</li><li>y</li></ol>");

        let table = ElementFactory::create(
            "table",
            &fields(json!({"headers": ["h"], "rows": [["1"], [2]]})),
        );
        assert_eq!(table.content(), "Table with 2 rows");
        assert!(table.render().contains("<td>2</td>"));

        let code = ElementFactory::create("code", &fields(json!({"content": "x"})));
        assert!(code.render().contains("language-plaintext"));
    }

    #[test]
    fn test_unknown_type_falls_back_to_paragraph() {
        let element = ElementFactory::create("video", &fields(json!({"content": "raw"})));
        assert_eq!(element.element_type(), ElementType::Paragraph);
        assert_eq!(element.render(), "<p>raw</p>");
    }

    #[test]
    fn test_update_patches_innermost_and_keeps_styles() {
        let base = Element::heading("Old", 1);
        let styled = apply_styles(base.clone(), ["bold"]);

        let updated = ElementFactory::update(&styled, &fields(json!({"content": "New", "level": 2})));
        assert_eq!(updated.id(), base.id());
        assert_eq!(
            updated.render(),
            "<strong style=\"font-weight: bold;\"><h2>New</h2></strong>"
        );
        // the source element is untouched
        assert_eq!(styled.content(), "Old");
    }

    #[test]
    fn test_update_ignores_unrelated_keys() {
        let paragraph = Element::paragraph("keep");
        let updated = ElementFactory::update(&paragraph, &fields(json!({"url": "x.png"})));
        assert_eq!(updated, paragraph);
    }
}
