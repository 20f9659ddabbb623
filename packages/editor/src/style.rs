//! # Style Decorators
//!
//! Visual layers wrapped around an element without touching it.
//!
//! ## Semantics
//!
//! - `decorate(base, spec)` returns a new [`Element::Styled`] owning `base`
//! - Unrecognized specs return `base` unchanged
//! - `apply_styles(base, ["bold", "italic"])` folds left to right, so the
//!   last spec ends up outermost: `<em ...><strong ...>..</strong></em>`
//! - Type and content always come from the innermost element
//!
//! Persisting a style means replacing the element's slot in the document with
//! the decorated value; the undecorated original is dropped from that slot.

use crate::element::{Element, ElementType, Renderable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single visual attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Style {
    Bold,
    Italic,
    Color(String),
    Size(String),
}

impl Style {
    /// Parse a style spec: `bold`, `italic`, `color:<value>` or `size:<value>`
    pub fn parse(spec: &str) -> Option<Style> {
        let spec = spec.trim();

        if spec.eq_ignore_ascii_case("bold") {
            return Some(Style::Bold);
        }
        if spec.eq_ignore_ascii_case("italic") {
            return Some(Style::Italic);
        }

        let value_after = |prefix: &str| {
            spec.strip_prefix(prefix)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        value_after("color:")
            .map(Style::Color)
            .or_else(|| value_after("size:").map(Style::Size))
    }

    /// Markup tag this layer wraps its inner element in
    pub fn tag(&self) -> &'static str {
        match self {
            Style::Bold => "strong",
            Style::Italic => "em",
            Style::Color(_) | Style::Size(_) => "span",
        }
    }

    pub fn inline_css(&self) -> String {
        match self {
            Style::Bold => "font-weight: bold;".to_string(),
            Style::Italic => "font-style: italic;".to_string(),
            Style::Color(color) => format!("color: {};", color),
            Style::Size(size) => format!("font-size: {};", size),
        }
    }

    /// The spec string this style parses from
    pub fn spec(&self) -> String {
        match self {
            Style::Bold => "bold".to_string(),
            Style::Italic => "italic".to_string(),
            Style::Color(color) => format!("color:{}", color),
            Style::Size(size) => format!("size:{}", size),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec())
    }
}

impl From<Style> for String {
    fn from(style: Style) -> Self {
        style.spec()
    }
}

impl TryFrom<String> for Style {
    type Error = String;

    fn try_from(spec: String) -> Result<Self, Self::Error> {
        Style::parse(&spec).ok_or_else(|| format!("unrecognized style spec: {}", spec))
    }
}

/// An element wrapped in one style layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Styled {
    pub style: Style,
    pub inner: Box<Element>,
}

impl Styled {
    pub fn new(style: Style, inner: Element) -> Self {
        Self {
            style,
            inner: Box::new(inner),
        }
    }

    /// Unwrap one layer, returning the wrapped element
    pub fn into_inner(self) -> Element {
        *self.inner
    }
}

impl Renderable for Styled {
    fn element_type(&self) -> ElementType {
        self.inner.element_type()
    }

    fn content(&self) -> String {
        self.inner.content()
    }

    fn render(&self) -> String {
        let tag = self.style.tag();
        format!(
            "<{} style=\"{}\">{}</{}>",
            tag,
            self.style.inline_css(),
            self.inner.render(),
            tag
        )
    }
}

/// Wrap `base` in the style named by `spec`
///
/// Unrecognized specs return `base` unchanged.
pub fn decorate(base: Element, spec: &str) -> Element {
    match Style::parse(spec) {
        Some(style) => Element::Styled(Styled::new(style, base)),
        None => {
            tracing::debug!(spec, "ignoring unrecognized style spec");
            base
        }
    }
}

/// Apply several style specs, later specs wrapping earlier ones
pub fn apply_styles<I, S>(base: Element, specs: I) -> Element
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    specs
        .into_iter()
        .fold(base, |element, spec| decorate(element, spec.as_ref()))
}

/// Strip every style layer, returning the undecorated element
pub fn strip_styles(element: Element) -> Element {
    match element {
        Element::Styled(styled) => strip_styles(styled.into_inner()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_specs() {
        assert_eq!(Style::parse("bold"), Some(Style::Bold));
        assert_eq!(Style::parse("ITALIC"), Some(Style::Italic));
        assert_eq!(Style::parse("color:red"), Some(Style::Color("red".to_string())));
        assert_eq!(Style::parse("size: 14px"), Some(Style::Size("14px".to_string())));
        assert_eq!(Style::parse("color:"), None);
        assert_eq!(Style::parse("underline"), None);
    }

    #[test]
    fn test_bold_render() {
        let bold = decorate(Element::paragraph("Hi"), "bold");
        assert_eq!(
            bold.render(),
            "<strong style=\"font-weight: bold;\"><p>Hi</p></strong>"
        );
    }

    #[test]
    fn test_later_specs_wrap_earlier_ones() {
        let styled = apply_styles(Element::paragraph("Hi"), ["bold", "italic"]);
        assert_eq!(
            styled.render(),
            "<em style=\"font-style: italic;\">\
             <strong style=\"font-weight: bold;\"><p>Hi</p></strong></em>"
        );
    }

    #[test]
    fn test_stacking_order_matters() {
        let base = Element::paragraph("Hi");
        let a = apply_styles(base.clone(), ["bold", "italic"]);
        let b = apply_styles(base, ["italic", "bold"]);
        assert_ne!(a.render(), b.render());
    }

    #[test]
    fn test_unrecognized_spec_is_noop() {
        let base = Element::heading("Title", 2);
        let styled = decorate(base.clone(), "blink");
        assert_eq!(styled, base);
        assert_eq!(styled.render(), base.render());
    }

    #[test]
    fn test_decorator_delegates_type_and_content() {
        let base = Element::list(vec!["a".to_string(), "b".to_string()], true);
        let styled = apply_styles(base.clone(), ["color:blue", "size:12px", "bold"]);
        assert_eq!(styled.element_type(), ElementType::List);
        assert_eq!(styled.content(), "a\nb");
        assert_eq!(styled.id(), base.id());
        assert_eq!(
            styled.styles(),
            vec![
                &Style::Bold,
                &Style::Size("12px".to_string()),
                &Style::Color("blue".to_string())
            ]
        );
    }

    #[test]
    fn test_decorating_leaves_original_untouched() {
        let base = Element::paragraph("Hi");
        let original = base.clone();
        let styled = decorate(base, "italic");
        assert_eq!(styled.innermost(), &original);
        assert_eq!(strip_styles(styled), original);
    }

    #[test]
    fn test_styled_serde_roundtrip_keeps_layers() {
        let styled = apply_styles(Element::paragraph("Hi"), ["bold", "color:#333"]);
        let json = serde_json::to_value(&styled).unwrap();
        assert_eq!(json["type"], "styled");
        assert_eq!(json["style"], "color:#333");
        assert_eq!(json["inner"]["style"], "bold");

        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back.render(), styled.render());
    }
}
