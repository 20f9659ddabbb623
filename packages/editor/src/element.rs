//! # Element Model
//!
//! Typed units of document content.
//!
//! The variant set is closed: paragraphs, headings, images, lists, tables and
//! code blocks, plus [`Styled`] which wraps any element (including another
//! styled one) in a visual layer. Every variant answers the same three
//! questions through [`Renderable`]:
//!
//! - which type it is (decorators report their innermost element's type)
//! - a plain content summary (used by search and lossy exporters)
//! - a markup fragment
//!
//! Rendering performs no HTML escaping. Content is assumed to be trusted or
//! sanitized before it reaches the document.

use crate::style::{Style, Styled};
use folio_common::ElementId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability shared by every element variant
pub trait Renderable {
    /// Type tag of the (innermost) element
    fn element_type(&self) -> ElementType;

    /// Plain content summary
    fn content(&self) -> String;

    /// Markup fragment; a pure function of the current field values
    fn render(&self) -> String;
}

/// Type tag of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Paragraph,
    Heading,
    Image,
    List,
    Table,
    Code,
}

impl ElementType {
    pub const ALL: [ElementType; 6] = [
        ElementType::Paragraph,
        ElementType::Heading,
        ElementType::Image,
        ElementType::List,
        ElementType::Table,
        ElementType::Code,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Paragraph => "paragraph",
            ElementType::Heading => "heading",
            ElementType::Image => "image",
            ElementType::List => "list",
            ElementType::Table => "table",
            ElementType::Code => "code",
        }
    }

    /// Look up a type tag (case-insensitive)
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Paragraph(Paragraph),
    Heading(Heading),
    Image(Image),
    List(ListElement),
    Table(Table),
    Code(CodeBlock),
    Styled(Styled),
}

impl Element {
    pub fn paragraph(content: impl Into<String>) -> Self {
        Element::Paragraph(Paragraph::new(content))
    }

    pub fn heading(content: impl Into<String>, level: i64) -> Self {
        Element::Heading(Heading::new(content, level))
    }

    pub fn image(url: impl Into<String>, alt_text: Option<String>) -> Self {
        Element::Image(Image::new(url, alt_text))
    }

    pub fn list(items: Vec<String>, ordered: bool) -> Self {
        Element::List(ListElement::new(items, ordered))
    }

    pub fn table(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Element::Table(Table::new(headers, rows))
    }

    pub fn code(content: impl Into<String>, language: Option<String>) -> Self {
        Element::Code(CodeBlock::new(content, language))
    }

    /// Identity of the innermost element
    pub fn id(&self) -> ElementId {
        match self {
            Element::Paragraph(p) => p.id,
            Element::Heading(h) => h.id,
            Element::Image(i) => i.id,
            Element::List(l) => l.id,
            Element::Table(t) => t.id,
            Element::Code(c) => c.id,
            Element::Styled(s) => s.inner.id(),
        }
    }

    /// The undecorated element at the core of any style layers
    pub fn innermost(&self) -> &Element {
        let mut current = self;
        while let Element::Styled(styled) = current {
            current = &styled.inner;
        }
        current
    }

    pub fn innermost_mut(&mut self) -> &mut Element {
        match self {
            Element::Styled(styled) => styled.inner.innermost_mut(),
            other => other,
        }
    }

    /// Style layers, outermost first
    pub fn styles(&self) -> Vec<&Style> {
        let mut styles = Vec::new();
        let mut current = self;
        while let Element::Styled(styled) = current {
            styles.push(&styled.style);
            current = &styled.inner;
        }
        styles
    }

    pub fn is_styled(&self) -> bool {
        matches!(self, Element::Styled(_))
    }

    fn as_renderable(&self) -> &dyn Renderable {
        match self {
            Element::Paragraph(p) => p,
            Element::Heading(h) => h,
            Element::Image(i) => i,
            Element::List(l) => l,
            Element::Table(t) => t,
            Element::Code(c) => c,
            Element::Styled(s) => s,
        }
    }
}

impl Renderable for Element {
    fn element_type(&self) -> ElementType {
        self.as_renderable().element_type()
    }

    fn content(&self) -> String {
        self.as_renderable().content()
    }

    fn render(&self) -> String {
        self.as_renderable().render()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub id: ElementId,
    #[serde(default)]
    pub content: String,
}

impl Paragraph {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: ElementId::new(),
            content: content.into(),
        }
    }
}

impl Renderable for Paragraph {
    fn element_type(&self) -> ElementType {
        ElementType::Paragraph
    }

    fn content(&self) -> String {
        self.content.clone()
    }

    fn render(&self) -> String {
        format!("<p>{}</p>", self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heading {
    #[serde(default)]
    pub id: ElementId,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_heading_level")]
    pub level: u8,
}

fn default_heading_level() -> u8 {
    1
}

impl Heading {
    pub const MIN_LEVEL: u8 = 1;
    pub const MAX_LEVEL: u8 = 6;

    /// Create a heading, clamping `level` into `1..=6`
    pub fn new(content: impl Into<String>, level: i64) -> Self {
        Self {
            id: ElementId::new(),
            content: content.into(),
            level: Self::clamp_level(level),
        }
    }

    pub fn clamp_level(level: i64) -> u8 {
        level.clamp(Self::MIN_LEVEL as i64, Self::MAX_LEVEL as i64) as u8
    }

    pub fn has_valid_level(&self) -> bool {
        (Self::MIN_LEVEL..=Self::MAX_LEVEL).contains(&self.level)
    }
}

impl Renderable for Heading {
    fn element_type(&self) -> ElementType {
        ElementType::Heading
    }

    fn content(&self) -> String {
        self.content.clone()
    }

    fn render(&self) -> String {
        format!("<h{0}>{1}</h{0}>", self.level, self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default)]
    pub id: ElementId,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

impl Image {
    pub fn new(url: impl Into<String>, alt_text: Option<String>) -> Self {
        Self {
            id: ElementId::new(),
            url: url.into(),
            alt_text,
        }
    }
}

impl Renderable for Image {
    fn element_type(&self) -> ElementType {
        ElementType::Image
    }

    /// The URL is the primary content of an image
    fn content(&self) -> String {
        self.url.clone()
    }

    fn render(&self) -> String {
        format!(
            "<img src=\"{}\" alt=\"{}\" />",
            self.url,
            self.alt_text.as_deref().unwrap_or("")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListElement {
    #[serde(default)]
    pub id: ElementId,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub ordered: bool,
}

impl ListElement {
    pub fn new(items: Vec<String>, ordered: bool) -> Self {
        Self {
            id: ElementId::new(),
            items,
            ordered,
        }
    }
}

impl Renderable for ListElement {
    fn element_type(&self) -> ElementType {
        ElementType::List
    }

    fn content(&self) -> String {
        self.items.join("\n")
    }

    fn render(&self) -> String {
        let tag = if self.ordered { "ol" } else { "ul" };
        let mut html = format!("<{}>", tag);
        for item in &self.items {
            html.push_str("<li>");
            html.push_str(item);
            html.push_str("</li>");
        }
        html.push_str(&format!("</{}>", tag));
        html
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default)]
    pub id: ElementId,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            id: ElementId::new(),
            headers,
            rows,
        }
    }
}

impl Renderable for Table {
    fn element_type(&self) -> ElementType {
        ElementType::Table
    }

    fn content(&self) -> String {
        format!("Table with {} rows", self.rows.len())
    }

    /// Missing headers or rows degrade to an absent head / empty body
    fn render(&self) -> String {
        let mut html = String::from("<table>");

        if !self.headers.is_empty() {
            html.push_str("<thead><tr>");
            for header in &self.headers {
                html.push_str("<th>");
                html.push_str(header);
                html.push_str("</th>");
            }
            html.push_str("</tr></thead>");
        }

        html.push_str("<tbody>");
        for row in &self.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str("<td>");
                html.push_str(cell);
                html.push_str("</td>");
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table>");

        html
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlock {
    #[serde(default)]
    pub id: ElementId,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl CodeBlock {
    pub const DEFAULT_LANGUAGE: &'static str = "plaintext";

    pub fn new(content: impl Into<String>, language: Option<String>) -> Self {
        Self {
            id: ElementId::new(),
            content: content.into(),
            language,
        }
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(Self::DEFAULT_LANGUAGE)
    }
}

impl Renderable for CodeBlock {
    fn element_type(&self) -> ElementType {
        ElementType::Code
    }

    fn content(&self) -> String {
        self.content.clone()
    }

    fn render(&self) -> String {
        format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            self.language(),
            self.content
        )
    }
}
