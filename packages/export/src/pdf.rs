//! # PDF Export
//!
//! Builds a PDF 1.4 file with `lopdf`: Helvetica text lines laid out top
//! to bottom, paginated at a fixed number of lines per page.
//!
//! ## Layout
//!
//! - Title in bold 18pt
//! - Author, created date and metadata in 10pt
//! - Headings in bold 14pt, everything else in 12pt
//! - One blank line after each element
//!
//! Text outside printable ASCII is replaced with `?`; the standard Type 1
//! fonts carry no glyphs for it.

use crate::strategy::{render_or_fallback, ExportStrategy};
use crate::ExportError;
use folio_editor::{Document, Element, Renderable};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document as PdfDocument, Object, Stream, StringFormat};

const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;
const MARGIN: u32 = 72;
const LEADING: u32 = 16;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;
const WRAP_COLUMNS: usize = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    text: String,
    font: Font,
    size: u32,
}

impl Line {
    fn new(text: impl Into<String>, font: Font, size: u32) -> Self {
        Self {
            text: text.into(),
            font,
            size,
        }
    }

    fn blank() -> Self {
        Self::new("", Font::Regular, 12)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExporter;

impl PdfExporter {
    pub fn new() -> Self {
        Self
    }

    fn layout(&self, document: &Document) -> Vec<Line> {
        let mut lines = vec![
            Line::new(document.title.as_str(), Font::Bold, 18),
            Line::blank(),
            Line::new(format!("Author: {}", document.author), Font::Regular, 10),
            Line::new(
                format!("Created: {}", document.created_at.to_rfc3339()),
                Font::Regular,
                10,
            ),
        ];
        if let Some(metadata) = document.metadata.as_deref().filter(|m| !m.is_empty()) {
            lines.push(Line::new(format!("Metadata: {}", metadata), Font::Regular, 10));
        }
        lines.push(Line::blank());

        for (index, element) in document.elements().iter().enumerate() {
            let (font, size) = match element.innermost() {
                Element::Heading(_) => (Font::Bold, 14),
                _ => (Font::Regular, 12),
            };
            let text = render_or_fallback(self.format_name(), index, element, element_text);
            for raw in text.lines() {
                for wrapped in wrap(raw, WRAP_COLUMNS) {
                    lines.push(Line::new(wrapped, font, size));
                }
            }
            lines.push(Line::blank());
        }

        lines
    }

    /// Serialize laid-out lines into PDF bytes
    fn write_pdf(&self, lines: &[Line]) -> Result<Vec<u8>, ExportError> {
        let chunks: Vec<&[Line]> = if lines.is_empty() {
            vec![lines]
        } else {
            lines.chunks(LINES_PER_PAGE).collect()
        };

        let mut pdf = PdfDocument::with_version("1.4");
        let pages_id = pdf.new_object_id();
        let regular_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let bold_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });

        let mut kids = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let content = content_stream(chunk)
                .encode()
                .map_err(|e| ExportError::Pdf(format!("Content encoding failed: {}", e)))?;
            let content_id = pdf.add_object(Stream::new(Dictionary::new(), content));
            let page_id = pdf.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => Object::Array(vec![
                    0.into(),
                    0.into(),
                    PAGE_WIDTH.into(),
                    PAGE_HEIGHT.into(),
                ]),
                "Resources" => dictionary! {
                    "Font" => dictionary! {
                        Font::Regular.resource() => Object::Reference(regular_id),
                        Font::Bold.resource() => Object::Reference(bold_id),
                    },
                },
                "Contents" => Object::Reference(content_id),
            });
            kids.push(Object::Reference(page_id));
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        };
        pdf.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = pdf.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        pdf.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        pdf.save_to(&mut buffer)
            .map_err(|e| ExportError::Pdf(format!("Save failed: {}", e)))?;
        Ok(buffer)
    }
}

fn element_text(element: &Element) -> String {
    match element.innermost() {
        Element::Image(image) => format!("[Image: {}]", image.url),
        Element::List(list) => list
            .items
            .iter()
            .enumerate()
            .map(|(n, item)| {
                if list.ordered {
                    format!("{}. {}", n + 1, item)
                } else {
                    format!("- {}", item)
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.content(),
    }
}

fn content_stream(lines: &[Line]) -> Content {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("TL", vec![LEADING.into()]),
        Operation::new("Td", vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN).into()]),
    ];

    let mut current: Option<(Font, u32)> = None;
    for line in lines {
        if current != Some((line.font, line.size)) {
            operations.push(Operation::new(
                "Tf",
                vec![
                    Object::Name(line.font.resource().as_bytes().to_vec()),
                    line.size.into(),
                ],
            ));
            current = Some((line.font, line.size));
        }
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(
                printable(&line.text).into_bytes(),
                StringFormat::Literal,
            )],
        ));
        operations.push(Operation::new("T*", vec![]));
    }

    operations.push(Operation::new("ET", vec![]));
    Content { operations }
}

/// Tabs become spaces, anything outside printable ASCII becomes `?`
fn printable(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' => ch,
            '\t' => ' ',
            _ => '?',
        })
        .collect()
}

/// Greedy word wrap; words longer than `width` are split
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current.is_empty() {
            word.len()
        } else {
            current.chars().count() + 1 + word.len()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

impl ExportStrategy for PdfExporter {
    fn export(&self, document: &Document) -> Result<Vec<u8>, ExportError> {
        let lines = self.layout(document);
        self.write_pdf(&lines)
    }

    fn format_name(&self) -> &'static str {
        "PDF"
    }

    fn file_extension(&self) -> &'static str {
        "pdf"
    }
}
