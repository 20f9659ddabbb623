//! Markdown export.
//!
//! Lossy: tables collapse to a placeholder row and
//! style layers are dropped, leaving the innermost element's text.

use crate::strategy::{render_or_fallback, ExportStrategy};
use crate::ExportError;
use folio_editor::{Document, Element, Renderable};

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownExporter;

impl MarkdownExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, document: &Document) -> String {
        let mut markdown = String::new();

        markdown.push_str(&format!("# {}\n\n", document.title));
        markdown.push_str(&format!("**Author:** {}\n\n", document.author));
        if let Some(metadata) = document.metadata.as_deref().filter(|m| !m.is_empty()) {
            markdown.push_str(&format!("**Metadata:** {}\n\n", metadata));
        }

        for (index, element) in document.elements().iter().enumerate() {
            markdown.push_str(&render_or_fallback(
                self.format_name(),
                index,
                element,
                element_to_markdown,
            ));
            markdown.push_str("\n\n");
        }

        markdown
    }
}

fn element_to_markdown(element: &Element) -> String {
    match element.innermost() {
        Element::Heading(h) => format!("{} {}", "#".repeat(h.level as usize), h.content),
        Element::Image(i) => format!("![{}]({})", i.alt_text.as_deref().unwrap_or("Image"), i.url),
        Element::List(l) => l
            .items
            .iter()
            .enumerate()
            .map(|(n, item)| {
                if l.ordered {
                    format!("{}. {}", n + 1, item)
                } else {
                    format!("- {}", item)
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Element::Table(_) => "| Table | (table content omitted in markdown) |".to_string(),
        Element::Code(c) => format!("```{}\n{}\n```", c.language(), c.content),
        other => other.content(),
    }
}

impl ExportStrategy for MarkdownExporter {
    fn export(&self, document: &Document) -> Result<Vec<u8>, ExportError> {
        Ok(self.render(document).into_bytes())
    }

    fn format_name(&self) -> &'static str {
        "Markdown"
    }

    fn file_extension(&self) -> &'static str {
        "md"
    }
}
