use crate::ExportError;
use folio_editor::{Document, Element, Renderable};

/// A pluggable converter from a document to a byte payload
pub trait ExportStrategy: Send + Sync {
    fn export(&self, document: &Document) -> Result<Vec<u8>, ExportError>;

    /// Display name, e.g. `"HTML"`
    fn format_name(&self) -> &'static str;

    /// File extension without the dot
    fn file_extension(&self) -> &'static str;
}

/// Reason an element cannot take its format-specific render path
pub(crate) fn render_blocker(element: &Element) -> Option<&'static str> {
    match element.innermost() {
        Element::Image(image) if image.url.trim().is_empty() => Some("image has no url"),
        Element::Heading(heading) if !heading.has_valid_level() => Some("heading level out of range"),
        _ => None,
    }
}

/// Render `element` with `render`, or fall back to its plain content summary
pub(crate) fn render_or_fallback<F>(format: &str, index: usize, element: &Element, render: F) -> String
where
    F: FnOnce(&Element) -> String,
{
    match render_blocker(element) {
        None => render(element),
        Some(reason) => {
            tracing::warn!(
                format,
                index,
                element_type = %element.element_type(),
                reason,
                "falling back to plain text"
            );
            element.content()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_editor::{apply_styles, Heading};

    #[test]
    fn test_blockers() {
        assert_eq!(render_blocker(&Element::paragraph("x")), None);
        assert_eq!(
            render_blocker(&Element::image("", None)),
            Some("image has no url")
        );

        let mut heading = Heading::new("x", 1);
        heading.level = 9;
        let styled = apply_styles(Element::Heading(heading), ["bold"]);
        assert_eq!(render_blocker(&styled), Some("heading level out of range"));
    }

    #[test]
    fn test_fallback_uses_content_summary() {
        let image = Element::image(" ", Some("alt".to_string()));
        let out = render_or_fallback("HTML", 0, &image, |e| e.render());
        assert_eq!(out, " ");

        let ok = Element::paragraph("fine");
        assert_eq!(render_or_fallback("HTML", 0, &ok, |e| e.render()), "<p>fine</p>");
    }
}
