use crate::context::{Context, ExportOptions};
use crate::strategy::{render_or_fallback, ExportStrategy};
use crate::ExportError;
use folio_editor::{Document, Renderable};

/// Full HTML page built from each element's own markup
#[derive(Debug, Clone, Default)]
pub struct HtmlExporter {
    options: ExportOptions,
}

impl HtmlExporter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn render(&self, document: &Document) -> String {
        let mut ctx = Context::new(self.options.clone());

        ctx.add_line("<!DOCTYPE html>");
        ctx.add_line("<html>");
        ctx.indent();

        compile_head(document, &mut ctx);

        ctx.add_line("<body>");
        ctx.indent();

        ctx.add_line(&format!("<h1>{}</h1>", document.title));
        ctx.add_line(&format!("<p><em>By {}</em></p>", document.author));
        if let Some(metadata) = document.metadata.as_deref().filter(|m| !m.is_empty()) {
            ctx.add_line(&format!("<p class=\"metadata\">{}</p>", metadata));
        }

        for (index, element) in document.elements().iter().enumerate() {
            let markup = render_or_fallback(self.format_name(), index, element, |e| e.render());
            ctx.add_line(&markup);
        }

        ctx.dedent();
        ctx.add_line("</body>");

        ctx.dedent();
        ctx.add_line("</html>");

        ctx.get_output()
    }
}

fn compile_head(document: &Document, ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line(&format!(
        "<meta name=\"author\" content=\"{}\">",
        document.author
    ));
    ctx.add_line(&format!("<title>{}</title>", document.title));

    ctx.dedent();
    ctx.add_line("</head>");
}

impl ExportStrategy for HtmlExporter {
    fn export(&self, document: &Document) -> Result<Vec<u8>, ExportError> {
        Ok(self.render(document).into_bytes())
    }

    fn format_name(&self) -> &'static str {
        "HTML"
    }

    fn file_extension(&self) -> &'static str {
        "html"
    }
}
