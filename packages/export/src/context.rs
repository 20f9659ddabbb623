/// Options for text-based exporters
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Pretty print markup
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

impl ExportOptions {
    /// Single-line output with no indentation
    pub fn compact() -> Self {
        Self {
            pretty: false,
            indent: String::new(),
        }
    }
}

/// Indentation-aware output buffer
pub(crate) struct Context {
    options: ExportOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    pub(crate) fn new(options: ExportOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    pub(crate) fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub(crate) fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    pub(crate) fn indent(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    pub(crate) fn get_output(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_output_indents() {
        let mut ctx = Context::new(ExportOptions::default());
        ctx.add_line("<a>");
        ctx.indent();
        ctx.add_line("<b/>");
        ctx.dedent();
        ctx.dedent();
        ctx.add_line("</a>");
        assert_eq!(ctx.get_output(), "<a>\n  <b/>\n</a>\n");
    }

    #[test]
    fn test_compact_output() {
        let mut ctx = Context::new(ExportOptions::compact());
        ctx.add_line("<a>");
        ctx.indent();
        ctx.add_line("<b/>");
        ctx.dedent();
        ctx.add_line("</a>");
        assert_eq!(ctx.get_output(), "<a><b/></a>");
    }
}
