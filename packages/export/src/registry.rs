use crate::context::ExportOptions;
use crate::html::HtmlExporter;
use crate::markdown::MarkdownExporter;
use crate::pdf::PdfExporter;
use crate::strategy::ExportStrategy;
use crate::ExportError;
use folio_editor::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A selectable export format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Lookup key, e.g. `"markdown"`
    pub key: String,
    pub name: String,
    pub extension: String,
}

/// Result of running an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub format_name: String,
    pub extension: String,
    pub bytes: Vec<u8>,
}

impl ExportedDocument {
    /// File name derived from the document title
    pub fn file_name(&self, title: &str) -> String {
        let stem: String = title
            .trim()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let stem = if stem.is_empty() { "document".to_string() } else { stem };
        format!("{}.{}", stem, self.extension)
    }
}

/// Strategies by format key, plus aliases
#[derive(Clone)]
pub struct ExportRegistry {
    strategies: BTreeMap<String, Arc<dyn ExportStrategy>>,
    aliases: BTreeMap<String, String>,
}

impl ExportRegistry {
    /// Empty registry
    pub fn empty() -> Self {
        Self {
            strategies: BTreeMap::new(),
            aliases: BTreeMap::new(),
        }
    }

    /// Registry with HTML, Markdown (`md`) and PDF
    pub fn new() -> Self {
        Self::with_options(ExportOptions::default())
    }

    pub fn with_options(options: ExportOptions) -> Self {
        let mut registry = Self::empty();
        registry.register("html", Arc::new(HtmlExporter::new(options)));
        registry.register("markdown", Arc::new(MarkdownExporter::new()));
        registry.alias("md", "markdown");
        registry.register("pdf", Arc::new(PdfExporter::new()));
        registry
    }

    pub fn register(&mut self, key: &str, strategy: Arc<dyn ExportStrategy>) {
        self.strategies.insert(key.to_lowercase(), strategy);
    }

    pub fn alias(&mut self, alias: &str, key: &str) {
        self.aliases.insert(alias.to_lowercase(), key.to_lowercase());
    }

    /// Look up a strategy by name (case-insensitive)
    pub fn strategy_for(&self, name: &str) -> Result<Arc<dyn ExportStrategy>, ExportError> {
        let key = name.trim().to_lowercase();
        let key = self.aliases.get(&key).cloned().unwrap_or(key);

        self.strategies
            .get(&key)
            .cloned()
            .ok_or_else(|| ExportError::UnsupportedFormat(name.to_string()))
    }

    pub fn export(&self, name: &str, document: &Document) -> Result<ExportedDocument, ExportError> {
        let strategy = self.strategy_for(name)?;
        let bytes = strategy.export(document)?;

        Ok(ExportedDocument {
            format_name: strategy.format_name().to_string(),
            extension: strategy.file_extension().to_string(),
            bytes,
        })
    }

    pub fn available_formats(&self) -> Vec<FormatInfo> {
        self.strategies
            .iter()
            .map(|(key, strategy)| FormatInfo {
                key: key.clone(),
                name: strategy.format_name().to_string(),
                extension: strategy.file_extension().to_string(),
            })
            .collect()
    }
}

impl Default for ExportRegistry {
    fn default() -> Self {
        Self::new()
    }
}
