use super::export::load_draft;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use folio_editor::{DocumentComponent, OutlineNode};
use folio_workspace::Workspace;
use std::path::Path;

#[derive(Debug, Args)]
pub struct StructureArgs {
    /// Draft file to inspect
    pub path: String,

    /// Print the outline as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn structure(args: StructureArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let workspace = Workspace::new(config.workspace_config());

    let document_id = load_draft(&workspace, &cwd.join(&args.path))?;
    let outline = workspace.structure(&document_id)?.outline();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outline)?);
    } else {
        print!("{}", format_outline(&outline));
    }

    Ok(())
}

/// Indented tree, one node per line
pub fn format_outline(node: &OutlineNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &OutlineNode, out: &mut String) {
    let indent = "  ".repeat(node.level);
    let line = if node.kind == "section" {
        format!("{}{} {}", indent, "§".bright_blue(), node.name.bold())
    } else {
        format!("{}{} {}", indent, node.kind.dimmed(), node.name)
    };
    out.push_str(&line);
    out.push('\n');

    for child in &node.children {
        write_node(child, out);
    }
}
