use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use folio_export::ExportRegistry;
use folio_workspace::{DocumentDraft, Workspace};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Draft file or directory of drafts
    #[arg(default_value = ".")]
    pub path: String,

    /// Output format (html, markdown, md, pdf); defaults to the config value
    #[arg(short, long)]
    pub format: Option<String>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,
}

pub fn export(args: ExportArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let format = args
        .format
        .clone()
        .unwrap_or_else(|| config.default_format.clone());

    let registry = ExportRegistry::with_options(config.export_options());
    // Fail on an unknown format before touching any files
    registry
        .strategy_for(&format)
        .map_err(|_| anyhow!("Unknown format: {}", format))?;
    let workspace = Workspace::new(config.workspace_config()).with_exports(registry);

    let input = cwd.join(&args.path);
    let drafts = find_drafts(&input)?;
    if drafts.is_empty() {
        println!("{}", "⚠️  No draft files found".yellow());
        return Ok(());
    }

    if !args.stdout {
        println!("{}", "📄 Exporting Folio documents...".bright_blue().bold());
        println!("Found {} files", drafts.len());
    }

    let out_dir = match &args.out_dir {
        Some(out) => cwd.join(out),
        None => config.get_out_dir(cwd),
    };

    let mut success_count = 0;
    let mut error_count = 0;

    for draft_file in &drafts {
        let relative_path = draft_file.strip_prefix(cwd).unwrap_or(draft_file);
        match export_file(&workspace, draft_file, &format, &args, &out_dir) {
            Ok(output_path) => {
                success_count += 1;
                if !args.stdout {
                    println!(
                        "  {} {} → {}",
                        "✓".green(),
                        relative_path.display(),
                        output_path
                    );
                }
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative_path.display(),
                    e.to_string().red()
                );
            }
        }
    }

    if args.stdout {
        return Ok(());
    }

    println!();
    if error_count == 0 {
        println!(
            "{} Exported {} files successfully",
            "✅".green(),
            success_count
        );
    } else {
        println!(
            "{} Exported {} files, {} errors",
            "⚠️".yellow(),
            success_count,
            error_count
        );
    }

    Ok(())
}

/// JSON drafts under `path`, skipping the config file
pub fn find_drafts(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.exists() {
        return Err(anyhow!("Input path does not exist: {}", path.display()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let is_json = path.extension().and_then(|s| s.to_str()) == Some("json");
        let is_config = path.file_name().and_then(|s| s.to_str()) == Some(DEFAULT_CONFIG_NAME);
        if path.is_file() && is_json && !is_config {
            files.push(path.to_path_buf());
        }
    }
    files.sort();

    Ok(files)
}

/// Read a draft file into a document inside `workspace`
pub fn load_draft(workspace: &Workspace, file_path: &Path) -> Result<String> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("reading {}", file_path.display()))?;
    let draft = DocumentDraft::from_json(&source)
        .with_context(|| format!("parsing {}", file_path.display()))?;
    let document = workspace.create_from_draft(&draft)?;
    Ok(document.id)
}

fn export_file(
    workspace: &Workspace,
    file_path: &Path,
    format: &str,
    args: &ExportArgs,
    out_dir: &Path,
) -> Result<String> {
    let document_id = load_draft(workspace, file_path)?;
    let document = workspace.get_document(&document_id)?;
    let exported = workspace.export(&document_id, format)?;

    if args.stdout {
        std::io::stdout().write_all(&exported.bytes)?;
        return Ok("stdout".to_string());
    }

    fs::create_dir_all(out_dir)?;
    let output_file = out_dir.join(exported.file_name(&document.title));
    fs::write(&output_file, &exported.bytes)?;

    Ok(output_file.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAFT: &str = r#"{
        "title": "Release Notes",
        "author": "Ada",
        "elements": [{ "type": "paragraph", "content": "Shipped" }]
    }"#;

    fn args(format: Option<&str>) -> ExportArgs {
        ExportArgs {
            path: ".".to_string(),
            format: format.map(str::to_string),
            stdout: false,
            out_dir: None,
        }
    }

    #[test]
    fn test_find_drafts_skips_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), DRAFT).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{}").unwrap();

        let drafts = find_drafts(dir.path()).unwrap();
        assert_eq!(drafts, vec![dir.path().join("a.json")]);
    }

    #[test]
    fn test_export_writes_file_named_after_title() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.json"), DRAFT).unwrap();

        export(args(Some("md")), dir.path()).unwrap();

        let written = fs::read_to_string(dir.path().join("dist").join("Release_Notes.md")).unwrap();
        assert!(written.starts_with("# Release Notes\n\n**Author:** Ada\n\n"));
        assert!(written.contains("Shipped"));
    }

    #[test]
    fn test_export_uses_config_default_format() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "defaultFormat": "pdf", "outDir": "out" }"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.json"), DRAFT).unwrap();

        export(args(None), dir.path()).unwrap();

        let bytes = fs::read(dir.path().join("out").join("Release_Notes.pdf")).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
    }

    #[test]
    fn test_export_rejects_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.json"), DRAFT).unwrap();

        let err = export(args(Some("docx")), dir.path()).unwrap_err();
        assert!(err.to_string().contains("Unknown format: docx"));
        assert!(!dir.path().join("dist").exists());
    }
}
