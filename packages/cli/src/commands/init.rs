use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;

pub const EXAMPLE_DRAFT_NAME: &str = "document.json";

const EXAMPLE_DRAFT: &str = r#"{
  "title": "Getting Started",
  "author": "Folio",
  "metadata": "example",
  "elements": [
    { "type": "heading", "content": "Welcome", "level": 1 },
    { "type": "paragraph", "content": "Edit this file, then run folio export.", "styles": ["italic"] },
    { "type": "list", "items": ["Write", "Export", "Share"], "ordered": true },
    { "type": "code", "content": "folio export document.json --format pdf", "language": "sh" }
  ]
}
"#;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Default export format (html, markdown, pdf)
    #[arg(short = 'F', long, default_value = "html")]
    pub format: String,

    /// Output directory
    #[arg(short, long, default_value = "dist")]
    pub out_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Folio project...".bright_blue().bold());

    let example_file = cwd.join(EXAMPLE_DRAFT_NAME);
    if !example_file.exists() {
        fs::write(&example_file, EXAMPLE_DRAFT)?;
        println!("  {} Created {}", "✓".green(), EXAMPLE_DRAFT_NAME);
    }

    let config = Config {
        default_format: args.format.trim().to_lowercase(),
        out_dir: args.out_dir.clone(),
        ..Config::default()
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}", EXAMPLE_DRAFT_NAME);
    println!("  2. Run: folio export {}", EXAMPLE_DRAFT_NAME);
    println!("  3. Check output in {}/", args.out_dir);

    Ok(())
}
