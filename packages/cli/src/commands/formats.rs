use anyhow::Result;
use colored::Colorize;
use folio_export::ExportRegistry;

pub fn formats() -> Result<()> {
    let registry = ExportRegistry::new();

    println!("{}", "Available export formats:".bright_blue().bold());
    for info in registry.available_formats() {
        println!(
            "  {} {:<10} {} (.{})",
            "•".green(),
            info.key,
            info.name,
            info.extension
        );
    }

    Ok(())
}
