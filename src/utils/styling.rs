//! Terminal styling utilities for the pipeline CLI

use console::{style, Emoji};
use std::path::Path;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
     ██████╗██████╗ ███████╗██████╗  ██████╗
    ██╔════╝██╔══██╗██╔════╝██╔══██╗██╔═══██╗
    ██║     ██████╔╝█████╗  ██║  ██║██║   ██║
    ██║     ██╔══██╗██╔══╝  ██║  ██║██║   ██║
    ╚██████╗██║  ██║███████╗██████╔╝╚██████╔╝
     ╚═════╝╚═╝  ╚═╝╚══════╝╚═════╝  ╚═════╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {}",
        style("Baseline credit-decisioning pipeline").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the pipeline configuration card
pub fn print_config(raw: &Path, processed: &Path, model_dir: &Path) {
    println!(
        "    {} Raw input:  {}",
        FOLDER,
        style(truncate_path(raw, 44)).dim()
    );
    println!(
        "    {} Processed:  {}",
        CHART,
        style(truncate_path(processed, 44)).dim()
    );
    println!(
        "    {} Model dir:  {}",
        SAVE,
        style(truncate_path(model_dir, 44)).dim()
    );
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(info) = detail {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!(
            "      Found {} {}",
            style(count).yellow().bold(),
            description
        );
    }
}

/// Print the elapsed time of a pipeline step
pub fn print_step_time(elapsed: std::time::Duration) {
    println!(
        "      {}",
        style(format!("⏱ {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Credo pipeline complete!").green().bold()
    );
    println!();
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    // Count chars, not bytes: slicing at a byte offset panics on
    // multibyte path components.
    let n_chars = s.chars().count();
    if n_chars <= max_len {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(n_chars + 3 - max_len).collect();
        format!("...{}", tail)
    }
}
