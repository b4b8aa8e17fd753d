//! Pipeline run summary

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// Summary of a full normalize → quality → train run
#[derive(Debug, Default)]
pub struct PipelineSummary {
    pub raw_rows: usize,
    pub processed_rows: usize,
    pub excluded_rows: usize,
    pub n_features: usize,
    pub val_auc: Option<f64>,
    pub val_brier: Option<f64>,
    pub normalize_time: Duration,
    pub quality_time: Duration,
    pub train_time: Duration,
}

impl PipelineSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_time(&self) -> Duration {
        self.normalize_time + self.quality_time + self.train_time
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("PIPELINE SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Raw rows"),
            Cell::new(self.raw_rows),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Excluded rows"),
            Cell::new(self.excluded_rows).fg(if self.excluded_rows == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        table.add_row(vec![
            Cell::new("✅ Processed rows"),
            Cell::new(self.processed_rows)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("🧮 Encoded features"),
            Cell::new(self.n_features),
        ]);

        if let Some(auc) = self.val_auc {
            table.add_row(vec![
                Cell::new("📈 Validation AUC"),
                Cell::new(format!("{:.4}", auc))
                    .fg(auc_color(auc))
                    .add_attribute(Attribute::Bold),
            ]);
        }
        if let Some(brier) = self.val_brier {
            table.add_row(vec![
                Cell::new("🎯 Validation Brier"),
                Cell::new(format!("{:.4}", brier)),
            ]);
        }

        table.add_row(vec![
            Cell::new("⏱ Total time"),
            Cell::new(format!("{:.2}s", self.total_time().as_secs_f64())),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}

fn auc_color(auc: f64) -> Color {
    if auc > 0.7 {
        Color::Green
    } else if auc > 0.6 {
        Color::Yellow
    } else {
        Color::Red
    }
}
