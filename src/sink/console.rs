use anyhow::Result;
use async_trait::async_trait;
use tabled::{builder::Builder, settings::Style};

use super::{Report, ReportingSink};

/// Prints a report to the action log.
pub struct ConsoleSink;

#[async_trait]
impl ReportingSink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn post(&self, report: &Report) -> Result<()> {
        println!();
        println!(
            "{}: {}",
            report.check_name,
            if report.failed { "FAILED" } else { "passed" }
        );

        if report.tables.is_empty() {
            println!("No issues found.");
        }

        for summary in &report.tables {
            println!();
            println!("{}", summary.title);

            let mut builder = Builder::default();
            builder.push_record(summary.header.clone());
            for row in &summary.rows {
                builder.push_record(row.clone());
            }
            let table = builder.build().with(Style::rounded()).to_string();
            println!("{}", table);
        }

        for warning in &report.warnings {
            println!("warning: {}", warning);
        }

        Ok(())
    }
}
