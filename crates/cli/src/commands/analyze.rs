//! Decision analysis and email report commands

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::client::{AnalyzeRequest, AnalyzeResponse, ApiClient, DecisionRecord, EmailResponse};
use crate::output::{
    color_status, print_json, print_success, print_warning, render_table, FieldRow, OutputFormat,
};

const STATUSES: [&str; 4] = ["GOOD", "WARNING", "CRITICAL", "ERROR"];

fn record_rows(record: &DecisionRecord) -> Vec<FieldRow> {
    vec![
        FieldRow::new("Status", color_status(&record.status)),
        FieldRow::new("Reason", record.reason.clone()),
        FieldRow::new("Immediate action", record.immediate_action.clone()),
        FieldRow::new("Long-term", record.long_term_recommendation.clone()),
    ]
}

/// Run an AI decision analysis for a domain
pub async fn analyze(client: &ApiClient, domain: &str, format: OutputFormat) -> Result<()> {
    let request = AnalyzeRequest {
        domain: domain.to_string(),
    };
    let response: AnalyzeResponse = client.post("api/analyze", Some(&request)).await?;

    match format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Table => {
            println!("{} ({})", "AI Decision".bold(), response.domain);
            if response.record.status.eq_ignore_ascii_case("ERROR") {
                print_warning("Analysis unavailable, showing the degraded record");
            }
            println!("{}", render_table(record_rows(&response.record)));
        }
    }

    Ok(())
}

/// Read a decision record from a JSON file
pub fn read_record(path: &Path) -> Result<DecisionRecord> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let record: DecisionRecord = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a decision record", path.display()))?;

    let status = record.status.trim().to_ascii_uppercase();
    if !STATUSES.contains(&status.as_str()) {
        anyhow::bail!(
            "{} has unknown status '{}' (expected one of {})",
            path.display(),
            record.status,
            STATUSES.join(", ")
        );
    }
    Ok(record)
}

/// Email a decision report; the service analyses first when no record is given
pub async fn send_email(
    client: &ApiClient,
    from_file: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let record = from_file.map(read_record).transpose()?;
    let response: EmailResponse = client.post("api/email", record.as_ref()).await?;

    match format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Table => {
            if response.delivered {
                print_success(&response.message);
            } else {
                print_warning(&response.message);
            }
        }
    }

    Ok(())
}
