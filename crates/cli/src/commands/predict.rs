//! Delivery time prediction command

use anyhow::Result;
use colored::Colorize;

use crate::client::{ApiClient, PredictRequest, PredictResponse};
use crate::output::{print_json, render_table, FieldRow, OutputFormat};

/// Predict the delivery time for one order
pub async fn predict(client: &ApiClient, request: PredictRequest, format: OutputFormat) -> Result<()> {
    let response: PredictResponse = client.post("api/predict", Some(&request)).await?;

    match format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Table => {
            println!("{}", "Estimated Delivery Time".bold());
            println!("{}", response.display.cyan().bold());
            println!();

            let rows = vec![
                FieldRow::new("Partner age", request.age.to_string()),
                FieldRow::new("Partner rating", format!("{:.1}", request.rating)),
                FieldRow::new("Distance", format!("{} km", request.distance)),
                FieldRow::new("Order type", request.order_type),
                FieldRow::new("Vehicle type", request.vehicle_type),
                FieldRow::new("Model", response.model_version),
            ];
            println!("{}", render_table(rows));
        }
    }

    Ok(())
}
