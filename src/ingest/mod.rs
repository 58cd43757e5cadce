use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::{config::Config, error::PipelineError};

pub mod parser;
pub mod sheet;

pub use parser::{LoadedSheet, parse_sheet};

/// One row of the source table, cells as read.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Operation_Date")]
    pub operation_date: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Payment_Amount")]
    pub payment_amount: String,
}

pub const REQUIRED_COLUMNS: [&str; 4] = ["Status", "Operation_Date", "Category", "Payment_Amount"];

/// Fetches the configured sheet and parses it, skipping malformed rows.
#[tracing::instrument(skip_all, fields(sheet = %config.sheet_name))]
pub async fn load(client: &Client, config: &Config) -> Result<LoadedSheet, PipelineError> {
    let body = sheet::fetch_sheet(client, config).await?;
    let loaded = parse_sheet(&body)?;

    info!(
        rows = loaded.rows.len(),
        skipped = loaded.skipped.len(),
        "loaded sheet"
    );

    Ok(loaded)
}
