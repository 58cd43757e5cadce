use reqwest::Client;

use crate::{config::Config, error::PipelineError};

/// Path of the CSV export of a spreadsheet; the sheet is selected with the
/// `sheet` query parameter.
pub fn sheet_url(base_url: &str, sheet_id: &str) -> String {
    format!(
        "{base}/spreadsheets/d/{sheet_id}/gviz/tq",
        base = base_url.trim_end_matches('/')
    )
}

#[tracing::instrument(skip_all)]
pub async fn fetch_sheet(client: &Client, config: &Config) -> Result<String, PipelineError> {
    let url = sheet_url(&config.sheet_base_url, &config.sheet_id);

    let res = client
        .get(&url)
        .query(&[("tqx", "out:csv"), ("sheet", config.sheet_name.as_str())])
        .send()
        .await
        .map_err(|source| PipelineError::Retrieval {
            url: url.clone(),
            source,
        })?;

    let status = res.status();
    if !status.is_success() {
        return Err(PipelineError::RetrievalStatus { url, status });
    }

    res.text()
        .await
        .map_err(|source| PipelineError::Retrieval { url, source })
}
