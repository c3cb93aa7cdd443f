mod rows;

pub use rows::*;

use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::UpstreamError;

/// Thin wrapper over the spreadsheet values API. Reads and appends never
/// surface errors to callers: a failed read is an empty sheet, a failed
/// append is `None`.
#[derive(Clone)]
pub struct SheetsClient {
    client: Client,
    api_base: String,
    spreadsheet_id: String,
    api_key: String,
}

impl SheetsClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_base: config.sheets_api_base.clone(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            api_key: config.sheets_api_key.clone(),
        }
    }

    pub async fn read(&self, worksheet: &str, range: Option<&str>) -> Vec<Vec<String>> {
        match self.try_read(worksheet, range).await {
            Ok(rows) => rows,
            Err(e) => {
                error!("Error fetching sheet data from {}: {}", worksheet, e);
                Vec::new()
            }
        }
    }

    pub async fn append(&self, worksheet: &str, row: &[String]) -> Option<Value> {
        match self.try_append(worksheet, row).await {
            Ok(body) => Some(body),
            Err(e) => {
                error!("Error appending to sheet {}: {}", worksheet, e);
                None
            }
        }
    }

    async fn try_read(
        &self,
        worksheet: &str,
        range: Option<&str>,
    ) -> Result<Vec<Vec<String>>, UpstreamError> {
        let target = match range.filter(|r| !r.is_empty()) {
            Some(range) => format!("{}!{}", worksheet, range),
            None => worksheet.to_string(),
        };
        let url = self.values_url(&target, &[])?;
        debug!("Reading sheet range {}", target);

        let text = self.client.get(url).send().await?.text().await?;
        let body: Value = serde_json::from_str(&text)?;
        Ok(values_from_body(&body))
    }

    async fn try_append(&self, worksheet: &str, row: &[String]) -> Result<Value, UpstreamError> {
        let url = self.values_url(
            &format!("{}:append", worksheet),
            &[("valueInputOption", "RAW")],
        )?;
        let body = serde_json::json!({ "values": [row] });

        let text = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await?
            .text()
            .await?;
        Ok(serde_json::from_str(&text)?)
    }

    fn values_url(&self, target: &str, extra: &[(&str, &str)]) -> Result<Url, UpstreamError> {
        let mut url =
            Url::parse(&self.api_base).map_err(|_| UpstreamError::Url(self.api_base.clone()))?;
        url.path_segments_mut()
            .map_err(|_| UpstreamError::Url(self.api_base.clone()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", target]);
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in extra {
                query.append_pair(key, value);
            }
            query.append_pair("key", &self.api_key);
        }
        Ok(url)
    }
}

/// Pulls the `values` block out of a values API response. Anything that is
/// not an array of arrays is treated as no data.
fn values_from_body(body: &Value) -> Vec<Vec<String>> {
    let Some(rows) = body.get("values").and_then(Value::as_array) else {
        return Vec::new();
    };
    rows.iter()
        .filter_map(Value::as_array)
        .map(|row| row.iter().map(cell_text).collect())
        .collect()
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
