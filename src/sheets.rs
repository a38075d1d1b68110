// src/sheets.rs

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use url::Url;

/// Extract the sheet ID from a Google Sheets sharing URL.
/// Format: `https://docs.google.com/spreadsheets/d/SHEET_ID/edit...`
/// The ID is everything between `/d/` and the next `/` (or end of string).
pub fn sheet_id(sheet_url: &str) -> Result<&str> {
    let rest = sheet_url
        .split_once("/d/")
        .map(|(_, rest)| rest)
        .ok_or_else(|| anyhow!("invalid Google Sheets URL format: {}", sheet_url))?;
    Ok(rest.split('/').next().unwrap_or(rest))
}

/// Build the CSV export URL for a sheet ID. Returns the first tab as CSV.
pub fn export_url(sheet_id: &str) -> Result<Url> {
    let url = format!(
        "https://docs.google.com/spreadsheets/d/{}/export?format=csv",
        sheet_id
    );
    Url::parse(&url).with_context(|| format!("building export URL for sheet {}", sheet_id))
}

/// Derive the export URL from a sharing URL and download the sheet as CSV
/// text. A URL without a `/d/` segment fails before any request is made.
pub async fn fetch_csv(client: &Client, sheet_url: &str) -> Result<String> {
    let id = sheet_id(sheet_url)?;
    let csv_url = export_url(id)?;

    let csv = client
        .get(csv_url.clone())
        .send()
        .await
        .with_context(|| format!("GET {}", csv_url))?
        .error_for_status()
        .with_context(|| format!("fetching CSV export for sheet {}", id))?
        .text()
        .await
        .with_context(|| format!("reading CSV body from {}", csv_url))?;

    Ok(csv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_from_edit_url() {
        let url = "https://docs.google.com/spreadsheets/d/ABC123/edit#gid=0";
        assert_eq!(sheet_id(url).unwrap(), "ABC123");
    }

    #[test]
    fn extracts_id_without_trailing_slash() {
        let url = "https://docs.google.com/spreadsheets/d/ABC123";
        assert_eq!(sheet_id(url).unwrap(), "ABC123");
    }

    #[test]
    fn rejects_url_without_id_marker() {
        let err = sheet_id("https://docs.google.com/spreadsheets/ABC123").unwrap_err();
        assert!(err.to_string().contains("invalid Google Sheets URL"));
    }

    #[test]
    fn derives_export_url() {
        let url = export_url("ABC123").unwrap();
        assert_eq!(
            url.as_str(),
            "https://docs.google.com/spreadsheets/d/ABC123/export?format=csv"
        );
    }

    #[tokio::test]
    async fn fetch_fails_fast_on_malformed_url() {
        // No request should be attempted; the error is the format error.
        let client = Client::new();
        let err = fetch_csv(&client, "https://example.com/nothing-here")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid Google Sheets URL"));
    }
}
