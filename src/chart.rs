// src/chart.rs

use anyhow::{Context, Result};
use chrono::Local;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;

const API_BASE: &str = "https://api.datawrapper.de/v3";

/// Returned when a publish succeeds but the response carries no public URL.
pub const PUBLIC_URL_PLACEHOLDER: &str = "URL not available";

/// Timestamp format for the "Last updated" note. Kept exactly as the chart
/// has always displayed it, including the literal UTC suffix.
const NOTE_TIMESTAMP_FORMAT: &str = "%B %d, %Y at %I:%M %p UTC";

fn data_url(chart_id: &str) -> String {
    format!("{}/charts/{}/data", API_BASE, chart_id)
}

fn chart_url(chart_id: &str) -> String {
    format!("{}/charts/{}", API_BASE, chart_id)
}

fn publish_url(chart_id: &str) -> String {
    format!("{}/charts/{}/publish", API_BASE, chart_id)
}

fn note_payload(timestamp: &str) -> serde_json::Value {
    json!({
        "metadata": {
            "annotate": {
                "notes": format!("Last updated: {}", timestamp)
            }
        }
    })
}

#[derive(Deserialize)]
struct PublishResponse {
    data: Option<PublishData>,
}

#[derive(Deserialize)]
struct PublishData {
    #[serde(rename = "publicUrl")]
    public_url: Option<String>,
}

/// Pull `data.publicUrl` out of a publish response body. The publish already
/// succeeded by status code at this point, so a missing field or an
/// unexpected body shape degrades to the placeholder rather than failing.
fn extract_public_url(body: &str) -> String {
    serde_json::from_str::<PublishResponse>(body)
        .ok()
        .and_then(|resp| resp.data)
        .and_then(|data| data.public_url)
        .unwrap_or_else(|| PUBLIC_URL_PLACEHOLDER.to_string())
}

/// Replace the chart's dataset with the given CSV text. The CSV is passed
/// through opaquely; Datawrapper does its own parsing. Returns the response
/// status for the caller to log.
pub async fn upload_data(client: &Client, cfg: &Config, csv: String) -> Result<StatusCode> {
    let url = data_url(&cfg.chart_id);
    let resp = client
        .put(&url)
        .bearer_auth(&cfg.api_key)
        .header(header::CONTENT_TYPE, "text/csv")
        .body(csv)
        .send()
        .await
        .with_context(|| format!("PUT {}", url))?
        .error_for_status()
        .with_context(|| format!("uploading data to chart {}", cfg.chart_id))?;

    Ok(resp.status())
}

/// Stamp the chart's annotation notes with the current local time. Partial
/// update: only the notes field is sent, everything else is left untouched.
/// Returns the timestamp that was written.
pub async fn update_metadata(client: &Client, cfg: &Config) -> Result<String> {
    let timestamp = Local::now().format(NOTE_TIMESTAMP_FORMAT).to_string();
    let url = chart_url(&cfg.chart_id);

    client
        .patch(&url)
        .bearer_auth(&cfg.api_key)
        .json(&note_payload(&timestamp))
        .send()
        .await
        .with_context(|| format!("PATCH {}", url))?
        .error_for_status()
        .with_context(|| format!("updating metadata of chart {}", cfg.chart_id))?;

    Ok(timestamp)
}

/// Republish the chart so the uploaded data goes live, and return its public
/// URL (or [`PUBLIC_URL_PLACEHOLDER`] when the response omits it).
pub async fn publish(client: &Client, cfg: &Config) -> Result<String> {
    let url = publish_url(&cfg.chart_id);
    let body = client
        .post(&url)
        .bearer_auth(&cfg.api_key)
        .send()
        .await
        .with_context(|| format!("POST {}", url))?
        .error_for_status()
        .with_context(|| format!("publishing chart {}", cfg.chart_id))?
        .text()
        .await
        .with_context(|| format!("reading publish response for chart {}", cfg.chart_id))?;

    Ok(extract_public_url(&body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls() {
        assert_eq!(
            data_url("kg7Xj"),
            "https://api.datawrapper.de/v3/charts/kg7Xj/data"
        );
        assert_eq!(chart_url("kg7Xj"), "https://api.datawrapper.de/v3/charts/kg7Xj");
        assert_eq!(
            publish_url("kg7Xj"),
            "https://api.datawrapper.de/v3/charts/kg7Xj/publish"
        );
    }

    #[test]
    fn note_payload_shape() {
        let payload = note_payload("August 27, 2026 at 09:15 AM UTC");
        assert_eq!(
            payload["metadata"]["annotate"]["notes"],
            "Last updated: August 27, 2026 at 09:15 AM UTC"
        );
        // Partial update: nothing but the notes field may be present.
        assert_eq!(payload["metadata"]["annotate"].as_object().unwrap().len(), 1);
        assert_eq!(payload["metadata"].as_object().unwrap().len(), 1);
        assert_eq!(payload.as_object().unwrap().len(), 1);
    }

    #[test]
    fn extracts_public_url_when_present() {
        let body = r#"{"data": {"publicUrl": "https://example.com/chart1"}}"#;
        assert_eq!(extract_public_url(body), "https://example.com/chart1");
    }

    #[test]
    fn placeholder_when_public_url_missing() {
        assert_eq!(
            extract_public_url(r#"{"data": {}}"#),
            PUBLIC_URL_PLACEHOLDER
        );
        assert_eq!(extract_public_url(r#"{}"#), PUBLIC_URL_PLACEHOLDER);
    }

    #[test]
    fn placeholder_when_body_is_not_json() {
        assert_eq!(extract_public_url("published"), PUBLIC_URL_PLACEHOLDER);
    }
}
