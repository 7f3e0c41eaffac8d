//! Export command
//!
//! Dumps every stored hit in its native record shape, as JSON or CSV.
//! The store yields the records; all formatting happens here.

use colored::Colorize;
use std::sync::Arc;

use crate::cli::{CliError, ExportFormat};
use crate::storage::{Hit, SeaOrmStorage};

pub async fn export_hits(
    storage: Arc<SeaOrmStorage>,
    file_path: Option<String>,
    site: Option<String>,
    format: ExportFormat,
) -> Result<(), CliError> {
    let hits = storage
        .export_hits(site.as_deref())
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to export hits: {}", e)))?;

    let output = match format {
        ExportFormat::Json => serde_json::to_string_pretty(&hits)
            .map_err(|e| CliError::CommandError(format!("JSON serialization failed: {}", e)))?,
        ExportFormat::Csv => to_csv(&hits)?,
    };

    match file_path {
        Some(path) => {
            std::fs::write(&path, output)
                .map_err(|e| CliError::CommandError(format!("Failed to write {}: {}", path, e)))?;
            println!(
                "{} Exported {} hits to {}",
                "✓".bold().green(),
                hits.len().to_string().green(),
                path.cyan()
            );
        }
        None => println!("{}", output),
    }
    Ok(())
}

fn to_csv(hits: &[Hit]) -> Result<String, CliError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record([
            "id",
            "site_id",
            "type",
            "ts",
            "url",
            "title",
            "referrer",
            "visitor_id",
            "session_id",
            "duration_ms",
            "scroll_max",
            "device_type",
            "browser",
            "os",
            "lang",
            "tz",
            "country_hint",
            "channel",
            "utm_source",
            "utm_medium",
            "utm_campaign",
            "utm_term",
            "utm_content",
            "event_name",
            "event_props",
        ])
        .map_err(|e| CliError::CommandError(format!("CSV write failed: {}", e)))?;

    for h in hits {
        let ts = h.ts.to_string();
        let duration_ms = h.duration_ms.map(|d| d.to_string()).unwrap_or_default();
        let scroll_max = h.scroll_max.map(|s| s.to_string()).unwrap_or_default();
        let event_props = h
            .event_props
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default();
        writer
            .write_record([
                h.id.as_str(),
                h.site_id.as_str(),
                h.hit_type.as_str(),
                ts.as_str(),
                h.url.as_str(),
                h.title.as_str(),
                h.referrer.as_str(),
                h.visitor_id.as_str(),
                h.session_id.as_str(),
                duration_ms.as_str(),
                scroll_max.as_str(),
                h.device_type.as_str(),
                h.browser.as_str(),
                h.os.as_str(),
                h.lang.as_str(),
                h.tz.as_str(),
                h.country_hint.as_str(),
                h.channel.as_str(),
                h.utm_source.as_deref().unwrap_or(""),
                h.utm_medium.as_deref().unwrap_or(""),
                h.utm_campaign.as_deref().unwrap_or(""),
                h.utm_term.as_deref().unwrap_or(""),
                h.utm_content.as_deref().unwrap_or(""),
                h.event_name.as_deref().unwrap_or(""),
                event_props.as_str(),
            ])
            .map_err(|e| CliError::CommandError(format!("CSV write failed: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CliError::CommandError(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| CliError::CommandError(format!("CSV encoding: {}", e)))
}
