//! One-shot jobs run against the configured database.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use eventboard_http::Settings;
use eventboard_service::{EventService, ImportService};

use crate::commands::serve::build_state;
use crate::open_storage;

fn preview_filename(today: NaiveDate) -> PathBuf {
    PathBuf::from(format!("preview-email-{}.html", today.format("%Y-%m")))
}

pub(crate) async fn run_import(data_dir: Option<PathBuf>) -> Result<ExitCode> {
    let data_dir = data_dir.unwrap_or_else(|| Settings::from_env().import_data_dir);
    let storage = open_storage().await?;
    let events = Arc::new(EventService::new(Arc::clone(&storage)));
    let summary = ImportService::new(storage, events)
        .run_import(&data_dir, Utc::now().date_naive())
        .await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(ExitCode::SUCCESS)
}

pub(crate) async fn run_newsletter() -> Result<ExitCode> {
    let state = build_state(open_storage().await?, Settings::from_env())?;
    let summary = state.newsletter_service.run_newsletter(Utc::now().date_naive()).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(if summary.has_errors() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

pub(crate) async fn run_preview(out: Option<PathBuf>) -> Result<ExitCode> {
    let today = Utc::now().date_naive();
    let settings = Settings::from_env();
    let website_url = settings.website_url.clone();
    let state = build_state(open_storage().await?, settings)?;
    let html = state.newsletter_service.preview_email(&website_url, today).await?;
    let out = out.unwrap_or_else(|| preview_filename(today));
    tokio::fs::write(&out, html).await?;
    tracing::info!(path = %out.display(), "preview email written");
    println!("{}", out.display());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_filename_uses_month() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(preview_filename(today), PathBuf::from("preview-email-2026-03.html"));
    }
}
