//! Monthly newsletter trigger for a weekly Saturday schedule.
//!
//! Only the second-to-last Saturday of the month does anything; the API may
//! be asleep on a free host, so it is polled awake before the send.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use eventboard_core::{env_non_empty, env_parse_with_default, is_second_to_last_saturday, NewsletterSummary};

const DEFAULT_HEALTH_POLL_TIMEOUT_SECS: u64 = 300;
const INITIAL_DELAY: Duration = Duration::from_secs(5);
const MAX_DELAY: Duration = Duration::from_secs(60);
const HEALTH_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const NEWSLETTER_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Poll `{api_url}/health` until it answers 200 or `max_wait` worth of delays has elapsed.
///
/// Delays start at `initial_delay` and double up to `MAX_DELAY`.
pub(crate) async fn poll_health(
    client: &reqwest::Client,
    api_url: &str,
    max_wait: Duration,
    initial_delay: Duration,
) -> bool {
    let url = format!("{api_url}/health");
    let mut delay = initial_delay;
    let mut elapsed = Duration::ZERO;
    tracing::info!(%url, timeout_secs = max_wait.as_secs(), "polling API health");

    while elapsed < max_wait {
        match client.get(&url).timeout(HEALTH_REQUEST_TIMEOUT).send().await {
            Ok(resp) if resp.status() == reqwest::StatusCode::OK => {
                tracing::info!(elapsed_secs = elapsed.as_secs(), "API is up");
                return true;
            },
            Ok(resp) => {
                tracing::warn!(elapsed_secs = elapsed.as_secs(), status = %resp.status(), "health check not ready");
            },
            Err(e) => {
                tracing::warn!(elapsed_secs = elapsed.as_secs(), error = %e, "health check failed");
            },
        }
        tokio::time::sleep(delay).await;
        elapsed += delay;
        delay = (delay * 2).min(MAX_DELAY);
    }
    false
}

pub(crate) async fn trigger_newsletter(
    client: &reqwest::Client,
    api_url: &str,
    admin_secret: Option<&str>,
) -> Result<NewsletterSummary> {
    let mut request = client
        .post(format!("{api_url}/admin/newsletter"))
        .timeout(NEWSLETTER_REQUEST_TIMEOUT)
        .json(&serde_json::json!({}));
    if let Some(secret) = admin_secret {
        request = request.header("X-Admin-Secret", secret);
    }
    let response = request.send().await?.error_for_status()?;
    response.json().await.context("newsletter response was not a summary")
}

pub(crate) async fn run(today: NaiveDate) -> Result<ExitCode> {
    if !is_second_to_last_saturday(today) {
        println!(
            "Today is {today} ({}), not the second-to-last Saturday of the month. Nothing to do.",
            today.format("%A")
        );
        return Ok(ExitCode::SUCCESS);
    }
    tracing::info!(%today, "second-to-last Saturday, running newsletter");

    let Some(api_url) = env_non_empty("API_URL") else {
        bail!("API_URL environment variable is not set");
    };
    let api_url = api_url.trim_end_matches('/').to_owned();
    let admin_secret = env_non_empty("ADMIN_SECRET");
    let max_wait = Duration::from_secs(env_parse_with_default(
        "HEALTH_POLL_TIMEOUT",
        DEFAULT_HEALTH_POLL_TIMEOUT_SECS,
    ));

    let client = reqwest::Client::new();
    if !poll_health(&client, &api_url, max_wait, INITIAL_DELAY).await {
        bail!("API did not respond within {}s", max_wait.as_secs());
    }

    let summary = trigger_newsletter(&client, &api_url, admin_secret.as_deref()).await?;
    println!("{}", serde_json::to_string(&summary)?);
    if summary.has_errors() {
        tracing::error!(errors = summary.errors, "some newsletter emails failed to send");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
