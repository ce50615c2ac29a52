//! Admin console entry point.
//!
//! Usage: `atrium-console [section]`

use std::sync::Arc;

use anyhow::Context;

use atrium_auth::{Catalog, SectionId, explain_access};
use atrium_console::{AdminShell, SessionClient, SessionStore};
use atrium_dashboard::{DashboardAggregator, DashboardConfig};
use atrium_observability::LogFormat;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_format = std::env::var("ATRIUM_LOG_FORMAT")
        .ok()
        .and_then(|name| LogFormat::parse(&name))
        .unwrap_or_default();
    atrium_observability::tracing::init(log_format);

    let config = DashboardConfig::from_env().context("invalid dashboard configuration")?;
    tracing::info!(api_url = %config.api_url, "starting admin console");

    let requested: Option<SectionId> = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()
        .context("unknown section argument")?;

    let client = reqwest::Client::new();
    let session_client = SessionClient::new(
        client.clone(),
        config.endpoint("auth/me"),
        config.auth_token.clone(),
    );
    let user = session_client
        .fetch_user(chrono::Utc::now())
        .await
        .context("failed to load session")?;

    let aggregator = DashboardAggregator::from_config(&config, client)
        .context("failed to build dashboard sources")?;

    let catalog = Catalog::standard();
    for section in catalog.iter() {
        let explanation = explain_access(&user, section);
        tracing::debug!(
            section = %explanation.section,
            granted = explanation.granted,
            reason = %explanation.reason,
            "section access"
        );
    }

    let store = SessionStore::new();
    let mut shell = AdminShell::new(catalog, Arc::new(aggregator));

    store.login(user);
    shell.apply_user(store.current().as_ref());

    if let Some(target) = requested {
        if let Err(e) = shell.navigate(target) {
            tracing::warn!(section = %target, error = %e, "navigation rejected");
        }
    }

    if shell.wants_dashboard() {
        shell
            .spawn_refresh()
            .await
            .context("dashboard refresh task failed")?;
    }

    let view = shell.view();
    println!("{}", serde_json::to_string_pretty(&view)?);

    if let Some(snapshot) = shell.board().current() {
        println!("{}", serde_json::to_string_pretty(snapshot.as_ref())?);
    }

    Ok(())
}
