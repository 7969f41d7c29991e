//! Lexicon daemon: connects storage and the content classifier, optionally
//! bootstraps a moderator account, and keeps trending scores fresh until
//! shutdown. Transports (HTTP, bots) attach to the domain services from
//! their own processes.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use lexicon_core::{Argon2Verifier, TrendingService};
use lexicon_moderation::OpenAiClassifier;
use lexicon_state::{ModeratorId, ModeratorRecord, ModeratorStore, SurrealGlossary};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_REFRESH_SECS: u64 = 300;

fn refresh_interval() -> Duration {
    refresh_interval_from(std::env::var("LEXICON_TRENDING_REFRESH_SECS").ok().as_deref())
}

/// Parse the refresh interval from a raw variable value. Unset or
/// unparseable values fall back to the default.
fn refresh_interval_from(raw: Option<&str>) -> Duration {
    let secs = raw
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_REFRESH_SECS);
    Duration::from_secs(secs)
}

/// Create the moderator account named by `LEXICON_ADMIN_USER` /
/// `LEXICON_ADMIN_PASSWORD` if it does not exist yet. No-op when the
/// variables are unset or the account is already present.
async fn bootstrap_moderator(store: &dyn ModeratorStore) -> Result<()> {
    let (Ok(username), Ok(password)) = (
        std::env::var("LEXICON_ADMIN_USER"),
        std::env::var("LEXICON_ADMIN_PASSWORD"),
    ) else {
        return Ok(());
    };

    if store.find_moderator(&username).await.is_ok() {
        return Ok(());
    }

    let password_hash =
        Argon2Verifier::hash_password(&password).context("hashing bootstrap password")?;
    store
        .insert_moderator(ModeratorRecord {
            moderator_id: ModeratorId::new(),
            username: username.clone(),
            password_hash,
            created_at: chrono::Utc::now(),
        })
        .await
        .context("creating bootstrap moderator")?;

    info!(username, "bootstrap moderator created");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let store = Arc::new(
        SurrealGlossary::from_env()
            .await
            .context("connecting to glossary storage")?,
    );
    // Validate classifier configuration at boot so a missing key shows up
    // here instead of on the first submission.
    match OpenAiClassifier::from_env() {
        Ok(_) => info!("content classifier configured"),
        Err(e) => warn!(error = %e, "content classifier not configured; submissions will fail closed"),
    }

    bootstrap_moderator(store.as_ref()).await?;

    let trending = TrendingService::new(store.clone(), store.clone());
    let interval = refresh_interval();
    info!(refresh_secs = interval.as_secs(), "lexicond started");

    let refresher = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Err(e) = trending.refresh().await {
                error!(error = %e, "trending refresh failed");
            }
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("shutdown requested, stopping");
    refresher.abort();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_interval_defaults_when_unset() {
        assert_eq!(
            refresh_interval_from(None),
            Duration::from_secs(DEFAULT_REFRESH_SECS)
        );
    }

    #[test]
    fn refresh_interval_parses_seconds() {
        assert_eq!(refresh_interval_from(Some("60")), Duration::from_secs(60));
    }

    #[test]
    fn refresh_interval_ignores_garbage() {
        assert_eq!(
            refresh_interval_from(Some("soon")),
            Duration::from_secs(DEFAULT_REFRESH_SECS)
        );
    }
}
