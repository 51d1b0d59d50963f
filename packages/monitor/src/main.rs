// Entry point: configure, run one pass, exit.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use openai_client::OpenAIClient;
use rodajes_monitor::config::Config;
use rodajes_monitor::mail::SmtpNotifier;
use rodajes_monitor::page::CulturaPage;
use rodajes_monitor::run::run;
use rodajes_monitor::state::StateStore;
use rodajes_monitor::summary::DiffSummarizer;
use rodajes_monitor::types::RunOutcome;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,rodajes_monitor=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let store = StateStore::new(&config.data_dir).context("Failed to prepare data directory")?;
    let source = CulturaPage::new().context("Failed to build HTTP client")?;
    let summarizer = DiffSummarizer::new(OpenAIClient::new(config.openai_api_key.clone()));
    let notifier = SmtpNotifier::new(
        &config.smtp_host,
        &config.email_user,
        &config.email_pass,
        &config.email_recv,
    )
    .context("Failed to build SMTP transport")?;

    match run(
        &store,
        &source,
        &summarizer,
        &notifier,
        config.reset_state_on_mail_failure,
    )
    .await
    {
        Ok(RunOutcome::Unchanged) => tracing::info!("run complete, no change"),
        Ok(RunOutcome::Notified(announcement)) => {
            tracing::info!(link = %announcement.link, "run complete, notification sent")
        }
        Ok(RunOutcome::Deferred(announcement)) => {
            tracing::warn!(link = %announcement.link, "run complete, notification deferred")
        }
        // A failed check is only observable in the logs; the scheduler
        // simply tries again on the next tick.
        Err(err) => tracing::error!(error = %err, "run aborted"),
    }

    Ok(())
}
