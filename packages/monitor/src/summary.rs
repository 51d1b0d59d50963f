//! Diff summaries between two bulletin versions.

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};
use tracing::debug;

use crate::error::{MonitorError, Result};

/// Model used for the diff summary.
const SUMMARY_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You are an expert at comparing structured data listings.";

/// Mail body text used in place of a diff when no previous bulletin exists.
pub const NO_PREVIOUS_SENTINEL: &str = "No previous bulletin version to compare.";

/// Produces a natural-language summary of the shoots added between two
/// bulletin versions.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize the entries present in `current` but not in `previous`.
    async fn diff_summary(&self, previous: &str, current: &str) -> Result<String>;
}

/// OpenAI-backed summarizer.
pub struct DiffSummarizer {
    client: OpenAIClient,
}

impl DiffSummarizer {
    pub fn new(client: OpenAIClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Summarizer for DiffSummarizer {
    async fn diff_summary(&self, previous: &str, current: &str) -> Result<String> {
        let request = ChatRequest::new(SUMMARY_MODEL)
            .message(Message::system(SYSTEM_PROMPT))
            .message(Message::user(diff_prompt(previous, current)));

        let response = self
            .client
            .chat_completion(request)
            .await
            .map_err(MonitorError::service)?;

        debug!(chars = response.content.len(), "received diff summary");
        Ok(response.content)
    }
}

/// Fixed comparison rubric for the ICAA bulletin tables.
fn diff_prompt(previous: &str, current: &str) -> String {
    format!(
        "These PDFs are republished every few days and list the film shoots \
         notified to the ICAA, organized by year and month. Each month has a \
         table with the columns TÍTULO, PRODUCTORA, DIRECCIÓN, INICIO RODAJE \
         and FIN RODAJE.\n\
         \n\
         Below are two shoot listings extracted from these PDFs. The first \
         comes from an earlier version of the PDF, the second from the most \
         recent one. Compare the two listings and report only the records \
         added in the more recent version, giving TÍTULO, PRODUCTORA, \
         DIRECCIÓN, INICIO RODAJE and FIN RODAJE for each.\n\
         \n\
         If there are no differences, reply exactly: \"No differences found.\"\n\
         \n\
         Listing 1 (earlier version):\n\
         {previous}\n\
         \n\
         Listing 2 (most recent version):\n\
         {current}\n\
         \n\
         Newly added records:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_both_listings_and_the_rubric() {
        let prompt = diff_prompt("enero: Vera", "enero: Vera\nfebrero: Sol");

        assert!(prompt.contains("TÍTULO"));
        assert!(prompt.contains("FIN RODAJE"));
        assert!(prompt.contains("Listing 1 (earlier version):\nenero: Vera\n"));
        assert!(prompt.contains("Listing 2 (most recent version):\nenero: Vera\nfebrero: Sol\n"));
    }
}
