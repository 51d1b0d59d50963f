//! Announcement discovery on the ministry page and bulletin download.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;

use crate::error::{MonitorError, Result};
use crate::types::Announcement;

/// Page listing the current film-shoot bulletin.
pub const PAGE_URL: &str =
    "https://www.cultura.gob.es/en/cultura/areas/cine/datos/rodajes.html";

/// Announcement entries are anchors inside `.elemento` blocks; the first
/// one points at the current bulletin.
const ANNOUNCEMENT_SELECTOR: &str = ".elemento a";

/// Browser-like identification; the site serves bare clients differently.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where announcements and bulletin PDFs come from.
#[async_trait]
pub trait BulletinSource: Send + Sync {
    /// Fetch the page and extract the first announcement entry.
    ///
    /// `Ok(None)` means the page was reachable but carried no matching
    /// element.
    async fn latest_announcement(&self) -> Result<Option<Announcement>>;

    /// Resolve `link` against the page URL and download the bulletin
    /// to `dest`.
    async fn download_bulletin(&self, link: &str, dest: &Path) -> Result<()>;
}

/// Live source scraping cultura.gob.es.
pub struct CulturaPage {
    client: reqwest::Client,
    page_url: Url,
}

impl CulturaPage {
    pub fn new() -> Result<Self> {
        Self::with_page_url(PAGE_URL)
    }

    /// Point the scraper at a different page (mirrors, fixtures).
    pub fn with_page_url(page_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            // The ministry serves an incomplete certificate chain.
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(MonitorError::network)?;

        let page_url = Url::parse(page_url)
            .map_err(|e| MonitorError::Parse(format!("invalid page URL {page_url:?}: {e}")))?;

        Ok(Self { client, page_url })
    }
}

#[async_trait]
impl BulletinSource for CulturaPage {
    async fn latest_announcement(&self) -> Result<Option<Announcement>> {
        debug!(url = %self.page_url, "fetching announcements page");

        let response = self
            .client
            .get(self.page_url.clone())
            .send()
            .await
            .map_err(MonitorError::network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::Network(
                format!("HTTP {status} for {}", self.page_url).into(),
            ));
        }

        let html = response.text().await.map_err(MonitorError::network)?;
        Ok(first_announcement(&html))
    }

    async fn download_bulletin(&self, link: &str, dest: &Path) -> Result<()> {
        let url = self
            .page_url
            .join(link)
            .map_err(|e| MonitorError::Parse(format!("unresolvable bulletin link {link:?}: {e}")))?;
        debug!(url = %url, dest = %dest.display(), "downloading bulletin");

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(MonitorError::network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::Network(format!("HTTP {status} for {url}").into()));
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| MonitorError::fs(dest, e))?;
        while let Some(chunk) = response.chunk().await.map_err(MonitorError::network)? {
            file.write_all(&chunk)
                .await
                .map_err(|e| MonitorError::fs(dest, e))?;
        }
        file.flush().await.map_err(|e| MonitorError::fs(dest, e))?;

        Ok(())
    }
}

/// First announcement entry in `html`, or `None` when nothing matches.
pub fn first_announcement(html: &str) -> Option<Announcement> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(ANNOUNCEMENT_SELECTOR).ok()?;

    let element = document.select(&selector).next()?;
    let link = element.value().attr("href")?.to_string();
    let label = element.text().collect::<String>().trim().to_string();

    Some(Announcement { link, label })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_entry_wins() {
        let html = r#"<html><body>
            <div class="elemento">
                <a href="/dam/jcr/rodajes-enero.pdf"> Rodajes enero 2024 </a>
            </div>
            <div class="elemento">
                <a href="/dam/jcr/rodajes-diciembre.pdf">Rodajes diciembre 2023</a>
            </div>
        </body></html>"#;

        let announcement = first_announcement(html).unwrap();
        assert_eq!(announcement.link, "/dam/jcr/rodajes-enero.pdf");
        // Inner text is trimmed.
        assert_eq!(announcement.label, "Rodajes enero 2024");
    }

    #[test]
    fn anchor_outside_elemento_is_ignored() {
        let html = r#"<html><body>
            <a href="/somewhere-else.pdf">Not a bulletin</a>
            <div class="elemento"><a href="/bulletin.pdf">Bulletin</a></div>
        </body></html>"#;

        let announcement = first_announcement(html).unwrap();
        assert_eq!(announcement.link, "/bulletin.pdf");
    }

    #[test]
    fn page_without_entries_yields_none() {
        let html = "<html><body><p>Mantenimiento</p></body></html>";

        assert!(first_announcement(html).is_none());
    }

    #[test]
    fn anchor_without_href_yields_none() {
        let html = r#"<div class="elemento"><a>Sin enlace</a></div>"#;

        assert!(first_announcement(html).is_none());
    }
}
