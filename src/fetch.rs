use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;
use url::Url;

use crate::error::HarvestError;
use crate::model::PageProvenance;
use crate::util::sha256_hex;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking page fetcher. Pages are fetched strictly one at a time, in the
/// order the pipeline asks for them; every successful fetch is recorded as a
/// provenance entry for the run manifest. No retries.
pub struct Fetcher {
    client: Client,
    fetched: Vec<PageProvenance>,
}

impl Fetcher {
    pub fn new() -> Result<Self, HarvestError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|source| HarvestError::Client { source })?;

        Ok(Self {
            client,
            fetched: Vec::new(),
        })
    }

    pub fn fetch(&mut self, url: &str) -> Result<String, HarvestError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| HarvestError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Http {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().map_err(|source| HarvestError::Fetch {
            url: url.to_string(),
            source,
        })?;

        debug!(url, bytes = body.len(), "fetched page");
        self.fetched.push(PageProvenance {
            url: url.to_string(),
            byte_count: body.len(),
            sha256: sha256_hex(body.as_bytes()),
        });

        Ok(body)
    }

    pub fn page_count(&self) -> usize {
        self.fetched.len()
    }

    pub fn into_provenance(self) -> Vec<PageProvenance> {
        self.fetched
    }
}

/// Resolve an href found on a page against the fixed base URL.
pub fn join_url(base: &str, href: &str) -> Result<String, HarvestError> {
    let parsed = Url::parse(base).map_err(|source| HarvestError::InvalidUrl {
        base: base.to_string(),
        href: href.to_string(),
        source,
    })?;
    let joined = parsed.join(href).map_err(|source| HarvestError::InvalidUrl {
        base: base.to_string(),
        href: href.to_string(),
        source,
    })?;
    Ok(joined.to_string())
}
