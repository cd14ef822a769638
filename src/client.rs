//! The ORCID public API client.

use crate::error::{OrcidError, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Base URL of the ORCID public API.
pub const ORCID_API_URL: &str = "http://pub.orcid.org/v1.2";

/// Path of the biography search endpoint.
pub const ORCID_API_PATH: &str = "/search/orcid-bio/";

/// Media type requested from the search endpoint.
const ORCID_XML: &str = "application/orcid+xml";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolves ORCIDs through the ORCID public search API.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> orcid_resolver::error::Result<()> {
/// let resolver = orcid_resolver::OrcidResolver::new()?;
/// let orcid = resolver
///     .resolve("Schindler", Some("Uwe"), &["10.1016/j.cageo.2008.02.023"])
///     .await?;
/// if let Some(orcid) = orcid {
///     println!("{}", orcid.uri());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OrcidResolver {
    pub(crate) http: Client,
    pub(crate) base_url: String,
}

impl OrcidResolver {
    /// Create a resolver against the public ORCID API.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a resolver with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: ORCID_API_URL.to_string(),
        })
    }

    /// Override the base URL (useful for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Build the search URL for a Solr query.
    ///
    /// Parameters are form-encoded, so spaces in the query become `+`.
    pub(crate) fn search_url(&self, query: &str) -> Result<Url> {
        let url = Url::parse_with_params(
            &format!("{}{}", self.base_url, ORCID_API_PATH),
            &[("start", "0"), ("rows", "1"), ("q.op", "OR"), ("q", query)],
        )?;
        Ok(url)
    }

    /// GET a URL, asking for ORCID XML.
    pub(crate) async fn get_xml(&self, url: Url) -> Result<String> {
        tracing::debug!(%url, "ORCID search request");

        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, ORCID_XML)
            .header(reqwest::header::USER_AGENT, concat!("orcid-resolver/", env!("CARGO_PKG_VERSION")))
            .send()
            .await?;

        handle_response(response).await
    }
}

/// Handle the HTTP response, mapping status codes to errors.
async fn handle_response(response: reqwest::Response) -> Result<String> {
    let status = response.status().as_u16();

    match status {
        200..=299 => Ok(response.text().await?),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(OrcidError::Api {
                status,
                message: body,
            })
        }
    }
}
