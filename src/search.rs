//! ORCID lookup by name and DOIs.

use crate::client::OrcidResolver;
use crate::error::{OrcidError, Result};
use crate::parse::parse_search_response;
use crate::query::build_query;
use crate::types::{Orcid, PersonQuery, SearchResult};

impl OrcidResolver {
    /// Run a raw Solr query against the search endpoint (one row).
    pub async fn search(&self, query: &str) -> Result<SearchResult> {
        let url = self.search_url(query)?;
        let body = self.get_xml(url).await?;
        let result = parse_search_response(&body)?;
        tracing::debug!(num_found = result.num_found, "ORCID search response");
        Ok(result)
    }

    /// Find the ORCID of the person with this name who authored at least one
    /// of `dois`.
    ///
    /// Returns `Ok(None)` when nobody matches. A blank last name or an empty
    /// DOI list fails with [`OrcidError::InvalidInput`] before any request is
    /// made.
    pub async fn resolve<S: AsRef<str>>(
        &self,
        last_name: &str,
        first_name: Option<&str>,
        dois: &[S],
    ) -> Result<Option<Orcid>> {
        if last_name.trim().is_empty() {
            return Err(OrcidError::InvalidInput(
                "last name must not be empty".to_string(),
            ));
        }
        if dois.is_empty() {
            return Err(OrcidError::InvalidInput(
                "dois must contain at least one DOI".to_string(),
            ));
        }

        let query = build_query(last_name, first_name, dois);
        tracing::debug!(%query, "built ORCID query");

        let result = self.search(&query).await?;
        select_orcid(result)
    }

    /// Same as [`resolve`](Self::resolve) for a prepared [`PersonQuery`].
    pub async fn resolve_person(&self, person: &PersonQuery) -> Result<Option<Orcid>> {
        self.resolve(&person.last_name, person.first_name.as_deref(), person.dois.as_slice())
            .await
    }
}

/// Apply the at-most-one-match contract to a decoded response.
fn select_orcid(result: SearchResult) -> Result<Option<Orcid>> {
    if result.num_found > 1 {
        tracing::warn!(num_found = result.num_found, "more than one ORCID found");
        return Err(OrcidError::UnexpectedResponse(format!(
            "Obtained more than one ORCID [numFound = {}]",
            result.num_found
        )));
    }

    match result.orcid {
        Some(path) => match Orcid::parse(&path) {
            Ok(orcid) => Ok(Some(orcid)),
            Err(e) => {
                tracing::warn!(%path, "service returned an invalid ORCID");
                Err(e)
            }
        },
        None if result.num_found == 1 => {
            tracing::warn!("one result reported without an identifier");
            Err(OrcidError::UnexpectedResponse(
                "One ORCID result returned, but no id found in response.".to_string(),
            ))
        }
        None => Ok(None),
    }
}
