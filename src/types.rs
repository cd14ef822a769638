//! Public types for the ORCID resolver.

use crate::error::{OrcidError, Result};
use crate::validate::is_valid;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A checksum-validated ORCID identifier (`DDDD-DDDD-DDDD-DDDC`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Orcid(String);

impl Orcid {
    /// Validate `s` and wrap it.
    pub fn parse(s: &str) -> Result<Self> {
        if is_valid(s) {
            Ok(Orcid(s.to_string()))
        } else {
            Err(OrcidError::InvalidOrcid(s.to_string()))
        }
    }

    /// The bare identifier, e.g. `0000-0002-1900-4162`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The canonical `https://orcid.org/...` URI.
    pub fn uri(&self) -> String {
        format!("https://orcid.org/{}", self.0)
    }
}

impl fmt::Display for Orcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Orcid {
    type Err = OrcidError;

    fn from_str(s: &str) -> Result<Self> {
        Orcid::parse(s)
    }
}

impl TryFrom<&str> for Orcid {
    type Error = OrcidError;

    fn try_from(s: &str) -> Result<Self> {
        Orcid::parse(s)
    }
}

impl TryFrom<String> for Orcid {
    type Error = OrcidError;

    fn try_from(s: String) -> Result<Self> {
        if is_valid(s.as_str()) {
            Ok(Orcid(s))
        } else {
            Err(OrcidError::InvalidOrcid(s))
        }
    }
}

impl From<Orcid> for String {
    fn from(orcid: Orcid) -> Self {
        orcid.0
    }
}

impl AsRef<str> for Orcid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A person to look up: name plus publications known to be theirs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonQuery {
    /// Family name. Never blank.
    pub last_name: String,
    /// Given name(s) and/or initials, e.g. "Uwe" or "J. R.".
    pub first_name: Option<String>,
    /// DOIs of the person's publications, in priority order. Never empty.
    pub dois: Vec<String>,
}

impl PersonQuery {
    /// Build a query, rejecting a blank last name or an empty DOI list.
    pub fn new<I, S>(last_name: &str, first_name: Option<&str>, dois: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if last_name.trim().is_empty() {
            return Err(OrcidError::InvalidInput(
                "last name must not be empty".to_string(),
            ));
        }

        let dois: Vec<String> = dois.into_iter().map(Into::into).collect();
        if dois.is_empty() {
            return Err(OrcidError::InvalidInput(
                "dois must contain at least one DOI".to_string(),
            ));
        }

        Ok(PersonQuery {
            last_name: last_name.to_string(),
            first_name: first_name.map(str::to_string),
            dois,
        })
    }
}

/// Values decoded from an ORCID search response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Number of matching profiles reported by the service.
    pub num_found: u64,
    /// Trimmed identifier path of the first profile, if any. Not validated.
    pub orcid: Option<String>,
}
