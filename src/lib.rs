//! # orcid-resolver
//!
//! Looks up a researcher's ORCID from their name and a list of DOIs using
//! the ORCID public search API, and validates ORCID check digits.
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn example() -> orcid_resolver::error::Result<()> {
//! use orcid_resolver::OrcidResolver;
//!
//! let resolver = OrcidResolver::new()?;
//! let orcid = resolver
//!     .resolve(
//!         "Schindler",
//!         Some("Uwe"),
//!         &["10.1016/j.cageo.2008.02.023", "10.2481/dsj.5.79"],
//!     )
//!     .await?;
//!
//! match orcid {
//!     Some(orcid) => println!("found {}", orcid),
//!     None => println!("no match"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Validation
//!
//! ```
//! use orcid_resolver::is_valid;
//!
//! assert!(is_valid("0000-0002-1900-4162"));
//! assert!(!is_valid("0000-0002-1900-4160"));
//! ```

pub mod client;
pub mod error;
pub mod parse;
pub mod query;
pub mod search;
pub mod types;
pub mod validate;

// Re-export key types at the crate root.
pub use client::OrcidResolver;
pub use error::OrcidError;
pub use parse::parse_search_response;
pub use query::{build_query, escape_term, is_initials_token, QueryBuilder};
pub use types::*;
pub use validate::{checksum, is_valid};
