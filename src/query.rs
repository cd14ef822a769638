//! Solr query construction for the ORCID search API.
//!
//! The query requires the last name to match the family name (together with
//! the given names), the credit name or one of the other names, and requires
//! at least one of the supplied DOIs to be attached to the profile.
//!
//! # Example
//!
//! ```
//! use orcid_resolver::QueryBuilder;
//!
//! let query = QueryBuilder::new("Schindler")
//!     .first_name("Uwe")
//!     .doi("10.2481/dsj.5.79")
//!     .build();
//! assert_eq!(
//!     query,
//!     "+((+family-name:\"Schindler\" +given-names:(+Uwe)) \
//!      credit-name:(+\"Schindler\" +(+Uwe)) \
//!      other-names:(+\"Schindler\" +(+Uwe))) \
//!      +digital-object-ids:(\"10.2481\\/dsj.5.79\")"
//! );
//! ```

/// DOIs stop being appended once the query grows beyond this many characters.
///
/// Counted in `char`s (Unicode scalar values), not bytes.
pub const MAX_QUERY_LENGTH: usize = 768;

/// Characters with special meaning in Solr query syntax.
const SOLR_ESCAPE_CHARS: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\',
    '/',
];

/// Escape a term for use inside a Solr query.
///
/// Special characters get a leading backslash, and the boolean operators
/// `AND` and `OR` are broken up letter by letter.
pub fn escape_term(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() * 2);
    for ch in term.chars() {
        if SOLR_ESCAPE_CHARS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }

    escaped.replace("AND", "\\A\\N\\D").replace("OR", "\\O\\R")
}

/// Whether a given-name token consists only of initials, like `J.R.` or `JR`.
///
/// Only ASCII uppercase letters and periods qualify.
pub fn is_initials_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_uppercase() || c == '.')
}

/// Expand given names into Solr terms.
///
/// Initials become prefix wildcards (`J.R.` -> `J* R*`), anything else is
/// escaped. The first term is marked required with `+`.
fn given_names_pattern(first_name: &str) -> String {
    let mut terms: Vec<String> = Vec::new();

    for token in first_name.split_whitespace() {
        if is_initials_token(token) {
            terms.extend(
                token
                    .chars()
                    .filter(|&c| c != '.')
                    .map(|c| format!("{}*", c)),
            );
        } else {
            terms.push(escape_term(token));
        }
    }

    if terms.is_empty() {
        return String::new();
    }
    format!("+{}", terms.join(" "))
}

/// Builder for the ORCID person search query.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    last_name: String,
    first_name: Option<String>,
    dois: Vec<String>,
}

impl QueryBuilder {
    /// Start a query for the given last name.
    pub fn new(last_name: &str) -> Self {
        Self {
            last_name: last_name.to_string(),
            ..Self::default()
        }
    }

    /// Set the given name(s). Blank names are ignored.
    pub fn first_name(mut self, first_name: &str) -> Self {
        self.first_name = Some(first_name.to_string());
        self
    }

    /// Add a DOI.
    pub fn doi(mut self, doi: &str) -> Self {
        self.dois.push(doi.to_string());
        self
    }

    /// Add several DOIs, keeping their order.
    pub fn dois<I, S>(mut self, dois: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.dois
            .extend(dois.into_iter().map(|d| d.as_ref().to_string()));
        self
    }

    /// Build the final query string.
    pub fn build(&self) -> String {
        let given = self
            .first_name
            .as_deref()
            .map(given_names_pattern)
            .unwrap_or_default();
        let last = escape_term(self.last_name.trim());

        let mut query = String::new();
        query.push_str("+((");
        query.push_str(&format!("+family-name:\"{}\"", last));
        if !given.is_empty() {
            query.push_str(&format!(" +given-names:({})", given));
        }
        query.push_str(") credit-name:(");
        query.push_str(&format!("+\"{}\"", last));
        if !given.is_empty() {
            query.push_str(&format!(" +({})", given));
        }
        query.push_str(") other-names:(");
        query.push_str(&format!("+\"{}\"", last));
        if !given.is_empty() {
            query.push_str(&format!(" +({})", given));
        }
        query.push_str("))");

        query.push_str(" +digital-object-ids:(");
        let mut length = query.chars().count();
        for (i, doi) in self.dois.iter().enumerate() {
            let phrase = format!("\"{}\"", escape_term(doi));
            if i > 0 {
                query.push(' ');
                length += 1;
            }
            length += phrase.chars().count();
            query.push_str(&phrase);

            let remaining = self.dois.len() - i - 1;
            if length > MAX_QUERY_LENGTH && remaining > 0 {
                tracing::debug!(
                    omitted = remaining,
                    "query length cap reached, dropping remaining DOIs"
                );
                break;
            }
        }
        query.push(')');

        query
    }
}

impl std::fmt::Display for QueryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.build())
    }
}

/// Build the search query for a person and their DOIs.
pub fn build_query<S: AsRef<str>>(last_name: &str, first_name: Option<&str>, dois: &[S]) -> String {
    let mut builder = QueryBuilder::new(last_name).dois(dois);
    if let Some(first) = first_name {
        builder = builder.first_name(first);
    }
    builder.build()
}
