//! ORCID format and check-digit validation.
//!
//! An ORCID has the form `DDDD-DDDD-DDDD-DDDC` where the last character is
//! an ISO 7064 MOD 11-2 check character (`0`-`9` or `X`).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ORCID_PATTERN: Regex =
        Regex::new(r"^[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{3}[0-9X]$").unwrap();
}

/// Check whether `candidate` is a well-formed ORCID with a correct check
/// character.
///
/// Accepts either a `&str` or an `Option<&str>`; `None` is never valid.
///
/// ```
/// use orcid_resolver::is_valid;
///
/// assert!(is_valid("0000-0002-1900-4162"));
/// assert!(!is_valid("0000-0002-1900-4160"));
/// assert!(!is_valid(None));
/// ```
pub fn is_valid<'a>(candidate: impl Into<Option<&'a str>>) -> bool {
    let Some(orcid) = candidate.into() else {
        return false;
    };

    if !ORCID_PATTERN.is_match(orcid) {
        return false;
    }

    // The pattern guarantees 19 ASCII characters.
    let (base, check) = orcid.split_at(orcid.len() - 1);
    checksum(base).is_some_and(|expected| check.starts_with(expected))
}

/// Compute the MOD 11-2 check character over `base_digits`.
///
/// Hyphens are skipped. Returns `None` if any other non-digit is present.
pub fn checksum(base_digits: &str) -> Option<char> {
    let mut total: u32 = 0;
    for ch in base_digits.chars().filter(|&c| c != '-') {
        let digit = ch.to_digit(10)?;
        total = (total + digit) * 2 % 11;
    }

    let result = (12 - total % 11) % 11;
    if result == 10 {
        Some('X')
    } else {
        char::from_digit(result, 10)
    }
}
