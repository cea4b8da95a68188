//! URL matching for canned responses.

use std::sync::Arc;

use regex::Regex;
use thiserror::Error;

use super::config::ResponseSpec;

/// A matcher predicate failed to evaluate one candidate pattern.
///
/// A failing candidate is skipped, never fatal: one malformed pattern
/// must not abort the whole match attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("url pattern {pattern:?} did not evaluate: {message}")]
pub struct MatchError {
    /// The pattern that failed.
    pub pattern: String,
    /// Why it failed.
    pub message: String,
}

/// Predicate deciding whether a request URL matches a response pattern.
///
/// Returns `Ok(true)` on a match, `Ok(false)` on a miss, and `Err` when
/// the pattern could not be evaluated at all; the caller treats `Err` as
/// a miss and keeps going.
pub type UrlMatcher = Arc<dyn Fn(&str, &str) -> Result<bool, MatchError> + Send + Sync>;

/// Default matcher: compiles the pattern as a regular expression and
/// tests it against the URL, unanchored.
///
/// # Errors
///
/// Returns [`MatchError`] when the pattern is not a valid regular
/// expression.
pub fn regex_url_matcher(url: &str, pattern: &str) -> Result<bool, MatchError> {
    let compiled = Regex::new(pattern).map_err(|error| MatchError {
        pattern: pattern.to_owned(),
        message: error.to_string(),
    })?;
    Ok(compiled.is_match(url))
}

/// Returns the first response whose pattern matches `url`, in list order.
///
/// Candidates without a pattern never match. A matcher failure for one
/// candidate skips it and matching continues with the rest.
pub(crate) fn match_response<'a>(
    url: &str,
    responses: &'a [ResponseSpec],
    matcher: Option<&UrlMatcher>,
) -> Option<&'a ResponseSpec> {
    if url.is_empty() {
        return None;
    }

    responses.iter().find(|candidate| {
        candidate.url.as_deref().is_some_and(|pattern| {
            let outcome = matcher.map_or_else(
                || regex_url_matcher(url, pattern),
                |custom| custom(url, pattern),
            );
            match outcome {
                Ok(matched) => matched,
                Err(error) => {
                    tracing::trace!("skipping canned response: {error}");
                    false
                }
            }
        })
    })
}
