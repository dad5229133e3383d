//! Listing queries.
//!
//! A [`FileQuery`] decides which stored documents a listing matches: either
//! every document, those whose filename matches a case-insensitive regular
//! expression, or those whose extension falls in a [`FileCategory`]. A
//! category other than `all` replaces the search pattern.

use chrono::{DateTime, Utc};
use filehost_model::error::FileHostError;
use filehost_model::input::ListFilesInput;
use filehost_model::types::{FileCategory, StoredFile};
use regex::{Regex, RegexBuilder};

/// Compiled size limit for user-supplied search patterns.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

#[derive(Debug, Clone)]
enum Matcher {
    All,
    Pattern(Regex),
    Category(FileCategory),
}

/// Filename predicate applied to listings.
#[derive(Debug, Clone)]
pub struct FileQuery {
    matcher: Matcher,
    as_of: DateTime<Utc>,
}

impl FileQuery {
    /// A query matching every live document.
    #[must_use]
    pub fn all() -> Self {
        Self {
            matcher: Matcher::All,
            as_of: Utc::now(),
        }
    }

    /// Build a query from listing parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `search` is not a valid regular expression.
    pub fn from_input(input: &ListFilesInput) -> Result<Self, FileHostError> {
        let matcher = match (input.filter, input.search.as_deref()) {
            (FileCategory::All, None) => Matcher::All,
            (FileCategory::All, Some(pattern)) => Matcher::Pattern(compile(pattern)?),
            (category, _) => Matcher::Category(category),
        };
        Ok(Self {
            matcher,
            as_of: Utc::now(),
        })
    }

    /// Evaluate expiry against `as_of` instead of the construction time.
    #[must_use]
    pub fn as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = as_of;
        self
    }

    /// Check whether a stored document belongs in the listing.
    ///
    /// Expired documents never match.
    #[must_use]
    pub fn matches(&self, file: &StoredFile) -> bool {
        if file.is_expired(self.as_of) {
            return false;
        }
        match &self.matcher {
            Matcher::All => true,
            Matcher::Pattern(re) => re.is_match(&file.filename),
            Matcher::Category(category) => category.matches(&file.filename),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, FileHostError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| {
            FileHostError::invalid_parameter(format!("Invalid search pattern: {pattern}"))
                .with_source(e)
        })
}
