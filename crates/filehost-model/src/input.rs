//! Operation input types.

use crate::error::FileHostError;
use crate::types::FileCategory;

/// Default page number for listings.
pub const DEFAULT_PAGE: u64 = 1;

/// Input for `ListFiles`, built from the request query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilesInput {
    /// Case-insensitive regular expression matched against filenames.
    pub search: Option<String>,
    /// Category restriction. Replaces `search` when not [`FileCategory::All`].
    pub filter: FileCategory,
    /// 1-based page number.
    pub page: u64,
    /// Page size.
    pub limit: u64,
}

impl ListFilesInput {
    /// Build the input from decoded query parameters.
    ///
    /// Empty `search` values are ignored. `page` and `limit` must be positive
    /// integers when present.
    pub fn from_query(
        params: &[(String, String)],
        default_limit: u64,
    ) -> Result<Self, FileHostError> {
        let value = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        let search = value("search")
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned);
        let filter = value("filter").map_or(FileCategory::All, FileCategory::from_param);
        let page = parse_positive("page", value("page"), DEFAULT_PAGE)?;
        let limit = parse_positive("limit", value("limit"), default_limit)?;

        Ok(Self {
            search,
            filter,
            page,
            limit,
        })
    }

    /// Number of matching documents to skip before this page.
    #[must_use]
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn parse_positive(name: &str, raw: Option<&str>, default: u64) -> Result<u64, FileHostError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(default);
    };
    match raw.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(FileHostError::invalid_parameter(format!(
            "Invalid {name}: {raw} (must be a positive integer)"
        ))),
    }
}
