//! Status vocabularies: the `StatusType` contract and its sources.

use std::fmt;
use std::sync::Arc;

use http::StatusCode;

/// A pairing of a numeric HTTP status code with a reason phrase.
///
/// Implemented for [`http::StatusCode`] out of the box; applications with
/// their own status enumerations implement it themselves and feed them to the
/// codec through a [`StatusSource`].
pub trait StatusType: fmt::Debug + Send + Sync {
    /// The numeric status code, e.g. `404`.
    fn status_code(&self) -> u16;

    /// The human-readable reason phrase, e.g. `"Not Found"`.
    fn reason_phrase(&self) -> &str;
}

impl StatusType for StatusCode {
    fn status_code(&self) -> u16 {
        self.as_u16()
    }

    fn reason_phrase(&self) -> &str {
        self.canonical_reason().unwrap_or("Unknown")
    }
}

/// A finite enumeration of [`StatusType`] values.
///
/// Sources are consulted in the order given and must yield their values in
/// declaration order.
pub trait StatusSource {
    /// Every status value this source defines.
    fn values(&self) -> Vec<Arc<dyn StatusType>>;
}

/// The standard HTTP status registry: every [`StatusCode`] between 100 and
/// 599 with a canonical reason phrase, ascending.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardStatuses;

impl StatusSource for StandardStatuses {
    fn values(&self) -> Vec<Arc<dyn StatusType>> {
        (100..=599)
            .filter_map(|code| {
                let status = StatusCode::from_u16(code).ok()?;
                status.canonical_reason()?;
                Some(Arc::new(status) as Arc<dyn StatusType>)
            })
            .collect()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn status_code_implements_status_type() {
        assert_eq!(StatusCode::NOT_FOUND.status_code(), 404);
        assert_eq!(StatusCode::NOT_FOUND.reason_phrase(), "Not Found");
    }

    #[test]
    fn standard_statuses_are_unique_and_ascending() {
        let values = StandardStatuses.values();
        assert!(!values.is_empty());

        let codes: Vec<u16> = values.iter().map(|s| s.status_code()).collect();
        let unique: HashSet<u16> = codes.iter().copied().collect();
        assert_eq!(unique.len(), codes.len());

        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, codes);
    }

    #[test]
    fn standard_statuses_cover_the_common_codes() {
        let values = StandardStatuses.values();
        let not_found = values
            .iter()
            .find(|s| s.status_code() == 404)
            .expect("404 is part of the standard registry");
        assert_eq!(not_found.reason_phrase(), "Not Found");
    }
}
