//! Reverse lookup from numeric status codes to canonical status values.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use problem::{StandardStatuses, StatusSource, StatusType};

use crate::error::Error;

/// The placeholder status for codes absent from the index.
///
/// Compares and hashes by code alone; the reason phrase is always
/// `"Unknown"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnknownStatus {
    code: u16,
}

impl UnknownStatus {
    #[must_use]
    pub fn new(code: u16) -> Self {
        Self { code }
    }
}

impl StatusType for UnknownStatus {
    fn status_code(&self) -> u16 {
        self.code
    }

    fn reason_phrase(&self) -> &str {
        "Unknown"
    }
}

/// An immutable mapping from numeric status code to its canonical
/// [`StatusType`] value.
///
/// Built once from one or more [`StatusSource`]s; decoding the same code
/// always yields the same `Arc`, so canonical statuses keep referential
/// identity across decodes.
#[derive(Debug, Clone)]
pub struct StatusIndex {
    statuses: HashMap<u16, Arc<dyn StatusType>>,
}

impl StatusIndex {
    /// An index over the standard HTTP status registry.
    #[must_use]
    pub fn standard() -> Self {
        let mut statuses = HashMap::new();
        for status in StandardStatuses.values() {
            statuses.insert(status.status_code(), status);
        }
        Self { statuses }
    }

    /// Builds an index over the given sources, in order.
    ///
    /// Codes outside the usual 100..599 range are accepted; the index is a
    /// pure mapping.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateStatusCode`] if two values across all sources share
    /// a status code. No partial index is returned.
    pub fn from_sources(sources: &[&dyn StatusSource]) -> Result<Self, Error> {
        let mut statuses = HashMap::new();
        for source in sources {
            for status in source.values() {
                let code = status.status_code();
                match statuses.entry(code) {
                    Entry::Occupied(_) => return Err(Error::DuplicateStatusCode(code)),
                    Entry::Vacant(slot) => {
                        slot.insert(status);
                    }
                }
            }
        }
        Ok(Self { statuses })
    }

    /// The canonical status for `code`, if registered.
    #[must_use]
    pub fn get(&self, code: u16) -> Option<&Arc<dyn StatusType>> {
        self.statuses.get(&code)
    }

    /// The canonical status for `code`, or a fresh [`UnknownStatus`].
    #[must_use]
    pub fn resolve(&self, code: u16) -> Arc<dyn StatusType> {
        if let Some(status) = self.statuses.get(&code) {
            Arc::clone(status)
        } else {
            Arc::new(UnknownStatus::new(code))
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    struct Teapot;

    impl StatusType for Teapot {
        fn status_code(&self) -> u16 {
            418
        }

        fn reason_phrase(&self) -> &str {
            "I'm a teapot"
        }
    }

    struct Teapots;

    impl StatusSource for Teapots {
        fn values(&self) -> Vec<Arc<dyn StatusType>> {
            vec![Arc::new(Teapot)]
        }
    }

    #[derive(Debug, Clone, Copy)]
    struct OutOfBand;

    impl StatusType for OutOfBand {
        fn status_code(&self) -> u16 {
            42
        }

        fn reason_phrase(&self) -> &str {
            "Out of Band"
        }
    }

    struct OutOfBandSource;

    impl StatusSource for OutOfBandSource {
        fn values(&self) -> Vec<Arc<dyn StatusType>> {
            vec![Arc::new(OutOfBand)]
        }
    }

    #[test]
    fn unknown_status_shape() {
        let status = UnknownStatus::new(8080);
        assert_eq!(status.status_code(), 8080);
        assert_eq!(status.reason_phrase(), "Unknown");
        assert_eq!(status, UnknownStatus::new(8080));
    }

    #[test]
    fn empty_source_list_yields_an_empty_index() {
        let index = StatusIndex::from_sources(&[]).unwrap();
        assert!(index.is_empty());
        assert!(index.get(200).is_none());
    }

    #[test]
    fn duplicate_codes_abort_construction() {
        let result = StatusIndex::from_sources(&[&StandardStatuses, &Teapots]);
        assert!(matches!(result, Err(Error::DuplicateStatusCode(418))));
    }

    #[test]
    fn codes_outside_the_http_range_are_accepted() {
        let index = StatusIndex::from_sources(&[&OutOfBandSource]).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.resolve(42).reason_phrase(), "Out of Band");
    }

    #[test]
    fn resolve_keeps_referential_identity_for_known_codes() {
        let index = StatusIndex::standard();
        assert!(Arc::ptr_eq(&index.resolve(404), &index.resolve(404)));
        assert_eq!(index.resolve(404).reason_phrase(), "Not Found");
    }

    #[test]
    fn resolve_falls_back_to_unknown() {
        let index = StatusIndex::standard();
        let status = index.resolve(666);
        assert_eq!(status.status_code(), 666);
        assert_eq!(status.reason_phrase(), "Unknown");
    }
}
