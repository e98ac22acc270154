//! The codec composition root.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::Arc;

use serde::de::{DeserializeOwned, DeserializeSeed};
use serde_json::Value;

use problem::{DefaultProblem, Problem, ProblemError, StatusSource, DEFAULT_TYPE};

use crate::de::ProblemSeed;
use crate::error::Error;
use crate::index::StatusIndex;
use crate::ser::SerializeProblem;

/// Builds a registered concrete problem from the decoded catch-all document.
type SubtypeFn =
    Arc<dyn Fn(DefaultProblem) -> Result<Box<dyn Problem>, serde_json::Error> + Send + Sync>;

/// An immutable codec configuration for RFC 7807 documents.
///
/// Owns the status index, the subtype registry keyed by `type` URI, and the
/// stack-trace setting. Construction-time configuration is the only mutation
/// path; a configured module is safe for concurrent shared use.
#[derive(Clone)]
#[must_use]
pub struct ProblemModule {
    stack_traces: bool,
    statuses: StatusIndex,
    subtypes: HashMap<String, SubtypeFn>,
}

impl ProblemModule {
    /// A module over the standard HTTP status registry, stack traces off.
    pub fn new() -> Self {
        Self {
            stack_traces: false,
            statuses: StatusIndex::standard(),
            subtypes: HashMap::new(),
        }
    }

    /// A module over application-defined status vocabularies.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateStatusCode`] if two values across all sources share
    /// a status code.
    pub fn from_sources(sources: &[&dyn StatusSource]) -> Result<Self, Error> {
        Ok(Self {
            stack_traces: false,
            statuses: StatusIndex::from_sources(sources)?,
            subtypes: HashMap::new(),
        })
    }

    /// The same module with stack-trace emission switched on or off.
    pub fn with_stack_traces(mut self, enabled: bool) -> Self {
        self.stack_traces = enabled;
        self
    }

    /// Registers `T` for a `type` URI; decoding a document with that
    /// discriminator builds `T` from the flattened additional members.
    /// Registering the same discriminator again replaces the previous entry.
    pub fn with_subtype<T>(self, type_url: impl Into<String>) -> Self
    where
        T: Problem + DeserializeOwned + 'static,
    {
        self.with_subtype_fn(type_url, |raw: DefaultProblem| {
            let mut members = serde_json::Map::new();
            for (key, value) in raw.parameters() {
                members.insert(key.clone(), value.clone());
            }
            let typed: T = serde_json::from_value(Value::Object(members))?;
            Ok(Box::new(typed) as Box<dyn Problem>)
        })
    }

    /// Registers an arbitrary constructor for a `type` URI. The constructor
    /// receives the full decoded catch-all document.
    pub fn with_subtype_fn<F>(mut self, type_url: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(DefaultProblem) -> Result<Box<dyn Problem>, serde_json::Error>
            + Send
            + Sync
            + 'static,
    {
        self.subtypes.insert(type_url.into(), Arc::new(constructor));
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        "ProblemModule"
    }

    #[must_use]
    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    #[must_use]
    pub fn stack_traces(&self) -> bool {
        self.stack_traces
    }

    #[must_use]
    pub fn status_index(&self) -> &StatusIndex {
        &self.statuses
    }

    /// Encodes a problem as a JSON value.
    ///
    /// # Errors
    ///
    /// [`Error::Json`] if an additional member fails to serialize.
    pub fn to_value(&self, problem: &dyn Problem) -> Result<Value, Error> {
        serde_json::to_value(SerializeProblem {
            problem,
            stacktrace: None,
        })
        .map_err(Error::from)
    }

    /// Encodes a problem as a JSON string.
    ///
    /// # Errors
    ///
    /// [`Error::Json`] if an additional member fails to serialize.
    pub fn to_string(&self, problem: &dyn Problem) -> Result<String, Error> {
        serde_json::to_string(&SerializeProblem {
            problem,
            stacktrace: None,
        })
        .map_err(Error::from)
    }

    /// Streams a problem into a writer.
    ///
    /// # Errors
    ///
    /// [`Error::Json`] on serialization or I/O failure.
    pub fn to_writer<W>(&self, writer: W, problem: &dyn Problem) -> Result<(), Error>
    where
        W: io::Write,
    {
        serde_json::to_writer(
            writer,
            &SerializeProblem {
                problem,
                stacktrace: None,
            },
        )
        .map_err(Error::from)
    }

    /// Encodes a raised problem; the only path that can emit `stacktrace`,
    /// gated by [`ProblemModule::with_stack_traces`].
    ///
    /// # Errors
    ///
    /// [`Error::Json`] if an additional member fails to serialize.
    pub fn error_to_value(&self, error: &ProblemError) -> Result<Value, Error> {
        serde_json::to_value(SerializeProblem {
            problem: error.problem(),
            stacktrace: self.stack_traces.then(|| error.backtrace()),
        })
        .map_err(Error::from)
    }

    /// Encodes a raised problem as a JSON string; see
    /// [`ProblemModule::error_to_value`].
    ///
    /// # Errors
    ///
    /// [`Error::Json`] if an additional member fails to serialize.
    pub fn error_to_string(&self, error: &ProblemError) -> Result<String, Error> {
        serde_json::to_string(&SerializeProblem {
            problem: error.problem(),
            stacktrace: self.stack_traces.then(|| error.backtrace()),
        })
        .map_err(Error::from)
    }

    /// Decodes a problem from a JSON string, dispatching on the `type` URI.
    ///
    /// # Errors
    ///
    /// [`Error::Json`] on malformed input or a registered constructor
    /// rejecting the document.
    pub fn from_str(&self, json: &str) -> Result<Box<dyn Problem>, Error> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        let decoded = ProblemSeed { module: self }.deserialize(&mut deserializer)?;
        deserializer.end()?;
        Ok(decoded)
    }

    /// Decodes a problem from JSON bytes.
    ///
    /// # Errors
    ///
    /// [`Error::Json`] on malformed input.
    pub fn from_slice(&self, json: &[u8]) -> Result<Box<dyn Problem>, Error> {
        let mut deserializer = serde_json::Deserializer::from_slice(json);
        let decoded = ProblemSeed { module: self }.deserialize(&mut deserializer)?;
        deserializer.end()?;
        Ok(decoded)
    }

    /// Decodes a problem from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// [`Error::Json`] if the value is not a problem object.
    pub fn from_value(&self, json: Value) -> Result<Box<dyn Problem>, Error> {
        ProblemSeed { module: self }
            .deserialize(json)
            .map_err(Error::from)
    }

    /// Streams a problem out of a reader.
    ///
    /// # Errors
    ///
    /// [`Error::Json`] on malformed input or I/O failure.
    pub fn from_reader<R>(&self, reader: R) -> Result<Box<dyn Problem>, Error>
    where
        R: io::Read,
    {
        let mut deserializer = serde_json::Deserializer::from_reader(reader);
        let decoded = ProblemSeed { module: self }.deserialize(&mut deserializer)?;
        deserializer.end()?;
        Ok(decoded)
    }

    /// Decodes a problem and raises it as a [`ProblemError`], capturing the
    /// decode-site backtrace.
    ///
    /// # Errors
    ///
    /// [`Error::Json`] on malformed input.
    pub fn error_from_str(&self, json: &str) -> Result<ProblemError, Error> {
        Ok(ProblemError::from_boxed(self.from_str(json)?))
    }

    /// Decodes a raised problem from an already-parsed JSON value; see
    /// [`ProblemModule::error_from_str`].
    ///
    /// # Errors
    ///
    /// [`Error::Json`] if the value is not a problem object.
    pub fn error_from_value(&self, json: Value) -> Result<ProblemError, Error> {
        Ok(ProblemError::from_boxed(self.from_value(json)?))
    }

    /// Routes a decoded document to its registered constructor, if any. The
    /// default type never dispatches.
    pub(crate) fn dispatch(
        &self,
        raw: DefaultProblem,
    ) -> Result<Box<dyn Problem>, serde_json::Error> {
        let constructor = if raw.type_url() == DEFAULT_TYPE {
            None
        } else {
            self.subtypes.get(raw.type_url())
        };
        if let Some(build) = constructor {
            build(raw)
        } else {
            Ok(Box::new(raw))
        }
    }
}

impl Default for ProblemModule {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProblemModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProblemModule")
            .field("stack_traces", &self.stack_traces)
            .field("statuses", &self.statuses)
            .field("subtypes", &self.subtypes.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http::StatusCode;
    use problem::{StandardStatuses, StatusType};

    struct CustomStatuses;

    impl StatusSource for CustomStatuses {
        fn values(&self) -> Vec<Arc<dyn StatusType>> {
            vec![Arc::new(StatusCode::OK)]
        }
    }

    #[test]
    fn default_constructor_builds_the_index() {
        let module = ProblemModule::new();
        assert!(!module.status_index().is_empty());
        assert!(module.status_index().get(404).is_some());
        assert!(!module.stack_traces());
    }

    #[test]
    fn duplicate_status_codes_are_rejected() {
        let result = ProblemModule::from_sources(&[&StandardStatuses, &CustomStatuses]);
        assert!(matches!(result, Err(Error::DuplicateStatusCode(200))));
    }

    #[test]
    fn with_stack_traces_keeps_the_index() {
        let module = ProblemModule::new();
        let traced = module.clone().with_stack_traces(true);
        assert!(traced.stack_traces());
        assert!(!module.stack_traces());
        assert_eq!(module.status_index().len(), traced.status_index().len());
    }

    #[test]
    fn module_identity() {
        let module = ProblemModule::new();
        assert_eq!(module.name(), "ProblemModule");
        assert_eq!(module.version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn module_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProblemModule>();
    }
}
