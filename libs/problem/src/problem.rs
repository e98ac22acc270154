//! The problem document contract and its catch-all implementation.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use serde_json::Value;

use crate::status::StatusType;

/// The default problem type, implied when a document carries no `type`.
pub const DEFAULT_TYPE: &str = "about:blank";

/// Additional problem members, keyed by field name in insertion order.
pub type Parameters = IndexMap<String, Value>;

static EMPTY_PARAMETERS: LazyLock<Parameters> = LazyLock::new(Parameters::new);

/// An RFC 7807 problem details document.
///
/// Concrete problem types implement this; [`DefaultProblem`] is the generic
/// catch-all. `as_any` recovers the concrete type after a polymorphic decode.
pub trait Problem: fmt::Debug + Send + Sync {
    /// A URI reference identifying the problem type.
    fn type_url(&self) -> &str;

    /// A short, human-readable summary of the problem type.
    fn title(&self) -> Option<&str>;

    /// The HTTP status code for this occurrence of the problem.
    fn status(&self) -> Option<&dyn StatusType>;

    /// A human-readable explanation specific to this occurrence.
    fn detail(&self) -> Option<&str>;

    /// A URI reference identifying this specific occurrence.
    fn instance(&self) -> Option<&str>;

    /// Additional members beyond the standard five, in insertion order.
    fn parameters(&self) -> &Parameters {
        &EMPTY_PARAMETERS
    }

    /// The underlying problem, if this one was caused by another.
    fn cause(&self) -> Option<&dyn Problem> {
        None
    }

    /// Upcast for concrete-type recovery after a polymorphic decode.
    fn as_any(&self) -> &dyn Any;
}

/// The generic problem document; every field of the contract is stored.
///
/// Serves as the decode fallback when no concrete type is registered for a
/// `type` URI, with unrecognized members collected into `parameters`.
#[derive(Debug)]
#[must_use]
pub struct DefaultProblem {
    type_url: String,
    title: Option<String>,
    status: Option<Arc<dyn StatusType>>,
    detail: Option<String>,
    instance: Option<String>,
    parameters: Parameters,
    cause: Option<Box<dyn Problem>>,
}

impl DefaultProblem {
    /// A problem carrying just a status and its reason phrase as the title.
    pub fn of(status: impl StatusType + 'static) -> Self {
        let title = status.reason_phrase().to_owned();
        Self::builder().with_title(title).with_status(status).build()
    }

    pub fn builder() -> ProblemBuilder {
        ProblemBuilder::default()
    }

    /// Assembles a problem from already-decoded parts. Intended for codecs;
    /// applications normally go through [`DefaultProblem::builder`].
    pub fn from_parts(
        type_url: String,
        title: Option<String>,
        status: Option<Arc<dyn StatusType>>,
        detail: Option<String>,
        instance: Option<String>,
        parameters: Parameters,
        cause: Option<Box<dyn Problem>>,
    ) -> Self {
        Self {
            type_url,
            title,
            status,
            detail,
            instance,
            parameters,
            cause,
        }
    }
}

impl Problem for DefaultProblem {
    fn type_url(&self) -> &str {
        &self.type_url
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn status(&self) -> Option<&dyn StatusType> {
        self.status.as_deref()
    }

    fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn cause(&self) -> Option<&dyn Problem> {
        self.cause.as_deref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Builder for [`DefaultProblem`].
#[derive(Debug, Default)]
#[must_use]
pub struct ProblemBuilder {
    type_url: Option<String>,
    title: Option<String>,
    status: Option<Arc<dyn StatusType>>,
    detail: Option<String>,
    instance: Option<String>,
    parameters: Parameters,
    cause: Option<Box<dyn Problem>>,
}

impl ProblemBuilder {
    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = Some(type_url.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_status(mut self, status: impl StatusType + 'static) -> Self {
        self.status = Some(Arc::new(status));
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Adds an additional member. Members keep their insertion order.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_cause(mut self, cause: impl Problem + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn build(self) -> DefaultProblem {
        DefaultProblem {
            type_url: self.type_url.unwrap_or_else(|| DEFAULT_TYPE.to_owned()),
            title: self.title,
            status: self.status,
            detail: self.detail,
            instance: self.instance,
            parameters: self.parameters,
            cause: self.cause,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn problem_builder_pattern() {
        let problem = DefaultProblem::builder()
            .with_type("https://example.org/out-of-stock")
            .with_title("Out of Stock")
            .with_status(StatusCode::BAD_REQUEST)
            .with_detail("Item B00027Y5QG is no longer available")
            .with("product", "B00027Y5QG")
            .build();

        assert_eq!(problem.type_url(), "https://example.org/out-of-stock");
        assert_eq!(problem.title(), Some("Out of Stock"));
        assert_eq!(problem.status().map(StatusType::status_code), Some(400));
        assert_eq!(
            problem.detail(),
            Some("Item B00027Y5QG is no longer available")
        );
        assert_eq!(problem.parameters()["product"], "B00027Y5QG");
    }

    #[test]
    fn unset_type_defaults_to_about_blank() {
        let problem = DefaultProblem::builder().with_title("Foo").build();
        assert_eq!(problem.type_url(), DEFAULT_TYPE);
    }

    #[test]
    fn of_uses_the_reason_phrase_as_title() {
        let problem = DefaultProblem::of(StatusCode::NOT_FOUND);
        assert_eq!(problem.title(), Some("Not Found"));
        assert_eq!(problem.status().map(StatusType::status_code), Some(404));
        assert_eq!(problem.detail(), None);
        assert_eq!(problem.instance(), None);
    }

    #[test]
    fn parameters_keep_insertion_order() {
        let problem = DefaultProblem::builder()
            .with("zulu", 1)
            .with("alpha", 2)
            .with("mike", 3)
            .build();

        let keys: Vec<&str> = problem.parameters().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zulu", "alpha", "mike"]);
    }

    #[test]
    fn cause_chain_is_reachable() {
        let problem = DefaultProblem::builder()
            .with_title("outer")
            .with_cause(DefaultProblem::builder().with_title("inner").build())
            .build();

        let cause = problem.cause().expect("cause was set");
        assert_eq!(cause.title(), Some("inner"));
        assert!(cause.cause().is_none());
    }
}
