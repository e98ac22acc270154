//! The carrier that lets a problem travel as a Rust error.

use std::any::Any;
use std::error::Error;
use std::fmt;

use backtrace::Backtrace;

use crate::problem::{Parameters, Problem};
use crate::status::StatusType;

/// A [`Problem`] raised as an error.
///
/// Owns the problem value together with a backtrace captured at construction,
/// so a problem decoded from the wire observes the decode site. The carrier
/// itself never reaches the wire; the codec decides whether to render the
/// backtrace.
#[derive(Debug)]
pub struct ProblemError {
    problem: Box<dyn Problem>,
    backtrace: Backtrace,
}

impl ProblemError {
    pub fn new(problem: impl Problem + 'static) -> Self {
        Self::from_boxed(Box::new(problem))
    }

    pub fn from_boxed(problem: Box<dyn Problem>) -> Self {
        Self {
            problem,
            backtrace: Backtrace::new(),
        }
    }

    #[must_use]
    pub fn problem(&self) -> &dyn Problem {
        self.problem.as_ref()
    }

    #[must_use]
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    #[must_use]
    pub fn into_problem(self) -> Box<dyn Problem> {
        self.problem
    }
}

impl From<Box<dyn Problem>> for ProblemError {
    fn from(problem: Box<dyn Problem>) -> Self {
        Self::from_boxed(problem)
    }
}

impl fmt::Display for ProblemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.problem.title(), self.problem.detail()) {
            (Some(title), Some(detail)) => write!(f, "{title}: {detail}"),
            (Some(title), None) => f.write_str(title),
            (None, Some(detail)) => f.write_str(detail),
            (None, None) => f.write_str(self.problem.type_url()),
        }
    }
}

impl Error for ProblemError {}

// The carrier answers the problem contract by delegation, so it can be
// handed to anything that consumes problems, concrete subtype included.
impl Problem for ProblemError {
    fn type_url(&self) -> &str {
        self.problem.type_url()
    }

    fn title(&self) -> Option<&str> {
        self.problem.title()
    }

    fn status(&self) -> Option<&dyn StatusType> {
        self.problem.status()
    }

    fn detail(&self) -> Option<&str> {
        self.problem.detail()
    }

    fn instance(&self) -> Option<&str> {
        self.problem.instance()
    }

    fn parameters(&self) -> &Parameters {
        self.problem.parameters()
    }

    fn cause(&self) -> Option<&dyn Problem> {
        self.problem.cause()
    }

    fn as_any(&self) -> &dyn Any {
        self.problem.as_any()
    }
}
