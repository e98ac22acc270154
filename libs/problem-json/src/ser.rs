//! Write path: problems to JSON.

use backtrace::Backtrace;
use serde::ser::{Serialize, SerializeMap, Serializer};

use problem::{Problem, StatusType, DEFAULT_TYPE};

/// Normalizes the `type` member for the wire: the default URI is elided so
/// that documents round-trip (a decoded document without `type` gets
/// `about:blank`, which must not be written back).
pub(crate) fn wire_type(type_url: &str) -> Option<&str> {
    (type_url != DEFAULT_TYPE).then_some(type_url)
}

/// One string per native frame, most recent first, in the classic
/// `"\tat frame (file:line)"` shape.
pub(crate) fn render_stacktrace(backtrace: &Backtrace) -> Vec<String> {
    let mut rendered = Vec::new();
    for frame in backtrace.frames() {
        for symbol in frame.symbols() {
            let name = symbol
                .name()
                .map_or_else(|| String::from("<unknown>"), |name| name.to_string());
            match (symbol.filename(), symbol.lineno()) {
                (Some(file), Some(line)) => {
                    rendered.push(format!("\tat {name} ({}:{line})", file.display()));
                }
                _ => rendered.push(format!("\tat {name}")),
            }
        }
    }
    rendered
}

/// A problem dressed for the wire. Fields are emitted in the contract order:
/// `type`, `title`, `status`, `detail`, `instance`, flattened parameters,
/// `cause`, `stacktrace`.
pub(crate) struct SerializeProblem<'a> {
    pub(crate) problem: &'a dyn Problem,
    pub(crate) stacktrace: Option<&'a Backtrace>,
}

impl Serialize for SerializeProblem<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let problem = self.problem;
        let mut map = serializer.serialize_map(None)?;
        if let Some(type_url) = wire_type(problem.type_url()) {
            map.serialize_entry("type", type_url)?;
        }
        if let Some(title) = problem.title() {
            map.serialize_entry("title", title)?;
        }
        if let Some(status) = problem.status() {
            map.serialize_entry("status", &StatusWire(status))?;
        }
        if let Some(detail) = problem.detail() {
            map.serialize_entry("detail", detail)?;
        }
        if let Some(instance) = problem.instance() {
            map.serialize_entry("instance", instance)?;
        }
        for (key, value) in problem.parameters() {
            map.serialize_entry(key, value)?;
        }
        if let Some(cause) = problem.cause() {
            map.serialize_entry(
                "cause",
                &SerializeProblem {
                    problem: cause,
                    stacktrace: None,
                },
            )?;
        }
        if let Some(backtrace) = self.stacktrace {
            map.serialize_entry("stacktrace", &render_stacktrace(backtrace))?;
        }
        map.end()
    }
}

/// A status on the wire is its bare code; the reason phrase is recovered
/// from the index on read.
struct StatusWire<'a>(&'a dyn StatusType);

impl Serialize for StatusWire<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u16(self.0.status_code())
    }
}
