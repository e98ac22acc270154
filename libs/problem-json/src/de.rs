//! Read path: JSON to problems.

use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, Visitor};

use problem::{DefaultProblem, Parameters, Problem, DEFAULT_TYPE};

use crate::module::ProblemModule;

/// Stateful entry point: deserialization needs the module for status lookup
/// and subtype dispatch, which rules out a plain `Deserialize` impl.
pub(crate) struct ProblemSeed<'a> {
    pub(crate) module: &'a ProblemModule,
}

impl<'de> DeserializeSeed<'de> for ProblemSeed<'_> {
    type Value = Box<dyn Problem>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ProblemVisitor {
            module: self.module,
        })
    }
}

struct ProblemVisitor<'a> {
    module: &'a ProblemModule,
}

impl<'de> Visitor<'de> for ProblemVisitor<'_> {
    type Value = Box<dyn Problem>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an RFC 7807 problem object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut type_url: Option<String> = None;
        let mut title: Option<String> = None;
        let mut status: Option<u16> = None;
        let mut detail: Option<String> = None;
        let mut instance: Option<String> = None;
        let mut cause: Option<Box<dyn Problem>> = None;
        let mut parameters = Parameters::new();

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "type" => type_url = map.next_value()?,
                "title" => title = map.next_value()?,
                "status" => status = map.next_value()?,
                "detail" => detail = map.next_value()?,
                "instance" => instance = map.next_value()?,
                "cause" => {
                    cause = map.next_value_seed(CauseSeed {
                        module: self.module,
                    })?;
                }
                // Carrier baggage never re-enters the model; tolerated on
                // input, including the camelCase spelling.
                "stacktrace" | "stackTrace" | "message" | "localizedMessage" | "suppressed" => {
                    map.next_value::<IgnoredAny>()?;
                }
                _ => {
                    parameters.insert(key, map.next_value()?);
                }
            }
        }

        let status = status.map(|code| self.module.status_index().resolve(code));
        let raw = DefaultProblem::from_parts(
            type_url.unwrap_or_else(|| DEFAULT_TYPE.to_owned()),
            title,
            status,
            detail,
            instance,
            parameters,
            cause,
        );
        self.module.dispatch(raw).map_err(de::Error::custom)
    }
}

/// `cause` may be `null`; a bare [`ProblemSeed`] would reject that.
struct CauseSeed<'a> {
    module: &'a ProblemModule,
}

impl<'de> DeserializeSeed<'de> for CauseSeed<'_> {
    type Value = Option<Box<dyn Problem>>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(CauseVisitor {
            module: self.module,
        })
    }
}

struct CauseVisitor<'a> {
    module: &'a ProblemModule,
}

impl<'de> Visitor<'de> for CauseVisitor<'_> {
    type Value = Option<Box<dyn Problem>>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a nested problem object or null")
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        ProblemSeed {
            module: self.module,
        }
        .deserialize(deserializer)
        .map(Some)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }
}
