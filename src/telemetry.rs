//! Structured observability hook injected into the view.

use std::{cell::RefCell, fmt};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

pub type Fields<'a> = &'a [(&'static str, String)];

pub trait Telemetry {
    fn emit(&self, level: Level, event: &'static str, fields: Fields<'_>);
}

/// Forwards every event to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn emit(&self, level: Level, event: &'static str, fields: Fields<'_>) {
        let fields = FieldList(fields);
        match level {
            Level::Debug => tracing::debug!(event = event, fields = %fields),
            Level::Info => tracing::info!(event = event, fields = %fields),
            Level::Warn => tracing::warn!(event = event, fields = %fields),
            Level::Error => tracing::error!(event = event, fields = %fields),
        }
    }
}

struct FieldList<'a>(Fields<'a>);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Record {
    pub level: Level,
    pub event: &'static str,
    pub fields: Vec<(&'static str, String)>,
}

impl Record {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemoryTelemetry {
    records: RefCell<Vec<Record>>,
}

impl MemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.borrow().clone()
    }

    pub fn events(&self, event: &str) -> Vec<Record> {
        self.records
            .borrow()
            .iter()
            .filter(|r| r.event == event)
            .cloned()
            .collect()
    }

    pub fn count_at(&self, level: Level) -> usize {
        self.records.borrow().iter().filter(|r| r.level == level).count()
    }
}

impl Telemetry for MemoryTelemetry {
    fn emit(&self, level: Level, event: &'static str, fields: Fields<'_>) {
        self.records.borrow_mut().push(Record {
            level,
            event,
            fields: fields.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_telemetry_records_in_order() {
        let t = MemoryTelemetry::new();
        t.emit(Level::Info, "media.load", &[("mode", "slider".to_string())]);
        t.emit(Level::Warn, "direction.unknown", &[("value", "sideways".to_string())]);

        let all = t.records();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].event, "media.load");
        assert_eq!(all[0].field("mode"), Some("slider"));
        assert_eq!(t.events("direction.unknown").len(), 1);
        assert_eq!(t.count_at(Level::Warn), 1);
    }

    #[test]
    fn field_list_formats_as_key_value_pairs() {
        let fields = [("a", "1".to_string()), ("b", "two".to_string())];
        assert_eq!(FieldList(&fields).to_string(), "a=1 b=two");
    }
}
