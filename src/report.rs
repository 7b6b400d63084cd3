//! Reporting of non-fatal conditions found while reading records.
//!
//! Accessors never fail on a missing field or an unexpected number of
//! occurrences. They describe the problem as a [`Condition`], hand it to the
//! [`Reporter`] they were constructed with, and return `None` or a best-effort
//! value.
//!
//! [`TracingReporter`] forwards conditions to `tracing`. [`MemoryReporter`]
//! keeps them in memory so callers and tests can inspect them.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Severity of a reported condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Data was returned, but not in the expected shape
    Warning,
    /// Nothing could be returned
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Kind of a reported condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    /// The requested tag does not occur in the record
    MissingField,
    /// The tag occurs, but none of its rows carries the subfield
    MissingSubfield,
    /// A tag expected to be unique occurs zero or several times
    FieldCardinality,
    /// A subfield expected to be unrepeated occurs several times
    SubfieldCardinality,
    /// Two parallel lists that should align differ in length
    LengthMismatch,
    /// A composite value lacks the expected component
    MalformedValue,
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MissingField => "missing-field",
            Self::MissingSubfield => "missing-subfield",
            Self::FieldCardinality => "field-cardinality",
            Self::SubfieldCardinality => "subfield-cardinality",
            Self::LengthMismatch => "length-mismatch",
            Self::MalformedValue => "malformed-value",
        };
        f.write_str(name)
    }
}

/// A non-fatal condition found while reading a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Name of the schema layer that found the condition, e.g. `PicaJson`
    pub schema: String,
    /// What went wrong
    pub kind: ConditionKind,
    /// How bad it is
    pub severity: Severity,
    /// Human readable description
    pub message: String,
}

impl Condition {
    /// Create a warning.
    #[must_use]
    pub fn warning(schema: &str, kind: ConditionKind, message: impl Into<String>) -> Self {
        Condition {
            schema: schema.to_string(),
            kind,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Create an error.
    #[must_use]
    pub fn error(schema: &str, kind: ConditionKind, message: impl Into<String>) -> Self {
        Condition {
            schema: schema.to_string(),
            kind,
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.schema, self.message)
    }
}

/// Sink for conditions found by accessors.
///
/// Implementations must be shareable between threads, since accessors may be
/// read concurrently.
pub trait Reporter: Send + Sync + fmt::Debug {
    /// Record one condition.
    fn report(&self, condition: &Condition);
}

/// Reporter that emits every condition as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, condition: &Condition) {
        match condition.severity {
            Severity::Warning => tracing::warn!(
                schema = %condition.schema,
                kind = %condition.kind,
                "{}: {}",
                condition.schema,
                condition.message
            ),
            Severity::Error => tracing::error!(
                schema = %condition.schema,
                kind = %condition.kind,
                "{}: {}",
                condition.schema,
                condition.message
            ),
        }
    }
}

/// Reporter that stores conditions in memory.
///
/// Clones share the same storage, so a clone can be handed to an accessor
/// while the original is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryReporter {
    conditions: Arc<Mutex<Vec<Condition>>>,
}

impl MemoryReporter {
    /// Create an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all conditions reported so far.
    #[must_use]
    pub fn conditions(&self) -> Vec<Condition> {
        self.lock().clone()
    }

    /// Conditions of the given kind.
    #[must_use]
    pub fn of_kind(&self, kind: ConditionKind) -> Vec<Condition> {
        self.lock()
            .iter()
            .filter(|c| c.kind == kind)
            .cloned()
            .collect()
    }

    /// Whether nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop all stored conditions.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // A poisoned lock still holds valid conditions.
    fn lock(&self) -> MutexGuard<'_, Vec<Condition>> {
        self.conditions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, condition: &Condition) {
        self.lock().push(condition.clone());
    }
}
