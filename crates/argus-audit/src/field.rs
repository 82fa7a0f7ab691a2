//! Typed, named audit field values and the sink mask that routes them.

use std::ops::{BitOr, BitOrAssign};

/// A delivery target for rendered audit text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    /// The daemon's own structured log stream.
    Log,
    /// The external security-audit transport.
    Audit,
}

/// The set of sinks a field is routed to.
///
/// Fields not masked for a sink are skipped, never reordered, when the
/// record is rendered for that sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkSet(u8);

impl SinkSet {
    /// Log sink only.
    pub const LOG: Self = Self(0b01);

    /// External audit sink only.
    pub const AUDIT: Self = Self(0b10);

    /// Both sinks.
    pub const ALL: Self = Self(0b11);

    /// Returns true if `sink` is in the set.
    #[must_use]
    pub const fn contains(self, sink: Sink) -> bool {
        let bit = match sink {
            Sink::Log => Self::LOG.0,
            Sink::Audit => Self::AUDIT.0,
        };
        self.0 & bit != 0
    }
}

impl BitOr for SinkSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SinkSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// The value carried by a field.
///
/// Audit fields are strings or unsigned integers, nothing else; the closed
/// enum makes any other value kind unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A text value.
    Str(String),
    /// An unsigned integer value.
    U64(u64),
}

/// One named value of an audit record.
///
/// Fields are immutable once constructed and live only for the duration of
/// a single audit call; they are built by value and owned by the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: &'static str,
    value: FieldValue,
    sinks: SinkSet,
    needs_encoding: bool,
}

impl Field {
    /// Creates a string field.
    ///
    /// `needs_encoding` marks values that may contain characters unsafe for
    /// the audit transport's unquoted key=value format; it has no effect on
    /// the log sink or on integer fields.
    #[must_use]
    pub fn str(
        name: &'static str,
        value: impl Into<String>,
        needs_encoding: bool,
        sinks: SinkSet,
    ) -> Self {
        Self {
            name,
            value: FieldValue::Str(value.into()),
            sinks,
            needs_encoding,
        }
    }

    /// Creates an unsigned-integer field.
    #[must_use]
    pub const fn uint(name: &'static str, value: u64, sinks: SinkSet) -> Self {
        Self {
            name,
            value: FieldValue::U64(value),
            sinks,
            needs_encoding: false,
        }
    }

    /// Returns the field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the field value.
    #[must_use]
    pub const fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Returns the sinks this field is routed to.
    #[must_use]
    pub const fn sinks(&self) -> SinkSet {
        self.sinks
    }

    /// Returns whether the value needs the audit transport's encoding.
    #[must_use]
    pub const fn needs_encoding(&self) -> bool {
        self.needs_encoding
    }
}
