//! Assembly of the canonical ordered field sequence for one audit event.

use crate::field::{Field, SinkSet};
use crate::subject::{self, ActorContext};

/// The fully assembled, ordered description of one audit event, prior to
/// sink-specific rendering.
///
/// Field order is fixed at build time and preserved by every rendering:
/// the operation name first, then the caller's domain fields in caller
/// order, then the resolved subject fields, then the result, then the
/// optional log-only reason.
#[derive(Debug, Clone)]
pub struct Record {
    fields: Vec<Field>,
}

impl Record {
    /// Builds the record for one audit event.
    ///
    /// `domain_fields` are taken as-is, in caller order; the builder does
    /// not inspect or special-case their names. The supplied `reason`, if
    /// any, is routed to the log sink only.
    ///
    /// `operation` must be non-empty; an empty name is a caller bug and is
    /// asserted against in debug builds.
    #[must_use]
    pub fn build(
        operation: &str,
        domain_fields: Vec<Field>,
        actor: Option<&ActorContext<'_>>,
        result: bool,
        reason: Option<&str>,
    ) -> Self {
        debug_assert!(!operation.is_empty(), "audit operation name must not be empty");

        let mut fields = Vec::with_capacity(domain_fields.len() + 5);
        fields.push(Field::str("op", operation, false, SinkSet::ALL));
        fields.extend(domain_fields);

        if let Some(identity) = subject::resolve(actor) {
            if let Some(pid) = identity.pid() {
                fields.push(Field::uint("pid", u64::from(pid), SinkSet::ALL));
            }
            if let Some(uid) = identity.uid() {
                fields.push(Field::uint("uid", u64::from(uid), SinkSet::ALL));
            }
        }

        fields.push(Field::str(
            "result",
            if result { "success" } else { "fail" },
            false,
            SinkSet::ALL,
        ));

        if let Some(reason) = reason {
            fields.push(Field::str("reason", reason, false, SinkSet::LOG));
        }

        Self { fields }
    }

    /// Returns the ordered fields of this record.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}
