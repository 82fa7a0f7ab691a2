//! Sink-specific rendering of a record into wire text.
//!
//! Rendering walks the record's fields in order, skips those masked out of
//! the target sink, and joins the rest with single spaces. The caller owns
//! the output buffer: one buffer per audit call, pre-sized on first use
//! and cleared (capacity kept) between the two sink renders.

use std::fmt::Write;

use crate::field::{FieldValue, Sink};
use crate::record::Record;
use crate::transport::AuditTransport;

/// Suggested initial capacity for a render buffer. Generous enough that a
/// typical two-sink call never regrows.
pub const RENDER_BUF_CAPACITY: usize = 256;

impl Record {
    /// Renders this record for the log sink, appending to `buf`.
    ///
    /// String values are placed verbatim between literal double quotes.
    /// Embedded quotes are not escaped; a limitation inherited from the
    /// log stream's own line format.
    pub fn render_log(&self, buf: &mut String) {
        for field in self.fields() {
            if !field.sinks().contains(Sink::Log) {
                continue;
            }
            if !buf.is_empty() {
                buf.push(' ');
            }
            match field.value() {
                FieldValue::Str(value) => {
                    let _ = write!(buf, "{}=\"{value}\"", field.name());
                }
                FieldValue::U64(value) => {
                    let _ = write!(buf, "{}={value}", field.name());
                }
            }
        }
    }

    /// Renders this record for the external audit sink, appending to `buf`.
    ///
    /// Values flagged needs-encoding go through `transport`'s canonical
    /// name=value encoding; a value the transport cannot safely encode is
    /// rendered as the visible `name=???` placeholder, never passed through
    /// raw.
    pub fn render_audit(&self, transport: &dyn AuditTransport, buf: &mut String) {
        for field in self.fields() {
            if !field.sinks().contains(Sink::Audit) {
                continue;
            }
            if !buf.is_empty() {
                buf.push(' ');
            }
            match field.value() {
                FieldValue::Str(value) if field.needs_encoding() => {
                    match transport.encode_nv(field.name(), value) {
                        Some(encoded) => buf.push_str(&encoded),
                        None => {
                            let _ = write!(buf, "{}=???", field.name());
                        }
                    }
                }
                FieldValue::Str(value) => {
                    let _ = write!(buf, "{}={value}", field.name());
                }
                FieldValue::U64(value) => {
                    let _ = write!(buf, "{}={value}", field.name());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, SinkSet};
    use crate::subject::{ActorContext, ActorIdentity};
    use crate::transport::MemoryTransport;

    fn render_both(record: &Record) -> (String, String) {
        let transport = MemoryTransport::new();
        let mut buf = String::with_capacity(RENDER_BUF_CAPACITY);
        record.render_log(&mut buf);
        let log = buf.clone();
        buf.clear();
        record.render_audit(&transport, &mut buf);
        (log, buf)
    }

    #[test]
    fn test_render_uint_any_sink() {
        let record = Record::build(
            "device-up",
            vec![Field::uint("ifindex", 3, SinkSet::ALL)],
            None,
            true,
            None,
        );
        let (log, audit) = render_both(&record);
        assert_eq!(log, "op=\"device-up\" ifindex=3 result=\"success\"");
        assert_eq!(audit, "op=device-up ifindex=3 result=success");
    }

    #[test]
    fn test_render_string_quoting_differs_per_sink() {
        let record = Record::build(
            "reload",
            vec![Field::str("arg", "eth0", true, SinkSet::ALL)],
            None,
            true,
            None,
        );
        let (log, audit) = render_both(&record);
        assert_eq!(log, "op=\"reload\" arg=\"eth0\" result=\"success\"");
        assert_eq!(audit, "op=reload arg=eth0 result=success");
    }

    #[test]
    fn test_render_unencodable_value_placeholder() {
        let record = Record::build(
            "device-up",
            vec![Field::str("interface", "wl an0", true, SinkSet::ALL)],
            None,
            true,
            None,
        );
        let (log, audit) = render_both(&record);
        assert_eq!(log, "op=\"device-up\" interface=\"wl an0\" result=\"success\"");
        assert_eq!(audit, "op=device-up interface=??? result=success");
    }

    #[test]
    fn test_render_skips_masked_fields_without_reordering() {
        let record = Record::build(
            "reload",
            vec![
                Field::str("arg", "eth0", true, SinkSet::ALL),
                Field::str("detail", "log-only", false, SinkSet::LOG),
                Field::uint("attempt", 2, SinkSet::ALL),
            ],
            None,
            false,
            Some("policy denied"),
        );
        let (log, audit) = render_both(&record);
        assert_eq!(
            log,
            "op=\"reload\" arg=\"eth0\" detail=\"log-only\" attempt=2 result=\"fail\" reason=\"policy denied\""
        );
        assert_eq!(audit, "op=reload arg=eth0 attempt=2 result=fail");
    }

    #[test]
    fn test_render_no_leading_separator() {
        let record = Record::build("reload", Vec::new(), None, true, None);
        let (log, audit) = render_both(&record);
        assert!(!log.starts_with(' '));
        assert!(!audit.starts_with(' '));
    }

    #[test]
    fn test_render_embedded_quote_not_escaped() {
        // Known limitation of the log line format, pinned on purpose.
        let record = Record::build(
            "rename",
            vec![Field::str("name", "say \"hi\"", true, SinkSet::ALL)],
            None,
            true,
            None,
        );
        let mut buf = String::new();
        record.render_log(&mut buf);
        assert_eq!(buf, "op=\"rename\" name=\"say \"hi\"\" result=\"success\"");
    }

    #[test]
    fn test_render_subject_fields() {
        let actor = ActorContext::Identity(ActorIdentity::unix_process(100, 0));
        let record = Record::build(
            "reload",
            vec![Field::str("arg", "eth0", true, SinkSet::ALL)],
            Some(&actor),
            true,
            None,
        );
        let (log, audit) = render_both(&record);
        assert_eq!(log, "op=\"reload\" arg=\"eth0\" pid=100 uid=0 result=\"success\"");
        assert_eq!(audit, "op=reload arg=eth0 pid=100 uid=0 result=success");
    }

    #[test]
    fn test_buffer_reuse_keeps_capacity() {
        let record = Record::build("reload", Vec::new(), None, true, None);
        let mut buf = String::with_capacity(RENDER_BUF_CAPACITY);
        record.render_log(&mut buf);
        let cap = buf.capacity();
        buf.clear();
        record.render_audit(&MemoryTransport::new(), &mut buf);
        assert_eq!(buf.capacity(), cap);
    }
}
