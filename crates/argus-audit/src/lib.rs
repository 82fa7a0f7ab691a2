//! # Argus Audit
//!
//! Audit-event construction and dual-backend dispatch for the Argus
//! platform.
//!
//! Every audited operation ("operation X on entity Y by actor Z
//! succeeded or failed, because R") is assembled into one canonical,
//! ordered [`Record`] and delivered best-effort to up to two independent
//! sinks:
//!
//! - the daemon's own log stream, via [`tracing`] under the
//!   `argus::audit` target;
//! - an optional external security-audit transport, runtime-togglable
//!   through configuration.
//!
//! Neither sink is ever allowed to fail the operation being recorded: a
//! missing or broken transport degrades to an inactive sink, a value the
//! transport cannot encode is rendered as a visible `name=???`
//! placeholder, and write failures are swallowed.
//!
//! ## Example
//!
//! ```rust
//! use argus_audit::{AuditManager, MemoryConnector};
//! use argus_config::ConfigData;
//!
//! let config = ConfigData::default().with_audit_enabled(true);
//! let connector = MemoryConnector::new();
//! let audit_log = connector.transport();
//!
//! let manager = AuditManager::new(&config, Box::new(connector));
//! manager.log_generic_event("reload", "eth0", true, None, None);
//!
//! let events = audit_log.events();
//! assert_eq!(events[0].message, "op=reload arg=eth0 result=success");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod encode;
mod error;
mod field;
mod manager;
mod record;
mod subject;
mod transport;

#[cfg(test)]
mod proptest_tests;

pub use encode::RENDER_BUF_CAPACITY;
pub use error::{IdentityError, TransportError};
pub use field::{Field, FieldValue, Sink, SinkSet};
pub use manager::{AuditManager, ConnectionInfo, DeviceInfo};
pub use record::Record;
pub use subject::{ActorContext, ActorIdentity, Invocation};
pub use transport::{
    encode_nv, AuditTransport, MemoryConnector, MemoryTransport, RecordedEvent,
    TransportConnector, AUDIT_EVENT_CATEGORY,
};

#[cfg(unix)]
pub use transport::{UnixDatagramConnector, UnixDatagramTransport};
