//! The audit manager: lifecycle of the external transport plus per-call
//! dispatch to the active sinks.

use parking_lot::Mutex;
use tracing::{enabled, info, warn, Level};

use argus_config::{ConfigData, ConfigDiff};

use crate::encode::RENDER_BUF_CAPACITY;
use crate::field::{Field, SinkSet};
use crate::record::Record;
use crate::subject::ActorContext;
use crate::transport::{AuditTransport, TransportConnector, AUDIT_EVENT_CATEGORY};

/// A connection as the audit engine sees it.
///
/// Implemented by the host daemon's connection objects; the engine never
/// depends on their concrete types.
pub trait ConnectionInfo {
    /// Stable connection UUID.
    fn uuid(&self) -> &str;

    /// Human-chosen display identifier. May contain arbitrary characters.
    fn display_name(&self) -> &str;
}

/// A device as the audit engine sees it.
pub trait DeviceInfo {
    /// Kernel interface name. May contain arbitrary characters.
    fn interface(&self) -> &str;

    /// Kernel interface index, or 0 when the device has none yet. Only
    /// positive indexes are recorded.
    fn ifindex(&self) -> u32;
}

/// Constructs audit events and dispatches them to the active sinks.
///
/// One manager is created at process start and passed by reference to
/// every call site; there is no process-wide singleton. The manager owns
/// the optional external transport handle; absence is a normal state, and
/// every audit call tolerates it. The log sink is the ambient [`tracing`]
/// subsystem under the `argus::audit` target.
///
/// Audit calls are safe from any thread: each call renders into its own
/// buffer, and the transport handle is guarded by a mutex so dispatch
/// never observes a handle mid-transition.
pub struct AuditManager {
    connector: Box<dyn TransportConnector>,
    transport: Mutex<Option<Box<dyn AuditTransport>>>,
}

impl std::fmt::Debug for AuditManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditManager")
            .field("transport_open", &self.transport.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl AuditManager {
    /// Creates a manager, opening the external transport if the initial
    /// configuration enables auditing.
    ///
    /// A transport that fails to open is logged and tolerated: the manager
    /// starts with the audit sink inactive and the host process carries on.
    #[must_use]
    pub fn new(data: &ConfigData, connector: Box<dyn TransportConnector>) -> Self {
        let manager = Self {
            connector,
            transport: Mutex::new(None),
        };
        if data.audit_enabled() {
            manager.open_transport();
        }
        manager
    }

    /// Creates a manager backed by the system audit daemon socket,
    /// honoring the configured socket path override.
    #[cfg(unix)]
    #[must_use]
    pub fn with_system_transport(data: &ConfigData) -> Self {
        use crate::transport::UnixDatagramConnector;

        let connector = data
            .audit_socket()
            .map_or_else(UnixDatagramConnector::default, UnixDatagramConnector::new);
        Self::new(data, Box::new(connector))
    }

    /// Applies a new configuration snapshot.
    ///
    /// Called by the host's configuration reload loop with the snapshot
    /// and the diff it computed. Reloads that did not change the audit
    /// flag are ignored; the open/close transitions are idempotent.
    pub fn apply_config(&self, data: &ConfigData, diff: ConfigDiff) {
        if !diff.contains(ConfigDiff::AUDIT) {
            return;
        }
        if data.audit_enabled() {
            self.open_transport();
        } else {
            self.close_transport();
        }
    }

    /// Tears the manager down, closing the transport if open.
    ///
    /// Idempotent; dropping the manager releases the handle too, this only
    /// makes the release an explicit point in the host's shutdown path.
    pub fn close(&self) {
        self.close_transport();
    }

    /// Returns true if at least one sink would currently receive events.
    ///
    /// Purely a query with no side effects. Callers may use it to skip
    /// assembling expensive field values, but calling the log methods
    /// unconditionally is always safe: inactivity is free.
    #[must_use]
    pub fn is_auditing_active(&self) -> bool {
        self.transport.lock().is_some() || enabled!(target: "argus::audit", Level::INFO)
    }

    /// Records a connection operation.
    ///
    /// When `connection` is supplied, its UUID and display name become
    /// domain fields; the display name is user-chosen and therefore
    /// encoded for the audit sink.
    pub fn log_connection_event(
        &self,
        operation: &str,
        connection: Option<&dyn ConnectionInfo>,
        result: bool,
        args: Option<&str>,
        actor: Option<&ActorContext<'_>>,
        reason: Option<&str>,
    ) {
        let mut fields = Vec::new();
        if let Some(connection) = connection {
            fields.push(Field::str("uuid", connection.uuid(), false, SinkSet::ALL));
            fields.push(Field::str(
                "name",
                connection.display_name(),
                true,
                SinkSet::ALL,
            ));
        }
        if let Some(args) = args {
            fields.push(Field::str("args", args, false, SinkSet::ALL));
        }
        self.log_event(operation, fields, actor, result, reason);
    }

    /// Records a device operation. The device is mandatory.
    pub fn log_device_event(
        &self,
        operation: &str,
        device: &dyn DeviceInfo,
        result: bool,
        args: Option<&str>,
        actor: Option<&ActorContext<'_>>,
        reason: Option<&str>,
    ) {
        let mut fields = vec![Field::str(
            "interface",
            device.interface(),
            true,
            SinkSet::ALL,
        )];
        let ifindex = device.ifindex();
        if ifindex > 0 {
            fields.push(Field::uint("ifindex", u64::from(ifindex), SinkSet::ALL));
        }
        if let Some(args) = args {
            fields.push(Field::str("args", args, false, SinkSet::ALL));
        }
        self.log_event(operation, fields, actor, result, reason);
    }

    /// Records a generic operation with a single mandatory argument.
    pub fn log_generic_event(
        &self,
        operation: &str,
        arg: &str,
        result: bool,
        actor: Option<&ActorContext<'_>>,
        reason: Option<&str>,
    ) {
        let fields = vec![Field::str("arg", arg, true, SinkSet::ALL)];
        self.log_event(operation, fields, actor, result, reason);
    }

    /// Records an operation with caller-assembled domain fields.
    ///
    /// This is the generic entry the shaped wrappers build on; domain
    /// fields pass through in caller order, uninspected.
    pub fn log_event(
        &self,
        operation: &str,
        domain_fields: Vec<Field>,
        actor: Option<&ActorContext<'_>>,
        result: bool,
        reason: Option<&str>,
    ) {
        if operation.is_empty() {
            debug_assert!(false, "audit operation name must not be empty");
            warn!(target: "argus::audit", "dropping audit event with empty operation name");
            return;
        }

        let log_active = enabled!(target: "argus::audit", Level::INFO);
        let transport = self.transport.lock();
        if !log_active && transport.is_none() {
            return;
        }

        let record = Record::build(operation, domain_fields, actor, result, reason);
        let mut buf = String::with_capacity(RENDER_BUF_CAPACITY);

        if log_active {
            record.render_log(&mut buf);
            info!(target: "argus::audit", "{buf}");
        }

        if let Some(transport) = transport.as_deref() {
            buf.clear();
            record.render_audit(transport, &mut buf);
            // Best effort: a failed write is neither retried nor reported.
            let _ = transport.write_event(&buf, AUDIT_EVENT_CATEGORY, result);
        }
    }

    fn open_transport(&self) {
        let mut guard = self.transport.lock();
        if guard.is_some() {
            return;
        }
        match self.connector.connect() {
            Ok(handle) => *guard = Some(handle),
            Err(err) => {
                warn!(target: "argus::audit", "audit transport not opened: {err}");
            }
        }
    }

    fn close_transport(&self) {
        self.transport.lock().take();
    }
}
