//! The external security-audit transport boundary.
//!
//! The engine treats the transport as an optional resource behind two
//! small object-safe traits: [`AuditTransport`] for an open handle and
//! [`TransportConnector`] for (re)opening one. The concrete transports
//! here are a Unix-datagram client speaking to an audit daemon socket and
//! an in-memory double for tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::TransportError;

/// Event-category tag carried on every transport write.
///
/// The transport side files engine events under a single category; the
/// distinction between operations lives in the message fields, not here.
pub const AUDIT_EVENT_CATEGORY: &str = "trusted-app";

/// Returns the transport's canonical key=value encoding of `value`, or
/// `None` if the value cannot be safely represented.
///
/// The accepted set is deliberately narrow: ASCII alphanumerics and
/// `- _ . / :`. Anything else, including spaces, quotes, control bytes, and non-ASCII,
/// is rejected, and the encoder renders the `name=???` placeholder instead
/// of an unsafe or truncated record.
#[must_use]
pub fn encode_nv(name: &str, value: &str) -> Option<String> {
    if value.is_empty() || !value.bytes().all(is_safe_byte) {
        return None;
    }
    Some(format!("{name}={value}"))
}

const fn is_safe_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'/' | b':')
}

/// An open handle to the external audit transport.
///
/// Implementations must tolerate concurrent callers; a write either
/// succeeds or fails opaquely, and the engine never retries.
pub trait AuditTransport: Send + Sync {
    /// Performs a single best-effort write of one rendered event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be delivered. The engine
    /// swallows it; the error type exists for the transport's own callers
    /// and tests.
    fn write_event(
        &self,
        message: &str,
        category: &str,
        success: bool,
    ) -> Result<(), TransportError>;

    /// Encodes one name=value pair per this transport's wire convention.
    ///
    /// The default is the canonical [`encode_nv`] convention; a transport
    /// with its own escaping rules may override it.
    fn encode_nv(&self, name: &str, value: &str) -> Option<String> {
        encode_nv(name, value)
    }
}

impl<T: AuditTransport + ?Sized> AuditTransport for Arc<T> {
    fn write_event(
        &self,
        message: &str,
        category: &str,
        success: bool,
    ) -> Result<(), TransportError> {
        (**self).write_event(message, category, success)
    }

    fn encode_nv(&self, name: &str, value: &str) -> Option<String> {
        (**self).encode_nv(name, value)
    }
}

/// Opens audit transport handles for the lifecycle controller.
pub trait TransportConnector: Send + Sync {
    /// Attempts to open the transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be opened; the lifecycle
    /// controller logs it and stays closed.
    fn connect(&self) -> Result<Box<dyn AuditTransport>, TransportError>;
}

/// A transport that sends events as datagrams to an audit daemon's Unix
/// socket.
///
/// Delivery is best-effort by construction: datagrams carry no
/// acknowledgement, and a full receive buffer surfaces as an opaque write
/// error the engine swallows.
#[cfg(unix)]
#[derive(Debug)]
pub struct UnixDatagramTransport {
    socket: std::os::unix::net::UnixDatagram,
}

#[cfg(unix)]
impl UnixDatagramTransport {
    /// Connects to the audit daemon socket at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Open`] if the socket cannot be created or
    /// connected.
    pub fn connect(path: &std::path::Path) -> Result<Self, TransportError> {
        let open_err = |source| TransportError::Open {
            path: path.display().to_string(),
            source,
        };
        let socket = std::os::unix::net::UnixDatagram::unbound().map_err(open_err)?;
        socket.connect(path).map_err(open_err)?;
        Ok(Self { socket })
    }
}

#[cfg(unix)]
impl AuditTransport for UnixDatagramTransport {
    fn write_event(
        &self,
        message: &str,
        category: &str,
        success: bool,
    ) -> Result<(), TransportError> {
        // Framing belongs to the daemon protocol, not to the engine: the
        // category tag and the numeric result wrap the rendered fields.
        let frame = format!("{category}: {message} res={}", u8::from(success));
        self.socket
            .send(frame.as_bytes())
            .map_err(|source| TransportError::Write { source })?;
        Ok(())
    }
}

/// Connector for [`UnixDatagramTransport`].
#[cfg(unix)]
#[derive(Debug, Clone)]
pub struct UnixDatagramConnector {
    path: std::path::PathBuf,
}

#[cfg(unix)]
impl UnixDatagramConnector {
    /// Default audit daemon socket path.
    pub const DEFAULT_SOCKET: &'static str = "/run/argus/audit.sock";

    /// Creates a connector for the socket at `path`.
    #[must_use]
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(unix)]
impl Default for UnixDatagramConnector {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SOCKET)
    }
}

#[cfg(unix)]
impl TransportConnector for UnixDatagramConnector {
    fn connect(&self) -> Result<Box<dyn AuditTransport>, TransportError> {
        Ok(Box::new(UnixDatagramTransport::connect(&self.path)?))
    }
}

/// One event captured by [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    /// The rendered field text.
    pub message: String,
    /// The event-category tag.
    pub category: String,
    /// The result flag the write carried.
    pub success: bool,
}

/// In-memory transport for testing.
///
/// Records every write and supports failure injection for both opening
/// (via [`MemoryConnector`]) and writing. The connect-failure knob lives
/// here rather than on the connector so tests can keep toggling it after
/// the connector has been boxed away into a manager.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    events: Mutex<Vec<RecordedEvent>>,
    fail_connect: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryTransport {
    /// Creates an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    /// Clears all recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Makes subsequent connect attempts through [`MemoryConnector`] fail.
    pub fn set_fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent writes fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl AuditTransport for MemoryTransport {
    fn write_event(
        &self,
        message: &str,
        category: &str,
        success: bool,
    ) -> Result<(), TransportError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TransportError::Unavailable {
                reason: "injected write failure".to_string(),
            });
        }
        self.events.lock().push(RecordedEvent {
            message: message.to_string(),
            category: category.to_string(),
            success,
        });
        Ok(())
    }
}

/// Connector handing out shared [`MemoryTransport`] handles.
#[derive(Debug, Default)]
pub struct MemoryConnector {
    transport: Arc<MemoryTransport>,
}

impl MemoryConnector {
    /// Creates a connector with a fresh transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared transport for inspection.
    #[must_use]
    pub fn transport(&self) -> Arc<MemoryTransport> {
        Arc::clone(&self.transport)
    }
}

impl TransportConnector for MemoryConnector {
    fn connect(&self) -> Result<Box<dyn AuditTransport>, TransportError> {
        if self.transport.fail_connect.load(Ordering::SeqCst) {
            return Err(TransportError::Unavailable {
                reason: "injected connect failure".to_string(),
            });
        }
        Ok(Box::new(Arc::clone(&self.transport)))
    }
}
