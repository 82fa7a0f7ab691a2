//! Resolution of "who performed this operation" into record fields.

use tracing::warn;

use crate::error::IdentityError;

/// A resolved actor identity: the Unix process credentials of whoever
/// requested the audited operation.
///
/// `None` components are unavailable and are omitted from the record
/// rather than emitted as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorIdentity {
    pid: Option<u32>,
    uid: Option<u32>,
}

impl ActorIdentity {
    /// Creates an identity from optional credentials.
    #[must_use]
    pub const fn new(pid: Option<u32>, uid: Option<u32>) -> Self {
        Self { pid, uid }
    }

    /// Creates an identity with both credentials known.
    #[must_use]
    pub const fn unix_process(pid: u32, uid: u32) -> Self {
        Self {
            pid: Some(pid),
            uid: Some(uid),
        }
    }

    /// Returns the process id, if available.
    #[must_use]
    pub const fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Returns the user id, if available.
    #[must_use]
    pub const fn uid(&self) -> Option<u32> {
        self.uid
    }
}

/// A wire-level invocation context an actor identity can be extracted from.
///
/// Implemented by the host daemon's request plumbing (a D-Bus invocation, a
/// control-socket session). Extraction may fail (a caller can vanish
/// before its credentials are read) and failure never fails the audit
/// call, only omits the subject fields.
pub trait Invocation {
    /// Resolves the caller's identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller's credentials cannot be determined.
    fn actor_identity(&self) -> Result<ActorIdentity, IdentityError>;
}

/// The caller-supplied description of who performed an audited operation.
#[derive(Clone, Copy)]
pub enum ActorContext<'a> {
    /// An already-resolved identity.
    Identity(ActorIdentity),

    /// A wire-level invocation context; the identity is extracted on
    /// demand and owned by the audit call.
    Invocation(&'a dyn Invocation),

    /// A context of unrecognized shape. Resolving it warns and yields no
    /// subject fields.
    Unknown,
}

impl std::fmt::Debug for ActorContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity(identity) => f.debug_tuple("Identity").field(identity).finish(),
            Self::Invocation(_) => f.write_str("Invocation(..)"),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Resolves an optional actor context into an optional identity.
///
/// An absent context yields no identity. An unrecognized or unextractable
/// context warns and yields no identity; the audit call proceeds without
/// subject fields.
pub(crate) fn resolve(actor: Option<&ActorContext<'_>>) -> Option<ActorIdentity> {
    match actor? {
        ActorContext::Identity(identity) => Some(*identity),
        ActorContext::Invocation(invocation) => match invocation.actor_identity() {
            Ok(identity) => Some(identity),
            Err(err) => {
                warn!(target: "argus::audit", "failed to resolve audit subject: {err}");
                None
            }
        },
        ActorContext::Unknown => {
            warn!(target: "argus::audit", "unrecognized actor context, omitting audit subject");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedInvocation(ActorIdentity);

    impl Invocation for FixedInvocation {
        fn actor_identity(&self) -> Result<ActorIdentity, IdentityError> {
            Ok(self.0)
        }
    }

    struct FailingInvocation;

    impl Invocation for FailingInvocation {
        fn actor_identity(&self) -> Result<ActorIdentity, IdentityError> {
            Err(IdentityError::Missing)
        }
    }

    #[test]
    fn test_resolve_absent_context() {
        assert_eq!(resolve(None), None);
    }

    #[test]
    fn test_resolve_identity_passthrough() {
        let ctx = ActorContext::Identity(ActorIdentity::unix_process(100, 0));
        let identity = resolve(Some(&ctx)).unwrap();
        assert_eq!(identity.pid(), Some(100));
        assert_eq!(identity.uid(), Some(0));
    }

    #[test]
    fn test_resolve_invocation_extraction() {
        let invocation = FixedInvocation(ActorIdentity::new(Some(42), None));
        let ctx = ActorContext::Invocation(&invocation);
        let identity = resolve(Some(&ctx)).unwrap();
        assert_eq!(identity.pid(), Some(42));
        assert_eq!(identity.uid(), None);
    }

    #[test]
    fn test_resolve_failed_extraction_yields_none() {
        let invocation = FailingInvocation;
        let ctx = ActorContext::Invocation(&invocation);
        assert_eq!(resolve(Some(&ctx)), None);
    }

    #[test]
    fn test_resolve_unknown_yields_none() {
        assert_eq!(resolve(Some(&ActorContext::Unknown)), None);
    }
}
