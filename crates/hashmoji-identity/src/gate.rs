//! Biometric authorization before revealing secrets.

/// A yes/no authorization check, typically backed by a device biometric
/// prompt.
pub trait BiometricGate: Send + Sync {
    /// Asks the user to authorize an action described by `reason`.
    fn authorize(&self, reason: &str) -> bool;
}

/// A gate with a fixed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticGate(bool);

impl StaticGate {
    /// A gate that always authorizes.
    #[must_use]
    pub const fn allow() -> Self {
        Self(true)
    }

    /// A gate that never authorizes.
    #[must_use]
    pub const fn deny() -> Self {
        Self(false)
    }
}

impl BiometricGate for StaticGate {
    fn authorize(&self, reason: &str) -> bool {
        tracing::debug!(reason, granted = self.0, "Static gate consulted");
        self.0
    }
}
