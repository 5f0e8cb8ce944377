//! Terminal confirmation standing in for a biometric prompt.

use std::io::{self, Write};

use hashmoji_identity::BiometricGate;

/// Asks on the terminal before revealing secrets.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptGate;

impl BiometricGate for PromptGate {
    fn authorize(&self, reason: &str) -> bool {
        eprint!("{reason}? [y/N] ");
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if let Err(e) = io::stdin().read_line(&mut answer) {
            tracing::warn!(error = %e, "Failed to read confirmation");
            return false;
        }
        is_affirmative(&answer)
    }
}

/// Returns whether a prompt answer means yes. Anything else is no.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
