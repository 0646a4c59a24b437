//! Exit policy for CI gating

use crate::auditor::AuditSummary;

/// How findings translate into a process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitPolicy {
    /// Report only; always exit 0
    #[default]
    Informational,
    /// Fail on errors
    Ci,
    /// Fail on errors or warnings
    Strict,
}

impl ExitPolicy {
    /// `--strict` implies `--ci`
    pub fn from_flags(ci: bool, strict: bool) -> Self {
        if strict {
            ExitPolicy::Strict
        } else if ci {
            ExitPolicy::Ci
        } else {
            ExitPolicy::Informational
        }
    }

    /// Get exit code (0 = pass, 1 = gate failed)
    pub fn exit_code(&self, summary: &AuditSummary) -> i32 {
        let failed = match self {
            ExitPolicy::Informational => false,
            ExitPolicy::Ci => summary.has_errors(),
            ExitPolicy::Strict => summary.has_errors() || summary.has_warnings(),
        };
        i32::from(failed)
    }
}
