//! Admin gate for planet mutations.
//!
//! # Invariants
//! - Checked once at the entry of a guarded operation, never mid-operation.
//! - A denied check means the guarded operation must not touch storage.
//! - Denial is reported as `Forbidden`, never as not-found.

use super::identity::IdentityResolver;
use crate::repo::error::RepoError;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Admin gate failures.
#[derive(Debug)]
pub enum AdminGateError {
    /// Subject resolved, but does not hold admin privilege.
    Forbidden { subject: String },
    /// Resolver could not answer.
    Resolver(RepoError),
}

impl Display for AdminGateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forbidden { .. } => write!(
                f,
                "you cannot access this command, only available to admins"
            ),
            Self::Resolver(err) => write!(f, "identity resolution failed: {err}"),
        }
    }
}

impl Error for AdminGateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Forbidden { .. } => None,
            Self::Resolver(err) => Some(err),
        }
    }
}

/// Single-point admin predicate over an identity resolver.
pub struct AdminGate<I: IdentityResolver> {
    resolver: I,
}

impl<I: IdentityResolver> AdminGate<I> {
    pub fn new(resolver: I) -> Self {
        Self { resolver }
    }

    /// Returns whether `subject` may run admin-only operations.
    pub fn is_allowed(&self, subject: &str) -> Result<bool, AdminGateError> {
        self.resolver
            .is_admin(subject)
            .map_err(AdminGateError::Resolver)
    }

    /// Passes only when `subject` resolves to an admin.
    pub fn require_admin(&self, subject: &str) -> Result<(), AdminGateError> {
        match self.is_allowed(subject) {
            Ok(true) => {
                info!("event=admin_gate module=auth status=ok allowed=true");
                Ok(())
            }
            Ok(false) => {
                info!("event=admin_gate module=auth status=denied allowed=false");
                Err(AdminGateError::Forbidden {
                    subject: subject.to_string(),
                })
            }
            Err(err) => {
                error!(
                    "event=admin_gate module=auth status=error error_code=resolver_failed error={}",
                    err
                );
                Err(err)
            }
        }
    }
}
