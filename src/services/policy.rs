//! Authorization policy applied to introspected claims.
//!
//! The checks run in a fixed order and stop at the first failure:
//! `Active` → `Audience` → `Tenant`. The order is part of the contract
//! (an inactive token is always reported as inactive, never as a tenant mismatch).
//!
//! The only request input is the tenant the caller claims (`X-Tenant-Id`);
//! header extraction stays in the api layer.

use thiserror::Error;

use crate::services::introspection::Claims;

/// Why a token was turned away. Only ever logged server-side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("token is inactive")]
    Inactive,
    #[error("token is missing proper audience")]
    MissingAudience,
    #[error("request is missing X-Tenant-Id header")]
    MissingTenantHeader,
    #[error("request's tenant ({request}) does not match token's ({token})")]
    TenantMismatch { request: String, token: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Forward the request as `user`.
    Allow { user: String },
    Deny(Rejection),
}

impl Verdict {
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Active,
    Audience,
    Tenant,
}

impl Check {
    /// Evaluation order.
    pub const ORDER: [Check; 3] = [Check::Active, Check::Audience, Check::Tenant];

    pub fn name(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Audience => "audience",
            Self::Tenant => "tenant",
        }
    }

    fn run(self, policy: &Policy, claims: &Claims, tenant_id: Option<&str>) -> Result<(), Rejection> {
        match self {
            Self::Active => {
                if !claims.active {
                    return Err(Rejection::Inactive);
                }
            }
            Self::Audience => {
                if !claims.has_audience(&policy.expected_audience) {
                    return Err(Rejection::MissingAudience);
                }
            }
            Self::Tenant => {
                if !policy.verify_tenant {
                    return Ok(());
                }

                let tenant = tenant_id
                    .filter(|t| !t.is_empty())
                    .ok_or(Rejection::MissingTenantHeader)?;

                if tenant != claims.tenant() {
                    return Err(Rejection::TenantMismatch {
                        request: tenant.to_string(),
                        token: claims.tenant().to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Read-only policy built once from `Config`.
#[derive(Debug, Clone)]
pub struct Policy {
    expected_audience: String,
    verify_tenant: bool,
}

impl Policy {
    pub fn new(expected_audience: impl Into<String>, verify_tenant: bool) -> Self {
        Self {
            expected_audience: expected_audience.into(),
            verify_tenant,
        }
    }

    /// `tenant_id` is the tenant the request claims, if any.
    pub fn evaluate(&self, claims: &Claims, tenant_id: Option<&str>) -> Verdict {
        for check in Check::ORDER {
            if let Err(rejection) = check.run(self, claims, tenant_id) {
                tracing::debug!(check = check.name(), "policy check failed");
                return Verdict::Deny(rejection);
            }
        }

        Verdict::Allow {
            user: claims.username.clone(),
        }
    }
}
