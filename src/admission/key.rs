//! Client identity used for rate-limit bucketing.

use std::fmt;

/// Network address plus the scope tag of the protected endpoint.
///
/// Two endpoints sharing a scope share a quota; the same address under
/// different scopes is counted separately.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey {
    address: String,
    scope: String,
}

impl ClientKey {
    pub fn new(address: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            scope: scope.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope, self.address)
    }
}
