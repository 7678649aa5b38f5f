// SPDX-License-Identifier: MIT

//! The `Host` provider contract.

use async_trait::async_trait;

use crate::error::AdapterError;

/// A host a Job can be provisioned onto and booted on.
///
/// Equality and hashing for the "hosts in use" set are by name, so two
/// `Host` implementations naming the same machine collide deliberately.
#[async_trait]
pub trait Host: Send + Sync {
    /// A unique, human-readable name for this host.
    fn get_name(&self) -> &str;

    /// MAC address of the boot ethernet interface (profiles rely on PXE).
    fn get_mac_address(&self) -> &str;

    /// Prepare the host up to the point a testsuite can be submitted.
    async fn prepare(&self) -> Result<(), AdapterError>;

    /// Boot the host (power on / libvirt start / script).
    async fn start(&self) -> Result<(), AdapterError>;

    /// Remove, erase, or otherwise clean up the host after a job ends.
    async fn purge(&self) -> Result<(), AdapterError>;
}

/// Key type for the process-wide "hosts in use" set — by name, matching the
/// `Host` contract's equality rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HostKey(String);

impl HostKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn of(host: &dyn Host) -> Self {
        Self(host.get_name().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HostKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
