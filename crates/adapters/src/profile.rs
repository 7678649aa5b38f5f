// SPDX-License-Identifier: MIT

//! The `Profile` provider contract.

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::host::Host;

/// A boot profile (installation/image abstraction) that can be assigned to
/// a [`Host`].
#[async_trait]
pub trait Profile: Send + Sync {
    fn get_name(&self) -> &str;

    /// Assign this profile to `host`, appending `additional_kargs` to the
    /// kernel command line (typically a callback URL carrying the job's
    /// cookie so the guest can call home).
    async fn assign_to(&self, host: &dyn Host, additional_kargs: &str) -> Result<(), AdapterError>;

    /// Undo [`assign_to`](Self::assign_to) for `host`.
    async fn revoke_from(&self, host: &dyn Host) -> Result<(), AdapterError>;

    async fn enable_pxe(&self, host: &dyn Host, enable: bool) -> Result<(), AdapterError>;

    /// Current kernel args for this profile.
    async fn kargs(&self) -> Result<String, AdapterError>;

    /// `GET/POST /profiles/<name>/kargs`: rewrite this
    /// profile's base kernel args, independent of any host assignment.
    async fn set_kargs(&self, kargs: &str) -> Result<(), AdapterError>;

    async fn delete(&self) -> Result<(), AdapterError>;
}
