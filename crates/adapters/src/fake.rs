// SPDX-License-Identifier: MIT

//! In-memory fakes for `Host`, `Profile`, and `Origin`, for use by other
//! crates' tests (gated behind the `test-support` feature) and this crate's
//! own tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::AdapterError;
use crate::host::Host;
use crate::origin::Origin;
use crate::profile::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    Prepare,
    Start,
    Purge,
}

/// A `Host` that records every call made to it, for assertions in tests.
pub struct FakeHost {
    name: String,
    mac_address: String,
    calls: Mutex<Vec<HostCall>>,
    fail_on: Mutex<Option<HostCall>>,
}

impl FakeHost {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mac_address: "00:00:00:00:00:00".to_string(),
            calls: Mutex::new(Vec::new()),
            fail_on: Mutex::new(None),
        }
    }

    pub fn fail_on(self, call: HostCall) -> Self {
        *self.fail_on.lock() = Some(call);
        self
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: HostCall) -> Result<(), AdapterError> {
        self.calls.lock().push(call);
        if *self.fail_on.lock() == Some(call) {
            return Err(AdapterError::Provider(format!("{call:?} failed")));
        }
        Ok(())
    }
}

#[async_trait]
impl Host for FakeHost {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_mac_address(&self) -> &str {
        &self.mac_address
    }

    async fn prepare(&self) -> Result<(), AdapterError> {
        self.record(HostCall::Prepare)
    }

    async fn start(&self) -> Result<(), AdapterError> {
        self.record(HostCall::Start)
    }

    async fn purge(&self) -> Result<(), AdapterError> {
        self.record(HostCall::Purge)
    }
}

/// A `Profile` that records assign/revoke calls and the kargs it was last
/// assigned with.
pub struct FakeProfile {
    name: String,
    assigned_kargs: Mutex<BTreeMap<String, String>>,
    base_kargs: Mutex<String>,
}

impl FakeProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assigned_kargs: Mutex::new(BTreeMap::new()),
            base_kargs: Mutex::new(String::new()),
        }
    }

    pub fn kargs_for(&self, host_name: &str) -> Option<String> {
        self.assigned_kargs.lock().get(host_name).cloned()
    }
}

#[async_trait]
impl Profile for FakeProfile {
    fn get_name(&self) -> &str {
        &self.name
    }

    async fn assign_to(&self, host: &dyn Host, additional_kargs: &str) -> Result<(), AdapterError> {
        self.assigned_kargs
            .lock()
            .insert(host.get_name().to_string(), additional_kargs.to_string());
        Ok(())
    }

    async fn revoke_from(&self, host: &dyn Host) -> Result<(), AdapterError> {
        self.assigned_kargs.lock().remove(host.get_name());
        Ok(())
    }

    async fn enable_pxe(&self, _host: &dyn Host, _enable: bool) -> Result<(), AdapterError> {
        Ok(())
    }

    async fn kargs(&self) -> Result<String, AdapterError> {
        Ok(self.base_kargs.lock().clone())
    }

    async fn set_kargs(&self, kargs: &str) -> Result<(), AdapterError> {
        *self.base_kargs.lock() = kargs.to_string();
        Ok(())
    }

    async fn delete(&self) -> Result<(), AdapterError> {
        Ok(())
    }
}

/// An in-memory [`Origin`] backed by a fixed map, for any item type.
pub struct FakeOrigin<Item> {
    name: String,
    items: BTreeMap<String, Item>,
}

impl<Item> FakeOrigin<Item>
where
    Item: Clone + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, items: BTreeMap<String, Item>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

#[async_trait]
impl<Item> Origin<Item> for FakeOrigin<Item>
where
    Item: Clone + Send + Sync + 'static,
{
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn items(&self) -> Result<BTreeMap<String, Item>, AdapterError> {
        Ok(self.items.clone())
    }

    async fn lookup(&self, name: &str) -> Result<Option<Item>, AdapterError> {
        Ok(self.items.get(name).cloned())
    }
}

pub fn fake_host_origin(name: &str, hosts: Vec<Arc<FakeHost>>) -> FakeOrigin<Arc<dyn Host>> {
    let items = hosts
        .into_iter()
        .map(|h| (h.get_name().to_string(), h as Arc<dyn Host>))
        .collect();
    FakeOrigin::new(name, items)
}

pub fn fake_profile_origin(name: &str, profiles: Vec<Arc<FakeProfile>>) -> FakeOrigin<Arc<dyn Profile>> {
    let items = profiles
        .into_iter()
        .map(|p| (p.get_name().to_string(), p as Arc<dyn Profile>))
        .collect();
    FakeOrigin::new(name, items)
}
