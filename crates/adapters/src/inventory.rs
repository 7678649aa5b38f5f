// SPDX-License-Identifier: MIT

//! `Inventory`: four category registries — plans, testsuites,
//! profiles, hosts — each a priority-ordered list of [`Origin`]s.

use std::collections::BTreeMap;
use std::sync::Arc;

use igor_core::{Testplan, Testsuite};

use crate::error::AdapterError;
use crate::host::Host;
use crate::origin::Origin;
use crate::profile::Profile;

/// A single category's priority-ordered list of origins.
///
/// `origin_priority` is implicit in registration order: `create_item`
/// without an explicit origin defaults to the first-registered origin, and
/// `lookup` queries origins in that same order, returning the first hit.
pub struct CategoryRegistry<Item>
where
    Item: Clone + Send + Sync + 'static,
{
    category: &'static str,
    origins: Vec<Arc<dyn Origin<Item>>>,
}

impl<Item> CategoryRegistry<Item>
where
    Item: Clone + Send + Sync + 'static,
{
    pub fn new(category: &'static str) -> Self {
        Self {
            category,
            origins: Vec::new(),
        }
    }

    /// Register an origin. Order is significant: earlier registrations take
    /// priority for `create_item` and are searched first by `lookup`.
    pub fn register(&mut self, origin: Arc<dyn Origin<Item>>) {
        self.origins.push(origin);
    }

    pub fn origin_priority(&self) -> Vec<String> {
        self.origins.iter().map(|o| o.name()).collect()
    }

    /// Merge every origin's items. A name collision between origins is
    /// fatal.
    pub async fn items(&self) -> Result<BTreeMap<String, Item>, AdapterError> {
        let mut merged = BTreeMap::new();
        for origin in &self.origins {
            for (name, item) in origin.items().await? {
                if merged.insert(name.clone(), item).is_some() {
                    return Err(AdapterError::DuplicateName {
                        category: self.category,
                        name,
                    });
                }
            }
        }
        Ok(merged)
    }

    /// Query each origin in priority order, returning the first hit.
    pub async fn lookup(&self, name: &str) -> Result<Option<Item>, AdapterError> {
        for origin in &self.origins {
            if let Some(item) = origin.lookup(name).await? {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    /// Create a new entity via the first-registered origin for this
    /// category.
    pub async fn create_item(&self, name: &str) -> Result<Item, AdapterError> {
        match self.origins.first() {
            Some(origin) => origin.create_item(name).await,
            None => Err(AdapterError::NoOrigins),
        }
    }
}

pub struct Inventory {
    pub plans: CategoryRegistry<Testplan>,
    pub testsuites: CategoryRegistry<Testsuite>,
    pub profiles: CategoryRegistry<Arc<dyn Profile>>,
    pub hosts: CategoryRegistry<Arc<dyn Host>>,
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            plans: CategoryRegistry::new("plans"),
            testsuites: CategoryRegistry::new("testsuites"),
            profiles: CategoryRegistry::new("profiles"),
            hosts: CategoryRegistry::new("hosts"),
        }
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "inventory_tests.rs"]
mod tests;
