// SPDX-License-Identifier: MIT

//! The `Origin` contract: a source of entities of one
//! category. Generic over the item type so the same trait covers both
//! polymorphic providers (`Arc<dyn Host>`, `Arc<dyn Profile>`) and plain
//! data (`Testsuite`, `Testplan`).

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::AdapterError;

#[async_trait]
pub trait Origin<Item>: Send + Sync
where
    Item: Clone + Send + Sync + 'static,
{
    /// Name of this origin (e.g. a filesystem path or a driver name),
    /// distinct from the names of the entities it serves.
    fn name(&self) -> String;

    /// All entities this origin currently knows about, by name.
    async fn items(&self) -> Result<BTreeMap<String, Item>, AdapterError>;

    /// Look up one entity by name.
    async fn lookup(&self, name: &str) -> Result<Option<Item>, AdapterError>;

    /// Create a new entity, if this origin supports creation.
    async fn create_item(&self, name: &str) -> Result<Item, AdapterError> {
        let _ = name;
        Err(AdapterError::Unsupported("create_item"))
    }
}
