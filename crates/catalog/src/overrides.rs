// SPDX-License-Identifier: MIT

//! A layout entry's `[name, overrides]` form applies overrides only to
//! properties an entity actually declares as settable. Unknown keys are
//! dropped with a debug log rather than silently merged in.

use igor_core::Testsuite;
use tracing::debug;

/// An entity resolved from an [`Origin`](igor_adapters::Origin) that
/// declares a fixed set of properties layout overrides may touch.
pub trait SettableProperties {
    /// Apply `value` to `key` if it names a declared property. Returns
    /// whether it was applied.
    fn apply_override(&mut self, key: &str, value: &str) -> bool;
}

impl SettableProperties for Testsuite {
    fn apply_override(&mut self, key: &str, value: &str) -> bool {
        match key {
            "description" => {
                self.description = value.to_string();
                true
            }
            _ => false,
        }
    }
}

/// Apply every override in `overrides` to `target`, logging the ones that
/// don't match a declared property.
pub fn apply_overrides<T: SettableProperties>(category: &'static str, target: &mut T, overrides: &std::collections::BTreeMap<String, String>) {
    for (key, value) in overrides {
        if !target.apply_override(key, value) {
            debug!(%category, %key, "override does not name a settable property, dropping");
        }
    }
}

/// Log every override key as dropped, for entities with no declared
/// settable properties at all (Host, Profile, and the bare `additional_kargs`
/// string).
pub fn drop_overrides(category: &'static str, overrides: &std::collections::BTreeMap<String, String>) {
    for key in overrides.keys() {
        debug!(%category, %key, "override does not name a settable property, dropping");
    }
}

#[cfg(test)]
#[path = "overrides_tests.rs"]
mod tests;
