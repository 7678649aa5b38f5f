// SPDX-License-Identifier: MIT

//! Test plan data model: a [`Testplan`] is an ordered list of [`JobLayout`]s
//! plus a variable map. Resolving a layout into a concrete job spec (origin
//! lookups, override application) is `igor-catalog`'s job; this module only
//! covers the `{var}` substitution step, since that's pure string handling
//! shared by every layout field.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pattern for `{name}` placeholders.
#[allow(clippy::expect_used)]
static VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("constant regex pattern is valid"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TestplanError {
    #[error("variable '{0}' could not be substituted")]
    UnsubstitutedVariable(String),
}

/// Either a bare name or a `[name, property-overrides]` pair.
///
/// Serializes exactly as spec'd: a plain JSON string, or a two-element array
/// of `[name, overrides-object]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameOrOverride {
    Name(String),
    WithOverrides(String, BTreeMap<String, String>),
}

impl NameOrOverride {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(n) => n,
            Self::WithOverrides(n, _) => n,
        }
    }

    pub fn overrides(&self) -> BTreeMap<String, String> {
        match self {
            Self::Name(_) => BTreeMap::new(),
            Self::WithOverrides(_, overrides) => overrides.clone(),
        }
    }

    /// Substitute `{var}` in the name and every override value.
    fn substitute(&self, vars: &BTreeMap<String, String>) -> Result<Self, TestplanError> {
        let name = substitute_str(self.name(), vars)?;
        let overrides = self
            .overrides()
            .into_iter()
            .map(|(k, v)| Ok((k, substitute_str(&v, vars)?)))
            .collect::<Result<BTreeMap<_, _>, TestplanError>>()?;
        Ok(if overrides.is_empty() {
            match self {
                Self::Name(_) => Self::Name(name),
                Self::WithOverrides(..) => Self::WithOverrides(name, overrides),
            }
        } else {
            Self::WithOverrides(name, overrides)
        })
    }
}

/// One entry in a [`Testplan`]'s job layout list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobLayout {
    pub testsuite: NameOrOverride,
    pub profile: NameOrOverride,
    pub host: NameOrOverride,
    #[serde(default)]
    pub additional_kargs: Option<NameOrOverride>,
}

/// A layout's four fields after `{var}` substitution and name/overrides
/// splitting, but before origin lookup. What `igor-catalog` resolves against
/// the Inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpecNames {
    pub testsuite: NameOrOverride,
    pub profile: NameOrOverride,
    pub host: NameOrOverride,
    pub additional_kargs: Option<NameOrOverride>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Testplan {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub job_layouts: Vec<JobLayout>,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl Testplan {
    /// Resolve the `{var}` substitution step for one layout, folding in
    /// `planid` (always present, even if not in `variables`).
    pub fn substitute_layout(
        &self,
        layout: &JobLayout,
        planid: &str,
    ) -> Result<JobSpecNames, TestplanError> {
        let mut vars = self.variables.clone();
        vars.insert("planid".to_string(), planid.to_string());

        Ok(JobSpecNames {
            testsuite: layout.testsuite.substitute(&vars)?,
            profile: layout.profile.substitute(&vars)?,
            host: layout.host.substitute(&vars)?,
            additional_kargs: layout
                .additional_kargs
                .as_ref()
                .map(|k| k.substitute(&vars))
                .transpose()?,
        })
    }
}

fn substitute_str(template: &str, vars: &BTreeMap<String, String>) -> Result<String, TestplanError> {
    let mut unresolved = None;
    let replaced = VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let name = &caps[1];
            match vars.get(name) {
                Some(value) => value.clone(),
                None => {
                    unresolved.get_or_insert_with(|| name.to_string());
                    caps[0].to_string()
                }
            }
        })
        .to_string();

    match unresolved {
        Some(name) => Err(TestplanError::UnsubstitutedVariable(name)),
        None => Ok(replaced),
    }
}

#[cfg(test)]
#[path = "testplan_tests.rs"]
mod tests;
