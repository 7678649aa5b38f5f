// SPDX-License-Identifier: MIT

//! `/profiles/...` and `/hosts` handlers.
//!
//! Profile/host creation and deletion go through the registered `Origin`'s
//! `create_item`/the entity's own `delete()` — the bootstrap fake origin
//! (see `state.rs`) doesn't support creation, so `PUT /profiles/<name>`
//! surfaces as a 412 there rather than a 500, matching the "unsupported
//! operation" framing `AdapterError::Unsupported` already carries.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::response::Response;

use crate::error::DaemonError;
use crate::state::AppState;

use super::snapshot::render;

pub async fn list_profiles(State(state): State<AppState>, params: Query<HashMap<String, String>>) -> Result<Response, DaemonError> {
    let profiles = state.inventory.profiles.items().await?;
    let entries: Vec<igor_wire::NamedEntry> = profiles.into_keys().map(|name| igor_wire::NamedEntry { name }).collect();
    render(&params, "profiles", &entries)
}

pub async fn list_hosts(State(state): State<AppState>, params: Query<HashMap<String, String>>) -> Result<Response, DaemonError> {
    let hosts = state.inventory.hosts.items().await?;
    let entries: Vec<igor_wire::NamedEntry> = hosts.into_keys().map(|name| igor_wire::NamedEntry { name }).collect();
    render(&params, "hosts", &entries)
}

/// `PUT /profiles/<name>`: the request body is a tar bundle containing
/// `kernel`/`initrd`/`kargs` files. Extracting and staging
/// kernel/initrd images is a concrete-driver concern that is out of scope;
/// the `kargs` file's contents (if present) seed the new profile's base
/// kernel args, which is the part the provider abstraction layer owns.
pub async fn create_profile(State(state): State<AppState>, Path(name): Path<String>, body: Bytes) -> Result<(), DaemonError> {
    let profile = state.inventory.profiles.create_item(&name).await?;
    if let Some(kargs) = extract_kargs_file(&body) {
        profile.set_kargs(&kargs).await?;
    }
    Ok(())
}

pub async fn delete_profile(State(state): State<AppState>, Path(name): Path<String>) -> Result<(), DaemonError> {
    let profile = state
        .inventory
        .profiles
        .lookup(&name)
        .await?
        .ok_or_else(|| DaemonError::not_found("profile", name))?;
    profile.delete().await?;
    Ok(())
}

pub async fn get_kargs(State(state): State<AppState>, Path(name): Path<String>) -> Result<String, DaemonError> {
    let profile = state
        .inventory
        .profiles
        .lookup(&name)
        .await?
        .ok_or_else(|| DaemonError::not_found("profile", name))?;
    Ok(profile.kargs().await?)
}

pub async fn set_kargs(State(state): State<AppState>, Path(name): Path<String>, kargs: String) -> Result<(), DaemonError> {
    let profile = state
        .inventory
        .profiles
        .lookup(&name)
        .await?
        .ok_or_else(|| DaemonError::not_found("profile", name))?;
    profile.set_kargs(&kargs).await?;
    Ok(())
}

/// Reads a plain `tar` (not bzip2-compressed, per the route's own
/// description) looking for an entry literally named `kargs`.
fn extract_kargs_file(body: &[u8]) -> Option<String> {
    let mut archive = tar::Archive::new(&body[..]);
    let entries = archive.entries().ok()?;
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path().ok()?;
        if path.as_os_str() == "kargs" {
            use std::io::Read;
            let mut entry = entry;
            let mut contents = String::new();
            entry.read_to_string(&mut contents).ok()?;
            return Some(contents.trim_end().to_string());
        }
    }
    None
}

#[cfg(test)]
#[path = "profiles_hosts_tests.rs"]
mod tests;
