//! In-memory hub state store.
//!
//! The HubStore owns:
//! - The external-id → visitor-id mapping and its allocation counter
//! - One hub state record per visitor (kept as raw JSON)
//! - The registered profile table
//!
//! Everything lives behind a single lock. Each update is a read-merge-write
//! sequence on one visitor's record, and the write lock is held across the
//! whole sequence so two concurrent updates can never interleave halfway.
//! In-memory only for now; a database-backed store would slot in behind the
//! same methods.

use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use parking_lot::RwLock;
use serde_json::{json, Value};

use crate::models::{
    HubState, ProfileWithState, RegisteredProfile, ALEXA_EXTERNAL_PREFIX, ALEXA_VISITOR_PREFIX,
};

use super::merge::deep_merge;

/// Result of a state read or write: the resolved visitor id plus the
/// record as it now stands in the store.
#[derive(Debug, Clone)]
pub struct StateUpdate {
    pub visitor_id: String,
    pub state: Value,
}

/// Result of a profile registration.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub visitor_id: String,
    pub profile: RegisteredProfile,
}

/// Snapshot of the store's key sets, for the admin/debug listing.
#[derive(Debug, Clone)]
pub struct UsersSnapshot {
    pub visitor_ids: Vec<String>,
    pub profile_ids: Vec<String>,
    pub alexa_mappings: HashMap<String, String>,
}

#[derive(Default)]
struct Inner {
    /// amzn1.ask.account.* → alexa-user-N, stable once allocated.
    alexa_mappings: HashMap<String, String>,
    /// Last allocated visitor number; pre-incremented, so the first
    /// Alexa account becomes alexa-user-1.
    next_visitor: u64,
    states: HashMap<String, Value>,
    profiles: HashMap<String, RegisteredProfile>,
}

impl Inner {
    /// Resolve an external user id to a visitor id.
    ///
    /// Alexa account ids go through the mapping table, allocating the
    /// next sequential visitor id on first sight. Anything else (web and
    /// demo clients pick their own ids) is used verbatim.
    fn resolve_visitor(&mut self, external_id: &str) -> String {
        if !external_id.starts_with(ALEXA_EXTERNAL_PREFIX) {
            return external_id.to_string();
        }
        if let Some(known) = self.alexa_mappings.get(external_id) {
            return known.clone();
        }
        self.next_visitor += 1;
        let visitor_id = format!("{}{}", ALEXA_VISITOR_PREFIX, self.next_visitor);
        self.alexa_mappings
            .insert(external_id.to_string(), visitor_id.clone());
        log::info!("Mapped new Alexa account to {}", visitor_id);
        visitor_id
    }

    /// Current state for a visitor, created with defaults on first access.
    fn state_or_default(&self, visitor_id: &str) -> Result<Value, serde_json::Error> {
        match self.states.get(visitor_id) {
            Some(existing) => Ok(existing.clone()),
            None => fresh_state(visitor_id),
        }
    }

    /// Create or refresh a visitor's registered profile.
    fn register(&mut self, visitor_id: &str, name: &str) -> RegisteredProfile {
        self.profiles
            .entry(visitor_id.to_string())
            .and_modify(|existing| existing.touch(name))
            .or_insert_with(|| RegisteredProfile::new(visitor_id, name))
            .clone()
    }
}

/// Default record for a visitor, as raw JSON.
fn fresh_state(visitor_id: &str) -> Result<Value, serde_json::Error> {
    serde_json::to_value(HubState::new(visitor_id))
}

/// Write the display name and its lowercased "profile" twin into a state
/// record. Both fields are expected by the frontend.
fn apply_display_name(state: &mut Value, name: &str) {
    if let Some(root) = state.as_object_mut() {
        root.insert("displayName".to_string(), json!(name));
        root.insert("profile".to_string(), json!(name.to_lowercase()));
    }
}

/// The visitor id inside a record always mirrors the store key, whatever
/// a partial update tried to write there.
fn pin_visitor_id(state: &mut Value, visitor_id: &str) {
    if let Some(root) = state.as_object_mut() {
        root.insert("visitorId".to_string(), json!(visitor_id));
    }
}

/// Stamp the debug sub-record after a write: when it happened, which raw
/// external id asked for it, and whether the visitor came in via Alexa.
fn refresh_debug(state: &mut Value, external_id: &str, visitor_id: &str) {
    let root = match state.as_object_mut() {
        Some(root) => root,
        None => return,
    };
    if !root.get("debug").map_or(false, Value::is_object) {
        root.insert("debug".to_string(), json!({}));
    }
    if let Some(debug) = root.get_mut("debug").and_then(Value::as_object_mut) {
        debug.insert(
            "lastUpdated".to_string(),
            json!(Utc::now().to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        );
        debug.insert("lastRequest".to_string(), json!(external_id));
        debug.insert(
            "isAlexaUser".to_string(),
            json!(visitor_id.starts_with(ALEXA_VISITOR_PREFIX)),
        );
    }
}

/// Shared store handle. Construct one at startup and hand it to the
/// request handlers; tests build their own isolated instances.
pub struct HubStore {
    inner: RwLock<Inner>,
}

impl HubStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Read a visitor's state, creating it with defaults on first access.
    /// Pure read otherwise: no debug stamping, no profile side effects.
    pub fn state_snapshot(&self, external_id: &str) -> Result<StateUpdate, serde_json::Error> {
        let mut inner = self.inner.write();
        let visitor_id = inner.resolve_visitor(external_id);
        let state = match inner.states.get(&visitor_id) {
            Some(existing) => existing.clone(),
            None => {
                let fresh = fresh_state(&visitor_id)?;
                inner.states.insert(visitor_id.clone(), fresh.clone());
                fresh
            }
        };
        Ok(StateUpdate { visitor_id, state })
    }

    /// Apply a partial update to a visitor's state.
    ///
    /// The patch is merged recursively on top of the current record
    /// (created with defaults first if the visitor is new); a patch that
    /// is not a JSON object is ignored. A display name, when present,
    /// also registers the visitor's profile. The merged record only
    /// replaces the stored one at the end, once every step has succeeded.
    pub fn update_state(
        &self,
        external_id: &str,
        patch: Option<&Value>,
        display_name: Option<&str>,
    ) -> Result<StateUpdate, serde_json::Error> {
        let mut inner = self.inner.write();
        let visitor_id = inner.resolve_visitor(external_id);
        let mut state = inner.state_or_default(&visitor_id)?;

        if let Some(patch) = patch.filter(|patch| patch.is_object()) {
            state = deep_merge(&state, patch);
        }
        if let Some(name) = display_name {
            inner.register(&visitor_id, name);
            apply_display_name(&mut state, name);
        }
        pin_visitor_id(&mut state, &visitor_id);
        refresh_debug(&mut state, external_id, &visitor_id);

        inner.states.insert(visitor_id.clone(), state.clone());
        Ok(StateUpdate { visitor_id, state })
    }

    /// Register (or re-register) a visitor's display profile and push the
    /// name into their state record.
    pub fn register_profile(
        &self,
        external_id: &str,
        name: &str,
    ) -> Result<ProfileUpdate, serde_json::Error> {
        let mut inner = self.inner.write();
        let visitor_id = inner.resolve_visitor(external_id);
        let mut state = inner.state_or_default(&visitor_id)?;

        let profile = inner.register(&visitor_id, name);
        apply_display_name(&mut state, name);
        pin_visitor_id(&mut state, &visitor_id);
        refresh_debug(&mut state, external_id, &visitor_id);
        inner.states.insert(visitor_id.clone(), state);

        log::info!("Registered profile '{}' for {}", profile.name, visitor_id);
        Ok(ProfileUpdate {
            visitor_id,
            profile,
        })
    }

    /// Throw away a visitor's state and replace it with a fresh default.
    /// The registered profile and the id mapping are left alone.
    pub fn reset_state(&self, external_id: &str) -> Result<StateUpdate, serde_json::Error> {
        let mut inner = self.inner.write();
        let visitor_id = inner.resolve_visitor(external_id);
        let state = fresh_state(&visitor_id)?;
        inner.states.insert(visitor_id.clone(), state.clone());
        log::info!("Reset hub state for {}", visitor_id);
        Ok(StateUpdate { visitor_id, state })
    }

    /// All registered profiles with their current state, most recently
    /// seen first.
    pub fn profiles_by_last_seen(&self) -> Vec<ProfileWithState> {
        let inner = self.inner.read();
        let mut profiles: Vec<ProfileWithState> = inner
            .profiles
            .values()
            .map(|profile| ProfileWithState {
                visitor_id: profile.visitor_id.clone(),
                name: profile.name.clone(),
                avatar: profile.avatar.clone(),
                created_at: profile.created_at,
                last_seen: profile.last_seen,
                state: inner
                    .states
                    .get(&profile.visitor_id)
                    .cloned()
                    .unwrap_or(Value::Null),
            })
            .collect();
        profiles.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));
        profiles
    }

    /// Key sets currently held by the store, sorted for stable output.
    pub fn users_snapshot(&self) -> UsersSnapshot {
        let inner = self.inner.read();
        let mut visitor_ids: Vec<String> = inner.states.keys().cloned().collect();
        visitor_ids.sort();
        let mut profile_ids: Vec<String> = inner.profiles.keys().cloned().collect();
        profile_ids.sort();
        UsersSnapshot {
            visitor_ids,
            profile_ids,
            alexa_mappings: inner.alexa_mappings.clone(),
        }
    }

    pub fn visitor_count(&self) -> usize {
        self.inner.read().states.len()
    }

    pub fn profile_count(&self) -> usize {
        self.inner.read().profiles.len()
    }
}

impl Default for HubStore {
    fn default() -> Self {
        Self::new()
    }
}
