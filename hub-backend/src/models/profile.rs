//! Registered profiles — the persistent display identity of a visitor,
//! kept separate from the session-ish hub state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generic avatar used when no keyword category matches.
pub const DEFAULT_AVATAR: &str = "👤";

/// Ordered keyword → avatar table. The grandparent rows must stay ahead
/// of the parent rows: "grandmother" contains "mother" and "granddad"
/// contains "dad".
const AVATAR_KEYWORDS: &[(&[&str], &str)] = &[
    (&["grandma", "granny", "nana", "grandmother"], "👵"),
    (&["grandpa", "gramps", "granddad", "grandfather"], "👴"),
    (&["mom", "mum", "mother", "mama"], "👩"),
    (&["dad", "father", "papa"], "👨"),
    (&["kid", "child", "son", "daughter"], "🧒"),
    (&["student", "teen"], "🧑‍🎓"),
];

/// Pick the avatar for a display name by case-insensitive substring
/// matching; the first matching row wins.
pub fn avatar_for(name: &str) -> &'static str {
    let lowered = name.to_lowercase();
    for (keywords, avatar) in AVATAR_KEYWORDS {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return avatar;
        }
    }
    DEFAULT_AVATAR
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredProfile {
    pub visitor_id: String,
    pub name: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl RegisteredProfile {
    pub fn new(visitor_id: &str, name: &str) -> Self {
        let now = Utc::now();
        Self {
            visitor_id: visitor_id.to_string(),
            name: name.to_string(),
            avatar: avatar_for(name).to_string(),
            created_at: now,
            last_seen: now,
        }
    }

    /// Re-registration: `created_at` is fixed at first registration,
    /// everything else follows the new name.
    pub fn touch(&mut self, name: &str) {
        self.name = name.to_string();
        self.avatar = avatar_for(name).to_string();
        self.last_seen = Utc::now();
    }
}

/// Profile entry as returned by `GET /hub/profiles`, with the visitor's
/// current hub state embedded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileWithState {
    pub visitor_id: String,
    pub name: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub state: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_keyword_categories() {
        assert_eq!(avatar_for("Grandma Sue"), "👵");
        assert_eq!(avatar_for("grandpa joe"), "👴");
        assert_eq!(avatar_for("Mom"), "👩");
        assert_eq!(avatar_for("Papa Bear"), "👨");
        assert_eq!(avatar_for("The Kid"), "🧒");
        assert_eq!(avatar_for("Student Driver"), "🧑‍🎓");
    }

    #[test]
    fn test_grandparent_rows_beat_parent_substrings() {
        assert_eq!(avatar_for("Grandmother Anne"), "👵");
        assert_eq!(avatar_for("Granddad Joe"), "👴");
    }

    #[test]
    fn test_unmatched_name_gets_generic_avatar() {
        assert_eq!(avatar_for("Alex"), DEFAULT_AVATAR);
        assert_eq!(avatar_for(""), DEFAULT_AVATAR);
    }

    #[test]
    fn test_touch_preserves_created_at() {
        let mut profile = RegisteredProfile::new("web-1", "Grandma Sue");
        let created = profile.created_at;
        let seen = profile.last_seen;

        thread::sleep(Duration::from_millis(5));
        profile.touch("Grandpa Joe");

        assert_eq!(profile.created_at, created);
        assert!(profile.last_seen > seen);
        assert_eq!(profile.name, "Grandpa Joe");
        assert_eq!(profile.avatar, "👴");
    }
}
