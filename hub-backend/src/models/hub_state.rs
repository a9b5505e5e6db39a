//! Wire-facing hub state records.
//!
//! `HubState` pins the default shape of one visitor's dashboard state and
//! is serialized exactly once, when the record is created. From then on
//! the record lives in the store as a `serde_json::Value`, so fields this
//! model does not know about survive partial updates untouched.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix of account identifiers sent by the Alexa skill client.
pub const ALEXA_EXTERNAL_PREFIX: &str = "amzn1.ask.account.";

/// Prefix of visitor identifiers allocated for Alexa accounts.
pub const ALEXA_VISITOR_PREFIX: &str = "alexa-user-";

/// One entry of the built-in task catalog shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub description: String,
    pub category: String,
    pub voice_command: String,
}

static DEFAULT_TASKS: Lazy<Vec<TaskItem>> = Lazy::new(|| {
    fn task(
        id: &str,
        title: &str,
        icon: &str,
        description: &str,
        category: &str,
        voice_command: &str,
    ) -> TaskItem {
        TaskItem {
            id: id.to_string(),
            title: title.to_string(),
            icon: icon.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            voice_command: voice_command.to_string(),
        }
    }

    vec![
        task(
            "t1",
            "Morning Routine",
            "🌅",
            "Turn on the lights, read the weather, and review today's reminders",
            "routine",
            "start my morning routine",
        ),
        task(
            "t2",
            "Grocery List",
            "🛒",
            "Add items to the shared grocery list or review what's on it",
            "grocery",
            "add milk to my grocery list",
        ),
        task(
            "t3",
            "Set Reminder",
            "⏰",
            "Schedule a reminder for anyone in the household",
            "reminder",
            "remind me to take out the trash",
        ),
        task(
            "t4",
            "Lights",
            "💡",
            "Switch the living room lights on or off",
            "smart_home",
            "turn on the living room lights",
        ),
        task(
            "t5",
            "Thermostat",
            "🌡️",
            "Check or adjust the thermostat",
            "smart_home",
            "set the thermostat to 72",
        ),
        task(
            "t6",
            "Evening Routine",
            "🌙",
            "Dim the lights, lock the door, and set tomorrow's alarm",
            "routine",
            "start my evening routine",
        ),
    ]
});

/// The shared catalog template. Returns a fresh deep copy each call, so
/// one visitor's task list can never bleed into another's.
pub fn default_task_catalog() -> Vec<TaskItem> {
    DEFAULT_TASKS.clone()
}

/// Outcomes of the most recent voice-assistant routines. Null until the
/// assistant reports something; the payload shape is up to the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutineResults {
    pub lights: Option<Value>,
    pub thermostat: Option<Value>,
    pub reminder: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    pub microphone_enabled: bool,
    pub allow_voice_history: bool,
    pub last_delete_request: Option<DateTime<Utc>>,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            microphone_enabled: true,
            allow_voice_history: true,
            last_delete_request: None,
        }
    }
}

/// Per-visitor copy of the built-in catalog plus the visitor's own
/// additions. Custom entries are client-defined and kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskBoard {
    pub default: Vec<TaskItem>,
    pub custom: Vec<Value>,
}

/// Request bookkeeping surfaced on the frontend's debug panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub last_updated: DateTime<Utc>,
    pub last_request: Option<String>,
    pub is_alexa_user: bool,
}

/// Full per-visitor dashboard state. The field layout (camelCase on the
/// wire) is the contract shared with the frontend and the Alexa skill.
///
/// `display_name` and `profile` (the lowercased name) are kept as two
/// separate fields for frontend compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubState {
    pub visitor_id: String,
    pub display_name: Option<String>,
    pub active_tile: String,
    pub last_action: Option<String>,
    pub profile: Option<String>,
    pub routine_results: RoutineResults,
    pub grocery_list: Vec<String>,
    pub pending_item: Option<String>,
    pub privacy: PrivacySettings,
    pub tasks: TaskBoard,
    pub debug: DebugInfo,
}

impl HubState {
    /// Fresh default state for a visitor, with its own copy of the task
    /// catalog.
    pub fn new(visitor_id: &str) -> Self {
        Self {
            visitor_id: visitor_id.to_string(),
            display_name: None,
            active_tile: "home".to_string(),
            last_action: None,
            profile: None,
            routine_results: RoutineResults::default(),
            grocery_list: Vec::new(),
            pending_item: None,
            privacy: PrivacySettings::default(),
            tasks: TaskBoard {
                default: default_task_catalog(),
                custom: Vec::new(),
            },
            debug: DebugInfo {
                last_updated: Utc::now(),
                last_request: None,
                is_alexa_user: visitor_id.starts_with(ALEXA_VISITOR_PREFIX),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_is_six_fixed_tasks() {
        // the full table is the external contract, every field verbatim
        let catalog = serde_json::to_value(default_task_catalog()).unwrap();
        assert_eq!(
            catalog,
            json!([
                {
                    "id": "t1",
                    "title": "Morning Routine",
                    "icon": "🌅",
                    "description": "Turn on the lights, read the weather, and review today's reminders",
                    "category": "routine",
                    "voiceCommand": "start my morning routine"
                },
                {
                    "id": "t2",
                    "title": "Grocery List",
                    "icon": "🛒",
                    "description": "Add items to the shared grocery list or review what's on it",
                    "category": "grocery",
                    "voiceCommand": "add milk to my grocery list"
                },
                {
                    "id": "t3",
                    "title": "Set Reminder",
                    "icon": "⏰",
                    "description": "Schedule a reminder for anyone in the household",
                    "category": "reminder",
                    "voiceCommand": "remind me to take out the trash"
                },
                {
                    "id": "t4",
                    "title": "Lights",
                    "icon": "💡",
                    "description": "Switch the living room lights on or off",
                    "category": "smart_home",
                    "voiceCommand": "turn on the living room lights"
                },
                {
                    "id": "t5",
                    "title": "Thermostat",
                    "icon": "🌡️",
                    "description": "Check or adjust the thermostat",
                    "category": "smart_home",
                    "voiceCommand": "set the thermostat to 72"
                },
                {
                    "id": "t6",
                    "title": "Evening Routine",
                    "icon": "🌙",
                    "description": "Dim the lights, lock the door, and set tomorrow's alarm",
                    "category": "routine",
                    "voiceCommand": "start my evening routine"
                }
            ])
        );
    }

    #[test]
    fn test_catalog_copies_are_independent() {
        let mut copy = default_task_catalog();
        copy[0].title = "Hijacked".to_string();
        copy.pop();

        let fresh = default_task_catalog();
        assert_eq!(fresh.len(), 6);
        assert_eq!(fresh[0].title, "Morning Routine");
    }

    #[test]
    fn test_default_state_wire_shape() {
        let value = serde_json::to_value(HubState::new("web-1")).unwrap();
        assert_eq!(value["visitorId"], "web-1");
        assert_eq!(value["displayName"], Value::Null);
        assert_eq!(value["activeTile"], "home");
        assert_eq!(value["lastAction"], Value::Null);
        assert_eq!(value["profile"], Value::Null);
        assert_eq!(value["groceryList"], json!([]));
        assert_eq!(value["pendingItem"], Value::Null);
        assert_eq!(
            value["routineResults"],
            json!({"lights": null, "thermostat": null, "reminder": null})
        );
        assert_eq!(value["privacy"]["microphoneEnabled"], true);
        assert_eq!(value["privacy"]["allowVoiceHistory"], true);
        assert_eq!(value["privacy"]["lastDeleteRequest"], Value::Null);
        assert_eq!(value["tasks"]["default"].as_array().unwrap().len(), 6);
        assert_eq!(value["tasks"]["custom"], json!([]));
        assert_eq!(value["debug"]["isAlexaUser"], false);
        assert_eq!(value["debug"]["lastRequest"], Value::Null);
        assert!(value["debug"]["lastUpdated"].is_string());
    }

    #[test]
    fn test_alexa_visitor_flag() {
        assert!(HubState::new("alexa-user-3").debug.is_alexa_user);
        assert!(!HubState::new("web-demo").debug.is_alexa_user);
    }
}
