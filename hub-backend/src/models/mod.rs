pub mod hub_state;
pub mod profile;

pub use hub_state::{
    default_task_catalog, HubState, ALEXA_EXTERNAL_PREFIX, ALEXA_VISITOR_PREFIX,
};
pub use profile::{ProfileWithState, RegisteredProfile};
