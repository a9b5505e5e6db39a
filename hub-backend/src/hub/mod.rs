pub mod merge;
pub mod store;

pub use store::HubStore;
