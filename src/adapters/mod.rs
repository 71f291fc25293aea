// Adapters layer: concrete implementations for external systems (storage, http services).

pub mod hltb;
pub mod steam;
pub mod storage;
