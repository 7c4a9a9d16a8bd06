pub mod config;
pub mod dto;
pub mod offline;
pub mod paths;
pub mod rest;
pub mod storage;

pub use crate::config::TrackerConfig;
pub use crate::offline::{OfflineAuthProvider, OfflineRemoteStore};
pub use crate::rest::{RestAuthProvider, RestClient, RestRemoteStore};
pub use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};
