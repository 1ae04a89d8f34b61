pub mod config;
pub mod location;
pub mod navigation;
pub mod runtime;
pub mod storage;
