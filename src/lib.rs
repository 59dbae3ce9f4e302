pub mod config;
pub mod executor;
pub mod planner;
pub mod session;
pub mod storage;
pub mod transaction;
pub mod types;
pub mod utils;
