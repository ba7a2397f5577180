// Bot features module
pub mod session_tracker;
pub mod stats_service;
