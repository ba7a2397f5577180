// Utility functions module
pub mod config;
pub mod embeds;
pub mod formatters;
