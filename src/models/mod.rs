// Domain models module
pub mod modes;
pub mod snapshot;
pub mod stats;
