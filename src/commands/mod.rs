// Bot commands module
pub mod ask;
pub mod help;
pub mod hunted;
pub mod locations;
pub mod message;
pub mod mode;
pub mod stats;
pub mod track;
