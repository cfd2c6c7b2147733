
pub mod agents;
pub mod config;
pub mod driver;
pub mod environment;
pub mod errors;
pub mod report;
