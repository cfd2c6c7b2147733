pub mod arm;
mod environment;
pub mod errors;
pub mod rng;

pub use environment::{first_strict_argmax, Environment};
