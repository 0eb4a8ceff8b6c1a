pub mod config;
pub mod error;
pub mod expect;
pub mod fixtures;
pub mod invocation;
pub mod launcher;
pub mod normalize;
pub mod runner;
pub mod scenario;
