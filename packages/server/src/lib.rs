// Ember - matching backend core
//
// Backend for a location-aware matching app: discovery of nearby candidates
// and the swipe/match transactional engine. Relational state lives in
// Postgres, one-sided swipe intents live in Redis with a bounded TTL.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
