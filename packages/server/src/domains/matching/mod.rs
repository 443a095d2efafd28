pub mod discover;
pub mod filter;
pub mod models;
pub mod swipe;

pub use discover::DiscoveryEngine;
pub use filter::CandidateFilter;
pub use models::Match;
pub use swipe::{MatchEngine, SwipeAction};
