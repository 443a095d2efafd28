pub mod matching;
pub mod users;
