pub mod models;

pub use models::user::{Gender, NewUser, User};
