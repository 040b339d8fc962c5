pub mod snippet;
pub mod user;
