pub mod application;
pub mod artifact;
pub mod user;
