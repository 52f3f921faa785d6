pub mod error;
pub mod esim;
pub mod repository;
pub mod user;
pub mod validation;
