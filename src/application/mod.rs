pub mod auth_service;
pub mod credential_store;
pub mod esim_service;
