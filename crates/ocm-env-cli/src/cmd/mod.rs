pub mod build;
pub mod config;
pub mod verify;
pub mod version;
