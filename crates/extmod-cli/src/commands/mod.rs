pub mod config;
pub mod hook;
pub mod list;
pub mod settings;
pub mod validate;
