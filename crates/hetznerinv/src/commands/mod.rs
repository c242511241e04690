pub mod default_config;
pub mod list;
pub mod sync;
pub mod version;
