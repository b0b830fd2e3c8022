pub mod config;
pub mod inspect;
pub mod resolve;

pub use config::config_command;
pub use inspect::inspect_command;
pub use resolve::resolve_command;
