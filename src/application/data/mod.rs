mod command;
mod log_level;

pub use command::Command;
pub use log_level::LogLevel;
