//! Shell command execution, platform detection and interrupt handling.

pub mod command;
pub mod interrupt;
pub mod platform;

pub use command::{execute, execute_script, CommandOptions, CommandResult};
pub use interrupt::{install_interrupt_handler, interrupt_flag};
pub use platform::{default_shell, is_ci};
