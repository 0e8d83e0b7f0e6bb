/// CLI argument parsing and command handling - Gateway
mod args;
mod commands;
mod render;

pub use args::{
    AdminCommand, BlogCommand, BodyArgs, Cli, Commands, EntityArg, ListArgs, OutputFormat, SortArg,
    UserCommand,
};
pub use commands::{handle_command, run};
