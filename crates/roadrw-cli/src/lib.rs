//! Road RW CLI - composition root for the Road RW API client
//!
//! Loads settings, initialises logging, wires the configuration manager to
//! a file-backed store and exposes the client operations as subcommands.

pub mod cli;
pub mod command;
pub mod events;
pub mod settings;
pub mod startup;

pub use cli::{Cli, Command, EnvCommand, GlobalArgs};
pub use command::{AppContext, execute};
pub use settings::Settings;
