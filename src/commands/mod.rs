pub mod checks;
pub mod context;
pub mod help;
pub mod tags;

pub use crate::commands::context::{Command, Context, UserData};

// All commands registered in the framework
pub fn commands() -> Vec<Command> {
    vec![help::help(), tags::tags()]
}
