use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, build::build, check::check, init::init},
};

/// Dispatch to the command handler.
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Build(cmd)) => build(cmd),
        Some(Command::Check(cmd)) => check(cmd),
        Some(Command::Init) => init(),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
