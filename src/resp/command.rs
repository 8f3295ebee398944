use crate::resp::{CommandArg, CommandArgs, IntoArgs};
use std::fmt;

/// Shortcut function for creating a command.
#[must_use]
#[inline(always)]
pub fn cmd(name: &'static str) -> Command {
    Command::new(name)
}

/// A command to be sent to the server: a name plus its arguments.
#[derive(Debug, Clone)]
pub struct Command {
    pub name: &'static str,
    pub args: CommandArgs,
}

impl Command {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            args: CommandArgs::Empty,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl IntoArgs) -> Self {
        self.args = arg.into_args(self.args);
        self
    }

    #[must_use]
    pub fn arg_if(self, condition: bool, arg: impl IntoArgs) -> Self {
        if condition { self.arg(arg) } else { self }
    }

    pub fn args(&self) -> std::slice::Iter<'_, CommandArg> {
        self.args.iter()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)?;
        for arg in self.args() {
            write!(f, " {arg:?}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::resp::cmd;

    #[test]
    fn command_builds_arg_sequence() {
        let command = cmd("CLUSTER").arg("NODES");
        assert_eq!("CLUSTER", command.name);
        assert_eq!(1, command.args.len());

        let command = cmd("SELECT").arg(3);
        assert_eq!(1, command.args.len());
        assert_eq!(format!("{command}"), "SELECT Signed(3)");
    }
}
