use crate::handler::context::CommandInfo;

// Arguments for re-invoking the help command after a bad input.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HelpInvocation {
    pub help_command: String,
    pub args: Vec<String>,
}

impl HelpInvocation {
    // Picks the help form for the failed command: the general help when the
    // command is unknown, `help name` or `help parent name` otherwise.
    pub fn for_command(help_command: &str, command: Option<&CommandInfo>) -> Self {
        let args = match command {
            Some(CommandInfo {
                name,
                parent: Some(parent),
                ..
            }) => vec![parent.clone(), name.clone()],
            Some(command) => vec![command.name.clone()],
            None => Vec::new(),
        };

        HelpInvocation {
            help_command: help_command.to_string(),
            args,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::handler::context::CommandInfo;
    use crate::handler::help::HelpInvocation;

    #[test]
    fn test_help_without_command() {
        let help = HelpInvocation::for_command("help", None);
        assert_eq!(help.help_command, "help");
        assert_eq!(help.args.len(), 0);
    }

    #[test]
    fn test_help_for_top_level_command() {
        let command = CommandInfo::new("tags");
        let help = HelpInvocation::for_command("help", Some(&command));
        assert_eq!(help.args, vec!["tags".to_string()]);
    }

    #[test]
    fn test_help_for_subcommand() {
        let command = CommandInfo::new("get").with_parent("tags");
        let help = HelpInvocation::for_command("help", Some(&command));
        assert_eq!(help.args, vec!["tags".to_string(), "get".to_string()]);
    }
}
