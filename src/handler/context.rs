// Describes a registered command without tying it to the bot framework.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct CommandInfo {
    pub name: String,
    pub aliases: Vec<String>,
    pub hidden: bool,
    pub parent: Option<String>,
    pub guild_only: bool,
    pub owners_only: bool,
    // Limited to the bot commands channels.
    pub channel_restricted: bool,
}

impl CommandInfo {
    pub fn new(name: &str) -> Self {
        CommandInfo {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|alias| alias.to_string()).collect();
        self
    }

    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn guild_only(mut self) -> Self {
        self.guild_only = true;
        self
    }

    pub fn owners_only(mut self) -> Self {
        self.owners_only = true;
        self
    }

    pub fn channel_restricted(mut self) -> Self {
        self.channel_restricted = true;
        self
    }

    // Returns the full name with all parents, e.g. `tags get`.
    pub fn qualified_name(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{} {}", parent, self.name),
            None => self.name.clone(),
        }
    }
}

// Everything the error handler needs to know about the failed invocation.
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    pub author_id: u64,
    pub author: String,
    pub author_roles: Vec<u64>,
    pub channel_id: u64,
    pub in_guild: bool,
    // Raw text of the message that triggered the command.
    pub content: String,
    // Command name exactly as the user typed it.
    pub invoked_with: String,
    pub command: Option<CommandInfo>,
    invoked_from_error_handler: bool,
}

impl InvocationContext {
    pub fn new(author_id: u64, author: &str, channel_id: u64, content: &str) -> Self {
        InvocationContext {
            author_id,
            author: author.to_string(),
            channel_id,
            content: content.to_string(),
            ..Default::default()
        }
    }

    pub fn with_invoked_with(mut self, invoked_with: &str) -> Self {
        self.invoked_with = invoked_with.to_string();
        self
    }

    pub fn with_command(mut self, command: Option<CommandInfo>) -> Self {
        self.command = command;
        self
    }

    pub fn with_roles(mut self, roles: Vec<u64>) -> Self {
        self.author_roles = roles;
        self
    }

    pub fn in_guild(mut self, in_guild: bool) -> Self {
        self.in_guild = in_guild;
        self
    }

    pub fn is_invoked_from_error_handler(&self) -> bool {
        self.invoked_from_error_handler
    }

    pub fn mark_invoked_from_error_handler(&mut self) {
        self.invoked_from_error_handler = true;
    }

    // Name of the command for log output.
    pub fn command_name(&self) -> String {
        match &self.command {
            Some(command) => command.qualified_name(),
            None => "None".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::handler::context::{CommandInfo, InvocationContext};

    #[test]
    fn test_qualified_name() {
        assert_eq!(CommandInfo::new("help").qualified_name(), "help");
        assert_eq!(
            CommandInfo::new("get").with_parent("tags").qualified_name(),
            "tags get"
        );
    }

    #[test]
    fn test_marker_is_per_context() {
        let mut ctx = InvocationContext::new(1, "Test", 10, "!hlep");
        let other = ctx.clone();
        ctx.mark_invoked_from_error_handler();

        assert_eq!(ctx.is_invoked_from_error_handler(), true);
        assert_eq!(other.is_invoked_from_error_handler(), false);
    }
}
