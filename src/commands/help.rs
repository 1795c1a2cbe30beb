use crate::commands::context::{Command, Context};
use crate::error::Result;

/// Shows help for the bot, a command or a subcommand
#[poise::command(prefix_command, track_edits, category = "Information")]
pub async fn help(
    ctx: Context<'_>,
    #[rest] command: Option<String>,
) -> Result<()> {
    let args = command
        .map(|text| text.split_whitespace().map(String::from).collect::<Vec<String>>())
        .unwrap_or_default();
    let prefix = &ctx.data().settings.command_prefix;

    let content = render_help(&ctx.framework().options().commands, &args, prefix);
    ctx.say(content).await?;
    Ok(())
}

// Builds the help text for the given command path. An empty path gives the
// list of all visible commands.
pub fn render_help(commands: &[Command], args: &[String], prefix: &str) -> String {
    if args.is_empty() {
        return render_overview(commands, prefix);
    }

    match find_command(commands, args) {
        Some(command) => render_command(command, &args.join(" "), prefix),
        None => format!("No command called \"{}\" found.", args.join(" ")),
    }
}

// Resolves a command path like `tags get` by names and aliases.
pub fn find_command<'a>(commands: &'a [Command], path: &[String]) -> Option<&'a Command> {
    let (first, rest) = path.split_first()?;
    let command = commands
        .iter()
        .find(|command| command.name == *first || command.aliases.contains(first))?;

    match rest.is_empty() {
        true => Some(command),
        false => find_command(&command.subcommands, rest),
    }
}

fn render_overview(commands: &[Command], prefix: &str) -> String {
    let lines = commands
        .iter()
        .filter(|command| !command.hide_in_help)
        .map(|command| match &command.description {
            Some(description) => format!("`{}{}` - {}", prefix, command.name, description),
            None => format!("`{}{}`", prefix, command.name),
        })
        .collect::<Vec<String>>();

    format!(
        "Available commands:\n{}\n\nType `{}help <command>` for more info on a command.",
        lines.join("\n"),
        prefix
    )
}

fn render_command(command: &Command, path: &str, prefix: &str) -> String {
    let parameters = command
        .parameters
        .iter()
        .map(|parameter| match parameter.required {
            true => format!("<{}>", parameter.name),
            false => format!("[{}]", parameter.name),
        })
        .collect::<Vec<String>>();

    let mut usage = format!("{}{}", prefix, path);
    if !parameters.is_empty() {
        usage = format!("{} {}", usage, parameters.join(" "));
    }

    let mut lines = vec![format!("`{}`", usage)];
    if let Some(description) = &command.description {
        lines.push(description.clone());
    }
    if let Some(help_text) = &command.help_text {
        lines.push(help_text.clone());
    }
    if !command.aliases.is_empty() {
        lines.push(format!("Aliases: {}", command.aliases.join(", ")));
    }

    let subcommands = command
        .subcommands
        .iter()
        .filter(|subcommand| !subcommand.hide_in_help)
        .map(|subcommand| subcommand.name.clone())
        .collect::<Vec<String>>();
    if !subcommands.is_empty() {
        lines.push(format!("Subcommands: {}", subcommands.join(", ")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use crate::commands::commands;
    use crate::commands::help::{find_command, render_help};

    fn path(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn test_find_subcommand_by_alias() {
        let commands = commands();
        let command = find_command(&commands, &path(&["tag", "show"]));
        assert_eq!(command.map(|command| command.name.as_str()), Some("get"));
    }

    #[test]
    fn test_find_unknown_command() {
        let commands = commands();
        assert_eq!(find_command(&commands, &path(&["hlep"])).is_none(), true);
        assert_eq!(find_command(&commands, &[]).is_none(), true);
    }

    #[test]
    fn test_render_overview() {
        let content = render_help(&commands(), &[], "!");
        assert_eq!(content.starts_with("Available commands:"), true);
        assert_eq!(content.contains("`!tags`"), true);
        assert_eq!(content.contains("`!help`"), true);
    }

    #[test]
    fn test_render_subcommand_usage() {
        let content = render_help(&commands(), &path(&["tags", "get"]), "!");
        assert_eq!(content.starts_with("`!tags get <name>`"), true);
        assert_eq!(content.contains("Aliases: show"), true);
    }

    #[test]
    fn test_render_group_lists_subcommands() {
        let content = render_help(&commands(), &path(&["tags"]), "!");
        assert_eq!(content.contains("Subcommands: get, list"), true);
    }

    #[test]
    fn test_render_unknown_command() {
        let content = render_help(&commands(), &path(&["hlep"]), "!");
        assert_eq!(content, "No command called \"hlep\" found.");
    }
}
