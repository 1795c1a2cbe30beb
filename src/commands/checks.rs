use crate::commands::context::Context;
use crate::error::{Error, Result};
use crate::handler::failure::CommandError;

// Marks commands guarded by `in_channel`, stored in their `custom_data`.
#[derive(Debug, Clone, Copy)]
pub struct ChannelRestricted;

// Allows the command only in the bot commands channels, unless the author
// has one of the staff roles. No configured channels means no restriction.
pub fn check_channel(
    channel_id: u64,
    author_roles: &[u64],
    allowed_channels: &[u64],
    staff_roles: &[u64],
) -> std::result::Result<(), CommandError> {
    if allowed_channels.is_empty() || allowed_channels.contains(&channel_id) {
        return Ok(());
    }

    if author_roles.iter().any(|role| staff_roles.contains(role)) {
        return Ok(());
    }

    let channels = allowed_channels
        .iter()
        .map(|channel| format!("<#{}>", channel))
        .collect::<Vec<String>>()
        .join(", ");
    let message = format!("Sorry, but you may only use this command within {}.", channels);
    Err(CommandError::InChannelCheckFailure(message))
}

pub async fn in_channel(ctx: Context<'_>) -> Result<bool> {
    let settings = &ctx.data().settings;
    let author_roles = match ctx.author_member().await {
        Some(member) => member.roles.iter().map(|role| role.get()).collect(),
        None => Vec::new(),
    };

    check_channel(
        ctx.channel_id().get(),
        &author_roles,
        &settings.bot_commands_channels,
        &settings.staff_roles,
    )
    .map_err(Error::Command)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use crate::commands::checks::check_channel;
    use crate::handler::failure::CommandError;

    #[test]
    fn test_no_restriction_without_channels() {
        assert_eq!(check_channel(1, &[], &[], &[]), Ok(()));
    }

    #[test]
    fn test_allowed_channel() {
        assert_eq!(check_channel(5, &[], &[5, 6], &[]), Ok(()));
    }

    #[test]
    fn test_staff_bypass() {
        assert_eq!(check_channel(1, &[100, 200], &[5], &[200]), Ok(()));
    }

    #[test]
    fn test_other_channel_is_rejected() {
        assert_eq!(
            check_channel(1, &[100], &[5, 6], &[200]),
            Err(CommandError::InChannelCheckFailure(
                "Sorry, but you may only use this command within <#5>, <#6>.".to_string()
            ))
        );
    }
}
