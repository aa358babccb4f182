use tracing::warn;

use crate::platform::ChatPlatform;
use crate::quote::{Reference, ResolvedMessage};

/// Resolve one reference against the guild the inbound message came from.
///
/// Absence is the common case here: cross-guild links, unknown or invisible
/// channels, deleted messages and transport failures all come back as `None`
/// so that one dead link never sinks the rest of the batch.
pub async fn resolve(
    platform: &dyn ChatPlatform,
    reference: Reference,
    inbound_guild_id: u64,
) -> Option<ResolvedMessage> {
    // Never follow links into other guilds.
    if reference.guild_id != inbound_guild_id {
        return None;
    }

    if !platform
        .has_text_channel(reference.guild_id, reference.channel_id)
        .await
    {
        return None;
    }

    match platform
        .fetch_message(reference.channel_id, reference.message_id)
        .await
    {
        Ok(found) => found,
        Err(e) => {
            warn!(
                "Failed to fetch message {} in channel {}: {:#}",
                reference.message_id, reference.channel_id, e
            );
            None
        }
    }
}
