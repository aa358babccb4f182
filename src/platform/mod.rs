pub mod discord;

use anyhow::Result;
use async_trait::async_trait;

use crate::quote::{QuoteEmbed, ResolvedMessage};

/// A message created in a channel, as delivered by the platform.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Guild the message was posted in; `None` for direct messages.
    pub guild_id: Option<u64>,
    /// Channel the message was posted in (quotes are sent back here).
    pub channel_id: u64,
    /// Whether the sender is an automated account.
    pub author_is_bot: bool,
    /// Raw message text.
    pub content: String,
}

/// Platform operations the quote pipeline needs. Implemented over the Discord
/// SDK in production and by in-memory fakes in tests; the pipeline never
/// touches the SDK directly.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Whether `channel_id` is a message-bearing channel of `guild_id` that
    /// the bot can see.
    async fn has_text_channel(&self, guild_id: u64, channel_id: u64) -> bool;

    /// Fetch one message. `Ok(None)` when the platform reports it unknown
    /// (deleted or never existed); `Err` for any other failure.
    async fn fetch_message(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<Option<ResolvedMessage>>;

    /// Post a quote embed to a channel.
    async fn send_quote(&self, channel_id: u64, quote: &QuoteEmbed) -> Result<()>;
}
