pub mod compose;
pub mod dispatch;
pub mod extract;
pub mod resolve;

use chrono::{DateTime, Utc};

/// Accent color used for every quote embed.
pub const ACCENT_COLOR: u32 = 0x00FFFF;

/// Label shown in every quote footer.
pub const BRAND_LABEL: &str = "AutoQuoter";

/// Maximum number of quotes posted per inbound message.
pub const MAX_QUOTES_PER_MESSAGE: usize = 3;

/// Discord's character limit for embed descriptions and footers.
pub const EMBED_TEXT_LIMIT: usize = 4096;

/// A message link found in inbound text: guild, channel and message ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: u64,
}

/// Author of a quoted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAuthor {
    pub id: u64,
    pub name: String,
    /// Legacy discriminator; `None` on accounts migrated to unique usernames.
    pub discriminator: Option<u16>,
    pub avatar_url: String,
}

impl MessageAuthor {
    /// `name#NNNN` while the legacy discriminator is still set, plain name otherwise.
    pub fn display_name(&self) -> String {
        match self.discriminator {
            Some(d) if d != 0 => format!("{}#{:04}", self.name, d),
            _ => self.name.clone(),
        }
    }
}

/// A file attached to a quoted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
    pub is_image: bool,
}

/// A name/value pair inside an embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// The first embed already present on a quoted message, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceEmbed {
    pub description: Option<String>,
    pub fields: Vec<EmbedField>,
    pub footer_text: Option<String>,
    pub image_url: Option<String>,
}

/// Read-only view of a message fetched from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMessage {
    pub channel_id: u64,
    pub author: MessageAuthor,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub attachments: Vec<Attachment>,
    pub embed: Option<SourceEmbed>,
}

/// The single rich embed a quote is sent as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteEmbed {
    pub author_name: String,
    pub author_icon_url: String,
    pub color: u32,
    pub description: Option<String>,
    pub fields: Vec<EmbedField>,
    pub footer: String,
    pub timestamp: DateTime<Utc>,
    pub image_url: Option<String>,
}
