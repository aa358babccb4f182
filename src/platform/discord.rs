use std::sync::Arc;

use anyhow::{Context as _, Result};
use chrono::DateTime;
use serenity::all::{
    Channel, ChannelId, ChannelType, Client, Context, CreateEmbed, CreateEmbedAuthor,
    CreateEmbedFooter, CreateMessage, EventHandler, GatewayIntents, Message, MessageId, Ready,
    Timestamp,
};
use serenity::async_trait;
use serenity::http::{Http, HttpError};
use tracing::info;

use crate::platform::{ChatPlatform, InboundMessage};
use crate::quote::dispatch::QuoteDispatcher;
use crate::quote::{
    Attachment, EmbedField, MessageAuthor, QuoteEmbed, ResolvedMessage, SourceEmbed,
};

/// Discord's "Unknown Message" JSON error code.
const UNKNOWN_MESSAGE_CODE: isize = 10008;

/// Required gateway intents for the bot.
fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
}

/// Connect to the Discord gateway and feed message events to the dispatcher
/// until the process is stopped.
pub async fn run(dispatcher: Arc<QuoteDispatcher>, bot_token: &str) -> Result<()> {
    let handler = DiscordHandler { dispatcher };

    let mut client = Client::builder(bot_token, intents())
        .event_handler(handler)
        .await
        .context("Failed to build Discord client")?;

    client.start().await.context("Discord gateway stopped")?;
    Ok(())
}

/// Handler for Discord gateway events.
struct DiscordHandler {
    dispatcher: Arc<QuoteDispatcher>,
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            "Connected to Discord as {} ({} guilds)",
            ready.user.name,
            ready.guilds.len()
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let event = InboundMessage {
            guild_id: msg.guild_id.map(|g| g.get()),
            channel_id: msg.channel_id.get(),
            author_is_bot: msg.author.bot,
            content: msg.content.clone(),
        };
        let api = DiscordApi {
            http: ctx.http.clone(),
        };
        self.dispatcher.handle(&api, &event).await;
    }
}

/// Serenity-backed [`ChatPlatform`] over the HTTP handle of one gateway event.
struct DiscordApi {
    http: Arc<Http>,
}

#[async_trait]
impl ChatPlatform for DiscordApi {
    async fn has_text_channel(&self, guild_id: u64, channel_id: u64) -> bool {
        match self.http.get_channel(ChannelId::new(channel_id)).await {
            Ok(Channel::Guild(channel)) => {
                channel.guild_id.get() == guild_id && is_text_bearing(channel.kind)
            }
            _ => false,
        }
    }

    async fn fetch_message(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<Option<ResolvedMessage>> {
        match self
            .http
            .get_message(ChannelId::new(channel_id), MessageId::new(message_id))
            .await
        {
            Ok(msg) => Ok(Some(resolved_from(&msg))),
            Err(e) if is_unknown_message(&e) => Ok(None),
            Err(e) => Err(e).context("Message fetch failed"),
        }
    }

    async fn send_quote(&self, channel_id: u64, quote: &QuoteEmbed) -> Result<()> {
        let payload = CreateMessage::new().embed(build_embed(quote));
        ChannelId::new(channel_id)
            .send_message(&self.http, payload)
            .await
            .context("Message send failed")?;
        Ok(())
    }
}

fn is_text_bearing(kind: ChannelType) -> bool {
    matches!(
        kind,
        ChannelType::Text
            | ChannelType::News
            | ChannelType::PublicThread
            | ChannelType::PrivateThread
            | ChannelType::NewsThread
    )
}

fn is_unknown_message(err: &serenity::Error) -> bool {
    matches!(
        err,
        serenity::Error::Http(HttpError::UnsuccessfulRequest(resp))
            if resp.error.code == UNKNOWN_MESSAGE_CODE
    )
}

/// Convert a serenity message into the pipeline's read-only view.
fn resolved_from(msg: &Message) -> ResolvedMessage {
    let author = MessageAuthor {
        id: msg.author.id.get(),
        name: msg.author.name.clone(),
        discriminator: msg.author.discriminator.map(|d| d.get()),
        avatar_url: msg.author.face(),
    };

    let attachments = msg
        .attachments
        .iter()
        .map(|a| Attachment {
            url: a.url.clone(),
            is_image: a
                .content_type
                .as_deref()
                .map_or(a.width.is_some() && a.height.is_some(), |ct| {
                    ct.starts_with("image/")
                }),
        })
        .collect();

    let embed = msg.embeds.first().map(|e| SourceEmbed {
        description: e.description.clone(),
        fields: e
            .fields
            .iter()
            .map(|f| EmbedField {
                name: f.name.clone(),
                value: f.value.clone(),
                inline: f.inline,
            })
            .collect(),
        footer_text: e.footer.as_ref().map(|f| f.text.clone()),
        image_url: e.image.as_ref().map(|i| i.url.clone()),
    });

    ResolvedMessage {
        channel_id: msg.channel_id.get(),
        author,
        content: msg.content.clone(),
        timestamp: DateTime::from_timestamp(msg.timestamp.unix_timestamp(), 0).unwrap_or_default(),
        attachments,
        embed,
    }
}

/// Convert a composed quote into a serenity `CreateEmbed`.
fn build_embed(quote: &QuoteEmbed) -> CreateEmbed {
    let mut builder = CreateEmbed::new()
        .author(CreateEmbedAuthor::new(&quote.author_name).icon_url(&quote.author_icon_url))
        .color(quote.color)
        .footer(CreateEmbedFooter::new(&quote.footer));

    if let Ok(ts) = Timestamp::from_unix_timestamp(quote.timestamp.timestamp()) {
        builder = builder.timestamp(ts);
    }
    if let Some(description) = &quote.description {
        builder = builder.description(description);
    }
    for field in &quote.fields {
        builder = builder.field(&field.name, &field.value, field.inline);
    }
    if let Some(url) = &quote.image_url {
        builder = builder.image(url);
    }

    builder
}
