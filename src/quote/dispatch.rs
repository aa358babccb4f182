use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::platform::{ChatPlatform, InboundMessage};
use crate::quote::{compose, extract, resolve, ResolvedMessage, MAX_QUOTES_PER_MESSAGE};
use crate::stats::{QuoteStatRecord, QuoteStatsStore};

/// Runs the quote pipeline for each inbound message event: extract links,
/// resolve them within the inbound guild, cap the batch, then compose, send
/// and record each quote.
pub struct QuoteDispatcher {
    stats: QuoteStatsStore,
}

impl QuoteDispatcher {
    pub fn new(stats: QuoteStatsStore) -> Self {
        Self { stats }
    }

    /// Process one inbound message end to end. Nothing here propagates back
    /// to the event framework; anything that goes wrong is logged.
    pub async fn handle(&self, platform: &dyn ChatPlatform, event: &InboundMessage) {
        if event.author_is_bot {
            return;
        }
        let Some(guild_id) = event.guild_id else {
            return;
        };

        let references = extract::extract(&event.content);
        if references.is_empty() {
            return;
        }
        debug!(
            "Found {} message link(s) in channel {}",
            references.len(),
            event.channel_id
        );

        // join_all returns results in input order regardless of completion
        // order, so the cap below always picks the links as they appeared in
        // the text.
        let resolved = join_all(
            references
                .into_iter()
                .map(|reference| resolve::resolve(platform, reference, guild_id)),
        )
        .await;

        let quoted: Vec<ResolvedMessage> = resolved
            .into_iter()
            .flatten()
            .take(MAX_QUOTES_PER_MESSAGE)
            .collect();

        for message in &quoted {
            let quote = compose::compose(message);
            // A failed quote is skipped; the rest of the batch still goes out.
            if let Err(e) = platform.send_quote(event.channel_id, &quote).await {
                warn!(
                    "Failed to send quote to channel {}: {:#}",
                    event.channel_id, e
                );
                continue;
            }
            self.record_stat(message, guild_id).await;
        }
    }

    async fn record_stat(&self, message: &ResolvedMessage, guild_id: u64) {
        info!(
            "Quoted message from {} ({}) in {}/{}",
            message.author.name, message.author.id, guild_id, message.channel_id
        );
        let record = QuoteStatRecord {
            user_id: message.author.id,
            channel_id: message.channel_id,
            guild_id,
            timestamp: message.timestamp.timestamp(),
        };
        // Stat persistence is fire-and-forget; the quote already went out.
        if let Err(e) = self.stats.record(&record).await {
            warn!("Failed to record quote stat: {:#}", e);
        }
    }
}
