use crate::quote::{QuoteEmbed, ResolvedMessage, ACCENT_COLOR, BRAND_LABEL, EMBED_TEXT_LIMIT};

/// Appended to a quoted body that had to be cut down to fit the embed limit.
const TRUNCATION_MARKER: &str = " [...]";

/// Build the quote embed for one resolved message. Deterministic and pure;
/// missing optional fields (avatar, attachments, embeds) are handled by
/// branching, never by failure.
pub fn compose(msg: &ResolvedMessage) -> QuoteEmbed {
    let mut quote = QuoteEmbed {
        author_name: format!("Sent by {}", msg.author.display_name()),
        author_icon_url: msg.author.avatar_url.clone(),
        color: ACCENT_COLOR,
        description: None,
        fields: Vec::new(),
        footer: BRAND_LABEL.to_string(),
        timestamp: msg.timestamp,
        image_url: None,
    };

    match &msg.embed {
        // Plain text message: quote the body, carry the image over.
        None => {
            if !msg.content.is_empty() {
                quote.description = Some(quoted_body(&msg.content));
                quote.image_url = first_attachment_image(msg);
            }
        }
        // The source is itself an embed (e.g. an earlier quote): carry its
        // description and fields over verbatim and chain the footer.
        Some(source) => {
            quote.description = source.description.clone();
            quote.fields = source.fields.clone();
            quote.image_url = source
                .image_url
                .clone()
                .or_else(|| first_attachment_image(msg));
            if let Some(footer) = &source.footer_text {
                quote.footer =
                    truncate_chars(&format!("{} - {}", footer, BRAND_LABEL), EMBED_TEXT_LIMIT);
            }
        }
    }

    quote
}

/// Wrap `content` in quotation marks. If the quoted form would exceed the
/// embed description limit, cut the content down so the final string
/// (both quote marks plus the truncation marker) is exactly at the limit.
/// Limits are in characters, never bytes.
fn quoted_body(content: &str) -> String {
    if content.chars().count() + 2 <= EMBED_TEXT_LIMIT {
        return format!("\"{}\"", content);
    }
    let keep = EMBED_TEXT_LIMIT - 2 - TRUNCATION_MARKER.chars().count();
    let prefix: String = content.chars().take(keep).collect();
    format!("\"{}\"{}", prefix, TRUNCATION_MARKER)
}

/// URL of the first attachment, when that attachment is an image.
fn first_attachment_image(msg: &ResolvedMessage) -> Option<String> {
    msg.attachments
        .first()
        .filter(|a| a.is_image)
        .map(|a| a.url.clone())
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        text.chars().take(limit).collect()
    }
}
