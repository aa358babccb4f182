use once_cell::sync::Lazy;
use regex::Regex;

use crate::quote::Reference;

static MESSAGE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:\w+\.)?discord(?:app)?\.com/channels/(\d+)/(\d+)/(\d+)")
        .expect("message link pattern is valid")
});

/// Pull every well-formed message link out of `text`, in order of first
/// appearance. Each textual occurrence yields one reference; duplicates are
/// kept. Malformed or partial links are skipped without error.
pub fn extract(text: &str) -> Vec<Reference> {
    MESSAGE_LINK
        .captures_iter(text)
        .filter_map(|caps| {
            Some(Reference {
                guild_id: parse_id(&caps[1])?,
                channel_id: parse_id(&caps[2])?,
                message_id: parse_id(&caps[3])?,
            })
        })
        .collect()
}

/// Snowflake ids are non-zero and fit in a u64; anything else is malformed.
fn parse_id(digits: &str) -> Option<u64> {
    digits.parse().ok().filter(|id| *id != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(guild_id: u64, channel_id: u64, message_id: u64) -> Reference {
        Reference {
            guild_id,
            channel_id,
            message_id,
        }
    }

    #[test]
    fn extracts_full_https_link() {
        let refs = extract("look at https://discord.com/channels/111/222/333 please");
        assert_eq!(refs, vec![reference(111, 222, 333)]);
    }

    #[test]
    fn scheme_and_subdomain_are_optional() {
        assert_eq!(
            extract("discord.com/channels/1/2/3"),
            vec![reference(1, 2, 3)]
        );
        assert_eq!(
            extract("https://ptb.discord.com/channels/1/2/3"),
            vec![reference(1, 2, 3)]
        );
        assert_eq!(
            extract("http://canary.discordapp.com/channels/1/2/3"),
            vec![reference(1, 2, 3)]
        );
    }

    #[test]
    fn host_match_is_case_insensitive() {
        assert_eq!(
            extract("HTTPS://Discord.COM/channels/4/5/6"),
            vec![reference(4, 5, 6)]
        );
    }

    #[test]
    fn multiple_links_keep_textual_order() {
        let text = "b: https://discord.com/channels/9/8/7 then a: https://discord.com/channels/1/2/3";
        assert_eq!(extract(text), vec![reference(9, 8, 7), reference(1, 2, 3)]);
    }

    #[test]
    fn duplicates_are_not_deduplicated() {
        let link = "https://discord.com/channels/1/2/3";
        let text = format!("{link} and again {link}");
        assert_eq!(
            extract(&text),
            vec![reference(1, 2, 3), reference(1, 2, 3)]
        );
    }

    #[test]
    fn malformed_links_are_skipped() {
        assert!(extract("https://discord.com/channels/1/2").is_empty());
        assert!(extract("https://discord.com/channels/a/b/c").is_empty());
        assert!(extract("https://example.com/channels/1/2/3").is_empty());
        assert!(extract("no links here").is_empty());
    }

    #[test]
    fn overflowing_or_zero_ids_are_skipped() {
        // 21 digits does not fit in a u64
        assert!(extract("discord.com/channels/111111111111111111111/2/3").is_empty());
        assert!(extract("discord.com/channels/0/2/3").is_empty());
    }

    #[test]
    fn safe_on_long_adversarial_input() {
        let text = "discord.com/channels/".repeat(10_000);
        assert!(extract(&text).is_empty());

        let spam = format!("{}{}", "a/1/2/3 ".repeat(10_000), "discord.com/channels/1/2/3");
        assert_eq!(extract(&spam), vec![reference(1, 2, 3)]);
    }
}
