//! Parsing and noise-filtering of `GetChat` response lines.
//!
//! The server interleaves real player chat with tribe logs, tame
//! announcements, and RCON status chatter. The filter drops the known noise;
//! the parser structures the remaining `Player (Character): message` lines.

/// One structured chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    /// Platform account name.
    pub player: String,
    /// In-game character name.
    pub character: String,
    pub message: String,
}

/// Parses a `Player (Character): message` chat line.
///
/// Returns `None` for anything that does not match the shape, which callers
/// treat as non-chat output and skip.
///
/// The character name is taken as the text inside the *last* parenthesis
/// group before the colon, so player names that themselves contain
/// parentheses still parse.
pub fn parse_chat_line(raw: &str) -> Option<ChatLine> {
    let raw = raw.trim();
    let (head, message) = raw.split_once("): ")?;
    let (player, character) = head.rsplit_once(" (")?;
    if player.is_empty() || character.is_empty() || message.is_empty() {
        return None;
    }
    Some(ChatLine {
        player: player.to_string(),
        character: character.to_string(),
        message: message.to_string(),
    })
}

/// Substring filter for server noise in chat responses.
#[derive(Debug, Clone)]
pub struct ChatFilter {
    patterns: Vec<String>,
}

impl ChatFilter {
    /// Builds a filter from custom substrings.
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// True when the line matches any noise pattern and should be dropped.
    pub fn is_noise(&self, line: &str) -> bool {
        self.patterns.iter().any(|p| line.contains(p))
    }
}

impl Default for ChatFilter {
    /// The noise observed in production chat logs: empty-poll markers, admin
    /// command echoes, tribe/tame announcements, and RCON status chatter.
    fn default() -> Self {
        Self::new(
            [
                "Server received, But no response!!",
                "AdminCmd",
                "Tribe Tamed a",
                "Tribe ",
                "Tamed a",
                "was killed!",
                "added to the Tribe",
                "RichColor",
                "RCON: Not connected",
                "froze",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_chat_line() {
        let line = parse_chat_line("Alice (Ella the Brave): anyone near green ob?").unwrap();
        assert_eq!(line.player, "Alice");
        assert_eq!(line.character, "Ella the Brave");
        assert_eq!(line.message, "anyone near green ob?");
    }

    #[test]
    fn test_parse_player_name_with_parentheses() {
        let line = parse_chat_line("Bob (alt) (Bobby): selling element").unwrap();
        assert_eq!(line.player, "Bob (alt)");
        assert_eq!(line.character, "Bobby");
    }

    #[test]
    fn test_parse_message_containing_colon_and_parens() {
        let line = parse_chat_line("Cara (Carita): meet at (50, 50): now").unwrap();
        assert_eq!(line.character, "Carita");
        assert_eq!(line.message, "meet at (50, 50): now");
    }

    #[test]
    fn test_parse_rejects_non_chat_output() {
        assert_eq!(parse_chat_line("Server received, But no response!!"), None);
        assert_eq!(parse_chat_line(""), None);
        assert_eq!(parse_chat_line("no shape here"), None);
    }

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        let line = parse_chat_line("  Dan (Danno): hi \n").unwrap();
        assert_eq!(line.player, "Dan");
        // Interior trailing whitespace after trim belongs to the message.
        assert_eq!(line.message, "hi");
    }

    #[test]
    fn test_default_filter_drops_known_noise() {
        let filter = ChatFilter::default();
        assert!(filter.is_noise("Server received, But no response!!"));
        assert!(filter.is_noise("AdminCmd: KickPlayer 000123"));
        assert!(filter.is_noise("Tribe Log: Your Tribe Tamed a Rex!"));
        assert!(filter.is_noise("Alice was killed!"));
    }

    #[test]
    fn test_default_filter_keeps_player_chat() {
        let filter = ChatFilter::default();
        assert!(!filter.is_noise("Alice (Ella): anyone near green ob?"));
    }

    #[test]
    fn test_custom_filter_patterns() {
        let filter = ChatFilter::new(vec!["spam".to_string()]);
        assert!(filter.is_noise("this is spammy spam"));
        assert!(!filter.is_noise("AdminCmd is fine for this filter"));
    }
}
