//! Domain models passed between the form, the lookup workers, the history
//! table, and the lyrics screen. These stay plain data holders so the other
//! layers can focus on presentation, networking, and persistence.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A validated search: both parts are trimmed and non-empty.
pub struct SearchQuery {
    pub artist: String,
    pub song: String,
}

impl SearchQuery {
    /// Build a query from raw field contents. Returns `None` when either part
    /// is blank after trimming.
    pub fn new(artist: &str, song: &str) -> Option<Self> {
        let artist = artist.trim();
        let song = song.trim();
        if artist.is_empty() || song.is_empty() {
            return None;
        }
        Some(Self {
            artist: artist.to_string(),
            song: song.to_string(),
        })
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.song)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Lyrics returned by a provider, tagged with the query that produced them.
pub struct Lyrics {
    pub artist: String,
    pub song: String,
    /// Newline-separated text with `\r\n` already normalized.
    pub text: String,
}

impl Lyrics {
    /// `Artist - Song` heading used by the lyrics screen.
    pub fn display_title(&self) -> String {
        if self.artist.trim().is_empty() {
            self.song.clone()
        } else {
            format!("{} - {}", self.artist, self.song)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_trims_both_parts() {
        let query = SearchQuery::new("  Queen ", "Bohemian Rhapsody\t").unwrap();
        assert_eq!(query.artist, "Queen");
        assert_eq!(query.song, "Bohemian Rhapsody");
        assert_eq!(query.to_string(), "Queen - Bohemian Rhapsody");
    }

    #[test]
    fn query_rejects_blank_parts() {
        assert!(SearchQuery::new("Queen", "").is_none());
        assert!(SearchQuery::new("   ", "Bohemian Rhapsody").is_none());
    }

    #[test]
    fn display_title_omits_blank_artist() {
        let lyrics = Lyrics {
            artist: " ".into(),
            song: "Intro".into(),
            text: String::new(),
        };
        assert_eq!(lyrics.display_title(), "Intro");
    }
}
