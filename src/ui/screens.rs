use std::cell::Cell;

use ratatui::widgets::{Paragraph, Wrap};

use crate::lookup::LyricsStore;

/// Lines moved per PageUp/PageDown.
const PAGE: u16 = 10;

/// Scroll state for the song lyrics screen. The lyrics themselves live in
/// the shared [`LyricsStore`].
#[derive(Debug, Default)]
pub(crate) struct LyricsScreen {
    pub(crate) scroll: u16,
    /// Inner size of the lyrics box as of the last draw.
    viewport: Cell<(u16, u16)>,
}

/// Paragraph used both to draw the lyrics and to measure their wrapped height.
pub(crate) fn lyrics_paragraph(text: &str) -> Paragraph<'_> {
    Paragraph::new(text).wrap(Wrap { trim: false })
}

impl LyricsScreen {
    pub(crate) fn reset(&mut self) {
        self.scroll = 0;
    }

    /// Record the area the lyrics were last drawn into.
    pub(crate) fn set_viewport(&self, width: u16, height: u16) {
        self.viewport.set((width, height));
    }

    /// Move by `delta` rows, stopping once the last wrapped row is visible.
    pub(crate) fn scroll_by(&mut self, delta: i32, store: &LyricsStore) {
        let (width, height) = self.viewport.get();
        let max = Self::wrapped_rows(store, width).saturating_sub(usize::from(height));
        let max = i64::try_from(max).unwrap_or(i64::MAX).min(i64::from(u16::MAX));
        let next = (i64::from(self.scroll) + i64::from(delta)).clamp(0, max);
        self.scroll = next as u16;
    }

    pub(crate) fn page_down(&mut self, store: &LyricsStore) {
        self.scroll_by(i32::from(PAGE), store);
    }

    pub(crate) fn page_up(&mut self, store: &LyricsStore) {
        self.scroll_by(-i32::from(PAGE), store);
    }

    fn wrapped_rows(store: &LyricsStore, width: u16) -> usize {
        store
            .lyrics
            .as_ref()
            .map(|lyrics| lyrics_paragraph(&lyrics.text).line_count(width))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Lyrics;

    fn store_with_lines(count: usize) -> LyricsStore {
        let text = (1..=count)
            .map(|n| format!("line {n}"))
            .collect::<Vec<_>>()
            .join("\n");
        LyricsStore {
            loading: false,
            error: None,
            lyrics: Some(Lyrics {
                artist: "Queen".into(),
                song: "Bohemian Rhapsody".into(),
                text,
            }),
        }
    }

    #[test]
    fn scroll_is_clamped_to_the_text() {
        let store = store_with_lines(12);
        let mut screen = LyricsScreen::default();
        screen.set_viewport(80, 1);

        screen.scroll_by(-3, &store);
        assert_eq!(screen.scroll, 0);

        screen.page_down(&store);
        assert_eq!(screen.scroll, 10);
        screen.page_down(&store);
        assert_eq!(screen.scroll, 11);

        screen.page_up(&store);
        assert_eq!(screen.scroll, 1);
        screen.reset();
        assert_eq!(screen.scroll, 0);
    }

    #[test]
    fn empty_store_never_scrolls() {
        let store = LyricsStore::default();
        let mut screen = LyricsScreen::default();
        screen.set_viewport(80, 10);
        screen.scroll_by(5, &store);
        assert_eq!(screen.scroll, 0);
    }

    #[test]
    fn wrapped_rows_extend_the_scroll_range() {
        let long_line = "la ".repeat(40);
        let text = format!("{long_line}\n{long_line}\nend");
        let store = LyricsStore {
            loading: false,
            error: None,
            lyrics: Some(Lyrics {
                artist: "Queen".into(),
                song: "Bohemian Rhapsody".into(),
                text,
            }),
        };
        let mut screen = LyricsScreen::default();
        screen.set_viewport(30, 2);

        screen.scroll_by(100, &store);
        let rows = lyrics_paragraph(&store.lyrics.as_ref().unwrap().text).line_count(30);
        assert!(rows > 3);
        assert_eq!(usize::from(screen.scroll), rows - 2);
    }

    #[test]
    fn short_text_inside_viewport_does_not_scroll() {
        let store = store_with_lines(3);
        let mut screen = LyricsScreen::default();
        screen.set_viewport(80, 10);
        screen.page_down(&store);
        assert_eq!(screen.scroll, 0);
    }
}
