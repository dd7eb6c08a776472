use anyhow::Result;
use rusqlite::Connection;

use crate::db::{fetch_recent_searches, record_search};
use crate::models::SearchQuery;

/// How many previous searches are listed under the form.
pub(crate) const RECENT_LIMIT: usize = 5;

/// Previous searches backed by the history database, plus the Ctrl+P recall
/// cursor.
pub struct SearchHistory {
    conn: Connection,
    recent: Vec<SearchQuery>,
    cursor: Option<usize>,
}

impl SearchHistory {
    pub fn load(conn: Connection) -> Result<Self> {
        let recent = fetch_recent_searches(&conn, RECENT_LIMIT)?;
        Ok(Self {
            conn,
            recent,
            cursor: None,
        })
    }

    pub(crate) fn recent(&self) -> &[SearchQuery] {
        &self.recent
    }

    pub(crate) fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Store a successful search and refresh the list.
    pub(crate) fn record(&mut self, query: &SearchQuery) -> Result<()> {
        record_search(&self.conn, query)?;
        self.recent = fetch_recent_searches(&self.conn, RECENT_LIMIT)?;
        self.cursor = None;
        Ok(())
    }

    /// Step to the next older entry, wrapping back to the newest.
    pub(crate) fn recall_next(&mut self) -> Option<&SearchQuery> {
        if self.recent.is_empty() {
            return None;
        }
        let next = match self.cursor {
            Some(idx) if idx + 1 < self.recent.len() => idx + 1,
            _ => 0,
        };
        self.cursor = Some(next);
        self.recent.get(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn history() -> SearchHistory {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        SearchHistory::load(conn).unwrap()
    }

    #[test]
    fn recall_cycles_newest_to_oldest() {
        let mut history = history();
        assert!(history.recall_next().is_none());

        history
            .record(&SearchQuery::new("Queen", "Bohemian Rhapsody").unwrap())
            .unwrap();
        history
            .record(&SearchQuery::new("Adele", "Hello").unwrap())
            .unwrap();

        assert_eq!(history.recall_next().unwrap().artist, "Adele");
        assert_eq!(history.recall_next().unwrap().artist, "Queen");
        assert_eq!(history.recall_next().unwrap().artist, "Adele");
        assert_eq!(history.cursor(), Some(0));
    }

    #[test]
    fn recording_resets_the_cursor() {
        let mut history = history();
        history
            .record(&SearchQuery::new("Queen", "Bohemian Rhapsody").unwrap())
            .unwrap();
        history.recall_next();
        history
            .record(&SearchQuery::new("Adele", "Hello").unwrap())
            .unwrap();
        assert_eq!(history.cursor(), None);
        assert_eq!(history.recent().len(), 2);
    }
}
