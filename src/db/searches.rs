use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::SearchQuery;

/// Remember a successful search. Repeating an artist/song pair (ignoring
/// case) bumps it to the top instead of adding a second row.
pub fn record_search(conn: &Connection, query: &SearchQuery) -> Result<()> {
    let next_seq: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(recency), 0) + 1 FROM searches",
            [],
            |row| row.get(0),
        )
        .context("failed to read search sequence")?;

    conn.execute(
        "INSERT INTO searches (artist, song, recency) VALUES (?1, ?2, ?3)
         ON CONFLICT(artist, song) DO UPDATE SET
            artist = excluded.artist,
            song = excluded.song,
            recency = excluded.recency",
        params![query.artist, query.song, next_seq],
    )
    .context("failed to record search")?;
    Ok(())
}

/// Most recent searches first.
pub fn fetch_recent_searches(conn: &Connection, limit: usize) -> Result<Vec<SearchQuery>> {
    let mut stmt = conn
        .prepare(
            "SELECT artist, song FROM searches
             ORDER BY recency DESC
             LIMIT ?1",
        )
        .context("failed to prepare recent searches query")?;

    let searches = stmt
        .query_map(params![limit as i64], |row| {
            Ok(SearchQuery {
                artist: row.get(0)?,
                song: row.get(1)?,
            })
        })
        .context("failed to iterate searches")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect searches")?;

    Ok(searches)
}
