use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::config::LookupConfig;
use crate::error::LookupError;
use crate::models::{Lyrics, SearchQuery};

/// Anything that can turn an artist/song pair into lyrics. Implementations
/// are called from worker threads.
pub trait LyricsProvider: Send + Sync {
    fn fetch_lyrics(&self, query: &SearchQuery) -> Result<Lyrics, LookupError>;
}

/// Blocking client for the lyrics.ovh v1 API.
pub struct LyricsOvhClient {
    client: Client,
    base_url: Url,
}

impl LyricsOvhClient {
    pub fn new(config: &LookupConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid lookup base url {:?}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("lookup base url {:?} cannot carry a path", config.base_url);
        }
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("lyrics-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }
}

impl LyricsProvider for LyricsOvhClient {
    fn fetch_lyrics(&self, query: &SearchQuery) -> Result<Lyrics, LookupError> {
        let url = lyrics_url(&self.base_url, query)?;
        debug!(%url, "requesting lyrics");

        let response = self.client.get(url).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(not_found(query));
        }
        let body = response.error_for_status()?.text()?;
        parse_lyrics_body(query, &body)
    }
}

/// `{base}/{artist}/{song}` with both segments percent-encoded.
fn lyrics_url(base: &Url, query: &SearchQuery) -> Result<Url, LookupError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| LookupError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .push(&query.artist)
        .push(&query.song);
    Ok(url)
}

#[derive(Deserialize)]
struct LyricsBody {
    #[serde(default)]
    lyrics: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn parse_lyrics_body(query: &SearchQuery, body: &str) -> Result<Lyrics, LookupError> {
    let parsed: LyricsBody = serde_json::from_str(body)?;
    if parsed.error.is_some() {
        return Err(not_found(query));
    }
    let text = parsed
        .lyrics
        .map(|raw| raw.replace("\r\n", "\n").trim().to_string())
        .unwrap_or_default();
    if text.is_empty() {
        return Err(not_found(query));
    }
    Ok(Lyrics {
        artist: query.artist.clone(),
        song: query.song.clone(),
        text,
    })
}

fn not_found(query: &SearchQuery) -> LookupError {
    LookupError::NotFound {
        artist: query.artist.clone(),
        song: query.song.clone(),
    }
}
