use serde_json::Value;
use tracing::{debug, error};

use crate::core::body::{read_body, RESP_BUF_CAP};
use crate::core::extract::{self, Seg};
use crate::error::{FetchError, Result};
use crate::models::{SearchCategory, Track};
use crate::transport::Transport;

/// Netease cloud-music catalog client.
///
/// Each operation is one self-contained unit of work: build the URL, open a
/// session, validate the response, drain the body into a bounded buffer,
/// parse it, extract what it needs, and release everything on the way out.
/// Sessions and buffers are scoped to the call, so every exit path, success
/// or failure, releases them exactly once.
pub struct NeteaseClient {
    transport: Box<dyn Transport>,
    base_url: String,
}

impl NeteaseClient {
    pub fn new(transport: Box<dyn Transport>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        NeteaseClient {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Search the catalog and return the first (best-ranked) hit.
    pub fn search(&self, name: &str, offset: u32, category: SearchCategory) -> Result<Track> {
        let url = format!(
            "{}/api/search/pc?s={}&offset={}&limit=1&type={}",
            self.base_url,
            urlencoding::encode(name),
            offset,
            category.code()
        );

        let doc = self.fetch_document(&url)?;
        let title = extract::extract_str(
            &doc,
            &[Seg::Key("result"), Seg::Key("songs"), Seg::First, Seg::Key("name")],
        )
        .inspect_err(|e| error!(%e, "search result extraction failed"))?;
        let id = extract::extract_u64(
            &doc,
            &[Seg::Key("result"), Seg::Key("songs"), Seg::First, Seg::Key("id")],
        )
        .inspect_err(|e| error!(%e, "search result extraction failed"))?;

        // Title is copied out above; the document is dropped here.
        Ok(Track { title, id })
    }

    /// Fetch the lyrics document for a track.
    ///
    /// Currently parses and logs the document without extracting fields;
    /// kept as the hook point for lyric extraction.
    pub fn fetch_lyrics(&self, track: &Track) -> Result<()> {
        let url = format!(
            "{}/api/song/lyric?id={}&lv=-1&kv=-1&tv=1",
            self.base_url, track.id
        );
        let doc = self.fetch_document(&url)?;
        debug!(id = track.id, %doc, "lyrics document");
        Ok(())
    }

    /// Fetch the metadata document for a track.
    ///
    /// Same shape as [`fetch_lyrics`](Self::fetch_lyrics): parse-and-log
    /// only, the hook point for metadata extraction.
    pub fn fetch_info(&self, track: &Track) -> Result<()> {
        let url = format!(
            "{}/api/song/detail?id={}&ids=[{}]",
            self.base_url, track.id, track.id
        );
        let doc = self.fetch_document(&url)?;
        debug!(id = track.id, %doc, "info document");
        Ok(())
    }

    /// Direct-stream URL for a track id. Pure formatting, no network I/O;
    /// playback itself is out of scope.
    pub fn play_url(&self, id: u64) -> String {
        format!("{}/song/media/outer/url?id={}.mp3", self.base_url, id)
    }

    /// Shared fetch pipeline: open, validate status, drain body, parse.
    /// Stage failures abort immediately; the session closes on drop at
    /// every exit and the body buffer lives only inside this call.
    fn fetch_document(&self, url: &str) -> Result<Value> {
        debug!(url, "opening catalog session");
        let mut session = self.transport.open(url).inspect_err(|e| {
            error!(url, %e, "session open failed");
        })?;

        let status = session.status();
        if status != 200 {
            error!(url, status, "unexpected response status");
            return Err(FetchError::UnexpectedStatus(status));
        }

        let body = read_body(session.as_mut(), RESP_BUF_CAP).inspect_err(|e| {
            error!(url, %e, "body read failed");
        })?;
        drop(session);

        extract::parse(&body).inspect_err(|e| {
            error!(url, %e, "response parse failed");
        })
    }
}
