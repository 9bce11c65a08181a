use clap::ValueEnum;

/// A catalog entry found by search: the minimal identity needed to fetch
/// lyrics, metadata, and the stream URL. Both fields are always populated;
/// a partially-known track is never constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub id: u64,
}

impl Track {
    pub fn summary(&self) -> String {
        format!("{} (id {})", self.title, self.id)
    }
}

/// Search scope, with the numeric codes the catalog service expects in the
/// `type` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchCategory {
    Music,
    Album,
    Artist,
    Playlist,
    User,
    Video,
    Lyrics,
    Radio,
}

impl SearchCategory {
    /// Wire code for the `type` query parameter.
    pub fn code(self) -> u32 {
        match self {
            SearchCategory::Music => 1,
            SearchCategory::Album => 10,
            SearchCategory::Artist => 100,
            SearchCategory::Playlist => 1000,
            SearchCategory::User => 1002,
            SearchCategory::Video => 1004,
            SearchCategory::Lyrics => 1006,
            SearchCategory::Radio => 1009,
        }
    }
}
