use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: Option<String>,
    pub title: String,
    pub url: String,
    pub thumb: Option<String>,
    pub year: String,
    pub quality: String,
    pub duration: String,
    pub tags: ListingTags,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingTags {
    pub audio: String,
    pub quality: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Section {
    pub releases: Vec<Listing>,
    pub trending: Vec<Listing>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub movies: Section,
    pub series: Section,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub count: usize,
    pub results: Vec<Listing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Title {
    pub id: String,
    pub title: String,
    pub year: String,
    pub imdb: String,
    pub thumb: Option<String>,
    pub description: String,
    pub is_series: bool,
    pub episodes: Vec<Episode>,
    pub watch_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub name: String,
    pub url: String,
    pub player_id: Option<String>,
    /// Sort key only; either the item's `data-id` or its position.
    #[serde(skip)]
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerEmbed {
    pub id: String,
    pub server: String,
    pub url: String,
    pub iframe: String,
}
