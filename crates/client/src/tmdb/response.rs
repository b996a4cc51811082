//! TMDB search response types and normalization.

use serde::Deserialize;

/// Raw response from `GET /search/movie`.
#[derive(Debug, Deserialize)]
pub struct TmdbApiResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

/// Individual movie entry as TMDB sends it.
#[derive(Debug, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Normalized page of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub page: u32,
    pub results: Vec<MovieResult>,
    pub total_pages: u32,
    pub total_results: u64,
}

/// Normalized movie result. Empty strings from TMDB become `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieResult {
    pub id: u64,
    pub title: String,
    pub original_title: String,
    pub overview: String,
    pub vote_average: f64,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<TmdbApiResponse> for SearchPage {
    fn from(raw: TmdbApiResponse) -> Self {
        let results = raw
            .results
            .into_iter()
            .map(|m| MovieResult {
                id: m.id,
                title: m.title,
                original_title: m.original_title,
                overview: m.overview,
                vote_average: m.vote_average,
                release_date: non_empty(m.release_date),
                poster_path: non_empty(m.poster_path),
            })
            .collect();

        SearchPage { page: raw.page, results, total_pages: raw.total_pages, total_results: raw.total_results }
    }
}

impl SearchPage {
    /// True when the page carries no results.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }
}
