use serde::{Deserialize, Serialize};

/// Submitted movie form. Directors and actors arrive as comma separated names.
#[derive(Clone, Debug, Deserialize)]
pub struct MovieForm {
    pub title: String,
    pub year: i32,
    pub image_url: String,
    pub watch_url: String,
    pub country: String,
    pub directors: String,
    pub actors: String,
    pub duration: i32,
    #[serde(default)]
    pub age_limit: i32,
    pub description: String,
    pub genre_id: i32,
    pub quality_id: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieSummary {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub image_url: String,
    pub rating: f64,
    pub genre: String,
    pub quality: String,
    pub directors: String,
    pub actors: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieDetails {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub image_url: String,
    pub watch_url: String,
    pub country: String,
    pub directors: String,
    pub actors: String,
    pub duration: i32,
    pub age_limit: i32,
    pub description: String,
    pub rating: f64,
    pub genre: String,
    pub genre_id: i32,
    pub quality: String,
    pub quality_id: i32,
    pub creator_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenreOption {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QualityOption {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TotalStatistics {
    pub total_movies: u64,
}

/// Result of a catalog listing.
///
/// `total_movies` is the store-wide count of visible movies while
/// `matching_movies` counts what the current search matched.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MovieQuery {
    pub movies: Vec<MovieSummary>,
    pub total_movies: u64,
    pub matching_movies: u64,
    pub current_page: u64,
    pub page_size: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<GenreOption>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub qualities: Vec<QualityOption>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AllMoviesQuery {
    pub page: Option<u64>,
    #[serde(default)]
    pub search: String,
}
