use std::collections::HashMap;

use crate::{
    entities::{genre, movie, quality},
    models::{GenreOption, MovieDetails, MovieSummary, QualityOption},
};

/// Lookup data needed to project movies: reference names and credited people.
///
/// Credit lists are expected in the order the names were submitted.
#[derive(Debug, Default)]
pub struct Projection {
    pub genres: HashMap<i32, String>,
    pub qualities: HashMap<i32, String>,
    pub directors: HashMap<i32, Vec<String>>,
    pub actors: HashMap<i32, Vec<String>>,
}

impl Projection {
    pub fn summary(&self, m: &movie::Model) -> MovieSummary {
        MovieSummary {
            id: m.id,
            title: m.title.clone(),
            year: m.year,
            image_url: m.image_url.clone(),
            rating: m.rating,
            genre: self.genre(m),
            quality: self.quality(m),
            directors: join(self.directors.get(&m.id)),
            actors: join(self.actors.get(&m.id)),
        }
    }

    pub fn details(&self, m: &movie::Model) -> MovieDetails {
        MovieDetails {
            id: m.id,
            title: m.title.clone(),
            year: m.year,
            image_url: m.image_url.clone(),
            watch_url: m.watch_url.clone(),
            country: m.country.clone(),
            directors: join(self.directors.get(&m.id)),
            actors: join(self.actors.get(&m.id)),
            duration: m.duration,
            age_limit: m.age_limit,
            description: m.description.clone(),
            rating: m.rating,
            genre: self.genre(m),
            genre_id: m.genre_id,
            quality: self.quality(m),
            quality_id: m.quality_id,
            creator_id: m.creator_id.clone(),
        }
    }

    fn genre(&self, m: &movie::Model) -> String {
        self.genres.get(&m.genre_id).cloned().unwrap_or_default()
    }

    fn quality(&self, m: &movie::Model) -> String {
        self.qualities.get(&m.quality_id).cloned().unwrap_or_default()
    }
}

pub fn genre_option(g: genre::Model) -> GenreOption {
    GenreOption { id: g.id, name: g.name }
}

pub fn quality_option(q: quality::Model) -> QualityOption {
    QualityOption { id: q.id, name: q.name }
}

/// Distinct genre and quality ids referenced by `movies`, ascending.
pub fn referenced_ids(movies: &[movie::Model]) -> (Vec<i32>, Vec<i32>) {
    let mut genres: Vec<i32> = movies.iter().map(|m| m.genre_id).collect();
    let mut qualities: Vec<i32> = movies.iter().map(|m| m.quality_id).collect();
    genres.sort_unstable();
    genres.dedup();
    qualities.sort_unstable();
    qualities.dedup();
    (genres, qualities)
}

fn join(names: Option<&Vec<String>>) -> String {
    names.map(|n| n.join(", ")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i32) -> movie::Model {
        movie::Model {
            id,
            title: "Heat".to_string(),
            search_key: "heat".to_string(),
            year: 1995,
            image_url: "https://img/heat.jpg".to_string(),
            watch_url: "https://watch/heat".to_string(),
            country: "USA".to_string(),
            duration: 170,
            age_limit: 16,
            description: "Cops and robbers.".to_string(),
            rating: 8.3,
            genre_id: 5,
            quality_id: 2,
            creator_id: "user-1".to_string(),
            is_deleted: false,
        }
    }

    #[test]
    fn joins_credits_and_resolves_reference_names() {
        let mut p = Projection::default();
        p.genres.insert(5, "Crime".to_string());
        p.qualities.insert(2, "HD".to_string());
        p.directors.insert(1, vec!["Michael Mann".to_string()]);
        p.actors.insert(1, vec!["Al Pacino".to_string(), "Robert De Niro".to_string()]);

        let s = p.summary(&movie(1));
        assert_eq!(s.genre, "Crime");
        assert_eq!(s.quality, "HD");
        assert_eq!(s.directors, "Michael Mann");
        assert_eq!(s.actors, "Al Pacino, Robert De Niro");

        let d = p.details(&movie(1));
        assert_eq!(d.genre_id, 5);
        assert_eq!(d.creator_id, "user-1");
        assert_eq!(d.actors, s.actors);
    }

    #[test]
    fn referenced_ids_are_distinct() {
        let mut other = movie(2);
        other.genre_id = 1;
        let mut third = movie(3);
        third.quality_id = 4;

        let (genres, qualities) = referenced_ids(&[movie(1), other, third]);
        assert_eq!(genres, vec![1, 5]);
        assert_eq!(qualities, vec![2, 4]);
        assert_eq!(referenced_ids(&[]), (vec![], vec![]));
    }

    #[test]
    fn missing_credits_project_to_empty_strings() {
        let s = Projection::default().summary(&movie(7));
        assert_eq!(s.directors, "");
        assert_eq!(s.actors, "");
        assert_eq!(s.genre, "");
    }
}
