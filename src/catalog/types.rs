use serde::{Deserialize, Serialize};

use crate::core::reconcile::Keyed;

/// One search hit. Identity is `id`; every other field is content.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    pub year: String,
    /// Upstream media type ("movie", "series", "episode").
    pub kind: String,
    pub poster_url: Option<String>,
}

impl Keyed for CatalogItem {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Result of a title search. An empty `items` is a valid answer, not an error.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPayload {
    pub items: Vec<CatalogItem>,
    /// Total hits reported upstream (may exceed `items.len()`; only the first page is fetched).
    pub total_results: usize,
}

impl CatalogPayload {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Full record for a single title, as shown in the detail view.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailRecord {
    pub id: String,
    pub title: String,
    pub year: String,
    pub plot: String,
    pub rated: Option<String>,
    pub released: Option<String>,
    pub runtime: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub actors: Option<String>,
    pub language: Option<String>,
    pub imdb_rating: Option<String>,
    pub poster_url: Option<String>,
}

impl DetailRecord {
    /// Labelled optional fields in display order, skipping the ones upstream left blank.
    pub fn facts(&self) -> Vec<(&'static str, &str)> {
        [
            ("Rated", &self.rated),
            ("Released", &self.released),
            ("Runtime", &self.runtime),
            ("Genre", &self.genre),
            ("Director", &self.director),
            ("Actors", &self.actors),
            ("Language", &self.language),
            ("IMDb", &self.imdb_rating),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facts_skip_missing_fields() {
        let record = DetailRecord {
            id: "tt0133093".to_string(),
            title: "The Matrix".to_string(),
            year: "1999".to_string(),
            plot: "A hacker learns the truth.".to_string(),
            runtime: Some("136 min".to_string()),
            director: Some("Lana Wachowski, Lilly Wachowski".to_string()),
            ..Default::default()
        };
        let facts = record.facts();
        assert_eq!(
            facts,
            vec![
                ("Runtime", "136 min"),
                ("Director", "Lana Wachowski, Lilly Wachowski"),
            ]
        );
    }

    #[test]
    fn test_catalog_item_key_is_id() {
        let item = CatalogItem {
            id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            kind: "movie".to_string(),
            poster_url: None,
        };
        assert_eq!(item.key(), "tt1375666");
    }
}
