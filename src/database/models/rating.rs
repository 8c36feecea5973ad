use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::{self, ValidationErrors, WriteMode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Rating {
    pub id: i64,
    #[serde(rename = "kitten")]
    pub kitten_id: i64,
    #[serde(rename = "user")]
    pub user_id: i64,
    pub score: i32,
    pub comment: String,
}

/// Incoming rating body. `user` is read-only and therefore not accepted.
#[derive(Debug, Default, Deserialize)]
pub struct RatingPayload {
    #[serde(default, deserialize_with = "validation::nullable")]
    pub kitten: Option<Option<i64>>,
    #[serde(default, deserialize_with = "validation::nullable")]
    pub score: Option<Option<i64>>,
    #[serde(default, deserialize_with = "validation::nullable")]
    pub comment: Option<Option<String>>,
}

/// Validated rating fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingInput {
    pub kitten_id: i64,
    pub score: i32,
    pub comment: String,
}

/// Aggregate returned by `kitten-stats`; `total_score` is null when nobody rated yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct KittenStats {
    pub total_score: Option<i64>,
    pub rating_count: i64,
}

impl KittenStats {
    pub fn from_scores(scores: impl IntoIterator<Item = i32>) -> Self {
        let (total, count) = scores
            .into_iter()
            .fold((0i64, 0i64), |(total, count), s| (total + i64::from(s), count + 1));
        Self {
            total_score: (count > 0).then_some(total),
            rating_count: count,
        }
    }
}

impl RatingPayload {
    pub fn validate(self, stored: Option<&Rating>, mode: WriteMode) -> Result<RatingInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let kitten = validation::not_null(&mut errors, "kitten", self.kitten);
        let score = validation::not_null(&mut errors, "score", self.score);
        let comment = validation::not_null(&mut errors, "comment", self.comment);

        let kitten_id = validation::resolve(&mut errors, "kitten", kitten, stored.map(|r| r.kitten_id), mode);
        let score = validation::resolve(&mut errors, "score", score, stored.map(|r| i64::from(r.score)), mode)
            .and_then(|score| validation::score(&mut errors, "score", score));

        let comment = match comment {
            Some(c) => c.trim().to_string(),
            None => stored.map(|r| r.comment.clone()).unwrap_or_default(),
        };

        match (kitten_id, score) {
            (Some(kitten_id), Some(score)) => errors.finish(RatingInput { kitten_id, score, comment }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_score_fails() {
        for bad in [0, 6, -3] {
            let payload = RatingPayload { kitten: Some(Some(1)), score: Some(Some(bad)), comment: None };
            let errors = payload.validate(None, WriteMode::Create).unwrap_err();
            assert_eq!(errors.get("score"), Some("Rating must be between 1 and 5."));
        }
    }

    #[test]
    fn comment_defaults_to_blank() {
        let payload = RatingPayload { kitten: Some(Some(1)), score: Some(Some(5)), comment: None };
        let input = payload.validate(None, WriteMode::Create).unwrap();
        assert_eq!(input.comment, "");
        assert_eq!(input.score, 5);
    }

    #[test]
    fn null_fields_are_rejected() {
        let stored = Rating { id: 1, kitten_id: 2, user_id: 3, score: 4, comment: "ok".into() };
        let payload: RatingPayload =
            serde_json::from_value(serde_json::json!({"score": null, "comment": null})).unwrap();
        let errors = payload.validate(Some(&stored), WriteMode::Partial).unwrap_err();
        assert_eq!(errors.get("score"), Some(validation::NULL));
        assert_eq!(errors.get("comment"), Some(validation::NULL));
        assert!(errors.get("kitten").is_none());
    }

    #[test]
    fn stats_from_scores() {
        let stats = KittenStats::from_scores([5, 4]);
        assert_eq!(stats.total_score, Some(9));
        assert_eq!(stats.rating_count, 2);

        let empty = KittenStats::from_scores(Vec::new());
        assert_eq!(empty, KittenStats { total_score: None, rating_count: 0 });
    }

    #[test]
    fn serializes_relation_ids_with_wire_names() {
        let rating = Rating { id: 1, kitten_id: 2, user_id: 3, score: 4, comment: "ok".into() };
        let json = serde_json::to_value(rating).unwrap();
        assert_eq!(json["kitten"], 2);
        assert_eq!(json["user"], 3);
    }
}
