//! Append-only store of user answer ratings

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::AnswerRating;

/// A recorded rating
#[derive(Debug, Clone, Serialize)]
pub struct RatingRecord {
    #[serde(flatten)]
    pub rating: AnswerRating,
    pub timestamp: DateTime<Utc>,
}

/// In-process rating log shared by the HTTP handlers
#[derive(Debug, Default)]
pub struct RatingStore {
    ratings: RwLock<Vec<RatingRecord>>,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rating, returning its 1-based id
    pub fn record(&self, rating: AnswerRating) -> Result<usize> {
        if !(1..=5).contains(&rating.rating) {
            return Err(Error::validation(format!(
                "Rating must be between 1 and 5, got {}",
                rating.rating
            )));
        }

        let mut ratings = self.ratings.write();
        ratings.push(RatingRecord {
            rating,
            timestamp: Utc::now(),
        });
        Ok(ratings.len())
    }

    /// Snapshot of all ratings in arrival order
    pub fn all(&self) -> Vec<RatingRecord> {
        self.ratings.read().clone()
    }

    pub fn len(&self) -> usize {
        self.ratings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.read().is_empty()
    }

    /// Mean rating, 0.0 when nothing has been rated
    pub fn average(&self) -> f64 {
        let ratings = self.ratings.read();
        if ratings.is_empty() {
            return 0.0;
        }
        let total: u32 = ratings.iter().map(|r| u32::from(r.rating.rating)).sum();
        f64::from(total) / ratings.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(value: u8) -> AnswerRating {
        AnswerRating {
            query: "How do I reset the pump?".to_string(),
            rating: value,
            feedback: None,
            improvement_suggestions: None,
        }
    }

    #[test]
    fn test_record_and_average() {
        let store = RatingStore::new();
        assert_eq!(store.average(), 0.0);

        assert_eq!(store.record(rating(5)).unwrap(), 1);
        assert_eq!(store.record(rating(2)).unwrap(), 2);

        assert_eq!(store.len(), 2);
        assert!((store.average() - 3.5).abs() < f64::EPSILON);
        assert_eq!(store.all()[1].rating.rating, 2);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let store = RatingStore::new();
        assert!(matches!(store.record(rating(0)), Err(Error::Validation(_))));
        assert!(store.record(rating(6)).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_record_serializes_flat() {
        let store = RatingStore::new();
        store.record(rating(4)).unwrap();
        let json = serde_json::to_value(&store.all()[0]).unwrap();
        assert_eq!(json["rating"], 4);
        assert_eq!(json["query"], "How do I reset the pump?");
        assert!(json["timestamp"].is_string());
    }
}
