//! Pure aggregation of a teacher's review history into the rating and
//! experience tier shown on their listings.

use crate::model::Review;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Minimum reviews before a numeric rating is displayed. Below this the
/// sample is too small to be meaningful and a sentinel is shown instead of
/// a misleading zero.
pub const RATING_VISIBILITY_THRESHOLD: usize = 3;

/// Review count at which a teacher is considered advanced.
pub const ADVANCED_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayRating {
    NotEnoughData,
    Rated(f64),
}

impl Serialize for DisplayRating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DisplayRating::NotEnoughData => serializer.serialize_str("N/A"),
            DisplayRating::Rated(v) => serializer.serialize_f64(*v),
        }
    }
}

impl<'de> Deserialize<'de> for DisplayRating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Num(v) => Ok(DisplayRating::Rated(v)),
            Raw::Text(s) if s == "N/A" => Ok(DisplayRating::NotEnoughData),
            Raw::Text(s) => Err(de::Error::custom(format!("invalid rating: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceTier {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReputationSummary {
    pub display_rating: DisplayRating,
    pub experience_tier: ExperienceTier,
    pub review_count: u32,
}

/// How a teacher is referenced when attributing reviews: identity key
/// first, display name as fallback, both case-insensitive.
#[derive(Debug, Clone, Copy)]
pub struct TeacherRef<'a> {
    pub identity: &'a str,
    pub display_name: &'a str,
}

impl TeacherRef<'_> {
    fn matches(&self, attribution: &str) -> bool {
        attribution.eq_ignore_ascii_case(self.identity)
            || attribution.eq_ignore_ascii_case(self.display_name)
    }
}

/// Derives the displayed reputation for one teacher from the full review
/// set. Deterministic and side-effect free.
pub fn aggregate_reputation(reviews: &[Review], teacher: TeacherRef<'_>) -> ReputationSummary {
    let scores: Vec<u8> = reviews
        .iter()
        .filter(|r| teacher.matches(&r.teacher_name))
        .map(|r| r.rating)
        .collect();
    let n = scores.len();

    let experience_tier = if n >= ADVANCED_THRESHOLD {
        ExperienceTier::Advanced
    } else if n >= 1 {
        ExperienceTier::Intermediate
    } else {
        ExperienceTier::Beginner
    };

    // The n == 0 arm also guards the division below.
    let display_rating = if n >= RATING_VISIBILITY_THRESHOLD {
        let sum: u32 = scores.iter().map(|&s| u32::from(s)).sum();
        let mean = f64::from(sum) / n as f64;
        DisplayRating::Rated((mean * 10.0).round() / 10.0)
    } else {
        DisplayRating::NotEnoughData
    };

    ReputationSummary {
        display_rating,
        experience_tier,
        review_count: n as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn review_for(teacher: &str, rating: u8) -> Review {
        Review::new(Uuid::new_v4(), teacher.to_string(), rating, None)
    }

    const BEA: TeacherRef<'static> = TeacherRef {
        identity: "bea@example.com",
        display_name: "Bea Torres",
    };

    #[test]
    fn no_reviews_means_beginner() {
        let summary = aggregate_reputation(&[], BEA);
        assert_eq!(summary.experience_tier, ExperienceTier::Beginner);
        assert_eq!(summary.display_rating, DisplayRating::NotEnoughData);
    }

    #[test]
    fn rating_hidden_below_threshold() {
        let reviews = vec![
            review_for("bea@example.com", 5),
            review_for("Bea Torres", 5),
        ];
        let summary = aggregate_reputation(&reviews, BEA);
        assert_eq!(summary.experience_tier, ExperienceTier::Intermediate);
        assert_eq!(summary.display_rating, DisplayRating::NotEnoughData);
        assert_eq!(summary.review_count, 2);
    }

    #[test]
    fn mean_rounds_to_one_decimal() {
        let reviews = vec![
            review_for("bea@example.com", 4),
            review_for("bea@example.com", 4),
            review_for("Bea Torres", 5),
        ];
        let summary = aggregate_reputation(&reviews, BEA);
        assert_eq!(summary.display_rating, DisplayRating::Rated(4.3));
        assert_eq!(summary.experience_tier, ExperienceTier::Intermediate);
    }

    #[test]
    fn five_reviews_makes_advanced() {
        let reviews: Vec<Review> = (0..5).map(|_| review_for("bea@example.com", 3)).collect();
        let summary = aggregate_reputation(&reviews, BEA);
        assert_eq!(summary.experience_tier, ExperienceTier::Advanced);
        assert_eq!(summary.display_rating, DisplayRating::Rated(3.0));
    }

    #[test]
    fn attribution_ignores_other_teachers() {
        let reviews = vec![
            review_for("cal@example.com", 1),
            review_for("Cal Nguyen", 1),
        ];
        let summary = aggregate_reputation(&reviews, BEA);
        assert_eq!(summary.review_count, 0);
        assert_eq!(summary.experience_tier, ExperienceTier::Beginner);
    }
}
