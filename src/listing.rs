//! Derived skill listings. Listings are never stored: they are recomputed
//! by flattening every profile's teachable skills into one listing each,
//! with the teacher's aggregated reputation attached. Keeping this a pure
//! projection means the listing set can never drift from the profile set.

use crate::{
    error::{Result, SwapError},
    model::{Review, SkillCategory, SkillListing, TeacherCard, UserProfile},
    reputation::{aggregate_reputation, TeacherRef},
};

const TECHNOLOGY_KEYWORDS: &[&str] = &[
    "python", "javascript", "java", "c#", "c++", "react", "node", "html", "css", "web", "program",
    "sql", "excel",
];
const ARTS_KEYWORDS: &[&str] = &[
    "guitar", "piano", "sing", "singing", "painting", "drawing", "art", "photography", "dance",
];
const LANGUAGE_KEYWORDS: &[&str] = &[
    "spanish", "french", "german", "english", "mandarin", "japanese",
];
const BUSINESS_KEYWORDS: &[&str] = &[
    "marketing", "business", "finance", "sales", "accounting", "management",
];

fn contains_keyword(title: &str, keywords: &[&str]) -> bool {
    title
        .split(|c: char| c.is_whitespace() || c == ',' || c == '.' || c == '/')
        .any(|word| keywords.contains(&word))
}

/// Buckets a skill title by exact word match against the known domains,
/// falling back to the user-submission bucket.
pub fn assign_category(title: &str) -> SkillCategory {
    let lower = title.to_lowercase();
    if contains_keyword(&lower, TECHNOLOGY_KEYWORDS) {
        SkillCategory::Technology
    } else if contains_keyword(&lower, ARTS_KEYWORDS) {
        SkillCategory::Arts
    } else if contains_keyword(&lower, LANGUAGE_KEYWORDS) {
        SkillCategory::Language
    } else if contains_keyword(&lower, BUSINESS_KEYWORDS) {
        SkillCategory::Business
    } else {
        SkillCategory::User
    }
}

/// Stable listing id: teacher identity plus the skill's position in their
/// teach list. The same skill always resolves to the same id.
pub fn listing_id(identity: &str, index: usize) -> String {
    format!("{identity}-{index}")
}

fn build_listing(profile: &UserProfile, index: usize, reviews: &[Review]) -> SkillListing {
    let title = profile.skills_to_teach[index].clone();
    let summary = aggregate_reputation(
        reviews,
        TeacherRef {
            identity: &profile.identity,
            display_name: &profile.display_name,
        },
    );

    SkillListing {
        id: listing_id(&profile.identity, index),
        title: title.clone(),
        description: profile
            .bio
            .clone()
            .unwrap_or_else(|| format!("Skill offered by {}", profile.display_name)),
        category: assign_category(&title),
        level: summary.experience_tier,
        duration: "Flexible".to_string(),
        teacher: TeacherCard {
            identity: profile.identity.clone(),
            display_name: profile.display_name.clone(),
            display_rating: summary.display_rating,
            trade_count: summary.review_count,
        },
    }
}

/// Flattens every profile's offered skills into the full listing set, in
/// profile discovery order.
pub fn project_listings(profiles: &[UserProfile], reviews: &[Review]) -> Vec<SkillListing> {
    let mut listings = Vec::new();
    for profile in profiles {
        for index in 0..profile.skills_to_teach.len() {
            listings.push(build_listing(profile, index, reviews));
        }
    }
    listings
}

/// Resolves a single listing id directly against the profile set, without
/// materializing every listing.
pub fn listing_by_id(
    profiles: &[UserProfile],
    reviews: &[Review],
    id: &str,
) -> Result<SkillListing> {
    for profile in profiles {
        for index in 0..profile.skills_to_teach.len() {
            if listing_id(&profile.identity, index) == id {
                return Ok(build_listing(profile, index, reviews));
            }
        }
    }
    Err(SwapError::NotFound(format!("listing {id}")))
}
