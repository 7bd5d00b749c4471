use crate::{
    error::{Result, SwapError},
    reputation::{DisplayRating, ExperienceTier},
    SwapId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A marketplace member. Skill strings are always held trimmed, lower-cased
/// and de-duplicated; mutation goes through [`UserProfile::add_skill`] and
/// [`UserProfile::remove_skill`] to keep that invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Unique identifier, typically the user's email address.
    pub identity: String,
    pub display_name: String,
    #[serde(default)]
    pub skills_to_teach: Vec<String>,
    #[serde(default)]
    pub skills_to_learn: Vec<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillSide {
    Teach,
    Learn,
}

/// Payload emitted when a user's skill sets change, for best-effort
/// persistence to the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillPatch {
    pub skills_to_teach: Vec<String>,
    pub skills_to_learn: Vec<String>,
}

/// Trims and lower-cases a raw skill string. Returns `None` when nothing
/// but whitespace remains, so empty skills are never persisted.
pub fn normalize_skill(raw: &str) -> Option<String> {
    let cleaned = raw.trim().to_lowercase();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

impl UserProfile {
    pub fn new(identity: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            display_name: display_name.into(),
            skills_to_teach: Vec::new(),
            skills_to_learn: Vec::new(),
            bio: None,
            date_joined: None,
        }
    }

    fn skill_list_mut(&mut self, side: SkillSide) -> &mut Vec<String> {
        match side {
            SkillSide::Teach => &mut self.skills_to_teach,
            SkillSide::Learn => &mut self.skills_to_learn,
        }
    }

    pub fn add_skill(&mut self, side: SkillSide, raw: &str) -> Result<()> {
        let skill = normalize_skill(raw)
            .ok_or_else(|| SwapError::Validation("skill name cannot be empty".to_string()))?;

        let list = self.skill_list_mut(side);
        if list.iter().any(|s| s.eq_ignore_ascii_case(&skill)) {
            return Err(SwapError::Validation(format!(
                "{skill} is already on the list"
            )));
        }
        list.push(skill);
        Ok(())
    }

    pub fn remove_skill(&mut self, side: SkillSide, raw: &str) {
        let target = raw.trim().to_lowercase();
        self.skill_list_mut(side)
            .retain(|s| !s.eq_ignore_ascii_case(&target));
    }

    pub fn teaches(&self, skill: &str) -> bool {
        self.skills_to_teach
            .iter()
            .any(|s| s.eq_ignore_ascii_case(skill))
    }

    pub fn wants_to_learn(&self, skill: &str) -> bool {
        self.skills_to_learn
            .iter()
            .any(|s| s.eq_ignore_ascii_case(skill))
    }

    /// Current skill sets as the patch payload for the remote service.
    pub fn skill_patch(&self) -> SkillPatch {
        SkillPatch {
            skills_to_teach: self.skills_to_teach.clone(),
            skills_to_learn: self.skills_to_learn.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Technology,
    Arts,
    Language,
    Business,
    /// Fallback bucket for user-submitted skills outside the known domains.
    User,
}

/// Teacher summary embedded in a derived listing. The rating is a sentinel
/// until the teacher has collected enough reviews to make it meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherCard {
    pub identity: String,
    pub display_name: String,
    pub display_rating: DisplayRating,
    pub trade_count: u32,
}

/// One teachable skill offered by one user. Listings are derived from
/// profiles on every read, never stored; the id is deterministic so the
/// same skill always resolves to the same listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillListing {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: SkillCategory,
    pub level: ExperienceTier,
    pub duration: String,
    pub teacher: TeacherCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapStatus {
    Pending,
    Approved,
    Completed,
    Reviewed,
    Cancelled,
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SwapStatus::Pending => "PENDING",
            SwapStatus::Approved => "APPROVED",
            SwapStatus::Completed => "COMPLETED",
            SwapStatus::Reviewed => "REVIEWED",
            SwapStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// A proposal to exchange one taught skill for another. Owned by the
/// learner who created it; mutated in place by lifecycle transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub id: SwapId,
    pub learner_identity: String,
    pub teacher_name: String,
    pub skill_requested: String,
    pub skill_offered: String,
    pub status: SwapStatus,
    pub date_requested: DateTime<Utc>,
}

impl SwapRequest {
    pub fn new(
        learner_identity: String,
        teacher_name: String,
        skill_requested: String,
        skill_offered: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            learner_identity,
            teacher_name,
            skill_requested,
            skill_offered,
            status: SwapStatus::Pending,
            date_requested: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, identity: &str) -> bool {
        self.learner_identity.eq_ignore_ascii_case(identity)
    }
}

/// Created exactly once per swap, only from a COMPLETED swap. Immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub swap_id: SwapId,
    /// Teacher attribution: identity key or display name, matched
    /// case-insensitively by the aggregator.
    pub teacher_name: String,
    pub rating: u8,
    #[serde(default)]
    pub feedback: Option<String>,
    pub date: DateTime<Utc>,
}

impl Review {
    pub fn new(
        swap_id: SwapId,
        teacher_name: String,
        rating: u8,
        feedback: Option<String>,
    ) -> Self {
        Self {
            swap_id,
            teacher_name,
            rating,
            feedback,
            date: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=5).contains(&self.rating) {
            return Err(SwapError::Validation(
                "rating must be an integer between 1 and 5".to_string(),
            ));
        }
        Ok(())
    }
}
