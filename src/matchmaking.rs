//! Reciprocal matchmaking: surfaces listings whose teacher offers a skill
//! the current user wants AND wants a skill the current user offers. This
//! is a filter over the listing set, not a ranker; survivors keep their
//! discovery order.

use crate::model::{SkillListing, UserProfile};

/// Callers display at most this many suggestions; the engine itself
/// returns the full matching set.
pub const SUGGESTION_LIMIT: usize = 3;

fn resolve_teacher<'a>(
    directory: &'a [UserProfile],
    listing: &SkillListing,
) -> Option<&'a UserProfile> {
    directory.iter().find(|p| {
        p.identity.eq_ignore_ascii_case(&listing.teacher.identity)
            || p.display_name
                .eq_ignore_ascii_case(&listing.teacher.display_name)
    })
}

/// Two-sided match over the full listing set. Candidates with no
/// resolvable teacher profile are dropped silently rather than failing the
/// whole computation.
pub fn find_matches(
    current: &UserProfile,
    listings: &[SkillListing],
    directory: &[UserProfile],
) -> Vec<SkillListing> {
    if current.skills_to_learn.is_empty() {
        return Vec::new();
    }

    listings
        .iter()
        .filter(|listing| {
            // Never match a user with their own listings.
            if listing.teacher.identity.eq_ignore_ascii_case(&current.identity) {
                return false;
            }

            if !current.wants_to_learn(&listing.title) {
                return false;
            }

            let teacher = match resolve_teacher(directory, listing) {
                Some(teacher) => teacher,
                None => {
                    tracing::debug!(
                        listing = %listing.id,
                        "dropping candidate: teacher profile not found"
                    );
                    return false;
                }
            };

            // Reciprocity: the teacher must want something we can teach.
            teacher
                .skills_to_learn
                .iter()
                .any(|wanted| current.teaches(wanted))
        })
        .cloned()
        .collect()
}
