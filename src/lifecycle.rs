//! Swap-request state machine.
//!
//! ```text
//! PENDING -> APPROVED -> COMPLETED -> REVIEWED
//!    |
//!    +-> CANCELLED (learner only)
//! ```
//!
//! Every transition is a read-modify-write of the entire request
//! collection; an invalid transition leaves the store untouched.

use crate::{
    error::{Result, SwapError},
    model::{Review, SkillListing, SwapRequest, SwapStatus, UserProfile},
    store::SwapStore,
    SwapId,
};

/// Teacher-side actions are not identity-checked in the reference model.
/// Tightening the rule later is a change to this one function.
fn actor_may_accept(_actor: &str, _request: &SwapRequest) -> bool {
    true
}

pub struct LifecycleManager<S: SwapStore> {
    store: S,
}

impl<S: SwapStore> LifecycleManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The learner's swap history, in stored order.
    pub fn history(&self, learner_identity: &str) -> Result<Vec<SwapRequest>> {
        self.store.requests_for(learner_identity)
    }

    /// Creates a PENDING request. The learner must have at least one skill
    /// to offer, the offered skill must be on their own teach list, and
    /// the request must reference an existing listing.
    pub fn create(
        &self,
        learner: &UserProfile,
        listings: &[SkillListing],
        listing_id: &str,
        offered_skill: &str,
    ) -> Result<SwapRequest> {
        if learner.skills_to_teach.is_empty() {
            return Err(SwapError::Validation(
                "learner must list at least one skill to offer".to_string(),
            ));
        }
        if !learner.teaches(offered_skill) {
            return Err(SwapError::Validation(format!(
                "{offered_skill} is not on the learner's teach list"
            )));
        }
        let listing = listings
            .iter()
            .find(|l| l.id == listing_id)
            .ok_or_else(|| SwapError::NotFound(format!("listing {listing_id}")))?;

        let request = SwapRequest::new(
            learner.identity.clone(),
            listing.teacher.display_name.clone(),
            listing.title.clone(),
            offered_skill.trim().to_lowercase(),
        );

        let mut requests = self.store.all_requests()?;
        requests.push(request.clone());
        self.store.replace_requests(requests)?;

        tracing::info!(swap = %request.id, learner = %request.learner_identity, "swap request created");
        Ok(request)
    }

    /// Learner withdraws a PENDING request. The record is marked CANCELLED
    /// and removed from the stored collection; this is the only path that
    /// ever deletes a request.
    pub fn cancel(&self, actor: &str, id: SwapId) -> Result<SwapRequest> {
        let mut requests = self.store.all_requests()?;
        let position = find_request(&requests, id)?;

        if !requests[position].is_owned_by(actor) {
            return Err(SwapError::Validation(
                "only the requesting learner may cancel".to_string(),
            ));
        }
        if requests[position].status != SwapStatus::Pending {
            return Err(SwapError::InvalidTransition {
                from: requests[position].status,
                event: "cancel",
            });
        }

        let mut cancelled = requests.remove(position);
        cancelled.status = SwapStatus::Cancelled;
        self.store.replace_requests(requests)?;

        tracing::info!(swap = %id, "swap request cancelled");
        Ok(cancelled)
    }

    /// PENDING -> APPROVED.
    pub fn accept(&self, actor: &str, id: SwapId) -> Result<SwapRequest> {
        self.advance(actor, id, "accept", SwapStatus::Pending, SwapStatus::Approved)
    }

    /// APPROVED -> COMPLETED.
    pub fn complete(&self, actor: &str, id: SwapId) -> Result<SwapRequest> {
        self.advance(actor, id, "complete", SwapStatus::Approved, SwapStatus::Completed)
    }

    /// COMPLETED -> REVIEWED, creating exactly one review for the swap.
    /// The status rewrite and the review append are one atomic store
    /// commit; on any validation failure the swap stays COMPLETED so the
    /// caller can retry.
    pub fn review(
        &self,
        id: SwapId,
        rating: u8,
        feedback: Option<String>,
    ) -> Result<Review> {
        let mut requests = self.store.all_requests()?;
        let position = find_request(&requests, id)?;

        if requests[position].status != SwapStatus::Completed {
            return Err(SwapError::InvalidTransition {
                from: requests[position].status,
                event: "review",
            });
        }

        let review = Review::new(id, requests[position].teacher_name.clone(), rating, feedback);
        review.validate()?;

        requests[position].status = SwapStatus::Reviewed;
        self.store.commit_review(requests, review.clone())?;

        tracing::info!(swap = %id, rating, "review submitted");
        Ok(review)
    }

    fn advance(
        &self,
        actor: &str,
        id: SwapId,
        event: &'static str,
        from: SwapStatus,
        to: SwapStatus,
    ) -> Result<SwapRequest> {
        let mut requests = self.store.all_requests()?;
        let position = find_request(&requests, id)?;

        if requests[position].status != from {
            return Err(SwapError::InvalidTransition {
                from: requests[position].status,
                event,
            });
        }
        if !actor_may_accept(actor, &requests[position]) {
            return Err(SwapError::Validation(format!(
                "{actor} may not {event} this request"
            )));
        }

        requests[position].status = to;
        let updated = requests[position].clone();
        self.store.replace_requests(requests)?;

        tracing::info!(swap = %id, %to, "swap request advanced");
        Ok(updated)
    }
}

fn find_request(requests: &[SwapRequest], id: SwapId) -> Result<usize> {
    requests
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| SwapError::NotFound(format!("swap request {id}")))
}
