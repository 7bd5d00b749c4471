//! Repository seams for the two shared mutable collections: swap requests
//! and reviews. The lifecycle manager only ever talks to these traits, so
//! the read-modify-write policy is testable in isolation and the ambient
//! storage of the host application stays out of the core.

use crate::{
    error::Result,
    model::{Review, SwapRequest},
    SwapId,
};
use parking_lot::Mutex;

/// Full-collection store for swap requests plus the append-only review
/// log. Every lifecycle transition reads the whole collection and writes
/// the whole collection back; that rewrite is the unit of atomicity.
pub trait SwapStore: Send + Sync {
    /// The full ordered request collection.
    fn all_requests(&self) -> Result<Vec<SwapRequest>>;

    /// Requests owned by one learner, identity matched case-insensitively,
    /// in stored order.
    fn requests_for(&self, learner_identity: &str) -> Result<Vec<SwapRequest>> {
        Ok(self
            .all_requests()?
            .into_iter()
            .filter(|r| r.is_owned_by(learner_identity))
            .collect())
    }

    /// Replaces the entire request collection.
    fn replace_requests(&self, requests: Vec<SwapRequest>) -> Result<()>;

    fn all_reviews(&self) -> Result<Vec<Review>>;

    /// Appends one review. Reviews are never mutated or removed.
    fn append_review(&self, review: Review) -> Result<()>;

    /// Writes the rewritten request collection and the new review as one
    /// atomic unit, so a REVIEWED swap can never exist without its review.
    fn commit_review(&self, requests: Vec<SwapRequest>, review: Review) -> Result<()>;
}

#[derive(Default)]
struct StoreInner {
    requests: Vec<SwapRequest>,
    reviews: Vec<Review>,
}

/// In-memory reference store. Both collections live behind one lock so
/// [`SwapStore::commit_review`] really is atomic.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<StoreInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-loads reviews, e.g. a snapshot fetched from the remote service.
    pub fn with_reviews(reviews: Vec<Review>) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                requests: Vec::new(),
                reviews,
            }),
        }
    }

    pub fn reviews_for_swap(&self, swap_id: SwapId) -> Vec<Review> {
        self.inner
            .lock()
            .reviews
            .iter()
            .filter(|r| r.swap_id == swap_id)
            .cloned()
            .collect()
    }
}

impl SwapStore for MemoryStore {
    fn all_requests(&self) -> Result<Vec<SwapRequest>> {
        Ok(self.inner.lock().requests.clone())
    }

    fn replace_requests(&self, requests: Vec<SwapRequest>) -> Result<()> {
        self.inner.lock().requests = requests;
        Ok(())
    }

    fn all_reviews(&self) -> Result<Vec<Review>> {
        Ok(self.inner.lock().reviews.clone())
    }

    fn append_review(&self, review: Review) -> Result<()> {
        self.inner.lock().reviews.push(review);
        Ok(())
    }

    fn commit_review(&self, requests: Vec<SwapRequest>, review: Review) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.requests = requests;
        inner.reviews.push(review);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SwapStatus;

    fn request(learner: &str) -> SwapRequest {
        SwapRequest::new(
            learner.to_string(),
            "Bea".to_string(),
            "python".to_string(),
            "guitar".to_string(),
        )
    }

    #[test]
    fn requests_for_filters_case_insensitively() {
        let store = MemoryStore::new();
        store
            .replace_requests(vec![request("Ada@Example.com"), request("bea@example.com")])
            .unwrap();

        let mine = store.requests_for("ada@example.com").unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].status, SwapStatus::Pending);
    }

    #[test]
    fn commit_review_writes_both_collections() {
        let store = MemoryStore::new();
        let mut req = request("ada@example.com");
        req.status = SwapStatus::Reviewed;
        let review = Review::new(req.id, "Bea".to_string(), 5, None);

        store.commit_review(vec![req.clone()], review).unwrap();
        assert_eq!(store.all_requests().unwrap().len(), 1);
        assert_eq!(store.reviews_for_swap(req.id).len(), 1);
    }
}
