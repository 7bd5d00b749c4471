//! # skillswap - peer-to-peer skill-exchange core
//!
//! The non-CRUD heart of a skill-trading marketplace.
//!
//! ## Architecture
//!
//! - **Reputation**: pure aggregation of received reviews into a display rating and experience tier
//! - **Listings**: derived projection of every user's teachable skills, one listing per skill
//! - **Matchmaking**: reciprocal two-sided filter over listings (I learn what you teach, you learn what I teach)
//! - **Lifecycle**: state machine driving a swap request from PENDING through REVIEWED
//! - **Negotiation**: keyword-classified scripted responder with a cancellable typing delay
//! - **Directory**: reqwest client for the remote profile/review service

pub mod config;
pub mod directory;
pub mod error;
pub mod lifecycle;
pub mod listing;
pub mod matchmaking;
pub mod model;
pub mod negotiation;
pub mod reputation;
pub mod store;

pub use config::AppConfig;
pub use directory::{DirectoryClient, DirectorySnapshot};
pub use error::{Result, SwapError};
pub use lifecycle::LifecycleManager;
pub use listing::project_listings;
pub use matchmaking::{find_matches, SUGGESTION_LIMIT};
pub use model::{Review, SkillListing, SwapRequest, SwapStatus, UserProfile};
pub use negotiation::{NegotiationSession, ReplyCategory};
pub use reputation::{aggregate_reputation, ExperienceTier, ReputationSummary};
pub use store::{MemoryStore, SwapStore};

pub type SwapId = uuid::Uuid;
