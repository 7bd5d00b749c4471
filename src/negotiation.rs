//! Scripted negotiation counterpart. Stands in for the real teacher while
//! two users discuss a trade before a request is sent: classifies each
//! local message by keyword category, picks a canned line from the matched
//! pool, and delivers it after a cancellable "teacher is typing" delay.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;

const GREETING_REPLIES: &[&str] = &[
    "Hello! I'm happy to chat about trading skills. What skill are you offering me?",
    "Hi there! Thanks for reaching out about the swap. Tell me a bit about your teaching experience.",
    "Welcome! How can I help you get started with the trade?",
];

const AVAILABILITY_REPLIES: &[&str] = &[
    "Got it! Let me check my calendar now. Are you free in the evenings or mornings?",
    "That works for me. We can meet online via video call. Do you have a preferred platform?",
    "I'm flexible! What time works best for you on those days?",
    "Okay, I see that time is free. Can you confirm the day?",
];

const EXPERIENCE_REPLIES: &[&str] = &[
    "I've been working with this skill for about five years, specializing in the fundamentals. How long have you been practicing the skill you're offering?",
    "I have significant experience in this area. Before we dive into scheduling, can you tell me more about the skill you can teach?",
];

const SKILL_QUERY_REPLIES: &[&str] = &[
    "Sounds interesting! What is your experience level with the skill you're offering to teach?",
    "Great! Can you tell me a little bit about your background in that field?",
];

const DEFAULT_REPLIES: &[&str] = &[
    "I think this trade could work well. Tell me what your preferred method of teaching is (video, screen-share, or step-by-step exercises).",
    "Great — I usually teach via short demonstrations followed by practice. Does that teaching style work for you?",
    "Perfect. I'll prepare a concise plan for our first session focusing on fundamentals and hands-on practice.",
];

const SCHEDULING_TERMS: &[&str] = &[
    "available", "when", "time", "schedule", "pm", "am", "thursday", "evening",
];
const EXPERIENCE_TERMS: &[&str] = &["experience", "how much", "years", "detail"];
const SKILL_TERMS: &[&str] = &["skill", "teach", "offering", "what you can"];
const GREETING_TERMS: &[&str] = &["hi", "hello", "hey"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyCategory {
    Greeting,
    Availability,
    ExperienceQuery,
    SkillQuery,
    Default,
}

impl ReplyCategory {
    /// The canned reply pool for this category.
    pub fn replies(self) -> &'static [&'static str] {
        match self {
            ReplyCategory::Greeting => GREETING_REPLIES,
            ReplyCategory::Availability => AVAILABILITY_REPLIES,
            ReplyCategory::ExperienceQuery => EXPERIENCE_REPLIES,
            ReplyCategory::SkillQuery => SKILL_QUERY_REPLIES,
            ReplyCategory::Default => DEFAULT_REPLIES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Local,
    Counterpart,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| text.contains(t))
}

/// One ongoing conversation, keyed by (counterpart, subject skill).
#[derive(Debug)]
pub struct Conversation {
    pub counterpart: String,
    pub skill: String,
    messages: Vec<ChatMessage>,
    opening_sent: bool,
    scheduling_resolved: bool,
    last_replied: Option<u64>,
    next_id: u64,
}

impl Conversation {
    pub fn new(counterpart: impl Into<String>, skill: impl Into<String>) -> Self {
        Self {
            counterpart: counterpart.into(),
            skill: skill.into(),
            messages: Vec::new(),
            opening_sent: false,
            scheduling_resolved: false,
            last_replied: None,
            next_id: 0,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Records a message from the local user; returns its id.
    pub fn record_local(&mut self, text: &str) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            sender: Sender::Local,
            text: text.trim().to_string(),
            sent_at: Utc::now(),
        });
        id
    }

    /// Categorizes a message. Priority order is fixed: scheduling terms
    /// win over experience terms, then skill terms, then greetings; the
    /// categories are mutually exclusive by construction.
    pub fn classify(text: &str) -> ReplyCategory {
        let text = text.to_lowercase();
        if contains_any(&text, SCHEDULING_TERMS) {
            ReplyCategory::Availability
        } else if contains_any(&text, EXPERIENCE_TERMS) {
            ReplyCategory::ExperienceQuery
        } else if contains_any(&text, SKILL_TERMS) {
            ReplyCategory::SkillQuery
        } else if contains_any(&text, GREETING_TERMS) {
            ReplyCategory::Greeting
        } else {
            ReplyCategory::Default
        }
    }

    /// Composes the scripted reply to the latest unanswered local message,
    /// appends it to the transcript and returns it. `None` when the latest
    /// message is not a fresh local one (the simulator never answers its
    /// own replies, and never answers the same message twice).
    pub fn compose_reply(&mut self, rng: &mut StdRng) -> Option<ChatMessage> {
        let last = self.messages.last()?;
        if last.sender != Sender::Local || self.last_replied == Some(last.id) {
            return None;
        }
        let trigger_id = last.id;

        let mut category = Self::classify(&last.text);
        if category == ReplyCategory::Availability {
            if self.scheduling_resolved {
                // Scheduling was settled once already; move the
                // conversation forward instead of looping on availability.
                category = ReplyCategory::Default;
            } else {
                self.scheduling_resolved = true;
            }
        }

        let pool = category.replies();
        let mut text = pool[rng.gen_range(0..pool.len())].to_string();

        if !self.opening_sent {
            text = format!("Hi, I saw your swap request for {}. {}", self.skill, text);
            self.opening_sent = true;
        }

        let id = self.next_id;
        self.next_id += 1;
        let reply = ChatMessage {
            id,
            sender: Sender::Counterpart,
            text,
            sent_at: Utc::now(),
        };
        self.messages.push(reply.clone());
        self.last_replied = Some(trigger_id);
        tracing::debug!(?category, counterpart = %self.counterpart, "composed simulated reply");
        Some(reply)
    }

    fn clear(&mut self) {
        self.messages.clear();
        self.opening_sent = false;
        self.scheduling_resolved = false;
        self.last_replied = None;
        self.next_id = 0;
    }
}

struct SessionState {
    conversation: Conversation,
    rng: StdRng,
    /// Bumped on every reset; a scheduled reply from an older epoch is
    /// discarded even if its delay had already elapsed.
    epoch: u64,
    pending: Option<JoinHandle<()>>,
}

/// Async wrapper around [`Conversation`] that delivers replies after a
/// fixed typing delay. The delay is the only suspending operation in the
/// core, and the only cancellable one: [`NegotiationSession::reset`]
/// guarantees no reply lands afterwards.
#[derive(Clone)]
pub struct NegotiationSession {
    state: Arc<Mutex<SessionState>>,
    reply_delay: Duration,
}

impl NegotiationSession {
    pub fn new(
        counterpart: impl Into<String>,
        skill: impl Into<String>,
        reply_delay: Duration,
    ) -> Self {
        Self::with_rng(counterpart, skill, reply_delay, StdRng::from_entropy())
    }

    /// Deterministic variant for tests: replies are reproducible for a
    /// given seed.
    pub fn with_seed(
        counterpart: impl Into<String>,
        skill: impl Into<String>,
        reply_delay: Duration,
        seed: u64,
    ) -> Self {
        Self::with_rng(counterpart, skill, reply_delay, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        counterpart: impl Into<String>,
        skill: impl Into<String>,
        reply_delay: Duration,
        rng: StdRng,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                conversation: Conversation::new(counterpart, skill),
                rng,
                epoch: 0,
                pending: None,
            })),
            reply_delay,
        }
    }

    /// Records a local message and schedules the simulated reply. A reply
    /// still pending for an earlier message is superseded; only the latest
    /// unanswered message is answered.
    pub fn send_message(&self, text: &str) -> u64 {
        let mut state = self.state.lock();
        let id = state.conversation.record_local(text);

        if let Some(handle) = state.pending.take() {
            handle.abort();
        }

        let epoch = state.epoch;
        let shared = Arc::clone(&self.state);
        let delay = self.reply_delay;
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = shared.lock();
            if state.epoch != epoch {
                tracing::debug!("simulated reply dropped: session was reset");
                return;
            }
            let SessionState {
                conversation, rng, ..
            } = &mut *state;
            conversation.compose_reply(rng);
        }));

        id
    }

    /// Tears the conversation down, e.g. when the user navigates away.
    /// Any scheduled reply is cancelled atomically: even if its delay has
    /// already elapsed, it can no longer be appended.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        if let Some(handle) = state.pending.take() {
            handle.abort();
        }
        state.epoch += 1;
        state.conversation.clear();
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.state.lock().conversation.messages().to_vec()
    }
}
