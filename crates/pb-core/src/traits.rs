//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AboutEntry, Comment, EmergencyReport, Idea, LikeOutcome, Message};

/// Data persistence contract for every submission type.
///
/// Implementations own the transactional guarantees: `toggle_like` must
/// apply its edge check and counter mutation as one atomic unit per
/// (idea, user) pair.
#[async_trait]
pub trait SubmissionRepo: Send + Sync {
    // Idea operations
    async fn create_idea(&self, idea: Idea) -> Result<()>;
    async fn list_ideas(&self) -> Result<Vec<(Idea, Vec<Comment>)>>;
    async fn has_liked(&self, idea_id: Uuid, user_id: &str) -> Result<bool>;
    /// Flips the (user, idea) like edge and adjusts the counter by ±1.
    /// Fails with `NotFound` when the idea does not exist.
    async fn toggle_like(&self, idea_id: Uuid, user_id: &str) -> Result<LikeOutcome>;
    async fn create_comment(&self, comment: Comment) -> Result<()>;
    /// Removes an idea along with its comments and like edges.
    async fn delete_idea(&self, idea_id: Uuid) -> Result<()>;

    // Message-wall operations
    async fn create_message(&self, message: Message) -> Result<()>;
    async fn list_messages(&self) -> Result<Vec<Message>>;
    async fn delete_message(&self, message_id: Uuid) -> Result<()>;

    // Emergency operations
    async fn create_emergency(&self, report: EmergencyReport) -> Result<()>;
    async fn list_emergencies(&self) -> Result<Vec<EmergencyReport>>;

    // About-you operations
    async fn create_about_entry(&self, entry: AboutEntry) -> Result<()>;
    async fn list_about_entries(&self) -> Result<Vec<AboutEntry>>;
}

/// Admin authorization seam. Token *issuance* lives outside this system;
/// implementations only decide whether a presented token grants admin
/// rights.
#[async_trait]
pub trait AdminGate: Send + Sync {
    async fn verify_admin_token(&self, token: &str) -> bool;
}
