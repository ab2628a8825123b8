//! # Domain Models
//!
//! These structs represent the core entities of Pulse-Board.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A titled proposal record with likes and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idea {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Aggregate like counter. Invariant: always equals the number of
    /// like edges stored for this idea.
    pub likes: i64,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// JSON bucket for idea-specific extras (e.g., status workflow fields)
    pub metadata: serde_json::Value,
}

/// A comment attached to an idea.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub content: String,
    /// Display label supplied by the caller; never a verified identity.
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An anonymous free-text wall entry with a display color and optional
/// mood/category metadata. Carries no caller-identifying fields at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub color: String,
    pub title: Option<String>,
    pub category: Option<String>,
    pub mood: Option<String>,
    pub is_advanced: bool,
    pub created_at: DateTime<Utc>,
}

/// How urgently an emergency report must be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum UrgencyLevel {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "LOW",
            UrgencyLevel::Medium => "MEDIUM",
            UrgencyLevel::High => "HIGH",
            UrgencyLevel::Critical => "CRITICAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LOW" => Some(UrgencyLevel::Low),
            "MEDIUM" => Some(UrgencyLevel::Medium),
            "HIGH" => Some(UrgencyLevel::High),
            "CRITICAL" => Some(UrgencyLevel::Critical),
            _ => None,
        }
    }
}

/// A report submitted through the emergency intake form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyReport {
    pub id: Uuid,
    pub description: String,
    pub name: Option<String>,
    pub department: Option<String>,
    pub urgency_level: UrgencyLevel,
    pub contact_agreement: bool,
    pub created_at: DateTime<Utc>,
}

/// The kind of thing an "about you" entry shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum AboutEntryType {
    #[default]
    Dream,
    Goal,
    Passion,
    Story,
}

impl AboutEntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AboutEntryType::Dream => "DREAM",
            AboutEntryType::Goal => "GOAL",
            AboutEntryType::Passion => "PASSION",
            AboutEntryType::Story => "STORY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DREAM" => Some(AboutEntryType::Dream),
            "GOAL" => Some(AboutEntryType::Goal),
            "PASSION" => Some(AboutEntryType::Passion),
            "STORY" => Some(AboutEntryType::Story),
            _ => None,
        }
    }
}

/// An "about you" sharing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutEntry {
    pub id: Uuid,
    pub content: String,
    pub entry_type: AboutEntryType,
    pub nickname: Option<String>,
    /// Computed once at creation (content longer than 50 chars) and
    /// persisted immutably with the record.
    pub is_surprise_unlocked: bool,
    pub created_at: DateTime<Utc>,
}

/// Result of a like toggle: the new counter and the caller's new state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LikeOutcome {
    pub likes: i64,
    pub has_liked: bool,
}
