//! pulse-board/crates/pb-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Pulse-Board:
//! domain models, the content-moderation pipeline, the submission
//! coordinator, and the ports the plugins implement.

pub mod error;
pub mod models;
pub mod moderation;
pub mod submission;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use moderation::*;
pub use submission::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use uuid::Uuid;

    #[test]
    fn test_idea_creation_v7() {
        let id = Uuid::now_v7();
        let idea = Idea {
            id,
            title: "Hackathon".to_string(),
            description: "Organiser un hackathon interne".to_string(),
            likes: 0,
            category: None,
            priority: None,
            tags: vec![],
            created_at: chrono::Utc::now(),
            metadata: serde_json::json!({ "version": 1 }),
        };
        assert_eq!(idea.id, id);
        assert_eq!(idea.likes, 0);
    }

    #[test]
    fn urgency_round_trips_through_str() {
        for level in [
            UrgencyLevel::Low,
            UrgencyLevel::Medium,
            UrgencyLevel::High,
            UrgencyLevel::Critical,
        ] {
            assert_eq!(UrgencyLevel::parse(level.as_str()), Some(level));
        }
        assert_eq!(UrgencyLevel::parse("PANIC"), None);
    }
}
