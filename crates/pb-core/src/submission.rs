//! # Submission Coordinator
//!
//! Orchestrates the moderation pipeline across the fields of one
//! submission, builds the record handed to the persistence port, and
//! enforces the anonymity guarantees of the message wall. No persistence
//! call happens until every field has passed.

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    AboutEntry, AboutEntryType, Comment, EmergencyReport, Idea, Message, UrgencyLevel,
};
use crate::moderation::{ContentValidator, ValidationOptions};

/// Display color assigned to wall messages when the caller picks none.
pub const DEFAULT_MESSAGE_COLOR: &str = "bg-pastel-blue/40";

/// The only fields a wall-message response may ever contain. Anything the
/// record carries internally beyond this list must never reach a caller.
pub const MESSAGE_PUBLIC_FIELDS: &[&str] = &[
    "id",
    "content",
    "color",
    "title",
    "category",
    "mood",
    "isAdvanced",
    "createdAt",
];

/// One free-text field of a submission, with its own constraints.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec<'a> {
    /// User-facing field name, used to prefix rejection messages for
    /// fields after the first (e.g., "Titre: ...").
    pub label: &'a str,
    pub text: Option<&'a str>,
    /// Optional fields with no text are skipped; required fields with no
    /// text fail the minimum-length check like an empty string would.
    pub required: bool,
    pub options: ValidationOptions,
}

impl<'a> FieldSpec<'a> {
    pub fn required(label: &'a str, text: Option<&'a str>, min: usize, max: usize) -> Self {
        Self {
            label,
            text,
            required: true,
            options: ValidationOptions::new(min, max),
        }
    }

    pub fn optional(label: &'a str, text: Option<&'a str>, min: usize, max: usize) -> Self {
        Self {
            label,
            text,
            required: false,
            options: ValidationOptions::new(min, max),
        }
    }
}

/// Raw caller input for a new idea.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct IdeaDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Raw caller input for a new wall message.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    pub content: Option<String>,
    pub color: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub mood: Option<String>,
    pub is_advanced: Option<bool>,
}

/// Raw caller input for a comment on an idea.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CommentDraft {
    pub content: Option<String>,
    pub author: Option<String>,
}

/// Raw caller input for an emergency report.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyDraft {
    pub description: Option<String>,
    pub name: Option<String>,
    pub department: Option<String>,
    pub urgency_level: Option<UrgencyLevel>,
    pub contact_agreement: Option<bool>,
}

/// Raw caller input for an "about you" entry.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutDraft {
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: Option<AboutEntryType>,
    pub nickname: Option<String>,
}

/// Validates multi-field submissions and assembles persisted records.
#[derive(Debug, Clone, Default)]
pub struct SubmissionCoordinator {
    validator: ContentValidator,
}

impl SubmissionCoordinator {
    pub fn new(validator: ContentValidator) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &ContentValidator {
        &self.validator
    }

    /// Masking-only preview: shows the caller what would be blocked
    /// without judging or persisting anything.
    pub fn redact_preview(&self, text: &str) -> String {
        self.validator.redact(text)
    }

    /// Runs each field through the validator in declaration order,
    /// short-circuiting on the first failure. The first field's rejection
    /// message is returned verbatim; later fields get a "{label}: " prefix
    /// so the caller can tell them apart.
    ///
    /// Returns the cleaned content per field, aligned with the input
    /// (None for skipped optional fields).
    pub fn validate_fields(&self, fields: &[FieldSpec<'_>]) -> Result<Vec<Option<String>>> {
        let mut cleaned = Vec::with_capacity(fields.len());

        for (index, field) in fields.iter().enumerate() {
            let text = match field.text {
                Some(text) => text,
                None if field.required => "",
                None => {
                    cleaned.push(None);
                    continue;
                }
            };

            let report = self.validator.validate(text, &field.options);
            if !report.is_valid {
                let message = if index == 0 {
                    report.message
                } else {
                    format!("{}: {}", field.label, report.message)
                };
                return Err(AppError::Validation(message));
            }
            cleaned.push(Some(report.cleaned_content));
        }

        Ok(cleaned)
    }

    /// Validates and assembles a new idea. Title and description carry
    /// their own constraints; category/priority/tags pass through without
    /// content rules, defaulted when absent.
    pub fn prepare_idea(&self, draft: IdeaDraft) -> Result<Idea> {
        let cleaned = self.validate_fields(&[
            FieldSpec::required("Titre", draft.title.as_deref(), 3, 100),
            FieldSpec::required("Description", draft.description.as_deref(), 10, 500),
        ])?;
        let mut cleaned = cleaned.into_iter();

        Ok(Idea {
            id: Uuid::now_v7(),
            title: cleaned.next().flatten().unwrap_or_default(),
            description: cleaned.next().flatten().unwrap_or_default(),
            likes: 0,
            category: draft.category,
            priority: draft.priority,
            tags: draft.tags.unwrap_or_default(),
            created_at: Utc::now(),
            metadata: serde_json::json!({}),
        })
    }

    /// Validates and assembles an anonymous wall message.
    ///
    /// By construction the record holds nothing that could identify the
    /// submitter: no network address, no user agent, no request timestamp
    /// beyond the record's own creation time. Callers must additionally
    /// project responses through [`MESSAGE_PUBLIC_FIELDS`].
    pub fn prepare_message(&self, draft: MessageDraft) -> Result<Message> {
        let cleaned = self.validate_fields(&[
            FieldSpec::required("Contenu", draft.content.as_deref(), 1, 500),
            FieldSpec::optional("Titre", draft.title.as_deref(), 1, 100),
        ])?;
        let mut cleaned = cleaned.into_iter();

        Ok(Message {
            id: Uuid::now_v7(),
            content: cleaned.next().flatten().unwrap_or_default(),
            color: draft
                .color
                .unwrap_or_else(|| DEFAULT_MESSAGE_COLOR.to_owned()),
            title: cleaned.next().flatten(),
            category: draft.category,
            mood: draft.mood,
            is_advanced: draft.is_advanced.unwrap_or(false),
            created_at: Utc::now(),
        })
    }

    /// Validates and assembles a comment on an idea.
    pub fn prepare_comment(&self, idea_id: Uuid, draft: CommentDraft) -> Result<Comment> {
        let cleaned = self.validate_fields(&[FieldSpec::required(
            "Commentaire",
            draft.content.as_deref(),
            1,
            500,
        )])?;

        Ok(Comment {
            id: Uuid::now_v7(),
            idea_id,
            content: cleaned.into_iter().next().flatten().unwrap_or_default(),
            author: draft.author,
            created_at: Utc::now(),
        })
    }

    /// Validates and assembles an emergency report.
    pub fn prepare_emergency(&self, draft: EmergencyDraft) -> Result<EmergencyReport> {
        let cleaned = self.validate_fields(&[FieldSpec::required(
            "Description",
            draft.description.as_deref(),
            10,
            1000,
        )])?;

        Ok(EmergencyReport {
            id: Uuid::now_v7(),
            description: cleaned.into_iter().next().flatten().unwrap_or_default(),
            name: draft.name,
            department: draft.department,
            urgency_level: draft.urgency_level.unwrap_or_default(),
            contact_agreement: draft.contact_agreement.unwrap_or(false),
            created_at: Utc::now(),
        })
    }

    /// Validates and assembles an "about you" entry. The surprise flag is
    /// computed here, once, and persisted immutably with the record.
    pub fn prepare_about(&self, draft: AboutDraft) -> Result<AboutEntry> {
        let cleaned = self.validate_fields(&[FieldSpec::required(
            "Contenu",
            draft.content.as_deref(),
            1,
            1000,
        )])?;
        let content = cleaned.into_iter().next().flatten().unwrap_or_default();

        Ok(AboutEntry {
            id: Uuid::now_v7(),
            is_surprise_unlocked: surprise_unlocked(&content),
            content,
            entry_type: draft.entry_type.unwrap_or_default(),
            nickname: draft.nickname,
            created_at: Utc::now(),
        })
    }
}

/// Shares longer than 50 characters unlock a surprise.
pub fn surprise_unlocked(content: &str) -> bool {
    content.chars().count() > 50
}

/// Projects a JSON record through an allow-list: only listed keys survive.
/// Works for any record shape; non-object values come back as empty
/// objects rather than leaking anything.
pub fn project_allowed(record: &Value, allowed: &[&str]) -> Value {
    let mut out = serde_json::Map::new();
    if let Value::Object(map) = record {
        for key in allowed {
            if let Some(value) = map.get(*key) {
                out.insert((*key).to_owned(), value.clone());
            }
        }
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coordinator() -> SubmissionCoordinator {
        SubmissionCoordinator::default()
    }

    #[test]
    fn first_field_failure_is_unprefixed() {
        // Title "Hi" is below the 3-char minimum; the message comes back
        // verbatim, citing the minimum.
        let err = coordinator()
            .prepare_idea(IdeaDraft {
                title: Some("Hi".to_owned()),
                description: Some("Une description suffisante".to_owned()),
                category: None,
                priority: None,
                tags: None,
            })
            .unwrap_err();
        match err {
            AppError::Validation(message) => {
                assert!(message.contains("au moins 3"));
                assert!(!message.contains(':'));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn later_field_failure_is_prefixed_with_label() {
        let err = coordinator()
            .prepare_idea(IdeaDraft {
                title: Some("Hackathon".to_owned()),
                description: Some("court".to_owned()),
                category: None,
                priority: None,
                tags: None,
            })
            .unwrap_err();
        match err {
            AppError::Validation(message) => {
                assert!(message.starts_with("Description: "));
                assert!(message.contains("au moins 10"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_idea_keeps_values_verbatim() {
        let idea = coordinator()
            .prepare_idea(IdeaDraft {
                title: Some("Hackathon".to_owned()),
                description: Some("Organiser un hackathon interne".to_owned()),
                category: Some("Innovation".to_owned()),
                priority: None,
                tags: None,
            })
            .unwrap();
        assert_eq!(idea.title, "Hackathon");
        assert_eq!(idea.description, "Organiser un hackathon interne");
        assert_eq!(idea.category.as_deref(), Some("Innovation"));
        assert_eq!(idea.priority, None);
        assert!(idea.tags.is_empty());
        assert_eq!(idea.likes, 0);
    }

    #[test]
    fn fields_validate_in_declaration_order() {
        // Both fields are invalid; the first one wins.
        let err = coordinator()
            .validate_fields(&[
                FieldSpec::required("Titre", Some(""), 3, 100),
                FieldSpec::required("Description", Some(""), 10, 500),
            ])
            .unwrap_err();
        match err {
            AppError::Validation(message) => assert!(message.contains("au moins 3")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn absent_required_field_fails() {
        let err = coordinator()
            .validate_fields(&[FieldSpec::required("Contenu", None, 1, 500)])
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn absent_optional_field_is_skipped() {
        let cleaned = coordinator()
            .validate_fields(&[
                FieldSpec::required("Contenu", Some("Bonjour"), 1, 500),
                FieldSpec::optional("Titre", None, 1, 100),
            ])
            .unwrap();
        assert_eq!(cleaned, vec![Some("Bonjour".to_owned()), None]);
    }

    #[test]
    fn present_optional_field_is_validated() {
        let long_title = "t".repeat(101);
        let err = coordinator()
            .prepare_message(MessageDraft {
                content: Some("Un message".to_owned()),
                color: None,
                title: Some(long_title),
                category: None,
                mood: None,
                is_advanced: None,
            })
            .unwrap_err();
        match err {
            AppError::Validation(message) => {
                assert!(message.starts_with("Titre: "));
                assert!(message.contains("100"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn message_defaults_apply() {
        let message = coordinator()
            .prepare_message(MessageDraft {
                content: Some("Un message".to_owned()),
                color: None,
                title: None,
                category: None,
                mood: None,
                is_advanced: None,
            })
            .unwrap();
        assert_eq!(message.color, DEFAULT_MESSAGE_COLOR);
        assert_eq!(message.title, None);
        assert!(!message.is_advanced);
    }

    #[test]
    fn profane_message_is_rejected_with_preview() {
        let err = coordinator()
            .prepare_message(MessageDraft {
                content: Some("tout est pourri ici".to_owned()),
                color: None,
                title: None,
                category: None,
                mood: None,
                is_advanced: None,
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        // The preview operation shows what would be blocked.
        assert_eq!(
            coordinator().redact_preview("tout est pourri ici"),
            "tout est ****** ici"
        );
    }

    #[test]
    fn surprise_flag_boundary() {
        assert!(!surprise_unlocked(&"a".repeat(50)));
        assert!(surprise_unlocked(&"a".repeat(51)));
    }

    #[test]
    fn about_entry_surprise_is_computed_at_creation() {
        let entry = coordinator()
            .prepare_about(AboutDraft {
                content: Some("a".repeat(51)),
                entry_type: None,
                nickname: None,
            })
            .unwrap();
        assert!(entry.is_surprise_unlocked);
        assert_eq!(entry.entry_type, AboutEntryType::Dream);
    }

    #[test]
    fn emergency_defaults_apply() {
        let report = coordinator()
            .prepare_emergency(EmergencyDraft {
                description: Some("Un incident assez grave".to_owned()),
                name: None,
                department: None,
                urgency_level: None,
                contact_agreement: None,
            })
            .unwrap();
        assert_eq!(report.urgency_level, UrgencyLevel::Medium);
        assert!(!report.contact_agreement);
    }

    #[test]
    fn projection_never_leaks_unlisted_keys() {
        let record = json!({
            "id": "42",
            "content": "bonjour",
            "color": "bg-pastel-blue/40",
            "submitter_ip": "10.0.0.1",
            "user_agent": "curl/8.0",
            "internal_note": "should never appear",
        });
        let projected = project_allowed(&record, MESSAGE_PUBLIC_FIELDS);
        let keys: Vec<&String> = projected.as_object().unwrap().keys().collect();
        for key in &keys {
            assert!(MESSAGE_PUBLIC_FIELDS.contains(&key.as_str()));
        }
        assert_eq!(projected["id"], "42");
        assert!(projected.get("submitter_ip").is_none());
        assert!(projected.get("user_agent").is_none());
    }

    #[test]
    fn projection_of_non_object_is_empty() {
        let projected = project_allowed(&json!("not an object"), MESSAGE_PUBLIC_FIELDS);
        assert_eq!(projected, json!({}));
    }
}
