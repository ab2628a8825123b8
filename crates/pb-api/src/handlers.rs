//! # pb-api Handlers
//!
//! This module coordinates the flow between HTTP requests and Core traits:
//! deserialize, run the submission pipeline, call the persistence port,
//! shape the JSON response. Validation always completes before any write.

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use pb_core::error::AppError;
use pb_core::models::{Comment, EmergencyReport, Idea, Message};
use pb_core::submission::{
    project_allowed, AboutDraft, CommentDraft, EmergencyDraft, IdeaDraft, MessageDraft,
    SubmissionCoordinator, MESSAGE_PUBLIC_FIELDS,
};
use pb_core::traits::{AdminGate, SubmissionRepo};
use serde_json::json;
use uuid::Uuid;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub repo: Box<dyn SubmissionRepo>,
    pub gate: Box<dyn AdminGate>,
    pub coordinator: SubmissionCoordinator,
}

/// Maps domain errors to HTTP responses. Validation messages travel to the
/// user verbatim; infrastructure causes are logged and replaced with a
/// generic message.
fn error_response(err: AppError) -> HttpResponse {
    match err {
        AppError::Validation(message) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        AppError::NotFound(kind, id) => {
            log::debug!("{kind} {id} not found");
            let message = match kind.as_str() {
                "Idea" => "Idée non trouvée",
                "Message" => "Message non trouvé",
                _ => "Ressource non trouvée",
            };
            HttpResponse::NotFound().json(json!({ "error": message }))
        }
        AppError::Unauthorized(reason) => {
            log::debug!("unauthorized request: {reason}");
            HttpResponse::Unauthorized().json(json!({ "error": "Non autorisé" }))
        }
        AppError::Internal(cause) => {
            log::error!("internal error: {cause:#}");
            HttpResponse::InternalServerError()
                .json(json!({ "error": "Une erreur est survenue. Veuillez réessayer." }))
        }
    }
}

/// Checks the `Authorization: Bearer` header against the admin gate.
async fn require_admin(req: &HttpRequest, gate: &dyn AdminGate) -> Result<(), AppError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match token {
        None => Err(AppError::Unauthorized("missing bearer token".to_owned())),
        Some(token) if gate.verify_admin_token(token).await => Ok(()),
        Some(_) => Err(AppError::Unauthorized("admin token rejected".to_owned())),
    }
}

/// Caller identity for like-state purposes; real identity verification is
/// the external auth collaborator's job.
fn caller_user_id(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("X-User-Id")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map(str::to_owned)
}

fn comment_json(comment: &Comment) -> serde_json::Value {
    json!({
        "id": comment.id.to_string(),
        "content": comment.content,
        "author": comment.author,
        "createdAt": comment.created_at,
    })
}

fn idea_json(idea: &Idea, comments: &[Comment], has_liked: bool) -> serde_json::Value {
    json!({
        "id": idea.id.to_string(),
        "title": idea.title,
        "description": idea.description,
        "likes": idea.likes,
        "hasLiked": has_liked,
        "category": idea.category,
        "priority": idea.priority,
        "tags": idea.tags,
        "comments": comments.iter().map(comment_json).collect::<Vec<_>>(),
        "commentsCount": comments.len(),
        "createdAt": idea.created_at,
    })
}

/// Wall messages leave the server through the public allow-list only.
fn message_json(message: &Message) -> serde_json::Value {
    let full = json!({
        "id": message.id.to_string(),
        "content": message.content,
        "color": message.color,
        "title": message.title,
        "category": message.category,
        "mood": message.mood,
        "isAdvanced": message.is_advanced,
        "createdAt": message.created_at,
    });
    project_allowed(&full, MESSAGE_PUBLIC_FIELDS)
}

fn emergency_json(report: &EmergencyReport) -> serde_json::Value {
    json!({
        "id": report.id.to_string(),
        "description": report.description,
        "name": report.name,
        "department": report.department,
        "urgencyLevel": report.urgency_level,
        "contactAgreement": report.contact_agreement,
        "createdAt": report.created_at,
    })
}

// ── Ideas ────────────────────────────────────────────────────────────────

pub async fn list_ideas(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let user_id = caller_user_id(&req);

    let ideas = match data.repo.list_ideas().await {
        Ok(ideas) => ideas,
        Err(err) => return error_response(err),
    };

    let mut body = Vec::with_capacity(ideas.len());
    for (idea, comments) in &ideas {
        let has_liked = match &user_id {
            Some(user_id) => match data.repo.has_liked(idea.id, user_id).await {
                Ok(liked) => liked,
                Err(err) => return error_response(err),
            },
            None => false,
        };
        body.push(idea_json(idea, comments, has_liked));
    }

    HttpResponse::Ok().json(body)
}

pub async fn create_idea(
    data: web::Data<AppState>,
    draft: web::Json<IdeaDraft>,
) -> impl Responder {
    let idea = match data.coordinator.prepare_idea(draft.into_inner()) {
        Ok(idea) => idea,
        Err(err) => return error_response(err),
    };

    let body = idea_json(&idea, &[], false);
    match data.repo.create_idea(idea).await {
        Ok(()) => HttpResponse::Ok().json(body),
        Err(err) => error_response(err),
    }
}

pub async fn toggle_like(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> impl Responder {
    let Some(user_id) = caller_user_id(&req) else {
        return error_response(AppError::Validation(
            "Identifiant utilisateur requis".to_owned(),
        ));
    };

    match data.repo.toggle_like(path.into_inner(), &user_id).await {
        Ok(outcome) => HttpResponse::Ok().json(json!({
            "likes": outcome.likes,
            "hasLiked": outcome.has_liked,
        })),
        Err(err) => error_response(err),
    }
}

pub async fn add_comment(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    draft: web::Json<CommentDraft>,
) -> impl Responder {
    let comment = match data
        .coordinator
        .prepare_comment(path.into_inner(), draft.into_inner())
    {
        Ok(comment) => comment,
        Err(err) => return error_response(err),
    };

    let body = comment_json(&comment);
    match data.repo.create_comment(comment).await {
        Ok(()) => HttpResponse::Ok().json(body),
        Err(err) => error_response(err),
    }
}

pub async fn delete_idea(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> impl Responder {
    if let Err(denied) = require_admin(&req, data.gate.as_ref()).await {
        return error_response(denied);
    }

    match data.repo.delete_idea(path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "success": true })),
        Err(err) => error_response(err),
    }
}

// ── Message wall ──────────────────────────────────────────────────────────

pub async fn list_messages(data: web::Data<AppState>) -> impl Responder {
    match data.repo.list_messages().await {
        Ok(messages) => {
            let body: Vec<_> = messages.iter().map(message_json).collect();
            HttpResponse::Ok().json(body)
        }
        Err(err) => error_response(err),
    }
}

pub async fn create_message(
    data: web::Data<AppState>,
    draft: web::Json<MessageDraft>,
) -> impl Responder {
    let message = match data.coordinator.prepare_message(draft.into_inner()) {
        Ok(message) => message,
        Err(err) => return error_response(err),
    };

    let body = message_json(&message);
    match data.repo.create_message(message).await {
        Ok(()) => HttpResponse::Ok().json(body),
        Err(err) => error_response(err),
    }
}

pub async fn delete_message(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> impl Responder {
    if let Err(denied) = require_admin(&req, data.gate.as_ref()).await {
        return error_response(denied);
    }

    match data.repo.delete_message(path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "success": true })),
        Err(err) => error_response(err),
    }
}

// ── Emergencies ───────────────────────────────────────────────────────────

pub async fn create_emergency(
    data: web::Data<AppState>,
    draft: web::Json<EmergencyDraft>,
) -> impl Responder {
    let report = match data.coordinator.prepare_emergency(draft.into_inner()) {
        Ok(report) => report,
        Err(err) => return error_response(err),
    };

    let body = emergency_json(&report);
    match data.repo.create_emergency(report).await {
        Ok(()) => HttpResponse::Ok().json(body),
        Err(err) => error_response(err),
    }
}

pub async fn list_emergencies(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Err(denied) = require_admin(&req, data.gate.as_ref()).await {
        return error_response(denied);
    }

    match data.repo.list_emergencies().await {
        Ok(reports) => {
            let body: Vec<_> = reports.iter().map(emergency_json).collect();
            HttpResponse::Ok().json(body)
        }
        Err(err) => error_response(err),
    }
}

// ── About you ─────────────────────────────────────────────────────────────

pub async fn list_about_entries(data: web::Data<AppState>) -> impl Responder {
    match data.repo.list_about_entries().await {
        Ok(entries) => {
            let body: Vec<_> = entries
                .iter()
                .map(|entry| {
                    json!({
                        "id": entry.id.to_string(),
                        "content": entry.content,
                        "type": entry.entry_type,
                        "nickname": entry.nickname,
                        "isSurpriseUnlocked": entry.is_surprise_unlocked,
                        "createdAt": entry.created_at,
                    })
                })
                .collect();
            HttpResponse::Ok().json(body)
        }
        Err(err) => error_response(err),
    }
}

pub async fn create_about_entry(
    data: web::Data<AppState>,
    draft: web::Json<AboutDraft>,
) -> impl Responder {
    let entry = match data.coordinator.prepare_about(draft.into_inner()) {
        Ok(entry) => entry,
        Err(err) => return error_response(err),
    };

    let body = json!({
        "id": entry.id.to_string(),
        "content": entry.content,
        "type": entry.entry_type,
        "nickname": entry.nickname,
        "isSurpriseUnlocked": entry.is_surprise_unlocked,
        "createdAt": entry.created_at,
    });
    match data.repo.create_about_entry(entry).await {
        Ok(()) => HttpResponse::Ok().json(body),
        Err(err) => error_response(err),
    }
}

// ── Moderation preview ────────────────────────────────────────────────────

#[derive(serde::Deserialize)]
pub struct PreviewRequest {
    pub text: String,
}

/// Masking-only: shows the caller what would be blocked, judges nothing.
pub async fn moderation_preview(
    data: web::Data<AppState>,
    body: web::Json<PreviewRequest>,
) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "preview": data.coordinator.redact_preview(&body.text),
    }))
}
