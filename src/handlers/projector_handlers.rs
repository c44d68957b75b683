use std::collections::{HashMap, HashSet};

use actix_web::{HttpRequest, HttpResponse, web};
use chrono::{Local, Utc};
use serde::Deserialize;

use crate::app_state::AppState;
use crate::errors::AppError;
use crate::projector::{CountdownCommand, ProjectorEdit};

const CONTROL_URL: &str = "/projector/control";

fn is_ajax(req: &HttpRequest) -> bool {
    req.headers()
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
}

/// AJAX callers get `body` as JSON, form posts are sent back to the control panel.
fn respond(req: &HttpRequest, body: serde_json::Value) -> HttpResponse {
    if is_ajax(req) {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::SeeOther()
            .insert_header(("Location", CONTROL_URL))
            .finish()
    }
}

/// A message to show must have visible text. Clearing goes through DELETE.
fn validated_message(text: &str) -> Result<&str, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::BadRequest("Message must not be empty".to_string()));
    }
    Ok(text)
}

/// GET /projector
/// Current screen state for polling viewers.
pub async fn status(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let status = state.projector.status(Local::now());
    Ok(HttpResponse::Ok().json(status))
}

/// GET /projector/control
pub async fn control(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let panel = state.projector.control_panel(&state.settings.categories);
    Ok(HttpResponse::Ok().json(panel))
}

/// POST /projector/control
/// Either sets the message (`message` + non-blank `message_text`) or applies the
/// overlay checkboxes: every overlay named in the form is switched on, the
/// rest off.
pub async fn control_submit(
    state: web::Data<AppState>,
    form: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let projector = &state.projector;
    if form.contains_key("message") {
        let text = form.get("message_text").map(|s| s.as_str()).unwrap_or("");
        projector.set_message(validated_message(text)?, None);
    } else {
        let checked: HashSet<String> = form.keys().cloned().collect();
        projector.overlays().apply_toggles(&checked);
    }

    let panel = projector.control_panel(&state.settings.categories);
    Ok(HttpResponse::Ok().json(panel))
}

/// POST /projector/activate/{sid}
pub async fn activate(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let sid = path.into_inner();
    state.projector.set_active_sid(&sid);
    Ok(respond(&req, serde_json::json!({})))
}

/// POST /projector/edit/{direction}
/// One of bigger, smaller, up, down, clean.
pub async fn edit(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let edit: ProjectorEdit = path.parse().map_err(|_| AppError::NotFound)?;
    state.projector.edit(edit);
    Ok(respond(&req, serde_json::json!({})))
}

/// POST /projector/countdown/{command}
/// One of show, hide, reset, start, stop.
pub async fn countdown(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let command: CountdownCommand = path.parse().map_err(|_| AppError::NotFound)?;
    let now = Utc::now().timestamp_millis() as f64 / 1000.0;
    state.projector.countdown(command, now);
    Ok(respond(
        &req,
        serde_json::json!({ "countdown_visible": state.projector.countdown_visible() }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
    #[serde(default)]
    pub sid: Option<String>,
}

/// POST /projector/message
pub async fn message_set(
    state: web::Data<AppState>,
    body: web::Json<MessageRequest>,
) -> Result<HttpResponse, AppError> {
    let message = validated_message(&body.message)?;
    let sid = body.sid.as_deref().filter(|s| !s.is_empty());
    state.projector.set_message(message, sid);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": body.message,
        "sid": sid,
    })))
}

/// DELETE /projector/message
pub async fn message_delete(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.projector.delete_message();
    Ok(HttpResponse::NoContent().finish())
}

/// Configure projector routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projector")
            .route("", web::get().to(status))
            .route("/control", web::get().to(control))
            .route("/control", web::post().to(control_submit))
            .route("/activate/{sid}", web::post().to(activate))
            .route("/edit/{direction}", web::post().to(edit))
            .route("/countdown/{command}", web::post().to(countdown))
            .route("/message", web::post().to(message_set))
            .route("/message", web::delete().to(message_delete)),
    );
}
