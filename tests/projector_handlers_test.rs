//! HTTP surface of the projector: routes, AJAX vs. form responses and the
//! message endpoints.

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use podium::app_state::AppState;
use podium::config::Settings;
use podium::handlers::projector_handlers::configure;

mod common;
use common::{EVENT_NAME, seeded_records};

fn app_state() -> web::Data<AppState> {
    let settings = Settings {
        event_name: EVENT_NAME.to_string(),
        seed_file: None,
        ..Settings::default()
    };
    web::Data::new(AppState::new(settings, seeded_records()))
}

const AJAX: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

#[actix_web::test]
async fn test_status_shows_default_slide_when_nothing_active() {
    let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;

    let req = test::TestRequest::get().uri("/projector").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["title"], json!(EVENT_NAME));
    assert_eq!(body["template"], json!("projector/default.html"));
    assert_eq!(body["bigger"], json!(100));
    assert_eq!(body["overlays"], json!([]));
    assert_eq!(body["active_overlay"], Value::Null);
}

#[actix_web::test]
async fn test_activate_then_status_shows_slide() {
    let state = app_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/projector/activate/motion-7")
        .insert_header(AJAX)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.projector.active_sid(), "motion-7");

    let req = test::TestRequest::get().uri("/projector").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["title"], json!("Budget"));
    assert_eq!(body["slide"]["number"], json!("A7"));
}

#[actix_web::test]
async fn test_form_post_redirects_to_control_panel() {
    let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/projector/activate/agenda")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get("Location").and_then(|v| v.to_str().ok()),
        Some("/projector/control")
    );
}

#[actix_web::test]
async fn test_edit_known_and_unknown_direction() {
    let state = app_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/projector/edit/bigger")
        .insert_header(AJAX)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/projector/edit/sideways")
        .insert_header(AJAX)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/projector").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["bigger"], json!(110));
}

#[actix_web::test]
async fn test_countdown_show_reports_visibility() {
    let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/projector/countdown/show")
        .insert_header(AJAX)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "countdown_visible": true }));

    let req = test::TestRequest::post()
        .uri("/projector/countdown/rewind")
        .insert_header(AJAX)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_message_endpoints() {
    let state = app_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/projector/message")
        .set_json(json!({ "message": "Lunch at noon", "sid": "motion-7" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "message": "Lunch at noon", "sid": "motion-7" }));

    state.projector.set_active_sid("motion-7");
    let req = test::TestRequest::get().uri("/projector").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["active_overlay"], json!("Message"));
    assert_eq!(body["overlays"][0]["payload"], json!({ "message": "Lunch at noon" }));

    let req = test::TestRequest::delete().uri("/projector/message").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/projector").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["overlays"], json!([]));
}

#[actix_web::test]
async fn test_empty_message_is_rejected() {
    let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/projector/message")
        .set_json(json!({ "message": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_control_form_toggles_overlays() {
    let state = app_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/projector/control")
        .set_form([("Countdown", "on")])
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let overlays = body["overlays"].as_array().expect("overlay list");
    let active: Vec<&str> = overlays
        .iter()
        .filter(|o| o["active"] == json!(true))
        .filter_map(|o| o["name"].as_str())
        .collect();
    assert_eq!(active, vec!["Countdown"]);

    let categories: Vec<&str> = body["categories"]
        .as_array()
        .expect("categories")
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(categories, vec!["agenda", "motion"]);
}

#[actix_web::test]
async fn test_control_form_sets_global_message() {
    let state = app_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let form = serde_urlencoded::to_string([("message", "1"), ("message_text", "Welcome")])
        .expect("encode form");
    let req = test::TestRequest::post()
        .uri("/projector/control")
        .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
        .set_payload(form)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    state.projector.set_active_sid("agenda");
    let rendered = state.projector.overlays().active_overlays_for("agenda");
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].payload, json!({ "message": "Welcome" }));
}

#[actix_web::test]
async fn test_control_form_rejects_blank_message() {
    let state = app_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    for text in ["", "  "] {
        let req = test::TestRequest::post()
            .uri("/projector/control")
            .set_form([("message", "1"), ("message_text", text)])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{text:?}");
    }
    assert!(state.projector.overlays().get("Message").is_none());
}
