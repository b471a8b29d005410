//! HTTP-level integration tests for the onboarding endpoints.
//!
//! Covers the status probe, the checklist, the UI step list, form response
//! submission, the admin ordering preview, and the degraded modes.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::Router;
use common::{
    body_json, build_test_app, build_test_app_with, build_test_app_without_service_role, get,
    get_as_user_header, get_auth, post_json_auth, test_config, token_for,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use agapefy_db::models::form::CreateForm;
use agapefy_db::repositories::{FormRepo, FormResponseRepo, SettingRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const FIXED_ACTIVE_KEYS: [&str; 5] = [
    "onboarding_static_preview_active",
    "onboarding_static_whatsapp_active",
    "onboarding_hardcoded_6_active",
    "onboarding_hardcoded_7_active",
    "onboarding_hardcoded_8_active",
];

async fn create_form(pool: &PgPool, name: &str, onboard_step: Option<i32>, active: bool) -> i64 {
    let input = CreateForm {
        name: name.to_string(),
        description: Some(format!("{name} description")),
        schema: json!([{ "label": "Esperança", "category_id": 2 }]),
        onboard_step,
        is_active: Some(active),
        parent_form_id: None,
    };
    FormRepo::create(pool, &input)
        .await
        .expect("form creation should succeed")
        .id
}

async fn deactivate_fixed_steps(pool: &PgPool) {
    for key in FIXED_ACTIVE_KEYS {
        SettingRepo::upsert(pool, key, "false").await.unwrap();
    }
}

async fn connect_whatsapp(pool: &PgPool, user_id: Option<Uuid>, phone: &str) {
    sqlx::query("INSERT INTO whatsapp_users (user_id, phone_number) VALUES ($1, $2)")
        .bind(user_id)
        .bind(phone)
        .execute(pool)
        .await
        .unwrap();
}

async fn create_routine_playlist(pool: &PgPool, user_id: Uuid) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO playlists (title, created_by) VALUES ('Minha Rotina', $1) RETURNING id",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn status_json(app: Router, user_id: &str) -> serde_json::Value {
    body_json(get_as_user_header(app, "/api/onboarding/status", user_id).await).await
}

async fn checklist_json(app: Router, user_id: Uuid) -> serde_json::Value {
    let token = token_for(user_id, "authenticated");
    body_json(get_auth(app, "/api/onboarding/checklist", &token).await).await
}

fn completed_flags(checklist: &serde_json::Value) -> Vec<bool> {
    checklist["steps"]
        .as_array()
        .expect("steps should be an array")
        .iter()
        .map(|s| s["completed"].as_bool().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// GET /api/onboarding/status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn status_requires_user_id_header(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let response = get(app, "/api/onboarding/status").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = build_test_app(pool);
    let response = get_as_user_header(app, "/api/onboarding/status", "not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn status_without_forms_is_not_pending(pool: PgPool) {
    let app = build_test_app(pool);
    let user = Uuid::new_v4().to_string();

    let response = get_as_user_header(app, "/api/onboarding/status", &user).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["pending"], false);
    assert_eq!(json["steps"], json!([]));
    assert!(json["nextStep"].is_null());
    assert!(json.get("error").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn status_with_only_inactive_root_form_is_not_pending(pool: PgPool) {
    create_form(&pool, "Raiz", Some(1), false).await;
    let user = Uuid::new_v4();

    let json = status_json(build_test_app(pool.clone()), &user.to_string()).await;
    assert_eq!(json["pending"], false);
    assert_eq!(json["steps"], json!([]));
    assert!(json["nextStep"].is_null());

    let json = checklist_json(build_test_app(pool), user).await;
    assert_eq!(json["hasPending"], false);
    assert_eq!(json["steps"], json!([]));
    assert!(json["nextStep"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn status_new_user_lists_every_active_step(pool: PgPool) {
    create_form(&pool, "Raiz", Some(1), true).await;
    let user = Uuid::new_v4().to_string();

    let json = status_json(build_test_app(pool), &user).await;
    assert_eq!(json["pending"], true);
    assert_eq!(json["steps"], json!([1, 2, 3, 4, 5, 6]));
    assert_eq!(json["nextStep"], 1);
    assert!(json.get("error").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn status_without_service_role_is_degraded_pending(pool: PgPool) {
    let app = build_test_app_without_service_role(pool);
    let user = Uuid::new_v4().to_string();

    let response = get_as_user_header(app, "/api/onboarding/status", &user).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["pending"], true);
    assert_eq!(json["steps"], json!([1]));
    assert_eq!(json["nextStep"], 1);
    assert_eq!(json["error"], "missing_service_role");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn status_with_nothing_active_is_not_pending(pool: PgPool) {
    deactivate_fixed_steps(&pool).await;
    create_form(&pool, "Rascunho", Some(1), false).await;

    let user = Uuid::new_v4().to_string();
    let json = status_json(build_test_app(pool), &user).await;

    assert_eq!(json["pending"], false);
    assert_eq!(json["steps"], json!([]));
    assert!(json["nextStep"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn status_on_database_error_is_degraded_pending(pool: PgPool) {
    sqlx::query("DROP TABLE app_settings")
        .execute(&pool)
        .await
        .unwrap();

    let app = build_test_app(pool);
    let user = Uuid::new_v4().to_string();
    let response = get_as_user_header(app, "/api/onboarding/status", &user).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["pending"], true);
    assert_eq!(json["nextStep"], 1);
    assert_eq!(json["error"], "database_error");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn status_is_stable_across_calls(pool: PgPool) {
    create_form(&pool, "Raiz", Some(1), true).await;
    create_form(&pool, "Sentimentos", Some(2), true).await;
    let user = Uuid::new_v4().to_string();

    let first = status_json(build_test_app(pool.clone()), &user).await;
    let second = status_json(build_test_app(pool), &user).await;

    assert_eq!(first, second);
    assert_eq!(first["steps"], json!([1, 2, 3, 4, 5, 6, 7]));
}

// ---------------------------------------------------------------------------
// GET /api/onboarding/checklist
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn checklist_requires_bearer_token(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let response = get(app, "/api/onboarding/checklist").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = build_test_app(pool);
    let response = get_auth(app, "/api/onboarding/checklist", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn checklist_new_user_starts_at_root_form(pool: PgPool) {
    create_form(&pool, "Como você está?", Some(1), true).await;
    let token = token_for(Uuid::new_v4(), "authenticated");

    let app = build_test_app(pool);
    let response = get_auth(app, "/api/onboarding/checklist", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["hasPending"], true);
    assert_eq!(json["nextStep"], 1);
    assert_eq!(json["steps"][0]["stepNumber"], 1);
    assert_eq!(json["steps"][0]["label"], "Como você está?");
    assert!(completed_flags(&json).iter().all(|c| !c));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn checklist_reports_empty_routine_as_next_step(pool: PgPool) {
    let root = create_form(&pool, "Raiz", Some(1), true).await;
    let user = Uuid::new_v4();
    FormResponseRepo::upsert(&pool, root, user, &json!({ "mood": "grato" }))
        .await
        .unwrap();
    connect_whatsapp(&pool, Some(user), "5511988887777").await;
    create_routine_playlist(&pool, user).await;

    let json = checklist_json(build_test_app(pool), user).await;

    // root, preview, whatsapp, routine, whatsapp-final, daily-verse
    assert_eq!(
        completed_flags(&json),
        vec![true, true, true, false, true, false]
    );
    assert_eq!(json["nextStep"], 4);
    assert_eq!(json["hasPending"], true);
    assert_eq!(json["steps"][3]["label"], "Sua rotina está pronta");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn checklist_complete_when_everything_is_done(pool: PgPool) {
    let root = create_form(&pool, "Raiz", Some(1), true).await;
    let user = Uuid::new_v4();
    FormResponseRepo::upsert(&pool, root, user, &json!({}))
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO whatsapp_users (user_id, phone_number, receives_daily_verse) \
         VALUES ($1, '5511911112222', FALSE)",
    )
    .bind(user)
    .execute(&pool)
    .await
    .unwrap();
    let playlist = create_routine_playlist(&pool, user).await;
    let audio: i64 =
        sqlx::query_scalar("INSERT INTO audios (title) VALUES ('Pai Nosso') RETURNING id")
            .fetch_one(&pool)
            .await
            .unwrap();
    sqlx::query("INSERT INTO playlist_audios (playlist_id, audio_id) VALUES ($1, $2)")
        .bind(playlist)
        .bind(audio)
        .execute(&pool)
        .await
        .unwrap();

    let json = checklist_json(build_test_app(pool), user).await;

    assert_eq!(json["hasPending"], false);
    assert!(json["nextStep"].is_null());
    assert_eq!(json["steps"].as_array().unwrap().len(), 6);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn checklist_ignores_inactive_steps(pool: PgPool) {
    let root = create_form(&pool, "Raiz", Some(1), true).await;
    create_form(&pool, "Desativado", Some(4), false).await;
    deactivate_fixed_steps(&pool).await;
    let user = Uuid::new_v4();
    FormResponseRepo::upsert(&pool, root, user, &json!({}))
        .await
        .unwrap();

    let json = checklist_json(build_test_app(pool), user).await;

    assert_eq!(json["steps"].as_array().unwrap().len(), 1);
    assert_eq!(json["hasPending"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn checklist_without_service_role_is_degraded(pool: PgPool) {
    let app = build_test_app_without_service_role(pool);
    let json = checklist_json(app, Uuid::new_v4()).await;

    assert_eq!(json["error"], "missing_service_role");
    assert_eq!(json["hasPending"], true);
    assert_eq!(json["nextStep"], 1);
    assert_eq!(json["steps"], json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn legacy_whatsapp_rows_are_adopted_only_when_enabled(pool: PgPool) {
    let root = create_form(&pool, "Raiz", Some(1), true).await;
    deactivate_fixed_steps(&pool).await;
    SettingRepo::upsert(&pool, "onboarding_static_whatsapp_active", "true")
        .await
        .unwrap();
    connect_whatsapp(&pool, None, "5511900001111").await;
    let user = Uuid::new_v4();
    FormResponseRepo::upsert(&pool, root, user, &json!({}))
        .await
        .unwrap();

    let json = checklist_json(build_test_app(pool.clone()), user).await;
    assert_eq!(completed_flags(&json), vec![true, false]);
    assert_eq!(json["nextStep"], 2);

    let mut config = test_config();
    config.whatsapp_legacy_fallback = true;
    let lenient = build_test_app_with(pool.clone(), Some(pool), config);
    let json = checklist_json(lenient, user).await;
    assert_eq!(completed_flags(&json), vec![true, true]);
    assert_eq!(json["hasPending"], false);
}

// ---------------------------------------------------------------------------
// GET /api/onboarding/steps
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn steps_lists_active_steps_with_display_numbers(pool: PgPool) {
    let root = create_form(&pool, "Raiz", Some(1), true).await;
    let second = create_form(&pool, "Pedidos", Some(2), true).await;
    create_form(&pool, "Oculto", Some(5), false).await;

    let token = token_for(Uuid::new_v4(), "authenticated");
    let response = get_auth(build_test_app(pool), "/api/onboarding/steps", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let steps = json["data"].as_array().unwrap();
    let ids: Vec<&str> = steps.iter().map(|s| s["id"].as_str().unwrap()).collect();
    assert_eq!(
        ids,
        vec![
            format!("form-{root}").as_str(),
            format!("form-{second}").as_str(),
            "static-preview",
            "static-whatsapp",
            "hardcoded-6",
            "hardcoded-7",
            "hardcoded-8",
        ]
    );
    // Form at 2 pushes preview to 3 and whatsapp to 4.
    assert_eq!(steps[2]["position"], 3);
    assert_eq!(steps[3]["position"], 4);
    assert_eq!(steps[6]["stepNumber"], 7);
    assert_eq!(steps[0]["type"], "form");
    assert_eq!(steps[0]["formId"], root);
}

// ---------------------------------------------------------------------------
// POST /api/onboarding/forms/{id}/responses
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn submitting_root_form_completes_root_and_preview(pool: PgPool) {
    let root = create_form(&pool, "Raiz", Some(1), true).await;
    let user = Uuid::new_v4();
    let token = token_for(user, "authenticated");

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/onboarding/forms/{root}/responses"),
        json!({ "answers": { "categoria": 3 } }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let saved = body_json(response).await;
    assert_eq!(saved["data"]["form_id"], root);
    assert_eq!(saved["data"]["user_id"], user.to_string());

    let json = checklist_json(build_test_app(pool), user).await;
    let flags = completed_flags(&json);
    assert_eq!(&flags[..3], &[true, true, false]);
    assert_eq!(json["nextStep"], 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn submitting_to_inactive_or_missing_form_is_404(pool: PgPool) {
    let inactive = create_form(&pool, "Antigo", Some(3), false).await;
    let token = token_for(Uuid::new_v4(), "authenticated");

    for form_id in [inactive, 999_999] {
        let response = post_json_auth(
            build_test_app(pool.clone()),
            &format!("/api/onboarding/forms/{form_id}/responses"),
            json!({ "answers": {} }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn submitting_scalar_answers_is_rejected(pool: PgPool) {
    let root = create_form(&pool, "Raiz", Some(1), true).await;
    let token = token_for(Uuid::new_v4(), "authenticated");

    let response = post_json_auth(
        build_test_app(pool),
        &format!("/api/onboarding/forms/{root}/responses"),
        json!({ "answers": "sim" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// GET /api/admin/onboarding/steps
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_steps_require_admin_role(pool: PgPool) {
    let token = token_for(Uuid::new_v4(), "authenticated");
    let response = get_auth(build_test_app(pool), "/api/admin/onboarding/steps", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_steps_include_inactive_entries(pool: PgPool) {
    create_form(&pool, "Raiz", Some(1), true).await;
    create_form(&pool, "Oculto", Some(2), false).await;
    SettingRepo::upsert(&pool, "onboarding_hardcoded_8_active", "false")
        .await
        .unwrap();

    let token = token_for(Uuid::new_v4(), "admin");
    let response = get_auth(build_test_app(pool), "/api/admin/onboarding/steps", &token).await;
    let json = body_json(response).await;

    let steps = json["data"].as_array().unwrap();
    assert_eq!(steps.len(), 7);
    let inactive: Vec<&str> = steps
        .iter()
        .filter(|s| s["isActive"] == false)
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_matches!(inactive.as_slice(), [_, "hardcoded-8"]);

    let positions: Vec<i64> = steps
        .iter()
        .map(|s| s["position"].as_i64().unwrap())
        .collect();
    assert_eq!(positions, vec![1, 2, 3, 4, 6, 7, 8]);
}
