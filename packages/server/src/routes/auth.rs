//! Registration, login, logout.

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::auth::{clear_cookie, hash_password, session_cookie, session_token, verify_password};
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> AppResult<Response> {
    let email = body.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("Nieprawidłowy adres e-mail".into()));
    }
    if body.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Hasło musi mieć co najmniej 8 znaków".into(),
        ));
    }

    let existing: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::BadRequest("Konto już istnieje".into()));
    }

    let hash = hash_password(&body.password);
    let result = sqlx::query("INSERT INTO users (email, password_hash) VALUES (?, ?)")
        .bind(&email)
        .bind(&hash)
        .execute(&state.pool)
        .await?;
    let user_id = result.last_insert_rowid();
    info!(user_id, "account created");

    let token = state.sessions.create(user_id).await;
    Ok((
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(json!({ "id": user_id, "email": email })),
    )
        .into_response())
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> AppResult<Response> {
    let email = body.email.trim().to_lowercase();

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.pool)
        .await?;

    let Some(user) = user else {
        return Err(AppError::Unauthorized);
    };
    if !verify_password(&body.password, &user.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let token = state.sessions.create(user.id).await;
    Ok((
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(json!({ "id": user.id, "email": user.email })),
    )
        .into_response())
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.sessions.delete(&token).await;
    }
    (
        [(header::SET_COOKIE, clear_cookie())],
        Json(json!({ "status": "wylogowano" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::app::build_app;
    use crate::db::test_pool;
    use crate::state::AppState;

    async fn test_state() -> AppState {
        AppState::new(test_pool().await)
    }

    fn json_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn register_sets_a_session_cookie() {
        let app = build_app(test_state().await);
        let response = app
            .oneshot(json_request(
                "/register",
                r#"{"email":"a@example.com","password":"longenough"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("session="));
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let state = test_state().await;
        let app = build_app(state.clone());

        let first = app
            .clone()
            .oneshot(json_request(
                "/register",
                r#"{"email":"a@example.com","password":"longenough"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(json_request(
                "/register",
                r#"{"email":"a@example.com","password":"longenough"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let app = build_app(test_state().await);
        let response = app
            .oneshot(json_request(
                "/register",
                r#"{"email":"a@example.com","password":"short"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let state = test_state().await;
        let app = build_app(state.clone());

        app.clone()
            .oneshot(json_request(
                "/register",
                r#"{"email":"a@example.com","password":"longenough"}"#,
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "/login",
                r#"{"email":"a@example.com","password":"wrongwrong"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
