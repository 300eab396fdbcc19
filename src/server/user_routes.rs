use super::response::{
    success_data, success_message, success_message_data, HandlerResult, Payload,
};
use super::state::{GuardedAuthenticationsService, GuardedUsersService, ServerState};
use crate::validation::{
    validate_login_payload, validate_refresh_token_payload, validate_user_payload,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::info;

async fn post_user(
    State(users): State<GuardedUsersService>,
    Payload(body): Payload,
) -> HandlerResult {
    let payload = validate_user_payload(body)?;
    let user_id = users.add_user(&payload)?;
    info!("Registered user {} as {}", payload.username, user_id);
    Ok(success_message_data(
        StatusCode::CREATED,
        "User berhasil ditambahkan",
        json!({ "userId": user_id }),
    ))
}

async fn get_user(
    State(users): State<GuardedUsersService>,
    Path(id): Path<String>,
) -> HandlerResult {
    let user = users.get_user(&id)?;
    Ok(success_data(StatusCode::OK, json!({ "user": user })))
}

async fn login(
    State(authentications): State<GuardedAuthenticationsService>,
    Payload(body): Payload,
) -> HandlerResult {
    let payload = validate_login_payload(body)?;
    let tokens = authentications.login(&payload.username, &payload.password)?;
    Ok(success_message_data(
        StatusCode::CREATED,
        "Authentication berhasil ditambahkan",
        json!(tokens),
    ))
}

async fn refresh(
    State(authentications): State<GuardedAuthenticationsService>,
    Payload(body): Payload,
) -> HandlerResult {
    let payload = validate_refresh_token_payload(body)?;
    let access_token = authentications.refresh(&payload.refresh_token)?;
    Ok(success_message_data(
        StatusCode::OK,
        "Access Token berhasil diperbarui",
        json!({ "accessToken": access_token }),
    ))
}

async fn logout(
    State(authentications): State<GuardedAuthenticationsService>,
    Payload(body): Payload,
) -> HandlerResult {
    let payload = validate_refresh_token_payload(body)?;
    authentications.logout(&payload.refresh_token)?;
    Ok(success_message(
        StatusCode::OK,
        "Refresh token berhasil dihapus",
    ))
}

pub(super) fn make_user_routes() -> Router<ServerState> {
    Router::new()
        .route("/users", post(post_user))
        .route("/users/{id}", get(get_user))
        .route(
            "/authentications",
            post(login).put(refresh).delete(logout),
        )
}
