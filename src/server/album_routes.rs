use super::response::{
    success_data, success_message, success_message_data, HandlerResult, Payload,
};
use super::session::Session;
use super::state::{GuardedAlbumsService, ServerState};
use super::ServerConfig;
use crate::errors::ServiceError;
use crate::validation::{validate_album_payload, validate_image_content_type};
use anyhow::Context;
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::{HeaderValue, StatusCode},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::info;

pub const COVER_FIELD: &str = "cover";
pub const DATA_SOURCE_HEADER: &str = "x-data-source";

/// Room for multipart boundaries and part headers on top of the cover itself.
const MULTIPART_OVERHEAD_BYTES: usize = 16 * 1024;

async fn post_album(
    State(albums): State<GuardedAlbumsService>,
    Payload(body): Payload,
) -> HandlerResult {
    let payload = validate_album_payload(body)?;
    let album_id = albums.add_album(&payload)?;
    Ok(success_message_data(
        StatusCode::CREATED,
        "Album berhasil ditambahkan",
        json!({ "albumId": album_id }),
    ))
}

async fn get_album(
    State(albums): State<GuardedAlbumsService>,
    Path(id): Path<String>,
) -> HandlerResult {
    let album = albums.get_album(&id)?;
    Ok(success_data(StatusCode::OK, json!({ "album": album })))
}

async fn put_album(
    State(albums): State<GuardedAlbumsService>,
    Path(id): Path<String>,
    Payload(body): Payload,
) -> HandlerResult {
    let payload = validate_album_payload(body)?;
    albums.edit_album(&id, &payload)?;
    Ok(success_message(StatusCode::OK, "Album berhasil diperbarui"))
}

async fn delete_album(
    State(albums): State<GuardedAlbumsService>,
    Path(id): Path<String>,
) -> HandlerResult {
    albums.delete_album(&id)?;
    Ok(success_message(StatusCode::OK, "Album berhasil dihapus"))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ServiceError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServiceError::PayloadTooLarge("Ukuran sampul melebihi batas".to_string())
    } else {
        ServiceError::invariant(err.body_text())
    }
}

async fn post_album_cover(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> HandlerResult {
    let mut multipart =
        multipart.map_err(|rejection| ServiceError::invariant(rejection.body_text()))?;

    let mut cover = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(COVER_FIELD) {
            continue;
        }
        validate_image_content_type(field.content_type())?;
        let file_name = field.file_name().unwrap_or(COVER_FIELD).to_string();
        let data = field.bytes().await.map_err(multipart_error)?;
        cover = Some((file_name, data));
        break;
    }
    let (file_name, data) =
        cover.ok_or_else(|| ServiceError::invariant(format!("\"{}\" is required", COVER_FIELD)))?;

    if data.len() > state.config.max_cover_bytes {
        return Err(ServiceError::PayloadTooLarge(
            "Ukuran sampul melebihi batas".to_string(),
        ));
    }
    if !infer::is_image(&data) {
        return Err(ServiceError::invariant("Berkas sampul bukan gambar"));
    }

    state.albums.verify_album_exists(&id)?;
    let cover_url = state
        .storage
        .write_file(&file_name, &data)
        .context("Failed to store album cover")?;
    state.albums.set_album_cover(&id, &cover_url)?;
    info!("Stored cover for album {} at {}", id, cover_url);

    Ok(success_message(StatusCode::CREATED, "Sampul berhasil diunggah"))
}

async fn post_album_like(
    session: Session,
    State(albums): State<GuardedAlbumsService>,
    Path(id): Path<String>,
) -> HandlerResult {
    let liked = albums.toggle_like(&session.user_id, &id)?;
    let message = if liked {
        "Album berhasil disukai"
    } else {
        "Batal menyukai album berhasil"
    };
    Ok(success_message_data(
        StatusCode::CREATED,
        message,
        json!({ "liked": liked }),
    ))
}

async fn get_album_likes(
    _session: Session,
    State(albums): State<GuardedAlbumsService>,
    Path(id): Path<String>,
) -> HandlerResult {
    let count = albums.get_like_count(&id)?;
    let mut response = success_data(StatusCode::OK, json!({ "likes": count.likes }));
    if count.from_cache {
        response
            .headers_mut()
            .insert(DATA_SOURCE_HEADER, HeaderValue::from_static("cache"));
    }
    Ok(response)
}

pub(super) fn make_album_routes(config: &ServerConfig) -> Router<ServerState> {
    Router::new()
        .route("/albums", post(post_album))
        .route(
            "/albums/{id}",
            get(get_album).put(put_album).delete(delete_album),
        )
        .route(
            "/albums/{id}/covers",
            post(post_album_cover).layer(DefaultBodyLimit::max(
                config.max_cover_bytes + MULTIPART_OVERHEAD_BYTES,
            )),
        )
        .route(
            "/albums/{id}/likes",
            post(post_album_like).get(get_album_likes),
        )
}
