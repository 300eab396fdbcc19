use super::response::{
    success_data, success_message, success_message_data, HandlerResult, Payload,
};
use super::state::{GuardedSongsService, ServerState};
use crate::songs::SongFilter;
use crate::validation::validate_song_payload;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize, Debug, Default)]
struct SongsQuery {
    title: Option<String>,
    performer: Option<String>,
}

impl From<SongsQuery> for SongFilter {
    fn from(query: SongsQuery) -> Self {
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());
        SongFilter {
            title: non_empty(query.title),
            performer: non_empty(query.performer),
        }
    }
}

async fn post_song(
    State(songs): State<GuardedSongsService>,
    Payload(body): Payload,
) -> HandlerResult {
    let payload = validate_song_payload(body)?;
    let song_id = songs.add_song(&payload)?;
    Ok(success_message_data(
        StatusCode::CREATED,
        "Lagu berhasil ditambahkan",
        json!({ "songId": song_id }),
    ))
}

async fn get_songs(
    State(songs): State<GuardedSongsService>,
    Query(query): Query<SongsQuery>,
) -> HandlerResult {
    let songs = songs.get_songs(&query.into())?;
    Ok(success_data(StatusCode::OK, json!({ "songs": songs })))
}

async fn get_song(
    State(songs): State<GuardedSongsService>,
    Path(id): Path<String>,
) -> HandlerResult {
    let song = songs.get_song(&id)?;
    Ok(success_data(StatusCode::OK, json!({ "song": song })))
}

async fn put_song(
    State(songs): State<GuardedSongsService>,
    Path(id): Path<String>,
    Payload(body): Payload,
) -> HandlerResult {
    let payload = validate_song_payload(body)?;
    songs.edit_song(&id, &payload)?;
    Ok(success_message(StatusCode::OK, "Lagu berhasil diperbarui"))
}

async fn delete_song(
    State(songs): State<GuardedSongsService>,
    Path(id): Path<String>,
) -> HandlerResult {
    songs.delete_song(&id)?;
    Ok(success_message(StatusCode::OK, "Lagu berhasil dihapus"))
}

pub(super) fn make_song_routes() -> Router<ServerState> {
    Router::new()
        .route("/songs", get(get_songs).post(post_song))
        .route("/songs/{id}", get(get_song).put(put_song).delete(delete_song))
}
