use super::response::{
    success_data, success_message, success_message_data, HandlerResult, Payload,
};
use super::session::Session;
use super::state::{
    GuardedCollaborationsService, GuardedExportsService, GuardedPlaylistsService,
    GuardedUsersService, ServerState,
};
use crate::validation::{
    validate_collaboration_payload, validate_export_payload, validate_playlist_payload,
    validate_playlist_song_payload,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};
use serde_json::json;

async fn post_playlist(
    session: Session,
    State(playlists): State<GuardedPlaylistsService>,
    Payload(body): Payload,
) -> HandlerResult {
    let payload = validate_playlist_payload(body)?;
    let playlist_id = playlists.add_playlist(&payload.name, &session.user_id)?;
    Ok(success_message_data(
        StatusCode::CREATED,
        "Playlist berhasil ditambahkan",
        json!({ "playlistId": playlist_id }),
    ))
}

async fn get_playlists(
    session: Session,
    State(playlists): State<GuardedPlaylistsService>,
) -> HandlerResult {
    let playlists = playlists.get_playlists(&session.user_id)?;
    Ok(success_data(StatusCode::OK, json!({ "playlists": playlists })))
}

async fn delete_playlist(
    session: Session,
    State(playlists): State<GuardedPlaylistsService>,
    Path(id): Path<String>,
) -> HandlerResult {
    playlists.verify_playlist_owner(&id, &session.user_id)?;
    playlists.delete_playlist(&id)?;
    Ok(success_message(StatusCode::OK, "Playlist berhasil dihapus"))
}

async fn post_playlist_song(
    session: Session,
    State(playlists): State<GuardedPlaylistsService>,
    Path(id): Path<String>,
    Payload(body): Payload,
) -> HandlerResult {
    let payload = validate_playlist_song_payload(body)?;
    playlists.verify_playlist_access(&id, &session.user_id)?;
    playlists.add_song_to_playlist(&id, &payload.song_id, &session.user_id)?;
    Ok(success_message(
        StatusCode::CREATED,
        "Lagu berhasil ditambahkan ke playlist",
    ))
}

async fn get_playlist_songs(
    session: Session,
    State(playlists): State<GuardedPlaylistsService>,
    Path(id): Path<String>,
) -> HandlerResult {
    playlists.verify_playlist_access(&id, &session.user_id)?;
    let playlist = playlists.get_playlist_with_songs(&id)?;
    Ok(success_data(StatusCode::OK, json!({ "playlist": playlist })))
}

async fn delete_playlist_song(
    session: Session,
    State(playlists): State<GuardedPlaylistsService>,
    Path(id): Path<String>,
    Payload(body): Payload,
) -> HandlerResult {
    let payload = validate_playlist_song_payload(body)?;
    playlists.verify_playlist_access(&id, &session.user_id)?;
    playlists.delete_song_from_playlist(&id, &payload.song_id, &session.user_id)?;
    Ok(success_message(
        StatusCode::OK,
        "Lagu berhasil dihapus dari playlist",
    ))
}

async fn get_playlist_activities(
    session: Session,
    State(playlists): State<GuardedPlaylistsService>,
    Path(id): Path<String>,
) -> HandlerResult {
    playlists.verify_playlist_access(&id, &session.user_id)?;
    let activities = playlists.get_activities(&id)?;
    Ok(success_data(StatusCode::OK, json!(activities)))
}

async fn post_collaboration(
    session: Session,
    State(playlists): State<GuardedPlaylistsService>,
    State(users): State<GuardedUsersService>,
    State(collaborations): State<GuardedCollaborationsService>,
    Payload(body): Payload,
) -> HandlerResult {
    let payload = validate_collaboration_payload(body)?;
    playlists.verify_playlist_owner(&payload.playlist_id, &session.user_id)?;
    users.verify_user_exists(&payload.user_id)?;
    let collaboration_id =
        collaborations.add_collaboration(&payload.playlist_id, &payload.user_id)?;
    Ok(success_message_data(
        StatusCode::CREATED,
        "Kolaborasi berhasil ditambahkan",
        json!({ "collaborationId": collaboration_id }),
    ))
}

async fn delete_collaboration(
    session: Session,
    State(playlists): State<GuardedPlaylistsService>,
    State(collaborations): State<GuardedCollaborationsService>,
    Payload(body): Payload,
) -> HandlerResult {
    let payload = validate_collaboration_payload(body)?;
    playlists.verify_playlist_owner(&payload.playlist_id, &session.user_id)?;
    collaborations.delete_collaboration(&payload.playlist_id, &payload.user_id)?;
    Ok(success_message(StatusCode::OK, "Kolaborasi berhasil dihapus"))
}

async fn post_playlist_export(
    session: Session,
    State(exports): State<GuardedExportsService>,
    Path(id): Path<String>,
    Payload(body): Payload,
) -> HandlerResult {
    let payload = validate_export_payload(body)?;
    exports.export_playlist(&id, &session.user_id, &payload.target_email)?;
    Ok(success_message(
        StatusCode::CREATED,
        "Permintaan Anda sedang kami proses",
    ))
}

pub(super) fn make_playlist_routes() -> Router<ServerState> {
    Router::new()
        .route("/playlists", get(get_playlists).post(post_playlist))
        .route("/playlists/{id}", delete(delete_playlist))
        .route(
            "/playlists/{id}/songs",
            get(get_playlist_songs)
                .post(post_playlist_song)
                .delete(delete_playlist_song),
        )
        .route("/playlists/{id}/activities", get(get_playlist_activities))
        .route(
            "/collaborations",
            post(post_collaboration).delete(delete_collaboration),
        )
        .route("/export/playlists/{id}", post(post_playlist_export))
}
