use super::models::{
    ActivityAction, NewActivity, Playlist, PlaylistActivities, PlaylistSummary, PlaylistWithSongs,
};
use super::store::PlaylistStore;
use crate::catalog_db::generate_id;
use crate::collaborations::CollaborationsService;
use crate::errors::{ServiceError, ServiceResult, FORBIDDEN_MESSAGE};
use crate::songs::SongsService;
use std::sync::Arc;
use tracing::debug;

pub const PLAYLIST_NOT_FOUND: &str = "Playlist tidak ditemukan";

pub struct PlaylistsService {
    store: Arc<dyn PlaylistStore>,
    collaborations: Arc<CollaborationsService>,
    songs: Arc<SongsService>,
}

fn new_activity(user_id: &str, action: ActivityAction) -> NewActivity<'_> {
    NewActivity {
        id: generate_id("history"),
        user_id,
        action,
        time: chrono::Utc::now().to_rfc3339(),
    }
}

impl PlaylistsService {
    pub fn new(
        store: Arc<dyn PlaylistStore>,
        collaborations: Arc<CollaborationsService>,
        songs: Arc<SongsService>,
    ) -> Self {
        Self {
            store,
            collaborations,
            songs,
        }
    }

    fn find_playlist(&self, id: &str) -> ServiceResult<Playlist> {
        self.store
            .get_playlist(id)?
            .ok_or_else(|| ServiceError::not_found(PLAYLIST_NOT_FOUND))
    }

    /// A missing playlist is reported before ownership.
    pub fn verify_playlist_owner(&self, id: &str, user_id: &str) -> ServiceResult<()> {
        let playlist = self.find_playlist(id)?;
        if playlist.owner != user_id {
            return Err(ServiceError::Authorization(FORBIDDEN_MESSAGE.to_string()));
        }
        Ok(())
    }

    /// Passes for the owner and for registered collaborators.
    pub fn verify_playlist_access(&self, id: &str, user_id: &str) -> ServiceResult<()> {
        let playlist = self.find_playlist(id)?;
        if playlist.owner == user_id {
            return Ok(());
        }
        self.collaborations.verify_collaborator(id, user_id)
    }

    pub fn add_playlist(&self, name: &str, owner: &str) -> ServiceResult<String> {
        let id = generate_id("playlist");
        self.store
            .insert_playlist(&id, name, owner)?
            .ok_or_else(|| ServiceError::invariant("Playlist gagal ditambahkan"))
    }

    pub fn get_playlists(&self, user_id: &str) -> ServiceResult<Vec<PlaylistSummary>> {
        Ok(self.store.get_playlists_for_user(user_id)?)
    }

    pub fn delete_playlist(&self, id: &str) -> ServiceResult<()> {
        if !self.store.delete_playlist(id)? {
            return Err(ServiceError::not_found(
                "Playlist gagal dihapus. Id tidak ditemukan",
            ));
        }
        Ok(())
    }

    pub fn add_song_to_playlist(
        &self,
        playlist_id: &str,
        song_id: &str,
        user_id: &str,
    ) -> ServiceResult<()> {
        self.songs.verify_song_exists(song_id)?;
        let added = self.store.add_playlist_song(
            &generate_id("playlist-songs"),
            playlist_id,
            song_id,
            &new_activity(user_id, ActivityAction::Add),
        )?;
        if !added {
            return Err(ServiceError::invariant("Lagu gagal ditambahkan ke playlist"));
        }
        debug!("User {} added {} to {}", user_id, song_id, playlist_id);
        Ok(())
    }

    pub fn get_playlist_with_songs(&self, playlist_id: &str) -> ServiceResult<PlaylistWithSongs> {
        let summary = self
            .store
            .get_playlist_summary(playlist_id)?
            .ok_or_else(|| ServiceError::not_found(PLAYLIST_NOT_FOUND))?;
        let songs = self.store.get_playlist_songs(playlist_id)?;
        Ok(PlaylistWithSongs::new(summary, songs))
    }

    pub fn delete_song_from_playlist(
        &self,
        playlist_id: &str,
        song_id: &str,
        user_id: &str,
    ) -> ServiceResult<()> {
        let deleted = self.store.delete_playlist_song(
            playlist_id,
            song_id,
            &new_activity(user_id, ActivityAction::Delete),
        )?;
        if !deleted {
            return Err(ServiceError::not_found(
                "Lagu gagal dihapus dari playlist. Id tidak ditemukan",
            ));
        }
        debug!("User {} removed {} from {}", user_id, song_id, playlist_id);
        Ok(())
    }

    pub fn get_activities(&self, playlist_id: &str) -> ServiceResult<PlaylistActivities> {
        Ok(PlaylistActivities {
            playlist_id: playlist_id.to_string(),
            activities: self.store.get_activities(playlist_id)?,
        })
    }
}
