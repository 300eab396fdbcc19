use super::models::{Song, SongFilter, SongRecord, SongSummary};
use super::store::SongStore;
use crate::albums::{AlbumStore, ALBUM_NOT_FOUND};
use crate::catalog_db::{generate_id, OLD_ALBUMS_ID};
use crate::errors::{ServiceError, ServiceResult};
use crate::validation::SongPayload;
use std::sync::Arc;

pub const SONG_NOT_FOUND: &str = "Lagu tidak ditemukan";

pub struct SongsService {
    store: Arc<dyn SongStore>,
    albums: Arc<dyn AlbumStore>,
}

impl SongsService {
    pub fn new(store: Arc<dyn SongStore>, albums: Arc<dyn AlbumStore>) -> Self {
        Self { store, albums }
    }

    /// Resolves the album a payload targets, falling back to the sentinel.
    fn resolve_album_id<'a>(&self, payload: &'a SongPayload) -> ServiceResult<&'a str> {
        match payload.album_id.as_deref() {
            None => Ok(OLD_ALBUMS_ID),
            Some(album_id) => {
                if !self.albums.album_exists(album_id)? {
                    return Err(ServiceError::not_found(ALBUM_NOT_FOUND));
                }
                Ok(album_id)
            }
        }
    }

    fn record<'a>(payload: &'a SongPayload, album_id: &'a str) -> SongRecord<'a> {
        SongRecord {
            title: &payload.title,
            year: payload.year,
            genre: &payload.genre,
            performer: &payload.performer,
            duration: payload.duration,
            album_id,
        }
    }

    pub fn add_song(&self, payload: &SongPayload) -> ServiceResult<String> {
        let album_id = self.resolve_album_id(payload)?;
        let id = generate_id("song");
        self.store
            .insert_song(&id, &Self::record(payload, album_id))?
            .ok_or_else(|| ServiceError::invariant("Lagu gagal ditambahkan"))
    }

    pub fn get_songs(&self, filter: &SongFilter) -> ServiceResult<Vec<SongSummary>> {
        Ok(self.store.get_songs(filter)?)
    }

    pub fn get_song(&self, id: &str) -> ServiceResult<Song> {
        self.store
            .get_song(id)?
            .ok_or_else(|| ServiceError::not_found(SONG_NOT_FOUND))
    }

    pub fn verify_song_exists(&self, id: &str) -> ServiceResult<()> {
        if !self.store.song_exists(id)? {
            return Err(ServiceError::not_found(SONG_NOT_FOUND));
        }
        Ok(())
    }

    pub fn edit_song(&self, id: &str, payload: &SongPayload) -> ServiceResult<()> {
        let album_id = self.resolve_album_id(payload)?;
        if !self.store.update_song(id, &Self::record(payload, album_id))? {
            return Err(ServiceError::not_found(
                "Gagal memperbarui lagu. Id tidak ditemukan",
            ));
        }
        Ok(())
    }

    pub fn delete_song(&self, id: &str) -> ServiceResult<()> {
        if !self.store.delete_song(id)? {
            return Err(ServiceError::not_found(
                "Lagu gagal dihapus. Id tidak ditemukan",
            ));
        }
        Ok(())
    }
}
