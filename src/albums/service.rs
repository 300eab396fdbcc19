use super::models::{AlbumDetail, LikeCount};
use super::store::AlbumStore;
use crate::cache::CacheService;
use crate::catalog_db::{generate_id, OLD_ALBUMS_ID};
use crate::errors::{ServiceError, ServiceResult};
use crate::server::metrics;
use crate::validation::AlbumPayload;
use std::sync::Arc;
use tracing::{debug, warn};

pub const ALBUM_NOT_FOUND: &str = "Album tidak ditemukan";

fn likes_cache_key(album_id: &str) -> String {
    format!("albums:{}", album_id)
}

pub struct AlbumsService {
    store: Arc<dyn AlbumStore>,
    cache: Arc<dyn CacheService>,
}

impl AlbumsService {
    pub fn new(store: Arc<dyn AlbumStore>, cache: Arc<dyn CacheService>) -> Self {
        Self { store, cache }
    }

    pub fn add_album(&self, payload: &AlbumPayload) -> ServiceResult<String> {
        let id = generate_id("albums");
        self.store
            .insert_album(&id, &payload.name, payload.year)?
            .ok_or_else(|| ServiceError::invariant("Album gagal ditambahkan"))
    }

    pub fn get_album(&self, id: &str) -> ServiceResult<AlbumDetail> {
        let album = self
            .store
            .get_album(id)?
            .ok_or_else(|| ServiceError::not_found(ALBUM_NOT_FOUND))?;
        let songs = self.store.get_album_songs(id)?;
        Ok(AlbumDetail::new(album, songs))
    }

    pub fn edit_album(&self, id: &str, payload: &AlbumPayload) -> ServiceResult<()> {
        if !self.store.update_album(id, &payload.name, payload.year)? {
            return Err(ServiceError::not_found(
                "Gagal memperbarui album. Id tidak ditemukan",
            ));
        }
        Ok(())
    }

    pub fn delete_album(&self, id: &str) -> ServiceResult<()> {
        if id == OLD_ALBUMS_ID {
            return Err(ServiceError::invariant("Album bawaan tidak dapat dihapus"));
        }
        if !self.store.delete_album(id)? {
            return Err(ServiceError::not_found(
                "Album gagal dihapus. Id tidak ditemukan",
            ));
        }
        self.cache.delete(&likes_cache_key(id))?;
        Ok(())
    }

    pub fn verify_album_exists(&self, id: &str) -> ServiceResult<()> {
        if !self.store.album_exists(id)? {
            return Err(ServiceError::not_found(ALBUM_NOT_FOUND));
        }
        Ok(())
    }

    pub fn set_album_cover(&self, id: &str, cover_url: &str) -> ServiceResult<()> {
        if !self.store.set_album_cover(id, cover_url)? {
            return Err(ServiceError::not_found(
                "Gagal menambahkan gambar. Id tidak ditemukan",
            ));
        }
        Ok(())
    }

    /// Likes the album if `user_id` hasn't liked it yet, unlikes it otherwise.
    /// Returns whether the album is liked afterwards.
    pub fn toggle_like(&self, user_id: &str, album_id: &str) -> ServiceResult<bool> {
        self.verify_album_exists(album_id)?;

        let liked = self
            .store
            .toggle_album_like(&generate_id("albums-likes"), user_id, album_id)?;

        self.cache.delete(&likes_cache_key(album_id))?;
        debug!(
            "User {} {} album {}",
            user_id,
            if liked { "liked" } else { "unliked" },
            album_id
        );
        Ok(liked)
    }

    pub fn get_like_count(&self, album_id: &str) -> ServiceResult<LikeCount> {
        let key = likes_cache_key(album_id);

        if let Some(cached) = self.cache.get(&key)? {
            match cached.parse::<i64>() {
                Ok(likes) => {
                    metrics::record_likes_cache_lookup(true);
                    return Ok(LikeCount {
                        likes,
                        from_cache: true,
                    });
                }
                Err(_) => warn!("Discarding unparsable cache entry {}: {:?}", key, cached),
            }
        }
        metrics::record_likes_cache_lookup(false);

        self.verify_album_exists(album_id)?;
        let likes = self.store.count_album_likes(album_id)?;
        self.cache.set(&key, &likes.to_string())?;

        Ok(LikeCount {
            likes,
            from_cache: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::albums::store::SqliteAlbumStore;
    use crate::cache::MemoryCache;
    use crate::catalog_db::CatalogDb;
    use rusqlite::params;
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Fixture {
        service: AlbumsService,
        cache: Arc<MemoryCache>,
        db: CatalogDb,
        _temp_dir: TempDir,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let db = CatalogDb::open(temp_dir.path().join("catalog.db")).unwrap();
        let cache = Arc::new(MemoryCache::new(Duration::from_secs(60)));
        let service = AlbumsService::new(
            Arc::new(SqliteAlbumStore::new(db.clone())),
            cache.clone(),
        );
        db.write()
            .execute(
                "INSERT INTO users (id, username, password, fullname) VALUES (?1, ?1, 'x', 'User')",
                params!["user-1"],
            )
            .unwrap();
        Fixture {
            service,
            cache,
            db,
            _temp_dir: temp_dir,
        }
    }

    fn payload(name: &str, year: i64) -> AlbumPayload {
        AlbumPayload {
            name: name.to_string(),
            year,
        }
    }

    #[test]
    fn add_and_get_album() {
        let f = fixture();
        let id = f.service.add_album(&payload("Viva", 2008)).unwrap();
        assert!(id.starts_with("albums-"));
        assert_eq!(id.len(), "albums-".len() + 16);

        let album = f.service.get_album(&id).unwrap();
        assert_eq!(album.name, "Viva");
        assert!(album.songs.is_empty());
        assert!(album.cover_url.is_none());
    }

    #[test]
    fn missing_album_is_not_found() {
        let f = fixture();
        let err = f.service.get_album("albums-missing").unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == ALBUM_NOT_FOUND));

        assert!(matches!(
            f.service.edit_album("albums-missing", &payload("X", 2000)),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            f.service.delete_album("albums-missing"),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn sentinel_album_cannot_be_deleted() {
        let f = fixture();
        assert!(matches!(
            f.service.delete_album(OLD_ALBUMS_ID),
            Err(ServiceError::Invariant(_))
        ));
    }

    #[test]
    fn like_twice_unlikes() {
        let f = fixture();
        let id = f.service.add_album(&payload("A", 2000)).unwrap();

        assert!(f.service.toggle_like("user-1", &id).unwrap());
        assert_eq!(f.service.get_like_count(&id).unwrap().likes, 1);

        assert!(!f.service.toggle_like("user-1", &id).unwrap());
        assert_eq!(f.service.get_like_count(&id).unwrap().likes, 0);
    }

    #[test]
    fn concurrent_toggles_never_fail() {
        let f = fixture();
        let id = f.service.add_album(&payload("A", 2000)).unwrap();
        let service = Arc::new(f.service);
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let service = service.clone();
                let barrier = barrier.clone();
                let id = id.clone();
                thread::spawn(move || {
                    barrier.wait();
                    for _ in 0..25 {
                        service.toggle_like("user-1", &id).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // 50 toggles in total leave the album unliked.
        assert_eq!(service.get_like_count(&id).unwrap().likes, 0);
        assert!(service.toggle_like("user-1", &id).unwrap());
        assert_eq!(service.get_like_count(&id).unwrap().likes, 1);
    }

    #[test]
    fn like_count_is_served_from_cache_second_time() {
        let f = fixture();
        let id = f.service.add_album(&payload("A", 2000)).unwrap();
        f.service.toggle_like("user-1", &id).unwrap();

        let first = f.service.get_like_count(&id).unwrap();
        assert!(!first.from_cache);
        let second = f.service.get_like_count(&id).unwrap();
        assert!(second.from_cache);
        assert_eq!(first.likes, second.likes);
    }

    #[test]
    fn every_toggle_invalidates_the_cache() {
        let f = fixture();
        let id = f.service.add_album(&payload("A", 2000)).unwrap();
        let key = likes_cache_key(&id);
        assert_eq!(key, format!("albums:{}", id));

        f.service.get_like_count(&id).unwrap();
        assert!(f.cache.get(&key).unwrap().is_some());

        f.service.toggle_like("user-1", &id).unwrap();
        assert!(f.cache.get(&key).unwrap().is_none());

        f.service.get_like_count(&id).unwrap();
        f.service.toggle_like("user-1", &id).unwrap();
        assert!(f.cache.get(&key).unwrap().is_none());
    }

    #[test]
    fn unknown_album_like_count_is_not_found() {
        let f = fixture();
        assert!(matches!(
            f.service.get_like_count("albums-missing"),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            f.service.toggle_like("user-1", "albums-missing"),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn garbage_cache_entry_falls_back_to_store() {
        let f = fixture();
        let id = f.service.add_album(&payload("A", 2000)).unwrap();
        f.cache.set(&likes_cache_key(&id), "not-a-number").unwrap();

        let count = f.service.get_like_count(&id).unwrap();
        assert!(!count.from_cache);
        assert_eq!(count.likes, 0);
    }

    #[test]
    fn deleting_album_removes_its_songs() {
        let f = fixture();
        let id = f.service.add_album(&payload("A", 2000)).unwrap();
        f.db.write()
            .execute(
                "INSERT INTO songs (id, title, year, genre, performer, album_id) VALUES ('song-1', 'T', 2000, 'g', 'p', ?1)",
                params![id],
            )
            .unwrap();
        assert_eq!(f.service.get_album(&id).unwrap().songs.len(), 1);

        f.service.delete_album(&id).unwrap();
        let remaining: i64 = f
            .db
            .read()
            .query_row("SELECT COUNT(*) FROM songs", [], |r| r.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
