use axum::extract::FromRef;

use crate::albums::{AlbumsService, SqliteAlbumStore};
use crate::authentications::{AuthenticationsService, SqliteAuthenticationStore, TokenManager};
use crate::cache::CacheService;
use crate::catalog_db::CatalogDb;
use crate::collaborations::{CollaborationsService, SqliteCollaborationStore};
use crate::exports::{ExportsService, MessageProducer};
use crate::playlists::{PlaylistsService, SqlitePlaylistStore};
use crate::songs::{SongsService, SqliteSongStore};
use crate::storage::StorageService;
use crate::users::{SqliteUserStore, UsersService};
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedAlbumsService = Arc<AlbumsService>;
pub type GuardedSongsService = Arc<SongsService>;
pub type GuardedUsersService = Arc<UsersService>;
pub type GuardedAuthenticationsService = Arc<AuthenticationsService>;
pub type GuardedPlaylistsService = Arc<PlaylistsService>;
pub type GuardedCollaborationsService = Arc<CollaborationsService>;
pub type GuardedExportsService = Arc<ExportsService>;
pub type GuardedStorage = Arc<dyn StorageService>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub hash: String,
    pub albums: GuardedAlbumsService,
    pub songs: GuardedSongsService,
    pub users: GuardedUsersService,
    pub authentications: GuardedAuthenticationsService,
    pub playlists: GuardedPlaylistsService,
    pub collaborations: GuardedCollaborationsService,
    pub exports: GuardedExportsService,
    pub storage: GuardedStorage,
}

impl ServerState {
    /// Wires every service on top of the shared catalog database.
    pub fn new(
        config: ServerConfig,
        db: CatalogDb,
        cache: Arc<dyn CacheService>,
        producer: Arc<dyn MessageProducer>,
        storage: GuardedStorage,
        tokens: TokenManager,
    ) -> ServerState {
        let album_store = Arc::new(SqliteAlbumStore::new(db.clone()));
        let albums = Arc::new(AlbumsService::new(album_store.clone(), cache));
        let songs = Arc::new(SongsService::new(
            Arc::new(SqliteSongStore::new(db.clone())),
            album_store,
        ));
        let users = Arc::new(UsersService::new(Arc::new(SqliteUserStore::new(
            db.clone(),
        ))));
        let authentications = Arc::new(AuthenticationsService::new(
            Arc::new(SqliteAuthenticationStore::new(db.clone())),
            users.clone(),
            tokens,
        ));
        let collaborations = Arc::new(CollaborationsService::new(Arc::new(
            SqliteCollaborationStore::new(db.clone()),
        )));
        let playlists = Arc::new(PlaylistsService::new(
            Arc::new(SqlitePlaylistStore::new(db)),
            collaborations.clone(),
            songs.clone(),
        ));
        let exports = Arc::new(ExportsService::new(producer, playlists.clone()));

        ServerState {
            config,
            start_time: Instant::now(),
            hash: env!("GIT_HASH").to_string(),
            albums,
            songs,
            users,
            authentications,
            playlists,
            collaborations,
            exports,
            storage,
        }
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedAlbumsService {
    fn from_ref(input: &ServerState) -> Self {
        input.albums.clone()
    }
}

impl FromRef<ServerState> for GuardedSongsService {
    fn from_ref(input: &ServerState) -> Self {
        input.songs.clone()
    }
}

impl FromRef<ServerState> for GuardedUsersService {
    fn from_ref(input: &ServerState) -> Self {
        input.users.clone()
    }
}

impl FromRef<ServerState> for GuardedAuthenticationsService {
    fn from_ref(input: &ServerState) -> Self {
        input.authentications.clone()
    }
}

impl FromRef<ServerState> for GuardedPlaylistsService {
    fn from_ref(input: &ServerState) -> Self {
        input.playlists.clone()
    }
}

impl FromRef<ServerState> for GuardedCollaborationsService {
    fn from_ref(input: &ServerState) -> Self {
        input.collaborations.clone()
    }
}

impl FromRef<ServerState> for GuardedExportsService {
    fn from_ref(input: &ServerState) -> Self {
        input.exports.clone()
    }
}

impl FromRef<ServerState> for GuardedStorage {
    fn from_ref(input: &ServerState) -> Self {
        input.storage.clone()
    }
}
