//! Playlist export requests, handed to an external worker through a queue.

mod queue;

pub use queue::{MessageProducer, QueuedMessage, SqliteMessageQueue};

use crate::errors::ServiceResult;
use crate::playlists::PlaylistsService;
use crate::server::metrics;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub const EXPORT_PLAYLISTS_QUEUE: &str = "export:playlists";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistExportMessage {
    pub playlist_id: String,
    pub user_id: String,
    pub target_email: String,
}

pub struct ExportsService {
    producer: Arc<dyn MessageProducer>,
    playlists: Arc<PlaylistsService>,
}

impl ExportsService {
    pub fn new(producer: Arc<dyn MessageProducer>, playlists: Arc<PlaylistsService>) -> Self {
        Self {
            producer,
            playlists,
        }
    }

    /// Queues an export of a playlist the user can access. The worker does
    /// the rest.
    pub fn export_playlist(
        &self,
        playlist_id: &str,
        user_id: &str,
        target_email: &str,
    ) -> ServiceResult<()> {
        self.playlists.verify_playlist_access(playlist_id, user_id)?;

        let message = serde_json::to_string(&PlaylistExportMessage {
            playlist_id: playlist_id.to_string(),
            user_id: user_id.to_string(),
            target_email: target_email.to_string(),
        })
        .context("Failed to serialize export message")?;
        self.producer
            .send_message(EXPORT_PLAYLISTS_QUEUE, &message)?;

        metrics::record_export_queued();
        info!("Queued export of playlist {} for {}", playlist_id, user_id);
        Ok(())
    }
}
