mod album_routes;
pub mod config;
mod http_layers;
pub mod metrics;
mod playlist_routes;
pub mod response;
pub mod server;
pub(self) mod session;
mod song_routes;
pub mod state;
mod user_routes;

pub use album_routes::DATA_SOURCE_HEADER;
pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, run_server};
pub use state::ServerState;
