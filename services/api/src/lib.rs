//! API service: videos, playlists, subscriptions and likes behind a
//! bearer-token middleware.

pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
