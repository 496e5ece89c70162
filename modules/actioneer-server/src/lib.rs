pub mod queue;
pub mod routes;
pub mod state;

pub use queue::HttpQueue;
pub use routes::router;
pub use state::AppState;
