pub mod handlers;
pub mod server;

pub use handlers::{AppState, ForecastQuery};
pub use server::ApiServer;
