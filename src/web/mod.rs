pub mod error;
pub mod http_routes;
pub mod server;
pub mod state;
