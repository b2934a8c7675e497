use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post, IntoMakeService};
use axum::Router;
use hyper::server::conn::AddrIncoming;

use crate::web::http_routes::*;
use crate::web::state::ServiceState;

pub fn create_router(state: Arc<ServiceState>) -> Router {
    Router::new()
        .route("/translate", post(http_translate))
        .route("/languages", get(http_languages))
        .with_state(state)
}

pub fn create_server(
    addr: &SocketAddr,
    state: Arc<ServiceState>,
) -> Result<hyper::Server<AddrIncoming, IntoMakeService<Router>>, hyper::Error> {
    let server = hyper::Server::try_bind(addr)?.serve(create_router(state).into_make_service());

    Ok(server)
}
