use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, path::PathBuf};
use tower_http::trace::TraceLayer;

mod compare;
mod db;
mod error;
mod extractors;
mod handlers;
mod pages;

use db::DataFiles;
pub use error::Error;
use extractors::AppState;

#[derive(structopt::StructOpt)]
struct Opt {
    /// Address to listen on
    #[structopt(long, env = "FOLIO_LISTEN", default_value = "127.0.0.1:5000")]
    listen: SocketAddr,

    /// Directory holding comments.json and like_comment.json
    #[structopt(long, env = "FOLIO_DATA_DIR", default_value = ".", parse(from_os_str))]
    data_dir: PathBuf,
}

pub fn app(files: DataFiles) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/about", get(handlers::about))
        .route("/projects", get(handlers::projects))
        .route("/contact", get(handlers::contact))
        .route("/add_comment", post(handlers::add_comment))
        .route("/like_comment", post(handlers::like_comment))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { files })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    tokio::fs::create_dir_all(&opt.data_dir)
        .await
        .with_context(|| format!("creating data directory {:?}", opt.data_dir))?;
    let files = DataFiles::in_dir(&opt.data_dir);
    tracing::info!(comments = ?files.comments(), likes = ?files.likes(), "using data files");

    tracing::info!("listening on {}", opt.listen);
    axum::Server::bind(&opt.listen)
        .serve(app(files).into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("serving axum webserver")
}
