use anyhow::Context;
use axum::{extract::State, response::Html, Json};
use folio_api::{CommentWithLikes, LikeCount, LikeRequest, NewComment};

use crate::{db, db::DataFiles, extractors::*, pages, Error};

pub async fn home() -> Html<String> {
    Html(pages::home(pages::current_year()))
}

pub async fn about(State(files): State<DataFiles>) -> Result<Html<String>, Error> {
    let comments = db::fetch_comments_with_likes(&files)
        .await
        .context("fetching comments for the about page")?;
    Ok(Html(pages::about(pages::current_year(), &comments)))
}

pub async fn projects() -> Html<String> {
    Html(pages::projects(pages::current_year()))
}

pub async fn contact() -> Html<String> {
    Html(pages::contact(pages::current_year()))
}

pub async fn add_comment(
    State(files): State<DataFiles>,
    ApiJson(data): ApiJson<NewComment>,
) -> Result<Json<CommentWithLikes>, Error> {
    let comment = db::add_comment(&files, data.text)
        .await
        .context("adding comment")?;
    tracing::info!(id = ?comment.id, "added comment");
    Ok(Json(comment.with_likes(0)))
}

pub async fn like_comment(
    State(files): State<DataFiles>,
    Voter(voter): Voter,
    ApiJson(data): ApiJson<LikeRequest>,
) -> Result<Json<LikeCount>, Error> {
    let likes = db::toggle_like(&files, data.id.clone(), voter.clone())
        .await
        .with_context(|| format!("toggling like of {:?} on {:?}", voter, data.id))?;
    tracing::info!(comment = ?data.id, ?voter, likes, "toggled like");
    Ok(Json(LikeCount { likes }))
}
