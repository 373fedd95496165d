use std::net::SocketAddr;

use anyhow::anyhow;
use axum::{
    async_trait,
    body::HttpBody,
    extract::{ConnectInfo, FromRequest, FromRequestParts},
    http::{request, Request},
    BoxError, Json,
};
use folio_api::VoterId;

use crate::{db::DataFiles, Error};

#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    pub files: DataFiles,
}

/// The network address the request came from, standing in for the voter
///
/// There is no notion of user account: everyone behind the same address shares
/// a single vote per comment.
pub struct Voter(pub VoterId);

#[async_trait]
impl<S: Sync> FromRequestParts<S> for Voter {
    type Rejection = Error;

    async fn from_request_parts(req: &mut request::Parts, _state: &S) -> Result<Voter, Error> {
        let ConnectInfo(addr) = req
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .ok_or_else(|| anyhow!("request has no peer address attached"))?;
        Ok(Voter(VoterId::from(addr.ip())))
    }
}

/// JSON body whose rejections are reported as invalid requests
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for ApiJson<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = Error;

    async fn from_request(req: Request<B>, state: &S) -> Result<ApiJson<T>, Error> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(data)) => Ok(ApiJson(data)),
            Err(rejection) => Err(Error::invalid_request(rejection.to_string())),
        }
    }
}
