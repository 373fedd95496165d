#![cfg(test)]

use axum::{
    extract::ConnectInfo,
    http::{self, request},
    Router,
};
use folio_api::{
    CommentId, CommentKey, CommentWithLikes, Error as ApiError, LikeCount, LikeRequest,
    NewComment, VoterId,
};
use folio_mock_server::MockServer;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{fmt::Debug, net::SocketAddr};
use tower::{Service, ServiceExt};

use crate::{app, db, db::DataFiles, pages};

struct TestApp {
    _dir: tempfile::TempDir,
    files: DataFiles,
    app: Router,
}

impl TestApp {
    fn new() -> TestApp {
        let dir = tempfile::tempdir().expect("creating tempdir");
        let files = DataFiles::in_dir(dir.path());
        let app = app(files.clone());
        TestApp {
            _dir: dir,
            files,
            app,
        }
    }

    async fn call(
        &mut self,
        req: request::Request<axum::body::Body>,
    ) -> (http::StatusCode, hyper::body::Bytes) {
        self.app
            .ready()
            .await
            .expect("waiting for app to be ready");
        let resp = self.app.call(req).await.expect("running request");
        let status = resp.status();
        let body = hyper::body::to_bytes(resp.into_body())
            .await
            .expect("recovering resp bytes");
        (status, body)
    }

    async fn get(&mut self, uri: &str) -> (http::StatusCode, String) {
        let req = request::Builder::new()
            .method("GET")
            .uri(uri)
            .body(axum::body::Body::empty())
            .expect("building request");
        let (status, body) = self.call(req).await;
        (
            status,
            String::from_utf8(body.to_vec()).expect("page is not utf8"),
        )
    }

    async fn post_raw(
        &mut self,
        uri: &str,
        from: &str,
        body: &[u8],
    ) -> (http::StatusCode, hyper::body::Bytes) {
        let addr: SocketAddr = format!("{from}:41234").parse().expect("parsing voter address");
        let mut req = request::Builder::new()
            .method("POST")
            .uri(uri)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body.to_vec()))
            .expect("building request");
        req.extensions_mut().insert(ConnectInfo(addr));
        self.call(req).await
    }

    async fn post<Req, Resp>(
        &mut self,
        uri: &str,
        from: &str,
        body: &Req,
    ) -> Result<Resp, ApiError>
    where
        Req: Debug + serde::Serialize,
        Resp: for<'de> serde::Deserialize<'de>,
    {
        let req_body = serde_json::to_vec(body).expect("serializing request body to json");
        let (status, resp) = self.post_raw(uri, from, &req_body).await;
        if status == http::StatusCode::OK {
            return Ok(serde_json::from_slice(&resp).unwrap_or_else(|err| {
                panic!("failed parsing resp body {resp:?} to request {body:?}: {err}")
            }));
        }
        let err = ApiError::parse(&resp)
            .unwrap_or_else(|err| panic!("parsing error response body {err}, body is {resp:?}"));
        assert_eq!(status, err.status_code());
        Err(err)
    }

    async fn add_comment(&mut self, text: &str) -> Result<CommentWithLikes, ApiError> {
        let body = NewComment {
            text: String::from(text),
        };
        self.post("/add_comment", "127.0.0.1", &body).await
    }

    async fn like(&mut self, id: u64, from: &str) -> Result<LikeCount, ApiError> {
        let body = LikeRequest {
            id: CommentId(id).key(),
        };
        self.post("/like_comment", from, &body).await
    }
}

#[tokio::test]
async fn pages_render_with_the_current_year() {
    let mut app = TestApp::new();
    let footer = format!("&copy; {}", pages::current_year());
    for uri in ["/", "/about", "/projects", "/contact"] {
        let (status, page) = app.get(uri).await;
        assert_eq!(status, http::StatusCode::OK, "GET {uri}");
        assert!(page.contains(&footer), "GET {uri} has no year: {page}");
    }
    let (status, _) = app.get("/nope").await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn first_comment_gets_id_one() {
    let mut app = TestApp::new();
    assert_eq!(
        app.add_comment("hi").await,
        Ok(CommentWithLikes {
            id: CommentId(1),
            text: String::from("hi"),
            likes: 0,
        })
    );
    assert_eq!(db::load_comments(&app.files).await.unwrap().len(), 1);

    let (_, page) = app.get("/about").await;
    assert!(page.contains(r#"data-comment-id="1" data-likes="0""#));
    assert!(page.contains("<p>hi</p>"));
}

#[tokio::test]
async fn likes_toggle_per_voter_address() {
    let mut app = TestApp::new();
    std::fs::write(app.files.comments(), r#"[{"id": 2, "text": "hello"}]"#).unwrap();

    assert_eq!(app.like(2, "10.0.0.1").await, Ok(LikeCount { likes: 1 }));
    assert_eq!(app.like(2, "10.0.0.1").await, Ok(LikeCount { likes: 0 }));
    assert_eq!(app.like(2, "10.0.0.2").await, Ok(LikeCount { likes: 1 }));

    let (_, page) = app.get("/about").await;
    assert!(page.contains(r#"data-comment-id="2" data-likes="1""#));

    // the port does not matter, only the address
    let likes = db::load_likes(&app.files).await.unwrap();
    assert_eq!(
        likes[&CommentKey(String::from("2"))],
        vec![VoterId(String::from("10.0.0.2"))]
    );
}

#[tokio::test]
async fn string_and_integer_ids_share_votes() {
    let mut app = TestApp::new();
    let (status, body) = app
        .post_raw("/like_comment", "10.0.0.1", br#"{"id": "5"}"#)
        .await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(&body[..], br#"{"likes":1}"#);
    assert_eq!(app.like(5, "10.0.0.1").await, Ok(LikeCount { likes: 0 }));
}

#[tokio::test]
async fn only_integer_or_string_ids_are_accepted() {
    let mut app = TestApp::new();
    for body in [r#"{"id": 2.0}"#, r#"{"id": true}"#] {
        let (status, resp) = app
            .post_raw("/like_comment", "10.0.0.1", body.as_bytes())
            .await;
        assert_eq!(status, http::StatusCode::BAD_REQUEST, "{body}");
        assert!(
            matches!(ApiError::parse(&resp), Ok(ApiError::InvalidRequest(_))),
            "{body} answered {resp:?}"
        );
    }
    assert!(!app.files.likes().exists());
}

#[tokio::test]
async fn running_out_of_ids_is_an_internal_error() {
    let mut app = TestApp::new();
    let contents = format!(r#"[{{"id": {}, "text": "a"}}]"#, u64::MAX);
    std::fs::write(app.files.comments(), &contents).unwrap();

    assert!(matches!(
        app.add_comment("b").await,
        Err(ApiError::Unknown(_))
    ));
    assert_eq!(std::fs::read_to_string(app.files.comments()).unwrap(), contents);
}

#[tokio::test]
async fn malformed_requests_are_rejected_without_writing() {
    let mut app = TestApp::new();
    for (uri, body) in [
        ("/add_comment", r#"{}"#),
        ("/add_comment", r#"{"text": 12}"#),
        ("/add_comment", "not json"),
        ("/like_comment", r#"{}"#),
        ("/like_comment", r#"{"id": null}"#),
        ("/like_comment", r#"{"id": {"nested": 1}}"#),
    ] {
        let (status, resp) = app.post_raw(uri, "10.0.0.1", body.as_bytes()).await;
        assert_eq!(status, http::StatusCode::BAD_REQUEST, "{uri} with {body:?}");
        assert!(
            matches!(ApiError::parse(&resp), Ok(ApiError::InvalidRequest(_))),
            "{uri} with {body:?} answered {resp:?}"
        );
    }
    assert!(!app.files.comments().exists());
    assert!(!app.files.likes().exists());
}

#[tokio::test]
async fn corrupted_store_is_an_internal_error() {
    let mut app = TestApp::new();
    std::fs::write(app.files.comments(), "{not json").unwrap();

    let (status, _) = app.get("/about").await;
    assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
    assert!(matches!(
        app.add_comment("hi").await,
        Err(ApiError::Unknown(_))
    ));
    assert_eq!(
        std::fs::read_to_string(app.files.comments()).unwrap(),
        "{not json"
    );
}

#[derive(Debug)]
enum Op {
    AddComment(String),
    Like { comment: usize, voter: u8 },
    About,
}

const TEXTS: &[&str] = &[
    "hi",
    "nice portfolio!",
    "<b>bold</b> & \"quoted\"",
    "",
    "multi\nline",
];

fn random_op(rng: &mut StdRng) -> Op {
    match rng.gen_range(0..4) {
        0 => Op::AddComment(String::from(TEXTS[rng.gen_range(0..TEXTS.len())])),
        1 | 2 => Op::Like {
            comment: rng.gen(),
            voter: rng.gen_range(0..3),
        },
        _ => Op::About,
    }
}

/// Pick one of the existing comments, or a never-assigned id when there are none
fn pick_comment(mock: &MockServer, fuzz_id: usize) -> CommentId {
    match mock.test_num_comments() {
        0 => CommentId(fuzz_id as u64 % 4 + 1),
        n => mock.test_get_comment_id(fuzz_id % n),
    }
}

async fn execute_op(app: &mut TestApp, mock: &mut MockServer, op: Op) {
    match op {
        Op::AddComment(text) => {
            let app_res = app.add_comment(&text).await;
            let mock_res = mock.add_comment(NewComment { text });
            assert_eq!(app_res, mock_res, "app and mock disagree on AddComment");
        }
        Op::Like { comment, voter } => {
            let id = pick_comment(mock, comment);
            let from = format!("192.168.0.{voter}");
            let app_res = app.like(id.0, &from).await;
            let mock_res = mock.like_comment(LikeRequest { id: id.key() }, VoterId(from));
            assert_eq!(app_res, mock_res, "app and mock disagree on Like");
        }
        Op::About => {
            let (status, _) = app.get("/about").await;
            assert_eq!(status, http::StatusCode::OK);
            let app_res = db::fetch_comments_with_likes(&app.files)
                .await
                .expect("fetching comments");
            assert_eq!(app_res, mock.about(), "app and mock disagree on About");
        }
    }
}

#[tokio::test]
async fn compare_with_mock() {
    for seed in 0..32 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut app = TestApp::new();
        let mut mock = MockServer::new();
        let num_ops = rng.gen_range(1..60);
        for _ in 0..num_ops {
            let op = random_op(&mut rng);
            execute_op(&mut app, &mut mock, op).await;
        }
        execute_op(&mut app, &mut mock, Op::About).await;
    }
}
