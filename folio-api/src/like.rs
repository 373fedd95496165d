use crate::CommentId;

/// String form of a comment id, under which likes are filed
///
/// Requests may name the comment either with a JSON integer or with a JSON
/// string; both are filed under the same key, so `2` and `"2"` share votes.
#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(from = "RawCommentKey")]
pub struct CommentKey(pub String);

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawCommentKey {
    Number(i64),
    Text(String),
}

impl From<RawCommentKey> for CommentKey {
    fn from(raw: RawCommentKey) -> CommentKey {
        match raw {
            RawCommentKey::Number(n) => CommentKey(n.to_string()),
            RawCommentKey::Text(s) => CommentKey(s),
        }
    }
}

impl From<CommentId> for CommentKey {
    fn from(id: CommentId) -> CommentKey {
        id.key()
    }
}

/// Identifies who toggled a like: the network address the request came from
#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct VoterId(pub String);

impl From<std::net::IpAddr> for VoterId {
    fn from(addr: std::net::IpAddr) -> VoterId {
        VoterId(addr.to_string())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct LikeRequest {
    pub id: CommentKey,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct LikeCount {
    pub likes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> serde_json::Result<LikeRequest> {
        serde_json::from_str(body)
    }

    #[test]
    fn integer_and_string_ids_share_a_key() {
        assert_eq!(parse(r#"{"id": 2}"#).unwrap().id, CommentKey(String::from("2")));
        assert_eq!(parse(r#"{"id": "2"}"#).unwrap().id, CommentKey(String::from("2")));
        assert_eq!(CommentKey::from(CommentId(2)), CommentKey(String::from("2")));
    }

    #[test]
    fn missing_or_null_id_is_rejected() {
        assert!(parse(r#"{}"#).is_err());
        assert!(parse(r#"{"id": null}"#).is_err());
        assert!(parse(r#"{"id": [1]}"#).is_err());
    }

    #[test]
    fn voter_is_the_bare_address() {
        let addr: std::net::IpAddr = "10.0.0.7".parse().unwrap();
        assert_eq!(VoterId::from(addr), VoterId(String::from("10.0.0.7")));
    }
}
