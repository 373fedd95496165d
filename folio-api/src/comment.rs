use crate::CommentKey;

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub u64);

impl CommentId {
    /// Id to give to a comment appended after `existing`, or `None` once the
    /// highest stored id leaves no room above it
    pub fn next_after<'a>(
        existing: impl IntoIterator<Item = &'a Comment>,
    ) -> Option<CommentId> {
        let max = existing.into_iter().map(|c| c.id.0).max().unwrap_or(0);
        max.checked_add(1).map(CommentId)
    }

    /// Key under which likes for this comment are filed
    pub fn key(&self) -> CommentKey {
        CommentKey(self.0.to_string())
    }
}

/// A comment as persisted in the comment store
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
}

impl Comment {
    pub fn with_likes(self, likes: usize) -> CommentWithLikes {
        CommentWithLikes {
            id: self.id,
            text: self.text,
            likes,
        }
    }
}

/// A comment along with its like count at the time it was read
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentWithLikes {
    pub id: CommentId,
    pub text: String,
    pub likes: usize,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: u64) -> Comment {
        Comment {
            id: CommentId(id),
            text: format!("comment {id}"),
        }
    }

    #[test]
    fn next_id_starts_at_one() {
        assert_eq!(
            CommentId::next_after(&Vec::<Comment>::new()),
            Some(CommentId(1))
        );
    }

    #[test]
    fn next_id_follows_the_max_not_the_last() {
        let comments = vec![comment(3), comment(7), comment(5)];
        assert_eq!(CommentId::next_after(&comments), Some(CommentId(8)));
    }

    #[test]
    fn no_next_id_after_the_largest_one() {
        let comments = vec![comment(1), comment(u64::MAX)];
        assert_eq!(CommentId::next_after(&comments), None);
    }

    #[test]
    fn comment_json_shape() {
        let c = comment(2).with_likes(0);
        assert_eq!(
            serde_json::to_value(&c).unwrap(),
            serde_json::json!({ "id": 2, "text": "comment 2", "likes": 0 })
        );
    }
}
