use std::collections::BTreeMap;

use folio_api::{
    Comment, CommentId, CommentKey, CommentWithLikes, Error, LikeCount, LikeRequest, NewComment,
    VoterId,
};

/// In-memory model of the comment and like stores
#[derive(Debug, Default)]
pub struct MockServer {
    comments: Vec<Comment>,
    likes: BTreeMap<CommentKey, Vec<VoterId>>,
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer::default()
    }

    /// Return the current number of comments
    pub fn test_num_comments(&self) -> usize {
        self.comments.len()
    }

    /// Return the id of comment number `idx`, in insertion order
    pub fn test_get_comment_id(&self, idx: usize) -> CommentId {
        self.comments
            .get(idx)
            .unwrap_or_else(|| panic!("getting comment {idx} among {}", self.comments.len()))
            .id
    }

    fn likes_count(&self, key: &CommentKey) -> usize {
        self.likes.get(key).map(|v| v.len()).unwrap_or(0)
    }

    pub fn about(&self) -> Vec<CommentWithLikes> {
        self.comments
            .iter()
            .map(|c| c.clone().with_likes(self.likes_count(&c.id.key())))
            .collect()
    }

    pub fn add_comment(&mut self, c: NewComment) -> Result<CommentWithLikes, Error> {
        let id = CommentId::next_after(&self.comments).ok_or_else(|| {
            Error::Unknown(String::from("no comment id left above the highest stored one"))
        })?;
        let comment = Comment { id, text: c.text };
        self.comments.push(comment.clone());
        Ok(comment.with_likes(0))
    }

    pub fn like_comment(&mut self, req: LikeRequest, voter: VoterId) -> Result<LikeCount, Error> {
        let voters = self.likes.entry(req.id).or_insert_with(Vec::new);
        match voters.iter().position(|v| *v == voter) {
            Some(pos) => {
                voters.remove(pos);
            }
            None => voters.push(voter),
        }
        Ok(LikeCount {
            likes: voters.len(),
        })
    }
}
