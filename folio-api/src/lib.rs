mod comment;
mod error;
mod like;

pub use comment::{Comment, CommentId, CommentWithLikes, NewComment};
pub use error::Error;
pub use like::{CommentKey, LikeCount, LikeRequest, VoterId};
