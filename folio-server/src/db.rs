use anyhow::{anyhow, Context};
use folio_api::{Comment, CommentId, CommentKey, CommentWithLikes, VoterId};
use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

pub const COMMENTS_FILE: &str = "comments.json";
pub const LIKES_FILE: &str = "like_comment.json";

/// Voters of each comment, in the order they liked it
pub type Likes = BTreeMap<CommentKey, Vec<VoterId>>;

/// Location of the two JSON files backing the comment board
///
/// Nothing is cached: every load re-reads the file and every save rewrites it
/// whole. There is no locking either, so two concurrent read-modify-write cycles
/// on the same file can lose one of the updates.
#[derive(Clone, Debug)]
pub struct DataFiles {
    comments: PathBuf,
    likes: PathBuf,
}

impl DataFiles {
    pub fn in_dir(dir: impl AsRef<Path>) -> DataFiles {
        let dir = dir.as_ref();
        DataFiles {
            comments: dir.join(COMMENTS_FILE),
            likes: dir.join(LIKES_FILE),
        }
    }

    pub fn comments(&self) -> &Path {
        &self.comments
    }

    pub fn likes(&self) -> &Path {
        &self.likes
    }
}

/// Read a whole file, or `None` if it does not exist yet
async fn read_if_exists(path: &Path) -> anyhow::Result<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading {:?}", path)),
    }
}

async fn write_pretty<T>(path: &Path, value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize + ?Sized,
{
    let data = serde_json::to_vec_pretty(value)
        .with_context(|| format!("serializing contents of {:?}", path))?;
    tokio::fs::write(path, data)
        .await
        .with_context(|| format!("writing {:?}", path))
}

pub async fn load_comments(files: &DataFiles) -> anyhow::Result<Vec<Comment>> {
    match read_if_exists(&files.comments).await? {
        None => Ok(Vec::new()),
        Some(data) => serde_json::from_slice(&data)
            .with_context(|| format!("parsing comments from {:?}", files.comments)),
    }
}

pub async fn save_comments(files: &DataFiles, comments: &[Comment]) -> anyhow::Result<()> {
    tracing::debug!(num_comments = comments.len(), "saving comments");
    write_pretty(&files.comments, comments).await
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum LikesFile {
    ByComment(Likes),
    // older files stored a bare list, whose contents cannot be attributed to comments
    Legacy(Vec<serde_json::Value>),
}

pub async fn load_likes(files: &DataFiles) -> anyhow::Result<Likes> {
    let data = match read_if_exists(&files.likes).await? {
        None => return Ok(Likes::new()),
        Some(data) => data,
    };
    match serde_json::from_slice::<LikesFile>(&data)
        .with_context(|| format!("parsing likes from {:?}", files.likes))?
    {
        LikesFile::ByComment(likes) => Ok(likes),
        LikesFile::Legacy(old) => {
            tracing::warn!(
                num_entries = old.len(),
                "discarding likes file in legacy list format"
            );
            Ok(Likes::new())
        }
    }
}

pub async fn save_likes(files: &DataFiles, likes: &Likes) -> anyhow::Result<()> {
    tracing::debug!(num_comments = likes.len(), "saving likes");
    write_pretty(&files.likes, likes).await
}

pub async fn get_likes_count(files: &DataFiles, comment: &CommentKey) -> anyhow::Result<usize> {
    let likes = load_likes(files).await?;
    Ok(likes.get(comment).map(|voters| voters.len()).unwrap_or(0))
}

/// Like `comment` on behalf of `voter`, or take the like back if they already
/// liked it. Returns the resulting number of likes.
pub async fn toggle_like(
    files: &DataFiles,
    comment: CommentKey,
    voter: VoterId,
) -> anyhow::Result<usize> {
    let mut likes = load_likes(files).await?;
    let voters = likes.entry(comment).or_insert_with(Vec::new);
    match voters.iter().position(|v| *v == voter) {
        Some(pos) => {
            voters.remove(pos);
        }
        None => voters.push(voter),
    }
    let count = voters.len();
    save_likes(files, &likes).await?;
    Ok(count)
}

/// Append a new comment, numbered after the highest id already stored
pub async fn add_comment(files: &DataFiles, text: String) -> anyhow::Result<Comment> {
    let mut comments = load_comments(files).await?;
    let id = CommentId::next_after(&comments)
        .ok_or_else(|| anyhow!("no comment id left above the highest stored one"))
        .with_context(|| format!("numbering new comment in {:?}", files.comments))?;
    let comment = Comment { id, text };
    comments.push(comment.clone());
    save_comments(files, &comments).await?;
    Ok(comment)
}

/// All comments in insertion order, each with its current number of likes
pub async fn fetch_comments_with_likes(
    files: &DataFiles,
) -> anyhow::Result<Vec<CommentWithLikes>> {
    let comments = load_comments(files).await.context("loading comments")?;
    let mut res = Vec::with_capacity(comments.len());
    for c in comments {
        let likes = get_likes_count(files, &c.id.key())
            .await
            .with_context(|| format!("counting likes of comment {:?}", c.id))?;
        res.push(c.with_likes(likes));
    }
    Ok(res)
}
