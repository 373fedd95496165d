use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Context;
use folio_api::{Comment, CommentId, CommentKey, VoterId};
use rand::{seq::SliceRandom, Rng};

const NUM_COMMENTS: u64 = 12;
const NUM_VOTERS: usize = 20;
const MAX_COMMENT_WORDS: usize = 40;

#[derive(structopt::StructOpt)]
struct Opt {
    /// Directory to write comments.json and like_comment.json to
    #[structopt(default_value = ".", parse(from_os_str))]
    dir: PathBuf,
}

fn gen_voter(i: usize) -> VoterId {
    VoterId(format!("192.168.{}.{}", i / 250, i % 250 + 2))
}

fn write_json<T: serde::Serialize>(path: PathBuf, value: &T) -> anyhow::Result<()> {
    let data = serde_json::to_vec_pretty(value).context("serializing test data")?;
    std::fs::write(&path, data).with_context(|| format!("writing {:?}", path))
}

fn main() -> anyhow::Result<()> {
    let opt = <Opt as structopt::StructOpt>::from_args();
    let mut rng = rand::thread_rng();

    // Generate comments
    let comments = (1..=NUM_COMMENTS)
        .map(|id| Comment {
            id: CommentId(id),
            text: lipsum::lipsum_words(rng.gen_range(1..=MAX_COMMENT_WORDS)),
        })
        .collect::<Vec<_>>();

    // Generate likes, leaving some comments without any entry at all
    let voters = (0..NUM_VOTERS).map(gen_voter).collect::<Vec<_>>();
    let mut likes = BTreeMap::<CommentKey, Vec<VoterId>>::new();
    for c in &comments {
        if rng.gen_bool(0.25) {
            continue;
        }
        let num_likes = rng.gen_range(0..=NUM_VOTERS);
        likes.insert(
            c.id.key(),
            voters.choose_multiple(&mut rng, num_likes).cloned().collect(),
        );
    }

    write_json(opt.dir.join("comments.json"), &comments)?;
    write_json(opt.dir.join("like_comment.json"), &likes)?;
    println!(
        "wrote {} comments and {} liked comments to {:?}",
        comments.len(),
        likes.len(),
        opt.dir
    );
    Ok(())
}
