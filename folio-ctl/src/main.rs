use anyhow::Context;
use folio_api::{CommentId, CommentWithLikes, LikeCount, LikeRequest, NewComment};

#[derive(structopt::StructOpt)]
struct Opt {
    #[structopt(short, long, default_value = "http://127.0.0.1:5000")]
    host: String,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Post a comment to the about page
    AddComment {
        /// Comment text
        text: String,
    },

    /// Like a comment, or take the like back if this address already liked it
    Like {
        /// Comment id
        id: u64,
    },
}

async fn post<Req, Resp>(
    client: &reqwest::Client,
    url: String,
    body: &Req,
) -> anyhow::Result<Resp>
where
    Req: serde::Serialize,
    Resp: serde::de::DeserializeOwned,
{
    let resp = client
        .post(&url)
        .json(body)
        .send()
        .await
        .with_context(|| format!("sending request to {url}"))?;
    if !resp.status().is_success() {
        let body = resp.bytes().await.context("reading error body")?;
        let err = folio_api::Error::parse(&body).context("parsing error body")?;
        return Err(err).with_context(|| format!("server refused request to {url}"));
    }
    resp.json()
        .await
        .with_context(|| format!("parsing response from {url}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = <Opt as structopt::StructOpt>::from_args();

    let client = reqwest::Client::new();

    match opt.cmd {
        Command::AddComment { text } => {
            let c: CommentWithLikes = post(
                &client,
                format!("{}/add_comment", opt.host),
                &NewComment { text },
            )
            .await?;
            println!("posted comment {}: {}", c.id.0, c.text);
        }
        Command::Like { id } => {
            let LikeCount { likes } = post(
                &client,
                format!("{}/like_comment", opt.host),
                &LikeRequest {
                    id: CommentId(id).key(),
                },
            )
            .await?;
            println!("comment {id} now has {likes} likes");
        }
    }

    Ok(())
}
