use std::env;
use std::path::PathBuf;

use clap::Parser;
use simple_log::LogConfigBuilder;
use simple_log::{error, info};
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use wordtrie::error::TrieError;
use wordtrie::session::Session;
use wordtrie::wordlist::load_word_lists;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Folder of `*.words` files, defaults to ~/.wordtrie
    #[arg(long)]
    dict_folder: Option<String>,
    #[arg(long = "word")]
    words: Vec<String>,
    #[arg(long, default_value_t = 1)]
    min_word_len: usize,
    #[arg(long)]
    debug: bool,
}

fn dict_folder(args: &Args) -> Option<PathBuf> {
    match args.dict_folder.clone() {
        Some(folder) => Some(PathBuf::from(folder)),
        None => home::home_dir().map(|home| home.join(".wordtrie")),
    }
}

async fn prepare_dictionary(session: &Session, args: &Args) -> Result<(), TrieError> {
    if let Some(folder) = dict_folder(args) {
        if folder.is_dir() {
            info!("loading dictionary folder: {}", folder.display());
            for word_list in load_word_lists(&folder, args.min_word_len)? {
                session.add_word_list(&word_list).await?;
            }
        } else if args.dict_folder.is_some() {
            error!("dictionary folder not found: {}", folder.display());
            eprintln!("dictionary folder not found: {}", folder.display());
        }
    }

    if !args.words.is_empty() {
        session.add_words("command line", &args.words).await?;
    }
    Ok(())
}

fn setup_debug_logging() {
    let mut temp_dir = env::temp_dir();
    temp_dir.push("wordtrie.log");
    if let Some(log_path) = temp_dir.to_str() {
        let config = LogConfigBuilder::builder()
            .path(log_path)
            .build();
        if let Err(_e) = simple_log::new(config) {
            eprintln!("fail to setup log {}", log_path);
        }
    }
}

async fn write_answer<W>(out: &mut W, answer: &serde_json::Value) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let output = format!("{}\n", answer);
    out.write_all(output.as_bytes()).await?;
    out.flush().await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.debug {
        setup_debug_logging();
    }

    let session = Session::new();
    if let Err(e) = prepare_dictionary(&session, &args).await {
        error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Some(answer) = session.answer(&line).await {
                    if let Err(e) = write_answer(&mut stdout, &answer).await {
                        error!("{:?}", e);
                        break;
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("{:?}", e);
                break;
            }
        }
    }
    info!("input closed, shutting down");
}
