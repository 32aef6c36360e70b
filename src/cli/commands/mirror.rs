use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::utils::{output_success, write_tree_text};
use crate::cli::OutputFormat;
use crate::config;
use crate::content::{GithubClient, MirrorBuilder};

#[derive(Args)]
pub struct MirrorArgs {
    #[arg(help = "Contents API URL of the root directory")]
    pub url: String,

    #[arg(long, help = "Maximum concurrent requests (defaults to CONTENT_MAX_CONCURRENT_FETCHES)")]
    pub concurrency: Option<usize>,

    #[arg(long, short, help = "Write the mirrored document to this file")]
    pub output: Option<PathBuf>,
}

pub async fn handle(args: MirrorArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let content = &config::config().content;
    let client = GithubClient::new(content).context("failed to build content API client")?;
    let concurrency = args.concurrency.unwrap_or(content.max_concurrent_fetches);

    let builder = MirrorBuilder::new(Arc::new(client), concurrency);
    let tree = builder
        .build(&args.url)
        .await
        .with_context(|| format!("could not fetch directory listing at {}", args.url))?;

    let document = serde_json::to_string_pretty(&tree)?;
    match (&args.output, &output_format) {
        (Some(path), _) => {
            std::fs::write(path, &document).with_context(|| format!("failed to write {}", path.display()))?;
            output_success(
                &output_format,
                &format!("Mirrored {} top-level entries into {}", tree.len(), path.display()),
                None,
            )?;
        }
        (None, OutputFormat::Json) => println!("{}", document),
        (None, OutputFormat::Text) => write_tree_text(&tree, 0),
    }
    Ok(())
}
