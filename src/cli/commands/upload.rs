use anyhow::Context;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::storage::{issue_upload_url, S3Presigner};

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let signer = S3Presigner::from_config(&config::config().storage)?;
    let ticket = issue_upload_url(&signer).await.context("failed to sign upload URL")?;

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            "Upload URL issued",
            Some(json!({
                "signedUrl": ticket.signed_url,
                "key": ticket.key,
                "expiresIn": ticket.expires_in,
            })),
        ),
        OutputFormat::Text => {
            println!("{}", ticket.signed_url);
            Ok(())
        }
    }
}
