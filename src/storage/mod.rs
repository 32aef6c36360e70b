pub mod presign;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub use presign::S3Presigner;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("Invalid object store endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Produces capability URLs that allow a single upload to the object store
#[async_trait]
pub trait UploadSigner: Send + Sync {
    async fn presign_put(&self, key: &str) -> Result<String, SignerError>;

    fn expires_secs(&self) -> u64;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTicket {
    pub signed_url: String,
    pub key: String,
    pub expires_in: u64,
}

/// Sign an upload URL for a freshly generated object key
pub async fn issue_upload_url(signer: &dyn UploadSigner) -> Result<UploadTicket, SignerError> {
    let key = Uuid::new_v4().to_string();
    let signed_url = signer.presign_put(&key).await?;
    tracing::debug!("Issued upload URL for object {}", key);

    Ok(UploadTicket {
        signed_url,
        key,
        expires_in: signer.expires_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoSigner;

    #[async_trait]
    impl UploadSigner for EchoSigner {
        async fn presign_put(&self, key: &str) -> Result<String, SignerError> {
            Ok(format!("https://uploads.test/{}", key))
        }

        fn expires_secs(&self) -> u64 {
            900
        }
    }

    #[tokio::test]
    async fn tickets_use_fresh_keys() {
        let a = issue_upload_url(&EchoSigner).await.unwrap();
        let b = issue_upload_url(&EchoSigner).await.unwrap();

        assert_ne!(a.key, b.key);
        assert!(Uuid::parse_str(&a.key).is_ok());
        assert_eq!(a.signed_url, format!("https://uploads.test/{}", a.key));

        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["expiresIn"], 900);
        assert!(json["signedUrl"].is_string());
    }
}
