//! AWS Signature Version 4 query-string presigning for S3 uploads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use url::Url;

use super::{SignerError, UploadSigner};
use crate::config::StorageConfig;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";
const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Presigns `PUT` requests against one bucket with static credentials
pub struct S3Presigner {
    region: String,
    bucket: Option<String>,
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    session_token: Option<String>,
    endpoint: Option<Url>,
    expires_secs: u64,
    content_type: String,
    acl: String,
}

/// Inputs for one signature, independent of where credentials come from
struct SigningRequest<'a> {
    method: &'a str,
    scheme: &'a str,
    host: &'a str,
    path: &'a str,
    region: &'a str,
    access_key_id: &'a str,
    secret_access_key: &'a str,
    expires_secs: u64,
    /// Lowercase header names with their values; `host` is added automatically
    headers: Vec<(&'a str, &'a str)>,
    /// Extra query parameters covered by the signature
    query: Vec<(&'a str, &'a str)>,
}

impl S3Presigner {
    pub fn from_config(config: &StorageConfig) -> Result<Self, SignerError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(|e| Url::parse(e).map_err(|_| SignerError::InvalidEndpoint(e.to_string())))
            .transpose()?;

        Ok(Self {
            region: config.region.clone(),
            bucket: config.bucket.clone(),
            access_key_id: config.access_key_id.clone(),
            secret_access_key: config.secret_access_key.clone(),
            session_token: config.session_token.clone(),
            endpoint,
            expires_secs: config.expires_secs,
            content_type: config.content_type.clone(),
            acl: config.acl.clone(),
        })
    }

    /// Presign a `PUT` for `key` as of `now`
    pub fn presign_put_at(&self, key: &str, now: DateTime<Utc>) -> Result<String, SignerError> {
        let bucket = self.bucket.as_deref().ok_or(SignerError::MissingConfig("BUCKET_NAME"))?;
        let access_key_id = self
            .access_key_id
            .as_deref()
            .ok_or(SignerError::MissingConfig("AWS_ACCESS_KEY_ID"))?;
        let secret_access_key = self
            .secret_access_key
            .as_deref()
            .ok_or(SignerError::MissingConfig("AWS_SECRET_ACCESS_KEY"))?;

        let encoded_key = encode_path(key);
        let (scheme, host, path) = match &self.endpoint {
            Some(endpoint) => {
                let host = endpoint
                    .host_str()
                    .ok_or_else(|| SignerError::InvalidEndpoint(endpoint.to_string()))?;
                let host = match endpoint.port() {
                    Some(port) => format!("{}:{}", host, port),
                    None => host.to_string(),
                };
                (endpoint.scheme(), host, format!("/{}/{}", encode_path(bucket), encoded_key))
            }
            None => (
                "https",
                format!("{}.s3.{}.amazonaws.com", bucket, self.region),
                format!("/{}", encoded_key),
            ),
        };

        let mut query = vec![("x-amz-acl", self.acl.as_str())];
        if let Some(token) = self.session_token.as_deref() {
            query.push(("X-Amz-Security-Token", token));
        }

        Ok(sign(
            &SigningRequest {
                method: "PUT",
                scheme,
                host: &host,
                path: &path,
                region: &self.region,
                access_key_id,
                secret_access_key,
                expires_secs: self.expires_secs,
                headers: vec![("content-type", self.content_type.as_str())],
                query,
            },
            now,
        ))
    }
}

#[async_trait]
impl UploadSigner for S3Presigner {
    async fn presign_put(&self, key: &str) -> Result<String, SignerError> {
        self.presign_put_at(key, Utc::now())
    }

    fn expires_secs(&self) -> u64 {
        self.expires_secs
    }
}

fn sign(req: &SigningRequest<'_>, now: DateTime<Utc>) -> String {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();
    let scope = format!("{}/{}/{}/aws4_request", date, req.region, SERVICE);

    let mut headers: Vec<(&str, &str)> = req.headers.clone();
    headers.push(("host", req.host));
    headers.sort_by(|a, b| a.0.cmp(b.0));
    let signed_headers = headers.iter().map(|(name, _)| *name).collect::<Vec<_>>().join(";");
    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, value.trim()))
        .collect();

    let credential = format!("{}/{}", req.access_key_id, scope);
    let expires = req.expires_secs.to_string();
    let mut params: Vec<(String, String)> = vec![
        ("X-Amz-Algorithm", ALGORITHM),
        ("X-Amz-Credential", credential.as_str()),
        ("X-Amz-Date", amz_date.as_str()),
        ("X-Amz-Expires", expires.as_str()),
        ("X-Amz-SignedHeaders", signed_headers.as_str()),
    ]
    .into_iter()
    .chain(req.query.iter().copied())
    .map(|(k, v)| (urlencoding::encode(k).into_owned(), urlencoding::encode(v).into_owned()))
    .collect();
    params.sort();
    let canonical_query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let canonical_request = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        req.method, req.path, canonical_query, canonical_headers, signed_headers, UNSIGNED_PAYLOAD
    );
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        hex::encode(Sha256::digest(canonical_request.as_bytes()))
    );

    let signing_key = signing_key(req.secret_access_key, &date, req.region);
    let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

    format!(
        "{}://{}{}?{}&X-Amz-Signature={}",
        req.scheme, req.host, req.path, canonical_query, signature
    )
}

fn signing_key(secret: &str, date: &str, region: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{}", secret).as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, SERVICE.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// URI-encode each path segment, keeping the separators
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
