//! Host command payloads for upload and download requests.
//!
//! Commands arrive from the host shell as JSON; every optional field carries
//! the default the original bridge contract promises, so a minimal payload
//! of `source`/`target`/`object_id` is always valid.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::TransferError;

/// Reserved key in the headers map that sets the Cookie header instead of a
/// custom header.
pub const OPTIONS_KEY_COOKIE: &str = "__cookie";

/// Identifier the host uses to address one in-flight transfer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random id for commands that omit one.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// HTTP method for uploads. Only POST and PUT are part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadMethod {
    #[default]
    Post,
    Put,
}

impl UploadMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadMethod::Post => "post",
            UploadMethod::Put => "put",
        }
    }
}

impl FromStr for UploadMethod {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "post" => Ok(UploadMethod::Post),
            "put" => Ok(UploadMethod::Put),
            _ => Err(TransferError::InvalidUploadMethod(s.to_string())),
        }
    }
}

fn default_file_key() -> String {
    "file".to_string()
}

fn default_file_name() -> String {
    "image.jpg".to_string()
}

fn default_mime_type() -> String {
    "image/jpeg".to_string()
}

fn default_chunked() -> bool {
    true
}

/// Upload request: push a container file to a server URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadCommand {
    /// Container path of the file to send
    pub source: String,
    /// Server URL receiving the file
    pub target: String,
    /// Multipart field name for the file part
    #[serde(default = "default_file_key")]
    pub file_key: String,
    /// File name presented to the server
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// MIME type of the file part
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    /// Extra text fields added to the multipart body
    #[serde(default)]
    pub params: HashMap<String, String>,
    /// Request headers; may contain [`OPTIONS_KEY_COOKIE`]
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Stream without a declared Content-Length. On by default, matching the
    /// host API.
    #[serde(default = "default_chunked")]
    pub chunked_mode: bool,
    #[serde(default)]
    pub trust_all_hosts: bool,
    #[serde(default = "ObjectId::generate")]
    pub object_id: ObjectId,
    #[serde(default)]
    pub http_method: UploadMethod,
}

impl UploadCommand {
    /// Create an upload command with the host API defaults.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            file_key: default_file_key(),
            file_name: default_file_name(),
            mime_type: default_mime_type(),
            params: HashMap::new(),
            headers: HashMap::new(),
            chunked_mode: default_chunked(),
            trust_all_hosts: false,
            object_id: ObjectId::generate(),
            http_method: UploadMethod::default(),
        }
    }
}

/// Download request: stream a URL into a container file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadCommand {
    /// Server URL to fetch
    pub source: String,
    /// Container path the body is written to
    pub target: String,
    /// Request headers; may contain [`OPTIONS_KEY_COOKIE`]
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub trust_all_hosts: bool,
    #[serde(default = "ObjectId::generate")]
    pub object_id: ObjectId,
}

impl DownloadCommand {
    /// Create a download command with the host API defaults.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            headers: HashMap::new(),
            trust_all_hosts: false,
            object_id: ObjectId::generate(),
        }
    }
}

/// Split the reserved cookie entry out of a headers map.
///
/// The reserved key wins over an explicit `Cookie` header: both are removed
/// from the ordinary set, and the returned cookie value is the reserved one
/// when present, the explicit one otherwise.
pub fn split_cookie_header(
    headers: &HashMap<String, String>,
) -> (HashMap<String, String>, Option<String>) {
    let mut plain = HashMap::new();
    let mut reserved = None;
    let mut explicit = None;

    for (name, value) in headers {
        if name == OPTIONS_KEY_COOKIE {
            reserved = Some(value.clone());
        } else if name.eq_ignore_ascii_case("cookie") {
            explicit = Some(value.clone());
        } else {
            plain.insert(name.clone(), value.clone());
        }
    }

    (plain, reserved.or(explicit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_generate_unique() {
        assert_ne!(ObjectId::generate(), ObjectId::generate());
    }

    #[test]
    fn test_upload_method_parsing() {
        assert_eq!("POST".parse::<UploadMethod>().unwrap(), UploadMethod::Post);
        assert_eq!("put".parse::<UploadMethod>().unwrap(), UploadMethod::Put);
        assert!("delete".parse::<UploadMethod>().is_err());
    }

    #[test]
    fn test_minimal_upload_command_defaults() {
        let cmd: UploadCommand = serde_json::from_str(
            r#"{"source":"photos/a.jpg","target":"https://example.com/up","object_id":"u1"}"#,
        )
        .unwrap();

        assert_eq!(cmd.file_key, "file");
        assert_eq!(cmd.file_name, "image.jpg");
        assert_eq!(cmd.mime_type, "image/jpeg");
        assert!(cmd.chunked_mode);
        assert!(!cmd.trust_all_hosts);
        assert_eq!(cmd.http_method, UploadMethod::Post);
        assert_eq!(cmd.object_id.as_str(), "u1");
    }

    #[test]
    fn test_download_command_generates_object_id() {
        let cmd: DownloadCommand =
            serde_json::from_str(r#"{"source":"https://example.com/f","target":"f.bin"}"#).unwrap();
        assert!(!cmd.object_id.as_str().is_empty());
    }

    #[test]
    fn test_split_cookie_reserved_key_wins() {
        let mut headers = HashMap::new();
        headers.insert("Cookie".to_string(), "plain=1".to_string());
        headers.insert(OPTIONS_KEY_COOKIE.to_string(), "session=abc".to_string());
        headers.insert("X-Custom".to_string(), "v".to_string());

        let (plain, cookie) = split_cookie_header(&headers);
        assert_eq!(cookie.as_deref(), Some("session=abc"));
        assert_eq!(plain.len(), 1);
        assert_eq!(plain.get("X-Custom").map(String::as_str), Some("v"));
    }

    #[test]
    fn test_split_cookie_falls_back_to_explicit_header() {
        let mut headers = HashMap::new();
        headers.insert("cookie".to_string(), "plain=1".to_string());

        let (plain, cookie) = split_cookie_header(&headers);
        assert_eq!(cookie.as_deref(), Some("plain=1"));
        assert!(plain.is_empty());
    }
}
