use bytes::Bytes;
use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Version prefix shared by every backend endpoint
pub const API_PREFIX: [&str; 2] = ["api", "v1"];

/// Multipart form field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "file";

/// Endpoint layout exposed by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStyle {
    /// `get_uploaded_files`, `upload_file`, `delete_file/{name}`
    #[default]
    Legacy,
    /// `files`, `files`, `files/{name}`
    Rest,
}

impl ApiStyle {
    pub fn list_path(self) -> &'static str {
        match self {
            ApiStyle::Legacy => "get_uploaded_files",
            ApiStyle::Rest => "files",
        }
    }

    pub fn upload_path(self) -> &'static str {
        match self {
            ApiStyle::Legacy => "upload_file",
            ApiStyle::Rest => "files",
        }
    }

    /// Collection segment that the escaped filename is appended to
    pub fn delete_path(self) -> &'static str {
        match self {
            ApiStyle::Legacy => "delete_file",
            ApiStyle::Rest => "files",
        }
    }
}

impl std::str::FromStr for ApiStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(ApiStyle::Legacy),
            "rest" => Ok(ApiStyle::Rest),
            other => Err(format!("unknown api style '{}' (expected legacy or rest)", other)),
        }
    }
}

/// A file known to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub filename: String,
    pub filesize: u64,
    /// ISO-8601 timestamp exactly as the server sent it
    pub upload_time: String,
}

impl FileRecord {
    /// Parse `upload_time` into local time.
    ///
    /// Accepts RFC 3339 with an offset, or a naive timestamp which is taken
    /// to already be local. Returns None for anything else.
    pub fn uploaded_at(&self) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.upload_time) {
            return Some(dt.with_timezone(&Local).naive_local());
        }
        NaiveDateTime::parse_from_str(&self.upload_time, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }
}

/// Body of the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListResponse {
    pub files: Vec<FileRecord>,
}

/// Body of a successful upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filesize: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_time: Option<String>,
}

/// Error envelope: `{ "detail": ... }`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// `detail.message` when detail is an object carrying a string message
    pub fn message(&self) -> Option<&str> {
        self.detail.as_ref()?.get("message")?.as_str()
    }
}

/// Pull the server-provided message out of an error response body
pub fn server_message(body: &[u8]) -> Option<String> {
    let body: ErrorBody = serde_json::from_slice(body).ok()?;
    body.message()
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Part content types by lowercase extension, for the files users usually send
const CONTENT_TYPES: [(&str, &str); 12] = [
    ("pdf", "application/pdf"),
    ("csv", "text/csv"),
    ("txt", "text/plain"),
    ("json", "application/json"),
    ("md", "text/markdown"),
    ("html", "text/html"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("zip", "application/zip"),
    ("xml", "application/xml"),
];

/// Content type for a file name, None when the extension is unknown
pub fn guess_content_type(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    CONTENT_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, content_type)| *content_type)
}

/// A single file to send to the backend
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Original file name, sent as the multipart filename
    pub name: String,
    pub content: Bytes,
    pub content_type: Option<String>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a file from disk, naming the upload after its final path component.
    /// The content type is guessed from the extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("{} does not name a file", path.display()),
                )
            })?;
        let content = tokio::fs::read(path).await?;
        let content_type = guess_content_type(&name);
        let upload = Self::new(name, content);
        Ok(match content_type {
            Some(content_type) => upload.with_content_type(content_type),
            None => upload,
        })
    }

    pub fn len(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_file_list() {
        let json = br#"{"files":[
            {"filename":"a.txt","filesize":12,"upload_time":"2024-05-01T10:00:00"},
            {"filename":"b.csv","filesize":0,"upload_time":"2024-05-01T09:00:00.123456"}
        ]}"#;
        let list: FileListResponse = serde_json::from_slice(json).unwrap();
        assert_eq!(list.files.len(), 2);
        // server order is preserved
        assert_eq!(list.files[0].filename, "a.txt");
        assert_eq!(list.files[1].filesize, 0);
    }

    #[test]
    fn test_decode_list_rejects_negative_size() {
        let json = br#"{"files":[{"filename":"a","filesize":-1,"upload_time":"x"}]}"#;
        assert!(serde_json::from_slice::<FileListResponse>(json).is_err());
    }

    #[test]
    fn test_upload_receipt_minimal_and_full() {
        let r: UploadReceipt = serde_json::from_str(r#"{"filename":"report.pdf"}"#).unwrap();
        assert_eq!(r.filename, "report.pdf");
        assert!(r.filesize.is_none());

        let r: UploadReceipt = serde_json::from_str(
            r#"{"filename":"report.pdf","filesize":2048,"upload_time":"2024-05-01T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(r.filesize, Some(2048));
    }

    #[test]
    fn test_server_message_extraction() {
        let body = br#"{"detail":{"error":"File already uploaded.","message":"File a.pdf has already been uploaded."}}"#;
        assert_eq!(
            server_message(body).as_deref(),
            Some("File a.pdf has already been uploaded.")
        );

        // FastAPI string and validation-list details carry no message
        assert_eq!(server_message(br#"{"detail":"Not Found"}"#), None);
        assert_eq!(server_message(br#"{"detail":[{"loc":["body","file"]}]}"#), None);
        assert_eq!(server_message(br#"{"detail":{"message":["set"]}}"#), None);
        assert_eq!(server_message(b"<html>bad gateway</html>"), None);
        assert_eq!(server_message(b""), None);
    }

    #[test]
    fn test_uploaded_at_naive() {
        let rec = FileRecord {
            filename: "a".into(),
            filesize: 1,
            upload_time: "2024-05-01T10:20:30.123456".into(),
        };
        let dt = rec.uploaded_at().unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-05-01 10:20:30");
    }

    #[test]
    fn test_uploaded_at_with_offset_and_garbage() {
        let rec = FileRecord {
            filename: "a".into(),
            filesize: 1,
            upload_time: "2024-05-01T10:20:30Z".into(),
        };
        assert!(rec.uploaded_at().is_some());

        let rec = FileRecord {
            upload_time: "yesterday".into(),
            ..rec
        };
        assert!(rec.uploaded_at().is_none());
    }

    #[test]
    fn test_api_style_paths() {
        assert_eq!(ApiStyle::default(), ApiStyle::Legacy);
        assert_eq!(ApiStyle::Legacy.list_path(), "get_uploaded_files");
        assert_eq!(ApiStyle::Legacy.upload_path(), "upload_file");
        assert_eq!(ApiStyle::Legacy.delete_path(), "delete_file");
        assert_eq!(ApiStyle::Rest.list_path(), "files");
        assert_eq!("REST".parse::<ApiStyle>().unwrap(), ApiStyle::Rest);
        assert!("grpc".parse::<ApiStyle>().is_err());
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type("report.pdf"), Some("application/pdf"));
        assert_eq!(guess_content_type("Q1 Sales.CSV"), Some("text/csv"));
        assert_eq!(guess_content_type("archive.tar.zip"), Some("application/zip"));
        assert_eq!(guess_content_type("setup.exe"), None);
        assert_eq!(guess_content_type("README"), None);
        assert_eq!(guess_content_type(".pdf"), None);
    }

    #[tokio::test]
    async fn test_file_upload_from_path() {
        let dir = std::env::temp_dir().join(format!("upload-core-api-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let upload = FileUpload::from_path(&path).await.unwrap();
        assert_eq!(upload.name, "notes.txt");
        assert_eq!(upload.len(), 5);
        assert_eq!(upload.content_type.as_deref(), Some("text/plain"));

        let blob = dir.join("dump.bin");
        std::fs::write(&blob, [0u8, 1, 2]).unwrap();
        let upload = FileUpload::from_path(&blob).await.unwrap();
        assert!(upload.content_type.is_none());

        assert!(FileUpload::from_path(&dir.join("missing.txt")).await.is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
