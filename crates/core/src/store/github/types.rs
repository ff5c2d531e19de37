/// Request and response bodies of the GitHub repository contents API.
use serde::{Deserialize, Serialize};

/// `PUT /repos/{repo}/contents/{path}`. Omitting `sha` creates the file;
/// GitHub refuses to overwrite an existing file without it.
#[derive(Debug, Serialize)]
pub struct PutFileRequest<'a> {
    pub message: &'a str,
    /// Base64 of the full new file content.
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<&'a str>,
}

/// `DELETE /repos/{repo}/contents/{path}`.
#[derive(Debug, Serialize)]
pub struct DeleteFileRequest<'a> {
    pub message: &'a str,
    pub sha: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<&'a str>,
}

/// Single file returned by `GET /repos/{repo}/contents/{path}`.
#[derive(Debug, Deserialize)]
pub struct FileResponse {
    pub sha: String,
    /// Base64 wrapped at 60 columns. Empty for files above 1 MB.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: String,
}

/// One element of a directory listing.
#[derive(Debug, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub sha: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct PutFileResponse {
    pub content: CommittedFile,
}

#[derive(Debug, Deserialize)]
pub struct CommittedFile {
    pub sha: String,
}

/// Error body GitHub sends with non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: String,
}
