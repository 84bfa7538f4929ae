//! Credential storage.
//!
//! The credentials file is a small JSON document written with owner-only
//! permissions on unix:
//!
//! ```json
//! {
//!   "access_token": "ya29...",
//!   "refresh": {
//!     "refresh_token": "1//0g...",
//!     "client_id": "1234.apps.googleusercontent.com",
//!     "client_secret": "..."
//!   }
//! }
//! ```
//!
//! `refresh` is optional. With it, the client trades the refresh token for a
//! new access token when the old one expires and saves the result here.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, AuthError};

pub const CREDENTIALS_FILE: &str = "auth.json";

/// Google's OAuth 2.0 token endpoint.
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<RefreshGrant>,
}

/// What the token endpoint needs to issue a new access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshGrant {
    pub refresh_token: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Credentials with an access token only; they stop working once it
    /// expires.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh: None,
        }
    }

    pub fn with_refresh(self, grant: RefreshGrant) -> Self {
        Self {
            refresh: Some(grant),
            ..self
        }
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh.is_some()
    }
}

/// `<config dir>/tubemirror/auth.json`.
pub fn default_credentials_path() -> Result<PathBuf, AuthError> {
    dirs::config_dir()
        .map(|dir| dir.join("tubemirror").join(CREDENTIALS_FILE))
        .ok_or(AuthError::ConfigDirNotFound)
}

/// Load credentials, failing with [`AuthError::NotAuthenticated`] when the
/// file is missing or holds an empty token.
pub fn load_at(path: &Path) -> Result<Credentials, AuthError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AuthError::NotAuthenticated {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(io_err(path, e)),
    };
    let credentials: Credentials = serde_json::from_str(&text).map_err(|source| AuthError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if credentials.access_token.trim().is_empty() {
        return Err(AuthError::NotAuthenticated {
            path: path.to_path_buf(),
        });
    }
    Ok(credentials)
}

/// Write credentials atomically (tmp + rename).
pub fn save_at(path: &Path, credentials: &Credentials) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let json = serde_json::to_string_pretty(credentials)?;
    let tmp = path.with_extension("json.tmp");

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(&tmp).map_err(|e| io_err(&tmp, e))?;
    file.write_all(json.as_bytes()).map_err(|e| io_err(&tmp, e))?;
    drop(file);

    fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
    tracing::debug!("saved credentials to {}", path.display());
    Ok(())
}

/// Capture credentials through `prompt` and save them to `path`.
///
/// `prompt` is called once per question and returns the user's answer. The
/// refresh token is optional; when one is given, the OAuth client id and
/// secret that issued it are required too.
pub fn authenticate<F>(path: &Path, mut prompt: F) -> Result<Credentials, AuthError>
where
    F: FnMut(&str) -> std::io::Result<String>,
{
    let mut ask = |question: &str| -> Result<String, AuthError> {
        let answer = prompt(question).map_err(|e| io_err(path, e))?;
        Ok(answer.trim().to_string())
    };

    let access_token = ask(ACCESS_TOKEN_QUESTION)?;
    if access_token.is_empty() {
        return Err(AuthError::EmptyToken);
    }
    let mut credentials = Credentials::new(access_token);

    let refresh_token = ask(REFRESH_TOKEN_QUESTION)?;
    if !refresh_token.is_empty() {
        let client_id = ask(CLIENT_ID_QUESTION)?;
        let client_secret = ask(CLIENT_SECRET_QUESTION)?;
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(AuthError::IncompleteRefreshGrant);
        }
        credentials = credentials.with_refresh(RefreshGrant {
            refresh_token,
            client_id,
            client_secret,
        });
    } else {
        tracing::warn!("no refresh token given; the access token expires within the hour");
    }

    save_at(path, &credentials)?;
    Ok(credentials)
}

const ACCESS_TOKEN_QUESTION: &str = "Create an OAuth access token with the \
    https://www.googleapis.com/auth/youtube.readonly scope and paste it here.\n\
    Access token";
const REFRESH_TOKEN_QUESTION: &str = "Refresh token (Enter to skip)";
const CLIENT_ID_QUESTION: &str = "OAuth client id";
const CLIENT_SECRET_QUESTION: &str = "OAuth client secret";
