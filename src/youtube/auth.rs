//! OAuth token acquisition and storage.
//!
//! Credential persistence is behind the `TokenStore` trait so tests and
//! alternative front ends can inject their own storage instead of touching
//! the user's data directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SCOPE: &str = "https://www.googleapis.com/auth/youtube.readonly";
const REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Token material as returned by the Google token endpoint and as persisted
/// between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Where tokens live between runs.
pub trait TokenStore {
    /// A previously saved token, if any. Unreadable or malformed stored
    /// state counts as "no token" and triggers a fresh consent flow.
    fn load(&self) -> Option<StoredToken>;

    fn save(&self, token: &StoredToken) -> Result<(), AuthError>;
}

/// Token storage as a JSON file, by default under the platform data
/// directory (`~/.local/share/keeplist/token.json` on Linux).
pub struct DiskTokenStore {
    path: PathBuf,
}

impl DiskTokenStore {
    pub fn new(path: PathBuf) -> Self {
        DiskTokenStore { path }
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "keeplist")
            .map(|dirs| dirs.data_dir().join("token.json"))
    }
}

impl TokenStore for DiskTokenStore {
    fn load(&self) -> Option<StoredToken> {
        let data = fs::read(&self.path).ok()?;
        serde_json::from_slice(&data).ok()
    }

    fn save(&self, token: &StoredToken) -> Result<(), AuthError> {
        let write = || -> io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let data = serde_json::to_vec(token).map_err(io::Error::other)?;
            write_private(&self.path, &data)
        };

        write().map_err(|source| AuthError::StoreToken {
            path: self.path.clone(),
            source,
        })
    }
}

/// Token material must stay owner-readable only.
#[cfg(unix)]
fn write_private(path: &Path, data: &[u8]) -> io::Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(data)?;

    // the creation mode doesn't apply to a pre-existing file, tighten it too
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn write_private(path: &Path, data: &[u8]) -> io::Result<()> {
    fs::write(path, data)
}

pub struct Authenticator {
    client_id: String,
    client_secret: String,
    store: Box<dyn TokenStore>,
    http: Client,
}

impl Authenticator {
    pub fn new(client_id: String, client_secret: String, store: Box<dyn TokenStore>) -> Self {
        Authenticator {
            client_id,
            client_secret,
            store,
            http: Client::new(),
        }
    }

    /// A usable access token: refreshed from the stored refresh token when
    /// possible, otherwise obtained through the interactive consent flow
    /// and saved for the next run.
    pub fn access_token(&self) -> Result<String, AuthError> {
        if let Some(stored) = self.store.load() {
            match &stored.refresh_token {
                Some(refresh_token) => match self.refresh(refresh_token) {
                    Ok(refreshed) => {
                        self.store.save(&refreshed)?;
                        return Ok(refreshed.access_token);
                    }
                    Err(e) => {
                        // revoked or expired grant, fall through to a fresh consent
                        eprintln!("stored token refresh failed ({e}), re-authorizing");
                    }
                },
                None => return Ok(stored.access_token),
            }
        }

        let token = self.consent_flow()?;
        self.store.save(&token)?;
        Ok(token.access_token)
    }

    fn consent_flow(&self) -> Result<StoredToken, AuthError> {
        let auth_url = reqwest::Url::parse_with_params(
            AUTH_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", REDIRECT_URI),
                ("response_type", "code"),
                ("scope", SCOPE),
                ("access_type", "offline"),
            ],
        )
        .map_err(|e| AuthError::BuildUrl(e.to_string()))?;

        println!("Visit this URL to authorize access:\n{auth_url}");
        print!("Enter the authorization code: ");
        io::stdout().flush().map_err(AuthError::ReadCode)?;

        let mut code = String::new();
        io::stdin()
            .read_line(&mut code)
            .map_err(AuthError::ReadCode)?;

        self.exchange(&[
            ("code", code.trim()),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("redirect_uri", REDIRECT_URI),
            ("grant_type", "authorization_code"),
        ])
    }

    fn refresh(&self, refresh_token: &str) -> Result<StoredToken, AuthError> {
        let mut refreshed = self.exchange(&[
            ("refresh_token", refresh_token),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("grant_type", "refresh_token"),
        ])?;

        // a refresh response usually omits the refresh token, keep the old one
        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token = Some(refresh_token.to_string());
        }
        Ok(refreshed)
    }

    fn exchange(&self, params: &[(&str, &str)]) -> Result<StoredToken, AuthError> {
        let response = self.http.post(TOKEN_URL).form(params).send()?;

        if !response.status().is_success() {
            return Err(AuthError::Exchange {
                status: response.status().as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        Ok(response.json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_through_disk_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskTokenStore::new(dir.path().join("state").join("token.json"));

        assert!(store.load().is_none());

        let token = StoredToken {
            access_token: "at".to_string(),
            refresh_token: Some("rt".to_string()),
        };
        store.save(&token).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.access_token, "at");
        assert_eq!(loaded.refresh_token.as_deref(), Some("rt"));
    }

    #[cfg(unix)]
    #[test]
    fn saved_token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let store = DiskTokenStore::new(path.clone());

        let token = StoredToken {
            access_token: "at".to_string(),
            refresh_token: None,
        };
        store.save(&token).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        // re-saving over a loose pre-existing file must tighten it as well
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        store.save(&token).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn malformed_stored_token_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, b"{not json").unwrap();

        assert!(DiskTokenStore::new(path).load().is_none());
    }
}
