use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

/// Static credential directory. Passwords are compared in plaintext; this
/// is a demo sign-in gate, not an authentication system.
const USERS: &[(&str, &str)] = &[
    ("deepalimurale", "deepalimurale@lumantra"),
    ("ojaswi", "ojaswi@lumantra"),
    ("dhruv", "dhruv@lumantra"),
];

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Generic on purpose: does not distinguish unknown-user from
    /// wrong-password.
    #[error("Invalid credentials. Please try again.")]
    InvalidCredentials,
    #[error("failed to access session storage at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Tracks the signed-in user and persists it as a single plain-text file,
/// the durable-storage analog of the original's one localStorage key.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage_path: PathBuf,
    current_user: Option<String>,
}

impl SessionStore {
    /// Session file under the platform data directory, falling back to the
    /// current directory when no data directory is available.
    pub fn default_storage_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lumantra")
            .join("logged_in_user")
    }

    pub fn new(storage_path: PathBuf) -> Self {
        Self {
            storage_path,
            current_user: None,
        }
    }

    /// Reads any previously persisted username and activates that session
    /// without re-validating credentials.
    pub fn restore(storage_path: PathBuf) -> Result<Self, SessionError> {
        let current_user = match fs::read_to_string(&storage_path) {
            Ok(contents) => {
                let user = contents.trim().to_string();
                if user.is_empty() { None } else { Some(user) }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                return Err(SessionError::Storage {
                    path: storage_path,
                    source: err,
                });
            }
        };
        Ok(Self {
            storage_path,
            current_user,
        })
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    /// Checks the submitted pair against the static directory. On match the
    /// username is persisted and the session activated; on mismatch nothing
    /// is persisted and the generic error is returned.
    pub fn sign_in(&mut self, username: &str, password: &str) -> Result<(), SessionError> {
        let known = USERS
            .iter()
            .any(|(user, pass)| *user == username && *pass == password);
        if !known {
            return Err(SessionError::InvalidCredentials);
        }
        self.persist(username)?;
        self.current_user = Some(username.to_string());
        debug!("session activated for {username}");
        Ok(())
    }

    /// Clears persisted state and deactivates the session.
    pub fn sign_out(&mut self) -> Result<(), SessionError> {
        match fs::remove_file(&self.storage_path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(SessionError::Storage {
                    path: self.storage_path.clone(),
                    source: err,
                });
            }
        }
        self.current_user = None;
        Ok(())
    }

    fn persist(&self, username: &str) -> Result<(), SessionError> {
        let storage_err = |source| SessionError::Storage {
            path: self.storage_path.clone(),
            source,
        };
        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent).map_err(storage_err)?;
        }
        let tmp_path = tmp_path(&self.storage_path);
        fs::write(&tmp_path, username).map_err(storage_err)?;
        fs::rename(&tmp_path, &self.storage_path).map_err(storage_err)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let mut file_name = path
        .file_name()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    file_name.push(".tmp");
    tmp.set_file_name(file_name);
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("logged_in_user"))
    }

    #[test]
    fn valid_credentials_activate_and_persist() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = store_in(&dir);
        store.sign_in("ojaswi", "ojaswi@lumantra").expect("sign in");
        assert_eq!(store.current_user(), Some("ojaswi"));

        let restored = SessionStore::restore(dir.path().join("logged_in_user")).expect("restore");
        assert_eq!(restored.current_user(), Some("ojaswi"));
    }

    #[test]
    fn wrong_password_and_unknown_user_fail_identically() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = store_in(&dir);

        let wrong_pass = store
            .sign_in("ojaswi", "wrong")
            .expect_err("wrong password rejected");
        let unknown = store
            .sign_in("nobody", "whatever")
            .expect_err("unknown user rejected");
        assert_eq!(wrong_pass.to_string(), unknown.to_string());
        assert_eq!(store.current_user(), None);
        assert!(!dir.path().join("logged_in_user").exists());
    }

    #[test]
    fn sign_out_clears_persisted_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = store_in(&dir);
        store.sign_in("dhruv", "dhruv@lumantra").expect("sign in");
        store.sign_out().expect("sign out");
        assert_eq!(store.current_user(), None);

        let restored = SessionStore::restore(dir.path().join("logged_in_user")).expect("restore");
        assert_eq!(restored.current_user(), None);
    }

    #[test]
    fn restore_from_missing_file_is_signed_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::restore(dir.path().join("logged_in_user")).expect("restore");
        assert_eq!(store.current_user(), None);
    }
}
