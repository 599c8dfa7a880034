use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque identifier for the project an action runs against.
///
/// Hosts usually derive it with [`project_hash_from_root`], but any opaque
/// string is accepted; the analytics backend never inspects the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectHash(String);

impl ProjectHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProjectHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectHash {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ProjectHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Calculate a [`ProjectHash`] from a project root path using SHA256.
///
/// The path is normalized before hashing so symlinked and relative spellings
/// of the same root produce the same hash.
pub fn project_hash_from_root(project_root: &str) -> ProjectHash {
    let normalized = normalize_path(Path::new(project_root));
    let path_str = normalized.to_string_lossy();

    let mut hasher = Sha256::new();
    hasher.update(path_str.as_bytes());
    ProjectHash::new(format!("{:x}", hasher.finalize()))
}

fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_hash_deterministic() {
        let a = project_hash_from_root("/opt/does-not-exist/project-a");
        let b = project_hash_from_root("/opt/does-not-exist/project-a");
        assert_eq!(a, b);
    }

    #[test]
    fn test_project_hash_differs_per_root() {
        let a = project_hash_from_root("/opt/does-not-exist/project-a");
        let b = project_hash_from_root("/opt/does-not-exist/project-b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_project_hash_is_hex_digest() {
        let hash = project_hash_from_root("/opt/does-not-exist/project-a");
        assert_eq!(hash.as_str().len(), 64);
        assert!(hash.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_opaque_values_accepted() {
        let hash = ProjectHash::new("some.phash.value");
        assert_eq!(hash.as_str(), "some.phash.value");
        assert_eq!(hash.to_string(), "some.phash.value");
    }
}
