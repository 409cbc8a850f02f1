//! Cart document storage.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use tokio::{fs, sync::RwLock};

use crate::domain::{carts::errors::PersistenceError, users::UserId};

/// Durable storage of one raw cart document per user.
#[automock]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Load the stored document bytes, `None` when the user has never saved a
    /// cart. The bytes are not checked for encoding or shape.
    async fn load(&self, user: &UserId) -> Result<Option<Vec<u8>>, PersistenceError>;

    /// Replace the stored document as a whole.
    async fn store(&self, user: &UserId, document: Vec<u8>) -> Result<(), PersistenceError>;
}

/// Documents held in process memory; lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryCartRepository {
    documents: RwLock<FxHashMap<UserId, Vec<u8>>>,
}

impl InMemoryCartRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn load(&self, user: &UserId) -> Result<Option<Vec<u8>>, PersistenceError> {
        Ok(self.documents.read().await.get(user).cloned())
    }

    async fn store(&self, user: &UserId, document: Vec<u8>) -> Result<(), PersistenceError> {
        self.documents.write().await.insert(user.clone(), document);

        Ok(())
    }
}

/// One `<user>.json` file per user under a data directory.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so readers never observe a half-written document.
#[derive(Debug, Clone)]
pub struct FileCartRepository {
    dir: PathBuf,
}

impl FileCartRepository {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the documents are stored in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, user: &UserId) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(user)))
    }
}

#[async_trait]
impl CartRepository for FileCartRepository {
    async fn load(&self, user: &UserId) -> Result<Option<Vec<u8>>, PersistenceError> {
        match fs::read(self.path_for(user)).await {
            Ok(document) => Ok(Some(document)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn store(&self, user: &UserId, document: Vec<u8>) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir).await?;

        let target = self.path_for(user);
        let staging = self.dir.join(format!(".{}.json.tmp", file_stem(user)));

        fs::write(&staging, document).await?;
        fs::rename(&staging, &target).await?;

        Ok(())
    }
}

/// File-name-safe form of a user id. Bytes outside `[A-Za-z0-9_-]` are hex
/// escaped so distinct ids never share a file.
fn file_stem(user: &UserId) -> String {
    let mut stem = String::with_capacity(user.as_str().len());

    for byte in user.as_str().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("%{byte:02x}"));
        }
    }

    stem
}
