use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use interactions_shared::types::{ActorId, CachedVote, TargetId};

use super::Entries;
use crate::errors::CacheError;
use crate::interfaces::LocalVoteCache;

#[derive(Debug, Default)]
struct State {
    entries: Entries,
    dirty: bool,
}

/// Vote cache mirrored to a JSON file.
///
/// The file holds the owning actor next to the votes. Changes stay in memory
/// until `flush`, which also runs when the cache is dropped; the trait
/// methods never touch the disk. Write failures on drop are logged and
/// otherwise ignored since the remote store stays the source of truth.
#[derive(Debug)]
pub struct FileVoteCache {
    path: PathBuf,
    state: Mutex<State>,
}

impl FileVoteCache {
    /// Opens the cache at `path`, loading any previous contents.
    ///
    /// # Arguments
    ///
    /// * `path` - The JSON file backing the cache. It does not need to exist.
    ///
    /// # Returns
    ///
    /// * `Ok(FileVoteCache)` - The loaded cache, empty if the file is missing
    /// * `Err(CacheError)` - If the file exists but cannot be read or parsed
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => Entries::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Entries::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            state: Mutex::new(State {
                entries,
                dirty: false,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes pending changes to disk. Does nothing when there are none.
    pub fn flush(&self) -> Result<(), CacheError> {
        let mut state = self.state();
        if !state.dirty {
            return Ok(());
        }

        let bytes = serde_json::to_vec(&state.entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        state.dirty = false;
        Ok(())
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LocalVoteCache for FileVoteCache {
    fn owner(&self) -> Option<ActorId> {
        self.state().entries.owner.clone()
    }

    fn get(&self, target: &TargetId) -> Option<CachedVote> {
        self.state().entries.votes.get(target).copied()
    }

    fn set(&self, target: &TargetId, vote: CachedVote) {
        let mut state = self.state();
        state.entries.votes.insert(target.clone(), vote);
        state.dirty = true;
    }

    fn reset(&self, owner: &ActorId) {
        let mut state = self.state();
        state.entries.reset(Some(owner));
        state.dirty = true;
    }

    fn clear(&self) {
        let mut state = self.state();
        state.entries.reset(None);
        state.dirty = true;
    }
}

impl Drop for FileVoteCache {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist vote cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use interactions_shared::types::VoteState;

    fn vote(state: VoteState) -> CachedVote {
        CachedVote {
            flags: state.flags(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileVoteCache::open(dir.path().join("votes.json")).unwrap();
        assert!(cache.get(&TargetId::new("listing-42").unwrap()).is_none());
        assert!(cache.owner().is_none());
    }

    #[test]
    fn test_entries_and_owner_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("votes.json");
        let target = TargetId::new("listing-42").unwrap();
        let owner = ActorId::new("0xAAA").unwrap();
        let disliked = vote(VoteState::Disliked);

        {
            let cache = FileVoteCache::open(&path).unwrap();
            cache.reset(&owner);
            cache.set(&target, disliked);
        }

        let reopened = FileVoteCache::open(&path).unwrap();
        assert_eq!(reopened.owner(), Some(owner));
        assert_eq!(reopened.get(&target), Some(disliked));
    }

    #[test]
    fn test_set_stays_in_memory_until_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("votes.json");
        let target = TargetId::new("listing-42").unwrap();

        let cache = FileVoteCache::open(&path).unwrap();
        cache.set(&target, vote(VoteState::Liked));
        assert!(!path.exists());

        cache.flush().unwrap();
        assert!(FileVoteCache::open(&path).unwrap().get(&target).is_some());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("votes.json");
        fs::write(&path, b"{not json").unwrap();

        assert!(matches!(
            FileVoteCache::open(&path),
            Err(CacheError::SerializeError(_))
        ));
    }

    #[test]
    fn test_clear_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("votes.json");
        let target = TargetId::new("comment-7").unwrap();

        let cache = FileVoteCache::open(&path).unwrap();
        cache.reset(&ActorId::new("0xAAA").unwrap());
        cache.set(&target, vote(VoteState::Liked));
        cache.flush().unwrap();
        cache.clear();
        drop(cache);

        let reopened = FileVoteCache::open(&path).unwrap();
        assert!(reopened.get(&target).is_none());
        assert!(reopened.owner().is_none());
    }
}
