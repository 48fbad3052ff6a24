//! Workspace file store: the on-disk files the learner edits.
//!
//! Files live at `<root>/level-NN/challenge-NN.tyro`, seeded from the
//! challenge's scaffold. The validator only ever reads; creating and
//! resetting happen here, driven by the caller.

use std::fs;
use std::path::{Path, PathBuf};

use crate::challenge::ChallengeSpec;
use crate::error::EngineError;

/// Handle to the workspace directory.
#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    root: PathBuf,
}

impl WorkspaceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the workspace file for a challenge.
    pub fn path_for(&self, challenge: &ChallengeSpec) -> PathBuf {
        self.root
            .join(format!("level-{:02}", challenge.level))
            .join(format!("challenge-{:02}.tyro", challenge.number))
    }

    /// Ensure the workspace file exists, seeding it with the scaffold when
    /// absent. Returns the path.
    pub fn ensure(&self, challenge: &ChallengeSpec) -> Result<PathBuf, EngineError> {
        let path = self.path_for(challenge);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| EngineError::io(dir, e))?;
        }
        if !path.exists() {
            fs::write(&path, &challenge.scaffold).map_err(|e| EngineError::io(&path, e))?;
        }
        Ok(path)
    }

    /// Overwrite the workspace file with the scaffold. Returns the path.
    pub fn reset(&self, challenge: &ChallengeSpec) -> Result<PathBuf, EngineError> {
        let path = self.path_for(challenge);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| EngineError::io(dir, e))?;
        }
        fs::write(&path, &challenge.scaffold).map_err(|e| EngineError::io(&path, e))?;
        Ok(path)
    }

    /// Read a workspace file's source text.
    pub fn read(&self, path: &Path) -> Result<String, EngineError> {
        fs::read_to_string(path).map_err(|e| EngineError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::{ChallengeSpec, Difficulty};

    fn challenge() -> ChallengeSpec {
        ChallengeSpec {
            id: "L1-C2".into(),
            level: 1,
            number: 2,
            title: "t".into(),
            description: "d".into(),
            mission: "m".into(),
            difficulty: Difficulty::Easy,
            xp: 10,
            scaffold: "// scaffold\n".into(),
            solution: "// solution\n".into(),
            hints: vec![],
            tests: vec![],
        }
    }

    #[test]
    fn test_path_layout() {
        let store = WorkspaceStore::new("/tmp/ws");
        let path = store.path_for(&challenge());
        assert!(path.ends_with("level-01/challenge-02.tyro"));
    }

    #[test]
    fn test_ensure_seeds_scaffold_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = WorkspaceStore::new(dir.path());
        let challenge = challenge();

        let path = store.ensure(&challenge).unwrap();
        assert_eq!(store.read(&path).unwrap(), "// scaffold\n");

        // A second ensure must not clobber learner edits
        std::fs::write(&path, "my work").unwrap();
        store.ensure(&challenge).unwrap();
        assert_eq!(store.read(&path).unwrap(), "my work");
    }

    #[test]
    fn test_reset_overwrites_with_scaffold() {
        let dir = tempfile::tempdir().unwrap();
        let store = WorkspaceStore::new(dir.path());
        let challenge = challenge();

        let path = store.ensure(&challenge).unwrap();
        std::fs::write(&path, "my work").unwrap();
        store.reset(&challenge).unwrap();
        assert_eq!(store.read(&path).unwrap(), "// scaffold\n");
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let store = WorkspaceStore::new("/tmp/ws");
        let err = store.read(Path::new("/tmp/ws/definitely-missing.tyro"));
        assert!(matches!(err, Err(EngineError::Io { .. })));
    }
}
