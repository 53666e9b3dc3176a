use std::sync::Mutex;

use expense_core::storage::JsonFileStore;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated file store backed by a unique directory for each test.
pub fn setup_file_store() -> JsonFileStore {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    JsonFileStore::new(Some(base)).expect("create json file store")
}
