//! Nullable object storage: in-memory uploads with predictable URIs.

use async_trait::async_trait;
use ballot_adapters::{AdapterError, ObjectStorage};
use ballot_types::SymbolFile;
use std::sync::Mutex;

enum Behaviour {
    /// Answer `ipfs://null/<n>/<file name>` per file.
    Addressed,
    /// Answer this exact list.
    Fixed(Vec<String>),
    Failing,
}

/// A test object store.
pub struct NullStorage {
    behaviour: Mutex<Behaviour>,
    uploads: Mutex<Vec<Vec<SymbolFile>>>,
}

impl NullStorage {
    pub fn new() -> Self {
        Self::with(Behaviour::Addressed)
    }

    /// Every upload fails.
    pub fn failing() -> Self {
        Self::with(Behaviour::Failing)
    }

    /// Every upload answers exactly `uris`, whatever was sent.
    pub fn returning(uris: Vec<String>) -> Self {
        Self::with(Behaviour::Fixed(uris))
    }

    fn with(behaviour: Behaviour) -> Self {
        Self {
            behaviour: Mutex::new(behaviour),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// Every batch passed to `upload`, including failed ones.
    pub fn uploads(&self) -> Vec<Vec<SymbolFile>> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

impl Default for NullStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStorage for NullStorage {
    async fn upload(&self, files: Vec<SymbolFile>) -> Result<Vec<String>, AdapterError> {
        let batch = {
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push(files.clone());
            uploads.len()
        };
        match &*self.behaviour.lock().unwrap() {
            Behaviour::Addressed => Ok(files
                .iter()
                .map(|f| format!("ipfs://null/{batch}/{}", f.file_name))
                .collect()),
            Behaviour::Fixed(uris) => Ok(uris.clone()),
            Behaviour::Failing => Err(AdapterError::Upload("null storage is failing".into())),
        }
    }
}
