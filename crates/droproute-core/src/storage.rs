//! Storage collaborator seam.

use crate::error::StoreError;
use crate::types::AddressEntry;

/// Persists the address list as a whole.
pub trait AddressStore {
    /// Loads the stored list. A store with nothing saved yet returns an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing data cannot be read or decoded.
    fn load(&self) -> Result<Vec<AddressEntry>, StoreError>;

    /// Replaces the stored list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the list cannot be written.
    fn save(&mut self, entries: &[AddressEntry]) -> Result<(), StoreError>;
}

/// In-process store that forgets everything when dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Vec<AddressEntry>,
    saves: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entries(entries: Vec<AddressEntry>) -> Self {
        Self { entries, saves: 0 }
    }

    #[must_use]
    pub fn entries(&self) -> &[AddressEntry] {
        &self.entries
    }

    /// Number of successful `save` calls.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl AddressStore for MemoryStore {
    fn load(&self) -> Result<Vec<AddressEntry>, StoreError> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[AddressEntry]) -> Result<(), StoreError> {
        self.entries = entries.to_vec();
        self.saves += 1;
        Ok(())
    }
}
