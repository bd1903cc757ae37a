//! Directory entries as handed over by an entry source.

/// One directory node that carries at least one certificate value.
///
/// Entries are produced by an [`EntrySource`](crate::EntrySource) for the
/// duration of a single audit pass and are never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Opaque locator of the entry (e.g. `ldap://server/CN=...`)
    pub path: String,
    /// Human-readable identity of the entry
    pub distinguished_name: String,
    /// Raw certificate values, one per stored certificate
    pub certificate_blobs: Vec<Vec<u8>>,
}

impl DirectoryEntry {
    /// Create an entry from its DN and raw certificate values.
    ///
    /// The path defaults to the DN; sources that know their server override
    /// it with [`DirectoryEntry::with_path`].
    #[must_use]
    pub fn new(distinguished_name: impl Into<String>, certificate_blobs: Vec<Vec<u8>>) -> Self {
        let distinguished_name = distinguished_name.into();
        Self {
            path: distinguished_name.clone(),
            distinguished_name,
            certificate_blobs,
        }
    }

    /// Set the opaque locator
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Number of certificate values on the entry
    #[must_use]
    pub fn certificate_count(&self) -> usize {
        self.certificate_blobs.len()
    }
}
