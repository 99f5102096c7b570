use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Download status of one worklist identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocumentStatus {
    Downloaded,
    Corrupted,
    #[serde(rename = "Not Found")]
    NotFound,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Downloaded => "Downloaded",
            DocumentStatus::Corrupted => "Corrupted",
            DocumentStatus::NotFound => "Not Found",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Valid(String),
    Corrupted,
}

/// Identifier → on-disk state, built from a directory snapshot.
///
/// Identifiers absent from the mapping are `NotFound`. Lookups are pure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMapping {
    entries: BTreeMap<String, Entry>,
    extension: String,
}

impl StatusMapping {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            entries: BTreeMap::new(),
            extension: extension.into(),
        }
    }

    pub fn record_valid(&mut self, identifier: impl Into<String>, file_name: impl Into<String>) {
        self.entries
            .insert(identifier.into(), Entry::Valid(file_name.into()));
    }

    pub fn record_corrupted(&mut self, identifier: impl Into<String>) {
        self.entries.insert(identifier.into(), Entry::Corrupted);
    }

    /// File name to display for `identifier`.
    ///
    /// Corrupted entries report the expected `{identifier}.{extension}`.
    pub fn lookup_filename(&self, identifier: &str) -> Option<String> {
        match self.entries.get(identifier)? {
            Entry::Valid(file_name) => Some(file_name.clone()),
            Entry::Corrupted => Some(format!("{}.{}", identifier, self.extension)),
        }
    }

    pub fn lookup_status(&self, identifier: &str) -> DocumentStatus {
        match self.entries.get(identifier) {
            Some(Entry::Valid(_)) => DocumentStatus::Downloaded,
            Some(Entry::Corrupted) => DocumentStatus::Corrupted,
            None => DocumentStatus::NotFound,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers with a file on disk, in sorted order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Rows per status over a worklist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub downloaded: usize,
    pub corrupted: usize,
    pub not_found: usize,
}

impl StatusCounts {
    pub fn tally<'a>(
        mapping: &StatusMapping,
        identifiers: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut counts = Self::default();
        for identifier in identifiers {
            match mapping.lookup_status(identifier) {
                DocumentStatus::Downloaded => counts.downloaded += 1,
                DocumentStatus::Corrupted => counts.corrupted += 1,
                DocumentStatus::NotFound => counts.not_found += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.corrupted + self.not_found
    }
}

impl fmt::Display for StatusCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Downloaded, {} Corrupted, {} Not Found",
            self.downloaded, self.corrupted, self.not_found
        )
    }
}
