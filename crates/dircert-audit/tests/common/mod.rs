//! Shared helpers for engine integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use dircert_core::{DirectoryEntry, EntrySource, EntryStream, SourceError};

#[path = "../../src/fixtures.rs"]
mod fixtures;

/// DER certificate for `CN=<cn>` expiring at midnight UTC on the calendar
/// date of `not_after`. `serial` must be in `1..=127`.
pub fn cert_expiring(cn: &str, serial: u8, not_after: DateTime<Utc>) -> Vec<u8> {
    let date = not_after.date_naive();
    let month = u8::try_from(date.month()).expect("month");
    let day = u8::try_from(date.day()).expect("day");
    fixtures::cert_der(cn, &[serial], (date.year(), month, day))
}

enum Root {
    Entries(Vec<DirectoryEntry>),
    /// Yields the entries, then a search error
    FailsAfter(Vec<DirectoryEntry>),
    Unreachable,
}

/// In-memory directory keyed by search root.
#[derive(Default)]
pub struct FakeDirectory {
    roots: HashMap<String, Root>,
    pub searches: Vec<String>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: &str, entries: Vec<DirectoryEntry>) -> Self {
        self.roots.insert(root.to_string(), Root::Entries(entries));
        self
    }

    pub fn with_failing_root(mut self, root: &str, before_failure: Vec<DirectoryEntry>) -> Self {
        self.roots
            .insert(root.to_string(), Root::FailsAfter(before_failure));
        self
    }

    pub fn with_unreachable_root(mut self, root: &str) -> Self {
        self.roots.insert(root.to_string(), Root::Unreachable);
        self
    }
}

impl EntrySource for FakeDirectory {
    fn search(&mut self, root: &str) -> Result<EntryStream<'_>, SourceError> {
        self.searches.push(root.to_string());
        match self.roots.get(root) {
            Some(Root::Entries(entries)) => Ok(Box::new(entries.clone().into_iter().map(Ok))),
            Some(Root::FailsAfter(entries)) => {
                let failure = SourceError::Search {
                    root: root.to_string(),
                    reason: "server busy".to_string(),
                };
                Ok(Box::new(
                    entries
                        .clone()
                        .into_iter()
                        .map(Ok)
                        .chain(std::iter::once(Err(failure))),
                ))
            }
            Some(Root::Unreachable) | None => Err(SourceError::Connect {
                server: "ldap.invalid".to_string(),
                reason: "connection refused".to_string(),
            }),
        }
    }
}
