//! LDAP-backed [`EntrySource`].

use dircert_core::{DirectoryEntry, EntrySource, EntryStream, SourceError};
use ldap3::controls::{Control, ControlType, MakeCritical, PagedResults};
use ldap3::{LdapConn, LdapConnSettings, LdapResult, ResultEntry, Scope, SearchEntry};
use tracing::{debug, info, warn};

use crate::config::{Credentials, LdapConfig};
use crate::pager::{Page, PageFetch, PagedSearch};

/// Entries holding at least one certificate
pub const CERTIFICATE_FILTER: &str = "(userCertificate=*)";

/// Attributes requested per entry
pub const CERTIFICATE_ATTRIBUTES: [&str; 2] = ["userCertificate", "userCertificate;binary"];

/// Reads certificate-bearing entries from an LDAP server.
///
/// Every [`search`](EntrySource::search) opens its own connection, so a
/// server that refuses one search base does not poison the next.
#[derive(Debug, Clone)]
pub struct LdapEntrySource {
    config: LdapConfig,
}

impl LdapEntrySource {
    #[must_use]
    pub const fn new(config: LdapConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &LdapConfig {
        &self.config
    }
}

impl EntrySource for LdapEntrySource {
    fn search(&mut self, root: &str) -> Result<EntryStream<'_>, SourceError> {
        let fetcher = LdapPageFetcher::connect(&self.config, root)?;
        Ok(Box::new(PagedSearch::new(fetcher)))
    }
}

/// A bound connection searching one base DN. Unbinds on drop.
struct LdapPageFetcher {
    conn: LdapConn,
    config: LdapConfig,
    url: String,
    root: String,
}

impl LdapPageFetcher {
    fn connect(config: &LdapConfig, root: &str) -> Result<Self, SourceError> {
        let url = config.url();
        info!(url = %url, root = %root, identity = config.credentials.identity(), "connecting");

        let settings = LdapConnSettings::new()
            .set_conn_timeout(config.connect_timeout)
            .set_no_tls_verify(!config.tls_verify);
        let mut conn = LdapConn::with_settings(settings, &url).map_err(|e| SourceError::Connect {
            server: url.clone(),
            reason: e.to_string(),
        })?;

        if let Credentials::Simple { username, password } = &config.credentials {
            let bound = conn
                .simple_bind(username, password)
                .and_then(ldap3::LdapResult::success);
            if let Err(e) = bound {
                let _ = conn.unbind();
                return Err(SourceError::Bind {
                    server: url,
                    identity: username.clone(),
                    reason: e.to_string(),
                });
            }
        }

        Ok(Self {
            conn,
            config: config.clone(),
            url,
            root: root.to_string(),
        })
    }

    fn to_entry(&self, raw: ResultEntry) -> DirectoryEntry {
        let entry = SearchEntry::construct(raw);
        let blobs = certificate_values(&entry);
        let path = self.config.entry_path(&entry.dn);
        DirectoryEntry::new(entry.dn, blobs).with_path(path)
    }
}

impl PageFetch for LdapPageFetcher {
    type Item = DirectoryEntry;

    fn fetch(&mut self, cookie: &[u8]) -> Result<Page<DirectoryEntry>, SourceError> {
        let paging = PagedResults {
            size: self.config.page_size,
            cookie: cookie.to_vec(),
        };

        let (entries, result) = self
            .conn
            .with_controls(paging.critical())
            .search(
                &self.root,
                Scope::Subtree,
                CERTIFICATE_FILTER,
                CERTIFICATE_ATTRIBUTES.to_vec(),
            )
            .and_then(ldap3::SearchResult::success)
            .map_err(|e| SourceError::Search {
                root: self.root.clone(),
                reason: e.to_string(),
            })?;

        let items = entries.into_iter().map(|raw| self.to_entry(raw)).collect();
        Ok(Page {
            items,
            cookie: next_cookie(&result),
        })
    }
}

impl Drop for LdapPageFetcher {
    fn drop(&mut self) {
        match self.conn.unbind() {
            Ok(()) => debug!(url = %self.url, root = %self.root, "unbound"),
            Err(e) => warn!(url = %self.url, error = %e, "unbind failed"),
        }
    }
}

/// Cookie for the next page. A response without a paged-results control
/// is the server's last page.
fn next_cookie(result: &LdapResult) -> Vec<u8> {
    result
        .ctrls
        .iter()
        .find_map(|Control(kind, raw)| match kind {
            Some(ControlType::PagedResults) => Some(raw.parse::<PagedResults>().cookie),
            _ => None,
        })
        .unwrap_or_default()
}

fn is_certificate_attribute(name: &str) -> bool {
    CERTIFICATE_ATTRIBUTES
        .iter()
        .any(|attr| attr.eq_ignore_ascii_case(name))
}

/// Collect every certificate value on an entry.
///
/// Servers return certificates as binary values, but a value that happens
/// to be valid UTF-8 (PEM text) lands in the textual map. Attributes are
/// visited in name order so value order is stable between runs.
fn certificate_values(entry: &SearchEntry) -> Vec<Vec<u8>> {
    let mut names: Vec<&String> = entry
        .bin_attrs
        .keys()
        .chain(entry.attrs.keys())
        .filter(|name| is_certificate_attribute(name))
        .collect();
    names.sort();
    names.dedup();

    let mut values = Vec::new();
    for name in names {
        if let Some(binary) = entry.bin_attrs.get(name) {
            values.extend(binary.iter().cloned());
        }
        if let Some(text) = entry.attrs.get(name) {
            values.extend(text.iter().map(|v| v.as_bytes().to_vec()));
        }
    }
    values
}
