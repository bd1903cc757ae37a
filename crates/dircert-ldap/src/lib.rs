//! # dircert-ldap
//!
//! LDAP implementation of [`EntrySource`](dircert_core::EntrySource).
//!
//! Searches each base DN with subtree scope for `(userCertificate=*)`,
//! paging through results with the RFC 2696 paged-results control so that
//! server-side size limits never truncate the audit.
//!
//! ```rust,ignore
//! use dircert_ldap::{LdapConfig, LdapEntrySource};
//!
//! let config = LdapConfig::new("dc01.example.com:636")
//!     .simple_bind("CN=reader,DC=example,DC=com", password);
//! let mut source = LdapEntrySource::new(config);
//! for entry in source.search("OU=People,DC=example,DC=com")? {
//!     println!("{}", entry?.distinguished_name);
//! }
//! ```

pub mod config;
pub mod pager;
pub mod source;

pub use config::{Credentials, LdapConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_PAGE_SIZE, LDAPS_PORT};
pub use pager::{Page, PageFetch, PagedSearch};
pub use source::{LdapEntrySource, CERTIFICATE_ATTRIBUTES, CERTIFICATE_FILTER};
