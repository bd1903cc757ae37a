//! Connection settings.

use std::fmt;
use std::time::Duration;

/// Default LDAPS port; a bare `host:636` locator implies TLS
pub const LDAPS_PORT: u16 = 636;

/// Default entries per page
pub const DEFAULT_PAGE_SIZE: i32 = 1000;

/// Default connection timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Bind identity.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// Anonymous bind
    #[default]
    Anonymous,
    /// Simple bind with DN (or UPN) and password
    Simple {
        /// Bind DN
        username: String,
        /// Password
        password: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Simple { username, .. } => f
                .debug_struct("Simple")
                .field("username", username)
                .field("password", &"********")
                .finish(),
        }
    }
}

impl Credentials {
    /// Name used in logs and errors
    #[must_use]
    pub fn identity(&self) -> &str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Simple { username, .. } => username,
        }
    }
}

/// How to reach and read the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapConfig {
    /// `host`, `host:port`, or an `ldap://` / `ldaps://` URL
    pub server: String,

    /// Bind identity
    pub credentials: Credentials,

    /// Entries requested per page
    pub page_size: i32,

    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,

    /// Verify the server certificate on LDAPS
    pub tls_verify: bool,
}

impl LdapConfig {
    /// Settings for `server` with anonymous bind and default paging
    #[must_use]
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            credentials: Credentials::Anonymous,
            page_size: DEFAULT_PAGE_SIZE,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            tls_verify: true,
        }
    }

    /// Bind with a username and password
    #[must_use]
    pub fn simple_bind(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Credentials::Simple {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    /// Set entries per page (values below 1 are raised to 1)
    #[must_use]
    pub const fn page_size(mut self, size: i32) -> Self {
        self.page_size = if size < 1 { 1 } else { size };
        self
    }

    /// Set the connect timeout
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enable or disable server certificate verification
    #[must_use]
    pub const fn tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Whether the connection uses LDAPS
    #[must_use]
    pub fn use_ldaps(&self) -> bool {
        let server = self.server.trim();
        if server.starts_with("ldaps://") {
            return true;
        }
        if server.starts_with("ldap://") {
            return false;
        }
        server.ends_with(&format!(":{LDAPS_PORT}"))
    }

    /// The connection URL, without a trailing slash
    #[must_use]
    pub fn url(&self) -> String {
        let host = self
            .server
            .trim()
            .trim_start_matches("ldaps://")
            .trim_start_matches("ldap://")
            .trim_end_matches('/');
        let scheme = if self.use_ldaps() { "ldaps" } else { "ldap" };
        format!("{scheme}://{host}")
    }

    /// Locator of an entry under this server
    #[must_use]
    pub fn entry_path(&self, dn: &str) -> String {
        format!("{}/{dn}", self.url())
    }
}
