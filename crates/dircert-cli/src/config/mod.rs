//! Configuration management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use dircert_audit::{AuditSettings, WarningPeriod, DEFAULT_REPORT_FILENAME};
use dircert_core::AuditError;
use dircert_ldap::{LdapConfig, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Deserializer, Serialize};

/// Separator for list values given as a single string
pub const LIST_SEPARATOR: char = ';';

const MASK: &str = "********";

/// Written by `dircert config init`.
pub const STARTER_CONFIG: &str = r#"# dircert configuration

[directory]
# host, host:port, or ldap:// / ldaps:// URL; host:636 implies LDAPS
server = "ldap.example.com"
# one or more search base DNs (a list, or one string separated by ';')
search_base_dns = ["OU=People,DC=example,DC=com"]
# omit username for an anonymous bind; DIRCERT_LDAP_PASSWORD overrides password
# username = "CN=reader,DC=example,DC=com"
# password = ""
page_size = 1000
connect_timeout_secs = 30
tls_verify = true

[audit]
warning_period_in_days = 90

[report]
path = "certificates.csv"

# Uncomment to mail the report after each run.
# DIRCERT_SMTP_PASSWORD overrides password.
# [mail]
# smtp_server = "smtp.example.com"
# smtp_port = 25
# use_starttls = false
# username = ""
# password = ""
# from = "noreply@directorycertchecker.info"
# from_display_name = "Directory Cert Checker"
# to = ["pki-team@example.com"]
"#;

/// dircert configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where and how to search
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Classification
    #[serde(default)]
    pub audit: AuditConfig,

    /// Report output
    #[serde(default)]
    pub report: ReportConfig,

    /// Mail delivery; no mail is sent when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<MailConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub server: String,

    #[serde(default, deserialize_with = "split_list")]
    pub search_base_dns: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            search_base_dns: Vec::new(),
            username: None,
            password: None,
            page_size: default_page_size(),
            connect_timeout_secs: default_connect_timeout_secs(),
            tls_verify: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Days before expiry at which a certificate is EXPIRING
    #[serde(default)]
    pub warning_period_in_days: WarningPeriod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_path")]
    pub path: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: default_report_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailConfig {
    pub smtp_server: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Upgrade the connection with STARTTLS
    #[serde(default)]
    pub use_starttls: bool,

    /// Authenticate when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default = "default_mail_from")]
    pub from: String,

    #[serde(default = "default_mail_from_display_name")]
    pub from_display_name: String,

    #[serde(default, deserialize_with = "split_list")]
    pub to: Vec<String>,
}

impl MailConfig {
    /// Settings for `smtp_server` with every other value defaulted
    pub fn new(smtp_server: impl Into<String>) -> Self {
        Self {
            smtp_server: smtp_server.into(),
            smtp_port: default_smtp_port(),
            use_starttls: false,
            username: None,
            password: None,
            from: default_mail_from(),
            from_display_name: default_mail_from_display_name(),
            to: Vec::new(),
        }
    }
}

const fn default_true() -> bool {
    true
}

#[allow(clippy::cast_sign_loss)]
const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE as u32
}

const fn default_connect_timeout_secs() -> u64 {
    dircert_ldap::DEFAULT_CONNECT_TIMEOUT.as_secs()
}

fn default_report_path() -> PathBuf {
    PathBuf::from(DEFAULT_REPORT_FILENAME)
}

const fn default_smtp_port() -> u16 {
    25
}

fn default_mail_from() -> String {
    "noreply@directorycertchecker.info".to_string()
}

fn default_mail_from_display_name() -> String {
    "Directory Cert Checker".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrJoined {
    List(Vec<String>),
    Joined(String),
}

/// Accept either a TOML array or one `;`-separated string. Blank items are
/// dropped.
fn split_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match ListOrJoined::deserialize(deserializer)? {
        ListOrJoined::List(items) => items,
        ListOrJoined::Joined(joined) => joined
            .split(LIST_SEPARATOR)
            .map(str::to_string)
            .collect(),
    };

    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}

impl Config {
    /// Default config file location.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("info", "directorycertchecker", "dircert")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// `explicit` if given, else the default location.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        explicit.map_or_else(Self::default_path, |p| Ok(p.to_path_buf()))
    }

    /// Load configuration from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| {
            format!(
                "No configuration at {}. Create one with `dircert config init`",
                path.display()
            )
        })?;
        Self::parse(&content).with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Parse configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Write the starter configuration to `path`.
    pub fn write_starter(path: &Path, overwrite: bool) -> Result<()> {
        if path.exists() && !overwrite {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                path.display()
            );
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, STARTER_CONFIG)?;

        Ok(())
    }

    /// Check that an audit can run with these settings.
    pub fn validate(&self) -> std::result::Result<(), AuditError> {
        let invalid = |msg: &str| Err(AuditError::Config(msg.to_string()));

        if self.directory.server.trim().is_empty() {
            return invalid("directory.server is not set");
        }
        if self.directory.search_base_dns.is_empty() {
            return invalid("directory.search_base_dns needs at least one base DN");
        }
        if self.directory.page_size == 0 {
            return invalid("directory.page_size must be greater than 0");
        }
        if self.report.path.as_os_str().is_empty() {
            return invalid("report.path is empty");
        }
        if let Some(mail) = &self.mail {
            if mail.smtp_server.trim().is_empty() {
                return invalid("mail.smtp_server is not set");
            }
        }

        Ok(())
    }

    /// Directory connection settings
    pub fn ldap_config(&self) -> LdapConfig {
        let dir = &self.directory;
        let mut ldap = LdapConfig::new(dir.server.trim())
            .page_size(i32::try_from(dir.page_size).unwrap_or(i32::MAX))
            .connect_timeout(Duration::from_secs(dir.connect_timeout_secs))
            .tls_verify(dir.tls_verify);

        if let Some(username) = dir.username.as_deref().filter(|u| !u.is_empty()) {
            ldap = ldap.simple_bind(username, dir.password.clone().unwrap_or_default());
        }
        ldap
    }

    /// Engine settings
    pub fn audit_settings(&self) -> AuditSettings {
        AuditSettings::new(self.directory.search_base_dns.iter().cloned())
            .with_warning_period(self.audit.warning_period_in_days)
    }

    /// Copy with every password replaced by a mask.
    #[must_use]
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        if copy.directory.password.is_some() {
            copy.directory.password = Some(MASK.to_string());
        }
        if let Some(mail) = copy.mail.as_mut() {
            if mail.password.is_some() {
                mail.password = Some(MASK.to_string());
            }
        }
        copy
    }
}
