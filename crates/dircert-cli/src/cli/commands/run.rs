//! `dircert run` - audit the directory, write the report, mail it.

use anyhow::{Context as _, Result};
use dircert_audit::{AuditEngine, CsvReportSink, WarningPeriod};
use dircert_core::{AuditOutcome, Notifier};
use dircert_ldap::LdapEntrySource;
use tracing::{info, warn};

use super::Context;
use crate::cli::args::RunArgs;
use crate::config::Config;
use crate::notify::{MailNotifier, REPORT_SUBJECT};
use crate::output::{self, EchoSink, OutputFormat};

const LDAP_PASSWORD_ENV: &str = "DIRCERT_LDAP_PASSWORD";
const SMTP_PASSWORD_ENV: &str = "DIRCERT_SMTP_PASSWORD";

pub fn execute(ctx: &Context, args: RunArgs) -> Result<()> {
    let mut config = ctx.load_config()?;
    apply_overrides(&mut config, args);
    config.validate()?;

    info!(
        server = %config.directory.server,
        roots = config.directory.search_base_dns.len(),
        warning_days = config.audit.warning_period_in_days.as_days(),
        "dircert has started"
    );

    let outcome = audit(ctx, &config)?;
    output::print_outcome(&outcome, &config.report.path, ctx.output_format)?;
    send_report(&config, &outcome)?;

    Ok(())
}

/// Command-line flags and environment win over the file.
fn apply_overrides(config: &mut Config, args: RunArgs) {
    if let Some(days) = args.warning_days {
        config.audit.warning_period_in_days = WarningPeriod::days(days);
    }
    if let Some(report) = args.report {
        config.report.path = report;
    }
    if let Some(password) = args
        .ldap_password
        .or_else(|| std::env::var(LDAP_PASSWORD_ENV).ok())
    {
        config.directory.password = Some(password);
    }
    if args.no_mail {
        config.mail = None;
    } else if let Some(mail) = config.mail.as_mut() {
        if let Some(password) = args
            .smtp_password
            .or_else(|| std::env::var(SMTP_PASSWORD_ENV).ok())
        {
            mail.password = Some(password);
        }
    }
}

fn audit(ctx: &Context, config: &Config) -> Result<AuditOutcome> {
    let mut source = LdapEntrySource::new(config.ldap_config());
    let report = CsvReportSink::create(&config.report.path)?;
    let echo = ctx.verbose > 0 && ctx.output_format == OutputFormat::Pretty;
    let mut sink = EchoSink::new(report, echo);

    let engine = AuditEngine::new(config.audit_settings());
    let outcome = engine
        .run(&mut source, &mut sink)
        .with_context(|| format!("Audit aborted while writing {}", config.report.path.display()))?;

    for failure in &outcome.root_failures {
        warn!(root = %failure.root, error = %failure.error, "search base skipped");
    }
    Ok(outcome)
}

fn send_report(config: &Config, outcome: &AuditOutcome) -> Result<()> {
    let Some(mail) = config.mail.clone() else {
        info!("mail not configured, report not sent");
        return Ok(());
    };

    let notifier = MailNotifier::new(mail);
    if !notifier.has_recipients() {
        info!("no mail recipients configured, report not sent");
        return Ok(());
    }

    notifier
        .deliver(
            REPORT_SUBJECT,
            &outcome.summary.to_string(),
            Some(&config.report.path),
        )
        .context("Could not mail the report")?;
    info!("report mailed");
    Ok(())
}
