mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};
use common::{cert_expiring, FakeDirectory};
use dircert_audit::{AuditEngine, AuditSettings, CsvReportSink, WarningPeriod};
use dircert_core::{
    AuditError, AuditSummary, DirectoryEntry, IssueKind, ReportError, ReportRecord, ReportSink,
};

const PEOPLE: &str = "OU=People,DC=example,DC=com";
const SERVICES: &str = "OU=Services,DC=example,DC=com";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

fn entry(cn: &str, blobs: Vec<Vec<u8>>) -> DirectoryEntry {
    DirectoryEntry::new(format!("CN={cn},{PEOPLE}"), blobs)
}

fn run(
    settings: AuditSettings,
    directory: &mut FakeDirectory,
) -> (dircert_core::AuditOutcome, String) {
    let mut sink = CsvReportSink::from_writer(Vec::new());
    let outcome = AuditEngine::new(settings)
        .run_at(directory, &mut sink, now())
        .unwrap();
    let csv = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    (outcome, csv)
}

#[test]
fn classifies_each_entry_and_counts_statuses() {
    let mut directory = FakeDirectory::new().with_root(
        PEOPLE,
        vec![
            entry("soon", vec![cert_expiring("soon", 1, now() + Duration::days(30))]),
            entry("later", vec![cert_expiring("later", 2, now() + Duration::days(400))]),
            entry("gone", vec![cert_expiring("gone", 3, now() - Duration::days(1))]),
        ],
    );

    let (outcome, csv) = run(AuditSettings::new([PEOPLE]), &mut directory);

    assert_eq!(
        outcome.summary,
        AuditSummary {
            certs_written: 3,
            expired_count: 1,
            expiring_count: 1,
        }
    );
    assert_eq!(outcome.entries_processed, 3);
    assert!(outcome.is_clean());

    let rows: Vec<&str> = csv.lines().skip(1).collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].contains(",EXPIRING,29"));
    assert!(rows[1].contains(",OK,"));
    assert!(rows[2].contains(",EXPIRED,"));
}

#[test]
fn unreachable_root_does_not_stop_the_next_one() {
    let entries = (1..=5)
        .map(|i| {
            let cn = format!("svc{i}");
            DirectoryEntry::new(
                format!("CN={cn},{SERVICES}"),
                vec![cert_expiring(&cn, i, now() + Duration::days(200))],
            )
        })
        .collect();
    let mut directory = FakeDirectory::new()
        .with_unreachable_root(PEOPLE)
        .with_root(SERVICES, entries);

    let (outcome, csv) = run(AuditSettings::new([PEOPLE, SERVICES]), &mut directory);

    assert_eq!(directory.searches, vec![PEOPLE.to_string(), SERVICES.to_string()]);
    assert_eq!(outcome.summary.certs_written, 5);
    assert_eq!(csv.lines().count(), 6);
    assert_eq!(outcome.root_failures.len(), 1);
    assert_eq!(outcome.root_failures[0].root, PEOPLE);
    assert_eq!(outcome.root_failures[0].entries_before_failure, 0);
}

#[test]
fn search_failure_mid_stream_keeps_earlier_records() {
    let mut directory = FakeDirectory::new()
        .with_failing_root(
            PEOPLE,
            vec![entry("early", vec![cert_expiring("early", 1, now() + Duration::days(500))])],
        )
        .with_root(
            SERVICES,
            vec![DirectoryEntry::new(
                format!("CN=api,{SERVICES}"),
                vec![cert_expiring("api", 2, now() + Duration::days(10))],
            )],
        );

    let (outcome, _) = run(AuditSettings::new([PEOPLE, SERVICES]), &mut directory);

    assert_eq!(outcome.summary.certs_written, 2);
    assert_eq!(outcome.summary.expiring_count, 1);
    assert_eq!(outcome.root_failures.len(), 1);
    assert_eq!(outcome.root_failures[0].entries_before_failure, 1);
    assert!(outcome.root_failures[0].error.contains("server busy"));
}

#[test]
fn corrupt_value_is_logged_and_the_valid_one_reported() {
    let mut directory = FakeDirectory::new().with_root(
        PEOPLE,
        vec![entry(
            "mixed",
            vec![
                b"\x30\x82garbage".to_vec(),
                cert_expiring("mixed", 4, now() + Duration::days(45)),
            ],
        )],
    );

    let (outcome, csv) = run(AuditSettings::new([PEOPLE]), &mut directory);

    assert_eq!(outcome.summary.certs_written, 1);
    assert_eq!(outcome.entry_issues.len(), 1);
    assert!(matches!(
        outcome.entry_issues[0].kind,
        IssueKind::DecodeError { blob: 0, .. }
    ));
    assert!(csv.contains("CN=mixed"));
}

#[test]
fn entry_without_usable_certificate_emits_no_record() {
    let mut directory = FakeDirectory::new().with_root(
        PEOPLE,
        vec![
            entry("broken", vec![b"not a certificate".to_vec()]),
            entry("empty", Vec::new()),
            entry("fine", vec![cert_expiring("fine", 5, now() + Duration::days(365))]),
        ],
    );

    let (outcome, csv) = run(AuditSettings::new([PEOPLE]), &mut directory);

    assert_eq!(outcome.entries_processed, 3);
    assert_eq!(outcome.summary.certs_written, 1);
    assert_eq!(
        outcome.count_issues(|k| matches!(k, IssueKind::NoCertificateAvailable { .. })),
        2
    );
    assert!(!csv.contains("CN=broken"));
    assert!(!csv.contains("CN=empty"));
}

#[test]
fn latest_certificate_on_entry_is_the_one_reported() {
    let mut directory = FakeDirectory::new().with_root(
        PEOPLE,
        vec![entry(
            "renewed",
            vec![
                cert_expiring("renewed-old", 6, now() - Duration::days(300)),
                cert_expiring("renewed-new", 7, now() + Duration::days(700)),
            ],
        )],
    );

    let (outcome, csv) = run(AuditSettings::new([PEOPLE]), &mut directory);

    assert_eq!(outcome.summary.expired_count, 0);
    assert!(csv.contains("CN=renewed-new"));
    assert!(!csv.contains("CN=renewed-old"));
}

#[test]
fn epoch_expiry_is_reported_and_flagged() {
    let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
    let mut directory =
        FakeDirectory::new().with_root(PEOPLE, vec![entry("legacy", vec![cert_expiring("legacy", 8, epoch)])]);

    let (outcome, csv) = run(AuditSettings::new([PEOPLE]), &mut directory);

    assert_eq!(outcome.summary.expired_count, 1);
    assert_eq!(
        outcome.count_issues(|k| matches!(k, IssueKind::InvalidExpiry)),
        1
    );
    assert!(csv.contains("1970-01-01,EXPIRED"));
}

#[test]
fn warning_period_is_configurable() {
    let mut directory = FakeDirectory::new().with_root(
        PEOPLE,
        vec![entry("month", vec![cert_expiring("month", 9, now() + Duration::days(40))])],
    );

    let narrow = AuditSettings::new([PEOPLE]).with_warning_period(WarningPeriod::days(14));
    let (outcome, _) = run(narrow, &mut directory);
    assert_eq!(outcome.summary.expiring_count, 0);

    let wide = AuditSettings::new([PEOPLE]).with_warning_period(WarningPeriod::days(60));
    let (outcome, _) = run(wide, &mut directory);
    assert_eq!(outcome.summary.expiring_count, 1);
}

#[test]
fn repeated_runs_produce_identical_reports() {
    let mut directory = FakeDirectory::new().with_root(
        PEOPLE,
        vec![
            entry("a", vec![cert_expiring("a", 10, now() + Duration::days(5))]),
            entry("b", vec![cert_expiring("b", 11, now() + Duration::days(5000))]),
        ],
    );

    let (first_outcome, first) = run(AuditSettings::new([PEOPLE]), &mut directory);
    let (second_outcome, second) = run(AuditSettings::new([PEOPLE]), &mut directory);

    assert_eq!(first, second);
    assert_eq!(first_outcome, second_outcome);
}

#[test]
fn summary_never_exceeds_entries_processed() {
    let mut directory = FakeDirectory::new().with_root(
        PEOPLE,
        vec![
            entry("x", vec![cert_expiring("x", 12, now() - Duration::days(2))]),
            entry("y", vec![b"junk".to_vec()]),
            entry("z", vec![cert_expiring("z", 13, now() + Duration::days(2))]),
        ],
    );

    let (outcome, _) = run(AuditSettings::new([PEOPLE]), &mut directory);
    let summary = outcome.summary;

    assert!(summary.expired_count + summary.expiring_count <= summary.certs_written);
    assert!(summary.certs_written <= outcome.entries_processed);
}

#[test]
fn file_report_is_rewritten_on_each_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("certificates.csv");
    let mut directory = FakeDirectory::new().with_root(
        PEOPLE,
        vec![entry("f", vec![cert_expiring("f", 14, now() + Duration::days(100))])],
    );
    let engine = AuditEngine::new(AuditSettings::new([PEOPLE]));

    for _ in 0..2 {
        let mut sink = CsvReportSink::create(&path).unwrap();
        engine.run_at(&mut directory, &mut sink, now()).unwrap();
    }

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 2);
}

/// Accepts the header, then refuses every row.
struct FailingSink {
    begun: bool,
    finished: bool,
}

impl ReportSink for FailingSink {
    fn begin(&mut self) -> Result<(), ReportError> {
        self.begun = true;
        Ok(())
    }

    fn write_record(&mut self, _record: &ReportRecord) -> Result<(), ReportError> {
        Err(ReportError::Csv("disk full".to_string()))
    }

    fn finish(&mut self, _summary: &AuditSummary) -> Result<(), ReportError> {
        self.finished = true;
        Ok(())
    }
}

#[test]
fn sink_failure_aborts_the_run() {
    let mut directory = FakeDirectory::new().with_root(
        PEOPLE,
        vec![entry("g", vec![cert_expiring("g", 15, now() + Duration::days(100))])],
    );
    let mut sink = FailingSink {
        begun: false,
        finished: false,
    };

    let err = AuditEngine::new(AuditSettings::new([PEOPLE]))
        .run_at(&mut directory, &mut sink, now())
        .unwrap_err();

    assert!(matches!(err, AuditError::Report(ReportError::Csv(_))));
    assert!(sink.begun);
    assert!(!sink.finished);
}
