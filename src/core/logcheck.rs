//! core::logcheck
//!
//! Detect test failures in an Odoo server log.
//!
//! # Log format
//!
//! A record starts with a line like
//!
//! ```text
//! 2015-03-02 12:00:00,123 4242 ERROR testdb openerp.modules.loading: message
//! ```
//!
//! where the database column is either the tested database or `?`. Lines
//! that do not start a record continue the message of the previous record.
//! ANSI colour escapes are stripped before matching.
//!
//! # Rules
//!
//! Ignore rules are checked first and skip a record entirely. Report rules
//! then flag the record as an error. Message rules match at the start of the
//! message.

use std::io::BufRead;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Messages that are never errors.
pub const DEFAULT_IGNORE: [&str; 2] = ["Mail delivery failed", "failed sending mail"];

/// Messages that are always errors.
pub const DEFAULT_REPORT: [&str; 3] = [
    "At least one test failed",
    "no access rules, consider adding one",
    "invalid module names, ignored",
];

/// Message expected once the registry has loaded.
pub const MODULES_LOADED: &str = "Modules loaded.";

/// Errors from log checking.
#[derive(Debug, Error)]
pub enum LogCheckError {
    #[error("failed to read log: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid database name pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// One log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub level: Option<String>,
    pub database: Option<String>,
    pub logger: Option<String>,
    pub message: String,
}

impl LogRecord {
    fn synthetic(message: &str) -> Self {
        Self {
            level: None,
            database: None,
            logger: None,
            message: message.to_string(),
        }
    }
}

/// How to judge a log.
#[derive(Debug, Clone)]
pub struct LogCheckOptions {
    /// Database name the test server ran against.
    pub database: String,
    /// Odoo series, e.g. `"8.0"`. Before 7.0 every `ERROR` line fails.
    pub odoo_version: Option<String>,
    /// Report a missing "Modules loaded." record.
    pub check_loaded: bool,
    /// Message prefixes to skip, in addition to [`DEFAULT_IGNORE`].
    pub extra_ignore: Vec<String>,
    /// Message prefixes to report, in addition to [`DEFAULT_REPORT`].
    pub extra_report: Vec<String>,
}

impl LogCheckOptions {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            odoo_version: None,
            check_loaded: true,
            extra_ignore: Vec::new(),
            extra_report: Vec::new(),
        }
    }

    fn reports_all_errors(&self) -> bool {
        self.odoo_version
            .as_deref()
            .and_then(parse_series)
            .is_some_and(|series| series < (7, 0))
    }
}

/// Parse `"8.0"`-style series. Branch names like `master` yield `None`.
fn parse_series(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().map_or(Some(0), |m| m.parse().ok())?;
    Some((major, minor))
}

/// Split a log into records.
///
/// Lines are decoded lossily: bytes that are not UTF-8 become U+FFFD.
pub fn parse_log<R: BufRead>(reader: R, database: &str) -> Result<Vec<LogRecord>, LogCheckError> {
    let color = Regex::new(r"\x1B\[([0-9]{1,2}(;[0-9]{1,2})?)?[mK]")?;
    let start = Regex::new(&format!(
        r"^\d{{4}}-\d{{2}}-\d{{2}} \d{{2}}:\d{{2}}:\d{{2}},\d{{3}} \d+ (?P<level>\w+) (?P<db>{}|\?) (?P<logger>\S+): (?P<message>.*)$",
        regex::escape(database)
    ))?;

    let mut records: Vec<LogRecord> = Vec::new();
    for line in reader.split(b'\n') {
        let line = line?;
        let line = String::from_utf8_lossy(line.strip_suffix(b"\r").unwrap_or(line.as_slice()));
        let line = color.replace_all(&line, "");
        if let Some(caps) = start.captures(&line) {
            records.push(LogRecord {
                level: Some(caps["level"].to_string()),
                database: Some(caps["db"].to_string()),
                logger: Some(caps["logger"].to_string()),
                message: caps["message"].to_string(),
            });
        } else if let Some(last) = records.last_mut() {
            last.message.push('\n');
            last.message.push_str(&line);
        }
    }
    Ok(records)
}

/// Records of the log that count as test errors.
///
/// # Example
///
/// ```
/// use addonkit::core::logcheck::{check_log, LogCheckOptions};
///
/// let log = "2015-01-01 10:00:00,000 1 INFO db openerp.modules.loading: Modules loaded.\n\
///            2015-01-01 10:00:01,000 1 ERROR db openerp.modules.module: At least one test failed when loading the modules.\n";
/// let errors = check_log(log.as_bytes(), &LogCheckOptions::new("db")).unwrap();
/// assert_eq!(errors.len(), 1);
/// ```
pub fn check_log<R: BufRead>(
    reader: R,
    options: &LogCheckOptions,
) -> Result<Vec<LogRecord>, LogCheckError> {
    let records = parse_log(reader, &options.database)?;
    debug!(records = records.len(), "parsed log");

    let ignore: Vec<&str> = DEFAULT_IGNORE
        .iter()
        .copied()
        .chain(options.extra_ignore.iter().map(String::as_str))
        .collect();
    let report: Vec<&str> = DEFAULT_REPORT
        .iter()
        .copied()
        .chain(options.extra_report.iter().map(String::as_str))
        .collect();
    let all_errors = options.reports_all_errors();

    let mut errors = Vec::new();
    for record in &records {
        if ignore.iter().any(|p| record.message.starts_with(p)) {
            continue;
        }
        let level = record.level.as_deref();
        let reported = level == Some("CRITICAL")
            || (all_errors && level == Some("ERROR"))
            || report.iter().any(|p| record.message.starts_with(p));
        if reported {
            errors.push(record.clone());
        }
    }

    if options.check_loaded && !records.iter().any(|r| r.message == MODULES_LOADED) {
        errors.push(LogRecord::synthetic("Modules loaded message not found."));
    }

    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOADED: &str =
        "2015-03-02 12:00:00,100 42 INFO testdb openerp.modules.loading: Modules loaded.\n";

    fn check(log: &str, options: &LogCheckOptions) -> Vec<LogRecord> {
        check_log(log.as_bytes(), options).unwrap()
    }

    #[test]
    fn clean_log_has_no_errors() {
        let log = format!(
            "2015-03-02 12:00:00,000 42 INFO ? openerp: OpenERP version 8.0\n{LOADED}"
        );
        assert!(check(&log, &LogCheckOptions::new("testdb")).is_empty());
    }

    #[test]
    fn missing_loaded_message_is_reported() {
        let errors = check("", &LogCheckOptions::new("testdb"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Modules loaded message not found.");

        let mut options = LogCheckOptions::new("testdb");
        options.check_loaded = false;
        assert!(check("", &options).is_empty());
    }

    #[test]
    fn critical_and_known_messages_are_reported() {
        let log = format!(
            "{LOADED}\
             2015-03-02 12:00:01,000 42 CRITICAL testdb openerp.service: boom\n\
             2015-03-02 12:00:02,000 42 WARNING testdb openerp.models: Model x.y has no access rules, consider adding one.\n\
             2015-03-02 12:00:03,000 42 ERROR testdb openerp.tests: some assertion\n"
        );
        let errors = check(&log, &LogCheckOptions::new("testdb"));
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["boom"]);

        let log = format!(
            "{LOADED}2015-03-02 12:00:02,000 42 WARNING testdb openerp.models: no access rules, consider adding one. x.y\n"
        );
        assert_eq!(check(&log, &LogCheckOptions::new("testdb")).len(), 1);
    }

    #[test]
    fn errors_are_reported_before_seven() {
        let log = format!("{LOADED}2015-03-02 12:00:03,000 42 ERROR testdb openerp.tests: failed\n");
        let mut options = LogCheckOptions::new("testdb");
        options.odoo_version = Some("6.1".to_string());
        assert_eq!(check(&log, &options).len(), 1);

        options.odoo_version = Some("8.0".to_string());
        assert!(check(&log, &options).is_empty());

        options.odoo_version = Some("master".to_string());
        assert!(check(&log, &options).is_empty());
    }

    #[test]
    fn ignored_messages_are_skipped() {
        let log = format!(
            "{LOADED}2015-03-02 12:00:03,000 42 CRITICAL testdb openerp.mail: Mail delivery failed via SMTP\n"
        );
        assert!(check(&log, &LogCheckOptions::new("testdb")).is_empty());
    }

    #[test]
    fn extra_rules_apply() {
        let log = format!(
            "{LOADED}2015-03-02 12:00:03,000 42 WARNING testdb openerp.x: Deprecated call\n"
        );
        let mut options = LogCheckOptions::new("testdb");
        options.extra_report.push("Deprecated".to_string());
        assert_eq!(check(&log, &options).len(), 1);

        options.extra_ignore.push("Deprecated".to_string());
        assert!(check(&log, &options).is_empty());
    }

    #[test]
    fn continuation_lines_and_colors() {
        let log = "2015-03-02 12:00:00,000 42 \x1b[1;31mERROR\x1b[0m testdb openerp.tests: Traceback\n  File \"x.py\"\nZeroDivisionError\n";
        let records = parse_log(log.as_bytes(), "testdb").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level.as_deref(), Some("ERROR"));
        assert_eq!(
            records[0].message,
            "Traceback\n  File \"x.py\"\nZeroDivisionError"
        );
    }

    #[test]
    fn other_databases_do_not_start_records() {
        let log = "2015-03-02 12:00:00,000 42 INFO other openerp: hello\n";
        assert!(parse_log(log.as_bytes(), "testdb").unwrap().is_empty());
    }

    #[test]
    fn non_utf8_bytes_are_tolerated() {
        let mut log = LOADED.as_bytes().to_vec();
        log.extend_from_slice(b"2015-03-02 12:00:01,000 42 INFO testdb openerp.tests: caf\xe9\r\n");
        log.extend_from_slice(b"\xff\xfe binary\n");

        let records = parse_log(log.as_slice(), "testdb").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].message, "caf\u{FFFD}\n\u{FFFD}\u{FFFD} binary");
        assert!(check_log(log.as_slice(), &LogCheckOptions::new("testdb"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn series_parsing() {
        assert_eq!(parse_series("6.1"), Some((6, 1)));
        assert_eq!(parse_series("10"), Some((10, 0)));
        assert_eq!(parse_series("saas-17"), None);
    }
}
