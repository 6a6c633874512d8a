// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod concurrency;
mod rollover;

use super::*;
use lp_core::{Role, RoleFlags};
use tempfile::{tempdir, TempDir};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Temp directories plus a session config pointing into them.
struct Dirs {
    root: TempDir,
}

impl Dirs {
    fn new() -> Self {
        Self {
            root: tempdir().unwrap(),
        }
    }

    fn plain(&self) -> PathBuf {
        self.root.path().join("plain")
    }

    fn html(&self) -> PathBuf {
        self.root.path().join("html")
    }

    fn config(&self) -> SessionConfig {
        SessionConfig::new(self.plain(), self.html(), "#rust").extra_head("")
    }

    fn plaintext_for(&self, d: NaiveDate) -> String {
        std::fs::read_to_string(paths::plaintext_log_path(&self.plain(), d)).unwrap()
    }

    fn html_for(&self, d: NaiveDate) -> String {
        std::fs::read_to_string(paths::html_log_path(&self.html(), d)).unwrap()
    }
}

fn row_ids(html: &str) -> Vec<u64> {
    html.match_indices("<tr id=\"msg-")
        .map(|(i, m)| {
            let digits: String = html[i + m.len()..]
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            digits.parse().unwrap()
        })
        .collect()
}

#[test]
fn start_creates_both_files_for_today() {
    let dirs = Dirs::new();
    let session = LogSession::start(dirs.config(), at(2024, 1, 5, 23, 0)).unwrap();

    assert_eq!(session.current_day(), Some(day(2024, 1, 5)));
    assert_eq!(session.sequence(), 0);
    assert!(session.is_open());
    assert!(dirs.plain().join("2024-01-05.log").exists());
    assert!(dirs.html().join("2024-01-05.log.html").exists());

    let html = dirs.html_for(day(2024, 1, 5));
    assert!(html.contains("<title>Chatlogs #rust 2024-01-05</title>"));
    assert!(html.ends_with("<table class=\"chattable\">\n"));
    session.shutdown().unwrap();
}

#[test]
fn start_rejects_missing_directories() {
    let dirs = Dirs::new();

    let no_plain = SessionConfig::new("", dirs.html(), "#rust");
    assert!(matches!(
        LogSession::start(no_plain, at(2024, 1, 5, 12, 0)),
        Err(SessionError::MissingDirectory("plaintext"))
    ));

    let no_html = SessionConfig::new(dirs.plain(), "", "#rust");
    assert!(matches!(
        LogSession::start(no_html, at(2024, 1, 5, 12, 0)),
        Err(SessionError::MissingDirectory("html"))
    ));

    assert!(!dirs.plain().exists());
}

#[test]
fn start_reports_unopenable_path() {
    let dirs = Dirs::new();
    let blocker = dirs.root.path().join("blocker");
    std::fs::write(&blocker, "not a dir").unwrap();

    let config = SessionConfig::new(blocker.join("nested"), dirs.html(), "#rust");
    let err = LogSession::start(config, at(2024, 1, 5, 12, 0))
        .err()
        .unwrap();
    match err {
        SessionError::Open { path, .. } => assert!(path.starts_with(&blocker)),
        other => panic!("expected open error, got {other:?}"),
    }
}

#[test]
fn record_writes_line_and_row_in_lockstep() {
    let dirs = Dirs::new();
    let session = LogSession::start(dirs.config(), at(2024, 1, 5, 14, 0)).unwrap();

    let op = RoleFlags::none().with(Role::Operator).with(Role::Voiced);
    assert_eq!(
        session
            .record(&Message::new(at(2024, 1, 5, 14, 5), "alice", "hello").with_roles(op))
            .unwrap(),
        1
    );
    assert_eq!(
        session
            .record(&Message::new(at(2024, 1, 5, 14, 6), "bob", "hi alice"))
            .unwrap(),
        2
    );
    assert_eq!(session.sequence(), 2);
    session.shutdown().unwrap();

    assert_eq!(
        dirs.plaintext_for(day(2024, 1, 5)),
        "14:05 alice | hello\n14:06 bob | hi alice\n"
    );
    let html = dirs.html_for(day(2024, 1, 5));
    assert_eq!(row_ids(&html), vec![1, 2]);
    assert!(html.contains(r#"<td class="msgnick opped">alice</td>"#));
    assert!(html.contains(r#"<td class="msgnick">bob</td>"#));
    assert!(html.ends_with("    </table>\n  </body>\n</html>\n"));
}

#[test]
fn configured_time_format_applies_to_both_files() {
    let dirs = Dirs::new();
    let config = dirs
        .config()
        .time_format(TimeFormat::parse("%H:%M:%S").unwrap());
    let session = LogSession::start(config, at(2024, 1, 5, 8, 0)).unwrap();
    let ts = day(2024, 1, 5).and_hms_opt(8, 1, 2).unwrap();
    session.record(&Message::new(ts, "carol", "x")).unwrap();
    session.shutdown().unwrap();

    assert_eq!(dirs.plaintext_for(day(2024, 1, 5)), "08:01:02 carol | x\n");
    assert!(dirs
        .html_for(day(2024, 1, 5))
        .contains(r#"<td class="msgtime">08:01:02</td>"#));
}

#[test]
fn restart_same_day_appends_plaintext_and_restarts_html() {
    let dirs = Dirs::new();
    let first = LogSession::start(dirs.config(), at(2024, 1, 5, 9, 0)).unwrap();
    first
        .record(&Message::new(at(2024, 1, 5, 9, 1), "a", "before restart"))
        .unwrap();
    first.shutdown().unwrap();

    let second = LogSession::start(dirs.config(), at(2024, 1, 5, 10, 0)).unwrap();
    second
        .record(&Message::new(at(2024, 1, 5, 10, 1), "b", "after restart"))
        .unwrap();
    second.shutdown().unwrap();

    assert_eq!(
        dirs.plaintext_for(day(2024, 1, 5)),
        "09:01 a | before restart\n10:01 b | after restart\n"
    );
    let html = dirs.html_for(day(2024, 1, 5));
    assert!(!html.contains("before restart"));
    assert!(html.contains("after restart"));
    assert_eq!(row_ids(&html), vec![1]);
    assert_eq!(html.matches("<!DOCTYPE HTML>").count(), 1);
}

#[test]
fn shutdown_writes_footer_once_and_closes() {
    let dirs = Dirs::new();
    let session = LogSession::start(dirs.config(), at(2024, 1, 5, 9, 0)).unwrap();
    session.shutdown().unwrap();
    session.shutdown().unwrap();

    let html = dirs.html_for(day(2024, 1, 5));
    assert_eq!(html.matches("</html>").count(), 1);
    assert_eq!(session.current_day(), None);
    assert!(!session.is_open());

    assert!(matches!(
        session.record(&Message::new(at(2024, 1, 5, 9, 1), "a", "late")),
        Err(SessionError::Closed)
    ));
    assert!(matches!(
        session.rollover(at(2024, 1, 6, 0, 0)),
        Err(SessionError::Closed)
    ));
    assert!(!session.check_rollover(at(2024, 1, 6, 0, 0)).unwrap());
    assert!(!dirs.html().join("2024-01-06.log.html").exists());
}

#[test]
fn drop_without_shutdown_still_writes_footer() {
    let dirs = Dirs::new();
    {
        let session = LogSession::start(dirs.config(), at(2024, 1, 5, 9, 0)).unwrap();
        session
            .record(&Message::new(at(2024, 1, 5, 9, 1), "a", "b"))
            .unwrap();
    }
    let html = dirs.html_for(day(2024, 1, 5));
    assert!(html.ends_with("</html>\n"));
    assert_eq!(html.matches("</table>").count(), 1);
}

#[test]
fn drop_after_shutdown_does_not_write_again() {
    let dirs = Dirs::new();
    {
        let session = LogSession::start(dirs.config(), at(2024, 1, 5, 9, 0)).unwrap();
        session.shutdown().unwrap();
    }
    assert_eq!(dirs.html_for(day(2024, 1, 5)).matches("</html>").count(), 1);
}

#[test]
fn escaped_markup_keeps_document_intact() {
    let dirs = Dirs::new();
    let session = LogSession::start(dirs.config(), at(2024, 1, 5, 9, 0)).unwrap();
    session
        .record(&Message::new(at(2024, 1, 5, 9, 1), "mallory", "</table></body>"))
        .unwrap();
    session.shutdown().unwrap();

    let html = dirs.html_for(day(2024, 1, 5));
    assert_eq!(html.matches("</table>").count(), 1);
    assert!(html.contains("&lt;/table&gt;&lt;/body&gt;"));
    // Plaintext stays verbatim
    assert_eq!(
        dirs.plaintext_for(day(2024, 1, 5)),
        "09:01 mallory | </table></body>\n"
    );
}

#[test]
fn verbatim_markup_reproduces_text() {
    let dirs = Dirs::new();
    let session = LogSession::start(
        dirs.config().markup(Markup::Verbatim),
        at(2024, 1, 5, 9, 0),
    )
    .unwrap();
    session
        .record(&Message::new(at(2024, 1, 5, 9, 1), "dave", "<em>hi</em>"))
        .unwrap();
    session.shutdown().unwrap();

    assert!(dirs
        .html_for(day(2024, 1, 5))
        .contains(r#"<td class="msgmessage"><em>hi</em></td>"#));
}

/// Points the day's plaintext log at `/dev/full` so every write fails.
#[cfg(target_os = "linux")]
fn failing_plaintext(dirs: &Dirs, d: NaiveDate) {
    std::fs::create_dir_all(dirs.plain()).unwrap();
    std::os::unix::fs::symlink("/dev/full", paths::plaintext_log_path(&dirs.plain(), d)).unwrap();
}

#[cfg(target_os = "linux")]
#[test]
fn write_failure_compromises_the_day() {
    let dirs = Dirs::new();
    failing_plaintext(&dirs, day(2024, 1, 5));
    let session = LogSession::start(dirs.config(), at(2024, 1, 5, 9, 0)).unwrap();

    let err = session
        .record(&Message::new(at(2024, 1, 5, 9, 1), "a", "lost"))
        .unwrap_err();
    assert!(matches!(err, SessionError::Io(_)), "got {err:?}");
    assert!(session.is_compromised());
    assert_eq!(session.current_day(), Some(day(2024, 1, 5)));

    // No healing: the next message is refused without touching either file
    let err = session
        .record(&Message::new(at(2024, 1, 5, 9, 2), "b", "also lost"))
        .unwrap_err();
    assert!(matches!(err, SessionError::Compromised(d) if d == day(2024, 1, 5)));
    let html = dirs.html_for(day(2024, 1, 5));
    assert!(row_ids(&html).is_empty());

    // Same-day check leaves it compromised
    assert!(!session.check_rollover(at(2024, 1, 5, 23, 59)).unwrap());
    assert!(session.is_compromised());

    // The plaintext failure never touched the HTML document, so it is closed
    session.shutdown().unwrap();
    let html = dirs.html_for(day(2024, 1, 5));
    assert!(row_ids(&html).is_empty());
    assert!(html.ends_with("    </table>\n  </body>\n</html>\n"));
    assert_eq!(html.matches("</html>").count(), 1);

    // A second shutdown writes nothing more
    session.shutdown().unwrap();
    assert_eq!(dirs.html_for(day(2024, 1, 5)), html);
}

#[cfg(target_os = "linux")]
#[test]
fn dropping_compromised_session_closes_untouched_document() {
    let dirs = Dirs::new();
    failing_plaintext(&dirs, day(2024, 1, 5));
    let session = LogSession::start(dirs.config(), at(2024, 1, 5, 9, 0)).unwrap();
    assert!(session
        .record(&Message::new(at(2024, 1, 5, 9, 1), "a", "lost"))
        .is_err());
    assert!(session.is_compromised());

    drop(session);

    let html = dirs.html_for(day(2024, 1, 5));
    assert!(html.ends_with("</html>\n"));
    assert_eq!(html.matches("</html>").count(), 1);
}

#[cfg(target_os = "linux")]
#[test]
fn rollover_clears_compromised_state() {
    let dirs = Dirs::new();
    failing_plaintext(&dirs, day(2024, 1, 5));
    let session = LogSession::start(dirs.config(), at(2024, 1, 5, 9, 0)).unwrap();
    assert!(session
        .record(&Message::new(at(2024, 1, 5, 9, 1), "a", "lost"))
        .is_err());

    assert!(session.check_rollover(at(2024, 1, 6, 0, 0)).unwrap());
    assert!(session.is_open());
    assert_eq!(
        session
            .record(&Message::new(at(2024, 1, 6, 0, 1), "a", "fresh day"))
            .unwrap(),
        1
    );
    session.shutdown().unwrap();
    assert_eq!(dirs.plaintext_for(day(2024, 1, 6)), "00:01 a | fresh day\n");

    // The compromised day's document was closed on the way out
    let previous = dirs.html_for(day(2024, 1, 5));
    assert!(previous.ends_with("</html>\n"));
    assert_eq!(previous.matches("</html>").count(), 1);
}
