//! Daemon shutdown specs
//!
//! Verify every way lpd stops leaves a complete HTML document.

use crate::prelude::*;
use std::io::Write;

#[test]
fn end_of_input_closes_document() {
    let logger = Logger::new();
    logger
        .run(&input(&[
            connected(),
            message("2024-01-05T14:05:00", "alice", &[], "bye"),
        ]))
        .passes();

    let html = logger.html();
    assert!(html.ends_with("    </table>\n  </body>\n</html>\n"), "html: {html}");
    assert_eq!(html.matches("</html>").count(), 1);
}

#[test]
fn no_input_opens_nothing() {
    let logger = Logger::new();
    logger.run("").passes();

    assert!(!logger.plain_dir().exists());
    assert!(!logger.html_dir().exists());
}

fn terminated_by(signal: &str) {
    let logger = Logger::new();
    let mut child = logger.spawn();
    let mut stdin = child.stdin.take().unwrap();
    stdin
        .write_all(
            input(&[
                connected(),
                message("2024-01-05T14:05:00", "alice", &["operator"], "still running"),
            ])
            .as_bytes(),
        )
        .unwrap();
    stdin.flush().unwrap();

    let recorded = wait_for(SPEC_WAIT_MAX_MS, || {
        logger.has_html() && logger.html().contains("still running")
    });
    assert!(recorded, "message never reached the transcript\n{}", logger.daemon_log());

    send_signal(&child, signal);
    let output = child.wait_with_output().unwrap();
    drop(stdin);

    RunAssert::from_output(output).passes();
    let html = logger.html();
    assert!(html.ends_with("</html>\n"), "html: {html}");
    assert_eq!(html.matches("</html>").count(), 1);
    assert_eq!(logger.plaintext(), "14:05 alice | still running\n");
}

#[test]
fn sigterm_closes_document() {
    terminated_by("-TERM");
}

#[test]
fn sigint_closes_document() {
    terminated_by("-INT");
}
