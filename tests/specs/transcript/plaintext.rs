//! Plaintext transcript specs

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn one_line_per_message() {
    let logger = Logger::new();
    logger
        .run(&input(&[
            connected(),
            message("2024-01-05T14:05:00", "alice", &["operator"], "hello"),
            message("2024-01-05T14:06:30", "bob", &[], "hi <alice> & all"),
        ]))
        .passes();

    assert_eq!(
        logger.plaintext(),
        "14:05 alice | hello\n14:06 bob | hi <alice> & all\n"
    );
}

#[test]
fn configured_time_format_is_used() {
    let logger = Logger::without_config();
    logger.config(&format!("{MINIMAL_CONFIG}\ntime_log_format = \"%H:%M:%S\"\n"));
    logger
        .run(&input(&[
            connected(),
            message("2024-01-05T09:03:07", "alice", &[], "precise"),
        ]))
        .passes();

    assert_eq!(logger.plaintext(), "09:03:07 alice | precise\n");
}

#[test]
fn restart_on_same_day_appends() {
    let logger = Logger::new();
    logger
        .run(&input(&[
            connected(),
            message("2024-01-05T10:00:00", "alice", &[], "first run"),
        ]))
        .passes();
    logger
        .run(&input(&[
            connected(),
            message("2024-01-05T11:00:00", "alice", &[], "second run"),
        ]))
        .passes();

    assert_eq!(
        logger.plaintext(),
        "10:00 alice | first run\n11:00 alice | second run\n"
    );
}

#[test]
fn message_without_connect_is_recorded() {
    let logger = Logger::new();
    logger
        .run(&input(&[message("2024-01-05T10:00:00", "early", &[], "hi")]))
        .passes();

    assert_eq!(logger.plaintext(), "10:00 early | hi\n");
}
