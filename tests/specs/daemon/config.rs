//! Daemon configuration specs
//!
//! Verify lpd refuses to start without a usable config and never creates
//! transcripts in that case.

use crate::prelude::*;

#[test]
fn missing_html_dir_fails_before_reading_input() {
    let logger = Logger::without_config();
    logger.config("plaintext_log_dir = \"{plain}\"\n");

    logger
        .run(&input(&[connected()]))
        .fails()
        .stderr_has("missing required option `html_log_dir`");

    assert!(!logger.plain_dir().exists());
}

#[test]
fn missing_plaintext_dir_fails() {
    let logger = Logger::without_config();
    logger.config("html_log_dir = \"{html}\"\n");

    logger
        .run("")
        .fails()
        .stderr_has("missing required option `plaintext_log_dir`");
}

#[test]
fn missing_config_file_fails() {
    let logger = Logger::without_config();

    logger.run("").fails().stderr_has("failed to read config");
}

#[test]
fn invalid_time_format_fails() {
    let logger = Logger::without_config();
    logger.config(&format!("{MINIMAL_CONFIG}\ntime_log_format = \"%Q\"\n"));

    logger.run("").fails().stderr_has("invalid config");
    assert!(!logger.html_dir().exists());
}

#[test]
fn unknown_option_fails() {
    let logger = Logger::without_config();
    logger.config(&format!("{MINIMAL_CONFIG}\nlog_everything = true\n"));

    logger.run("").fails().stderr_has("unknown field");
}
