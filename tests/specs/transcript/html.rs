//! HTML transcript specs

use crate::prelude::*;

fn row_ids(html: &str) -> Vec<u64> {
    html.lines()
        .filter_map(|l| l.trim().strip_prefix("<tr id=\"msg-"))
        .filter_map(|l| l.strip_suffix("\">"))
        .map(|n| n.parse().unwrap())
        .collect()
}

#[test]
fn document_has_header_legend_and_rows() {
    let logger = Logger::new();
    logger
        .run(&input(&[
            connected(),
            message("2024-01-05T14:05:00", "alice", &["operator"], "hello"),
        ]))
        .passes();

    let html = logger.html();
    assert!(html.starts_with("<!DOCTYPE HTML>\n<html>\n"), "html: {html}");
    assert!(html.contains("<title>Chatlogs #specs "));
    assert!(html.contains("<h1>Chatlogs for #specs, "));
    assert!(html.contains("<dd>Channel operator (+o)</dd>"));
    assert!(html.contains("<table class=\"chattable\">"));
    assert!(html.contains("        <td class=\"msgtime\">14:05</td>\n"));
    assert!(html.contains("        <td class=\"msgnick opped\">alice</td>\n"));
    assert!(html.contains("        <td class=\"msgmessage\">hello</td>\n"));
}

#[test]
fn badges_follow_highest_role() {
    let logger = Logger::new();
    logger
        .run(&input(&[
            connected(),
            message("2024-01-05T14:00:00", "op", &["voiced", "operator"], "a"),
            message("2024-01-05T14:01:00", "half", &["half_operator"], "b"),
            message("2024-01-05T14:02:00", "voice", &["voiced"], "c"),
            message("2024-01-05T14:03:00", "plain", &[], "d"),
        ]))
        .passes();

    let html = logger.html();
    assert!(html.contains("<td class=\"msgnick opped\">op</td>"));
    assert!(html.contains("<td class=\"msgnick halfopped\">half</td>"));
    assert!(html.contains("<td class=\"msgnick voiced\">voice</td>"));
    assert!(html.contains("<td class=\"msgnick\">plain</td>"));
}

#[test]
fn rows_have_increasing_ids() {
    let logger = Logger::new();
    let mut lines = vec![connected()];
    for i in 0..5 {
        lines.push(message(
            &format!("2024-01-05T14:0{i}:00"),
            "alice",
            &[],
            &format!("line {i}"),
        ));
    }
    logger.run(&input(&lines)).passes();

    assert_eq!(row_ids(&logger.html()), vec![1, 2, 3, 4, 5]);
}

#[test]
fn message_text_is_escaped_by_default() {
    let logger = Logger::new();
    logger
        .run(&input(&[
            connected(),
            message("2024-01-05T14:05:00", "<mallory>", &[], "<script>alert(1)</script>"),
        ]))
        .passes();

    let html = logger.html();
    assert!(!html.contains("<script>"), "html: {html}");
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("&lt;mallory&gt;"));
}

#[test]
fn verbatim_markup_passes_text_through() {
    let logger = Logger::without_config();
    logger.config(&format!("{MINIMAL_CONFIG}\nmarkup = \"verbatim\"\n"));
    logger
        .run(&input(&[
            connected(),
            message("2024-01-05T14:05:00", "alice", &[], "<b>bold</b>"),
        ]))
        .passes();

    assert!(logger.html().contains("<td class=\"msgmessage\"><b>bold</b></td>"));
}

#[test]
fn restart_on_same_day_rewrites_html() {
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

    let html = logger.html();
    assert!(!html.contains("first run"), "html: {html}");
    assert!(html.contains("second run"));
    assert_eq!(html.matches("<!DOCTYPE HTML>").count(), 1);
    assert_eq!(row_ids(&html), vec![1]);
}
