// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn same_day_check_is_a_no_op() {
    let dirs = Dirs::new();
    let session = LogSession::start(dirs.config(), at(2024, 1, 5, 23, 0)).unwrap();
    session
        .record(&Message::new(at(2024, 1, 5, 23, 1), "a", "first"))
        .unwrap();

    assert!(!session.check_rollover(at(2024, 1, 5, 23, 5)).unwrap());
    assert!(!session.check_rollover(at(2024, 1, 5, 23, 59)).unwrap());

    // Still the same document: nothing reopened or truncated
    assert_eq!(
        session
            .record(&Message::new(at(2024, 1, 5, 23, 6), "b", "second"))
            .unwrap(),
        2
    );
    session.shutdown().unwrap();

    let html = dirs.html_for(day(2024, 1, 5));
    assert_eq!(html.matches("<!DOCTYPE HTML>").count(), 1);
    assert_eq!(html.matches("</html>").count(), 1);
    assert_eq!(row_ids(&html), vec![1, 2]);
    assert_eq!(
        dirs.plaintext_for(day(2024, 1, 5)),
        "23:01 a | first\n23:06 b | second\n"
    );
}

#[test]
fn new_day_closes_old_document_and_resets_sequence() {
    let dirs = Dirs::new();
    let session = LogSession::start(dirs.config(), at(2024, 1, 5, 23, 0)).unwrap();
    session
        .record(&Message::new(at(2024, 1, 5, 23, 58), "a", "good night"))
        .unwrap();
    session
        .record(&Message::new(at(2024, 1, 5, 23, 59), "b", "night"))
        .unwrap();

    assert!(session.check_rollover(at(2024, 1, 6, 0, 1)).unwrap());
    assert_eq!(session.current_day(), Some(day(2024, 1, 6)));
    assert_eq!(session.sequence(), 0);

    let old = dirs.html_for(day(2024, 1, 5));
    assert_eq!(old.matches("</table>").count(), 1);
    assert!(old.ends_with("</html>\n"));
    assert_eq!(row_ids(&old), vec![1, 2]);

    assert_eq!(
        session
            .record(&Message::new(at(2024, 1, 6, 0, 2), "a", "good morning"))
            .unwrap(),
        1
    );
    session.shutdown().unwrap();

    let new = dirs.html_for(day(2024, 1, 6));
    assert!(new.contains("<title>Chatlogs #rust 2024-01-06</title>"));
    assert!(new.contains("<h1>Chatlogs for #rust, 2024-01-06</h1>"));
    assert_eq!(row_ids(&new), vec![1]);
    assert_eq!(dirs.plaintext_for(day(2024, 1, 6)), "00:02 a | good morning\n");
    // The old day's plaintext is untouched by the new day's writes
    assert_eq!(
        dirs.plaintext_for(day(2024, 1, 5)),
        "23:58 a | good night\n23:59 b | night\n"
    );
    // Footer written exactly once for the old document, even after shutdown
    assert_eq!(
        dirs.html_for(day(2024, 1, 5)).matches("</html>").count(),
        1
    );
}

#[yare::parameterized(
    next_day        = { at(2024, 1, 5, 12, 0),  at(2024, 1, 6, 0, 0) },
    same_dom_next_month = { at(2024, 1, 5, 12, 0), at(2024, 2, 5, 12, 0) },
    new_year        = { at(2023, 12, 31, 23, 59), at(2024, 1, 1, 0, 0) },
    clock_moved_back = { at(2024, 1, 5, 0, 5),  at(2024, 1, 4, 23, 59) },
)]
fn any_calendar_change_rolls_over(start: NaiveDateTime, later: NaiveDateTime) {
    let dirs = Dirs::new();
    let session = LogSession::start(dirs.config(), start).unwrap();
    assert!(session.check_rollover(later).unwrap());
    assert_eq!(session.current_day(), Some(later.date()));
    session.shutdown().unwrap();
    assert!(dirs.html_for(later.date()).ends_with("</html>\n"));
}

#[test]
fn explicit_rollover_reopens_even_on_same_day() {
    let dirs = Dirs::new();
    let session = LogSession::start(dirs.config(), at(2024, 1, 5, 9, 0)).unwrap();
    session
        .record(&Message::new(at(2024, 1, 5, 9, 1), "a", "one"))
        .unwrap();

    session.rollover(at(2024, 1, 5, 9, 2)).unwrap();
    assert_eq!(session.sequence(), 0);
    session
        .record(&Message::new(at(2024, 1, 5, 9, 3), "a", "two"))
        .unwrap();
    session.shutdown().unwrap();

    // Plaintext continues; the HTML document starts over
    assert_eq!(
        dirs.plaintext_for(day(2024, 1, 5)),
        "09:01 a | one\n09:03 a | two\n"
    );
    assert_eq!(row_ids(&dirs.html_for(day(2024, 1, 5))), vec![1]);
}

#[test]
fn multiple_rollovers_keep_every_day_well_terminated() {
    let dirs = Dirs::new();
    let session = LogSession::start(dirs.config(), at(2024, 3, 1, 12, 0)).unwrap();
    for d in 1..=4u32 {
        session
            .record(&Message::new(at(2024, 3, d, 12, 0), "n", "msg"))
            .unwrap();
        assert!(session.check_rollover(at(2024, 3, d + 1, 0, 0)).unwrap());
    }
    session.shutdown().unwrap();

    for d in 1..=4u32 {
        let html = dirs.html_for(day(2024, 3, d));
        assert_eq!(row_ids(&html), vec![1], "day {d}");
        assert_eq!(html.matches("</html>").count(), 1, "day {d}");
    }
    assert!(row_ids(&dirs.html_for(day(2024, 3, 5))).is_empty());
}

#[test]
fn rollover_into_unopenable_day_compromises_it() {
    let dirs = Dirs::new();
    let session = LogSession::start(dirs.config(), at(2024, 1, 5, 12, 0)).unwrap();

    // A directory where the next day's html file should go
    std::fs::create_dir_all(paths::html_log_path(&dirs.html(), day(2024, 1, 6))).unwrap();

    let err = session.check_rollover(at(2024, 1, 6, 0, 0)).unwrap_err();
    assert!(matches!(err, SessionError::Open { .. }), "got {err:?}");
    assert!(session.is_compromised());
    assert_eq!(session.current_day(), Some(day(2024, 1, 6)));
    // The previous day was still closed cleanly
    assert!(dirs.html_for(day(2024, 1, 5)).ends_with("</html>\n"));

    assert!(matches!(
        session.record(&Message::new(at(2024, 1, 6, 0, 1), "a", "b")),
        Err(SessionError::Compromised(_))
    ));
}
