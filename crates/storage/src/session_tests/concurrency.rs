// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;
const PER_THREAD: usize = 25;

#[test]
fn concurrent_records_never_interleave() {
    let dirs = Dirs::new();
    let session = Arc::new(LogSession::start(dirs.config(), at(2024, 1, 5, 12, 0)).unwrap());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let session = Arc::clone(&session);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..PER_THREAD)
                    .map(|i| {
                        let text = format!("thread {t} message {i} {}", "x".repeat(200));
                        let msg = Message::new(at(2024, 1, 5, 12, 1), format!("user{t}"), text);
                        (session.record(&msg).unwrap(), t, i)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut assigned: Vec<(u64, usize, usize)> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    session.shutdown().unwrap();
    assigned.sort();

    let total = THREADS * PER_THREAD;
    let ids: Vec<u64> = assigned.iter().map(|(seq, _, _)| *seq).collect();
    assert_eq!(ids, (1..=total as u64).collect::<Vec<_>>());

    let plaintext = dirs.plaintext_for(day(2024, 1, 5));
    let lines: Vec<&str> = plaintext.lines().collect();
    assert_eq!(lines.len(), total);

    let html = dirs.html_for(day(2024, 1, 5));
    assert_eq!(row_ids(&html), ids);

    // Line K and row K describe the same message
    for ((seq, t, i), line) in assigned.iter().zip(&lines) {
        let expected = format!("12:01 user{t} | thread {t} message {i} {}", "x".repeat(200));
        assert_eq!(*line, expected, "line for seq {seq}");
        let row_start = html.find(&format!("<tr id=\"msg-{seq}\">")).unwrap();
        let row = &html[row_start..];
        let row = &row[..row.find("</tr>").unwrap()];
        assert!(row.contains(&format!(">user{t}</td>")), "row {seq}: {row}");
        assert!(row.contains(&format!("thread {t} message {i} ")), "row {seq}: {row}");
    }
}

#[test]
fn concurrent_rollover_and_records_stay_consistent() {
    let dirs = Dirs::new();
    let session = Arc::new(LogSession::start(dirs.config(), at(2024, 1, 5, 23, 59)).unwrap());

    let writer = {
        let session = Arc::clone(&session);
        thread::spawn(move || {
            for i in 0..200 {
                session
                    .record(&Message::new(at(2024, 1, 5, 23, 59), "w", format!("m{i}")))
                    .unwrap();
            }
        })
    };
    let roller = {
        let session = Arc::clone(&session);
        thread::spawn(move || {
            for _ in 0..50 {
                session.check_rollover(at(2024, 1, 5, 23, 59)).unwrap();
            }
            session.check_rollover(at(2024, 1, 6, 0, 0)).unwrap()
        })
    };

    writer.join().unwrap();
    assert!(roller.join().unwrap());
    session.shutdown().unwrap();

    // Every message landed in exactly one day, in both formats, with ids
    // counting from 1 in each document
    let mut total_lines = 0;
    for d in [day(2024, 1, 5), day(2024, 1, 6)] {
        let lines = dirs.plaintext_for(d).lines().count();
        let ids = row_ids(&dirs.html_for(d));
        assert_eq!(ids, (1..=lines as u64).collect::<Vec<_>>());
        assert!(dirs.html_for(d).ends_with("</html>\n"));
        total_lines += lines;
    }
    assert_eq!(total_lines, 200);
}
