//! Content and token change notifications never create or evict handles;
//! they ping the cached handles inside the changed range.

mod common;

use common::{fixture, window_ids};
use core_window::{Reconciler, TokenRange};

fn content_pings(w: &core_window::LineWindow<common::TestLine>) -> Vec<u32> {
    w.lines().iter().map(|l| l.content_pings).collect()
}

fn token_pings(w: &core_window::LineWindow<common::TestLine>) -> Vec<u32> {
    w.lines().iter().map(|l| l.token_pings).collect()
}

#[test]
fn content_change_inside_pings_exactly_that_line() {
    let r = Reconciler::new();
    let mut w = fixture();
    assert!(r.on_lines_changed(&mut w, 8, 1));
    assert_eq!(content_pings(&w), vec![0, 0, 1, 0]);
    assert_eq!(token_pings(&w), vec![0, 0, 0, 0]);
}

#[test]
fn content_change_outside_touches_nothing() {
    let r = Reconciler::new();
    let mut w = fixture();
    let before = w.clone();
    assert!(!r.on_lines_changed(&mut w, 3, 1));
    assert!(!r.on_lines_changed(&mut w, 1, 5));
    assert!(!r.on_lines_changed(&mut w, 10, 3));
    assert_eq!(w, before);
}

#[test]
fn content_change_clips_at_both_edges() {
    let r = Reconciler::new();
    let mut w = fixture();
    assert!(r.on_lines_changed(&mut w, 4, 3)); // 4..=6
    assert!(r.on_lines_changed(&mut w, 9, 5)); // 9..=13
    assert_eq!(content_pings(&w), vec![1, 0, 0, 1]);
    assert!(r.on_lines_changed(&mut w, 1, 50));
    assert_eq!(content_pings(&w), vec![2, 1, 1, 2]);
}

#[test]
fn zero_count_change_pings_nothing() {
    let r = Reconciler::new();
    let mut w = fixture();
    assert!(!r.on_lines_changed(&mut w, 7, 0));
    assert_eq!(content_pings(&w), vec![0, 0, 0, 0]);
}

#[test]
fn token_range_crossing_window_pings_each_line_once() {
    let r = Reconciler::new();
    let mut w = fixture();
    assert!(r.on_tokens_changed(&mut w, &[TokenRange::new(5, 10)]));
    assert_eq!(token_pings(&w), vec![1, 1, 1, 1]);
    assert_eq!(content_pings(&w), vec![0, 0, 0, 0]);
}

#[test]
fn overlapping_token_ranges_ping_per_range() {
    let r = Reconciler::new();
    let mut w = fixture();
    let ranges = [
        TokenRange::new(1, 2),
        TokenRange::new(7, 8),
        TokenRange::new(8, 9),
    ];
    assert!(r.on_tokens_changed(&mut w, &ranges));
    assert_eq!(token_pings(&w), vec![0, 1, 2, 1]);
}

#[test]
fn token_ranges_outside_window_report_false() {
    let r = Reconciler::new();
    let mut w = fixture();
    let before = w.clone();
    assert!(!r.on_tokens_changed(&mut w, &[TokenRange::new(1, 5), TokenRange::new(10, 99)]));
    assert!(!r.on_tokens_changed(&mut w, &[]));
    assert_eq!(w, before);
}

#[test]
fn pings_follow_handles_after_structural_edits() {
    let r = Reconciler::new();
    let mut w = fixture();
    let mut f = common::TestFactory::new();
    r.on_lines_inserted(&mut w, &mut f, 2, 3); // window now 8..=11
    assert!(r.on_lines_changed(&mut w, 9, 1));
    assert_eq!(w.line(9).id, 7);
    assert_eq!(w.line(9).content_pings, 1);
    assert_eq!(window_ids(&w), vec![6, 7, 8, 9]);
}

#[test]
fn huge_change_count_still_reaches_window() {
    let r = Reconciler::new();
    let mut w = fixture();
    assert!(r.on_lines_changed(&mut w, 7, usize::MAX));
    assert_eq!(content_pings(&w), vec![0, 1, 1, 1]);
    assert!(r.on_lines_changed(&mut w, 1, usize::MAX));
    assert_eq!(content_pings(&w), vec![1, 2, 2, 2]);
}
