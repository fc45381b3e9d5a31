//! Insertion against the `[6, 9]` fixture: above, at, inside (under and at
//! capacity), and below the window.

mod common;

use common::{TestFactory, fixture, ids, is_fresh, window_ids};
use core_window::Reconciler;

struct Outcome {
    evicted: Vec<usize>,
    start: usize,
    lines: Vec<usize>,
    created: usize,
}

fn run(from: usize, to: usize) -> Outcome {
    let r = Reconciler::new();
    let mut w = fixture();
    let mut f = TestFactory::new();
    let evicted = r.on_lines_inserted(&mut w, &mut f, from, to);
    Outcome {
        evicted: ids(&evicted),
        start: w.start_line_number(),
        lines: window_ids(&w),
        created: f.created,
    }
}

#[test]
fn at_or_above_start_only_shifts() {
    let o = run(6, 10);
    assert!(o.evicted.is_empty());
    assert_eq!(o.start, 11);
    assert_eq!(o.lines, vec![6, 7, 8, 9]);
    assert_eq!(o.created, 0);

    let o = run(3, 4);
    assert_eq!(o.start, 8);
    assert_eq!(o.lines, vec![6, 7, 8, 9]);

    let o = run(6, 6);
    assert_eq!(o.start, 7);
    assert_eq!(o.lines, vec![6, 7, 8, 9]);
}

#[test]
fn inside_under_capacity_pushes_tail_out() {
    let o = run(7, 7);
    assert_eq!(o.evicted, vec![9]);
    assert_eq!(o.start, 6);
    assert_eq!(o.lines, vec![6, 1001, 7, 8]);
    assert_eq!(o.created, 1);

    let o = run(7, 8);
    assert_eq!(o.evicted, vec![8, 9]);
    assert_eq!(o.lines, vec![6, 1001, 1002, 7]);
    assert_eq!(o.created, 2);

    let o = run(8, 8);
    assert_eq!(o.evicted, vec![9]);
    assert_eq!(o.lines, vec![6, 7, 1001, 8]);
}

#[test]
fn inside_exactly_at_capacity_evicts_whole_tail() {
    // count == tail_available: no fresh handles, window shrinks.
    let o = run(7, 9);
    assert_eq!(o.evicted, vec![7, 8, 9]);
    assert_eq!(o.start, 6);
    assert_eq!(o.lines, vec![6]);
    assert_eq!(o.created, 0);

    let o = run(8, 9);
    assert_eq!(o.evicted, vec![8, 9]);
    assert_eq!(o.lines, vec![6, 7]);
    assert_eq!(o.created, 0);

    let o = run(9, 9);
    assert_eq!(o.evicted, vec![9]);
    assert_eq!(o.lines, vec![6, 7, 8]);
    assert_eq!(o.created, 0);
}

#[test]
fn inside_over_capacity_evicts_whole_tail() {
    let o = run(7, 20);
    assert_eq!(o.evicted, vec![7, 8, 9]);
    assert_eq!(o.lines, vec![6]);
    assert_eq!(o.created, 0);
}

#[test]
fn strictly_below_is_noop() {
    let r = Reconciler::new();
    let mut w = fixture();
    let before = w.clone();
    let mut f = TestFactory::new();
    assert!(r.on_lines_inserted(&mut w, &mut f, 10, 10).is_empty());
    assert!(r.on_lines_inserted(&mut w, &mut f, 11, 30).is_empty());
    assert_eq!(w, before);
    assert_eq!(f.created, 0);
}

#[test]
fn shrunk_window_is_not_refilled() {
    let r = Reconciler::new();
    let mut w = fixture();
    let mut f = TestFactory::new();
    r.on_lines_inserted(&mut w, &mut f, 8, 12);
    assert_eq!(w.len(), 2);
    assert_eq!(w.end_line_number(), 7);
    // A later insert inside the smaller window works against its new length.
    let evicted = r.on_lines_inserted(&mut w, &mut f, 7, 7);
    assert_eq!(ids(&evicted), vec![7]);
    assert_eq!(window_ids(&w), vec![6]);
    assert_eq!(f.created, 0);
}

#[test]
fn fresh_handles_sit_at_inserted_line_numbers() {
    let r = Reconciler::new();
    let mut w = common::window_at(10, 8);
    let mut f = TestFactory::new();
    r.on_lines_inserted(&mut w, &mut f, 12, 14);
    for n in 12..=14 {
        assert!(is_fresh(w.line(n)), "line {n} should be fresh");
    }
    assert_eq!(w.line(11).id, 11);
    assert_eq!(w.line(15).id, 12);
    assert_eq!(w.line(17).id, 14);
    assert_eq!(w.len(), 8);
}

#[test]
fn closure_factory_works_through_reconciler() {
    let r = Reconciler::new();
    let mut w = fixture();
    let mut next = 500;
    let mut make = || {
        next += 1;
        common::TestLine::new(next)
    };
    let evicted = r.on_lines_inserted(&mut w, &mut make, 8, 8);
    assert_eq!(ids(&evicted), vec![9]);
    assert_eq!(window_ids(&w), vec![6, 7, 501, 8]);
}

#[test]
fn huge_insert_above_saturates_start() {
    let o = run(2, usize::MAX);
    assert!(o.evicted.is_empty());
    assert_eq!(o.start, usize::MAX);
    assert_eq!(o.lines, vec![6, 7, 8, 9]);
    assert_eq!(o.created, 0);
}
