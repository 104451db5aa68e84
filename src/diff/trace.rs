//! Forward pass of Myers' O(ND) algorithm.
//!
//! The pass keeps one [`Frontier`] per edit distance so the backward pass can
//! revisit every level.

use rayon::prelude::*;

use super::hunk::Op;
use crate::config::worker_threads;

/// Narrower levels are not worth handing to the thread pool.
pub const PARALLEL_MIN_DIAGONALS: usize = 1024;

/// Furthest A position reached on every diagonal `k = a - b` with exactly
/// `d` edits. Only diagonals `-d, -d + 2, ..., d` are populated; the last
/// frontier of a trace stops at the diagonal that reached the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontier {
    d: usize,
    reach: Vec<usize>,
}

impl Frontier {
    pub fn distance(&self) -> usize {
        self.d
    }

    pub fn get(&self, k: isize) -> usize {
        let d = self.d as isize;
        assert!(
            (-d..=d).contains(&k) && (k + d) % 2 == 0,
            "diagonal {} is not on frontier {}",
            k,
            d
        );
        self.reach[((k + d) / 2) as usize]
    }

    pub fn diagonals(&self) -> impl Iterator<Item = (isize, usize)> + '_ {
        self.reach
            .iter()
            .enumerate()
            .map(|(i, &a_pos)| (diagonal(self.d, i), a_pos))
    }

    pub fn len(&self) -> usize {
        self.reach.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reach.is_empty()
    }
}

fn diagonal(d: usize, i: usize) -> isize {
    2 * i as isize - d as isize
}

pub(crate) fn b_position(a_pos: usize, k: isize) -> usize {
    a_pos
        .checked_add_signed(-k)
        .unwrap_or_else(|| panic!("position {} lies left of diagonal {}", a_pos, k))
}

/// A position right after taking `op` from `a_pos`.
pub(crate) fn step(op: Op, a_pos: usize) -> usize {
    match op {
        Op::Insert => a_pos,
        Op::Delete => a_pos + 1,
    }
}

/// Which diagonal of `prev` (distance `d - 1`) the furthest path on diagonal
/// `k` at distance `d` comes from: down from `k + 1` (insert) or right from
/// `k - 1` (delete). Equal reach goes right.
///
/// The forward pass records no choices, so the backward pass must call this
/// exact rule to retrace them.
pub fn choose_predecessor(prev: &Frontier, d: usize, k: isize) -> (Op, isize) {
    let d = d as isize;
    if k == -d || (k != d && prev.get(k - 1) < prev.get(k + 1)) {
        (Op::Insert, k + 1)
    } else {
        (Op::Delete, k - 1)
    }
}

/// Walks diagonal `k` at distance `d`, returning the reached A position and
/// whether it is the end of both sequences.
fn reach_on<T: PartialEq>(
    a: &[T],
    b: &[T],
    prev: Option<&Frontier>,
    d: usize,
    k: isize,
) -> (usize, bool) {
    let mut a_pos = match prev {
        None => 0,
        Some(prev) => {
            let (op, k_prev) = choose_predecessor(prev, d, k);
            step(op, prev.get(k_prev))
        }
    };
    let mut b_pos = b_position(a_pos, k);
    while a_pos < a.len() && b_pos < b.len() && a[a_pos] == b[b_pos] {
        a_pos += 1;
        b_pos += 1;
    }
    (a_pos, a_pos >= a.len() && b_pos >= b.len())
}

fn advance_sequential<T: PartialEq>(
    a: &[T],
    b: &[T],
    prev: Option<&Frontier>,
    d: usize,
) -> (Frontier, bool) {
    let mut reach = Vec::with_capacity(d + 1);
    for i in 0..=d {
        let (a_pos, solved) = reach_on(a, b, prev, d, diagonal(d, i));
        reach.push(a_pos);
        if solved {
            return (Frontier { d, reach }, true);
        }
    }
    (Frontier { d, reach }, false)
}

fn advance_parallel<T: PartialEq + Sync>(
    a: &[T],
    b: &[T],
    prev: Option<&Frontier>,
    d: usize,
) -> (Frontier, bool) {
    let results: Vec<(usize, bool)> = (0..=d)
        .into_par_iter()
        .map(|i| reach_on(a, b, prev, d, diagonal(d, i)))
        .collect();
    // keep what the sequential scan would have produced
    let solved_at = results.iter().position(|&(_, solved)| solved);
    let end = solved_at.map_or(results.len(), |i| i + 1);
    let reach = results[..end].iter().map(|&(a_pos, _)| a_pos).collect();
    (Frontier { d, reach }, solved_at.is_some())
}

fn build<T: PartialEq + Sync>(a: &[T], b: &[T], parallel_from: Option<usize>) -> Vec<Frontier> {
    let max_d = a.len() + b.len();
    let mut trace: Vec<Frontier> = Vec::new();
    for d in 0..=max_d {
        let prev = trace.last();
        let (frontier, solved) = match parallel_from {
            Some(min) if d + 1 >= min => advance_parallel(a, b, prev, d),
            _ => advance_sequential(a, b, prev, d),
        };
        log::trace!("d={} covers {} diagonals", d, frontier.len());
        trace.push(frontier);
        if solved {
            log::debug!(
                "trace of {} x {} solved at distance {}",
                a.len(),
                b.len(),
                d
            );
            return trace;
        }
    }
    panic!("trace did not converge within {} edits", max_d);
}

/// Runs the forward pass, returning frontiers for distances `0..=D` where `D`
/// is the shortest edit distance between `a` and `b`.
pub fn build_trace<T: PartialEq + Sync>(a: &[T], b: &[T]) -> Vec<Frontier> {
    let parallel_from = (worker_threads() > 1).then_some(PARALLEL_MIN_DIAGONALS);
    build(a, b, parallel_from)
}
