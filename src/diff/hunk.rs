use bincode::{Decode, Encode};

use super::snake::Snake;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
pub enum Op {
    Insert,
    Delete,
}

impl Op {
    pub fn symbol(self) -> u8 {
        match self {
            Op::Insert => b'+',
            Op::Delete => b'-',
        }
    }

    pub fn from_symbol(symbol: u8) -> Option<Self> {
        match symbol {
            b'+' => Some(Op::Insert),
            b'-' => Some(Op::Delete),
            _ => None,
        }
    }

    pub fn inverse(self) -> Self {
        match self {
            Op::Insert => Op::Delete,
            Op::Delete => Op::Insert,
        }
    }
}

/// A run of same-direction edits anchored at its first element.
///
/// `data` holds the inserted elements of B or the deleted elements of A, and
/// is exactly `length` long once the hunk leaves [`compact`].
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Hunk<T> {
    pub a_pos: usize,
    pub b_pos: usize,
    pub op: Op,
    pub length: usize,
    pub data: Vec<T>,
}

impl<T> Hunk<T> {
    /// Position in A right after this hunk, `None` if it overflows.
    pub fn a_after(&self) -> Option<usize> {
        match self.op {
            Op::Insert => Some(self.a_pos),
            Op::Delete => self.a_pos.checked_add(self.length),
        }
    }

    /// Position in B right after this hunk, `None` if it overflows.
    pub fn b_after(&self) -> Option<usize> {
        match self.op {
            Op::Insert => self.b_pos.checked_add(self.length),
            Op::Delete => Some(self.b_pos),
        }
    }

    /// Whether `self` starts exactly where `prev` ends.
    pub fn follows(&self, prev: &Hunk<T>) -> bool {
        prev.a_after() == Some(self.a_pos) && prev.b_after() == Some(self.b_pos)
    }
}

/// Merges an end-to-start snake list into start-to-end hunks without data.
///
/// A snake joins the running hunk only if it has the same direction and no
/// matching run separates the two.
fn coalesce<T>(snakes: &[Snake]) -> Vec<Hunk<T>> {
    let mut hunks = Vec::new();
    let mut running: Option<Hunk<T>> = None;

    for snake in snakes {
        let Some(op) = snake.op() else {
            continue;
        };
        let extendable = running
            .as_mut()
            .filter(|hunk| hunk.op == op && !snake.has_diagonal());
        if let Some(hunk) = extendable {
            // walking backwards, so the latest position is the earliest
            hunk.a_pos = snake.a_start;
            hunk.b_pos = snake.b_start;
            hunk.length += 1;
            continue;
        }
        hunks.extend(running.replace(Hunk {
            a_pos: snake.a_start,
            b_pos: snake.b_start,
            op,
            length: 1,
            data: Vec::new(),
        }));
    }
    hunks.extend(running);

    hunks.reverse();
    hunks
}

/// Turns end-to-start snakes into start-to-end hunks carrying the literal
/// elements sliced from `a` (deletes) or `b` (inserts).
pub fn compact<T: Clone>(snakes: &[Snake], a: &[T], b: &[T]) -> Vec<Hunk<T>> {
    let mut hunks = coalesce(snakes);
    for hunk in &mut hunks {
        hunk.data = match hunk.op {
            Op::Insert => b[hunk.b_pos..hunk.b_pos + hunk.length].to_vec(),
            Op::Delete => a[hunk.a_pos..hunk.a_pos + hunk.length].to_vec(),
        };
    }
    log::debug!(
        "compacted {} snakes into {} hunks",
        snakes.len(),
        hunks.len()
    );
    hunks
}
