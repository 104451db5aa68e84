use super::{
    hunk::Op,
    trace::{Frontier, b_position, choose_predecessor, step},
};

/// One backward-reconstructed step: a single edit from `start` to `mid`,
/// then matching elements from `mid` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snake {
    pub a_start: usize,
    pub b_start: usize,
    pub a_mid: usize,
    pub b_mid: usize,
    pub a_end: usize,
    pub b_end: usize,
}

impl Snake {
    pub fn is_valid(&self) -> bool {
        self.a_start <= self.a_mid
            && self.b_start <= self.b_mid
            && self.a_mid <= self.a_end
            && self.b_mid <= self.b_end
            && self.a_end - self.a_mid == self.b_end - self.b_mid
    }

    /// Whether any elements match after the edit.
    pub fn has_diagonal(&self) -> bool {
        self.a_mid != self.a_end || self.b_mid != self.b_end
    }

    /// `None` for the leading run at distance 0, which has no edit.
    pub fn op(&self) -> Option<Op> {
        if self.a_start < self.a_mid {
            Some(Op::Delete)
        } else if self.b_start < self.b_mid {
            Some(Op::Insert)
        } else {
            None
        }
    }
}

/// Walks `trace` back from `(a_len, b_len)` to the origin, returning one
/// snake per edit distance in end-to-start order.
pub fn extract_snakes(trace: &[Frontier], a_len: usize, b_len: usize) -> Vec<Snake> {
    let mut snakes = Vec::with_capacity(trace.len());
    let (mut a_pos, mut b_pos) = (a_len, b_len);
    let mut d = trace.len().checked_sub(1).expect("trace has no frontier");

    while a_pos > 0 || b_pos > 0 {
        let k = a_pos as isize - b_pos as isize;
        let a_end = trace[d].get(k);
        let b_end = b_position(a_end, k);

        let snake = if d == 0 {
            Snake {
                a_start: 0,
                b_start: 0,
                a_mid: 0,
                b_mid: 0,
                a_end,
                b_end,
            }
        } else {
            let prev = &trace[d - 1];
            let (op, k_prev) = choose_predecessor(prev, d, k);
            let a_start = prev.get(k_prev);
            let a_mid = step(op, a_start);
            Snake {
                a_start,
                b_start: b_position(a_start, k_prev),
                a_mid,
                b_mid: b_position(a_mid, k),
                a_end,
                b_end,
            }
        };
        debug_assert!(snake.is_valid(), "invalid snake {:?}", snake);
        snakes.push(snake);

        a_pos = snake.a_start;
        b_pos = snake.b_start;
        if d == 0 {
            break;
        }
        d -= 1;
    }

    log::debug!("extracted {} snakes", snakes.len());
    snakes
}
