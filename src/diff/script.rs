use bincode::{Decode, Encode, decode_from_slice, encode_to_vec};

use super::{
    Diff, Serde,
    hunk::{Hunk, Op, compact},
    snake::extract_snakes,
    trace::build_trace,
};
use crate::{
    err::{Error, Result},
    util::create_bincode_config,
};

/// Shortest insert/delete script turning `a` into `b`, as start-to-end hunks.
pub fn compute_edit_script<T: PartialEq + Clone + Sync>(a: &[T], b: &[T]) -> Vec<Hunk<T>> {
    let trace = build_trace(a, b);
    let snakes = extract_snakes(&trace, a.len(), b.len());
    compact(&snakes, a, b)
}

/// Byte-level edit script that can be applied in either direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct EditScript {
    hunks: Vec<Hunk<u8>>,
}

impl EditScript {
    pub fn new(hunks: Vec<Hunk<u8>>) -> Self {
        Self { hunks }
    }

    pub fn hunks(&self) -> &[Hunk<u8>] {
        &self.hunks
    }

    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Number of inserted plus deleted bytes.
    pub fn distance(&self) -> usize {
        self.hunks.iter().map(|hunk| hunk.length).sum()
    }

    /// The script turning B back into A.
    pub fn invert(&self) -> Self {
        let hunks = self
            .hunks
            .iter()
            .map(|hunk| Hunk {
                a_pos: hunk.b_pos,
                b_pos: hunk.a_pos,
                op: hunk.op.inverse(),
                length: hunk.length,
                data: hunk.data.clone(),
            })
            .collect();
        Self { hunks }
    }

    fn apply(&self, source: &[u8]) -> Result<Vec<u8>> {
        let mut target = Vec::with_capacity(source.len());
        let mut cursor = 0;

        for (index, hunk) in self.hunks.iter().enumerate() {
            if hunk.data.len() != hunk.length {
                return Err(Error::patch(
                    index,
                    format!(
                        "carries {} bytes but declares {}",
                        hunk.data.len(),
                        hunk.length
                    ),
                ));
            }
            if hunk.a_pos < cursor || hunk.a_pos > source.len() {
                return Err(Error::patch(
                    index,
                    format!(
                        "anchor {} outside {}..={}",
                        hunk.a_pos,
                        cursor,
                        source.len()
                    ),
                ));
            }
            target.extend_from_slice(&source[cursor..hunk.a_pos]);
            if target.len() != hunk.b_pos {
                return Err(Error::patch(
                    index,
                    format!("lands at {} instead of {}", target.len(), hunk.b_pos),
                ));
            }
            cursor = match hunk.op {
                Op::Insert => {
                    target.extend_from_slice(&hunk.data);
                    hunk.a_pos
                }
                Op::Delete => {
                    let end = hunk.a_pos + hunk.length;
                    if source.get(hunk.a_pos..end) != Some(hunk.data.as_slice()) {
                        return Err(Error::patch(
                            index,
                            format!("deleted bytes differ at {}..{}", hunk.a_pos, end),
                        ));
                    }
                    end
                }
            };
        }
        target.extend_from_slice(&source[cursor..]);

        Ok(target)
    }
}

impl Diff for EditScript {
    fn from_compare(old: &[u8], new: &[u8]) -> Self {
        Self {
            hunks: compute_edit_script(old, new),
        }
    }

    fn patch(&self, old: &[u8]) -> Result<Vec<u8>> {
        self.apply(old)
    }

    fn revert(&self, new: &[u8]) -> Result<Vec<u8>> {
        self.invert().apply(new)
    }
}

impl Serde for EditScript {
    fn serialize(&self) -> Result<Vec<u8>> {
        Ok(encode_to_vec(self, create_bincode_config())?)
    }

    fn deserialize(bytes: &[u8]) -> Result<Self> {
        let (script, _) = decode_from_slice(bytes, create_bincode_config())?;
        Ok(script)
    }
}
