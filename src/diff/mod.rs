pub mod hunk;
pub mod script;
pub mod snake;
pub mod trace;

pub use hunk::{Hunk, Op, compact};
pub use script::{EditScript, compute_edit_script};
pub use snake::{Snake, extract_snakes};
pub use trace::{Frontier, build_trace, choose_predecessor};

use crate::err::Result;

pub trait Serde {
    fn serialize(&self) -> Result<Vec<u8>>;
    fn deserialize(bytes: &[u8]) -> Result<Self>
    where
        Self: Sized;
}

pub trait Diff: Serde {
    fn from_compare(old: &[u8], new: &[u8]) -> Self
    where
        Self: Sized;
    fn patch(&self, old: &[u8]) -> Result<Vec<u8>>;
    fn revert(&self, new: &[u8]) -> Result<Vec<u8>>;
}
