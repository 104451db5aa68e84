//! Text instruction format.
//!
//! ```text
//! @<a_pos>,<b_pos>:<op><length>:<data>
//! ```
//!
//! `op` is `+` (insert) or `-` (delete) and `data` is `length` raw bytes,
//! unescaped. Every instruction ends with `\n`. In the compact layout a hunk
//! that starts where the previous one ended drops its `@a,b:` anchor.

use crate::{
    diff::{Hunk, Op},
    err::{Error, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Every hunk carries its anchor.
    #[default]
    Full,
    /// Anchors are omitted for hunks chained to their predecessor.
    Compact,
}

fn write_anchor(out: &mut Vec<u8>, hunk: &Hunk<u8>) {
    out.extend_from_slice(format!("@{},{}:", hunk.a_pos, hunk.b_pos).as_bytes());
}

fn write_body(out: &mut Vec<u8>, hunk: &Hunk<u8>) {
    out.push(hunk.op.symbol());
    out.extend_from_slice(hunk.length.to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(&hunk.data);
}

impl Hunk<u8> {
    /// Single instruction without the trailing newline.
    pub fn marshal(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() + 16);
        write_anchor(&mut out, self);
        write_body(&mut out, self);
        out
    }
}

pub fn render(hunks: &[Hunk<u8>], layout: Layout) -> Vec<u8> {
    let mut out = Vec::new();
    let mut prev: Option<&Hunk<u8>> = None;
    for hunk in hunks {
        let chained = layout == Layout::Compact && prev.is_some_and(|prev| hunk.follows(prev));
        if !chained {
            write_anchor(&mut out, hunk);
        }
        write_body(&mut out, hunk);
        out.push(b'\n');
        prev = Some(hunk);
    }
    out
}

struct Parser<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    fn is_done(&self) -> bool {
        self.offset >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.offset).copied()
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::parse(self.offset, reason)
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        match self.peek() {
            Some(found) if found == byte => {
                self.offset += 1;
                Ok(())
            }
            Some(found) => Err(self.error(format!(
                "expected {:?}, found {:?}",
                byte as char,
                found as char
            ))),
            None => Err(self.error(format!("expected {:?}, found end", byte as char))),
        }
    }

    fn number(&mut self) -> Result<usize> {
        let start = self.offset;
        let mut value: usize = 0;
        while let Some(digit @ b'0'..=b'9') = self.peek() {
            value = value
                .checked_mul(10)
                .and_then(|value| value.checked_add((digit - b'0') as usize))
                .ok_or_else(|| Error::parse(start, "number overflows"))?;
            self.offset += 1;
        }
        if self.offset == start {
            return Err(self.error("expected a decimal number"));
        }
        Ok(value)
    }

    fn op(&mut self) -> Result<Op> {
        let op = self
            .peek()
            .and_then(Op::from_symbol)
            .ok_or_else(|| self.error("expected '+' or '-'"))?;
        self.offset += 1;
        Ok(op)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|&end| end <= self.input.len())
            .ok_or_else(|| {
                self.error(format!(
                    "{} data bytes declared, {} left",
                    len,
                    self.input.len() - self.offset
                ))
            })?;
        let data = &self.input[self.offset..end];
        self.offset = end;
        Ok(data)
    }
}

/// Reads a script in either layout.
pub fn parse(input: &[u8]) -> Result<Vec<Hunk<u8>>> {
    let mut parser = Parser::new(input);
    let mut hunks: Vec<Hunk<u8>> = Vec::new();

    while !parser.is_done() {
        let (a_pos, b_pos) = if parser.peek() == Some(b'@') {
            parser.expect(b'@')?;
            let a_pos = parser.number()?;
            parser.expect(b',')?;
            let b_pos = parser.number()?;
            parser.expect(b':')?;
            (a_pos, b_pos)
        } else {
            let prev = hunks
                .last()
                .ok_or_else(|| parser.error("first hunk has no anchor"))?;
            match (prev.a_after(), prev.b_after()) {
                (Some(a_pos), Some(b_pos)) => (a_pos, b_pos),
                _ => return Err(parser.error("anchor overflows")),
            }
        };
        let op = parser.op()?;
        let length = parser.number()?;
        parser.expect(b':')?;
        let data = parser.take(length)?.to_vec();
        parser.expect(b'\n')?;
        hunks.push(Hunk {
            a_pos,
            b_pos,
            op,
            length,
            data,
        });
    }

    log::debug!("parsed {} hunks from {} bytes", hunks.len(), input.len());
    Ok(hunks)
}
