//! Reverse line reader.
//!
//! ファイル末尾からブロック単位で読み戻し、行を新しい順に返す。
//! ログ全体を読まずに最新の行だけを調べられる。
//! 各バイトは一度だけ読み、一度だけ探索する。

use std::io::{self, Read, Seek, SeekFrom};

const BLOCK_SIZE: usize = 64 * 1024;

/// Iterator over the lines of a seekable source, last line first.
///
/// - A trailing newline does not produce an empty first line.
/// - `\r` before a newline is dropped.
/// - Invalid UTF-8 is replaced lossily.
/// - With a byte limit, iteration ends once the limit is read; a line cut
///   by the limit is not returned.
pub struct ReverseLines<R> {
    reader: R,
    /// Bytes before this offset have not been read yet.
    pos: u64,
    /// Most recently read block; only `block[..cursor]` is unconsumed.
    block: Vec<u8>,
    cursor: usize,
    /// Tail pieces of the line being assembled, newest piece first.
    partial: Vec<Vec<u8>>,
    block_size: usize,
    /// Bytes still allowed to be read.
    budget: u64,
    started: bool,
    done: bool,
}

impl<R: Read + Seek> ReverseLines<R> {
    pub fn new(reader: R) -> io::Result<Self> {
        Self::with_block_size(reader, BLOCK_SIZE)
    }

    pub fn with_block_size(mut reader: R, block_size: usize) -> io::Result<Self> {
        let pos = reader.seek(SeekFrom::End(0))?;
        Ok(Self {
            reader,
            pos,
            block: Vec::new(),
            cursor: 0,
            partial: Vec::new(),
            block_size: block_size.max(1),
            budget: u64::MAX,
            started: false,
            done: false,
        })
    }

    /// Stop after reading `max_bytes` from the end of the source.
    pub fn byte_limit(mut self, max_bytes: u64) -> Self {
        self.budget = max_bytes;
        self
    }

    /// Read the block before `pos`. Returns `false` when the byte budget is spent.
    fn fill(&mut self) -> io::Result<bool> {
        let size = (self.block_size as u64).min(self.pos).min(self.budget);
        if size == 0 {
            return Ok(false);
        }
        self.budget -= size;
        self.pos -= size;
        self.reader.seek(SeekFrom::Start(self.pos))?;
        self.block.resize(size as usize, 0);
        self.reader.read_exact(&mut self.block)?;
        self.cursor = self.block.len();
        Ok(true)
    }

    fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            if self.done {
                return Ok(None);
            }
            let rest = &self.block[..self.cursor];
            if let Some(idx) = rest.iter().rposition(|&b| b == b'\n') {
                let head = &self.block[idx + 1..self.cursor];
                let trailing = !self.started && head.is_empty() && self.partial.is_empty();
                self.started = true;
                let line = (!trailing).then(|| assemble(head, &mut self.partial));
                self.cursor = idx;
                match line {
                    Some(line) => return Ok(Some(line)),
                    None => continue,
                }
            }
            if self.cursor > 0 {
                self.partial.push(rest.to_vec());
                self.cursor = 0;
            }
            if self.pos == 0 {
                self.done = true;
                // an empty file has no lines; otherwise the head is a line even if empty
                if self.partial.is_empty() && !self.started {
                    return Ok(None);
                }
                return Ok(Some(assemble(&[], &mut self.partial)));
            }
            if !self.fill()? {
                self.done = true;
                return Ok(None);
            }
        }
    }
}

/// Join `head` with the pieces collected from later blocks.
fn assemble(head: &[u8], partial: &mut Vec<Vec<u8>>) -> String {
    let len = head.len() + partial.iter().map(Vec::len).sum::<usize>();
    let mut line = Vec::with_capacity(len);
    line.extend_from_slice(head);
    for piece in partial.drain(..).rev() {
        line.extend_from_slice(&piece);
    }
    decode(&line)
}

fn decode(line: &[u8]) -> String {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

impl<R: Read + Seek> Iterator for ReverseLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_line() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
