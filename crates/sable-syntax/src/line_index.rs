/// Incremental mapping from byte offset to `(line, column)`.
///
/// Line starts are recorded while the engine consumes bytes through
/// [`SourceReader`], never batch-computed, because positions are requested
/// interleaved with scanning.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line, strictly increasing.
    /// `line_starts[0]` is always 0.
    line_starts: Vec<u32>,
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl LineIndex {
    pub fn new() -> Self {
        LineIndex {
            line_starts: vec![0],
        }
    }

    /// Appends a line-start offset. Offsets must arrive in increasing order.
    pub fn record_newline(&mut self, offset: usize) {
        debug_assert!(
            self.line_starts
                .last()
                .is_none_or(|&last| (last as usize) < offset)
        );
        self.line_starts.push(offset as u32);
    }

    /// Resolves a byte offset to a zero-based `(line, column)` pair, taking
    /// the greatest recorded line start not beyond `offset`.
    pub fn position(&self, offset: usize) -> (u32, usize) {
        if self.line_starts.is_empty() {
            return (0, 0);
        }
        let line = self
            .line_starts
            .partition_point(|&start| start as usize <= offset)
            .saturating_sub(1);
        (line as u32, offset - self.line_starts[line] as usize)
    }

    /// Number of lines seen so far.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Byte-at-a-time reader over one immutable source buffer.
///
/// Every byte handed to the engine first passes through the newline detector:
/// `\r\n` is one boundary, lone `\r` or lone `\n` one each. A NUL byte ends
/// the input just like exhaustion.
#[derive(Debug)]
pub struct SourceReader<'a> {
    src: &'a [u8],
    pos: usize,
    last_cr: bool,
    line_index: LineIndex,
}

impl<'a> SourceReader<'a> {
    pub fn new(source: &'a str) -> Self {
        SourceReader {
            src: source.as_bytes(),
            pos: 0,
            last_cr: false,
            line_index: LineIndex::new(),
        }
    }

    /// Returns the next byte, or `None` at end of input.
    pub fn next_byte(&mut self) -> Option<u8> {
        let &byte = self.src.get(self.pos)?;
        if byte == 0 {
            return None;
        }
        self.pos += 1;
        match byte {
            b'\r' => {
                self.line_index.record_newline(self.pos);
                self.last_cr = true;
            }
            b'\n' => {
                // The boundary for a `\r\n` pair was recorded at the `\r`.
                if !self.last_cr {
                    self.line_index.record_newline(self.pos);
                }
                self.last_cr = false;
            }
            _ => self.last_cr = false,
        }
        Some(byte)
    }

    /// Current read offset into the source.
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }
}
