//! Streaming sentence/token parser.
//!
//! [`CorpusReader`] reads the preamble and the first token row, detects the
//! file's layout, and then hands out a [`SentenceReader`]: a forward-only,
//! lazy iterator that yields one [`SentenceContext`] per `#Text=` marker.
//! Consecutive markers with no rows between them belong to one sentence whose
//! text contained line breaks.
//!
//! ```text
//! #Text=Er sah sie .                              ← opens sent_1
//! 1-1  0-2   Er   ...  SubjA[1]  ...  *->127-4    ← token rows
//! 1-2  3-6   sah  ...
//! #Text=...                                       ← yields sent_1, opens sent_2
//! ```

mod cells;

pub use cells::{parse_clause_id, parse_pointers, parse_roles};

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::errors::{ClauseMateError, ClauseMateResult};
use crate::schema::{
    detect_layout, is_preamble_line, ColumnRole, FirstRow, LayoutDescriptor, Preamble,
    SchemaConfig,
};
use crate::sentence::{SentenceContext, TokenOffsets};
use crate::token::{CharSpan, CorefLayer, Token, TokenId};

const SENTENCE_MARKER: &str = "#Text=";

/// Split a data row on tabs, dropping a single trailing empty field.
pub fn split_fields(line: &str) -> Vec<&str> {
    let line = line.trim_end_matches(|c| c == '\r' || c == '\n');
    let mut fields: Vec<&str> = line.split('\t').collect();
    if fields.len() > 1 && fields.last().map_or(false, |f| f.is_empty()) {
        fields.pop();
    }
    fields
}

fn is_token_row(line: &str) -> bool {
    !line.trim().is_empty() && !line.starts_with('#')
}

enum RawLine {
    Text(String),
    /// Lossy rendering of a line that was not valid UTF-8
    Invalid(String),
}

/// Byte-level line source. Undecodable lines come back as [`RawLine::Invalid`]
/// instead of ending the stream.
struct RawLines<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
}

impl<R: BufRead> RawLines<R> {
    fn new(reader: R) -> Self {
        RawLines {
            reader,
            buf: Vec::new(),
            line_no: 0,
        }
    }

    fn next_line(&mut self) -> io::Result<Option<(usize, RawLine)>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        self.line_no += 1;
        let line = match std::str::from_utf8(&self.buf) {
            Ok(text) => RawLine::Text(text.to_string()),
            Err(_) => RawLine::Invalid(String::from_utf8_lossy(&self.buf).into_owned()),
        };
        Ok(Some((self.line_no, line)))
    }
}

/// Undecodable token rows are skipped with a diagnostic; any other line is
/// kept in its lossy form so sentence boundaries survive.
fn decode_line(
    source_name: &str,
    diagnostics: &mut Diagnostics,
    line_no: usize,
    raw: RawLine,
) -> Option<String> {
    let lossy = match raw {
        RawLine::Text(line) => return Some(line),
        RawLine::Invalid(lossy) => lossy,
    };
    if is_token_row(&lossy) {
        log::warn!("{}: line {}: skipped row: invalid UTF-8", source_name, line_no);
        diagnostics.push(Diagnostic::RowParse {
            line: line_no,
            reason: "invalid UTF-8".to_string(),
        });
        None
    } else {
        log::warn!("{}: line {}: replaced invalid UTF-8", source_name, line_no);
        Some(lossy)
    }
}

/// A file opened for parsing, with its layout already detected.
pub struct CorpusReader<R> {
    source_name: String,
    lines: RawLines<R>,
    /// Lines consumed during detection, replayed by the sentence reader
    buffered: VecDeque<(usize, String)>,
    layout: LayoutDescriptor,
    preamble: Preamble,
    diagnostics: Diagnostics,
}

impl CorpusReader<BufReader<File>> {
    /// Open a file and detect its layout.
    pub fn open(path: &Path, config: &SchemaConfig) -> ClauseMateResult<Self> {
        let file = File::open(path).map_err(|e| ClauseMateError::io(path, e))?;
        Self::from_reader(BufReader::new(file), path.display().to_string(), config)
    }
}

impl<R: BufRead> CorpusReader<R> {
    /// Read the preamble from any buffered source and detect its layout.
    pub fn from_reader(
        reader: R,
        source_name: impl Into<String>,
        config: &SchemaConfig,
    ) -> ClauseMateResult<Self> {
        let source_name = source_name.into();
        let mut lines = RawLines::new(reader);
        let mut buffered = VecDeque::new();
        let mut preamble = Preamble::default();
        let mut first_row = None;
        let mut diagnostics = Diagnostics::new(source_name.clone());

        while let Some((line_no, raw)) = lines
            .next_line()
            .map_err(|e| ClauseMateError::io(&source_name, e))?
        {
            let line = match decode_line(&source_name, &mut diagnostics, line_no, raw) {
                Some(line) => line,
                None => continue,
            };
            if is_preamble_line(&line) {
                preamble.push_line(&line);
                continue;
            }
            let found_row = is_token_row(&line);
            if found_row {
                first_row = Some(FirstRow {
                    line: line_no,
                    column_count: split_fields(&line).len(),
                });
            }
            buffered.push_back((line_no, line));
            if found_row {
                break;
            }
        }

        let layout = detect_layout(&source_name, &preamble, first_row, config, &mut diagnostics)?;

        Ok(Self {
            source_name,
            lines,
            buffered,
            layout,
            preamble,
            diagnostics,
        })
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn layout(&self) -> &LayoutDescriptor {
        &self.layout
    }

    pub fn preamble(&self) -> &Preamble {
        &self.preamble
    }

    /// Start streaming sentences, numbering them after `offsets`.
    pub fn sentences(self, offsets: TokenOffsets) -> SentenceReader<R> {
        SentenceReader {
            source_name: self.source_name,
            lines: self.lines,
            buffered: self.buffered,
            layout: self.layout,
            diagnostics: self.diagnostics,
            offsets,
            current: None,
            sentence_count: 0,
            token_count: 0,
            error: None,
        }
    }
}

/// Lazy sentence stream over one file.
///
/// The stream is single-pass; restarting means reopening the source. An I/O
/// error ends the stream early and is returned by [`SentenceReader::finish`].
pub struct SentenceReader<R> {
    source_name: String,
    lines: RawLines<R>,
    buffered: VecDeque<(usize, String)>,
    layout: LayoutDescriptor,
    diagnostics: Diagnostics,
    offsets: TokenOffsets,
    current: Option<SentenceContext>,
    sentence_count: usize,
    token_count: usize,
    error: Option<ClauseMateError>,
}

impl<R: BufRead> SentenceReader<R> {
    pub fn layout(&self) -> &LayoutDescriptor {
        &self.layout
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Sentences yielded or opened so far.
    pub fn sentence_count(&self) -> usize {
        self.sentence_count
    }

    /// Tokens accepted so far.
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Offsets a following chapter should start from.
    pub fn next_offsets(&self) -> TokenOffsets {
        TokenOffsets::new(
            self.offsets.sentence + self.sentence_count,
            self.offsets.token + self.token_count,
        )
    }

    /// Consume the reader, returning its diagnostics or the I/O error that
    /// ended it.
    pub fn finish(self) -> ClauseMateResult<Diagnostics> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.diagnostics),
        }
    }

    fn next_line(&mut self) -> Option<(usize, String)> {
        if let Some(buffered) = self.buffered.pop_front() {
            return Some(buffered);
        }
        while self.error.is_none() {
            match self.lines.next_line() {
                Ok(Some((line_no, raw))) => {
                    if let Some(line) =
                        decode_line(&self.source_name, &mut self.diagnostics, line_no, raw)
                    {
                        return Some((line_no, line));
                    }
                }
                Ok(None) => return None,
                Err(e) => {
                    log::warn!(
                        "{}: read failed after line {}: {}",
                        self.source_name,
                        self.lines.line_no,
                        e
                    );
                    self.error = Some(ClauseMateError::io(&self.source_name, e));
                }
            }
        }
        None
    }

    fn open_sentence(&mut self, text: &str) -> SentenceContext {
        self.sentence_count += 1;
        SentenceContext::new(
            self.sentence_count,
            self.offsets.sentence + self.sentence_count,
            text.trim(),
        )
    }

    fn push_row(&mut self, line_no: usize, line: &str) {
        let global_index = self.offsets.token + self.token_count;
        match parse_token_row(line, &self.layout, global_index) {
            Ok((token, invalid_items)) => {
                for item in invalid_items {
                    log::debug!(
                        "{}: line {}: ignoring unparseable pointer {:?}",
                        self.source_name,
                        line_no,
                        item
                    );
                }
                if self.current.is_none() {
                    log::debug!(
                        "{}: line {}: token row before any sentence marker",
                        self.source_name,
                        line_no
                    );
                    let implicit = self.open_sentence("");
                    self.current = Some(implicit);
                }
                if let Some(sentence) = self.current.as_mut() {
                    sentence.tokens.push(token);
                    self.token_count += 1;
                }
            }
            Err(reason) => {
                log::warn!("{}: line {}: skipped row: {}", self.source_name, line_no, reason);
                self.diagnostics.push(Diagnostic::RowParse {
                    line: line_no,
                    reason,
                });
            }
        }
    }
}

impl<R: BufRead> Iterator for SentenceReader<R> {
    type Item = SentenceContext;

    fn next(&mut self) -> Option<SentenceContext> {
        loop {
            let (line_no, line) = match self.next_line() {
                Some(found) => found,
                None => return self.current.take(),
            };

            if let Some(text) = line.strip_prefix(SENTENCE_MARKER) {
                if let Some(open) = self.current.as_mut().filter(|s| s.tokens.is_empty()) {
                    let text = text.trim();
                    if !text.is_empty() {
                        if !open.text.is_empty() {
                            open.text.push(' ');
                        }
                        open.text.push_str(text);
                    }
                    continue;
                }
                let opened = self.open_sentence(text);
                if let Some(finished) = self.current.replace(opened) {
                    return Some(finished);
                }
            } else if is_token_row(&line) {
                self.push_row(line_no, &line);
            }
        }
    }
}

/// Parse one token row against a layout.
///
/// Returns the token plus any pointer items that could not be read; an `Err`
/// means the whole row is malformed and must be skipped.
pub fn parse_token_row(
    line: &str,
    layout: &LayoutDescriptor,
    global_index: usize,
) -> Result<(Token, Vec<String>), String> {
    let fields = split_fields(line);
    if fields.len() < 3 {
        return Err(format!("expected at least 3 columns, found {}", fields.len()));
    }
    if fields.len() != layout.column_count {
        return Err(format!(
            "expected {} columns, found {}",
            layout.column_count,
            fields.len()
        ));
    }

    let id = TokenId::parse(fields[0])
        .ok_or_else(|| format!("unparseable token id {:?}", fields[0]))?;
    let char_span = CharSpan::parse(fields[1])
        .ok_or_else(|| format!("unparseable character span {:?}", fields[1]))?;

    let map = &layout.column_map;
    let mut roles = parse_roles(
        map.cell(&fields, ColumnRole::GrammaticalRole),
        map.cell(&fields, ColumnRole::ThematicRole),
    );
    if let Some(clause) = map.cell(&fields, ColumnRole::Clause).and_then(parse_clause_id) {
        if roles.is_empty() {
            roles.push(Default::default());
        }
        for slot in roles.iter_mut().filter(|s| s.clause.is_none()) {
            slot.clause = Some(clause);
        }
    }

    let mut pointers = Vec::new();
    let mut invalid = Vec::new();
    for layer in CorefLayer::ALL.iter().copied() {
        let (found, bad) = parse_pointers(
            layer,
            map.cell(&fields, ColumnRole::link(layer)),
            map.cell(&fields, ColumnRole::dp_type(layer)),
        );
        pointers.extend(found);
        invalid.extend(bad);
    }

    Ok((
        Token {
            id,
            global_index,
            char_span,
            text: fields[2].to_string(),
            roles,
            pointers,
            morphology: map
                .morphology(&fields)
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        },
        invalid,
    ))
}

/// Read a whole source into memory. Convenience for tests and small files.
pub fn read_all<R: BufRead>(
    reader: R,
    source_name: &str,
    config: &SchemaConfig,
) -> ClauseMateResult<(LayoutDescriptor, Vec<SentenceContext>, Diagnostics)> {
    let corpus = CorpusReader::from_reader(reader, source_name, config)?;
    let layout = corpus.layout().clone();
    let mut sentences = corpus.sentences(TokenOffsets::default());
    let collected: Vec<SentenceContext> = sentences.by_ref().collect();
    let diagnostics = sentences.finish()?;
    Ok((layout, collected, diagnostics))
}
