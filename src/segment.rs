//! # Segments — horizontal wire-runs of a circuit board
//!
//! A segment is one printed run such as `A---------|` or `1----@`: a leading
//! glyph naming a literal or a gate, one or more `-` wires, and a terminator.
//! `|` marks a branch feeding some gate further right, `@` marks the board's
//! output.
//!
//! ## Example
//!
//! ```rust
//! use circuit_boards::segment::{parse_segments, GateOp, SegmentKind};
//!
//! let segments = parse_segments("1-------|  A---@   ", 3);
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[0].kind(), SegmentKind::Literal(true));
//! assert_eq!(segments[1].kind(), SegmentKind::Gate(GateOp::And));
//! assert_eq!((segments[1].first(), segments[1].last()), (11, 15));
//! assert!(segments[1].is_terminal());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire glyph repeated between the leading glyph and the terminator.
pub const WIRE: char = '-';
/// Terminator of a segment that feeds another gate.
pub const BRANCH: char = '|';
/// Terminator of the board's final output segment.
pub const OUTPUT: char = '@';

const LEADING_GLYPHS: [char; 6] = ['A', 'O', 'X', 'N', '1', '0'];

/// Boolean operator carried by a gate segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateOp {
    /// Logical AND of the upper and lower inputs
    And,
    /// Logical OR of the upper and lower inputs
    Or,
    /// Exclusive OR of the upper and lower inputs
    Xor,
    /// Negation of a single input, upper before lower
    Not,
}

impl GateOp {
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            'A' => Some(GateOp::And),
            'O' => Some(GateOp::Or),
            'X' => Some(GateOp::Xor),
            'N' => Some(GateOp::Not),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            GateOp::And => 'A',
            GateOp::Or => 'O',
            GateOp::Xor => 'X',
            GateOp::Not => 'N',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GateOp::And => "AND",
            GateOp::Or => "OR",
            GateOp::Xor => "XOR",
            GateOp::Not => "NOT",
        }
    }

    /// Applies the gate to its upper and lower inputs.
    ///
    /// AND, OR and XOR need both inputs. NOT negates the upper input, or the
    /// lower one when there is no upper input. `None` means the gate cannot
    /// produce a value.
    pub fn apply(self, upper: Option<bool>, lower: Option<bool>) -> Option<bool> {
        match self {
            GateOp::And => Some(upper? & lower?),
            GateOp::Or => Some(upper? | lower?),
            GateOp::Xor => Some(upper? ^ lower?),
            GateOp::Not => upper.or(lower).map(|v| !v),
        }
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a segment's leading glyph makes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Fixed input value (`0` or `1`)
    Literal(bool),
    /// Logic gate (`A`, `O`, `X` or `N`)
    Gate(GateOp),
    /// Any other glyph; never produced by [`parse_segments`]
    Invalid,
}

impl SegmentKind {
    pub fn from_glyph(glyph: char) -> Self {
        match glyph {
            '1' => SegmentKind::Literal(true),
            '0' => SegmentKind::Literal(false),
            other => GateOp::from_glyph(other)
                .map(SegmentKind::Gate)
                .unwrap_or(SegmentKind::Invalid),
        }
    }
}

/// One horizontal run on a board.
///
/// Columns are inclusive and count characters from the start of the line,
/// so `first` is the column of the leading glyph and `last` the column of
/// the terminator. Only `row` can change after construction; boards stacked
/// into a larger board get renumbered through [`Segment::set_row`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    row: usize,
    first: usize,
    last: usize,
    kind: SegmentKind,
    terminal: bool,
    raw: String,
}

impl Segment {
    /// Builds a segment from its printed glyph run, placed at `row` with the
    /// leading glyph at column `first`.
    pub fn new(raw: &str, row: usize, first: usize) -> Self {
        let width = raw.chars().count();
        let kind = raw
            .chars()
            .next()
            .map(SegmentKind::from_glyph)
            .unwrap_or(SegmentKind::Invalid);
        Segment {
            row,
            first,
            last: first + width.saturating_sub(1),
            kind,
            terminal: raw.ends_with(OUTPUT),
            raw: raw.to_string(),
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn set_row(&mut self, row: usize) {
        self.row = row;
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn last(&self) -> usize {
        self.last
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, SegmentKind::Literal(_))
    }

    pub fn is_gate(&self) -> bool {
        matches!(self.kind, SegmentKind::Gate(_))
    }

    pub fn is_invalid(&self) -> bool {
        self.kind == SegmentKind::Invalid
    }

    /// The segment as it was printed: `first` spaces, then the glyph run.
    pub fn render(&self) -> String {
        let mut line = " ".repeat(self.first);
        line.push_str(&self.raw);
        line
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Scans one line of a board for segments.
///
/// Trailing whitespace is dropped first. Matching is left to right and
/// non-overlapping; anything that is not a full `glyph, dashes, terminator`
/// run is skipped, so malformed text never fails here.
pub fn parse_segments(line: &str, row: usize) -> Vec<Segment> {
    let glyphs: Vec<char> = line.trim_end().chars().collect();
    let mut segments = Vec::new();
    let mut col = 0;
    while col < glyphs.len() {
        match match_run(&glyphs[col..]) {
            Some(width) => {
                let raw: String = glyphs[col..col + width].iter().collect();
                segments.push(Segment::new(&raw, row, col));
                col += width;
            }
            None => col += 1,
        }
    }
    segments
}

/// Width of the segment starting at `glyphs[0]`, if one starts there.
fn match_run(glyphs: &[char]) -> Option<usize> {
    let (lead, rest) = glyphs.split_first()?;
    if !LEADING_GLYPHS.contains(lead) {
        return None;
    }
    let dashes = rest.iter().take_while(|&&c| c == WIRE).count();
    if dashes == 0 {
        return None;
    }
    match rest.get(dashes) {
        Some(&BRANCH) | Some(&OUTPUT) => Some(dashes + 2),
        _ => None,
    }
}
