//! # Board — one circuit diagram and its evaluation
//!
//! A board is the ordered list of segments parsed from one block of text.
//! Wires between segments are never drawn as graph edges: a gate's inputs are
//! the nearest segments above and below it whose terminator sits in the
//! gate's leading column.
//!
//! ## Example
//!
//! ```rust
//! use circuit_boards::board::{Board, Signal};
//!
//! let board = Board::parse(
//!     "1----------|\n\
//!      \x20          A----------@\n\
//!      \x20          |\n\
//!      0----------|\n",
//! );
//! assert_eq!(board.evaluate().unwrap(), Signal::Off);
//! ```

use crate::segment::{parse_segments, GateOp, Segment, SegmentKind};
use blake3::Hasher;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as FmtWrite};
use thiserror::Error;

/// Hex-encoded BLAKE3 of a board's segment layout.
pub type BoardHash = String;

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Off,
    On,
}

impl Signal {
    /// The signal as `0` or `1`.
    pub fn value(self) -> u8 {
        match self {
            Signal::Off => 0,
            Signal::On => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Signal::Off => "off",
            Signal::On => "on",
        }
    }
}

impl From<bool> for Signal {
    fn from(value: bool) -> Self {
        if value {
            Signal::On
        } else {
            Signal::Off
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reasons a board cannot be evaluated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// No segment ends in `@`
    #[error("board has no terminal segment")]
    NoTerminalSegment,
    /// A gate is missing an input it needs
    #[error("{op} gate at row {row}, column {first} is missing an input branch")]
    UnresolvedBranch { op: GateOp, row: usize, first: usize },
    /// A segment that is neither a literal nor a gate was reached
    #[error("segment at row {row}, column {first} is neither a literal nor a gate")]
    InvalidSegmentKind { row: usize, first: usize },
    /// Branch search led back to a segment still being evaluated
    #[error("segment at row {row}, column {first} feeds back into its own evaluation")]
    CyclicEvaluation { row: usize, first: usize },
}

/// Row and leading column of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub first: usize,
}

impl From<&Segment> for Position {
    fn from(seg: &Segment) -> Self {
        Position {
            row: seg.row(),
            first: seg.first(),
        }
    }
}

/// Inputs found for one gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branches<'a> {
    pub upper: Option<&'a Segment>,
    pub lower: Option<&'a Segment>,
}

/// One branch lookup made while evaluating, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchPair {
    /// Nesting level of the gate, the output segment being 0
    pub depth: usize,
    pub op: GateOp,
    pub root: Position,
    pub upper: Option<Position>,
    pub lower: Option<Position>,
}

/// Branch lookups in the order evaluation made them.
pub type Trace = Vec<BranchPair>;

/// An ordered set of segments forming one circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    segments: Vec<Segment>,
}

impl Board {
    pub fn new(segments: Vec<Segment>) -> Self {
        Board { segments }
    }

    /// Parses the lines of a single board. Rows count every line, including
    /// connector-only ones.
    pub fn parse(text: &str) -> Self {
        text.lines()
            .enumerate()
            .flat_map(|(row, line)| parse_segments(line, row))
            .collect()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The first segment, in list order, ending in `@`.
    pub fn terminal_segment(&self) -> Option<&Segment> {
        self.segments.iter().find(|seg| seg.is_terminal())
    }

    /// Finds the segments feeding `root`.
    ///
    /// The upper input is the first segment above `root`, nearest row first,
    /// whose last column is `root.first()`; the lower input is the same search
    /// downwards. Rows holding only connector pipes have no segments, so the
    /// search passes straight through them.
    pub fn find_branches(&self, root: &Segment) -> Branches<'_> {
        let (upper, lower) = self.branch_indices(root);
        Branches {
            upper: upper.map(|i| &self.segments[i]),
            lower: lower.map(|i| &self.segments[i]),
        }
    }

    fn branch_indices(&self, root: &Segment) -> (Option<usize>, Option<usize>) {
        let feeding = || {
            self.segments
                .iter()
                .enumerate()
                .filter(move |(_, seg)| seg.last() == root.first())
        };
        let upper = feeding()
            .filter(|(_, seg)| seg.row() < root.row())
            .min_by_key(|&(idx, seg)| (root.row() - seg.row(), idx))
            .map(|(idx, _)| idx);
        let lower = feeding()
            .filter(|(_, seg)| seg.row() > root.row())
            .min_by_key(|&(idx, seg)| (seg.row() - root.row(), idx))
            .map(|(idx, _)| idx);
        (upper, lower)
    }

    /// Evaluates the circuit that ends in the terminal segment.
    pub fn evaluate(&self) -> Result<Signal, EvalError> {
        let mut walk = Walk::new(self, false);
        walk.run()
    }

    /// Like [`Board::evaluate`], also returning every branch lookup made.
    /// The trace covers the lookups made before a failure, if any.
    pub fn evaluate_traced(&self) -> (Result<Signal, EvalError>, Trace) {
        let mut walk = Walk::new(self, true);
        let result = walk.run();
        (result, walk.trace)
    }

    /// Segments rendered one per line, in list order.
    pub fn render(&self) -> String {
        self.segments
            .iter()
            .map(Segment::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Identity of the board's layout. Boards with the same segments at the
    /// same positions hash the same, whatever whitespace surrounded them.
    pub fn hash(&self) -> BoardHash {
        let mut canon = String::new();
        for seg in &self.segments {
            writeln!(&mut canon, "{}:{}:{}", seg.row(), seg.first(), seg.raw()).unwrap();
        }
        let mut hasher = Hasher::new();
        hasher.update(canon.as_bytes());
        hex::encode(hasher.finalize().as_bytes())
    }
}

impl FromIterator<Segment> for Board {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Board::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// State of one evaluation: the segments on the active path and the
/// optional trace.
struct Walk<'a> {
    board: &'a Board,
    path: Vec<usize>,
    tracing: bool,
    trace: Trace,
}

impl<'a> Walk<'a> {
    fn new(board: &'a Board, tracing: bool) -> Self {
        Walk {
            board,
            path: Vec::new(),
            tracing,
            trace: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<Signal, EvalError> {
        let root = self
            .board
            .segments
            .iter()
            .position(Segment::is_terminal)
            .ok_or(EvalError::NoTerminalSegment)?;
        self.visit(root).map(Signal::from)
    }

    fn visit(&mut self, idx: usize) -> Result<bool, EvalError> {
        let board = self.board;
        let seg = &board.segments[idx];
        if self.path.contains(&idx) {
            return Err(EvalError::CyclicEvaluation {
                row: seg.row(),
                first: seg.first(),
            });
        }
        let op = match seg.kind() {
            SegmentKind::Literal(value) => return Ok(value),
            SegmentKind::Invalid => {
                return Err(EvalError::InvalidSegmentKind {
                    row: seg.row(),
                    first: seg.first(),
                })
            }
            SegmentKind::Gate(op) => op,
        };

        let (upper, lower) = board.branch_indices(seg);
        if self.tracing {
            let at = |i: usize| Position::from(&board.segments[i]);
            self.trace.push(BranchPair {
                depth: self.path.len(),
                op,
                root: Position::from(seg),
                upper: upper.map(at),
                lower: lower.map(at),
            });
        }

        self.path.push(idx);
        let value = self.apply(op, upper, lower);
        self.path.pop();

        value?.ok_or(EvalError::UnresolvedBranch {
            op,
            row: seg.row(),
            first: seg.first(),
        })
    }

    fn apply(
        &mut self,
        op: GateOp,
        upper: Option<usize>,
        lower: Option<usize>,
    ) -> Result<Option<bool>, EvalError> {
        let upper = upper.map(|i| self.visit(i)).transpose()?;
        let lower = lower.map(|i| self.visit(i)).transpose()?;
        Ok(op.apply(upper, lower))
    }
}

/// Renders a trace as an indented outline, one line per found input.
pub fn render_trace(trace: &[BranchPair]) -> String {
    let mut out = String::new();
    for pair in trace {
        let indent = "  ".repeat(pair.depth);
        writeln!(
            &mut out,
            "{}{} [{},{}]",
            indent, pair.op, pair.root.row, pair.root.first
        )
        .unwrap();
        for (side, pos) in [("upper", pair.upper), ("lower", pair.lower)] {
            match pos {
                Some(p) => writeln!(&mut out, "{}  {} <- [{},{}]", indent, side, p.row, p.first).unwrap(),
                None => writeln!(&mut out, "{}  {} <- none", indent, side).unwrap(),
            }
        }
    }
    out
}
