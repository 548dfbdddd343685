//! # circuit_boards
//!
//! **Boolean logic circuits drawn as ASCII art.**
//!
//! A board is a block of text where every horizontal run like `A-----|` is a
//! wire. The leading glyph says what the wire carries: `0`/`1` literals or the
//! gates `A`ND, `O`R, `X`OR and `N`OT. A run ending in `|` feeds a gate that
//! starts in that column, above or below it; the run ending in `@` is the
//! board's output.
//!
//! ## Quick Start
//!
//! ```rust
//! use circuit_boards::{evaluate_text, Board, Signal};
//!
//! let doc = "\
//! 1-------|
//!         A---------|
//! 1-------|         |
//!                   O---------@
//! 0-------|         |
//!         X---------|
//! 0-------|
//!
//! 1----|
//!      N----@
//! ";
//!
//! assert_eq!(evaluate_text(doc).unwrap(), "on\noff");
//!
//! let board = Board::parse("0---|\n    N---@");
//! assert_eq!(board.evaluate().unwrap(), Signal::On);
//! ```
//!
//! ## Modules
//!
//! - [`segment`] — scanning lines into positioned segments, gate semantics
//! - [`board`] — branch search and recursive evaluation of one board
//! - [`document`] — multi-board documents and their `off`/`on` labels
//! - [`files`] — reading circuit files and glob patterns
//! - [`generate`] — seeded random boards with known results

pub mod board;
pub mod document;
pub mod files;
pub mod generate;
pub mod segment;

pub use board::{Board, BoardHash, EvalError, Signal};
pub use document::{evaluate_document, evaluate_text, parse_document, EvalOptions, Outcome};
pub use segment::{parse_segments, GateOp, Segment, SegmentKind};
