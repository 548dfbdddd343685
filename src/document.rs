//! # Documents — many boards in one text blob
//!
//! Circuit files hold one or more boards separated by a blank line. Each
//! board is parsed and evaluated on its own, and its result is reported as
//! `off` or `on`.

use crate::board::{Board, BoardHash, EvalError, Signal};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Separates consecutive boards in a document.
pub const BOARD_SEPARATOR: &str = "\n\n";

/// How a document's boards get evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalOptions {
    /// Evaluate boards on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
}

/// Result for one board of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Position of the board in the document, from 0
    pub index: usize,
    pub hash: BoardHash,
    pub segments: usize,
    pub result: Result<Signal, EvalError>,
}

/// Flat, serialisable view of an [`Outcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub index: usize,
    pub hash: BoardHash,
    pub segments: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<Signal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    pub fn evaluate(index: usize, board: &Board) -> Self {
        Outcome {
            index,
            hash: board.hash(),
            segments: board.len(),
            result: board.evaluate(),
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        self.result.as_ref().ok().map(|s| s.label())
    }

    pub fn record(&self) -> OutcomeRecord {
        OutcomeRecord {
            index: self.index,
            hash: self.hash.clone(),
            segments: self.segments,
            signal: self.result.as_ref().ok().copied(),
            error: self.result.as_ref().err().map(|e| e.to_string()),
        }
    }
}

/// Splits a document into the text of its boards.
///
/// Pieces holding nothing but whitespace are dropped, so a trailing blank
/// line or a run of blank lines never produces an empty board.
pub fn split_boards(text: &str) -> Vec<&str> {
    text.split(BOARD_SEPARATOR)
        .filter(|piece| !piece.trim().is_empty())
        .collect()
}

fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Parses every board of a document, in order.
pub fn parse_document(text: &str) -> Vec<Board> {
    let text = normalize_newlines(text);
    split_boards(&text).into_iter().map(Board::parse).collect()
}

/// Parses and evaluates every board of a document. Results keep document
/// order whether or not the boards were evaluated in parallel.
pub fn evaluate_document(text: &str, options: &EvalOptions) -> Vec<Outcome> {
    let boards = parse_document(text);
    evaluate_boards(&boards, options)
}

pub fn evaluate_boards(boards: &[Board], options: &EvalOptions) -> Vec<Outcome> {
    if options.parallel {
        boards
            .par_iter()
            .enumerate()
            .map(|(index, board)| Outcome::evaluate(index, board))
            .collect()
    } else {
        boards
            .iter()
            .enumerate()
            .map(|(index, board)| Outcome::evaluate(index, board))
            .collect()
    }
}

/// Joins the boards' labels one per line. The first board that could not be
/// evaluated turns the whole document into an error.
pub fn render_labels(outcomes: &[Outcome]) -> Result<String, EvalError> {
    let labels = outcomes
        .iter()
        .map(|o| o.result.clone().map(Signal::label))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(labels.join("\n"))
}

/// Evaluates a document straight to its label lines.
pub fn evaluate_text(text: &str) -> Result<String, EvalError> {
    render_labels(&evaluate_document(text, &EvalOptions::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_BOARDS: &str = "\
0----------------|
                 A----------@
0----------------|

0----------------|
                 A----------@
1----------------|

1----------------|
                 A----------@
1----------------|
";

    #[test]
    fn splits_at_blank_lines() {
        let boards = parse_document(THREE_BOARDS);
        assert_eq!(boards.len(), 3);
        for board in &boards {
            assert_eq!(board.len(), 3);
        }
    }

    #[test]
    fn evaluates_each_board_independently() {
        assert_eq!(evaluate_text(THREE_BOARDS).unwrap(), "off\noff\non");
    }

    #[test]
    fn trailing_blank_line_adds_no_board() {
        let text = "1---|\n    N---@\n\n";
        assert_eq!(split_boards(text).len(), 1);
        assert_eq!(evaluate_text(text).unwrap(), "off");
    }

    #[test]
    fn whitespace_only_pieces_are_dropped() {
        let text = "1---@\n\n   \n\n0---@\n";
        assert_eq!(split_boards(text), vec!["1---@", "0---@\n"]);
    }

    #[test]
    fn crlf_documents_parse_like_lf() {
        let crlf = THREE_BOARDS.replace('\n', "\r\n");
        assert_eq!(parse_document(&crlf), parse_document(THREE_BOARDS));
    }

    #[test]
    fn parallel_matches_serial() {
        let text = [THREE_BOARDS; 8].join("\n");
        let serial = evaluate_document(&text, &EvalOptions::default());
        let parallel = evaluate_document(&text, &EvalOptions { parallel: true });
        assert_eq!(serial.len(), 24);
        assert_eq!(serial, parallel);
    }

    #[test]
    fn failing_board_fails_the_labels() {
        let text = "1---@\n\n1---|\n    A---|\n";
        let outcomes = evaluate_document(text, &EvalOptions::default());
        assert_eq!(outcomes[0].label(), Some("on"));
        assert_eq!(outcomes[1].result, Err(EvalError::NoTerminalSegment));
        assert_eq!(render_labels(&outcomes), Err(EvalError::NoTerminalSegment));
    }

    #[test]
    fn record_flattens_result() {
        let outcomes = evaluate_document("0---@\n\nN---|\n", &EvalOptions::default());
        let ok = serde_json::to_value(outcomes[0].record()).unwrap();
        assert_eq!(ok["signal"], "off");
        assert!(ok.get("error").is_none());
        let err = serde_json::to_value(outcomes[1].record()).unwrap();
        assert_eq!(err["error"], "board has no terminal segment");
        assert!(err.get("signal").is_none());
    }
}
