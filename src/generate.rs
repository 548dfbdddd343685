//! # Board generator
//!
//! Builds random circuits from a seeded ChaCha20 RNG and draws them in the
//! board format, so the same seed always gives the same document. Every
//! generated board carries the value its expression evaluates to, which
//! makes it a ready-made check for the evaluator.
//!
//! ## Layout
//!
//! Segments at the same depth of the expression share their columns: a gate
//! at depth `d` starts in the column where every depth `d + 1` segment ends.
//! A gate's upper input is drawn in the rows just above it and its lower
//! input in the rows just below, with `|` connectors filling the gap, so the
//! nearest matching segment in each direction is always the right input.
//! NOT gates take their single input from above.

use crate::board::Signal;
use crate::segment::{GateOp, BRANCH, OUTPUT, WIRE};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

/// Boolean expression tree behind a generated board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    Literal(bool),
    Not(Box<Expr>),
    Binary {
        op: GateOp,
        upper: Box<Expr>,
        lower: Box<Expr>,
    },
}

impl Expr {
    pub fn eval(&self) -> bool {
        match self {
            Expr::Literal(v) => *v,
            Expr::Not(input) => !input.eval(),
            Expr::Binary { op, upper, lower } => op
                .apply(Some(upper.eval()), Some(lower.eval()))
                .unwrap_or(false),
        }
    }

    /// Longest path from the root to a literal; a bare literal has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Expr::Literal(_) => 0,
            Expr::Not(input) => 1 + input.depth(),
            Expr::Binary { upper, lower, .. } => 1 + upper.depth().max(lower.depth()),
        }
    }

    /// Number of nodes, which is also the number of segments on its board.
    pub fn size(&self) -> usize {
        match self {
            Expr::Literal(_) => 1,
            Expr::Not(input) => 1 + input.size(),
            Expr::Binary { upper, lower, .. } => 1 + upper.size() + lower.size(),
        }
    }
}

/// Settings for a generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Maximum expression depth per board
    pub depth: usize,
    /// Number of boards in the document
    pub boards: usize,
    /// Dashes drawn in every segment
    pub dashes: usize,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        GenerateConfig {
            seed: 0,
            depth: 3,
            boards: 1,
            dashes: 8,
        }
    }
}

/// One generated board and the value it must evaluate to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedBoard {
    pub expr: Expr,
    pub text: String,
    pub expected: Signal,
}

/// Random expression no deeper than `depth`. The root is a gate whenever
/// `depth > 0`.
pub fn random_expr<R: Rng>(rng: &mut R, depth: usize) -> Expr {
    random_node(rng, depth, false)
}

fn random_node<R: Rng>(rng: &mut R, depth: usize, allow_literal: bool) -> Expr {
    if depth == 0 || (allow_literal && rng.gen_bool(0.25)) {
        return Expr::Literal(rng.gen_bool(0.5));
    }
    let op = match rng.gen_range(0..4) {
        0 => GateOp::And,
        1 => GateOp::Or,
        2 => GateOp::Xor,
        _ => GateOp::Not,
    };
    if op == GateOp::Not {
        return Expr::Not(Box::new(random_node(rng, depth - 1, true)));
    }
    Expr::Binary {
        op,
        upper: Box::new(random_node(rng, depth - 1, true)),
        lower: Box::new(random_node(rng, depth - 1, true)),
    }
}

/// Draws `expr` as a board with `dashes` wires per segment (at least one).
/// The root segment is the only one ending in `@`.
pub fn layout(expr: &Expr, dashes: usize) -> String {
    let dashes = dashes.max(1);
    let mut canvas = Canvas {
        lines: Vec::with_capacity(expr.size()),
        max_depth: expr.depth(),
        step: dashes + 1,
        dashes,
    };
    canvas.place(expr, 0, true);
    canvas
        .lines
        .iter()
        .map(|line| line.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

struct Canvas {
    lines: Vec<Vec<char>>,
    max_depth: usize,
    step: usize,
    dashes: usize,
}

impl Canvas {
    fn column(&self, depth: usize) -> usize {
        (self.max_depth - depth) * self.step
    }

    fn place(&mut self, expr: &Expr, depth: usize, terminal: bool) -> usize {
        let col = self.column(depth);
        match expr {
            Expr::Literal(v) => self.push_segment(if *v { '1' } else { '0' }, depth, terminal),
            Expr::Not(input) => {
                let child = self.place(input, depth + 1, false);
                let row = self.push_segment(GateOp::Not.glyph(), depth, terminal);
                self.connect(child, row, col);
                row
            }
            Expr::Binary { op, upper, lower } => {
                let up = self.place(upper, depth + 1, false);
                let row = self.push_segment(op.glyph(), depth, terminal);
                let down = self.place(lower, depth + 1, false);
                self.connect(up, row, col);
                self.connect(row, down, col);
                row
            }
        }
    }

    fn push_segment(&mut self, glyph: char, depth: usize, terminal: bool) -> usize {
        let mut line = vec![' '; self.column(depth)];
        line.push(glyph);
        line.extend(std::iter::repeat(WIRE).take(self.dashes));
        line.push(if terminal { OUTPUT } else { BRANCH });
        self.lines.push(line);
        self.lines.len() - 1
    }

    /// Draws connector pipes in `col` on the rows strictly between `from`
    /// and `to`.
    fn connect(&mut self, from: usize, to: usize, col: usize) {
        for line in &mut self.lines[from + 1..to] {
            if line.len() <= col {
                line.resize(col + 1, ' ');
            }
            line[col] = BRANCH;
        }
    }
}

/// Generates a whole document as configured.
pub fn generate(config: &GenerateConfig) -> Vec<GeneratedBoard> {
    let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
    (0..config.boards)
        .map(|_| {
            let expr = random_expr(&mut rng, config.depth);
            let text = layout(&expr, config.dashes);
            let expected = Signal::from(expr.eval());
            GeneratedBoard {
                expr,
                text,
                expected,
            }
        })
        .collect()
}

/// Joins generated boards into one document, a blank line between boards.
pub fn render_document(boards: &[GeneratedBoard]) -> String {
    let mut doc = boards
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    doc.push('\n');
    doc
}
