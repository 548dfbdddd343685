use circuit_boards::document::{evaluate_document, render_labels, EvalOptions};
use circuit_boards::files::evaluate_file;
use circuit_boards::{evaluate_text, parse_document, Board, EvalError, Segment, Signal};
use std::path::Path;

const BOARD_1_CIRCUIT_1: &str = "\
1----------|
           A----------@
0----------|

";

const BOARD_1_CIRCUIT_1_LONG_BRANCH: &str = "\
1----------|
           A----------@
           |
           |
0----------|

";

const BOARD_1_CIRCUIT_2: &str = "\
1-------|
        A---------|
1-------|         |
                  O---------@
0-------|         |
        X---------|
0-------|

";

const BOARD_1_CIRCUIT_2_OVERLAP: &str = "\
1-------|
        A---------|
1-------|         O---------@
                  |
0-------|         |
        X---------|
0-------|

";

const BOARD_1_CIRCUIT_2_TRAILING_SPACE: &str = concat!(
    "1-------|          \n",
    "        A---------|            \n",
    "1-------|         O---------@          \n",
    "                  |                  \n",
    "0-------|         |\n",
    "        X---------|             \n",
    "0-------|           \n",
    "\n",
);

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn single_circuit_boards_parse_three_segments() {
    for (text, lower_row) in [(BOARD_1_CIRCUIT_1, 2), (BOARD_1_CIRCUIT_1_LONG_BRANCH, 4)] {
        let boards = parse_document(text);
        assert_eq!(boards.len(), 1);
        let segs = boards[0].segments();
        assert_eq!(segs.len(), 3);

        assert_eq!(segs[0].render(), "1----------|");
        assert!(segs[0].is_literal());
        assert_eq!((segs[0].first(), segs[0].last(), segs[0].row()), (0, 11, 0));

        assert_eq!(segs[1].render(), "           A----------@");
        assert!(segs[1].is_gate());
        assert_eq!((segs[1].first(), segs[1].last(), segs[1].row()), (11, 22, 1));

        assert_eq!(segs[2].render(), "0----------|");
        assert_eq!((segs[2].first(), segs[2].last(), segs[2].row()), (0, 11, lower_row));

        assert_eq!(segs.iter().filter(|s| s.is_terminal()).count(), 1);
        assert_eq!(boards[0].evaluate(), Ok(Signal::Off));
    }
}

#[test]
fn two_circuit_boards_keep_scan_order() {
    for text in [
        BOARD_1_CIRCUIT_2,
        BOARD_1_CIRCUIT_2_OVERLAP,
        BOARD_1_CIRCUIT_2_TRAILING_SPACE,
    ] {
        let boards = parse_document(text);
        assert_eq!(boards.len(), 1);
        let rendered: Vec<String> = boards[0].segments().iter().map(Segment::render).collect();
        assert_eq!(
            rendered,
            vec![
                "1-------|",
                "        A---------|",
                "1-------|",
                "                  O---------@",
                "0-------|",
                "        X---------|",
                "0-------|",
            ]
        );
        let output = &boards[0].segments()[3];
        assert_eq!((output.first(), output.last()), (18, 28));
        assert_eq!(boards[0].evaluate(), Ok(Signal::On));
    }
}

#[test]
fn trailing_space_changes_nothing() {
    let padded = parse_document(BOARD_1_CIRCUIT_2_TRAILING_SPACE);
    let plain = parse_document(BOARD_1_CIRCUIT_2_OVERLAP);
    assert_eq!(padded, plain);
    assert_eq!(padded[0].hash(), plain[0].hash());
}

#[test]
fn overlap_layout_does_not_cross_wire() {
    let board = &parse_document(BOARD_1_CIRCUIT_2_OVERLAP)[0];
    let segs = board.segments();
    let and_gate = board.find_branches(&segs[1]);
    assert_eq!(and_gate.upper, Some(&segs[0]));
    assert_eq!(and_gate.lower, Some(&segs[2]));
    let or_gate = board.find_branches(&segs[3]);
    assert_eq!(or_gate.upper, Some(&segs[1]));
    assert_eq!(or_gate.lower, Some(&segs[5]));
    let xor_gate = board.find_branches(&segs[5]);
    assert_eq!(xor_gate.upper, Some(&segs[4]));
    assert_eq!(xor_gate.lower, Some(&segs[6]));
}

#[test]
fn three_boards_evaluate_independently() {
    let text = "\
0----------------|
                 A----------@
0----------------|

0----------------|
                 A----------@
1----------------|

1----------------|
                 A----------@
1----------------|";
    let boards = parse_document(text);
    assert_eq!(boards.len(), 3);
    assert!(boards.iter().all(|b| b.len() == 3));
    assert_eq!(evaluate_text(text).unwrap(), "off\noff\non");
}

#[test]
fn not_gate_three_rows_above_its_input() {
    let board = Board::parse("          N---------@\n          |\n          |\n1---------|");
    let branches = board.find_branches(&board.segments()[0]);
    assert_eq!(branches.upper, None);
    assert_eq!(branches.lower.map(Segment::row), Some(3));
    assert_eq!(board.evaluate(), Ok(Signal::Off));
}

fn literal(v: u8) -> &'static str {
    if v == 1 {
        "1---------|"
    } else {
        "0---------|"
    }
}

fn circuit(gate: &str, upper: u8, lower: u8) -> Vec<Segment> {
    vec![
        Segment::new(literal(upper), 0, 0),
        Segment::new(gate, 1, 10),
        Segment::new(literal(lower), 2, 0),
    ]
}

/// Stacks two single-gate circuits around an output gate, renumbering rows
/// top to bottom.
fn compose(upper: Vec<Segment>, output: Segment, lower: Vec<Segment>) -> Board {
    upper
        .into_iter()
        .chain(std::iter::once(output))
        .chain(lower)
        .enumerate()
        .map(|(row, mut seg)| {
            seg.set_row(row);
            seg
        })
        .collect()
}

#[test]
fn and_or_feeding_xor_over_all_inputs() {
    for bits in 0..16u8 {
        let [a, b, c, d] = [(bits >> 3) & 1, (bits >> 2) & 1, (bits >> 1) & 1, bits & 1];
        let board = compose(
            circuit("A---------|", a, b),
            Segment::new("X---------@", 4, 20),
            circuit("O---------|", c, d),
        );
        let expected = (a & b) ^ (c | d);
        assert_eq!(
            board.evaluate().map(Signal::value),
            Ok(expected),
            "inputs {a}{b}{c}{d}, board:\n{board}"
        );
    }
}

#[test]
fn board_without_output_reports_it() {
    let text = "1---|\n    A---|\n0---|\n";
    let outcomes = evaluate_document(text, &EvalOptions::default());
    assert_eq!(outcomes[0].result, Err(EvalError::NoTerminalSegment));
    assert_eq!(render_labels(&outcomes), Err(EvalError::NoTerminalSegment));
}

#[test]
fn simple_circuits_file_matches_expected_output() {
    let expected = std::fs::read_to_string(fixture("simple_output.txt")).unwrap();
    for parallel in [false, true] {
        let report = evaluate_file(&fixture("simple_circuits.txt"), &EvalOptions { parallel }).unwrap();
        assert_eq!(report.labels().unwrap(), expected.trim_end());
    }
}
