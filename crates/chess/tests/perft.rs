//! Perft: leaf counts of the legal move tree, checked against published values.

use uct_chess::{Position, START_FEN};

fn perft(pos: &Position, depth: u32) -> u64 {
    let moves = pos.legal_moves();
    if depth <= 1 {
        return if depth == 0 { 1 } else { moves.len() as u64 };
    }
    moves
        .into_iter()
        .map(|mv| perft(&pos.make_move(mv), depth - 1))
        .sum()
}

fn check(fen: &str, expected: &[u64]) {
    let pos = Position::from_fen(fen).unwrap();
    for (i, &nodes) in expected.iter().enumerate() {
        let depth = i as u32 + 1;
        assert_eq!(perft(&pos, depth), nodes, "perft({}) of {}", depth, fen);
    }
}

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

#[test]
fn test_perft_startpos() {
    check(START_FEN, &[20, 400, 8_902, 197_281]);
}

#[test]
#[ignore = "slow in debug builds"]
fn test_perft_startpos_depth_5() {
    assert_eq!(perft(&Position::startpos(), 5), 4_865_609);
}

#[test]
fn test_perft_kiwipete() {
    // Castling, en passant, promotions and pins all at once.
    check(KIWIPETE, &[48, 2_039, 97_862]);
}

#[test]
fn test_perft_rook_endgame() {
    check("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2_812, 43_238]);
}

#[test]
fn test_perft_promotions() {
    check(
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        &[6, 264, 9_467],
    );
}

#[test]
fn test_perft_discovered_checks() {
    check(
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        &[44, 1_486, 62_379],
    );
}

#[test]
fn test_perft_middlegame() {
    check(
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        &[46, 2_079, 89_890],
    );
}
