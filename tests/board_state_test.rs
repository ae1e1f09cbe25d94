//! Tests for the live board and terminal evaluation.

use tictactoe_engine::games::tictactoe::rules::{Outcome, outcome_after};
use tictactoe_engine::{BoardState, Cell, Mark, MoveError};

fn play_all(state: &mut BoardState, moves: &[(usize, usize)]) {
    for &(row, col) in moves {
        let player = state.active_player();
        state.apply_move(row, col, player).expect("Valid move");
        state.advance_turn();
    }
}

#[test]
fn test_repeated_cell_rejected_until_reset() {
    let mut state = BoardState::new();
    state.apply_move(1, 1, Mark::X).expect("First placement");

    for player in [Mark::X, Mark::O] {
        assert_eq!(
            state.apply_move(1, 1, player),
            Err(MoveError::CellOccupied { row: 1, col: 1 })
        );
    }
    assert_eq!(state.board().get(1, 1), Some(Cell::Occupied(Mark::X)));

    state.reset();
    assert!(state.apply_move(1, 1, Mark::O).is_ok());
}

#[test]
fn test_out_of_range_leaves_state_unchanged() {
    let mut state = BoardState::new();
    let before = state.clone();
    assert_eq!(
        state.apply_move(3, 0, Mark::X),
        Err(MoveError::OutOfBounds { row: 3, col: 0 })
    );
    assert_eq!(state, before);
}

#[test]
fn test_apply_move_does_not_flip_turn() {
    let mut state = BoardState::new();
    state.apply_move(0, 0, Mark::X).expect("Valid move");
    assert_eq!(state.active_player(), Mark::X);
    state.advance_turn();
    assert_eq!(state.active_player(), Mark::O);
}

#[test]
fn test_top_row_win() {
    let mut state = BoardState::new();
    play_all(&mut state, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
    assert!(state.check_winner(Mark::X));
    assert!(!state.check_winner(Mark::O));
}

#[test]
fn test_empty_board_has_no_winner() {
    let state = BoardState::new();
    assert!(!state.check_winner(Mark::X));
    assert!(!state.check_winner(Mark::O));
    assert!(!state.is_full());
}

#[test]
fn test_full_board_draw() {
    let mut state = BoardState::new();
    // X O X / X O O / O X X
    play_all(
        &mut state,
        &[(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2), (2, 1), (2, 0), (2, 2)],
    );
    assert!(state.is_full());
    assert!(!state.check_winner(Mark::X));
    assert!(!state.check_winner(Mark::O));
    assert_eq!(outcome_after(&state.board(), Mark::X), Outcome::Draw);
}

#[test]
fn test_full_is_independent_of_win() {
    let mut state = BoardState::new();
    // X completes the left column on the last empty cell.
    play_all(
        &mut state,
        &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 1), (0, 2), (1, 2), (2, 2), (2, 0)],
    );
    assert!(state.is_full());
    assert!(state.check_winner(Mark::X));
    assert_eq!(outcome_after(&state.board(), Mark::X), Outcome::Won(Mark::X));
}

#[test]
fn test_finished_board_rejects_moves() {
    let mut state = BoardState::new();
    state.finish();
    assert_eq!(state.apply_move(0, 0, Mark::X), Err(MoveError::GameInactive));
    state.reset();
    assert!(state.is_active());
}
