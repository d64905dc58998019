//! Tests for the snapshot codec against hand-written blobs.

use strictly_dots::{GameSession, Move, Player, SquareCoord, snapshot};

#[test]
fn test_round_trip_mid_game() {
    let mut session = GameSession::new(2, 3).unwrap();
    for mv in [
        Move::horizontal(0, 0),
        Move::vertical(0, 0),
        Move::vertical(0, 1),
        Move::horizontal(1, 0),
    ] {
        session.apply_move(mv).unwrap();
    }
    let restored = snapshot::deserialize(&snapshot::serialize(&session)).unwrap();
    assert_eq!(restored, session);
    assert_eq!(restored.grid().owner(SquareCoord::new(0, 0)), Some(Player::Two));

    // The restored session keeps playing by the same rules.
    let mut restored = restored;
    let outcome = restored.apply_move(Move::horizontal(2, 2)).unwrap();
    assert_eq!(outcome.player, Player::Two);
}

#[test]
fn test_decodes_hand_written_blob() {
    let blob = r#"{
        "version": 1,
        "session": {
            "grid": {
                "rows": 1,
                "cols": 1,
                "horizontal": [[true], [false]],
                "vertical": [[true, false]],
                "owners": [[null]]
            },
            "current_player": "one",
            "scores": {"one": 0, "two": 0},
            "is_over": false,
            "move_count": 2
        }
    }"#;
    let session = snapshot::deserialize(blob).unwrap();
    assert_eq!(session.grid().edge_count(0, 0), Some(2));
    assert_eq!(session.legal_moves().len(), 2);
}

#[test]
fn test_rejects_owner_without_edges() {
    let blob = r#"{
        "version": 1,
        "session": {
            "grid": {
                "rows": 1,
                "cols": 1,
                "horizontal": [[false], [false]],
                "vertical": [[false, false]],
                "owners": [["two"]]
            },
            "current_player": "one",
            "scores": {"one": 0, "two": 1},
            "is_over": true,
            "move_count": 0
        }
    }"#;
    let err = snapshot::deserialize(blob).unwrap_err();
    assert!(err.message.contains("four edges"));
}

#[test]
fn test_rejects_zero_sized_grid() {
    let blob = r#"{
        "version": 1,
        "session": {
            "grid": {"rows": 0, "cols": 0, "horizontal": [[]], "vertical": [], "owners": []},
            "current_player": "one",
            "scores": {"one": 0, "two": 0},
            "is_over": true,
            "move_count": 0
        }
    }"#;
    assert!(snapshot::deserialize(blob).is_err());
}

#[test]
fn test_rejects_overflowing_dimensions() {
    let blob = r#"{
        "version": 1,
        "session": {
            "grid": {
                "rows": 18446744073709551615,
                "cols": 1,
                "horizontal": [[false]],
                "vertical": [[false, false]],
                "owners": [[null]]
            },
            "current_player": "one",
            "scores": {"one": 0, "two": 0},
            "is_over": false,
            "move_count": 0
        }
    }"#;
    let err = snapshot::deserialize(blob).unwrap_err();
    assert!(err.message.contains("do not match the grid size"));
}
