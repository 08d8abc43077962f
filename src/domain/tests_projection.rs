//! Projection hiding, idempotence, and RFC 6902 diff correctness.

use json_patch::{diff, patch};
use serde_json::Value;

use crate::domain::cards::Metric;
use crate::domain::plays::{submit_play, PlayPayload};
use crate::domain::projection::{project_value, HIDDEN_DEFINITION_ID};
use crate::domain::test_helpers::*;

fn metric_payload(metric: Metric) -> PlayPayload {
    PlayPayload {
        selected_metric: Some(metric),
        target_player_id: None,
    }
}

#[test]
fn opponent_hand_is_reduced_to_backs() {
    let state = make_state(
        vec![make_car("mine", 100.0)],
        vec![make_car("theirs-1", 90.0), make_car("theirs-2", 80.0)],
    );
    let view = project_value(&state, "p1");

    let players = view["players"].as_array().unwrap();
    let own_hand = players[0]["hand"].as_array().unwrap();
    assert_eq!(own_hand[0]["definitionId"], "def-mine");
    assert!(own_hand[0]["currentMetrics"].is_object());

    let opp_hand = players[1]["hand"].as_array().unwrap();
    assert_eq!(opp_hand.len(), 2);
    for entry in opp_hand {
        let obj = entry.as_object().unwrap();
        assert_eq!(obj["definitionId"], HIDDEN_DEFINITION_ID);
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["definitionId", "instanceId"],
            "hidden entry leaks a field"
        );
    }
}

#[test]
fn draw_pile_and_seed_are_absent() {
    let mut state = make_state(vec![make_car("c1", 100.0)], vec![make_car("c2", 90.0)]);
    state.draw_pile.push(make_car("buried", 50.0));
    let view = project_value(&state, "p1");

    assert_eq!(view["drawPileSize"], 1);
    assert!(view.get("drawPile").is_none());
    assert!(view.get("rng").is_none());
    assert!(view.get("seed").is_none());
    // The buried card's id appears nowhere in the projection.
    assert!(!view.to_string().contains("buried"));
}

#[test]
fn projection_is_idempotent() {
    let state = make_state(vec![make_car("c1", 100.0)], vec![make_car("c2", 90.0)]);
    let a = project_value(&state, "p1");
    let b = project_value(&state, "p1");
    assert_eq!(a, b);
}

#[test]
fn applying_the_diff_reproduces_the_new_projection() {
    let state = make_state(
        vec![make_car("c1", 100.0), make_car("c3", 70.0)],
        vec![make_car("c2", 90.0)],
    );
    let before = project_value(&state, "p2");

    let s1 = submit_play(&state, "p1", "c1", &metric_payload(Metric::Hp)).unwrap();
    let after = project_value(&s1, "p2");

    let ops = diff(&before, &after);
    assert!(!ops.0.is_empty());

    let mut doc: Value = before;
    patch(&mut doc, &ops).unwrap();
    assert_eq!(doc, after);
}

#[test]
fn unchanged_state_diffs_to_nothing() {
    let state = make_state(vec![make_car("c1", 100.0)], vec![make_car("c2", 90.0)]);
    let a = project_value(&state, "p1");
    let b = project_value(&state, "p1");
    assert!(diff(&a, &b).0.is_empty());
}

#[test]
fn each_viewer_sees_their_own_hand() {
    let state = make_state(vec![make_car("c1", 100.0)], vec![make_car("c2", 90.0)]);
    let p1_view = project_value(&state, "p1");
    let p2_view = project_value(&state, "p2");

    assert_eq!(p1_view["players"][0]["hand"][0]["definitionId"], "def-c1");
    assert_eq!(
        p1_view["players"][1]["hand"][0]["definitionId"],
        HIDDEN_DEFINITION_ID
    );
    assert_eq!(p2_view["players"][1]["hand"][0]["definitionId"], "def-c2");
    assert_eq!(
        p2_view["players"][0]["hand"][0]["definitionId"],
        HIDDEN_DEFINITION_ID
    );
}
