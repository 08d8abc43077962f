//! Action-card effects: modifiers, override, drop, time, extra turn.

use crate::domain::cards::{Effect, EffectTarget, Metric, ModifierKind};
use crate::domain::plays::{submit_play, PlayPayload};
use crate::domain::resolution::{advance_turn, end_turn, resolve_round};
use crate::domain::state::MIN_TURN_TIME_MS;
use crate::domain::test_helpers::*;

fn metric_payload(metric: Metric) -> PlayPayload {
    PlayPayload {
        selected_metric: Some(metric),
        target_player_id: None,
    }
}

fn perm_hp_boost() -> Effect {
    Effect::MetricModPerm {
        target_metric: Metric::Hp,
        value: 50.0,
        modifier_type: ModifierKind::Absolute,
        target: EffectTarget::Own,
    }
}

// Scenario: permanent absolute hp boost survives the card returning to hand.
#[test]
fn permanent_hp_boost_persists_after_winning() {
    let state = make_state(
        vec![make_action("boost", perm_hp_boost()), make_car("strong", 300.0)],
        vec![make_car("weak", 100.0)],
    );

    let s1 = submit_play(&state, "p1", "boost", &PlayPayload::default()).unwrap();
    assert!(s1.pending_modifiers[0].is_some());
    assert_eq!(
        s1.pending_modifiers[0].as_ref().unwrap().source_player_id,
        "p1"
    );

    let s2 = submit_play(&s1, "p1", "strong", &metric_payload(Metric::Hp)).unwrap();
    assert!(s2.pending_modifiers[0].is_none());
    let boosted = s2.board[0].car.as_ref().unwrap();
    assert_eq!(boosted.current_metrics.unwrap().hp, 350.0);
    assert_eq!(boosted.original_metrics.unwrap().hp, 300.0);
    assert!(boosted.is_modified_permanently);

    let s3 = end_turn(&s2, 0).unwrap();
    let s4 = submit_play(&s3, "p2", "weak", &PlayPayload::default()).unwrap();
    let s5 = resolve_round(&s4).unwrap();

    assert_eq!(s5.round_winner_id.as_deref(), Some("p1"));
    assert_eq!(s5.players[0].score, 1);
    let returned = s5.players[0]
        .hand
        .iter()
        .find(|c| c.instance_id == "strong")
        .unwrap();
    assert_eq!(returned.current_metrics.unwrap().hp, 350.0);
    assert!(returned.is_modified_permanently);
}

#[test]
fn temporary_modifier_reverts_when_the_round_resolves() {
    let effect = Effect::MetricModTemp {
        target_metric: Metric::Speed,
        value: 20.0,
        modifier_type: ModifierKind::Percentage,
        target: EffectTarget::Own,
    };
    let state = make_state(
        vec![make_action("nitro", effect), make_car("c1", 100.0)],
        vec![make_car("c2", 100.0)],
    );

    let s1 = submit_play(&state, "p1", "nitro", &PlayPayload::default()).unwrap();
    let s2 = submit_play(&s1, "p1", "c1", &metric_payload(Metric::Speed)).unwrap();
    // Default speed is 200; +20% applies for the comparison only.
    assert_eq!(s2.board[0].car.as_ref().unwrap().current_metrics.unwrap().speed, 240.0);
    assert_eq!(s2.board[0].temp_modified_metric, Some(Metric::Speed));

    let s3 = end_turn(&s2, 0).unwrap();
    let s4 = submit_play(&s3, "p2", "c2", &PlayPayload::default()).unwrap();
    let s5 = resolve_round(&s4).unwrap();

    assert_eq!(s5.round_winner_id.as_deref(), Some("p1"));
    let returned = s5.players[0]
        .hand
        .iter()
        .find(|c| c.instance_id == "c1")
        .unwrap();
    assert_eq!(returned.current_metrics.unwrap().speed, 200.0);
    assert!(!returned.is_modified_permanently);
}

#[test]
fn opponent_targeted_modifier_waits_on_their_car() {
    let effect = Effect::MetricModTemp {
        target_metric: Metric::Speed,
        value: -20.0,
        modifier_type: ModifierKind::Percentage,
        target: EffectTarget::Opponent,
    };
    let state = make_state(
        vec![make_action("sand", effect), make_car("c1", 100.0)],
        vec![make_car("c2", 100.0)],
    );

    let s1 = submit_play(&state, "p1", "sand", &PlayPayload::default()).unwrap();
    assert!(s1.pending_modifiers[1].is_some());

    let s2 = submit_play(&s1, "p1", "c1", &metric_payload(Metric::Speed)).unwrap();
    // p1's own car is untouched; the modifier still waits on p2.
    assert_eq!(s2.board[0].car.as_ref().unwrap().current_metrics.unwrap().speed, 200.0);
    assert!(s2.pending_modifiers[1].is_some());

    let s3 = end_turn(&s2, 0).unwrap();
    let s4 = submit_play(&s3, "p2", "c2", &PlayPayload::default()).unwrap();
    assert!(s4.pending_modifiers[1].is_none());
    assert_eq!(s4.board[1].car.as_ref().unwrap().current_metrics.unwrap().speed, 160.0);
}

// Scenario: override_metric fixes the round to weight, where lower wins.
#[test]
fn override_metric_sets_round_and_lower_wins() {
    let light = make_car_with("light", metrics(180.0, 150.0, 7.0, 1200.0, 2005.0));
    let heavy = make_car_with("heavy", metrics(250.0, 400.0, 4.0, 1900.0, 2020.0));
    let wildcard = make_action(
        "wild",
        Effect::OverrideMetric {
            allowed: Metric::ALL.to_vec(),
        },
    );
    let state = make_state(vec![wildcard, light], vec![heavy]);

    let s1 = submit_play(&state, "p1", "wild", &metric_payload(Metric::Weight)).unwrap();
    assert_eq!(s1.selected_metric_for_round, Some(Metric::Weight));

    // The following car play needs no selection: the metric is set.
    let s2 = submit_play(&s1, "p1", "light", &PlayPayload::default()).unwrap();
    assert_eq!(s2.selected_metric_for_round, Some(Metric::Weight));

    let s3 = end_turn(&s2, 0).unwrap();
    let s4 = submit_play(&s3, "p2", "heavy", &PlayPayload::default()).unwrap();
    let s5 = resolve_round(&s4).unwrap();
    assert_eq!(s5.round_winner_id.as_deref(), Some("p1"));
}

#[test]
fn override_metric_requires_an_allowed_selection() {
    let wildcard = make_action(
        "wild",
        Effect::OverrideMetric {
            allowed: vec![Metric::Speed, Metric::Hp],
        },
    );
    let state = make_state(vec![wildcard, make_car("c1", 100.0)], vec![make_car("c2", 90.0)]);

    assert!(submit_play(&state, "p1", "wild", &PlayPayload::default()).is_err());
    assert!(submit_play(&state, "p1", "wild", &metric_payload(Metric::Weight)).is_err());
    assert!(submit_play(&state, "p1", "wild", &metric_payload(Metric::Hp)).is_ok());
}

#[test]
fn drop_card_discards_deterministically() {
    let state = make_state(
        vec![make_action("tow", Effect::DropCard), make_car("c1", 100.0)],
        vec![
            make_car("c2", 90.0),
            make_car("c3", 80.0),
            make_car("c4", 70.0),
        ],
    );
    let baseline = all_instance_ids(&state);

    let a = submit_play(&state, "p1", "tow", &PlayPayload::default()).unwrap();
    let b = submit_play(&state, "p1", "tow", &PlayPayload::default()).unwrap();
    assert_eq!(a, b);

    assert_eq!(a.players[1].hand.len(), 2);
    assert_eq!(a.discard_pile.len(), 1);
    assert_conservation(&a, &baseline);
}

#[test]
fn drop_card_against_empty_hand_is_a_noop() {
    let state = make_state(
        vec![make_action("tow", Effect::DropCard), make_car("c1", 100.0)],
        vec![],
    );
    let s1 = submit_play(&state, "p1", "tow", &PlayPayload::default()).unwrap();
    assert!(s1.discard_pile.is_empty());
}

#[test]
fn time_mod_adjusts_and_floors_the_limit() {
    let state = make_state(
        vec![
            make_action("more", Effect::TimeMod { seconds: 30 }),
            make_car("c1", 100.0),
        ],
        vec![make_car("c2", 90.0)],
    );
    let s1 = submit_play(&state, "p1", "more", &PlayPayload::default()).unwrap();
    assert_eq!(s1.turn_time_limit_ms, 60_000);

    let mut shrink = make_state(
        vec![
            make_action("less", Effect::TimeMod { seconds: -120 }),
            make_car("c1", 100.0),
        ],
        vec![make_car("c2", 90.0)],
    );
    shrink.turn_time_limit_ms = 30_000;
    let s2 = submit_play(&shrink, "p1", "less", &PlayPayload::default()).unwrap();
    assert_eq!(s2.turn_time_limit_ms, MIN_TURN_TIME_MS);
}

#[test]
fn extra_turn_outranks_round_winner_and_tie() {
    let state = make_state(
        vec![
            make_action("encore", Effect::ExtraTurn),
            make_car("c1", 100.0),
            make_car("spare1", 50.0),
        ],
        vec![make_car("c2", 300.0), make_car("spare2", 60.0)],
    );

    let s1 = submit_play(&state, "p1", "encore", &PlayPayload::default()).unwrap();
    assert_eq!(s1.extra_turn_player_id.as_deref(), Some("p1"));

    let s2 = submit_play(&s1, "p1", "c1", &metric_payload(Metric::Hp)).unwrap();
    let s3 = end_turn(&s2, 0).unwrap();
    let s4 = submit_play(&s3, "p2", "c2", &PlayPayload::default()).unwrap();
    let s5 = resolve_round(&s4).unwrap();
    // p2 won the round, but p1 marked the extra turn.
    assert_eq!(s5.round_winner_id.as_deref(), Some("p2"));
    let s6 = advance_turn(&s5, 0).unwrap();
    assert_eq!(s6.current_player_id, "p1");
    assert!(s6.extra_turn_player_id.is_none());
}

#[test]
fn action_card_lands_in_the_discard_after_resolution() {
    let state = make_state(
        vec![
            make_action("encore", Effect::ExtraTurn),
            make_car("c1", 100.0),
        ],
        vec![make_car("c2", 90.0)],
    );
    let s1 = submit_play(&state, "p1", "encore", &PlayPayload::default()).unwrap();
    assert!(s1.board[0].action.is_some());
    let s2 = submit_play(&s1, "p1", "c1", &metric_payload(Metric::Hp)).unwrap();
    let s3 = end_turn(&s2, 0).unwrap();
    let s4 = submit_play(&s3, "p2", "c2", &PlayPayload::default()).unwrap();
    let s5 = resolve_round(&s4).unwrap();
    assert!(s5.board[0].action.is_none());
    assert!(s5
        .discard_pile
        .iter()
        .any(|c| c.instance_id == "encore"));
}

#[test]
fn later_modifier_replaces_the_earlier_one() {
    let first = Effect::MetricModTemp {
        target_metric: Metric::Speed,
        value: 10.0,
        modifier_type: ModifierKind::Percentage,
        target: EffectTarget::Opponent,
    };
    let second = Effect::MetricModTemp {
        target_metric: Metric::Hp,
        value: -10.0,
        modifier_type: ModifierKind::Percentage,
        target: EffectTarget::Own,
    };
    // p1 aims at p2, then p2 aims at themselves: the later one stands.
    let state = make_state(
        vec![make_action("a1", first), make_car("c1", 100.0)],
        vec![make_action("a2", second), make_car("c2", 90.0)],
    );
    let s1 = submit_play(&state, "p1", "a1", &PlayPayload::default()).unwrap();
    let s2 = submit_play(&s1, "p1", "c1", &metric_payload(Metric::Hp)).unwrap();
    let s3 = end_turn(&s2, 0).unwrap();
    let s4 = submit_play(&s3, "p2", "a2", &PlayPayload::default()).unwrap();
    let pending = s4.pending_modifiers[1].as_ref().unwrap();
    assert_eq!(pending.source_instance_id, "a2");
}
