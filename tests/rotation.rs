//! Integration tests for the rotation: filling idle slots and finishing matches.

use court_rotation_web::{
    fill_idle_slots, finish_match, try_finish_match, FillLogEntry, ParticipantStatus,
    RotationError, Session, Team,
};

fn session_with_players(n: usize, slots: u32) -> Session {
    let mut s = Session::seeded(slots, 42);
    for i in 0..n {
        s.register(&format!("P{i}")).unwrap();
    }
    s
}

fn rest_of(s: &Session, name: &str) -> Option<u32> {
    s.participant(name).unwrap().consecutive_rest
}

fn assigned_teams(log: &[FillLogEntry]) -> Vec<(u32, Team, Team)> {
    log.iter()
        .filter_map(|e| match e {
            FillLogEntry::Assigned {
                slot_id,
                team_a,
                team_b,
            } => Some((*slot_id, team_a.clone(), team_b.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn fill_with_no_idle_slots_changes_nothing() {
    let mut s = session_with_players(6, 1);
    let first = fill_idle_slots(&mut s);
    assert_eq!(assigned_teams(&first).len(), 1);

    let before = s.snapshot();
    let second = fill_idle_slots(&mut s);
    assert_eq!(second, vec![FillLogEntry::NothingToDo]);
    assert_eq!(s.snapshot(), before);
}

#[test]
fn too_few_players_leaves_slot_idle_but_counts_a_rest() {
    let mut s = session_with_players(3, 1);
    let log = fill_idle_slots(&mut s);
    assert_eq!(
        log,
        vec![FillLogEntry::Skipped {
            slot_id: 1,
            reason: RotationError::InsufficientAvailablePlayers {
                slot_id: 1,
                available: 3,
            },
        }]
    );
    assert_eq!(s.board().idle_slot_ids(), vec![1]);
    for i in 0..3 {
        assert_eq!(rest_of(&s, &format!("P{i}")), Some(1));
    }
}

#[test]
fn later_slot_is_skipped_when_earlier_slots_used_everyone() {
    let mut s = session_with_players(6, 2);
    let log = fill_idle_slots(&mut s);
    assert!(matches!(log[0], FillLogEntry::Assigned { slot_id: 1, .. }));
    assert!(matches!(
        log[1],
        FillLogEntry::Skipped {
            slot_id: 2,
            reason: RotationError::InsufficientAvailablePlayers { available: 2, .. }
        }
    ));
    let waiting = s.available_participants();
    assert_eq!(waiting.len(), 2);
    assert!(waiting.iter().all(|p| p.consecutive_rest == Some(1)));
}

#[test]
fn play_count_grows_by_four_per_filled_slot() {
    let mut s = session_with_players(10, 2);
    assert_eq!(s.roster().total_play_count(), 0);
    let log = fill_idle_slots(&mut s);
    assert_eq!(assigned_teams(&log).len(), 2);
    assert_eq!(s.roster().total_play_count(), 8);

    let busy: Vec<_> = s
        .roster()
        .all()
        .iter()
        .filter(|p| p.status == ParticipantStatus::Busy)
        .collect();
    assert_eq!(busy.len(), 8);
    assert!(busy
        .iter()
        .all(|p| p.play_count == 1 && p.consecutive_rest == Some(0)));
}

#[test]
fn rested_participant_goes_first_next_round() {
    let mut s = session_with_players(5, 1);
    fill_idle_slots(&mut s);
    let rested = s.available_participants()[0].name.clone();
    assert_eq!(rest_of(&s, &rested), Some(1));

    assert!(finish_match(&mut s, 1, "21-17"));
    fill_idle_slots(&mut s);
    assert!(s.board().get(1).unwrap().involves(&rested));
    assert_eq!(rest_of(&s, &rested), Some(0));
}

#[test]
fn finish_match_records_history_and_frees_players() {
    let mut s = session_with_players(4, 1);
    fill_idle_slots(&mut s);
    let active = s.board().get(1).unwrap().clone();

    let record = try_finish_match(&mut s, 1, "21-15").unwrap();
    assert_eq!(record.id, 1);
    assert_eq!(record.result, "21-15");
    assert_eq!(s.history().len(), 1);
    assert!(s.board().get(1).is_none());

    let [a0, a1] = active.team_a.members();
    let [b0, b1] = active.team_b.members();
    assert_eq!(s.ledger().partner_cost(a0, a1), 1);
    assert_eq!(s.ledger().partner_cost(b0, b1), 1);
    assert_eq!(s.ledger().opponent_cost(a0, b0), 1);
    assert_eq!(s.ledger().opponent_cost(a1, b1), 1);
    assert_eq!(s.ledger().opponent_cost(a0, a1), 0);

    // Status goes back to Available; counters are not touched by finishing.
    for name in active.players() {
        let p = s.participant(name).unwrap();
        assert_eq!(p.status, ParticipantStatus::Available);
        assert_eq!(p.play_count, 1);
        assert_eq!(p.consecutive_rest, Some(0));
    }
}

#[test]
fn finishing_an_idle_slot_is_a_no_op() {
    let mut s = session_with_players(4, 2);
    assert!(!finish_match(&mut s, 1, ""));
    fill_idle_slots(&mut s);
    assert!(finish_match(&mut s, 1, ""));
    assert!(!finish_match(&mut s, 1, ""));
    assert_eq!(
        try_finish_match(&mut s, 1, ""),
        Err(RotationError::NoActiveMatchAtSlot { slot_id: 1 })
    );
    assert_eq!(s.history().len(), 1);
    assert_eq!(s.history()[0].result, "no record");
}

#[test]
fn same_four_players_never_repeat_a_partnership_next_time() {
    let mut s = session_with_players(4, 1);
    fill_idle_slots(&mut s);
    assert!(finish_match(&mut s, 1, ""));
    fill_idle_slots(&mut s);

    let second = s.board().get(1).unwrap();
    let [a0, a1] = second.team_a.members();
    let [b0, b1] = second.team_b.members();
    assert_eq!(s.ledger().partner_cost(a0, a1), 0);
    assert_eq!(s.ledger().partner_cost(b0, b1), 0);
}

#[test]
fn shrinking_lets_running_slot_finish_then_drops_it() {
    let mut s = session_with_players(8, 2);
    fill_idle_slots(&mut s);
    s.set_slot_count(1);
    assert_eq!(s.board().closing_slot_ids(), vec![2]);

    // Slot 1 busy, slot 2 closing: nothing to fill.
    assert_eq!(fill_idle_slots(&mut s), vec![FillLogEntry::NothingToDo]);

    let closing_players: Vec<String> = s.board().get(2).unwrap().players().cloned().collect();
    assert!(finish_match(&mut s, 2, "21-9"));
    assert!(s.board().closing_slot_ids().is_empty());
    assert_eq!(s.board().views().len(), 1);
    for name in &closing_players {
        assert_eq!(
            s.participant(name).unwrap().status,
            ParticipantStatus::Available
        );
    }

    // A closed slot is gone, not idle.
    assert!(!finish_match(&mut s, 2, ""));
    assert!(finish_match(&mut s, 1, ""));
    let log = fill_idle_slots(&mut s);
    assert_eq!(assigned_teams(&log).len(), 1);
    assert!(matches!(log[0], FillLogEntry::Assigned { slot_id: 1, .. }));
}

#[test]
fn growing_adds_idle_slots_and_ignores_zero() {
    let mut s = session_with_players(12, 2);
    fill_idle_slots(&mut s);
    s.set_slot_count(0);
    assert_eq!(s.board().slot_count(), 2);
    s.set_slot_count(3);
    assert_eq!(s.board().idle_slot_ids(), vec![3]);
    let log = fill_idle_slots(&mut s);
    assert_eq!(assigned_teams(&log)[0].0, 3);
}

#[test]
fn same_seed_gives_same_rotation() {
    let run = || {
        let mut s = session_with_players(9, 2);
        let mut logs = Vec::new();
        for _ in 0..4 {
            logs.push(fill_idle_slots(&mut s));
            finish_match(&mut s, 1, "");
        }
        logs
    };
    assert_eq!(run(), run());
}

#[test]
fn nobody_rests_twice_while_others_have_not_rested() {
    // 5 players, one slot: someone sits out each round and the sitter rotates.
    let mut s = session_with_players(5, 1);
    for _ in 0..10 {
        fill_idle_slots(&mut s);
        assert!(s
            .roster()
            .all()
            .iter()
            .all(|p| p.consecutive_rest.unwrap() <= 1));
        assert!(finish_match(&mut s, 1, ""));
    }
    assert_eq!(s.roster().total_play_count(), 40);
    assert!(s.roster().all().iter().all(|p| p.play_count == 8));
}
