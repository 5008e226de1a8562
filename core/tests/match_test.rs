use cornhole_core::{
    integrate, BoardGeometry, Bounds, CoreError, LandingResult, MatchMachine, MatchOutcome,
    MatchRules, MatchSession, MatchStatus, Player, Point, ThrowInput, WindState,
};

fn players() -> (Player, Player) {
    (Player::new("wallet-a", "alice"), Player::new("wallet-b", "bob"))
}

fn active_machine(rules: MatchRules) -> MatchMachine {
    let mut m = MatchMachine::new(rules, 1234);
    let (a, b) = players();
    m.bind_player(a).unwrap();
    m.bind_player(b).unwrap();
    m
}

fn active_session(board: BoardGeometry) -> MatchSession {
    let mut s = MatchSession::new(1234, MatchRules::default(), board);
    let (a, b) = players();
    s.bind_player(a).unwrap();
    s.bind_player(b).unwrap();
    s
}

#[test]
fn test_binding_both_players_activates() {
    let mut m = MatchMachine::new(MatchRules::default(), 1);
    let (a, b) = players();

    assert_eq!(m.status(), MatchStatus::Waiting);
    assert_eq!(m.bind_player(a.clone()).unwrap(), 0);
    assert_eq!(m.status(), MatchStatus::Waiting);

    assert_eq!(
        m.bind_player(a).unwrap_err(),
        CoreError::DuplicatePlayer("wallet-a".to_string())
    );

    assert_eq!(m.bind_player(b).unwrap(), 1);
    assert_eq!(m.status(), MatchStatus::Active);

    let late = m.bind_player(Player::new("wallet-c", "carol")).unwrap_err();
    assert!(matches!(late, CoreError::IllegalTransition(_)));
}

#[test]
fn test_throw_before_start_is_illegal() {
    let mut m = MatchMachine::new(MatchRules::default(), 1);
    let before = *m.state();
    let err = m.record_throw(0, LandingResult::Hole).unwrap_err();
    assert!(matches!(err, CoreError::IllegalTurn(_)));
    assert_eq!(*m.state(), before);
}

#[test]
fn test_hole_in_one_end_to_end() {
    let launch = Point::launch();
    let traj = integrate(90.0, 80.0, &WindState::CALM, launch).unwrap();
    let landing = traj.landing().unwrap();

    let board = BoardGeometry {
        bounds: Bounds {
            x: landing.x - 80.0,
            y: landing.y - 120.0,
            width: 160.0,
            height: 240.0,
        },
        hole_center: landing,
        hole_radius: 25.0,
    };

    let mut session = active_session(board);
    session.sync_wind(WindState::CALM).unwrap();

    let outcome = session.throw(0, ThrowInput::new(90.0, 80.0).unwrap()).unwrap();

    assert_eq!(outcome.result, LandingResult::Hole);
    assert_eq!(outcome.points, 3);
    assert_eq!(outcome.landing_point, landing);

    let state = session.machine().state();
    assert_eq!(state.scores, [3, 0]);
    assert_eq!(state.active_player_index, 1);
    assert_eq!(state.status, MatchStatus::Active);
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history()[0].wind, WindState::CALM);
}

#[test]
fn test_turns_alternate_and_rounds_advance() {
    let mut m = active_machine(MatchRules::default());

    assert_eq!(m.current_round(), 1);
    assert_eq!(m.state().bags_remaining, 2);

    let first = m.record_throw(0, LandingResult::Board).unwrap();
    assert_eq!((first.round, first.throw_index), (1, 0));
    assert_eq!(m.current_round(), 1, "Round only advances after both players throw");
    assert_eq!(m.state().bags_remaining, 1);

    let err = m.record_throw(0, LandingResult::Board).unwrap_err();
    assert!(matches!(err, CoreError::IllegalTurn(_)), "Same player cannot throw twice");

    let second = m.record_throw(1, LandingResult::Miss).unwrap();
    assert_eq!((second.round, second.throw_index), (1, 1));
    assert_eq!(m.current_round(), 2);
    assert_eq!(m.state().bags_remaining, 2);
    assert_eq!(m.active_player(), 0);
    assert_eq!(m.scores(), [1, 0]);
}

#[test]
fn test_wind_regenerates_after_each_throw() {
    let mut m = active_machine(MatchRules::default());
    let w0 = m.wind();
    m.record_throw(0, LandingResult::Miss).unwrap();
    let w1 = m.wind();
    m.record_throw(1, LandingResult::Miss).unwrap();
    let w2 = m.wind();

    assert_ne!(w0, w1);
    assert_ne!(w1, w2);
    for w in [w1, w2] {
        assert!(w.speed <= 15.0 && w.direction < 360.0);
    }
    assert!((w1.speed - w0.speed).abs() <= 2.0, "Wind must drift, not jump");
}

#[test]
fn test_reaching_target_completes_and_freezes() {
    let mut m = active_machine(MatchRules::default());

    for _ in 0..6 {
        m.record_throw(0, LandingResult::Hole).unwrap();
        m.record_throw(1, LandingResult::Miss).unwrap();
    }
    assert_eq!(m.scores(), [18, 0]);
    assert_eq!(m.status(), MatchStatus::Active);

    let last = m.record_throw(0, LandingResult::Hole).unwrap();
    assert!(last.completed);
    assert_eq!(m.scores(), [21, 0]);
    assert_eq!(m.status(), MatchStatus::Completed);
    assert_eq!(m.outcome(), Some(MatchOutcome::Winner(0)));

    let frozen = *m.state();
    let frozen_wind = m.wind();
    for player in [0, 1] {
        let err = m.record_throw(player, LandingResult::Hole).unwrap_err();
        assert!(matches!(err, CoreError::IllegalTurn(_)));
    }
    assert_eq!(*m.state(), frozen, "Rejected throws must not mutate state");
    assert_eq!(m.wind(), frozen_wind);
    assert!(m.cancel().is_err(), "Completed is terminal");
    assert_eq!(m.status(), MatchStatus::Completed);
}

#[test]
fn test_overshooting_target_still_completes() {
    let mut m = active_machine(MatchRules {
        target_score: 5,
        round_equalizer: false,
    });
    m.record_throw(0, LandingResult::Hole).unwrap();
    m.record_throw(1, LandingResult::Board).unwrap();
    m.record_throw(0, LandingResult::Hole).unwrap();

    assert_eq!(m.scores(), [6, 1]);
    assert_eq!(m.status(), MatchStatus::Completed);
}

#[test]
fn test_equalizer_round_ends_in_draw() {
    let mut m = active_machine(MatchRules {
        target_score: 21,
        round_equalizer: true,
    });

    for _ in 0..6 {
        m.record_throw(0, LandingResult::Hole).unwrap();
        m.record_throw(1, LandingResult::Hole).unwrap();
    }

    m.record_throw(0, LandingResult::Hole).unwrap();
    assert_eq!(m.scores(), [21, 18]);
    assert_eq!(m.status(), MatchStatus::Active, "Closer still gets the last bag of the round");
    assert_eq!(m.active_player(), 1);

    let closing = m.record_throw(1, LandingResult::Hole).unwrap();
    assert!(closing.completed);
    assert_eq!(m.scores(), [21, 21]);
    assert_eq!(m.status(), MatchStatus::Completed);
    assert_eq!(m.outcome(), Some(MatchOutcome::Draw));
    assert_eq!(m.summary().outcome, Some(MatchOutcome::Draw));
}

#[test]
fn test_equalizer_miss_gives_opener_the_win() {
    let mut m = active_machine(MatchRules {
        target_score: 3,
        round_equalizer: true,
    });
    m.record_throw(0, LandingResult::Hole).unwrap();
    assert_eq!(m.status(), MatchStatus::Active);
    m.record_throw(1, LandingResult::Board).unwrap();

    assert_eq!(m.status(), MatchStatus::Completed);
    assert_eq!(m.outcome(), Some(MatchOutcome::Winner(0)));
}

#[test]
fn test_cancel_is_idempotent_and_terminal() {
    let mut m = active_machine(MatchRules::default());
    m.record_throw(0, LandingResult::Board).unwrap();

    m.cancel().unwrap();
    m.cancel().unwrap();
    assert_eq!(m.status(), MatchStatus::Cancelled);
    assert_eq!(m.outcome(), None);

    let err = m.record_throw(1, LandingResult::Hole).unwrap_err();
    assert!(matches!(err, CoreError::IllegalTurn(_)));
    assert!(m.sync_wind(WindState::CALM).is_err());
    assert_eq!(m.scores(), [1, 0]);
}

#[test]
fn test_cancel_from_waiting() {
    let mut m = MatchMachine::new(MatchRules::default(), 5);
    m.cancel().unwrap();
    assert_eq!(m.status(), MatchStatus::Cancelled);
    assert!(m.bind_player(Player::new("w", "u")).is_err());
}

#[test]
fn test_second_throw_rejected_while_in_flight() {
    let mut m = active_machine(MatchRules::default());

    m.begin_throw(0).unwrap();
    assert_eq!(m.throw_in_flight(), Some(0));
    assert_eq!(m.begin_throw(0).unwrap_err(), CoreError::ThrowInFlight(0));

    m.record_throw(0, LandingResult::Miss).unwrap();
    assert_eq!(m.throw_in_flight(), None);
    m.begin_throw(1).unwrap();
}

#[test]
fn test_record_without_begin_scores_synchronously() {
    let mut m = active_machine(MatchRules::default());

    let scored = m.record_throw(0, LandingResult::Board).unwrap();
    assert_eq!(scored.points, 1);
    assert_eq!(m.throw_in_flight(), None);

    // A throw begun by the active player still blocks a second begin until recorded
    m.begin_throw(1).unwrap();
    assert_eq!(m.begin_throw(1).unwrap_err(), CoreError::ThrowInFlight(1));
    assert!(matches!(
        m.record_throw(0, LandingResult::Hole).unwrap_err(),
        CoreError::IllegalTurn(_)
    ));
    m.abandon_throw();
    assert_eq!(m.throw_in_flight(), None);
    assert_eq!(m.scores(), [1, 0]);
}

#[test]
fn test_unknown_player_index() {
    let mut m = active_machine(MatchRules::default());
    assert_eq!(
        m.record_throw(2, LandingResult::Hole).unwrap_err(),
        CoreError::UnknownPlayer(2)
    );
}

#[test]
fn test_invalid_throw_leaves_session_untouched() {
    let mut s = active_session(BoardGeometry::standard());
    let before = *s.machine().state();
    let wind = s.wind();

    let err = s.throw(0, ThrowInput { angle: 190.0, power: 50.0 }).unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));
    assert_eq!(*s.machine().state(), before);
    assert_eq!(s.wind(), wind);
    assert_eq!(s.machine().throw_in_flight(), None);
    assert!(s.history().is_empty());
}

#[test]
fn test_seeded_sessions_replay_identically() {
    let throws = [(80.0, 60.0), (75.0, 55.0), (85.0, 50.0), (70.0, 45.0), (88.0, 58.0)];

    let run = || {
        let mut s = active_session(BoardGeometry::standard());
        for (i, (angle, power)) in throws.iter().enumerate() {
            s.throw(i % 2, ThrowInput::new(*angle, *power).unwrap()).unwrap();
        }
        (s.machine().scores(), s.log_hash(), s.history().to_vec())
    };

    let (scores_a, hash_a, hist_a) = run();
    let (scores_b, hash_b, hist_b) = run();
    assert_eq!(scores_a, scores_b);
    assert_eq!(hash_a, hash_b);
    assert_eq!(hist_a, hist_b);

    let total: u32 = hist_a.iter().map(|t| t.points).sum();
    assert_eq!(scores_a[0] + scores_a[1], total, "Every throw is scored exactly once");
}
