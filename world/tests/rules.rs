use std::time::Duration;

use knight_adventure_core::{
    knight_destinations, Cell, Command, Event, GameOutcome, GamePhase, Level, MoveRejection,
    PawnId, PAWN_SPAWN_ROW,
};
use knight_adventure_world::{self as world, query, World};

fn started_world() -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartGame, &mut events);
    world
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn spawn(world: &mut World, column: i32) -> PawnId {
    match run(world, Command::SpawnPawn { column }).as_slice() {
        [Event::PawnSpawned { pawn, .. }] => *pawn,
        other => panic!("expected a single spawn event, got {other:?}"),
    }
}

/// Walks a freshly spawned pawn down its column until it stands on `row`.
fn walk_to_row(world: &mut World, pawn: PawnId, row: i32) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in PAWN_SPAWN_ROW..row {
        world::apply(world, Command::AdvancePawn { pawn }, &mut events);
    }
    events
}

fn settle(world: &mut World) {
    let _ = run(
        world,
        Command::Tick {
            dt: Duration::from_millis(500),
        },
    );
}

/// Places a pawn two columns away from the knight on one of its landing
/// squares and captures it.
fn capture_one(world: &mut World) -> Vec<Event> {
    let knight = query::knight(world).cell;
    let target = knight_destinations(knight)
        .find(|cell| cell.column().abs_diff(knight.column()) == 2)
        .expect("every square has a wide knight jump");
    let pawn = spawn(world, target.column());
    let _ = walk_to_row(world, pawn, target.row());
    let events = run(world, Command::MoveKnight { to: target });
    settle(world);
    events
}

#[test]
fn pawn_two_columns_away_keeps_advancing() {
    let mut world = started_world();
    let pawn = spawn(&mut world, 2);
    let events = walk_to_row(&mut world, pawn, 3);

    assert_eq!(events.len(), 4);
    assert!(events.iter().all(|event| matches!(
        event,
        Event::PawnAdvanced {
            threatens_knight: false,
            ..
        }
    )));

    let next = run(&mut world, Command::AdvancePawn { pawn });
    assert_eq!(
        next,
        vec![Event::PawnAdvanced {
            pawn,
            from: Cell::new(2, 3),
            to: Cell::new(2, 4),
            threatens_knight: false,
        }]
    );
    assert_eq!(query::phase(&world), GamePhase::Running);
}

#[test]
fn pawn_captures_knight_that_stays_put() {
    let mut world = started_world();
    let pawn = spawn(&mut world, 5);
    let events = walk_to_row(&mut world, pawn, 3);
    assert_eq!(
        events.last(),
        Some(&Event::PawnAdvanced {
            pawn,
            from: Cell::new(5, 2),
            to: Cell::new(5, 3),
            threatens_knight: true,
        })
    );
    assert!(query::pawn_view(&world)
        .iter()
        .all(|snapshot| snapshot.pending_capture));

    let events = run(&mut world, Command::AdvancePawn { pawn });
    assert_eq!(
        events[0],
        Event::KnightCaptured {
            pawn,
            cell: Cell::new(4, 4),
        }
    );
    assert!(matches!(
        events[1],
        Event::GameOver {
            outcome: GameOutcome::KnightCaptured,
            ..
        }
    ));
    assert!(query::is_game_over(&world));
}

#[test]
fn knight_escapes_pending_capture_by_moving() {
    let mut world = started_world();
    let pawn = spawn(&mut world, 5);
    let _ = walk_to_row(&mut world, pawn, 3);

    let moved = run(
        &mut world,
        Command::MoveKnight {
            to: Cell::new(2, 3),
        },
    );
    assert_eq!(
        moved,
        vec![Event::KnightMoved {
            from: Cell::new(4, 4),
            to: Cell::new(2, 3),
        }]
    );

    let events = run(&mut world, Command::AdvancePawn { pawn });
    assert_eq!(
        events,
        vec![
            Event::PawnThreatCleared { pawn },
            Event::PawnAdvanced {
                pawn,
                from: Cell::new(5, 3),
                to: Cell::new(5, 4),
                threatens_knight: false,
            },
        ]
    );
    assert_eq!(query::phase(&world), GamePhase::Running);
}

#[test]
fn pawn_escaping_the_board_ends_the_game() {
    let mut world = started_world();
    let pawn = spawn(&mut world, 0);
    let events = walk_to_row(&mut world, pawn, 8);

    let tail = &events[events.len() - 3..];
    assert_eq!(
        tail[0],
        Event::PawnAdvanced {
            pawn,
            from: Cell::new(0, 7),
            to: Cell::new(0, 8),
            threatens_knight: false,
        }
    );
    assert_eq!(tail[1], Event::PawnEscaped { pawn, column: 0 });
    match tail[2] {
        Event::GameOver { outcome, summary } => {
            assert_eq!(outcome, GameOutcome::PawnEscaped);
            assert_eq!(summary.score, 0);
        }
        ref other => panic!("expected game over, got {other:?}"),
    }
}

#[test]
fn knight_blocks_pawn_until_it_moves() {
    let mut world = started_world();
    let pawn = spawn(&mut world, 4);
    let _ = walk_to_row(&mut world, pawn, 3);

    for _ in 0..3 {
        assert_eq!(
            run(&mut world, Command::AdvancePawn { pawn }),
            vec![Event::PawnBlocked {
                pawn,
                blocked_by: Cell::new(4, 4),
            }]
        );
    }

    let _ = run(
        &mut world,
        Command::MoveKnight {
            to: Cell::new(6, 5),
        },
    );
    let events = run(&mut world, Command::AdvancePawn { pawn });
    assert_eq!(
        events,
        vec![Event::PawnAdvanced {
            pawn,
            from: Cell::new(4, 3),
            to: Cell::new(4, 4),
            threatens_knight: false,
        }]
    );
}

#[test]
fn knight_captures_pawn_on_landing_square() {
    let mut world = started_world();
    let events = capture_one(&mut world);

    assert!(matches!(events[0], Event::KnightMoved { .. }));
    assert!(matches!(events[1], Event::PawnCaptured { .. }));
    assert_eq!(events[2], Event::ScoreChanged { score: 1 });
    assert_eq!(events.len(), 3);
    assert_eq!(query::score(&world), 1);
    assert_eq!(query::pawn_count(&world), 0);
    assert!(query::knight(&world).movable);
}

#[test]
fn threatened_landing_square_wins_over_capture() {
    let mut world = started_world();
    let prey = spawn(&mut world, 6);
    let _ = walk_to_row(&mut world, prey, 5);
    let guard = spawn(&mut world, 7);
    let _ = walk_to_row(&mut world, guard, 4);

    let events = run(
        &mut world,
        Command::MoveKnight {
            to: Cell::new(6, 5),
        },
    );

    assert_eq!(events.len(), 3);
    assert_eq!(
        events[1],
        Event::KnightCaptured {
            pawn: guard,
            cell: Cell::new(6, 5),
        }
    );
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::PawnCaptured { .. })));
    assert_eq!(query::score(&world), 0);
    assert_eq!(query::pawn_count(&world), 2);
}

#[test]
fn equidistant_attackers_resolve_in_spawn_order() {
    let config = knight_adventure_core::GameConfig {
        knight_start: Cell::new(4, 7),
        ..Default::default()
    };
    let mut world = World::with_config(config);
    let _ = run(&mut world, Command::StartGame);

    let first = spawn(&mut world, 5);
    let _ = walk_to_row(&mut world, first, 5);
    let second = spawn(&mut world, 7);
    let _ = walk_to_row(&mut world, second, 5);

    let events = run(
        &mut world,
        Command::MoveKnight {
            to: Cell::new(6, 6),
        },
    );
    assert_eq!(
        events[1],
        Event::KnightCaptured {
            pawn: first,
            cell: Cell::new(6, 6),
        }
    );
}

#[test]
fn level_reaches_ten_at_twenty_seven_and_stays() {
    let mut world = started_world();
    let mut levels = Vec::new();

    for _ in 0..30 {
        for event in capture_one(&mut world) {
            if let Event::LevelChanged { level, .. } = event {
                levels.push(level.get());
            }
        }
        assert_eq!(query::phase(&world), GamePhase::Running);
    }

    assert_eq!(levels, vec![2, 3, 4, 5, 6, 7, 8, 9, 10]);
    assert_eq!(query::score(&world), 30);
    assert_eq!(query::level(&world), Level::new(10));
    assert_eq!(query::level_settings(&world).max_pawns, 6);
}

#[test]
fn finished_game_rejects_all_mutation() {
    let mut world = started_world();
    let pawn = spawn(&mut world, 1);
    let _ = walk_to_row(&mut world, pawn, 8);
    assert!(query::is_game_over(&world));

    let before = query::pawn_view(&world).into_vec();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::MoveKnight {
            to: Cell::new(6, 5),
        },
        &mut events,
    );
    world::apply(&mut world, Command::SpawnPawn { column: 3 }, &mut events);
    world::apply(&mut world, Command::AdvancePawn { pawn }, &mut events);
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(3),
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::KnightMoveRejected {
            to: Cell::new(6, 5),
            reason: MoveRejection::GameOver,
        }]
    );
    assert_eq!(query::pawn_view(&world).into_vec(), before);
    assert_eq!(query::knight(&world).cell, Cell::new(4, 4));
}

#[test]
fn restart_begins_a_fresh_game() {
    let mut world = started_world();
    let _ = capture_one(&mut world);
    let pawn = spawn(&mut world, 0);
    let _ = walk_to_row(&mut world, pawn, 8);
    assert!(query::is_game_over(&world));

    let events = run(&mut world, Command::StartGame);
    assert_eq!(
        events,
        vec![Event::GameStarted {
            knight: Cell::new(4, 4)
        }]
    );
    assert_eq!(query::score(&world), 0);
    assert_eq!(query::pawn_count(&world), 0);
    assert_eq!(query::elapsed(&world), Duration::ZERO);
}
