#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveTime};
use faction::{
    assignment_signature, Catalog, DayAvailability, DiagEvent, Engine, GenerateOptions,
    MemorySink, Period, Post, PostId, Role, ShiftAssignment, ShiftId, Worker, WorkerId,
};
use std::collections::BTreeSet;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn post(id: &str, role: Option<Role>, period: Period, start: (u32, u32), end: (u32, u32)) -> Post {
    Post {
        id: PostId::new(id),
        title: id.to_owned(),
        required_role: role,
        period,
        start_time: time(start.0, start.1),
        end_time: time(end.0, end.1),
        weekend_only: false,
        shadows: None,
        double_shift: false,
    }
}

fn worker(id: &str, handle: &str, roles: Vec<Role>) -> Worker {
    let mut w = Worker::new(handle, handle).with_roles(roles);
    w.id = WorkerId::new(id);
    w
}

fn history_shift(post_id: &str, d: NaiveDate, period: Period, start: (u32, u32), end: (u32, u32)) -> ShiftAssignment {
    ShiftAssignment {
        id: ShiftId::random(),
        post_id: PostId::new(post_id),
        date: d,
        period,
        start_time: time(start.0, start.1),
        end_time: time(end.0, end.1),
        remark: None,
    }
}

fn no_jitter() -> GenerateOptions {
    GenerateOptions {
        jitter: false,
        ..GenerateOptions::default()
    }
}

// 2026-08-07 is a Friday; the full target week is Friday..Thursday so
// every date shares the same Friday-anchored week key.
fn target_week() -> (NaiveDate, Vec<NaiveDate>) {
    let start = date(2026, 8, 7);
    (start, faction::time::week_dates_from(start))
}

#[test]
fn full_week_is_covered_by_two_workers() {
    let catalog = Catalog::new(vec![post(
        "shift-manager-morning",
        Some(Role::ShiftManager),
        Period::Morning,
        (6, 0),
        (14, 0),
    )])
    .unwrap();
    let engine = Engine::new(catalog);
    let workers = vec![
        worker("w-alice", "alice", vec![Role::ShiftManager]),
        worker("w-bob", "bob", vec![Role::ShiftManager]),
    ];
    let (start, dates) = target_week();

    let report = engine.generate(&workers, start, &dates, &no_jitter());

    assert!(report.success);
    assert!(report.errors.is_empty(), "errors: {:?}", report.errors);
    let total: usize = report.assignments.values().map(Vec::len).sum();
    assert_eq!(total, 7);

    // Weekly cap forces at least two workers over seven slots.
    for shifts in report.assignments.values() {
        assert!(shifts.len() <= 6);
    }
    let used = report
        .assignments
        .values()
        .filter(|s| !s.is_empty())
        .count();
    assert!(used >= 2);

    // Slot exclusivity: one worker per (post, date).
    let mut seen = BTreeSet::new();
    for shifts in report.assignments.values() {
        for s in shifts {
            assert!(seen.insert((s.post_id.clone(), s.date)));
        }
    }
}

#[test]
fn weekly_cap_leaves_seventh_slot_unfilled() {
    let catalog = Catalog::new(vec![post(
        "gatehouse-morning",
        Some(Role::Guard),
        Period::Morning,
        (6, 30),
        (15, 0),
    )])
    .unwrap();
    let engine = Engine::new(catalog);
    let workers = vec![worker("w-solo", "solo", vec![Role::Guard])];
    let (start, dates) = target_week();

    let report = engine.generate(&workers, start, &dates, &no_jitter());

    assert!(report.success);
    assert_eq!(report.assignments[&WorkerId::new("w-solo")].len(), 6);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("gatehouse-morning"));
}

#[test]
fn morning_refusal_only_blocks_the_morning_period() {
    let monday = date(2026, 8, 10);
    let catalog = Catalog::new(vec![
        post(
            "gatehouse-morning",
            Some(Role::Guard),
            Period::Morning,
            (6, 30),
            (15, 0),
        ),
        post(
            "gatehouse-afternoon",
            Some(Role::Guard),
            Period::Afternoon,
            (14, 45),
            (22, 0),
        ),
    ])
    .unwrap();
    let engine = Engine::new(catalog);
    let mut w = worker("w-dana", "dana", vec![Role::Guard]);
    w.availability.push(DayAvailability {
        date: monday,
        statuses: vec![Some(false), Some(true), Some(true)],
    });

    let report = engine.generate(&[w], monday, &[monday], &no_jitter());

    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("gatehouse-morning"));
    let shifts = &report.assignments[&WorkerId::new("w-dana")];
    assert_eq!(shifts.len(), 1);
    assert_eq!(shifts[0].post_id, PostId::new("gatehouse-afternoon"));
}

#[test]
fn seven_hour_gap_across_midnight_is_rejected() {
    let catalog = Catalog::new(vec![post(
        "gatehouse-morning",
        Some(Role::Guard),
        Period::Morning,
        (6, 0),
        (14, 0),
    )])
    .unwrap();
    let engine = Engine::new(catalog);
    let day_n = date(2026, 8, 10);
    let day_after = date(2026, 8, 11);

    let mut w = worker("w-eli", "eli", vec![Role::Guard]);
    w.shifts
        .push(history_shift("evening-watch", day_n, Period::Afternoon, (15, 0), (23, 0)));

    let report = engine.generate(&[w.clone()], day_after, &[day_after], &no_jitter());
    assert_eq!(report.errors.len(), 1);
    assert!(report.assignments[&w.id].is_empty());

    // With the history shift ending one hour earlier the gap is exactly
    // eight hours and the slot is filled.
    w.shifts.clear();
    w.shifts
        .push(history_shift("evening-watch", day_n, Period::Afternoon, (14, 0), (22, 0)));
    let report = engine.generate(&[w.clone()], day_after, &[day_after], &no_jitter());
    assert!(report.errors.is_empty());
    assert_eq!(report.assignments[&w.id].len(), 1);
}

#[test]
fn third_consecutive_night_is_rejected() {
    let catalog = Catalog::new(vec![post(
        "gatehouse-night",
        Some(Role::Guard),
        Period::Night,
        (21, 45),
        (7, 0),
    )])
    .unwrap();
    let engine = Engine::new(catalog);
    let wednesday = date(2026, 8, 12);

    let mut w = worker("w-noa", "noa", vec![Role::Guard]);
    w.shifts.push(history_shift(
        "gatehouse-night",
        date(2026, 8, 10),
        Period::Night,
        (21, 45),
        (7, 0),
    ));
    w.shifts.push(history_shift(
        "gatehouse-night",
        date(2026, 8, 11),
        Period::Night,
        (21, 45),
        (7, 0),
    ));

    let report = engine.generate(&[w.clone()], wednesday, &[wednesday], &no_jitter());
    assert_eq!(report.errors.len(), 1);
    assert!(report.assignments[&w.id].is_empty());

    // A night two days back leaves a gap day: the run stays at two.
    w.shifts.remove(1);
    let report = engine.generate(&[w.clone()], wednesday, &[wednesday], &no_jitter());
    assert!(report.errors.is_empty());
    assert_eq!(report.assignments[&w.id].len(), 1);
}

#[test]
fn night_quota_splits_nights_between_guards() {
    let catalog = Catalog::new(vec![post(
        "gatehouse-night",
        Some(Role::Guard),
        Period::Night,
        (21, 45),
        (7, 0),
    )])
    .unwrap();
    let engine = Engine::new(catalog);
    let workers = vec![
        worker("w-alice", "alice", vec![Role::Guard]),
        worker("w-bob", "bob", vec![Role::Guard]),
    ];
    let monday = date(2026, 8, 10);
    let tuesday = date(2026, 8, 11);

    let report = engine.generate(&workers, monday, &[monday, tuesday], &no_jitter());

    // Two night slots, two eligible guards: the per-role cap is one
    // night each.
    assert!(report.errors.is_empty());
    for id in ["w-alice", "w-bob"] {
        assert_eq!(report.assignments[&WorkerId::new(id)].len(), 1);
    }
}

#[test]
fn manager_slot_blocked_by_rotation_is_relaxed_with_warning() {
    let catalog = Catalog::new(vec![post(
        "shift-manager-night",
        Some(Role::ShiftManager),
        Period::Night,
        (21, 30),
        (6, 30),
    )])
    .unwrap();
    let engine = Engine::new(catalog);
    let workers = vec![worker("w-omer", "omer", vec![Role::ShiftManager])];
    let monday = date(2026, 8, 10);
    let dates: Vec<NaiveDate> = (0..4).map(|i| date(2026, 8, 10 + i)).collect();

    let report = engine.generate(&workers, monday, &dates, &no_jitter());

    // The third consecutive night is refused by the main loop, then
    // covered by the fallback pass for the manager role.
    assert!(report.errors.is_empty(), "errors: {:?}", report.errors);
    let shifts = &report.assignments[&WorkerId::new("w-omer")];
    assert_eq!(shifts.len(), 4);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("relaxed assignment"));
    assert!(shifts.iter().any(|s| s.remark.is_some()));
}

#[test]
fn relaxation_never_runs_for_guard_slots() {
    let catalog = Catalog::new(vec![post(
        "gatehouse-night",
        Some(Role::Guard),
        Period::Night,
        (21, 45),
        (7, 0),
    )])
    .unwrap();
    let engine = Engine::new(catalog);
    let workers = vec![worker("w-gil", "gil", vec![Role::Guard])];
    let monday = date(2026, 8, 10);
    let dates: Vec<NaiveDate> = (0..4).map(|i| date(2026, 8, 10 + i)).collect();

    let report = engine.generate(&workers, monday, &dates, &no_jitter());

    // Same shape as the manager scenario, but the unfilled guard slot
    // stays an error: no fallback below the top-priority role.
    assert_eq!(report.errors.len(), 1);
    assert!(report.warnings.is_empty());
    assert_eq!(report.assignments[&WorkerId::new("w-gil")].len(), 3);
}

#[test]
fn fourth_sabbath_in_a_row_goes_through_fallback_and_is_audited() {
    let catalog = Catalog::new(vec![post(
        "shift-manager-morning",
        Some(Role::ShiftManager),
        Period::Morning,
        (6, 0),
        (14, 0),
    )])
    .unwrap();
    let engine = Engine::new(catalog);
    let friday = date(2026, 8, 7);

    let mut w = worker("w-ron", "ron", vec![Role::ShiftManager]);
    for prev in [date(2026, 7, 17), date(2026, 7, 24), date(2026, 7, 31)] {
        w.shifts.push(history_shift(
            "shift-manager-morning",
            prev,
            Period::Morning,
            (6, 0),
            (14, 0),
        ));
    }

    let report = engine.generate(&[w.clone()], friday, &[friday], &no_jitter());

    assert!(report.errors.is_empty());
    assert_eq!(report.assignments[&w.id].len(), 1);
    assert!(report
        .warnings
        .iter()
        .any(|msg| msg.contains("relaxed assignment")));
    assert!(report
        .warnings
        .iter()
        .any(|msg| msg.contains("Sabbath four weeks in a row")));
}

#[test]
fn seeded_runs_share_the_same_signature() {
    let catalog = Catalog::new(vec![
        post("gatehouse-morning", Some(Role::Guard), Period::Morning, (6, 30), (15, 0)),
        post("gatehouse-afternoon", Some(Role::Guard), Period::Afternoon, (14, 45), (22, 0)),
        post("gatehouse-night", Some(Role::Guard), Period::Night, (21, 45), (7, 0)),
    ])
    .unwrap();
    let engine = Engine::new(catalog);
    let workers = vec![
        worker("w-alice", "alice", vec![Role::Guard]),
        worker("w-bob", "bob", vec![Role::Guard]),
        worker("w-carol", "carol", vec![Role::Guard]),
        worker("w-dave", "dave", vec![Role::Guard]),
    ];
    let (start, dates) = target_week();
    let opts = GenerateOptions {
        seed: Some(1234),
        ..GenerateOptions::default()
    };

    let first = engine.generate(&workers, start, &dates, &opts);
    let second = engine.generate(&workers, start, &dates, &opts);

    assert_eq!(assignment_signature(&first), assignment_signature(&second));
}

#[test]
fn self_check_stays_silent_with_an_explicit_seed() {
    let catalog = Catalog::new(vec![post(
        "gatehouse-morning",
        Some(Role::Guard),
        Period::Morning,
        (6, 30),
        (15, 0),
    )])
    .unwrap();
    let engine = Engine::new(catalog);
    let workers = vec![
        worker("w-alice", "alice", vec![Role::Guard]),
        worker("w-bob", "bob", vec![Role::Guard]),
    ];
    let (start, dates) = target_week();
    let opts = GenerateOptions {
        seed: Some(7),
        self_check: true,
        ..GenerateOptions::default()
    };

    let report = engine.generate(&workers, start, &dates, &opts);
    assert!(!report
        .warnings
        .iter()
        .any(|msg| msg.contains("consistency check failed")));
}

#[test]
fn debug_sink_collects_assignment_and_unfilled_events() {
    let monday = date(2026, 8, 10);
    let catalog = Catalog::new(vec![
        post("gatehouse-morning", Some(Role::Guard), Period::Morning, (6, 30), (15, 0)),
        post("shift-manager-morning", Some(Role::ShiftManager), Period::Morning, (6, 0), (14, 0)),
    ])
    .unwrap();
    let engine = Engine::new(catalog);
    let workers = vec![worker("w-alice", "alice", vec![Role::Guard])];
    let opts = GenerateOptions {
        debug: true,
        jitter: false,
        ..GenerateOptions::default()
    };

    let mut sink = MemorySink::default();
    let report = engine.generate_with_sink(&workers, monday, &[monday], &opts, &mut sink);

    // No manager in the team: the manager slot stays unfilled even after
    // the fallback pass (no eligible candidate).
    assert_eq!(report.errors.len(), 1);
    assert!(sink
        .events
        .iter()
        .any(|e| matches!(e, DiagEvent::Assigned { relaxed: false, .. })));
    assert!(sink
        .events
        .iter()
        .any(|e| matches!(e, DiagEvent::Unfilled { .. })));
    assert!(sink
        .events
        .iter()
        .any(|e| matches!(e, DiagEvent::Scored { .. })));
}

#[test]
fn force_fresh_ignores_the_history_snapshot() {
    let catalog = Catalog::new(vec![post(
        "gatehouse-morning",
        Some(Role::Guard),
        Period::Morning,
        (6, 30),
        (15, 0),
    )])
    .unwrap();
    let engine = Engine::new(catalog);
    let (start, dates) = target_week();

    // Six historical shifts in the target week saturate the cap.
    let mut w = worker("w-yael", "yael", vec![Role::Guard]);
    for d in dates.iter().take(6) {
        w.shifts
            .push(history_shift("gatehouse-morning", *d, Period::Morning, (6, 30), (15, 0)));
    }

    let blocked = engine.generate(&[w.clone()], start, &dates, &no_jitter());
    assert_eq!(blocked.errors.len(), 7);
    assert!(!blocked.success);

    let opts = GenerateOptions {
        force_fresh: true,
        jitter: false,
        ..GenerateOptions::default()
    };
    let fresh = engine.generate(&[w.clone()], start, &dates, &opts);
    assert_eq!(fresh.assignments[&w.id].len(), 6);
    assert_eq!(fresh.errors.len(), 1);
}
