use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::f64::consts::{PI, TAU};
use std::sync::{Arc, Mutex};
use tsunami_evac::adapters::outbound::init_noop_logger;
use tsunami_evac::common::PlanarCoord;
use tsunami_evac::domains::logger::{DomainLogger, DynLogger};
use tsunami_evac::domains::simulation::*;

/// Replays fixed (heading, length) draws.
struct ScriptedMoves {
    moves: VecDeque<(f64, f64)>,
    length: f64,
}

impl ScriptedMoves {
    fn new(moves: &[(f64, f64)]) -> Self {
        Self { moves: moves.iter().copied().collect(), length: 0.0 }
    }
}

impl MoveSampler for ScriptedMoves {
    fn heading(&mut self, _alert: AlertMode) -> f64 {
        let (heading, length) = self.moves.pop_front().expect("script exhausted");
        self.length = length;
        heading
    }

    fn step_length(&mut self) -> f64 {
        self.length
    }
}

struct BridgeCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl DomainLogger for BridgeCapture {
    fn debug(&self, _msg: &str) {}
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

fn engine() -> StepEngine {
    StepEngine::new(1.0, 1.0, StepLimits::default(), init_noop_logger())
}

fn state_with(positions: &[(f64, f64)]) -> SimulationState {
    let mut state = SimulationState::new();
    for (x, y) in positions {
        state.agents.add_person(PlanarCoord::new(*x, *y));
    }
    state
}

fn position(state: &SimulationState, id: usize) -> PlanarCoord {
    state.agents.position_of(PersonId(id)).unwrap()
}

#[test]
fn test_agent_store_ids_follow_insertion_and_reset_on_clear() {
    let mut store = AgentStore::new();
    assert_eq!(store.add_person(PlanarCoord::new(0.0, 0.0)), PersonId(0));
    assert_eq!(store.add_person(PlanarCoord::new(5.0, 0.0)), PersonId(1));

    store.set_position(PersonId(1), PlanarCoord::new(6.0, 1.0)).unwrap();
    let all: Vec<_> = store.all_positions().collect();
    assert_eq!(all, vec![
        (PersonId(0), PlanarCoord::new(0.0, 0.0)),
        (PersonId(1), PlanarCoord::new(6.0, 1.0)),
    ]);

    assert!(store.position_of(PersonId(2)).is_err());
    assert!(store.set_position(PersonId(2), PlanarCoord::new(0.0, 0.0)).is_err());

    store.clear();
    assert!(store.is_empty());
    assert_eq!(store.add_person(PlanarCoord::new(1.0, 1.0)), PersonId(0));
}

#[test]
fn test_alert_toggles() {
    let mut state = SimulationState::new();
    assert!(!state.alert.is_on());
    assert!(state.toggle_alert().is_on());
    assert!(!state.toggle_alert().is_on());
}

#[test]
fn test_lone_person_moves_by_heading_and_length() {
    let mut state = state_with(&[(10.0, 10.0)]);
    let mut moves = ScriptedMoves::new(&[(PI / 2.0, 0.5)]);

    let report = engine().tick(&mut state, &mut moves).unwrap();

    // The y axis is flipped: a heading of π/2 moves toward smaller y.
    let p = position(&state, 0);
    assert!((p.x - 10.0).abs() < 1e-12);
    assert!((p.y - 9.5).abs() < 1e-12);
    assert_eq!(report.moved(), 1);
    assert_eq!(report.outcomes[0].1.halvings(), 0);
}

#[test]
fn test_step_toward_neighbour_at_contact_distance_halves() {
    // Exactly 2 × radius apart: allowed, but any step toward each other is not.
    let mut state = state_with(&[(0.0, 0.0), (2.0, 0.0)]);
    let mut moves = ScriptedMoves::new(&[
        (0.0, 0.5), // person 0 toward person 1: halved 4 times, still colliding
        (PI, 0.5),  // person 0 retries away from person 1
        (0.0, 0.5), // person 1 moves away
    ]);

    let report = engine().tick(&mut state, &mut moves).unwrap();

    match report.outcomes[0].1 {
        StepOutcome::Moved { attempt, halvings, to } => {
            assert_eq!(attempt, 2);
            assert_eq!(halvings, 4);
            assert!((to.x + 0.5).abs() < 1e-12);
        }
        other => panic!("expected Moved, got {:?}", other),
    }
    assert!(position(&state, 0).distance(&position(&state, 1)) >= 2.0);
}

#[test]
fn test_halving_resolves_a_near_collision() {
    let mut state = state_with(&[(0.0, 0.0), (2.5, 0.0)]);
    let mut moves = ScriptedMoves::new(&[(0.0, 0.8), (0.0, 0.1)]);

    let report = engine().tick(&mut state, &mut moves).unwrap();

    assert_eq!(
        report.outcomes[0].1,
        StepOutcome::Moved { to: PlanarCoord::new(0.4, 0.0), attempt: 1, halvings: 1 }
    );
}

#[test]
fn test_later_people_see_positions_committed_earlier_in_the_tick() {
    let mut state = state_with(&[(0.0, 0.0), (3.5, 0.0)]);
    let mut moves = ScriptedMoves::new(&[(0.0, 0.9), (PI, 0.9)]);

    let report = engine().tick(&mut state, &mut moves).unwrap();

    // Against person 0's old position (0,0) the candidate (2.6, 0) would be
    // clear; against the committed (0.9, 0) it needs one halving.
    assert_eq!(report.outcomes[0].1.halvings(), 0);
    assert_eq!(report.outcomes[1].1.halvings(), 1);
    let p1 = position(&state, 1);
    assert!((p1.x - 3.05).abs() < 1e-12);
}

#[test]
fn test_halved_candidate_is_rechecked_against_earlier_neighbours() {
    // Full step (1, 0) clears person 1; halving against person 2 gives
    // (0.5, 0), which is 1.95 from person 1 and must not be committed.
    let mut state = state_with(&[(0.0, 0.0), (0.5, 1.95), (2.9, 0.0)]);
    let mut sampler = ScriptedMoves::new(&[(0.0, 1.0), (PI, 0.5)]);

    let outcome = engine()
        .step_person(&mut state.agents, PersonId(0), AlertMode::OFF, &mut sampler)
        .unwrap();

    match outcome {
        StepOutcome::Moved { to, attempt, halvings } => {
            assert_eq!(attempt, 2);
            assert_eq!(halvings, 1);
            assert!((to.x + 0.5).abs() < 1e-12);
        }
        other => panic!("expected Moved on the second attempt, got {:?}", other),
    }
    let p0 = position(&state, 0);
    assert_ne!(p0, PlanarCoord::new(0.5, 0.0));
    assert!(p0.distance(&position(&state, 1)) >= 2.0);
    assert!(p0.distance(&position(&state, 2)) >= 2.0);
}

#[test]
fn test_boxed_in_person_gives_up_and_stays_put() {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let logger: DynLogger = Arc::new(BridgeCapture { messages: messages.clone() });
    let engine = StepEngine::new(1.0, 1.0, StepLimits::default(), logger);

    // Neighbours at contact distance on all four sides.
    let mut state = state_with(&[(0.0, 0.0), (2.0, 0.0), (-2.0, 0.0), (0.0, 2.0), (0.0, -2.0)]);
    let mut sampler = ScriptedMoves::new(&[(0.0, 0.9), (PI / 2.0, 0.9), (PI, 0.9), (3.0 * PI / 2.0, 0.9)]);

    let outcome = engine
        .step_person(&mut state.agents, PersonId(0), AlertMode::OFF, &mut sampler)
        .unwrap();

    assert!(matches!(outcome, StepOutcome::GaveUp { attempts: 4, .. }));
    assert_eq!(position(&state, 0), PlanarCoord::new(0.0, 0.0));
    assert!(messages.lock().unwrap().iter().any(|m| m.starts_with("WARN:") && m.contains("giving up on person 0")));
}

#[test]
fn test_attempt_limit_is_configurable() {
    let engine = StepEngine::new(1.0, 1.0, StepLimits { max_halvings: 4, max_attempts: 1 }, init_noop_logger());
    let mut state = state_with(&[(0.0, 0.0), (2.0, 0.0)]);
    let mut sampler = ScriptedMoves::new(&[(0.0, 0.5)]);

    let outcome = engine
        .step_person(&mut state.agents, PersonId(0), AlertMode::OFF, &mut sampler)
        .unwrap();
    assert_eq!(outcome, StepOutcome::GaveUp { attempts: 1, halvings: 4 });
}

#[test]
fn test_empty_state_ticks_to_empty_report() {
    let mut state = SimulationState::new();
    let mut sampler = RngMoveSampler::new(StdRng::seed_from_u64(1));
    let report = engine().tick(&mut state, &mut sampler).unwrap();
    assert!(report.outcomes.is_empty());
}

#[test]
fn test_alert_headings_stay_in_lower_half_circle() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10_000 {
        let heading = sample_heading(&mut rng, AlertMode::ON);
        assert!((PI..TAU).contains(&heading), "heading {}", heading);
    }
}

#[test]
fn test_normal_headings_cover_the_full_circle() {
    let mut rng = StdRng::seed_from_u64(42);
    let n = 10_000;
    let (mut sum_cos, mut sum_sin, mut upper) = (0.0, 0.0, 0);
    for _ in 0..n {
        let heading = sample_heading(&mut rng, AlertMode::OFF);
        assert!((0.0..TAU).contains(&heading));
        sum_cos += heading.cos();
        sum_sin += heading.sin();
        if heading < PI {
            upper += 1;
        }
    }
    // Mean resultant length of a uniform circular sample is ~1/sqrt(n).
    let resultant = (sum_cos * sum_cos + sum_sin * sum_sin).sqrt() / n as f64;
    assert!(resultant < 0.05, "mean resultant length {}", resultant);
    assert!(upper > 4_500 && upper < 5_500, "upper half count {}", upper);
}

#[test]
fn test_alert_mode_never_decreases_y_of_a_lone_person() {
    let mut state = state_with(&[(0.0, 0.0)]);
    state.toggle_alert();
    let mut sampler = RngMoveSampler::new(StdRng::seed_from_u64(3));
    let engine = engine();

    for _ in 0..200 {
        let before = position(&state, 0);
        engine.tick(&mut state, &mut sampler).unwrap();
        assert!(position(&state, 0).y >= before.y);
    }
}

proptest! {
    #[test]
    fn property_no_overlap_is_preserved_across_ticks(
        cols in 1_usize..6,
        rows in 1_usize..6,
        spacing in 2.01_f64..3.0,
        seed in any::<u64>(),
        alert in any::<bool>(),
    ) {
        let mut state = SimulationState::new();
        for r in 0..rows {
            for c in 0..cols {
                state.agents.add_person(PlanarCoord::new(c as f64 * spacing, r as f64 * spacing));
            }
        }
        if alert {
            state.toggle_alert();
        }
        let engine = engine();
        let mut sampler = RngMoveSampler::new(StdRng::seed_from_u64(seed));

        for _ in 0..10 {
            engine.tick(&mut state, &mut sampler).unwrap();
            let positions: Vec<_> = state.agents.all_positions().map(|(_, p)| p).collect();
            for i in 0..positions.len() {
                for j in (i + 1)..positions.len() {
                    prop_assert!(positions[i].distance(&positions[j]) >= engine.min_separation());
                }
            }
        }
    }
}
