use std::f64::consts::TAU;
use std::sync::{Arc, Mutex};

use reelspin_core::{
    evaluate, landed_symbol, Clock, MachineConfig, ProvablyFairRng, RandomSource, ReelState,
    SequenceRandom, SpinController, SpinResult, Symbol, VirtualClock, REEL_COUNT,
};

const FRAME_MS: u64 = 16;

fn sequenced(draws: Vec<f64>) -> (SpinController<SequenceRandom, VirtualClock>, VirtualClock) {
    let clock = VirtualClock::new();
    let machine = SpinController::new(
        MachineConfig::default(),
        SequenceRandom::new(draws),
        clock.clone(),
    )
    .unwrap();
    (machine, clock)
}

fn fair(nonce: u64) -> SpinController<ProvablyFairRng, VirtualClock> {
    SpinController::new(
        MachineConfig::default(),
        ProvablyFairRng::new("server", "client", nonce),
        VirtualClock::new(),
    )
    .unwrap()
}

fn recorder<R: RandomSource, C: Clock>(
    machine: &mut SpinController<R, C>,
) -> Arc<Mutex<Vec<SpinResult>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    machine.on_result(move |r| sink.lock().unwrap().push(r.clone()));
    seen
}

#[test]
fn rng_repeatable() {
    let mut rng1 = ProvablyFairRng::new("s", "c", 42);
    let mut rng2 = ProvablyFairRng::new("s", "c", 42);
    assert_eq!(rng1.next_floats(10), rng2.next_floats(10));
}

#[test]
fn same_draws_same_cycles() {
    let mut a = fair(1);
    let mut b = fair(1);
    for _ in 0..5 {
        let ra = a.run_cycle(FRAME_MS).unwrap();
        let rb = b.run_cycle(FRAME_MS).unwrap();
        assert_eq!(ra, rb);
    }
    assert_eq!(a.session(), b.session());
}

#[test]
fn evaluator_ignores_reel_order() {
    assert_eq!(evaluate([1, 0, 1], false), evaluate([1, 1, 0], false));
    assert_eq!(evaluate([1, 0, 1], false), 75);
}

#[test]
fn evaluator_modes_do_not_leak() {
    assert_eq!(evaluate([0, 0, 0], false), 150);
    assert_eq!(evaluate([0, 0, 0], true), 4000);
    assert_eq!(evaluate([1, 2, 3], false), 0);
    assert_eq!(evaluate([1, 2, 3], true), 0);
}

#[test]
fn mixed_double_flags_never_pay() {
    // three cherries, mode draws true / false / true
    let (mut machine, _clock) = sequenced(vec![0.9, 0.3, 0.1, 0.3, 0.9, 0.3]);
    let result = machine.run_cycle(FRAME_MS).unwrap();
    assert_eq!(result.symbols, [Symbol::Cherry; 3]);
    assert_eq!(result.double_flags, [true, false, true]);
    assert_eq!(result.payout, 0);
    assert_eq!(result.label, "You won nothing");
    assert_eq!(result.balance, 49_999);
}

#[test]
fn unanimous_double_pays_double_column() {
    let (mut machine, _clock) = sequenced(vec![0.9, 0.3]);
    let result = machine.run_cycle(FRAME_MS).unwrap();
    assert_eq!(result.double_flags, [true; 3]);
    assert_eq!(result.payout, 2000);
    assert_eq!(result.label, "You won 2000 coins!");
    assert_eq!(result.balance, 50_000 - 1 + 2000);
    assert_eq!(machine.session().last_label(), "You won 2000 coins!");
}

#[test]
fn overlapping_request_is_ignored() {
    let (mut machine, clock) = sequenced(vec![0.1, 0.0, 0.2, 0.05, 0.3, 0.1, 0.6, 0.7]);
    let seen = recorder(&mut machine);

    assert!(machine.request_spin());
    let first = *machine.outcomes().unwrap();
    clock.advance(100);
    machine.tick();
    assert!(!machine.request_spin());
    assert_eq!(machine.session().balance(), 49_999);
    assert_eq!(machine.rng().consumed(), REEL_COUNT * 2);
    assert_eq!(machine.outcomes(), Some(&first));

    let result = machine.run_cycle(FRAME_MS).unwrap();
    assert_eq!(result.symbols, first.map(|o| o.symbol));
    assert_eq!(result.symbols, [Symbol::Seven; 3]);
    assert_eq!(result.payout, 150);

    for _ in 0..500 {
        clock.advance(FRAME_MS);
        assert!(machine.tick().is_none());
    }
    assert_eq!(seen.lock().unwrap().len(), 1);
    assert_eq!(seen.lock().unwrap()[0], result);
}

#[test]
fn rotations_end_normalized_on_the_drawn_symbol() {
    let mut machine = fair(3);
    for _ in 0..20 {
        let result = machine.run_cycle(FRAME_MS).unwrap();
        for reel in 0..REEL_COUNT {
            let rotation = result.rotations[reel];
            assert!((0.0..TAU).contains(&rotation));
            assert_eq!(machine.rotation(reel), rotation);
            assert_eq!(machine.reel_state(reel), ReelState::Idle);
            let back = machine.config().scroll_back(result.double_flags[reel]);
            assert_eq!(landed_symbol(rotation, back), result.symbols[reel]);
        }
    }
}

#[test]
fn rotation_never_runs_backwards_during_a_cycle() {
    let clock = VirtualClock::new();
    let mut machine = SpinController::new(
        MachineConfig::default(),
        ProvablyFairRng::new("server", "client", 9),
        clock.clone(),
    )
    .unwrap();
    for _ in 0..3 {
        assert!(machine.request_spin());
        let mut last = machine.rotations();
        loop {
            clock.advance(FRAME_MS);
            if machine.tick().is_some() {
                break;
            }
            let now = machine.rotations();
            for reel in 0..REEL_COUNT {
                assert!(now[reel] >= last[reel]);
            }
            last = now;
        }
    }
}

#[test]
fn balance_tracks_cost_and_payout() {
    for nonce in 0..30 {
        let mut machine = fair(nonce);
        let result = machine.run_cycle(FRAME_MS).unwrap();
        assert_eq!(result.balance, 50_000 - 1 + i64::from(result.payout));
        assert_eq!(machine.session().balance(), result.balance);
    }
}

#[test]
fn stops_are_staggered_by_half_a_second() {
    let clock = VirtualClock::new();
    let mut machine = SpinController::new(
        MachineConfig::default(),
        ProvablyFairRng::new("server", "client", 0),
        clock.clone(),
    )
    .unwrap();
    for _ in 0..4 {
        let started = clock.now_ms();
        let result = machine.run_cycle(FRAME_MS).unwrap();
        let d = result.stop_deadlines_ms;
        assert_eq!(d[0], started + 2000);
        assert_eq!(d[1] - d[0], 500);
        assert_eq!(d[2] - d[1], 500);
        // settling cannot precede the last stop
        assert!(clock.now_ms() >= d[2]);
    }
}

#[test]
fn rtp_simulation_smoke() {
    let mut machine = fair(0);
    let mut total_payout = 0u64;
    let spins = 300;
    for _ in 0..spins {
        total_payout += u64::from(machine.run_cycle(FRAME_MS).unwrap().payout);
    }
    assert_eq!(
        machine.session().balance(),
        50_000 - spins as i64 + total_payout as i64
    );
}
