use crate::{
    clock::{Clock, VirtualClock},
    config::{ConfigError, MachineConfig},
    engine::{generate_outcomes, stop_target, SpinOutcome, REEL_COUNT},
    reel::{Reel, ReelState},
    rng::RandomSource,
    schedule::{StopCommand, StopSchedule},
    session::Session,
    symbols::Symbol,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Upper bound on frames [`SpinController::run_cycle`] will drive before giving up.
pub const MAX_CYCLE_FRAMES: usize = 100_000;

/// Emitted once per completed spin cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinResult {
    pub symbols: [Symbol; REEL_COUNT],
    pub double_flags: [bool; REEL_COUNT],
    pub payout: u32,
    pub label: String,
    pub balance: i64,
    pub rotations: [f64; REEL_COUNT],
    pub stop_deadlines_ms: [u64; REEL_COUNT],
}

impl SpinResult {
    pub fn symbol_indices(&self) -> [u8; REEL_COUNT] {
        self.symbols.map(Symbol::to_index)
    }

    pub fn is_win(&self) -> bool {
        self.payout > 0
    }
}

type ResultListener = Box<dyn FnMut(&SpinResult) + Send>;

struct Cycle {
    outcomes: [SpinOutcome; REEL_COUNT],
    stop_deadlines_ms: [u64; REEL_COUNT],
}

/// Drives three reels through spin cycles and settles each cycle against the paytable.
///
/// At most one cycle is active; a spin request during a cycle is ignored.
pub struct SpinController<R, C> {
    config: MachineConfig,
    rng: R,
    clock: C,
    reels: [Reel; REEL_COUNT],
    schedule: StopSchedule,
    session: Session,
    cycle: Option<Cycle>,
    listeners: Vec<ResultListener>,
}

impl<R: RandomSource, C: Clock> SpinController<R, C> {
    pub fn new(config: MachineConfig, rng: R, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let session = Session::new(config.starting_balance);
        Ok(Self {
            config,
            rng,
            clock,
            reels: Default::default(),
            schedule: StopSchedule::default(),
            session,
            cycle: None,
            listeners: Vec::new(),
        })
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn is_cycle_active(&self) -> bool {
        self.cycle.is_some()
    }

    /// Targets of the active cycle, if any.
    pub fn outcomes(&self) -> Option<&[SpinOutcome; REEL_COUNT]> {
        self.cycle.as_ref().map(|c| &c.outcomes)
    }

    pub fn pending_stops(&self) -> &[StopCommand] {
        self.schedule.pending()
    }

    /// Panics if `reel >= REEL_COUNT`.
    pub fn rotation(&self, reel: usize) -> f64 {
        self.reels[reel].rotation()
    }

    pub fn rotations(&self) -> [f64; REEL_COUNT] {
        std::array::from_fn(|i| self.reels[i].rotation())
    }

    /// Panics if `reel >= REEL_COUNT`.
    pub fn reel_state(&self, reel: usize) -> ReelState {
        self.reels[reel].state()
    }

    pub fn on_result<F>(&mut self, listener: F)
    where
        F: FnMut(&SpinResult) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Starts a cycle. Returns false, changing nothing, while a cycle is already running.
    pub fn request_spin(&mut self) -> bool {
        if self.cycle.is_some() {
            debug!("spin requested while a cycle is active; ignoring");
            return false;
        }
        let now = self.clock.now_ms();
        self.session.charge(self.config.spin_cost);
        let outcomes = generate_outcomes(&mut self.rng);
        for reel in &mut self.reels {
            reel.start();
        }
        self.schedule.clear();
        let stop_deadlines_ms: [u64; REEL_COUNT] =
            std::array::from_fn(|reel| now + self.config.stop_delay_ms(reel));
        for (reel, &deadline_ms) in stop_deadlines_ms.iter().enumerate() {
            self.schedule.push(StopCommand { reel, deadline_ms });
        }
        info!(
            balance = self.session.balance(),
            started_at_ms = now,
            "spin started"
        );
        self.cycle = Some(Cycle {
            outcomes,
            stop_deadlines_ms,
        });
        true
    }

    /// One animation frame: fires due stop commands, advances the reels and
    /// settles the cycle once every reel has reached its target.
    pub fn tick(&mut self) -> Option<SpinResult> {
        let outcomes = self.cycle.as_ref()?.outcomes;
        let now = self.clock.now_ms();
        for cmd in self.schedule.take_due(now) {
            let reel = &mut self.reels[cmd.reel];
            let target = stop_target(reel.rotation(), &outcomes[cmd.reel], &self.config);
            debug!(
                reel = cmd.reel,
                deadline_ms = cmd.deadline_ms,
                now_ms = now,
                rotation = reel.rotation(),
                stop_at = target,
                "stop command"
            );
            reel.arm(target);
        }
        for reel in &mut self.reels {
            reel.advance(self.config.speed);
        }
        if self.schedule.is_empty() && self.reels.iter().all(Reel::is_at_rest) {
            Some(self.settle())
        } else {
            None
        }
    }

    fn settle(&mut self) -> SpinResult {
        for reel in &mut self.reels {
            reel.normalize();
        }
        let Cycle {
            outcomes,
            stop_deadlines_ms,
        } = match self.cycle.take() {
            Some(cycle) => cycle,
            None => unreachable!("settle without an active cycle"),
        };
        let symbols = outcomes.map(|o| o.symbol);
        let double_flags = outcomes.map(|o| o.double);
        let unanimous = double_flags.iter().all(|&d| d == double_flags[0]);
        let payout = if unanimous {
            self.config.paytable.evaluate(symbols, double_flags[0])
        } else {
            0
        };
        let label = if payout > 0 {
            self.session.credit(payout);
            format!("You won {payout} coins!")
        } else {
            "You won nothing".to_string()
        };
        self.session.set_label(label.clone());

        let result = SpinResult {
            symbols,
            double_flags,
            payout,
            label,
            balance: self.session.balance(),
            rotations: self.rotations(),
            stop_deadlines_ms,
        };
        info!(
            symbols = ?result.symbol_indices(),
            doubles = ?double_flags,
            payout,
            balance = result.balance,
            "spin settled"
        );
        for listener in &mut self.listeners {
            listener(&result);
        }
        result
    }
}

impl<R: RandomSource> SpinController<R, VirtualClock> {
    /// Requests a spin and drives `frame_ms` frames until it settles.
    ///
    /// Also finishes a cycle that is already running. Returns `None` if the
    /// cycle does not settle within [`MAX_CYCLE_FRAMES`].
    pub fn run_cycle(&mut self, frame_ms: u64) -> Option<SpinResult> {
        self.request_spin();
        for _ in 0..MAX_CYCLE_FRAMES {
            self.clock.advance(frame_ms);
            if let Some(result) = self.tick() {
                return Some(result);
            }
        }
        None
    }
}
