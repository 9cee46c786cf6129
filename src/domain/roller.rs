/// One animated character cell of the board.
///
/// A roller shows a single face. Given a new target it flips forward
/// through the wheel one face at a time until the target comes up, then
/// holds through a short settle pause before reporting idle. Every delay
/// is sampled from a jitter range so neighboring cells never move in
/// lockstep; the staggered starts are what give a split-flap board its
/// ripple.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::domain::alphabet::Alphabet;

/// Delay ranges, in milliseconds, for flap scheduling. Ranges are
/// inclusive and sampled fresh for every flap.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FlapTiming {
    /// Delay before the first flap after a retarget.
    pub start_ms: (u64, u64),
    /// Delay between consecutive flaps.
    pub step_ms: (u64, u64),
    /// Pause after the last flap before the cell reports idle.
    pub settle_ms: (u64, u64),
}

impl Default for FlapTiming {
    fn default() -> Self {
        FlapTiming {
            start_ms: (0, 60),
            step_ms: (35, 90),
            settle_ms: (40, 100),
        }
    }
}

impl FlapTiming {
    fn sample(range: (u64, u64), rng: &mut impl Rng) -> Duration {
        let (lo, hi) = if range.0 <= range.1 { range } else { (range.1, range.0) };
        Duration::from_millis(rng.random_range(lo..=hi))
    }

    fn start_delay(&self, rng: &mut impl Rng) -> Duration {
        Self::sample(self.start_ms, rng)
    }

    fn step_delay(&self, rng: &mut impl Rng) -> Duration {
        Self::sample(self.step_ms, rng)
    }

    fn settle_delay(&self, rng: &mut impl Rng) -> Duration {
        Self::sample(self.settle_ms, rng)
    }
}

/// Scheduling phase of a cell. Rescheduling overwrites the pending `due`,
/// which is all the cancellation this design needs: there are no detached
/// timers that could fire late.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Phase {
    /// At rest on the target face.
    Idle,
    /// Mid-animation; the next flap fires once `due` passes.
    Flipping { due: Instant },
    /// All flaps done; the cell stays animating until `due` passes.
    Settling { due: Instant },
}

/// What a single `tick` call did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tick {
    /// Nothing was due.
    Idle,
    /// Advanced one face. `click` is set on every other flap.
    Flap { click: bool },
    /// The settle pause elapsed; the cell is at rest again.
    Settled,
}

pub struct Roller {
    current: char,
    target: char,
    queue: VecDeque<char>,
    phase: Phase,
    flaps_done: u32,
    timing: FlapTiming,
}

impl Roller {
    /// A fresh cell at rest on the wheel's blank face.
    pub fn new(wheel: &Alphabet, timing: FlapTiming) -> Self {
        Roller {
            current: wheel.blank(),
            target: wheel.blank(),
            queue: VecDeque::new(),
            phase: Phase::Idle,
            flaps_done: 0,
            timing,
        }
    }

    /// Face currently shown.
    pub fn current(&self) -> char {
        self.current
    }

    /// Face the cell is rolling toward. Equal to `current` when at rest.
    pub fn target(&self) -> char {
        self.target
    }

    /// True from retarget until the settle pause after the last flap ends.
    pub fn is_animating(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Point the cell at a new value.
    ///
    /// The value is coerced onto the wheel first. Retargeting to the face
    /// already being rolled toward is a no-op; an in-flight animation is
    /// never restarted. Any other value rebuilds the flap queue from the
    /// face currently shown (not from the superseded target), drops
    /// whatever was scheduled, and lands the first flap after a fresh
    /// start delay. A redirect onto the very face the cell is showing has
    /// an empty queue and skips straight to the settle pause.
    pub fn set_target(&mut self, wheel: &Alphabet, value: char, now: Instant, rng: &mut impl Rng) {
        let value = wheel.coerce(value);
        if value == self.target {
            return;
        }
        self.queue = wheel.steps_between(self.current, value);
        self.target = value;
        self.flaps_done = 0;
        self.phase = if self.queue.is_empty() {
            Phase::Settling { due: now + self.timing.settle_delay(rng) }
        } else {
            Phase::Flipping { due: now + self.timing.start_delay(rng) }
        };
    }

    /// Advance the cell's schedule. Fires at most one flap per call, so
    /// queued faces always appear in order and a retarget between calls
    /// takes effect before the next unfired flap.
    pub fn tick(&mut self, now: Instant, rng: &mut impl Rng) -> Tick {
        match self.phase {
            Phase::Idle => Tick::Idle,
            Phase::Flipping { due } => {
                if now < due {
                    return Tick::Idle;
                }
                let next = match self.queue.pop_front() {
                    Some(face) => face,
                    None => {
                        // unreachable: Flipping always holds queued faces
                        self.phase = Phase::Idle;
                        return Tick::Idle;
                    }
                };
                self.current = next;
                let click = self.flaps_done % 2 == 0;
                self.flaps_done += 1;
                self.phase = if self.queue.is_empty() {
                    Phase::Settling { due: now + self.timing.settle_delay(rng) }
                } else {
                    Phase::Flipping { due: now + self.timing.step_delay(rng) }
                };
                Tick::Flap { click }
            }
            Phase::Settling { due } => {
                if now < due {
                    return Tick::Idle;
                }
                self.phase = Phase::Idle;
                Tick::Settled
            }
        }
    }
}
