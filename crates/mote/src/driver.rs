//! Samples the wall clock and turns digit changes into transitions.

use std::time::Duration;

use chrono::{Local, NaiveTime};
use mote_core::{DIGIT_COUNT, DisplayedTime, TimeFormat};
use mote_stage::Group;

use crate::animator::{Animator, HIDE_DURATION};
use crate::assembly::{Assembly, back_slot, front_slot};

/// How often the clock is sampled.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Delay before the separators appear.
pub const SEPARATOR_DELAY: Duration = Duration::from_millis(200);

/// Source of wall-clock time.
pub trait TimeSource {
    fn now(&self) -> NaiveTime;
}

/// The local system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Which mesh of a digit pair is showing, and whether a swap is underway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairState {
    ShowingFront,
    /// Front is falling; back appears showing `digit` once `show_in` runs
    /// out.
    TransitioningToBack { show_in: Duration, digit: u8 },
    ShowingBack,
    /// Back is falling; front appears showing `digit` once `show_in` runs
    /// out.
    TransitioningToFront { show_in: Duration, digit: u8 },
}

impl PairState {
    pub fn is_transitioning(self) -> bool {
        matches!(
            self,
            PairState::TransitioningToBack { .. } | PairState::TransitioningToFront { .. }
        )
    }
}

/// Drives the digit pairs from the wall clock.
#[derive(Debug)]
pub struct ClockDriver {
    displayed: DisplayedTime,
    pairs: [PairState; DIGIT_COUNT],
    until_sample: Duration,
    separators_in: Option<Duration>,
    time_format: TimeFormat,
}

impl ClockDriver {
    pub fn new(time_format: TimeFormat) -> Self {
        Self {
            displayed: DisplayedTime::SENTINEL,
            pairs: [PairState::ShowingFront; DIGIT_COUNT],
            until_sample: Duration::ZERO,
            separators_in: Some(SEPARATOR_DELAY),
            time_format,
        }
    }

    pub fn displayed(&self) -> DisplayedTime {
        self.displayed
    }

    #[cfg(test)]
    pub fn pair_state(&self, position: usize) -> PairState {
        self.pairs[position]
    }

    /// Number of digit pairs currently swapping.
    pub fn transitions_in_flight(&self) -> usize {
        self.pairs.iter().filter(|p| p.is_transitioning()).count()
    }

    pub fn time_format(&self) -> TimeFormat {
        self.time_format
    }

    /// Switch formats; the next sample picks it up.
    pub fn set_time_format(&mut self, format: TimeFormat) {
        self.time_format = format;
    }

    /// Advance by `dt`: reveal separators, fire due shows, and sample the
    /// clock whenever a full interval has passed (immediately on the first
    /// update).
    pub fn update(
        &mut self,
        dt: Duration,
        clock: &impl TimeSource,
        assembly: &mut Assembly,
        group: &mut Group,
        animator: &mut Animator,
    ) {
        if let Some(remaining) = self.separators_in {
            if remaining <= dt {
                for mesh in assembly.separators() {
                    animator.show(group, mesh);
                }
                self.separators_in = None;
            } else {
                self.separators_in = Some(remaining - dt);
            }
        }

        self.fire_due_shows(dt, assembly, group, animator);

        if self.until_sample <= dt {
            let digits = DisplayedTime::from_time(&clock.now(), self.time_format);
            self.apply(digits, assembly, group, animator);
            // Skip intervals lost to a stalled frame instead of catching up
            let overshoot = (dt - self.until_sample).min(SAMPLE_INTERVAL);
            self.until_sample = SAMPLE_INTERVAL - overshoot;
            if self.until_sample.is_zero() {
                self.until_sample = SAMPLE_INTERVAL;
            }
        } else {
            self.until_sample -= dt;
        }
    }

    fn fire_due_shows(
        &mut self,
        dt: Duration,
        assembly: &Assembly,
        group: &mut Group,
        animator: &mut Animator,
    ) {
        for (position, state) in self.pairs.iter_mut().enumerate() {
            let (show_in, digit, incoming, settled) = match *state {
                PairState::TransitioningToBack { show_in, digit } => {
                    (show_in, digit, back_slot(position), PairState::ShowingBack)
                }
                PairState::TransitioningToFront { show_in, digit } => {
                    (show_in, digit, front_slot(position), PairState::ShowingFront)
                }
                PairState::ShowingFront | PairState::ShowingBack => continue,
            };
            if show_in <= dt {
                assembly.bind_digit(group, incoming, digit);
                animator.show(group, assembly.slot(incoming).mesh);
                *state = settled;
            } else {
                let show_in = show_in - dt;
                *state = match settled {
                    PairState::ShowingBack => PairState::TransitioningToBack { show_in, digit },
                    _ => PairState::TransitioningToFront { show_in, digit },
                };
            }
        }
    }

    /// Transition every position whose digit differs from what is shown.
    ///
    /// A position that is already mid-transition keeps its schedule and
    /// only retargets the incoming digit. The incoming mesh gets its texture
    /// right away unless it is still falling from an earlier swap; then the
    /// texture is bound when its show fires.
    pub fn apply(
        &mut self,
        next: DisplayedTime,
        assembly: &mut Assembly,
        group: &mut Group,
        animator: &mut Animator,
    ) {
        let changed: Vec<usize> = self.displayed.changed_positions(&next).collect();
        for position in changed {
            let digit = next.digit(position);
            let (front, back) = (front_slot(position), back_slot(position));
            let state = self.pairs[position];

            let (outgoing, incoming) = match state {
                PairState::ShowingFront => (front, back),
                PairState::ShowingBack => (back, front),
                PairState::TransitioningToBack { show_in, .. } => {
                    bind_unless_rendered(assembly, group, back, digit);
                    self.pairs[position] = PairState::TransitioningToBack { show_in, digit };
                    tracing::trace!(position, digit, "retargeted pending transition");
                    continue;
                }
                PairState::TransitioningToFront { show_in, .. } => {
                    bind_unless_rendered(assembly, group, front, digit);
                    self.pairs[position] = PairState::TransitioningToFront { show_in, digit };
                    tracing::trace!(position, digit, "retargeted pending transition");
                    continue;
                }
            };

            let delay = assembly.slot(outgoing).delay;
            animator.hide(group, assembly.slot(outgoing).mesh, delay);
            bind_unless_rendered(assembly, group, incoming, digit);
            assembly.slot_mut(outgoing).is_visible = false;
            assembly.slot_mut(incoming).is_visible = true;

            let show_in = delay + HIDE_DURATION / 2;
            self.pairs[position] = if incoming == back {
                PairState::TransitioningToBack { show_in, digit }
            } else {
                PairState::TransitioningToFront { show_in, digit }
            };
            tracing::trace!(position, digit, "digit transition started");
        }
        self.displayed = next;
    }
}

/// Bind `digit` to `slot` unless its mesh is still on screen.
fn bind_unless_rendered(assembly: &Assembly, group: &mut Group, slot: usize, digit: u8) {
    let rendered = group
        .mesh(assembly.slot(slot).mesh)
        .is_some_and(|mesh| mesh.visible);
    if !rendered {
        assembly.bind_digit(group, slot, digit);
    }
}
