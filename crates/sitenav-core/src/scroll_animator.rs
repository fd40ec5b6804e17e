#![forbid(unsafe_code)]

//! Smooth in-page scroll animation.
//!
//! The animator is a pure state machine: the host reads the current scroll
//! offset, calls [`ScrollAnimator::start`], and then feeds one
//! [`ScrollAnimator::frame`] per rendering frame with the frame timestamp,
//! writing back whatever position the animator reports.
//!
//! # Invariants
//!
//! 1. Only the most recent [`AnimationTicket`] is live. Starting a new
//!    animation (or calling [`ScrollAnimator::cancel`]) bumps the generation
//!    and every older ticket resolves to [`FrameStep::Superseded`].
//! 2. The start time is captured on the first frame, not on `start`.
//! 3. Distances below `min_distance` never produce a ticket, so they cause
//!    zero scroll writes.
//! 4. The final frame always lands exactly on the target.

use std::time::Duration;

use crate::easing::ease_in_out_quart;

/// Handle to one requested animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationTicket {
    generation: u64,
}

/// Result of [`ScrollAnimator::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollStart {
    /// Distance too small; nothing to animate.
    Skipped,
    /// Animation is armed; drive it with [`ScrollAnimator::frame`].
    Started(AnimationTicket),
}

/// Result of one animation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameStep {
    /// The ticket is stale; write nothing and stop requesting frames.
    Superseded,
    /// Write `position` and request another frame.
    Continue(f64),
    /// Write `position`; the animation is complete.
    Finished(f64),
}

impl FrameStep {
    /// Position to write, if any.
    #[must_use]
    pub const fn position(self) -> Option<f64> {
        match self {
            Self::Superseded => None,
            Self::Continue(pos) | Self::Finished(pos) => Some(pos),
        }
    }

    #[must_use]
    pub const fn wants_next_frame(self) -> bool {
        matches!(self, Self::Continue(_))
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveScroll {
    ticket: AnimationTicket,
    from: f64,
    to: f64,
    started_at: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    duration: Duration,
    min_distance: f64,
    generation: u64,
    active: Option<ActiveScroll>,
}

impl ScrollAnimator {
    /// Zero durations are raised to 1ns to keep progress finite.
    #[must_use]
    pub fn new(duration: Duration, min_distance: f64) -> Self {
        Self {
            duration: duration.max(Duration::from_nanos(1)),
            min_distance,
            generation: 0,
            active: None,
        }
    }

    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Target of the in-flight animation, if any.
    #[must_use]
    pub fn target(&self) -> Option<f64> {
        self.active.map(|a| a.to)
    }

    /// Request an animation from `from` to `to`, superseding any in-flight one.
    pub fn start(&mut self, from: f64, to: f64) -> ScrollStart {
        self.cancel();
        if (to - from).abs() < self.min_distance {
            tracing::trace!(from, to, "scroll distance below minimum, skipping");
            return ScrollStart::Skipped;
        }
        let ticket = AnimationTicket {
            generation: self.generation,
        };
        self.active = Some(ActiveScroll {
            ticket,
            from,
            to,
            started_at: None,
        });
        tracing::debug!(from, to, generation = ticket.generation, "scroll animation started");
        ScrollStart::Started(ticket)
    }

    /// Advance the animation identified by `ticket` to frame time `now`.
    pub fn frame(&mut self, ticket: AnimationTicket, now: Duration) -> FrameStep {
        let Some(active) = self.active.as_mut() else {
            return FrameStep::Superseded;
        };
        if active.ticket != ticket {
            return FrameStep::Superseded;
        }

        let started_at = *active.started_at.get_or_insert(now);
        let elapsed = now.saturating_sub(started_at);
        let progress = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);

        if progress >= 1.0 {
            let to = active.to;
            self.active = None;
            tracing::debug!(to, generation = ticket.generation, "scroll animation finished");
            return FrameStep::Finished(to);
        }

        let position = active.from + (active.to - active.from) * ease_in_out_quart(progress);
        tracing::trace!(progress, position, "scroll animation frame");
        FrameStep::Continue(position)
    }

    /// Invalidate the current ticket, if any.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn started(start: ScrollStart) -> AnimationTicket {
        match start {
            ScrollStart::Started(ticket) => ticket,
            ScrollStart::Skipped => panic!("expected animation to start"),
        }
    }

    #[test]
    fn short_distance_is_skipped() {
        let mut anim = ScrollAnimator::new(ms(800), 5.0);
        assert_eq!(anim.start(100.0, 104.9), ScrollStart::Skipped);
        assert_eq!(anim.start(100.0, 95.1), ScrollStart::Skipped);
        assert!(!anim.is_animating());
    }

    #[test]
    fn exact_minimum_distance_animates() {
        let mut anim = ScrollAnimator::new(ms(800), 5.0);
        assert!(matches!(anim.start(0.0, 5.0), ScrollStart::Started(_)));
    }

    #[test]
    fn first_frame_captures_start_time() {
        let mut anim = ScrollAnimator::new(ms(800), 5.0);
        let ticket = started(anim.start(0.0, 1000.0));
        // Host clock is already far along; the first frame is progress 0.
        assert_eq!(anim.frame(ticket, ms(5_000)), FrameStep::Continue(0.0));
        assert_eq!(anim.frame(ticket, ms(5_400)), FrameStep::Continue(500.0));
        assert_eq!(anim.frame(ticket, ms(5_800)), FrameStep::Finished(1000.0));
        assert!(!anim.is_animating());
    }

    #[test]
    fn scrolling_upward_interpolates_downward() {
        let mut anim = ScrollAnimator::new(ms(800), 5.0);
        let ticket = started(anim.start(1000.0, 200.0));
        anim.frame(ticket, ms(0));
        let FrameStep::Continue(mid) = anim.frame(ticket, ms(400)) else {
            panic!("expected mid-flight frame");
        };
        assert_eq!(mid, 600.0);
    }

    #[test]
    fn late_frame_lands_exactly_on_target() {
        let mut anim = ScrollAnimator::new(ms(800), 5.0);
        let ticket = started(anim.start(0.0, 333.3));
        anim.frame(ticket, ms(0));
        assert_eq!(anim.frame(ticket, ms(10_000)), FrameStep::Finished(333.3));
    }

    #[test]
    fn new_start_supersedes_in_flight_ticket() {
        let mut anim = ScrollAnimator::new(ms(800), 5.0);
        let first = started(anim.start(0.0, 1000.0));
        anim.frame(first, ms(0));
        let second = started(anim.start(250.0, 2000.0));
        assert_ne!(first, second);
        assert_eq!(anim.frame(first, ms(16)), FrameStep::Superseded);
        assert_eq!(anim.frame(second, ms(16)), FrameStep::Continue(250.0));
        assert_eq!(anim.target(), Some(2000.0));
    }

    #[test]
    fn skipped_start_still_cancels_previous() {
        let mut anim = ScrollAnimator::new(ms(800), 5.0);
        let first = started(anim.start(0.0, 1000.0));
        assert_eq!(anim.start(10.0, 12.0), ScrollStart::Skipped);
        assert_eq!(anim.frame(first, ms(0)), FrameStep::Superseded);
    }

    #[test]
    fn cancel_invalidates_ticket() {
        let mut anim = ScrollAnimator::new(ms(800), 5.0);
        let ticket = started(anim.start(0.0, 1000.0));
        anim.cancel();
        assert_eq!(anim.frame(ticket, ms(0)), FrameStep::Superseded);
        assert_eq!(FrameStep::Superseded.position(), None);
    }

    #[test]
    fn zero_duration_finishes_on_second_frame() {
        let mut anim = ScrollAnimator::new(Duration::ZERO, 5.0);
        let ticket = started(anim.start(0.0, 100.0));
        assert_eq!(anim.frame(ticket, ms(0)), FrameStep::Continue(0.0));
        assert_eq!(anim.frame(ticket, ms(1)), FrameStep::Finished(100.0));
    }
}
