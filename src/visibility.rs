// ABOUTME: Hidden/visible state machine for the dock and the slide + fade transition between the two
// ABOUTME: Position and opacity share one clock so the two sweeps always start and finish together

use crate::geometry::{DockGeometry, Point};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Hidden,
    TransitioningIn,
    Visible,
    TransitioningOut,
}

impl Phase {
    pub fn is_transitioning(self) -> bool {
        matches!(self, Phase::TransitioningIn | Phase::TransitioningOut)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Slide up, fade in.
    In,
    /// Slide down, fade out.
    Out,
}

/// What the panel looks like at a given instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub position: Point,
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub direction: Direction,
    pub from: Frame,
    pub to: Frame,
    pub start: Instant,
    pub duration: Duration,
}

impl Transition {
    /// Linear progress in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) >= self.duration
    }

    pub fn frame(&self, now: Instant) -> Frame {
        let t = self.progress(now);
        Frame {
            position: self.from.position.lerp(self.to.position, t),
            opacity: self.from.opacity + (self.to.opacity - self.from.opacity) * t,
        }
    }
}

pub struct VisibilityMachine {
    phase: Phase,
    transition: Option<Transition>,
    hidden: Frame,
    visible: Frame,
    duration: Duration,
}

impl VisibilityMachine {
    pub fn new(geometry: &DockGeometry, duration: Duration) -> Self {
        Self {
            phase: Phase::Hidden,
            transition: None,
            hidden: Frame { position: geometry.hidden_pos, opacity: 0.0 },
            visible: Frame { position: geometry.visible_pos, opacity: 1.0 },
            duration,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Whether the last settled state was Visible. Pointer checks use the
    /// settled rectangle, never an interpolated one.
    pub fn settled_visible(&self) -> bool {
        matches!(self.phase, Phase::Visible | Phase::TransitioningOut)
    }

    /// One polling tick. Starts at most one transition and does nothing while
    /// one is already running.
    pub fn poll(&mut self, pointer_inside: bool, now: Instant) -> Option<Direction> {
        if self.transition.is_some() {
            return None;
        }

        let direction = match (self.phase, pointer_inside) {
            (Phase::Hidden, true) => Direction::In,
            (Phase::Visible, false) => Direction::Out,
            _ => return None,
        };

        let (from, to, phase) = match direction {
            Direction::In => (self.hidden, self.visible, Phase::TransitioningIn),
            Direction::Out => (self.visible, self.hidden, Phase::TransitioningOut),
        };

        self.transition = Some(Transition {
            direction,
            from,
            to,
            start: now,
            duration: self.duration,
        });
        self.phase = phase;
        Some(direction)
    }

    /// Settles a finished transition. Returns the new phase when it settled.
    pub fn advance(&mut self, now: Instant) -> Option<Phase> {
        let transition = self.transition?;
        if !transition.is_finished(now) {
            return None;
        }

        self.transition = None;
        self.phase = match transition.direction {
            Direction::In => Phase::Visible,
            Direction::Out => Phase::Hidden,
        };
        tracing::debug!("Dock settled: {:?}", self.phase);
        Some(self.phase)
    }

    pub fn frame(&self, now: Instant) -> Frame {
        match (&self.transition, self.phase) {
            (Some(transition), _) => transition.frame(now),
            (None, Phase::Visible) => self.visible,
            (None, _) => self.hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{PanelMetrics, Rect, Size};

    const DURATION: Duration = Duration::from_millis(200);

    fn machine() -> VisibilityMachine {
        let screen = Rect::new(Point::new(0.0, 0.0), Size::new(1920.0, 1080.0));
        let geometry = DockGeometry::new(screen, 1.0, PanelMetrics::for_icons(2, 48));
        VisibilityMachine::new(&geometry, DURATION)
    }

    #[test]
    fn test_initial_state_is_hidden_and_transparent() {
        let machine = machine();
        let frame = machine.frame(Instant::now());

        assert_eq!(machine.phase(), Phase::Hidden);
        assert!(!machine.is_transitioning());
        assert_eq!(frame.opacity, 0.0);
        assert_eq!(frame.position.y, 1079.0);
    }

    #[test]
    fn test_pointer_inside_while_hidden_starts_one_transition() {
        let mut machine = machine();
        let start = Instant::now();

        assert_eq!(machine.poll(true, start), Some(Direction::In));
        assert_eq!(machine.phase(), Phase::TransitioningIn);

        // Repeated ticks while the transition is in flight are no-ops
        assert_eq!(machine.poll(true, start + Duration::from_millis(50)), None);
        assert_eq!(machine.poll(false, start + Duration::from_millis(100)), None);
        assert_eq!(machine.transition().unwrap().start, start);
    }

    #[test]
    fn test_pointer_outside_while_hidden_is_no_op() {
        let mut machine = machine();
        assert_eq!(machine.poll(false, Instant::now()), None);
        assert_eq!(machine.phase(), Phase::Hidden);
    }

    #[test]
    fn test_transition_settles_after_duration() {
        let mut machine = machine();
        let start = Instant::now();
        machine.poll(true, start);

        assert_eq!(machine.advance(start + Duration::from_millis(199)), None);
        assert_eq!(machine.advance(start + DURATION), Some(Phase::Visible));
        assert_eq!(machine.phase(), Phase::Visible);
        assert!(!machine.is_transitioning());

        let frame = machine.frame(start + DURATION);
        assert_eq!(frame.opacity, 1.0);
        assert_eq!(frame.position.y, 1080.0 - 94.0);
    }

    #[test]
    fn test_pointer_outside_while_visible_starts_one_hide() {
        let mut machine = machine();
        let start = Instant::now();
        machine.poll(true, start);
        machine.advance(start + DURATION);

        let later = start + Duration::from_secs(1);
        assert_eq!(machine.poll(true, later), None);
        assert_eq!(machine.poll(false, later), Some(Direction::Out));
        assert_eq!(machine.phase(), Phase::TransitioningOut);
        assert_eq!(machine.poll(false, later + Duration::from_millis(10)), None);

        assert_eq!(machine.advance(later + DURATION), Some(Phase::Hidden));
        let frame = machine.frame(later + DURATION);
        assert_eq!(frame.opacity, 0.0);
        assert_eq!(frame.position.y, 1079.0);
    }

    #[test]
    fn test_position_and_opacity_share_the_clock() {
        let mut machine = machine();
        let start = Instant::now();
        machine.poll(true, start);

        let transition = *machine.transition().unwrap();
        assert_eq!(transition.duration, DURATION);

        let halfway = machine.frame(start + Duration::from_millis(100));
        assert!((halfway.opacity - 0.5).abs() < 1e-3);
        let expected_y = (1079.0 + 986.0) / 2.0;
        assert!((halfway.position.y - expected_y).abs() < 0.1);

        let first = machine.frame(start);
        assert_eq!(first.opacity, 0.0);
        assert_eq!(first.position.y, 1079.0);
    }

    #[test]
    fn test_settled_visible_tracks_last_settled_state() {
        let mut machine = machine();
        let start = Instant::now();
        assert!(!machine.settled_visible());

        machine.poll(true, start);
        assert!(!machine.settled_visible());
        machine.advance(start + DURATION);
        assert!(machine.settled_visible());

        machine.poll(false, start + DURATION);
        assert!(machine.settled_visible());
    }

    #[test]
    fn test_progress_clamps() {
        let start = Instant::now();
        let transition = Transition {
            direction: Direction::In,
            from: Frame { position: Point::new(0.0, 0.0), opacity: 0.0 },
            to: Frame { position: Point::new(0.0, 10.0), opacity: 1.0 },
            start,
            duration: DURATION,
        };

        assert_eq!(transition.progress(start + Duration::from_secs(5)), 1.0);
        assert!(transition.is_finished(start + DURATION));
        assert!(!Phase::Hidden.is_transitioning());
        assert!(Phase::TransitioningOut.is_transitioning());
    }
}
