//! Swipe gesture recognition and per-card animation state.
//!
//! A [`SwipeCard`] is a short-lived value owned by the rendering layer and
//! keyed by the id of the item it shows. It turns a stream of horizontal drag
//! offsets into at most one committed [`Direction`], and animates itself off
//! screen or back to rest. It never talks to the deck; callers forward the
//! outcome.

use super::{Direction, EXIT_ANIMATION};
use std::time::Duration;

/// Release beyond this offset (strictly) commits a decision
pub const COMMIT_THRESHOLD: f64 = 100.0;
/// Drag beyond this offset (inclusive) shows the LIKE/NOPE hint
pub const HINT_THRESHOLD: f64 = 30.0;
/// Offset at which rotation saturates
pub const ROTATION_RANGE: f64 = 200.0;
pub const MAX_ROTATION_DEG: f64 = 15.0;
/// Where a committed card flies to
pub const EXIT_OFFSET: f64 = 600.0;

pub const INACTIVE_SCALE: f64 = 0.95;
pub const INACTIVE_OPACITY: f64 = 0.8;
const EXIT_SCALE: f64 = 0.9;
const ACTIVATION_TRANSITION: Duration = Duration::from_millis(200);

const SPRING_STIFFNESS: f64 = 300.0;
const SPRING_DAMPING: f64 = 30.0;
const SPRING_SUBSTEP: f64 = 0.004;
const SPRING_REST_OFFSET: f64 = 0.5;
const SPRING_REST_VELOCITY: f64 = 1.0;

/// Visual-only hint shown while dragging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeHint {
    None,
    Left,
    Right,
}

/// Result of a drag-end event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Committed(Direction),
    Cancelled,
    /// The card was not accepting input
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardPhase {
    Resting,
    Dragging,
    Returning { velocity: f64 },
    Exiting { direction: Direction, from: f64, elapsed: Duration },
}

/// Snapshot the renderer draws from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardVisual {
    pub offset: f64,
    pub rotation: f64,
    pub scale: f64,
    pub opacity: f64,
    pub hint: SwipeHint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween {
    from_scale: f64,
    from_opacity: f64,
    to_scale: f64,
    to_opacity: f64,
    elapsed: Duration,
    duration: Duration,
}

impl Tween {
    fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

pub fn hint_for(offset: f64) -> SwipeHint {
    if offset.abs() >= HINT_THRESHOLD {
        if offset > 0.0 {
            SwipeHint::Right
        } else {
            SwipeHint::Left
        }
    } else {
        SwipeHint::None
    }
}

/// Degrees, linear in offset and clamped to ±[`MAX_ROTATION_DEG`]
pub fn rotation_for(offset: f64) -> f64 {
    let rotation = offset / ROTATION_RANGE * MAX_ROTATION_DEG;
    rotation.clamp(-MAX_ROTATION_DEG, MAX_ROTATION_DEG)
}

/// Maps a final drag offset to a decision. Both thresholds are strict.
pub fn classify_release(offset: f64) -> Option<Direction> {
    if offset > COMMIT_THRESHOLD {
        Some(Direction::Right)
    } else if offset < -COMMIT_THRESHOLD {
        Some(Direction::Left)
    } else {
        None
    }
}

fn ease_out(t: f64) -> f64 {
    1.0 - (1.0 - t) * (1.0 - t)
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    if t >= 1.0 {
        return to;
    }
    from + (to - from) * t
}

#[derive(Debug, Clone)]
pub struct SwipeCard {
    item_id: String,
    active: bool,
    phase: CardPhase,
    offset: f64,
    scale: f64,
    opacity: f64,
    tween: Option<Tween>,
}

impl SwipeCard {
    /// Creates a card already at its resting visuals for the given role
    pub fn new(item_id: impl Into<String>, active: bool) -> Self {
        let (scale, opacity) = if active {
            (1.0, 1.0)
        } else {
            (INACTIVE_SCALE, INACTIVE_OPACITY)
        };
        Self {
            item_id: item_id.into(),
            active,
            phase: CardPhase::Resting,
            offset: 0.0,
            scale,
            opacity,
            tween: None,
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase(&self) -> CardPhase {
        self.phase
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_exiting(&self) -> bool {
        matches!(self.phase, CardPhase::Exiting { .. })
    }

    /// Switches role. Any drag state is discarded either way.
    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        self.phase = CardPhase::Resting;
        self.offset = 0.0;

        let (to_scale, to_opacity) = if active {
            (1.0, 1.0)
        } else {
            (INACTIVE_SCALE, INACTIVE_OPACITY)
        };
        self.start_tween(to_scale, to_opacity, ACTIVATION_TRANSITION);
    }

    /// Feeds one drag sample. Returns false when the card ignores it.
    pub fn drag_to(&mut self, offset: f64) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.phase = CardPhase::Dragging;
        self.offset = offset;
        true
    }

    /// Ends the drag with its final offset
    pub fn end_drag(&mut self, offset: f64) -> GestureOutcome {
        if !self.accepts_input() {
            return GestureOutcome::Ignored;
        }
        self.offset = offset;

        match classify_release(offset) {
            Some(direction) => {
                self.begin_exit(direction);
                GestureOutcome::Committed(direction)
            }
            None => {
                self.phase = CardPhase::Returning { velocity: 0.0 };
                GestureOutcome::Cancelled
            }
        }
    }

    /// Starts the exit animation without a drag (buttons, keys)
    pub fn fling(&mut self, direction: Direction) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.begin_exit(direction);
        true
    }

    /// Advances animations by `dt`
    pub fn step(&mut self, dt: Duration) {
        match self.phase {
            CardPhase::Resting | CardPhase::Dragging => {}
            CardPhase::Returning { velocity } => self.step_spring(velocity, dt),
            CardPhase::Exiting {
                direction,
                from,
                elapsed,
            } => {
                let elapsed = (elapsed + dt).min(EXIT_ANIMATION);
                let t = elapsed.as_secs_f64() / EXIT_ANIMATION.as_secs_f64();
                self.offset = lerp(from, direction.sign() * EXIT_OFFSET, ease_out(t));
                self.phase = CardPhase::Exiting {
                    direction,
                    from,
                    elapsed,
                };
            }
        }

        if let Some(mut tween) = self.tween {
            tween.elapsed += dt;
            let t = tween.progress();
            self.scale = lerp(tween.from_scale, tween.to_scale, t);
            self.opacity = lerp(tween.from_opacity, tween.to_opacity, t);
            self.tween = if tween.is_done() { None } else { Some(tween) };
        }
    }

    /// True while something on the card is still moving
    pub fn is_animating(&self) -> bool {
        let moving = match self.phase {
            CardPhase::Resting | CardPhase::Dragging => false,
            CardPhase::Returning { .. } => true,
            CardPhase::Exiting { elapsed, .. } => elapsed < EXIT_ANIMATION,
        };
        moving || self.tween.is_some()
    }

    pub fn hint(&self) -> SwipeHint {
        if self.active {
            hint_for(self.offset)
        } else {
            SwipeHint::None
        }
    }

    pub fn rotation(&self) -> f64 {
        rotation_for(self.offset)
    }

    pub fn visual(&self) -> CardVisual {
        CardVisual {
            offset: self.offset,
            rotation: self.rotation(),
            scale: self.scale,
            opacity: self.opacity,
            hint: self.hint(),
        }
    }

    fn accepts_input(&self) -> bool {
        self.active && !self.is_exiting()
    }

    fn begin_exit(&mut self, direction: Direction) {
        self.phase = CardPhase::Exiting {
            direction,
            from: self.offset,
            elapsed: Duration::ZERO,
        };
        self.start_tween(EXIT_SCALE, 0.0, EXIT_ANIMATION);
    }

    fn start_tween(&mut self, to_scale: f64, to_opacity: f64, duration: Duration) {
        self.tween = Some(Tween {
            from_scale: self.scale,
            from_opacity: self.opacity,
            to_scale,
            to_opacity,
            elapsed: Duration::ZERO,
            duration,
        });
    }

    fn step_spring(&mut self, mut velocity: f64, dt: Duration) {
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let h = remaining.min(SPRING_SUBSTEP);
            let accel = -SPRING_STIFFNESS * self.offset - SPRING_DAMPING * velocity;
            velocity += accel * h;
            self.offset += velocity * h;
            remaining -= h;
        }

        if self.offset.abs() < SPRING_REST_OFFSET && velocity.abs() < SPRING_REST_VELOCITY {
            self.offset = 0.0;
            self.phase = CardPhase::Resting;
        } else {
            self.phase = CardPhase::Returning { velocity };
        }
    }
}
