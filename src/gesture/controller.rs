//! The transform controller
//!
//! Two mutually exclusive gesture modes over a single entity:
//!
//! - **Move**: the offset between pointer and entity position is captured
//!   at press; every subsequent pointer position maps directly to a new
//!   entity position. No smoothing, no clamping.
//! - **Spin** (rotate + scale): one combined gesture around the entity's
//!   visual center. The angular offset between the initial pointer ray and
//!   the entity's rotation, plus the initial pointer distance and scale,
//!   are captured at press as baselines; every move re-derives rotation
//!   and scale from the current pointer ray against those baselines.
//!
//! Both modes are driven from absolute pointer positions, so the result
//! depends only on the latest pointer sample, never on the path taken.

use cgmath::{InnerSpace, Point2, Vector2};

use crate::state::entity::{EntityId, Placement};

/// Baseline distances shorter than this (pointer pressed exactly on the
/// center) cannot anchor a scale ratio; the ratio is pinned to 1.0 instead.
const MIN_BASELINE_DISTANCE: f32 = 1e-3;

#[derive(Debug, Clone, Copy)]
enum Mode {
    Move {
        /// Pointer position minus entity position, captured at press
        grab: Vector2<f32>,
    },
    Spin {
        /// Pivot: the entity's visual center, fixed for the whole gesture
        center: Point2<f32>,
        /// Entity rotation minus initial pointer angle, in degrees
        angle_offset: f32,
        /// Entity scale at press
        base_scale: f32,
        /// Pointer-to-center distance at press
        base_distance: f32,
    },
}

#[derive(Debug, Clone, Copy)]
struct ActiveGesture {
    id: EntityId,
    placement: Placement,
    mode: Mode,
}

/// Tracks the single in-flight gesture, if any
#[derive(Debug, Default)]
pub struct GestureController {
    active: Option<ActiveGesture>,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a move gesture on `id` at the given pointer position
    pub fn begin_move(&mut self, id: EntityId, placement: Placement, pointer: Point2<f32>) {
        let grab = Vector2::new(pointer.x - placement.x, pointer.y - placement.y);
        self.active = Some(ActiveGesture {
            id,
            placement,
            mode: Mode::Move { grab },
        });
    }

    /// Start a combined rotate+scale gesture on `id`
    pub fn begin_spin(&mut self, id: EntityId, placement: Placement, pointer: Point2<f32>) {
        let center = placement.center();
        let ray = pointer - center;
        let angle = ray.y.atan2(ray.x).to_degrees();

        self.active = Some(ActiveGesture {
            id,
            placement,
            mode: Mode::Spin {
                center,
                angle_offset: placement.rotation - angle,
                base_scale: placement.scale,
                base_distance: ray.magnitude(),
            },
        });
    }

    /// Feed a pointer move; returns the updated placement while a gesture
    /// is active, or None otherwise.
    pub fn pointer_moved(&mut self, pointer: Point2<f32>) -> Option<(EntityId, Placement)> {
        let gesture = self.active.as_mut()?;

        match gesture.mode {
            Mode::Move { grab } => {
                gesture.placement.x = pointer.x - grab.x;
                gesture.placement.y = pointer.y - grab.y;
            }
            Mode::Spin {
                center,
                angle_offset,
                base_scale,
                base_distance,
            } => {
                let ray = pointer - center;
                gesture.placement.rotation = ray.y.atan2(ray.x).to_degrees() + angle_offset;

                let ratio = if base_distance < MIN_BASELINE_DISTANCE {
                    1.0
                } else {
                    ray.magnitude() / base_distance
                };
                gesture.placement.scale = Placement::clamp_scale(base_scale * ratio);
            }
        }

        Some((gesture.id, gesture.placement))
    }

    /// End the active gesture (pointer released)
    pub fn release(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_id(&self) -> Option<EntityId> {
        self.active.map(|g| g.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::entity::{SCALE_MAX, SCALE_MIN};

    fn placement_at(x: f32, y: f32) -> Placement {
        Placement::new(x, y, 0)
    }

    #[test]
    fn test_move_final_position_independent_of_path() {
        let id = EntityId(1);
        let start = placement_at(100.0, 100.0);
        let press = Point2::new(130.0, 140.0);

        // Wander all over the canvas, then land on the same final pointer.
        let wild_path = [
            Point2::new(-50.0, 900.0),
            Point2::new(400.0, -12.0),
            Point2::new(3.0, 3.0),
            Point2::new(250.0, 180.0),
        ];
        let straight_path = [Point2::new(250.0, 180.0)];

        for path in [&wild_path[..], &straight_path[..]] {
            let mut controller = GestureController::new();
            controller.begin_move(id, start, press);

            let mut last = None;
            for &p in path {
                last = controller.pointer_moved(p);
            }
            let (_, placement) = last.unwrap();

            // final position == last pointer - initial grab offset
            assert_eq!(placement.x, 250.0 - (press.x - start.x));
            assert_eq!(placement.y, 180.0 - (press.y - start.y));
            // move never touches rotation or scale
            assert_eq!(placement.rotation, start.rotation);
            assert_eq!(placement.scale, start.scale);
        }
    }

    #[test]
    fn test_spin_rotation_follows_pointer_angle_plus_offset() {
        let id = EntityId(1);
        let mut start = placement_at(0.0, 0.0);
        start.rotation = 30.0;
        let center = start.center();

        let mut controller = GestureController::new();
        // Press directly right of the center: initial angle 0, offset 30.
        controller.begin_spin(id, start, Point2::new(center.x + 40.0, center.y));

        // Pointer directly below the center: angle 90, so rotation 120.
        let (_, placement) = controller
            .pointer_moved(Point2::new(center.x, center.y + 40.0))
            .unwrap();
        assert!((placement.rotation - 120.0).abs() < 1e-3);

        // Same distance as the baseline: scale untouched.
        assert!((placement.scale - start.scale).abs() < 1e-6);
    }

    #[test]
    fn test_spin_scale_tracks_distance_ratio_with_clamp() {
        let id = EntityId(1);
        let start = placement_at(0.0, 0.0);
        let center = start.center();

        let mut controller = GestureController::new();
        controller.begin_spin(id, start, Point2::new(center.x + 10.0, center.y));

        // Twice the baseline distance doubles the scale.
        let (_, placement) = controller
            .pointer_moved(Point2::new(center.x + 20.0, center.y))
            .unwrap();
        assert!((placement.scale - 2.0).abs() < 1e-4);

        // Dragging far out clamps at the maximum...
        let (_, placement) = controller
            .pointer_moved(Point2::new(center.x + 500.0, center.y))
            .unwrap();
        assert_eq!(placement.scale, SCALE_MAX);

        // ...and collapsing onto the center clamps at the minimum.
        let (_, placement) = controller
            .pointer_moved(Point2::new(center.x + 0.5, center.y))
            .unwrap();
        assert_eq!(placement.scale, SCALE_MIN);
    }

    #[test]
    fn test_spin_started_at_center_keeps_baseline_scale() {
        let id = EntityId(1);
        let mut start = placement_at(50.0, 50.0);
        start.scale = 1.5;
        let center = start.center();

        let mut controller = GestureController::new();
        controller.begin_spin(id, start, center);

        let (_, placement) = controller
            .pointer_moved(Point2::new(center.x + 300.0, center.y - 120.0))
            .unwrap();

        assert!(placement.scale.is_finite());
        assert!(placement.rotation.is_finite());
        assert_eq!(placement.scale, 1.5);
    }

    #[test]
    fn test_release_ends_gesture() {
        let id = EntityId(1);
        let mut controller = GestureController::new();
        controller.begin_move(id, placement_at(0.0, 0.0), Point2::new(0.0, 0.0));
        assert!(controller.is_active());
        assert_eq!(controller.active_id(), Some(id));

        controller.release();
        assert!(!controller.is_active());
        assert!(controller.pointer_moved(Point2::new(5.0, 5.0)).is_none());
    }
}
