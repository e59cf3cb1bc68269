//! Speed planning for synchronized arrival
//!
//! Both wheels must start and stop at the same wall-clock time no
//! matter how different their travel distances are. The wheel with
//! the longer travel runs at the requested top speed; the other is
//! slowed in proportion to its share of the distance.

use libm::fabsf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-wheel speed settings for one move
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpeedPlan {
    /// Left wheel speed in steps per second
    pub left: f32,
    /// Right wheel speed in steps per second
    pub right: f32,
}

/// Plan per-wheel speeds so both wheels arrive together
///
/// The dominant wheel (larger absolute distance) gets `top_speed`;
/// the other gets `top_speed` scaled by the distance ratio. Travel
/// time is distance over speed, so both times come out equal.
///
/// Two zero distances yield `top_speed` for both wheels: the move is
/// a no-op and there is nothing to scale.
pub fn plan_speeds(left_mm: f32, right_mm: f32, top_speed: f32) -> SpeedPlan {
    let left_abs = fabsf(left_mm);
    let right_abs = fabsf(right_mm);

    if left_abs >= right_abs {
        SpeedPlan {
            left: top_speed,
            right: if left_abs == 0.0 {
                top_speed
            } else {
                top_speed * right_abs / left_abs
            },
        }
    } else {
        SpeedPlan {
            left: top_speed * left_abs / right_abs,
            right: top_speed,
        }
    }
}
