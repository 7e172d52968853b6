use bevy::{input::mouse::AccumulatedMouseMotion, prelude::*};
use leafwing_input_manager::prelude::ActionState;

use super::PlayerLook;
use crate::input::InputAction;

/// Mouse look while the look button is held.
pub(super) fn steer(
    actions: Res<ActionState<InputAction>>,
    motion: Res<AccumulatedMouseMotion>,
    look: Option<ResMut<PlayerLook>>,
) {
    let Some(mut look) = look else {
        return;
    };
    if !actions.pressed(&InputAction::Look) || motion.delta == Vec2::ZERO {
        return;
    }
    look.apply_pointer_delta(motion.delta.x, motion.delta.y);
}
