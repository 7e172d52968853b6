use bevy::prelude::*;
use leafwing_input_manager::prelude::*;
use leafwing_input_manager::plugin::InputManagerSystem;
use shared::{InputIntent, IntentFlag};

use crate::scene::SceneState;

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    Sprint,
    /// Held to steer the view with the mouse.
    Look,
    ToggleView,
    Remount,
}

/// Movement intent sampled this frame; consumed by the fixed-step locomotion.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct CurrentIntent(pub InputIntent);

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    app.insert_resource(default_input_map());
    app.insert_resource(ActionState::<InputAction>::default());
    app.init_resource::<CurrentIntent>();

    app.add_systems(
        PreUpdate,
        capture_intent
            .after(InputManagerSystem::ManualControl)
            .run_if(in_state(SceneState::Mounted)),
    );
}

fn default_input_map() -> InputMap<InputAction> {
    let mut input_map = InputMap::<InputAction>::default();
    input_map.insert(InputAction::Forward, KeyCode::KeyW);
    input_map.insert(InputAction::Backward, KeyCode::KeyS);
    input_map.insert(InputAction::Left, KeyCode::KeyA);
    input_map.insert(InputAction::Right, KeyCode::KeyD);
    input_map.insert(InputAction::Jump, KeyCode::Space);
    input_map.insert(InputAction::Sprint, KeyCode::ShiftLeft);
    input_map.insert(InputAction::Sprint, KeyCode::ShiftRight);
    input_map.insert(InputAction::Look, MouseButton::Left);
    input_map.insert(InputAction::ToggleView, KeyCode::KeyC);
    input_map.insert(InputAction::Remount, KeyCode::F5);
    input_map
}

const INTENT_BINDINGS: [(InputAction, IntentFlag); 6] = [
    (InputAction::Forward, IntentFlag::Forward),
    (InputAction::Backward, IntentFlag::Backward),
    (InputAction::Left, IntentFlag::Left),
    (InputAction::Right, IntentFlag::Right),
    (InputAction::Jump, IntentFlag::Jump),
    (InputAction::Sprint, IntentFlag::Sprint),
];

fn intent_from_actions(actions: &ActionState<InputAction>) -> InputIntent {
    let mut intent = InputIntent::default();
    for (action, flag) in INTENT_BINDINGS {
        intent.set(flag, actions.pressed(&action));
    }
    intent
}

fn capture_intent(actions: Res<ActionState<InputAction>>, mut current: ResMut<CurrentIntent>) {
    let intent = intent_from_actions(&actions);
    if current.0 != intent {
        current.0 = intent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_actions_become_intent_flags() {
        let mut actions = ActionState::<InputAction>::default();
        actions.press(&InputAction::Forward);
        actions.press(&InputAction::Sprint);

        let intent = intent_from_actions(&actions);
        assert!(intent.forward());
        assert!(intent.sprint());
        assert!(!intent.jump());
        assert!(!intent.backward());
    }

    #[test]
    fn every_movement_action_is_bound() {
        let map = default_input_map();
        for (action, _) in INTENT_BINDINGS {
            assert!(map.get(&action).is_some(), "{action:?} has no binding");
        }
    }
}
