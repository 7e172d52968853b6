//! Per-frame movement/action intent.
//!
//! The input layer flips flags on key edges; the locomotion step reads the whole set once per
//! tick. Nothing here knows about physical key codes.

use crate::bitmask_flags::BitmaskFlags;

crate::define_bitmask_flags!(IntentFlag, u8, {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    Sprint,
});

impl IntentFlag {
    pub const ALL: [IntentFlag; 6] = [
        IntentFlag::Forward,
        IntentFlag::Backward,
        IntentFlag::Left,
        IntentFlag::Right,
        IntentFlag::Jump,
        IntentFlag::Sprint,
    ];
}

/// The set of active movement/action flags for the current frame.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InputIntent(pub BitmaskFlags<u8>);

impl InputIntent {
    pub fn from_flags(flags: &[IntentFlag]) -> Self {
        let mut intent = Self::default();
        for &flag in flags {
            intent.set(flag, true);
        }
        intent
    }

    pub fn set(&mut self, flag: IntentFlag, on: bool) {
        self.0.set(flag, on);
    }

    pub fn has(&self, flag: IntentFlag) -> bool {
        self.0.has(flag)
    }

    pub fn forward(&self) -> bool {
        self.has(IntentFlag::Forward)
    }

    pub fn backward(&self) -> bool {
        self.has(IntentFlag::Backward)
    }

    pub fn left(&self) -> bool {
        self.has(IntentFlag::Left)
    }

    pub fn right(&self) -> bool {
        self.has(IntentFlag::Right)
    }

    pub fn jump(&self) -> bool {
        self.has(IntentFlag::Jump)
    }

    pub fn sprint(&self) -> bool {
        self.has(IntentFlag::Sprint)
    }

    /// `backward - forward`: +1 is toward +Z (away from the default view direction).
    pub fn front_axis(&self) -> f32 {
        axis(self.backward(), self.forward())
    }

    /// `left - right`.
    pub fn side_axis(&self) -> f32 {
        axis(self.left(), self.right())
    }

    /// True when any of the four direction flags is held.
    pub fn is_moving(&self) -> bool {
        self.0.has_any(&[
            IntentFlag::Forward,
            IntentFlag::Backward,
            IntentFlag::Left,
            IntentFlag::Right,
        ])
    }
}

#[inline]
fn axis(positive: bool, negative: bool) -> f32 {
    f32::from(u8::from(positive)) - f32::from(u8::from(negative))
}
