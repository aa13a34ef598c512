use std::f32::consts::{PI, TAU};

use bevy::prelude::*;

use super::SpiralConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpiralState {
    #[default]
    Idle,
    Growing {
        step: u32,
    },
    Shrinking,
}

/// Where along the spiral one copy lands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Rotation about the vertical axis.
    pub angle: f32,
    /// Outward displacement, applied before the rotation.
    pub lateral: f32,
    /// Height offset accumulated from the scaled sizes of the copies below.
    pub height: f32,
    /// Uniform scale factor relative to the template.
    pub scale: f32,
}

impl Placement {
    /// Transform stamping a copy at this placement. `center` is the bounding
    /// box center of the template; the scale pivots on it so a shrinking
    /// copy stays put instead of sliding toward the origin.
    pub fn transform(&self, center: Vec3) -> Transform {
        let rotation = Quat::from_rotation_y(self.angle);
        let offset = Vec3::new(self.lateral, self.height, 0.0);
        Transform {
            translation: rotation * (offset + (1.0 - self.scale) * center),
            rotation,
            scale: Vec3::splat(self.scale),
        }
    }
}

/// Outcome of advancing a session by one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frame {
    /// Stamp a new copy; `more` reports whether another frame is wanted.
    Place { placement: Placement, more: bool },
    /// Remove the most recently stamped copy.
    Remove { more: bool },
    /// No active run.
    Idle,
}

/// The spiral state machine, free of any scene bookkeeping.
///
/// Forward runs step a counter up to the configured maximum and emit one
/// placement per frame; reverse runs consume the accumulated copy count one
/// frame at a time, in reverse order of stamping.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpiralAnimator {
    state: SpiralState,
    base_size: f32,
    height: f32,
    copies: u32,
}

fn scale_for(frac: f32, min_scale: f32) -> f32 {
    (1.0 - frac) * (1.0 - min_scale) + min_scale
}

impl SpiralAnimator {
    /// Begins a run. The step counter restarts and the current size becomes
    /// the base height offset. Copies left over from a previous run are
    /// kept, so a reverse run unwinds what the forward run built.
    pub fn start(&mut self, forward: bool, size: f32) {
        self.base_size = size;
        self.height = size;
        self.state = if forward {
            SpiralState::Growing { step: 0 }
        } else {
            SpiralState::Shrinking
        };
        info!(
            "new spiral run, direction: {}",
            if forward { "forward" } else { "reverse" }
        );
    }

    /// Advances the active run by one frame.
    pub fn advance(&mut self, config: &SpiralConfig) -> Frame {
        match self.state {
            SpiralState::Growing { step } => {
                let step = step + 1;
                let frac = step as f32 / config.max_steps as f32;
                let placement = Placement {
                    angle: frac * config.turns * TAU,
                    lateral: config.lateral_factor * frac * self.base_size * (frac * PI).sin(),
                    height: self.height,
                    scale: scale_for(frac, config.min_scale),
                };
                self.height += placement.scale * self.base_size;
                self.copies += 1;
                let more = step < config.max_steps;
                self.state = if more {
                    SpiralState::Growing { step }
                } else {
                    SpiralState::Idle
                };
                Frame::Place { placement, more }
            }
            SpiralState::Shrinking => {
                if self.copies == 0 {
                    self.state = SpiralState::Idle;
                    return Frame::Idle;
                }
                self.copies -= 1;
                let more = self.copies > 0;
                if !more {
                    self.state = SpiralState::Idle;
                }
                Frame::Remove { more }
            }
            SpiralState::Idle => Frame::Idle,
        }
    }

    /// Abandons any run and forgets all copies. Safe to call repeatedly on
    /// an idle, empty session.
    pub fn reset(&mut self) {
        self.state = SpiralState::Idle;
        self.copies = 0;
    }

    pub fn state(&self) -> SpiralState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SpiralState::Idle
    }

    /// Number of copies stamped by the current session and not yet removed.
    pub fn copies(&self) -> u32 {
        self.copies
    }
}
