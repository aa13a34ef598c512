use bevy::prelude::*;
use smallvec::SmallVec;

use crate::attributes::SpiralTriggered;
use crate::template::CubeTemplate;

mod animator;
pub use animator::*;

/// Describes the shape of the spiral traced by a session's copies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpiralConfig {
    /// Frames a forward run takes to complete.
    pub max_steps: u32,
    /// Full revolutions about the vertical axis over a complete run.
    pub turns: f32,
    /// Scale factor of the final copy; earlier copies interpolate down from
    /// the full template size.
    pub min_scale: f32,
    /// Strength of the outward swing, in multiples of the template size.
    pub lateral_factor: f32,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            max_steps: 64,
            turns: 4.0,
            min_scale: 0.2,
            lateral_factor: 2.5,
        }
    }
}

/// Resource that represents the default spiral config used by sessions that
/// do not carry their own.
#[derive(Resource, Clone, Copy)]
pub struct BaseSpiralConfig(pub SpiralConfig);

/// Marker for cube copies stamped by a spiral session.
#[derive(Component)]
pub struct CubeInstance;

/// Per-entity spiral session: the state machine plus the ordered list of
/// stamped copies. Insertion order is spiral order, and reverse runs remove
/// strictly last-in first-out, so the spiral unwinds symmetrically to how it
/// was built.
#[derive(Component, Default)]
#[require(Transform)]
pub struct SpiralSession {
    config: Option<SpiralConfig>,
    animator: SpiralAnimator,
    copies: SmallVec<[Entity; 8]>,
}

impl SpiralSession {
    /// Session that follows [`BaseSpiralConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Session with its own config, ignoring [`BaseSpiralConfig`].
    pub fn with_config(config: SpiralConfig) -> Self {
        Self {
            config: Some(config),
            ..Self::default()
        }
    }

    pub fn animator(&self) -> &SpiralAnimator {
        &self.animator
    }

    /// Stamped copies in spiral order.
    pub fn copies(&self) -> &[Entity] {
        &self.copies
    }

    /// Despawns all stamped copies and returns the state machine to idle.
    /// A no-op on an idle session with no copies.
    pub fn reset(&mut self, commands: &mut Commands) {
        for cube in self.copies.drain(..) {
            commands.entity(cube).despawn();
        }
        self.animator.reset();
    }
}

/// Starts sessions for this frame's triggers, then advances every active
/// session exactly once, stamping or removing one copy per frame. Copies are
/// spawned as children of the session entity.
pub fn drive_spirals(
    mut commands: Commands,
    template: Res<CubeTemplate>,
    base: Res<BaseSpiralConfig>,
    mut triggers: EventReader<SpiralTriggered>,
    mut sessions: Query<(Entity, &mut SpiralSession)>,
) {
    for trigger in triggers.read() {
        if let Ok((_, mut session)) = sessions.get_mut(trigger.target) {
            session.animator.start(trigger.forward, template.size());
        }
    }

    for (entity, mut session) in &mut sessions {
        let config = session.config.unwrap_or(base.0);
        match session.animator.advance(&config) {
            Frame::Place { placement, .. } => {
                let cube = commands
                    .spawn((CubeInstance, placement.transform(template.center())))
                    .id();
                commands.entity(entity).add_child(cube);
                session.copies.push(cube);
            }
            Frame::Remove { .. } => {
                if let Some(cube) = session.copies.pop() {
                    commands.entity(cube).despawn();
                }
            }
            Frame::Idle => {}
        }
    }
}
