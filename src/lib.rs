use bevy::prelude::*;

/// Components and systems for the watched attribute dictionary.
pub mod attributes;
use attributes::*;

/// The prototype cube geometry that spiral copies are stamped from.
pub mod template;
use template::*;

/// The spiral state machine and the systems that drive it.
pub mod spiral;
use spiral::*;

/// Saving and loading attribute dictionaries as RON.
#[cfg(feature = "persist")]
pub mod persist;

/// `use bevy_spiral_cubes::prelude::*` to import commonly used items.
pub mod prelude {
    #[cfg(feature = "persist")]
    pub use crate::persist::{load_attributes, save_attributes, PersistError};
    pub use crate::{
        attributes::{
            AttributeError, AttributeWatcher, DynamicAttributes, SizeChanged, SpiralTriggered,
        },
        spiral::{
            BaseSpiralConfig, CubeInstance, Frame, Placement, SpiralAnimator, SpiralConfig,
            SpiralSession, SpiralState,
        },
        template::CubeTemplate,
        SpiralPlugin,
    };
}

/// Plugin that contains all functionality to watch attribute dictionaries
/// and animate spiral sessions in response.
///
/// Toggle handling runs before size handling, which runs before the sessions
/// are advanced, so a single frame observes the same ordering the original
/// host callbacks did.
pub struct SpiralPlugin {
    /// Default config used by sessions that do not carry their own.
    ///
    /// Available as a resource [`BaseSpiralConfig`].
    pub base_config: SpiralConfig,
}

impl SpiralPlugin {
    pub fn new(base_config: SpiralConfig) -> Self {
        Self { base_config }
    }
}

impl Default for SpiralPlugin {
    fn default() -> Self {
        Self {
            base_config: SpiralConfig::default(),
        }
    }
}

impl Plugin for SpiralPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(BaseSpiralConfig(self.base_config))
            .init_resource::<CubeTemplate>()
            .add_event::<SpiralTriggered>()
            .add_event::<SizeChanged>()
            .add_systems(
                Update,
                (watch_attributes, rebuild_template, drive_spirals).chain(),
            )
            .add_systems(PostUpdate, log_erased);
    }
}
