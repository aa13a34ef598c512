use std::collections::HashMap;

use bevy::prelude::*;
use thiserror::Error;

/// Key of the interaction toggle flipped between "0" and "1" on each click.
pub const TOUCHED_KEY: &str = "_touched";
/// Key of the size option controlling the template's edge length.
pub const SIZE_KEY: &str = "size";
/// Key marking the dictionary format revision.
pub const FORMAT_VERSION_KEY: &str = "_formatversion";
/// Key of the click formula evaluated by a host on interaction.
pub const ONCLICK_KEY: &str = "onclick";

#[derive(Debug, Error)]
pub enum AttributeError {
    #[error("attribute `{0}` is not set")]
    Missing(String),

    #[error("attribute `{key}` is not numeric: `{value}`")]
    NotNumeric { key: String, value: String },
}

/// Component holding a dynamic attribute dictionary: flat string keys to
/// string values, including the underscore-prefixed metadata entries that
/// describe labels, units and form access for each user-facing option.
///
/// This is the only durable state of the system, so it carries the serde
/// derives used by the `persist` module.
#[derive(Component, Clone, Debug, Default)]
#[cfg_attr(feature = "persist", derive(serde::Serialize, serde::Deserialize))]
#[require(AttributeWatcher)]
pub struct DynamicAttributes {
    entries: HashMap<String, String>,
}

impl DynamicAttributes {
    /// Creates a dictionary seeded with the entries that mark an entity as
    /// dynamic: a format version, the click formula that flips the
    /// interaction toggle, the toggle itself, and a labeled size option.
    pub fn new(size: f32) -> Self {
        let mut attrs = Self::default();
        attrs.set(FORMAT_VERSION_KEY, "1.0");
        attrs.set(ONCLICK_KEY, "Animate(_touched,0,1)");
        attrs.set(TOUCHED_KEY, "0");
        attrs.add_option(SIZE_KEY, size, "INCHES", true);
        attrs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Adds a user-facing option along with its label, units and optional
    /// textbox access metadata entries.
    pub fn add_option(&mut self, name: &str, value: f32, units: &str, access: bool) {
        self.set(name, value.to_string());
        self.set(format!("_{name}_label"), name);
        if access {
            self.set(format!("_{name}_access"), "TEXTBOX");
            self.set(format!("_{name}_formlabel"), name);
        }
        self.set(format!("_{name}_units"), units);
        self.set(format!("_{name}_formulaunits"), units);
    }

    pub fn get_f32(&self, key: &str) -> Result<f32, AttributeError> {
        let value = self
            .get(key)
            .ok_or_else(|| AttributeError::Missing(key.to_owned()))?;
        value.parse().map_err(|_| AttributeError::NotNumeric {
            key: key.to_owned(),
            value: value.to_owned(),
        })
    }

    pub fn get_i32(&self, key: &str) -> Result<i32, AttributeError> {
        let value = self
            .get(key)
            .ok_or_else(|| AttributeError::Missing(key.to_owned()))?;
        value.parse().map_err(|_| AttributeError::NotNumeric {
            key: key.to_owned(),
            value: value.to_owned(),
        })
    }

    /// Current value of the interaction toggle, treating a missing or
    /// non-numeric entry as 0.
    pub fn touched(&self) -> i32 {
        self.get_i32(TOUCHED_KEY).unwrap_or(0)
    }

    /// Current value of the size option, if set and numeric.
    pub fn size(&self) -> Option<f32> {
        self.get_f32(SIZE_KEY).ok()
    }

    /// Flips the interaction toggle between "0" and "1", standing in for a
    /// host evaluating the `onclick` formula.
    pub fn interact(&mut self) {
        let next = if self.touched() == 0 { 1 } else { 0 };
        self.set(TOUCHED_KEY, next.to_string());
    }
}

/// Cache of the last-seen toggle and size values for one watched dictionary.
///
/// Change notifications carry no indication of which key changed, so
/// [`watch_attributes`] diffs against this cache. The first notification
/// after spawn only seeds it.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct AttributeWatcher {
    touched: i32,
    size: f32,
    seeded: bool,
}

/// Emitted when the interaction toggle of a watched dictionary flips.
/// `forward` is true when it flipped to 1.
#[derive(Event, Clone, Copy, Debug)]
pub struct SpiralTriggered {
    pub target: Entity,
    pub forward: bool,
}

/// Emitted when the size option of a watched dictionary changes without the
/// toggle changing in the same notification.
#[derive(Event, Clone, Copy, Debug)]
pub struct SizeChanged {
    pub target: Entity,
    pub size: f32,
}

/// Diffs changed dictionaries against their watcher cache and emits at most
/// one event per notification. A toggle change takes priority: if both the
/// toggle and the size differ, only the toggle branch fires and the stale
/// size is picked up by a later notification.
pub fn watch_attributes(
    mut changed: Query<
        (Entity, &DynamicAttributes, &mut AttributeWatcher),
        Changed<DynamicAttributes>,
    >,
    mut spirals: EventWriter<SpiralTriggered>,
    mut sizes: EventWriter<SizeChanged>,
) {
    for (entity, attrs, mut watcher) in &mut changed {
        let touched = attrs.touched();
        let size = attrs.size().unwrap_or(watcher.size);

        if !watcher.seeded {
            watcher.touched = touched;
            watcher.size = size;
            watcher.seeded = true;
            continue;
        }

        if touched != watcher.touched {
            watcher.touched = touched;
            spirals.write(SpiralTriggered {
                target: entity,
                forward: touched == 1,
            });
        } else if size != watcher.size {
            watcher.size = size;
            info!("size changed to {size}");
            sizes.write(SizeChanged {
                target: entity,
                size,
            });
        }
    }
}

/// Logs watched dictionaries that were erased out from under us.
pub fn log_erased(mut removed: RemovedComponents<DynamicAttributes>) {
    for entity in removed.read() {
        debug!("watched entity {entity} erased");
    }
}
