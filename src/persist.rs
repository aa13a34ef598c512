use std::fs;
use std::path::Path;

use ron::ser::PrettyConfig;
use thiserror::Error;

use crate::attributes::DynamicAttributes;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("could not access attribute file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed attribute file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("could not encode attributes: {0}")]
    Encode(#[from] ron::Error),
}

/// Encodes a dictionary as RON text.
pub fn to_ron(attrs: &DynamicAttributes) -> Result<String, PersistError> {
    Ok(ron::ser::to_string_pretty(attrs, PrettyConfig::default())?)
}

/// Decodes a dictionary from RON text.
pub fn from_ron(text: &str) -> Result<DynamicAttributes, PersistError> {
    Ok(ron::de::from_str(text)?)
}

/// Writes a dictionary to disk. The dictionary is the only durable state of
/// the system; sessions and their copies are always transient.
pub fn save_attributes(path: impl AsRef<Path>, attrs: &DynamicAttributes) -> Result<(), PersistError> {
    fs::write(path, to_ron(attrs)?)?;
    Ok(())
}

/// Reads a dictionary back from disk.
pub fn load_attributes(path: impl AsRef<Path>) -> Result<DynamicAttributes, PersistError> {
    from_ron(&fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{SIZE_KEY, TOUCHED_KEY};

    #[test]
    fn dictionary_round_trips_through_ron() {
        let mut attrs = DynamicAttributes::new(62.5);
        attrs.interact();

        let restored = from_ron(&to_ron(&attrs).unwrap()).unwrap();
        assert_eq!(restored.get(SIZE_KEY), attrs.get(SIZE_KEY));
        assert_eq!(restored.get(TOUCHED_KEY), Some("1"));
        assert_eq!(restored.size(), Some(62.5));
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert!(matches!(from_ron("(entries:"), Err(PersistError::Parse(_))));
    }
}
