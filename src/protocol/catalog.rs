//! # Command Catalog
//!
//! Static table mapping command keys to SDCP command codes and default payloads.
//!
//! ## Source Format
//!
//! ```json
//! {
//!     "128": {
//!         "code": 128,
//!         "data": {"Filename": "", "StartLayer": 0},
//!         "description": "Start printing a file",
//!         "requires_parameter": "filename"
//!     }
//! }
//! ```
//!
//! `requires_parameter` names the payload field a caller-supplied parameter
//! fills in. The special marker `filename` targets `Filename` and expands the
//! parameter into a path on the printer's local storage.
//!
//! ## Usage
//!
//! ```
//! use centauri::protocol::CommandCatalog;
//!
//! let catalog = CommandCatalog::builtin()?;
//! let start = catalog.lookup("128")?;
//! let payload = start.payload(Some("benchy"));
//! assert_eq!(payload["Filename"], "/local/benchy.gcode");
//! # Ok::<(), centauri::CentauriError>(())
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{CentauriError, LoadError};

/// Catalog compiled into the binary
const BUILTIN_CATALOG: &str = include_str!("commands.json");

/// Storage prefix for print files on the printer
pub const LOCAL_STORAGE_PREFIX: &str = "/local/";

/// Extension appended to print file names
pub const GCODE_EXTENSION: &str = ".gcode";

/// Marker value selecting [`ParameterSlot::Filename`]
const FILENAME_MARKER: &str = "filename";

/// Which payload field receives the caller's parameter, and how it is shaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParameterSlot {
    /// `Filename`, expanded to `/local/<name>.gcode`
    Filename,
    /// Any other field, set to the parameter verbatim
    Field(String),
}

impl ParameterSlot {
    /// Name of the payload field this slot populates
    pub fn field(&self) -> &str {
        match self {
            Self::Filename => "Filename",
            Self::Field(name) => name,
        }
    }

    /// Shape a raw parameter into the value stored in the payload
    pub fn normalize(&self, parameter: &str) -> Value {
        match self {
            Self::Filename => Value::String(format!(
                "{}{}{}",
                LOCAL_STORAGE_PREFIX, parameter, GCODE_EXTENSION
            )),
            Self::Field(_) => Value::String(parameter.to_string()),
        }
    }
}

impl From<String> for ParameterSlot {
    fn from(marker: String) -> Self {
        if marker.eq_ignore_ascii_case(FILENAME_MARKER) {
            Self::Filename
        } else {
            Self::Field(marker)
        }
    }
}

impl From<ParameterSlot> for String {
    fn from(slot: ParameterSlot) -> Self {
        match slot {
            ParameterSlot::Filename => FILENAME_MARKER.to_string(),
            ParameterSlot::Field(name) => name,
        }
    }
}

/// One entry of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDefinition {
    /// SDCP command code (`Cmd` on the wire)
    pub code: u32,

    /// Default payload, copied into every request
    #[serde(default)]
    pub data: Map<String, Value>,

    /// Human-readable text for listings
    #[serde(default)]
    pub description: String,

    /// Optional parameter slot
    #[serde(
        default,
        rename = "requires_parameter",
        skip_serializing_if = "Option::is_none"
    )]
    pub parameter: Option<ParameterSlot>,
}

impl CommandDefinition {
    pub fn new(code: u32, description: impl Into<String>) -> Self {
        Self {
            code,
            data: Map::new(),
            description: description.into(),
            parameter: None,
        }
    }

    /// Set the default payload (builder style)
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Declare a parameter slot (builder style)
    pub fn with_parameter(mut self, slot: ParameterSlot) -> Self {
        self.parameter = Some(slot);
        self
    }

    /// Build the request payload for this command.
    ///
    /// The default data is cloned. When the command declares a slot and a
    /// parameter is given, the slot is set to the normalized parameter.
    /// A missing parameter leaves the defaults untouched.
    pub fn payload(&self, parameter: Option<&str>) -> Map<String, Value> {
        let mut data = self.data.clone();
        if let (Some(slot), Some(param)) = (&self.parameter, parameter) {
            data.insert(slot.field().to_string(), slot.normalize(param));
        }
        data
    }
}

/// Read-only lookup table of printer commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandCatalog {
    commands: BTreeMap<String, CommandDefinition>,
}

impl CommandCatalog {
    /// Build a catalog from in-memory definitions
    pub fn from_definitions<I, K>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (K, CommandDefinition)>,
        K: Into<String>,
    {
        Self {
            commands: definitions
                .into_iter()
                .map(|(key, def)| (key.into(), def))
                .collect(),
        }
    }

    /// The catalog shipped with the binary
    pub fn builtin() -> Result<Self, CentauriError> {
        Self::parse(BUILTIN_CATALOG, PathBuf::from("<builtin commands.json>"))
    }

    /// Load a catalog from a JSON file.
    ///
    /// ## Errors
    ///
    /// [`CentauriError::CatalogLoad`] with [`LoadError::NotFound`] if the file
    /// is missing, [`LoadError::Malformed`] if it doesn't parse.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CentauriError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| CentauriError::CatalogLoad(LoadError::from_io(path.to_path_buf(), e)))?;
        let catalog = Self::parse(&text, path.to_path_buf())?;
        log::debug!(
            "Loaded {} commands from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parse catalog JSON. A key appearing twice is rejected as malformed.
    fn parse(text: &str, origin: PathBuf) -> Result<Self, CentauriError> {
        let UniqueCommands(commands) = serde_json::from_str(text).map_err(|e| {
            CentauriError::CatalogLoad(LoadError::Malformed {
                path: origin,
                message: e.to_string(),
            })
        })?;
        Ok(Self { commands })
    }

    /// Look up a command, `None` if the key is unknown
    pub fn get(&self, key: &str) -> Option<&CommandDefinition> {
        self.commands.get(key)
    }

    /// Look up a command, failing with [`CentauriError::UnknownCommand`]
    pub fn lookup(&self, key: &str) -> Result<&CommandDefinition, CentauriError> {
        self.get(key)
            .ok_or_else(|| CentauriError::UnknownCommand(key.to_string()))
    }

    /// All `(key, description)` pairs.
    ///
    /// Numeric keys come first in numeric order, then any other keys
    /// alphabetically.
    pub fn list_all(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .commands
            .iter()
            .map(|(key, def)| (key.as_str(), def.description.as_str()))
            .collect();
        entries.sort_by(|(a, _), (b, _)| compare_keys(a, b));
        entries
    }

    /// All keys in listing order
    pub fn keys(&self) -> Vec<&str> {
        self.list_all().into_iter().map(|(key, _)| key).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Catalog object that fails to deserialize when a key repeats
struct UniqueCommands(BTreeMap<String, CommandDefinition>);

impl<'de> Deserialize<'de> for UniqueCommands {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CommandsVisitor;

        impl<'de> Visitor<'de> for CommandsVisitor {
            type Value = UniqueCommands;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of command definitions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut commands = BTreeMap::new();
                while let Some((key, definition)) =
                    map.next_entry::<String, CommandDefinition>()?
                {
                    if commands.contains_key(&key) {
                        return Err(de::Error::custom(format!("duplicate command key '{}'", key)));
                    }
                    commands.insert(key, definition);
                }
                Ok(UniqueCommands(commands))
            }
        }

        deserializer.deserialize_map(CommandsVisitor)
    }
}

fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

// ============================================================================
// TESTS
// ============================================================================
