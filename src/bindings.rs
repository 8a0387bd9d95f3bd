//! Persist which signal is bound to which button.
//!
//! The table is stored as a json object keyed by button name:
//!
//! ```json
//! {
//!   "up": {
//!     "signal": "0x20DF02FD",
//!     "timestamp": 1700000000.25
//!   }
//! }
//! ```
//!
//! Every change rewrites the whole file. The new contents are written to a
//! temporary file next to it, which is then renamed over the old one, so the
//! file is either the old or the new table, never a mix.

use crate::{
    buttons::ButtonId,
    signal::{now_seconds, Signal},
    Error,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize, Serializer};
use std::{
    collections::BTreeMap,
    ffi::OsString,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

pub const DEFAULT_BINDINGS: &str = "signal_bindings.json";

/// A signal bound to a button
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Binding {
    pub signal: Signal,
    /// When the binding was made, seconds since the unix epoch
    pub timestamp: f64,
}

/// Bindings in canonical button order
pub type BindingTable = BTreeMap<ButtonId, Binding>;

/// Serialize with button names as keys, in canonical order
struct TableFile<'a>(&'a BindingTable);

impl Serialize for TableFile<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(button, binding)| (button.name(), binding)))
    }
}

fn parse_table(contents: &str) -> Result<BindingTable, String> {
    let entries: BTreeMap<String, Binding> =
        serde_json::from_str(contents).map_err(|e| e.to_string())?;

    entries
        .into_iter()
        .map(|(name, binding)| -> Result<(ButtonId, Binding), String> {
            let button = name.parse::<ButtonId>().map_err(|e| e.to_string())?;

            Ok((button, binding))
        })
        .collect()
}

/// Bindings backed by a json file
#[derive(Debug)]
pub struct BindingStore {
    path: PathBuf,
    table: BindingTable,
}

impl BindingStore {
    /// Load the bindings from the given file. If the file does not exist or
    /// cannot be parsed, the store starts out empty.
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let table = Self::load(&path);

        BindingStore { path, table }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the table from disk. A missing or malformed file is an empty table.
    pub fn load(path: &Path) -> BindingTable {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{}: no bindings yet", path.display());
                return BindingTable::new();
            }
            Err(e) => {
                warn!("{}: {e}, starting without bindings", path.display());
                return BindingTable::new();
            }
        };

        match parse_table(&contents) {
            Ok(table) => {
                debug!("{}: loaded {} bindings", path.display(), table.len());
                table
            }
            Err(e) => {
                warn!(
                    "{}: malformed bindings ({e}), starting without bindings",
                    path.display()
                );
                BindingTable::new()
            }
        }
    }

    /// Replace the file with the given table
    pub fn save(path: &Path, table: &BindingTable) -> Result<(), Error> {
        let mut tmp = OsString::from(path.as_os_str());
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let res = write_table(&tmp, table).and_then(|_| fs::rename(&tmp, path));

        if let Err(e) = res {
            let _ = fs::remove_file(&tmp);

            return Err(Error::PersistenceError(path.to_path_buf(), e));
        }

        Ok(())
    }

    /// Bind the signal to the button, replacing any existing binding. The
    /// binding only takes effect once it has been saved.
    pub fn bind(&mut self, button: ButtonId, signal: Signal) -> Result<(), Error> {
        let mut table = self.table.clone();

        table.insert(
            button,
            Binding {
                signal,
                timestamp: now_seconds(),
            },
        );

        Self::save(&self.path, &table)?;

        info!("bound {signal} to {button}");

        self.table = table;

        Ok(())
    }

    /// Remove the binding for the button. Returns false if there was none.
    pub fn unbind(&mut self, button: ButtonId) -> Result<bool, Error> {
        if !self.table.contains_key(&button) {
            return Ok(false);
        }

        let mut table = self.table.clone();
        table.remove(&button);

        Self::save(&self.path, &table)?;

        info!("unbound {button}");

        self.table = table;

        Ok(true)
    }

    pub fn is_bound(&self, button: ButtonId) -> bool {
        self.table.contains_key(&button)
    }

    pub fn binding(&self, button: ButtonId) -> Option<&Binding> {
        self.table.get(&button)
    }

    /// Copy of the current bindings
    pub fn all_bindings(&self) -> BindingTable {
        self.table.clone()
    }
}

fn write_table(path: &Path, table: &BindingTable) -> io::Result<()> {
    let mut contents = serde_json::to_string_pretty(&TableFile(table))?;
    contents.push('\n');

    let mut file = File::create(path)?;

    file.write_all(contents.as_bytes())?;
    file.sync_all()
}
