
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::shortcuts::Flag;


# [ derive (Debug, thiserror::Error) ]
pub enum SettingsError {
    #[error ("settings io failure: {0}")]
    Io (#[from] std::io::Error),
    #[error ("settings serialization failure: {0}")]
    Serde (#[from] serde_json::Error),
    #[error ("no writable config directory on this system")]
    NoConfigDir,
}


/// Backing store for persisted properties .. a flat string-keyed bag of json values. <br>
/// Keys are `Category.Property` (scalars), `Category.Property[i]` (list slots), and
/// `Category.Property#Count` (list length records).
pub trait SerializationProvider : Send + Sync {

    fn is_loaded (&self) -> bool;

    /// (re)load from the backing store .. missing or unreadable stores yield an empty bag
    fn load (&self);

    fn save (&self) -> Result<(), SettingsError>;

    fn try_get (&self, key:&str) -> Option<Value>;

    fn set (&self, key:&str, value:Value);

    /// returns whether the key was present
    fn remove (&self, key:&str) -> bool;

}

pub type Provider = Arc <dyn SerializationProvider>;




/// file-backed provider persisting the bag as a single json object
pub struct JsonFileProvider {
    path   : PathBuf,
    store  : RwLock <BTreeMap <String, Value>>,
    loaded : Flag,
}

impl JsonFileProvider {

    pub fn new (path: PathBuf) -> JsonFileProvider {
        JsonFileProvider { path, store: RwLock::new(BTreeMap::new()), loaded: Flag::default() }
    }

    /// provider at the default per-user location (`<config-dir>/deskshift/settings.json`)
    pub fn at_default_location () -> Result <JsonFileProvider, SettingsError> {
        let dir = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok ( JsonFileProvider::new (dir.join("deskshift").join("settings.json")) )
    }

    fn ensure_loaded (&self) { if self.loaded.is_clear() { self.load() } }
}

impl SerializationProvider for JsonFileProvider {

    fn is_loaded (&self) -> bool { self.loaded.is_set() }

    fn load (&self) {
        let parsed = fs::read_to_string(&self.path) .ok()
            .and_then (|text| serde_json::from_str::<BTreeMap<String,Value>>(&text) .ok());
        match parsed {
            Some (map) => {
                log::info! ("loaded {} settings entries from {:?}", map.len(), self.path);
                *self.store.write().unwrap() = map;
            }
            None => {
                // missing on first run, or unreadable .. either way we start fresh
                log::warn! ("no usable settings at {:?}, starting with defaults", self.path);
                self.store.write().unwrap().clear();
            }
        }
        self.loaded.set();
    }

    fn save (&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() { fs::create_dir_all(parent)?; }
        let text = serde_json::to_string_pretty (&*self.store.read().unwrap())?;
        fs::write (&self.path, text)?;
        Ok(())
    }

    fn try_get (&self, key:&str) -> Option<Value> {
        self.ensure_loaded();
        self.store.read().unwrap().get(key).cloned()
    }

    fn set (&self, key:&str, value:Value) {
        self.ensure_loaded();
        self.store.write().unwrap().insert (key.to_string(), value);
    }

    fn remove (&self, key:&str) -> bool {
        self.ensure_loaded();
        self.store.write().unwrap().remove(key).is_some()
    }

}




/// in-memory provider, mostly useful in tests
# [ derive (Default) ]
pub struct InMemoryProvider {
    store : RwLock <BTreeMap <String, Value>>,
}

impl InMemoryProvider {
    pub fn new_provider () -> Provider { Arc::new (InMemoryProvider::default()) }
}

impl SerializationProvider for InMemoryProvider {
    fn is_loaded (&self) -> bool { true }
    fn load (&self) { }
    fn save (&self) -> Result<(), SettingsError> { Ok(()) }
    fn try_get (&self, key:&str) -> Option<Value> { self.store.read().unwrap().get(key).cloned() }
    fn set (&self, key:&str, value:Value) { self.store.write().unwrap().insert (key.to_string(), value); }
    fn remove (&self, key:&str) -> bool { self.store.write().unwrap().remove(key).is_some() }
}
