
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::ShortcutKey;
use crate::settings::{Provider, SerializationProvider};


/// literal stored for a shortcut the user explicitly cleared (as opposed to never set)
pub const NONE_LITERAL : &str = "(none)";


/// Conversion between a property's rust value and its stored json form. <br>
/// Deserialization is fail-soft .. anything unparseable reads as `None` so the
/// property falls back to its default instead of erroring out.
pub trait PropertyValue : Clone {
    fn to_stored (&self) -> Value;
    fn from_stored (v: &Value) -> Option<Self>;
}

impl PropertyValue for bool {
    fn to_stored (&self) -> Value { Value::Bool(*self) }
    fn from_stored (v: &Value) -> Option<Self> { v.as_bool() }
}
impl PropertyValue for u32 {
    fn to_stored (&self) -> Value { Value::from(*self) }
    fn from_stored (v: &Value) -> Option<Self> { v.as_u64().and_then (|n| u32::try_from(n).ok()) }
}
impl PropertyValue for i32 {
    fn to_stored (&self) -> Value { Value::from(*self) }
    fn from_stored (v: &Value) -> Option<Self> { v.as_i64().and_then (|n| i32::try_from(n).ok()) }
}
impl PropertyValue for u8 {
    fn to_stored (&self) -> Value { Value::from(*self) }
    fn from_stored (v: &Value) -> Option<Self> { v.as_u64().and_then (|n| u8::try_from(n).ok()) }
}
impl PropertyValue for String {
    fn to_stored (&self) -> Value { Value::String(self.clone()) }
    fn from_stored (v: &Value) -> Option<Self> { v.as_str().map(String::from) }
}

impl PropertyValue for ShortcutKey {
    fn to_stored (&self) -> Value { Value::String (serialize_key_codes (&self.to_codes())) }
    fn from_stored (v: &Value) -> Option<Self> {
        v.as_str() .and_then (deserialize_key_codes) .map (|codes| ShortcutKey::from_codes(&codes))
    }
}


/// empty chord stores as the explicit `(none)` literal, else comma-joined key codes
pub fn serialize_key_codes (codes: &[u32]) -> String {
    use itertools::Itertools;
    if codes.is_empty() { NONE_LITERAL.to_string() }
    else { codes.iter().join(",") }
}

/// blank or malformed text reads as `None` (meaning unset, so defaults apply)
pub fn deserialize_key_codes (text: &str) -> Option<Vec<u32>> {
    let text = text.trim();
    if text.is_empty() { return None }
    if text == NONE_LITERAL { return Some (Vec::new()) }
    text .split(',') .map (|tok| tok.trim().parse::<u32>().ok()) .collect()
}




/// subscriber slot a property fires after its stored value actually changes
pub type PropChangeCallback = Arc <dyn Fn() + Send + Sync + 'static>;


/// A single persisted value under a fixed key, read-through with a default. <br>
/// Writes are change-detected so untouched defaults never clutter the store.
# [ derive (Clone) ]
pub struct SerializableProperty <T: PropertyValue> {
    key      : String,
    provider : Provider,
    default  : T,
    changed  : Arc <RwLock <Option <PropChangeCallback>>>,
}

impl <T: PropertyValue> SerializableProperty<T> {

    pub fn new (key: impl Into<String>, provider: &Provider, default: T) -> SerializableProperty<T> {
        SerializableProperty { key: key.into(), provider: provider.clone(), default, changed: Arc::new (RwLock::new (None)) }
    }

    /// register interest in actual value changes (writes that the change detection lets through)
    pub fn on_change (&self, cb: PropChangeCallback) {
        *self.changed.write().unwrap() = Some(cb);
    }

    pub fn key (&self) -> &str { &self.key }

    pub fn default_value (&self) -> T { self.default.clone() }

    pub fn get (&self) -> T {
        self.provider .try_get (&self.key)
            .and_then (|v| T::from_stored(&v))
            .unwrap_or_else (|| self.default.clone())
    }

    pub fn set (&self, value: T) {
        let stored = value.to_stored();
        if self.get().to_stored() == stored { return }
        self.provider.set (&self.key, stored);
        if let Some(cb) = self.changed.read().unwrap().as_ref() { cb() }
    }

    /// write-through without change detection .. used to stamp over unusable stored data
    pub fn overwrite (&self, value: T) {
        self.provider.set (&self.key, value.to_stored());
    }

    /// drop the backing entry entirely, so reads fall back to the default
    pub fn clear (&self) { self.provider.remove (&self.key); }

    pub fn has_stored_value (&self) -> bool { self.provider.try_get(&self.key).is_some() }

}




/// list-slot property .. a [SerializableProperty] that knows its position
# [ derive (Clone) ]
pub struct IndexedProperty <T: PropertyValue> {
    prop  : SerializableProperty<T>,
    index : usize,
}

impl <T: PropertyValue> IndexedProperty<T> {

    pub fn new (base_key: &str, index: usize, provider: &Provider, default: T) -> IndexedProperty<T> {
        IndexedProperty { prop: SerializableProperty::new (format!("{}[{}]", base_key, index), provider, default), index }
    }

    pub fn index (&self) -> usize { self.index }

    pub fn key (&self) -> &str { self.prop.key() }

    /// one-based display form (desktop 0 shows as "1")
    pub fn number_text (&self) -> String { (self.index + 1).to_string() }

    pub fn get (&self) -> T { self.prop.get() }
    pub fn set (&self, value: T) { self.prop.set(value) }
    pub fn overwrite (&self, value: T) { self.prop.overwrite(value) }
    pub fn clear (&self) { self.prop.clear() }
    pub fn has_stored_value (&self) -> bool { self.prop.has_stored_value() }
    pub fn on_change (&self, cb: PropChangeCallback) { self.prop.on_change(cb) }

}
