
use std::sync::RwLock;

use serde_json::Value;

use crate::settings::{IndexedProperty, Provider, PropertyValue, SerializationProvider};


/// Persisted growable list of [IndexedProperty] slots under a shared base key. <br>
/// Slots live at `base[i]` and the length is recorded at `base#Count` so empty
/// trailing slots survive a reload. The element default and the notion of an
/// "empty" slot are injected, so one engine serves names, paths and chords alike.
pub struct PropertyList <T: PropertyValue> {
    base_key : String,
    provider : Provider,
    default  : T,
    is_empty : fn (&T) -> bool,
    slots    : RwLock <Vec <IndexedProperty<T>>>,
}

impl <T: PropertyValue> PropertyList<T> {

    pub fn new (base_key: impl Into<String>, provider: &Provider, default: T, is_empty: fn(&T)->bool) -> PropertyList<T> {
        let base_key = base_key.into();
        let count = provider .try_get (&format!("{}#Count", base_key))
            .and_then (|v| v.as_u64()) .unwrap_or(0) as usize;
        let mut slots = Vec::new();
        // probe while slots exist in the store OR the count record says there were more ..
        // this picks up sparse stores (defaults in the gaps) without losing trailing slots
        let mut i = 0;
        while provider.try_get (&format!("{}[{}]", base_key, i)) .is_some() || i < count {
            slots.push (IndexedProperty::new (&base_key, i, provider, default.clone()));
            i += 1;
        }
        let list = PropertyList { base_key, provider: provider.clone(), default, is_empty, slots: RwLock::new(slots) };
        // a never-used list leaves no trace in the store .. the count record appears
        // once something loads (or the list gets resized)
        if list.len() > 0 { list.record_count() }
        list
    }

    fn count_key (&self) -> String { format! ("{}#Count", self.base_key) }

    fn record_count (&self) {
        let len = self.len() as u64;
        if self.provider.try_get (&self.count_key()) != Some (Value::from(len)) {
            self.provider.set (&self.count_key(), Value::from(len));
        }
    }

    pub fn len (&self) -> usize { self.slots.read().unwrap().len() }

    pub fn slot (&self, index: usize) -> Option <IndexedProperty<T>> {
        self.slots.read().unwrap().get(index).cloned()
    }

    pub fn value (&self, index: usize) -> Option<T> {
        self.slot(index) .map (|s| s.get())
    }

    pub fn set_value (&self, index: usize, value: T) {
        if let Some(slot) = self.slot(index) { slot.set(value) }
    }

    pub fn values (&self) -> Vec<T> {
        self.slots.read().unwrap().iter().map(|s| s.get()).collect()
    }

    fn last_non_empty (&self) -> Option<usize> {
        let pred = self.is_empty;
        self.slots.read().unwrap().iter().rposition (|s| ! pred (&s.get()))
    }

    /// grow with default slots or shrink .. shrinking deletes the dropped backing entries
    pub fn resize (&self, new_len: usize) {
        {
            let mut slots = self.slots.write().unwrap();
            while slots.len() < new_len {
                let i = slots.len();
                slots.push (IndexedProperty::new (&self.base_key, i, &self.provider, self.default.clone()));
            }
            while slots.len() > new_len {
                if let Some(s) = slots.pop() { s.clear() }
            }
        }
        self.record_count();
    }

    /// resize to `new_len`, but never below where user data still sits
    pub fn resize_if_empty (&self, new_len: usize) {
        let floor = self.last_non_empty() .map (|i| i + 1) .unwrap_or(0);
        self.resize (new_len.max(floor));
    }

    /// grow-only resize
    pub fn stretch_to (&self, new_len: usize) {
        if new_len > self.len() { self.resize(new_len) }
    }

    /// move the value at `from` to position `to`, shifting the values between .. slot
    /// identities stay put, only values travel
    pub fn move_value (&self, from: usize, to: usize) {
        let len = self.len();
        if from >= len || to >= len || from == to { return }
        let mut vals = self.values();
        let v = vals.remove(from);
        vals.insert (to, v);
        let slots = self.slots.read().unwrap();
        for (slot, val) in slots.iter().zip(vals) { slot.set(val) }
    }

    /// drop the value at `index` and compact the tail up by one slot
    pub fn remove_value_at (&self, index: usize) {
        let len = self.len();
        if index >= len { return }
        {
            let slots = self.slots.read().unwrap();
            for i in index .. len-1 {
                let next = slots[i+1].get();
                slots[i].set(next);
            }
        }
        self.resize (len - 1);
    }

}
