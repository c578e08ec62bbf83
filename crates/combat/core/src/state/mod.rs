//! Heterogeneous per-action state, keyed by type.
//!
//! Effects communicate through a [`StateStore`]: one effect adds to a counter
//! or multiplier, a later one reads it. Each stored value is keyed by its
//! Rust type, so at most one value of a given type lives in a store, and the
//! whole store can be cloned to give each strike and target a fresh copy.
mod accumulator;
mod catalogue;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

pub use accumulator::{Counter, Factors, Multiplier};
pub use catalogue::*;

/// Anything storable in a [`StateStore`].
///
/// Blanket-implemented for every `Clone + Debug + Send + Sync + 'static` type.
pub trait StateEntry: Any + Send + Sync + fmt::Debug {
    fn clone_entry(&self) -> Box<dyn StateEntry>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T> StateEntry for T
where
    T: Any + Clone + Send + Sync + fmt::Debug,
{
    fn clone_entry(&self) -> Box<dyn StateEntry> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Type-keyed bag of accumulators, flags and records.
#[derive(Debug, Default)]
pub struct StateStore {
    entries: HashMap<TypeId, Box<dyn StateEntry>>,
}

impl Clone for StateStore {
    fn clone(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(key, entry)| (*key, entry.as_ref().clone_entry()))
                .collect(),
        }
    }
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains<T: StateEntry>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    pub fn get<T: StateEntry>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.as_ref().as_any().downcast_ref::<T>())
    }

    pub fn get_mut<T: StateEntry>(&mut self) -> Option<&mut T> {
        self.entries
            .get_mut(&TypeId::of::<T>())
            .and_then(|entry| entry.as_mut().as_any_mut().downcast_mut::<T>())
    }

    /// Returns a copy of the stored value, or `default` when absent.
    pub fn get_or<T: StateEntry + Clone>(&self, default: T) -> T {
        self.get::<T>().cloned().unwrap_or(default)
    }

    /// Mutable access, inserting `T::default()` first when absent.
    pub fn entry<T: StateEntry + Default>(&mut self) -> &mut T {
        let slot = self
            .entries
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(T::default()));
        match slot.as_mut().as_any_mut().downcast_mut::<T>() {
            Some(value) => value,
            None => unreachable!("state entry stored under a foreign type id"),
        }
    }

    /// Inserts or replaces the value of type `T`.
    pub fn set<T: StateEntry>(&mut self, value: T) {
        self.entries.insert(TypeId::of::<T>(), Box::new(value));
    }

    pub fn remove<T: StateEntry>(&mut self) -> Option<T> {
        self.entries
            .remove(&TypeId::of::<T>())
            .and_then(|entry| entry.into_any().downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    // ===== accumulator helpers =====

    /// Adds `delta` to counter `T`, starting from zero.
    pub fn add<T: Counter>(&mut self, delta: i32) {
        let counter = self.entry::<T>();
        let value = counter.value_mut();
        *value = value.saturating_add(delta);
    }

    /// Current value of counter `T`; zero when absent.
    pub fn count<T: Counter>(&self) -> i32 {
        self.get::<T>().map_or(0, Counter::value)
    }

    /// Appends a factor to multiplier `T`.
    pub fn multiply<T: Multiplier>(&mut self, num: i32, den: i32) {
        self.entry::<T>().factors_mut().push(num, den);
    }

    /// Applies every factor of multiplier `T` to `base`, in insertion order.
    pub fn apply<T: Multiplier>(&self, base: i64) -> i64 {
        self.get::<T>().map_or(base, |m| m.factors().apply(base))
    }

    /// True when any factor of multiplier `T` is zero.
    pub fn is_neutralized<T: Multiplier>(&self) -> bool {
        self.get::<T>().is_some_and(|m| m.factors().is_neutralized())
    }
}
