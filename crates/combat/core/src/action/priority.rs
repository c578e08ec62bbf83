//! Priority-bucketed effect lists.
use std::collections::BTreeMap;

/// Items bucketed by priority.
///
/// Buckets run in ascending priority; items sharing a priority keep their
/// insertion order. Positions are addressed as `(priority, index)`; the
/// stage dispatcher resumes after the last position it ran, so edits made
/// in between are seen.
#[derive(Clone, Debug, PartialEq)]
pub struct PriorityList<T> {
    buckets: BTreeMap<i32, Vec<T>>,
}

impl<T> Default for PriorityList<T> {
    fn default() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }
}

impl<T> PriorityList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// List holding one item.
    pub fn single(priority: i32, item: T) -> Self {
        let mut list = Self::new();
        list.add(priority, item);
        list
    }

    /// Appends `item` to the end of its priority bucket.
    pub fn add(&mut self, priority: i32, item: T) {
        self.buckets.entry(priority).or_default().push(item);
    }

    /// Builder form of [`PriorityList::add`].
    pub fn with(mut self, priority: i32, item: T) -> Self {
        self.add(priority, item);
        self
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    /// Items in dispatch order with their positions.
    pub fn positions(&self) -> impl Iterator<Item = (i32, usize, &T)> {
        self.buckets.iter().flat_map(|(&priority, bucket)| {
            bucket
                .iter()
                .enumerate()
                .map(move |(index, item)| (priority, index, item))
        })
    }

    /// Items in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &T)> {
        self.positions().map(|(priority, _, item)| (priority, item))
    }
}

impl<T> FromIterator<(i32, T)> for PriorityList<T> {
    fn from_iter<I: IntoIterator<Item = (i32, T)>>(iter: I) -> Self {
        let mut list = Self::new();
        for (priority, item) in iter {
            list.add(priority, item);
        }
        list
    }
}

// Authored as a flat `[(priority, item), ...]` sequence.
#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for PriorityList<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for entry in self.iter() {
            seq.serialize_element(&entry)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for PriorityList<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = Vec::<(i32, T)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
