//! [`FieldMap`]: an insertion-ordered map from unique field names to values.

use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered mapping from field name to value.
///
/// Names are unique; [`FieldMap::insert`] on an existing name replaces the value
/// in place. Iteration follows insertion order, so a record that is encrypted
/// and decrypted comes back with its fields in the original order. Serialises
/// as a JSON object; duplicate names are rejected when deserialising.
///
/// Lookups and inserts are hashed, so building or opening a record stays
/// linear in its field count. Equality compares order as well as contents.
#[derive(Debug, Clone)]
pub struct FieldMap<V> {
    entries: IndexMap<String, V>,
}

impl<V> FieldMap<V> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        self.entries.get_mut(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Insert or replace. Returns the previous value when `name` was present;
    /// a replaced field keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(name.into(), value)
    }

    /// Remove a field, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<V> {
        self.entries.shift_remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<V: PartialEq> PartialEq for FieldMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl<V> Default for FieldMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for FieldMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V> IntoIterator for FieldMap<V> {
    type Item = (String, V);
    type IntoIter = indexmap::map::IntoIter<String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V: Serialize> Serialize for FieldMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for FieldMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FieldMapVisitor(PhantomData))
    }
}

struct FieldMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for FieldMapVisitor<V> {
    type Value = FieldMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of uniquely named fields")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = FieldMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, value)) = access.next_entry::<String, V>()? {
            if map.contains_key(&name) {
                return Err(de::Error::custom(format!("duplicate field `{name}`")));
            }
            map.entries.insert(name, value);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let map: FieldMap<i32> = [("z", 1), ("a", 2), ("m", 3)].into_iter().collect();
        assert_eq!(map.names().collect::<Vec<_>>(), ["z", "a", "m"]);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut map: FieldMap<i32> = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(map.insert("a", 10), Some(1));
        assert_eq!(map.len(), 2);
        assert_eq!(map.iter().next(), Some(("a", &10)));
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut map: FieldMap<i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(map.remove("b"), Some(2));
        assert_eq!(map.remove("b"), None);
        assert_eq!(map.names().collect::<Vec<_>>(), ["a", "c"]);
    }

    #[test]
    fn serde_preserves_order() {
        let map: FieldMap<i32> = [("z", 1), ("a", 2)].into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"z":1,"a":2}"#);
        let back: FieldMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn equality_is_order_sensitive() {
        let ab: FieldMap<i32> = [("a", 1), ("b", 2)].into_iter().collect();
        let ba: FieldMap<i32> = [("b", 2), ("a", 1)].into_iter().collect();
        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
    }

    #[test]
    fn wide_map_keeps_order_and_lookups() {
        let n = 50_000;
        let map: FieldMap<usize> = (0..n).map(|i| (format!("f{i}"), i)).collect();
        assert_eq!(map.len(), n);
        assert_eq!(map.get("f49999"), Some(&49_999));
        assert_eq!(map.names().nth(12_345), Some("f12345"));

        let json = serde_json::to_string(&map).unwrap();
        let back: FieldMap<usize> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn deserialize_rejects_duplicates() {
        let result: Result<FieldMap<i32>, _> = serde_json::from_str(r#"{"a":1,"a":2}"#);
        assert!(result.is_err());
    }
}
