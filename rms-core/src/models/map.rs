use std::hash::Hash;

/// Named entries kept in the order they were given.
///
/// Batches of scenarios are keyed by a caller-chosen name and reported back in
/// input order, so this wraps an [`indexmap::IndexMap`]. Names are unique: a
/// document that repeats a name is rejected when deserialized rather than
/// letting the later scenario silently replace the earlier one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct Map<K: Eq + Hash, V>(indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>);

impl<K: Eq + Hash, V> Default for Map<K, V> {
    fn default() -> Self {
        Self(indexmap::IndexMap::default())
    }
}

impl<K: Eq + Hash, V> std::ops::Deref for Map<K, V> {
    type Target = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<K: Eq + Hash, V> std::ops::DerefMut for Map<K, V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<K: Eq + Hash, V> IntoIterator for Map<K, V> {
    type Item = (K, V);
    type IntoIter = indexmap::map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Later entries win, as with [`indexmap::IndexMap::insert`]
impl<K: Eq + Hash, V> FromIterator<(K, V)> for Map<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(indexmap::IndexMap::from_iter(iter))
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for Map<K, V>
where
    K: Eq + Hash + serde::Deserialize<'de>,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct UniqueKeys<K, V>(std::marker::PhantomData<(K, V)>);

        impl<'de, K, V> serde::de::Visitor<'de> for UniqueKeys<K, V>
        where
            K: Eq + Hash + serde::Deserialize<'de>,
            V: serde::Deserialize<'de>,
        {
            type Value = Map<K, V>;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a map with unique keys")
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                // an untrusted size hint should not drive the allocation
                let capacity = access.size_hint().unwrap_or(0).min(4096);
                let mut map = indexmap::IndexMap::with_capacity_and_hasher(capacity, Default::default());

                while let Some((key, value)) = access.next_entry()? {
                    let index = map.len();
                    if map.insert(key, value).is_some() {
                        return Err(serde::de::Error::custom(format_args!(
                            "duplicate key at entry {index}"
                        )));
                    }
                }
                Ok(Map(map))
            }
        }

        deserializer.deserialize_map(UniqueKeys(std::marker::PhantomData))
    }
}
