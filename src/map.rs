use crate::{
    hasher::{FnStrategy, KeyStrategy, MethodStrategy},
    set::ChainedSet,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue<K, V> {
    pub key: K,
    pub value: V,
}

/// Lifts a strategy over `K` to one over `KeyValue<K, V>` that only looks at
/// the key.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyProjection<S>(pub S);

impl<K, V, S: KeyStrategy<K>> KeyStrategy<KeyValue<K, V>> for KeyProjection<S> {
    fn hash(&self, kv: &KeyValue<K, V>) -> u64 {
        self.0.hash(&kv.key)
    }

    fn equals(&self, a: &KeyValue<K, V>, b: &KeyValue<K, V>) -> bool {
        self.0.equals(&a.key, &b.key)
    }
}

/// Hash map stored as a [`ChainedSet`] of key-value pairs.
///
/// ```
/// use cse_rust::{ChainedMap, Expr};
/// let mut map = ChainedMap::new();
/// let key = || Expr::application("f", Expr::variable("x").unwrap(), Expr::variable("x").unwrap());
/// map.insert(key().unwrap(), 1);
/// assert_eq!(map.get(&key().unwrap()), Some(&1));
/// ```
pub struct ChainedMap<K, V, S = MethodStrategy> {
    set: ChainedSet<KeyValue<K, V>, KeyProjection<S>>,
}

impl<K, V> ChainedMap<K, V, MethodStrategy>
where
    MethodStrategy: KeyStrategy<K>,
{
    pub fn new() -> Self {
        Self::with_strategy(MethodStrategy)
    }
}

impl<K, V> Default for ChainedMap<K, V, MethodStrategy>
where
    MethodStrategy: KeyStrategy<K>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H, E> ChainedMap<K, V, FnStrategy<H, E>>
where
    H: Fn(&K) -> u64,
    E: Fn(&K, &K) -> bool,
{
    pub fn with_funcs(hasher: H, equalser: E) -> Self {
        Self::with_strategy(FnStrategy::new(hasher, equalser))
    }
}

impl<K, V, S: KeyStrategy<K>> ChainedMap<K, V, S> {
    pub fn with_strategy(strategy: S) -> Self {
        Self {
            set: ChainedSet::with_strategy(KeyProjection(strategy)),
        }
    }

    fn key_strategy(&self) -> &S {
        &self.set.strategy().0
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Inserts or updates. Returns the previous value for an equal key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.set
            .insert(KeyValue { key, value })
            .map(|old| old.value)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.key_strategy().hash(key);
        self.set
            .find_by(hash, |s, kv| s.0.equals(&kv.key, key))
            .map(|kv| &kv.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.key_strategy().hash(key);
        self.set
            .find_by_mut(hash, |s, kv| s.0.equals(&kv.key, key))
            .map(|kv| &mut kv.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let hash = self.key_strategy().hash(key);
        self.set
            .remove_by(hash, |s, kv| s.0.equals(&kv.key, key))
            .map(|kv| kv.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.set.iter().map(|kv| &kv.key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.set.iter().map(|kv| &kv.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.set.iter().map(|kv| (&kv.key, &kv.value))
    }
}
