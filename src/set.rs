use crate::hasher::{FnStrategy, KeyStrategy, MethodStrategy};

// Bucket count is always a power of two.
static INITIAL_BUCKETS: usize = 8;
// Table doubles once the average chain grows longer than this.
static MAX_LOAD: usize = 4;

/// Hash set with separate chaining, keyed by an injected hash/equality pair
/// instead of the key type's own `Hash`/`Eq`.
///
/// Entries whose hashes collide share a bucket and are told apart by a
/// linear scan with [`KeyStrategy::equals`].
pub struct ChainedSet<K, S = MethodStrategy> {
    bins: Vec<Vec<(u64, K)>>,
    strategy: S,
    count: usize,
}

impl<K> ChainedSet<K, MethodStrategy>
where
    MethodStrategy: KeyStrategy<K>,
{
    pub fn new() -> Self {
        Self::with_strategy(MethodStrategy)
    }
}

impl<K> Default for ChainedSet<K, MethodStrategy>
where
    MethodStrategy: KeyStrategy<K>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, H, E> ChainedSet<K, FnStrategy<H, E>>
where
    H: Fn(&K) -> u64,
    E: Fn(&K, &K) -> bool,
{
    /// Set using `hasher` and `equalser`. They must satisfy
    /// `equalser(a, b) => hasher(a) == hasher(b)`.
    ///
    /// ```
    /// use cse_rust::ChainedSet;
    /// let mut set = ChainedSet::with_funcs(
    ///     |s: &String| s.len() as u64,
    ///     |a: &String, b: &String| a.eq_ignore_ascii_case(b),
    /// );
    /// set.insert("Foo".to_string());
    /// assert!(set.contains(&"fOO".to_string()));
    /// ```
    pub fn with_funcs(hasher: H, equalser: E) -> Self {
        Self::with_strategy(FnStrategy::new(hasher, equalser))
    }
}

impl<K, S: KeyStrategy<K>> ChainedSet<K, S> {
    pub fn with_strategy(strategy: S) -> Self {
        Self {
            bins: (0..INITIAL_BUCKETS).map(|_| Vec::new()).collect(),
            strategy,
            count: 0,
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Inserts `key`, replacing and returning an equal entry if present.
    pub fn insert(&mut self, key: K) -> Option<K> {
        let hash = self.strategy.hash(&key);
        let index = self.bin_index(hash);
        let strategy = &self.strategy;
        let bin = &mut self.bins[index];
        if let Some(entry) = bin
            .iter_mut()
            .find(|(h, k)| *h == hash && strategy.equals(k, &key))
        {
            return Some(std::mem::replace(&mut entry.1, key));
        }
        bin.push((hash, key));
        self.count += 1;
        if self.count > MAX_LOAD * self.bins.len() {
            self.grow();
        }
        None
    }

    pub fn get(&self, key: &K) -> Option<&K> {
        let hash = self.strategy.hash(key);
        self.find_by(hash, |strategy, k| strategy.equals(k, key))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &K) -> Option<K> {
        let hash = self.strategy.hash(key);
        self.remove_by(hash, |strategy, k| strategy.equals(k, key))
    }

    pub fn clear(&mut self) {
        self.bins.iter_mut().for_each(Vec::clear);
        self.count = 0;
    }

    /// Iterates over all keys. Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.bins.iter().flatten().map(|(_, k)| k)
    }

    /// Finds an entry in the bucket of `hash` satisfying `matches`, which
    /// also receives the table's strategy. Lets adapters probe with something
    /// other than a full `K`.
    pub(crate) fn find_by(&self, hash: u64, mut matches: impl FnMut(&S, &K) -> bool) -> Option<&K> {
        let strategy = &self.strategy;
        self.bins[self.bin_index(hash)]
            .iter()
            .find(|(h, k)| *h == hash && matches(strategy, k))
            .map(|(_, k)| k)
    }

    pub(crate) fn find_by_mut(
        &mut self,
        hash: u64,
        mut matches: impl FnMut(&S, &K) -> bool,
    ) -> Option<&mut K> {
        let index = self.bin_index(hash);
        let strategy = &self.strategy;
        self.bins[index]
            .iter_mut()
            .find(|(h, k)| *h == hash && matches(strategy, k))
            .map(|(_, k)| k)
    }

    pub(crate) fn remove_by(
        &mut self,
        hash: u64,
        mut matches: impl FnMut(&S, &K) -> bool,
    ) -> Option<K> {
        let index = self.bin_index(hash);
        let strategy = &self.strategy;
        let pos = self.bins[index]
            .iter()
            .position(|(h, k)| *h == hash && matches(strategy, k))?;
        self.take_at(index, pos)
    }

    fn take_at(&mut self, index: usize, pos: usize) -> Option<K> {
        self.count -= 1;
        Some(self.bins[index].swap_remove(pos).1)
    }

    #[inline]
    fn bin_index(&self, hash: u64) -> usize {
        (hash as usize) & (self.bins.len() - 1)
    }

    fn grow(&mut self) {
        let new_len = self.bins.len() * 2;
        let old = std::mem::replace(&mut self.bins, (0..new_len).map(|_| Vec::new()).collect());
        for (hash, key) in old.into_iter().flatten() {
            let index = self.bin_index(hash);
            self.bins[index].push((hash, key));
        }
    }

    #[cfg(test)]
    pub(crate) fn bucket_count(&self) -> usize {
        self.bins.len()
    }
}
