/// Value-based hash and equality for recursively defined keys.
///
/// Implementors must guarantee `a.structural_eq(b)` implies
/// `a.structural_hash() == b.structural_hash()`.
pub trait Structural {
    fn structural_hash(&self) -> u64;
    fn structural_eq(&self, other: &Self) -> bool;
}

impl<T: Structural + ?Sized> Structural for &T {
    fn structural_hash(&self) -> u64 {
        (**self).structural_hash()
    }

    fn structural_eq(&self, other: &Self) -> bool {
        (**self).structural_eq(*other)
    }
}

/// Hash/equality pair injected into a chained table.
pub trait KeyStrategy<K: ?Sized> {
    fn hash(&self, key: &K) -> u64;
    fn equals(&self, a: &K, b: &K) -> bool;
}

/// Uses the key's own [`Structural`] implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct MethodStrategy;

impl<K: Structural + ?Sized> KeyStrategy<K> for MethodStrategy {
    fn hash(&self, key: &K) -> u64 {
        key.structural_hash()
    }

    fn equals(&self, a: &K, b: &K) -> bool {
        a.structural_eq(b)
    }
}

/// Arbitrary hash and equality functions.
#[derive(Clone, Copy)]
pub struct FnStrategy<H, E> {
    hasher: H,
    equalser: E,
}

impl<H, E> FnStrategy<H, E> {
    pub fn new(hasher: H, equalser: E) -> Self {
        Self { hasher, equalser }
    }
}

impl<K: ?Sized, H, E> KeyStrategy<K> for FnStrategy<H, E>
where
    H: Fn(&K) -> u64,
    E: Fn(&K, &K) -> bool,
{
    fn hash(&self, key: &K) -> u64 {
        (self.hasher)(key)
    }

    fn equals(&self, a: &K, b: &K) -> bool {
        (self.equalser)(a, b)
    }
}
