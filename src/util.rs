// Per-variant seeds, so that e.g. variable "a" and slot 97 never share a prefix.
pub(crate) const TAG_VARIABLE: u64 = 0x9e37_79b9_7f4a_7c15;
pub(crate) const TAG_APPLICATION: u64 = 0xc2b2_ae3d_27d4_eb4f;
pub(crate) const TAG_REFERENCE: u64 = 0x1656_67b1_9e37_79f9;

static FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
static FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
static FOLD_MULTIPLIER: u64 = 0x517c_c1b7_2722_0a95;

/// FNV-1a over raw bytes.
pub(crate) fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Folds `value` into `acc`. Not commutative: `fold(fold(s, a), b)` and
/// `fold(fold(s, b), a)` differ for `a != b`.
#[inline]
pub(crate) fn fold(acc: u64, value: u64) -> u64 {
    (acc.rotate_left(5) ^ value).wrapping_mul(FOLD_MULTIPLIER)
}

/// splitmix64 finalizer, spreads entropy into the low bits used for bucket
/// indexing.
#[inline]
pub(crate) fn finish(mut hash: u64) -> u64 {
    hash ^= hash >> 30;
    hash = hash.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    hash ^= hash >> 27;
    hash = hash.wrapping_mul(0x94d0_49bb_1331_11eb);
    hash ^ (hash >> 31)
}
