//! Value-keyed open-addressed hash table with linear probing and
//! tombstone deletion.
//!
//! Key hashing is FNV-1a over a kind tag plus the value's bytes; the
//! probe start index mixes in the context's random seed
//! (`(hash ^ seed) & mask`) to keep externally-supplied keys from
//! lining up into one probe chain. The seed is generated once per
//! context and kept across resizes.
//!
//! Key equality is the language's `==`, which can run user code and
//! therefore error; every operation that compares keys takes the
//! interpreter and aborts on the first error. The probe loop
//! re-borrows the table around each comparison so a `==` handler is
//! free to read the very hash it is being asked about.

use crate::errors::{hash_not_a_number, Control};
use crate::interpreter::Interp;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;
use toe_ir::TokenKind;

/// Minimum (and initial) capacity; always a power of two.
pub const INITIAL_CAPACITY: usize = 16;

/// 64-bit FNV-1a offset basis.
pub const FNV_OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;
/// 64-bit FNV-1a prime.
pub const FNV_PRIME: u64 = 1_099_511_628_211;

/// Hashes handed to user code keep 53 bits so they stay exact in a
/// double; the table keeps all 64 internally.
pub const USER_HASH_MASK: u64 = (1 << 53) - 1;

/// Fold bytes into a running FNV-1a state.
const fn fnv1a_extend(mut state: u64, bytes: &[u8]) -> u64 {
    let mut i = 0;
    while i < bytes.len() {
        state ^= bytes[i] as u64;
        state = state.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    state
}

/// Hash a byte string from the offset basis.
pub const fn fnv1a(bytes: &[u8]) -> u64 {
    fnv1a_extend(FNV_OFFSET_BASIS, bytes)
}

/// Precomputed hashes for the singletons.
pub const NIL_HASH: u64 = fnv1a(b"nil");
pub const TRUE_HASH: u64 = fnv1a(b"true");
pub const FALSE_HASH: u64 = fnv1a(b"false");

/// Hash a number: tag `'N'` plus the IEEE bit pattern, little-endian.
fn hash_number(n: f64) -> u64 {
    fnv1a_extend(fnv1a_extend(FNV_OFFSET_BASIS, b"N"), &n.to_bits().to_le_bytes())
}

/// Hash a string: tag `'S'` plus the bytes.
fn hash_str(s: &str) -> u64 {
    fnv1a_extend(fnv1a_extend(FNV_OFFSET_BASIS, b"S"), s.as_bytes())
}

/// Hash a heap cell by identity: tag `'I'` plus the address bytes.
fn hash_identity(id: usize) -> u64 {
    fnv1a_extend(fnv1a_extend(FNV_OFFSET_BASIS, b"I"), &(id as u64).to_le_bytes())
}

/// Kind-dispatched hashing with no user code involved: singleton
/// constants, tagged number/string bytes (unwrapping subtype
/// payloads), identity for everything else.
pub fn native_hash(interp: &Interp, value: &Value) -> u64 {
    use crate::value::Kind;
    match value {
        Value::Nil => NIL_HASH,
        Value::Bool(true) => TRUE_HASH,
        Value::Bool(false) => FALSE_HASH,
        Value::Number(n) => hash_number(*n),
        Value::Str(s) => hash_str(s),
        other => {
            if let Some(Value::Number(n)) = interp.get_special(other, Kind::Number) {
                hash_number(n)
            } else if let Some(Value::Str(s)) = interp.get_special(other, Kind::String) {
                hash_str(&s)
            } else {
                hash_identity(other.heap_id().unwrap_or(0))
            }
        }
    }
}

/// Hash a key value. Objects dispatch through their `hash` slot (the
/// default builtin computes `native_hash`; user overrides must return
/// a number). Errors from a user `hash` abort the table operation.
pub fn hash_value(interp: &mut Interp, value: &Value) -> Result<u64, Control> {
    Ok(match value {
        Value::Nil => NIL_HASH,
        Value::Bool(true) => TRUE_HASH,
        Value::Bool(false) => FALSE_HASH,
        Value::Number(n) => hash_number(*n),
        Value::Str(s) => hash_str(s),
        Value::Object(_) => {
            if let Some((slot, _)) = interp.find_slot(value, interp.names.hash) {
                let rv = interp.call_value(slot, Some(value.clone()), None, &[])?;
                match rv {
                    Value::Number(n) => n as u64,
                    _ => return Err(hash_not_a_number()),
                }
            } else {
                hash_identity(value.heap_id().unwrap_or(0))
            }
        }
        other => hash_identity(other.heap_id().unwrap_or(0)),
    })
}

/// Truncate an internal hash for user code.
#[inline]
pub fn user_hash(hash: u64) -> f64 {
    (hash & USER_HASH_MASK) as f64
}

/// One slot of the table.
#[derive(Clone, Debug, Default)]
enum Entry {
    /// Never used; terminates any probe chain.
    #[default]
    Empty,
    /// Deleted; probes continue past it, inserts may reuse it.
    Tombstone,
    /// A live key/value pair with its cached hash.
    Live { hash: u64, key: Value, value: Value },
}

/// The table. Lives behind `Rc<RefCell<..>>` inside `Value::Hash`;
/// operations that need key equality are the free functions below.
pub struct HashTable {
    entries: Vec<Entry>,
    seed: u64,
    /// Live entries.
    live: usize,
    /// Live entries plus tombstones (slots that are not `Empty`).
    used: usize,
}

impl HashTable {
    /// Create an empty table probing with the given context seed.
    pub fn new(seed: u64) -> Self {
        HashTable {
            entries: vec![Entry::Empty; INITIAL_CAPACITY],
            seed,
            live: 0,
            used: 0,
        }
    }

    /// Number of live entries.
    #[inline]
    pub fn size(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// The key stored at a raw slot index, if that slot is live.
    /// Iteration walks raw indices so deletes during a walk just skip.
    pub fn key_at(&self, index: usize) -> Option<Value> {
        match self.entries.get(index) {
            Some(Entry::Live { key, .. }) => Some(key.clone()),
            _ => None,
        }
    }

    /// Every live pair in storage order (hash equality and inspect).
    pub fn live_entries(&self) -> Vec<(Value, Value)> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                Entry::Live { key, value, .. } => Some((key.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }

    /// Rebuild at `new_capacity`, dropping tombstones. Uses the cached
    /// hashes and the same seed; keys are already distinct so no
    /// equality calls are needed.
    fn resize(&mut self, new_capacity: usize) {
        tracing::trace!(
            from = self.capacity(),
            to = new_capacity,
            live = self.live,
            "hash table resize"
        );
        let old = std::mem::replace(&mut self.entries, vec![Entry::Empty; new_capacity]);
        self.live = 0;
        self.used = 0;
        let mask = new_capacity - 1;
        for entry in old {
            if let Entry::Live { hash, key, value } = entry {
                let mut idx = ((hash ^ self.seed) as usize) & mask;
                while !matches!(self.entries[idx], Entry::Empty) {
                    idx = (idx + 1) & mask;
                }
                self.entries[idx] = Entry::Live { hash, key, value };
                self.live += 1;
                self.used += 1;
            }
        }
    }
}

/// Outcome of a probe for a key.
enum Find {
    /// The key is present at this slot.
    Found(usize),
    /// Not present; inserting should use this slot (first tombstone on
    /// the chain, else the terminating empty slot). `None` only when
    /// the table has no usable slot left, which insert resolves by
    /// growing first.
    Missing(Option<usize>),
}

/// Probe for `key`. Each step snapshots one entry and releases the
/// borrow before any equality dispatch.
fn find(
    interp: &mut Interp,
    table: &Rc<RefCell<HashTable>>,
    key: &Value,
    hash: u64,
) -> Result<Find, Control> {
    enum Probe {
        Empty,
        Tombstone,
        Skip,
        Candidate(Value),
    }

    let (capacity, seed) = {
        let t = table.borrow();
        (t.capacity(), t.seed)
    };
    let mask = capacity - 1;
    let start = ((hash ^ seed) as usize) & mask;
    let mut first_tombstone = None;

    for i in 0..capacity {
        let idx = (start + i) & mask;
        let probe = {
            let t = table.borrow();
            match &t.entries[idx] {
                Entry::Empty => Probe::Empty,
                Entry::Tombstone => Probe::Tombstone,
                Entry::Live { hash: h, key: k, .. } => {
                    if *h == hash {
                        Probe::Candidate(k.clone())
                    } else {
                        Probe::Skip
                    }
                }
            }
        };
        match probe {
            Probe::Empty => return Ok(Find::Missing(Some(first_tombstone.unwrap_or(idx)))),
            Probe::Tombstone => {
                first_tombstone.get_or_insert(idx);
            }
            Probe::Skip => {}
            Probe::Candidate(candidate) => {
                if Value::identical(&candidate, key) {
                    return Ok(Find::Found(idx));
                }
                let eq = interp.binary(TokenKind::EqEq, candidate, key.clone())?;
                if eq.is_truthy() {
                    return Ok(Find::Found(idx));
                }
            }
        }
    }
    Ok(Find::Missing(first_tombstone))
}

/// Insert or update a key. Grows at a live-load of 3/4.
pub fn insert(
    interp: &mut Interp,
    table: &Rc<RefCell<HashTable>>,
    key: Value,
    value: Value,
) -> Result<(), Control> {
    let hash = hash_value(interp, &key)?;
    match find(interp, table, &key, hash)? {
        Find::Found(idx) => {
            let mut t = table.borrow_mut();
            t.entries[idx] = Entry::Live { hash, key, value };
        }
        Find::Missing(Some(idx)) => {
            let mut t = table.borrow_mut();
            let was_empty = matches!(t.entries[idx], Entry::Empty);
            t.entries[idx] = Entry::Live { hash, key, value };
            t.live += 1;
            if was_empty {
                t.used += 1;
            }
            if t.live * 4 >= t.capacity() * 3 {
                let target = t.capacity() * 2;
                t.resize(target);
            }
        }
        Find::Missing(None) => {
            // No empty slot and no tombstone on the chain: make room
            // and retry. The retry cannot land here again.
            {
                let mut t = table.borrow_mut();
                let target = t.capacity() * 2;
                t.resize(target);
            }
            return insert(interp, table, key, value);
        }
    }
    Ok(())
}

/// Look up a key; `Ok(None)` when absent.
pub fn get(
    interp: &mut Interp,
    table: &Rc<RefCell<HashTable>>,
    key: &Value,
) -> Result<Option<Value>, Control> {
    let hash = hash_value(interp, key)?;
    match find(interp, table, key, hash)? {
        Find::Found(idx) => {
            let t = table.borrow();
            match &t.entries[idx] {
                Entry::Live { value, .. } => Ok(Some(value.clone())),
                _ => Ok(None),
            }
        }
        Find::Missing(_) => Ok(None),
    }
}

/// Delete a key, returning whether it was present. Shrinks at a
/// live-load of 1/10, never below the initial capacity.
pub fn remove(
    interp: &mut Interp,
    table: &Rc<RefCell<HashTable>>,
    key: &Value,
) -> Result<bool, Control> {
    let hash = hash_value(interp, key)?;
    match find(interp, table, key, hash)? {
        Find::Found(idx) => {
            let mut t = table.borrow_mut();
            t.entries[idx] = Entry::Tombstone;
            t.live -= 1;
            if t.capacity() > INITIAL_CAPACITY && t.live * 10 <= t.capacity() {
                let target = (t.capacity() / 2).max(INITIAL_CAPACITY);
                t.resize(target);
            }
            Ok(true)
        }
        Find::Missing(_) => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv_vector() {
        // Standard FNV-1a test vector.
        assert_eq!(fnv1a(b""), FNV_OFFSET_BASIS);
        assert_eq!(fnv1a(b"a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn test_singleton_hashes_distinct() {
        assert_ne!(NIL_HASH, TRUE_HASH);
        assert_ne!(TRUE_HASH, FALSE_HASH);
        assert_ne!(NIL_HASH, FALSE_HASH);
    }

    #[test]
    fn test_number_and_string_tags_disambiguate() {
        // A number must never collide with the string of its bytes by
        // construction of the tags.
        assert_ne!(hash_number(0.0), hash_str(""));
        assert_ne!(hash_number(1.0), hash_number(2.0));
        assert_ne!(hash_str("a"), hash_str("b"));
    }

    #[test]
    fn test_user_hash_fits_in_53_bits() {
        let h = user_hash(u64::MAX);
        assert!(h <= USER_HASH_MASK as f64);
        // Exactly representable: converting back is lossless.
        assert_eq!(h as u64, USER_HASH_MASK);
    }

    #[test]
    fn test_new_table_shape() {
        let t = HashTable::new(0xdead_beef);
        assert_eq!(t.capacity(), INITIAL_CAPACITY);
        assert_eq!(t.size(), 0);
    }
}
