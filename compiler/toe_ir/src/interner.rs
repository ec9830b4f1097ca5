//! String interner for identifier and string-literal storage.
//!
//! Interned strings are leaked to obtain `'static` lifetimes, so
//! `lookup()` hands out `&'static str` without copying. The interner
//! lives for the whole process anyway (REPL sessions keep one around),
//! so the leak is the allocation strategy, not an accident.

use crate::Name;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Single-threaded string interner.
///
/// Interning the same string twice returns the same `Name`. The empty
/// string is pre-interned as `Name::EMPTY`.
pub struct StringInterner {
    inner: RefCell<Inner>,
}

struct Inner {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name::raw()`.
    strings: Vec<&'static str>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned.
    pub fn new() -> Self {
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, 0);
        StringInterner {
            inner: RefCell::new(Inner {
                map,
                strings: vec![empty],
            }),
        }
    }

    /// Intern a string, returning its `Name`.
    pub fn intern(&self, s: &str) -> Name {
        let mut inner = self.inner.borrow_mut();
        if let Some(&idx) = inner.map.get(s) {
            return Name::from_raw(idx);
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let idx = u32::try_from(inner.strings.len()).unwrap_or_else(|_| {
            panic!("interner exceeded capacity: {} strings", inner.strings.len())
        });
        inner.strings.push(leaked);
        inner.map.insert(leaked, idx);
        Name::from_raw(idx)
    }

    /// Intern an owned string, avoiding a copy when it is new.
    pub fn intern_owned(&self, s: String) -> Name {
        let mut inner = self.inner.borrow_mut();
        if let Some(&idx) = inner.map.get(s.as_str()) {
            return Name::from_raw(idx);
        }
        let leaked: &'static str = Box::leak(s.into_boxed_str());
        let idx = u32::try_from(inner.strings.len()).unwrap_or_else(|_| {
            panic!("interner exceeded capacity: {} strings", inner.strings.len())
        });
        inner.strings.push(leaked);
        inner.map.insert(leaked, idx);
        Name::from_raw(idx)
    }

    /// Look up the string for a `Name`.
    ///
    /// # Panics
    /// Panics if the name did not come from this interner.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.inner.borrow().strings[name.raw() as usize]
    }

    /// Number of interned strings (including the empty string).
    pub fn len(&self) -> usize {
        self.inner.borrow().strings.len()
    }

    /// True if only the empty string is interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringInterner({} strings)", self.len())
    }
}

/// Reference-counted interner handle, cloned into every pipeline phase.
#[derive(Clone, Debug, Default)]
pub struct SharedInterner(Rc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        SharedInterner(Rc::new(StringInterner::new()))
    }
}

impl Deref for SharedInterner {
    type Target = StringInterner;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedup() {
        let interner = StringInterner::new();
        let a = interner.intern("hello");
        let b = interner.intern("hello");
        let c = interner.intern("world");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_lookup_roundtrip() {
        let interner = StringInterner::new();
        let name = interner.intern("slot_name");
        assert_eq!(interner.lookup(name), "slot_name");
    }

    #[test]
    fn test_empty_pre_interned() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), "");
    }

    #[test]
    fn test_shared_interner_clones_share() {
        let a = SharedInterner::new();
        let b = a.clone();
        let name = a.intern("shared");
        assert_eq!(b.lookup(name), "shared");
    }
}
