//! Lexical environments.
//!
//! A chain of frames behind `Rc<RefCell<..>>`. Closures keep their
//! defining frame alive by holding an `EnvRef`; block and call frames
//! are pushed on entry and dropped on exit.
//!
//! The resolver guarantees that every variable reference carries the
//! distance to its defining frame, so lookups are `ancestor(d)` hops
//! followed by a single map probe: never a dynamic search up the
//! chain.

use crate::value::Value;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use toe_ir::Name;

struct Frame {
    vars: FxHashMap<Name, Value>,
    outer: Option<EnvRef>,
}

/// A shared handle to one environment frame.
#[derive(Clone)]
pub struct EnvRef(Rc<RefCell<Frame>>);

impl EnvRef {
    /// Create a root frame with no outer link.
    pub fn root() -> Self {
        EnvRef(Rc::new(RefCell::new(Frame {
            vars: FxHashMap::default(),
            outer: None,
        })))
    }

    /// Create a new empty frame whose outer link is `outer`.
    pub fn push(outer: &EnvRef) -> Self {
        EnvRef(Rc::new(RefCell::new(Frame {
            vars: FxHashMap::default(),
            outer: Some(outer.clone()),
        })))
    }

    /// The frame enclosing this one, if any.
    pub fn outer(&self) -> Option<EnvRef> {
        self.0.borrow().outer.clone()
    }

    /// Bind `name` in this frame.
    pub fn define(&self, name: Name, value: Value) {
        self.0.borrow_mut().vars.insert(name, value);
    }

    /// Read `name` from this frame only.
    pub fn get(&self, name: Name) -> Option<Value> {
        self.0.borrow().vars.get(&name).cloned()
    }

    /// The frame `distance` outer hops away; 0 is this frame.
    ///
    /// # Panics
    /// Panics if the chain is shorter than `distance`: the resolver
    /// guarantees it never is.
    pub fn ancestor(&self, distance: u32) -> EnvRef {
        let mut env = self.clone();
        for _ in 0..distance {
            let outer = env
                .outer()
                .expect("resolver-stamped distance exceeds environment depth");
            env = outer;
        }
        env
    }

    /// Read `name` at the frame `distance` hops away.
    pub fn get_at(&self, distance: u32, name: Name) -> Option<Value> {
        self.ancestor(distance).get(name)
    }

    /// Bind `name` at the frame `distance` hops away.
    pub fn set_at(&self, distance: u32, name: Name, value: Value) {
        self.ancestor(distance).define(name, value);
    }

    /// Frame identity, for function-value equality.
    pub fn ptr_eq(a: &EnvRef, b: &EnvRef) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl std::fmt::Debug for EnvRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let frame = self.0.borrow();
        write!(
            f,
            "EnvRef({} vars, outer={})",
            frame.vars.len(),
            frame.outer.is_some()
        )
    }
}
