//! Runtime values for the toe interpreter.
//!
//! `Value` is a tagged sum. Scalars (`Nil`, `Bool`, `Number`) are
//! inline; everything else is a reference-counted heap cell so that
//! object graphs, closures and containers share structure the way a
//! prototype language expects. All heap cells use `Rc`: the
//! interpreter is single-threaded by design, and the context type is
//! `!Send` on purpose.
//!
//! Equality here is only *identity* (`Value::identical`). Semantic
//! `==` is an interpreter operation, because user objects can override
//! it and container equality recurses through the evaluator.

use crate::environment::EnvRef;
use crate::errors::EvalResult;
use crate::hash_table::HashTable;
use crate::interpreter::Interp;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use toe_ir::ast::FunctionLit;
use toe_ir::Name;

/// Slot storage shared by objects, functions and builtins.
pub type Slots = FxHashMap<Name, Value>;

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    /// The nil singleton.
    Nil,
    /// `true` / `false`.
    Bool(bool),
    /// 64-bit IEEE-754 double.
    Number(f64),
    /// Immutable UTF-8 string.
    Str(Rc<str>),
    /// Prototype-based object: proto link, own slots, optional boxed
    /// builtin payload for subtyped builtins.
    Object(Rc<RefCell<Obj>>),
    /// User-defined function (closure). Functions are objects: they
    /// carry their own slot map.
    Function(Rc<FunctionValue>),
    /// Host-implemented callable.
    Builtin(Rc<BuiltinValue>),
    /// Dense ordered sequence.
    Array(Rc<RefCell<Vec<Value>>>),
    /// Value-keyed open-addressed hash table.
    Hash(Rc<RefCell<HashTable>>),
    /// Transient marker produced by evaluating `super`; consumed by
    /// the enclosing get/set/method expression and never stored in
    /// user-visible data.
    Super(Rc<Value>),
}

/// The mutable core of an `Object` value.
pub struct Obj {
    pub proto: Option<Value>,
    pub slots: Slots,
    /// Boxed builtin payload: a cloned `Array.new()` object carries the
    /// actual array here, found via `get_special`.
    pub data: Option<Value>,
}

impl Obj {
    pub fn new(proto: Option<Value>) -> Self {
        Obj {
            proto,
            slots: Slots::default(),
            data: None,
        }
    }
}

/// A user-defined function.
pub struct FunctionValue {
    /// The parse-tree literal (shared with the AST).
    pub node: Rc<FunctionLit>,
    /// Captured defining environment.
    pub closure: EnvRef,
    /// Bound receiver, if any. `None` means unbound: distinct from
    /// being explicitly bound to nil.
    pub this: Option<Value>,
    /// Filename of the module that created the function.
    pub filename: Rc<str>,
    /// Own slot map, shared between a function and its bound copies.
    pub slots: Rc<RefCell<Slots>>,
    /// Precomputed display form, e.g. `[Function speak]`.
    pub display: Rc<str>,
}

impl FunctionValue {
    /// Bind the function to a receiver. Binding a bound function is a
    /// no-op; the copy shares node, closure and slot map.
    pub fn bind(self: &Rc<Self>, this: Value) -> Rc<Self> {
        if self.this.is_some() {
            return Rc::clone(self);
        }
        let display: Rc<str> = Rc::from(self.display.replace("[Function", "[Function bound"));
        Rc::new(FunctionValue {
            node: Rc::clone(&self.node),
            closure: self.closure.clone(),
            this: Some(this),
            filename: Rc::clone(&self.filename),
            slots: Rc::clone(&self.slots),
            display,
        })
    }
}

/// Host callable signature: `(interp, this, args)`.
pub type BuiltinFn = dyn Fn(&mut Interp, Value, &[Value]) -> EvalResult;

/// A builtin function value.
pub struct BuiltinValue {
    pub name: &'static str,
    /// Bound receiver, if any.
    pub this: Option<Value>,
    /// Own slot map, shared between a builtin and its bound copies.
    pub slots: Rc<RefCell<Slots>>,
    pub func: Rc<BuiltinFn>,
    /// Precomputed display form, e.g. `[Builtin puts]`.
    pub display: Rc<str>,
}

impl BuiltinValue {
    pub fn new(name: &'static str, func: Rc<BuiltinFn>) -> Self {
        BuiltinValue {
            name,
            this: None,
            slots: Rc::new(RefCell::new(Slots::default())),
            func,
            display: Rc::from(format!("[Builtin {name}]")),
        }
    }

    /// Bind to a receiver; a no-op when already bound.
    pub fn bind(self: &Rc<Self>, this: Value) -> Rc<Self> {
        if self.this.is_some() {
            return Rc::clone(self);
        }
        Rc::new(BuiltinValue {
            name: self.name,
            this: Some(this),
            slots: Rc::clone(&self.slots),
            func: Rc::clone(&self.func),
            display: Rc::clone(&self.display),
        })
    }
}

/// Coarse value kind, used by `get_special` and error messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    Nil,
    Boolean,
    Number,
    String,
    Object,
    Function,
    Builtin,
    Array,
    Hash,
    Super,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Nil => "nil",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Object => "object",
            Kind::Function => "function",
            Kind::Builtin => "builtin",
            Kind::Array => "array",
            Kind::Hash => "hash",
            Kind::Super => "super",
        }
    }
}

impl Value {
    /// Build a string value.
    #[inline]
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// Build an object value with the given prototype.
    pub fn object(proto: Option<Value>) -> Self {
        Value::Object(Rc::new(RefCell::new(Obj::new(proto))))
    }

    /// Build an array value.
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    /// The coarse kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Nil,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::Str(_) => Kind::String,
            Value::Object(_) => Kind::Object,
            Value::Function(_) => Kind::Function,
            Value::Builtin(_) => Kind::Builtin,
            Value::Array(_) => Kind::Array,
            Value::Hash(_) => Kind::Hash,
            Value::Super(_) => Kind::Super,
        }
    }

    /// Type name for error messages.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Truthiness: everything except `nil` and `false`.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Identity comparison: value identity for scalars, pointer
    /// identity for heap cells. This is the `==` fast path and the key
    /// for visited sets; it is *not* semantic equality.
    ///
    /// Numbers compare by IEEE equality, so `NaN` is not identical to
    /// itself: exactly what `x == x` needs to report for NaN.
    pub fn identical(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Number(x), Value::Number(y)) => x == y,
            (Value::Str(x), Value::Str(y)) => Rc::ptr_eq(x, y),
            (Value::Object(x), Value::Object(y)) => Rc::ptr_eq(x, y),
            (Value::Array(x), Value::Array(y)) => Rc::ptr_eq(x, y),
            (Value::Hash(x), Value::Hash(y)) => Rc::ptr_eq(x, y),
            (Value::Builtin(x), Value::Builtin(y)) => Rc::ptr_eq(x, y),
            (Value::Function(x), Value::Function(y)) => {
                // Bound copies of one function stay equal when they
                // share node, closure and slots and bind the same
                // receiver: f.bind(a).bind(b) == f.bind(a).
                if Rc::ptr_eq(x, y) {
                    return true;
                }
                Rc::ptr_eq(&x.node, &y.node)
                    && EnvRef::ptr_eq(&x.closure, &y.closure)
                    && Rc::ptr_eq(&x.slots, &y.slots)
                    && match (&x.this, &y.this) {
                        (None, None) => true,
                        (Some(p), Some(q)) => Value::identical(p, q),
                        _ => false,
                    }
            }
            _ => false,
        }
    }

    /// Stable address of a heap cell, used to key identity sets.
    /// Scalars have no identity and return `None`.
    pub fn heap_id(&self) -> Option<usize> {
        match self {
            Value::Str(x) => Some(Rc::as_ptr(x) as *const u8 as usize),
            Value::Object(x) => Some(Rc::as_ptr(x) as *const u8 as usize),
            Value::Array(x) => Some(Rc::as_ptr(x) as *const u8 as usize),
            Value::Hash(x) => Some(Rc::as_ptr(x) as *const u8 as usize),
            Value::Function(x) => Some(Rc::as_ptr(x) as *const u8 as usize),
            Value::Builtin(x) => Some(Rc::as_ptr(x) as *const u8 as usize),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Object(o) => write!(f, "[Object 0x{:x}]", Rc::as_ptr(o) as *const u8 as usize),
            Value::Function(func) => write!(f, "{}", func.display),
            Value::Builtin(b) => write!(f, "[Builtin {}]", b.name),
            Value::Array(a) => write!(f, "[Array len={}]", a.borrow().len()),
            Value::Hash(h) => write!(f, "[Hash size={}]", h.borrow().size()),
            Value::Super(_) => write!(f, "[Super]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::string("").is_truthy());
    }

    #[test]
    fn test_scalar_identity() {
        assert!(Value::identical(&Value::Nil, &Value::Nil));
        assert!(Value::identical(&Value::Number(1.0), &Value::Number(1.0)));
        assert!(!Value::identical(&Value::Number(1.0), &Value::Number(2.0)));
        assert!(!Value::identical(&Value::Nil, &Value::Bool(false)));
    }

    #[test]
    fn test_nan_not_identical() {
        let nan = Value::Number(f64::NAN);
        assert!(!Value::identical(&nan, &nan));
    }

    #[test]
    fn test_heap_identity_is_pointer_based() {
        let a = Value::array(vec![]);
        let b = Value::array(vec![]);
        assert!(Value::identical(&a, &a.clone()));
        assert!(!Value::identical(&a, &b));
    }

    #[test]
    fn test_string_identity_vs_content() {
        let a = Value::string("x");
        let b = Value::string("x");
        // Content-equal strings are not *identical*; `==` handles them.
        assert!(!Value::identical(&a, &b));
        assert!(Value::identical(&a, &a.clone()));
    }
}
