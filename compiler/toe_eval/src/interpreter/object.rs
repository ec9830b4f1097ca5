//! The object model: prototype lookup, slot access, binding.

use super::Interp;
use crate::errors::{cannot_set_slot, no_slot, Control};
use crate::value::{Kind, Value};

impl Interp {
    /// The prototype consulted when a slot is absent from a value's
    /// own map. Builtin kinds route to their global prototype objects;
    /// plain objects carry their own link; nil has none, terminating
    /// every chain at the object root.
    pub fn get_prototype(&self, value: &Value) -> Option<Value> {
        match value {
            Value::Nil | Value::Super(_) => None,
            Value::Bool(_) => Some(self.protos.boolean.clone()),
            Value::Number(_) => Some(self.protos.number.clone()),
            Value::Str(_) => Some(self.protos.string.clone()),
            Value::Array(_) => Some(self.protos.array.clone()),
            Value::Hash(_) => Some(self.protos.hash.clone()),
            Value::Function(_) | Value::Builtin(_) => Some(self.protos.function.clone()),
            Value::Object(obj) => obj.borrow().proto.clone(),
        }
    }

    /// Walk the chain looking for `name` in own slot maps. Returns the
    /// value together with the *whence*: the chain level whose map
    /// provided it, which powers `super`.
    pub fn find_slot(&self, value: &Value, name: toe_ir::Name) -> Option<(Value, Value)> {
        let mut current = value.clone();
        loop {
            let hit = match &current {
                Value::Object(obj) => obj.borrow().slots.get(&name).cloned(),
                Value::Function(func) => func.slots.borrow().get(&name).cloned(),
                Value::Builtin(builtin) => builtin.slots.borrow().get(&name).cloned(),
                _ => None,
            };
            if let Some(found) = hit {
                return Some((found, current));
            }
            current = self.get_prototype(&current)?;
        }
    }

    /// `find_slot` that errors with the canonical reason when missing.
    pub fn get_slot(&self, value: &Value, name: toe_ir::Name) -> Result<(Value, Value), Control> {
        self.find_slot(value, name)
            .ok_or_else(|| no_slot(self.interner.lookup(name)))
    }

    /// Write into a value's own slot map. Prototypes are never touched.
    pub fn set_slot(
        &self,
        value: &Value,
        name: toe_ir::Name,
        slot_value: Value,
    ) -> Result<(), Control> {
        match value {
            Value::Object(obj) => {
                obj.borrow_mut().slots.insert(name, slot_value);
                Ok(())
            }
            Value::Function(func) => {
                func.slots.borrow_mut().insert(name, slot_value);
                Ok(())
            }
            Value::Builtin(builtin) => {
                builtin.slots.borrow_mut().insert(name, slot_value);
                Ok(())
            }
            _ => Err(cannot_set_slot(self.interner.lookup(name))),
        }
    }

    /// Walk the chain for the first value of the given runtime kind,
    /// unwrapping object `data` payloads. This is how host methods
    /// accept subtyped builtins: an object whose chain carries an
    /// array payload is acceptable wherever an array is.
    pub fn get_special(&self, value: &Value, kind: Kind) -> Option<Value> {
        let mut current = value.clone();
        loop {
            if current.kind() == kind {
                return Some(current);
            }
            if let Value::Object(obj) = &current {
                if let Some(data) = obj.borrow().data.clone() {
                    if data.kind() == kind {
                        return Some(data);
                    }
                }
            }
            current = self.get_prototype(&current)?;
        }
    }

    /// Bind a function to a receiver; other values pass through.
    /// Binding an already-bound function is a no-op.
    pub fn bind_value(&self, value: Value, this: Value) -> Value {
        match value {
            Value::Function(func) => Value::Function(func.bind(this)),
            Value::Builtin(builtin) => Value::Builtin(builtin.bind(this)),
            other => other,
        }
    }

    /// Prototype-chain membership: `value` or any of its prototypes is
    /// identical to `proto`.
    pub fn is_a(&self, value: &Value, proto: &Value) -> bool {
        let mut current = value.clone();
        loop {
            if Value::identical(&current, proto) {
                return true;
            }
            match self.get_prototype(&current) {
                Some(next) => current = next,
                None => return false,
            }
        }
    }
}
