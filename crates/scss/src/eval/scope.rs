//! Variable and mixin environment.
//!
//! A [`Scope`] is one frame in a chain. Lookups walk outward and the
//! innermost definition wins. Names treat `-` and `_` as the same
//! character, so `$main-color` and `$main_color` are one variable.

use crate::parser::{Param, RuleItem};
use crate::types::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// A mixin together with the frame it was defined in.
///
/// The frame is held weakly: the frame owns the mixin, so a strong handle
/// would form a cycle.
#[derive(Debug)]
pub struct Mixin {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<RuleItem>,
    pub scope: Weak<Scope>,
}

#[derive(Debug, Default)]
pub struct Scope {
    variables: RefCell<HashMap<String, Value>>,
    mixins: RefCell<HashMap<String, Rc<Mixin>>>,
    parent: Option<Rc<Scope>>,
}

fn normalize(name: &str) -> String {
    name.replace('_', "-")
}

impl Scope {
    /// A fresh global frame.
    pub fn root() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn child(parent: &Rc<Scope>) -> Rc<Self> {
        Rc::new(Self {
            parent: Some(Rc::clone(parent)),
            ..Self::default()
        })
    }

    /// Defines `name` in this frame, shadowing outer definitions.
    pub fn define(&self, name: &str, value: Value) {
        self.variables.borrow_mut().insert(normalize(name), value);
    }

    /// Defines `name` in the outermost frame.
    pub fn define_global(&self, name: &str, value: Value) {
        match &self.parent {
            Some(parent) => parent.define_global(name, value),
            None => self.define(name, value),
        }
    }

    pub fn resolve(&self, name: &str) -> Option<Value> {
        let key = normalize(name);
        let mut frame = Some(self);
        while let Some(scope) = frame {
            if let Some(value) = scope.variables.borrow().get(&key) {
                return Some(value.clone());
            }
            frame = scope.parent.as_deref();
        }
        None
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    pub fn is_defined_globally(&self, name: &str) -> bool {
        match &self.parent {
            Some(parent) => parent.is_defined_globally(name),
            None => self.variables.borrow().contains_key(&normalize(name)),
        }
    }

    pub fn define_mixin(&self, mixin: Mixin) {
        self.mixins
            .borrow_mut()
            .insert(normalize(&mixin.name), Rc::new(mixin));
    }

    pub fn resolve_mixin(&self, name: &str) -> Option<Rc<Mixin>> {
        let key = normalize(name);
        let mut frame = Some(self);
        while let Some(scope) = frame {
            if let Some(mixin) = scope.mixins.borrow().get(&key) {
                return Some(Rc::clone(mixin));
            }
            frame = scope.parent.as_deref();
        }
        None
    }
}
