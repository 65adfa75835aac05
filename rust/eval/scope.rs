use crate::error::EvaluationError;
use crate::eval::value::Value;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// A shared, mutable lexical scope.
pub(crate) type Env = Rc<RefCell<Scope>>;

#[derive(Debug)]
pub(crate) struct Binding {
    pub(crate) value: Value,
    pub(crate) constant: bool,
}

/// Bindings of one block or function body, chained to the enclosing scope.
#[derive(Debug, Default)]
pub(crate) struct Scope {
    vars: IndexMap<String, Binding>,
    parent: Option<Env>,
}

impl Scope {
    pub(crate) fn global() -> Env {
        Rc::new(RefCell::new(Scope::default()))
    }

    pub(crate) fn child(parent: &Env) -> Env {
        Rc::new(RefCell::new(Scope {
            vars: IndexMap::new(),
            parent: Some(Rc::clone(parent)),
        }))
    }

    pub(crate) fn binding_mut(&mut self, name: &str) -> Option<&mut Binding> {
        self.vars.get_mut(name)
    }
}

/// Bind a name in this scope, shadowing any outer binding.
pub(crate) fn declare(env: &Env, name: &str, value: Value, constant: bool) {
    env.borrow_mut()
        .vars
        .insert(name.to_string(), Binding { value, constant });
}

/// A fresh scope beside `scope`, holding copies of its bindings for `names`.
pub(crate) fn renew(scope: &Env, names: &[&str]) -> Env {
    let current = scope.borrow();
    let vars = names
        .iter()
        .filter_map(|name| {
            current.vars.get(*name).map(|b| {
                let binding = Binding {
                    value: b.value.clone(),
                    constant: b.constant,
                };
                (name.to_string(), binding)
            })
        })
        .collect();
    Rc::new(RefCell::new(Scope {
        vars,
        parent: current.parent.clone(),
    }))
}

/// The innermost scope in which `name` is bound.
pub(crate) fn resolve(env: &Env, name: &str) -> Option<Env> {
    let mut current = Some(Rc::clone(env));
    while let Some(scope) = current {
        if scope.borrow().vars.contains_key(name) {
            return Some(scope);
        }
        current = scope.borrow().parent.clone();
    }
    None
}

pub(crate) fn lookup(env: &Env, name: &str) -> Option<Value> {
    let scope = resolve(env, name)?;
    let scope = scope.borrow();
    scope.vars.get(name).map(|b| b.value.clone())
}

/// Overwrite an existing binding. Returns `Ok(false)` when `name` is not bound anywhere.
pub(crate) fn assign(env: &Env, name: &str, value: Value) -> Result<bool, EvaluationError> {
    let Some(scope) = resolve(env, name) else {
        return Ok(false);
    };
    let mut scope = scope.borrow_mut();
    match scope.binding_mut(name) {
        Some(binding) if binding.constant => Err(EvaluationError::TypeError(format!(
            "assignment to constant variable `{}`",
            name
        ))),
        Some(binding) => {
            binding.value = value;
            Ok(true)
        }
        None => Ok(false),
    }
}
