use crate::error::Error;
use crate::token::Token;
use crate::value::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A single scope frame: a mapping from names to values, chained to at
/// most one enclosing frame. Frames form a tree rooted at the global
/// environment; closures keep their captured frames alive through the
/// shared Rc links long after the block that created them has exited.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Object>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    /// The outermost, global environment.
    pub fn global() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment::default()))
    }

    /// A new local scope nested inside the given one.
    pub fn with_enclosing(enclosing: &Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            enclosing: Some(Rc::clone(enclosing)),
        }))
    }

    /// A new variable is always declared in the current innermost scope,
    /// shadowing without complaint and redefining without complaint.
    pub fn define(&mut self, name: String, value: Object) {
        self.values.insert(name, value);
    }

    /// Looks the name up here, then walks outward through the enclosing
    /// chain. Reaching the root without a hit is a runtime error; using an
    /// undefined variable is only detected when the code actually runs.
    pub fn get(&self, name: &Token) -> Result<Object, Error> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        match &self.enclosing {
            Some(outer) => outer.borrow().get(name),
            None => Err(Error::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            )),
        }
    }

    /// Unlike define, assign may not create a binding: the name must
    /// already exist somewhere on the chain.
    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), Error> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        match &self.enclosing {
            Some(outer) => outer.borrow_mut().assign(name, value),
            None => Err(Error::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            )),
        }
    }

    /// Reads a binding at an exact distance up the chain, as computed by
    /// the resolver. No search: the resolver already proved where the
    /// binding lives, so a miss here means the caller fell outside that
    /// guarantee and gets None to turn into its own error.
    pub fn get_at(&self, distance: usize, name: &str) -> Option<Object> {
        if distance == 0 {
            return self.values.get(name).cloned();
        }

        let mut environment = self.enclosing.clone()?;
        for _ in 1..distance {
            let outer = environment.borrow().enclosing.clone()?;
            environment = outer;
        }
        let value = environment.borrow().values.get(name).cloned();
        value
    }

    /// Writes a binding at an exact distance up the chain.
    pub fn assign_at(&mut self, distance: usize, name: &str, value: Object) {
        if distance == 0 {
            self.values.insert(name.to_string(), value);
            return;
        }

        let Some(mut environment) = self.enclosing.clone() else {
            return;
        };
        for _ in 1..distance {
            let outer = environment.borrow().enclosing.clone();
            match outer {
                Some(outer) => environment = outer,
                None => return,
            }
        }
        environment
            .borrow_mut()
            .values
            .insert(name.to_string(), value);
    }
}
