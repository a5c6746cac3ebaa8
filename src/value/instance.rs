use crate::error::Error;
use crate::token::Token;
use crate::value::class::Class;
use crate::value::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

/// The runtime representation of an instance: its class plus a bag of
/// fields. Fields come into existence when first assigned; nothing is
/// declared up front.
#[derive(Debug)]
pub struct Instance {
    klass: Rc<Class>,
    fields: HashMap<String, Object>,
}

impl Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} instance", self.klass.name)
    }
}

impl Instance {
    pub fn new(klass: Rc<Class>) -> Self {
        Self {
            klass,
            fields: HashMap::new(),
        }
    }

    /// Property access: a field if the instance has one by that name,
    /// otherwise a method from the class chain bound to this instance, so
    /// a field shadows a method of the same name. Takes the shared handle
    /// rather than &self because the bound method must alias the live
    /// instance, not a snapshot of it.
    ///
    /// A missing property could silently be nil, but that masks bugs more
    /// often than it helps, so it is a runtime error.
    pub fn get(instance: &Rc<RefCell<Instance>>, name: &Token) -> Result<Object, Error> {
        if let Some(value) = instance.borrow().fields.get(&name.lexeme) {
            return Ok(value.clone());
        }

        let klass = Rc::clone(&instance.borrow().klass);
        if let Some(method) = klass.find_method(&name.lexeme) {
            return Ok(Object::Function(
                method.bind(&Object::Instance(Rc::clone(instance))),
            ));
        }

        Err(Error::runtime(
            name,
            format!("Undefined property '{}'.", name.lexeme),
        ))
    }

    /// Assignment always writes a field, never a method; methods live on
    /// the class and cannot be replaced through an instance.
    pub fn set(&mut self, name: &Token, value: Object) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}
