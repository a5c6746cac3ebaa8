use crate::error::Error;
use crate::interpreter::Interpreter;
use crate::value::callable::Callable;
use crate::value::function::Function;
use crate::value::instance::Instance;
use crate::value::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// The runtime representation of a class declaration. Methods are owned
/// by the class and reached through its instances; an inherited method is
/// found by walking up the superclass chain.
#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<Class>>,
    methods: HashMap<String, Function>,
}

impl Class {
    pub fn new(
        name: String,
        superclass: Option<Rc<Class>>,
        methods: HashMap<String, Function>,
    ) -> Self {
        Self {
            name,
            superclass,
            methods,
        }
    }

    /// Looks the method up on this class first, then on each ancestor in
    /// turn, so a subclass method shadows the inherited one.
    pub fn find_method(&self, name: &str) -> Option<&Function> {
        if let Some(method) = self.methods.get(name) {
            return Some(method);
        }
        self.superclass
            .as_deref()
            .and_then(|superclass| superclass.find_method(name))
    }
}

impl Callable for Rc<Class> {
    /// The initializer's arity decides how many arguments the class call
    /// takes; a class without one takes none.
    fn arity(&self) -> usize {
        self.find_method("init").map_or(0, |init| init.arity())
    }

    /// Calling a class constructs a fresh instance with no fields, then
    /// binds and invokes 'init' with the given arguments if the class or
    /// an ancestor declares one. The instance is the result either way.
    fn call(&self, interpreter: &mut Interpreter, args: Vec<Object>) -> Result<Object, Error> {
        let instance = Object::Instance(Rc::new(RefCell::new(Instance::new(Rc::clone(self)))));
        if let Some(initializer) = self.find_method("init") {
            initializer.bind(&instance).call(interpreter, args)?;
        }
        Ok(instance)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}
