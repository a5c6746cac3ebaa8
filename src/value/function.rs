use crate::environment::Environment;
use crate::error::Error;
use crate::interpreter::Interpreter;
use crate::stmt::FunctionDecl;
use crate::value::callable::Callable;
use crate::value::object::Object;
use std::cell::RefCell;
use std::rc::Rc;

/// The runtime representation of a function: either a native hook exposed
/// by the interpreter itself, or a user declaration paired with the
/// environment it closed over.
#[derive(Clone, Debug)]
pub enum Function {
    Native {
        name: &'static str,
        arity: usize,
        func: fn(Vec<Object>) -> Result<Object, Error>,
    },
    UserDefined {
        declaration: Rc<FunctionDecl>,

        /// The environment that was active when the function statement
        /// executed, not when the function is called. This is what makes
        /// the function a closure over its lexical surroundings.
        closure: Rc<RefCell<Environment>>,

        /// Whether this is a class's init method. We can't just check the
        /// declared name, because a free function may be called "init"
        /// too.
        is_initializer: bool,
    },
}

impl Function {
    pub fn new(
        declaration: Rc<FunctionDecl>,
        closure: Rc<RefCell<Environment>>,
        is_initializer: bool,
    ) -> Self {
        Function::UserDefined {
            declaration,
            closure,
            is_initializer,
        }
    }

    /// Produces the bound form of a method: a copy whose closure is a
    /// fresh one-entry frame defining 'this' as the given instance,
    /// wrapped around the original closure. The bound function carries
    /// its own little world where 'this' means that object, wherever the
    /// value ends up.
    pub fn bind(&self, instance: &Object) -> Function {
        match self {
            Function::UserDefined {
                declaration,
                closure,
                is_initializer,
            } => {
                let scope = Environment::with_enclosing(closure);
                scope.borrow_mut().define("this".to_string(), instance.clone());
                Function::new(Rc::clone(declaration), scope, *is_initializer)
            }
            Function::Native { .. } => self.clone(),
        }
    }

    /// Identity comparison: two function values are the same only if they
    /// share both declaration and captured environment. Binding creates a
    /// new closure frame, so each bound method is its own object.
    pub fn is_same(&self, other: &Function) -> bool {
        match (self, other) {
            (Function::Native { name: l, .. }, Function::Native { name: r, .. }) => l == r,
            (
                Function::UserDefined {
                    declaration: ld,
                    closure: lc,
                    ..
                },
                Function::UserDefined {
                    declaration: rd,
                    closure: rc,
                    ..
                },
            ) => Rc::ptr_eq(ld, rd) && Rc::ptr_eq(lc, rc),
            _ => false,
        }
    }

    /// The 'this' an initializer must yield, read one frame up in the
    /// closure where bind() put it.
    fn bound_this(&self) -> Object {
        match self {
            Function::UserDefined { closure, .. } => {
                closure.borrow().get_at(0, "this").unwrap_or(Object::Nil)
            }
            Function::Native { .. } => Object::Nil,
        }
    }
}

impl Callable for Function {
    fn arity(&self) -> usize {
        match self {
            Function::Native { arity, .. } => *arity,
            Function::UserDefined { declaration, .. } => declaration.params.len(),
        }
    }

    fn call(&self, interpreter: &mut Interpreter, args: Vec<Object>) -> Result<Object, Error> {
        match self {
            Function::Native { func, .. } => func(args),
            Function::UserDefined {
                declaration,
                closure,
                is_initializer,
            } => {
                // Each call gets a fresh environment chained to the
                // closure, so recursion and re-entrant calls each see
                // their own parameters.
                let scope = Environment::with_enclosing(closure);
                for (param, arg) in declaration.params.iter().zip(args) {
                    scope.borrow_mut().define(param.lexeme.clone(), arg);
                }

                match interpreter.execute_block(&declaration.body, scope) {
                    // A return statement unwinds to here, the call site,
                    // and becomes the call's value. An initializer yields
                    // its instance no matter what a bare 'return;' says.
                    Err(Error::Return(value)) => {
                        if *is_initializer {
                            Ok(self.bound_this())
                        } else {
                            Ok(value)
                        }
                    }
                    Err(other) => Err(other),
                    // Falling off the end of a function yields nil, or the
                    // instance for an initializer.
                    Ok(()) => {
                        if *is_initializer {
                            Ok(self.bound_this())
                        } else {
                            Ok(Object::Nil)
                        }
                    }
                }
            }
        }
    }

    fn name(&self) -> String {
        match self {
            Function::Native { name, .. } => (*name).to_string(),
            Function::UserDefined { declaration, .. } => declaration.name.lexeme.clone(),
        }
    }
}
