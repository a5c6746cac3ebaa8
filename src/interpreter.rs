use crate::environment::Environment;
use crate::error;
use crate::error::Error;
use crate::expr::{Expr, ExprId};
use crate::stmt::{FunctionDecl, Stmt};
use crate::token::Token;
use crate::token::TokenType::*;
use crate::value::class::Class;
use crate::value::function::Function;
use crate::value::instance::Instance;
use crate::value::native;
use crate::value::object::Object;
use crate::value::object::Object::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// The tree-walking evaluator. It takes the syntax tree the parser
/// produced, annotated by the resolver's table, and does a post-order
/// traversal: each node evaluates its children before doing its own work.
/// Statements are executed for their effects in `execute`; expressions
/// produce values in `evaluate`.
pub struct Interpreter {
    /// A fixed handle on the outermost environment, where the natives
    /// live and where unresolved names fall back to.
    globals: Rc<RefCell<Environment>>,

    /// The current environment. Changes as execution enters and exits
    /// blocks and function bodies.
    environment: Rc<RefCell<Environment>>,

    /// The resolver's side table: expression id to scope distance. Reads
    /// and writes of resolved locals jump straight to the right frame;
    /// ids with no entry are globals.
    locals: HashMap<ExprId, usize>,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        let globals = native::globals();
        let environment = Rc::clone(&globals);
        Self {
            globals,
            environment,
            locals: HashMap::new(),
        }
    }

    /// Merges a resolution table in. The REPL resolves line by line, and
    /// since expression ids are never reused, the table only grows.
    pub fn add_resolutions(&mut self, locals: HashMap<ExprId, usize>) {
        self.locals.extend(locals);
    }

    /// Runs a program. The first runtime error is reported and stops
    /// execution.
    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            if let Err(error) = self.execute(statement) {
                error::runtime_error(&error);
                break;
            }
        }
    }

    fn execute(&mut self, statement: &Stmt) -> Result<(), Error> {
        match statement {
            Stmt::Expression { expression } => {
                self.evaluate(expression)?;
                Ok(())
            }
            Stmt::Print { expression } => {
                let value = self.evaluate(expression)?;
                println!("{value}");
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                // Without an initializer the variable starts out nil.
                let value = match initializer {
                    Some(expression) => self.evaluate(expression)?,
                    None => Nil,
                };
                self.environment
                    .borrow_mut()
                    .define(name.lexeme.clone(), value);
                Ok(())
            }
            Stmt::Block { statements } => {
                let scope = Environment::with_enclosing(&self.environment);
                self.execute_block(statements, scope)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)?;
                }
                Ok(())
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }
            Stmt::Function { declaration } => {
                // A function statement converts its compile-time
                // representation into a runtime value, closing over the
                // environment that is active right now. Capture happens
                // here, at execution of the declaration, which is what
                // gives closures their meaning.
                let function = Function::new(
                    Rc::clone(declaration),
                    Rc::clone(&self.environment),
                    false,
                );
                self.environment
                    .borrow_mut()
                    .define(declaration.name.lexeme.clone(), Object::Function(function));
                Ok(())
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expression) => self.evaluate(expression)?,
                    None => Nil,
                };

                // A return can fire from arbitrarily deep inside a
                // function body. The Return variant unwinds through every
                // enclosing statement until the function call site catches
                // it; no environment is left behind because execute_block
                // restores on every exit path.
                Err(Error::Return(value))
            }
            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.execute_class(name, superclass.as_ref(), methods),
        }
    }

    fn execute_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDecl>],
    ) -> Result<(), Error> {
        let superclass_value = match superclass {
            Some(expression) => {
                let value = self.evaluate(expression)?;
                match value {
                    Object::Class(class) => Some(class),
                    _ => {
                        let at = match expression {
                            Expr::Variable { name, .. } => name,
                            _ => name,
                        };
                        return Err(Error::runtime(at, "Superclass must be a class."));
                    }
                }
            }
            None => None,
        };

        // The name is bound before the methods are built so the class body
        // may refer to the class itself.
        self.environment
            .borrow_mut()
            .define(name.lexeme.clone(), Nil);

        // For a subclass, one extra frame defining 'super' wraps the
        // method closures, mirroring the scope the resolver set up. It is
        // shared by every method of this class.
        let enclosing = match &superclass_value {
            Some(superclass) => {
                let scope = Environment::with_enclosing(&self.environment);
                scope
                    .borrow_mut()
                    .define("super".to_string(), Object::Class(Rc::clone(superclass)));
                Some(std::mem::replace(&mut self.environment, scope))
            }
            None => None,
        };

        let mut method_map = HashMap::new();
        for method in methods {
            let is_initializer = method.name.lexeme == "init";
            let function = Function::new(
                Rc::clone(method),
                Rc::clone(&self.environment),
                is_initializer,
            );
            method_map.insert(method.name.lexeme.clone(), function);
        }

        let class = Object::Class(Rc::new(Class::new(
            name.lexeme.clone(),
            superclass_value,
            method_map,
        )));

        if let Some(previous) = enclosing {
            self.environment = previous;
        }

        self.environment.borrow_mut().assign(name, class)?;
        Ok(())
    }

    /// Executes statements in the given environment, then restores the
    /// previous one on every exit path: normal completion, a return
    /// unwinding through, or a runtime error.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<(), Error> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut result = Ok(());
        for statement in statements {
            result = self.execute(statement);
            if result.is_err() {
                break;
            }
        }

        self.environment = previous;
        result
    }

    pub fn evaluate(&mut self, expression: &Expr) -> Result<Object, Error> {
        match expression {
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Grouping { expression } => self.evaluate(expression),
            Expr::Unary { operator, right } => {
                let value = self.evaluate(right)?;
                match (&operator.token_type, value) {
                    (MINUS, Number(n)) => Ok(Number(-n)),
                    (BANG, value) => Ok(Boolean(!value.is_truthy())),
                    _ => Err(Error::runtime(operator, "Operand must be a number.")),
                }
            }
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                // Operands evaluate left to right, both before the
                // operator does its work.
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                match (&operator.token_type, left, right) {
                    (STAR, Number(l), Number(r)) => Ok(Number(l * r)),
                    // Division by zero follows IEEE-754: inf, -inf, or NaN.
                    (SLASH, Number(l), Number(r)) => Ok(Number(l / r)),
                    (MINUS, Number(l), Number(r)) => Ok(Number(l - r)),
                    (PLUS, Number(l), Number(r)) => Ok(Number(l + r)),
                    (PLUS, String(l), String(r)) => Ok(String(l + r.as_str())),
                    (PLUS, _, _) => Err(Error::runtime(
                        operator,
                        "Operands must be two numbers or two strings.",
                    )),
                    (GREATER, Number(l), Number(r)) => Ok(Boolean(l > r)),
                    (GREATER_EQUAL, Number(l), Number(r)) => Ok(Boolean(l >= r)),
                    (LESS, Number(l), Number(r)) => Ok(Boolean(l < r)),
                    (LESS_EQUAL, Number(l), Number(r)) => Ok(Boolean(l <= r)),
                    (BANG_EQUAL, l, r) => Ok(Boolean(!l.is_equal(&r))),
                    (EQUAL_EQUAL, l, r) => Ok(Boolean(l.is_equal(&r))),
                    _ => Err(Error::runtime(operator, "Operands must be numbers.")),
                }
            }
            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;

                // Short-circuit on the left value alone; only then is the
                // right operand evaluated. The result is an operand value
                // with the appropriate truthiness, not a bare boolean:
                // "hi" or 2 is "hi", nil or "yes" is "yes".
                if operator.token_type == OR {
                    if left.is_truthy() {
                        return Ok(left);
                    }
                } else if !left.is_truthy() {
                    return Ok(left);
                }

                self.evaluate(right)
            }
            Expr::Variable { id, name } => self.look_up_variable(name, *id),
            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;
                match self.locals.get(id) {
                    Some(distance) => {
                        self.environment
                            .borrow_mut()
                            .assign_at(*distance, &name.lexeme, value.clone());
                    }
                    None => {
                        self.globals.borrow_mut().assign(name, value.clone())?;
                    }
                }
                // Assignment is an expression and may nest inside others,
                // so it produces the assigned value.
                Ok(value)
            }
            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;

                let mut args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    args.push(self.evaluate(argument)?);
                }

                callee.call(self, args, paren)
            }
            Expr::Get { object, name } => {
                let object = self.evaluate(object)?;
                match object {
                    Object::Instance(instance) => Instance::get(&instance, name),
                    _ => Err(Error::runtime(name, "Only instances have properties.")),
                }
            }
            Expr::Set {
                object,
                name,
                value,
            } => {
                let object = self.evaluate(object)?;
                match object {
                    Object::Instance(instance) => {
                        let value = self.evaluate(value)?;
                        instance.borrow_mut().set(name, value.clone());
                        Ok(value)
                    }
                    _ => Err(Error::runtime(name, "Only instances have fields.")),
                }
            }
            Expr::This { id, keyword } => self.look_up_variable(keyword, *id),
            Expr::Super {
                id,
                keyword,
                method,
            } => {
                let distance = match self.locals.get(id) {
                    Some(distance) => *distance,
                    None => return Err(Error::runtime(keyword, "Undefined variable 'super'.")),
                };

                // 'super' lives in the frame the class declaration pushed;
                // 'this' in the frame bind() pushed directly inside it.
                // The two-depth contract is what ties the method below to
                // the current instance rather than a superclass one.
                let superclass = match self.environment.borrow().get_at(distance, "super") {
                    Some(Object::Class(class)) => class,
                    _ => return Err(Error::runtime(keyword, "Undefined variable 'super'.")),
                };
                let object = match self.environment.borrow().get_at(distance - 1, "this") {
                    Some(object) => object,
                    None => return Err(Error::runtime(keyword, "Undefined variable 'this'.")),
                };

                match superclass.find_method(&method.lexeme) {
                    Some(found) => Ok(Object::Function(found.bind(&object))),
                    None => Err(Error::runtime(
                        method,
                        format!("Undefined property '{}'.", method.lexeme),
                    )),
                }
            }
        }
    }

    /// Variable access honors the resolver: a resolved id reads at its
    /// recorded distance, an unresolved one falls back to the globals.
    fn look_up_variable(&self, name: &Token, id: ExprId) -> Result<Object, Error> {
        match self.locals.get(&id) {
            Some(distance) => self
                .environment
                .borrow()
                .get_at(*distance, &name.lexeme)
                .ok_or_else(|| {
                    Error::runtime(name, format!("Undefined variable '{}'.", name.lexeme))
                }),
            None => self.globals.borrow().get(name),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
