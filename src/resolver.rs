use crate::error;
use crate::expr::{Expr, ExprId};
use crate::stmt::{FunctionDecl, Stmt};
use crate::token::Token;
use std::collections::HashMap;
use std::rc::Rc;

/// What kind of function body, if any, we are currently resolving. Used to
/// reject 'return' at the top level and value-returns inside 'init'.
#[derive(Clone, Copy, PartialEq)]
enum FunctionKind {
    None,
    Function,
    Method,
    Initializer,
}

/// Whether we are inside a class body, and if so whether it has a
/// superclass. Used to reject stray 'this' and 'super'.
#[derive(Clone, Copy, PartialEq)]
enum ClassKind {
    None,
    Class,
    Subclass,
}

/// A single pass between the parser and the interpreter that walks the
/// tree once and resolves every variable use it contains: for each
/// Variable, Assign, This, and Super expression it records how many scopes
/// lie between the use and the binding. The interpreter then jumps
/// straight to the right environment frame instead of searching by name,
/// and a closure keeps meaning what it meant when it was declared.
///
/// The same walk enforces the static rules that don't need runtime
/// information: reading a local in its own initializer, redeclaring a name
/// in the same scope, returning outside a function, returning a value from
/// 'init', and using 'this' or 'super' where they have no meaning.
pub struct Resolver {
    /// The stack of scopes currently in scope, innermost last. Each scope
    /// maps a name to whether its initializer has finished resolving
    /// (false = declared, true = defined). Only local block scopes live
    /// here; globals are more dynamic and are not tracked, so a name found
    /// in no scope is assumed global.
    scopes: Vec<HashMap<String, bool>>,

    /// The resolution table under construction: expression id to scope
    /// distance, 0 being the innermost scope at the use site.
    resolved: HashMap<ExprId, usize>,

    current_function: FunctionKind,
    current_class: ClassKind,
}

impl Resolver {
    pub fn new() -> Resolver {
        Self {
            scopes: Vec::new(),
            resolved: HashMap::new(),
            current_function: FunctionKind::None,
            current_class: ClassKind::None,
        }
    }

    /// Resolves a whole program and hands back the finished table. Errors
    /// go through the shared sink; resolution carries on past them so one
    /// run reports as much as possible.
    pub fn resolve(mut self, statements: &[Stmt]) -> HashMap<ExprId, usize> {
        self.resolve_statements(statements);
        self.resolved
    }

    fn resolve_statements(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_statement(statement);
        }
    }

    fn resolve_statement(&mut self, statement: &Stmt) {
        match statement {
            Stmt::Block { statements } => {
                // A block introduces a new scope for the statements it
                // contains.
                self.begin_scope();
                self.resolve_statements(statements);
                self.end_scope();
            }
            Stmt::Var { name, initializer } => {
                // Binding is split into declaring and defining so that an
                // initializer mentioning the variable being declared is
                // caught: while the initializer resolves, the name exists
                // but is not yet usable.
                self.declare(name);
                if let Some(initializer) = initializer {
                    self.resolve_expression(initializer);
                }
                self.define(name);
            }
            Stmt::Function { declaration } => {
                // The name is defined eagerly, before the body resolves,
                // which is what lets a function recursively refer to
                // itself.
                self.declare(&declaration.name);
                self.define(&declaration.name);
                self.resolve_function(declaration, FunctionKind::Function);
            }
            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.resolve_class(name, superclass.as_ref(), methods),
            Stmt::Expression { expression } => {
                self.resolve_expression(expression);
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                // Resolution has no control flow: where execution takes one
                // branch, the analysis conservatively walks every branch
                // that could run.
                self.resolve_expression(condition);
                self.resolve_statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_statement(else_branch);
                }
            }
            Stmt::Print { expression } => {
                self.resolve_expression(expression);
            }
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionKind::None {
                    error::token_error(keyword, "Can't return from top-level code.");
                }
                if let Some(value) = value {
                    if self.current_function == FunctionKind::Initializer {
                        error::token_error(keyword, "Can't return a value from an initializer.");
                    }
                    self.resolve_expression(value);
                }
            }
            Stmt::While { condition, body } => {
                // Like 'if': condition and body are each resolved exactly
                // once, however often they run.
                self.resolve_expression(condition);
                self.resolve_statement(body);
            }
        }
    }

    fn resolve_class(&mut self, name: &Token, superclass: Option<&Expr>, methods: &[Rc<FunctionDecl>]) {
        let enclosing_class = self.current_class;
        self.current_class = ClassKind::Class;

        self.declare(name);
        self.define(name);

        if let Some(superclass) = superclass {
            if let Expr::Variable {
                name: super_name, ..
            } = superclass
            {
                if super_name.lexeme == name.lexeme {
                    error::token_error(super_name, "A class can't inherit from itself.");
                }
            }
            self.current_class = ClassKind::Subclass;
            self.resolve_expression(superclass);

            // A scope holding 'super' wraps the whole class body, sitting
            // immediately outside the 'this' scope below. At runtime the
            // interpreter mirrors these two frames, which is what makes
            // 'super' live at depth d and 'this' at depth d - 1.
            self.begin_scope();
            if let Some(scope) = self.scopes.last_mut() {
                scope.insert("super".to_string(), true);
            }
        }

        self.begin_scope();
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert("this".to_string(), true);
        }

        for method in methods {
            let kind = if method.name.lexeme == "init" {
                FunctionKind::Initializer
            } else {
                FunctionKind::Method
            };
            self.resolve_function(method, kind);
        }

        self.end_scope();
        if superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    fn resolve_expression(&mut self, expression: &Expr) {
        match expression {
            Expr::Variable { id, name } => {
                // Reading a variable inside its own initializer, like
                // var a = a;, is a static error rather than a lookup of the
                // outer a.
                if self.scopes.last().and_then(|scope| scope.get(&name.lexeme)) == Some(&false) {
                    error::token_error(name, "Can't read local variable in its own initializer.");
                }
                self.resolve_local(*id, &name.lexeme);
            }
            Expr::Assign { id, name, value } => {
                self.resolve_expression(value);
                self.resolve_local(*id, &name.lexeme);
            }
            Expr::Binary { left, right, .. } => {
                self.resolve_expression(left);
                self.resolve_expression(right);
            }
            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expression(callee);
                for argument in arguments {
                    self.resolve_expression(argument);
                }
            }
            Expr::Get { object, .. } => {
                // Properties are looked up dynamically at runtime; only the
                // object expression needs resolving.
                self.resolve_expression(object);
            }
            Expr::Set { object, value, .. } => {
                self.resolve_expression(value);
                self.resolve_expression(object);
            }
            Expr::Grouping { expression } => {
                self.resolve_expression(expression);
            }
            Expr::Literal { .. } => {
                // No variables, no subexpressions, no work.
            }
            Expr::Logical { left, right, .. } => {
                self.resolve_expression(left);
                self.resolve_expression(right);
            }
            Expr::Unary { right, .. } => {
                self.resolve_expression(right);
            }
            Expr::This { id, keyword } => {
                if self.current_class == ClassKind::None {
                    error::token_error(keyword, "Can't use 'this' outside of a class.");
                    return;
                }
                self.resolve_local(*id, &keyword.lexeme);
            }
            Expr::Super { id, keyword, .. } => {
                match self.current_class {
                    ClassKind::None => {
                        error::token_error(keyword, "Can't use 'super' outside of a class.");
                    }
                    ClassKind::Class => {
                        error::token_error(
                            keyword,
                            "Can't use 'super' in a class with no superclass.",
                        );
                    }
                    ClassKind::Subclass => self.resolve_local(*id, &keyword.lexeme),
                }
            }
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Adds the name to the innermost scope, shadowing any outer binding,
    /// marked "not ready yet". Redeclaring a name in the same local scope
    /// is almost certainly a mistake, so it is an error. At global scope
    /// (no scopes pushed) this is a no-op.
    fn declare(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(&name.lexeme) {
                error::token_error(name, "Already a variable with this name in this scope.");
            }
            scope.insert(name.lexeme.clone(), false);
        }
    }

    /// Marks the name fully initialized and available for use.
    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    /// Scans the scopes innermost outward for the name. If found, records
    /// the number of scopes between the use and the binding. If not found,
    /// nothing is recorded and the interpreter will fall back to the
    /// global environment.
    fn resolve_local(&mut self, id: ExprId, name: &str) {
        for (distance, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(name) {
                self.resolved.insert(id, distance);
                return;
            }
        }
    }

    /// Resolves a function body right where it is declared: a new scope,
    /// the parameters declared and defined in it, then the body. The
    /// enclosing function kind is saved and restored so nesting works.
    fn resolve_function(&mut self, function: &FunctionDecl, kind: FunctionKind) {
        let enclosing_function = self.current_function;
        self.current_function = kind;

        self.begin_scope();
        for param in &function.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_statements(&function.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }
}
