use crate::environment::Environment;
use crate::error::Error;
use crate::value::function::Function;
use crate::value::object::Object;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// The global environment with every native function already bound.
pub fn globals() -> Rc<RefCell<Environment>> {
    let env = Environment::global();
    env.borrow_mut().define(
        "clock".to_string(),
        Object::Function(Function::Native {
            name: "clock",
            arity: 0,
            func: clock,
        }),
    );
    env
}

/// Wall-clock time in seconds as a double. The epoch is arbitrary as far
/// as the language is concerned; only differences carry meaning.
fn clock(_args: Vec<Object>) -> Result<Object, Error> {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64();
    Ok(Object::Number(seconds))
}
