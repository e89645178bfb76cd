//! Callable values: script closures and native built-ins.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use sable_diagnostic::ScriptResult;
use sable_ir::ast::FunctionDef;
use sable_ir::Name;

use crate::class::{Class, Object};
use crate::frame_item::{FrameId, FrameItem};
use crate::value::Value;

/// Snapshot of bindings, keyed by name.
pub type FrameItems = FxHashMap<Name, FrameItem>;

/// Host callback behind a native function.
pub type NativeCallback = dyn Fn(&[Value]) -> ScriptResult<Value>;

/// A script function bundled with the bindings it captured.
///
/// `captured` is a copy taken when the closure was created. After each call
/// the interpreter writes the closure frame's final bindings back into it
/// and re-synchronizes the declaring frame's variables.
///
/// A closure created inside a method also remembers that method's class and
/// receiver, so its body keeps the method's `this` and member access.
pub struct Closure {
    def: Rc<FunctionDef>,
    declaring_frame: FrameId,
    captured: RefCell<FrameItems>,
    holder: Option<Rc<Class>>,
    target: Option<Rc<Object>>,
}

impl Closure {
    pub fn new(def: Rc<FunctionDef>, declaring_frame: FrameId, captured: FrameItems) -> Self {
        Closure {
            def,
            declaring_frame,
            captured: RefCell::new(captured),
            holder: None,
            target: None,
        }
    }

    /// Bind the class and receiver of the method the closure was created in.
    #[must_use]
    pub fn with_receiver(mut self, holder: Option<Rc<Class>>, target: Option<Rc<Object>>) -> Self {
        self.holder = holder;
        self.target = target;
        self
    }

    pub fn def(&self) -> &Rc<FunctionDef> {
        &self.def
    }

    /// Frame the closure was created in.
    pub fn declaring_frame(&self) -> FrameId {
        self.declaring_frame
    }

    pub fn holder(&self) -> Option<&Rc<Class>> {
        self.holder.as_ref()
    }

    pub fn target(&self) -> Option<&Rc<Object>> {
        self.target.as_ref()
    }

    pub fn captured_items(&self) -> FrameItems {
        self.captured.borrow().clone()
    }

    /// Overwrite captured bindings that also appear in `items`.
    pub fn update_captured(&self, items: &FrameItems) {
        let mut captured = self.captured.borrow_mut();
        for (name, item) in items {
            if let Some(slot) = captured.get_mut(name) {
                *slot = item.clone();
            }
        }
    }
}

pub struct NativeFunction {
    pub min_arity: usize,
    /// `None` for variadic built-ins.
    pub max_arity: Option<usize>,
    callback: Rc<NativeCallback>,
}

impl NativeFunction {
    pub fn new(
        min_arity: usize,
        max_arity: Option<usize>,
        callback: impl Fn(&[Value]) -> ScriptResult<Value> + 'static,
    ) -> Self {
        NativeFunction {
            min_arity,
            max_arity,
            callback: Rc::new(callback),
        }
    }

    pub fn accepts(&self, argc: usize) -> bool {
        argc >= self.min_arity && self.max_arity.is_none_or(|max| argc <= max)
    }

    pub fn call(&self, args: &[Value]) -> ScriptResult<Value> {
        (self.callback)(args)
    }
}

pub enum FunctionKind {
    Script(Closure),
    Native(NativeFunction),
}

pub struct Function {
    name: Option<Name>,
    display_name: Rc<str>,
    kind: FunctionKind,
}

impl Function {
    pub fn script(name: Option<Name>, display_name: impl Into<Rc<str>>, closure: Closure) -> Self {
        Function {
            name,
            display_name: display_name.into(),
            kind: FunctionKind::Script(closure),
        }
    }

    pub fn native(name: Name, display_name: impl Into<Rc<str>>, native: NativeFunction) -> Self {
        Function {
            name: Some(name),
            display_name: display_name.into(),
            kind: FunctionKind::Native(native),
        }
    }

    pub fn name(&self) -> Option<Name> {
        self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn kind(&self) -> &FunctionKind {
        &self.kind
    }

    pub fn accepts(&self, argc: usize) -> bool {
        match &self.kind {
            FunctionKind::Script(closure) => closure.def.accepts(argc),
            FunctionKind::Native(native) => native.accepts(argc),
        }
    }

    /// Human-readable arity, for error messages.
    pub fn arity_text(&self) -> String {
        let (min, max) = match &self.kind {
            FunctionKind::Script(closure) => {
                (closure.def.required_arity(), Some(closure.def.params.len()))
            }
            FunctionKind::Native(native) => (native.min_arity, native.max_arity),
        };
        match max {
            Some(max) if max == min => min.to_string(),
            Some(max) => format!("{min} to {max}"),
            None => format!("at least {min}"),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_name.is_empty() {
            f.write_str("<closure>")
        } else {
            write!(f, "<function {}>", self.display_name)
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}
