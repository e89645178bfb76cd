//! Object model: classes, members and instances.
//!
//! A [`Class`] owns its declared members and a resolution table built once,
//! at definition time ([`Class::define`]). For every member name the table
//! lists the visible members leaf-first: the class's own declarations, then
//! whatever each ancestor declared that was not overridden on the way down.
//! Method lookup is a walk of one table entry, never of the class chain.

mod define;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use sable_ir::ast::{accepts, Expr, FunctionDef, Modifier, Param, Scope};
use sable_ir::Name;

use crate::value::Value;

/// What a member is.
#[derive(Clone, Debug)]
pub enum MemberKind {
    Field { init: Option<Rc<Expr>> },
    Method(Rc<FunctionDef>),
    AbstractMethod { params: Vec<Param> },
}

pub struct ClassMember {
    pub name: Name,
    pub display_name: Rc<str>,
    pub scope: Scope,
    pub modifier: Modifier,
    pub kind: MemberKind,
    holder: Weak<Class>,
}

impl ClassMember {
    /// The class that declared this member.
    pub fn holder(&self) -> Option<Rc<Class>> {
        self.holder.upgrade()
    }

    pub fn is_held_by(&self, class: &Class) -> bool {
        std::ptr::eq(self.holder.as_ptr(), class)
    }

    pub fn is_field(&self) -> bool {
        matches!(self.kind, MemberKind::Field { .. })
    }

    pub fn is_method(&self) -> bool {
        !self.is_field()
    }

    pub fn params(&self) -> &[Param] {
        match &self.kind {
            MemberKind::Field { .. } => &[],
            MemberKind::Method(def) => &def.params,
            MemberKind::AbstractMethod { params } => params,
        }
    }

    /// True for a method that can bind `argc` arguments.
    pub fn accepts(&self, argc: usize) -> bool {
        self.is_method() && accepts(self.params(), argc)
    }

    /// Does `caller` (the class whose code is running, if any) see this member?
    pub fn is_accessible_from(&self, caller: Option<&Class>) -> bool {
        match self.scope {
            Scope::Public => true,
            Scope::Private => caller.is_some_and(|c| self.is_held_by(c)),
            Scope::Protected => caller.is_some_and(|c| {
                self.is_held_by(c)
                    || self
                        .holder
                        .upgrade()
                        .is_some_and(|holder| c.inherits_from(&holder))
            }),
        }
    }
}

impl fmt::Debug for ClassMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassMember")
            .field("name", &self.display_name)
            .field("scope", &self.scope)
            .field("modifier", &self.modifier)
            .finish_non_exhaustive()
    }
}

/// Outcome of a member lookup.
#[derive(Debug)]
pub enum Resolution {
    Found(Rc<ClassMember>),
    /// Matches exist but none is visible from the calling context.
    Inaccessible(Rc<ClassMember>),
    NotFound,
}

pub struct Class {
    name: Name,
    display_name: Rc<str>,
    modifier: Modifier,
    super_class: Option<Rc<Class>>,
    members: Vec<Rc<ClassMember>>,
    table: FxHashMap<Name, Vec<Rc<ClassMember>>>,
    statics: RefCell<FxHashMap<Name, Value>>,
}

impl Class {
    pub fn name(&self) -> Name {
        self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn modifier(&self) -> Modifier {
        self.modifier
    }

    pub fn super_class(&self) -> Option<&Rc<Class>> {
        self.super_class.as_ref()
    }

    /// Members declared by this class itself, in declaration order.
    pub fn members(&self) -> &[Rc<ClassMember>] {
        &self.members
    }

    /// True if `ancestor` is a strict ancestor of `self`.
    pub fn inherits_from(&self, ancestor: &Class) -> bool {
        let mut current = self.super_class.as_deref();
        while let Some(class) = current {
            if std::ptr::eq(class, ancestor) {
                return true;
            }
            current = class.super_class.as_deref();
        }
        false
    }

    /// The constructor: a method named like its class, declared by this class.
    pub fn constructor(&self) -> Option<&Rc<ClassMember>> {
        self.members
            .iter()
            .find(|m| m.name == self.name && matches!(m.kind, MemberKind::Method(_)))
    }

    /// Resolve a method call by name and arity from `caller`'s context.
    pub fn resolve_method(&self, name: Name, argc: usize, caller: Option<&Class>) -> Resolution {
        self.resolve(name, caller, |m| m.accepts(argc))
    }

    /// Resolve a field by name from `caller`'s context.
    pub fn resolve_field(&self, name: Name, caller: Option<&Class>) -> Resolution {
        self.resolve(name, caller, ClassMember::is_field)
    }

    fn resolve(
        &self,
        name: Name,
        caller: Option<&Class>,
        matches: impl Fn(&ClassMember) -> bool,
    ) -> Resolution {
        let Some(entries) = self.table.get(&name) else {
            return Resolution::NotFound;
        };
        let mut candidates = entries.iter().filter(|m| matches(&***m)).peekable();
        let Some(first) = candidates.peek().map(|m| Rc::clone(m)) else {
            return Resolution::NotFound;
        };
        match candidates.find(|m| m.is_accessible_from(caller)) {
            Some(member) => Resolution::Found(Rc::clone(member)),
            None => Resolution::Inaccessible(first),
        }
    }

    /// All visible members named `name`, leaf-first.
    pub fn lookup(&self, name: Name) -> &[Rc<ClassMember>] {
        self.table
            .get(&name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Non-static fields of the whole chain, root class first.
    pub fn instance_fields(&self) -> Vec<Rc<ClassMember>> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(class) = current {
            chain.push(class);
            current = class.super_class.as_deref();
        }
        chain
            .into_iter()
            .rev()
            .flat_map(|class| class.members.iter())
            .filter(|m| m.is_field() && !m.modifier.is_static())
            .cloned()
            .collect()
    }

    pub fn static_value(&self, name: Name) -> Option<Value> {
        self.statics.borrow().get(&name).cloned()
    }

    pub fn set_static(&self, name: Name, value: Value) {
        self.statics.borrow_mut().insert(name, value);
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.display_name)
            .field("modifier", &self.modifier)
            .field(
                "super_class",
                &self.super_class.as_ref().map(|c| c.display_name()),
            )
            .finish_non_exhaustive()
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

/// An instance of a class.
pub struct Object {
    class: Rc<Class>,
    fields: RefCell<FxHashMap<Name, Value>>,
}

impl Object {
    pub fn new(class: Rc<Class>) -> Self {
        Object {
            class,
            fields: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    pub fn field(&self, name: Name) -> Option<Value> {
        self.fields.borrow().get(&name).cloned()
    }

    pub fn set_field(&self, name: Name, value: Value) {
        self.fields.borrow_mut().insert(name, value);
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.class.display_name())
            .finish_non_exhaustive()
    }
}
