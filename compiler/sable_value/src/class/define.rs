//! Class definition: inheritance checks and resolution-table construction.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use sable_diagnostic::ScriptResult;
use sable_ir::ast::{ClassDef, MemberDecl, MemberDeclKind, Modifier, Scope};
use sable_ir::{Name, StringInterner};

use super::{Class, ClassMember, MemberKind};
use crate::errors::invalid_class;

fn decl_param_count(decl: &MemberDecl) -> Option<usize> {
    match &decl.kind {
        MemberDeclKind::Field { .. } => None,
        MemberDeclKind::Method(def) => Some(def.params.len()),
        MemberDeclKind::AbstractMethod { params } => Some(params.len()),
    }
}

/// A method overrides another method with the same name and parameter count.
fn overrides(member: &ClassMember, base: &ClassMember) -> bool {
    member.name == base.name
        && member.is_method()
        && base.is_method()
        && member.params().len() == base.params().len()
}

fn decl_overrides(decl: &MemberDecl, base: &ClassMember) -> bool {
    decl.name == base.name
        && base.is_method()
        && decl_param_count(decl) == Some(base.params().len())
}

fn is_constructor(member: &ClassMember) -> bool {
    member
        .holder()
        .is_some_and(|holder| holder.name() == member.name)
}

impl Class {
    /// A concrete class with public, uninitialized instance fields and no
    /// methods. Used for built-in classes, which skip definition checks.
    pub fn record(name: &str, fields: &[&str], interner: &StringInterner) -> Rc<Class> {
        Rc::new_cyclic(|weak| {
            let members: Vec<Rc<ClassMember>> = fields
                .iter()
                .map(|field| {
                    Rc::new(ClassMember {
                        name: interner.intern(field),
                        display_name: Rc::from(*field),
                        scope: Scope::Public,
                        modifier: Modifier::Default,
                        kind: MemberKind::Field { init: None },
                        holder: weak.clone(),
                    })
                })
                .collect();
            let table = members
                .iter()
                .map(|member| (member.name, vec![Rc::clone(member)]))
                .collect();
            Class {
                name: interner.intern(name),
                display_name: Rc::from(name),
                modifier: Modifier::Default,
                super_class: None,
                members,
                table,
                statics: RefCell::new(FxHashMap::default()),
            }
        })
    }

    /// Build a class from its declaration, enforcing the inheritance rules:
    ///
    /// - a `final` or `static` class cannot be extended;
    /// - `abstract` members have no body and every bodiless member is `abstract`;
    /// - a field cannot redeclare an ancestor's field;
    /// - `final` and `static` members cannot be overridden;
    /// - an inherited abstract member cannot be overridden by a static one;
    /// - a concrete class leaves no abstract member unimplemented.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn define(
        decl: &ClassDef,
        parent: Option<Rc<Class>>,
        interner: &StringInterner,
    ) -> ScriptResult<Rc<Class>> {
        let class_name = interner.lookup(decl.name);

        if let Some(parent) = &parent {
            if parent.modifier.is_final() || parent.modifier.is_static() {
                return Err(invalid_class(&format!(
                    "class `{class_name}` cannot extend {} class `{}`",
                    parent.modifier,
                    parent.display_name()
                )));
            }
        }

        for (index, member) in decl.members.iter().enumerate() {
            let member_name = interner.lookup(member.name);
            match (&member.kind, member.modifier) {
                (MemberDeclKind::Field { .. }, Modifier::Abstract) => {
                    return Err(invalid_class(&format!(
                        "field `{member_name}` of `{class_name}` cannot be abstract"
                    )));
                }
                (MemberDeclKind::Method(_), Modifier::Abstract) => {
                    return Err(invalid_class(&format!(
                        "abstract method `{member_name}` of `{class_name}` cannot have a body"
                    )));
                }
                (MemberDeclKind::AbstractMethod { .. }, modifier)
                    if modifier != Modifier::Abstract =>
                {
                    return Err(invalid_class(&format!(
                        "method `{member_name}` of `{class_name}` has no body and must be abstract"
                    )));
                }
                _ => {}
            }

            let duplicate = decl.members[..index].iter().any(|earlier| {
                earlier.name == member.name
                    && decl_param_count(earlier) == decl_param_count(member)
            });
            if duplicate {
                return Err(invalid_class(&format!(
                    "member `{member_name}` is declared twice in `{class_name}`"
                )));
            }

            let inherited = parent.as_ref().map(|p| p.lookup(member.name)).unwrap_or_default();
            for base in inherited {
                let base_holder = base
                    .holder()
                    .map(|h| h.display_name().to_owned())
                    .unwrap_or_default();
                if base.is_field() && decl_param_count(member).is_none() {
                    return Err(invalid_class(&format!(
                        "field `{member_name}` of `{class_name}` redeclares a field of `{base_holder}`"
                    )));
                }
                if !decl_overrides(member, base) {
                    continue;
                }
                if base.modifier.is_final() || base.modifier.is_static() {
                    return Err(invalid_class(&format!(
                        "`{member_name}` cannot override {} member of `{base_holder}`",
                        base.modifier
                    )));
                }
                if matches!(base.kind, MemberKind::AbstractMethod { .. })
                    && member.modifier.is_static()
                {
                    return Err(invalid_class(&format!(
                        "abstract member `{member_name}` of `{base_holder}` cannot be implemented by a static member"
                    )));
                }
            }
        }

        let class = Rc::new_cyclic(|weak| {
            let members: Vec<Rc<ClassMember>> = decl
                .members
                .iter()
                .map(|m| {
                    Rc::new(ClassMember {
                        name: m.name,
                        display_name: Rc::from(interner.lookup(m.name)),
                        scope: m.scope,
                        modifier: m.modifier,
                        kind: match &m.kind {
                            MemberDeclKind::Field { init } => MemberKind::Field { init: init.clone() },
                            MemberDeclKind::Method(def) => MemberKind::Method(Rc::clone(def)),
                            MemberDeclKind::AbstractMethod { params } => MemberKind::AbstractMethod {
                                params: params.clone(),
                            },
                        },
                        holder: weak.clone(),
                    })
                })
                .collect();

            let mut table: FxHashMap<Name, Vec<Rc<ClassMember>>> = FxHashMap::default();
            for member in &members {
                table.entry(member.name).or_default().push(Rc::clone(member));
            }
            if let Some(parent) = &parent {
                for (name, entries) in &parent.table {
                    let own = table.get(name).map(Vec::as_slice).unwrap_or_default();
                    let kept: Vec<Rc<ClassMember>> = entries
                        .iter()
                        .filter(|base| !is_constructor(base))
                        .filter(|base| !own.iter().any(|m| overrides(m, base)))
                        .cloned()
                        .collect();
                    if !kept.is_empty() {
                        table.entry(*name).or_default().extend(kept);
                    }
                }
            }

            Class {
                name: decl.name,
                display_name: Rc::from(class_name),
                modifier: decl.modifier,
                super_class: parent.clone(),
                members,
                table,
                statics: RefCell::new(FxHashMap::default()),
            }
        });

        if class.modifier != Modifier::Abstract {
            let missing = class
                .table
                .values()
                .flatten()
                .find(|m| matches!(m.kind, MemberKind::AbstractMethod { .. }));
            if let Some(member) = missing {
                return Err(invalid_class(&format!(
                    "class `{class_name}` must implement abstract member `{}`",
                    member.display_name
                )));
            }
        }

        tracing::debug!(class = class_name, members = class.members.len(), "class defined");
        Ok(class)
    }
}
