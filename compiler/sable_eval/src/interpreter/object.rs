//! Classes and instances: definition, construction, member access and
//! dispatch.

use std::rc::Rc;

use sable_diagnostic::{ScriptError, ScriptResult};
use sable_ir::ast::{ClassDef, Expr, ExprStmt, FunctionDef, Modifier, Stmt};
use sable_ir::Name;
use sable_value::errors::{
    arity_mismatch, cannot_instantiate, invalid_class, read_only, scope_violation, static_misuse,
    thrown_value, type_mismatch, undefined_class, undefined_member, undefined_variable,
};
use sable_value::{
    Class, ClassMember, FrameItem, FrameItems, MemberKind, Object, Resolution, Value,
};

use super::call::arity_text;
use super::Interpreter;
use crate::frame::InvocationContext;

fn holder_name(member: &ClassMember) -> String {
    member
        .holder()
        .map(|holder| holder.display_name().to_owned())
        .unwrap_or_default()
}

#[cold]
fn inaccessible(member: &ClassMember) -> ScriptError {
    scope_violation(
        &member.display_name,
        &holder_name(member),
        &member.scope.to_string(),
    )
}

#[cold]
fn orphaned(member: &ClassMember) -> ScriptError {
    invalid_class(&format!(
        "member `{}` outlived its class",
        member.display_name
    ))
}

/// True if a constructor body starts with an explicit parent constructor call.
fn calls_parent_constructor(def: &FunctionDef) -> bool {
    matches!(
        def.body.statements.first(),
        Some(Stmt::Expr(ExprStmt {
            expr: Expr::ParentConstructorCall(_),
            ..
        }))
    )
}

impl Interpreter {
    pub(super) fn find_class(&self, name: Name) -> ScriptResult<Rc<Class>> {
        match self.lookup(name) {
            Some(
                FrameItem::Class(class)
                | FrameItem::Variable(Value::Class(class))
                | FrameItem::Constant(Value::Class(class)),
            ) => Ok(Rc::clone(class)),
            Some(other) => Err(type_mismatch("class", &other.kind().to_string())),
            None => Err(undefined_class(self.name_str(name))),
        }
    }

    /// Define a class, initialize its static fields and bind it in the
    /// current block.
    pub(super) fn define_class(&mut self, node: &ClassDef) -> ScriptResult<()> {
        let parent = node
            .super_class
            .map(|name| self.find_class(name))
            .transpose()?;
        let class = Class::define(node, parent, &self.interner)?;

        let statics: Vec<Rc<ClassMember>> = class
            .members()
            .iter()
            .filter(|member| member.is_field() && member.modifier.is_static())
            .cloned()
            .collect();
        for field in statics {
            let value = self.field_initial_value(&class, None, &field)?;
            class.set_static(field.name, value);
        }

        self.declare(node.name, FrameItem::Class(class))
    }

    /// Evaluate a field initializer on behalf of `holder`.
    fn field_initial_value(
        &mut self,
        holder: &Rc<Class>,
        target: Option<&Rc<Object>>,
        field: &ClassMember,
    ) -> ScriptResult<Value> {
        let MemberKind::Field { init: Some(init) } = &field.kind else {
            return Ok(Value::Void);
        };
        let context = InvocationContext::method(Rc::clone(holder), target.cloned(), field.name);
        self.with_frame(context, FrameItems::default(), |this| this.eval_expr(init))
            .map(|(value, _)| value)
    }

    /// `new Class(args)`: initialize fields root-to-leaf, then construct.
    pub(super) fn instantiate(
        &mut self,
        class: &Rc<Class>,
        args: Vec<Value>,
    ) -> ScriptResult<Rc<Object>> {
        let modifier = class.modifier();
        if modifier.is_abstract() || modifier.is_static() {
            return Err(cannot_instantiate(
                class.display_name(),
                &modifier.to_string(),
            ));
        }

        let object = Rc::new(Object::new(Rc::clone(class)));
        for field in class.instance_fields() {
            let holder = field.holder().ok_or_else(|| orphaned(&field))?;
            let value = self.field_initial_value(&holder, Some(&object), &field)?;
            object.set_field(field.name, value);
        }
        self.construct(class, &object, args)?;
        Ok(object)
    }

    /// Run `class`'s constructor on `object`, chaining to the parent
    /// constructor unless the body starts with an explicit parent call.
    fn construct(
        &mut self,
        class: &Rc<Class>,
        object: &Rc<Object>,
        args: Vec<Value>,
    ) -> ScriptResult<()> {
        let Some(constructor) = class.constructor().cloned() else {
            if !args.is_empty() {
                return Err(arity_mismatch(class.display_name(), "0", args.len()));
            }
            if let Some(parent) = class.super_class() {
                self.construct(parent, object, Vec::new())?;
            }
            return Ok(());
        };
        let MemberKind::Method(def) = &constructor.kind else {
            return Err(orphaned(&constructor));
        };

        let caller = self.caller_class();
        if !constructor.is_accessible_from(caller.as_deref()) {
            return Err(inaccessible(&constructor));
        }
        if !constructor.accepts(args.len()) {
            return Err(arity_mismatch(
                class.display_name(),
                &arity_text(&def.params),
                args.len(),
            ));
        }

        if !calls_parent_constructor(def) {
            if let Some(parent) = class.super_class() {
                self.construct(parent, object, Vec::new())?;
            }
        }

        let context = InvocationContext::method(Rc::clone(class), Some(Rc::clone(object)), class.name());
        self.invoke(
            def,
            context,
            FrameItems::default(),
            args,
            class.display_name(),
        )?;
        Ok(())
    }

    /// `super(args)`: valid only as part of a constructor.
    pub(super) fn call_parent_constructor(&mut self, args: Vec<Value>) -> ScriptResult<()> {
        let context = self.current().context().clone();
        let (Some(holder), Some(target)) = (&context.holder, &context.target) else {
            return Err(invalid_class("parent constructor called outside a constructor"));
        };
        if !context.is_constructor_of(holder) {
            return Err(invalid_class("parent constructor called outside a constructor"));
        }
        let Some(parent) = holder.super_class() else {
            return Err(invalid_class(&format!(
                "class `{}` has no parent class",
                holder.display_name()
            )));
        };
        self.construct(parent, target, args)
    }

    /// Call a member on behalf of its holder class.
    fn invoke_member(
        &mut self,
        member: &ClassMember,
        target: Option<Rc<Object>>,
        args: Vec<Value>,
    ) -> ScriptResult<Value> {
        let holder = member.holder().ok_or_else(|| orphaned(member))?;
        let display_name = format!("{}::{}", holder.display_name(), member.display_name);
        match &member.kind {
            MemberKind::Method(def) => {
                let context = InvocationContext::method(holder, target, member.name);
                self.invoke(def, context, FrameItems::default(), args, &display_name)
                    .map(|(value, _)| value)
            }
            MemberKind::AbstractMethod { .. } => Err(type_mismatch(
                "a method with a body",
                &format!("abstract `{display_name}`"),
            )),
            MemberKind::Field { .. } => Err(type_mismatch(
                "a method",
                &format!("field `{display_name}`"),
            )),
        }
    }

    /// No method accepted `argc` arguments: report an arity mismatch if the
    /// name is a method at all, otherwise fall back to a callable field.
    fn unresolved_method(&self, class: &Class, name: Name, argc: usize) -> Option<ScriptError> {
        class
            .lookup(name)
            .iter()
            .find(|member| member.is_method())
            .map(|method| {
                arity_mismatch(
                    &format!("{}::{}", holder_name(method), method.display_name),
                    &arity_text(method.params()),
                    argc,
                )
            })
    }

    pub(super) fn call_method_on(
        &mut self,
        target: &Value,
        name: Name,
        args: Vec<Value>,
    ) -> ScriptResult<Value> {
        match target {
            Value::Object(object) => self.call_method(object, name, args),
            Value::Class(class) => self.call_static(class, name, args),
            other => Err(type_mismatch("object", other.type_name())),
        }
    }

    fn call_method(
        &mut self,
        object: &Rc<Object>,
        name: Name,
        args: Vec<Value>,
    ) -> ScriptResult<Value> {
        let caller = self.caller_class();
        match object
            .class()
            .resolve_method(name, args.len(), caller.as_deref())
        {
            Resolution::Found(member) => {
                if member.modifier == Modifier::StaticFinal {
                    return Err(static_misuse(&member.display_name, &holder_name(&member)));
                }
                let target = (!member.modifier.is_static()).then(|| Rc::clone(object));
                self.invoke_member(&member, target, args)
            }
            Resolution::Inaccessible(member) => Err(inaccessible(&member)),
            Resolution::NotFound => {
                if let Some(err) = self.unresolved_method(object.class(), name, args.len()) {
                    return Err(err);
                }
                let callee = self.read_property(&Value::Object(Rc::clone(object)), name)?;
                self.call_value(&callee, args)
            }
        }
    }

    pub(super) fn call_static(
        &mut self,
        class: &Rc<Class>,
        name: Name,
        args: Vec<Value>,
    ) -> ScriptResult<Value> {
        let caller = self.caller_class();
        match class.resolve_method(name, args.len(), caller.as_deref()) {
            Resolution::Found(member) if member.modifier.is_static() => {
                self.invoke_member(&member, None, args)
            }
            Resolution::Found(member) => Err(type_mismatch(
                "static method",
                &format!("instance method `{}`", member.display_name),
            )),
            Resolution::Inaccessible(member) => Err(inaccessible(&member)),
            Resolution::NotFound => {
                if let Some(err) = self.unresolved_method(class, name, args.len()) {
                    return Err(err);
                }
                let callee = self.read_static(class, name)?;
                self.call_value(&callee, args)
            }
        }
    }

    /// `super::name(args)`: resolve from the running method's parent class.
    pub(super) fn call_parent_method(&mut self, name: Name, args: Vec<Value>) -> ScriptResult<Value> {
        let context = self.current().context().clone();
        let Some(holder) = &context.holder else {
            return Err(invalid_class("parent method called outside a class"));
        };
        let Some(parent) = holder.super_class() else {
            return Err(invalid_class(&format!(
                "class `{}` has no parent class",
                holder.display_name()
            )));
        };
        match parent.resolve_method(name, args.len(), Some(&**holder)) {
            Resolution::Found(member) => {
                let target = if member.modifier.is_static() {
                    None
                } else {
                    context.target.clone()
                };
                self.invoke_member(&member, target, args)
            }
            Resolution::Inaccessible(member) => Err(inaccessible(&member)),
            Resolution::NotFound => Err(self
                .unresolved_method(parent, name, args.len())
                .unwrap_or_else(|| undefined_member(self.name_str(name), parent.display_name()))),
        }
    }

    /// The field member `name` of `class`, as visible from the running code.
    fn visible_field(&self, class: &Class, name: Name) -> ScriptResult<Rc<ClassMember>> {
        let caller = self.caller_class();
        match class.resolve_field(name, caller.as_deref()) {
            Resolution::Found(field) => Ok(field),
            Resolution::Inaccessible(field) => Err(inaccessible(&field)),
            Resolution::NotFound => Err(undefined_member(
                self.name_str(name),
                class.display_name(),
            )),
        }
    }

    pub(super) fn read_property(&self, target: &Value, name: Name) -> ScriptResult<Value> {
        match target {
            Value::Object(object) => {
                let field = self.visible_field(object.class(), name)?;
                match field.modifier {
                    Modifier::StaticFinal => {
                        Err(static_misuse(&field.display_name, &holder_name(&field)))
                    }
                    Modifier::Static => Ok(field
                        .holder()
                        .and_then(|holder| holder.static_value(name))
                        .unwrap_or(Value::Void)),
                    _ => Ok(object.field(name).unwrap_or(Value::Void)),
                }
            }
            Value::Class(class) => self.read_static(class, name),
            other => Err(type_mismatch("object", other.type_name())),
        }
    }

    pub(super) fn write_property(&self, target: &Value, name: Name, value: Value) -> ScriptResult<()> {
        match target {
            Value::Object(object) => {
                let field = self.visible_field(object.class(), name)?;
                let holder = field.holder().ok_or_else(|| orphaned(&field))?;
                match field.modifier {
                    Modifier::StaticFinal => {
                        Err(static_misuse(&field.display_name, holder.display_name()))
                    }
                    Modifier::Static => {
                        holder.set_static(name, value);
                        Ok(())
                    }
                    Modifier::Final if !self.current().context().is_constructor_of(&holder) => {
                        Err(read_only(&field.display_name))
                    }
                    _ => {
                        object.set_field(name, value);
                        Ok(())
                    }
                }
            }
            Value::Class(class) => self.write_static(class, name, value),
            other => Err(type_mismatch("object", other.type_name())),
        }
    }

    pub(super) fn read_static(&self, class: &Class, name: Name) -> ScriptResult<Value> {
        let field = self.visible_field(class, name)?;
        if !field.modifier.is_static() {
            return Err(type_mismatch(
                "static field",
                &format!("instance field `{}`", field.display_name),
            ));
        }
        Ok(field
            .holder()
            .and_then(|holder| holder.static_value(name))
            .unwrap_or(Value::Void))
    }

    pub(super) fn write_static(&self, class: &Class, name: Name, value: Value) -> ScriptResult<()> {
        let field = self.visible_field(class, name)?;
        if !field.modifier.is_static() {
            return Err(type_mismatch(
                "static field",
                &format!("instance field `{}`", field.display_name),
            ));
        }
        if field.modifier.is_final() {
            return Err(read_only(&field.display_name));
        }
        let holder = field.holder().ok_or_else(|| orphaned(&field))?;
        holder.set_static(name, value);
        Ok(())
    }

    /// `this`, available inside instance methods and constructors.
    pub(super) fn self_value(&self) -> ScriptResult<Value> {
        self.current()
            .context()
            .target
            .as_ref()
            .map(|target| Value::Object(Rc::clone(target)))
            .ok_or_else(|| undefined_variable("this"))
    }

    /// The value a `catch` clause binds for `err`: the thrown value, or an
    /// `Exception` object describing an engine error.
    pub(super) fn exception_value(&self, err: &ScriptError) -> Value {
        if let Some(value) = thrown_value(err) {
            return value;
        }
        let names = &self.exception_names;
        let object = Object::new(Rc::clone(&self.exception_class));
        object.set_field(names.name, Value::string(err.code().title()));
        object.set_field(names.message, Value::string(err.message()));
        object.set_field(
            names.file,
            err.file_name().map_or(Value::Void, Value::string),
        );
        object.set_field(
            names.line,
            if err.is_located() {
                Value::Int(i64::from(err.span().start.line()))
            } else {
                Value::Void
            },
        );
        Value::Object(Rc::new(object))
    }
}
