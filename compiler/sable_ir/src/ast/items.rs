//! Declarations: functions, parameters and classes.

use std::fmt;
use std::rc::Rc;

use super::{Block, Expr};
use crate::{Name, Span};

/// A formal parameter, optionally with a default value.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Name,
    pub default: Option<Expr>,
}

/// Parameters and body shared by named functions, inline functions and methods.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDef {
    pub params: Vec<Param>,
    pub body: Block,
}

impl FunctionDef {
    /// Number of parameters without a default value.
    pub fn required_arity(&self) -> usize {
        required_arity(&self.params)
    }

    pub fn accepts(&self, argc: usize) -> bool {
        accepts(&self.params, argc)
    }
}

pub fn required_arity(params: &[Param]) -> usize {
    params.iter().filter(|p| p.default.is_none()).count()
}

/// True if `argc` arguments can bind to `params`.
pub fn accepts(params: &[Param], argc: usize) -> bool {
    required_arity(params) <= argc && argc <= params.len()
}

/// Member visibility.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    Private,
    Protected,
    #[default]
    Public,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scope::Private => "private",
            Scope::Protected => "protected",
            Scope::Public => "public",
        })
    }
}

/// Member and class modifiers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Modifier {
    #[default]
    Default,
    Abstract,
    Final,
    Static,
    StaticFinal,
}

impl Modifier {
    pub fn is_static(self) -> bool {
        matches!(self, Modifier::Static | Modifier::StaticFinal)
    }

    pub fn is_final(self) -> bool {
        matches!(self, Modifier::Final | Modifier::StaticFinal)
    }

    pub fn is_abstract(self) -> bool {
        self == Modifier::Abstract
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Modifier::Default => "",
            Modifier::Abstract => "abstract",
            Modifier::Final => "final",
            Modifier::Static => "static",
            Modifier::StaticFinal => "static final",
        })
    }
}

/// What a class member declares.
#[derive(Clone, Debug, PartialEq)]
pub enum MemberDeclKind {
    /// A field with an optional initializer.
    Field { init: Option<Rc<Expr>> },
    /// A method with a body. A method named like its class is the constructor.
    Method(Rc<FunctionDef>),
    /// A body-less abstract method.
    AbstractMethod { params: Vec<Param> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct MemberDecl {
    pub name: Name,
    pub scope: Scope,
    pub modifier: Modifier,
    pub kind: MemberDeclKind,
    pub span: Span,
}

/// `class Name : Super { members }`.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDef {
    pub name: Name,
    pub super_class: Option<Name>,
    pub modifier: Modifier,
    pub members: Vec<MemberDecl>,
    pub span: Span,
}
