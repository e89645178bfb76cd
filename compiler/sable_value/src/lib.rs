//! Sable values and object model.
//!
//! - [`Value`]: runtime values
//! - [`FrameItem`]: what a name denotes in a frame
//! - [`Function`]/[`Closure`]: script closures and native built-ins
//! - [`Class`]/[`Object`]: single-inheritance classes with scoped members
//! - [`BigDecimal`]: exact decimal arithmetic
//! - [`pack`]: binary pack/unpack codec and its format grammar
//! - [`errors`]: evaluation error factories

pub mod class;
pub mod decimal;
pub mod errors;
mod frame_item;
mod function;
pub mod pack;
mod value;

pub use class::{Class, ClassMember, MemberKind, Object, Resolution};
pub use decimal::{BigDecimal, DecimalError};
pub use frame_item::{FrameId, FrameItem, FrameItemKind};
pub use function::{Closure, FrameItems, Function, FunctionKind, NativeCallback, NativeFunction};
pub use value::Value;
