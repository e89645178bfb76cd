//! Native built-in functions seeded into the root frame.

use std::rc::Rc;

use sable_diagnostic::ScriptResult;
use sable_ir::StringInterner;
use sable_value::errors::{decimal_error, integer_overflow, pack_error, type_mismatch};
use sable_value::pack::{pack, unpack, PackFormat};
use sable_value::{BigDecimal, FrameItem, FrameItems, Function, NativeFunction, Value};

use crate::print_handler::SharedPrintHandler;

/// Build the built-in function table.
pub fn builtins(interner: &StringInterner, print: &SharedPrintHandler) -> FrameItems {
    let mut items = FrameItems::default();
    let mut register = |name: &str, native: NativeFunction| {
        let key = interner.intern(name);
        let function = Function::native(key, name, native);
        items.insert(key, FrameItem::Function(Rc::new(function)));
    };

    let out = SharedPrintHandler::clone(print);
    register(
        "print",
        NativeFunction::new(0, None, move |args| {
            out.print(&join(args));
            Ok(Value::Void)
        }),
    );
    let out = SharedPrintHandler::clone(print);
    register(
        "println",
        NativeFunction::new(0, None, move |args| {
            out.println(&join(args));
            Ok(Value::Void)
        }),
    );
    register("len", NativeFunction::new(1, Some(1), |args| len(&args[0])));
    register(
        "str",
        NativeFunction::new(1, Some(1), |args| Ok(Value::string(args[0].to_string()))),
    );
    register(
        "typeof",
        NativeFunction::new(1, Some(1), |args| Ok(Value::string(type_of(&args[0])))),
    );
    register("decimal", NativeFunction::new(1, Some(1), |args| to_decimal(&args[0])));
    register("pack", NativeFunction::new(1, None, pack_values));
    register("unpack", NativeFunction::new(2, Some(2), unpack_blob));

    items
}

fn join(args: &[Value]) -> String {
    args.iter().map(ToString::to_string).collect()
}

fn count(n: usize) -> ScriptResult<Value> {
    i64::try_from(n)
        .map(Value::Int)
        .map_err(|_| integer_overflow("len"))
}

fn len(value: &Value) -> ScriptResult<Value> {
    match value {
        Value::Str(s) => count(s.chars().count()),
        Value::List(items) | Value::Tuple(items) => count(items.len()),
        Value::Blob(bytes) => count(bytes.len()),
        other => Err(type_mismatch("string, list, tuple or blob", other.type_name())),
    }
}

fn type_of(value: &Value) -> String {
    match value {
        Value::Object(object) => object.class().display_name().to_owned(),
        other => other.type_name().to_owned(),
    }
}

fn to_decimal(value: &Value) -> ScriptResult<Value> {
    let decimal = match value {
        Value::Decimal(d) => return Ok(Value::Decimal(Rc::clone(d))),
        Value::Int(i) => BigDecimal::from(*i),
        Value::Float(f) => {
            BigDecimal::from_f64(*f).ok_or_else(|| type_mismatch("finite float", "non-finite float"))?
        }
        Value::Str(s) => BigDecimal::parse(s.trim()).map_err(decimal_error)?,
        other => return Err(type_mismatch("number or string", other.type_name())),
    };
    Ok(Value::decimal(decimal))
}

fn format_arg(value: &Value) -> ScriptResult<PackFormat> {
    let text = value
        .as_str()
        .ok_or_else(|| type_mismatch("format string", value.type_name()))?;
    PackFormat::parse(text).map_err(pack_error)
}

fn pack_values(args: &[Value]) -> ScriptResult<Value> {
    let format = format_arg(&args[0])?;
    let bytes = pack(&format, &args[1..]).map_err(pack_error)?;
    Ok(Value::blob(bytes))
}

fn unpack_blob(args: &[Value]) -> ScriptResult<Value> {
    let format = format_arg(&args[0])?;
    let Value::Blob(bytes) = &args[1] else {
        return Err(type_mismatch("blob", args[1].type_name()));
    };
    let values = unpack(&format, bytes).map_err(pack_error)?;
    Ok(Value::tuple(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print_handler::buffer_handler;
    use pretty_assertions::assert_eq;
    use sable_value::FunctionKind;

    fn handler() -> SharedPrintHandler {
        buffer_handler()
    }

    fn call(items: &FrameItems, interner: &StringInterner, name: &str, args: &[Value]) -> ScriptResult<Value> {
        let Some(FrameItem::Function(function)) = items.get(&interner.intern(name)) else {
            panic!("built-in `{name}` missing");
        };
        let FunctionKind::Native(native) = function.kind() else {
            panic!("built-in `{name}` is not native");
        };
        native.call(args)
    }

    #[test]
    fn test_print_goes_through_handler() {
        let interner = StringInterner::new();
        let buffer = buffer_handler();
        let shared: SharedPrintHandler = buffer.clone();
        let items = builtins(&interner, &shared);

        call(&items, &interner, "print", &[Value::string("a"), Value::Int(1)]).ok();
        call(&items, &interner, "println", &[Value::Bool(true)]).ok();
        assert_eq!(buffer.output(), "a1true\n");
    }

    #[test]
    fn test_len_and_typeof() {
        let interner = StringInterner::new();
        let items = builtins(&interner, &handler());
        assert_eq!(
            call(&items, &interner, "len", &[Value::string("héllo")]).ok(),
            Some(Value::Int(5))
        );
        assert_eq!(
            call(&items, &interner, "typeof", &[Value::Float(1.5)]).ok(),
            Some(Value::string("float"))
        );
        assert!(call(&items, &interner, "len", &[Value::Int(3)]).is_err());
    }

    #[test]
    fn test_decimal_conversion() {
        let interner = StringInterner::new();
        let items = builtins(&interner, &handler());
        let value = call(&items, &interner, "decimal", &[Value::string("1.50")]).ok();
        assert_eq!(value.map(|v| v.to_string()), Some("1.50".to_owned()));
        assert!(call(&items, &interner, "decimal", &[Value::string("1.")]).is_err());
    }

    #[test]
    fn test_pack_then_unpack() {
        let interner = StringInterner::new();
        let items = builtins(&interner, &handler());
        let blob = call(
            &items,
            &interner,
            "pack",
            &[Value::string("<hI"), Value::Int(-2), Value::Int(7)],
        );
        let Ok(blob) = blob else {
            panic!("pack failed");
        };
        assert_eq!(blob, Value::blob(vec![0xfe, 0xff, 7, 0, 0, 0]));

        let values = call(&items, &interner, "unpack", &[Value::string("<hI"), blob]).ok();
        assert_eq!(values, Some(Value::tuple(vec![Value::Int(-2), Value::Int(7)])));
    }
}
