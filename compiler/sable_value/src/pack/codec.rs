//! Encoding and decoding of values against a [`PackFormat`].

use super::{PackError, PackFormat, PackItem, PackType};
use crate::value::Value;

macro_rules! put {
    ($out:expr, $little:expr, $value:expr) => {{
        let value = $value;
        if $little {
            $out.extend_from_slice(&value.to_le_bytes());
        } else {
            $out.extend_from_slice(&value.to_be_bytes());
        }
    }};
}

macro_rules! get {
    ($reader:expr, $little:expr, $ty:ty) => {{
        let bytes = $reader.take_array::<{ std::mem::size_of::<$ty>() }>()?;
        if $little {
            <$ty>::from_le_bytes(bytes)
        } else {
            <$ty>::from_be_bytes(bytes)
        }
    }};
}

fn narrow<T: TryFrom<i64>>(index: usize, value: i64, item_type: PackType) -> Result<T, PackError> {
    T::try_from(value).map_err(|_| PackError::OutOfRange {
        index,
        expected: item_type.describe(),
    })
}

fn wrong_type(index: usize, item_type: PackType, value: &Value) -> PackError {
    PackError::ValueType {
        index,
        expected: item_type.describe(),
        found: value.type_name(),
    }
}

fn int_arg(index: usize, value: &Value, item_type: PackType) -> Result<i64, PackError> {
    value.as_int().ok_or_else(|| wrong_type(index, item_type, value))
}

fn string_arg(index: usize, value: &Value, item_type: PackType) -> Result<Vec<u8>, PackError> {
    match value {
        Value::Str(s) => Ok(s.as_bytes().to_vec()),
        Value::Blob(bytes) => Ok(bytes.to_vec()),
        other => Err(wrong_type(index, item_type, other)),
    }
}

/// Write `data` into exactly `width` bytes, truncating or NUL-padding.
fn put_fixed(out: &mut Vec<u8>, data: &[u8], width: usize) {
    let used = data.len().min(width);
    out.extend_from_slice(&data[..used]);
    out.resize(out.len() + (width - used), 0);
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "f/e items are single precision by definition"
)]
fn encode_scalar(
    out: &mut Vec<u8>,
    item_type: PackType,
    index: usize,
    value: &Value,
    little: bool,
) -> Result<(), PackError> {
    match item_type {
        PackType::Boolean => {
            let b = value.as_bool().ok_or_else(|| wrong_type(index, item_type, value))?;
            out.push(u8::from(b));
        }
        PackType::Character => {
            let mut chars = value.as_str().map(str::chars).into_iter().flatten();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(wrong_type(index, item_type, value));
            };
            let unit = u16::try_from(u32::from(c)).map_err(|_| PackError::OutOfRange {
                index,
                expected: item_type.describe(),
            })?;
            put!(out, little, unit);
        }
        PackType::SByte => {
            put!(out, little, narrow::<i8>(index, int_arg(index, value, item_type)?, item_type)?);
        }
        PackType::Byte => {
            put!(out, little, narrow::<u8>(index, int_arg(index, value, item_type)?, item_type)?);
        }
        PackType::Short => {
            put!(out, little, narrow::<i16>(index, int_arg(index, value, item_type)?, item_type)?);
        }
        PackType::UShort => {
            put!(out, little, narrow::<u16>(index, int_arg(index, value, item_type)?, item_type)?);
        }
        PackType::Integer => {
            put!(out, little, narrow::<i32>(index, int_arg(index, value, item_type)?, item_type)?);
        }
        PackType::UInteger => {
            put!(out, little, narrow::<u32>(index, int_arg(index, value, item_type)?, item_type)?);
        }
        PackType::Long => put!(out, little, int_arg(index, value, item_type)?),
        PackType::ULong => {
            put!(out, little, narrow::<u64>(index, int_arg(index, value, item_type)?, item_type)?);
        }
        PackType::Pointer => {
            put!(out, little, narrow::<usize>(index, int_arg(index, value, item_type)?, item_type)?);
        }
        PackType::Float => {
            let f = value.as_f64().ok_or_else(|| wrong_type(index, item_type, value))?;
            put!(out, little, f as f32);
        }
        PackType::Double => {
            let f = value.as_f64().ok_or_else(|| wrong_type(index, item_type, value))?;
            put!(out, little, f);
        }
        PackType::CString | PackType::PascalString | PackType::PaddingByte => {}
    }
    Ok(())
}

/// Serialize `values` according to `format`.
///
/// The number of values must equal [`PackFormat::length`].
pub fn pack(format: &PackFormat, values: &[Value]) -> Result<Vec<u8>, PackError> {
    let expected = format.length();
    if values.len() != expected {
        return Err(PackError::ValueCount {
            expected,
            got: values.len(),
        });
    }

    let little = format.endianness.is_little();
    let mut out = Vec::with_capacity(format.byte_len()?);
    let mut index = 0;

    for &PackItem { item_type, count } in &format.items {
        match item_type {
            PackType::PaddingByte => out.resize(out.len() + count, 0),
            PackType::CString => {
                let data = string_arg(index, &values[index], item_type)?;
                put_fixed(&mut out, &data, count);
                index += 1;
            }
            PackType::PascalString => {
                let data = string_arg(index, &values[index], item_type)?;
                let capacity = count.saturating_sub(1);
                let len = data.len().min(capacity).min(usize::from(u8::MAX));
                out.push(u8::try_from(len).unwrap_or(u8::MAX));
                put_fixed(&mut out, &data[..len], capacity);
                index += 1;
            }
            _ => {
                for _ in 0..count {
                    encode_scalar(&mut out, item_type, index, &values[index], little)?;
                    index += 1;
                }
            }
        }
    }
    Ok(out)
}

struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], PackError> {
        let truncated = PackError::Truncated {
            needed: self.position.saturating_add(n),
            available: self.bytes.len(),
        };
        let end = self.position.checked_add(n).ok_or_else(|| truncated.clone())?;
        let slice = self.bytes.get(self.position..end).ok_or(truncated)?;
        self.position = end;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], PackError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }
}

fn widen<T: TryInto<i64>>(value: T, item_type: PackType) -> Result<Value, PackError> {
    value
        .try_into()
        .map(Value::Int)
        .map_err(|_| PackError::Overflow {
            expected: item_type.describe(),
        })
}

fn decode_scalar(reader: &mut Reader<'_>, item_type: PackType, little: bool) -> Result<Value, PackError> {
    Ok(match item_type {
        PackType::Boolean => Value::Bool(get!(reader, little, u8) != 0),
        PackType::Character => {
            let unit = get!(reader, little, u16);
            let c = char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER);
            Value::string(c.to_string())
        }
        PackType::SByte => Value::Int(i64::from(get!(reader, little, i8))),
        PackType::Byte => Value::Int(i64::from(get!(reader, little, u8))),
        PackType::Short => Value::Int(i64::from(get!(reader, little, i16))),
        PackType::UShort => Value::Int(i64::from(get!(reader, little, u16))),
        PackType::Integer => Value::Int(i64::from(get!(reader, little, i32))),
        PackType::UInteger => Value::Int(i64::from(get!(reader, little, u32))),
        PackType::Long => Value::Int(get!(reader, little, i64)),
        PackType::ULong => widen(get!(reader, little, u64), item_type)?,
        PackType::Pointer => widen(get!(reader, little, usize), item_type)?,
        PackType::Float => Value::Float(f64::from(get!(reader, little, f32))),
        PackType::Double => Value::Float(get!(reader, little, f64)),
        PackType::CString | PackType::PascalString | PackType::PaddingByte => Value::Void,
    })
}

/// Read values back from `bytes` according to `format`.
///
/// Bytes past the end of the layout are ignored.
pub fn unpack(format: &PackFormat, bytes: &[u8]) -> Result<Vec<Value>, PackError> {
    let needed = format.byte_len()?;
    if bytes.len() < needed {
        return Err(PackError::Truncated {
            needed,
            available: bytes.len(),
        });
    }

    let little = format.endianness.is_little();
    let mut reader = Reader { bytes, position: 0 };
    let mut values = Vec::with_capacity(format.length());

    for &PackItem { item_type, count } in &format.items {
        match item_type {
            PackType::PaddingByte => {
                reader.take(count)?;
            }
            PackType::CString => {
                let raw = reader.take(count)?;
                let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
                values.push(Value::string(String::from_utf8_lossy(&raw[..end])));
            }
            PackType::PascalString => {
                let len = usize::from(reader.take_array::<1>()?[0]);
                let raw = reader.take(count.saturating_sub(1))?;
                let data = &raw[..len.min(raw.len())];
                values.push(Value::string(String::from_utf8_lossy(data)));
            }
            _ => {
                for _ in 0..count {
                    values.push(decode_scalar(&mut reader, item_type, little)?);
                }
            }
        }
    }
    Ok(values)
}
