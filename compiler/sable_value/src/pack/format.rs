//! Pack-format grammar.
//!
//! ```text
//! format  := ws* endian? (ws* item)* ws*
//! endian  := '<' | '>' | '@' | '!'
//! item    := count? code
//! count   := digit+          (applies to the next code only)
//! code    := '?' | 'c' | 'b' | 'B' | 'h' | 'H' | 'i' | 'l' | 'I' | 'L'
//!          | 'q' | 'Q' | 'f' | 'e' | 'd' | 's' | 'p' | 'P' | 'x'
//! ```

use std::fmt;
use std::str::FromStr;

use super::PackError;

/// Largest encoded layout a format may describe.
pub const MAX_LAYOUT_BYTES: usize = 1 << 24;

/// Byte order requested by a format string.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
    /// No marker.
    #[default]
    Default,
    /// `<`
    Little,
    /// `>`
    Big,
    /// `@`
    Native,
    /// `!`
    Network,
}

impl Endianness {
    fn from_marker(c: char) -> Option<Self> {
        match c {
            '<' => Some(Endianness::Little),
            '>' => Some(Endianness::Big),
            '@' => Some(Endianness::Native),
            '!' => Some(Endianness::Network),
            _ => None,
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Endianness::Default => "",
            Endianness::Little => "<",
            Endianness::Big => ">",
            Endianness::Native => "@",
            Endianness::Network => "!",
        }
    }

    /// Whether values are laid out little-endian.
    ///
    /// Only `<` and `>` force an order; every other marker uses the
    /// platform's byte order.
    pub fn is_little(self) -> bool {
        match self {
            Endianness::Little => true,
            Endianness::Big => false,
            Endianness::Default | Endianness::Native | Endianness::Network => {
                cfg!(target_endian = "little")
            }
        }
    }
}

/// Item type codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PackType {
    Boolean,
    Character,
    SByte,
    Byte,
    Short,
    UShort,
    Integer,
    UInteger,
    Long,
    ULong,
    Float,
    Double,
    CString,
    PascalString,
    Pointer,
    PaddingByte,
}

impl PackType {
    pub fn from_code(c: char) -> Option<Self> {
        Some(match c {
            '?' => PackType::Boolean,
            'c' => PackType::Character,
            'b' => PackType::SByte,
            'B' => PackType::Byte,
            'h' => PackType::Short,
            'H' => PackType::UShort,
            'i' | 'l' => PackType::Integer,
            'I' | 'L' => PackType::UInteger,
            'q' => PackType::Long,
            'Q' => PackType::ULong,
            'f' | 'e' => PackType::Float,
            'd' => PackType::Double,
            's' => PackType::CString,
            'p' => PackType::PascalString,
            'P' => PackType::Pointer,
            'x' => PackType::PaddingByte,
            _ => return None,
        })
    }

    /// Canonical code letter.
    pub fn code(self) -> char {
        match self {
            PackType::Boolean => '?',
            PackType::Character => 'c',
            PackType::SByte => 'b',
            PackType::Byte => 'B',
            PackType::Short => 'h',
            PackType::UShort => 'H',
            PackType::Integer => 'i',
            PackType::UInteger => 'I',
            PackType::Long => 'q',
            PackType::ULong => 'Q',
            PackType::Float => 'f',
            PackType::Double => 'd',
            PackType::CString => 's',
            PackType::PascalString => 'p',
            PackType::Pointer => 'P',
            PackType::PaddingByte => 'x',
        }
    }

    /// Encoded width of one scalar, in bytes. Strings are sized by their count.
    pub fn width(self) -> usize {
        match self {
            PackType::Boolean
            | PackType::SByte
            | PackType::Byte
            | PackType::CString
            | PackType::PascalString
            | PackType::PaddingByte => 1,
            PackType::Character | PackType::Short | PackType::UShort => 2,
            PackType::Integer | PackType::UInteger | PackType::Float => 4,
            PackType::Long | PackType::ULong | PackType::Double => 8,
            PackType::Pointer => std::mem::size_of::<usize>(),
        }
    }

    pub fn is_string(self) -> bool {
        matches!(self, PackType::CString | PackType::PascalString)
    }

    /// Human-readable name, for error messages.
    pub fn describe(self) -> &'static str {
        match self {
            PackType::Boolean => "boolean",
            PackType::Character => "character",
            PackType::SByte => "signed byte",
            PackType::Byte => "byte",
            PackType::Short => "short",
            PackType::UShort => "unsigned short",
            PackType::Integer => "integer",
            PackType::UInteger => "unsigned integer",
            PackType::Long => "long",
            PackType::ULong => "unsigned long",
            PackType::Float => "float",
            PackType::Double => "double",
            PackType::CString => "C string",
            PackType::PascalString => "Pascal string",
            PackType::Pointer => "pointer",
            PackType::PaddingByte => "padding byte",
        }
    }
}

/// One item specifier: a type code and its repeat count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PackItem {
    pub item_type: PackType,
    pub count: usize,
}

impl PackItem {
    /// Number of logical values this item produces or consumes.
    pub fn value_count(&self) -> usize {
        match self.item_type {
            PackType::PaddingByte => 0,
            PackType::CString | PackType::PascalString => 1,
            _ => self.count,
        }
    }

    /// Encoded size in bytes, `None` if it overflows `usize`.
    pub fn byte_len(&self) -> Option<usize> {
        self.item_type.width().checked_mul(self.count)
    }
}

impl fmt::Display for PackItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count != 1 {
            write!(f, "{}", self.count)?;
        }
        write!(f, "{}", self.item_type.code())
    }
}

/// A parsed format string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct PackFormat {
    pub endianness: Endianness,
    pub items: Vec<PackItem>,
}

impl PackFormat {
    pub fn parse(text: &str) -> Result<Self, PackError> {
        let mut format = PackFormat::default();
        let mut count: Option<usize> = None;
        let mut seen_item = false;

        for (position, c) in text.char_indices() {
            if c.is_whitespace() {
                continue;
            }
            if let Some(endianness) = Endianness::from_marker(c) {
                if seen_item || count.is_some() || format.endianness != Endianness::Default {
                    return Err(PackError::MisplacedEndianness { marker: c, position });
                }
                format.endianness = endianness;
                continue;
            }
            if let Some(digit) = c.to_digit(10) {
                let next = count
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(digit as usize))
                    .ok_or(PackError::InvalidCount { position })?;
                count = Some(next);
                continue;
            }
            let Some(item_type) = PackType::from_code(c) else {
                return Err(PackError::UnexpectedChar { ch: c, position });
            };
            let count = count.take().unwrap_or(1);
            if count == 0 {
                return Err(PackError::InvalidCount { position });
            }
            format.items.push(PackItem { item_type, count });
            seen_item = true;
        }

        if count.is_some() {
            return Err(PackError::DanglingCount);
        }
        Ok(format)
    }

    /// Number of logical values the format produces or consumes.
    pub fn length(&self) -> usize {
        self.items
            .iter()
            .map(PackItem::value_count)
            .fold(0, usize::saturating_add)
    }

    /// Total encoded size in bytes, at most [`MAX_LAYOUT_BYTES`].
    pub fn byte_len(&self) -> Result<usize, PackError> {
        self.items
            .iter()
            .try_fold(0usize, |total, item| {
                item.byte_len().and_then(|len| total.checked_add(len))
            })
            .filter(|&total| total <= MAX_LAYOUT_BYTES)
            .ok_or(PackError::TooLarge)
    }
}

impl FromStr for PackFormat {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackFormat::parse(s)
    }
}

impl fmt::Display for PackFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endianness.marker())?;
        for item in &self.items {
            write!(f, "{item}")?;
        }
        Ok(())
    }
}
