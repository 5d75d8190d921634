//! Parameter type string classification.
//!
//! Function signatures arrive as loosely formatted type strings (`u64`,
//! `&mut 0x2::coin::Coin<0x2::sui::SUI>`, `vector<u8>`). [`TypeDescriptor::parse`]
//! turns each one into a closed [`TypeCategory`] so that validation, encoding
//! and decoding can dispatch with an exhaustive `match` instead of string
//! comparisons.
//!
//! Classification never fails. Anything unrecognized degrades to
//! [`TypeCategory::GenericString`] and problems surface later, when a value is
//! validated against the descriptor.

use std::fmt;

use move_core_types::u256::U256;
use serde::{Deserialize, Serialize};

/// Bit width of a Move unsigned integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IntWidth {
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
}

impl IntWidth {
    pub const ALL: [IntWidth; 6] = [
        IntWidth::U8,
        IntWidth::U16,
        IntWidth::U32,
        IntWidth::U64,
        IntWidth::U128,
        IntWidth::U256,
    ];

    /// Map a Move type keyword (`u8` .. `u256`) to its width.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "u8" => Some(IntWidth::U8),
            "u16" => Some(IntWidth::U16),
            "u32" => Some(IntWidth::U32),
            "u64" => Some(IntWidth::U64),
            "u128" => Some(IntWidth::U128),
            "u256" => Some(IntWidth::U256),
            _ => None,
        }
    }

    pub fn bits(self) -> u16 {
        match self {
            IntWidth::U8 => 8,
            IntWidth::U16 => 16,
            IntWidth::U32 => 32,
            IntWidth::U64 => 64,
            IntWidth::U128 => 128,
            IntWidth::U256 => 256,
        }
    }

    /// Number of bytes in the little-endian BCS encoding.
    pub fn byte_len(self) -> usize {
        self.bits() as usize / 8
    }

    /// Largest representable value, `2^bits - 1`.
    pub fn max_value(self) -> U256 {
        match self {
            IntWidth::U8 => U256::from(u8::MAX),
            IntWidth::U16 => U256::from(u16::MAX),
            IntWidth::U32 => U256::from(u32::MAX),
            IntWidth::U64 => U256::from(u64::MAX),
            IntWidth::U128 => U256::from(u128::MAX),
            IntWidth::U256 => U256::max_value(),
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            IntWidth::U8 => "u8",
            IntWidth::U16 => "u16",
            IntWidth::U32 => "u32",
            IntWidth::U64 => "u64",
            IntWidth::U128 => "u128",
            IntWidth::U256 => "u256",
        }
    }
}

impl fmt::Display for IntWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Argument category of a declared parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeCategory {
    UnsignedInt(IntWidth),
    Boolean,
    Address,
    Signer,
    /// An argument passed by object id. `inner_type` keeps the declared
    /// type with any reference marker removed.
    ObjectReference { mutable: bool, inner_type: String },
    Vector(Box<TypeDescriptor>),
    GenericString,
}

/// Parsed form of a declared parameter type string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub category: TypeCategory,
    /// True when the declared type began with `&` or `&mut`.
    pub is_reference: bool,
    raw: String,
}

impl TypeDescriptor {
    /// Classify a type string.
    ///
    /// Rules apply in order: reference marker, `vector<..>`, fixed-width
    /// integer, `bool`, `address`/`signer`, struct-qualified name (contains
    /// `::`), and finally generic string.
    ///
    /// # Examples
    ///
    /// ```
    /// use sui_call_types::{IntWidth, TypeCategory, TypeDescriptor};
    ///
    /// let desc = TypeDescriptor::parse("&mut 0x2::coin::Coin<0x2::sui::SUI>");
    /// assert!(desc.is_reference);
    /// assert!(matches!(desc.category, TypeCategory::ObjectReference { mutable: true, .. }));
    ///
    /// let desc = TypeDescriptor::parse(" U64 ");
    /// assert_eq!(desc.category, TypeCategory::UnsignedInt(IntWidth::U64));
    /// ```
    pub fn parse(type_str: &str) -> Self {
        let raw = type_str.trim();
        // ASCII lowering keeps byte offsets aligned with `raw`.
        let lowered = raw.to_ascii_lowercase();

        if let Some((mutable, offset)) = strip_reference_marker(&lowered) {
            return TypeDescriptor {
                category: TypeCategory::ObjectReference {
                    mutable,
                    inner_type: raw[offset..].to_string(),
                },
                is_reference: true,
                raw: raw.to_string(),
            };
        }

        let category = classify_core(raw, &lowered);
        TypeDescriptor {
            category,
            is_reference: false,
            raw: raw.to_string(),
        }
    }

    /// The declared type string, trimmed.
    pub fn type_str(&self) -> &str {
        &self.raw
    }

    /// Whether values of this type are passed by object id.
    pub fn is_object(&self) -> bool {
        matches!(self.category, TypeCategory::ObjectReference { .. })
    }

    /// Expected object type for object arguments.
    pub fn object_type(&self) -> Option<&str> {
        match &self.category {
            TypeCategory::ObjectReference { inner_type, .. } => Some(inner_type),
            _ => None,
        }
    }

    /// Whether this is the runtime-injected transaction context
    /// (`&mut TxContext`, `&TxContext` or `TxContext`).
    pub fn is_tx_context(&self) -> bool {
        let core = match &self.category {
            TypeCategory::ObjectReference { inner_type, .. } => inner_type.to_ascii_lowercase(),
            _ => self.raw.to_ascii_lowercase(),
        };
        core == "txcontext" || core.ends_with("::tx_context::txcontext")
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Detect leading `&` / `&mut` markers. Returns mutability and the byte
/// offset where the referenced type starts.
fn strip_reference_marker(lowered: &str) -> Option<(bool, usize)> {
    if !lowered.starts_with('&') {
        return None;
    }

    let mut offset = 0;
    let mut mutable = false;
    loop {
        let rest = &lowered[offset..];
        if let Some(after) = rest.strip_prefix('&') {
            offset += 1;
            let trimmed = after.trim_start();
            offset += after.len() - trimmed.len();
        } else if let Some(after) = rest.strip_prefix("mut") {
            if !after.starts_with(char::is_whitespace) {
                break;
            }
            mutable = true;
            let trimmed = after.trim_start();
            offset += 3 + (after.len() - trimmed.len());
        } else {
            break;
        }
    }
    Some((mutable, offset))
}

fn classify_core(raw: &str, lowered: &str) -> TypeCategory {
    if let Some(rest) = lowered.strip_prefix("vector<") {
        let element = match rest.strip_suffix('>') {
            Some(inner) if !inner.trim().is_empty() => {
                let start = "vector<".len();
                TypeDescriptor::parse(&raw[start..start + inner.len()])
            }
            _ => TypeDescriptor {
                category: TypeCategory::GenericString,
                is_reference: false,
                raw: raw.to_string(),
            },
        };
        return TypeCategory::Vector(Box::new(element));
    }

    if let Some(width) = IntWidth::from_keyword(lowered) {
        return TypeCategory::UnsignedInt(width);
    }

    match lowered {
        "bool" => TypeCategory::Boolean,
        "address" => TypeCategory::Address,
        "signer" => TypeCategory::Signer,
        _ if lowered.contains("::") => TypeCategory::ObjectReference {
            mutable: false,
            inner_type: raw.to_string(),
        },
        _ => TypeCategory::GenericString,
    }
}
