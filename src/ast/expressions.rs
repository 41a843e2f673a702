use crate::lexer::tokens::Token;

use super::ast::NodeId;

// LITERALS

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Integer,
    Float,
    String,
    Char,
    Bool,
    Null,
}

/// Smallest host integer an integer literal fits in.
///
/// Literals are never given an unsigned type, and nothing narrower than
/// 32 bits is inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IntWidth {
    I32,
    I64,
    I128,
    I256,
    /// Wider than 256 bits, needs an arbitrary precision integer
    Heap,
}

/// Literal Expression
///
/// `value` is the source text. For strings and chars it includes the quotes
/// but not the prefix letter, which is kept in `prefix`. Interpolated strings
/// have their `{...}` spans parsed into `format_args` and emptied out of
/// `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub kind: LiteralKind,
    pub value: String,
    pub prefix: Option<char>,
    pub contains_format_args: bool,
    pub format_args: Vec<NodeId>,
}

impl LiteralExpr {
    pub fn new(kind: LiteralKind, value: String) -> Self {
        LiteralExpr {
            kind,
            value,
            prefix: None,
            contains_format_args: false,
            format_args: vec![],
        }
    }

    /// Picks the integer width for an integer literal, `None` for anything
    /// else or for digits that are not valid in the literal's base.
    pub fn int_width(&self) -> Option<IntWidth> {
        if self.kind != LiteralKind::Integer {
            return None;
        }

        let digits = self.value.replace('_', "");
        let (radix, digits) = if let Some(rest) = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
        {
            (16, rest)
        } else if let Some(rest) = digits
            .strip_prefix("0b")
            .or_else(|| digits.strip_prefix("0B"))
        {
            (2, rest)
        } else if digits.len() > 1 && digits.starts_with('0') {
            (8, &digits[1..])
        } else {
            (10, digits.as_str())
        };

        let bits = bit_length(digits, radix)?;

        Some(match bits {
            0..=32 => IntWidth::I32,
            33..=64 => IntWidth::I64,
            65..=128 => IntWidth::I128,
            129..=256 => IntWidth::I256,
            _ => IntWidth::Heap,
        })
    }
}

/// Number of significant bits of an unsigned number written in `radix`.
fn bit_length(digits: &str, radix: u32) -> Option<u32> {
    if digits.is_empty() {
        return None;
    }

    // little endian base 2^32 limbs
    let mut limbs: Vec<u32> = vec![0];

    for c in digits.chars() {
        let mut carry = c.to_digit(radix)? as u64;

        for limb in limbs.iter_mut() {
            let value = *limb as u64 * radix as u64 + carry;
            *limb = value as u32;
            carry = value >> 32;
        }

        if carry > 0 {
            limbs.push(carry as u32);
        }
    }

    while limbs.len() > 1 && limbs.last() == Some(&0) {
        limbs.pop();
    }

    let top = *limbs.last()?;
    Some(32 * (limbs.len() as u32 - 1) + (32 - top.leading_zeros()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentExpr {
    pub name: String,
    pub is_reserved_primitive: bool,
}

// OPERATORS

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub lhs: NodeId,
    pub op: Token,
    pub rhs: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    Prefix,
    Postfix,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operand: NodeId,
    pub op: Token,
    pub fixity: Fixity,
}

/// `c ? a : b` or `a if c else b`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TernaryKind {
    Question,
    Inline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TernaryExpr {
    pub kind: TernaryKind,
    pub condition: NodeId,
    pub if_true: NodeId,
    pub if_false: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastExpr {
    pub value: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstOfKind {
    Has,
    Derives,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstOfExpr {
    pub value: NodeId,
    pub kind: InstOfKind,
    pub target: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsyncKind {
    Await,
    Spawn,
    Thread,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AsyncThreadingExpr {
    pub kind: AsyncKind,
    pub value: NodeId,
}

// PATHS AND CALLS

/// `a::b::c`, or `::a` when `global` is set
#[derive(Debug, Clone, PartialEq)]
pub struct ScopePathExpr {
    pub segments: Vec<NodeId>,
    pub global: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DotPathExpr {
    pub lhs: NodeId,
    pub rhs: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub lhs: NodeId,
    pub index: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub path: NodeId,
    pub generics: Option<NodeId>,
    pub args: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    Positional,
    Keyword,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentExpr {
    pub kind: ArgumentKind,
    pub name: Option<String>,
    pub value: NodeId,
}

/// The `<T, U>` part of a turbofish
#[derive(Debug, Clone, PartialEq)]
pub struct GenericInvokeExpr {
    pub args: Vec<NodeId>,
}

// COLLECTIONS

/// Elements of a tuple, array or set literal
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionExpr {
    pub elements: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapExpr {
    pub pairs: Vec<(NodeId, NodeId)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenthesizedExpr {
    pub value: NodeId,
}

/// `Path { a = 1 }`, or `{ .a = 1 }` without a path
#[derive(Debug, Clone, PartialEq)]
pub struct ObjInitExpr {
    pub path: Option<NodeId>,
    pub fields: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaExpr {
    pub func: NodeId,
}
