//! Built-in numeric conversions.
//!
//! One rule per `(source, target)` scalar pair. The rule fixes the single
//! conversion instruction, whether the conversion may happen implicitly, and
//! its rank and distance for overload tie-breaking.

use clasp_types::{ConversionKind, ConversionRank, Tag};

use crate::ir::ConvOp;

/// Rule for converting one scalar type to another.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NumericConversion {
    pub op: ConvOp,
    pub kind: ConversionKind,
    pub rank: ConversionRank,
    pub distance: u8,
}

impl NumericConversion {
    #[inline]
    pub fn is_implicit(&self) -> bool {
        self.kind == ConversionKind::Implicit
    }
}

/// Conversion rule from `from` to `to`, `None` if the types are equal or not
/// convertible by a single instruction.
pub fn numeric_conversion(from: Tag, to: Tag) -> Option<NumericConversion> {
    if from == to {
        return None;
    }
    let from_bits = from.bit_width()?;
    let to_bits = to.bit_width()?;

    // `bool` and `char` take part only in explicit integer conversions.
    let restricted = matches!(from, Tag::Bool | Tag::Char) || matches!(to, Tag::Bool | Tag::Char);
    if restricted {
        if to == Tag::Bool {
            return None;
        }
        let from_int = from.is_integer() || matches!(from, Tag::Bool | Tag::Char);
        let to_int = to.is_integer() || to == Tag::Char;
        if !(from_int && to_int) {
            return None;
        }
        let op = integer_op(from_bits, to_bits, from.is_signed());
        return Some(rule(op, ConversionKind::Explicit, ConversionRank::Conversion, from_bits, to_bits, true));
    }

    let (kind, rank, op, domain_change) = match (from.is_floating_point(), to.is_floating_point()) {
        (false, false) => {
            let op = integer_op(from_bits, to_bits, from.is_signed());
            let sign_change = from.is_signed() != to.is_signed();
            let widening = to_bits > from_bits;
            // Signed to wider unsigned drops negative values.
            if widening && !(from.is_signed() && !to.is_signed()) {
                (ConversionKind::Implicit, ConversionRank::Promotion, op, sign_change)
            } else {
                (ConversionKind::Explicit, ConversionRank::Conversion, op, sign_change)
            }
        }
        (false, true) => {
            let op = if from.is_signed() {
                ConvOp::SignedToFloat
            } else {
                ConvOp::UnsignedToFloat
            };
            (ConversionKind::Implicit, ConversionRank::Conversion, op, true)
        }
        (true, false) => {
            let op = if to.is_signed() {
                ConvOp::FloatToSigned
            } else {
                ConvOp::FloatToUnsigned
            };
            (ConversionKind::Explicit, ConversionRank::Conversion, op, true)
        }
        (true, true) => {
            if to_bits > from_bits {
                (ConversionKind::Implicit, ConversionRank::Promotion, ConvOp::FloatExtend, false)
            } else {
                (ConversionKind::Explicit, ConversionRank::Conversion, ConvOp::FloatTruncate, false)
            }
        }
    };
    Some(rule(op, kind, rank, from_bits, to_bits, domain_change))
}

/// Whether `from` converts to `to` without an explicit cast.
pub(crate) fn is_implicitly_convertible(from: Tag, to: Tag) -> bool {
    numeric_conversion(from, to).is_some_and(|c| c.is_implicit())
}

fn integer_op(from_bits: u32, to_bits: u32, from_signed: bool) -> ConvOp {
    match to_bits.cmp(&from_bits) {
        std::cmp::Ordering::Greater if from_signed => ConvOp::SignExtend,
        std::cmp::Ordering::Greater => ConvOp::ZeroExtend,
        std::cmp::Ordering::Less => ConvOp::Truncate,
        std::cmp::Ordering::Equal => ConvOp::BitCast,
    }
}

/// Distance: width doublings crossed, plus one for a signedness or domain change.
fn rule(
    op: ConvOp,
    kind: ConversionKind,
    rank: ConversionRank,
    from_bits: u32,
    to_bits: u32,
    extra: bool,
) -> NumericConversion {
    let steps = from_bits.trailing_zeros().abs_diff(to_bits.trailing_zeros());
    let distance = u8::try_from(steps + u32::from(extra)).unwrap_or(u8::MAX);
    NumericConversion {
        op,
        kind,
        rank,
        distance,
    }
}
