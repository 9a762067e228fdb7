//! Instruction model for synthesized operation bodies.
//!
//! Synthesized operations do not pick a backend encoding. Their bodies are
//! expressed as a short sequence of [`Instr`]s handed to an [`Emitter`]; each
//! backend lowers these to its own instruction set.
//!
//! Values are named by [`ValueId`] (SSA-like). Receivers and by-reference
//! operands are addresses; everything else is a loaded value.

use clasp_types::{FnId, Idx};
use smallvec::SmallVec;

// ── ID newtypes ─────────────────────────────────────────────────────

/// A value produced by an instruction or passed in as an argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ValueId(u32);

impl ValueId {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ── Constants ───────────────────────────────────────────────────────

/// Constant operand. The backend materializes it at the instruction's type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConstValue {
    /// The type's default value: `0`, `0.0`, `false`, null pointer, empty delegate.
    Zero,
    One,
    Bool(bool),
    Null,
}

// ── Opcodes ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinOpcode {
    Add,
    FAdd,
    Sub,
    FSub,
    Mul,
    FMul,
    SDiv,
    UDiv,
    FDiv,
    SRem,
    URem,
    FRem,
    Shl,
    /// Arithmetic (sign-filling) right shift.
    AShr,
    /// Logical (zero-filling) right shift.
    LShr,
    And,
    Or,
    Xor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnOpcode {
    Neg,
    FNeg,
    /// Logical not of a `bool`.
    Not,
    /// Bitwise complement.
    Complement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CmpPred {
    Eq,
    SLt,
    ULt,
    /// Ordered float equality.
    FEq,
    FLt,
}

/// Single conversion instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConvOp {
    SignExtend,
    ZeroExtend,
    Truncate,
    BitCast,
    SignedToFloat,
    UnsignedToFloat,
    FloatToSigned,
    FloatToUnsigned,
    FloatExtend,
    FloatTruncate,
    PtrToInt,
}

// ── Instructions ────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Instr {
    /// `dst: ty = value`
    Const {
        dst: ValueId,
        ty: Idx,
        value: ConstValue,
    },
    /// `dst: ty = *ptr`
    Load { dst: ValueId, ty: Idx, ptr: ValueId },
    /// `*ptr = value`
    Store { value: ValueId, ptr: ValueId },
    Binary {
        dst: ValueId,
        op: BinOpcode,
        lhs: ValueId,
        rhs: ValueId,
    },
    Unary {
        dst: ValueId,
        op: UnOpcode,
        operand: ValueId,
    },
    /// `dst: bool = lhs <pred> rhs`
    Compare {
        dst: ValueId,
        pred: CmpPred,
        lhs: ValueId,
        rhs: ValueId,
    },
    Convert {
        dst: ValueId,
        op: ConvOp,
        value: ValueId,
        to: Idx,
    },
    /// Address of field `index` of the aggregate `base` points to.
    ///
    /// For a class, fields are its member variables in declaration order,
    /// starting at 0 whether or not the class has a base. The base
    /// subobject is not a field; it is reached with [`Instr::BaseCast`].
    /// A backend that stores the base inline must shift member indices
    /// itself. For a class delegate, field 0 is the object and field 1 the
    /// nested delegate.
    FieldPtr {
        dst: ValueId,
        base: ValueId,
        aggregate: Idx,
        index: u32,
    },
    /// Reinterpret an address as an address of `to` (derived-to-base, pointer casts).
    BaseCast { dst: ValueId, value: ValueId, to: Idx },
    /// `dst = ptr + offset * sizeof(elem)`
    PtrOffset {
        dst: ValueId,
        ptr: ValueId,
        offset: ValueId,
        elem: Idx,
    },
    /// `dst: int64 = (lhs - rhs) / sizeof(elem)`
    PtrDiff {
        dst: ValueId,
        lhs: ValueId,
        rhs: ValueId,
        elem: Idx,
    },
    /// Entry address of a function, for delegate binding.
    FunctionAddress { dst: ValueId, func: FnId },
    Call {
        dst: Option<ValueId>,
        func: FnId,
        args: SmallVec<[ValueId; 4]>,
    },
}

impl Instr {
    /// Value defined by this instruction, if any.
    pub fn dst(&self) -> Option<ValueId> {
        match self {
            Instr::Const { dst, .. }
            | Instr::Load { dst, .. }
            | Instr::Binary { dst, .. }
            | Instr::Unary { dst, .. }
            | Instr::Compare { dst, .. }
            | Instr::Convert { dst, .. }
            | Instr::FieldPtr { dst, .. }
            | Instr::BaseCast { dst, .. }
            | Instr::PtrOffset { dst, .. }
            | Instr::PtrDiff { dst, .. }
            | Instr::FunctionAddress { dst, .. } => Some(*dst),
            Instr::Call { dst, .. } => *dst,
            Instr::Store { .. } => None,
        }
    }
}

// ── Emitter ─────────────────────────────────────────────────────────

/// Sink for the body of a synthesized operation. Implemented by backends.
pub trait Emitter {
    /// Allocate a value name not used before in the current body.
    fn fresh_value(&mut self) -> ValueId;

    fn emit(&mut self, instr: Instr);
}

/// Emitter that records instructions in order. Used by tests and by tools
/// that inspect synthesized bodies.
#[derive(Clone, Debug, Default)]
pub struct InstrBuffer {
    next: u32,
    instrs: Vec<Instr>,
}

impl InstrBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `n` values for the function's incoming arguments.
    pub fn params(&mut self, n: usize) -> SmallVec<[ValueId; 4]> {
        (0..n).map(|_| self.fresh_value()).collect()
    }

    pub fn instrs(&self) -> &[Instr] {
        &self.instrs
    }

    pub fn into_instrs(self) -> Vec<Instr> {
        self.instrs
    }

    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }
}

impl Emitter for InstrBuffer {
    fn fresh_value(&mut self) -> ValueId {
        let id = ValueId::new(self.next);
        self.next += 1;
        id
    }

    fn emit(&mut self, instr: Instr) {
        self.instrs.push(instr);
    }
}
