//! Bodies of synthesized operations.
//!
//! Intrinsic operations lower to a handful of instructions each. Class
//! operations walk their recorded plan: the base part through a base cast,
//! then each member through a field address. Intrinsic parts are inlined,
//! class and user parts become calls.

use clasp_types::{FnId, Idx, Tag, TypeCategory};
use smallvec::SmallVec;

use crate::conversion::numeric_conversion;
use crate::session::SynthState;
use crate::{
    BinOpcode, CmpPred, ConstValue, ConvOp, Emitter, GenerateError, Instr, OpAux, OpKey, OpKind,
    UnOpcode, ValueId,
};

pub(crate) fn generate_body(
    state: &mut SynthState,
    func: FnId,
    emitter: &mut dyn Emitter,
    args: &[ValueId],
) -> Result<Option<ValueId>, GenerateError> {
    let arity = state
        .fns
        .try_get(func)
        .ok_or(GenerateError::UnknownFunction(func))?
        .arity();
    let key = state
        .caches
        .origin(func)
        .ok_or(GenerateError::NotSynthesized(func))?;
    if args.len() != arity {
        return Err(GenerateError::ArgumentCount {
            func,
            expected: arity,
            found: args.len(),
        });
    }
    let mut generator = Generator { state, emitter };
    generator.body(func, key, args)
}

struct Generator<'a, 'e> {
    state: &'a mut SynthState,
    emitter: &'a mut (dyn Emitter + 'e),
}

impl Generator<'_, '_> {
    fn body(&mut self, func: FnId, key: OpKey, args: &[ValueId]) -> Result<Option<ValueId>, GenerateError> {
        if key.cache_category(&self.state.pool) == TypeCategory::Class {
            self.class_body(func, key, args)
        } else {
            self.intrinsic(func, key, args)
        }
    }

    // ── Instruction helpers ─────────────────────────────────────────

    fn fresh(&mut self) -> ValueId {
        self.emitter.fresh_value()
    }

    fn constant(&mut self, ty: Idx, value: ConstValue) -> ValueId {
        let dst = self.fresh();
        self.emitter.emit(Instr::Const { dst, ty, value });
        dst
    }

    fn load(&mut self, ty: Idx, ptr: ValueId) -> ValueId {
        let dst = self.fresh();
        self.emitter.emit(Instr::Load { dst, ty, ptr });
        dst
    }

    fn store(&mut self, value: ValueId, ptr: ValueId) {
        self.emitter.emit(Instr::Store { value, ptr });
    }

    fn binary(&mut self, op: BinOpcode, lhs: ValueId, rhs: ValueId) -> ValueId {
        let dst = self.fresh();
        self.emitter.emit(Instr::Binary { dst, op, lhs, rhs });
        dst
    }

    fn unary(&mut self, op: UnOpcode, operand: ValueId) -> ValueId {
        let dst = self.fresh();
        self.emitter.emit(Instr::Unary { dst, op, operand });
        dst
    }

    fn compare(&mut self, pred: CmpPred, lhs: ValueId, rhs: ValueId) -> ValueId {
        let dst = self.fresh();
        self.emitter.emit(Instr::Compare {
            dst,
            pred,
            lhs,
            rhs,
        });
        dst
    }

    fn field(&mut self, base: ValueId, aggregate: Idx, index: u32) -> ValueId {
        let dst = self.fresh();
        self.emitter.emit(Instr::FieldPtr {
            dst,
            base,
            aggregate,
            index,
        });
        dst
    }

    fn cast(&mut self, value: ValueId, to: Idx) -> ValueId {
        let dst = self.fresh();
        self.emitter.emit(Instr::BaseCast { dst, value, to });
        dst
    }

    fn convert(&mut self, op: ConvOp, value: ValueId, to: Idx) -> ValueId {
        let dst = self.fresh();
        self.emitter.emit(Instr::Convert { dst, op, value, to });
        dst
    }

    fn offset(&mut self, ptr: ValueId, offset: ValueId, ptr_ty: Idx) -> ValueId {
        let elem = self.state.pool.pointee(ptr_ty).unwrap_or(Idx::VOID);
        let dst = self.fresh();
        self.emitter.emit(Instr::PtrOffset {
            dst,
            ptr,
            offset,
            elem,
        });
        dst
    }

    /// AND a list of `bool`s; `true` when empty.
    fn all(&mut self, values: &[ValueId]) -> ValueId {
        let Some((&first, rest)) = values.split_first() else {
            return self.constant(Idx::BOOL, ConstValue::Bool(true));
        };
        rest.iter()
            .fold(first, |acc, &next| self.binary(BinOpcode::And, acc, next))
    }

    // ── Intrinsic operations ────────────────────────────────────────

    fn intrinsic(&mut self, func: FnId, key: OpKey, args: &[ValueId]) -> Result<Option<ValueId>, GenerateError> {
        let ty = key.ty;
        let tag = self.state.pool.tag(ty);
        let arg = |i: usize| {
            args.get(i).copied().ok_or(GenerateError::ArgumentCount {
                func,
                expected: i + 1,
                found: args.len(),
            })
        };

        let result = match key.kind {
            OpKind::DefaultCtor => {
                let zero = self.constant(ty, ConstValue::Zero);
                self.store(zero, arg(0)?);
                None
            }
            OpKind::CopyCtor | OpKind::CopyAssignment => {
                let value = if tag == Tag::ClassDelegate {
                    self.load(ty, arg(1)?)
                } else {
                    arg(1)?
                };
                self.store(value, arg(0)?);
                None
            }
            OpKind::MoveCtor | OpKind::MoveAssignment => {
                let value = self.load(ty, arg(1)?);
                self.store(value, arg(0)?);
                None
            }
            OpKind::Equal if tag == Tag::ClassDelegate => {
                Some(self.class_delegate_equal(ty, arg(0)?, arg(1)?))
            }
            OpKind::Equal => {
                let pred = if tag.is_floating_point() {
                    CmpPred::FEq
                } else {
                    CmpPred::Eq
                };
                Some(self.compare(pred, arg(0)?, arg(1)?))
            }
            OpKind::Less => {
                let pred = if tag.is_floating_point() {
                    CmpPred::FLt
                } else if tag.is_signed() {
                    CmpPred::SLt
                } else {
                    CmpPred::ULt
                };
                Some(self.compare(pred, arg(0)?, arg(1)?))
            }
            kind if kind.is_arithmetic() => {
                let op = binary_opcode(kind, tag).ok_or(GenerateError::NotSynthesized(func))?;
                Some(self.binary(op, arg(0)?, arg(1)?))
            }
            OpKind::UnaryPlus => Some(arg(0)?),
            OpKind::UnaryMinus => {
                let op = if tag.is_floating_point() {
                    UnOpcode::FNeg
                } else {
                    UnOpcode::Neg
                };
                Some(self.unary(op, arg(0)?))
            }
            OpKind::Not => Some(self.unary(UnOpcode::Not, arg(0)?)),
            OpKind::Complement => Some(self.unary(UnOpcode::Complement, arg(0)?)),
            OpKind::Increment | OpKind::Decrement => {
                let addr = arg(0)?;
                let old = self.load(ty, addr);
                let down = key.kind == OpKind::Decrement;
                let new = if tag == Tag::Pointer {
                    let one = self.constant(Idx::INT64, ConstValue::One);
                    let step = if down {
                        self.unary(UnOpcode::Neg, one)
                    } else {
                        one
                    };
                    self.offset(old, step, ty)
                } else {
                    let one = self.constant(ty, ConstValue::One);
                    let op = match (down, tag.is_floating_point()) {
                        (false, false) => BinOpcode::Add,
                        (false, true) => BinOpcode::FAdd,
                        (true, false) => BinOpcode::Sub,
                        (true, true) => BinOpcode::FSub,
                    };
                    self.binary(op, old, one)
                };
                self.store(new, addr);
                Some(new)
            }
            OpKind::ConvertingCtor => {
                let OpAux::Type(source) = key.aux else {
                    return Err(GenerateError::NotSynthesized(func));
                };
                let rule = numeric_conversion(self.state.pool.tag(source), tag)
                    .ok_or(GenerateError::NotSynthesized(func))?;
                let value = self.convert(rule.op, arg(1)?, ty);
                self.store(value, arg(0)?);
                None
            }
            // A reference and a pointer share one representation: the address.
            OpKind::Deref | OpKind::AddressOf => Some(arg(0)?),
            OpKind::PtrPlusOffset => Some(self.offset(arg(0)?, arg(1)?, ty)),
            OpKind::OffsetPlusPtr => Some(self.offset(arg(1)?, arg(0)?, ty)),
            OpKind::PtrMinusOffset => {
                let back = self.unary(UnOpcode::Neg, arg(1)?);
                Some(self.offset(arg(0)?, back, ty))
            }
            OpKind::PtrMinusPtr => {
                let elem = self.state.pool.pointee(ty).unwrap_or(Idx::VOID);
                let dst = self.fresh();
                self.emitter.emit(Instr::PtrDiff {
                    dst,
                    lhs: arg(0)?,
                    rhs: arg(1)?,
                    elem,
                });
                Some(dst)
            }
            OpKind::NullToPtr => {
                let null = self.constant(ty, ConstValue::Null);
                self.store(null, arg(0)?);
                None
            }
            OpKind::PtrToVoidPtr | OpKind::VoidPtrToPtr => {
                let value = self.cast(arg(1)?, ty);
                self.store(value, arg(0)?);
                None
            }
            OpKind::VoidPtrToInt => {
                let value = self.convert(ConvOp::PtrToInt, arg(1)?, Idx::UINT64);
                self.store(value, arg(0)?);
                None
            }
            OpKind::CtorFromFunction | OpKind::AssignFromFunction => {
                let OpAux::Function(method) = key.aux else {
                    return Err(GenerateError::NotSynthesized(func));
                };
                if tag == Tag::ClassDelegate {
                    self.bind_method(func, ty, arg(0)?, arg(1)?, arg(2)?)?;
                } else {
                    let dst = self.fresh();
                    self.emitter.emit(Instr::FunctionAddress { dst, func: method });
                    self.store(dst, arg(0)?);
                }
                None
            }
            _ => return Err(GenerateError::NotSynthesized(func)),
        };
        Ok(result)
    }

    /// Class delegate layout: field 0 is the object as `void*`, field 1 the
    /// nested delegate holding the method.
    fn bind_method(
        &mut self,
        func: FnId,
        ty: Idx,
        this: ValueId,
        object: ValueId,
        method_ref: ValueId,
    ) -> Result<(), GenerateError> {
        let nested = self
            .state
            .caches
            .plan(func)
            .and_then(|plan| plan.parts.first().copied())
            .ok_or(GenerateError::MissingPlan(func))?;
        let void_ptr = self.state.pool.void_pointer();
        let object_slot = self.field(this, ty, 0);
        let erased = self.cast(object, void_ptr);
        self.store(erased, object_slot);
        let delegate_slot = self.field(this, ty, 1);
        let nested_key = self
            .state
            .caches
            .origin(nested)
            .ok_or(GenerateError::NotSynthesized(nested))?;
        self.intrinsic(nested, nested_key, &[delegate_slot, method_ref])?;
        Ok(())
    }

    fn class_delegate_equal(&mut self, ty: Idx, lhs: ValueId, rhs: ValueId) -> ValueId {
        let void_ptr = self.state.pool.void_pointer();
        let nested = self.state.pool.class_delegate_nested(ty).unwrap_or(Idx::NONE);
        let mut parts: SmallVec<[ValueId; 2]> = SmallVec::new();
        for (index, field_ty) in [(0, void_ptr), (1, nested)] {
            let l = self.field(lhs, ty, index);
            let r = self.field(rhs, ty, index);
            let l = self.load(field_ty, l);
            let r = self.load(field_ty, r);
            parts.push(self.compare(CmpPred::Eq, l, r));
        }
        self.all(&parts)
    }

    // ── Class operations ────────────────────────────────────────────

    fn class_body(&mut self, func: FnId, key: OpKey, args: &[ValueId]) -> Result<Option<ValueId>, GenerateError> {
        let plan = self
            .state
            .caches
            .plan(func)
            .cloned()
            .ok_or(GenerateError::MissingPlan(func))?;
        let class = key.ty;
        let base = self.state.pool.class_def(class).and_then(|def| def.base);
        let lhs = args.first().copied().ok_or(GenerateError::ArgumentCount {
            func,
            expected: 1,
            found: 0,
        })?;
        let rhs = args.get(1).copied();

        let mut results: SmallVec<[ValueId; 8]> = SmallVec::new();
        if let (Some(base_fn), Some(base)) = (plan.base, base) {
            let base_ptr = self.state.pool.pointer(base);
            let l = self.cast(lhs, base_ptr);
            let r = rhs.map(|r| self.cast(r, base_ptr));
            results.extend(self.invoke(base_fn, l, r)?);
        }
        for (index, &part) in (0u32..).zip(plan.parts.iter()) {
            let l = self.field(lhs, class, index);
            let r = rhs.map(|r| self.field(r, class, index));
            results.extend(self.invoke(part, l, r)?);
        }

        if key.kind == OpKind::Equal {
            Ok(Some(self.all(&results)))
        } else {
            Ok(None)
        }
    }

    /// Apply `part` to operands given by address. Receivers and reference
    /// parameters take the address, value parameters a load from it.
    fn invoke(
        &mut self,
        part: FnId,
        lhs: ValueId,
        rhs: Option<ValueId>,
    ) -> Result<Option<ValueId>, GenerateError> {
        let symbol = self
            .state
            .fns
            .try_get(part)
            .ok_or(GenerateError::UnknownFunction(part))?;
        let (is_member, ret) = (symbol.is_member(), symbol.ret);
        let params: SmallVec<[Idx; 3]> = symbol.param_types().collect();
        let addresses = [Some(lhs), rhs];

        let mut args: SmallVec<[ValueId; 4]> = SmallVec::new();
        for (index, &param) in params.iter().enumerate() {
            let Some(addr) = addresses.get(index).copied().flatten() else {
                return Err(GenerateError::ArgumentCount {
                    func: part,
                    expected: params.len(),
                    found: index,
                });
            };
            let by_address = (index == 0 && is_member) || self.state.pool.tag(param).is_reference();
            args.push(if by_address {
                addr
            } else {
                self.load(param, addr)
            });
        }

        match self.state.caches.origin(part) {
            Some(key) if key.cache_category(&self.state.pool) != TypeCategory::Class => {
                self.intrinsic(part, key, &args)
            }
            _ => {
                let dst = (ret != Idx::VOID).then(|| self.fresh());
                self.emitter.emit(Instr::Call {
                    dst,
                    func: part,
                    args,
                });
                Ok(dst)
            }
        }
    }
}

/// Opcode of a binary arithmetic operation on a scalar of type `tag`.
fn binary_opcode(kind: OpKind, tag: Tag) -> Option<BinOpcode> {
    let float = tag.is_floating_point();
    let signed = tag.is_signed();
    Some(match kind {
        OpKind::Add if float => BinOpcode::FAdd,
        OpKind::Add => BinOpcode::Add,
        OpKind::Sub if float => BinOpcode::FSub,
        OpKind::Sub => BinOpcode::Sub,
        OpKind::Mul if float => BinOpcode::FMul,
        OpKind::Mul => BinOpcode::Mul,
        OpKind::Div if float => BinOpcode::FDiv,
        OpKind::Div if signed => BinOpcode::SDiv,
        OpKind::Div => BinOpcode::UDiv,
        OpKind::Rem if float => BinOpcode::FRem,
        OpKind::Rem if signed => BinOpcode::SRem,
        OpKind::Rem => BinOpcode::URem,
        OpKind::Shl => BinOpcode::Shl,
        OpKind::Shr if signed => BinOpcode::AShr,
        OpKind::Shr => BinOpcode::LShr,
        OpKind::BitAnd => BinOpcode::And,
        OpKind::BitOr => BinOpcode::Or,
        OpKind::BitXor => BinOpcode::Xor,
        _ => return None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
