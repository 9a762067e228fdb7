//! Compiled-library metadata for synthesized operations.
//!
//! A synthesized operation is stored as its [`OpKind`] tag plus the owning
//! type and discriminator written structurally, by name rather than by
//! in-memory handle. Importing a library resolves those names in the
//! importing session and re-derives the operation through the ordinary
//! caches, so the restored function is the session's own instance.

use std::fmt;

use clasp_diagnostic::{Diagnostic, ErrorCode};
use clasp_ir::{Name, Span};
use clasp_types::{FnId, Idx, Tag, TypeCategory};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::get_or_create;
use crate::class_synth::synthesize;
use crate::{OpAux, OpKey, OpKind, SynthError, SynthSession, Viability};

/// A type written without session-local handles.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    /// Fixed primitive index.
    Primitive(u8),
    Pointer(Box<TypeRef>),
    LvalueRef(Box<TypeRef>),
    RvalueRef(Box<TypeRef>),
    /// Class, delegate or class delegate, by declared name.
    Named(String),
    /// Nested delegate of a class delegate.
    NestedDelegate(Box<TypeRef>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuxRef {
    None,
    Type(TypeRef),
    /// Bound function, by name.
    Function(String),
}

/// One persisted synthesized operation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersistedOp {
    pub tag: u8,
    pub owner: TypeRef,
    pub aux: AuxRef,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PersistError {
    /// Only engine-produced functions can be persisted.
    NotSynthesized(FnId),
    /// A type with no stable name (an unregistered nominal type).
    Unnameable(Idx),
    UnknownTag(u8),
    UnresolvedType(String),
    /// The bound function is missing or overloaded in the importing session.
    UnresolvedFunction(String),
    /// The operation does not exist for the resolved type.
    Unavailable { kind: OpKind, owner: String },
    /// The class operation exists in the library but is illegal here.
    Illegal(SynthError),
    Encode(String),
    Decode(String),
}

impl PersistError {
    pub fn to_diagnostic(&self, span: Span) -> Diagnostic {
        Diagnostic::error(ErrorCode::E9002, self.to_string(), span)
    }
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::NotSynthesized(func) => {
                write!(f, "function {func:?} is not a synthesized operation")
            }
            PersistError::Unnameable(ty) => write!(f, "type {ty:?} has no persistent name"),
            PersistError::UnknownTag(tag) => write!(f, "unknown operation tag {tag}"),
            PersistError::UnresolvedType(name) => write!(f, "type `{name}` is not declared"),
            PersistError::UnresolvedFunction(name) => {
                write!(f, "function `{name}` is not declared or is overloaded")
            }
            PersistError::Unavailable { kind, owner } => {
                write!(f, "operation {kind:?} is not available for `{owner}`")
            }
            PersistError::Illegal(err) => write!(f, "{err}"),
            PersistError::Encode(msg) => write!(f, "failed to encode operations: {msg}"),
            PersistError::Decode(msg) => write!(f, "failed to decode operations: {msg}"),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Illegal(err) => Some(err),
            _ => None,
        }
    }
}

pub fn encode_ops(ops: &[PersistedOp]) -> Result<Vec<u8>, PersistError> {
    bincode::serialize(ops).map_err(|e| PersistError::Encode(e.to_string()))
}

pub fn decode_ops(bytes: &[u8]) -> Result<Vec<PersistedOp>, PersistError> {
    bincode::deserialize(bytes).map_err(|e| PersistError::Decode(e.to_string()))
}

impl SynthSession {
    /// Describe synthesized function `func` for library metadata.
    pub fn persist_op(&self, func: FnId) -> Result<PersistedOp, PersistError> {
        let key = self.origin(func).ok_or(PersistError::NotSynthesized(func))?;
        let aux = match key.aux {
            OpAux::None => AuxRef::None,
            OpAux::Type(ty) => AuxRef::Type(self.type_ref(ty)?),
            OpAux::Function(bound) => {
                let symbol = self
                    .fns()
                    .try_get(bound)
                    .ok_or(PersistError::NotSynthesized(bound))?;
                AuxRef::Function(self.interner().lookup(symbol.name).to_owned())
            }
        };
        Ok(PersistedOp {
            tag: key.kind.tag(),
            owner: self.type_ref(key.ty)?,
            aux,
        })
    }

    /// Re-derive a persisted operation in this session.
    ///
    /// Restoring the same operation twice yields the same function.
    pub fn restore_op(&mut self, op: &PersistedOp) -> Result<FnId, PersistError> {
        let kind = OpKind::from_tag(op.tag).ok_or(PersistError::UnknownTag(op.tag))?;
        let owner = self.resolve_type(&op.owner)?;
        let aux = match &op.aux {
            AuxRef::None => OpAux::None,
            AuxRef::Type(ty) => OpAux::Type(self.resolve_type(ty)?),
            AuxRef::Function(name) => {
                let func = self
                    .interner()
                    .get(name)
                    .and_then(|name| self.fns().find_user(name))
                    .ok_or_else(|| PersistError::UnresolvedFunction(name.clone()))?;
                OpAux::Function(func)
            }
        };
        let key = OpKey { ty: owner, kind, aux };
        let unavailable = |session: &SynthSession| PersistError::Unavailable {
            kind,
            owner: session.type_name(owner),
        };

        if !key.is_well_formed() {
            return Err(unavailable(self));
        }

        let func = if key.cache_category(self.pool()) == TypeCategory::Class {
            let member = kind.special_member().ok_or_else(|| unavailable(self))?;
            let outcome = synthesize(&mut self.cx(), owner, member);
            match outcome {
                Viability::Viable(fns) => fns.first().copied().ok_or_else(|| unavailable(self))?,
                Viability::Illegal(err) => return Err(PersistError::Illegal(err)),
                Viability::NotViable => return Err(unavailable(self)),
            }
        } else {
            let created = get_or_create(&mut self.cx(), key);
            created.ok_or_else(|| unavailable(self))?
        };
        debug!(?kind, ?owner, ?func, "restored persisted operation");
        Ok(func)
    }

    fn type_ref(&self, ty: Idx) -> Result<TypeRef, PersistError> {
        if ty.is_primitive() {
            return u8::try_from(ty.raw())
                .map(TypeRef::Primitive)
                .map_err(|_| PersistError::Unnameable(ty));
        }
        let pool = self.pool();
        let name = |n: Name| self.interner().lookup(n).to_owned();
        match pool.tag(ty) {
            tag @ (Tag::Pointer | Tag::LvalueRef | Tag::RvalueRef) => {
                let base = pool.base(ty).ok_or(PersistError::Unnameable(ty))?;
                let base = Box::new(self.type_ref(base)?);
                Ok(match tag {
                    Tag::Pointer => TypeRef::Pointer(base),
                    Tag::LvalueRef => TypeRef::LvalueRef(base),
                    _ => TypeRef::RvalueRef(base),
                })
            }
            Tag::Class => pool
                .class_def(ty)
                .map(|def| TypeRef::Named(name(def.name)))
                .ok_or(PersistError::Unnameable(ty)),
            Tag::ClassDelegate => pool
                .class_delegate_def(ty)
                .map(|def| TypeRef::Named(name(def.name)))
                .ok_or(PersistError::Unnameable(ty)),
            Tag::Delegate => {
                if let Some(owner) = pool.nested_delegate_owner(ty) {
                    return Ok(TypeRef::NestedDelegate(Box::new(self.type_ref(owner)?)));
                }
                pool.delegate_def(ty)
                    .filter(|def| pool.lookup_named(def.name) == Some(ty))
                    .map(|def| TypeRef::Named(name(def.name)))
                    .ok_or(PersistError::Unnameable(ty))
            }
            _ => Err(PersistError::Unnameable(ty)),
        }
    }

    fn resolve_type(&mut self, ty: &TypeRef) -> Result<Idx, PersistError> {
        match ty {
            TypeRef::Primitive(raw) => {
                let idx = Idx::from_raw(u32::from(*raw));
                if idx.is_primitive() {
                    Ok(idx)
                } else {
                    Err(PersistError::UnresolvedType(format!("primitive #{raw}")))
                }
            }
            TypeRef::Pointer(base) => {
                let base = self.resolve_type(base)?;
                Ok(self.pool_mut().pointer(base))
            }
            TypeRef::LvalueRef(base) => {
                let base = self.resolve_type(base)?;
                Ok(self.pool_mut().lvalue_ref(base))
            }
            TypeRef::RvalueRef(base) => {
                let base = self.resolve_type(base)?;
                Ok(self.pool_mut().rvalue_ref(base))
            }
            TypeRef::Named(name) => self
                .interner()
                .get(name)
                .and_then(|n| self.pool().lookup_named(n))
                .ok_or_else(|| PersistError::UnresolvedType(name.clone())),
            TypeRef::NestedDelegate(owner) => {
                let owner = self.resolve_type(owner)?;
                self.pool_mut()
                    .class_delegate_nested(owner)
                    .ok_or_else(|| PersistError::UnresolvedType(format!("{owner:?}")))
            }
        }
    }
}
