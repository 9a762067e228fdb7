//! The type pool.
//!
//! Each type is an `Item { tag, data }`; the tag says how to read `data`.
//! Derived types are interned so that `pool.pointer(T)` called twice returns
//! the same [`Idx`]. Nominal declarations live in side tables indexed by
//! `data`.

mod construct;
mod format;

use clasp_ir::Name;
use rustc_hash::FxHashMap;

use crate::{ClassDef, ClassDelegateDef, DelegateDef, Idx, Tag, TypeCategory};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Item {
    tag: Tag,
    data: u32,
}

/// Storage for every type of a compile unit.
#[derive(Clone, Debug)]
pub struct Pool {
    items: Vec<Item>,
    /// `(Pointer|LvalueRef|RvalueRef, base)` -> interned derived type.
    derived: FxHashMap<(Tag, Idx), Idx>,
    classes: Vec<ClassDef>,
    delegates: Vec<DelegateDef>,
    class_delegates: Vec<ClassDelegateDef>,
    /// Nominal types by declared name, for re-resolving imported metadata.
    named: FxHashMap<Name, Idx>,
}

impl Pool {
    /// Create a pool with the primitive types pre-interned at their fixed indices.
    pub fn new() -> Self {
        let items = (0..Idx::PRIMITIVE_COUNT)
            .filter_map(|raw| Tag::primitive(raw).map(|tag| Item { tag, data: 0 }))
            .collect();
        Pool {
            items,
            derived: FxHashMap::default(),
            classes: Vec::new(),
            delegates: Vec::new(),
            class_delegates: Vec::new(),
            named: FxHashMap::default(),
        }
    }

    fn push(&mut self, tag: Tag, data: u32) -> Idx {
        let raw = u32::try_from(self.items.len())
            .ok()
            .filter(|raw| *raw != u32::MAX)
            .unwrap_or_else(|| panic!("type pool exceeded u32::MAX entries"));
        self.items.push(Item { tag, data });
        Idx::from_raw(raw)
    }

    #[inline]
    fn item(&self, idx: Idx) -> Option<Item> {
        self.items.get(idx.index()).copied()
    }

    /// Tag of a type. Unknown indices (including `NONE`) read as `void`.
    #[inline]
    pub fn tag(&self, idx: Idx) -> Tag {
        self.item(idx).map_or(Tag::Void, |item| item.tag)
    }

    #[inline]
    pub fn category(&self, idx: Idx) -> TypeCategory {
        self.tag(idx).category()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pointee of a pointer or referent of a reference.
    pub fn base(&self, idx: Idx) -> Option<Idx> {
        let item = self.item(idx)?;
        item.tag.is_derived().then(|| Idx::from_raw(item.data))
    }

    /// Pointee of a pointer type.
    pub fn pointee(&self, idx: Idx) -> Option<Idx> {
        (self.tag(idx) == Tag::Pointer)
            .then(|| self.base(idx))
            .flatten()
    }

    /// `T` for `T&` and `T&&`, `idx` itself otherwise.
    pub fn strip_reference(&self, idx: Idx) -> Idx {
        if self.tag(idx).is_reference() {
            self.base(idx).unwrap_or(idx)
        } else {
            idx
        }
    }

    // === Predicates ===

    #[inline]
    pub fn is_integer(&self, idx: Idx) -> bool {
        self.tag(idx).is_integer()
    }

    #[inline]
    pub fn is_signed(&self, idx: Idx) -> bool {
        self.tag(idx).is_signed()
    }

    #[inline]
    pub fn is_floating_point(&self, idx: Idx) -> bool {
        self.tag(idx).is_floating_point()
    }

    #[inline]
    pub fn is_numeric(&self, idx: Idx) -> bool {
        self.tag(idx).is_numeric()
    }

    #[inline]
    pub fn is_scalar(&self, idx: Idx) -> bool {
        self.category(idx) == TypeCategory::Scalar
    }

    #[inline]
    pub fn is_pointer(&self, idx: Idx) -> bool {
        self.tag(idx) == Tag::Pointer
    }

    /// `void*`, the generic pointer.
    pub fn is_void_pointer(&self, idx: Idx) -> bool {
        self.pointee(idx) == Some(Idx::VOID)
    }

    #[inline]
    pub fn is_class(&self, idx: Idx) -> bool {
        self.tag(idx) == Tag::Class
    }

    /// Pointer to `class_ty`.
    pub fn is_pointer_to(&self, idx: Idx, class_ty: Idx) -> bool {
        self.pointee(idx) == Some(class_ty)
    }

    // === Declarations ===

    pub fn class_def(&self, idx: Idx) -> Option<&ClassDef> {
        let item = self.item(idx)?;
        (item.tag == Tag::Class)
            .then(|| self.classes.get(item.data as usize))
            .flatten()
    }

    pub fn delegate_def(&self, idx: Idx) -> Option<&DelegateDef> {
        let item = self.item(idx)?;
        (item.tag == Tag::Delegate)
            .then(|| self.delegates.get(item.data as usize))
            .flatten()
    }

    pub fn class_delegate_def(&self, idx: Idx) -> Option<&ClassDelegateDef> {
        let item = self.item(idx)?;
        (item.tag == Tag::ClassDelegate)
            .then(|| self.class_delegates.get(item.data as usize))
            .flatten()
    }

    /// The class delegate whose nested delegate type is `nested`.
    pub fn nested_delegate_owner(&self, nested: Idx) -> Option<Idx> {
        self.items.iter().enumerate().find_map(|(i, item)| {
            let def = (item.tag == Tag::ClassDelegate)
                .then(|| self.class_delegates.get(item.data as usize))
                .flatten()?;
            (def.nested == Some(nested))
                .then(|| u32::try_from(i).ok().map(Idx::from_raw))
                .flatten()
        })
    }

    /// Nominal type registered under `name`.
    pub fn lookup_named(&self, name: Name) -> Option<Idx> {
        self.named.get(&name).copied()
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}
