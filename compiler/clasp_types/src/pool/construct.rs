//! Type construction for the Pool.

use clasp_ir::{Name, Span};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::{
    BindError, ClassBody, ClassDef, ClassDelegateDef, DelegateDef, Idx, Pool, SpecialMembers, Tag,
};

impl Pool {
    // === Derived Types ===

    fn intern_derived(&mut self, tag: Tag, base: Idx) -> Idx {
        if let Some(&idx) = self.derived.get(&(tag, base)) {
            return idx;
        }
        let idx = self.push(tag, base.raw());
        self.derived.insert((tag, base), idx);
        idx
    }

    /// `base*`
    pub fn pointer(&mut self, base: Idx) -> Idx {
        self.intern_derived(Tag::Pointer, base)
    }

    /// `base&`
    pub fn lvalue_ref(&mut self, base: Idx) -> Idx {
        self.intern_derived(Tag::LvalueRef, base)
    }

    /// `base&&`
    pub fn rvalue_ref(&mut self, base: Idx) -> Idx {
        self.intern_derived(Tag::RvalueRef, base)
    }

    /// `void*`
    pub fn void_pointer(&mut self) -> Idx {
        self.pointer(Idx::VOID)
    }

    // === Delegates ===

    pub fn delegate(&mut self, name: Name, params: &[Idx], ret: Idx) -> Idx {
        let data = table_index(self.delegates.len());
        self.delegates.push(DelegateDef {
            name,
            params: params.to_vec(),
            ret,
        });
        let idx = self.push(Tag::Delegate, data);
        self.named.insert(name, idx);
        idx
    }

    pub fn class_delegate(&mut self, name: Name, params: &[Idx], ret: Idx) -> Idx {
        let data = table_index(self.class_delegates.len());
        self.class_delegates.push(ClassDelegateDef {
            name,
            params: params.to_vec(),
            ret,
            nested: None,
        });
        let idx = self.push(Tag::ClassDelegate, data);
        self.named.insert(name, idx);
        idx
    }

    /// Delegate type of the method bound by a class delegate: the class
    /// delegate's signature with a leading `void*` object parameter.
    ///
    /// Created on the first call; later calls return the same type.
    pub fn class_delegate_nested(&mut self, class_delegate: Idx) -> Option<Idx> {
        let slot = self
            .item(class_delegate)
            .filter(|item| item.tag == Tag::ClassDelegate)?
            .data as usize;
        if let Some(nested) = self.class_delegates.get(slot)?.nested {
            return Some(nested);
        }

        let void_ptr = self.void_pointer();
        let def = self.class_delegates.get(slot)?;
        let mut params = Vec::with_capacity(def.params.len() + 1);
        params.push(void_ptr);
        params.extend_from_slice(&def.params);
        let (name, ret) = (def.name, def.ret);

        // Registered without a name: the nested delegate is only reachable
        // through its class delegate.
        let data = table_index(self.delegates.len());
        self.delegates.push(DelegateDef { name, params, ret });
        let nested = self.push(Tag::Delegate, data);
        if let Some(def) = self.class_delegates.get_mut(slot) {
            def.nested = Some(nested);
        }
        trace!(?class_delegate, ?nested, "created nested delegate type");
        Some(nested)
    }

    // === Classes ===

    /// Reserve a class type. Its body is supplied later by [`define_class`](Self::define_class),
    /// so that member functions can name the class before the class is complete.
    pub fn declare_class(&mut self, name: Name, span: Span) -> Idx {
        let data = table_index(self.classes.len());
        self.classes.push(ClassDef {
            name,
            span,
            base: None,
            members: Vec::new(),
            declared: FxHashMap::default(),
            suppressed: SpecialMembers::empty(),
            defined: false,
        });
        let idx = self.push(Tag::Class, data);
        self.named.insert(name, idx);
        idx
    }

    /// Complete a class declared with [`declare_class`](Self::declare_class).
    ///
    /// Rejects malformed declarations: conflicting or duplicate special-member
    /// specifiers, a base that is not another class, members of non-storable type.
    pub fn define_class(&mut self, class: Idx, body: ClassBody) -> Result<(), BindError> {
        let Some(def) = self.class_def(class) else {
            return Err(BindError::NotAClass {
                ty: class,
                span: Span::DUMMY,
            });
        };
        let span = def.span;
        if def.defined {
            return Err(BindError::NotAClass { ty: class, span });
        }

        if let Some(base) = body.base {
            if base == class || !self.is_class(base) {
                return Err(BindError::InvalidBase { class, base, span });
            }
        }

        for member in &body.members {
            if !self.is_storable(member.ty) {
                return Err(BindError::InvalidMemberType {
                    class,
                    ty: member.ty,
                    span: member.span,
                });
            }
        }

        let mut declared = FxHashMap::default();
        for &(member, func) in &body.declared {
            if body.suppressed.contains(member.flag()) {
                return Err(BindError::ConflictingSpecifiers {
                    class,
                    member,
                    span,
                });
            }
            if declared.insert(member, func).is_some() {
                return Err(BindError::DuplicateSpecialMember {
                    class,
                    member,
                    span,
                });
            }
        }

        let members = body.members.len();
        let slot = self.item(class).map_or(usize::MAX, |item| item.data as usize);
        if let Some(def) = self.classes.get_mut(slot) {
            def.base = body.base;
            def.members = body.members;
            def.declared = declared;
            def.suppressed = body.suppressed;
            def.defined = true;
        }
        debug!(?class, members, "defined class");
        Ok(())
    }

    /// Whether a member variable may have this type.
    fn is_storable(&self, ty: Idx) -> bool {
        !matches!(
            self.tag(ty),
            Tag::Void | Tag::Null | Tag::FnRef | Tag::LvalueRef | Tag::RvalueRef
        ) && (ty.is_primitive() || ty.index() < self.len())
    }
}

fn table_index(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("declaration table exceeded u32::MAX entries"))
}
