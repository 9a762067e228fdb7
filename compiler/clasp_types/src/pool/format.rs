//! Human-readable type names.

use clasp_ir::StringInterner;

use crate::{Idx, Pool, Tag};

impl Pool {
    /// Render a type the way it is written in source (`int32*`, `Point&&`).
    pub fn type_name(&self, idx: Idx, interner: &StringInterner) -> String {
        let mut out = String::new();
        self.write_type_name(idx, interner, &mut out);
        out
    }

    fn write_type_name(&self, idx: Idx, interner: &StringInterner, out: &mut String) {
        if let Some(name) = idx.name() {
            out.push_str(name);
            return;
        }
        if idx.is_none() {
            out.push_str("<none>");
            return;
        }
        match self.tag(idx) {
            tag @ (Tag::Pointer | Tag::LvalueRef | Tag::RvalueRef) => {
                let base = self.base(idx).unwrap_or(Idx::NONE);
                self.write_type_name(base, interner, out);
                out.push_str(match tag {
                    Tag::Pointer => "*",
                    Tag::LvalueRef => "&",
                    _ => "&&",
                });
            }
            Tag::Class => {
                let name = self.class_def(idx).map_or("", |d| interner.lookup(d.name));
                out.push_str(name);
            }
            Tag::Delegate => {
                let name = self
                    .delegate_def(idx)
                    .map_or("", |d| interner.lookup(d.name));
                out.push_str(name);
            }
            Tag::ClassDelegate => {
                let name = self
                    .class_delegate_def(idx)
                    .map_or("", |d| interner.lookup(d.name));
                out.push_str(name);
            }
            tag => out.push_str(tag.name()),
        }
    }
}
