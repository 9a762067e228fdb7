//! Repositories: one per type category, each a name-to-group table.
//!
//! The binder asks every repository for every call site. A repository that
//! does not know the group name contributes nothing, so contributions from
//! all categories and from user overloads merge without coordination.

use clasp_ir::{Name, StringInterner};
use clasp_types::TypeCategory;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::group::{
    class_delegate_viable, class_viable, delegate_viable, derived_viable, scalar_viable,
};
use crate::session::SynthCx;
use crate::{CallSite, OperatorGroup, Viability};

/// Source of compiler-provided candidates for one type category.
pub trait OperationRepository {
    fn category(&self) -> TypeCategory;

    /// Group table, fixed at construction.
    fn groups(&self) -> &FxHashMap<Name, OperatorGroup>;

    /// Candidates of one group at one call site.
    fn group_viable(
        &self,
        cx: &mut SynthCx<'_>,
        group: OperatorGroup,
        call: &CallSite<'_>,
    ) -> Viability;

    /// Look the call's group up and delegate to it. Unknown names are not viable.
    fn collect_viable_functions(&self, cx: &mut SynthCx<'_>, call: &CallSite<'_>) -> Viability {
        let Some(&group) = self.groups().get(&call.group) else {
            return Viability::NotViable;
        };
        trace!(
            category = ?self.category(),
            ?group,
            arity = call.arity,
            "dispatching to operator group"
        );
        self.group_viable(cx, group, call)
    }
}

fn group_table(interner: &StringInterner, groups: &[OperatorGroup]) -> FxHashMap<Name, OperatorGroup> {
    groups
        .iter()
        .map(|&group| (interner.intern(group.name()), group))
        .collect()
}

macro_rules! repository {
    (
        $(#[$doc:meta])*
        $name:ident, $category:ident, $viable:path, [$($group:ident),* $(,)?]
    ) => {
        $(#[$doc])*
        pub struct $name {
            groups: FxHashMap<Name, OperatorGroup>,
        }

        impl $name {
            pub const GROUPS: &'static [OperatorGroup] = &[$(OperatorGroup::$group),*];

            pub fn new(interner: &StringInterner) -> Self {
                $name {
                    groups: group_table(interner, Self::GROUPS),
                }
            }
        }

        impl OperationRepository for $name {
            fn category(&self) -> TypeCategory {
                TypeCategory::$category
            }

            fn groups(&self) -> &FxHashMap<Name, OperatorGroup> {
                &self.groups
            }

            fn group_viable(
                &self,
                cx: &mut SynthCx<'_>,
                group: OperatorGroup,
                call: &CallSite<'_>,
            ) -> Viability {
                $viable(cx, group, call)
            }
        }
    };
}

repository!(
    /// Built-in scalars: every operator group.
    ScalarRepository,
    Scalar,
    scalar_viable,
    [
        Constructor, Assign, Equal, Less, Plus, Minus, Star, Slash, Percent, Shl, Shr, Amp, Pipe,
        Caret, Bang, Tilde, Increment, Decrement,
    ]
);

repository!(
    /// Pointers, including `&x` and the `void*`-to-integer conversion.
    DerivedRepository,
    Derived,
    derived_viable,
    [Constructor, Assign, Equal, Less, Plus, Minus, Star, Amp, Increment, Decrement]
);

repository!(
    DelegateRepository,
    Delegate,
    delegate_viable,
    [Constructor, Assign, Equal]
);

repository!(
    ClassDelegateRepository,
    ClassDelegate,
    class_delegate_viable,
    [Constructor, Assign, Equal]
);

repository!(
    /// Member-wise special members of user classes.
    ClassRepository,
    Class,
    class_viable,
    [Constructor, Assign, Equal]
);

/// The five repositories of a session, immutable after construction.
pub struct Repositories {
    scalar: ScalarRepository,
    derived: DerivedRepository,
    delegate: DelegateRepository,
    class_delegate: ClassDelegateRepository,
    class: ClassRepository,
}

impl Repositories {
    pub fn new(interner: &StringInterner) -> Self {
        Repositories {
            scalar: ScalarRepository::new(interner),
            derived: DerivedRepository::new(interner),
            delegate: DelegateRepository::new(interner),
            class_delegate: ClassDelegateRepository::new(interner),
            class: ClassRepository::new(interner),
        }
    }

    pub fn get(&self, category: TypeCategory) -> Option<&dyn OperationRepository> {
        match category {
            TypeCategory::Scalar => Some(&self.scalar),
            TypeCategory::Derived => Some(&self.derived),
            TypeCategory::Delegate => Some(&self.delegate),
            TypeCategory::ClassDelegate => Some(&self.class_delegate),
            TypeCategory::Class => Some(&self.class),
            TypeCategory::Other => None,
        }
    }

    /// All repositories in a fixed order: scalar, derived, delegate,
    /// class delegate, class.
    pub fn iter(&self) -> impl Iterator<Item = &dyn OperationRepository> {
        [
            &self.scalar as &dyn OperationRepository,
            &self.derived,
            &self.delegate,
            &self.class_delegate,
            &self.class,
        ]
        .into_iter()
    }
}
