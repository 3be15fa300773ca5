//! Member resolution
//!
//! Resolution is one filtered lookup against a type's member table:
//! exact case-sensitive name, kind, scope and a visibility filter. There is
//! no overload resolution. When several members pass the filter the first
//! one registered wins, so ambiguous overloads are unsupported.

use std::fmt;

use super::type_info::{MemberInfo, MemberKind, Scope, TypeInfo, Visibility};

/// Which visibilities a lookup accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityFilter {
    /// Private, protected and internal members only
    NonPublic,
    /// Every member regardless of visibility
    Any,
}

impl VisibilityFilter {
    /// Check a declared visibility against the filter
    pub fn accepts(&self, visibility: Visibility) -> bool {
        match self {
            VisibilityFilter::NonPublic => !visibility.is_public(),
            VisibilityFilter::Any => true,
        }
    }
}

/// What to look for on a type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberDescriptor<'n> {
    /// Member kind
    pub kind: MemberKind,
    /// Exact member name
    pub name: &'n str,
    /// Instance or static
    pub scope: Scope,
    /// Accepted visibilities
    pub visibility: VisibilityFilter,
}

impl<'n> MemberDescriptor<'n> {
    /// Non-public instance field
    pub fn field(name: &'n str) -> Self {
        Self::new(MemberKind::Field, name, Scope::Instance, VisibilityFilter::NonPublic)
    }

    /// Non-public static field
    pub fn static_field(name: &'n str) -> Self {
        Self::new(MemberKind::Field, name, Scope::Static, VisibilityFilter::NonPublic)
    }

    /// Static field of any visibility
    pub fn constant(name: &'n str) -> Self {
        Self::new(MemberKind::Field, name, Scope::Static, VisibilityFilter::Any)
    }

    /// Instance property of any visibility
    pub fn property(name: &'n str) -> Self {
        Self::new(MemberKind::Property, name, Scope::Instance, VisibilityFilter::Any)
    }

    /// Non-public instance method
    pub fn method(name: &'n str) -> Self {
        Self::new(MemberKind::Method, name, Scope::Instance, VisibilityFilter::NonPublic)
    }

    /// Non-public static method
    pub fn static_method(name: &'n str) -> Self {
        Self::new(MemberKind::Method, name, Scope::Static, VisibilityFilter::NonPublic)
    }

    /// Create a descriptor
    pub const fn new(
        kind: MemberKind,
        name: &'n str,
        scope: Scope,
        visibility: VisibilityFilter,
    ) -> Self {
        Self {
            kind,
            name,
            scope,
            visibility,
        }
    }

    /// Check a member against every part of the descriptor
    pub fn matches(&self, member: &MemberInfo) -> bool {
        member.name() == self.name
            && member.kind() == self.kind
            && member.scope() == self.scope
            && self.visibility.accepts(member.visibility())
    }
}

impl fmt::Display for MemberDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visibility = match self.visibility {
            VisibilityFilter::NonPublic => "non-public",
            VisibilityFilter::Any => "any",
        };
        write!(f, "{} {} {} '{}'", visibility, self.scope, self.kind, self.name)
    }
}

impl TypeInfo {
    /// First member matching `descriptor`, in declaration order
    pub fn resolve(&self, descriptor: &MemberDescriptor<'_>) -> Option<&MemberInfo> {
        let found = self
            .members_named(descriptor.name)
            .find(|member| descriptor.matches(member));
        tracing::trace!(
            type_name = self.name(),
            member = descriptor.name,
            kind = %descriptor.kind,
            scope = %descriptor.scope,
            found = found.is_some(),
            "resolve member"
        );
        found
    }

    /// Constructors of any visibility in declaration order
    pub fn constructors(&self) -> impl Iterator<Item = &MemberInfo> {
        self.members()
            .iter()
            .filter(|member| member.kind() == MemberKind::Constructor)
    }
}
