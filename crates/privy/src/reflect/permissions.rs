//! Reflection permissions
//!
//! Controls which kinds of member access an [`Accessor`] may perform, split
//! by public and non-public visibility.
//!
//! | Flag              | Bits | Grants                                  |
//! |-------------------|------|-----------------------------------------|
//! | READ_PUBLIC       | 0x01 | Read public fields and properties       |
//! | READ_PRIVATE      | 0x02 | Read non-public fields and properties   |
//! | WRITE_PUBLIC      | 0x04 | Write public fields and properties      |
//! | WRITE_PRIVATE     | 0x08 | Write non-public fields and properties  |
//! | INVOKE_PUBLIC     | 0x10 | Call public methods                     |
//! | INVOKE_PRIVATE    | 0x20 | Call non-public methods                 |
//! | CONSTRUCT_PUBLIC  | 0x40 | Run public constructors                 |
//! | CONSTRUCT_PRIVATE | 0x80 | Run non-public constructors             |
//!
//! ## TOML Configuration
//!
//! ```toml
//! [permissions]
//! global = "ALL"
//!
//! [permissions.types]
//! "app::vault::Vault" = "READ_ALL"
//! "app::plugins::*" = "PUBLIC_ONLY"
//! ```
//!
//! [`Accessor`]: crate::Accessor

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::PolicyError;

use super::type_info::{TypeInfo, Visibility};

/// Reflection permission flags (bitflags)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessPermission(u8);

impl AccessPermission {
    /// No access
    pub const NONE: Self = Self(0x00);
    /// Read public fields and properties
    pub const READ_PUBLIC: Self = Self(0x01);
    /// Read non-public fields and properties
    pub const READ_PRIVATE: Self = Self(0x02);
    /// Write public fields and properties
    pub const WRITE_PUBLIC: Self = Self(0x04);
    /// Write non-public fields and properties
    pub const WRITE_PRIVATE: Self = Self(0x08);
    /// Invoke public methods
    pub const INVOKE_PUBLIC: Self = Self(0x10);
    /// Invoke non-public methods
    pub const INVOKE_PRIVATE: Self = Self(0x20);
    /// Run public constructors
    pub const CONSTRUCT_PUBLIC: Self = Self(0x40);
    /// Run non-public constructors
    pub const CONSTRUCT_PRIVATE: Self = Self(0x80);

    /// READ_PUBLIC | READ_PRIVATE
    pub const READ_ALL: Self = Self(0x03);
    /// WRITE_PUBLIC | WRITE_PRIVATE
    pub const WRITE_ALL: Self = Self(0x0C);
    /// INVOKE_PUBLIC | INVOKE_PRIVATE
    pub const INVOKE_ALL: Self = Self(0x30);
    /// CONSTRUCT_PUBLIC | CONSTRUCT_PRIVATE
    pub const CONSTRUCT_ALL: Self = Self(0xC0);
    /// Every public flag
    pub const PUBLIC_ONLY: Self = Self(0x55);
    /// Everything
    pub const ALL: Self = Self(0xFF);

    /// Create from raw bits
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Get raw bits
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Check if permission contains a flag
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Union of permissions
    pub const fn union(&self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Intersection of permissions
    pub const fn intersection(&self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Difference (remove flags)
    pub const fn difference(&self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Flag needed to read a member of the given visibility
    pub fn read(visibility: Visibility) -> Self {
        if visibility.is_public() {
            Self::READ_PUBLIC
        } else {
            Self::READ_PRIVATE
        }
    }

    /// Flag needed to write a member of the given visibility
    pub fn write(visibility: Visibility) -> Self {
        if visibility.is_public() {
            Self::WRITE_PUBLIC
        } else {
            Self::WRITE_PRIVATE
        }
    }

    /// Flag needed to invoke a method of the given visibility
    pub fn invoke(visibility: Visibility) -> Self {
        if visibility.is_public() {
            Self::INVOKE_PUBLIC
        } else {
            Self::INVOKE_PRIVATE
        }
    }

    /// Flag needed to run a constructor of the given visibility
    pub fn construct(visibility: Visibility) -> Self {
        if visibility.is_public() {
            Self::CONSTRUCT_PUBLIC
        } else {
            Self::CONSTRUCT_PRIVATE
        }
    }

    /// Parse a single flag name, hex (`0x..`) or decimal value
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NONE" => Some(Self::NONE),
            "READ_PUBLIC" => Some(Self::READ_PUBLIC),
            "READ_PRIVATE" => Some(Self::READ_PRIVATE),
            "WRITE_PUBLIC" => Some(Self::WRITE_PUBLIC),
            "WRITE_PRIVATE" => Some(Self::WRITE_PRIVATE),
            "INVOKE_PUBLIC" => Some(Self::INVOKE_PUBLIC),
            "INVOKE_PRIVATE" => Some(Self::INVOKE_PRIVATE),
            "CONSTRUCT_PUBLIC" => Some(Self::CONSTRUCT_PUBLIC),
            "CONSTRUCT_PRIVATE" => Some(Self::CONSTRUCT_PRIVATE),
            "READ_ALL" => Some(Self::READ_ALL),
            "WRITE_ALL" => Some(Self::WRITE_ALL),
            "INVOKE_ALL" => Some(Self::INVOKE_ALL),
            "CONSTRUCT_ALL" => Some(Self::CONSTRUCT_ALL),
            "PUBLIC_ONLY" => Some(Self::PUBLIC_ONLY),
            "ALL" | "FULL_ACCESS" => Some(Self::ALL),
            _ => {
                if let Some(hex) = s.strip_prefix("0x") {
                    u8::from_str_radix(hex, 16).ok().map(Self::from_bits)
                } else {
                    s.parse::<u8>().ok().map(Self::from_bits)
                }
            }
        }
    }

    /// Parse pipe-separated flags (e.g., "READ_PUBLIC|WRITE_PUBLIC")
    pub fn parse_combined(s: &str) -> Option<Self> {
        let mut result = Self::NONE;
        for part in s.split('|') {
            result = result.union(Self::parse(part.trim())?);
        }
        Some(result)
    }
}

impl Default for AccessPermission {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for AccessPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::NONE => "NONE",
            Self::READ_PUBLIC => "READ_PUBLIC",
            Self::READ_PRIVATE => "READ_PRIVATE",
            Self::WRITE_PUBLIC => "WRITE_PUBLIC",
            Self::WRITE_PRIVATE => "WRITE_PRIVATE",
            Self::INVOKE_PUBLIC => "INVOKE_PUBLIC",
            Self::INVOKE_PRIVATE => "INVOKE_PRIVATE",
            Self::CONSTRUCT_PUBLIC => "CONSTRUCT_PUBLIC",
            Self::CONSTRUCT_PRIVATE => "CONSTRUCT_PRIVATE",
            Self::READ_ALL => "READ_ALL",
            Self::WRITE_ALL => "WRITE_ALL",
            Self::INVOKE_ALL => "INVOKE_ALL",
            Self::CONSTRUCT_ALL => "CONSTRUCT_ALL",
            Self::PUBLIC_ONLY => "PUBLIC_ONLY",
            Self::ALL => "ALL",
            _ => return write!(f, "0x{:02X}", self.0),
        };
        f.write_str(name)
    }
}

/// Type-path permission pattern (supports wildcards)
#[derive(Debug, Clone)]
pub struct TypePermissionRule {
    /// Pattern (e.g., "app::models", "app::plugins::*", "**")
    pub pattern: String,
    /// Permissions for matching types
    pub permissions: AccessPermission,
}

impl TypePermissionRule {
    /// Check if a type path matches this pattern
    pub fn matches(&self, type_path: &str) -> bool {
        if self.pattern == "**" || self.pattern == "*" {
            return true;
        }

        if let Some(prefix) = self.pattern.strip_suffix("::*") {
            type_path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.len() > 2 && rest.starts_with("::"))
        } else {
            self.pattern == type_path
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PolicyDocument {
    #[serde(default)]
    permissions: PermissionsSection,
}

#[derive(Debug, Default, Deserialize)]
struct PermissionsSection {
    global: Option<String>,
    #[serde(default)]
    types: BTreeMap<String, String>,
}

/// Permission policy consulted by every accessor operation
///
/// Resolution order: exact type entry (full path or short name), then the
/// first matching wildcard rule, then the global default.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    global_default: AccessPermission,
    type_permissions: HashMap<String, AccessPermission>,
    type_rules: Vec<TypePermissionRule>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessPolicy {
    /// Create a policy that allows everything
    pub fn new() -> Self {
        Self {
            global_default: AccessPermission::ALL,
            type_permissions: HashMap::new(),
            type_rules: Vec::new(),
        }
    }

    /// Check if any permissions are configured (for fast-path optimization)
    pub fn has_any_restrictions(&self) -> bool {
        self.global_default != AccessPermission::ALL
            || !self.type_permissions.is_empty()
            || !self.type_rules.is_empty()
    }

    /// Set the global default
    pub fn with_global(mut self, permissions: AccessPermission) -> Self {
        self.global_default = permissions;
        self
    }

    /// Set permissions for one type, by full path or short name
    pub fn with_type(mut self, type_name: &str, permissions: AccessPermission) -> Self {
        self.type_permissions
            .insert(type_name.to_string(), permissions);
        self
    }

    /// Append a wildcard rule
    pub fn with_rule(mut self, rule: TypePermissionRule) -> Self {
        self.type_rules.push(rule);
        self
    }

    /// Global default permissions
    pub fn global(&self) -> AccessPermission {
        self.global_default
    }

    /// Resolve the permissions that apply to a type
    pub fn resolve(&self, info: &TypeInfo) -> AccessPermission {
        if let Some(perms) = self
            .type_permissions
            .get(info.path())
            .or_else(|| self.type_permissions.get(info.name()))
        {
            return *perms;
        }

        for rule in &self.type_rules {
            if rule.matches(info.path()) {
                return rule.permissions;
            }
        }

        self.global_default
    }

    /// Check if a specific permission is allowed on a type
    pub fn allows(&self, info: &TypeInfo, required: AccessPermission) -> bool {
        self.resolve(info).contains(required)
    }

    /// Load a policy from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, PolicyError> {
        let document: PolicyDocument = toml::from_str(content)?;
        let mut policy = Self::new();

        if let Some(global) = document.permissions.global {
            policy.global_default = AccessPermission::parse_combined(&global).ok_or_else(|| {
                PolicyError::InvalidPermission {
                    key: "global".to_string(),
                    value: global.clone(),
                }
            })?;
        }

        for (key, value) in document.permissions.types {
            let perms = AccessPermission::parse_combined(&value).ok_or_else(|| {
                PolicyError::InvalidPermission {
                    key: key.clone(),
                    value: value.clone(),
                }
            })?;
            if key.contains('*') {
                policy.type_rules.push(TypePermissionRule {
                    pattern: key,
                    permissions: perms,
                });
            } else {
                policy.type_permissions.insert(key, perms);
            }
        }

        Ok(policy)
    }

    /// Load a policy from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, PolicyError> {
        let content = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
