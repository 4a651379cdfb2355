use crate::selection::PathSegments;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Permission flags, in bit order: flag `i` is bit `1 << i`.
pub const PERMISSION_NAMES: [&str; 14] = [
    "see_hides",
    "access_without_password",
    "offline_download",
    "write",
    "rename",
    "move",
    "copy",
    "delete",
    "webdav_read",
    "webdav_manage",
    "ftp_read",
    "ftp_manage",
    "read_archives",
    "decompress",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMask(u32);

impl PermissionMask {
    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn from_bits(bits: u32) -> Self {
        PermissionMask(bits)
    }

    /// Sets flag `index`. Indices past the known flags are ignored.
    pub fn with(self, index: usize) -> Self {
        match flag_bit(index) {
            Some(bit) => PermissionMask(self.0 | bit),
            None => self,
        }
    }

    pub fn has(self, index: usize) -> bool {
        flag_bit(index).is_some_and(|bit| self.0 & bit != 0)
    }

    pub fn names(self) -> Vec<&'static str> {
        PERMISSION_NAMES
            .iter()
            .enumerate()
            .filter(|(i, _)| self.has(*i))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl FromStr for PermissionMask {
    type Err = String;

    /// Comma-separated flag names, e.g. `"write,rename"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mask = PermissionMask::default();
        for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let index = PERMISSION_NAMES
                .iter()
                .position(|known| *known == name)
                .ok_or_else(|| {
                    format!(
                        "unknown permission '{}' (expected one of: {})",
                        name,
                        PERMISSION_NAMES.join(", ")
                    )
                })?;
            mask = mask.with(index);
        }
        Ok(mask)
    }
}

impl fmt::Display for PermissionMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(","))
    }
}

/// A path together with the permissions granted on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionScope {
    pub path: String,
    pub permission: PermissionMask,
}

/// Role payload submitted after optimization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRequest {
    pub name: String,
    pub description: String,
    pub permission_scopes: Vec<PermissionScope>,
}

/// One scope per optimized path, all sharing `permission`.
pub fn build_permission_scopes(paths: &[PathSegments], permission: PermissionMask) -> Vec<PermissionScope> {
    paths
        .iter()
        .map(|path| PermissionScope {
            path: path.to_slash_path(),
            permission,
        })
        .collect()
}

fn flag_bit(index: usize) -> Option<u32> {
    if index < PERMISSION_NAMES.len() {
        1u32.checked_shl(index as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_flags_are_ignored() {
        let mask = PermissionMask::default().with(3).with(14).with(32).with(usize::MAX);
        assert_eq!(mask.bits(), 1 << 3);
        assert!(!mask.has(40));
        assert!(!PermissionMask::from_bits(u32::MAX).has(31));
        assert_eq!(PermissionMask::from_bits(u32::MAX).names().len(), PERMISSION_NAMES.len());
    }

    #[test]
    fn parses_names_into_bits() {
        let mask: PermissionMask = "write, rename".parse().unwrap();
        assert_eq!(mask.bits(), (1 << 3) | (1 << 4));
        assert_eq!(mask.to_string(), "write,rename");
        assert!("write,fly".parse::<PermissionMask>().is_err());
        assert_eq!("".parse::<PermissionMask>().unwrap().bits(), 0);
    }

    #[test]
    fn builds_one_scope_per_path() {
        let mask = PermissionMask::default().with(0).with(7);
        let scopes = build_permission_scopes(
            &[PathSegments::parse("docs"), PathSegments::root()],
            mask,
        );
        assert_eq!(scopes.len(), 2);
        assert_eq!(scopes[0].path, "/docs");
        assert_eq!(scopes[1].path, "/");
        assert!(scopes.iter().all(|s| s.permission.bits() == 0b1000_0001));
    }

    #[test]
    fn role_request_serializes_bits_as_numbers() {
        let role = RoleRequest {
            name: "editors".into(),
            description: String::new(),
            permission_scopes: build_permission_scopes(
                &[PathSegments::parse("docs/2024")],
                PermissionMask::from_bits(8),
            ),
        };
        let json = serde_json::to_value(&role).unwrap();
        assert_eq!(json["permission_scopes"][0]["path"], "/docs/2024");
        assert_eq!(json["permission_scopes"][0]["permission"], 8);
    }
}
