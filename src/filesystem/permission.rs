use std::fmt;
use std::str::FromStr;

use super::{FsError, InvalidFormatSnafu};

const READ_BIT: u8 = 0b100;
const WRITE_BIT: u8 = 0b010;
const EXECUTE_BIT: u8 = 0b001;
const ALL_BITS: u8 = READ_BIT | WRITE_BIT | EXECUTE_BIT;

/// Read/write/execute capability triple attached to a file.
///
/// The textual form is exactly three `0`/`1` characters. The first character
/// is the read bit, the second the write bit and the third the execute bit,
/// so `"110"` grants read and write but not execute.
///
/// The execute bit is carried for snapshot compatibility only; no operation
/// consults it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permission {
    bits: u8,
}

impl Permission {
    pub const ALL: Permission = Permission { bits: ALL_BITS };
    pub const NONE: Permission = Permission { bits: 0 };

    pub fn from_bits(input: &str) -> Result<Self, FsError> {
        let bytes = input.as_bytes();
        if bytes.len() != 3 {
            return InvalidFormatSnafu { input }.fail();
        }

        let bits = bytes.iter().try_fold(0u8, |acc, byte| match byte {
            b'0' => Some(acc << 1),
            b'1' => Some((acc << 1) | 1),
            _ => None,
        });

        match bits {
            Some(bits) => Ok(Permission { bits }),
            None => InvalidFormatSnafu { input }.fail(),
        }
    }

    pub fn to_bits(&self) -> String {
        [READ_BIT, WRITE_BIT, EXECUTE_BIT]
            .iter()
            .map(|bit| if self.bits & bit != 0 { '1' } else { '0' })
            .collect()
    }

    pub fn can_read(&self) -> bool {
        self.bits & READ_BIT != 0
    }

    pub fn can_write(&self) -> bool {
        self.bits & WRITE_BIT != 0
    }

    pub fn can_execute(&self) -> bool {
        self.bits & EXECUTE_BIT != 0
    }
}

impl Default for Permission {
    fn default() -> Self {
        Self::ALL
    }
}

impl FromStr for Permission {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bits(s)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("111", true, true, true)]
    #[case("000", false, false, false)]
    #[case("100", true, false, false)]
    #[case("010", false, true, false)]
    #[case("001", false, false, true)]
    #[case("110", true, true, false)]
    fn permission_bits_map_to_capabilities(
        #[case] input: &str,
        #[case] read: bool,
        #[case] write: bool,
        #[case] execute: bool,
    ) {
        let permission = Permission::from_bits(input).expect("valid permission string");
        assert_eq!(permission.can_read(), read);
        assert_eq!(permission.can_write(), write);
        assert_eq!(permission.can_execute(), execute);
        assert_eq!(permission.to_bits(), input);
    }

    #[rstest]
    #[case("")]
    #[case("11")]
    #[case("1111")]
    #[case("12a")]
    #[case("rwx")]
    #[case(" 11")]
    fn malformed_permission_strings_are_rejected(#[case] input: &str) {
        let result = Permission::from_bits(input);
        assert!(matches!(result, Err(FsError::InvalidFormat { .. })));
    }

    #[test]
    fn default_permission_grants_everything() {
        let permission = Permission::default();
        assert_eq!(permission, Permission::ALL);
        assert_eq!(permission.to_string(), "111");
        assert_eq!(Permission::NONE.to_string(), "000");
    }

    #[test]
    fn permission_parses_through_from_str() {
        let permission: Permission = "101".parse().expect("valid permission string");
        assert!(permission.can_read());
        assert!(!permission.can_write());
        assert!(permission.can_execute());
    }
}
