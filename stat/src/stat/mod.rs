pub mod bench;
pub mod formatter;
pub mod level;
pub mod run;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Strategy used by the virtual machine to decode an instruction.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decoding {
    Bitmask,
    Union,
}

/// Strategy used by the virtual machine to encode its operands.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    Register,
    Stack,
}

impl Display for Decoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Decoding::Bitmask => "bitmask",
                Decoding::Union => "union",
            }
        )
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Encoding::Register => "register",
                Encoding::Stack => "stack",
            }
        )
    }
}

/// One benchmarked combination of decoding and encoding strategy.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variant {
    pub decoding: Decoding,
    pub encoding: Encoding,
}

impl Variant {
    pub const BITMASK_REGISTER: Variant = Variant::new(Decoding::Bitmask, Encoding::Register);
    pub const BITMASK_STACK: Variant = Variant::new(Decoding::Bitmask, Encoding::Stack);
    pub const UNION_REGISTER: Variant = Variant::new(Decoding::Union, Encoding::Register);
    pub const UNION_STACK: Variant = Variant::new(Decoding::Union, Encoding::Stack);

    /// Every variant, in the order the result directories are scanned.
    pub const ALL: [Variant; 4] = [
        Variant::BITMASK_REGISTER,
        Variant::BITMASK_STACK,
        Variant::UNION_REGISTER,
        Variant::UNION_STACK,
    ];

    pub const fn new(decoding: Decoding, encoding: Encoding) -> Self {
        Self { decoding, encoding }
    }

    /// Name of the subdirectory holding the results of this variant,
    /// e.g. `br` for bitmask-register.
    pub fn dir_name(&self) -> &'static str {
        match (self.decoding, self.encoding) {
            (Decoding::Bitmask, Encoding::Register) => "br",
            (Decoding::Bitmask, Encoding::Stack) => "bs",
            (Decoding::Union, Encoding::Register) => "ur",
            (Decoding::Union, Encoding::Stack) => "us",
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.decoding, self.encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_dir_names_are_distinct() {
        let names: HashSet<&str> = Variant::ALL.iter().map(|v| v.dir_name()).collect();
        assert_eq!(names.len(), 4);
        assert_eq!(Variant::UNION_STACK.dir_name(), "us");
    }

    #[test]
    fn test_display() {
        assert_eq!(Variant::BITMASK_REGISTER.to_string(), "bitmask-register");
    }
}
