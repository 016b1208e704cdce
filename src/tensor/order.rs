//! Traversal orders

use std::fmt;

/// Traversal order over the elements of a tensor
///
/// `C` and `F` are the canonical dense patterns (row-major and column-major).
/// `Any` lets the engine pick whichever of C/F the layout already satisfies,
/// and `Storage` walks axes by ascending stride so traversal follows memory.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// Row-major: last axis varies fastest
    #[default]
    C,
    /// Column-major: first axis varies fastest
    F,
    /// Whichever of C/F matches the storage, falling back to a configured order
    Any,
    /// Ascending-stride walk that follows the storage layout
    Storage,
}

impl Order {
    /// Resolve to C or F, mapping `Any` and `Storage` to `fallback`
    ///
    /// `fallback` itself is expected to be C or F.
    #[inline]
    pub fn auto_fc(self, fallback: Order) -> Order {
        match self {
            Order::C | Order::F => self,
            Order::Any | Order::Storage => fallback,
        }
    }

    /// Whether this is the column-major order
    #[inline]
    pub fn is_f(self) -> bool {
        self == Order::F
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Order::C => "C",
            Order::F => "F",
            Order::Any => "A",
            Order::Storage => "S",
        };
        f.write_str(s)
    }
}
