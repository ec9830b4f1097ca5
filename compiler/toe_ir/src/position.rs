//! Source positions.

use std::fmt;

/// A 1-based line/column source position.
///
/// Columns count characters, not bytes, so diagnostics point at the
/// same place an editor would.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Position used for values created inside builtins, which have no
    /// source location. Rendered as line/column zero in traces.
    pub const NONE: Position = Position { line: 0, column: 0 };

    /// First character of a source file.
    pub const START: Position = Position { line: 1, column: 1 };

    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({self})")
    }
}
