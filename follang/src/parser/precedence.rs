use crate::ir::ast::BinaryOperator;

/// Binding strength of each binary operator. Higher binds tighter.
///
/// The table is handed to the parser by value and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecedenceTable {
    and: i32,
    or: i32,
}

impl PrecedenceTable {
    pub fn new(and: i32, or: i32) -> Self {
        Self { and, or }
    }

    pub fn get(&self, op: BinaryOperator) -> i32 {
        match op {
            BinaryOperator::And => self.and,
            BinaryOperator::Or => self.or,
        }
    }
}

impl Default for PrecedenceTable {
    fn default() -> Self {
        Self { and: 40, or: 20 }
    }
}
