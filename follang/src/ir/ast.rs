use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    /// forall
    Universal,
    /// exists
    Existential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    And, // /\
    Or,  // \/
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// x, clock, p1
    Variable(String),
    /// p(x, y); each argument is owned by the call
    Call {
        callee: String,
        args: Vec<Expression>,
    },
    /// a /\ b
    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// forall x, p(x)
    Quantified {
        quantifier: Quantifier,
        variable: String,
        body: Box<Expression>,
    },
}

impl Expression {
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    pub fn call(callee: impl Into<String>, args: Vec<Expression>) -> Self {
        Self::Call {
            callee: callee.into(),
            args,
        }
    }

    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn quantified(quantifier: Quantifier, variable: impl Into<String>, body: Expression) -> Self {
        Self::Quantified {
            quantifier,
            variable: variable.into(),
            body: Box::new(body),
        }
    }
}

/// Name and parameter names of a function, without its body. Parameter
/// names are not checked for duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prototype {
    pub name: String,
    pub params: Vec<String>,
}

/// def f(x, y) body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub prototype: Prototype,
    pub body: Expression,
}

impl Quantifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Universal => "forall",
            Self::Existential => "exists",
        }
    }
}

impl BinaryOperator {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::And => "/\\",
            Self::Or => "\\/",
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

// Rendering is fully parenthesized so that it parses back to the same tree
// under any precedence table.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(name) => f.write_str(name),
            Self::Call { callee, args } => {
                write!(f, "{}(", callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            Self::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Self::Quantified {
                quantifier,
                variable,
                body,
            } => write!(f, "({} {}, {})", quantifier, variable, body),
        }
    }
}

impl fmt::Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(", "))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "def {} {}", self.prototype, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_expression() {
        let expr = Expression::quantified(
            Quantifier::Existential,
            "x",
            Expression::binary(
                BinaryOperator::And,
                Expression::call("p", vec![Expression::variable("x")]),
                Expression::variable("q"),
            ),
        );
        assert_eq!(expr.to_string(), "(exists x, (p(x) /\\ q))");
    }

    #[test]
    fn renders_function() {
        let function = Function {
            prototype: Prototype {
                name: "f".to_string(),
                params: vec!["x".to_string(), "y".to_string()],
            },
            body: Expression::binary(
                BinaryOperator::Or,
                Expression::variable("x"),
                Expression::variable("y"),
            ),
        };
        assert_eq!(function.to_string(), "def f(x, y) (x \\/ y)");
    }

    #[test]
    fn renders_empty_call_and_prototype() {
        assert_eq!(Expression::call("f", vec![]).to_string(), "f()");
        let proto = Prototype {
            name: "g".to_string(),
            params: vec![],
        };
        assert_eq!(proto.to_string(), "g()");
    }
}
