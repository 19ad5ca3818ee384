//! Condition trees for filter and condition expressions.
//!
//! A [`Condition`] is built by the caller, compiled once into its aliased
//! wire form (see [`crate::compile`]) and then discarded. Its [`Display`]
//! implementation renders a human-readable description with literal values
//! in place, which is what shows up in logs.
//!
//! [`Display`]: std::fmt::Display

use std::fmt;
use std::ops::Not;

use dyno_model::AttributeValue;
use dyno_model::types::AttributeType;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// Equal (`=`).
    Eq,
    /// Not equal (`<>`).
    Ne,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
}

impl Comparator {
    /// The operator as it appears in an expression.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A boolean predicate over item attributes.
///
/// Paths are attribute names; each one is aliased as a whole when compiled.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `path <op> value`.
    Compare {
        /// Attribute name.
        path: String,
        /// Comparison operator.
        comparator: Comparator,
        /// Right-hand literal.
        value: AttributeValue,
    },
    /// `size(path) <op> value`.
    CompareSize {
        /// Attribute name.
        path: String,
        /// Comparison operator.
        comparator: Comparator,
        /// Right-hand literal.
        value: AttributeValue,
    },
    /// `path BETWEEN from AND to`, inclusive.
    Between {
        /// Attribute name.
        path: String,
        /// Lower bound.
        from: AttributeValue,
        /// Upper bound.
        to: AttributeValue,
    },
    /// `size(path) BETWEEN from AND to`, inclusive.
    BetweenSize {
        /// Attribute name.
        path: String,
        /// Lower bound.
        from: AttributeValue,
        /// Upper bound.
        to: AttributeValue,
    },
    /// `path IN (v0, v1, ...)`.
    In {
        /// Attribute name.
        path: String,
        /// Candidate values.
        values: Vec<AttributeValue>,
    },
    /// `attribute_exists(path)`.
    AttributeExists {
        /// Attribute name.
        path: String,
    },
    /// `attribute_not_exists(path)`.
    AttributeNotExists {
        /// Attribute name.
        path: String,
    },
    /// `attribute_type(path, type)`.
    AttributeType {
        /// Attribute name.
        path: String,
        /// Expected type code.
        attribute_type: AttributeType,
    },
    /// `begins_with(path, prefix)`.
    BeginsWith {
        /// Attribute name.
        path: String,
        /// Prefix literal.
        prefix: AttributeValue,
    },
    /// `contains(path, operand)`: substring for strings, membership for sets
    /// and lists.
    Contains {
        /// Attribute name.
        path: String,
        /// Substring or element.
        operand: AttributeValue,
    },
    /// Both conditions hold.
    And(Box<Condition>, Box<Condition>),
    /// Either condition holds.
    Or(Box<Condition>, Box<Condition>),
    /// The condition does not hold.
    Not(Box<Condition>),
}

impl Condition {
    /// `path <op> value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dyno_expression::{Comparator, Condition};
    ///
    /// let teeth = Condition::compare("teeth", Comparator::Ge, 40);
    /// assert_eq!(teeth.to_string(), r#"teeth >= N("40")"#);
    /// ```
    pub fn compare(
        path: impl Into<String>,
        comparator: Comparator,
        value: impl Into<AttributeValue>,
    ) -> Self {
        Self::Compare {
            path: path.into(),
            comparator,
            value: value.into(),
        }
    }

    /// `size(path) <op> value`.
    pub fn compare_size(
        path: impl Into<String>,
        comparator: Comparator,
        value: impl Into<AttributeValue>,
    ) -> Self {
        Self::CompareSize {
            path: path.into(),
            comparator,
            value: value.into(),
        }
    }

    /// `path BETWEEN from AND to`.
    pub fn between(
        path: impl Into<String>,
        from: impl Into<AttributeValue>,
        to: impl Into<AttributeValue>,
    ) -> Self {
        Self::Between {
            path: path.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// `size(path) BETWEEN from AND to`.
    pub fn between_size(
        path: impl Into<String>,
        from: impl Into<AttributeValue>,
        to: impl Into<AttributeValue>,
    ) -> Self {
        Self::BetweenSize {
            path: path.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// `path IN (values...)`.
    pub fn is_in<V: Into<AttributeValue>>(
        path: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In {
            path: path.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// `attribute_exists(path)`.
    pub fn attribute_exists(path: impl Into<String>) -> Self {
        Self::AttributeExists { path: path.into() }
    }

    /// `attribute_not_exists(path)`.
    pub fn attribute_not_exists(path: impl Into<String>) -> Self {
        Self::AttributeNotExists { path: path.into() }
    }

    /// `attribute_type(path, type)`.
    pub fn attribute_type(path: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self::AttributeType {
            path: path.into(),
            attribute_type,
        }
    }

    /// `begins_with(path, prefix)`.
    pub fn begins_with(path: impl Into<String>, prefix: impl Into<AttributeValue>) -> Self {
        Self::BeginsWith {
            path: path.into(),
            prefix: prefix.into(),
        }
    }

    /// `contains(path, operand)`.
    pub fn contains(path: impl Into<String>, operand: impl Into<AttributeValue>) -> Self {
        Self::Contains {
            path: path.into(),
            operand: operand.into(),
        }
    }

    /// Both `self` and `other` hold.
    #[must_use]
    pub fn and(self, other: Condition) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Either `self` or `other` holds.
    #[must_use]
    pub fn or(self, other: Condition) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Number of value aliases this node consumes, or `None` for combinators.
    pub(crate) fn value_slots(&self) -> Option<usize> {
        match self {
            Self::Compare { .. }
            | Self::CompareSize { .. }
            | Self::AttributeType { .. }
            | Self::BeginsWith { .. }
            | Self::Contains { .. } => Some(1),
            Self::Between { .. } | Self::BetweenSize { .. } => Some(2),
            Self::In { values, .. } => Some(values.len()),
            Self::AttributeExists { .. } | Self::AttributeNotExists { .. } => Some(0),
            Self::And(..) | Self::Or(..) | Self::Not(_) => None,
        }
    }
}

impl Not for Condition {
    type Output = Condition;

    fn not(self) -> Self::Output {
        Self::Not(Box::new(self))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare {
                path,
                comparator,
                value,
            } => write!(f, "{path} {comparator} {value}"),
            Self::CompareSize {
                path,
                comparator,
                value,
            } => write!(f, "size({path}) {comparator} {value}"),
            Self::Between { path, from, to } => write!(f, "{path} BETWEEN {from} AND {to}"),
            Self::BetweenSize { path, from, to } => {
                write!(f, "size({path}) BETWEEN {from} AND {to}")
            }
            Self::In { path, values } => {
                write!(f, "{path} IN (")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str(")")
            }
            Self::AttributeExists { path } => write!(f, "attribute_exists({path})"),
            Self::AttributeNotExists { path } => write!(f, "attribute_not_exists({path})"),
            Self::AttributeType {
                path,
                attribute_type,
            } => write!(f, "attribute_type({path},{})", attribute_type.as_str()),
            Self::BeginsWith { path, prefix } => write!(f, "{path} BEGINS_WITH {prefix}"),
            Self::Contains { path, operand } => write!(f, "{path} CONTAINS {operand}"),
            Self::And(left, right) => write!(f, "({left}) AND ({right})"),
            Self::Or(left, right) => write!(f, "({left}) OR ({right})"),
            Self::Not(inner) => write!(f, "NOT ({inner})"),
        }
    }
}
