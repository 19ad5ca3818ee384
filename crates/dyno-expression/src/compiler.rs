//! Compiles a [`Condition`] into its aliased wire form.
//!
//! Every attribute name is replaced by `#n<i>` and every literal by `:v<i>`,
//! where `i` comes from a counter threaded through the tree in evaluation
//! order. A leaf at counter `i` names its path `#n<i>` and its values
//! `:v<i>`, `:v<i+1>`, ...; it then advances the counter by the number of
//! values it holds, or by one when it holds none. Aliases therefore never
//! repeat within one compilation and merging the children of a combinator is
//! a plain map union.
//!
//! The counter is passed in and returned, never shared, so independent trees
//! compile concurrently without coordination.

use std::collections::HashMap;

use dyno_model::AttributeValue;
use dyno_model::types::{ExpressionAttributeNames, ExpressionAttributeValues};

use crate::condition::Condition;

/// The expression text plus the alias tables it refers to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledExpression {
    /// The aliased expression, `None` when there was no condition.
    pub expression: Option<String>,
    /// `#n<i>` to attribute name.
    pub names: ExpressionAttributeNames,
    /// `:v<i>` to literal value.
    pub values: ExpressionAttributeValues,
    /// The first counter value not used by this expression.
    pub next_counter: usize,
}

impl CompiledExpression {
    /// An absent expression that leaves the counter at `start`.
    #[must_use]
    pub fn empty(start: usize) -> Self {
        Self {
            next_counter: start,
            ..Self::default()
        }
    }

    /// Returns `true` when there is no expression text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expression.is_none()
    }

    /// Fold another set of name aliases (for example, a projection's) into
    /// this one.
    pub fn merge_names(&mut self, names: ExpressionAttributeNames) {
        self.names.extend(names);
    }
}

/// Compile an optional condition starting at `start`.
///
/// A missing condition means no filtering: the result has no expression,
/// empty alias tables and `next_counter == start`.
///
/// # Examples
///
/// ```
/// use dyno_expression::{Comparator, Condition, compile};
/// use dyno_model::AttributeValue;
///
/// let compiled = compile(Some(&Condition::compare("teeth", Comparator::Ge, 40)), 0);
/// assert_eq!(compiled.expression.as_deref(), Some("#n0 >= :v0"));
/// assert_eq!(compiled.names["#n0"], "teeth");
/// assert_eq!(compiled.values[":v0"], AttributeValue::N("40".into()));
/// assert_eq!(compiled.next_counter, 1);
/// ```
#[must_use]
pub fn compile(condition: Option<&Condition>, start: usize) -> CompiledExpression {
    match condition {
        None => CompiledExpression::empty(start),
        Some(condition) => {
            let fragment = lower(condition, start);
            CompiledExpression {
                expression: Some(fragment.text),
                names: fragment.names,
                values: fragment.values,
                next_counter: fragment.next,
            }
        }
    }
}

impl Condition {
    /// Compile this condition starting at `start`.
    #[must_use]
    pub fn compile(&self, start: usize) -> CompiledExpression {
        compile(Some(self), start)
    }
}

struct Fragment {
    text: String,
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
    next: usize,
}

impl Fragment {
    fn leaf(counter: usize, path: &str, values: Vec<AttributeValue>, text: String) -> Self {
        let next = counter + values.len().max(1);
        Self {
            text,
            names: HashMap::from([(name_alias(counter), path.to_owned())]),
            values: values
                .into_iter()
                .enumerate()
                .map(|(offset, value)| (value_alias(counter + offset), value))
                .collect(),
            next,
        }
    }

    fn union(mut self, other: Fragment, text: String) -> Self {
        self.names.extend(other.names);
        self.values.extend(other.values);
        Self {
            text,
            next: other.next,
            ..self
        }
    }
}

fn name_alias(counter: usize) -> String {
    format!("#n{counter}")
}

fn value_alias(counter: usize) -> String {
    format!(":v{counter}")
}

fn lower(condition: &Condition, counter: usize) -> Fragment {
    let n = name_alias(counter);
    let v = value_alias(counter);

    match condition {
        Condition::Compare {
            path,
            comparator,
            value,
        } => Fragment::leaf(counter, path, vec![value.clone()], format!("{n} {comparator} {v}")),
        Condition::CompareSize {
            path,
            comparator,
            value,
        } => Fragment::leaf(
            counter,
            path,
            vec![value.clone()],
            format!("size({n}) {comparator} {v}"),
        ),
        Condition::Between { path, from, to } => Fragment::leaf(
            counter,
            path,
            vec![from.clone(), to.clone()],
            format!("{n} BETWEEN {v} AND {}", value_alias(counter + 1)),
        ),
        Condition::BetweenSize { path, from, to } => Fragment::leaf(
            counter,
            path,
            vec![from.clone(), to.clone()],
            format!("size({n}) BETWEEN {v} AND {}", value_alias(counter + 1)),
        ),
        Condition::In { path, values } => {
            let aliases: Vec<String> = (counter..counter + values.len()).map(value_alias).collect();
            let text = format!("{n} IN ({})", aliases.join(","));
            Fragment::leaf(counter, path, values.clone(), text)
        }
        Condition::AttributeExists { path } => {
            Fragment::leaf(counter, path, Vec::new(), format!("attribute_exists({n})"))
        }
        Condition::AttributeNotExists { path } => {
            Fragment::leaf(counter, path, Vec::new(), format!("attribute_not_exists({n})"))
        }
        Condition::AttributeType {
            path,
            attribute_type,
        } => Fragment::leaf(
            counter,
            path,
            vec![AttributeValue::from(*attribute_type)],
            format!("attribute_type({n},{v})"),
        ),
        Condition::BeginsWith { path, prefix } => Fragment::leaf(
            counter,
            path,
            vec![prefix.clone()],
            format!("begins_with({n},{v})"),
        ),
        Condition::Contains { path, operand } => Fragment::leaf(
            counter,
            path,
            vec![operand.clone()],
            format!("contains({n},{v})"),
        ),
        Condition::And(left, right) => {
            let left = lower(left, counter);
            let right = lower(right, left.next);
            let text = format!("({} AND {})", left.text, right.text);
            left.union(right, text)
        }
        Condition::Or(left, right) => {
            let left = lower(left, counter);
            let right = lower(right, left.next);
            let text = format!("({} OR {})", left.text, right.text);
            left.union(right, text)
        }
        Condition::Not(inner) => {
            let inner = lower(inner, counter);
            Fragment {
                text: format!("NOT {}", inner.text),
                ..inner
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use dyno_model::types::AttributeType;

    use super::*;
    use crate::condition::Comparator;

    fn teeth_and_colour() -> Condition {
        Condition::between("teeth", 50, 4000).and(
            Condition::compare("teeth", Comparator::Ge, 40)
                .or(!Condition::is_in("colour", ["green", "aqua"])),
        )
    }

    /// Leaves and value slots, counted independently of the compiler.
    fn shape(condition: &Condition) -> (usize, usize) {
        match condition {
            Condition::And(l, r) | Condition::Or(l, r) => {
                let (ln, lv) = shape(l);
                let (rn, rv) = shape(r);
                (ln + rn, lv + rv)
            }
            Condition::Not(inner) => shape(inner),
            leaf => (1, leaf.value_slots().unwrap_or(0)),
        }
    }

    fn counter_span(condition: &Condition) -> usize {
        match condition {
            Condition::And(l, r) | Condition::Or(l, r) => counter_span(l) + counter_span(r),
            Condition::Not(inner) => counter_span(inner),
            leaf => leaf.value_slots().unwrap_or(0).max(1),
        }
    }

    fn samples() -> Vec<Condition> {
        vec![
            Condition::attribute_exists("name"),
            teeth_and_colour(),
            !(Condition::attribute_not_exists("a").or(Condition::between_size("b", 1, 2))),
            Condition::is_in("c", [1, 2, 3])
                .and(Condition::begins_with("d", "x"))
                .and(Condition::contains("e", "y").or(Condition::attribute_type(
                    "f",
                    AttributeType::Bool,
                ))),
            Condition::compare_size("g", Comparator::Ne, 0)
                .or(Condition::attribute_exists("h").and(Condition::attribute_exists("i"))),
        ]
    }

    #[test]
    fn test_should_compile_simple_comparison() {
        let compiled = compile(Some(&Condition::compare("teeth", Comparator::Ge, 40)), 0);
        assert_eq!(compiled.expression.as_deref(), Some("#n0 >= :v0"));
        assert_eq!(
            compiled.names,
            HashMap::from([("#n0".to_owned(), "teeth".to_owned())])
        );
        assert_eq!(
            compiled.values,
            HashMap::from([(":v0".to_owned(), AttributeValue::N("40".to_owned()))])
        );
        assert_eq!(compiled.next_counter, 1);
    }

    #[test]
    fn test_should_compile_between_with_two_values() {
        let compiled = Condition::between("teeth", 50, 4000).compile(0);
        assert_eq!(
            compiled.expression.as_deref(),
            Some("#n0 BETWEEN :v0 AND :v1")
        );
        assert_eq!(compiled.values[":v1"], AttributeValue::N("4000".to_owned()));
        assert_eq!(compiled.next_counter, 2);
    }

    #[test]
    fn test_should_compile_in_list() {
        let compiled = Condition::is_in("colour", ["green", "aqua"]).compile(0);
        assert_eq!(compiled.expression.as_deref(), Some("#n0 IN (:v0,:v1)"));
        assert_eq!(compiled.values[":v0"], AttributeValue::S("green".to_owned()));
        assert_eq!(compiled.values[":v1"], AttributeValue::S("aqua".to_owned()));
        assert_eq!(compiled.next_counter, 2);
    }

    #[test]
    fn test_should_compile_nested_combinators() {
        let compiled = teeth_and_colour().compile(0);
        assert_eq!(
            compiled.expression.as_deref(),
            Some("(#n0 BETWEEN :v0 AND :v1 AND (#n2 >= :v2 OR NOT #n3 IN (:v3,:v4)))")
        );
        assert_eq!(compiled.names.len(), 3);
        assert_eq!(compiled.names["#n0"], "teeth");
        assert_eq!(compiled.names["#n2"], "teeth");
        assert_eq!(compiled.names["#n3"], "colour");
        assert_eq!(compiled.values.len(), 5);
        assert_eq!(compiled.next_counter, 5);
    }

    #[test]
    fn test_should_compile_function_leaves() {
        assert_eq!(
            Condition::attribute_exists("a").compile(0).expression.as_deref(),
            Some("attribute_exists(#n0)")
        );
        assert_eq!(
            Condition::attribute_not_exists("a").compile(3).expression.as_deref(),
            Some("attribute_not_exists(#n3)")
        );
        let typed = Condition::attribute_type("a", AttributeType::Ns).compile(0);
        assert_eq!(typed.expression.as_deref(), Some("attribute_type(#n0,:v0)"));
        assert_eq!(typed.values[":v0"], AttributeValue::S("NS".to_owned()));
        assert_eq!(
            Condition::begins_with("a", "pre").compile(0).expression.as_deref(),
            Some("begins_with(#n0,:v0)")
        );
        assert_eq!(
            Condition::contains("a", "sub").compile(0).expression.as_deref(),
            Some("contains(#n0,:v0)")
        );
        assert_eq!(
            Condition::compare_size("a", Comparator::Le, 3).compile(0).expression.as_deref(),
            Some("size(#n0) <= :v0")
        );
        assert_eq!(
            Condition::between_size("a", 1, 9).compile(0).expression.as_deref(),
            Some("size(#n0) BETWEEN :v0 AND :v1")
        );
    }

    #[test]
    fn test_should_return_empty_expression_for_no_condition() {
        let compiled = compile(None, 7);
        assert!(compiled.is_empty());
        assert!(compiled.names.is_empty());
        assert!(compiled.values.is_empty());
        assert_eq!(compiled.next_counter, 7);
    }

    #[test]
    fn test_should_allocate_unique_aliases_for_every_leaf() {
        for condition in samples() {
            for start in [0, 1, 42] {
                let compiled = condition.compile(start);
                let (leaves, value_slots) = shape(&condition);
                assert_eq!(compiled.names.len(), leaves, "{condition}");
                assert_eq!(compiled.values.len(), value_slots, "{condition}");

                let text = compiled.expression.as_deref().unwrap_or_default();
                for alias in compiled.names.keys().chain(compiled.values.keys()) {
                    assert!(text.contains(alias.as_str()), "{alias} missing from {text}");
                }
            }
        }
    }

    #[test]
    fn test_should_advance_counter_by_tree_shape_only() {
        for condition in samples() {
            let spans: Vec<usize> = [0, 5, 1000]
                .iter()
                .map(|start| condition.compile(*start).next_counter - start)
                .collect();
            assert!(spans.iter().all(|s| *s == counter_span(&condition)));
            assert_eq!(condition.compile(9), condition.compile(9));
        }
    }

    #[test]
    fn test_should_merge_names_from_projection() {
        let mut compiled = Condition::attribute_exists("name").compile(0);
        compiled.merge_names(HashMap::from([("#n1".to_owned(), "teeth".to_owned())]));
        assert_eq!(compiled.names.len(), 2);
    }
}
