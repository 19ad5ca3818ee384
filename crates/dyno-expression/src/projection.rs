//! Projection expressions.
//!
//! A projection shares the alias counter with the filter or condition in the
//! same request: compile the condition first and start the projection at its
//! `next_counter`.

use dyno_model::types::ExpressionAttributeNames;

/// An aliased `ProjectionExpression`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledProjection {
    /// The aliased attribute list, `None` for an empty projection.
    pub expression: Option<String>,
    /// `#n<i>` to attribute name.
    pub names: ExpressionAttributeNames,
    /// The first counter value not used by this projection.
    pub next_counter: usize,
}

/// Alias each attribute name starting at `start` and join them with `, `.
///
/// # Examples
///
/// ```
/// use dyno_expression::compile_projection;
///
/// let projection = compile_projection(["name", "teeth"], 2);
/// assert_eq!(projection.expression.as_deref(), Some("#n2, #n3"));
/// assert_eq!(projection.names["#n3"], "teeth");
/// assert_eq!(projection.next_counter, 4);
/// ```
#[must_use]
pub fn compile_projection<I, S>(paths: I, start: usize) -> CompiledProjection
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut names = ExpressionAttributeNames::new();
    let mut aliases = Vec::new();
    let mut counter = start;

    for path in paths {
        let alias = format!("#n{counter}");
        names.insert(alias.clone(), path.into());
        aliases.push(alias);
        counter += 1;
    }

    CompiledProjection {
        expression: (!aliases.is_empty()).then(|| aliases.join(", ")),
        names,
        next_counter: counter,
    }
}
