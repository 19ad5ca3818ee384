//! Condition, filter and projection expressions for Dyno.
//!
//! A [`Condition`] tree is compiled into three artifacts the wire protocol
//! expects: the aliased expression text, the `#n<i>` name table and the
//! `:v<i>` value table.
//!
//! ```
//! use dyno_expression::{Comparator, Condition};
//!
//! let filter = Condition::between("teeth", 50, 4000).and(
//!     Condition::compare("teeth", Comparator::Ge, 40)
//!         .or(!Condition::is_in("colour", ["green", "aqua"])),
//! );
//! let compiled = filter.compile(0);
//! assert_eq!(
//!     compiled.expression.as_deref(),
//!     Some("(#n0 BETWEEN :v0 AND :v1 AND (#n2 >= :v2 OR NOT #n3 IN (:v3,:v4)))")
//! );
//! ```

pub mod compiler;
pub mod condition;
pub mod projection;

pub use compiler::{CompiledExpression, compile};
pub use condition::{Comparator, Condition};
pub use projection::{CompiledProjection, compile_projection};
