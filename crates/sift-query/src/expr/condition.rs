//! Condition system for WHERE and HAVING clauses.
//!
//! This module provides [`Condition`] and [`Cond`] for building nested
//! AND/OR filter trees.

use super::simple_expr::SimpleExpr;

/// Type of condition combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConditionType {
	/// All conditions must be true (AND)
	#[default]
	All,
	/// Any condition must be true (OR)
	Any,
}

/// A single condition expression in a condition chain.
#[derive(Debug, Clone)]
pub enum ConditionExpression {
	/// A simple expression
	SimpleExpr(SimpleExpr),
	/// A nested condition
	Condition(Condition),
}

/// A condition chain for WHERE or HAVING clauses.
///
/// # Example
///
/// ```rust
/// use sift_query::{Cond, Expr, ExprTrait};
///
/// // status = 'ACTIVE' AND (name = 'a' OR name = 'b')
/// let cond = Cond::all()
///     .add(Expr::col("status").eq("ACTIVE"))
///     .add(Cond::any()
///         .add(Expr::col("name").eq("a"))
///         .add(Expr::col("name").eq("b")));
/// assert_eq!(cond.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Condition {
	/// Type of condition chain (AND or OR)
	pub condition_type: ConditionType,
	/// Whether to negate the entire condition
	pub negate: bool,
	/// The conditions in this chain
	pub conditions: Vec<ConditionExpression>,
}

impl Condition {
	/// Create a new empty condition with the specified type.
	pub fn new(condition_type: ConditionType) -> Self {
		Self {
			condition_type,
			negate: false,
			conditions: Vec::new(),
		}
	}

	/// Create a new condition that requires all sub-conditions (AND).
	pub fn all() -> Self {
		Self::new(ConditionType::All)
	}

	/// Create a new condition that requires any sub-condition (OR).
	pub fn any() -> Self {
		Self::new(ConditionType::Any)
	}

	/// Add a condition expression.
	#[must_use]
	// Intentional builder-pattern method, not std::ops::Add
	#[allow(clippy::should_implement_trait)]
	pub fn add<C>(mut self, condition: C) -> Self
	where
		C: IntoCondition,
	{
		self.conditions.push(condition.into_condition_expression());
		self
	}

	/// Negate the entire condition.
	#[must_use]
	// Intentional builder-pattern method, not std::ops::Not
	#[allow(clippy::should_implement_trait)]
	pub fn not(mut self) -> Self {
		self.negate = !self.negate;
		self
	}

	/// Returns true if this condition has no sub-conditions.
	pub fn is_empty(&self) -> bool {
		self.conditions.is_empty()
	}

	/// Returns the number of sub-conditions.
	pub fn len(&self) -> usize {
		self.conditions.len()
	}
}

/// Helper for creating conditions.
///
/// This is a convenience wrapper around [`Condition`].
pub struct Cond;

impl Cond {
	/// Create a condition that requires all sub-conditions (AND).
	pub fn all() -> Condition {
		Condition::all()
	}

	/// Create a condition that requires any sub-condition (OR).
	pub fn any() -> Condition {
		Condition::any()
	}
}

/// Trait for types that can be converted into a condition expression.
pub trait IntoCondition {
	/// Convert into a ConditionExpression.
	fn into_condition_expression(self) -> ConditionExpression;

	/// Convert into a Condition (wrapping if necessary).
	fn into_condition(self) -> Condition
	where
		Self: Sized,
	{
		match self.into_condition_expression() {
			ConditionExpression::Condition(c) => c,
			ConditionExpression::SimpleExpr(e) => Condition::all().add(e),
		}
	}
}

impl IntoCondition for Condition {
	fn into_condition_expression(self) -> ConditionExpression {
		ConditionExpression::Condition(self)
	}

	fn into_condition(self) -> Condition {
		self
	}
}

impl IntoCondition for SimpleExpr {
	fn into_condition_expression(self) -> ConditionExpression {
		ConditionExpression::SimpleExpr(self)
	}
}

impl IntoCondition for super::expr::Expr {
	fn into_condition_expression(self) -> ConditionExpression {
		ConditionExpression::SimpleExpr(self.into_simple_expr())
	}
}

/// Holder for conditions in query builders.
///
/// Entries are joined with AND when written.
#[derive(Debug, Clone, Default)]
pub struct ConditionHolder {
	/// The conditions
	pub conditions: Vec<ConditionExpression>,
}

impl ConditionHolder {
	/// Add a condition with AND.
	pub fn add_and<C>(&mut self, condition: C)
	where
		C: IntoCondition,
	{
		self.conditions.push(condition.into_condition_expression());
	}

	/// Returns true if there are no conditions.
	pub fn is_empty(&self) -> bool {
		self.conditions.is_empty()
	}

	/// Returns the number of conditions.
	pub fn len(&self) -> usize {
		self.conditions.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::expr::{Expr, ExprTrait};
	use rstest::rstest;

	#[rstest]
	fn test_condition_all() {
		let cond = Cond::all()
			.add(Expr::col("status").eq("ACTIVE"))
			.add(Expr::col("deleted").eq(false));

		assert_eq!(cond.condition_type, ConditionType::All);
		assert_eq!(cond.len(), 2);
		assert!(!cond.is_empty());
	}

	#[rstest]
	fn test_condition_any() {
		let cond = Cond::any()
			.add(Expr::col("name").eq("a"))
			.add(Expr::col("name").eq("b"));

		assert_eq!(cond.condition_type, ConditionType::Any);
		assert_eq!(cond.len(), 2);
	}

	#[rstest]
	fn test_condition_not_toggles() {
		let cond = Cond::all().add(Expr::col("deleted").eq(true)).not();
		assert!(cond.negate);
		assert!(!cond.not().negate);
	}

	#[rstest]
	fn test_condition_holder_collects_conditions() {
		let mut holder = ConditionHolder::default();
		assert!(holder.is_empty());

		holder.add_and(Expr::col("active").eq(true));
		holder.add_and(Cond::any().add(Expr::col("role").eq("admin")));

		assert_eq!(holder.len(), 2);
	}
}
