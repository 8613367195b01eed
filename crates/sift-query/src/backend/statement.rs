//! Statement layout shared by every dialect.
//!
//! Each function takes the dialect as a [`QueryBuilder`] for quoting and
//! placeholders, and the single [`SqlWriter`] of the statement being built.

use super::{QueryBuilder, SqlWriter};
use crate::expr::{Condition, ConditionExpression, ConditionType, SimpleExpr, SubQueryOper};
use crate::query::SelectStatement;
use crate::types::{BinOper, ColumnRef, JoinExpr, TableRef, UnOper};

pub(crate) fn write_select<B>(builder: &B, writer: &mut SqlWriter, stmt: &SelectStatement)
where
	B: QueryBuilder + ?Sized,
{
	writer.push("SELECT");
	if stmt.distinct {
		writer.push_keyword("DISTINCT");
	}
	writer.push_space();

	if stmt.selects.is_empty() {
		writer.push("*");
	} else {
		writer.push_list(&stmt.selects, ", ", |w, select_expr| {
			write_simple_expr(builder, w, &select_expr.expr);
			if let Some(alias) = &select_expr.alias {
				w.push_keyword("AS");
				w.push_space();
				w.push_identifier(&alias.to_string(), |s| builder.escape_identifier(s));
			}
		});
	}

	// FROM clause
	if !stmt.from.is_empty() {
		writer.push_keyword("FROM");
		writer.push_space();
		writer.push_list(&stmt.from, ", ", |w, table_ref| {
			write_table_ref(builder, w, table_ref);
		});
	}

	// JOIN clauses
	for join in &stmt.join {
		writer.push_space();
		write_join_expr(builder, writer, join);
	}

	// WHERE clause
	if !stmt.r#where.is_empty() {
		writer.push_keyword("WHERE");
		writer.push_space();
		writer.push_list(&stmt.r#where.conditions, " AND ", |w, cond_expr| {
			write_condition_expr(builder, w, cond_expr, stmt.r#where.len() > 1);
		});
	}

	// GROUP BY clause
	if !stmt.groups.is_empty() {
		writer.push_keyword("GROUP BY");
		writer.push_space();
		writer.push_list(&stmt.groups, ", ", |w, expr| {
			write_simple_expr(builder, w, expr);
		});
	}

	// HAVING clause
	if !stmt.having.is_empty() {
		writer.push_keyword("HAVING");
		writer.push_space();
		writer.push_list(&stmt.having.conditions, " AND ", |w, cond_expr| {
			write_condition_expr(builder, w, cond_expr, stmt.having.len() > 1);
		});
	}

	// ORDER BY clause
	if !stmt.orders.is_empty() {
		writer.push_keyword("ORDER BY");
		writer.push_space();
		writer.push_list(&stmt.orders, ", ", |w, order_expr| {
			write_simple_expr(builder, w, &order_expr.expr);
			w.push_keyword(order_expr.order.as_str());
		});
	}

	if let Some(limit) = &stmt.limit {
		writer.push_keyword("LIMIT");
		writer.push_space();
		writer.push_value(limit.clone(), |i| builder.format_placeholder(i));
	}

	if let Some(offset) = &stmt.offset {
		writer.push_keyword("OFFSET");
		writer.push_space();
		writer.push_value(offset.clone(), |i| builder.format_placeholder(i));
	}
}

fn write_iden<B>(builder: &B, writer: &mut SqlWriter, iden: &str)
where
	B: QueryBuilder + ?Sized,
{
	writer.push_identifier(iden, |s| builder.escape_identifier(s));
}

fn write_table_ref<B>(builder: &B, writer: &mut SqlWriter, table_ref: &TableRef)
where
	B: QueryBuilder + ?Sized,
{
	match table_ref {
		TableRef::Table(table) => {
			write_iden(builder, writer, &table.to_string());
		}
		TableRef::TableAlias(table, alias) => {
			write_iden(builder, writer, &table.to_string());
			writer.push_keyword("AS");
			writer.push_space();
			write_iden(builder, writer, &alias.to_string());
		}
	}
}

fn write_column_ref<B>(builder: &B, writer: &mut SqlWriter, col_ref: &ColumnRef)
where
	B: QueryBuilder + ?Sized,
{
	match col_ref {
		ColumnRef::Column(col) => {
			write_iden(builder, writer, &col.to_string());
		}
		ColumnRef::TableColumn(table, col) => {
			write_iden(builder, writer, &table.to_string());
			writer.push(".");
			write_iden(builder, writer, &col.to_string());
		}
		ColumnRef::Asterisk => {
			writer.push("*");
		}
		ColumnRef::TableAsterisk(table) => {
			write_iden(builder, writer, &table.to_string());
			writer.push(".*");
		}
	}
}

fn write_join_expr<B>(builder: &B, writer: &mut SqlWriter, join: &JoinExpr)
where
	B: QueryBuilder + ?Sized,
{
	writer.push(join.join.as_str());
	writer.push_space();
	write_table_ref(builder, writer, &join.table);

	if let Some(on) = &join.on {
		writer.push_keyword("ON");
		writer.push_space();
		write_condition(builder, writer, on, false);
	}
}

/// Writes an operand of a binary expression, parenthesizing nested AND/OR.
fn write_operand<B>(builder: &B, writer: &mut SqlWriter, expr: &SimpleExpr)
where
	B: QueryBuilder + ?Sized,
{
	if expr.is_logical_binary() {
		writer.push("(");
		write_simple_expr(builder, writer, expr);
		writer.push(")");
	} else {
		write_simple_expr(builder, writer, expr);
	}
}

pub(crate) fn write_simple_expr<B>(builder: &B, writer: &mut SqlWriter, expr: &SimpleExpr)
where
	B: QueryBuilder + ?Sized,
{
	match expr {
		SimpleExpr::Column(col_ref) => {
			write_column_ref(builder, writer, col_ref);
		}
		SimpleExpr::Value(value) => {
			writer.push_value(value.clone(), |i| builder.format_placeholder(i));
		}
		SimpleExpr::Binary(left, op, right) => match (op, right.as_ref()) {
			(BinOper::Between | BinOper::NotBetween, SimpleExpr::Tuple(items))
				if items.len() == 2 =>
			{
				write_operand(builder, writer, left);
				writer.push_keyword(op.as_str());
				writer.push_space();
				write_operand(builder, writer, &items[0]);
				writer.push(" AND ");
				write_operand(builder, writer, &items[1]);
			}
			(BinOper::In | BinOper::NotIn, SimpleExpr::Tuple(items)) => {
				write_operand(builder, writer, left);
				writer.push_keyword(op.as_str());
				writer.push(" (");
				writer.push_list(items, ", ", |w, item| {
					write_simple_expr(builder, w, item);
				});
				writer.push(")");
			}
			_ => {
				write_operand(builder, writer, left);
				writer.push_keyword(op.as_str());
				writer.push_space();
				write_operand(builder, writer, right);
			}
		},
		SimpleExpr::Unary(UnOper::Not, inner) => {
			writer.push("NOT ");
			if matches!(inner.as_ref(), SimpleExpr::Binary(..) | SimpleExpr::LikeEscape(..)) {
				writer.push("(");
				write_simple_expr(builder, writer, inner);
				writer.push(")");
			} else {
				write_simple_expr(builder, writer, inner);
			}
		}
		SimpleExpr::Unary(op, inner) => {
			writer.push(op.as_str());
			writer.push(" ");
			write_simple_expr(builder, writer, inner);
		}
		SimpleExpr::FunctionCall(func_name, args) => {
			writer.push(&func_name.to_string());
			writer.push("(");
			writer.push_list(args, ", ", |w, arg| {
				write_simple_expr(builder, w, arg);
			});
			writer.push(")");
		}
		SimpleExpr::SubQuery(op, select_stmt) => {
			match op {
				Some(SubQueryOper::Exists) => writer.push("EXISTS "),
				Some(SubQueryOper::NotExists) => writer.push("NOT EXISTS "),
				// Written by the enclosing binary expression
				Some(SubQueryOper::In) | None => {}
			}
			writer.push("(");
			write_select(builder, writer, select_stmt);
			writer.push(")");
		}
		SimpleExpr::Tuple(items) => {
			writer.push("(");
			writer.push_list(items, ", ", |w, item| {
				write_simple_expr(builder, w, item);
			});
			writer.push(")");
		}
		SimpleExpr::Custom(sql) => {
			writer.push(sql);
		}
		SimpleExpr::Constant(keyword) => {
			writer.push(keyword.as_str());
		}
		SimpleExpr::Asterisk => {
			writer.push("*");
		}
		SimpleExpr::LikeEscape(left, pattern, escape) => {
			write_operand(builder, writer, left);
			writer.push_keyword(BinOper::Like.as_str());
			writer.push_space();
			write_operand(builder, writer, pattern);
			writer.push_keyword("ESCAPE");
			writer.push_space();
			writer.push(&builder.quote_string(&escape.to_string()));
		}
		SimpleExpr::Cast(inner, type_name) => {
			writer.push("CAST(");
			write_simple_expr(builder, writer, inner);
			writer.push(" AS ");
			writer.push(&type_name.to_string());
			writer.push(")");
		}
	}
}

/// Writes a condition. `nested` asks for parentheses around a chain that is
/// itself one element of an enclosing chain.
fn write_condition<B>(builder: &B, writer: &mut SqlWriter, condition: &Condition, nested: bool)
where
	B: QueryBuilder + ?Sized,
{
	if condition.conditions.is_empty() {
		// An empty AND is true and an empty OR is false.
		let constant = match (condition.condition_type, condition.negate) {
			(ConditionType::All, false) | (ConditionType::Any, true) => "1 = 1",
			(ConditionType::All, true) | (ConditionType::Any, false) => "1 = 0",
		};
		writer.push(constant);
		return;
	}

	if condition.negate {
		writer.push("NOT ");
	}

	if condition.conditions.len() == 1 {
		let inner_nested = nested || condition.negate;
		if condition.negate {
			writer.push("(");
		}
		write_condition_expr(builder, writer, &condition.conditions[0], inner_nested);
		if condition.negate {
			writer.push(")");
		}
		return;
	}

	let separator = match condition.condition_type {
		ConditionType::All => " AND ",
		ConditionType::Any => " OR ",
	};
	let parenthesize = nested || condition.negate;
	if parenthesize {
		writer.push("(");
	}
	writer.push_list(&condition.conditions, separator, |w, cond_expr| {
		write_condition_expr(builder, w, cond_expr, true);
	});
	if parenthesize {
		writer.push(")");
	}
}

fn write_condition_expr<B>(
	builder: &B,
	writer: &mut SqlWriter,
	cond_expr: &ConditionExpression,
	nested: bool,
) where
	B: QueryBuilder + ?Sized,
{
	match cond_expr {
		ConditionExpression::Condition(cond) => {
			write_condition(builder, writer, cond, nested);
		}
		ConditionExpression::SimpleExpr(expr) => {
			if nested && expr.is_logical_binary() {
				writer.push("(");
				write_simple_expr(builder, writer, expr);
				writer.push(")");
			} else {
				write_simple_expr(builder, writer, expr);
			}
		}
	}
}
