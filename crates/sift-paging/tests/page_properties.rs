//! Property-based tests for pages, criteria and compilation.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::{author_values, ids, library_schema, library_service};
use proptest::prelude::*;
use sift_paging::prelude::*;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
	tokio::runtime::Builder::new_current_thread()
		.build()
		.unwrap()
		.block_on(future)
}

/// Birth years of the fixture authors with a known year.
const BORN: [i32; 4] = [1929, 1920, 1775, 1948];

/// Fixture authors newest first, with their birth year.
const AUTHORS: [(i64, Option<i32>); 5] = [
	(5, None),
	(4, Some(1948)),
	(3, Some(1775)),
	(2, Some(1920)),
	(1, Some(1929)),
];

const OPS: [NumericOp; 5] = [
	NumericOp::Eq,
	NumericOp::Lt,
	NumericOp::Lte,
	NumericOp::Gt,
	NumericOp::Gte,
];

const LIKE_KINDS: [LikeKind; 3] = [LikeKind::StartsWith, LikeKind::EndsWith, LikeKind::Contains];

fn negated_if(criterion: Criterion, negated: bool) -> CriteriaValue {
	let value = CriteriaValue::from(criterion);
	if negated { value.not() } else { value }
}

/// Authors a page filtered on `field` by `value` returns, on every backend.
fn filtered_ids(field: &str, value: &CriteriaValue) -> Vec<Vec<i64>> {
	[
		BackendCapabilities::postgres(),
		BackendCapabilities::mysql(),
		BackendCapabilities::sqlite(),
	]
	.into_iter()
	.map(|capabilities| {
		let service = library_service(capabilities);
		let page = Page::builder()
			.all_match([(field, value.clone())])
			.unwrap()
			.build();
		ids(&block_on(service.get_page("Author", &page, true)).unwrap())
	})
	.collect()
}

/// Authors whose `field` the value applies to, newest first.
fn applying_ids(field: &str, value: &CriteriaValue) -> Vec<i64> {
	author_values(field)
		.into_iter()
		.filter(|(_, stored)| value.applies(stored))
		.map(|(id, _)| id)
		.collect()
}

// ============================================================================
// Pages
// ============================================================================

proptest! {
	/// Valid ranges are kept as given.
	#[test]
	fn prop_valid_range_is_kept(offset in 0i64..100_000, limit in 1i64..100_000) {
		let page = Page::of(offset, limit).unwrap();

		prop_assert_eq!(page.offset(), offset as u64);
		prop_assert_eq!(page.limit(), limit as u64);
		prop_assert!(page.is_ranged());
	}

	/// Negative offsets and non-positive limits are rejected.
	#[test]
	fn prop_invalid_range_is_rejected(offset in i64::MIN..0, limit in i64::MIN..1) {
		let bad_offset = Page::of(offset, 10);
		let bad_limit = Page::of(0, limit);

		prop_assert!(
			matches!(bad_offset, Err(PageError::InvalidArgument { ref name, .. }) if name == "offset"),
			"expected InvalidArgument for offset"
		);
		prop_assert!(
			matches!(bad_limit, Err(PageError::InvalidArgument { ref name, .. }) if name == "limit"),
			"expected InvalidArgument for limit"
		);
	}

	/// Pages with the same parts render and compare the same.
	#[test]
	fn prop_canonical_form_ignores_insertion_order(
		keys in prop::collection::btree_set("[a-z]{1,6}", 1..5)
	) {
		let forward: Vec<(String, &str)> = keys.iter().map(|key| (key.clone(), "x")).collect();
		let backward: Vec<(String, &str)> = forward.iter().rev().cloned().collect();

		let first = Page::builder().all_match(forward).unwrap().build();
		let second = Page::builder().all_match(backward).unwrap().build();

		prop_assert_eq!(first.to_string(), second.to_string());
		prop_assert_eq!(first, second);
	}
}

// ============================================================================
// Criteria
// ============================================================================

proptest! {
	/// Negating twice is the identity.
	#[test]
	fn prop_double_negation(expected in -50i64..50, input in -50i64..50) {
		let value = CriteriaValue::from(expected);
		let twice = value.clone().not().not();

		prop_assert_eq!(twice.applies(&Value::from(input)), value.applies(&Value::from(input)));
		prop_assert!(!twice.unwrap_negation().1);
	}

	/// Negation flips the outcome for non-null input.
	#[test]
	fn prop_negation_flips(expected in -50i64..50, input in -50i64..50) {
		let value = CriteriaValue::from(expected);

		prop_assert_ne!(value.clone().not().applies(&Value::from(input)), value.applies(&Value::from(input)));
	}

	/// A list matches when any item matches.
	#[test]
	fn prop_list_is_any_of(items in prop::collection::vec(-20i64..20, 1..6), input in -20i64..20) {
		let list = CriteriaValue::from(items.clone());

		prop_assert_eq!(list.applies(&Value::from(input)), items.contains(&input));
	}

	/// Between is a closed interval.
	#[test]
	fn prop_between_is_closed(min in -1000i64..1000, span in 0i64..100, input in -1200i64..1200) {
		let criterion = Criterion::between(min, min + span).unwrap();

		prop_assert_eq!(
			criterion.applies(&Value::from(input)),
			min <= input && input <= min + span
		);
	}

	/// Reversed bounds are rejected.
	#[test]
	fn prop_reversed_between_is_rejected(max in -1000i64..1000, gap in 1i64..100) {
		let result = Criterion::between(max + gap, max);

		prop_assert!(
			matches!(result, Err(PageError::InvalidArgument { ref name, .. }) if name == "between"),
			"expected InvalidArgument for between"
		);
	}

	/// Null never satisfies a comparison, nor its negation.
	#[test]
	fn prop_null_is_unknown(expected in -50i64..50) {
		let value = CriteriaValue::from(expected);

		prop_assert!(!value.applies(&Value::BigInt(None)));
		prop_assert!(!value.not().applies(&Value::BigInt(None)));
	}

	/// Patterns anchor the text at the requested end.
	#[test]
	fn prop_like_patterns(text in "[a-z]{0,8}") {
		prop_assert_eq!(LikeKind::StartsWith.pattern(&text), format!("{text}%"));
		prop_assert_eq!(LikeKind::EndsWith.pattern(&text), format!("%{text}"));
		prop_assert_eq!(LikeKind::Contains.pattern(&text), format!("%{text}%"));
	}
}

// ============================================================================
// Compilation and execution
// ============================================================================

proptest! {
	#![proptest_config(ProptestConfig::with_cases(32))]

	/// Compiling the same request twice yields identical plans.
	#[test]
	fn prop_compilation_is_deterministic(
		threshold in 1700i32..2000,
		name in "[a-z]{1,8}",
		offset in 0i64..20,
		limit in 1i64..20,
	) {
		let schema = library_schema();
		let registry = MetadataRegistry::new(Arc::clone(&schema));
		let capabilities = BackendCapabilities::postgres();
		let page = Page::builder()
			.range(offset, limit)
			.unwrap()
			.all_match([("born", format!(">{threshold}"))])
			.unwrap()
			.any_match([("name", name.clone()), ("genres", name)])
			.unwrap()
			.build();
		let request = PageRequest::new("Author", page).with_count(true);
		let compiler = QueryCompiler::new(&schema, &registry, &capabilities);

		prop_assert_eq!(compiler.compile(&request).unwrap(), compiler.compile(&request).unwrap());
	}

	/// Compiled predicates select exactly the rows the criterion applies to.
	#[test]
	fn prop_compiled_predicate_agrees_with_applies(
		op in 0usize..5,
		threshold in prop_oneof![1700i32..2000, Just(1929), Just(1775)],
		negated in any::<bool>(),
	) {
		let criterion = Criterion::numeric(OPS[op], threshold).unwrap();
		let value = if negated {
			CriteriaValue::from(criterion).not()
		} else {
			CriteriaValue::from(criterion)
		};
		let service = library_service(BackendCapabilities::postgres());
		let page = Page::builder().all_match([("born", value.clone())]).unwrap().build();

		let result = block_on(service.get_page("Author", &page, true)).unwrap();

		let expected: Vec<i64> = AUTHORS
			.iter()
			.filter(|(_, born)| value.applies(&Value::Int(*born)))
			.map(|(id, _)| *id)
			.collect();
		prop_assert_eq!(ids(&result), expected);
	}

	/// Pattern matches treat wildcards in the text literally.
	#[test]
	fn prop_like_agrees_with_applies(
		kind in 0usize..3,
		text in "[a-zA-Z%_ ]{0,3}",
		negated in any::<bool>(),
	) {
		let criterion = Criterion::Like { kind: LIKE_KINDS[kind], text };
		let value = negated_if(criterion, negated);

		let expected = applying_ids("name", &value);
		for found in filtered_ids("name", &value) {
			prop_assert_eq!(&found, &expected);
		}
	}

	/// Case-insensitive equality selects the same authors in memory and in SQL.
	#[test]
	fn prop_ignore_case_agrees_with_applies(
		text in prop_oneof![
			prop::sample::select(vec!["le guin", "HERBERT", "Austen", "pRaTcHeTt"]).prop_map(String::from),
			"[a-zA-Z ]{0,8}",
		],
		negated in any::<bool>(),
	) {
		let value = negated_if(Criterion::ignore_case(text), negated);

		let expected = applying_ids("name", &value);
		for found in filtered_ids("name", &value) {
			prop_assert_eq!(&found, &expected);
		}
	}

	/// Enum constants parsed by name or ordinal select the same authors.
	#[test]
	fn prop_enumerated_agrees_with_applies(
		input in prop::sample::select(vec!["active", "RETIRED", "Retired", "0", "1"]),
		negated in any::<bool>(),
	) {
		let status = EnumType::new("Status", ["ACTIVE", "RETIRED"]);
		let criterion = Criterion::parse_enum(&Value::from(input), &status).unwrap();
		let value = negated_if(criterion, negated);

		let expected = applying_ids("status", &value);
		for found in filtered_ids("status", &value) {
			prop_assert_eq!(&found, &expected);
		}
	}

	/// Boolean criteria never select an author with an unknown flag.
	#[test]
	fn prop_bool_agrees_with_applies(flag in any::<bool>(), negated in any::<bool>()) {
		let value = negated_if(Criterion::Bool(flag), negated);

		let expected = applying_ids("prolific", &value);
		prop_assert!(!expected.contains(&5));
		for found in filtered_ids("prolific", &value) {
			prop_assert_eq!(&found, &expected);
		}
	}

	/// Closed intervals select the same authors in memory and in SQL.
	#[test]
	fn prop_between_agrees_with_applies(
		min in prop_oneof![1700i32..2000, Just(1920), Just(1948)],
		span in 0i32..300,
		negated in any::<bool>(),
	) {
		let criterion = Criterion::between(min, min + span).unwrap();
		let value = negated_if(criterion, negated);

		let expected = applying_ids("born", &value);
		for found in filtered_ids("born", &value) {
			prop_assert_eq!(&found, &expected);
		}
	}

	/// The counted total matches the rows a full page returns.
	#[test]
	fn prop_total_matches_filter(threshold in 1700i32..2000) {
		let service = library_service(BackendCapabilities::postgres());
		let page = Page::builder()
			.all_match([("born", format!(">{threshold}"))])
			.unwrap()
			.build();

		let result = block_on(service.get_page("Author", &page, true)).unwrap();

		let expected = BORN.iter().filter(|born| **born > threshold).count();
		prop_assert_eq!(result.len(), expected);
		prop_assert_eq!(result.estimated_total(), expected as i64);
	}

	/// Filtering through a to-many relationship never repeats a root.
	#[test]
	fn prop_fan_out_keeps_roots_unique(pages in 150i32..500, backend in 0usize..3) {
		let capabilities = [
			BackendCapabilities::postgres(),
			BackendCapabilities::mysql(),
			BackendCapabilities::sqlite(),
		][backend].clone();
		let service = library_service(capabilities);
		let page = Page::builder()
			.all_match([("books.pages", format!(">={pages}"))])
			.unwrap()
			.build();

		let result = block_on(service.get_page("Author", &page, true)).unwrap();

		let found = ids(&result);
		let unique: HashSet<i64> = found.iter().copied().collect();
		prop_assert_eq!(unique.len(), found.len());
		prop_assert_eq!(result.estimated_total(), found.len() as i64);
	}

	/// A criterion that does not parse for its field is dropped.
	#[test]
	fn prop_unparsable_criterion_is_skipped(text in "[g-m]{2,8}") {
		let service = library_service(BackendCapabilities::postgres());
		let page = Page::builder().all_match([("born", text)]).unwrap().build();

		let result = block_on(service.get_page("Author", &page, true)).unwrap();

		prop_assert_eq!(result.estimated_total(), 5);
	}

	/// Windows over the same ordering tile the full result.
	#[test]
	fn prop_windows_tile_the_result(limit in 2i64..4) {
		let service = library_service(BackendCapabilities::postgres());
		let all = ids(&block_on(service.get_page("Author", &Page::all(), false)).unwrap());

		let mut tiled = Vec::new();
		let mut offset = 0;
		while (offset as usize) < all.len() {
			let page = Page::of(offset, limit).unwrap();
			tiled.extend(ids(&block_on(service.get_page("Author", &page, false)).unwrap()));
			offset += limit;
		}

		prop_assert_eq!(tiled, all);
	}
}
