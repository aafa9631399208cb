use std::sync::Arc;

use arrow::{
    array::{BooleanArray, Float32Array, Float64Array, Int32Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use rowfilter::{
    predicate::{build_leaf, ColumnSelector, FilterOperator, LeafContext, MatchOptions},
    settings::{FilterCriterion, FilterSettings, MatchCriteria, OutputMode},
    DataRow, FilterError, PredicateError, RowFilter, RowIndexRange, RowPredicate, Table,
};

fn people() -> Table {
    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, true),
        Field::new("age", DataType::Int32, true),
        Field::new("score", DataType::Float64, true),
        Field::new("member", DataType::Boolean, true),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(vec![
                Some("Perla"),
                Some("paula"),
                None,
                Some("Nils"),
                Some("Pia"),
                Some("Ole"),
            ])),
            Arc::new(Int32Array::from(vec![
                Some(31),
                Some(19),
                Some(44),
                None,
                Some(27),
                Some(62),
            ])),
            Arc::new(Float64Array::from(vec![
                Some(0.5),
                Some(2.0),
                Some(1.25),
                Some(3.0),
                None,
                Some(2.0),
            ])),
            Arc::new(BooleanArray::from(vec![
                Some(true),
                Some(false),
                None,
                Some(true),
                Some(true),
                Some(false),
            ])),
        ],
    )
    .expect("record batch");
    Table::with_row_keys(batch, ["a1", "a2", "b1", "b2", "c1", "c2"]).expect("table")
}

fn criterion(column: ColumnSelector, operator: FilterOperator, params: &[&str]) -> FilterCriterion {
    FilterCriterion::new(column, operator, params.iter().copied())
}

fn kept_keys(settings: &FilterSettings, table: &Table) -> Vec<String> {
    let filter = RowFilter::new(settings, table).expect("compile");
    filter
        .filter(table)
        .expect("filter")
        .row_keys()
        .iter()
        .map(|key| key.to_string())
        .collect()
}

fn naive_keys(predicate: &RowPredicate, table: &Table) -> Vec<String> {
    (0..table.num_rows())
        .filter_map(|index| table.get_row(index).map(|row| (index, row)))
        .filter(|(index, row)| predicate.test(row, *index))
        .map(|(_, row)| row.key().to_string())
        .collect()
}

#[test]
fn wildcard_case_sensitivity_on_string_column() {
    let table = people();
    let insensitive = FilterSettings::new(
        vec![
            criterion(ColumnSelector::column("name"), FilterOperator::Wildcard, &["p*a"])
                .with_options(MatchOptions::case_insensitive()),
        ],
        MatchCriteria::All,
    );
    assert_eq!(kept_keys(&insensitive, &table), vec!["a1", "a2", "c1"]);

    let sensitive = FilterSettings::new(
        vec![criterion(
            ColumnSelector::column("name"),
            FilterOperator::Wildcard,
            &["p*a"],
        )],
        MatchCriteria::All,
    );
    assert_eq!(kept_keys(&sensitive, &table), vec!["a2"]);
}

#[test]
fn numeric_comparisons_skip_missing_values() {
    let table = people();
    let settings = FilterSettings::new(
        vec![criterion(
            ColumnSelector::column("age"),
            FilterOperator::LessThanOrEqual,
            &["31"],
        )],
        MatchCriteria::All,
    );
    assert_eq!(kept_keys(&settings, &table), vec!["a1", "a2", "c1"]);

    let between = FilterSettings::new(
        vec![criterion(
            ColumnSelector::column("score"),
            FilterOperator::Between,
            &["1", "2"],
        )],
        MatchCriteria::All,
    );
    assert_eq!(kept_keys(&between, &table), vec!["a2", "b1", "c2"]);
}

#[test]
fn not_equal_keeps_missing_but_not_equal_nor_missing_drops_it() {
    let table = people();
    let not_equal = FilterSettings::new(
        vec![criterion(
            ColumnSelector::column("age"),
            FilterOperator::NotEqual,
            &["44"],
        )],
        MatchCriteria::All,
    );
    assert_eq!(
        kept_keys(&not_equal, &table),
        vec!["a1", "a2", "b2", "c1", "c2"]
    );

    let strict = FilterSettings::new(
        vec![criterion(
            ColumnSelector::column("age"),
            FilterOperator::NotEqualNorMissing,
            &["44"],
        )],
        MatchCriteria::All,
    );
    assert_eq!(kept_keys(&strict, &table), vec!["a1", "a2", "c1", "c2"]);
}

#[test]
fn boolean_and_missing_operators() {
    let table = people();
    let members = FilterSettings::new(
        vec![criterion(
            ColumnSelector::column("member"),
            FilterOperator::IsTrue,
            &[],
        )],
        MatchCriteria::All,
    );
    assert_eq!(kept_keys(&members, &table), vec!["a1", "b2", "c1"]);

    let missing_any = FilterSettings::new(
        vec![
            criterion(ColumnSelector::column("name"), FilterOperator::IsMissing, &[]),
            criterion(ColumnSelector::column("score"), FilterOperator::IsMissing, &[]),
        ],
        MatchCriteria::Any,
    );
    assert_eq!(kept_keys(&missing_any, &table), vec!["b1", "c1"]);
}

#[test]
fn row_key_and_row_index_conditions() {
    let table = people();
    let settings = FilterSettings::new(
        vec![
            criterion(ColumnSelector::RowKey, FilterOperator::Regex, &["[ab][0-9]"]),
            criterion(ColumnSelector::RowIndex, FilterOperator::GreaterThan, &["1"]),
        ],
        MatchCriteria::All,
    );
    let filter = RowFilter::new(&settings, &table).expect("compile");
    assert!(filter.predicate().required_columns().is_empty());
    assert_eq!(
        filter.predicate().row_index_range(),
        &RowIndexRange::greater_than(1)
    );
    assert_eq!(kept_keys(&settings, &table), vec!["b1", "b2"]);

    let last = FilterSettings::new(
        vec![criterion(
            ColumnSelector::RowIndex,
            FilterOperator::LastNRows,
            &["2"],
        )],
        MatchCriteria::All,
    );
    assert_eq!(kept_keys(&last, &table), vec!["c1", "c2"]);
}

#[test]
fn driver_agrees_with_naive_evaluation() {
    let table = people();
    let ctx = LeafContext::for_table(&table);
    let candidates = [
        (ColumnSelector::RowIndex, FilterOperator::Between, vec!["1", "3"]),
        (ColumnSelector::RowIndex, FilterOperator::GreaterThanOrEqual, vec!["4"]),
        (ColumnSelector::RowIndex, FilterOperator::NotEqual, vec!["2"]),
        (ColumnSelector::column("age"), FilterOperator::GreaterThan, vec!["25"]),
        (ColumnSelector::column("name"), FilterOperator::Regex, vec!["P.*"]),
        (ColumnSelector::column("member"), FilterOperator::IsFalse, vec![]),
    ];
    let leaves: Vec<RowPredicate> = candidates
        .iter()
        .map(|(column, operator, params)| {
            let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
            build_leaf(column, *operator, &params, &MatchOptions::default(), &ctx)
                .expect("leaf")
        })
        .collect();

    let mut rng = fastrand::Rng::with_seed(42);
    for _ in 0..100 {
        let picked: Vec<RowPredicate> = (0..rng.usize(1..4))
            .map(|_| leaves[rng.usize(0..leaves.len())].clone())
            .collect();
        let mut predicate = if rng.bool() {
            RowPredicate::and(picked)
        } else {
            RowPredicate::or(picked)
        }
        .expect("group");
        if rng.bool() {
            predicate = predicate.negate();
        }

        let expected = naive_keys(&predicate, &table);
        let filter = RowFilter::from_predicate(predicate, OutputMode::Matching);
        let actual: Vec<String> = filter
            .filter(&table)
            .expect("filter")
            .row_keys()
            .iter()
            .map(|key| key.to_string())
            .collect();
        assert_eq!(actual, expected);
    }
}

#[test]
fn split_returns_both_sides_in_order() {
    let table = people();
    let settings = FilterSettings::new(
        vec![criterion(
            ColumnSelector::column("age"),
            FilterOperator::GreaterThan,
            &["30"],
        )],
        MatchCriteria::All,
    );
    let filter = RowFilter::new(&settings, &table).expect("compile");
    let (hits, rest) = filter.split(&table).expect("split");
    let keys = |t: &Table| -> Vec<String> { t.row_keys().iter().map(|k| k.to_string()).collect() };
    assert_eq!(keys(&hits), vec!["a1", "b1", "c2"]);
    assert_eq!(keys(&rest), vec!["a2", "b2", "c1"]);
    assert_eq!(hits.batch().num_columns(), 4);
}

#[test]
fn configuration_errors_surface_before_scanning() {
    let table = people();
    let unknown = FilterSettings::new(
        vec![criterion(
            ColumnSelector::column("salary"),
            FilterOperator::Equal,
            &["1"],
        )],
        MatchCriteria::All,
    );
    let err = RowFilter::new(&unknown, &table).expect_err("unknown column");
    assert!(matches!(
        err,
        FilterError::Predicate(PredicateError::ColumnNotFound { .. })
    ));

    let bad_regex = FilterSettings::new(
        vec![criterion(
            ColumnSelector::column("name"),
            FilterOperator::Regex,
            &["(P"],
        )],
        MatchCriteria::All,
    );
    let err = RowFilter::new(&bad_regex, &table).expect_err("invalid regex");
    assert!(matches!(
        err,
        FilterError::Predicate(PredicateError::InvalidPattern(_))
    ));

    let json = r#"{"criteria": [{"column": {"column": "name"}, "operator": "equal",
        "parameters": ["x"], "caseSensitive": null}]}"#;
    let settings = FilterSettings::from_json(json).expect("settings");
    let err = RowFilter::new(&settings, &table).expect_err("unset option");
    assert!(matches!(
        err,
        FilterError::Predicate(PredicateError::UnsetOption(_))
    ));
}

#[test]
fn empty_settings_keep_every_row() {
    let table = people();
    assert_eq!(
        kept_keys(&FilterSettings::default(), &table),
        vec!["a1", "a2", "b1", "b2", "c1", "c2"]
    );
}

#[test]
fn float32_column_equality_uses_column_precision() {
    let schema = Arc::new(Schema::new(vec![Field::new("x", DataType::Float32, true)]));
    let batch = RecordBatch::try_new(
        schema,
        vec![Arc::new(Float32Array::from(vec![Some(0.1), Some(0.5), None]))],
    )
    .expect("record batch");
    let table = Table::new(batch);

    let equal = FilterSettings::new(
        vec![criterion(ColumnSelector::column("x"), FilterOperator::Equal, &["0.1"])],
        MatchCriteria::All,
    );
    assert_eq!(kept_keys(&equal, &table), vec!["Row0"]);

    let between = FilterSettings::new(
        vec![criterion(
            ColumnSelector::column("x"),
            FilterOperator::Between,
            &["0.1", "0.5"],
        )],
        MatchCriteria::All,
    );
    assert_eq!(kept_keys(&between, &table), vec!["Row0", "Row1"]);
}

#[test]
fn negated_group_keeps_matches_outside_its_window() {
    let table = people();
    let ctx = LeafContext::for_table(&table);
    let build = |column: ColumnSelector, operator: FilterOperator, params: &[&str]| {
        let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
        build_leaf(&column, operator, &params, &MatchOptions::default(), &ctx).expect("leaf")
    };
    let group = RowPredicate::and([
        build(ColumnSelector::RowIndex, FilterOperator::GreaterThanOrEqual, &["3"]),
        build(ColumnSelector::column("age"), FilterOperator::GreaterThan, &["30"]),
    ])
    .expect("and")
    .negate();
    assert!(group.row_index_range().is_all());

    let expected = naive_keys(&group, &table);
    assert_eq!(expected, vec!["a1", "a2", "b1", "b2", "c1"]);
    let filter = RowFilter::from_predicate(group, OutputMode::Matching);
    let kept: Vec<String> = filter
        .filter(&table)
        .expect("filter")
        .row_keys()
        .iter()
        .map(|key| key.to_string())
        .collect();
    assert_eq!(kept, expected);
}
