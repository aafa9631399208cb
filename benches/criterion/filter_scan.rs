use std::{iter::repeat_with, sync::Arc};

use arrow::{
    array::{Int64Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rowfilter::{
    predicate::{ColumnSelector, FilterOperator, MatchOptions},
    settings::{FilterCriterion, FilterSettings, MatchCriteria},
    RowFilter, Table,
};

fn random_table(rows: usize) -> Table {
    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, false),
        Field::new("value", DataType::Int64, false),
    ]));
    let names: Vec<String> = (0..rows)
        .map(|_| repeat_with(fastrand::alphanumeric).take(12).collect())
        .collect();
    let values: Vec<i64> = (0..rows).map(|_| fastrand::i64(0..1000)).collect();
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(names)),
            Arc::new(Int64Array::from(values)),
        ],
    )
    .unwrap();
    Table::new(batch)
}

fn scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_scan");
    let table = random_table(100_000);

    let full_scan = FilterSettings::new(
        vec![
            FilterCriterion::new(ColumnSelector::column("name"), FilterOperator::Wildcard, ["a*"])
                .with_options(MatchOptions::case_insensitive()),
            FilterCriterion::new(ColumnSelector::column("value"), FilterOperator::LessThan, ["500"]),
        ],
        MatchCriteria::Any,
    );
    let windowed = FilterSettings::new(
        vec![
            FilterCriterion::new(
                ColumnSelector::RowIndex,
                FilterOperator::Between,
                ["1000", "1999"],
            ),
            FilterCriterion::new(ColumnSelector::column("value"), FilterOperator::LessThan, ["500"]),
        ],
        MatchCriteria::All,
    );

    for (name, settings) in [("full_scan", full_scan), ("row_window", windowed)] {
        let filter = RowFilter::new(&settings, &table).unwrap();
        group.bench_with_input(BenchmarkId::new("matches", name), &filter, |b, filter| {
            b.iter(|| filter.matches(&table).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, scan);
criterion_main!(benches);
