use yearly_csv::{LoadOptions, YearlyDataError, YearlyDataset};

use crate::utils::{column_names, fixture, int_column, standard_fixture, write_year};

fn years_column(table: &yearly_csv::RecordBatch) -> Vec<i64> {
    int_column(table, "year").into_iter().flatten().collect()
}

#[test]
fn test_sequential_load_preserves_request_order() {
    let (_dir, dataset) = standard_fixture();
    let table = dataset
        .load_years(&[2021, 2019], &LoadOptions::new(), false)
        .unwrap();

    assert_eq!(table.num_rows(), 11);
    let years = years_column(&table);
    assert!(years[..6].iter().all(|&y| y == 2021));
    assert!(years[6..].iter().all(|&y| y == 2019));
}

#[test]
fn test_parallel_matches_sequential() {
    let (_dir, dataset) = standard_fixture();
    let years = [2020, 2019, 2021];
    let options = LoadOptions::new().with_columns(["id", "year", "age"]);

    let sequential = dataset.load_years(&years, &options, false).unwrap();
    let parallel = dataset.load_years(&years, &options, true).unwrap();

    assert_eq!(parallel.num_rows(), 19);
    assert_eq!(parallel, sequential);
}

#[test]
fn test_load_all_covers_every_year() {
    let (_dir, dataset) = standard_fixture();
    let table = dataset.load_all(&LoadOptions::new(), true).unwrap();

    assert_eq!(table.num_rows(), 5 + 8 + 6);
    let years = years_column(&table);
    assert_eq!(years.first(), Some(&2019));
    assert_eq!(years.last(), Some(&2021));
}

#[test]
fn test_single_year_list_matches_load_year() {
    let (_dir, dataset) = standard_fixture();
    let options = LoadOptions::new();
    assert_eq!(
        dataset.load_years(&[2020], &options, true).unwrap(),
        dataset.load_year(2020, &options).unwrap()
    );
}

#[test]
fn test_row_cap_is_ignored_for_multiple_years() {
    let (_dir, dataset) = standard_fixture();
    let options = LoadOptions::new().with_row_cap(2);
    let table = dataset.load_years(&[2019, 2020], &options, true).unwrap();
    assert_eq!(table.num_rows(), 13);
}

#[test]
fn test_empty_year_list() {
    let (_dir, dataset) = standard_fixture();
    let table = dataset.load_years(&[], &LoadOptions::new(), true).unwrap();
    assert_eq!(table.num_rows(), 0);
    assert_eq!(table.num_columns(), 0);
}

#[test]
fn test_missing_year_fails_before_loading() {
    let (_dir, dataset) = standard_fixture();
    let err = dataset
        .load_years(&[2019, 1999], &LoadOptions::new(), true)
        .unwrap_err();
    assert!(matches!(err, YearlyDataError::FileNotFound { year: 1999, .. }));
}

#[test]
fn test_worker_failure_names_year() {
    let (dir, _) = fixture(&[(2019, 5), (2021, 4)]);
    write_year(dir.path(), 2020, "id,year\n1,2020\n2\n3,2020,extra\n");
    let dataset = YearlyDataset::new(Some(dir.path())).unwrap();
    let years = [2019, 2020, 2021];

    match dataset.load_years(&years, &LoadOptions::new(), true) {
        Err(YearlyDataError::ParallelWorker { year, source }) => {
            assert_eq!(year, 2020);
            assert!(matches!(*source, YearlyDataError::Parse { .. }));
        }
        other => panic!("expected a worker error, got {other:?}"),
    }

    // The sequential path reports the underlying error directly
    let err = dataset
        .load_years(&years, &LoadOptions::new(), false)
        .unwrap_err();
    assert!(matches!(err, YearlyDataError::Parse { .. }));
}

#[test]
fn test_schemas_are_unified_across_years() {
    let (dir, _) = fixture(&[(2019, 3)]);
    write_year(
        dir.path(),
        2020,
        "id,year,state,age,zip,income\n0,2020,CA,30.5,02100,1000\n1,2020,NY,41.0,02101,2000\n",
    );
    let dataset = YearlyDataset::new(Some(dir.path())).unwrap();

    let table = dataset
        .load_years(&[2019, 2020], &LoadOptions::new(), false)
        .unwrap();

    assert_eq!(table.num_rows(), 5);
    assert_eq!(
        column_names(&table),
        vec!["id", "year", "state", "age", "zip", "income"]
    );
    assert_eq!(
        table.schema().field_with_name("age").unwrap().data_type(),
        &arrow::datatypes::DataType::Float64
    );
    let income = int_column(&table, "income");
    assert_eq!(income, vec![None, None, None, Some(1000), Some(2000)]);
}

#[test]
fn test_progress_bar_does_not_change_result() {
    let (dir, _) = fixture(&[(2019, 5), (2020, 8)]);
    let config = yearly_csv::LoaderConfig {
        show_progress: true,
        ..yearly_csv::LoaderConfig::for_dir(dir.path())
    };
    let dataset = YearlyDataset::with_config(config).unwrap();
    let table = dataset.load_all(&LoadOptions::new(), true).unwrap();
    assert_eq!(table.num_rows(), 13);
}
