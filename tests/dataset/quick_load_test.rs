use std::sync::Arc;

use yearly_csv::{
    ExpressionFilter, LoadOptions, SharedFilter, YearSpec, YearlyDataError, col, quick_load,
};

use crate::utils::{int_column, standard_fixture};

#[test]
fn test_quick_load_dispatch() {
    let (dir, dataset) = standard_fixture();
    let options = LoadOptions::new();

    let all = quick_load(YearSpec::All, None, None, Some(dir.path())).unwrap();
    assert_eq!(all, dataset.load_all(&options, false).unwrap());

    let one = quick_load(2020, None, None, Some(dir.path())).unwrap();
    assert_eq!(one, dataset.load_year(2020, &options).unwrap());

    let many = quick_load(vec![2021, 2019], None, None, Some(dir.path())).unwrap();
    assert_eq!(many, dataset.load_years(&[2021, 2019], &options, false).unwrap());
}

#[test]
fn test_quick_load_from_text() {
    let (dir, _dataset) = standard_fixture();
    let spec: YearSpec = "2019,2021".parse().unwrap();
    let table = quick_load(spec, None, None, Some(dir.path())).unwrap();
    assert_eq!(table.num_rows(), 11);

    let err = "2020.5".parse::<YearSpec>().unwrap_err();
    assert!(matches!(err, YearlyDataError::InvalidArgument(_)));
}

#[test]
fn test_quick_load_with_columns_and_filter() {
    let (dir, _dataset) = standard_fixture();
    let columns = vec!["id".to_string(), "state".to_string()];
    let filter: SharedFilter = Arc::new(ExpressionFilter::new(col("state").eq("CA")));

    let table = quick_load(2020, Some(&columns), Some(filter), Some(dir.path())).unwrap();
    assert_eq!(table.num_columns(), 2);
    assert_eq!(int_column(&table, "id"), vec![Some(0), Some(4)]);
}

#[test]
fn test_quick_load_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        quick_load(YearSpec::All, None, None, Some(&missing)),
        Err(YearlyDataError::DirectoryNotFound(_))
    ));
}
