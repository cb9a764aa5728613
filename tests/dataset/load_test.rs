use arrow::datatypes::DataType;
use yearly_csv::{LoadOptions, LoaderConfig, YearlyDataError, YearlyDataset, dtype_hints};

use crate::utils::{column_names, fixture, int_column, standard_fixture, string_column, write_year};

#[test]
fn test_available_years_are_sorted() {
    let (dir, dataset) = standard_fixture();
    // Files that do not follow the naming pattern are ignored
    std::fs::write(dir.path().join("cleaned_2018_partial.csv"), "a\n1\n").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();

    let dataset = YearlyDataset::new(Some(dataset.data_dir())).unwrap();
    assert_eq!(dataset.available_years(), &[2019, 2020, 2021]);
}

#[test]
fn test_load_year_shape() {
    let (_dir, dataset) = standard_fixture();
    let table = dataset.load_year(2020, &LoadOptions::new()).unwrap();

    assert_eq!(table.num_rows(), 8);
    assert_eq!(table.num_columns(), 5);
    assert_eq!(column_names(&table), vec!["id", "year", "state", "age", "zip"]);
    assert_eq!(
        int_column(&table, "id"),
        (0..8).map(Some).collect::<Vec<_>>()
    );
}

#[test]
fn test_missing_year_lists_available() {
    let (_dir, dataset) = standard_fixture();
    let err = dataset.load_year(2018, &LoadOptions::new()).unwrap_err();

    match &err {
        YearlyDataError::FileNotFound { year, available } => {
            assert_eq!(*year, 2018);
            assert_eq!(available, &vec![2019, 2020, 2021]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("[2019, 2020, 2021]"));
}

#[test]
fn test_projection_and_row_cap() {
    let (_dir, dataset) = standard_fixture();
    let options = LoadOptions::new()
        .with_columns(["state", "id"])
        .with_row_cap(3);
    let table = dataset.load_year(2020, &options).unwrap();

    assert_eq!(column_names(&table), vec!["id", "state"]);
    assert_eq!(table.num_rows(), 3);
    assert_eq!(
        string_column(&table, "state"),
        vec![Some("CA".into()), Some("NY".into()), Some("TX".into())]
    );
}

#[test]
fn test_row_cap_larger_than_file() {
    let (_dir, dataset) = standard_fixture();
    let table = dataset
        .load_year(2019, &LoadOptions::new().with_row_cap(1000))
        .unwrap();
    assert_eq!(table.num_rows(), 5);
}

#[test]
fn test_unknown_column_in_projection() {
    let (_dir, dataset) = standard_fixture();
    let err = dataset
        .load_year(2020, &LoadOptions::new().with_columns(["income"]))
        .unwrap_err();
    assert!(matches!(err, YearlyDataError::ColumnNotFound { column, .. } if column == "income"));
}

#[test]
fn test_dtype_hints_keep_leading_zeros() {
    let (_dir, dataset) = standard_fixture();

    let inferred = dataset.load_year(2019, &LoadOptions::new()).unwrap();
    assert_eq!(
        inferred.schema().field_with_name("zip").unwrap().data_type(),
        &DataType::Int64
    );

    let hints = dtype_hints([("zip", "str"), ("not_a_column", "int")]).unwrap();
    let table = dataset
        .load_year(2019, &LoadOptions::new().with_dtypes(hints))
        .unwrap();
    assert_eq!(
        string_column(&table, "zip")[0].as_deref(),
        Some("02100")
    );
}

#[test]
fn test_failed_coercion_is_reported() {
    let (_dir, dataset) = standard_fixture();
    let hints = dtype_hints([("state", "float")]).unwrap();
    let err = dataset
        .load_year(2020, &LoadOptions::new().with_dtypes(hints))
        .unwrap_err();
    assert!(matches!(err, YearlyDataError::Parse { .. }));
}

#[test]
fn test_empty_cells_become_nulls() {
    let (dir, _) = fixture(&[]);
    write_year(dir.path(), 2022, "id,state\n1,CA\n2,\n3,NY\n");
    let dataset = YearlyDataset::new(Some(dir.path())).unwrap();

    let table = dataset.load_year(2022, &LoadOptions::new()).unwrap();
    assert_eq!(string_column(&table, "state")[1], None);
}

#[test]
fn test_custom_delimiter() {
    let (dir, _) = fixture(&[]);
    write_year(dir.path(), 2020, "id;state\n1;CA\n2;NY\n");
    let config = LoaderConfig {
        delimiter: b';',
        ..LoaderConfig::for_dir(dir.path())
    };
    let dataset = YearlyDataset::with_config(config).unwrap();

    assert_eq!(dataset.get_column_names(None).unwrap(), vec!["id", "state"]);
    let table = dataset.load_year(2020, &LoadOptions::new()).unwrap();
    assert_eq!(table.num_rows(), 2);
}

#[test]
fn test_year_info() {
    let (_dir, dataset) = standard_fixture();
    let info = dataset.get_year_info(2021).unwrap();

    assert_eq!(info.year, 2021);
    assert_eq!(info.estimated_rows, 6);
    assert_eq!(info.column_count, 5);
    assert!(info.path.ends_with("cleaned_2021_all.csv"));

    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["year"], 2021);
    assert_eq!(json["estimated_rows"], 6);
}
