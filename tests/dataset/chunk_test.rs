use yearly_csv::utils::concat_tables;
use yearly_csv::{LoadOptions, YearlyDataError, dtype_hints};

use crate::utils::{column_names, standard_fixture, string_column};

#[test]
fn test_chunks_have_requested_size() {
    let (_dir, dataset) = standard_fixture();
    let chunks = dataset
        .iter_year_chunks(2020, Some(3), None, None)
        .unwrap()
        .collect::<yearly_csv::Result<Vec<_>>>()
        .unwrap();

    let sizes: Vec<_> = chunks.iter().map(|c| c.num_rows()).collect();
    assert_eq!(sizes, vec![3, 3, 2]);
}

#[test]
fn test_chunks_concatenate_to_full_load() {
    let (_dir, dataset) = standard_fixture();
    let chunks = dataset
        .iter_year_chunks(2021, Some(4), None, None)
        .unwrap()
        .collect::<yearly_csv::Result<Vec<_>>>()
        .unwrap();

    let full = dataset.load_year(2021, &LoadOptions::new()).unwrap();
    assert_eq!(concat_tables(&chunks).unwrap(), full);
}

#[test]
fn test_default_chunk_size_reads_whole_year() {
    let (_dir, dataset) = standard_fixture();
    let chunks: Vec<_> = dataset
        .iter_year_chunks(2019, None, None, None)
        .unwrap()
        .collect();
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].as_ref().unwrap().num_rows(), 5);
}

#[test]
fn test_chunks_with_projection_and_hints() {
    let (_dir, dataset) = standard_fixture();
    let columns = vec!["zip".to_string(), "id".to_string()];
    let hints = dtype_hints([("zip", "str")]).unwrap();
    let mut chunks = dataset
        .iter_year_chunks(2020, Some(5), Some(&columns), Some(&hints))
        .unwrap();

    let schema = chunks.schema();
    assert_eq!(schema.fields().len(), 2);
    assert_eq!(chunks.year(), 2020);

    let first = chunks.next().unwrap().unwrap();
    assert_eq!(column_names(&first), vec!["id", "zip"]);
    assert_eq!(string_column(&first, "zip")[1].as_deref(), Some("02101"));
    assert_eq!(chunks.next().unwrap().unwrap().num_rows(), 3);
    assert!(chunks.next().is_none());
    assert!(chunks.next().is_none());
}

#[test]
fn test_zero_chunk_size_is_rejected() {
    let (_dir, dataset) = standard_fixture();
    let err = dataset.iter_year_chunks(2020, Some(0), None, None).unwrap_err();
    assert!(matches!(err, YearlyDataError::InvalidArgument(_)));
}

#[test]
fn test_chunks_for_missing_year() {
    let (_dir, dataset) = standard_fixture();
    assert!(matches!(
        dataset.iter_year_chunks(1990, None, None, None),
        Err(YearlyDataError::FileNotFound { year: 1990, .. })
    ));
}
