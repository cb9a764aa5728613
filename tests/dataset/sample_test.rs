use std::collections::HashSet;

use yearly_csv::LoadOptions;

use crate::utils::{column_names, int_column, standard_fixture};

#[test]
fn test_small_year_is_returned_whole() {
    let (_dir, dataset) = standard_fixture();
    let sample = dataset.sample_year(2019, 100, None).unwrap();
    let full = dataset.load_year(2019, &LoadOptions::new()).unwrap();
    assert_eq!(sample, full);
}

#[test]
fn test_sample_is_distinct_and_reproducible() {
    let (_dir, dataset) = standard_fixture();
    let first = dataset.sample_year(2020, 4, None).unwrap();
    let second = dataset.sample_year(2020, 4, None).unwrap();

    assert_eq!(first.num_rows(), 4);
    assert_eq!(first, second);

    let ids: HashSet<_> = int_column(&first, "id").into_iter().flatten().collect();
    assert_eq!(ids.len(), 4);
    assert!(ids.iter().all(|id| (0..8).contains(id)));
}

#[test]
fn test_sample_with_projection() {
    let (_dir, dataset) = standard_fixture();
    let columns = vec!["age".to_string()];
    let sample = dataset.sample_year(2021, 2, Some(&columns)).unwrap();
    assert_eq!(column_names(&sample), vec!["age"]);
    assert_eq!(sample.num_rows(), 2);
}
