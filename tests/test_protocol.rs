use std::fs;

use femo::{
    population::Population,
    protocol::{
        emit_archive, emit_parents, ingest_initial, ingest_offspring, is_consumed,
        read_identities, RunParameters, SharedFiles,
    },
    SelectorError,
};
use tempfile::tempdir;

fn params() -> RunParameters {
    RunParameters::builder()
        .alpha(3)
        .mu(2)
        .lambda(2)
        .dimension(2)
        .build()
        .unwrap()
}

#[test]
fn test_archive_round_trip() {
    let dir = tempdir().unwrap();
    let files = SharedFiles::in_dir(dir.path(), "run.");
    let mut population = Population::with_capacity(4);
    for identity in [12, 3, 40, 7, 25] {
        population.insert(identity, vec![0.0, 1.0]).unwrap();
    }
    population.remove(7).unwrap();

    emit_archive(&files.arc, &population).unwrap();

    assert_eq!(read_identities(&files.arc).unwrap(), vec![3, 12, 25, 40]);
    assert!(!is_consumed(&files.arc).unwrap());
}

#[test]
fn test_consumed_sentinel_is_idempotent() {
    let dir = tempdir().unwrap();
    let files = SharedFiles::in_dir(dir.path(), "run.");
    fs::write(&files.ini, "9\n0 1 5\n1 2 3\n2 5 5\nEND").unwrap();
    let mut population = Population::with_capacity(8);

    let first = ingest_initial(&files.ini, &params(), &mut population).unwrap();
    assert_eq!(first, vec![0, 1, 2]);
    assert!(is_consumed(&files.ini).unwrap());

    let second = ingest_initial(&files.ini, &params(), &mut population).unwrap();
    assert!(second.is_empty());
    assert_eq!(population.size(), 3);
}

#[test]
fn test_missing_end_keeps_parsed_candidates() {
    let dir = tempdir().unwrap();
    let files = SharedFiles::in_dir(dir.path(), "run.");
    let content = "9\n0 1 5\n1 2 3\n2 5 5\n";
    fs::write(&files.ini, content).unwrap();
    let mut population = Population::with_capacity(8);

    let result = ingest_initial(&files.ini, &params(), &mut population);

    assert!(matches!(result, Err(SelectorError::Format { .. })));
    assert_eq!(population.identities().collect::<Vec<_>>(), vec![0, 1, 2]);
    // Input is not marked consumed
    assert_eq!(fs::read_to_string(&files.ini).unwrap(), content);
}

#[test]
fn test_truncated_record_keeps_earlier_candidates() {
    let dir = tempdir().unwrap();
    let files = SharedFiles::in_dir(dir.path(), "run.");
    fs::write(&files.var, "6\n4 1 5\n5 2").unwrap();
    let mut population = Population::with_capacity(8);

    let result = ingest_offspring(&files.var, &params(), &mut population);

    assert!(matches!(result, Err(SelectorError::Format { .. })));
    assert!(result.unwrap_err().is_retryable());
    assert!(population.contains(4));
    assert!(!population.contains(5));
}

#[test]
fn test_offspring_header_uses_lambda() {
    let dir = tempdir().unwrap();
    let files = SharedFiles::in_dir(dir.path(), "run.");
    let mut population = Population::with_capacity(8);

    // Sized for alpha = 3 rather than lambda = 2
    fs::write(&files.var, "9\n4 1 5\n5 2 3\n6 5 5\nEND").unwrap();
    let result = ingest_offspring(&files.var, &params(), &mut population);
    assert!(matches!(result, Err(SelectorError::OutOfRange { .. })));

    fs::write(&files.var, "6\n4 1 5\n5 2 3\nEND").unwrap();
    let offspring = ingest_offspring(&files.var, &params(), &mut population).unwrap();
    assert_eq!(offspring, vec![4, 5]);
}

#[test]
fn test_parents_file_layout() {
    let dir = tempdir().unwrap();
    let files = SharedFiles::in_dir(dir.path(), "run.");
    let mut population = Population::with_capacity(8);
    population.insert(1, vec![0.0, 1.0]).unwrap();
    population.insert(6, vec![1.0, 0.0]).unwrap();

    emit_parents(&files.sel, &[6, 1], &population).unwrap();

    assert_eq!(fs::read_to_string(&files.sel).unwrap(), "2\n6\n1\nEND");
}
