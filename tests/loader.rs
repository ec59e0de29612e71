mod common;

use common::*;
use miri_performance::{
    loader::{read_archive, LoaderError},
    record::{RecordError, CONFIGS, LIM_FLUXES, SAT_LIMITS, WAVELENGTHS},
    DataRepository, Field, Mode, MrsBand, SourceType,
};
use std::fs;

fn field_names(record: &miri_performance::PerformanceRecord) -> Vec<&str> {
    record.field_names().collect()
}

#[test]
fn imaging_point_scenario() {
    let root = fixture_root("imaging_point_scenario");
    imaging(&version_dir(&root, "14").join("miri_imaging_sensitivity.npz"));

    let record = DataRepository::new(&root)
        .load(" 14\n", Mode::Imaging, SourceType::Point)
        .unwrap();
    assert_eq!(
        field_names(&record),
        vec![LIM_FLUXES, SAT_LIMITS, WAVELENGTHS]
    );
    assert_eq!(
        record.get(WAVELENGTHS).and_then(Field::values),
        Some(&IMAGING_WAVELENGTHS[..])
    );
    assert_eq!(
        record.get(LIM_FLUXES).and_then(Field::values),
        Some(&IMAGING_LIM_FLUXES[..])
    );
    assert_eq!(
        record.get(SAT_LIMITS).and_then(Field::values),
        Some(&IMAGING_SAT_LIMITS[..])
    );
    let table = record.imaging().unwrap();
    assert_eq!(table.len(), 3);
}

#[test]
fn lrs_indexed_members() {
    let root = fixture_root("lrs_indexed_members");
    lrs(&version_dir(&root, "14").join("miri_lrs_sensitivity.npz"));

    let record = DataRepository::new(&root)
        .load("14", Mode::Lrs, SourceType::Point)
        .unwrap();
    assert_eq!(
        field_names(&record),
        vec![CONFIGS, LIM_FLUXES, SAT_LIMITS, WAVELENGTHS]
    );
    assert_eq!(record.get(WAVELENGTHS).map(Field::len), Some(2));
    assert_eq!(
        record.get(CONFIGS).and_then(Field::values),
        Some(&[0., 1.][..])
    );
    let table = record.lrs().unwrap();
    assert_eq!(table.configs[0].label, "slitless");
    assert_eq!(table.configs[0].wavelengths, vec![5., 7.5, 10.]);
    assert_eq!(table.configs[1].label, "slit");
    assert_eq!(table.configs[1].sat_limits, vec![300., 600.]);
}

#[test]
fn mrs_2d_members() {
    let root = fixture_root("mrs_2d_members");
    mrs(&version_dir(&root, "14").join("miri_mrs_sensitivity.npz"));

    let record = DataRepository::new(&root)
        .load("14", Mode::Mrs, SourceType::Point)
        .unwrap();
    assert_eq!(
        field_names(&record),
        vec![CONFIGS, LIM_FLUXES, SAT_LIMITS, WAVELENGTHS]
    );
    assert_eq!(record.get(SAT_LIMITS).map(Field::len), Some(12));
    let table = record.mrs().unwrap();
    assert_eq!(table.configs.len(), 12);
    // f32 saturation limits
    assert_eq!(table.configs[1].sat_limits, vec![1003., 1004., 1005.]);
    let medium: Vec<_> = table
        .band(MrsBand::Medium)
        .map(|(_, c)| c.wavelengths[0])
        .collect();
    assert_eq!(medium, vec![7., 13., 19., 25.]);
}

#[test]
fn extended_wildcard_suffix() {
    let root = fixture_root("extended_wildcard_suffix");
    let dir = version_dir(&root, "1.4");
    lrs(&dir.join("miri_lrs_sensitivity_extended_v2.npz"));

    let repo = DataRepository::new(&root);
    let path = repo.locate("1.4", Mode::Lrs, SourceType::Extended).unwrap();
    assert_eq!(path, dir.join("miri_lrs_sensitivity_extended_v2.npz"));
    // the point source name has no wildcard
    assert!(matches!(
        repo.locate("1.4", Mode::Lrs, SourceType::Point),
        Err(LoaderError::NoUniqueFile { found: 0, .. })
    ));
}

#[test]
fn no_unique_file() {
    let root = fixture_root("no_unique_file");
    let dir = version_dir(&root, "14");
    let repo = DataRepository::new(&root);

    assert!(matches!(
        repo.load("14", Mode::Mrs, SourceType::Extended),
        Err(LoaderError::NoUniqueFile { found: 0, .. })
    ));

    mrs(&dir.join("miri_mrs_sensitivity_extended.npz"));
    mrs(&dir.join("miri_mrs_sensitivity_extended_old.npz"));
    assert!(matches!(
        repo.load("14", Mode::Mrs, SourceType::Extended),
        Err(LoaderError::NoUniqueFile { found: 2, .. })
    ));
}

#[test]
fn data_directory_not_found() {
    let root = fixture_root("data_directory_not_found");
    version_dir(&root, "14");
    assert!(matches!(
        DataRepository::new(&root).load("15", Mode::Imaging, SourceType::Point),
        Err(LoaderError::DataDirectory(_))
    ));
}

#[test]
fn indexed_member_gap() {
    let root = fixture_root("indexed_member_gap");
    let path = root.join("gap.npz");
    write_npz(
        &path,
        &[("wavelengths_0", &[5.][..]), ("wavelengths_2", &[6.][..])],
    );
    assert!(matches!(
        read_archive(&path),
        Err(LoaderError::MissingIndex { index: 1, .. })
    ));
}

#[test]
fn shapes_are_not_checked_by_the_loader() {
    let root = fixture_root("shapes_are_not_checked_by_the_loader");
    let dir = version_dir(&root, "14");
    write_npz(
        &dir.join("miri_imaging_sensitivity.npz"),
        &[
            ("wavelengths", &[5., 10.][..]),
            ("lim_fluxes", &[1e-3][..]),
            ("sat_limits", &[10., 8.][..]),
        ],
    );
    let record = DataRepository::new(&root)
        .load("14", Mode::Imaging, SourceType::Point)
        .unwrap();
    assert_eq!(record.len(), 3);
    assert!(matches!(
        record.imaging(),
        Err(RecordError::LengthMismatch { found: 1, .. })
    ));
}

#[test]
fn corrupted_archive() {
    let root = fixture_root("corrupted_archive");
    let dir = version_dir(&root, "14");
    fs::write(dir.join("miri_imaging_sensitivity.npz"), b"not a zip file").unwrap();
    assert!(matches!(
        DataRepository::new(&root).load("14", Mode::Imaging, SourceType::Point),
        Err(LoaderError::Archive(..))
    ));
}

#[test]
fn integer_and_boolean_members() {
    let root = fixture_root("integer_and_boolean_members");
    imaging_integers(&version_dir(&root, "14").join("miri_imaging_sensitivity.npz"));

    let record = DataRepository::new(&root)
        .load("14", Mode::Imaging, SourceType::Point)
        .unwrap();
    assert_eq!(
        field_names(&record),
        vec!["broad_band", LIM_FLUXES, SAT_LIMITS, WAVELENGTHS]
    );
    assert_eq!(
        record.get("broad_band").and_then(Field::values),
        Some(&[1., 0., 1.][..])
    );
    let table = record.imaging().unwrap();
    assert_eq!(table.wavelengths, IMAGING_WAVELENGTHS.to_vec());
    assert_eq!(table.lim_fluxes, IMAGING_LIM_FLUXES.to_vec());
    assert_eq!(table.sat_limits, IMAGING_SAT_LIMITS.to_vec());
}

#[test]
fn string_config_labels() {
    let root = fixture_root("string_config_labels");
    lrs_labelled(&version_dir(&root, "14").join("miri_lrs_sensitivity.npz"));

    let record = DataRepository::new(&root)
        .load("14", Mode::Lrs, SourceType::Point)
        .unwrap();
    assert_eq!(
        field_names(&record),
        vec![CONFIGS, LIM_FLUXES, SAT_LIMITS, WAVELENGTHS]
    );
    assert_eq!(
        record.get(CONFIGS).and_then(Field::labels),
        Some(&["P750L slitless".to_string(), "P750L slit".to_string()][..])
    );
    let table = record.lrs().unwrap();
    assert_eq!(table.configs[0].label, "P750L slitless");
    assert_eq!(table.configs[1].sat_limits, vec![300., 600., 1200.]);
}

#[test]
fn truncated_member() {
    let root = fixture_root("truncated_member");
    let path = root.join("truncated.npz");
    truncated(&path);
    assert!(matches!(
        read_archive(&path),
        Err(LoaderError::Archive(..))
    ));
}
