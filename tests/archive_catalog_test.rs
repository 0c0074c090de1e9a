use overpass::catalog::FileCatalog;
use overpass::overpass::Overpass;
use overpass::tracks::InstrumentKind;

mod common;
use common::{archive_fixture, imager_name, profile_name, write_imager, write_profile};

#[test]
fn test_enumerate_tags_and_keys() {
    let fx = archive_fixture();
    write_profile(&fx.profile_root, &profile_name("20190101"), &[]);
    write_imager(&fx.imager_root, &imager_name("2019-01-02"), &[]);

    // Nested subdirectory, found by the recursive walk.
    let nested = fx.profile_root.join("granules_042");
    std::fs::create_dir_all(&nested).unwrap();
    write_profile(&nested, &profile_name("20190105"), &[]);

    let mut state = Overpass::new();
    let catalog =
        FileCatalog::enumerate(&mut state, &fx.profile_root, &fx.imager_root, &[2019]).unwrap();

    assert_eq!(catalog.len(), 3);
    assert!(!catalog.is_empty());

    let day1 = catalog.entries_for(2019, 1);
    assert_eq!(day1.len(), 1);
    assert_eq!(day1[0].kind, InstrumentKind::Profile);
    assert_eq!(day1[0].year, 2019);
    assert_eq!(day1[0].day_of_year, 1);

    let day2 = catalog.entries_for(2019, 2);
    assert_eq!(day2.len(), 1);
    assert_eq!(day2[0].kind, InstrumentKind::Imager);

    assert_eq!(catalog.entries_for(2019, 5).len(), 1);
    assert!(catalog.entries_for(2019, 3).is_empty());

    // Every recognized file got its own interned source id.
    assert_eq!(state.sources_len(), 3);
    let entry = &catalog.entries_for(2019, 1)[0];
    assert_eq!(state.source_from_uint16(entry.source), entry.path);
}

#[test]
fn test_enumerate_skips_and_counts() {
    let fx = archive_fixture();
    write_profile(&fx.profile_root, &profile_name("20190101"), &[]);
    // Not an instrument file.
    std::fs::write(fx.profile_root.join("README.txt").as_std_path(), "notes").unwrap();
    // Convention matched, date digits corrupt.
    write_profile(&fx.profile_root, "ATL04_2019xx07133519_x.csv", &[]);
    // Dated outside the requested years.
    write_imager(&fx.imager_root, &imager_name("2021-06-15"), &[]);
    // An imager file under the profile root is not recognized there.
    write_imager(&fx.profile_root, &imager_name("2019-01-02"), &[]);

    let mut state = Overpass::new();
    let catalog =
        FileCatalog::enumerate(&mut state, &fx.profile_root, &fx.imager_root, &[2019]).unwrap();

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.unrecognized(), 2);
    assert_eq!(catalog.malformed(), 1);
    assert_eq!(catalog.outside_years(), 1);
    assert_eq!(state.sources_len(), 1);
}

#[test]
fn test_same_day_entries_sorted_by_path() {
    let fx = archive_fixture();
    // Two granules of the same day, written in reverse name order.
    write_profile(
        &fx.profile_root,
        "ATL04_20190101000000_01550205_006_01.csv",
        &[],
    );
    write_profile(
        &fx.profile_root,
        "ATL04_20190101000000_00990205_006_01.csv",
        &[],
    );

    let mut state = Overpass::new();
    let catalog =
        FileCatalog::enumerate(&mut state, &fx.profile_root, &fx.imager_root, &[2019]).unwrap();

    let day1 = catalog.entries_for(2019, 1);
    assert_eq!(day1.len(), 2);
    assert!(day1[0].path < day1[1].path);
    assert!(day1[0].path.as_str().contains("00990205"));
}

#[test]
fn test_day_key_unifies_directory_spellings() {
    // The same calendar day can sit under a zero-padded and a bare
    // directory name; both land under one numeric day key.
    let fx = archive_fixture();
    let padded = fx.profile_root.join("2019").join("01");
    let bare = fx.profile_root.join("2019").join("1");
    std::fs::create_dir_all(&padded).unwrap();
    std::fs::create_dir_all(&bare).unwrap();
    write_profile(
        &padded,
        "ATL04_20190101000000_01550205_006_01.csv",
        &[],
    );
    write_profile(
        &bare,
        "ATL04_20190101000000_02660205_006_01.csv",
        &[],
    );

    let mut state = Overpass::new();
    let catalog =
        FileCatalog::enumerate(&mut state, &fx.profile_root, &fx.imager_root, &[2019]).unwrap();

    assert_eq!(catalog.entries_for(2019, 1).len(), 2);
}

#[test]
fn test_missing_root_is_an_error() {
    let fx = archive_fixture();
    let missing = fx.profile_root.join("does_not_exist");

    let mut state = Overpass::new();
    let result = FileCatalog::enumerate(&mut state, &missing, &fx.imager_root, &[2019]);
    assert!(result.is_err());
}
