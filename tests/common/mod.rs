#![allow(dead_code)]

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

/// Synthetic two-root archive living in a temporary directory.
pub struct ArchiveFixture {
    _dir: tempfile::TempDir,
    pub profile_root: Utf8PathBuf,
    pub imager_root: Utf8PathBuf,
    pub output_dir: Utf8PathBuf,
}

pub fn archive_fixture() -> ArchiveFixture {
    let dir = tempfile::tempdir().unwrap();
    let profile_root = Utf8PathBuf::from_path_buf(dir.path().join("profile")).unwrap();
    let imager_root = Utf8PathBuf::from_path_buf(dir.path().join("imager")).unwrap();
    let output_dir = Utf8PathBuf::from_path_buf(dir.path().join("colocated")).unwrap();
    fs::create_dir_all(&profile_root).unwrap();
    fs::create_dir_all(&imager_root).unwrap();
    ArchiveFixture {
        _dir: dir,
        profile_root,
        imager_root,
        output_dir,
    }
}

/// Profile basename carrying `yyyymmdd` at the dated offsets.
pub fn profile_name(yyyymmdd: &str) -> String {
    format!("ATL04_{yyyymmdd}000000_01550205_006_01.csv")
}

/// Imager basename carrying `yyyy-mm-dd` at the dated offsets.
pub fn imager_name(yyyy_mm_dd: &str) -> String {
    format!("CAL_LID_L2_05kmAPro-Standard-V4-20.{yyyy_mm_dd}T00-00-00ZN.csv")
}

/// Write a profile file from `(latitude, longitude, delta_time)` rows.
pub fn write_profile(root: &Utf8Path, name: &str, rows: &[(f64, f64, f64)]) {
    let mut content = String::from("latitude,longitude,delta_time\n");
    for (lat, lon, delta) in rows {
        content.push_str(&format!("{lat},{lon},{delta}\n"));
    }
    fs::write(root.join(name).as_std_path(), content).unwrap();
}

/// Write an imager file from `(Latitude, Longitude, Profile_Time)` rows.
pub fn write_imager(root: &Utf8Path, name: &str, rows: &[(f64, f64, &str)]) {
    let mut content = String::from("Latitude,Longitude,Profile_Time\n");
    for (lat, lon, time) in rows {
        content.push_str(&format!("{lat},{lon},{time}\n"));
    }
    fs::write(root.join(name).as_std_path(), content).unwrap();
}

/// Elapsed seconds since 2018-01-01 for `day` of 2019, `secs` past midnight.
pub fn profile_elapsed_2019(day: u32, secs: f64) -> f64 {
    (365 + day as u64 - 1) as f64 * 86_400.0 + secs
}

/// Composite timestamp for `day` of 2019 at the given clock time.
/// 2019-01-01 is 9496 days after the 1993-01-01 origin.
pub fn imager_composite_2019(day: u32, clock: &str) -> String {
    format!("{} days {clock}", 9_496 + day - 1)
}

/// Read one artifact back as `(header, rows)`.
pub fn read_artifact(dir: &Utf8Path, name: &str) -> (csv::StringRecord, Vec<csv::StringRecord>) {
    let mut reader = csv::Reader::from_path(dir.join(name).as_std_path()).unwrap();
    let headers = reader.headers().unwrap().clone();
    let rows = reader.records().map(|r| r.unwrap()).collect();
    (headers, rows)
}

/// Field of `row` under the named artifact column.
pub fn field<'a>(headers: &csv::StringRecord, row: &'a csv::StringRecord, name: &str) -> &'a str {
    let idx = headers
        .iter()
        .position(|h| h == name)
        .unwrap_or_else(|| panic!("missing artifact column: {name}"));
    row.get(idx).unwrap()
}
