//! # Imager track reader
//!
//! Decodes one delimited imager file into normalized records. Imager files
//! carry many science columns next to the three the matcher needs
//! (`Latitude`, `Longitude`, `Profile_Time`); the reader first projects the
//! header through an exclusion set, then extracts the required columns from
//! what remains. `Profile_Time` holds the composite day-count encoding
//! normalized through
//! [`imager_epoch_from_composite`](crate::time::imager_epoch_from_composite).

use camino::Utf8Path;

use crate::constants::{FastHashSet, TrackTable};
use crate::time::imager_epoch_from_composite;
use crate::tracks::{ParseTrackError, TrackRecord};

/// Latitude column of an imager file.
pub(crate) const IMAGER_LATITUDE: &str = "Latitude";
/// Longitude column of an imager file.
pub(crate) const IMAGER_LONGITUDE: &str = "Longitude";
/// Composite timestamp column of an imager file.
pub(crate) const IMAGER_TIME: &str = "Profile_Time";

/// Science columns skipped by default when decoding imager files.
///
/// None of these contribute to colocation; dropping them up front keeps the
/// projection to the three required columns.
pub const DEFAULT_EXCLUDED_FIELDS: &[&str] = &[
    "Profile_ID",
    "Profile_UTC_Time",
    "Day_Night_Flag",
    "Minimum_Laser_Energy_532",
    "Column_Optical_Depth_Cloud_532",
    "Column_Optical_Depth_Cloud_Uncertainty_532",
    "Column_Optical_Depth_Tropospheric_Aerosols_532",
    "Column_Optical_Depth_Tropospheric_Aerosols_Uncertainty_532",
    "Column_Optical_Depth_Stratospheric_Aerosols_532",
    "Column_Optical_Depth_Stratospheric_Aerosols_Uncertainty_532",
    "Column_Optical_Depth_Tropospheric_Aerosols_1064",
    "Column_Optical_Depth_Tropospheric_Aerosols_Uncertainty_1064",
    "Column_Optical_Depth_Stratospheric_Aerosols_1064",
    "Column_Optical_Depth_Stratospheric_Aerosols_Uncertainty_1064",
    "Column_Feature_Fraction",
    "Column_Integrated_Attenuated_Backscatter_532",
    "Column_IAB_Cumulative_Probability",
    "Tropopause_Height",
    "Tropopause_Temperature",
    "Temperature",
    "Pressure",
    "Molecular_Number_Density",
    "Ozone_Number_Density",
    "Relative_Humidity",
    "IGBP_Surface_Type",
    "Surface_Elevation_Statistics",
    "Surface_Winds",
    "Samples_Averaged",
    "Aerosol_Layer_Fraction",
    "Cloud_Layer_Fraction",
    "Atmospheric_Volume_Description",
    "Extinction_QC_Flag_532",
    "Extinction_QC_Flag_1064",
    "CAD_Score",
    "Total_Backscatter_Coefficient_532",
    "Total_Backscatter_Coefficient_Uncertainty_532",
    "Perpendicular_Backscatter_Coefficient_532",
    "Perpendicular_Backscatter_Coefficient_Uncertainty_532",
    "Particulate_Depolarization_Ratio_Profile_532",
    "Particulate_Depolarization_Ratio_Uncertainty_532",
    "Extinction_Coefficient_532",
    "Extinction_Coefficient_Uncertainty_532",
    "Aerosol_Multiple_Scattering_Profile_532",
    "Backscatter_Coefficient_1064",
    "Backscatter_Coefficient_Uncertainty_1064",
    "Extinction_Coefficient_1064",
    "Extinction_Coefficient_Uncertainty_1064",
    "Aerosol_Multiple_Scattering_Profile_1064",
    "Surface_Top_Altitude_532",
    "Surface_Base_Altitude_532",
    "Surface_Integrated_Attenuated_Backscatter_532",
    "Surface_532_Integrated_Depolarization_Ratio",
    "Surface_532_Integrated_Attenuated_Color_Ratio",
    "Surface_Detection_Flags_532",
    "Surface_Detection_Confidence_532",
    "Surface_Overlying_Integrated_Attenuated_Backscatter_532",
    "Surface_Scaled_RMS_Background_532",
    "Surface_Peak_Signal_532",
    "Surface_Detections_333m_532",
    "Surface_Detections_1km_532",
    "Surface_Top_Altitude_1064",
    "Surface_Base_Altitude_1064",
    "Surface_Integrated_Attenuated_Backscatter_1064",
    "Surface_1064_Integrated_Depolarization_Ratio",
    "Surface_1064_Integrated_Attenuated_Color_Ratio",
    "Surface_Detection_Flags_1064",
    "Surface_Detection_Confidence_1064",
    "Surface_Overlying_Integrated_Attenuated_Backscatter_1064",
    "Surface_Scaled_RMS_Background_1064",
    "Surface_Peak_Signal_1064",
    "Surface_Detections_333m_1064",
    "Surface_Detections_1km_1064",
];

/// The default exclusion set as an owned fast hash set.
pub fn default_excluded_fields() -> FastHashSet<String> {
    DEFAULT_EXCLUDED_FIELDS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Decode an imager file and append its records to `out`.
///
/// Arguments
/// ---------
/// * `path`: the imager file
/// * `excluded`: column names dropped from the header projection before the
///   required columns are looked up. Listing a required column here makes the
///   decode fail with [`ParseTrackError::MissingColumn`].
/// * `source`: compact id of the file, stamped on every record
/// * `out`: table receiving the decoded records, in file order
pub(crate) fn extract_imager(
    path: &Utf8Path,
    excluded: &FastHashSet<String>,
    source: u16,
    out: &mut TrackTable,
) -> Result<(), ParseTrackError> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|e| ParseTrackError::Read(e.to_string()))?;
    let headers = reader
        .headers()
        .map_err(|e| ParseTrackError::Read(e.to_string()))?
        .clone();

    let mut lat_idx = None;
    let mut lon_idx = None;
    let mut time_idx = None;
    for (idx, name) in headers.iter().enumerate() {
        if excluded.contains(name) {
            continue;
        }
        match name {
            IMAGER_LATITUDE => lat_idx = Some(idx),
            IMAGER_LONGITUDE => lon_idx = Some(idx),
            IMAGER_TIME => time_idx = Some(idx),
            _ => {}
        }
    }
    let lat_idx = lat_idx.ok_or_else(|| missing(IMAGER_LATITUDE))?;
    let lon_idx = lon_idx.ok_or_else(|| missing(IMAGER_LONGITUDE))?;
    let time_idx = time_idx.ok_or_else(|| missing(IMAGER_TIME))?;

    for (idx, record) in reader.records().enumerate() {
        let row = idx + 1;
        let record = record.map_err(|e| record_error(row, &e))?;

        let latitude = parse_cell(&record, lat_idx, IMAGER_LATITUDE, row)?;
        let longitude = parse_cell(&record, lon_idx, IMAGER_LONGITUDE, row)?;
        let text = record.get(time_idx).unwrap_or("");
        let epoch = imager_epoch_from_composite(text).map_err(|_| {
            ParseTrackError::MalformedTimestamp {
                text: text.to_string(),
                row,
            }
        })?;

        out.push(TrackRecord::new(longitude, latitude, epoch, source));
    }
    Ok(())
}

fn missing(column: &str) -> ParseTrackError {
    ParseTrackError::MissingColumn(column.to_string())
}

fn parse_cell(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    row: usize,
) -> Result<f64, ParseTrackError> {
    record
        .get(idx)
        .unwrap_or("")
        .trim()
        .parse()
        .map_err(|_| ParseTrackError::InvalidNumber {
            column: column.to_string(),
            row,
        })
}

fn record_error(row: usize, err: &csv::Error) -> ParseTrackError {
    match err.kind() {
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => ParseTrackError::RaggedRow {
            row,
            expected: *expected_len as usize,
            found: *len as usize,
        },
        _ => ParseTrackError::Read(err.to_string()),
    }
}
