//! Top-level run metadata: job data, sector definition, user XY series.

/// Metadata about the analysis job that produced the database.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobData {
    /// Analysis code rendering (e.g. `Abaqus Standard`).
    pub analysis_code: String,
    /// Database creation time.
    pub creation_time: String,
    /// Machine the job ran on.
    pub machine_name: String,
    /// Last modification time.
    pub modification_time: String,
    /// Job name.
    pub name: String,
    /// Numeric precision of the run (`Single Precision` / `Double Precision`).
    pub precision: String,
    /// Licensed product add-ons used by the run.
    pub product_add_ons: Vec<String>,
    /// Solver version string.
    pub version: String,
}

/// Cyclic-symmetry sector definition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectorDefinition {
    /// Number of sectors.
    pub num_sectors: i32,
    /// Symmetry-axis start point rendering.
    pub start_point: String,
    /// Symmetry-axis end point rendering.
    pub end_point: String,
}

/// A user-authored XY data series (opaque 2-column numeric data).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserSeries {
    /// Series name.
    pub name: String,
    /// Where the data came from.
    pub source_description: String,
    /// What the data contains.
    pub content_description: String,
    /// Where the data was sampled.
    pub position_description: String,
    /// X axis label.
    pub x_axis_label: String,
    /// Y axis label.
    pub y_axis_label: String,
    /// Legend label.
    pub legend_label: String,
    /// Free-form description.
    pub description: String,
    /// Data rows, usually `[x, y]` pairs.
    pub data: Vec<Vec<f32>>,
}
