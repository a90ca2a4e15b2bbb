//! Steps and frames.

use super::field::FieldOutput;
use super::history::HistoryRegion;

/// Domain of a step or frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Domain {
    /// Time domain.
    #[default]
    Time,
    /// Frequency domain.
    Frequency,
    /// Modal domain.
    Modal,
    /// Arc-length (Riks) domain.
    ArcLength,
}

impl Domain {
    /// Canonical rendering used in the output container.
    pub fn label(self) -> &'static str {
        match self {
            Domain::Time => "Time",
            Domain::Frequency => "Frequency",
            Domain::Modal => "Modal",
            Domain::ArcLength => "Arc length",
        }
    }
}

/// One time/frequency/mode sample within a step.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    /// Increment number; the frame's addressable key.
    pub increment_number: i32,
    /// Frame description.
    pub description: String,
    /// Frame domain.
    pub domain: Domain,
    /// Time, frequency or mode value of the frame.
    pub frame_value: f32,
    /// Frequency of the frame.
    pub frequency: f32,
    /// Mode number.
    pub mode: i32,
    /// Cyclic mode number.
    pub cyclic_mode_number: i32,
    /// Load case name.
    pub load_case: String,
    /// Field outputs of the frame; empty when `skip` is set.
    pub field_outputs: Vec<FieldOutput>,
    /// Set by the selection filter before field data is fetched; a
    /// skipped frame is entirely absent from the output.
    pub skip: bool,
}

/// One analysis step.
#[derive(Clone, Debug, Default)]
pub struct Step {
    /// Step name; the step's addressable key.
    pub name: String,
    /// Step description.
    pub description: String,
    /// Step domain.
    pub domain: Domain,
    /// Name of the preceding step.
    pub previous_step_name: String,
    /// Analysis procedure.
    pub procedure: String,
    /// Geometric nonlinearity flag.
    pub nlgeom: bool,
    /// Step number.
    pub number: i32,
    /// Step time period.
    pub time_period: f64,
    /// Total accumulated time at the start of the step.
    pub total_time: f64,
    /// Model mass.
    pub mass: f64,
    /// Acoustic mass.
    pub acoustic_mass: f64,
    /// Center of mass.
    pub mass_center: Vec<f64>,
    /// Acoustic center of mass.
    pub acoustic_mass_center: Vec<f64>,
    /// Inertia about the center of mass (6 components).
    pub inertia_about_center: Vec<f64>,
    /// Inertia about the origin (6 components).
    pub inertia_about_origin: Vec<f64>,
    /// Load case names.
    pub load_cases: Vec<String>,
    /// Frames of the step.
    pub frames: Vec<Frame>,
    /// History regions of the step.
    pub history_regions: Vec<HistoryRegion>,
}
