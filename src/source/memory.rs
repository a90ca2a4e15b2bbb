//! In-memory source model.
//!
//! Holds a full set of raw records and serves them through the
//! [`SourceModel`] trait. Used as the test fixture backend and as a
//! reference for adapter implementations.

use std::collections::HashMap;

use super::{
    AssemblyRecord, ConstraintRecord, FieldOutputRecord, HistoryOutputRecord, InteractionRecord,
    ModelSummary, PartRecord, SourceModel, StepRecord,
};
use crate::model::{JobData, SectionCategory, SectorDefinition, UserSeries};
use crate::util::Result;

/// A source model backed by owned records.
#[derive(Clone, Debug, Default)]
pub struct MemoryModel {
    /// Top-level metadata.
    pub summary: ModelSummary,
    /// Job metadata.
    pub job: JobData,
    /// Sector definition.
    pub sector: Option<SectorDefinition>,
    /// Section categories.
    pub section_categories: Vec<SectionCategory>,
    /// User XY series.
    pub user_series: Vec<UserSeries>,
    /// Interactions.
    pub interactions: Vec<InteractionRecord>,
    /// Constraints.
    pub constraints: Vec<ConstraintRecord>,
    /// Parts.
    pub parts: Vec<PartRecord>,
    /// Root assembly.
    pub assembly: AssemblyRecord,
    /// Steps.
    pub steps: Vec<StepRecord>,
    fields: HashMap<(String, i32), Vec<FieldOutputRecord>>,
    histories: HashMap<(String, String), Vec<HistoryOutputRecord>>,
}

impl MemoryModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the field outputs of one frame.
    pub fn put_field_outputs(
        &mut self,
        step: &str,
        increment: i32,
        outputs: Vec<FieldOutputRecord>,
    ) {
        self.fields.insert((step.to_string(), increment), outputs);
    }

    /// Attach the history outputs of one region.
    pub fn put_history_outputs(
        &mut self,
        step: &str,
        region: &str,
        outputs: Vec<HistoryOutputRecord>,
    ) {
        self.histories
            .insert((step.to_string(), region.to_string()), outputs);
    }

    /// Total number of frame headers across all steps.
    pub fn frame_count(&self) -> usize {
        self.steps.iter().map(|s| s.frames.len()).sum()
    }
}

impl SourceModel for MemoryModel {
    fn summary(&self) -> Result<ModelSummary> {
        Ok(self.summary.clone())
    }

    fn job(&self) -> Result<JobData> {
        Ok(self.job.clone())
    }

    fn sector_definition(&self) -> Result<Option<SectorDefinition>> {
        Ok(self.sector.clone())
    }

    fn section_categories(&self) -> Result<Vec<SectionCategory>> {
        Ok(self.section_categories.clone())
    }

    fn user_series(&self) -> Result<Vec<UserSeries>> {
        Ok(self.user_series.clone())
    }

    fn interactions(&self) -> Result<Vec<InteractionRecord>> {
        Ok(self.interactions.clone())
    }

    fn constraints(&self) -> Result<Vec<ConstraintRecord>> {
        Ok(self.constraints.clone())
    }

    fn parts(&self) -> Result<Vec<PartRecord>> {
        Ok(self.parts.clone())
    }

    fn assembly(&self) -> Result<AssemblyRecord> {
        Ok(self.assembly.clone())
    }

    fn steps(&self) -> Result<Vec<StepRecord>> {
        Ok(self.steps.clone())
    }

    fn field_outputs(&self, step: &str, increment: i32) -> Result<Vec<FieldOutputRecord>> {
        Ok(self
            .fields
            .get(&(step.to_string(), increment))
            .cloned()
            .unwrap_or_default())
    }

    fn history_outputs(&self, step: &str, region: &str) -> Result<Vec<HistoryOutputRecord>> {
        Ok(self
            .histories
            .get(&(step.to_string(), region.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FrameRecord;

    #[test]
    fn test_empty_model() {
        let model = MemoryModel::new();
        assert!(model.steps().expect("steps").is_empty());
        assert!(model
            .field_outputs("Step-1", 0)
            .expect("field outputs")
            .is_empty());
    }

    #[test]
    fn test_field_outputs_round_trip() {
        let mut model = MemoryModel::new();
        model.steps.push(StepRecord {
            name: "Step-1".to_string(),
            frames: vec![FrameRecord { increment_number: 2, ..Default::default() }],
            ..Default::default()
        });
        model.put_field_outputs(
            "Step-1",
            2,
            vec![FieldOutputRecord { name: "U".to_string(), ..Default::default() }],
        );
        let outputs = model.field_outputs("Step-1", 2).expect("field outputs");
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].name, "U");
        assert_eq!(model.frame_count(), 1);
    }
}
