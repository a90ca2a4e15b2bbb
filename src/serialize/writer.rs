//! The hierarchical serializer.

use std::collections::HashMap;
use std::mem;

use tracing::{debug, info};

use crate::intern::{ElementKey, NodeKey};
use crate::model::{
    AnalyticSurface, Assembly, BulkValues, Constraint, ContactExplicitParams,
    ContactStandardParams, CouplingParams, DatumCsys, DisplayBodyParams, ElementHandle,
    FieldBulkData, FieldOutput, FieldValue, Frame, HistoryOutput, HistoryPoint, HistoryRegion,
    Instance, Interaction, Model, MpcParams, NodeHandle, Part, SectionCategory, Set,
    ShellSolidCouplingParams, Step, TangentialBehavior, TieParams,
};
use crate::store::{Array, Scalar, Store};
use crate::util::{path, Result, Shape};

use super::SparsePolicy;

/// Top-level group of the output container.
pub const ROOT_GROUP: &str = "/odb";

/// Counters of what one serializer wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteStats {
    /// Distinct node payloads written.
    pub nodes_written: usize,
    /// Distinct element payloads written.
    pub elements_written: usize,
    /// Hard links created in place of duplicate payloads.
    pub links_created: usize,
    /// Frames written (skipped frames not counted).
    pub frames_written: usize,
    /// Frames dropped by the selection filter.
    pub frames_skipped: usize,
}

/// Writes the domain graph into a store, deduplicating mesh payloads.
///
/// The key-to-path tables live for the whole run, so the first reference
/// to a physical entity always owns the canonical path and every later
/// reference anywhere in the tree resolves to it.
pub struct Serializer<'a, S: Store + ?Sized> {
    store: &'a mut S,
    policy: SparsePolicy,
    node_paths: HashMap<NodeKey, String>,
    element_paths: HashMap<ElementKey, String>,
    stats: WriteStats,
}

impl<'a, S: Store + ?Sized> Serializer<'a, S> {
    /// Create a serializer writing into `store`.
    pub fn new(store: &'a mut S, policy: SparsePolicy) -> Self {
        Self {
            store,
            policy,
            node_paths: HashMap::new(),
            element_paths: HashMap::new(),
            stats: WriteStats::default(),
        }
    }

    /// Counters of what has been written so far.
    pub fn stats(&self) -> WriteStats {
        self.stats
    }

    /// Write a complete model, steps included.
    ///
    /// Takes the model mutably: large result buffers are released as soon
    /// as they are flushed to the store.
    pub fn write_model(&mut self, model: &mut Model) -> Result<()> {
        self.write_preamble(model)?;
        self.begin_steps()?;
        for step in &mut model.steps {
            self.write_step(step)?;
        }
        Ok(())
    }

    /// Write everything except the steps, in the fixed traversal order:
    /// metadata, section categories, user data, interactions,
    /// constraints, parts, root assembly.
    pub fn write_preamble(&mut self, model: &Model) -> Result<()> {
        info!("writing top level data");
        self.store.create_group(ROOT_GROUP)?;
        self.attr(ROOT_GROUP, "name", Scalar::text(&model.name))?;
        self.attr(ROOT_GROUP, "analysisTitle", Scalar::text(&model.analysis_title))?;
        self.attr(ROOT_GROUP, "description", Scalar::text(&model.description))?;
        self.attr(ROOT_GROUP, "path", Scalar::text(&model.path))?;
        self.attr(
            ROOT_GROUP,
            "isReadOnly",
            Scalar::text(if model.is_read_only { "true" } else { "false" }),
        )?;

        self.write_job_data(model)?;
        self.write_sector(model)?;
        self.write_section_categories(model)?;
        self.write_user_series(model)?;
        self.write_interactions(&model.interactions)?;
        self.write_constraints(&model.constraints)?;
        self.write_parts(&model.parts)?;
        self.write_assembly(&model.assembly)?;
        Ok(())
    }

    /// Create the steps group. Called once, before the first step.
    pub fn begin_steps(&mut self) -> Result<()> {
        self.store.create_group(&path::join(ROOT_GROUP, "steps"))
    }

    /// Write one step with all of its frames and history regions.
    pub fn write_step(&mut self, step: &mut Step) -> Result<()> {
        let step_path = self.write_step_header(step)?;
        for frame in &mut step.frames {
            self.write_frame(&step_path, frame)?;
        }
        for region in &mut step.history_regions {
            self.write_history_region(&step_path, region)?;
        }
        Ok(())
    }

    /// Write a step's scalar summary and create its frames and history
    /// containers, returning the step path.
    pub fn write_step_header(&mut self, step: &Step) -> Result<String> {
        info!(step = %step.name, "writing step");
        let step_path = path::join(&path::join(ROOT_GROUP, "steps"), &step.name);
        self.store.create_group(&step_path)?;
        self.attr(&step_path, "description", Scalar::text(&step.description))?;
        self.attr(&step_path, "domain", Scalar::text(step.domain.label()))?;
        self.attr(&step_path, "previousStepName", Scalar::text(&step.previous_step_name))?;
        self.attr(&step_path, "procedure", Scalar::text(&step.procedure))?;
        self.attr(
            &step_path,
            "nlgeom",
            Scalar::text(if step.nlgeom { "yes" } else { "no" }),
        )?;
        self.attr(&step_path, "number", Scalar::Int(step.number))?;
        self.attr(&step_path, "timePeriod", Scalar::Double(step.time_period))?;
        self.attr(&step_path, "totalTime", Scalar::Double(step.total_time))?;
        self.attr(&step_path, "mass", Scalar::Double(step.mass))?;
        self.attr(&step_path, "acousticMass", Scalar::Double(step.acoustic_mass))?;
        self.dataset(&step_path, "loadCases", Array::text(step.load_cases.clone()))?;
        self.dataset(&step_path, "massCenter", Array::doubles(step.mass_center.clone()))?;
        self.dataset(
            &step_path,
            "acousticMassCenter",
            Array::doubles(step.acoustic_mass_center.clone()),
        )?;
        self.dataset(
            &step_path,
            "inertiaAboutCenter",
            Array::doubles(step.inertia_about_center.clone()),
        )?;
        self.dataset(
            &step_path,
            "inertiaAboutOrigin",
            Array::doubles(step.inertia_about_origin.clone()),
        )?;
        self.store.create_group(&path::join(&step_path, "frames"))?;
        self.store
            .create_group(&path::join(&step_path, "historyRegions"))?;
        Ok(step_path)
    }

    /// Write one frame. Skipped frames leave no trace in the output.
    pub fn write_frame(&mut self, step_path: &str, frame: &mut Frame) -> Result<()> {
        if frame.skip {
            self.stats.frames_skipped += 1;
            return Ok(());
        }
        debug!(increment = frame.increment_number, "writing frame");
        let frames_path = path::join(step_path, "frames");
        let frame_path = path::join(&frames_path, &frame.increment_number.to_string());
        self.store.create_group(&frame_path)?;
        self.attr(&frame_path, "description", Scalar::text(&frame.description))?;
        self.attr(&frame_path, "domain", Scalar::text(frame.domain.label()))?;
        self.attr(&frame_path, "loadCase", Scalar::text(&frame.load_case))?;
        self.attr(&frame_path, "frameValue", Scalar::Float(frame.frame_value))?;
        self.attr(&frame_path, "frequency", Scalar::Float(frame.frequency))?;
        self.attr(&frame_path, "mode", Scalar::Int(frame.mode))?;
        self.attr(&frame_path, "cyclicModeNumber", Scalar::Int(frame.cyclic_mode_number))?;

        let outputs_path = path::join(&frame_path, "fieldOutputs");
        self.store.create_group(&outputs_path)?;
        for output in &mut frame.field_outputs {
            self.write_field_output(&outputs_path, output)?;
        }
        self.stats.frames_written += 1;
        Ok(())
    }

    fn write_field_output(&mut self, parent: &str, output: &mut FieldOutput) -> Result<()> {
        let output_path = path::join(parent, &output.name);
        self.store.create_group(&output_path)?;
        self.attr(&output_path, "description", Scalar::text(&output.description))?;
        self.attr(&output_path, "dim", Scalar::Int(output.dim))?;
        self.attr(&output_path, "dim2", Scalar::Int(output.dim2))?;
        self.attr(
            &output_path,
            "isComplex",
            Scalar::text(if output.is_complex { "true" } else { "false" }),
        )?;
        self.dataset(
            &output_path,
            "componentLabels",
            Array::text(output.component_labels.clone()),
        )?;
        self.dataset(
            &output_path,
            "validInvariants",
            Array::text(
                output
                    .valid_invariants
                    .iter()
                    .map(|invariant| invariant.label().to_string())
                    .collect(),
            ),
        )?;

        if !output.locations.is_empty() {
            let locations_path = path::join(&output_path, "locations");
            self.store.create_group(&locations_path)?;
            for (index, location) in output.locations.iter().enumerate() {
                let location_path = path::join_index(&locations_path, index);
                self.store.create_group(&location_path)?;
                self.attr(&location_path, "position", Scalar::text(location.position.label()))?;
                if !location.section_points.is_empty() {
                    let points_path = path::join(&location_path, "sectionPoint");
                    self.store.create_group(&points_path)?;
                    for point in &location.section_points {
                        let point_path = path::join(&points_path, &point.number.to_string());
                        self.store.create_group(&point_path)?;
                        self.attr(&point_path, "description", Scalar::text(&point.description))?;
                    }
                }
            }
        }

        let values_path = path::join(&output_path, "values");
        self.store.create_group(&values_path)?;
        if !output.node_values.is_empty() {
            let nodes_path = path::join(&values_path, "nodes");
            self.store.create_group(&nodes_path)?;
            for (label, value) in &output.node_values {
                let value_path = path::join(&nodes_path, &label.to_string());
                self.write_field_value(&value_path, value)?;
            }
        }
        if !output.element_values.is_empty() {
            let elements_path = path::join(&values_path, "elements");
            self.store.create_group(&elements_path)?;
            for (label, value) in &output.element_values {
                let value_path = path::join(&elements_path, &label.to_string());
                self.write_field_value(&value_path, value)?;
            }
        }

        let bulk_path = path::join(&output_path, "bulkData");
        self.store.create_group(&bulk_path)?;
        for (index, block) in output.bulk.iter_mut().enumerate() {
            let block_path = path::join_index(&bulk_path, index);
            write_bulk(self, &block_path, block)?;
        }
        Ok(())
    }

    fn write_field_value(&mut self, value_path: &str, value: &FieldValue) -> Result<()> {
        self.store.create_group(value_path)?;
        if let Some(label) = value.element_label {
            self.attr(value_path, "elementLabel", Scalar::Int(label))?;
        }
        if let Some(label) = value.node_label {
            self.attr(value_path, "nodeLabel", Scalar::Int(label))?;
        }
        if let Some(point) = value.integration_point {
            self.attr(value_path, "integrationPoint", Scalar::Int(point))?;
        }
        if let Some(kind) = value.kind {
            self.attr(value_path, "type", Scalar::text(kind.label()))?;
        }
        for (invariant, amount) in &value.invariants {
            self.attr(value_path, invariant.key(), Scalar::Float(*amount))?;
        }
        if let Some(point) = &value.section_point {
            let point_path = path::join(value_path, "sectionPoint");
            self.store.create_group(&point_path)?;
            self.attr(&point_path, "number", Scalar::Int(point.number))?;
            self.attr(&point_path, "description", Scalar::text(&point.description))?;
        }
        Ok(())
    }

    /// Write one history region and release its series buffers.
    pub fn write_history_region(
        &mut self,
        step_path: &str,
        region: &mut HistoryRegion,
    ) -> Result<()> {
        debug!(region = %region.name, "writing history region");
        let regions_path = path::join(step_path, "historyRegions");
        let region_path = path::join(&regions_path, &region.name);
        self.store.create_group(&region_path)?;
        self.attr(&region_path, "description", Scalar::text(&region.description))?;
        self.attr(&region_path, "position", Scalar::text(&region.position))?;
        self.attr(&region_path, "loadCase", Scalar::text(&region.load_case))?;
        self.write_history_point(&region_path, &region.point)?;

        let outputs_path = path::join(&region_path, "historyOutputs");
        self.store.create_group(&outputs_path)?;
        for output in &region.outputs {
            self.write_history_output(&outputs_path, output)?;
        }
        // Series buffers are flushed; release them before the next region.
        drop(mem::take(&mut region.outputs));
        Ok(())
    }

    fn write_history_output(&mut self, parent: &str, output: &HistoryOutput) -> Result<()> {
        let output_path = path::join(parent, &output.name);
        self.store.create_group(&output_path)?;
        self.attr(&output_path, "description", Scalar::text(&output.description))?;
        self.attr(&output_path, "type", Scalar::text(&output.kind))?;
        if let Some(data) = ragged_f32(&output.data) {
            self.dataset(&output_path, "data", data)?;
        }
        if let Some(conjugate) = ragged_f32(&output.conjugate) {
            self.dataset(&output_path, "conjugateData", conjugate)?;
        }
        Ok(())
    }

    fn write_history_point(&mut self, region_path: &str, point: &HistoryPoint) -> Result<()> {
        let point_path = path::join(region_path, "point");
        self.store.create_group(&point_path)?;
        if let Some(face) = point.face {
            self.attr(&point_path, "face", Scalar::text(face.label()))?;
        }
        self.attr(&point_path, "position", Scalar::text(&point.position))?;
        self.attr(&point_path, "ipNumber", Scalar::Int(point.ip_number))?;
        self.attr(&point_path, "assembly", Scalar::text(&point.assembly_name))?;
        self.attr(&point_path, "instance", Scalar::text(&point.instance_name))?;
        if let Some(node) = &point.node {
            let node_path = path::join(&point_path, "node");
            self.store.create_group(&node_path)?;
            self.write_node(&node_path, node)?;
        }
        if let Some(element) = &point.element {
            let element_path = path::join(&point_path, "element");
            self.store.create_group(&element_path)?;
            self.write_element(&element_path, element)?;
        }
        if let Some(region) = &point.region {
            self.write_set(&point_path, region)?;
        }
        if let Some(section_point) = &point.section_point {
            let section_path = path::join(&point_path, "sectionPoint");
            self.store.create_group(&section_path)?;
            self.attr(&section_path, "number", Scalar::Int(section_point.number))?;
            self.attr(&section_path, "description", Scalar::text(&section_point.description))?;
        }
        Ok(())
    }

    fn write_job_data(&mut self, model: &Model) -> Result<()> {
        let job_path = path::join(ROOT_GROUP, "jobData");
        self.store.create_group(&job_path)?;
        self.attr(&job_path, "analysisCode", Scalar::text(&model.job.analysis_code))?;
        self.attr(&job_path, "creationTime", Scalar::text(&model.job.creation_time))?;
        self.attr(&job_path, "machineName", Scalar::text(&model.job.machine_name))?;
        self.attr(&job_path, "modificationTime", Scalar::text(&model.job.modification_time))?;
        self.attr(&job_path, "name", Scalar::text(&model.job.name))?;
        self.attr(&job_path, "precision", Scalar::text(&model.job.precision))?;
        self.attr(&job_path, "version", Scalar::text(&model.job.version))?;
        self.dataset(
            &job_path,
            "productAddOns",
            Array::text(model.job.product_add_ons.clone()),
        )?;
        Ok(())
    }

    fn write_sector(&mut self, model: &Model) -> Result<()> {
        let Some(sector) = &model.sector else {
            return Ok(());
        };
        let sector_path = path::join(ROOT_GROUP, "sectorDefinition");
        self.store.create_group(&sector_path)?;
        self.attr(&sector_path, "numSectors", Scalar::Int(sector.num_sectors))?;
        if !sector.start_point.is_empty() || !sector.end_point.is_empty() {
            let axis_path = path::join(&sector_path, "symmetryAxis");
            self.store.create_group(&axis_path)?;
            self.attr(&axis_path, "startPoint", Scalar::text(&sector.start_point))?;
            self.attr(&axis_path, "endPoint", Scalar::text(&sector.end_point))?;
        }
        Ok(())
    }

    fn write_section_categories(&mut self, model: &Model) -> Result<()> {
        let categories_path = path::join(ROOT_GROUP, "sectionCategories");
        self.store.create_group(&categories_path)?;
        for category in &model.section_categories {
            let category_path = path::join(&categories_path, &category.name);
            self.write_section_category(&category_path, category)?;
        }
        Ok(())
    }

    fn write_section_category(
        &mut self,
        category_path: &str,
        category: &SectionCategory,
    ) -> Result<()> {
        self.store.create_group(category_path)?;
        self.attr(category_path, "name", Scalar::text(&category.name))?;
        self.attr(category_path, "description", Scalar::text(&category.description))?;
        if !category.section_points.is_empty() {
            let points_path = path::join(category_path, "sectionPoints");
            self.store.create_group(&points_path)?;
            for point in &category.section_points {
                let point_path = path::join(&points_path, &point.number.to_string());
                self.store.create_group(&point_path)?;
                self.attr(&point_path, "description", Scalar::text(&point.description))?;
            }
        }
        Ok(())
    }

    fn write_user_series(&mut self, model: &Model) -> Result<()> {
        let user_path = path::join(ROOT_GROUP, "userData");
        self.store.create_group(&user_path)?;
        for series in &model.user_series {
            let series_path = path::join(&user_path, &series.name);
            self.store.create_group(&series_path)?;
            self.attr(&series_path, "sourceDescription", Scalar::text(&series.source_description))?;
            self.attr(
                &series_path,
                "contentDescription",
                Scalar::text(&series.content_description),
            )?;
            self.attr(
                &series_path,
                "positionDescription",
                Scalar::text(&series.position_description),
            )?;
            self.attr(&series_path, "xAxisLabel", Scalar::text(&series.x_axis_label))?;
            self.attr(&series_path, "yAxisLabel", Scalar::text(&series.y_axis_label))?;
            self.attr(&series_path, "legendLabel", Scalar::text(&series.legend_label))?;
            self.attr(&series_path, "description", Scalar::text(&series.description))?;
            if let Some(data) = ragged_f32(&series.data) {
                self.dataset(&series_path, "data", data)?;
            }
        }
        Ok(())
    }

    fn write_interactions(&mut self, interactions: &[Interaction]) -> Result<()> {
        let interactions_path = path::join(ROOT_GROUP, "interactions");
        self.store.create_group(&interactions_path)?;
        let mut standard = 0usize;
        let mut explicit = 0usize;
        for interaction in interactions {
            match interaction {
                Interaction::Standard { params, main, secondary, adjust } => {
                    let kind_path = path::join(&interactions_path, "standard");
                    if standard == 0 {
                        self.store.create_group(&kind_path)?;
                    }
                    let item_path = path::join_index(&kind_path, standard);
                    standard += 1;
                    self.store.create_group(&item_path)?;
                    self.write_contact_standard(&item_path, params)?;
                    self.write_opt_set(&item_path, main)?;
                    self.write_opt_set(&item_path, secondary)?;
                    self.write_opt_set(&item_path, adjust)?;
                }
                Interaction::Explicit { params, main, secondary } => {
                    let kind_path = path::join(&interactions_path, "explicit");
                    if explicit == 0 {
                        self.store.create_group(&kind_path)?;
                    }
                    let item_path = path::join_index(&kind_path, explicit);
                    explicit += 1;
                    self.store.create_group(&item_path)?;
                    self.write_contact_explicit(&item_path, params)?;
                    self.write_opt_set(&item_path, main)?;
                    self.write_opt_set(&item_path, secondary)?;
                }
            }
        }
        Ok(())
    }

    fn write_contact_standard(&mut self, item_path: &str, params: &ContactStandardParams) -> Result<()> {
        self.attr(item_path, "sliding", Scalar::text(&params.sliding))?;
        self.attr(item_path, "smooth", Scalar::Double(params.smooth))?;
        self.attr(item_path, "hcrit", Scalar::Double(params.hcrit))?;
        self.attr(item_path, "limitSlideDistance", Scalar::text(&params.limit_slide_distance))?;
        self.attr(item_path, "slideDistance", Scalar::Double(params.slide_distance))?;
        self.attr(item_path, "extensionZone", Scalar::Double(params.extension_zone))?;
        self.attr(item_path, "adjustMethod", Scalar::text(&params.adjust_method))?;
        self.attr(item_path, "adjustTolerance", Scalar::Double(params.adjust_tolerance))?;
        self.attr(item_path, "enforcement", Scalar::text(&params.enforcement))?;
        self.attr(item_path, "thickness", Scalar::text(&params.thickness))?;
        self.attr(item_path, "tied", Scalar::text(&params.tied))?;
        self.attr(item_path, "contactTracking", Scalar::text(&params.contact_tracking))?;
        self.attr(item_path, "createStepName", Scalar::text(&params.create_step_name))?;
        self.write_tangential_behavior(item_path, &params.property)?;
        Ok(())
    }

    fn write_contact_explicit(&mut self, item_path: &str, params: &ContactExplicitParams) -> Result<()> {
        self.attr(item_path, "sliding", Scalar::text(&params.sliding))?;
        self.attr(item_path, "mainNoThick", Scalar::text(&params.main_no_thick))?;
        self.attr(item_path, "secondaryNoThick", Scalar::text(&params.secondary_no_thick))?;
        self.attr(item_path, "mechanicalConstraint", Scalar::text(&params.mechanical_constraint))?;
        self.attr(item_path, "weightingFactorType", Scalar::text(&params.weighting_factor_type))?;
        self.attr(item_path, "weightingFactor", Scalar::Double(params.weighting_factor))?;
        self.attr(item_path, "createStepName", Scalar::text(&params.create_step_name))?;
        self.attr(item_path, "useReverseDatumAxis", Scalar::text(&params.use_reverse_datum_axis))?;
        self.attr(item_path, "contactControls", Scalar::text(&params.contact_controls))?;
        self.write_tangential_behavior(item_path, &params.property)?;
        Ok(())
    }

    fn write_tangential_behavior(
        &mut self,
        parent: &str,
        behavior: &TangentialBehavior,
    ) -> Result<()> {
        let behavior_path = path::join(parent, "tangentialBehavior");
        self.store.create_group(&behavior_path)?;
        self.attr(&behavior_path, "formulation", Scalar::text(&behavior.formulation))?;
        self.attr(&behavior_path, "directionality", Scalar::text(&behavior.directionality))?;
        self.attr(
            &behavior_path,
            "slipRateDependency",
            Scalar::text(&behavior.slip_rate_dependency),
        )?;
        self.attr(
            &behavior_path,
            "pressureDependency",
            Scalar::text(&behavior.pressure_dependency),
        )?;
        self.attr(
            &behavior_path,
            "temperatureDependency",
            Scalar::text(&behavior.temperature_dependency),
        )?;
        self.attr(&behavior_path, "dependencies", Scalar::Int(behavior.dependencies))?;
        self.attr(
            &behavior_path,
            "exponentialDecayDefinition",
            Scalar::text(&behavior.exponential_decay_definition),
        )?;
        self.attr(&behavior_path, "shearStressLimit", Scalar::Double(behavior.shear_stress_limit))?;
        self.attr(
            &behavior_path,
            "maximumElasticSlip",
            Scalar::text(&behavior.maximum_elastic_slip),
        )?;
        self.attr(&behavior_path, "fraction", Scalar::Double(behavior.fraction))?;
        self.attr(&behavior_path, "absoluteDistance", Scalar::Double(behavior.absolute_distance))?;
        self.attr(
            &behavior_path,
            "elasticSlipStiffness",
            Scalar::Double(behavior.elastic_slip_stiffness),
        )?;
        self.attr(
            &behavior_path,
            "nStateDependentVars",
            Scalar::Int(behavior.n_state_dependent_vars),
        )?;
        self.attr(&behavior_path, "useProperties", Scalar::text(&behavior.use_properties))?;
        if let Some(table) = ragged_f64(&behavior.table) {
            self.dataset(&behavior_path, "table", table)?;
        }
        Ok(())
    }

    fn write_constraints(&mut self, constraints: &[Constraint]) -> Result<()> {
        let constraints_path = path::join(ROOT_GROUP, "constraints");
        self.store.create_group(&constraints_path)?;
        let mut counters: HashMap<&'static str, usize> = HashMap::new();
        for constraint in constraints {
            let kind_key = constraint.group_key();
            let kind_path = path::join(&constraints_path, kind_key);
            let counter = counters.entry(kind_key).or_insert(0);
            if *counter == 0 {
                self.store.create_group(&kind_path)?;
            }
            let item_path = path::join_index(&kind_path, *counter);
            *counter += 1;
            self.store.create_group(&item_path)?;
            match constraint {
                Constraint::Tie { params, main, secondary } => {
                    self.write_tie(&item_path, params)?;
                    self.write_opt_set(&item_path, main)?;
                    self.write_opt_set(&item_path, secondary)?;
                }
                Constraint::DisplayBody { params } => {
                    self.write_display_body(&item_path, params)?;
                }
                Constraint::Coupling { params, surface, ref_point, nodes } => {
                    self.write_coupling(&item_path, params)?;
                    self.write_opt_set(&item_path, surface)?;
                    self.write_opt_set(&item_path, ref_point)?;
                    self.write_opt_set(&item_path, nodes)?;
                }
                Constraint::Mpc { params, surface, ref_point } => {
                    self.write_mpc(&item_path, params)?;
                    self.write_opt_set(&item_path, surface)?;
                    self.write_opt_set(&item_path, ref_point)?;
                }
                Constraint::ShellSolidCoupling { params, shell_edge, solid_face } => {
                    self.write_shell_solid(&item_path, params)?;
                    self.write_opt_set(&item_path, shell_edge)?;
                    self.write_opt_set(&item_path, solid_face)?;
                }
            }
        }
        Ok(())
    }

    fn write_tie(&mut self, item_path: &str, params: &TieParams) -> Result<()> {
        self.attr(item_path, "adjust", Scalar::text(&params.adjust))?;
        self.attr(
            item_path,
            "positionToleranceMethod",
            Scalar::text(&params.position_tolerance_method),
        )?;
        self.attr(item_path, "positionTolerance", Scalar::text(&params.position_tolerance))?;
        self.attr(item_path, "tieRotations", Scalar::text(&params.tie_rotations))?;
        self.attr(
            item_path,
            "constraintRatioMethod",
            Scalar::text(&params.constraint_ratio_method),
        )?;
        self.attr(item_path, "constraintRatio", Scalar::text(&params.constraint_ratio))?;
        self.attr(
            item_path,
            "constraintEnforcement",
            Scalar::text(&params.constraint_enforcement),
        )?;
        self.attr(item_path, "thickness", Scalar::text(&params.thickness))?;
        Ok(())
    }

    fn write_display_body(&mut self, item_path: &str, params: &DisplayBodyParams) -> Result<()> {
        self.attr(item_path, "instanceName", Scalar::text(&params.instance_name))?;
        self.attr(
            item_path,
            "referenceNode1InstanceName",
            Scalar::text(&params.reference_node_1_instance),
        )?;
        self.attr(
            item_path,
            "referenceNode1Label",
            Scalar::text(&params.reference_node_1_label),
        )?;
        self.attr(
            item_path,
            "referenceNode2InstanceName",
            Scalar::text(&params.reference_node_2_instance),
        )?;
        self.attr(
            item_path,
            "referenceNode2Label",
            Scalar::text(&params.reference_node_2_label),
        )?;
        self.attr(
            item_path,
            "referenceNode3InstanceName",
            Scalar::text(&params.reference_node_3_instance),
        )?;
        self.attr(
            item_path,
            "referenceNode3Label",
            Scalar::text(&params.reference_node_3_label),
        )?;
        Ok(())
    }

    fn write_coupling(&mut self, item_path: &str, params: &CouplingParams) -> Result<()> {
        self.attr(item_path, "couplingType", Scalar::text(&params.coupling_kind))?;
        self.attr(item_path, "weightingMethod", Scalar::text(&params.weighting_method))?;
        self.attr(item_path, "influenceRadius", Scalar::text(&params.influence_radius))?;
        self.attr(item_path, "u1", Scalar::text(&params.u1))?;
        self.attr(item_path, "u2", Scalar::text(&params.u2))?;
        self.attr(item_path, "u3", Scalar::text(&params.u3))?;
        self.attr(item_path, "ur1", Scalar::text(&params.ur1))?;
        self.attr(item_path, "ur2", Scalar::text(&params.ur2))?;
        self.attr(item_path, "ur3", Scalar::text(&params.ur3))?;
        Ok(())
    }

    fn write_mpc(&mut self, item_path: &str, params: &MpcParams) -> Result<()> {
        self.attr(item_path, "mpcType", Scalar::text(&params.mpc_kind))?;
        self.attr(item_path, "userMode", Scalar::text(&params.user_mode))?;
        self.attr(item_path, "userType", Scalar::text(&params.user_type))?;
        Ok(())
    }

    fn write_shell_solid(
        &mut self,
        item_path: &str,
        params: &ShellSolidCouplingParams,
    ) -> Result<()> {
        self.attr(
            item_path,
            "positionToleranceMethod",
            Scalar::text(&params.position_tolerance_method),
        )?;
        self.attr(item_path, "positionTolerance", Scalar::text(&params.position_tolerance))?;
        self.attr(
            item_path,
            "influenceDistanceMethod",
            Scalar::text(&params.influence_distance_method),
        )?;
        self.attr(item_path, "influenceDistance", Scalar::text(&params.influence_distance))?;
        Ok(())
    }

    fn write_parts(&mut self, parts: &[Part]) -> Result<()> {
        let parts_path = path::join(ROOT_GROUP, "parts");
        self.store.create_group(&parts_path)?;
        for part in parts {
            debug!(part = %part.name, "writing part");
            let part_path = path::join(&parts_path, &part.name);
            self.store.create_group(&part_path)?;
            self.attr(&part_path, "embeddedSpace", Scalar::text(&part.embedded_space))?;
            self.write_nodes(&part_path, &part.nodes)?;
            self.write_elements(&part_path, &part.elements)?;
            self.write_sets(&part_path, "nodeSets", &part.node_sets)?;
            self.write_sets(&part_path, "elementSets", &part.element_sets)?;
            self.write_sets(&part_path, "surfaces", &part.surfaces)?;
        }
        Ok(())
    }

    fn write_assembly(&mut self, assembly: &Assembly) -> Result<()> {
        info!("writing root assembly");
        let assembly_path = path::join(ROOT_GROUP, "rootAssembly");
        self.store.create_group(&assembly_path)?;
        self.attr(&assembly_path, "name", Scalar::text(&assembly.name))?;
        self.attr(&assembly_path, "embeddedSpace", Scalar::text(&assembly.embedded_space))?;

        let instances_path = path::join(&assembly_path, "instances");
        self.store.create_group(&instances_path)?;
        for instance in &assembly.instances {
            self.write_instance(&instances_path, instance)?;
        }

        self.write_nodes(&assembly_path, &assembly.nodes)?;
        self.write_elements(&assembly_path, &assembly.elements)?;
        self.write_sets(&assembly_path, "nodeSets", &assembly.node_sets)?;
        self.write_sets(&assembly_path, "elementSets", &assembly.element_sets)?;
        self.write_sets(&assembly_path, "surfaces", &assembly.surfaces)?;

        if !assembly.datum_csyses.is_empty() {
            let csyses_path = path::join(&assembly_path, "datumCsyses");
            self.store.create_group(&csyses_path)?;
            for (index, csys) in assembly.datum_csyses.iter().enumerate() {
                let key = if csys.name.is_empty() {
                    index.to_string()
                } else {
                    csys.name.clone()
                };
                let csys_path = path::join(&csyses_path, &key);
                self.write_datum_csys(&csys_path, csys)?;
            }
        }

        if !assembly.connector_orientations.is_empty() {
            let orientations_path = path::join(&assembly_path, "connectorOrientations");
            self.store.create_group(&orientations_path)?;
            for (index, orientation) in assembly.connector_orientations.iter().enumerate() {
                let orientation_path = path::join_index(&orientations_path, index);
                self.store.create_group(&orientation_path)?;
                self.attr(&orientation_path, "axis1", Scalar::text(&orientation.axis_1))?;
                self.attr(&orientation_path, "axis2", Scalar::text(&orientation.axis_2))?;
                self.attr(
                    &orientation_path,
                    "orient2sameAs1",
                    Scalar::text(&orientation.orient_2_same_as_1),
                )?;
                self.attr(&orientation_path, "angle1", Scalar::Float(orientation.angle_1))?;
                self.attr(&orientation_path, "angle2", Scalar::Float(orientation.angle_2))?;
                self.write_opt_set(&orientation_path, &orientation.region)?;
                self.write_datum_csys(&path::join(&orientation_path, "localCsys1"), &orientation.csys_1)?;
                self.write_datum_csys(&path::join(&orientation_path, "localCsys2"), &orientation.csys_2)?;
            }
        }
        Ok(())
    }

    fn write_instance(&mut self, instances_path: &str, instance: &Instance) -> Result<()> {
        debug!(instance = %instance.name, "writing instance");
        let instance_path = path::join(instances_path, &instance.name);
        self.store.create_group(&instance_path)?;
        self.attr(&instance_path, "embeddedSpace", Scalar::text(&instance.embedded_space))?;
        self.write_nodes(&instance_path, &instance.nodes)?;
        self.write_elements(&instance_path, &instance.elements)?;
        self.write_sets(&instance_path, "nodeSets", &instance.node_sets)?;
        self.write_sets(&instance_path, "elementSets", &instance.element_sets)?;
        self.write_sets(&instance_path, "surfaces", &instance.surfaces)?;

        if !instance.section_assignments.is_empty() {
            let assignments_path = path::join(&instance_path, "sectionAssignments");
            self.store.create_group(&assignments_path)?;
            for (index, assignment) in instance.section_assignments.iter().enumerate() {
                let assignment_path = path::join_index(&assignments_path, index);
                self.store.create_group(&assignment_path)?;
                self.attr(&assignment_path, "sectionName", Scalar::text(&assignment.section_name))?;
                self.write_opt_set(&assignment_path, &assignment.region)?;
            }
        }

        if !instance.rigid_bodies.is_empty() {
            let bodies_path = path::join(&instance_path, "rigidBodies");
            self.store.create_group(&bodies_path)?;
            for (index, body) in instance.rigid_bodies.iter().enumerate() {
                let body_path = path::join_index(&bodies_path, index);
                self.store.create_group(&body_path)?;
                self.attr(&body_path, "position", Scalar::text(&body.position))?;
                self.attr(&body_path, "isothermal", Scalar::text(&body.isothermal))?;
                self.write_opt_set(&body_path, &body.reference_node)?;
                self.write_opt_set(&body_path, &body.elements)?;
                self.write_opt_set(&body_path, &body.tie_nodes)?;
                self.write_opt_set(&body_path, &body.pin_nodes)?;
                if let Some(surface) = &body.analytic_surface {
                    self.write_analytic_surface(&body_path, surface)?;
                }
            }
        }

        if !instance.beam_orientations.is_empty() {
            let orientations_path = path::join(&instance_path, "beamOrientations");
            self.store.create_group(&orientations_path)?;
            for (index, orientation) in instance.beam_orientations.iter().enumerate() {
                let orientation_path = path::join_index(&orientations_path, index);
                self.store.create_group(&orientation_path)?;
                self.attr(&orientation_path, "method", Scalar::text(&orientation.method))?;
                self.dataset(&orientation_path, "vector", Array::floats(orientation.vector.clone()))?;
                self.write_opt_set(&orientation_path, &orientation.region)?;
            }
        }

        if !instance.rebar_orientations.is_empty() {
            let orientations_path = path::join(&instance_path, "rebarOrientations");
            self.store.create_group(&orientations_path)?;
            for (index, orientation) in instance.rebar_orientations.iter().enumerate() {
                let orientation_path = path::join_index(&orientations_path, index);
                self.store.create_group(&orientation_path)?;
                self.attr(&orientation_path, "axis", Scalar::text(&orientation.axis))?;
                self.attr(&orientation_path, "angle", Scalar::Float(orientation.angle))?;
                self.write_opt_set(&orientation_path, &orientation.region)?;
                self.write_datum_csys(&path::join(&orientation_path, "csys"), &orientation.csys)?;
            }
        }

        if let Some(surface) = &instance.analytic_surface {
            self.write_analytic_surface(&instance_path, surface)?;
        }
        Ok(())
    }

    fn write_datum_csys(&mut self, csys_path: &str, csys: &DatumCsys) -> Result<()> {
        self.store.create_group(csys_path)?;
        self.attr(csys_path, "name", Scalar::text(&csys.name))?;
        self.attr(csys_path, "type", Scalar::text(&csys.kind))?;
        self.dataset(csys_path, "xAxis", Array::floats(csys.x_axis.to_vec()))?;
        self.dataset(csys_path, "yAxis", Array::floats(csys.y_axis.to_vec()))?;
        self.dataset(csys_path, "zAxis", Array::floats(csys.z_axis.to_vec()))?;
        self.dataset(csys_path, "origin", Array::floats(csys.origin.to_vec()))?;
        Ok(())
    }

    fn write_analytic_surface(&mut self, parent: &str, surface: &AnalyticSurface) -> Result<()> {
        let surface_path = path::join(parent, "analyticSurface");
        self.store.create_group(&surface_path)?;
        self.attr(&surface_path, "name", Scalar::text(&surface.name))?;
        self.attr(&surface_path, "type", Scalar::text(&surface.kind))?;
        self.attr(&surface_path, "filletRadius", Scalar::Double(surface.fillet_radius))?;
        if !surface.segments.is_empty() {
            let segments_path = path::join(&surface_path, "segments");
            self.store.create_group(&segments_path)?;
            for (index, segment) in surface.segments.iter().enumerate() {
                let segment_path = path::join_index(&segments_path, index);
                self.store.create_group(&segment_path)?;
                self.attr(&segment_path, "type", Scalar::text(&segment.kind))?;
                if let Some(data) = ragged_f32(&segment.data) {
                    self.dataset(&segment_path, "data", data)?;
                }
            }
        }
        if let Some(data) = ragged_f32(&surface.local_coord_data) {
            self.dataset(&surface_path, "localCoordData", data)?;
        }
        Ok(())
    }

    /// Write one node payload or a link to its canonical path.
    fn write_node(&mut self, nodes_path: &str, node: &NodeHandle) -> Result<()> {
        let label = node.label.to_string();
        let node_path = path::join(nodes_path, &label);
        let key = NodeKey::of(node);
        if let Some(target) = self.node_paths.get(&key) {
            self.store.create_link(target, &node_path)?;
            self.stats.links_created += 1;
        } else {
            self.store
                .write_dataset(nodes_path, &label, Array::floats(node.coordinates.to_vec()))?;
            self.node_paths.insert(key, node_path);
            self.stats.nodes_written += 1;
        }
        Ok(())
    }

    fn write_nodes(&mut self, parent: &str, nodes: &[NodeHandle]) -> Result<()> {
        if nodes.is_empty() {
            return Ok(());
        }
        let nodes_path = path::join(parent, "nodes");
        self.store.create_group(&nodes_path)?;
        for node in nodes {
            self.write_node(&nodes_path, node)?;
        }
        Ok(())
    }

    /// Write one element payload or a link to its canonical path.
    fn write_element(&mut self, elements_path: &str, element: &ElementHandle) -> Result<()> {
        let element_path = path::join(elements_path, &element.label.to_string());
        let key = ElementKey::of(element);
        if let Some(target) = self.element_paths.get(&key) {
            self.store.create_link(target, &element_path)?;
            self.stats.links_created += 1;
            return Ok(());
        }
        self.store.create_group(&element_path)?;
        self.attr(&element_path, "type", Scalar::text(&element.kind))?;
        self.dataset(&element_path, "connectivity", Array::ints(element.connectivity.clone()))?;
        self.dataset(
            &element_path,
            "instanceNames",
            Array::text(element.instance_names.clone()),
        )?;
        let category_path = path::join(&element_path, "sectionCategory");
        self.write_section_category(&category_path, &element.section_category)?;
        self.element_paths.insert(key, element_path);
        self.stats.elements_written += 1;
        Ok(())
    }

    fn write_elements(&mut self, parent: &str, elements: &[ElementHandle]) -> Result<()> {
        if elements.is_empty() {
            return Ok(());
        }
        let elements_path = path::join(parent, "elements");
        self.store.create_group(&elements_path)?;
        for element in elements {
            self.write_element(&elements_path, element)?;
        }
        Ok(())
    }

    /// Write one set under its own name.
    fn write_set(&mut self, parent: &str, set: &Set) -> Result<()> {
        let set_path = path::join(parent, &set.name);
        self.store.create_group(&set_path)?;
        self.attr(&set_path, "type", Scalar::text(set.kind.label()))?;
        self.dataset(&set_path, "instanceNames", Array::text(set.instance_names.clone()))?;
        self.write_nodes(&set_path, &set.nodes)?;
        self.write_elements(&set_path, &set.elements)?;
        self.dataset(
            &set_path,
            "faces",
            Array::text(set.faces.iter().map(|face| face.label()).collect()),
        )?;
        Ok(())
    }

    fn write_opt_set(&mut self, parent: &str, set: &Option<Set>) -> Result<()> {
        match set {
            Some(set) => self.write_set(parent, set),
            None => Ok(()),
        }
    }

    fn write_sets(&mut self, parent: &str, kind: &str, sets: &[Set]) -> Result<()> {
        if sets.is_empty() {
            return Ok(());
        }
        let sets_path = path::join(parent, kind);
        self.store.create_group(&sets_path)?;
        for set in sets {
            self.write_set(&sets_path, set)?;
        }
        Ok(())
    }

    /// Write a scalar attribute under the sparse policy.
    fn attr(&mut self, group: &str, name: &str, value: Scalar) -> Result<()> {
        if self.policy == SparsePolicy::SkipEmpty && value.is_zero_or_empty() {
            return Ok(());
        }
        self.store.write_attribute(group, name, value)
    }

    /// Write a dataset; empty arrays are never written.
    fn dataset(&mut self, group: &str, name: &str, value: Array) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }
        self.store.write_dataset(group, name, value)
    }
}

/// Write one bulk block and release its buffers.
fn write_bulk<S: Store + ?Sized>(
    serializer: &mut Serializer<'_, S>,
    block_path: &str,
    block: &mut FieldBulkData,
) -> Result<()> {
    serializer.store.create_group(block_path)?;
    serializer.attr(block_path, "position", Scalar::text(block.position.label()))?;
    serializer.attr(block_path, "instance", Scalar::text(&block.instance))?;
    serializer.attr(block_path, "precision", Scalar::text(block.precision().label()))?;
    serializer.attr(block_path, "baseElementType", Scalar::text(&block.base_element_type))?;
    serializer.attr(block_path, "length", Scalar::Int(block.length as i32))?;
    serializer.attr(block_path, "width", Scalar::Int(block.width as i32))?;
    serializer.attr(
        block_path,
        "numberOfElements",
        Scalar::Int(block.number_of_elements as i32),
    )?;
    serializer.attr(
        block_path,
        "valuesPerElement",
        Scalar::Int(block.values_per_element as i32),
    )?;
    serializer.attr(
        block_path,
        "orientationWidth",
        Scalar::Int(block.orientation_width as i32),
    )?;
    serializer.dataset(
        block_path,
        "componentLabels",
        Array::text(block.component_labels.clone()),
    )?;

    if block.is_element_based() {
        let elements = block.number_of_elements;
        let points = block.points_per_element();
        let width = block.width;
        serializer.dataset(
            block_path,
            "elementLabels",
            Array::ints(flatten_i32(&block.element_labels)).with_shape(Shape::d2(elements, points)),
        )?;
        serializer.dataset(
            block_path,
            "integrationPoints",
            Array::ints(flatten_i32(&block.integration_points))
                .with_shape(Shape::d2(elements, points)),
        )?;
        let face_labels: Vec<String> = block
            .faces
            .iter()
            .flatten()
            .map(|face| face.label())
            .collect();
        if !face_labels.is_empty() {
            serializer.dataset(
                block_path,
                "faces",
                Array::text(face_labels).with_shape(Shape::d2(elements, points)),
            )?;
        }
        let mises: Vec<f32> = block.mises.iter().flatten().copied().collect();
        if !mises.is_empty() {
            serializer.dataset(
                block_path,
                "mises",
                Array::floats(mises).with_shape(Shape::d2(elements, points)),
            )?;
        }
        serializer.dataset(
            block_path,
            "data",
            bulk_array(&block.data, Shape::d3(elements, points, width)),
        )?;
        if let Some(conjugate) = &block.conjugate {
            serializer.dataset(
                block_path,
                "conjugateData",
                bulk_array(conjugate, Shape::d3(elements, points, width)),
            )?;
        }
        if let Some(coords) = &block.local_coords {
            serializer.dataset(
                block_path,
                "localCoordSystem",
                bulk_array(coords, Shape::d3(elements, points, block.orientation_width)),
            )?;
        }
    } else {
        serializer.dataset(block_path, "nodeLabels", Array::ints(block.node_labels.clone()))?;
        serializer.dataset(
            block_path,
            "data",
            bulk_array(&block.data, Shape::d2(block.length, block.width)),
        )?;
        if let Some(conjugate) = &block.conjugate {
            serializer.dataset(
                block_path,
                "conjugateData",
                bulk_array(conjugate, Shape::d2(block.length, block.width)),
            )?;
        }
    }

    // The block is flushed; free its buffers before the next one is built.
    block.release();
    Ok(())
}

fn bulk_array(values: &BulkValues, shape: Shape) -> Array {
    match values {
        BulkValues::Single(_) => Array::floats(values.flatten_single()).with_shape(shape),
        BulkValues::Double(_) => Array::doubles(values.flatten_double()).with_shape(shape),
    }
}

fn flatten_i32(groups: &[Vec<i32>]) -> Vec<i32> {
    groups.iter().flatten().copied().collect()
}

/// Pad ragged rows with zeros into a dense 2D array.
fn ragged_f32(rows: &[Vec<f32>]) -> Option<Array> {
    let max = rows.iter().map(Vec::len).max().unwrap_or(0);
    if rows.is_empty() || max == 0 {
        return None;
    }
    let mut values = Vec::with_capacity(rows.len() * max);
    for row in rows {
        values.extend_from_slice(row);
        values.resize(values.len() + (max - row.len()), 0.0);
    }
    Some(Array::floats(values).with_shape(Shape::d2(rows.len(), max)))
}

/// Pad ragged rows with zeros into a dense 2D array.
fn ragged_f64(rows: &[Vec<f64>]) -> Option<Array> {
    let max = rows.iter().map(Vec::len).max().unwrap_or(0);
    if rows.is_empty() || max == 0 {
        return None;
    }
    let mut values = Vec::with_capacity(rows.len() * max);
    for row in rows {
        values.extend_from_slice(row);
        values.resize(values.len() + (max - row.len()), 0.0);
    }
    Some(Array::doubles(values).with_shape(Shape::d2(rows.len(), max)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_ragged_padding() {
        let rows = vec![vec![1.0_f32, 2.0], vec![3.0]];
        let array = ragged_f32(&rows).expect("array");
        assert_eq!(array.shape, Shape::d2(2, 2));
        assert_eq!(array.data, crate::store::ArrayData::Float(vec![1.0, 2.0, 3.0, 0.0]));
        assert!(ragged_f32(&[]).is_none());
        assert!(ragged_f32(&[Vec::new()]).is_none());
    }

    #[test]
    fn test_sparse_policy_on_attributes() {
        let mut store = MemoryStore::new();
        store.create_group("/odb").expect("create group");
        {
            let mut serializer = Serializer::new(&mut store, SparsePolicy::SkipEmpty);
            serializer.attr("/odb", "zero", Scalar::Int(0)).expect("attr");
            serializer.attr("/odb", "text", Scalar::text("")).expect("attr");
            serializer.attr("/odb", "kept", Scalar::Int(3)).expect("attr");
        }
        assert!(store.attribute("/odb", "zero").is_none());
        assert!(store.attribute("/odb", "text").is_none());
        assert_eq!(store.attribute("/odb", "kept"), Some(&Scalar::Int(3)));

        let mut store = MemoryStore::new();
        store.create_group("/odb").expect("create group");
        {
            let mut serializer = Serializer::new(&mut store, SparsePolicy::WriteAll);
            serializer.attr("/odb", "zero", Scalar::Int(0)).expect("attr");
        }
        assert_eq!(store.attribute("/odb", "zero"), Some(&Scalar::Int(0)));
    }

    #[test]
    fn test_node_dedup_to_link() {
        let mut store = MemoryStore::new();
        store.create_group("/odb").expect("create group");
        store.create_group("/odb/a").expect("create group");
        store.create_group("/odb/b").expect("create group");

        let node = std::sync::Arc::new(crate::model::Node {
            label: 7,
            coordinates: [1.0, 2.0, 3.0],
        });
        let mut serializer = Serializer::new(&mut store, SparsePolicy::SkipEmpty);
        serializer.write_node("/odb/a", &node).expect("write node");
        serializer.write_node("/odb/b", &node).expect("write node");
        let stats = serializer.stats();
        assert_eq!(stats.nodes_written, 1);
        assert_eq!(stats.links_created, 1);
        assert_eq!(store.link_target("/odb/b/7"), Some("/odb/a/7"));
    }

    #[test]
    fn test_bulk_release_after_write() {
        let mut store = MemoryStore::new();
        store.create_group("/odb").expect("create group");
        let mut serializer = Serializer::new(&mut store, SparsePolicy::SkipEmpty);

        let mut block = FieldBulkData {
            position: crate::model::ResultPosition::Nodal,
            instance: "INST-1".to_string(),
            base_element_type: String::new(),
            length: 2,
            width: 3,
            number_of_elements: 0,
            values_per_element: 0,
            orientation_width: 0,
            component_labels: vec!["U1".into(), "U2".into(), "U3".into()],
            element_labels: Vec::new(),
            integration_points: Vec::new(),
            faces: Vec::new(),
            mises: Vec::new(),
            node_labels: vec![1, 2],
            data: BulkValues::Single(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]),
            conjugate: None,
            local_coords: None,
        };
        write_bulk(&mut serializer, "/odb/0", &mut block).expect("write bulk");
        assert!(block.is_released());
        let data = store.dataset("/odb/0/data").expect("data");
        assert_eq!(data.shape, Shape::d2(2, 3));
    }
}
