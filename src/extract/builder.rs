//! Traversal of the source graph into the domain model.

use tracing::{debug, info, warn};

use crate::filter::Selection;
use crate::intern::EntityInterner;
use crate::model::{
    Assembly, BeamOrientation, ConnectorOrientation, Constraint, Element, FieldLocation,
    FieldOutput, FieldValue, Frame, HistoryOutput, HistoryPoint, HistoryRegion, Instance,
    Interaction, Invariant, Model, Part, RigidBody, SectionAssignment, Set, Step,
};
use crate::source::{
    AssemblyRecord, ConstraintRecord, ElementRecord, FieldOutputRecord, FieldValueRecord,
    FrameRecord, HistoryPointRecord, HistoryRegionRecord, InstanceRecord, InteractionRecord,
    NodeRecord, PartRecord, RigidBodyRecord, SetRecord, SourceModel, StepRecord,
};
use crate::util::Result;

/// Builds the domain model from a source database.
///
/// The builder borrows its interner so the serializer (which shares the
/// identity-key policy) can outlive individual build calls within one run.
pub struct ModelBuilder<'a, S: SourceModel> {
    source: &'a S,
    selection: &'a Selection,
    interner: &'a EntityInterner,
}

impl<'a, S: SourceModel> ModelBuilder<'a, S> {
    /// Create a builder over one source handle.
    pub fn new(source: &'a S, selection: &'a Selection, interner: &'a EntityInterner) -> Self {
        Self { source, selection, interner }
    }

    /// Build the complete domain graph, steps included.
    pub fn build(&self) -> Result<Model> {
        let mut model = self.build_without_steps()?;
        info!("reading steps");
        for record in self.source.steps()? {
            if let Some(step) = self.build_step(&record)? {
                model.steps.push(step);
            }
        }
        Ok(model)
    }

    /// Build everything except the steps.
    ///
    /// The streaming extraction path writes this portion first and then
    /// builds, writes and drops one step at a time.
    pub fn build_without_steps(&self) -> Result<Model> {
        let summary = self.source.summary()?;
        info!(name = %summary.name, "reading source model");

        let mut model = Model {
            name: summary.name,
            analysis_title: summary.analysis_title,
            description: summary.description,
            path: summary.path,
            is_read_only: summary.is_read_only,
            job: self.source.job()?,
            sector: self.source.sector_definition()?,
            section_categories: self.source.section_categories()?,
            user_series: self.source.user_series()?,
            ..Model::default()
        };

        info!("reading interactions");
        for record in self.source.interactions()? {
            if let Some(interaction) = self.build_interaction(record) {
                model.interactions.push(interaction);
            }
        }

        info!("reading constraints");
        for record in self.source.constraints()? {
            if let Some(constraint) = self.build_constraint(record) {
                model.constraints.push(constraint);
            }
        }

        info!("reading parts");
        for record in self.source.parts()? {
            model.parts.push(self.build_part(record));
        }

        info!("reading root assembly");
        model.assembly = self.build_assembly(self.source.assembly()?);

        Ok(model)
    }

    /// Build one step, or `None` when the step filter rejects it.
    pub fn build_step(&self, record: &StepRecord) -> Result<Option<Step>> {
        let Some(mut step) = self.build_step_header(record) else {
            return Ok(None);
        };

        for frame in &record.frames {
            step.frames.push(self.build_frame(&record.name, frame)?);
        }

        for region in &record.history_regions {
            if let Some(region) = self.build_history_region(&record.name, region)? {
                step.history_regions.push(region);
            }
        }

        Ok(Some(step))
    }

    /// Build a step's scalar summary without frames or history regions,
    /// or `None` when the step filter rejects it. The streaming driver
    /// uses this together with [`build_frame`](Self::build_frame) and
    /// [`build_history_region`](Self::build_history_region) to hold at
    /// most one frame's field data at a time.
    pub fn build_step_header(&self, record: &StepRecord) -> Option<Step> {
        if !self.selection.matches_step(&record.name) {
            debug!(step = %record.name, "step filtered out");
            return None;
        }
        info!(step = %record.name, "reading step");

        let step = Step {
            name: record.name.clone(),
            description: record.description.clone(),
            domain: record.domain,
            previous_step_name: record.previous_step_name.clone(),
            procedure: record.procedure.clone(),
            nlgeom: record.nlgeom,
            number: record.number,
            time_period: record.time_period,
            total_time: record.total_time,
            mass: record.mass,
            acoustic_mass: record.acoustic_mass,
            mass_center: record.mass_center.clone(),
            acoustic_mass_center: record.acoustic_mass_center.clone(),
            inertia_about_center: record.inertia_about_center.clone(),
            inertia_about_origin: record.inertia_about_origin.clone(),
            load_cases: record.load_cases.clone(),
            ..Step::default()
        };
        Some(step)
    }

    /// Build one frame. The header is always materialized; field outputs
    /// are only fetched when the frame passes the increment and
    /// frame-value filters, so skipped frames never touch bulk data.
    pub fn build_frame(&self, step_name: &str, record: &FrameRecord) -> Result<Frame> {
        let mut frame = Frame {
            increment_number: record.increment_number,
            description: record.description.clone(),
            domain: record.domain,
            frame_value: record.frame_value,
            frequency: record.frequency,
            mode: record.mode,
            cyclic_mode_number: record.cyclic_mode_number,
            load_case: record.load_case.clone(),
            ..Frame::default()
        };

        if !self.selection.matches_frame(record.increment_number)
            || !self.selection.matches_frame_value(record.frame_value)
        {
            frame.skip = true;
            return Ok(frame);
        }

        debug!(step = step_name, increment = record.increment_number, "reading field output");
        for output in self.source.field_outputs(step_name, record.increment_number)? {
            frame.field_outputs.push(self.build_field_output(output)?);
        }
        Ok(frame)
    }

    fn build_field_output(&self, record: FieldOutputRecord) -> Result<FieldOutput> {
        let mut output = FieldOutput {
            name: record.name,
            description: record.description,
            dim: record.dim,
            dim2: record.dim2,
            component_labels: record.component_labels,
            valid_invariants: record.valid_invariants,
            is_complex: record.is_complex,
            ..FieldOutput::default()
        };
        output.locations = record
            .locations
            .into_iter()
            .map(|(position, section_points)| FieldLocation { position, section_points })
            .collect();

        // Per-value invariants are only meaningful when the output
        // declares valid invariants at all.
        if !output.valid_invariants.is_empty() {
            for value in record.values {
                let value = build_field_value(value, &output.valid_invariants);
                if !value.is_meaningful() {
                    continue;
                }
                if let Some(label) = value.element_label {
                    output.element_values.insert(label, value.clone());
                }
                if let Some(label) = value.node_label {
                    output.node_values.insert(label, value);
                }
            }
        }

        let mut blocks = Vec::with_capacity(record.bulk.len());
        for block in record.bulk {
            blocks.push(super::bulk::regroup(
                block,
                &output.valid_invariants,
                output.is_complex,
            )?);
        }
        output.bulk = blocks;
        Ok(output)
    }

    /// Build one history region, or `None` when the region filter rejects
    /// it. Outputs are fetched only for admitted regions.
    pub fn build_history_region(
        &self,
        step_name: &str,
        record: &HistoryRegionRecord,
    ) -> Result<Option<HistoryRegion>> {
        if !self.selection.matches_history_region(&record.name) {
            debug!(region = %record.name, "history region filtered out");
            return Ok(None);
        }
        debug!(step = step_name, region = %record.name, "reading history region");

        let mut region = HistoryRegion {
            name: record.name.clone(),
            description: record.description.clone(),
            position: record.position.clone(),
            load_case: record.load_case.clone(),
            point: self.build_history_point(&record.point),
            outputs: Vec::new(),
        };

        for output in self.source.history_outputs(step_name, &record.name)? {
            if !self.selection.matches_history(&output.name) {
                continue;
            }
            region.outputs.push(HistoryOutput {
                name: output.name,
                description: output.description,
                kind: output.kind,
                data: output.data,
                conjugate: output.conjugate,
            });
        }
        Ok(Some(region))
    }

    fn build_history_point(&self, record: &HistoryPointRecord) -> HistoryPoint {
        HistoryPoint {
            node: record.node.as_ref().map(|node| self.intern_node(node)),
            element: record.element.as_ref().map(|element| self.intern_element(element)),
            ip_number: record.ip_number,
            section_point: record.section_point.clone(),
            face: record.face,
            position: record.position.clone(),
            region: self.resolve_set(&record.region),
            instance_name: record.instance_name.clone(),
            assembly_name: record.assembly_name.clone(),
        }
    }

    fn build_interaction(&self, record: InteractionRecord) -> Option<Interaction> {
        match record {
            InteractionRecord::Standard { params, main, secondary, adjust } => {
                Some(Interaction::Standard {
                    params,
                    main: self.resolve_set(&main),
                    secondary: self.resolve_set(&secondary),
                    adjust: self.resolve_set(&adjust),
                })
            }
            InteractionRecord::Explicit { params, main, secondary } => {
                Some(Interaction::Explicit {
                    params,
                    main: self.resolve_set(&main),
                    secondary: self.resolve_set(&secondary),
                })
            }
            InteractionRecord::Unsupported { name, kind } => {
                warn!(interaction = %name, kind = %kind, "unsupported interaction type, skipping");
                None
            }
        }
    }

    fn build_constraint(&self, record: ConstraintRecord) -> Option<Constraint> {
        match record {
            ConstraintRecord::Tie { params, main, secondary } => Some(Constraint::Tie {
                params,
                main: self.resolve_set(&main),
                secondary: self.resolve_set(&secondary),
            }),
            ConstraintRecord::DisplayBody { params } => {
                Some(Constraint::DisplayBody { params })
            }
            ConstraintRecord::Coupling { params, surface, ref_point, nodes } => {
                Some(Constraint::Coupling {
                    params,
                    surface: self.resolve_set(&surface),
                    ref_point: self.resolve_set(&ref_point),
                    nodes: self.resolve_set(&nodes),
                })
            }
            ConstraintRecord::Mpc { params, surface, ref_point } => Some(Constraint::Mpc {
                params,
                surface: self.resolve_set(&surface),
                ref_point: self.resolve_set(&ref_point),
            }),
            ConstraintRecord::ShellSolidCoupling { params, shell_edge, solid_face } => {
                Some(Constraint::ShellSolidCoupling {
                    params,
                    shell_edge: self.resolve_set(&shell_edge),
                    solid_face: self.resolve_set(&solid_face),
                })
            }
            ConstraintRecord::Unsupported { name, kind } => {
                warn!(constraint = %name, kind = %kind, "unsupported constraint type, skipping");
                None
            }
        }
    }

    fn build_part(&self, record: PartRecord) -> Part {
        debug!(part = %record.name, "reading part");
        Part {
            name: record.name,
            embedded_space: record.embedded_space,
            nodes: record.nodes.iter().map(|node| self.intern_node(node)).collect(),
            elements: record
                .elements
                .iter()
                .map(|element| self.intern_element(element))
                .collect(),
            node_sets: self.resolve_sets(&record.node_sets),
            element_sets: self.resolve_sets(&record.element_sets),
            surfaces: self.resolve_sets(&record.surfaces),
        }
    }

    fn build_assembly(&self, record: AssemblyRecord) -> Assembly {
        let mut assembly = Assembly {
            name: record.name,
            embedded_space: record.embedded_space,
            nodes: record.nodes.iter().map(|node| self.intern_node(node)).collect(),
            elements: record
                .elements
                .iter()
                .map(|element| self.intern_element(element))
                .collect(),
            node_sets: self.resolve_sets(&record.node_sets),
            element_sets: self.resolve_sets(&record.element_sets),
            surfaces: self.resolve_sets(&record.surfaces),
            datum_csyses: record.datum_csyses,
            ..Assembly::default()
        };

        for instance in record.instances {
            if !self.selection.matches_instance(&instance.name) {
                debug!(instance = %instance.name, "instance filtered out");
                continue;
            }
            assembly.instances.push(self.build_instance(instance));
        }

        for orientation in record.connector_orientations {
            assembly.connector_orientations.push(ConnectorOrientation {
                region: self.resolve_set(&orientation.region),
                axis_1: orientation.axis_1,
                axis_2: orientation.axis_2,
                csys_1: orientation.csys_1,
                csys_2: orientation.csys_2,
                orient_2_same_as_1: orientation.orient_2_same_as_1,
                angle_1: orientation.angle_1,
                angle_2: orientation.angle_2,
            });
        }

        assembly
    }

    fn build_instance(&self, record: InstanceRecord) -> Instance {
        debug!(instance = %record.name, "reading instance");
        Instance {
            name: record.name,
            embedded_space: record.embedded_space,
            nodes: record.nodes.iter().map(|node| self.intern_node(node)).collect(),
            elements: record
                .elements
                .iter()
                .map(|element| self.intern_element(element))
                .collect(),
            node_sets: self.resolve_sets(&record.node_sets),
            element_sets: self.resolve_sets(&record.element_sets),
            surfaces: self.resolve_sets(&record.surfaces),
            rigid_bodies: record
                .rigid_bodies
                .into_iter()
                .map(|body| self.build_rigid_body(body))
                .collect(),
            section_assignments: record
                .section_assignments
                .into_iter()
                .map(|assignment| SectionAssignment {
                    region: self.resolve_set(&assignment.region),
                    section_name: assignment.section_name,
                })
                .collect(),
            beam_orientations: record
                .beam_orientations
                .into_iter()
                .map(|orientation| BeamOrientation {
                    method: orientation.method,
                    region: self.resolve_set(&orientation.region),
                    vector: orientation.vector,
                })
                .collect(),
            rebar_orientations: record
                .rebar_orientations
                .into_iter()
                .map(|orientation| crate::model::RebarOrientation {
                    axis: orientation.axis,
                    angle: orientation.angle,
                    region: self.resolve_set(&orientation.region),
                    csys: orientation.csys,
                })
                .collect(),
            analytic_surface: record.analytic_surface,
        }
    }

    fn build_rigid_body(&self, record: RigidBodyRecord) -> RigidBody {
        RigidBody {
            position: record.position,
            isothermal: record.isothermal,
            reference_node: self.resolve_set(&record.reference_node),
            elements: self.resolve_set(&record.elements),
            tie_nodes: self.resolve_set(&record.tie_nodes),
            pin_nodes: self.resolve_set(&record.pin_nodes),
            // A rigid body without an analytic surface is an expected,
            // silent case.
            analytic_surface: record.analytic_surface,
        }
    }

    fn resolve_sets(&self, records: &[SetRecord]) -> Vec<Set> {
        records
            .iter()
            .filter_map(|record| self.resolve_set(record))
            .collect()
    }

    /// Resolve one raw set, interning its members. The source's
    /// empty-named sentinel resolves to `None` and is skipped everywhere.
    fn resolve_set(&self, record: &SetRecord) -> Option<Set> {
        if record.is_absent() {
            return None;
        }
        debug!(set = %record.name, kind = record.kind.label(), "resolving set");
        Some(Set {
            name: record.name.clone(),
            kind: record.kind,
            instance_names: record.instance_names.clone(),
            nodes: record.nodes.iter().map(|node| self.intern_node(node)).collect(),
            elements: record
                .elements
                .iter()
                .map(|element| self.intern_element(element))
                .collect(),
            faces: record.faces.clone(),
        })
    }

    fn intern_node(&self, record: &NodeRecord) -> crate::model::NodeHandle {
        self.interner.intern_node(record.label, record.coordinates)
    }

    fn intern_element(&self, record: &ElementRecord) -> crate::model::ElementHandle {
        self.interner
            .intern_element(record.label, &record.instance_names, || Element {
                label: record.label,
                kind: record.kind.clone(),
                connectivity: record.connectivity.clone(),
                instance_names: record.instance_names.clone(),
                section_category: record.section_category.clone(),
            })
    }
}

fn build_field_value(record: FieldValueRecord, valid: &[Invariant]) -> FieldValue {
    let mut value = FieldValue {
        element_label: record.element_label,
        node_label: record.node_label,
        integration_point: record.integration_point,
        kind: record.kind,
        section_point: record.section_point,
        ..FieldValue::default()
    };
    for (invariant, amount) in record.invariants {
        if valid.contains(&invariant) {
            value.invariants.insert(invariant, amount);
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TensorKind;

    #[test]
    fn test_field_value_keeps_only_valid_invariants() {
        let record = FieldValueRecord {
            node_label: Some(4),
            kind: Some(TensorKind::Vector),
            invariants: vec![(Invariant::Magnitude, 2.5), (Invariant::Mises, 7.0)],
            ..FieldValueRecord::default()
        };
        let value = build_field_value(record, &[Invariant::Magnitude]);
        assert_eq!(value.invariants.len(), 1);
        assert_eq!(value.invariants.get(&Invariant::Magnitude), Some(&2.5));
        assert!(value.is_meaningful());
    }

    #[test]
    fn test_field_value_without_invariants_is_not_meaningful() {
        let record = FieldValueRecord {
            node_label: Some(4),
            ..FieldValueRecord::default()
        };
        let value = build_field_value(record, &[Invariant::Magnitude]);
        assert!(!value.is_meaningful());
    }
}
