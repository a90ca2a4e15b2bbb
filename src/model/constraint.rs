//! Constraints and contact interactions.
//!
//! The source database models each constraint and interaction kind as its
//! own class; here they are closed sets of tagged variants dispatched once
//! at construction time. Scalar parameter blocks are shared with the raw
//! source records; only the member sets differ (raw sets vs resolved,
//! interned sets).

use super::mesh::Set;

/// Frictional (tangential) behavior of a contact property.
///
/// Several fields are `NONE`-or-number strings in the source and are kept
/// as their source renderings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TangentialBehavior {
    /// Friction formulation.
    pub formulation: String,
    /// Directionality (isotropic/orthotropic).
    pub directionality: String,
    /// Slip-rate dependency flag rendering.
    pub slip_rate_dependency: String,
    /// Pressure dependency flag rendering.
    pub pressure_dependency: String,
    /// Temperature dependency flag rendering.
    pub temperature_dependency: String,
    /// Number of field-variable dependencies.
    pub dependencies: i32,
    /// Exponential decay definition.
    pub exponential_decay_definition: String,
    /// Friction table; rows vary in length.
    pub table: Vec<Vec<f64>>,
    /// Shear stress limit.
    pub shear_stress_limit: f64,
    /// Maximum elastic slip rendering.
    pub maximum_elastic_slip: String,
    /// Slip fraction.
    pub fraction: f64,
    /// Absolute slip distance.
    pub absolute_distance: f64,
    /// Elastic slip stiffness.
    pub elastic_slip_stiffness: f64,
    /// Number of state-dependent variables.
    pub n_state_dependent_vars: i32,
    /// Whether property references are in use.
    pub use_properties: String,
}

/// Scalar parameters of a standard (implicit) contact interaction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContactStandardParams {
    /// Sliding formulation (`FINITE` / `SMALL`).
    pub sliding: String,
    /// Surface smoothing value.
    pub smooth: f64,
    /// Critical penetration depth.
    pub hcrit: f64,
    /// Slide-distance limiting rendering.
    pub limit_slide_distance: String,
    /// Slide distance.
    pub slide_distance: f64,
    /// Extension zone.
    pub extension_zone: f64,
    /// Initial adjustment method.
    pub adjust_method: String,
    /// Adjustment tolerance.
    pub adjust_tolerance: f64,
    /// Constraint enforcement (`NODE_TO_SURFACE` / `SURFACE_TO_SURFACE`).
    pub enforcement: String,
    /// Shell-thickness accounting flag rendering.
    pub thickness: String,
    /// Tied contact flag rendering.
    pub tied: String,
    /// Contact tracking (`ONE_CONFIG` / `TWO_CONFIG`).
    pub contact_tracking: String,
    /// Step the interaction was created in.
    pub create_step_name: String,
    /// Tangential behavior of the interaction property.
    pub property: TangentialBehavior,
}

/// Scalar parameters of an explicit contact interaction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContactExplicitParams {
    /// Sliding formulation.
    pub sliding: String,
    /// Main-side thickness exclusion rendering.
    pub main_no_thick: String,
    /// Secondary-side thickness exclusion rendering.
    pub secondary_no_thick: String,
    /// Mechanical constraint formulation.
    pub mechanical_constraint: String,
    /// Weighting factor type.
    pub weighting_factor_type: String,
    /// Weighting factor.
    pub weighting_factor: f64,
    /// Step the interaction was created in.
    pub create_step_name: String,
    /// Reverse-datum-axis flag rendering.
    pub use_reverse_datum_axis: String,
    /// Contact controls name.
    pub contact_controls: String,
    /// Tangential behavior of the interaction property.
    pub property: TangentialBehavior,
}

/// A contact interaction.
#[derive(Clone, Debug)]
pub enum Interaction {
    /// Standard (implicit) surface-to-surface contact.
    Standard {
        /// Scalar parameters.
        params: ContactStandardParams,
        /// Main surface set.
        main: Option<Set>,
        /// Secondary surface set.
        secondary: Option<Set>,
        /// Adjustment region set.
        adjust: Option<Set>,
    },
    /// Explicit surface-to-surface contact.
    Explicit {
        /// Scalar parameters.
        params: ContactExplicitParams,
        /// Main surface set.
        main: Option<Set>,
        /// Secondary surface set.
        secondary: Option<Set>,
    },
}

/// Scalar parameters of a tie constraint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TieParams {
    /// Initial-position adjustment flag rendering.
    pub adjust: String,
    /// Position tolerance method.
    pub position_tolerance_method: String,
    /// Position tolerance rendering.
    pub position_tolerance: String,
    /// Rotational-DOF tie flag rendering.
    pub tie_rotations: String,
    /// Constraint ratio method.
    pub constraint_ratio_method: String,
    /// Constraint ratio rendering.
    pub constraint_ratio: String,
    /// Constraint enforcement.
    pub constraint_enforcement: String,
    /// Shell-thickness accounting flag rendering.
    pub thickness: String,
}

/// Scalar parameters of a display body constraint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayBodyParams {
    /// Displayed instance name.
    pub instance_name: String,
    /// First reference node instance.
    pub reference_node_1_instance: String,
    /// First reference node label rendering.
    pub reference_node_1_label: String,
    /// Second reference node instance.
    pub reference_node_2_instance: String,
    /// Second reference node label rendering.
    pub reference_node_2_label: String,
    /// Third reference node instance.
    pub reference_node_3_instance: String,
    /// Third reference node label rendering.
    pub reference_node_3_label: String,
}

/// Scalar parameters of a coupling constraint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CouplingParams {
    /// Coupling kind (kinematic/distributing).
    pub coupling_kind: String,
    /// Weighting method.
    pub weighting_method: String,
    /// Influence radius rendering.
    pub influence_radius: String,
    /// Constrained translation u1 flag rendering.
    pub u1: String,
    /// Constrained translation u2 flag rendering.
    pub u2: String,
    /// Constrained translation u3 flag rendering.
    pub u3: String,
    /// Constrained rotation ur1 flag rendering.
    pub ur1: String,
    /// Constrained rotation ur2 flag rendering.
    pub ur2: String,
    /// Constrained rotation ur3 flag rendering.
    pub ur3: String,
}

/// Scalar parameters of a multi-point constraint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MpcParams {
    /// MPC kind.
    pub mpc_kind: String,
    /// User-subroutine mode.
    pub user_mode: String,
    /// User-subroutine type rendering.
    pub user_type: String,
}

/// Scalar parameters of a shell-to-solid coupling constraint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShellSolidCouplingParams {
    /// Position tolerance method.
    pub position_tolerance_method: String,
    /// Position tolerance rendering.
    pub position_tolerance: String,
    /// Influence distance method.
    pub influence_distance_method: String,
    /// Influence distance rendering.
    pub influence_distance: String,
}

/// A kinematic constraint.
#[derive(Clone, Debug)]
pub enum Constraint {
    /// Surface-to-surface tie.
    Tie {
        /// Scalar parameters.
        params: TieParams,
        /// Main surface set.
        main: Option<Set>,
        /// Secondary surface set.
        secondary: Option<Set>,
    },
    /// Display body.
    DisplayBody {
        /// Scalar parameters.
        params: DisplayBodyParams,
    },
    /// Kinematic or distributing coupling.
    Coupling {
        /// Scalar parameters.
        params: CouplingParams,
        /// Coupled surface set.
        surface: Option<Set>,
        /// Reference point set.
        ref_point: Option<Set>,
        /// Coupled node set.
        nodes: Option<Set>,
    },
    /// Multi-point constraint.
    Mpc {
        /// Scalar parameters.
        params: MpcParams,
        /// Constrained surface set.
        surface: Option<Set>,
        /// Reference point set.
        ref_point: Option<Set>,
    },
    /// Shell-to-solid coupling.
    ShellSolidCoupling {
        /// Scalar parameters.
        params: ShellSolidCouplingParams,
        /// Shell edge set.
        shell_edge: Option<Set>,
        /// Solid face set.
        solid_face: Option<Set>,
    },
}

impl Constraint {
    /// Group key of the constraint kind in the output container.
    pub fn group_key(&self) -> &'static str {
        match self {
            Constraint::Tie { .. } => "ties",
            Constraint::DisplayBody { .. } => "displayBodies",
            Constraint::Coupling { .. } => "couplings",
            Constraint::Mpc { .. } => "mpcs",
            Constraint::ShellSolidCoupling { .. } => "shellSolidCouplings",
        }
    }
}
