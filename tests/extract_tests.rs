//! End-to-end extraction tests: memory source -> builder -> serializer ->
//! memory store.

use quarry::filter::Selection;
use quarry::intern::EntityInterner;
use quarry::extract::ModelBuilder;
use quarry::model::{
    FaceTag, Invariant, JobData, ResultPosition, SectionCategory, SectionPoint, SetKind,
    TieParams,
};
use quarry::serialize::{ExtractOptions, Extractor, Serializer, SparsePolicy};
use quarry::source::{
    memory::MemoryModel, AssemblyRecord, BulkBuffer, BulkRecord, ConstraintRecord, ElementRecord,
    FieldOutputRecord, FieldValueRecord, FrameRecord, HistoryOutputRecord, HistoryPointRecord,
    HistoryRegionRecord, InstanceRecord, ModelSummary, NodeRecord, SetRecord, StepRecord,
};
use quarry::store::{MemoryStore, Scalar};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn node(label: i32, coordinates: [f32; 3]) -> NodeRecord {
    NodeRecord { label, coordinates }
}

fn steel_category() -> SectionCategory {
    SectionCategory {
        name: "solid <STEEL>".to_string(),
        description: "solid section".to_string(),
        section_points: vec![SectionPoint { number: 1, description: "center".to_string() }],
    }
}

fn element_11() -> ElementRecord {
    ElementRecord {
        label: 11,
        kind: "C3D8R".to_string(),
        connectivity: vec![7, 8],
        instance_names: vec!["INST-1".to_string()],
        section_category: steel_category(),
    }
}

fn node_set(name: &str, nodes: Vec<NodeRecord>) -> SetRecord {
    SetRecord {
        name: name.to_string(),
        kind: SetKind::Node,
        instance_names: vec!["INST-1".to_string()],
        nodes,
        elements: Vec::new(),
        faces: Vec::new(),
    }
}

fn displacement_output(scale: f32) -> FieldOutputRecord {
    FieldOutputRecord {
        name: "U".to_string(),
        description: "Spatial displacement".to_string(),
        dim: 3,
        dim2: 0,
        component_labels: vec!["U1".into(), "U2".into(), "U3".into()],
        valid_invariants: vec![Invariant::Magnitude],
        locations: vec![(ResultPosition::Nodal, Vec::new())],
        is_complex: false,
        values: vec![FieldValueRecord {
            node_label: Some(7),
            invariants: vec![(Invariant::Magnitude, 3.74 * scale)],
            ..FieldValueRecord::default()
        }],
        bulk: vec![BulkRecord {
            position: ResultPosition::Nodal,
            instance: "INST-1".to_string(),
            length: 2,
            width: 3,
            node_labels: vec![7, 8],
            data: BulkBuffer::Single(vec![
                1.0 * scale,
                2.0 * scale,
                3.0 * scale,
                4.0 * scale,
                5.0 * scale,
                6.0 * scale,
            ]),
            ..BulkRecord::default()
        }],
    }
}

fn stress_output() -> FieldOutputRecord {
    FieldOutputRecord {
        name: "S".to_string(),
        description: "Stress components".to_string(),
        dim: 4,
        dim2: 0,
        component_labels: vec!["S11".into(), "S22".into(), "S33".into(), "S12".into()],
        valid_invariants: vec![Invariant::Mises],
        locations: vec![(ResultPosition::IntegrationPoint, vec![SectionPoint {
            number: 1,
            description: "center".to_string(),
        }])],
        is_complex: false,
        values: Vec::new(),
        bulk: vec![BulkRecord {
            position: ResultPosition::IntegrationPoint,
            instance: "INST-1".to_string(),
            base_element_type: "C3D8R".to_string(),
            length: 2,
            width: 4,
            number_of_elements: 1,
            values_per_element: 8,
            element_labels: vec![11, 11],
            integration_points: vec![1, 2],
            mises: vec![10.0, 20.0],
            data: BulkBuffer::Single((0..8).map(|i| i as f32).collect()),
            ..BulkRecord::default()
        }],
    }
}

fn complex_output() -> FieldOutputRecord {
    FieldOutputRecord {
        name: "UC".to_string(),
        description: "Complex displacement".to_string(),
        dim: 2,
        dim2: 0,
        component_labels: vec!["UC1".into(), "UC2".into()],
        is_complex: true,
        bulk: vec![BulkRecord {
            position: ResultPosition::Nodal,
            instance: "INST-1".to_string(),
            length: 1,
            width: 2,
            node_labels: vec![7],
            data: BulkBuffer::Single(vec![1.0, 2.0]),
            conjugate: Some(BulkBuffer::Single(vec![3.0, 4.0])),
            ..BulkRecord::default()
        }],
        ..FieldOutputRecord::default()
    }
}

fn punch_region() -> HistoryRegionRecord {
    HistoryRegionRecord {
        name: "NodeSet PUNCH".to_string(),
        description: "Output at punch reference".to_string(),
        position: "Nodal".to_string(),
        point: HistoryPointRecord {
            node: Some(node(7, [1.0, 2.0, 3.0])),
            position: "Nodal".to_string(),
            instance_name: "INST-1".to_string(),
            assembly_name: "Assembly".to_string(),
            ..HistoryPointRecord::default()
        },
        ..HistoryRegionRecord::default()
    }
}

fn fixture() -> MemoryModel {
    let mut model = MemoryModel::new();
    model.summary = ModelSummary {
        name: "brake-disc".to_string(),
        analysis_title: "Brake disc heat-up".to_string(),
        description: "extraction fixture".to_string(),
        path: "/scratch/brake-disc.odb".to_string(),
        is_read_only: true,
    };
    model.job = JobData {
        analysis_code: "Abaqus Standard".to_string(),
        precision: "Double Precision".to_string(),
        name: "brake-disc".to_string(),
        version: "2024".to_string(),
        ..JobData::default()
    };
    model.section_categories = vec![steel_category()];

    model.constraints = vec![
        ConstraintRecord::Tie {
            params: TieParams {
                adjust: "yes".to_string(),
                position_tolerance_method: "COMPUTED".to_string(),
                ..Default::default()
            },
            main: SetRecord {
                name: "TIE-MAIN".to_string(),
                kind: SetKind::Node,
                instance_names: vec!["INST-1".to_string()],
                nodes: vec![node(101, [0.0, 0.0, 0.0])],
                elements: Vec::new(),
                faces: Vec::new(),
            },
            secondary: SetRecord {
                name: "TIE-SECONDARY".to_string(),
                kind: SetKind::Node,
                instance_names: vec!["INST-1".to_string()],
                nodes: vec![node(102, [0.0, 0.0, 1.0])],
                elements: Vec::new(),
                faces: Vec::new(),
            },
        },
        ConstraintRecord::Unsupported {
            name: "RIGID-LINK".to_string(),
            kind: "RigidLink".to_string(),
        },
    ];

    model.assembly = AssemblyRecord {
        name: "Assembly".to_string(),
        embedded_space: "Three Dimensional".to_string(),
        instances: vec![
            InstanceRecord {
                name: "INST-1".to_string(),
                embedded_space: "Three Dimensional".to_string(),
                nodes: vec![node(7, [1.0, 2.0, 3.0]), node(8, [4.0, 5.0, 6.0])],
                elements: vec![element_11()],
                node_sets: vec![
                    node_set("A", vec![node(7, [1.0, 2.0, 3.0])]),
                    node_set("B", vec![node(7, [1.0, 2.0, 3.0]), node(8, [4.0, 5.0, 6.0])]),
                    SetRecord::absent(),
                ],
                element_sets: vec![SetRecord {
                    name: "EALL".to_string(),
                    kind: SetKind::Element,
                    instance_names: vec!["INST-1".to_string()],
                    nodes: Vec::new(),
                    elements: vec![element_11()],
                    faces: Vec::new(),
                }],
                surfaces: vec![SetRecord {
                    name: "TOP".to_string(),
                    kind: SetKind::Surface,
                    instance_names: vec!["INST-1".to_string()],
                    nodes: Vec::new(),
                    elements: vec![element_11()],
                    faces: vec![FaceTag::Face(3)],
                }],
                ..InstanceRecord::default()
            },
            InstanceRecord {
                name: "INST-2".to_string(),
                embedded_space: "Three Dimensional".to_string(),
                nodes: vec![node(201, [9.0, 9.0, 9.0])],
                ..InstanceRecord::default()
            },
        ],
        ..AssemblyRecord::default()
    };

    model.steps = vec![
        StepRecord {
            name: "Step-1".to_string(),
            description: "Load".to_string(),
            procedure: "*STATIC".to_string(),
            number: 1,
            time_period: 1.0,
            frames: vec![
                FrameRecord {
                    increment_number: 0,
                    frame_value: 0.5,
                    description: "Increment 0".to_string(),
                    ..FrameRecord::default()
                },
                FrameRecord {
                    increment_number: 1,
                    frame_value: 1.25,
                    description: "Increment 1".to_string(),
                    ..FrameRecord::default()
                },
            ],
            history_regions: vec![
                punch_region(),
                HistoryRegionRecord {
                    name: "NodeSet DIE".to_string(),
                    position: "Nodal".to_string(),
                    ..HistoryRegionRecord::default()
                },
            ],
            ..StepRecord::default()
        },
        StepRecord {
            name: "Step-2".to_string(),
            description: "Unload".to_string(),
            number: 2,
            frames: vec![FrameRecord {
                increment_number: 0,
                frame_value: 2.0,
                ..FrameRecord::default()
            }],
            ..StepRecord::default()
        },
    ];

    model.put_field_outputs(
        "Step-1",
        0,
        vec![displacement_output(1.0), stress_output(), complex_output()],
    );
    model.put_field_outputs("Step-1", 1, vec![displacement_output(2.0)]);
    model.put_field_outputs("Step-2", 0, vec![displacement_output(3.0)]);
    model.put_history_outputs(
        "Step-1",
        "NodeSet PUNCH",
        vec![
            HistoryOutputRecord {
                name: "U1".to_string(),
                kind: "Scalar".to_string(),
                data: vec![vec![0.0, 0.0], vec![0.5, 0.01], vec![1.0, 0.02]],
                ..HistoryOutputRecord::default()
            },
            HistoryOutputRecord {
                name: "U2".to_string(),
                kind: "Scalar".to_string(),
                data: vec![vec![0.0, 0.0], vec![1.0, 0.04]],
                ..HistoryOutputRecord::default()
            },
        ],
    );
    model
}

fn run(options: ExtractOptions) -> (MemoryStore, quarry::serialize::ExtractReport) {
    init_tracing();
    let source = fixture();
    let mut store = MemoryStore::new();
    let report = Extractor::new(options)
        .run(&source, &mut store)
        .expect("extraction");
    (store, report)
}

#[test]
fn duplicate_node_across_sets_is_linked() {
    let (store, report) = run(ExtractOptions::default());

    // The instance mesh owns the canonical payload.
    let canonical = "/odb/rootAssembly/instances/INST-1/nodes/7";
    let coords = store.dataset(canonical).expect("canonical node payload");
    assert_eq!(coords.len(), 3);

    // Set A and set B reference the same physical node; both resolve to
    // the first-written path.
    let a_ref = "/odb/rootAssembly/instances/INST-1/nodeSets/A/nodes/7";
    let b_ref = "/odb/rootAssembly/instances/INST-1/nodeSets/B/nodes/7";
    assert_eq!(store.link_target(a_ref), Some(canonical));
    assert_eq!(store.link_target(b_ref), Some(canonical));
    assert_eq!(store.dataset(b_ref), store.dataset(canonical));

    // Payload count equals distinct identity keys, never reference count.
    assert_eq!(report.nodes_written, report.distinct_nodes);
    assert_eq!(report.distinct_nodes, 5); // 7, 8, 101, 102, 201
    assert_eq!(report.elements_written, 1);
}

#[test]
fn element_references_become_links() {
    let (store, _) = run(ExtractOptions::default());

    let canonical = "/odb/rootAssembly/instances/INST-1/elements/11";
    assert!(store.contains(canonical));
    assert_eq!(
        store.attribute(canonical, "type"),
        Some(&Scalar::text("C3D8R"))
    );

    let set_ref = "/odb/rootAssembly/instances/INST-1/elementSets/EALL/elements/11";
    assert_eq!(store.link_target(set_ref), Some(canonical));
    let surface_ref = "/odb/rootAssembly/instances/INST-1/surfaces/TOP/elements/11";
    assert_eq!(store.link_target(surface_ref), Some(canonical));

    // The surface set carries its face tags.
    let faces = store
        .dataset("/odb/rootAssembly/instances/INST-1/surfaces/TOP/faces")
        .expect("faces");
    assert_eq!(
        faces.data,
        quarry::store::ArrayData::Text(vec!["FACE3".to_string()])
    );
}

#[test]
fn history_point_node_is_linked() {
    let (store, _) = run(ExtractOptions::default());
    let link = "/odb/steps/Step-1/historyRegions/NodeSet PUNCH/point/node/7";
    assert_eq!(
        store.link_target(link),
        Some("/odb/rootAssembly/instances/INST-1/nodes/7")
    );
}

#[test]
fn empty_named_set_is_skipped() {
    let (store, _) = run(ExtractOptions::default());
    let mut children =
        store.children("/odb/rootAssembly/instances/INST-1/nodeSets");
    children.sort_unstable();
    assert_eq!(children, vec!["A", "B"]);
}

#[test]
fn unsupported_constraint_is_absent() {
    let (store, _) = run(ExtractOptions::default());
    assert_eq!(store.children("/odb/constraints"), vec!["ties"]);
    assert!(store.contains("/odb/constraints/ties/0"));
    assert!(!store.to_json().to_string().contains("RIGID-LINK"));
}

#[test]
fn frame_value_filter_prunes_frames() {
    let options = ExtractOptions {
        selection: Selection::all().with_frame_value("0.5"),
        ..ExtractOptions::default()
    };
    let (store, report) = run(options);

    assert!(store.contains("/odb/steps/Step-1/frames/0"));
    assert!(!store.contains("/odb/steps/Step-1/frames/1"));
    // Step-2's only frame (value 2.000000) is dropped as well.
    assert_eq!(store.children("/odb/steps/Step-2/frames"), Vec::<&str>::new());
    assert_eq!(report.frames_written, 1);
    assert_eq!(report.frames_skipped, 2);

    // The selected frame carries its field outputs.
    assert!(store.contains("/odb/steps/Step-1/frames/0/fieldOutputs/U"));
}

#[test]
fn frame_filter_selects_by_increment() {
    let options = ExtractOptions {
        selection: Selection::all().with_frame("1"),
        ..ExtractOptions::default()
    };
    let (store, _) = run(options);
    assert!(!store.contains("/odb/steps/Step-1/frames/0"));
    assert!(store.contains("/odb/steps/Step-1/frames/1"));
}

#[test]
fn step_filter_prunes_steps() {
    let options = ExtractOptions {
        selection: Selection::all().with_step("Step-1"),
        ..ExtractOptions::default()
    };
    let (store, report) = run(options);
    assert_eq!(store.children("/odb/steps"), vec!["Step-1"]);
    assert_eq!(report.steps_written, 1);
}

#[test]
fn instance_filter_prunes_instances() {
    let options = ExtractOptions {
        selection: Selection::all().with_instance("INST-1"),
        ..ExtractOptions::default()
    };
    let (store, report) = run(options);
    assert_eq!(
        store.children("/odb/rootAssembly/instances"),
        vec!["INST-1"]
    );
    // INST-2's node is never interned, let alone written.
    assert_eq!(report.distinct_nodes, 4);
}

#[test]
fn history_filters_prune_regions_and_outputs() {
    let options = ExtractOptions {
        selection: Selection::all()
            .with_history_region("NodeSet PUNCH")
            .with_history("U1"),
        ..ExtractOptions::default()
    };
    let (store, _) = run(options);

    assert_eq!(
        store.children("/odb/steps/Step-1/historyRegions"),
        vec!["NodeSet PUNCH"]
    );
    assert_eq!(
        store.children("/odb/steps/Step-1/historyRegions/NodeSet PUNCH/historyOutputs"),
        vec!["U1"]
    );
}

#[test]
fn complex_output_carries_conjugate_data() {
    let (store, _) = run(ExtractOptions::default());

    let complex_block = "/odb/steps/Step-1/frames/0/fieldOutputs/UC/bulkData/0";
    let data = store
        .dataset(&format!("{complex_block}/data"))
        .expect("primary data");
    let conjugate = store
        .dataset(&format!("{complex_block}/conjugateData"))
        .expect("conjugate data");
    assert_eq!(data.shape, conjugate.shape);

    // A non-complex output never writes a conjugate array.
    let real_block = "/odb/steps/Step-1/frames/0/fieldOutputs/U/bulkData/0";
    assert!(store.contains(&format!("{real_block}/data")));
    assert!(!store.contains(&format!("{real_block}/conjugateData")));
}

#[test]
fn element_block_layout() {
    let (store, _) = run(ExtractOptions::default());
    let block = "/odb/steps/Step-1/frames/0/fieldOutputs/S/bulkData/0";

    let data = store.dataset(&format!("{block}/data")).expect("data");
    assert_eq!(data.shape.sizes(), &[1, 2, 4]);
    let labels = store
        .dataset(&format!("{block}/elementLabels"))
        .expect("element labels");
    assert_eq!(labels.shape.sizes(), &[1, 2]);
    let mises = store.dataset(&format!("{block}/mises")).expect("mises");
    assert_eq!(mises.shape.sizes(), &[1, 2]);
    assert_eq!(
        store.attribute(block, "position"),
        Some(&Scalar::text("Integration Point"))
    );
}

#[test]
fn select_all_reproduces_default_run() {
    let explicit_all = ExtractOptions {
        selection: Selection::all()
            .with_step("all")
            .with_frame("all")
            .with_frame_value("all")
            .with_instance("all")
            .with_history("all")
            .with_history_region("all"),
        ..ExtractOptions::default()
    };
    let (filtered, _) = run(explicit_all);
    let (unfiltered, _) = run(ExtractOptions::default());
    assert_eq!(filtered.to_json(), unfiltered.to_json());
}

#[test]
fn streaming_run_matches_full_model_serialization() {
    init_tracing();
    let source = fixture();

    let mut streamed = MemoryStore::new();
    Extractor::new(ExtractOptions::default())
        .run(&source, &mut streamed)
        .expect("streaming run");

    let selection = Selection::all();
    let interner = EntityInterner::new();
    let builder = ModelBuilder::new(&source, &selection, &interner);
    let mut model = builder.build().expect("full build");
    let mut full = MemoryStore::new();
    {
        let mut serializer = Serializer::new(&mut full, SparsePolicy::SkipEmpty);
        serializer.write_model(&mut model).expect("serialize");
    }

    assert_eq!(streamed.to_json(), full.to_json());
}

#[test]
fn write_all_policy_keeps_zero_scalars() {
    let options = ExtractOptions {
        sparse: SparsePolicy::WriteAll,
        ..ExtractOptions::default()
    };
    let (store, _) = run(options);
    // dim2 is zero in the fixture; the reference policy would drop it.
    assert_eq!(
        store.attribute("/odb/steps/Step-1/frames/0/fieldOutputs/U", "dim2"),
        Some(&Scalar::Int(0))
    );

    let (sparse_store, _) = run(ExtractOptions::default());
    assert!(sparse_store
        .attribute("/odb/steps/Step-1/frames/0/fieldOutputs/U", "dim2")
        .is_none());
}
