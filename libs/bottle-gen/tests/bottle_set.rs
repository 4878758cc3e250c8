use approx::assert_relative_eq;
use bottle_gen::{
    generate_bottle_set, generate_thread, BottleParams, Closure, GenerateError, ThreadHand, ThreadParams,
};
use thread_mesh::{MeshError, TopologyReport};

#[test]
fn default_set_is_two_closed_solids() {
    let set = generate_bottle_set(&BottleParams::default()).unwrap();

    let bottle = TopologyReport::analyze(&set.bottle.mesh);
    assert!(bottle.is_closed_solid(), "{bottle}");
    assert_eq!(set.bottle.mesh.euler_characteristic(), 0);

    let cap = TopologyReport::analyze(&set.cap.mesh);
    assert!(cap.is_closed_solid(), "{cap}");
    assert_eq!(set.cap.mesh.euler_characteristic(), 2);

    let body = set.body.expect("complete body emits a profile");
    assert_eq!(body.chain.len(), 8);
}

#[test]
fn threads_only_set() {
    let params = BottleParams {
        complete_body: false,
        ..BottleParams::default()
    };
    let set = generate_bottle_set(&params).unwrap();
    assert!(set.body.is_none());
    assert!(TopologyReport::analyze(&set.bottle.mesh).is_closed_solid());
    assert!(TopologyReport::analyze(&set.cap.mesh).is_closed_solid());
    assert_eq!(set.cap.mesh.euler_characteristic(), 2);
}

#[test]
fn stepped_threads_on_both_parts() {
    let params = BottleParams {
        bottle_skip: true,
        cap_skip: true,
        cap_skip_offset: 7,
        ..BottleParams::default()
    };
    let set = generate_bottle_set(&params).unwrap();
    assert_eq!(set.bottle.stats.groove_faces, 28 - 7);
    assert_eq!(set.cap.stats.groove_faces, 28 - 4);
    assert!(TopologyReport::analyze(&set.bottle.mesh).is_closed_solid());
    assert!(TopologyReport::analyze(&set.cap.mesh).is_closed_solid());
}

#[test]
fn cap_sits_half_a_pitch_higher() {
    let set = generate_bottle_set(&BottleParams::default()).unwrap();
    assert_relative_eq!(
        set.placement.cap_z - set.placement.bottle_z,
        0.25 * 0.1,
        epsilon = 1e-12
    );
}

#[test]
fn zero_steps_reports_step_count() {
    let params = ThreadParams {
        thread_steps: 0,
        ..ThreadParams::default()
    };
    let err = generate_thread(&params).unwrap_err();
    assert_eq!(err, GenerateError::Mesh(MeshError::InvalidStepCount { steps: 0 }));
}

#[test]
fn negative_weld_distance_fails_in_weld() {
    let params = ThreadParams {
        weld_distance: -0.01,
        ..ThreadParams::default()
    };
    let err = generate_thread(&params).unwrap_err();
    assert_eq!(
        err,
        GenerateError::Mesh(MeshError::InvalidWeldTolerance { distance: -0.01 })
    );
}

#[test]
fn bottle_wall_is_rejected_not_clamped() {
    let params = BottleParams {
        top_thickness: 1.48,
        ..BottleParams::default()
    };
    let err = generate_bottle_set(&params).unwrap_err();
    assert!(matches!(
        err,
        GenerateError::ParameterOutOfRange { parameter: "wall", .. }
    ));
}

#[test]
fn thread_params_from_json() {
    let json = r#"{
        "vertices": 16,
        "thread_steps": 40,
        "hand": "female",
        "closure": { "tube": { "wall": 0.25 } },
        "recalculate_normals": true
    }"#;
    let params: ThreadParams = serde_json::from_str(json).unwrap();

    assert_eq!(params.vertices, 16);
    assert_eq!(params.thread_steps, 40);
    assert_eq!(params.hand, ThreadHand::Female);
    assert_eq!(params.closure, Closure::Tube { wall: 0.25 });
    assert_relative_eq!(params.radius, 1.48);

    let solid = generate_thread(&params).unwrap();
    let report = TopologyReport::analyze(&solid.mesh);
    assert!(report.is_closed_solid(), "{report}");
}

#[test]
fn bottle_params_from_json() {
    let json = r#"{ "complete_body": false, "body": { "manual": false }, "cap_skip": true }"#;
    let params: BottleParams = serde_json::from_str(json).unwrap();

    assert!(!params.complete_body);
    assert!(!params.body.manual);
    assert_eq!(params.body.z[4], 8.69);
    assert_eq!(params.cap_thread().skip, Some(4));
    assert!(params.validate().is_ok());
}
