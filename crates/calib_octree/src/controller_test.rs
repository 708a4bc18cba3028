use super::*;

fn controller(max_depth: u32, max_elements: usize) -> OctreeController {
  OctreeController::new(OctreeConfig {
    origin: DVec3::ZERO,
    extent: DVec3::splat(128.0),
    max_elements,
    max_depth,
  })
}

#[test]
fn test_find_octree_node_caches_containing_node() {
  let mut ctrl = controller(3, 2);
  assert!(ctrl.current_node().is_none());

  assert!(ctrl.insert_sample(DVec3::splat(10.0), 1.0, 1.0));
  assert!(ctrl.find_octree_node(DVec3::splat(12.0)));
  // The root was cached before the insert subdivided it, and still contains
  // the position.
  assert!(ctrl.current_node().unwrap().is_root());
}

#[test]
fn test_find_octree_node_outside_tree() {
  let mut ctrl = controller(3, 2);
  assert!(!ctrl.find_octree_node(DVec3::new(0.0, 0.0, 900.0)));
  assert!(ctrl.current_node().is_none());
}

/// Moving out of the cached node re-resolves from the root.
#[test]
fn test_cache_moves_with_position() {
  let mut tree = CalibrationOctree::new(OctreeConfig {
    max_depth: 3,
    ..Default::default()
  });
  tree.insert(DVec3::splat(10.0), 0.0, 0.0);
  tree.insert(DVec3::splat(-10.0), 0.0, 0.0);
  let mut ctrl = OctreeController::with_tree(tree);

  assert!(ctrl.find_octree_node(DVec3::splat(12.0)));
  let first = ctrl.current_node().cloned().unwrap();
  assert_eq!(first.steps(), &[3, 4]);

  assert!(ctrl.find_octree_node(DVec3::splat(-12.0)));
  let second = ctrl.current_node().cloned().unwrap();
  assert_ne!(first, second);
  assert!(ctrl
    .tree()
    .node(&second)
    .unwrap()
    .contains_point(DVec3::splat(-12.0)));

  // Leaving the tree keeps the last valid cache.
  assert!(!ctrl.find_octree_node(DVec3::splat(500.0)));
  assert_eq!(ctrl.current_node(), Some(&second));
}

#[test]
fn test_insert_through_cached_node() {
  let mut ctrl = controller(3, 4);
  assert!(ctrl.insert_sample(DVec3::splat(10.0), 1.0, 0.0));
  assert!(ctrl.insert_sample(DVec3::splat(11.0), 2.0, 0.0));
  assert!(ctrl.insert_position(DVec3::splat(12.0)));

  let path = ctrl.tree().find_node(DVec3::splat(10.0)).unwrap();
  let node = ctrl.tree().node(&path).unwrap();
  assert_eq!(node.samples().len(), 3);
  assert_eq!(node.samples()[2].offset_yaw, 0.0);
}

#[test]
fn test_insert_pending_not_armed() {
  let mut ctrl = controller(3, 2);
  ctrl.pending.offset_yaw = 3.0;
  assert!(!ctrl.insert_pending(DVec3::splat(10.0)));
  assert!(ctrl.tree().samples().is_empty());
  assert_eq!(ctrl.pending.offset_yaw, 3.0, "Unarmed call leaves offsets alone");
}

#[test]
fn test_insert_pending_with_offsets_is_one_shot() {
  let mut ctrl = controller(3, 2);
  ctrl.pending = PendingInsert {
    armed: true,
    offset_yaw: 1.5,
    offset_pitch: 0.0,
  };

  assert!(ctrl.insert_pending(DVec3::splat(10.0)));
  assert_eq!(ctrl.pending, PendingInsert::default(), "Trigger and offsets reset");
  assert_eq!(ctrl.tree().samples(), vec![Sample::new(DVec3::splat(10.0), 1.5, 0.0)]);

  assert!(!ctrl.insert_pending(DVec3::splat(20.0)), "Second call is not armed");
  assert_eq!(ctrl.tree().samples().len(), 1);
}

#[test]
fn test_insert_pending_pitch_only() {
  let mut ctrl = controller(3, 2);
  ctrl.pending = PendingInsert {
    armed: true,
    offset_yaw: 0.0,
    offset_pitch: -2.0,
  };

  assert!(ctrl.insert_pending(DVec3::splat(10.0)));
  assert_eq!(ctrl.tree().samples()[0].offset_pitch, -2.0);
}

#[test]
fn test_insert_pending_without_offsets_inserts_position() {
  let mut ctrl = controller(3, 2);
  ctrl.pending.armed = true;

  assert!(ctrl.insert_pending(DVec3::splat(10.0)));
  assert!(!ctrl.pending.armed);
  assert_eq!(ctrl.tree().samples(), vec![Sample::at(DVec3::splat(10.0))]);
}

#[test]
fn test_correction_from_root() {
  let mut ctrl = controller(2, 4);
  ctrl.insert_sample(DVec3::new(10.0, 10.0, 10.0), 0.0, 0.0);
  ctrl.insert_sample(DVec3::new(30.0, 10.0, 10.0), 10.0, 20.0);

  let correction = ctrl.correction_from_root(DVec3::new(20.0, 10.0, 10.0));
  assert!((correction.yaw - 5.0).abs() < 1e-9);
  assert!((correction.pitch - 10.0).abs() < 1e-9);
}

/// With fewer than two samples in reach the correction is zero.
#[test]
fn test_correction_needs_pair() {
  let mut ctrl = controller(2, 4);
  assert_eq!(ctrl.correction_from_root(DVec3::ZERO), OffsetRotation::ZERO);

  ctrl.insert_sample(DVec3::splat(10.0), 5.0, 5.0);
  assert_eq!(ctrl.correction_from_root(DVec3::splat(10.0)), OffsetRotation::ZERO);
  assert_eq!(ctrl.correction_from_root(DVec3::splat(999.0)), OffsetRotation::ZERO);
}

#[test]
fn test_correction_from_explicit_node() {
  let mut ctrl = controller(1, 2);
  ctrl.insert_sample(DVec3::new(0.0, 0.0, 0.0), 0.0, 0.0);
  ctrl.insert_sample(DVec3::new(0.0, 0.0, 40.0), 8.0, 4.0);

  let correction = ctrl.correction_from_node(DVec3::new(0.0, 0.0, 10.0), &NodePath::root());
  assert!((correction.yaw - 2.0).abs() < 1e-9);
  assert!((correction.pitch - 1.0).abs() < 1e-9);

  let missing = NodePath::from_steps(&[5]).unwrap();
  assert_eq!(
    ctrl.correction_from_node(DVec3::ZERO, &missing),
    OffsetRotation::ZERO
  );
}

#[test]
fn test_save_and_load_rebuilds_tree() {
  let dir = tempfile::tempdir().unwrap();
  let store = SampleStore::new(dir.path(), "calibration");

  let mut ctrl = controller(3, 2);
  ctrl.insert_sample(DVec3::new(10.0, 10.0, 10.0), 1.0, 2.0);
  ctrl.insert_sample(DVec3::new(-50.0, 20.0, 5.0), 3.0, 4.0);
  ctrl.save(&store).unwrap();

  let mut restored = controller(3, 2);
  assert_eq!(restored.load(&store).unwrap(), 2);

  let mut expected = ctrl.tree().samples();
  let mut actual = restored.tree().samples();
  expected.sort_by(|a, b| a.offset_yaw.total_cmp(&b.offset_yaw));
  actual.sort_by(|a, b| a.offset_yaw.total_cmp(&b.offset_yaw));
  assert_eq!(actual, expected);
}

#[test]
fn test_insert_samples_reports_accepted() {
  let mut ctrl = controller(1, 2);
  let samples = [
    Sample::new(DVec3::new(1.0, 0.0, 0.0), 1.0, 0.0),
    Sample::new(DVec3::new(2.0, 0.0, 0.0), 2.0, 0.0),
    Sample::new(DVec3::new(3.0, 0.0, 0.0), 3.0, 0.0),
    Sample::at(DVec3::splat(500.0)),
  ];

  assert_eq!(ctrl.insert_samples(samples), 2);
  assert_eq!(ctrl.tree().stats().samples, 2);
}
