//! Save a populated tree to a sample file, reload it into a fresh tree and
//! check that the same samples are reachable.

use calib_octree::persistence::{load_samples, parse_records, write_records};
use calib_octree::{CalibrationOctree, OctreeConfig, Sample, SampleStore};
use glam::DVec3;

fn config() -> OctreeConfig {
  OctreeConfig {
    origin: DVec3::new(0.0, 0.0, 100.0),
    extent: DVec3::new(200.0, 200.0, 100.0),
    max_elements: 3,
    max_depth: 4,
  }
}

/// Deterministic spread of samples with no short decimal form.
fn generate_samples(count: usize) -> Vec<Sample> {
  (0..count)
    .map(|i| {
      let t = i as f64;
      Sample::new(
        DVec3::new(
          (t * 73.0) % 400.0 - 200.0 + 1.0 / 3.0,
          (t * 29.0) % 400.0 - 200.0 + t * 1e-7,
          (t * 17.0) % 200.0 + 1.0 / 7.0,
        ),
        (t * 0.25) % 10.0 - 5.0 + 1.0 / 9.0,
        (t * 0.5) % 6.0 - 3.0 - t * 1e-9,
      )
    })
    .collect()
}

fn sorted(mut samples: Vec<Sample>) -> Vec<Sample> {
  samples.sort_by(|a, b| {
    a.position
      .x
      .total_cmp(&b.position.x)
      .then(a.position.y.total_cmp(&b.position.y))
      .then(a.position.z.total_cmp(&b.position.z))
      .then(a.offset_yaw.total_cmp(&b.offset_yaw))
      .then(a.offset_pitch.total_cmp(&b.offset_pitch))
  });
  samples
}

#[test]
fn round_trip_through_file_preserves_samples() {
  let mut original = CalibrationOctree::new(config());
  let accepted = original.build_with_samples(generate_samples(120));
  assert!(accepted > 0);

  let dir = tempfile::tempdir().expect("temp dir");
  let store = SampleStore::new(dir.path(), "session");
  store.save(&original.samples()).expect("save");

  let loaded = load_samples(&store.path()).expect("load");
  assert_eq!(loaded.len(), accepted);

  let mut rebuilt = CalibrationOctree::new(config());
  assert_eq!(rebuilt.build_with_samples(loaded), accepted);

  assert_eq!(sorted(rebuilt.samples()), sorted(original.samples()));
  assert_eq!(rebuilt.stats().samples, original.stats().samples);
}

/// Reloading what the tree wrote gives the same corrections.
#[test]
fn round_trip_preserves_corrections() {
  let mut original = CalibrationOctree::new(config());
  original.build_with_samples(generate_samples(60));

  let text = write_records(&original.samples());
  let mut rebuilt = CalibrationOctree::new(config());
  rebuilt.build_with_samples(parse_records(&text));

  let queries: Vec<DVec3> = (0..32)
    .map(|i| DVec3::new(i as f64 * 11.0 - 150.0, i as f64 * 7.0 - 100.0, i as f64 * 5.0))
    .collect();
  assert_eq!(rebuilt.corrections(&queries), original.corrections(&queries));
}

/// Samples a hair away from an octant face stay on their side of it after a
/// reload.
#[test]
fn round_trip_keeps_samples_in_their_nodes() {
  let config = OctreeConfig {
    max_elements: 2,
    max_depth: 3,
    ..OctreeConfig::default()
  };
  let samples = vec![
    Sample::new(DVec3::new(0.1234567, 1e-7, 2.0), 1.0 / 3.0, 0.0),
    Sample::new(DVec3::new(-1e-7, 5.0, 5.0), 5.0, 1e-7),
  ];

  let mut original = CalibrationOctree::new(config.clone());
  assert_eq!(original.build_with_samples(samples.iter().copied()), samples.len());

  let reloaded = parse_records(&write_records(&original.samples()));
  let mut rebuilt = CalibrationOctree::new(config);
  assert_eq!(rebuilt.build_with_samples(reloaded), samples.len());

  assert_eq!(sorted(rebuilt.samples()), sorted(original.samples()));
  for sample in &samples {
    assert_eq!(
      rebuilt.find_node(sample.position),
      original.find_node(sample.position),
      "node changed for {:?}",
      sample.position
    );
  }
}
