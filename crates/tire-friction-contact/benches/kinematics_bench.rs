//! Benchmarks for contact ingestion and slip kinematics.
//!
//! Run with: cargo bench --bench kinematics_bench

use std::collections::HashMap;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use nalgebra::{Point3, UnitQuaternion, Vector3};
use tire_friction_contact::prelude::*;

fn world() -> HashMap<String, BodyState> {
    let mut bodies = HashMap::new();
    bodies.insert(
        "tire".to_string(),
        BodyState::new(
            Point3::new(0.0, 0.0, 0.3),
            UnitQuaternion::identity(),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.0, 7.0, 0.0),
        ),
    );
    bodies.insert("ground".to_string(), BodyState::default());
    bodies
}

fn message(points: usize) -> ContactsMessage {
    let contact = (0..points).fold(Contact::new("tire", "ground"), |c, i| {
        c.with_point(ContactPoint {
            position: Point3::new(i as f64 * 0.01, 0.0, 0.0),
            normal: Vector3::z(),
            force_on_body1: Vector3::new(0.0, 0.0, 25.0),
        })
    });
    ContactsMessage::new(vec![contact])
}

fn bench_compute(c: &mut Criterion) {
    let bodies = world();
    let mut group = c.benchmark_group("slip_kinematics");
    for points in [1usize, 4, 16] {
        let snapshot = ContactSnapshot::from(message(points));
        group.bench_with_input(BenchmarkId::from_parameter(points), &snapshot, |b, s| {
            b.iter(|| std::hint::black_box(SlipVelocityComputer.compute(std::hint::black_box(s), &bodies)));
        });
    }
    group.finish();
}

fn bench_ingest_and_take(c: &mut Criterion) {
    let ingestor = ContactIngestor::new();
    let msg = message(4);
    let dt = Duration::from_millis(1);

    c.bench_function("ingest_then_take", |b| {
        b.iter(|| {
            ingestor.on_contact_message(std::hint::black_box(&msg));
            std::hint::black_box(ingestor.take_snapshot_if_dirty(dt))
        });
    });
}

criterion_group!(benches, bench_compute, bench_ingest_and_take);
criterion_main!(benches);
