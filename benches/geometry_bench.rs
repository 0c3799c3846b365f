use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec3;
use std::hint::black_box;
use transition_section_editor::app::host::memory::{MemoryInstance, MemoryModel, RecordingGraphics};
use transition_section_editor::app::host::ComponentInput;
use transition_section_editor::app::preview::draw_transition_section;
use transition_section_editor::{TransitionGeometry, TransitionParams, TransitionSectionPlugin};

fn reference_params() -> TransitionParams {
    TransitionParams {
        rectangle_height: 6000.0,
        rectangle_width: 3000.0,
        transition_length: 1000.0,
        circle_radius: 1000.0,
    }
}

fn bench_geometry_construction(c: &mut Criterion) {
    let params = reference_params();

    c.bench_function("transition_geometry_axis_aligned", |b| {
        b.iter(|| {
            let geometry = TransitionGeometry::new(black_box(params), DVec3::ZERO, DVec3::Z)
                .expect("Geometrie ungültig");
            black_box(geometry.lofted_panels().len())
        })
    });

    let mut group = c.benchmark_group("transition_geometry_tilted");
    for &tilt in &[0.1_f64, 0.7, 1.4] {
        let normal = DVec3::new(tilt.sin(), 0.3, tilt.cos());
        group.bench_with_input(BenchmarkId::from_parameter(tilt), &normal, |b, normal| {
            b.iter(|| {
                let geometry =
                    TransitionGeometry::new(params, black_box(DVec3::new(10.0, 20.0, 30.0)), *normal)
                        .expect("Geometrie ungültig");
                black_box(geometry.triangular_panels().len())
            })
        });
    }
    group.finish();
}

/// Ein Vorschau-Tick während der Erzeugung: Geometrie bauen und zeichnen.
fn bench_preview_tick(c: &mut Criterion) {
    let params = reference_params();
    let mut graphics = RecordingGraphics::default();

    c.bench_function("preview_tick_transition", |b| {
        b.iter(|| {
            let geometry = TransitionGeometry::new(params, DVec3::ZERO, black_box(DVec3::Z))
                .expect("Geometrie ungültig");
            graphics.primitives.clear();
            draw_transition_section(&mut graphics, &geometry);
            black_box(graphics.primitives.len())
        })
    });
}

fn bench_plugin_run(c: &mut Criterion) {
    let instance = MemoryInstance::new(
        1,
        ComponentInput::polygon(vec![DVec3::ZERO, DVec3::new(0.0, 0.0, 1000.0)]),
    );
    let plugin = TransitionSectionPlugin::default();

    c.bench_function("plugin_run_transition", |b| {
        b.iter(|| {
            let mut model = MemoryModel::default();
            plugin.run(black_box(&instance), &mut model);
            black_box(model.lofted_plates.len() + model.contour_plates.len())
        })
    });
}

criterion_group!(
    benches,
    bench_geometry_construction,
    bench_preview_tick,
    bench_plugin_run
);
criterion_main!(benches);
