use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use isoroom::core::raster::{MarkerAtlas, SpriteImage};
use isoroom::core::{Canvas, Heightmap, RendererContext, Room};
use isoroom::engine::{FurnitureAsset, FurnitureEngine, FurniturePlacement, StaticFurnitureCatalog};
use isoroom::types::{GridPos, RoomConfiguration, Vec3};
use serde_json::json;

fn heightmap(size: usize) -> String {
    (0..size)
        .map(|y| {
            (0..size)
                .map(|x| match (x, y) {
                    (0, _) | (_, 0) => 'x',
                    _ if x < size / 3 && y < size / 3 => '2',
                    _ => '0',
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_parse(c: &mut Criterion) {
    let text = heightmap(64);
    c.bench_function("heightmap_parse_64", |b| {
        b.iter(|| Heightmap::parse(black_box(&text)))
    });
}

fn bench_rebuild(c: &mut Criterion) {
    let config = RoomConfiguration::new(heightmap(32)).with_door(GridPos::new(1, 5));
    let mut room = Room::new(config, RendererContext::default()).unwrap();

    c.bench_function("room_rebuild_32", |b| {
        b.iter(|| {
            room.update();
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let room = Room::new(RoomConfiguration::new(heightmap(16)), RendererContext::default()).unwrap();
    let atlas = MarkerAtlas {
        marker: SpriteImage::solid(6, 10, 0xffffff),
    };
    let mut canvas = Canvas::new(160, 96);

    c.bench_function("room_render_160x96", |b| {
        b.iter(|| {
            room.render_into(&mut canvas, &[], &atlas);
        })
    });
}

fn bench_furniture_tick(c: &mut Criterion) {
    let property = json!({
        "infos": {"visualization": "furniture_animated"},
        "visualization": {
            "layerCount": 3,
            "directions": [2, 4],
            "animation": {"0": {
                "0": {"frameSequence": [0, 1, 2, 3]},
                "1": {"frameSequence": [0, 1]},
                "2": {"frameSequence": [0]}
            }}
        }
    });
    let mut catalog = StaticFurnitureCatalog::new();
    catalog.insert(
        1,
        FurnitureAsset {
            name: "lamp".into(),
            property: serde_json::from_str(&property.to_string()).unwrap(),
        },
    );
    let mut engine = FurnitureEngine::new(Rc::new(catalog));
    for id in 0..100 {
        engine.place(FurniturePlacement {
            id,
            base_id: 1,
            position: Vec3::new((id % 10) as f64, (id / 10) as f64, 0.0),
            direction: 2,
            state: 0,
        });
    }

    c.bench_function("furniture_tick_100", |b| {
        b.iter(|| {
            engine.tick(black_box(250.0));
        })
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_rebuild,
    bench_render,
    bench_furniture_tick,
);
criterion_main!(benches);
