//! Benchmarks for sorting while dragging through a long list

use std::sync::Arc;
use std::time::Instant;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sortable::{ClientRect, DirectionDelta, DomHost, DragDropSystem, DragId, DropListId, PointerEvent, Vec2};
use sortable_test_utils::MockDom;

const ITEM_HEIGHT: f32 = 30.0;

fn dragging_system(count: usize) -> (DragDropSystem<Arc<MockDom>>, DropListId, Vec<DragId>) {
    let dom = Arc::new(MockDom::new());
    let height = count as f32 * ITEM_HEIGHT;
    let element = dom.append(dom.body(), ClientRect::new(0.0, 0.0, 100.0, height));
    let nodes: Vec<_> = (0..count)
        .map(|index| dom.append(element, ClientRect::new(0.0, index as f32 * ITEM_HEIGHT, 100.0, ITEM_HEIGHT)))
        .collect();

    let mut system = DragDropSystem::new(dom);
    let list = system.create_list(element);
    let items: Vec<_> = nodes.iter().map(|&node| system.create_item(node)).collect();
    system.set_list_items(list, items.clone()).unwrap();

    let now = Instant::now();
    system.pointer_down(items[0], &PointerEvent::mouse(Vec2::new(50.0, 10.0), Some(nodes[0]), now));
    system.pointer_move(&PointerEvent::mouse(Vec2::new(50.0, 20.0), None, now));
    (system, list, items)
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_sweep");

    for count in [10, 100, 500] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let (mut system, _, _) = dragging_system(count);
            let now = Instant::now();
            let bottom = count as f32 * ITEM_HEIGHT;
            b.iter(|| {
                let mut y = 15.0;
                while y < bottom {
                    system.pointer_move(&PointerEvent::mouse(Vec2::new(50.0, black_box(y)), None, now));
                    y += ITEM_HEIGHT;
                }
                while y > 0.0 {
                    system.pointer_move(&PointerEvent::mouse(Vec2::new(50.0, black_box(y)), None, now));
                    y -= ITEM_HEIGHT;
                }
                system.drain_events().count()
            });
        });
    }

    group.finish();
}

fn bench_index_from_pointer(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_from_pointer");

    for count in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let (system, list, items) = dragging_system(count);
            let list = system.list(list).unwrap();
            let pointer = Vec2::new(50.0, count as f32 * ITEM_HEIGHT - 5.0);
            b.iter(|| list.index_from_pointer(items[0], black_box(pointer), Some(DirectionDelta::new(0, 1))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sweep, bench_index_from_pointer);
criterion_main!(benches);
