//! Benchmarks for tool resolution and toolbar population.
//!
//! Measures:
//! - Selector resolution over registries of increasing size
//! - Full toolbar setup with a catch-all group
//! - Repopulation after a registration

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use trellis_test_utils::MockDocument;
use trellis_ui::{
    CommandTool, ToolDescriptor, ToolFactory, ToolGroupConfig, ToolSelector, Toolbar,
    ToolbarConfig, UiContext, tool::selectors,
};

fn build_factory(tool_count: usize) -> ToolFactory {
    let factory = ToolFactory::new();
    for i in 0..tool_count {
        let group = format!("group-{}", i % 8);
        let mut descriptor = ToolDescriptor::new(format!("tool-{}", i), group, |_, _| {
            Box::new(CommandTool::new(|| {}))
        });
        if i % 10 == 0 {
            descriptor = descriptor.manual();
        }
        factory.register(descriptor);
    }
    factory
}

fn bench_get_tools(c: &mut Criterion) {
    let mut group = c.benchmark_group("tools/get_tools");

    for tool_count in [50, 200, 1000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(tool_count),
            &tool_count,
            |b, &count| {
                let factory = build_factory(count);
                let include = selectors(&["*"]);
                let exclude = vec![ToolSelector::group("group-3")];
                let promote = selectors(&["tool-7", "tool-21"]);
                let demote = vec![ToolSelector::group("group-5")];

                b.iter(|| {
                    black_box(factory.get_tools(
                        black_box(&include),
                        black_box(&exclude),
                        black_box(&promote),
                        black_box(&demote),
                    ))
                });
            },
        );
    }

    group.finish();
}

fn bench_toolbar_setup(c: &mut Criterion) {
    let mut group = c.benchmark_group("tools/toolbar_setup");

    for tool_count in [50, 200] {
        group.bench_with_input(
            BenchmarkId::from_parameter(tool_count),
            &tool_count,
            |b, &count| {
                let factory = build_factory(count);
                let ctx = UiContext::new(Arc::new(MockDocument::new()));
                let mut toolbar = Toolbar::new(&ctx, factory, ToolbarConfig::default());

                b.iter(|| {
                    toolbar.setup(vec![
                        ToolGroupConfig::include(vec![ToolSelector::group("group-0")]),
                        ToolGroupConfig::include(vec![ToolSelector::group("group-1")]),
                        ToolGroupConfig::include(vec![ToolSelector::All]),
                    ]);
                    black_box(toolbar.groups().len())
                });
            },
        );
    }

    group.finish();
}

fn bench_repopulate(c: &mut Criterion) {
    c.bench_function("tools/repopulate_after_register", |b| {
        let factory = build_factory(200);
        let ctx = UiContext::new(Arc::new(MockDocument::new()));
        let mut toolbar = Toolbar::new(&ctx, factory.clone(), ToolbarConfig::default());
        toolbar.setup(vec![ToolGroupConfig::include(vec![ToolSelector::All])]);
        let descriptor = ToolDescriptor::new("late", "group-0", |_, _| Box::new(CommandTool::new(|| {})));

        b.iter(|| {
            factory.register(descriptor.clone());
            black_box(toolbar.process_registrations())
        });
    });
}

criterion_group!(benches, bench_get_tools, bench_toolbar_setup, bench_repopulate);
criterion_main!(benches);
