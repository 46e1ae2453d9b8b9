//! Animated bar chart over the in-memory recording surface.
//!
//! Run with `cargo run --example bar_chart`.

use keyflow::core::{Key, Snapshot, Value};
use keyflow::render::{Element, RecordingSurface, TargetId, Template};
use keyflow::transition::TransitionSpec;
use keyflow::{target_state, NodeGroup, NodeGroupBuilder};
use std::sync::Arc;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);
const BAR_WIDTH: f64 = 30.0;

#[derive(Clone, Debug)]
struct Bar {
    name: &'static str,
    value: f64,
}

fn bars(values: &[(&'static str, f64)]) -> Arc<[Bar]> {
    values
        .iter()
        .map(|&(name, value)| Bar { name, value })
        .collect::<Vec<_>>()
        .into()
}

fn number(state: &Snapshot, name: &str) -> Value {
    state.get(name).cloned().unwrap_or(Value::from(0))
}

fn template() -> Template<Bar> {
    Element::new("g")
        .attr("class", "bar")
        .dynamic("transform", |s: &Snapshot, _: &Bar, _: &Key, _| {
            Value::from(format!("translate({},0)", number(s, "x")))
        })
        .dynamic("opacity", |s: &Snapshot, _: &Bar, _: &Key, _| number(s, "opacity"))
        .child(
            Element::new("rect")
                .attr("width", BAR_WIDTH - 2.0)
                .dynamic("height", |s: &Snapshot, _: &Bar, _: &Key, _| number(s, "height")),
        )
        .child(Element::new("text").child(Template::dynamic_text(
            |_: &Snapshot, bar: &Bar, _: &Key, _| Value::from(bar.name),
        )))
        .into()
}

fn print_frame(group: &NodeGroup<Bar, RecordingSurface>, label: &str) {
    let surface = group.surface();
    let rendered: Vec<String> = surface
        .children(surface.root())
        .into_iter()
        .map(|g: TargetId| {
            let rect = surface.children(g).first().copied();
            let height = rect
                .and_then(|r| surface.attribute(r, "height"))
                .map(ToString::to_string)
                .unwrap_or_default();
            let opacity = surface
                .attribute(g, "opacity")
                .map(ToString::to_string)
                .unwrap_or_default();
            format!("{g}[h={height} o={opacity}]")
        })
        .collect();
    println!("{label:>10}: {}", rendered.join(" "));
}

fn run(group: &mut NodeGroup<Bar, RecordingSurface>, data: Arc<[Bar]>, label: &str) {
    if let Err(err) = group.set_data(data) {
        eprintln!("rejected update: {err}");
        return;
    }
    let mut frame = 0;
    loop {
        let report = group.tick(FRAME);
        frame += 1;
        for key in &report.retired {
            println!("{:>10}  retired {key}", "");
        }
        if frame % 4 == 0 || !report.running {
            print_frame(group, &format!("{label} {frame}"));
        }
        if !report.running {
            break;
        }
    }
}

fn main() {
    let surface = RecordingSurface::new();
    let container = surface.root();

    let group = NodeGroupBuilder::new()
        .key(|bar: &Bar, _| Key::from(bar.name))
        .start(|_: &Bar, i| {
            Snapshot::new()
                .with("x", i as f64 * BAR_WIDTH)
                .with("height", 0.0)
                .with("opacity", 0.0)
        })
        .enter(|bar: &Bar, _| {
            TransitionSpec::chain([
                target_state! { "opacity" => [1.0] }.duration(Duration::from_millis(80)),
                target_state! { "height" => [bar.value] },
            ])
        })
        .update(|bar: &Bar, i| {
            target_state! {
                "x" => [i as f64 * BAR_WIDTH],
                "height" => [bar.value],
            }
        })
        .leave(|_: &Bar, _| {
            target_state! { "height" => [0.0], "opacity" => [0.0] }
                .duration(Duration::from_millis(120))
        })
        .template(template())
        .namespace("svg")
        .duration(Duration::from_millis(160))
        .build(surface, container);

    let mut group = match group {
        Ok(group) => group,
        Err(err) => {
            eprintln!("failed to build group: {err}");
            return;
        }
    };

    run(
        &mut group,
        bars(&[("apples", 40.0), ("pears", 75.0), ("plums", 20.0)]),
        "enter",
    );
    run(
        &mut group,
        bars(&[("pears", 30.0), ("plums", 90.0), ("figs", 55.0)]),
        "update",
    );
    run(&mut group, bars(&[("figs", 10.0)]), "shrink");

    let duplicate = bars(&[("figs", 1.0), ("figs", 2.0)]);
    run(&mut group, duplicate, "dupes");

    let released = group.teardown();
    println!("teardown: {} interrupted", released.len());
}
