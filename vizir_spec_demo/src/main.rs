// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Example binary for `vizir_spec`.
//!
//! Run with `RUST_LOG=vizir_spec=trace` to see layering decisions and global property conflicts.

use tracing_subscriber::EnvFilter;
use vizir_spec::{
    Document, Fragment, LayoutProps, MarkType, Node, Panel, PropertyBag, ResolveMode,
    SharedProps, SingleView, SpecError, View,
};

fn main() -> Result<(), SpecError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let encoding = Node::map([
        ("x", Node::map([("field", "month"), ("type", "ordinal")])),
        ("y", Node::map([("field", "sales"), ("type", "quantitative")])),
    ]);
    let bars = View::from(
        SingleView::new(MarkType::Bar)
            .with_data("sales.csv")
            .with_encoding(encoding.clone()),
    );
    let line = View::from(
        SingleView::new(MarkType::Line)
            .with_data("sales.csv")
            .with_encoding(encoding),
    );

    println!("merge: bars × title");
    let title = Fragment::from(SharedProps::from_pairs([("title", "Monthly sales")])?);
    let titled = bars.merge_fragment(&title)?;
    print_outline(&titled, 1);

    println!("layer: bars + line");
    let combo = (&bars + &line)?.resolve_scale("y", ResolveMode::Independent)?;
    print_outline(&combo, 1);

    println!("facet: bars per region");
    let facet = View::from(
        Panel::from(SingleView::new(MarkType::Bar)).facet(Node::map([("row", "region")])),
    );
    let faceted = bars.merge(&facet)?;
    let spacing = Fragment::from(LayoutProps::from_pairs([("spacing", 8)])?);
    print_outline(&faceted.merge_fragment(&spacing)?, 1);

    println!("concat: row, column and grid");
    print_outline(&(&titled | &combo), 1);
    print_outline(&(&titled & &combo), 1);
    let grid = View::grid([
        [bars.clone(), line.clone()],
        [line.clone(), bars.clone()],
    ])?;
    print_outline(&grid, 1);

    println!("document: conflicting backgrounds");
    let light = Document::new(bars).with("background", "white")?;
    let dark = Document::new(line).with("background", "black")?;
    let (doc, conflicts) = light.layer_with_conflicts(&dark)?;
    tracing::debug!(conflicts = conflicts.len(), "layered documents");
    for conflict in &conflicts {
        println!("  warning: {conflict}");
    }
    print_outline(&doc.canonicalize().root, 1);

    if let Err(err) = &faceted + &combo {
        println!("error: {err}");
    }
    if let Err(err) = &combo * &combo {
        println!("error: {err}");
    }

    Ok(())
}

fn print_outline(view: &View, depth: usize) {
    let indent = "  ".repeat(depth);
    let mut line = format!("{indent}{}", view.kind());
    for &name in view.fields() {
        if matches!(name, "encoding" | "facet" | "repeat") {
            continue;
        }
        if let Ok(value) = view.get(name)
            && value.is_present()
        {
            line.push_str(&format!(" {name}={value}"));
        }
    }
    println!("{line}");

    match view {
        View::Single(_) => {}
        View::Layer(layer) => {
            for member in &layer.stack {
                print_outline(&View::from(member.clone()), depth + 1);
            }
        }
        View::Facet(facet) => print_outline(&View::from((*facet.inner).clone()), depth + 1),
        View::Repeat(repeat) => print_outline(&View::from((*repeat.inner).clone()), depth + 1),
        View::Concat(concat) => {
            for member in &concat.members {
                print_outline(member, depth + 1);
            }
        }
    }
}
