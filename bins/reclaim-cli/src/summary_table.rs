// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Terminal rendering of the regional rollup.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use reclaim_core::rollup::RegionSummary;

const HEADER: [&str; 8] = [
    "Region",
    "Category",
    "Rows",
    "Volume (t)",
    "Processing",
    "Transport",
    "Benchmark",
    "Net avoided",
];

fn number(value: f64) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

pub fn render(summaries: &[RegionSummary]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(HEADER);

    for summary in summaries {
        table.add_row(vec![
            Cell::new(&summary.region),
            Cell::new(summary.category),
            Cell::new(summary.rows).set_alignment(CellAlignment::Right),
            number(summary.volume),
            number(summary.processing_emissions),
            number(summary.transport_emissions),
            number(summary.benchmark_emissions),
            number(summary.net_avoided()),
        ]);
    }
    table
}
