use ecomap_core::analysis::{AnalysisResult, Tally, ZoneMatch, ZoneSummary};

pub fn print(result: &AnalysisResult, summary: Option<&ZoneSummary>, closest: Option<&[ZoneMatch]>) {
    let stats = &result.stats;

    println!(
        "=== Zone around {}, radius {} km ===\n",
        result.origin, stats.radius_km
    );

    if result.is_empty_zone() {
        println!("  No industrial activity reported in this zone.\n");
    } else {
        println!("  Facilities in zone: {}", stats.count);
        println!(
            "  Trend {}-{}: {:+.1}% ({} t -> {} t)",
            stats.first_year,
            stats.last_year,
            stats.trend,
            fmt_tonnes(stats.first_year_total),
            fmt_tonnes(stats.last_year_total)
        );
        println!(
            "  Top emitters total: {} t",
            fmt_tonnes(stats.top_emitters_total)
        );
    }

    if let Some(ref nearest) = result.nearest {
        println!(
            "  Nearest facility: {} ({:.2} km)",
            nearest.facility.name, nearest.distance_km
        );
    }
    if let (Some(name), Some(total)) = (&stats.regional_name, stats.regional_total) {
        println!("  Region {}: {} t all-time", name, fmt_tonnes(total));
    }
    println!();

    if !result.top_emitters.is_empty() {
        print_pivot(result);
    }

    print_tallies("Categories", &stats.top_categories);
    print_tallies("Residues", &stats.top_residues);

    if let Some(matches) = closest {
        if !matches.is_empty() {
            println!("  Closest in zone:");
            for m in matches {
                println!("    {:<40} {:>8.2} km", m.name, m.distance_km);
            }
            println!();
        }
    }

    if let Some(s) = summary {
        println!("  Summary:");
        for line in s.to_string().lines() {
            println!("    {}", line);
        }
        println!();
    }
}

fn print_pivot(result: &AnalysisResult) {
    println!("  Top emitters (t per year):");

    let widths: Vec<usize> = result
        .top_emitters
        .iter()
        .map(|e| e.name.chars().count().clamp(8, 24))
        .collect();

    print!("    {:<6}", "Year");
    for (e, w) in result.top_emitters.iter().zip(&widths) {
        let label: String = e.name.chars().take(*w).collect();
        print!("  {:>width$}", label, width = *w);
    }
    println!();

    for row in &result.chart_data {
        print!("    {:<6}", row.year);
        for (v, w) in row.values.iter().zip(&widths) {
            print!("  {:>width$}", fmt_tonnes(*v), width = *w);
        }
        println!();
    }

    print!("    {:<6}", "Total");
    for (e, w) in result.top_emitters.iter().zip(&widths) {
        print!("  {:>width$}", fmt_tonnes(e.total_tonnage), width = *w);
    }
    println!("\n");
}

fn print_tallies(title: &str, tallies: &[Tally]) {
    if tallies.is_empty() {
        return;
    }
    println!("  {}:", title);
    let max_name = tallies
        .iter()
        .map(|t| t.name.chars().count())
        .max()
        .unwrap_or(10);
    for t in tallies {
        println!("    {:<width$}  {}", t.name, t.count, width = max_name);
    }
    println!();
}

fn fmt_tonnes(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}
