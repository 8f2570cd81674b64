use std::collections::BTreeMap;
use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use prettytable::{Table, format, row};

use lattice_forge::{ElementClass, Lattice};

/// Report-only command that inspects a lattice and mirrors the input stream.
#[derive(Debug, Default, Args)]
pub struct InfoArgs {
    /// Also list every element with its start, centre and end positions.
    #[arg(long)]
    pub elements: bool,
}

/// Computes and prints lattice statistics without mutating the lattice.
pub fn run(lattice: &Lattice, args: &InfoArgs) -> Result<()> {
    let reports = collect_class_reports(lattice);
    let summary = LatticeSummary::from_lattice(lattice);

    let mut stderr = io::stderr().lock();

    print_boxed_label(&mut stderr, "LatticeForge Lattice Report")?;
    writeln!(&mut stderr)?;

    let mut class_table = Table::new();
    print_boxed_label(&mut stderr, "Class Breakdown")?;
    class_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    class_table.set_titles(row!["Class", "Count", "Length (m)"]);
    for report in &reports {
        class_table.add_row(row![
            report.class,
            report.count,
            format!("{:.6}", report.length)
        ]);
    }
    class_table
        .print(&mut stderr)
        .context("Failed to render class breakdown")?;
    writeln!(&mut stderr)?;

    if args.elements {
        let mut element_table = Table::new();
        print_boxed_label(&mut stderr, "Elements")?;
        element_table.set_format(*format::consts::FORMAT_BOX_CHARS);
        element_table.set_titles(row!["Name", "Class", "Start (m)", "Centre (m)", "End (m)"]);
        for element in lattice {
            element_table.add_row(row![
                element.name,
                element.class(),
                format!("{:.6}", element.position.start()),
                format!("{:.6}", element.position.position()),
                format!("{:.6}", element.position.end())
            ]);
        }
        element_table
            .print(&mut stderr)
            .context("Failed to render element listing")?;
        writeln!(&mut stderr)?;
    }

    let mut summary_table = Table::new();
    print_boxed_label(&mut stderr, "Lattice Summary")?;
    summary_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    summary_table.set_titles(row!["Metric", "Value"]);
    summary_table.add_row(row!["Name", lattice.name]);
    summary_table.add_row(row!["Elements", lattice.len()]);
    summary_table.add_row(row!["Thick / Thin", format!("{} / {}", summary.thick, summary.thin)]);
    summary_table.add_row(row!["Total Length (m)", format!("{:.6}", summary.total_length)]);
    summary_table.add_row(row!["Drift Length (m)", format!("{:.6}", summary.drift_length)]);
    summary_table.add_row(row!["Magnets", summary.magnets]);
    summary_table
        .print(&mut stderr)
        .context("Failed to render lattice summary")?;

    Ok(())
}

fn collect_class_reports(lattice: &Lattice) -> Vec<ClassReport> {
    let mut lengths: BTreeMap<ElementClass, f64> = BTreeMap::new();
    for element in lattice {
        *lengths.entry(element.class()).or_insert(0.0) += element.length();
    }

    lattice
        .count_by_class()
        .into_iter()
        .map(|(class, count)| ClassReport {
            class,
            count,
            length: lengths.get(&class).copied().unwrap_or(0.0),
        })
        .collect()
}

fn print_boxed_label<W: Write>(writer: &mut W, title: &str) -> io::Result<()> {
    let inner = format!(" {title} ");
    let width = inner.chars().count();
    writeln!(writer, "╭{}╮", "─".repeat(width))?;
    writeln!(writer, "│{}│", inner)?;
    writeln!(writer, "╰{}╯", "─".repeat(width))?;
    Ok(())
}

#[derive(Debug)]
struct ClassReport {
    class: ElementClass,
    count: usize,
    length: f64,
}

#[derive(Debug, Default)]
struct LatticeSummary {
    thick: usize,
    thin: usize,
    magnets: usize,
    total_length: f64,
    drift_length: f64,
}

impl LatticeSummary {
    fn from_lattice(lattice: &Lattice) -> Self {
        let mut summary = Self {
            total_length: lattice.total_length(),
            ..Default::default()
        };
        for element in lattice {
            if element.is_thick() {
                summary.thick += 1;
            } else {
                summary.thin += 1;
            }
            if element.class().is_magnet() {
                summary.magnets += 1;
            }
            if element.is_drift() {
                summary.drift_length += element.length();
            }
        }
        summary
    }
}
