use anyhow::{Context, Result, bail};
use clap::Args;
use log::info;

use lattice_forge::ops::{find_elements, select_classes, slice_by_names, slice_by_positions};
use lattice_forge::{ElementClass, Lattice};

/// Extracts part of a lattice. Filters combine: range first, then class, then pattern.
#[derive(Debug, Default, Args)]
pub struct SelectArgs {
    /// First element of an inclusive name range.
    #[arg(long, value_name = "NAME", requires = "to")]
    pub from: Option<String>,
    /// Last element of an inclusive name range.
    #[arg(long, value_name = "NAME", requires = "from")]
    pub to: Option<String>,
    /// Keep elements whose centre is at or after this position (m).
    #[arg(long, value_name = "METRES", allow_negative_numbers = true)]
    pub start: Option<f64>,
    /// Keep elements whose centre is before this position (m).
    #[arg(long, value_name = "METRES", allow_negative_numbers = true)]
    pub end: Option<f64>,
    /// Element classes to keep (repeatable), e.g. Quadrupole.
    #[arg(long = "class", value_name = "CLASS")]
    pub classes: Vec<ElementClass>,
    /// Case-insensitive name glob using `*` and `?`.
    #[arg(long, value_name = "GLOB")]
    pub pattern: Option<String>,
}

/// Applies every requested filter and returns the remaining elements as a lattice.
pub fn run(lattice: Lattice, args: &SelectArgs) -> Result<Lattice> {
    let total = lattice.len();
    let mut current = match (&args.from, &args.to) {
        (Some(from), Some(to)) => slice_by_names(&lattice, from, to)
            .with_context(|| format!("Failed to select '{from}'..'{to}'"))?,
        (None, None) => lattice,
        _ => bail!("--from and --to must be given together"),
    };

    if args.start.is_some() || args.end.is_some() {
        let start = args.start.unwrap_or(f64::NEG_INFINITY);
        let end = args.end.unwrap_or(f64::INFINITY);
        if start > end {
            bail!("--start ({start}) lies after --end ({end})");
        }
        current = slice_by_positions(&current, start, end);
    }

    if !args.classes.is_empty() {
        let kept = select_classes(&current, &args.classes)
            .into_iter()
            .cloned()
            .collect();
        current = Lattice::from_sequence(&current.name, kept);
    }

    if let Some(pattern) = &args.pattern {
        let kept = find_elements(&current, pattern)
            .context("Failed to apply name pattern")?
            .into_iter()
            .cloned()
            .collect();
        current = Lattice::from_sequence(&current.name, kept);
    }

    info!("Selected {} of {} elements", current.len(), total);
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use lattice_forge::Element;

    #[derive(Debug, Parser)]
    struct SelectCli {
        #[command(flatten)]
        args: SelectArgs,
    }

    fn ring() -> Lattice {
        Lattice::from_sequence(
            "ring",
            vec![
                Element::marker("ip1").at(0.0),
                Element::quadrupole("mq.1", 1.0, 0.1).at(10.0),
                Element::sextupole("ms.1", 0.3, 1.0).at(12.0),
                Element::quadrupole("mq.2", 1.0, -0.1).at(20.0),
                Element::marker("ip2").at(30.0),
            ],
        )
    }

    #[test]
    fn select_combines_range_class_and_pattern() {
        let args = SelectArgs {
            from: Some("mq.1".to_string()),
            to: Some("ip2".to_string()),
            classes: vec![ElementClass::Quadrupole, ElementClass::Marker],
            pattern: Some("m*".to_string()),
            ..Default::default()
        };
        let selected = run(ring(), &args).unwrap();
        assert_eq!(selected.names(), vec!["mq.1", "mq.2"]);
    }

    #[test]
    fn select_by_open_position_range() {
        let args = SelectArgs {
            start: Some(12.0),
            ..Default::default()
        };
        let selected = run(ring(), &args).unwrap();
        assert_eq!(selected.names(), vec!["ms.1", "mq.2", "ip2"]);
    }

    #[test]
    fn select_rejects_inverted_positions() {
        let args = SelectArgs {
            start: Some(20.0),
            end: Some(10.0),
            ..Default::default()
        };
        assert!(run(ring(), &args).is_err());
    }

    #[test]
    fn negative_positions_parse_as_values() {
        let cli = SelectCli::try_parse_from(["select", "--start", "-5", "--end", "-1.5"]).unwrap();
        assert_eq!(cli.args.start, Some(-5.0));
        assert_eq!(cli.args.end, Some(-1.5));

        let lattice = Lattice::from_sequence(
            "ring",
            vec![
                Element::marker("ip.left").at(-4.0),
                Element::marker("ip").at(0.0),
            ],
        );
        let selected = run(lattice, &cli.args).unwrap();
        assert_eq!(selected.names(), vec!["ip.left"]);
    }
}
