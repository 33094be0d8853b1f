//! Plain-text and JSON rendering of the dashboard sections.
//!
//! Plain output mirrors the dashboard: labelled metrics with two decimals,
//! kWh and money with thousands separators, tables through tabwriter.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use tabwriter::TabWriter;

use enersim_core::{
    AggregateSummary, ComparisonBar, FilterCriteria, FilterOptions, FilteredView, Record,
    SimulationOutcome, SimulationResult, Snapshot, ALL_SENTINEL,
};

pub const NO_DATA_NOTICE: &str = "No data found for the selected filters.";
pub const UNDEFINED_NOTICE: &str =
    "Simulation undefined: total energy consumption is zero or has no data.";

/// Format with a fixed number of decimals and comma thousands separators.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3);
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }

    let is_zero = formatted.bytes().all(|b| b == b'0' || b == b'.');
    if value.is_sign_negative() && !is_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn metric(value: Option<f64>) -> String {
    value.map_or_else(|| "no data".to_string(), |v| format!("{v:.2}"))
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("serializing output to JSON")?;
    writeln!(out)?;
    Ok(())
}

pub fn render_criteria<W: Write>(out: &mut W, criteria: &FilterCriteria) -> Result<()> {
    writeln!(out, "Filters: {criteria}")?;
    Ok(())
}

pub fn render_options<W: Write>(out: &mut W, options: &FilterOptions) -> Result<()> {
    let years: Vec<String> = options.years.iter().map(i32::to_string).collect();
    let lists: [(&str, &[String]); 5] = [
        ("States", &options.states),
        ("Municipalities", &options.municipalities),
        ("Activity categories", &options.activity_categories),
        ("Energy sources", &options.energy_source_types),
        ("Years", &years),
    ];
    for (label, values) in lists {
        if label == "Municipalities" && values.is_empty() {
            continue;
        }
        writeln!(out, "{label}:")?;
        if label != "States" {
            writeln!(out, "  {ALL_SENTINEL}")?;
        }
        for value in values {
            writeln!(out, "  {value}")?;
        }
    }
    Ok(())
}

pub fn render_records<W: Write>(out: &mut W, view: &FilteredView<'_>, limit: Option<usize>) -> Result<()> {
    let shown = limit.unwrap_or(view.len()).min(view.len());
    let mut writer = TabWriter::new(Vec::new()).padding(2);
    writeln!(
        writer,
        "STATE\tMUNICIPALITY\tCATEGORY\tSOURCE\tYEAR\tENERGY (TJ)\tCO2 (t)"
    )?;
    for record in view.iter().take(shown) {
        write_record_row(&mut writer, record)?;
    }
    writer.flush()?;
    out.write_all(&writer.into_inner().context("flushing table")?)?;
    if shown < view.len() {
        writeln!(out, "... {} more row(s)", view.len() - shown)?;
    }
    writeln!(out, "{} record(s)", view.len())?;
    Ok(())
}

fn write_record_row<W: Write>(writer: &mut W, record: &Record) -> Result<()> {
    writeln!(
        writer,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
        record.state,
        record.municipality,
        record.activity_category,
        record.energy_source_type,
        record.year,
        optional(record.energy_tj),
        optional(record.co2_emissions),
    )?;
    Ok(())
}

pub fn render_summary<W: Write>(out: &mut W, summary: &AggregateSummary) -> Result<()> {
    writeln!(out, "Summary")?;
    let mut writer = TabWriter::new(Vec::new()).padding(2);
    writeln!(writer, "  Total energy (TJ)\t{}", metric(summary.total_energy()))?;
    writeln!(writer, "  Total CO2 emissions (t)\t{}", metric(summary.total_emissions()))?;
    writeln!(writer, "  Mean energy (TJ)\t{}", metric(summary.mean_energy()))?;
    writeln!(writer, "  Max energy (TJ)\t{}", metric(summary.max_energy()))?;
    writeln!(writer, "  Min energy (TJ)\t{}", metric(summary.min_energy()))?;
    writer.flush()?;
    out.write_all(&writer.into_inner().context("flushing table")?)?;

    writeln!(out)?;
    writeln!(out, "Trend by year")?;
    let mut writer = TabWriter::new(Vec::new()).padding(2);
    writeln!(writer, "YEAR\tENERGY (TJ)\tCO2 (t)\tRECORDS")?;
    for year in &summary.by_year {
        writeln!(
            writer,
            "{}\t{:.2}\t{:.2}\t{}",
            year.year, year.total_energy, year.total_emissions, year.records
        )?;
    }
    writer.flush()?;
    out.write_all(&writer.into_inner().context("flushing table")?)?;

    writeln!(out)?;
    writeln!(out, "Top categories by energy")?;
    let mut writer = TabWriter::new(Vec::new()).padding(2);
    writeln!(writer, "RANK\tCATEGORY\tENERGY (TJ)")?;
    for (rank, category) in summary.top_categories.iter().enumerate() {
        writeln!(
            writer,
            "{}\t{}\t{:.2}",
            rank + 1,
            category.category,
            category.total_energy
        )?;
    }
    writer.flush()?;
    out.write_all(&writer.into_inner().context("flushing table")?)?;
    Ok(())
}

pub fn render_comparison<W: Write>(out: &mut W, bars: &[ComparisonBar]) -> Result<()> {
    writeln!(out, "Consumption vs emissions")?;
    let mut writer = TabWriter::new(Vec::new()).padding(2);
    for bar in bars {
        writeln!(writer, "  {}\t{:.2}", bar.indicator, bar.value)?;
    }
    writer.flush()?;
    out.write_all(&writer.into_inner().context("flushing table")?)?;
    Ok(())
}

pub fn render_simulation<W: Write>(
    out: &mut W,
    outcome: &SimulationOutcome,
    percentage: f64,
    currency: &str,
) -> Result<()> {
    writeln!(out, "Solar simulation ({percentage}% of consumption replaced)")?;
    match outcome {
        SimulationOutcome::Computed(result) => render_simulation_result(out, result, currency),
        SimulationOutcome::Undefined => {
            writeln!(out, "  {UNDEFINED_NOTICE}")?;
            Ok(())
        }
    }
}

fn render_simulation_result<W: Write>(
    out: &mut W,
    result: &SimulationResult,
    currency: &str,
) -> Result<()> {
    writeln!(
        out,
        "  Solar generation: {:.2} TJ ({} kWh)",
        result.simulated_energy_tj.value(),
        format_thousands(result.simulated_energy_kwh.value(), 0)
    )?;
    writeln!(
        out,
        "  Estimated savings: {currency} {}",
        format_thousands(result.estimated_savings, 2)
    )?;
    match result.estimated_co2_reduction {
        Some(reduction) => writeln!(
            out,
            "  Estimated CO2 reduction: {} t",
            format_thousands(reduction.value(), 2)
        )?,
        None => writeln!(out, "  Estimated CO2 reduction: no emission data")?,
    }
    Ok(())
}

/// Every section of the dashboard for one snapshot.
pub fn render_report<W: Write>(
    out: &mut W,
    snapshot: &Snapshot<'_>,
    percentage: f64,
    currency: &str,
) -> Result<()> {
    render_criteria(out, &snapshot.criteria)?;
    writeln!(out, "Records: {}", snapshot.view.len())?;
    writeln!(out)?;

    let (Some(summary), Some(simulation)) = (&snapshot.summary, &snapshot.simulation) else {
        writeln!(out, "{NO_DATA_NOTICE}")?;
        return Ok(());
    };
    render_summary(out, summary)?;
    writeln!(out)?;
    render_comparison(out, &snapshot.totals_comparison())?;
    writeln!(out)?;
    render_simulation(out, simulation, percentage, currency)?;
    Ok(())
}

/// JSON document for `report`.
#[derive(Debug, Serialize)]
pub struct ReportPayload<'a> {
    pub criteria: &'a FilterCriteria,
    pub record_count: usize,
    pub summary: Option<&'a AggregateSummary>,
    pub totals_comparison: Vec<ComparisonBar>,
    pub simulation: Option<&'a SimulationOutcome>,
}

impl<'a> ReportPayload<'a> {
    pub fn from_snapshot(snapshot: &'a Snapshot<'_>) -> Self {
        Self {
            criteria: &snapshot.criteria,
            record_count: snapshot.view.len(),
            summary: snapshot.summary.as_ref(),
            totals_comparison: snapshot.totals_comparison(),
            simulation: snapshot.simulation.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enersim_core::{pipeline, Dataset, SimulationParams};

    fn render_to_string(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(83_333_400.0, 0), "83,333,400");
        assert_eq!(format_thousands(18_333_348.0, 2), "18,333,348.00");
        assert_eq!(format_thousands(999.0, 2), "999.00");
        assert_eq!(format_thousands(1000.0, 0), "1,000");
        assert_eq!(format_thousands(-1234.5, 1), "-1,234.5");
        assert_eq!(format_thousands(-0.001, 2), "0.00");
        assert_eq!(format_thousands(0.0, 0), "0");
    }

    #[test]
    fn test_report_sections() {
        let dataset = Dataset::new(vec![
            Record::new("SP", "SANTOS", "INDUSTRIA", "GAS", 2019, Some(600.0), Some(200.0)),
            Record::new("SP", "SANTOS", "COMERCIO", "GAS", 2020, Some(400.0), Some(300.0)),
        ]);
        let criteria = FilterCriteria::for_state("SP").unwrap();
        let params = SimulationParams::new(30.0, 0.22).unwrap();
        let snapshot = pipeline::run(&dataset, &criteria, &params).unwrap();
        let text = render_to_string(|out| render_report(out, &snapshot, 30.0, "R$"));

        assert!(text.contains("Records: 2"));
        assert!(text.contains("1000.00"));
        assert!(text.contains("Trend by year"));
        assert!(text.contains("INDUSTRIA"));
        assert!(text.contains("83,333,400 kWh"));
        assert!(text.contains("R$ 18,333,348.00"));
        assert!(text.contains("150.00 t"));
    }

    #[test]
    fn test_empty_report_shows_notice_only() {
        let dataset = Dataset::new(vec![Record::new("SP", "SANTOS", "A", "B", 2019, Some(1.0), None)]);
        let criteria = FilterCriteria::for_state("RJ").unwrap();
        let params = SimulationParams::new(30.0, 0.35).unwrap();
        let snapshot = pipeline::run(&dataset, &criteria, &params).unwrap();
        let text = render_to_string(|out| render_report(out, &snapshot, 30.0, "R$"));
        assert!(text.contains(NO_DATA_NOTICE));
        assert!(!text.contains("Summary"));
        assert!(!text.contains("Solar simulation"));
    }

    #[test]
    fn test_undefined_simulation_notice() {
        let text = render_to_string(|out| {
            render_simulation(out, &SimulationOutcome::Undefined, 30.0, "R$")
        });
        assert!(text.contains(UNDEFINED_NOTICE));
        assert!(!text.contains("NaN"));
        assert!(!text.contains("inf"));
    }

    #[test]
    fn test_options_listing() {
        let options = FilterOptions {
            states: vec!["RJ".into(), "SP".into()],
            municipalities: Vec::new(),
            activity_categories: vec!["INDUSTRIA".into()],
            energy_source_types: vec!["GAS".into()],
            years: vec![2019, 2020],
        };
        let text = render_to_string(|out| render_options(out, &options));
        assert!(text.starts_with("States:\n  RJ\n  SP\n"));
        assert!(!text.contains("Municipalities"));
        assert!(text.contains("Years:\n  ALL\n  2019\n  2020\n"));
    }
}
