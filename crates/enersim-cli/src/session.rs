//! Line-oriented dashboard session.
//!
//! Each input line either changes one selector (or the simulation inputs)
//! or asks for output. Every change reruns the whole pipeline against the
//! already loaded dataset and prints the refreshed report.

use anyhow::{anyhow, bail, Result};
use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::debug;

use enersim_core::{pipeline, Dataset, FilterCriteria, FilterOptions, Selector, SimulationParams};

use crate::render;

const HELP: &str = "\
Commands:
  set state <UF>             select a state (resets the municipality)
  set municipality <name>    ALL for every municipality
  set category <name>        ALL for every activity category
  set source <name>          ALL for every energy source
  set year <year>            ALL for every year
  set percent <0-100>        share replaced by solar
  set price <value>          price per kWh
  show                       print the dashboard again
  options                    list the available filter values
  help                       this text
  quit                       leave the session
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    State,
    Municipality,
    Category,
    Source,
    Year,
    Percent,
    Price,
}

impl FromStr for Field {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "state" => Field::State,
            "municipality" => Field::Municipality,
            "category" => Field::Category,
            "source" => Field::Source,
            "year" => Field::Year,
            "percent" => Field::Percent,
            "price" => Field::Price,
            other => bail!("unknown field '{other}'"),
        })
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::State => "state",
            Field::Municipality => "municipality",
            Field::Category => "category",
            Field::Source => "source",
            Field::Year => "year",
            Field::Percent => "percent",
            Field::Price => "price",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Set(Field, String),
    Show,
    Options,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let command = match verb.to_ascii_lowercase().as_str() {
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| anyhow!("usage: set <field> <value>"))?;
                SessionCommand::Set(field.parse()?, value.trim().to_string())
            }
            "show" => SessionCommand::Show,
            "options" => SessionCommand::Options,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            other => bail!("unknown command '{other}' (try 'help')"),
        };
        Ok(Some(command))
    }
}

/// Current selection plus the dataset it is applied to.
#[derive(Debug)]
pub struct Session<'d> {
    dataset: &'d Dataset,
    criteria: FilterCriteria,
    params: SimulationParams,
    currency: String,
}

impl<'d> Session<'d> {
    pub fn new(
        dataset: &'d Dataset,
        criteria: FilterCriteria,
        params: SimulationParams,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            dataset,
            criteria,
            params,
            currency: currency.into(),
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Change one input. A rejected value leaves the session untouched.
    pub fn set(&mut self, field: Field, value: &str) -> Result<()> {
        match field {
            Field::State => {
                self.criteria.set_state(value)?;
                self.criteria.municipality = Selector::All;
            }
            Field::Municipality => {
                self.criteria.municipality = Selector::text(value);
            }
            Field::Category => {
                self.criteria.activity_category = Selector::text(value);
            }
            Field::Source => {
                self.criteria.energy_source_type = Selector::text(value);
            }
            Field::Year => {
                self.criteria.year = value
                    .parse()
                    .map_err(|_| anyhow!("'{value}' is not a year"))?;
            }
            Field::Percent => {
                let percentage = parse_number(value)?;
                self.params = SimulationParams::new(percentage, self.params.unit_price_per_kwh)?;
            }
            Field::Price => {
                let price = parse_number(value)?;
                self.params = SimulationParams::new(self.params.percentage, price)?;
            }
        }
        debug!(%field, value, "session input changed");
        Ok(())
    }

    /// Recompute and print every dashboard section.
    pub fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        let snapshot = pipeline::run(self.dataset, &self.criteria, &self.params)?;
        render::render_report(out, &snapshot, self.params.percentage, &self.currency)
    }

    fn render_options<W: Write>(&self, out: &mut W) -> Result<()> {
        let options = FilterOptions::from_dataset(self.dataset, Some(self.criteria.state()));
        render::render_options(out, &options)
    }

    /// Read commands until `quit` or end of input. Bad lines are reported
    /// and the session goes on.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        self.render(out)?;
        for line in input.lines() {
            let line = line?;
            let command = match SessionCommand::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    writeln!(out, "error: {err}")?;
                    continue;
                }
            };
            match command {
                SessionCommand::Set(field, value) => match self.set(field, &value) {
                    Ok(()) => {
                        writeln!(out)?;
                        self.render(out)?;
                    }
                    Err(err) => writeln!(out, "error: {err}")?,
                },
                SessionCommand::Show => self.render(out)?,
                SessionCommand::Options => self.render_options(out)?,
                SessionCommand::Help => write!(out, "{HELP}")?,
                SessionCommand::Quit => break,
            }
            out.flush()?;
        }
        Ok(())
    }
}

fn parse_number(value: &str) -> Result<f64> {
    value
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| anyhow!("'{value}' is not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use enersim_core::Record;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Record::new("SP", "SANTOS", "INDUSTRIA", "GAS", 2019, Some(600.0), Some(200.0)),
            Record::new("SP", "CAMPINAS", "COMERCIO", "GAS", 2020, Some(400.0), Some(300.0)),
            Record::new("RJ", "NITEROI", "INDUSTRIA", "DIESEL", 2020, Some(50.0), None),
        ])
    }

    fn session(dataset: &Dataset) -> Session<'_> {
        Session::new(
            dataset,
            FilterCriteria::for_state("SP").unwrap(),
            SimulationParams::new(30.0, 0.22).unwrap(),
            "R$",
        )
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            SessionCommand::parse("set year 2020").unwrap(),
            Some(SessionCommand::Set(Field::Year, "2020".to_string()))
        );
        assert_eq!(
            SessionCommand::parse("  SET municipality  Sao Paulo ").unwrap(),
            Some(SessionCommand::Set(
                Field::Municipality,
                "Sao Paulo".to_string()
            ))
        );
        assert_eq!(SessionCommand::parse("exit").unwrap(), Some(SessionCommand::Quit));
        assert_eq!(SessionCommand::parse("   ").unwrap(), None);
        assert!(SessionCommand::parse("set year").is_err());
        assert!(SessionCommand::parse("set colour red").is_err());
        assert!(SessionCommand::parse("dance").is_err());
    }

    #[test]
    fn test_state_change_resets_municipality() {
        let data = dataset();
        let mut session = session(&data);
        session.set(Field::Municipality, "santos").unwrap();
        assert_eq!(
            session.criteria().municipality,
            Selector::Only("SANTOS".to_string())
        );
        session.set(Field::State, "rj").unwrap();
        assert_eq!(session.criteria().state(), "RJ");
        assert!(session.criteria().municipality.is_all());
    }

    #[test]
    fn test_rejected_values_keep_previous_state() {
        let data = dataset();
        let mut session = session(&data);
        assert!(session.set(Field::State, "ALL").is_err());
        assert_eq!(session.criteria().state(), "SP");
        assert!(session.set(Field::Percent, "150").is_err());
        assert!(session.set(Field::Price, "cheap").is_err());
        assert!(session.set(Field::Year, "soon").is_err());
        assert_eq!(*session.params(), SimulationParams::new(30.0, 0.22).unwrap());

        session.set(Field::Percent, "12,5").unwrap();
        assert_eq!(session.params().percentage, 12.5);
    }

    #[test]
    fn test_run_recomputes_after_each_change() {
        let data = dataset();
        let mut session = session(&data);
        let input = "set year 2020\nbogus\nset state BA\nquit\nset year 2019\n";
        let mut out = Vec::new();
        session.run(input.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        // initial render covers both SP rows
        assert!(text.contains("Records: 2"));
        assert!(text.contains("year=2020"));
        assert!(text.contains("Records: 1"));
        assert!(text.contains("error: unknown command 'bogus'"));
        assert!(text.contains(render::NO_DATA_NOTICE));
        // nothing after quit is processed
        assert!(!text.contains("year=2019"));
    }
}
