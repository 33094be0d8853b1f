use enersim_core::*;

const STATES: [&str; 3] = ["SP", "RJ", "MG"];
const MUNICIPALITIES: [&str; 4] = ["SANTOS", "CAMPINAS", "NITEROI", "BETIM"];
const CATEGORIES: [&str; 13] = [
    "AGRO", "COMERCIO", "CONSTRUCAO", "ENERGIA", "INDUSTRIA", "MINERACAO", "PESCA", "PUBLICO",
    "RESIDENCIAL", "SAUDE", "SERVICOS", "TRANSPORTE", "TURISMO",
];
const SOURCES: [&str; 3] = ["DIESEL", "GAS", "CARVAO"];

/// Deterministic pseudo-random table with some missing numeric cells.
fn generated_dataset(rows: usize) -> Dataset {
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };
    (0..rows)
        .map(|_| {
            let pick = next();
            let energy = (pick % 7 != 0).then(|| (pick % 10_000) as f64 / 10.0);
            let co2 = (pick % 5 != 0).then(|| (pick % 3_000) as f64 / 4.0);
            Record::new(
                STATES[(pick % 3) as usize],
                MUNICIPALITIES[((pick >> 8) % 4) as usize],
                CATEGORIES[((pick >> 16) % 13) as usize],
                SOURCES[((pick >> 24) % 3) as usize],
                2015 + ((pick >> 32) % 6) as i32,
                energy,
                co2,
            )
        })
        .collect()
}

fn criteria_grid() -> Vec<FilterCriteria> {
    let mut grid = Vec::new();
    for state in STATES {
        for category in ["ALL", "INDUSTRIA", "TURISMO"] {
            for year in [Selector::All, Selector::Only(2017), Selector::Only(2030)] {
                grid.push(
                    FilterCriteria::for_state(state)
                        .unwrap()
                        .with_activity_category(category)
                        .with_year(year),
                );
            }
        }
        grid.push(
            FilterCriteria::for_state(state)
                .unwrap()
                .with_municipality("santos")
                .with_energy_source_type("gas"),
        );
    }
    grid
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn filtered_records_come_from_dataset_and_satisfy_criteria() {
    let dataset = generated_dataset(500);
    for criteria in criteria_grid() {
        let view = apply(&dataset, &criteria);
        let mut cursor = dataset.records().iter();
        for record in view.iter() {
            assert_eq!(record.state, criteria.state());
            assert!(criteria.municipality.accepts(&record.municipality));
            assert!(criteria.activity_category.accepts(&record.activity_category));
            assert!(criteria.energy_source_type.accepts(&record.energy_source_type));
            assert!(criteria.year.accepts(&record.year));
            // subsequence of the dataset, order preserved
            assert!(cursor.any(|candidate| std::ptr::eq(candidate, record)));
        }
        let expected = dataset.iter().filter(|r| criteria.matches(r)).count();
        assert_eq!(view.len(), expected);
    }
}

#[test]
fn refining_equals_filtering_with_conjunction() {
    let dataset = generated_dataset(400);
    for state in STATES {
        let broad = FilterCriteria::for_state(state).unwrap().with_year(Selector::Only(2018));
        let narrow = broad.clone().with_activity_category("industria");
        let refined = apply(&dataset, &broad).refine(&narrow);
        let direct = apply(&dataset, &narrow);
        assert_eq!(refined.records(), direct.records());

        let again = refined.refine(&narrow);
        assert_eq!(again.records(), direct.records());
    }
}

#[test]
fn summary_totals_follow_missing_value_rules() {
    let dataset = generated_dataset(600);
    for criteria in criteria_grid() {
        let view = apply(&dataset, &criteria);
        let Ok(summary) = summarize(&view) else {
            assert!(view.is_empty());
            continue;
        };

        let present: Vec<f64> = view.iter().filter_map(|r| r.energy_tj).collect();
        match summary.total_energy() {
            None => assert!(present.is_empty()),
            Some(total) => assert!(close(total, present.iter().sum())),
        }

        // by_year: strictly ascending, disjoint, adds up to the view totals
        for pair in summary.by_year.windows(2) {
            assert!(pair[0].year < pair[1].year);
        }
        let rows: usize = summary.by_year.iter().map(|y| y.records).sum();
        assert_eq!(rows, view.len());
        let by_year_energy: f64 = summary.by_year.iter().map(|y| y.total_energy).sum();
        assert!(close(by_year_energy, summary.total_energy().unwrap_or(0.0)));
        let by_year_co2: f64 = summary.by_year.iter().map(|y| y.total_emissions).sum();
        assert!(close(by_year_co2, summary.total_emissions().unwrap_or(0.0)));

        // ranking: bounded, descending, never exceeds the total
        assert!(summary.top_categories.len() <= TOP_CATEGORY_LIMIT);
        for pair in summary.top_categories.windows(2) {
            assert!(pair[0].total_energy >= pair[1].total_energy);
        }
        let ranked: f64 = summary.top_categories.iter().map(|c| c.total_energy).sum();
        assert!(ranked <= summary.total_energy().unwrap_or(0.0) + 1e-6);
    }
}

#[test]
fn ranking_is_truncated_when_many_categories() {
    let dataset = generated_dataset(2_000);
    let criteria = FilterCriteria::for_state("SP").unwrap();
    let summary = summarize(&apply(&dataset, &criteria)).unwrap();
    assert_eq!(summary.top_categories.len(), TOP_CATEGORY_LIMIT);
}

#[test]
fn simulation_bounds_hold_for_every_view() {
    let dataset = generated_dataset(300);
    for criteria in criteria_grid() {
        let Ok(summary) = summarize(&apply(&dataset, &criteria)) else {
            continue;
        };
        let Some(total) = summary.total_energy().filter(|t| *t != 0.0) else {
            assert_eq!(
                simulate(&summary, 30.0, 0.35),
                Err(CoreError::UndefinedSimulation)
            );
            continue;
        };
        for price in [0.22, 0.35] {
            let none = simulate(&summary, 0.0, price).unwrap();
            assert_eq!(none.simulated_energy_tj.value(), 0.0);
            assert_eq!(none.estimated_savings, 0.0);
            if let Some(reduction) = none.estimated_co2_reduction {
                assert_eq!(reduction.value(), 0.0);
            }

            let full = simulate(&summary, 100.0, price).unwrap();
            assert_eq!(full.simulated_energy_tj.value(), total);
        }
    }
}

#[test]
fn five_record_scenario_returns_matching_rows_in_order() {
    let dataset = Dataset::new(vec![
        Record::new("SP", "SANTOS", "INDUSTRIA", "GAS", 2019, Some(1.0), Some(1.0)),
        Record::new("RJ", "NITEROI", "INDUSTRIA", "GAS", 2019, Some(2.0), Some(1.0)),
        Record::new("MG", "BETIM", "COMERCIO", "DIESEL", 2020, Some(3.0), Some(1.0)),
        Record::new("SP", "CAMPINAS", "COMERCIO", "DIESEL", 2021, Some(4.0), Some(1.0)),
        Record::new("BA", "SALVADOR", "SERVICOS", "GAS", 2021, Some(5.0), Some(1.0)),
    ]);
    let criteria = FilterCriteria::for_state("SP")
        .unwrap()
        .with_activity_category("ALL");
    let view = apply(&dataset, &criteria);
    assert_eq!(view.len(), 2);
    assert_eq!(view.records()[0], &dataset.records()[0]);
    assert_eq!(view.records()[1], &dataset.records()[3]);
}

#[test]
fn empty_view_signals_emptiness() {
    let dataset = generated_dataset(50);
    let view = apply(&dataset, &FilterCriteria::for_state("AC").unwrap());
    assert!(view.is_empty());
    assert_eq!(summarize(&view), Err(CoreError::EmptyView));
}

#[test]
fn reference_simulation_figures() {
    let dataset = Dataset::new(vec![
        Record::new("SP", "SANTOS", "INDUSTRIA", "GAS", 2019, Some(600.0), Some(200.0)),
        Record::new("SP", "SANTOS", "COMERCIO", "GAS", 2020, Some(400.0), Some(300.0)),
    ]);
    let summary = summarize(&apply(&dataset, &FilterCriteria::for_state("SP").unwrap())).unwrap();
    let result = simulate(&summary, 30.0, 0.22).unwrap();
    assert!(close(result.simulated_energy_tj.value(), 300.0));
    assert!(close(result.simulated_energy_kwh.value(), 83_333_400.0));
    assert!(close(result.estimated_savings, 18_333_348.0));
    assert!(close(result.estimated_co2_reduction.unwrap().value(), 150.0));
}
