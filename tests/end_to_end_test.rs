//! Classification, filtering and aggregation working together.

use pavemap::aggregation::{aggregate, ByField};
use pavemap::predicate::{ChartSelection, FilterSpec, Predicate};
use pavemap::testkit::{default_model, segment};
use pavemap::{
    Boundaries, Category, CategoryRegistry, ClassMode, ClassRule, ConditionClass, Direction,
    Grouping, Record,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn fixture() -> Vec<Record> {
    vec![
        segment("Fingal County Council")
            .route("R132")
            .flag("IsDublin")
            .iri(2018, 1.8)
            .csc(2018, 0.52)
            .psci(2018, 9.0)
            .build(),
        segment("Cork County Council")
            .route("R600")
            .iri(2018, 2.6)
            .csc(2018, 0.41)
            .psci(2018, 6.0)
            .build(),
        segment("Cork County Council")
            .route("R586")
            .flag("IsCityTown")
            .iri(2018, 7.4)
            .csc(2018, 0.33)
            .psci(2018, 2.0)
            .build(),
        segment("Offaly County Council")
            .route("R400")
            .flag("IsPeat")
            .iri(2018, 5.0)
            .attr("CSC_2018", "")
            .psci(2018, 4.0)
            .build(),
        segment("Kerry County Council")
            .route("R561")
            .flag("IsFormerNa")
            .iri(2018, 3.0)
            .mpd(2018, 0.65)
            .build(),
        segment("O'Brien's Road Council")
            .route("L1010")
            .unflag("IsDublin")
            .iri(2018, 4.1)
            .build(),
    ]
}

#[test]
fn test_region_scenario_reduced_mode() {
    let table = Boundaries::reduced(3.0, 5.0, 7.0);
    let rule = ClassRule::new(Direction::LowerIsBetter, &table);
    let records = vec![
        Record::new().with("region", "A").with("iri", 2.5),
        Record::new().with("region", "A").with("iri", 6.0),
        Record::new().with("region", "B").with("iri", 9.0),
    ];

    let report = aggregate(
        &records,
        &ByField::new("region"),
        &rule,
        "iri",
        ClassMode::Simplified,
    );

    let a = report.get("A").unwrap();
    assert_eq!((a.good, a.fair, a.poor, a.total()), (1, 0, 1, 2));
    assert!((a.percentage(ConditionClass::Poor) - 50.0).abs() < 1e-9);
    let b = report.get("B").unwrap();
    assert_eq!((b.good, b.fair, b.poor, b.total()), (0, 0, 1, 1));
    assert!((b.percentage(ConditionClass::Poor) - 100.0).abs() < 1e-9);
}

#[test]
fn test_dublin_rural_scenario() {
    let registry = CategoryRegistry::new(vec![
        Category::flag("dublin", "Dublin", "IsDublin"),
        Category::default_category("rural", "Rural"),
    ])
    .unwrap();
    let dublin = registry.predicate_for("dublin").unwrap();
    let rural = registry.predicate_for("rural").unwrap();

    let outside = Record::new().with("IsDublin", 0);
    assert!(rural.matches(&outside));
    assert!(!dublin.matches(&outside));

    let inside = Record::new().with("IsDublin", 1);
    assert!(dublin.matches(&inside));
    assert!(!rural.matches(&inside));
}

#[test]
fn test_default_category_completeness() {
    let model = default_model();
    let registry = model.categories();
    let flags: Vec<&str> = registry.flag_fields().collect();
    assert_eq!(flags.len(), 4);

    let none_set = flags.iter().fold(Record::new(), |r, f| r.with(*f, 0));
    let matching: Vec<&str> = registry
        .iter()
        .filter(|(_, p)| p.matches(&none_set))
        .map(|(c, _)| c.key.as_str())
        .collect();
    assert_eq!(matching, vec!["rural"]);

    for set in &flags {
        let record = flags
            .iter()
            .fold(Record::new(), |r, f| r.with(*f, i32::from(f == set)));
        let matching: Vec<&str> = registry
            .iter()
            .filter(|(_, p)| p.matches(&record))
            .map(|(c, _)| c.key.as_str())
            .collect();
        assert_eq!(matching.len(), 1, "flag {}", set);
        assert_ne!(matching[0], "rural");
    }
}

#[test]
fn test_empty_filter_matches_everything() {
    let model = default_model();
    let predicate = model.build_predicate(&FilterSpec::new(2018));
    let records = fixture();
    assert_eq!(predicate.filter(&records).count(), records.len());
}

#[test]
fn test_empty_selection_matches_nothing() {
    let model = default_model();
    let predicate = model.build_selection_predicate(&[], ClassMode::Full);
    assert_eq!(predicate, Predicate::Never);
    assert_eq!(predicate.filter(&fixture()).count(), 0);
}

#[test]
fn test_quoted_region_filter() {
    let model = default_model();
    let spec = FilterSpec::new(2018).with_regions(["O'Brien's Road Council"]);
    let predicate = model.build_predicate(&spec);
    let records = fixture();
    let matched: Vec<_> = predicate.filter(&records).collect();
    assert_eq!(matched.len(), 1);
    assert_eq!(
        predicate.to_string(),
        "LA_NAME = 'O''Brien''s Road Council'"
    );
}

#[test]
fn test_rural_filter_matches_records_without_flags() {
    let model = default_model();
    let spec = FilterSpec::new(2018).with_categories(["rural"]);
    let predicate = model.build_predicate(&spec);
    let records = fixture();
    let regions: Vec<String> = predicate
        .filter(&records)
        .filter_map(|r| r.text("LA_NAME").map(|s| s.into_owned()))
        .collect();
    assert_eq!(
        regions,
        vec!["Cork County Council", "O'Brien's Road Council"]
    );
}

#[test]
fn test_selection_matches_exactly_the_aggregated_records() {
    let model = default_model();
    let records = fixture();
    let report = model
        .aggregate(&records, Grouping::Category, "csc", 2018, ClassMode::Full)
        .unwrap();

    for (key, counts) in &report.groups {
        for &class in ClassMode::Full.classes() {
            let selection = ChartSelection::category(key.as_str(), class, "csc", 2018);
            let predicate = model.build_selection_predicate(&[selection], ClassMode::Full);
            let matched = predicate.filter(&records).count() as u64;
            assert_eq!(matched, counts.get(class), "{} {}", key, class);
        }
    }
}

#[test]
fn test_region_selection_matches_padded_region_names() {
    let model = default_model();
    let records = vec![
        segment("Cork ").iri(2018, 4.0).build(),
        segment("Cork").iri(2018, 4.2).build(),
        segment("Cork").iri(2018, 8.0).build(),
        segment("   ").iri(2018, 4.0).build(),
    ];
    let report = model
        .aggregate(&records, Grouping::Region, "iri", 2018, ClassMode::Full)
        .unwrap();
    assert_eq!(
        report.groups.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["Cork", "Cork "]
    );
    assert_eq!(report.statistics.unresolved_group, 1);

    for (key, counts) in &report.groups {
        for &class in ClassMode::Full.classes() {
            let selection = ChartSelection::region(key.as_str(), class, "iri", 2018);
            let predicate = model.build_selection_predicate(&[selection], ClassMode::Full);
            let matched = predicate.filter(&records).count() as u64;
            assert_eq!(matched, counts.get(class), "{:?} {}", key, class);
        }
    }
}

#[test]
fn test_inverted_kpi_selection_sql() {
    let model = default_model();
    let selection = ChartSelection::region("Cork County Council", ConditionClass::Fair, "csc", 2018);
    let predicate = model.build_selection_predicate(&[selection], ClassMode::Full);
    let sql = predicate.to_string();
    assert!(sql.contains("LA_NAME = 'Cork County Council'"), "{}", sql);
    assert!(sql.contains("CSC_2018 >= 0.4"), "{}", sql);
    assert!(sql.contains("CSC_2018 < 0.45"), "{}", sql);
}

#[test]
fn test_visual_rating_uses_fixed_cut_points() {
    let model = default_model();
    let classify = |v| model.classify("psci", 2018, Some(v), ClassMode::Full).unwrap();
    assert_eq!(classify(10.0), Some(ConditionClass::Best));
    assert_eq!(classify(9.0), Some(ConditionClass::Best));
    assert_eq!(classify(8.0), Some(ConditionClass::Good));
    assert_eq!(classify(5.0), Some(ConditionClass::Fair));
    assert_eq!(classify(3.0), Some(ConditionClass::Poor));
    assert_eq!(classify(1.0), Some(ConditionClass::Worst));
    assert_eq!(classify(0.0), None);
    assert_eq!(classify(11.0), None);
}

#[test]
fn test_missing_values_do_not_count() {
    let model = default_model();
    let records = fixture();
    let report = model
        .aggregate(&records, Grouping::Region, "csc", 2018, ClassMode::Full)
        .unwrap();
    assert_eq!(report.get("Offaly County Council").map(|c| c.total()), Some(0));
    assert_eq!(report.statistics.missing_value, 3);
    assert_eq!(report.statistics.records_classified, 3);
}

fn arb_segment() -> impl Strategy<Value = Record> {
    (
        prop::sample::select(vec!["Cork", "Kerry", "Fingal", "Offaly"]),
        prop::option::of(0.0f64..10.0),
        prop::option::of(0.2f64..0.7),
        0usize..6,
    )
        .prop_map(|(region, iri, csc, flag)| {
            let flags = ["IsDublin", "IsCityTown", "IsPeat", "IsFormerNa"];
            let mut builder = segment(region);
            if let Some(field) = flags.get(flag) {
                builder = builder.flag(field);
            }
            builder
                .attr("AIRI_2018", iri)
                .attr("CSC_2018", csc)
                .build()
        })
}

proptest! {
    #[test]
    fn prop_percentages_close_to_100(records in prop::collection::vec(arb_segment(), 1..150)) {
        let model = default_model();
        for kpi in ["iri", "csc"] {
            let report = model
                .aggregate(&records, Grouping::Category, kpi, 2018, ClassMode::Full)
                .unwrap();
            for counts in report.groups.values() {
                if counts.total() > 0 {
                    prop_assert!((counts.percentages().sum() - 100.0).abs() < 0.1);
                } else {
                    prop_assert_eq!(counts.percentages().sum(), 0.0);
                }
            }
        }
    }

    #[test]
    fn prop_parallel_is_deterministic(records in prop::collection::vec(arb_segment(), 0..150)) {
        let model = default_model();
        for grouping in [Grouping::Region, Grouping::Category] {
            let sequential = model.aggregate(&records, grouping, "iri", 2018, ClassMode::Simplified).unwrap();
            let parallel = model.aggregate_par(&records, grouping, "iri", 2018, ClassMode::Simplified).unwrap();
            prop_assert_eq!(sequential, parallel);
        }
    }

    #[test]
    fn prop_categories_partition_records(record in arb_segment()) {
        let model = default_model();
        let matching = model
            .categories()
            .iter()
            .filter(|(_, p)| p.matches(&record))
            .count();
        prop_assert_eq!(matching, 1);
    }
}
