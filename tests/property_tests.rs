//! Property-based tests for costctl
//!
//! Random workload edits, request building, routing, and result
//! interpretation checked with proptest.

use costctl::interpret::{discount_badge, interpret_single_results};
use costctl::model::{Component, OperatingSystem, PaymentOption, Region, SingleInstanceResult};
use costctl::provider::{endpoint, Operation, Provider};
use costctl::validation::{build_fleet_request, INCOMPLETE_COMPONENTS_MESSAGE};
use costctl::workload::WorkloadForm;
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Edit {
    AddApp,
    RemoveApp(usize),
    AddComponent(usize),
    RemoveComponent(usize, usize),
    Rename(usize, String),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        Just(Edit::AddApp),
        (0usize..6).prop_map(Edit::RemoveApp),
        (0usize..6).prop_map(Edit::AddComponent),
        (0usize..6, 0usize..6).prop_map(|(a, c)| Edit::RemoveComponent(a, c)),
        (0usize..6, "[a-z]{1,8}").prop_map(|(a, label)| Edit::Rename(a, label)),
    ]
}

fn apply(form: &WorkloadForm, edit: &Edit) -> WorkloadForm {
    match edit {
        Edit::AddApp => form.add_app(),
        Edit::RemoveApp(a) => form.remove_app(*a),
        Edit::AddComponent(a) => form.add_component(*a),
        Edit::RemoveComponent(a, c) => form.remove_component(*a, *c),
        Edit::Rename(a, label) => match form.app(*a) {
            Some(app) => {
                let mut renamed = app.clone();
                renamed.app = label.clone();
                form.update_app(*a, renamed)
            }
            None => form.clone(),
        },
    }
}

fn complete(form: &WorkloadForm) -> WorkloadForm {
    let mut filled = form.clone();
    for (a, app) in form.apps().iter().enumerate() {
        for c in 0..app.components.len() {
            filled = filled.update_component(a, c, Component::new(format!("c{}-{}", a, c), 1, 1));
        }
    }
    filled
}

proptest! {
    #[test]
    fn test_form_never_drops_below_one(edits in prop::collection::vec(edit(), 0..40)) {
        let form = edits.iter().fold(WorkloadForm::default(), |form, e| apply(&form, e));
        prop_assert!(form.len() >= 1);
        for app in form.apps() {
            prop_assert!(!app.components.is_empty());
        }
    }

    #[test]
    fn test_request_apps_always_positional(edits in prop::collection::vec(edit(), 0..40)) {
        let form = complete(&edits.iter().fold(WorkloadForm::default(), |form, e| apply(&form, e)));
        let request = build_fleet_request(
            OperatingSystem::Linux,
            PaymentOption::Spot,
            Region::all(),
            form.apps(),
        ).unwrap();

        prop_assert_eq!(request.apps.len(), form.len());
        for (i, app) in request.apps.iter().enumerate() {
            prop_assert_eq!(&app.app, &format!("App{}", i + 1));
            prop_assert!(!app.components.is_empty());
        }
    }

    #[test]
    fn test_any_incomplete_component_is_rejected(
        apps in 1usize..5,
        target in 0usize..5,
        missing in 0u8..3,
    ) {
        let mut form = WorkloadForm::default();
        for _ in 1..apps {
            form = form.add_app();
        }
        form = complete(&form);
        let target = target % apps;
        let broken = match missing {
            0 => Component::new("", 2, 4),
            1 => Component::new("web", 0, 4),
            _ => Component::new("web", 2, 0),
        };
        form = form.update_component(target, 0, broken);

        let err = build_fleet_request(
            OperatingSystem::Linux,
            PaymentOption::Spot,
            Region::all(),
            form.apps(),
        ).unwrap_err();
        prop_assert_eq!(err.user_message(), INCOMPLETE_COMPONENTS_MESSAGE);
    }

    #[test]
    fn test_discount_badge_iff_positive(discount in -100.0f64..100.0) {
        let badge = discount_badge(discount);
        prop_assert_eq!(badge.is_some(), discount > 0.0);
        if let Some(text) = badge {
            prop_assert!(text.ends_with("% discount"));
        }
    }

    #[test]
    fn test_single_results_keep_server_order(
        prices in prop::collection::vec(0.0f64..10.0, 0..50),
        limit in 1usize..30,
    ) {
        let raw: Vec<SingleInstanceResult> = prices
            .iter()
            .enumerate()
            .map(|(i, price)| SingleInstanceResult {
                type_name: format!("t{}", i),
                region: "us-east-1".to_string(),
                cpu: "2".to_string(),
                memory: "4".to_string(),
                network: String::new(),
                os: "linux".to_string(),
                type_major: "t".to_string(),
                type_minor: i.to_string(),
                on_demand_price: *price,
                spot_price: *price,
                discount: 0.0,
                total_price: *price,
                interruption_frequency: None,
            })
            .collect();

        let set = interpret_single_results(raw, limit);
        prop_assert_eq!(set.is_no_matches(), prices.is_empty());
        prop_assert_eq!(set.items().len(), prices.len().min(limit));
        for (i, item) in set.items().iter().enumerate() {
            prop_assert_eq!(&item.type_name, &format!("t{}", i));
            prop_assert_eq!(item.total_price, prices[i]);
        }
    }
}

#[test]
fn test_routing_is_injective() {
    let mut seen = HashSet::new();
    for provider in Provider::ALL {
        for operation in Operation::ALL {
            assert!(seen.insert(endpoint(provider, operation)));
        }
    }
    assert_eq!(seen.len(), 6);
}
