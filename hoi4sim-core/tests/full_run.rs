//! End-to-end runs through the public API.

use hoi4sim_core::testing::EngineBuilder;
use hoi4sim_core::{
    days_between, BuildCount, BuildOrder, ConstructionSite, Date, DefaultHooks, ObjectType,
    PolicyTimeline, SimInputs, GAME_START,
};

#[test]
fn test_mixed_build_order_completes_in_queue_order_per_line() {
    // Two infrastructure levels, then factories at two named sites.
    let mut engine = EngineBuilder::new()
        .civilian(42)
        .military(36)
        .laws(&["volunteer_only", "export_focus", "civilian_economy"])
        .build();
    let inputs = SimInputs {
        build_order: vec![
            BuildOrder::new("Moscow", ObjectType::Infrastructure, BuildCount::Finite(2)),
            BuildOrder::new("Kharkov", ObjectType::CivilianFactory, BuildCount::Finite(2)),
            BuildOrder::generic(ObjectType::MilitaryFactory, BuildCount::Finite(1)),
        ],
        sites: vec![
            ConstructionSite::new("Moscow", 8, Some(5), "SOV").unwrap(),
            ConstructionSite::new("Kharkov", 7, Some(5), "undefined").unwrap(),
        ],
        ..Default::default()
    };
    let log = engine.run(&inputs, &mut DefaultHooks).unwrap();

    assert_eq!(log.completed(ObjectType::Infrastructure), 2);
    assert_eq!(log.completed(ObjectType::CivilianFactory), 2);
    assert_eq!(log.completed(ObjectType::MilitaryFactory), 1);
    assert_eq!(engine.site("Moscow").unwrap().infrastructure(), 10);
    assert_eq!(engine.site("Kharkov").unwrap().slots(), Some(3));

    // Everything drained, so the run quit on its last completion day
    let last = log
        .events()
        .iter()
        .filter_map(|e| match e {
            hoi4sim_core::BuildEvent::Completed { day, .. } => Some(*day),
            _ => None,
        })
        .max()
        .unwrap();
    assert_eq!(log.final_day(), Some(last));
}

#[test]
fn test_war_economy_switch_speeds_up_the_queue() {
    let order = vec![BuildOrder::generic(
        ObjectType::CivilianFactory,
        BuildCount::Finite(3),
    )];
    let switch = PolicyTimeline::new().at(
        Date::new(1936, 3, 1).unwrap(),
        &["war_economy", "construction_1"],
    );

    let mut slow = EngineBuilder::new().build();
    let slow_log = slow
        .run(
            &SimInputs {
                build_order: order.clone(),
                ..Default::default()
            },
            &mut DefaultHooks,
        )
        .unwrap();

    let mut fast = EngineBuilder::new().build();
    let fast_log = fast
        .run(
            &SimInputs {
                build_order: order,
                timeline: switch,
                ..Default::default()
            },
            &mut DefaultHooks,
        )
        .unwrap();

    assert!(fast_log.final_day().unwrap() < slow_log.final_day().unwrap());
}

#[test]
fn test_default_horizon_is_bounded() {
    // An infinite order never drains, so the end date terminates the run.
    let mut engine = EngineBuilder::new().build();
    let inputs = SimInputs {
        build_order: vec![BuildOrder::generic(
            ObjectType::CivilianFactory,
            BuildCount::Infinite,
        )],
        ..Default::default()
    };
    let log = engine.run(&inputs, &mut DefaultHooks).unwrap();

    let horizon = days_between(GAME_START, Date::new(1945, 1, 1).unwrap());
    assert_eq!(log.final_day(), Some(horizon));
    assert!(log.completed(ObjectType::CivilianFactory) > 0);
}
