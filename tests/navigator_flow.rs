//! End-to-end navigator behaviour against an in-memory backend.

mod common;

use common::{sample_problems, RecordingSurface, ScriptedBackend};
use pretty_assertions::assert_eq;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use treemap_navigator::navigator_core::{
    dimensions, EffectSet, Level, NavigationEntry, ParentKey, QueryDescriptor, VisualizationMode,
};
use treemap_navigator::{
    DiagramRequest, DisplayError, DisplayState, FetchError, NavEvent, Navigator, NavigatorConfig,
};

fn navigator(backend: &Arc<ScriptedBackend>) -> Navigator<RecordingSurface> {
    let (navigator, _handle) = Navigator::new(
        &NavigatorConfig::default(),
        backend.clone(),
        RecordingSurface::default(),
    );
    navigator
}

async fn started(backend: &Arc<ScriptedBackend>) -> Navigator<RecordingSurface> {
    let mut nav = navigator(backend);
    nav.dispatch(NavEvent::Start);
    nav.settle().await;
    nav
}

async fn click(nav: &mut Navigator<RecordingSurface>, raw_id: &str) {
    nav.dispatch(NavEvent::ElementClicked {
        raw_id: raw_id.to_string(),
    });
    nav.settle().await;
}

fn displayed_mode(nav: &Navigator<RecordingSurface>) -> String {
    let markup = nav.controller().diagram().unwrap().markup();
    let start = markup.find("data-mode=\"").unwrap() + "data-mode=\"".len();
    let end = start + markup[start..].find('"').unwrap();
    markup[start..end].to_string()
}

#[tokio::test]
async fn initial_load_requests_root_diagram_exactly_once() {
    let backend = ScriptedBackend::new();
    let nav = started(&backend).await;

    assert_eq!(
        backend.diagram_requests(),
        vec![DiagramRequest {
            level: Level::Site,
            parent_key: ParentKey::root(),
            filters: QueryDescriptor::default(),
            mode: VisualizationMode::Squarified,
        }]
    );
    assert_eq!(backend.option_requests.load(Ordering::SeqCst), 1);

    let controller = nav.controller();
    assert_eq!(controller.diagram().unwrap().elements().len(), 2);
    assert_eq!(
        controller
            .filter_options()
            .values(dimensions::WORK_REQUEST_STATUS)
            .len(),
        2
    );
    assert_eq!(
        controller
            .filter_options()
            .values(dimensions::TIME_TO_COMPLETE)
            .len(),
        3
    );
    assert!(nav.surface().frames[0].loading);
}

#[tokio::test]
async fn drill_down_uses_raw_element_ids_as_parent_keys() {
    let backend = ScriptedBackend::new();
    let mut nav = started(&backend).await;

    click(&mut nav, "RU1").await;
    click(&mut nav, "RU1:B14").await;
    click(&mut nav, "RU1:B14:F1").await;

    let positions: Vec<(Level, String)> = backend
        .diagram_requests()
        .into_iter()
        .map(|r| (r.level, r.parent_key.to_string()))
        .collect();
    assert_eq!(
        positions,
        vec![
            (Level::Site, String::new()),
            (Level::Building, "RU1".to_string()),
            (Level::Floor, "RU1:B14".to_string()),
            (Level::Unit, "RU1:B14:F1".to_string()),
        ]
    );

    let history: Vec<NavigationEntry> = nav.controller().history().iter().cloned().collect();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0], NavigationEntry::root());
    assert_eq!(nav.controller().diagram().unwrap().card_count(), 1);
}

#[tokio::test]
async fn building_click_moves_to_floor_level() {
    let backend = ScriptedBackend::new();
    let mut nav = started(&backend).await;
    click(&mut nav, "RU1").await;

    click(&mut nav, "RU1:B14").await;

    assert_eq!(
        nav.controller().position(),
        &NavigationEntry::new(Level::Floor, "RU1:B14")
    );
    assert!(nav
        .controller()
        .history()
        .iter()
        .any(|entry| entry == &NavigationEntry::root()));
}

#[tokio::test]
async fn back_forward_and_branching() {
    let backend = ScriptedBackend::new();
    let mut nav = started(&backend).await;
    click(&mut nav, "RU1").await;

    nav.dispatch(NavEvent::Back);
    nav.settle().await;
    assert_eq!(nav.controller().position(), &NavigationEntry::root());
    assert!(nav.controller().can_go_forward());

    nav.dispatch(NavEvent::Forward);
    nav.settle().await;
    assert_eq!(nav.controller().parent_key().as_str(), "RU1");

    nav.dispatch(NavEvent::Back);
    nav.settle().await;
    click(&mut nav, "RU2").await;

    assert_eq!(nav.controller().parent_key().as_str(), "RU2");
    assert!(!nav.controller().can_go_forward());
    assert_eq!(nav.controller().history().len(), 2);
    assert_eq!(backend.diagram_requests().len(), 6);
}

#[tokio::test]
async fn toggling_a_filter_twice_refetches_twice() {
    let backend = ScriptedBackend::new();
    let mut nav = started(&backend).await;

    for _ in 0..2 {
        nav.dispatch(NavEvent::ToggleFilter {
            dimension: dimensions::WORK_REQUEST_STATUS.into(),
            value: "Closed".into(),
        });
        nav.settle().await;
    }

    let requests = backend.diagram_requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(
        requests[1].filters.get(dimensions::WORK_REQUEST_STATUS),
        Some("Closed")
    );
    assert_eq!(requests[2].filters.get(dimensions::WORK_REQUEST_STATUS), Some(""));
    assert!(nav
        .controller()
        .filters()
        .selected(dimensions::WORK_REQUEST_STATUS)
        .unwrap()
        .is_empty());
    assert_eq!(nav.controller().history().len(), 1);
}

#[tokio::test]
async fn unit_click_opens_problem_overlay() {
    let backend = ScriptedBackend::new();
    let mut nav = started(&backend).await;
    click(&mut nav, "RU1").await;
    click(&mut nav, "RU1:B14").await;
    click(&mut nav, "RU1:B14:F1").await;
    nav.dispatch(NavEvent::ToggleFilter {
        dimension: dimensions::PRIMARY_TRADE.into(),
        value: "Plumber".into(),
    });
    nav.settle().await;

    click(&mut nav, "RU1:B14:F1:G0002").await;

    let (unit, problems) = nav.controller().overlay().problems().unwrap();
    assert_eq!(unit.identity, "G0002");
    assert_eq!(problems, sample_problems().as_slice());

    let requests = backend.problem_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0.composite_id, "RU1:B14:F1:G0002");
    assert_eq!(requests[0].1.get(dimensions::PRIMARY_TRADE), Some("Plumber"));
    assert_eq!(nav.controller().level(), Level::Unit);

    nav.dispatch(NavEvent::CloseOverlay);
    assert!(nav.controller().overlay().is_none());
}

#[tokio::test]
async fn failed_problem_lookup_opens_empty_overlay() {
    let backend = ScriptedBackend::new();
    backend.fail_problems_with(FetchError::Status {
        status: 500,
        body: "database unavailable".into(),
    });
    let mut nav = started(&backend).await;
    click(&mut nav, "RU1").await;
    click(&mut nav, "RU1:B14").await;
    click(&mut nav, "RU1:B14:F1").await;

    click(&mut nav, "RU1:B14:F1:G0002").await;

    let (_, problems) = nav.controller().overlay().problems().unwrap();
    assert!(problems.is_empty());
}

#[tokio::test]
async fn plan_mode_rooms_are_looked_up_by_unit_code() {
    let backend = ScriptedBackend::new();
    let mut nav = started(&backend).await;
    click(&mut nav, "RU1").await;
    click(&mut nav, "RU1:B14").await;
    click(&mut nav, "RU1:B14:F1").await;
    nav.dispatch(NavEvent::SetMode(VisualizationMode::BuildingPlans));
    nav.settle().await;

    click(&mut nav, "B14;F1;G0002").await;

    let (unit, _) = nav.controller().overlay().problems().unwrap();
    assert_eq!(unit.identity, "G0002");
    assert_eq!(nav.controller().history().len(), 4);
}

#[tokio::test]
async fn late_response_never_overwrites_newer_diagram() {
    let backend = ScriptedBackend::new();
    let mut nav = navigator(&backend);

    let slow = backend.hold_next_diagram();
    nav.dispatch(NavEvent::Start);
    nav.dispatch(NavEvent::SetMode(VisualizationMode::BuildingPlans));

    // Options and the fast mode request finish while the first is held.
    assert!(nav.next_result().await);
    assert!(nav.next_result().await);
    assert_eq!(displayed_mode(&nav), "building-plans");

    slow.notify_one();
    nav.settle().await;

    assert_eq!(displayed_mode(&nav), "building-plans");
    assert_eq!(nav.surface().count(EffectSet::DIAGRAM_DISCARDED), 1);
    assert_eq!(nav.surface().count(EffectSet::DIAGRAM_INSTALLED), 1);
}

#[tokio::test]
async fn failures_show_in_place_of_the_diagram() {
    let backend = ScriptedBackend::new();
    backend.fail_diagrams_with(FetchError::NotFound {
        message: "No data found for the selected filters.".into(),
    });
    let mut nav = started(&backend).await;

    assert_eq!(
        nav.controller().display(),
        &DisplayState::Error(DisplayError::NoData(
            "No data found for the selected filters.".into()
        ))
    );

    backend.fail_diagrams_with(FetchError::Transport("connection reset".into()));
    nav.dispatch(NavEvent::Refresh);
    nav.settle().await;
    assert!(matches!(
        nav.controller().display(),
        DisplayState::Error(DisplayError::Failed(_))
    ));
    assert_eq!(nav.controller().position(), &NavigationEntry::root());
    assert_eq!(nav.surface().count(EffectSet::ERROR_SHOWN), 2);
}

#[tokio::test]
async fn clear_cache_resets_filters_and_refetches() {
    let backend = ScriptedBackend::new();
    let mut nav = started(&backend).await;
    nav.dispatch(NavEvent::ToggleFilter {
        dimension: dimensions::CRAFTSPERSON_NAME.into(),
        value: "Smith".into(),
    });
    nav.settle().await;

    nav.dispatch(NavEvent::ClearCache);
    nav.settle().await;

    assert_eq!(backend.cache_clears.load(Ordering::SeqCst), 1);
    let last = backend.diagram_requests().pop().unwrap();
    assert_eq!(last.filters.get(dimensions::CRAFTSPERSON_NAME), Some(""));
    assert!(nav.controller().filters().is_unconstrained());
    assert!(nav.controller().diagram().is_some());
}

#[tokio::test]
async fn run_processes_handle_events_until_handles_drop() {
    let backend = ScriptedBackend::new();
    let (nav, handle) = Navigator::new(
        &NavigatorConfig::default(),
        backend.clone(),
        RecordingSurface::default(),
    );
    let running = tokio::spawn(nav.run());

    assert!(handle.send(NavEvent::ToggleFilter {
        dimension: dimensions::REQUESTED_BY.into(),
        value: "Facilities Desk".into(),
    }));
    drop(handle);

    let nav = running.await.unwrap();
    assert_eq!(backend.diagram_requests().len(), 2);
    assert_eq!(nav.in_flight(), 0);
    assert_eq!(
        nav.controller().current_request().filters.get(dimensions::REQUESTED_BY),
        Some("Facilities Desk")
    );
    assert!(nav.controller().diagram().is_some());
    assert!(nav
        .surface()
        .all_effects()
        .contains(EffectSet::FILTERS_CHANGED | EffectSet::OPTIONS_CHANGED));
}
