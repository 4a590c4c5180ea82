//! Shared fixtures for navigator integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use treemap_navigator::navigator_core::{
    EffectSet, FilterOptions, FilterValue, Level, QueryDescriptor, VisualizationMode,
};
use treemap_navigator::{
    DiagramDocument, DiagramRequest, DisplaySurface, FetchError, LogId, NavigatorBackend,
    UnitProblem, UnitRef, VisualizationController,
};

/// Markup for one level, drawn the way the stock renderer draws it.
pub fn markup_for(request: &DiagramRequest) -> String {
    let parent = request.parent_key.as_str();
    let body = match request.level {
        Level::Site => r#"
            <rect id="RU1" class="site" data_name="Main Campus" data_issues="40" data_size="9000"/>
            <rect id="RU2" class="site" data_name="North Campus" data_issues="2" data_size="1200"/>"#
            .to_string(),
        Level::Building => format!(
            r#"<rect id="{parent}:B14" class="building" data_name="Library" data_issues="12" data_size="3100"/>"#
        ),
        Level::Floor => format!(
            r#"<rect id="{parent}:F1" class="floor" data_name="Ground" data_issues="5" data_size="800"/>"#
        ),
        Level::Unit => match request.mode {
            VisualizationMode::Squarified => format!(
                r#"<rect id="{parent}:G0002" class="unit" data_name="Reading room" data_issues="3" data_size="120"/>"#
            ),
            VisualizationMode::BuildingPlans => r#"
                <path id="B14;F1;G0002" class="unit-room" d="M0 0 L10 0 L10 10 Z" data_name="Reading room"/>"#
                .to_string(),
        },
    };
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" data-mode="{}" width="1920" height="930">{}</svg>"#,
        request.mode, body
    )
}

/// In-memory backend recording every call.
///
/// Diagram responses can be held back with [`hold_next_diagram`] to
/// deliver them out of order.
#[derive(Default)]
pub struct ScriptedBackend {
    pub diagram_requests: Mutex<Vec<DiagramRequest>>,
    pub problem_requests: Mutex<Vec<(UnitRef, QueryDescriptor)>>,
    pub option_requests: AtomicUsize,
    pub cache_clears: AtomicUsize,
    diagram_failure: Mutex<Option<FetchError>>,
    problem_failure: Mutex<Option<FetchError>>,
    holds: Mutex<VecDeque<Arc<Notify>>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The next diagram call waits until the returned `Notify` fires.
    pub fn hold_next_diagram(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.holds.lock().unwrap().push_back(Arc::clone(&gate));
        gate
    }

    pub fn fail_diagrams_with(&self, error: FetchError) {
        *self.diagram_failure.lock().unwrap() = Some(error);
    }

    pub fn fail_problems_with(&self, error: FetchError) {
        *self.problem_failure.lock().unwrap() = Some(error);
    }

    pub fn diagram_requests(&self) -> Vec<DiagramRequest> {
        self.diagram_requests.lock().unwrap().clone()
    }

    pub fn problem_requests(&self) -> Vec<(UnitRef, QueryDescriptor)> {
        self.problem_requests.lock().unwrap().clone()
    }
}

pub fn sample_problems() -> Vec<UnitProblem> {
    vec![
        UnitProblem {
            log_id: LogId::Number(10231),
            description: Some("Leaking radiator".into()),
        },
        UnitProblem {
            log_id: LogId::Number(10245),
            description: Some("Blind stuck half way".into()),
        },
    ]
}

#[async_trait]
impl NavigatorBackend for ScriptedBackend {
    async fn fetch_diagram(&self, request: &DiagramRequest) -> Result<DiagramDocument, FetchError> {
        self.diagram_requests.lock().unwrap().push(request.clone());
        let gate = self.holds.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let failure = self.diagram_failure.lock().unwrap().clone();
        match failure {
            Some(error) => Err(error),
            None => Ok(DiagramDocument::new(markup_for(request))),
        }
    }

    async fn fetch_filter_options(&self) -> Result<FilterOptions, FetchError> {
        self.option_requests.fetch_add(1, Ordering::SeqCst);
        let mut options = FilterOptions::new();
        options.insert(
            "work_request_status",
            vec![FilterValue::from("Closed"), FilterValue::from("Requested")],
        );
        options.insert("primary_trade", vec![FilterValue::from("Plumber")]);
        Ok(options)
    }

    async fn fetch_unit_problems(
        &self,
        unit: &UnitRef,
        filters: &QueryDescriptor,
    ) -> Result<Vec<UnitProblem>, FetchError> {
        self.problem_requests
            .lock()
            .unwrap()
            .push((unit.clone(), filters.clone()));

        let failure = self.problem_failure.lock().unwrap().clone();
        match failure {
            Some(error) => Err(error),
            None => Ok(sample_problems()),
        }
    }

    async fn clear_server_cache(&self) -> Result<(), FetchError> {
        self.cache_clears.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// What the surface saw on one `apply` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub effects: EffectSet,
    pub level: Level,
    pub parent_key: String,
    pub loading: bool,
}

/// Surface recording every redraw.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub frames: Vec<Frame>,
}

impl RecordingSurface {
    pub fn all_effects(&self) -> EffectSet {
        self.frames
            .iter()
            .fold(EffectSet::NONE, |acc, frame| acc | frame.effects)
    }

    pub fn count(&self, effect: EffectSet) -> usize {
        self.frames
            .iter()
            .filter(|frame| frame.effects.contains(effect))
            .count()
    }
}

impl DisplaySurface for RecordingSurface {
    fn apply(&mut self, controller: &VisualizationController, effects: EffectSet) {
        self.frames.push(Frame {
            effects,
            level: controller.level(),
            parent_key: controller.parent_key().to_string(),
            loading: controller.display().is_loading(),
        });
    }
}
