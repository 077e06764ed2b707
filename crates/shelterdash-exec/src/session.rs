//! A dashboard session: one user's view state plus the passes that update it.

use std::collections::BTreeSet;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use shelterdash_core::prelude::{AnimalRecord, DataflowGraph, Node, PassId, Query, RescueCategory, SessionId};
use shelterdash_io::RecordStore;
use shelterdash_operators::chart::NO_DATA;
use shelterdash_operators::options::breed_options;
use shelterdash_operators::table::{self, TableFilter};
use shelterdash_operators::{
    BreedChart, ChartSummary, ColumnHighlight, ColumnStyle, LocationMap, MapDescriptor, Projection,
    TableState,
};
use shelterdash_planner::{compile, BreedSelection};

use crate::metrics;
use crate::notification::Notification;
use crate::scheduler::{PassPlan, Scheduler};
use crate::view::{self, ViewState};

/// Renderer → core messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum Event {
    CategoryChanged(RescueCategory),
    BreedsChanged(BreedSelection),
    TableStateChanged(TableState),
    /// Rows the table shows after its own sort/filter.
    VisibleRowsReported(Vec<AnimalRecord>),
    RowSelected(Option<usize>),
    ColumnsSelected(BTreeSet<String>),
}

impl Event {
    pub fn node(&self) -> Node {
        match self {
            Event::CategoryChanged(_) => Node::Category,
            Event::BreedsChanged(_) => Node::BreedSelection,
            Event::TableStateChanged(_) => Node::TableState,
            Event::VisibleRowsReported(_) => Node::VisibleRows,
            Event::RowSelected(_) => Node::SelectedRow,
            Event::ColumnsSelected(_) => Node::SelectedColumns,
        }
    }
}

/// Core → renderer: what one pass recomputed. `None` means unchanged.
#[derive(Debug, Clone, Serialize)]
pub struct ViewUpdate {
    pub pass: PassId,
    pub recomputed: Vec<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<AnimalRecord>>,
    /// Current valid selection after the pass.
    pub selected_row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<MapDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_styles: Option<Vec<ColumnStyle>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
}

impl ViewUpdate {
    fn new(pass: PassId) -> Self {
        Self {
            pass,
            recomputed: Vec::new(),
            rows: None,
            selected_row: None,
            chart: None,
            map: None,
            column_styles: None,
            notification: None,
        }
    }

    fn notify(&mut self, note: Notification) {
        // First problem in a pass wins.
        if self.notification.is_none() {
            self.notification = Some(note);
        }
    }
}

/// Latest value of every derived view.
#[derive(Debug, Clone)]
struct Outputs {
    chart: ChartSummary,
    map: MapDescriptor,
    column_styles: Vec<ColumnStyle>,
    notification: Option<Notification>,
}

pub struct Session {
    id: SessionId,
    store: RecordStore,
    scheduler: Scheduler,
    view: ViewState,
    page_size: usize,
    breed_options: Vec<String>,
    chart: BreedChart,
    map: LocationMap,
    highlight: ColumnHighlight,
    outputs: Outputs,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("store", &self.store)
            .field("rows", &self.view.visible.len())
            .finish()
    }
}

impl Session {
    /// Open a session: load breed options from the full collection and run
    /// the initial `Reset` pass.
    pub fn open(id: SessionId, store: RecordStore, graph: DataflowGraph, page_size: usize) -> Self {
        let span = tracing::info_span!("session_open", session = id.get());
        let _enter = span.enter();

        let breed_options = match store.read(Some(&Query::new())) {
            Ok(rows) => breed_options(&rows),
            Err(e) => {
                tracing::warn!(error = %e, "could not load breed options");
                Vec::new()
            }
        };

        let map = LocationMap::default();
        let outputs = Outputs {
            chart: ChartSummary::Placeholder {
                message: NO_DATA.to_string(),
            },
            map: map.project(&ViewState::default().projection_input()),
            column_styles: Vec::new(),
            notification: None,
        };

        let mut session = Self {
            id,
            store,
            scheduler: Scheduler::new(graph),
            view: ViewState::default(),
            page_size: page_size.max(1),
            breed_options,
            chart: BreedChart,
            map,
            highlight: ColumnHighlight::default(),
            outputs,
        };

        let inputs: Vec<Node> = session
            .scheduler
            .graph()
            .order()
            .iter()
            .copied()
            .filter(|n| session.scheduler.graph().is_input(*n))
            .collect();
        session.run(&inputs, None);
        tracing::info!(breeds = session.breed_options.len(), "session opened");
        session
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn breed_options(&self) -> &[String] {
        &self.breed_options
    }

    pub fn chart(&self) -> &ChartSummary {
        &self.outputs.chart
    }

    pub fn map(&self) -> &MapDescriptor {
        &self.outputs.map
    }

    pub fn column_styles(&self) -> &[ColumnStyle] {
        &self.outputs.column_styles
    }

    /// Notification raised by the most recent pass.
    pub fn notification(&self) -> Option<&Notification> {
        self.outputs.notification.as_ref()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        table::page_count(self.view.visible.len(), self.page_size)
    }

    pub fn page(&self, index: usize) -> &[AnimalRecord] {
        table::page(&self.view.visible, index, self.page_size)
    }

    pub fn columns(&self) -> Vec<String> {
        table::columns(&self.view.fetched)
    }

    /// Full current state, as if every view had been recomputed.
    pub fn snapshot(&self) -> ViewUpdate {
        ViewUpdate {
            pass: PassId::new(0),
            recomputed: Vec::new(),
            rows: Some(self.view.visible.clone()),
            selected_row: self.view.selected_row(),
            chart: Some(self.outputs.chart.clone()),
            map: Some(self.outputs.map.clone()),
            column_styles: Some(self.outputs.column_styles.clone()),
            notification: self.outputs.notification.clone(),
        }
    }

    /// Change category and breeds together and return the rows now shown.
    pub fn apply_filter(
        &mut self,
        category: RescueCategory,
        breeds: BreedSelection,
    ) -> (Vec<AnimalRecord>, Option<Notification>) {
        let update = self.handle_all(vec![
            Event::CategoryChanged(category),
            Event::BreedsChanged(breeds),
        ]);
        (self.view.visible.clone(), update.notification)
    }

    pub fn handle(&mut self, event: Event) -> ViewUpdate {
        self.handle_all(vec![event])
    }

    /// Apply several input changes and recompute once.
    pub fn handle_all(&mut self, events: Vec<Event>) -> ViewUpdate {
        let mut changed = Vec::with_capacity(events.len());
        let mut rejected = None;
        for event in events {
            let node = event.node();
            match self.set_input(event) {
                Ok(()) => changed.push(node),
                Err(note) => rejected = rejected.or(Some(note)),
            }
        }
        self.run(&changed, rejected)
    }

    fn set_input(&mut self, event: Event) -> Result<(), Notification> {
        match event {
            Event::CategoryChanged(c) => self.view.category = c,
            Event::BreedsChanged(b) => self.view.breeds = b,
            Event::TableStateChanged(state) => {
                if let Some(expr) = state.filter.as_deref().filter(|f| !f.trim().is_empty()) {
                    TableFilter::parse(expr).map_err(|e| {
                        tracing::warn!(error = %e, "table filter rejected");
                        Notification::error(e)
                    })?;
                }
                self.view.table_state = state;
            }
            Event::VisibleRowsReported(rows) => self.view.visible = rows,
            Event::RowSelected(row) => self.view.selected_row = row,
            Event::ColumnsSelected(cols) => self.view.selected_columns = cols,
        }
        Ok(())
    }

    fn run(&mut self, changed: &[Node], rejected: Option<Notification>) -> ViewUpdate {
        let plan = match self.scheduler.plan(changed) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(error = %e, "pass not planned");
                PassPlan {
                    id: PassId::new(0),
                    changed: Vec::new(),
                    nodes: Vec::new(),
                }
            }
        };

        let span = tracing::info_span!("pass", session = self.id.get(), pass = plan.id.get());
        let _enter = span.enter();
        let started = Instant::now();

        let mut update = ViewUpdate::new(plan.id);
        if let Some(note) = rejected {
            update.notify(note);
        }

        // Values the renderer set in this batch win over the defaults a fetch
        // would otherwise apply.
        let rows_reported = plan.changed.contains(&Node::VisibleRows);
        let row_selected = plan.changed.contains(&Node::SelectedRow);

        let mut fetched = false;
        for node in &plan.nodes {
            match node {
                Node::Query => {
                    self.view.query = compile(self.view.category, &self.view.breeds);
                }
                Node::Fetch => {
                    let (rows, note) = view::fetch(&self.store, &self.view.query);
                    self.view.fetched = rows;
                    if let Some(note) = note {
                        update.notify(note);
                    }
                    fetched = true;
                }
                Node::VisibleRows => {
                    if !rows_reported {
                        match table::apply(&self.view.fetched, &self.view.table_state) {
                            Ok(rows) => self.view.visible = rows,
                            Err(e) => update.notify(Notification::error(e)),
                        }
                    }
                    if fetched && !row_selected {
                        self.view.selected_row = (!self.view.visible.is_empty()).then_some(0);
                    }
                    update.rows = Some(self.view.visible.clone());
                }
                Node::Chart => {
                    let chart = self.chart.project(&self.view.projection_input());
                    self.outputs.chart = chart.clone();
                    update.chart = Some(chart);
                }
                Node::Map => {
                    let map = self.map.project(&self.view.projection_input());
                    self.outputs.map = map.clone();
                    update.map = Some(map);
                }
                Node::ColumnStyles => {
                    let styles = self.highlight.project(&self.view.projection_input());
                    self.outputs.column_styles = styles.clone();
                    update.column_styles = Some(styles);
                }
                input => {
                    tracing::debug!(node = %input, "input node has nothing to recompute");
                }
            }
            update.recomputed.push(*node);
        }

        update.selected_row = self.view.selected_row();
        self.outputs.notification = update.notification.clone();
        metrics::emit_pass(self.id, plan.id, &plan.nodes, started.elapsed());
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelterdash_io::memory_store::MemoryCollection;
    use shelterdash_operators::SortKey;
    use std::sync::Arc;

    fn dog(name: &str, breed: &str, sex: &str, age: f64) -> AnimalRecord {
        AnimalRecord {
            name: Some(name.into()),
            animal_type: Some("Dog".into()),
            breed: Some(breed.into()),
            sex_upon_outcome: Some(sex.into()),
            age_upon_outcome_in_weeks: Some(age),
            location_lat: Some(30.5),
            location_long: Some(-97.7),
            ..Default::default()
        }
    }

    fn session() -> Session {
        let records = vec![
            dog("Nessie", "Newfoundland", "Intact Female", 52.0),
            dog("Shep", "German Shepherd", "Intact Male", 60.0),
            dog("Fifi", "Poodle", "Intact Male", 60.0),
            dog("Old", "Newfoundland", "Intact Female", 400.0),
        ];
        let store = RecordStore::new(Arc::new(MemoryCollection::with_records(records)));
        Session::open(SessionId::new(1), store, DataflowGraph::standard().unwrap(), 2)
    }

    fn names(rows: &[AnimalRecord]) -> Vec<&str> {
        rows.iter().filter_map(|r| r.name.as_deref()).collect()
    }

    #[test]
    fn open_loads_everything_and_selects_first_row() {
        let s = session();
        assert_eq!(s.view().visible().len(), 4);
        assert_eq!(s.breed_options(), ["Newfoundland", "German Shepherd", "Poodle"]);
        assert_eq!(s.view().selected_row(), Some(0));
        assert_eq!(s.map().marker.as_ref().unwrap().tooltip, "Nessie");
        assert!(!s.chart().is_placeholder());
        assert_eq!(s.page_count(), 2);
        assert_eq!(names(s.page(1)), ["Fifi", "Old"]);
    }

    #[test]
    fn category_change_refetches_and_reprojects() {
        let mut s = session();
        let update = s.handle(Event::CategoryChanged(RescueCategory::Water));
        assert_eq!(
            update.recomputed,
            vec![Node::Query, Node::Fetch, Node::VisibleRows, Node::Chart, Node::Map]
        );
        assert_eq!(names(update.rows.as_deref().unwrap()), ["Nessie"]);
        assert_eq!(update.selected_row, Some(0));
        assert!(update.notification.is_none());
        assert!(update.column_styles.is_none());
    }

    #[test]
    fn mountain_intersects_explicit_breeds() {
        let mut s = session();
        let breeds = BreedSelection::from(["German Shepherd".to_string(), "Poodle".to_string()]);
        let (rows, note) = s.apply_filter(RescueCategory::Mountain, breeds);
        assert!(note.is_none());
        assert_eq!(names(&rows), ["Shep"]);
        assert_eq!(
            s.view().query().breeds().unwrap(),
            &BTreeSet::from(["German Shepherd".to_string()])
        );
    }

    #[test]
    fn empty_result_warns_and_clears_views() {
        let mut s = session();
        let breeds = BreedSelection::from(["Poodle".to_string()]);
        let (rows, note) = s.apply_filter(RescueCategory::Water, breeds);
        assert!(rows.is_empty());
        assert_eq!(note, Some(Notification::no_results()));
        assert!(s.chart().is_placeholder());
        assert!(s.map().marker.is_none());
        assert_eq!(s.view().selected_row(), None);
    }

    #[test]
    fn selection_only_recomputes_map() {
        let mut s = session();
        let update = s.handle(Event::RowSelected(Some(1)));
        assert_eq!(update.recomputed, vec![Node::Map]);
        assert!(update.chart.is_none());
        assert_eq!(update.map.unwrap().marker.unwrap().tooltip, "Shep");

        let update = s.handle(Event::RowSelected(Some(99)));
        assert!(update.map.unwrap().marker.is_none());
        assert_eq!(update.selected_row, None);
    }

    #[test]
    fn reported_visible_rows_drive_the_projections() {
        let mut s = session();
        let shown = vec![dog("Shep", "German Shepherd", "Intact Male", 60.0)];
        let update = s.handle(Event::VisibleRowsReported(shown));
        assert_eq!(update.recomputed, vec![Node::Chart, Node::Map]);
        let chart = update.chart.unwrap();
        assert_eq!(chart.slices().len(), 1);
        assert_eq!(chart.slices()[0].label, "German Shepherd");
    }

    #[test]
    fn selection_in_a_fetching_batch_is_kept() {
        let mut s = session();
        let update = s.handle_all(vec![
            Event::CategoryChanged(RescueCategory::Reset),
            Event::BreedsChanged(BreedSelection::new()),
            Event::RowSelected(Some(2)),
        ]);
        assert!(update.recomputed.contains(&Node::Fetch));
        assert_eq!(update.selected_row, Some(2));
        assert_eq!(update.map.unwrap().marker.unwrap().tooltip, "Fifi");
    }

    #[test]
    fn reported_rows_in_a_fetching_batch_are_kept() {
        let mut s = session();
        let shown = vec![
            dog("Fifi", "Poodle", "Intact Male", 60.0),
            dog("Shep", "German Shepherd", "Intact Male", 60.0),
        ];
        let update = s.handle_all(vec![
            Event::CategoryChanged(RescueCategory::Reset),
            Event::VisibleRowsReported(shown),
        ]);
        assert_eq!(names(update.rows.as_deref().unwrap()), ["Fifi", "Shep"]);
        assert_eq!(s.view().fetched().len(), 4);
        assert_eq!(update.selected_row, Some(0));
        assert_eq!(update.map.unwrap().marker.unwrap().tooltip, "Fifi");
    }

    #[test]
    fn table_state_sorts_and_filters_visible_rows() {
        let mut s = session();
        let update = s.handle(Event::TableStateChanged(TableState {
            sort_by: vec![SortKey::desc("name")],
            filter: Some("{age_upon_outcome_in_weeks} < 100".into()),
        }));
        assert_eq!(names(update.rows.as_deref().unwrap()), ["Shep", "Nessie", "Fifi"]);
        assert_eq!(s.view().fetched().len(), 4);
    }

    #[test]
    fn bad_table_filter_keeps_visible_rows() {
        let mut s = session();
        let before = s.view().visible().to_vec();
        let update = s.handle(Event::TableStateChanged(TableState {
            sort_by: vec![],
            filter: Some("age < 100".into()),
        }));
        assert!(update.notification.unwrap().text.starts_with("Error: "));
        assert!(update.recomputed.is_empty());
        assert_eq!(s.view().visible(), before.as_slice());
    }

    #[test]
    fn two_selected_columns_two_styles() {
        let mut s = session();
        let update = s.handle(Event::ColumnsSelected(BTreeSet::from([
            "breed".to_string(),
            "name".to_string(),
        ])));
        assert_eq!(update.recomputed, vec![Node::ColumnStyles]);
        assert_eq!(update.column_styles.unwrap().len(), 2);
    }

    #[test]
    fn events_round_trip_as_json() {
        let event = Event::CategoryChanged(RescueCategory::Water);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "category_changed");
        assert_eq!(json["value"], "water");
    }
}
