use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use itertools::Itertools;

use crate::chart::{ChartSurface, SeriesHandle, VisualKind};
use crate::data::Table;
use crate::domain::{PriceBar, SeriesData, UnixTime};
use crate::filter::{FilterContainer, FilterItem, HierarchicalFilter, Selection, TriState};
use crate::series::SyncError;
use crate::series::factory::SeriesFactory;
use crate::series::legend::{LegendEntry, LegendLayout};
use crate::series::markers::markers_from_events;
use crate::series::pane::PaneAssigner;
use crate::series::registry::{self, IndicatorGroup, PRICE_ENTRY, PRICE_SERIES_KEY, SourceEntry};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// One live series bound to one input column.
#[derive(Debug, Clone)]
pub struct SeriesInstance {
    /// The raw column name, or the reserved price key
    pub instance_key: String,
    pub source_key: &'static str,
    pub suffix: String,
    pub kind: VisualKind,
    pub handle: SeriesHandle,
    pub data: Arc<SeriesData>,
    pub legend: LegendEntry,
    pub pane: usize,
    pub group: Option<IndicatorGroup>,
}

impl SeriesInstance {
    pub fn label(&self) -> &str {
        &self.legend.idle_label
    }

    pub fn entry(&self) -> Option<&'static SourceEntry> {
        registry::lookup(self.source_key)
    }

    fn filter_item(&self) -> FilterItem {
        match self.group {
            Some(group) => FilterItem::grouped(&self.instance_key, self.label(), group.id(), group.label()),
            None => FilterItem::individual(&self.instance_key, self.label()),
        }
    }
}

/// Outcome of one successful resynchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub instances: usize,
    pub panes: usize,
    /// Columns that matched nothing, repeated, or could not be created
    pub skipped_columns: Vec<String>,
    pub markers: usize,
    /// Rows kept by the decoder
    pub rows: usize,
    pub dropped_rows: usize,
    /// Indicator groups sharing one legend container
    pub groups: usize,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} series on {} pane(s) from {} rows", self.instances, self.panes, self.rows)?;
        if self.markers > 0 {
            write!(f, ", {} trade markers", self.markers)?;
        }
        if !self.skipped_columns.is_empty() {
            write!(f, ", skipped: {}", self.skipped_columns.iter().join(", "))?;
        }
        if self.dropped_rows > 0 {
            write!(f, ", {} rows dropped", self.dropped_rows)?;
        }
        Ok(())
    }
}

/// A series decided on by discovery, not yet on the surface.
struct PlannedSeries {
    instance_key: String,
    entry: &'static SourceEntry,
    suffix: String,
    occurrence: usize,
    pane: usize,
    data: SeriesData,
}

impl PlannedSeries {
    fn label(&self) -> String {
        if !self.suffix.is_empty() {
            format!("{} {}", self.entry.label, self.suffix)
        } else if self.occurrence > 0 {
            format!("{} {}", self.entry.label, self.occurrence + 1)
        } else {
            self.entry.label.to_string()
        }
    }
}

#[derive(Default)]
struct Plan {
    series: Vec<PlannedSeries>,
    skipped_columns: Vec<String>,
}

/// Owns the chart surface, the active instance set, the legend and the filter.
pub struct SeriesManager<S: ChartSurface> {
    surface: S,
    /// Front buffer. Replaced wholesale on a successful resynchronization.
    active: Arc<Vec<SeriesInstance>>,
    legend_layout: LegendLayout,
    filter: HierarchicalFilter,
}

impl<S: ChartSurface> SeriesManager<S> {
    pub fn new(surface: S, container: FilterContainer) -> Self {
        if let Err(e) = registry::validate() {
            log::error!("Source registry is inconsistent: {}", e);
        }
        Self {
            surface,
            active: Arc::new(Vec::new()),
            legend_layout: LegendLayout::default(),
            filter: HierarchicalFilter::new(container),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn active(&self) -> &Arc<Vec<SeriesInstance>> {
        &self.active
    }

    pub fn instance(&self, key: &str) -> Option<&SeriesInstance> {
        self.active.iter().find(|inst| inst.instance_key == key)
    }

    pub fn legend_layout(&self) -> &LegendLayout {
        &self.legend_layout
    }

    pub fn filter(&self) -> &HierarchicalFilter {
        &self.filter
    }

    /// Called with a snapshot after every filter change, including rebuilds.
    pub fn set_on_selection_changed(&mut self, callback: impl FnMut(&Selection) + 'static) {
        self.filter.set_on_selection_changed(callback);
    }

    /// Decodes `raw_text` and swaps in the series it describes.
    /// On `false` nothing visible has changed.
    pub fn resynchronize(&mut self, raw_text: &str) -> bool {
        match self.resynchronize_text(raw_text) {
            Ok(report) => {
                log::info!("Resynchronized: {}", report);
                true
            }
            Err(e) => {
                log::warn!("Resynchronize failed, keeping previous series: {}", e);
                false
            }
        }
    }

    /// Like `resynchronize`, but hands back the report or the reason nothing changed.
    /// Undecodable text is a no-data failure.
    pub fn resynchronize_text(&mut self, raw_text: &str) -> Result<SyncReport, SyncError> {
        let table = Table::parse(raw_text)?;
        self.resynchronize_table(&table)
    }

    pub fn resynchronize_table(&mut self, table: &Table) -> Result<SyncReport, SyncError> {
        let plan = discover(table);
        if plan.series.is_empty() {
            return Err(SyncError::NoData(format!(
                "no series matched columns [{}]",
                table.headers().iter().join(", ")
            )));
        }

        let mut skipped_columns = plan.skipped_columns;
        let mut created: Vec<SeriesInstance> = Vec::with_capacity(plan.series.len());
        for planned in plan.series {
            let entry = planned.entry;
            let style = entry.style_for(planned.occurrence);
            let label = planned.label();
            match SeriesFactory::create(
                &mut self.surface,
                &planned.instance_key,
                &label,
                entry.kind,
                &style,
                Some(planned.pane),
            ) {
                Ok((handle, legend)) => created.push(SeriesInstance {
                    instance_key: planned.instance_key,
                    source_key: entry.key,
                    suffix: planned.suffix,
                    kind: entry.kind,
                    handle,
                    data: Arc::new(planned.data),
                    legend,
                    pane: planned.pane,
                    group: entry.group,
                }),
                Err(e) => {
                    log::error!("Series '{}' not created: {}", planned.instance_key, e);
                    skipped_columns.push(planned.instance_key);
                }
            }
        }

        if created.is_empty() {
            return Err(SyncError::NoData("every planned series was refused by the surface".to_string()));
        }

        self.compact_panes(&mut created);

        // Commit: the old set goes only now that a new one exists.
        for old in self.active.iter() {
            self.surface.remove_series(old.handle);
        }
        for inst in &created {
            self.surface.set_data(inst.handle, Arc::clone(&inst.data));
        }
        let markers = self.attach_markers(table, &created);

        let legend_layout = LegendLayout::build(
            created
                .iter()
                .map(|inst| (inst.instance_key.as_str(), inst.group)),
        );
        let groups = legend_layout.group_count();
        self.legend_layout = legend_layout;
        let items: Vec<FilterItem> = created.iter().map(SeriesInstance::filter_item).collect();
        self.active = Arc::new(created);
        self.filter.replace_items(items);
        self.sync_visibility();
        self.surface.fit_content();

        Ok(SyncReport {
            instances: self.active.len(),
            panes: self.surface.pane_count(),
            skipped_columns,
            markers,
            rows: table.row_count(),
            dropped_rows: table.dropped_rows(),
            groups,
        })
    }

    /// Shows exactly the selected series.
    pub fn apply_selection(&mut self, selection: &Selection) {
        for inst in self.active.iter() {
            self.surface
                .set_visible(inst.handle, selection.contains(&inst.instance_key));
        }
    }

    pub fn set_item_selected(&mut self, key: &str, selected: bool) {
        self.filter.set_item_selected(key, selected);
        self.sync_visibility();
    }

    pub fn toggle_item(&mut self, key: &str) {
        self.filter.toggle_item(key);
        self.sync_visibility();
    }

    pub fn set_group_selected(&mut self, group_id: &str, selected: bool) {
        self.filter.set_group_selected(group_id, selected);
        self.sync_visibility();
    }

    pub fn group_state(&self, group_id: &str) -> Option<TriState> {
        self.filter.group_state(group_id)
    }

    pub fn select_all(&mut self) {
        self.filter.select_all();
        self.sync_visibility();
    }

    pub fn select_none(&mut self) {
        self.filter.select_none();
        self.sync_visibility();
    }

    /// Legend text of every active series at `time`, in instance order.
    pub fn inspect(&self, time: UnixTime) -> Vec<(String, String)> {
        self.active
            .iter()
            .map(|inst| (inst.instance_key.clone(), legend_text_at(inst, Some(time))))
            .collect()
    }

    /// Refreshes legend texts for the crosshair at `time`; `None` restores the idle labels.
    pub fn on_crosshair_move(&mut self, time: Option<UnixTime>) {
        let texts: Vec<String> = self.active.iter().map(|inst| legend_text_at(inst, time)).collect();
        if self
            .active
            .iter()
            .zip(&texts)
            .all(|(inst, text)| &inst.legend.text == text)
        {
            return;
        }
        for (inst, text) in Arc::make_mut(&mut self.active).iter_mut().zip(texts) {
            inst.legend.text = text;
        }
    }

    fn sync_visibility(&mut self) {
        let selection = self.filter.get_selection();
        self.apply_selection(&selection);
    }

    /// Closes pane gaps left by series the surface refused. The main pane keeps index 0.
    fn compact_panes(&mut self, created: &mut [SeriesInstance]) {
        let used: BTreeSet<usize> = created.iter().map(|inst| inst.pane).filter(|&p| p > 0).collect();
        let remap: HashMap<usize, usize> = used
            .into_iter()
            .enumerate()
            .map(|(idx, pane)| (pane, idx + 1))
            .collect();
        for inst in created.iter_mut() {
            if let Some(&pane) = remap.get(&inst.pane).filter(|&&p| p != inst.pane) {
                self.surface.move_to_pane(inst.handle, pane);
                inst.pane = pane;
            }
        }
    }

    fn attach_markers(&mut self, table: &Table, created: &[SeriesInstance]) -> usize {
        let Some(column) = table.event_column() else {
            return 0;
        };
        let Some(price) = created.iter().find(|inst| inst.kind == VisualKind::PriceBar) else {
            log::info!("Event column '{}' ignored: no price bars to attach markers to", column);
            return 0;
        };
        match table.rows_as_events(column) {
            Ok(events) => {
                let markers = markers_from_events(&events);
                let count = markers.len();
                self.surface.set_markers(price.handle, markers);
                count
            }
            Err(e) => {
                log::warn!("Trade markers skipped: {}", SyncError::from(e));
                0
            }
        }
    }
}

fn legend_text_at(inst: &SeriesInstance, time: Option<UnixTime>) -> String {
    let value_text = time
        .and_then(|t| inst.data.value_at(t))
        .zip(inst.entry())
        .map(|(value, entry)| entry.legend_text(&value));
    inst.legend.text_for(value_text.as_deref())
}

/// Decides every series the table describes without touching any surface.
fn discover(table: &Table) -> Plan {
    let mut plan = Plan::default();

    let bars: Option<Vec<PriceBar>> = match table.price_columns() {
        Some(_) => match table.rows_as_price_bars() {
            Ok(bars) => Some(bars),
            Err(e) => {
                log::warn!("Price bars skipped: {}", SyncError::from(e));
                None
            }
        },
        None => None,
    };
    if let Some(bars) = &bars {
        plan.series.push(PlannedSeries {
            instance_key: PRICE_SERIES_KEY.to_string(),
            entry: &PRICE_ENTRY,
            suffix: String::new(),
            occurrence: 0,
            pane: 0,
            data: SeriesData::Bars(bars.clone()),
        });
    }

    let event_column = table.event_column();
    let mut assigner = PaneAssigner::new();
    let mut occurrences: HashMap<&'static str, usize> = HashMap::new();
    let mut seen_columns: Vec<&str> = Vec::new();

    for (idx, column) in table.headers().iter().enumerate() {
        if idx == table.time_column() || Some(column.as_str()) == event_column {
            continue;
        }
        let Some((entry, suffix)) = registry::match_column(column) else {
            continue;
        };
        if seen_columns.contains(&column.as_str()) {
            log::warn!("Duplicate column '{}' ignored", column);
            plan.skipped_columns.push(column.clone());
            continue;
        }
        seen_columns.push(column.as_str());

        let mut points = match table.rows_as_series(column) {
            Ok(points) => points,
            Err(e) => {
                log::error!("Column '{}' matched but could not be read: {}", column, e);
                plan.skipped_columns.push(column.clone());
                continue;
            }
        };
        if entry.color_by_direction
            && let Some(bars) = &bars
        {
            for point in points.iter_mut() {
                if let Ok(i) = bars.binary_search_by_key(&point.time, |bar| bar.time) {
                    point.direction = Some(bars[i].direction());
                }
            }
        }

        let counter = occurrences.entry(entry.key).or_insert(0);
        let occurrence = *counter;
        *counter += 1;

        let pane_count = assigner.pane_count();
        let pane = assigner.pane_index_for(entry, pane_count);

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_discovery {
            log::info!(
                "[discovery] '{}' -> {} (suffix '{}', occurrence {}, pane {})",
                column,
                entry.key,
                suffix,
                occurrence,
                pane
            );
        }

        plan.series.push(PlannedSeries {
            instance_key: column.clone(),
            entry,
            suffix: suffix.to_string(),
            occurrence,
            pane,
            data: SeriesData::Points(points),
        });
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::testing::RecordingSurface;
    use crate::domain::BarDirection;
    use crate::series::legend::LegendBlock;

    const OHLCV: &str = "time,open,high,low,close,volume\n\
                         1,10,12,9,11,100\n\
                         2,11,13,10,10.5,200\n\
                         3,10.5,11,10,10.8,150\n";

    fn manager() -> SeriesManager<RecordingSurface> {
        SeriesManager::new(RecordingSurface::default(), FilterContainer::new("series_filter", "Series"))
    }

    fn keys(m: &SeriesManager<RecordingSurface>) -> Vec<String> {
        m.active().iter().map(|i| i.instance_key.clone()).collect()
    }

    #[test]
    fn ohlcv_gives_price_and_volume() {
        let mut m = manager();
        assert!(m.resynchronize(OHLCV));

        assert_eq!(keys(&m), vec![PRICE_SERIES_KEY.to_string(), "volume".to_string()]);
        assert!(m.filter().groups().is_empty());
        assert_eq!(m.filter().items().len(), 2);
        assert_eq!(m.surface().inner.series().len(), 2);
        assert_eq!(m.surface().count_calls("fit"), 1);
        assert!(m.active().iter().all(|i| i.pane == 0));
    }

    #[test]
    fn no_matching_columns_keeps_previous_set() {
        let mut m = manager();
        assert!(m.resynchronize(OHLCV));
        let before = Arc::clone(m.active());
        let calls_before = m.surface().calls.len();

        assert!(!m.resynchronize("time,foo,bar\n1,2,3\n"));
        assert!(!m.resynchronize("time,close\n1,2\n2,3\n"));
        assert!(!m.resynchronize(""));

        assert!(Arc::ptr_eq(&before, m.active()));
        assert_eq!(m.surface().calls.len(), calls_before);
        assert_eq!(m.filter().items().len(), 2);
    }

    #[test]
    fn close_only_input_fails_on_empty_chart() {
        let mut m = manager();
        assert!(!m.resynchronize("time,close\n1,2\n"));
        assert!(m.active().is_empty());
        assert_eq!(m.surface().count_calls("create"), 0);
    }

    #[test]
    fn repeated_band_columns_share_group_with_distinct_colors() {
        let registry_before: Vec<_> = registry::SOURCES
            .iter()
            .map(|e| (e.key, e.style.color, e.style.palette, e.style.line_width))
            .collect();

        let mut m = manager();
        assert!(m.resynchronize("time,bb_upper_20,bb_upper_50\n1,10,11\n2,10.5,11.5\n"));

        let registry_after: Vec<_> = registry::SOURCES
            .iter()
            .map(|e| (e.key, e.style.color, e.style.palette, e.style.line_width))
            .collect();
        assert_eq!(registry_before, registry_after);

        let active = m.active();
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|i| i.source_key == "bb_upper"));
        assert_eq!(active[0].suffix, "_20");
        assert_eq!(active[1].suffix, "_50");
        assert!(active[0].label().ends_with("_20"));
        assert!(active[1].label().ends_with("_50"));
        assert_ne!(active[0].legend.color, active[1].legend.color);

        assert_eq!(m.filter().groups().len(), 1);
        assert_eq!(m.filter().groups()[0].member_ids, vec!["bb_upper_20", "bb_upper_50"]);
        assert_eq!(
            m.legend_layout().blocks,
            vec![LegendBlock::Group {
                group: IndicatorGroup::Bollinger,
                symbol: "BB",
                members: vec!["bb_upper_20".to_string(), "bb_upper_50".to_string()],
            }]
        );
    }

    #[test]
    fn third_occurrence_wraps_palette() {
        let mut m = manager();
        assert!(m.resynchronize("time,bb_upper_10,bb_upper_20,bb_upper_50\n1,1,2,3\n"));
        let colors: Vec<_> = m.active().iter().map(|i| i.legend.color).collect();
        let entry = registry::lookup("bb_upper").unwrap();
        assert_eq!(colors[0], entry.style_for(0).color);
        assert_eq!(colors[1], entry.style_for(1).color);
        assert_ne!(colors[0], colors[1]);
        assert_eq!(colors[2], colors[0]);
    }

    #[test]
    fn colors_and_panes_are_repeatable() {
        let input = "time,open,high,low,close,sma_20,sma_50,rsi_14,adx,plus_di,macd\n\
                     1,10,12,9,11,10,10,50,20,25,0.1\n";
        let snapshot = |m: &SeriesManager<RecordingSurface>| {
            m.active()
                .iter()
                .map(|i| (i.instance_key.clone(), i.legend.color, i.pane))
                .collect::<Vec<_>>()
        };

        let mut first = manager();
        let mut second = manager();
        assert!(first.resynchronize(input));
        assert!(second.resynchronize(input));
        assert_eq!(snapshot(&first), snapshot(&second));

        // and across reloads of the same manager
        let before = snapshot(&first);
        assert!(first.resynchronize(input));
        assert_eq!(snapshot(&first), before);
    }

    #[test]
    fn groups_stack_and_panes_append() {
        let mut m = manager();
        assert!(m.resynchronize(
            "time,rsi,adx,plus_di,macd,macd_signal,sma\n1,50,20,25,0.1,0.2,10\n"
        ));
        let panes: Vec<(String, usize)> = m
            .active()
            .iter()
            .map(|i| (i.instance_key.clone(), i.pane))
            .collect();
        assert_eq!(
            panes,
            vec![
                ("rsi".to_string(), 1),
                ("adx".to_string(), 2),
                ("plus_di".to_string(), 2),
                ("macd".to_string(), 3),
                ("macd_signal".to_string(), 3),
                ("sma".to_string(), 0),
            ]
        );
        assert_eq!(m.surface().pane_count(), 4);
    }

    #[test]
    fn reload_replaces_old_series_and_drops_their_panes() {
        let mut m = manager();
        assert!(m.resynchronize("time,rsi,adx\n1,50,20\n"));
        let old: Vec<SeriesHandle> = m.active().iter().map(|i| i.handle).collect();
        assert_eq!(m.surface().pane_count(), 3);

        assert!(m.resynchronize(OHLCV));
        for handle in old {
            assert!(m.surface().inner.get(handle).is_none());
        }
        assert_eq!(m.surface().inner.series().len(), 2);
        assert_eq!(m.surface().pane_count(), 1);
    }

    #[test]
    fn text_entry_point_reports_rows_and_groups() {
        let mut m = manager();
        let report = m
            .resynchronize_text("time,close,bb_upper_20,bb_lower_20,rsi\nnope,1,1,1,1\n1,10,11,9,50\n2,10,11,9,55\n")
            .unwrap();
        assert_eq!(report.instances, 3);
        assert_eq!(report.rows, 2);
        assert_eq!(report.dropped_rows, 1);
        assert_eq!(report.groups, 1);

        let before = Arc::clone(m.active());
        assert!(matches!(m.resynchronize_text(""), Err(SyncError::NoData(_))));
        assert!(matches!(m.resynchronize_text("time,rsi\n"), Err(SyncError::NoData(_))));
        assert!(Arc::ptr_eq(&before, m.active()));
    }

    #[test]
    fn refused_kind_is_skipped_and_rest_continues() {
        let mut m = SeriesManager::new(
            RecordingSurface::rejecting(VisualKind::Histogram),
            FilterContainer::new("f", "Series"),
        );
        let table = Table::parse("time,open,high,low,close,volume,macd_hist,rsi\n1,10,12,9,11,100,0.1,50\n").unwrap();
        let report = m.resynchronize_table(&table).unwrap();

        assert_eq!(keys(&m), vec![PRICE_SERIES_KEY.to_string(), "rsi".to_string()]);
        assert_eq!(report.skipped_columns, vec!["volume".to_string(), "macd_hist".to_string()]);
        // macd_hist's pane was planned as 1; rsi moves up into it
        assert_eq!(m.instance("rsi").unwrap().pane, 1);
        assert_eq!(report.panes, 2);
    }

    #[test]
    fn all_refused_is_a_failure_without_teardown() {
        let mut m = SeriesManager::new(
            RecordingSurface::rejecting(VisualKind::Histogram),
            FilterContainer::new("f", "Series"),
        );
        assert!(m.resynchronize("time,rsi\n1,50\n"));
        let before = Arc::clone(m.active());

        assert!(!m.resynchronize("time,macd_hist\n1,0.5\n"));
        assert!(Arc::ptr_eq(&before, m.active()));
        assert_eq!(m.surface().count_calls("remove"), 0);
    }

    #[test]
    fn duplicate_headers_are_skipped() {
        let mut m = manager();
        let table = Table::parse("time,rsi,rsi,RSI\n1,50,51,52\n").unwrap();
        let report = m.resynchronize_table(&table).unwrap();

        assert_eq!(keys(&m), vec!["rsi".to_string(), "RSI".to_string()]);
        assert_eq!(report.skipped_columns, vec!["rsi".to_string()]);
        assert_eq!(m.instance("RSI").unwrap().label(), "RSI 2");
    }

    #[test]
    fn trade_events_become_markers_on_price_bars() {
        let mut m = manager();
        let table = Table::parse(
            "time,open,high,low,close,event\n\
             1,10,12,9,11,LongEntry\n\
             2,11,13,10,10.5,\n\
             3,10.5,11,10,10.8,LongExit+ShortEntry\n",
        )
        .unwrap();
        let report = m.resynchronize_table(&table).unwrap();

        assert_eq!(report.markers, 3);
        let price = m.instance(PRICE_SERIES_KEY).unwrap();
        assert_eq!(m.surface().inner.get(price.handle).unwrap().markers.len(), 3);
        assert_eq!(m.active().len(), 1);
    }

    #[test]
    fn events_without_price_bars_are_ignored() {
        let mut m = manager();
        let table = Table::parse("time,rsi,event\n1,50,LongEntry\n").unwrap();
        let report = m.resynchronize_table(&table).unwrap();
        assert_eq!(report.markers, 0);
        assert_eq!(m.surface().count_calls("markers"), 0);
    }

    #[test]
    fn volume_points_carry_candle_direction() {
        let mut m = manager();
        assert!(m.resynchronize(OHLCV));
        let volume = m.instance("volume").unwrap();
        let SeriesData::Points(points) = volume.data.as_ref() else {
            panic!("volume should be points");
        };
        let directions: Vec<_> = points.iter().map(|p| p.direction).collect();
        assert_eq!(
            directions,
            vec![
                Some(BarDirection::Bullish),
                Some(BarDirection::Bearish),
                Some(BarDirection::Bullish),
            ]
        );
    }

    #[test]
    fn group_toggle_hides_members() {
        let mut m = manager();
        assert!(m.resynchronize("time,close,bb_upper_20,bb_lower_20,sma\n1,10,11,9,10\n"));

        m.set_group_selected("bollinger", false);
        assert_eq!(m.group_state("bollinger"), Some(TriState::Unchecked));
        let visible = |m: &SeriesManager<RecordingSurface>, key: &str| {
            let handle = m.instance(key).unwrap().handle;
            m.surface().inner.get(handle).unwrap().visible
        };
        assert!(!visible(&m, "bb_upper_20"));
        assert!(!visible(&m, "bb_lower_20"));
        assert!(visible(&m, "sma"));

        m.toggle_item("bb_upper_20");
        assert_eq!(m.group_state("bollinger"), Some(TriState::Indeterminate));
        assert!(visible(&m, "bb_upper_20"));

        m.select_none();
        assert!(!visible(&m, "sma"));
        m.select_all();
        assert!(visible(&m, "bb_lower_20"));
    }

    #[test]
    fn external_callback_sees_rebuilds_and_toggles() {
        use std::sync::mpsc::channel;

        let (tx, rx) = channel::<Selection>();
        let mut m = manager();
        m.set_on_selection_changed(move |selection| {
            let _ = tx.send(selection.clone());
        });
        assert!(m.resynchronize(OHLCV));
        m.set_item_selected("volume", false);

        let received: Vec<Selection> = rx.try_iter().collect();
        assert_eq!(received.len(), 2);
        assert_eq!(received[1].len(), 1);
        assert!(received[1].contains(PRICE_SERIES_KEY));
    }

    #[test]
    fn crosshair_updates_and_restores_legend() {
        let mut m = manager();
        assert!(m.resynchronize(OHLCV));

        m.on_crosshair_move(Some(2));
        let volume = m.instance("volume").unwrap();
        assert_eq!(volume.legend.text, "Volume 200");
        let price = m.instance(PRICE_SERIES_KEY).unwrap();
        assert!(price.legend.text.starts_with("Price O "));

        m.on_crosshair_move(Some(99));
        assert!(m.active().iter().all(|i| i.legend.is_idle()));

        m.on_crosshair_move(Some(1));
        m.on_crosshair_move(None);
        assert!(m.active().iter().all(|i| i.legend.is_idle()));
    }

    #[test]
    fn inspect_reports_every_series() {
        let mut m = manager();
        assert!(m.resynchronize("time,rsi,sma\n1,55,10\n2,60,\n"));
        let at_two = m.inspect(2);
        assert_eq!(at_two[0], ("rsi".to_string(), "RSI 60.00".to_string()));
        assert_eq!(at_two[1], ("sma".to_string(), "SMA".to_string()));
    }
}
