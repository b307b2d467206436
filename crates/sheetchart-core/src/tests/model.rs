use crate::*;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

fn grid() -> ChartDataSource {
    serde_json::from_value(json!([["", "Q1", "Q2"], ["North", 10, 30], ["South", 10, 10]]))
        .unwrap()
}

fn provider() -> Rc<SheetDataSource> {
    Rc::new(SheetDataSource::from_grid(grid()))
}

fn model_with(
    provider: &Rc<SheetDataSource>,
    generators: GeneratorRegistry,
    options: ModelOptions,
) -> ChartModel {
    let provider: Rc<dyn DataSourceProvider> = provider.clone();
    ChartModel::new("chart-1", provider, Rc::new(generators), options)
}

fn record<T: Clone + 'static>(subject: &Subject<T>) -> (Rc<RefCell<Vec<T>>>, Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let subscription = subject.subscribe(move |value: &T| sink.borrow_mut().push(value.clone()));
    (seen, subscription)
}

#[test]
fn setting_a_chart_type_emits_a_config() {
    let provider = provider();
    let model = model_with(&provider, GeneratorRegistry::with_defaults(), ModelOptions::synchronous());
    let (configs, _sub) = record(model.config());
    assert!(configs.borrow().is_empty());

    model.set_chart(ChartTypeBits::COLUMN_STACKED);

    let configs = configs.borrow();
    assert_eq!(configs.len(), 1);
    let config = &configs[0];
    assert_eq!(config.chart_type, ChartTypeBits::COLUMN_STACKED);
    assert_eq!(config.data.series.len(), 2);
    assert_eq!(config.data.series[0].name, "North");
    assert_eq!(config.data.category_label(1), "Q2");
}

#[test]
fn missing_generator_stays_silent() {
    let provider = provider();
    let mut generators = GeneratorRegistry::new();
    generators.add_generator(ChartTypeBits::PIE, generator::default_generator);
    let model = model_with(&provider, generators, ModelOptions::synchronous());
    let (configs, _sub) = record(model.config());

    model.set_chart(ChartTypeBits::LINE);
    model.set_data_config(ChartDataConfig {
        aggregate: true,
        ..Default::default()
    });
    assert!(configs.borrow().is_empty());
    assert_eq!(model.current_config(), None);

    model.set_chart(ChartTypeBits::PIE);
    assert_eq!(configs.borrow().len(), 1);
}

#[test]
fn unset_chart_type_stays_silent() {
    let provider = provider();
    let model = model_with(&provider, GeneratorRegistry::with_defaults(), ModelOptions::synchronous());
    let (configs, _sub) = record(model.config());
    provider.set_cell(1, 1, CellValue::from(99));
    model.set_chart(ChartTypeBits::NONE);
    assert!(configs.borrow().is_empty());
}

#[test]
fn style_changes_do_not_regenerate_the_config() {
    let provider = provider();
    let model = model_with(&provider, GeneratorRegistry::with_defaults(), ModelOptions::synchronous());
    model.set_chart(ChartTypeBits::LINE);

    let (configs, _c) = record(model.config());
    let (styles, _s) = record(model.style());
    assert_eq!(configs.borrow().len(), 1);
    assert_eq!(styles.borrow().len(), 1);

    model.set_style(&ChartStyle {
        border_color: Some("#f00".to_string()),
        ..Default::default()
    });
    model
        .set_style_value(&json!({ "title": { "content": "Revenue" } }))
        .unwrap();

    assert_eq!(configs.borrow().len(), 1);
    assert_eq!(styles.borrow().len(), 3);
    let style = model.current_style();
    assert_eq!(style.border_color.as_deref(), Some("#f00"));
    assert_eq!(
        style.title.and_then(|t| t.content).as_deref(),
        Some("Revenue")
    );
}

#[test]
fn data_config_changes_regenerate_the_config() {
    let provider = provider();
    let model = model_with(&provider, GeneratorRegistry::with_defaults(), ModelOptions::synchronous());
    model.set_chart(ChartTypeBits::LINE);
    model.update_data_config(|config| config.series_indexes = Some(vec![2]));

    let config = model.current_config().unwrap();
    assert_eq!(config.data.series.len(), 1);
    assert_eq!(config.data.series[0].name, "South");
    // The declared config is kept, not the resolved one.
    assert_eq!(model.data_config().category_index, None);
    assert_eq!(model.context().unwrap().data_config.category_index, Some(0));
}

#[test]
fn source_edits_are_debounced_and_last_state_wins() {
    let provider = provider();
    let model = model_with(&provider, GeneratorRegistry::with_defaults(), ModelOptions::default());
    model.set_chart(ChartTypeBits::LINE);
    let (configs, _sub) = record(model.config());
    assert_eq!(configs.borrow().len(), 1);

    provider.set_cell(1, 1, CellValue::from(11));
    provider.set_cell(1, 1, CellValue::from(12));
    assert!(model.has_pending_update());
    assert_eq!(configs.borrow().len(), 1);
    assert!(!model.poll(Instant::now()));

    assert!(model.poll(Instant::now() + Duration::from_millis(200)));
    assert_eq!(configs.borrow().len(), 2);
    let latest = model.current_config().unwrap();
    assert_eq!(latest.data.series[0].items[0].value, Some(12.0));
}

#[test]
fn flush_applies_a_pending_edit_immediately() {
    let provider = provider();
    let model = model_with(&provider, GeneratorRegistry::with_defaults(), ModelOptions::default());
    model.set_chart(ChartTypeBits::LINE);
    provider.set_cell(2, 2, CellValue::from(50));
    assert!(model.flush());
    assert!(!model.flush());
    let latest = model.current_config().unwrap();
    assert_eq!(latest.data.series[1].items[1].value, Some(50.0));
}

#[test]
fn set_range_goes_through_the_provider() {
    let provider = provider();
    let model = model_with(&provider, GeneratorRegistry::with_defaults(), ModelOptions::synchronous());
    model.set_chart(ChartTypeBits::COLUMN);
    model.set_range(CellRange::new(0, 0, 1, 2));

    assert_eq!(provider.range(), Some(CellRange::new(0, 0, 1, 2)));
    let config = model.current_config().unwrap();
    assert_eq!(config.data.series.len(), 1);
}

#[test]
fn disposed_models_emit_nothing() {
    let provider = provider();
    let model = model_with(&provider, GeneratorRegistry::with_defaults(), ModelOptions::synchronous());
    model.set_chart(ChartTypeBits::LINE);

    let (configs, _c) = record(model.config());
    let (styles, _s) = record(model.style());
    let disposed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&disposed);
    model.on_dispose(move |id| sink.borrow_mut().push(id.to_string()));

    model.dispose();
    model.dispose();

    provider.set_cell(1, 1, CellValue::from(1000));
    model.set_chart(ChartTypeBits::AREA);
    model.set_style(&ChartStyle {
        font_size: Some(20.0),
        ..Default::default()
    });

    assert_eq!(configs.borrow().len(), 1);
    assert_eq!(styles.borrow().len(), 1);
    assert!(model.config().is_closed());
    assert!(model.style().is_closed());
    assert!(model.is_disposed());
    assert_eq!(*disposed.borrow(), vec!["chart-1".to_string()]);
    assert_eq!(provider.source().observer_count(), 0);
}

#[test]
fn snapshots_round_trip_through_json() {
    let provider = provider();
    let model = model_with(&provider, GeneratorRegistry::with_defaults(), ModelOptions::synchronous());
    model.set_chart(ChartTypeBits::BAR_PERCENT_STACKED);
    model.set_data_config(ChartDataConfig {
        direction: Direction::Column,
        ..Default::default()
    });
    model
        .set_style_value(&json!({
            "legend": { "position": "bottom" },
            "seriesStyleMap": { "1": { "color": "#123456" } }
        }))
        .unwrap();

    let snapshot = model.snapshot();
    let json = snapshot.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["chartType"], json!(ChartTypeBits::BAR_PERCENT_STACKED.bits()));
    assert_eq!(value["context"]["direction"], json!("column"));

    let restored = model_with(&provider, GeneratorRegistry::with_defaults(), ModelOptions::synchronous());
    let (configs, _sub) = record(restored.config());
    restored.restore(ChartSnapshot::from_json(&json).unwrap());

    assert_eq!(restored.snapshot(), snapshot);
    assert_eq!(configs.borrow().len(), 1);
    assert_eq!(restored.current_config(), model.current_config());
}

#[test]
fn malformed_snapshots_are_errors() {
    let err = ChartSnapshot::from_json("{\"chartType\": \"pie\"}").unwrap_err();
    assert!(matches!(err, Error::Snapshot(_)));
}
