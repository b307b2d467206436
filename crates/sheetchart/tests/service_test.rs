#![cfg(feature = "render")]

use serde_json::json;
use sheetchart::render::{ChartService, JsonRenderEngine, RenderAdapter, RenderEvent, RenderLog};
use sheetchart::{
    CellRange, ChartDataSource, ChartModelManager, ChartStyle, ChartTypeBits, DataSourceProvider,
    ModelOptions, SheetDataSource,
};
use std::rc::Rc;

fn service() -> (ChartService, RenderLog) {
    let log = RenderLog::new();
    let mut adapter = RenderAdapter::default();
    adapter.register_render_engine(JsonRenderEngine::NAME, JsonRenderEngine::constructor(log.clone()));
    let manager = ChartModelManager::default().with_options(ModelOptions::synchronous());
    (ChartService::new(manager, adapter), log)
}

fn sheet() -> Rc<SheetDataSource> {
    let grid: ChartDataSource = serde_json::from_value(json!([
        ["", "Q1", "Q2"],
        ["North", 10, 30],
        ["South", 10, 10]
    ]))
    .unwrap();
    Rc::new(SheetDataSource::from_grid(grid))
}

#[test]
fn model_changes_flow_into_the_engine() {
    let (service, log) = service();
    let sheet = sheet();
    let model = service.create_with_id("c1", sheet.clone()).unwrap();
    assert!(log.is_empty(), "no chart type yet, nothing to render");

    model.set_chart(ChartTypeBits::COLUMN);
    assert!(matches!(log.events().as_slice(), [RenderEvent::Render { mount, .. }] if mount == "chart-c1"));

    model.set_style(&ChartStyle::from_value(json!({ "title": { "content": "Sales" } })).unwrap());
    let spec = log.last_spec("chart-c1").unwrap();
    assert_eq!(spec["title"]["text"], json!("Sales"));
    assert_eq!(spec["type"], json!("bar"));

    // Narrowing the range regenerates with one series, keeping the style.
    sheet.set_range(CellRange::new(0, 0, 1, 2));
    let spec = service.spec("c1").unwrap();
    assert_eq!(spec.series()[0]["seriesIndexes"], json!([1]));
    assert_eq!(spec.get("title").unwrap()["text"], json!("Sales"));
    assert_eq!(log.len(), 3);
}

#[test]
fn removing_a_chart_disposes_its_render_model() {
    let (service, log) = service();
    let sheet = sheet();
    let model = service.create_with_id("c1", sheet.clone()).unwrap();
    model.set_chart(ChartTypeBits::LINE);
    assert!(service.is_bound("c1"));

    assert!(service.remove("c1"));
    assert!(!service.is_bound("c1"));
    assert!(service.spec("c1").is_none());
    assert_eq!(
        log.events().last(),
        Some(&RenderEvent::Dispose {
            mount: "chart-c1".to_string()
        })
    );

    // The disposed model no longer reacts to the sheet.
    let before = log.len();
    sheet.set_range(CellRange::new(0, 0, 2, 1));
    assert_eq!(log.len(), before);
    assert_eq!(sheet.source().observer_count(), 0);
}

#[test]
fn disposing_the_model_directly_cleans_up_too() {
    let (service, _log) = service();
    let model = service.create(sheet());
    model.set_chart(ChartTypeBits::PIE);
    let id = model.id().to_string();
    assert!(service.spec(&id).is_some());

    model.dispose();
    assert!(service.get(&id).is_none());
    assert!(!service.is_bound(&id));
    assert!(!service.adapter().borrow().contains(&id));
}
