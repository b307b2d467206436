use serde_json::json;
use sheetchart_core::{
    ChartConfig, ChartDataConfig, ChartDataSource, ChartStyle, ChartTypeBits, build_context,
    get_output,
};
use sheetchart_render::operators::OperatorContext;
use sheetchart_render::{
    Error, JsonRenderEngine, OperatorStage, RenderAdapter, RenderEvent, RenderHost,
    RenderHostProvider, RenderLog, RenderSpec,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default, Clone)]
struct RecordingHosts {
    disposed: Rc<RefCell<Vec<String>>>,
}

impl RenderHostProvider for RecordingHosts {
    fn create_host(&self, chart_id: &str) -> RenderHost {
        let disposed = Rc::clone(&self.disposed);
        let id = chart_id.to_string();
        RenderHost::new(format!("mount-{chart_id}"))
            .with_on_dispose(move || disposed.borrow_mut().push(id))
    }
}

fn line_config() -> ChartConfig {
    let source: ChartDataSource = serde_json::from_value(json!([
        ["", "Q1", "Q2"],
        ["North", 10, 30],
        ["South", 10, 10]
    ]))
    .unwrap();
    ChartConfig::new(
        ChartTypeBits::LINE,
        get_output(&build_context(source, ChartDataConfig::default())),
    )
}

fn adapter(hosts: RecordingHosts) -> (RenderAdapter, RenderLog) {
    let log = RenderLog::new();
    let mut adapter = RenderAdapter::new(hosts);
    assert!(adapter.register_render_engine(
        JsonRenderEngine::NAME,
        JsonRenderEngine::constructor(log.clone())
    ));
    (adapter, log)
}

#[test]
fn first_render_creates_later_renders_update_in_place() {
    let (mut adapter, log) = adapter(RecordingHosts::default());
    let config = line_config();
    adapter.render("c1", &config, &ChartStyle::default()).unwrap();
    adapter.render("c1", &config, &ChartStyle::default()).unwrap();

    let events = log.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], RenderEvent::Render { mount, .. } if mount == "mount-c1"));
    assert!(matches!(&events[1], RenderEvent::SetData { mount, .. } if mount == "mount-c1"));
    assert_eq!(
        log.last_spec("mount-c1").as_ref(),
        adapter.spec("c1").map(RenderSpec::as_value)
    );
}

#[test]
fn render_style_reuses_the_last_config() {
    let (mut adapter, log) = adapter(RecordingHosts::default());
    adapter.render_style("c1", &ChartStyle::default()).unwrap();
    assert!(log.is_empty());

    adapter.render("c1", &line_config(), &ChartStyle::default()).unwrap();
    let style = ChartStyle::from_value(json!({ "title": { "content": "Revenue" } })).unwrap();
    adapter.render_style("c1", &style).unwrap();

    let spec = log.last_spec("mount-c1").unwrap();
    assert_eq!(spec["title"]["text"], json!("Revenue"));
    assert_eq!(spec["series"][0]["seriesIndexes"], json!([1, 2]));
    assert_eq!(adapter.style("c1"), Some(&style));
}

#[test]
fn remove_disposes_engine_and_host() {
    let hosts = RecordingHosts::default();
    let (mut adapter, log) = adapter(hosts.clone());
    adapter.render("c1", &line_config(), &ChartStyle::default()).unwrap();
    adapter.render("c2", &line_config(), &ChartStyle::default()).unwrap();

    assert!(adapter.remove("c1"));
    assert!(!adapter.remove("c1"));
    assert_eq!(*hosts.disposed.borrow(), vec!["c1".to_string()]);
    assert_eq!(
        log.events().last(),
        Some(&RenderEvent::Dispose {
            mount: "mount-c1".to_string()
        })
    );
    assert_eq!(adapter.chart_ids().collect::<Vec<_>>(), vec!["c2"]);

    drop(adapter);
    assert_eq!(
        *hosts.disposed.borrow(),
        vec!["c1".to_string(), "c2".to_string()]
    );
}

#[test]
fn engine_selection_errors() {
    let mut empty = RenderAdapter::default();
    assert!(matches!(
        empty.render("c1", &line_config(), &ChartStyle::default()),
        Err(Error::NoEngine)
    ));

    let (mut adapter, _log) = adapter(RecordingHosts::default());
    assert!(matches!(
        adapter.use_engine("canvas"),
        Err(Error::UnknownEngine { name }) if name == "canvas"
    ));
    assert!(!adapter.register_render_engine(
        JsonRenderEngine::NAME,
        JsonRenderEngine::constructor(RenderLog::new())
    ));
    assert_eq!(adapter.active_engine(), Some(JsonRenderEngine::NAME));
}

fn tag(mut spec: RenderSpec, ctx: &OperatorContext<'_>) -> RenderSpec {
    let chart = ctx.instance.map(|i| i.chart_id.clone()).unwrap_or_default();
    spec.set("renderedFor", json!(chart));
    spec
}

#[test]
fn registration_closes_after_the_first_render() {
    let (mut adapter, log) = adapter(RecordingHosts::default());
    assert!(adapter.add_operator(OperatorStage::Theme, "tag", tag));
    adapter.render("c1", &line_config(), &ChartStyle::default()).unwrap();
    assert_eq!(log.last_spec("mount-c1").unwrap()["renderedFor"], json!("c1"));

    assert!(!adapter.add_operator(OperatorStage::Theme, "late", tag));
    assert!(!adapter.remove_operator("tag"));
    assert!(!adapter.register_render_engine("other", JsonRenderEngine::constructor(log.clone())));
    assert_eq!(adapter.operators().names().last(), Some(&"tag"));
}

#[test]
fn switching_engines_recreates_the_chart() {
    let (mut adapter, first) = adapter(RecordingHosts::default());
    let second = RenderLog::new();
    assert!(adapter.register_render_engine("second", JsonRenderEngine::constructor(second.clone())));
    adapter.render("c1", &line_config(), &ChartStyle::default()).unwrap();
    adapter.use_engine("second").unwrap();
    adapter.render("c1", &line_config(), &ChartStyle::default()).unwrap();

    assert!(matches!(first.events().last(), Some(RenderEvent::Dispose { .. })));
    assert!(matches!(second.events().as_slice(), [RenderEvent::Render { .. }]));
}

#[test]
fn disposed_json_engines_refuse_work() {
    use sheetchart_render::RenderEngine;
    let log = RenderLog::new();
    let mut engine = JsonRenderEngine::new(&RenderHost::new("m"), log.clone());
    engine.dispose();
    engine.dispose();
    assert_eq!(log.len(), 1);
    assert!(matches!(
        engine.render(&RenderSpec::empty()),
        Err(Error::Engine { .. })
    ));
}
