//! Axis options and axis titles.
//!
//! Axes are ranked before styling: the category axis is primary, the first value axis is
//! secondary and a second value axis tertiary. `xAxis` styles the primary axis, `yAxis` the
//! secondary and `rightYAxis` the tertiary. Grid lines default to visible on the secondary axis
//! only, so dual value axes do not draw two grids.

use super::title::{title_text_style, title_visible};
use super::{OperatorContext, base_font_size, insert_some, label_text_style};
use crate::spec::{RenderSpec, object_entry};
use serde_json::{Map, Value};
use sheetchart_core::style::{AxisOptions, TickPosition, TitleStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPriority {
    Primary,
    Secondary,
    Tertiary,
}

/// Priority of every axis in `axes`, `None` for axes outside the category/value scheme (radar).
pub fn rank_axes(axes: &[Value]) -> Vec<Option<AxisPriority>> {
    let mut value_axes = 0;
    axes.iter()
        .map(|axis| match axis.get("role").and_then(Value::as_str) {
            Some("category") => Some(AxisPriority::Primary),
            Some("value") => {
                value_axes += 1;
                Some(if value_axes == 1 {
                    AxisPriority::Secondary
                } else {
                    AxisPriority::Tertiary
                })
            }
            _ => None,
        })
        .collect()
}

fn styles_for<'a>(
    priority: AxisPriority,
    ctx: &OperatorContext<'a>,
) -> (Option<&'a AxisOptions>, Option<&'a TitleStyle>) {
    let style = ctx.style;
    match priority {
        AxisPriority::Primary => (style.x_axis.as_ref(), style.x_axis_title.as_ref()),
        AxisPriority::Secondary => (style.y_axis.as_ref(), style.y_axis_title.as_ref()),
        AxisPriority::Tertiary => (
            style.right_y_axis.as_ref(),
            style.right_y_axis_title.as_ref(),
        ),
    }
}

fn line_style(color: Option<&str>, width: Option<f64>) -> Map<String, Value> {
    let mut style = Map::new();
    insert_some(&mut style, "stroke", color);
    insert_some(&mut style, "lineWidth", width);
    style
}

fn apply_options(axis: &mut Map<String, Value>, options: &AxisOptions, priority: AxisPriority) {
    axis.insert("visible".into(), Value::Bool(options.visible.unwrap_or(true)));
    insert_some(axis, "inverse", options.reverse);
    insert_some(axis, "min", options.min);
    insert_some(axis, "max", options.max);

    if let Some(label) = &options.label {
        let block = object_entry(axis, "label");
        insert_some(block, "visible", label.visible);
        let style = object_entry(block, "style");
        style.extend(label_text_style(label));
    }
    if let Some(format) = &options.format {
        object_entry(axis, "label").insert("numberFormat".into(), Value::from(format.as_str()));
    }

    if options.line_visible.is_some() || options.line_color.is_some() || options.line_width.is_some() {
        let block = object_entry(axis, "domainLine");
        insert_some(block, "visible", options.line_visible);
        block.insert(
            "style".into(),
            Value::Object(line_style(options.line_color.as_deref(), options.line_width)),
        );
    }

    if let Some(grid) = &options.grid_line {
        let block = object_entry(axis, "grid");
        block.insert(
            "visible".into(),
            Value::Bool(grid.visible.unwrap_or(priority == AxisPriority::Secondary)),
        );
        block.insert(
            "style".into(),
            Value::Object(line_style(grid.color.as_deref(), grid.width)),
        );
    }

    if let Some(tick) = &options.tick {
        let block = object_entry(axis, "tick");
        insert_some(block, "visible", tick.visible);
        insert_some(
            block,
            "inside",
            tick.position.map(|p| p == TickPosition::Inside),
        );
        insert_some(block, "tickSize", tick.length);
        block.insert(
            "style".into(),
            Value::Object(line_style(tick.color.as_deref(), tick.width)),
        );
    }
}

pub fn apply_axes(mut spec: RenderSpec, ctx: &OperatorContext<'_>) -> RenderSpec {
    let base = base_font_size(&spec, ctx);
    let ranks = rank_axes(spec.axes());
    for (axis, priority) in spec.axes_mut().iter_mut().zip(ranks) {
        let (Some(priority), Some(axis)) = (priority, axis.as_object_mut()) else {
            continue;
        };
        let (options, title) = styles_for(priority, ctx);

        // Defaults that hold without any axis style.
        if !axis.contains_key("grid") {
            let mut grid = Map::new();
            grid.insert("visible".into(), Value::Bool(priority == AxisPriority::Secondary));
            axis.insert("grid".into(), Value::Object(grid));
        }
        if let Some(options) = options {
            apply_options(axis, options, priority);
        }
        if let Some(title) = title {
            let block = object_entry(axis, "title");
            block.insert("visible".into(), Value::Bool(title_visible(title)));
            insert_some(block, "text", title.content.as_deref());
            block.insert("style".into(), Value::Object(title_text_style(title, base)));
        }
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::cartesian::convert_combination;
    use crate::settings::RenderSettings;
    use serde_json::json;
    use sheetchart_core::style::{GridLineStyle, LabelStyle, SeriesStyle};
    use sheetchart_core::{
        ChartConfig, ChartDataConfig, ChartDataSource, ChartStyle, ChartTypeBits, build_context,
        get_output,
    };

    fn dual_axis_config() -> (ChartConfig, ChartStyle) {
        let source: ChartDataSource = serde_json::from_value(json!([
            ["", "Q1", "Q2"],
            ["North", 10, 30],
            ["South", 10, 10]
        ]))
        .unwrap();
        let config = ChartConfig::new(
            ChartTypeBits::COMBINATION,
            get_output(&build_context(source, ChartDataConfig::default())),
        );
        let mut style = ChartStyle::default();
        style.set_series_style(
            2,
            SeriesStyle {
                right_y_axis: Some(true),
                ..Default::default()
            },
        );
        (config, style)
    }

    #[test]
    fn ranks_follow_encounter_order() {
        let axes = [
            json!({ "role": "category" }),
            json!({ "role": "value" }),
            json!({ "role": "value" }),
            json!({ "id": "angle" }),
        ];
        assert_eq!(
            rank_axes(&axes),
            vec![
                Some(AxisPriority::Primary),
                Some(AxisPriority::Secondary),
                Some(AxisPriority::Tertiary),
                None
            ]
        );
    }

    #[test]
    fn grid_defaults_only_on_the_secondary_axis() {
        let (config, style) = dual_axis_config();
        let settings = RenderSettings::default();
        let ctx = OperatorContext {
            style: &style,
            config: &config,
            settings: &settings,
            instance: None,
        };
        let spec = apply_axes(convert_combination(&config, &style, &settings), &ctx);
        let grids: Vec<&Value> = spec.axes().iter().map(|a| &a["grid"]["visible"]).collect();
        assert_eq!(grids, vec![&json!(false), &json!(true), &json!(false)]);
    }

    #[test]
    fn right_axis_options_and_titles() {
        let (config, mut style) = dual_axis_config();
        style.right_y_axis = Some(AxisOptions {
            reverse: Some(true),
            max: Some(50.0),
            grid_line: Some(GridLineStyle {
                visible: Some(true),
                color: Some("#eee".into()),
                width: None,
            }),
            label: Some(LabelStyle {
                bold: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        });
        style.right_y_axis_title = Some(TitleStyle {
            content: Some("Share".into()),
            ..Default::default()
        });
        let settings = RenderSettings::default();
        let ctx = OperatorContext {
            style: &style,
            config: &config,
            settings: &settings,
            instance: None,
        };
        let spec = apply_axes(convert_combination(&config, &style, &settings), &ctx);
        let right = &spec.axes()[2];
        assert_eq!(right["id"], json!("value-right"));
        assert_eq!(right["inverse"], json!(true));
        assert_eq!(right["max"], json!(50.0));
        assert_eq!(right["grid"], json!({ "visible": true, "style": { "stroke": "#eee" } }));
        assert_eq!(right["label"]["style"]["fontWeight"], json!("bold"));
        assert_eq!(
            right["title"],
            json!({ "visible": true, "text": "Share", "style": { "fontSize": 12.0 } })
        );
    }
}
