#![forbid(unsafe_code)]

use super::{Dispatcher, HandlerTable};
use crate::DispatchError;
use crate::protocol::Inbound;
use serde_json::{Value, json};
use sha2::Digest as _;
use sseq_core::{PageEntry, SpectralSequenceChart};
use std::fmt::Write as _;

pub(super) fn default_handlers() -> HandlerTable {
    let mut table = HandlerTable::default();
    table.insert("initialize.chart.state", initialize_chart_state);
    table.insert("chart.batched", chart_batched);
    table.insert("chart.state.reset", chart_state_reset);
    table.insert("chart.set_x_range", set_x_range);
    table.insert("chart.set_y_range", set_y_range);
    table.insert("chart.set_initial_x_range", set_initial_x_range);
    table.insert("chart.set_initial_y_range", set_initial_y_range);
    table.insert("chart.insert_page_range", insert_page_range);
    table.insert("chart.node.add", node_add);
    table.insert("chart.class.add", class_add);
    table.insert("chart.class.update", class_update);
    table.insert("chart.class.set_name", class_set_name);
    table.insert("chart.edge.add", edge_add);
    table.insert("chart.edge.update", edge_update);
    table.insert("display.set_background_color", set_background_color);
    table.insert("interact.alert", interact_alert);
    table.insert("interact.prompt", interact_prompt);
    table
}

fn invalid_kwarg(msg: &Inbound, key: &str, expected: &str, value: &Value) -> DispatchError {
    DispatchError::validation(format!(
        "Command \"{}\": keyword argument \"{key}\" is {value} which is not {expected}.",
        msg.primary_cmd()
    ))
}

fn number_kwarg(msg: &Inbound, key: &str) -> Result<f64, DispatchError> {
    let value = msg.required_kwarg(key)?;
    value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| invalid_kwarg(msg, key, "a number", value))
}

fn string_kwarg<'m>(msg: &'m Inbound, key: &str) -> Result<&'m str, DispatchError> {
    let value = msg.required_kwarg(key)?;
    value
        .as_str()
        .ok_or_else(|| invalid_kwarg(msg, key, "a string", value))
}

fn optional_string_kwarg<'m>(msg: &'m Inbound, key: &str) -> Result<Option<&'m str>, DispatchError> {
    match msg.kwarg(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| invalid_kwarg(msg, key, "a string", value)),
    }
}

/// `to_update` may be a single entity or an array of them.
fn update_list<'m>(msg: &'m Inbound) -> Result<Vec<&'m Value>, DispatchError> {
    match msg.required_kwarg("to_update")? {
        Value::Array(items) => Ok(items.iter().collect()),
        value @ Value::Object(_) => Ok(vec![value]),
        other => Err(invalid_kwarg(msg, "to_update", "an array of objects", other)),
    }
}

fn snapshot_digest(chart: &SpectralSequenceChart) -> String {
    let canonical = chart.to_json().to_string();
    let digest = sha2::Sha256::digest(canonical.as_bytes());
    let mut out = String::with_capacity(64);
    for b in digest {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

fn apply_display_state(d: &mut Dispatcher, display_state: Option<&Value>) {
    let Some(color) = display_state
        .and_then(|state| state.get("background_color"))
        .and_then(Value::as_str)
    else {
        return;
    };
    d.renderer_mut().set_background_color(color);
}

fn initialize_chart_state(d: &mut Dispatcher, msg: &Inbound) -> Result<(), DispatchError> {
    let chart = SpectralSequenceChart::from_json(msg.required_kwarg("state")?)?;
    let reinitialized = d.is_initialized();
    let counts = json!({
        "classes": chart.classes().len(),
        "edges": chart.edges().len(),
        "nodes": chart.nodes().len(),
    });
    let digest = snapshot_digest(&chart);
    d.install_chart(chart);
    apply_display_state(d, msg.kwarg("display_state"));
    tracing::info!(reinitialized, digest = %digest, "chart initialized");
    d.send(
        "initialize.complete",
        json!({ "counts": counts, "digest": digest }),
    )?;
    d.request_update()
}

fn chart_batched(d: &mut Dispatcher, msg: &Inbound) -> Result<(), DispatchError> {
    let batch = match msg.required_kwarg("batch")? {
        Value::Array(items) => items.clone(),
        other => return Err(invalid_kwarg(msg, "batch", "an array of messages", other)),
    };
    tracing::debug!(len = batch.len(), "batch");
    d.run_batch(&batch)
}

fn chart_state_reset(d: &mut Dispatcher, msg: &Inbound) -> Result<(), DispatchError> {
    d.active_chart(msg)?;
    let chart = SpectralSequenceChart::from_json(msg.required_kwarg("state")?)?;
    d.install_chart(chart);
    d.request_update()
}

fn set_x_range(d: &mut Dispatcher, msg: &Inbound) -> Result<(), DispatchError> {
    let (min, max) = (number_kwarg(msg, "x_min")?, number_kwarg(msg, "x_max")?);
    d.active_chart_mut(msg)?.set_x_range(min, max);
    d.request_update()
}

fn set_y_range(d: &mut Dispatcher, msg: &Inbound) -> Result<(), DispatchError> {
    let (min, max) = (number_kwarg(msg, "y_min")?, number_kwarg(msg, "y_max")?);
    d.active_chart_mut(msg)?.set_y_range(min, max);
    d.request_update()
}

fn set_initial_x_range(d: &mut Dispatcher, msg: &Inbound) -> Result<(), DispatchError> {
    let (min, max) = (number_kwarg(msg, "x_min")?, number_kwarg(msg, "x_max")?);
    d.active_chart_mut(msg)?.set_initial_x_range(min, max);
    d.request_update()
}

fn set_initial_y_range(d: &mut Dispatcher, msg: &Inbound) -> Result<(), DispatchError> {
    let (min, max) = (number_kwarg(msg, "y_min")?, number_kwarg(msg, "y_max")?);
    d.active_chart_mut(msg)?.set_initial_y_range(min, max);
    d.request_update()
}

fn insert_page_range(d: &mut Dispatcher, msg: &Inbound) -> Result<(), DispatchError> {
    let chart = d.active_chart_mut(msg)?;
    let raw_idx = msg.required_kwarg("idx")?;
    let idx = raw_idx
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| invalid_kwarg(msg, "idx", "a non-negative integer", raw_idx))?;
    let raw_range = msg.required_kwarg("page_range")?;
    let entry = PageEntry::from_json(raw_range)
        .ok_or_else(|| invalid_kwarg(msg, "page_range", "a page or a [min, max] pair", raw_range))?;
    chart.insert_page_range(idx, entry)?;
    d.request_update()
}

fn node_add(d: &mut Dispatcher, msg: &Inbound) -> Result<(), DispatchError> {
    let node = msg.required_kwarg("node")?;
    d.active_chart_mut(msg)?.add_node(node)?;
    d.request_update()
}

fn class_add(d: &mut Dispatcher, msg: &Inbound) -> Result<(), DispatchError> {
    let fields = msg.required_kwarg("new_class")?;
    let uuid = d.active_chart_mut(msg)?.add_class(fields)?;
    tracing::debug!(uuid, "class added");
    d.request_update()
}

fn class_update(d: &mut Dispatcher, msg: &Inbound) -> Result<(), DispatchError> {
    let chart = d.active_chart_mut(msg)?;
    for fields in update_list(msg)? {
        chart.update_class(fields)?;
    }
    d.request_update()
}

fn class_set_name(d: &mut Dispatcher, msg: &Inbound) -> Result<(), DispatchError> {
    let chart = d.active_chart_mut(msg)?;
    let x = msg.required_kwarg("x")?;
    let y = msg.required_kwarg("y")?;
    let idx = msg.required_kwarg("idx")?;
    let uuid = chart.class_by_degree_and_index_json(x, y, idx)?.uuid;
    let name = optional_string_kwarg(msg, "name")?.map(str::to_string);
    chart.set_class_name_by_uuid(uuid, name)?;
    d.request_update()
}

fn edge_add(d: &mut Dispatcher, msg: &Inbound) -> Result<(), DispatchError> {
    let fields = Value::Object(msg.kwargs.clone());
    let uuid = d.active_chart_mut(msg)?.add_edge(&fields)?;
    tracing::debug!(uuid, "edge added");
    d.request_update()
}

fn edge_update(d: &mut Dispatcher, msg: &Inbound) -> Result<(), DispatchError> {
    let chart = d.active_chart_mut(msg)?;
    for fields in update_list(msg)? {
        chart.update_edge(fields)?;
    }
    d.request_update()
}

fn set_background_color(d: &mut Dispatcher, msg: &Inbound) -> Result<(), DispatchError> {
    d.active_chart(msg)?;
    let color = string_kwarg(msg, "color")?;
    d.renderer_mut().set_background_color(color);
    Ok(())
}

fn interact_alert(d: &mut Dispatcher, msg: &Inbound) -> Result<(), DispatchError> {
    let text = string_kwarg(msg, "text")?;
    d.host_mut().alert(text);
    Ok(())
}

fn interact_prompt(d: &mut Dispatcher, msg: &Inbound) -> Result<(), DispatchError> {
    let text = string_kwarg(msg, "text")?;
    let default = optional_string_kwarg(msg, "default")?;
    let result = d.host_mut().prompt(text, default);
    d.send("interact.result", json!({ "result": result }))
}
