//! Simulated request used by the `demo` command.

use collectors::clock::Clock;
use collectors::collectors::{DataCollector, MeasurementTimer, MessageLog, Renderable, Widgets};
use collectors::config::CollectorConfig;
use collectors::models::MessageValue;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct RouteMatch<'a> {
    method: &'a str,
    path: &'a str,
    params: BTreeMap<&'a str, &'a str>,
}

/// Runs a fake request through both collectors and returns their summaries
/// keyed by collector name.
///
/// # Errors
///
/// Returns an error if a measure is stopped without having been started or
/// a summary cannot be serialized.
pub fn run(
    config: &CollectorConfig,
    clock: Arc<dyn Clock>,
    request_start: Option<f64>,
) -> anyhow::Result<Value> {
    let mut log = MessageLog::with_config(config).with_clock(Arc::clone(&clock));
    let mut timer = MeasurementTimer::with_clock(Arc::clone(&clock), request_start);

    log.add_message("Request received");

    timer.start_measure("routing", Some("Routing"));
    let route = RouteMatch {
        method: "GET",
        path: "/users/{id}",
        params: BTreeMap::from([("id", "42")]),
    };
    log.debug(MessageValue::structured(&route));
    timer.stop_measure("routing")?;

    let users = timer.measure("Controller", |timer| {
        timer.start_measure("db", Some("Database query"));
        let users = vec![json!({"id": 42, "name": "Ada"})];
        timer.stop_measure("db")?;
        log.info(format!("Loaded {} user(s)", users.len()));
        anyhow::Ok(users)
    })?;

    log.log("audit", json!({"viewed": users}));
    log.warning(MessageValue::opaque(&std::env::consts::OS));

    // Left open on purpose: collect() closes it at the request end.
    timer.start_measure("render", Some("Render"));

    tracing::info!(
        messages = log.len(),
        measures = timer.measures().len(),
        "Demo request finished"
    );

    collect_all(&mut log, &mut timer)
}

fn collect_all(log: &mut MessageLog, timer: &mut MeasurementTimer) -> anyhow::Result<Value> {
    let mut summary = Map::new();
    summary.insert(log.name().to_string(), serde_json::to_value(log.collect())?);
    summary.insert(
        timer.name().to_string(),
        serde_json::to_value(timer.collect())?,
    );
    Ok(Value::Object(summary))
}

/// Returns the widget declarations of both collectors.
#[must_use]
pub fn widgets() -> Widgets {
    let mut widgets = MessageLog::new().widgets();
    widgets.extend(MeasurementTimer::new(None).widgets());
    widgets
}
