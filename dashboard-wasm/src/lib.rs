//! Framework-neutral WASM <-> JavaScript bridge for the dashboard screens.

use chrono::{DateTime, FixedOffset, Utc};
use dashboard_core::{ConfigOverrides, DashboardConfig, DashboardError, VitalKind, VitalStatus};
use dashboard_data::{BundleSource, Dashboard};
use dashboard_rules::Segment;
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize, Default)]
struct JsDashboardOptions {
    #[serde(default)]
    patient_id: Option<String>,
    #[serde(default)]
    utc_offset_minutes: Option<i32>,
    /// RFC 3339 reference instant; the current time when absent.
    #[serde(default)]
    now: Option<String>,
}

impl JsDashboardOptions {
    fn resolve(self) -> Result<(DashboardConfig, DateTime<FixedOffset>), DashboardError> {
        let config = DashboardConfig::default().merged(ConfigOverrides {
            patient_id: self.patient_id,
            utc_offset_minutes: self.utc_offset_minutes,
        });
        let timezone = config.timezone()?;
        let now = match self.now {
            Some(raw) => DateTime::parse_from_rfc3339(&raw)
                .map_err(|err| DashboardError::Parse(format!("now {raw:?}: {err}")))?
                .with_timezone(&timezone),
            None => Utc::now().with_timezone(&timezone),
        };
        Ok((config, now))
    }
}

fn parse_segment(raw: &str) -> Result<Segment, DashboardError> {
    match raw.trim().to_lowercase().as_str() {
        "upcoming" => Ok(Segment::Upcoming),
        "past" => Ok(Segment::Past),
        other => Err(DashboardError::InvalidArgument(format!(
            "unknown segment: {other:?}"
        ))),
    }
}

fn read_options(options: Option<JsValue>) -> Result<JsDashboardOptions, JsValue> {
    match options {
        Some(js) if !js.is_undefined() && !js.is_null() => from_value(js)
            .map_err(|err| JsValue::from_str(&format!("Could not read options: {err}"))),
        _ => Ok(JsDashboardOptions::default()),
    }
}

fn load_dashboard(
    bundle: JsValue,
    options: Option<JsValue>,
) -> Result<(Dashboard<BundleSource>, DateTime<FixedOffset>), JsValue> {
    let bundle_value = from_value::<serde_json::Value>(bundle)
        .map_err(|err| JsValue::from_str(&format!("Could not read JSON bundle: {err}")))?;
    let (config, now) = read_options(options)?.resolve().map_err(js_error)?;
    let source = BundleSource::from_json_value(&bundle_value).map_err(js_error)?;
    Ok((Dashboard::new(source, config), now))
}

#[wasm_bindgen]
pub fn vitals_overview(bundle: JsValue, options: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let (dashboard, now) = load_dashboard(bundle, options)?;
    let overview = dashboard.vitals_overview(&now).map_err(js_error)?;
    to_value(&overview).map_err(|err| JsValue::from_str(&format!("Could not serialize overview: {err}")))
}

#[wasm_bindgen]
pub fn appointment_listing(
    bundle: JsValue,
    segment: &str,
    options: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let segment = parse_segment(segment).map_err(js_error)?;
    let (dashboard, now) = load_dashboard(bundle, options)?;
    let listing = dashboard
        .appointment_listing(segment, &now)
        .map_err(js_error)?;
    to_value(&listing).map_err(|err| JsValue::from_str(&format!("Could not serialize listing: {err}")))
}

/// Status label ("Normal", "Elevated", "Low", "Critical") for a single value.
#[wasm_bindgen]
pub fn classify_vital(value: f64, kind: &str) -> Result<String, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let kind: VitalKind = kind.parse().map_err(js_error)?;
    Ok(VitalStatus::classify(value, kind).label().to_string())
}

fn js_error(err: DashboardError) -> JsValue {
    JsValue::from_str(&format!("Dashboard error: {err}"))
}
