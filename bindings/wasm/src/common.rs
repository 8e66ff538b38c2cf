use anyhow::{anyhow, Result};
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde::Serialize;
use time::{Date, Month};
use wasm_bindgen::JsValue;
use webgis_core::{LayerKey, Viewport};

pub(crate) fn js_err(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Serialize through a JSON string and let the browser parse it;
/// GeoJSON maps are large and this avoids building them field by field.
pub(crate) fn to_js_json(value: &impl Serialize) -> Result<JsValue, JsValue> {
    let text = serde_json::to_string(value)
        .map_err(|e| js_err(format!("Failed to serialize to JSON: {e}")))?;
    js_sys::JSON::parse(&text).map_err(|e| js_err(format!("Failed to parse JSON: {e:?}")))
}

pub(crate) fn to_js(value: &impl Serialize) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| e.into())
}

pub(crate) fn parse_layer(key: &str) -> Result<LayerKey> {
    LayerKey::from_str(key).ok_or_else(|| {
        anyhow!(
            "Unknown layer {:?}. Expected one of: municipalities, strata, informal_settlements, housing_program_points",
            key
        )
    })
}

pub(crate) fn parse_bbox(bbox: &[f64]) -> Result<Viewport> {
    Viewport::from_bbox(bbox).map_err(|_| anyhow!("bbox must be four finite numbers [west, south, east, north]"))
}

/// Today's date from the browser clock (`time`'s system clock is unavailable on wasm32).
pub(crate) fn today() -> Result<Date> {
    let now = js_sys::Date::new_0();
    let month = Month::try_from(now.get_utc_month() as u8 + 1)?;
    Ok(Date::from_calendar_date(now.get_utc_full_year() as i32, month, now.get_utc_date() as u8)?)
}

/// Forwards `log` records to `console.*`.
struct ConsoleLog;

impl Log for ConsoleLog {
    fn enabled(&self, metadata: &Metadata) -> bool { metadata.level() <= log::max_level() }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("{}", record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLog = ConsoleLog;

pub(crate) fn init_console_log() {
    // Already installed when the module is instantiated twice.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}
