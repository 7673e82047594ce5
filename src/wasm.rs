//! Bindings for calling the form checks from the booking page.

use crate::availability::{self, ReservationRecord};
use crate::config::FormConfig;
use crate::coverage;
use crate::form::{AppointmentForm, FormError, FormState};
use crate::time::{self, TimeOfDay};
use std::collections::BTreeSet;
use wasm_bindgen::prelude::*;

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(Into::into)
}

/// Display labels (`9:30am`) for `count` slots starting at `start_time`.
/// An unusable start time gives an empty array.
#[wasm_bindgen(js_name = labelSlots)]
pub fn label_slots(start_time: &str, count: usize) -> Result<JsValue, JsValue> {
    let labels: Vec<String> = time::label_slots(TimeOfDay::parse_start_time(start_time), count)
        .iter()
        .map(ToString::to_string)
        .collect();
    to_js(&labels)
}

/// `reservations` is an array of `{ slotKey, date }` objects, `date` may carry a time.
#[wasm_bindgen(js_name = computeUnavailable)]
pub fn compute_unavailable(
    selected_date: Option<String>,
    reservations: JsValue,
    all_slot_keys: JsValue,
) -> Result<JsValue, JsValue> {
    let reservations: Vec<ReservationRecord> = serde_wasm_bindgen::from_value(reservations)?;
    let all_slot_keys: BTreeSet<String> = serde_wasm_bindgen::from_value(all_slot_keys)?;

    to_js(&availability::compute_unavailable(
        selected_date.as_deref(),
        &reservations,
        &all_slot_keys,
    ))
}

#[wasm_bindgen(js_name = badgeMinutes)]
pub fn badge_minutes(label: &str) -> u32 {
    coverage::badge_minutes(label)
}

#[wasm_bindgen(js_name = checkCoverage)]
pub fn check_coverage(
    purpose: Option<String>,
    badge_minutes: Vec<u32>,
    selected_slot_count: usize,
) -> Result<JsValue, JsValue> {
    to_js(&coverage::check_coverage(
        purpose.as_deref(),
        badge_minutes,
        selected_slot_count,
    ))
}

/// Inline coverage message, empty when the selection is enough
#[wasm_bindgen(js_name = coverageMessage)]
pub fn coverage_message(
    purpose: Option<String>,
    badge_minutes: Vec<u32>,
    selected_slot_count: usize,
) -> String {
    coverage::check_coverage(purpose.as_deref(), badge_minutes, selected_slot_count).message()
}

fn form_error(err: FormError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// The add form held on the page side. Every method returns the fresh
/// coverage so the page can re-render the message without another call.
#[wasm_bindgen]
pub struct BookingForm {
    inner: AppointmentForm,
}

#[wasm_bindgen]
impl BookingForm {
    /// `config` may be `undefined` for the defaults, `state` is a `FormState`
    /// object (`purpose`, `date`, `slots`, `badges`, `reservations`).
    #[wasm_bindgen(constructor)]
    pub fn attach(config: JsValue, state: JsValue, page_query: &str) -> Result<BookingForm, JsValue> {
        let config: FormConfig = if config.is_undefined() || config.is_null() {
            FormConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let state: FormState = serde_wasm_bindgen::from_value(state)?;

        Ok(BookingForm {
            inner: AppointmentForm::attach(&config, state, page_query),
        })
    }

    pub fn relabel(&mut self, page_query: &str) -> usize {
        self.inner.relabel(page_query)
    }

    pub fn slots(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.slots())
    }

    pub fn badges(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.badges())
    }

    #[wasm_bindgen(js_name = reservedNotice)]
    pub fn reserved_notice(&self) -> Option<String> {
        self.inner.reserved_notice().map(str::to_string)
    }

    #[wasm_bindgen(js_name = coverageMessage)]
    pub fn coverage_message(&self) -> Option<String> {
        self.inner.coverage_message().map(str::to_string)
    }

    #[wasm_bindgen(js_name = selectPurpose)]
    pub fn select_purpose(&mut self, purpose: Option<String>) -> Result<JsValue, JsValue> {
        to_js(&self.inner.select_purpose(purpose.as_deref()))
    }

    #[wasm_bindgen(js_name = setBadgeChecked)]
    pub fn set_badge_checked(&mut self, index: usize, checked: bool) -> Result<JsValue, JsValue> {
        let coverage = self.inner.set_badge_checked(index, checked).map_err(form_error)?;
        to_js(&coverage)
    }

    #[wasm_bindgen(js_name = setSlotChecked)]
    pub fn set_slot_checked(&mut self, key: &str, checked: bool) -> Result<JsValue, JsValue> {
        let coverage = self.inner.set_slot_checked(key, checked).map_err(form_error)?;
        to_js(&coverage)
    }

    #[wasm_bindgen(js_name = setDate)]
    pub fn set_date(&mut self, date: Option<String>) -> Result<JsValue, JsValue> {
        to_js(&self.inner.set_date(date.as_deref()))
    }

    /// `true` lets the submission through. On `false` the page cancels it and
    /// shows `submitPrompt()`, the message element already names the minutes.
    pub fn submit(&mut self) -> bool {
        self.inner.submit().is_ok()
    }

    #[wasm_bindgen(js_name = submitPrompt)]
    pub fn submit_prompt() -> String {
        coverage::SUBMIT_PROMPT.to_string()
    }
}
