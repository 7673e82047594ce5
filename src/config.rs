use crate::coverage::{CoverageRule, CHECKOUT_PURPOSE};
use crate::time::SLOT_MINUTES;

/// Per-form settings. Defaults match the booking site: 30 minute slots,
/// coverage enforced for `checkout` appointments only.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct FormConfig {
    pub slot_minutes: u32,
    pub coverage_purpose: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        FormConfig {
            slot_minutes: SLOT_MINUTES,
            coverage_purpose: CHECKOUT_PURPOSE.to_string(),
        }
    }
}

impl FormConfig {
    pub fn coverage_rule(&self) -> CoverageRule {
        CoverageRule::new(&self.coverage_purpose, self.slot_minutes)
    }
}
