//! Field value mapping.
//!
//! Both mappers are total: every input, including a missing one, yields an
//! output value.

use cbp_model::NA;

/// MSI stability values carried through unchanged.
pub const MS_STATUS_VOCABULARY: [&str; 3] = ["Stable", "High", "Indeterminate"];

/// Maps an `MSI_STABILITY` value to `MS_STATUS`.
///
/// Exact, case-sensitive match against [`MS_STATUS_VOCABULARY`]; anything
/// else, including a missing value, becomes `"NA"`.
pub fn map_ms_status(value: Option<&str>) -> &'static str {
    value
        .and_then(|v| MS_STATUS_VOCABULARY.into_iter().find(|status| *status == v))
        .unwrap_or(NA)
}

/// Maps `TMB_NONSYNONYMOUS` to `TUMOR_MUTATIONAL_BURDEN_PER_MEGABASE`.
///
/// Present values pass through verbatim; missing values become `"NA"`.
pub fn map_tmb_nonsynonymous(value: Option<&str>) -> String {
    value.unwrap_or(NA).to_string()
}
