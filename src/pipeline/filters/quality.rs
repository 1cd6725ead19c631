use std::sync::Arc;

use crate::config::FilterConfig;
use crate::executor::FilterStage;
use crate::pipeline::filters::syntax::SyntaxValidator;

/// Reason tags, in stage order.
pub const REASON_MAX_LL: &str = "max_ll";
pub const REASON_FILE_TOO_SMALL: &str = "file_too_small";
pub const REASON_FILE_TOO_LARGE: &str = "file_too_large";
pub const REASON_ALPHANUM_FRAC: &str = "alphanum_frac";
pub const REASON_AVE_LL: &str = "ave_ll";
pub const REASON_MIN_LINES: &str = "min_lines";
pub const REASON_SYNTAX: &str = "python2";

/// Builds the fixed, ordered stage list for the row filter funnel.
///
/// The list is data, not control flow: the funnel applies whatever it is
/// handed, and the ledger bookkeeping never changes when a stage is added or
/// reordered here.
pub fn build_stages(
    config: &FilterConfig,
    validator: Arc<dyn SyntaxValidator>,
) -> Vec<FilterStage> {
    let max_ll = config.max_ll;
    let min_max_ll = config.min_max_ll;
    let min_len = config.min_len;
    let max_size_bytes = i64::from(config.max_size_kbs) * 1024;
    let min_alphanum = config.min_alphanum;
    let max_alphanum = config.max_alphanum;
    let min_ave_ll = config.min_ave_ll;
    let min_lines = config.min_lines;

    vec![
        FilterStage::new(REASON_MAX_LL, move |row| {
            row.max_line_length >= min_max_ll && row.max_line_length <= max_ll
        }),
        FilterStage::new(REASON_FILE_TOO_SMALL, move |row| row.file_size >= min_len),
        FilterStage::new(REASON_FILE_TOO_LARGE, move |row| {
            i64::from(row.file_size) <= max_size_bytes
        }),
        FilterStage::new(REASON_ALPHANUM_FRAC, move |row| {
            row.alphanum_fraction > min_alphanum && row.alphanum_fraction < max_alphanum
        }),
        FilterStage::new(REASON_AVE_LL, move |row| row.avg_line_length > min_ave_ll),
        FilterStage::new(REASON_MIN_LINES, move |row| {
            // A non-positive average line length estimates zero lines instead
            // of dividing by it.
            row.avg_line_length > 0.0
                && row.file_size as f32 / row.avg_line_length >= min_lines as f32
        }),
        FilterStage::new(REASON_SYNTAX, move |row| validator.is_valid(&row.content)),
    ]
}
