pub mod formatter;

pub use formatter::{
    format_batch_json, format_batch_table, format_error_json, format_json, format_report, format_score,
    get_terminal_width, should_use_colors,
};
