//! Reshaping a wide, one-row extract into a tidy per-entity table.

mod label;
mod reshaper;

pub use label::{clean_numeric_text, split_label, transpose, RawRecord, LABEL_DELIMITER};
pub use reshaper::{CleanRecord, CleanTable, FilterReason, FilteredRow, ReshapeConfig, Reshaper};
