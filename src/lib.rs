#![doc = include_str!("../README.md")]
use chrono::NaiveDate;
use tracing::{info, instrument};

use std::path::{Path, PathBuf};

pub mod error;
pub mod groups;
pub mod order;
pub mod paths;
pub mod record;
pub mod sheet;
pub mod usd;

pub use error::{Error, Result};
pub use groups::OrderGroups;
pub use order::{Order, OrderId, OrderLine};
pub use paths::{resolve_output_dir, resolve_source_path};
pub use record::{read_csv, SalesRecord, SalesTable};
pub use usd::Usd;

/// Splits the sales data CSV file at `source` into one workbook per order.
///
/// The workbooks are written to `Orders_<today>` next to `source`. Returns
/// the paths of the files written, in ascending order id.
///
/// # Errors
///
/// Returns the first error encountered. The whole table is loaded and
/// validated before any workbook is written, so a schema error leaves no
/// output files; a write error leaves the files written before it.
#[instrument(level = "info", skip_all, fields(source = %source.display(), today = %today))]
pub fn run(source: &Path, today: NaiveDate) -> Result<Vec<PathBuf>> {
    let dir = resolve_output_dir(source, today)?;
    let table = read_csv(source)?;
    export_orders(OrderGroups::from_table(table)?, &dir, today)
}

/// Writes one workbook per order in `groups` into `dir`.
///
/// `created` is stamped into each workbook's document properties.
///
/// # Errors
///
/// Returns [`Error::Overflow`] if an order's grand total cannot be
/// represented, and [`Error::Xlsx`] for the first workbook that cannot be
/// written.
pub fn export_orders(groups: OrderGroups, dir: &Path, created: NaiveDate) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(groups.len());
    let extra_columns = groups.extra_columns().to_vec();
    for order in groups.into_orders() {
        let order = order?;
        let path = dir.join(order.file_name());
        sheet::write_order(&order, &extra_columns, &path, created)?;
        info!(
            order_id = %order.id(),
            lines = order.lines().len(),
            grand_total = %order.grand_total(),
            path = %path.display(),
            "wrote order workbook"
        );
        written.push(path);
    }
    Ok(written)
}
