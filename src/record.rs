use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use tracing::debug;

use std::path::Path;

use crate::{
    error::{Error, Result},
    order::{OrderId, OrderLine},
    usd::Usd,
};

/// Columns that must appear in the header row of every sales data file.
///
/// The address columns are dropped from the output, but their absence still
/// means the file is not a sales data export.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "ORDER ID",
    "ITEM NUMBER",
    "ITEM QUANTITY",
    "ITEM PRICE",
    "CUSTOMER NAME",
    "ADDRESS",
    "CITY",
    "STATE",
    "POSTAL CODE",
    "COUNTRY",
];

/// Columns carried to the order sheets when present, in fixed positions.
pub const OPTIONAL_COLUMNS: [&str; 4] = ["ORDER DATE", "PRODUCT LINE", "PRODUCT CODE", "STATUS"];

/// Defines the CSV format for sales data.
///
/// The address columns are required (see [`REQUIRED_COLUMNS`]) but never
/// kept. Values of columns that are neither required nor in
/// [`OPTIONAL_COLUMNS`] end up in `extra`, in source order; their headers
/// are [`SalesTable::extra_columns`].
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SalesRecord {
    #[serde(rename = "ORDER ID")]
    pub order_id: OrderId,
    #[serde(rename = "ORDER DATE", default)]
    pub order_date: Option<String>,
    #[serde(rename = "ITEM NUMBER")]
    pub item_number: u32,
    #[serde(rename = "PRODUCT LINE", default)]
    pub product_line: Option<String>,
    #[serde(rename = "PRODUCT CODE", default)]
    pub product_code: Option<String>,
    #[serde(rename = "ITEM QUANTITY")]
    pub qty: i32,
    #[serde(rename = "ITEM PRICE")]
    pub price: Usd,
    #[serde(rename = "STATUS", default)]
    pub status: Option<String>,
    #[serde(rename = "CUSTOMER NAME")]
    pub customer_name: String,
    #[serde(skip)]
    pub extra: Vec<String>,
}

impl SalesRecord {
    /// Splits the record into its order id and the line that goes on the
    /// order sheet, computing the line's total price on the way.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] if quantity times price cannot be
    /// represented.
    pub fn into_line(self) -> Result<(OrderId, OrderLine)> {
        let total = self.price.checked_mul(self.qty).ok_or_else(|| {
            Error::Overflow(format!(
                "total price of order {} item {}",
                self.order_id, self.item_number
            ))
        })?;
        let line = OrderLine {
            order_date: self.order_date,
            item_number: self.item_number,
            product_line: self.product_line,
            product_code: self.product_code,
            qty: self.qty,
            price: self.price,
            total,
            status: self.status,
            customer_name: self.customer_name,
            extra: self.extra,
        };
        Ok((self.order_id, line))
    }
}

/// The sales records of one file, and the headers of its extra columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SalesTable {
    pub extra_columns: Vec<String>,
    pub records: Vec<SalesRecord>,
}

/// Reads every sales record from the CSV file at `path`.
///
/// The header row is checked against [`REQUIRED_COLUMNS`] before any row is
/// read, so a schema problem is reported once, naming every missing column.
///
/// # Errors
///
/// Returns [`Error::Schema`] if required columns are missing, and
/// [`Error::Csv`] if the file cannot be read or a row cannot be parsed.
pub fn read_csv(path: impl AsRef<Path>) -> Result<SalesTable> {
    let path = path.as_ref();
    let csv_err = |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(csv_err)?;
    let headers = rdr.headers().map_err(csv_err)?.clone();
    check_headers(&headers, path)?;

    let extra_idx: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !REQUIRED_COLUMNS.contains(h) && !OPTIONAL_COLUMNS.contains(h))
        .map(|(i, _)| i)
        .collect();
    let extra_columns = extra_idx.iter().map(|&i| headers[i].to_string()).collect();

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row.map_err(csv_err)?;
        let mut record: SalesRecord = row.deserialize(Some(&headers)).map_err(csv_err)?;
        record.extra = extra_idx
            .iter()
            .map(|&i| row.get(i).unwrap_or_default().to_string())
            .collect();
        records.push(record);
    }
    debug!(records = records.len(), path = %path.display(), "loaded sales records");
    Ok(SalesTable {
        extra_columns,
        records,
    })
}

fn check_headers(headers: &StringRecord, path: &Path) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(ToString::to_string)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::Schema {
            path: path.to_path_buf(),
            missing,
        })
    }
}
