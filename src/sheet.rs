//! Writes one [`Order`] to a formatted Excel workbook.
//!
//! Every workbook has the same layout, given by [`LAYOUT`]: a bold header
//! row, one row per order line, then a grand total row holding only the
//! [`GRAND_TOTAL_LABEL`] and the summed total price. Source columns outside
//! the layout follow it as text columns from J onward, in source order.

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{
    DocProperties, ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet,
    XlsxError,
};

use std::path::Path;

use crate::{
    error::{Error, Result},
    order::{Order, OrderLine, GRAND_TOTAL_LABEL},
    usd::Usd,
};

/// Number format for the price columns: dollar sign, thousands separator,
/// two decimal places.
pub const CURRENCY_FORMAT: &str = "$#,##0.00";

/// One output column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Column {
    pub header: &'static str,
    pub width: f64,
    pub currency: bool,
}

const fn column(header: &'static str, width: f64, currency: bool) -> Column {
    Column {
        header,
        width,
        currency,
    }
}

/// Column layout shared by every order workbook, columns A to I.
pub const LAYOUT: [Column; 9] = [
    column("ORDER DATE", 11.0, false),
    column("ITEM NUMBER", 13.0, false),
    column("PRODUCT LINE", 15.0, false),
    column("PRODUCT CODE", 15.0, false),
    column("ITEM QUANTITY", 15.0, false),
    column("ITEM PRICE", 13.0, true),
    column("TOTAL PRICE", 13.0, true),
    column("STATUS", 10.0, false),
    column("CUSTOMER NAME", 30.0, false),
];

const PRICE_COL: usize = 5;
const TOTAL_COL: usize = 6;
// First column after the layout (J).
const EXTRA_COL: u16 = LAYOUT.len() as u16;

/// A value to be written into one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Cell<'a> {
    Empty,
    Text(&'a str),
    Number(f64),
    Money(Usd),
}

impl<'a> From<Option<&'a str>> for Cell<'a> {
    fn from(text: Option<&'a str>) -> Self {
        text.map_or(Cell::Empty, Cell::Text)
    }
}

impl<'a> From<&'a str> for Cell<'a> {
    fn from(text: &'a str) -> Self {
        if text.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(text)
        }
    }
}

fn line_cells(line: &OrderLine) -> Vec<Cell<'_>> {
    let mut cells = vec![
        line.order_date.as_deref().into(),
        Cell::Number(f64::from(line.item_number)),
        line.product_line.as_deref().into(),
        line.product_code.as_deref().into(),
        Cell::Number(f64::from(line.qty)),
        Cell::Money(line.price),
        Cell::Money(line.total),
        line.status.as_deref().into(),
        Cell::Text(&line.customer_name),
    ];
    cells.extend(line.extra.iter().map(|value| Cell::from(value.as_str())));
    cells
}

fn total_cells(grand_total: Usd) -> [Cell<'static>; 9] {
    let mut cells = [Cell::Empty; 9];
    cells[PRICE_COL] = Cell::Text(GRAND_TOTAL_LABEL);
    cells[TOTAL_COL] = Cell::Money(grand_total);
    cells
}

/// Writes `order` to a new workbook at `path`, replacing any existing file.
///
/// `extra_columns` are the headers of the values in each line's
/// [`OrderLine::extra`]; they are written after [`LAYOUT`]. The workbook's
/// creation date is set to `created` so that writing the same order on the
/// same day produces identical bytes.
///
/// # Errors
///
/// Returns [`Error::Xlsx`] if the workbook cannot be built or saved.
pub fn write_order(
    order: &Order,
    extra_columns: &[String],
    path: &Path,
    created: NaiveDate,
) -> Result<()> {
    let mut workbook =
        build_workbook(order, extra_columns, created).map_err(|source| Error::Xlsx {
            path: path.to_path_buf(),
            source,
        })?;
    workbook.save(path).map_err(|source| Error::Xlsx {
        path: path.to_path_buf(),
        source,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn build_workbook(
    order: &Order,
    extra_columns: &[String],
    created: NaiveDate,
) -> std::result::Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(
        created.year() as u16,
        created.month() as u8,
        created.day() as u8,
    )?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let header_fmt = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);
    let money_fmt = Format::new().set_num_format(CURRENCY_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(order.sheet_name())?;
    for (col, spec) in (0u16..).zip(LAYOUT.iter()) {
        worksheet.set_column_width(col, spec.width)?;
        if spec.currency {
            worksheet.set_column_format(col, &money_fmt)?;
        }
        worksheet.write_string_with_format(0, col, spec.header, &header_fmt)?;
    }
    for (col, header) in (EXTRA_COL..).zip(extra_columns) {
        worksheet.write_string_with_format(0, col, header, &header_fmt)?;
    }

    let mut row = 1u32;
    for line in order.lines() {
        write_row(worksheet, row, &line_cells(line), &money_fmt)?;
        row += 1;
    }
    write_row(worksheet, row, &total_cells(order.grand_total()), &money_fmt)?;
    Ok(workbook)
}

fn write_row(
    worksheet: &mut Worksheet,
    row: u32,
    cells: &[Cell<'_>],
    money_fmt: &Format,
) -> std::result::Result<(), XlsxError> {
    for (col, cell) in (0u16..).zip(cells) {
        match cell {
            Cell::Empty => {}
            Cell::Text(text) => {
                worksheet.write_string(row, col, *text)?;
            }
            Cell::Number(number) => {
                worksheet.write_number(row, col, *number)?;
            }
            Cell::Money(amount) => {
                worksheet.write_number_with_format(row, col, amount.to_dollars(), money_fmt)?;
            }
        }
    }
    Ok(())
}
