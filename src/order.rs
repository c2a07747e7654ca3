use regex::Regex;
use serde_with::DeserializeFromStr;

use std::{convert::Infallible, fmt::Display, str::FromStr, sync::LazyLock};

use crate::{
    error::{Error, Result},
    usd::Usd,
};

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("static regex compiles"));

/// Label written in the price column of the grand total row.
pub const GRAND_TOTAL_LABEL: &str = "GRAND TOTAL:";

/// An order identifier, as read from the `ORDER ID` column.
///
/// Ids that are whole numbers compare numerically, so `9` sorts before `10`;
/// any other id compares as text. Numeric ids sort before text ids.
#[derive(Clone, Debug, DeserializeFromStr, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum OrderId {
    Num(u64),
    Text(String),
}

impl FromStr for OrderId {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Ok(s.parse().map_or_else(|_| Self::Text(s.to_string()), Self::Num))
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One line of an order sheet: a sales record with its total price computed,
/// and without the order id or address fields.
///
/// `extra` holds the values of any further source columns, in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderLine {
    pub order_date: Option<String>,
    pub item_number: u32,
    pub product_line: Option<String>,
    pub product_code: Option<String>,
    pub qty: i32,
    pub price: Usd,
    pub total: Usd,
    pub status: Option<String>,
    pub customer_name: String,
    pub extra: Vec<String>,
}

/// All the lines sharing one order id, sorted by item number, with their
/// grand total.
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    id: OrderId,
    lines: Vec<OrderLine>,
    grand_total: Usd,
}

impl Order {
    /// Creates an order from its lines, sorting them by item number and
    /// summing their totals.
    ///
    /// The sort is stable: lines with the same item number keep the order
    /// they were given in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] if the grand total cannot be represented.
    pub fn new(id: OrderId, mut lines: Vec<OrderLine>) -> Result<Self> {
        lines.sort_by_key(|line| line.item_number);
        let grand_total = Usd::checked_sum(lines.iter().map(|line| line.total))
            .ok_or_else(|| Error::Overflow(format!("grand total of order {id}")))?;
        Ok(Self {
            id,
            lines,
            grand_total,
        })
    }

    #[must_use]
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    #[must_use]
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Returns the sum of every line's total price.
    #[must_use]
    pub fn grand_total(&self) -> Usd {
        self.grand_total
    }

    /// Returns the customer name of the first line after sorting.
    #[must_use]
    pub fn customer_name(&self) -> &str {
        self.lines
            .first()
            .map_or("", |line| line.customer_name.as_str())
    }

    /// Returns the workbook file name, `Order{id}_{customer}.xlsx`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use order_split::{Order, OrderId, OrderLine, Usd};
    /// let line = OrderLine {
    ///     item_number: 1,
    ///     qty: 1,
    ///     price: Usd::from_cents(100),
    ///     total: Usd::from_cents(100),
    ///     customer_name: "O'Brien & Co.".into(),
    ///     ..OrderLine::default()
    /// };
    /// let order = Order::new(OrderId::Num(1002), vec![line]).unwrap();
    /// assert_eq!(order.file_name(), "Order1002_OBrienCo.xlsx");
    /// ```
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "Order{}_{}.xlsx",
            self.id,
            sanitize_name(self.customer_name())
        )
    }

    #[must_use]
    pub fn sheet_name(&self) -> String {
        format!("Order #{}", self.id)
    }
}

/// Removes every character outside `[A-Za-z0-9_]` from `name`.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    NON_WORD.replace_all(name, "").into_owned()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn line(item_number: u32, qty: i32, cents: i64, customer_name: &str) -> OrderLine {
        let price = Usd::from_cents(cents);
        OrderLine {
            item_number,
            qty,
            price,
            total: price.checked_mul(qty).unwrap(),
            customer_name: customer_name.into(),
            ..OrderLine::default()
        }
    }

    #[rstest]
    #[case::punctuation("O'Brien & Co.", "OBrienCo")]
    #[case::digits_and_underscore("Acme_Corp 2", "Acme_Corp2")]
    #[case::non_ascii("Café Münster", "CafMnster")]
    #[case::nothing_left("&&&", "")]
    fn sanitize_name_fn_keeps_only_word_characters(#[case] name: &str, #[case] want: &str) {
        assert_eq!(sanitize_name(name), want);
    }

    #[rstest]
    #[case::numeric("10100", OrderId::Num(10100))]
    #[case::padded(" 42 ", OrderId::Num(42))]
    #[case::text("SO-1", OrderId::Text("SO-1".into()))]
    #[case::negative("-3", OrderId::Text("-3".into()))]
    fn order_id_from_str_fn_prefers_numbers(#[case] input: &str, #[case] want: OrderId) {
        assert_eq!(OrderId::from_str(input).unwrap(), want);
        assert_eq!(want.to_string(), input.trim());
    }

    #[test]
    fn order_ids_sort_numerically_then_as_text() {
        let mut ids: Vec<OrderId> = ["SO-2", "10", "SO-10", "9", "SO-1"]
            .into_iter()
            .map(|s| s.parse().unwrap())
            .collect();
        ids.sort();
        let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(ids, vec!["9", "10", "SO-1", "SO-10", "SO-2"]);
    }

    #[test]
    fn new_fn_sorts_lines_by_item_number_stably() {
        let order = Order::new(
            OrderId::Num(10101),
            vec![
                line(4, 25, 10806, "Blauer See"),
                line(1, 26, 16706, "Blauer See"),
                line(4, 45, 3253, "Blauer See"),
                line(2, 46, 4435, "Blauer See"),
            ],
        )
        .unwrap();
        let keys: Vec<_> = order.lines().iter().map(|l| (l.item_number, l.qty)).collect();
        assert_eq!(keys, vec![(1, 26), (2, 46), (4, 25), (4, 45)]);
    }

    #[test]
    fn grand_total_fn_sums_line_totals() {
        let order = Order::new(
            OrderId::Num(10102),
            vec![line(2, 39, 9555, "Vitachrome"), line(1, 41, 4313, "Vitachrome")],
        )
        .unwrap();
        assert_eq!(order.grand_total(), Usd::from_cents(549_478));
        assert_eq!(
            Some(order.grand_total()),
            Usd::checked_sum(order.lines().iter().map(|l| l.total))
        );
    }

    #[test]
    fn new_fn_returns_error_when_grand_total_overflows() {
        let max = Usd::from_str("79228162514264337593543950335").unwrap();
        let big = OrderLine {
            total: max,
            ..line(1, 1, 0, "Big Spender")
        };
        let err = Order::new(OrderId::Num(5), vec![big.clone(), big]).unwrap_err();
        assert!(matches!(err, Error::Overflow(_)), "unexpected error: {err}");
    }

    #[test]
    fn names_are_derived_from_id_and_first_sorted_customer() {
        let order = Order::new(
            OrderId::Num(7),
            vec![line(2, 1, 100, "Second Name"), line(1, 1, 100, "First, Name!")],
        )
        .unwrap();
        assert_eq!(order.customer_name(), "First, Name!");
        assert_eq!(order.file_name(), "Order7_FirstName.xlsx");
        assert_eq!(order.sheet_name(), "Order #7");

        let text = Order::new(OrderId::Text("SO-1".into()), vec![line(1, 1, 100, "Acme")]).unwrap();
        assert_eq!(text.file_name(), "OrderSO-1_Acme.xlsx");
        assert_eq!(text.sheet_name(), "Order #SO-1");
    }
}
