//! Plain-text number formatting for payment displays.
//!
//! Calculations stay in `f64`; values are converted to [`Decimal`] only at
//! the edge so rounding is exact. Ties round to the nearest even digit, the
//! same as the platform number formatters the grid was first shown with.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds `value` to `places` decimal places for display.
///
/// Returns `None` for values a [`Decimal`] cannot hold (NaN, infinities,
/// magnitudes beyond about 7.9e28). A result that rounds to zero is
/// returned as unsigned zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use payment_core::format::round_for_display;
///
/// assert_eq!(round_for_display(612.5625, 2), Some(dec!(612.56)));
/// assert_eq!(round_for_display(2.5, 0), Some(dec!(2)));
/// assert_eq!(round_for_display(3.5, 0), Some(dec!(4)));
/// assert_eq!(round_for_display(f64::NAN, 0), None);
/// ```
pub fn round_for_display(
    value: f64,
    places: u32,
) -> Option<Decimal> {
    // `retain` keeps the exact binary value so 1.05 (really 1.05000000000000004...)
    // rounds the way printf would.
    let exact = Decimal::from_f64_retain(value)?;
    let mut rounded = exact.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(places);
    Some(rounded)
}

fn fixed(
    value: f64,
    places: u32,
) -> String {
    match round_for_display(value, places) {
        Some(rounded) => rounded.to_string(),
        None => format!("{value:.prec$}", prec = places as usize),
    }
}

/// Inserts `,` between every group of three integer digits.
fn group_thousands(whole: &str) -> String {
    let (sign, digits) = match whole.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", whole),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}{grouped}")
}

/// Whole number without grouping, e.g. `613`.
pub fn format_whole(value: f64) -> String {
    fixed(value, 0)
}

/// Dollar amount rounded to whole dollars with thousands separators.
///
/// # Examples
///
/// ```
/// use payment_core::format::format_currency;
///
/// assert_eq!(format_currency(35000.0), "$35,000");
/// assert_eq!(format_currency(612.5625), "$613");
/// assert_eq!(format_currency(-1234.0), "$-1,234");
/// ```
pub fn format_currency(value: f64) -> String {
    let whole = format_whole(value);
    if whole.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        format!("${}", group_thousands(&whole))
    } else {
        format!("${whole}")
    }
}

/// Short form used for cash-down row labels.
///
/// Below 1,000 the whole number is shown. From 1,000 up the value is shown
/// in thousands with a `k` suffix, with one decimal place unless it is a
/// whole number of thousands.
///
/// # Examples
///
/// ```
/// use payment_core::format::format_compact;
///
/// assert_eq!(format_compact(500.0), "500");
/// assert_eq!(format_compact(2000.0), "2k");
/// assert_eq!(format_compact(1500.0), "1.5k");
/// assert_eq!(format_compact(12345.0), "12.3k");
/// ```
pub fn format_compact(value: f64) -> String {
    if value < 1_000.0 {
        return format_whole(value);
    }

    let thousands = value / 1_000.0;
    if thousands == thousands.floor() {
        format!("{}k", fixed(thousands, 0))
    } else {
        format!("{}k", fixed(thousands, 1))
    }
}

/// Percent with a fixed number of decimal places, e.g. `4.50%`.
pub fn format_rate(
    value: f64,
    places: u32,
) -> String {
    format!("{}%", fixed(value, places))
}
