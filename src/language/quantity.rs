//! Quantity types and parsing for scientific measurements with uncertainty and units

use serde::Serialize;
use std::fmt;

/// A numeric literal. Plain integers stay integers; a number written with a
/// fractional part keeps its written precision; anything carrying a unit is
/// a Quantity.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub enum Numeric<'i> {
    Integral(i64),
    Decimal(Decimal),
    Scientific(Quantity<'i>),
}

// A Quantity is an amount, possibly with uncertainty, at the magnitude if
// given, of the units specified.
//
// Valid Quantities include:
//
// 149 kg
// 5.9722 × 10²⁴ kg
// 5.9722 ± 0.0006 kg
// 5.9722 ± 0.0006 × 10²⁴ kg
//
// More conventional ASCII symbol characters are also supported:
//
// 5.9722 * 10^24 kg
// 5.9722 +/- 0.0006 kg
// 5.9722 +/- 0.0006 x 10^24 kg
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Quantity<'i> {
    pub mantissa: Decimal,
    pub uncertainty: Option<Decimal>,
    pub magnitude: Option<i8>,
    pub symbol: &'i str,
}

// A decimal number with a fixed point resolution. This isn't for numerical
// analysis, it is for carrying information: 2.50 stays 2.50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decimal {
    pub number: i64,
    pub precision: u8,
}

/// Recognize a quantity at the start of the input, returning it along with
/// the number of bytes it occupied. The unit symbol is mandatory and must be
/// separated from the number by whitespace; without one this returns None
/// and the caller falls back to a bare number.
pub fn scan_quantity(input: &str) -> Option<(Quantity, usize)> {
    let re = regex!(
        r"^([-+]?[0-9]+(?:\.[0-9]+)?)(?:[ \t]*(?:±|\+/-)[ \t]*([0-9]+(?:\.[0-9]+)?))?(?:[ \t]*(?:×|x|\*)[ \t]*10(?:\^([-+]?[0-9]+)|([⁰¹²³⁴⁵⁶⁷⁸⁹⁻]+)))?[ \t]+([a-zA-Z°/]+)"
    );

    let cap = re.captures(input)?;
    let whole = cap.get(0)?;

    // the unit symbol must end cleanly; "4 kg-meters" is not a quantity.
    if let Some(c) = input[whole.end()..]
        .chars()
        .next()
    {
        if c.is_alphanumeric() || c == '_' || c == '-' {
            return None;
        }
    }

    let mantissa = parse_decimal(
        cap.get(1)?
            .as_str(),
    )?;

    let uncertainty = match cap.get(2) {
        Some(two) => Some(parse_decimal(two.as_str())?),
        None => None,
    };

    let magnitude = if let Some(ascii) = cap.get(3) {
        Some(
            ascii
                .as_str()
                .trim_start_matches('+')
                .parse::<i8>()
                .ok()?,
        )
    } else if let Some(superscript) = cap.get(4) {
        Some(
            convert_superscript(superscript.as_str())
                .parse::<i8>()
                .ok()?,
        )
    } else {
        None
    };

    let symbol = cap
        .get(5)?
        .as_str();

    Some((
        Quantity {
            mantissa,
            uncertainty,
            magnitude,
            symbol,
        },
        whole.end(),
    ))
}

/// Recognize a bare number (optional sign, optional fractional part) at the
/// start of the input.
pub fn scan_number(input: &str) -> Option<(Numeric<'static>, usize)> {
    let re = regex!(r"^[-+]?[0-9]+(?:\.[0-9]+)?");

    let found = re.find(input)?;
    let text = found.as_str();

    let numeric = if text.contains('.') {
        Numeric::Decimal(parse_decimal(text)?)
    } else {
        Numeric::Integral(
            text.trim_start_matches('+')
                .parse()
                .ok()?,
        )
    };

    Some((numeric, found.end()))
}

/// Parse a string as a Quantity if the whole of it matches the expected
/// format.
pub fn parse_quantity(input: &str) -> Option<Quantity> {
    let input = input.trim_ascii();
    let (quantity, width) = scan_quantity(input)?;

    if width == input.len() {
        Some(quantity)
    } else {
        None
    }
}

pub fn parse_decimal(input: &str) -> Option<Decimal> {
    let (negative, digits) = match input.as_bytes().first()? {
        b'-' => (true, &input[1..]),
        b'+' => (false, &input[1..]),
        _ => (false, input),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((_, "")) => return None,
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };

    if whole.is_empty()
        || !whole
            .bytes()
            .all(|b| b.is_ascii_digit())
        || !fraction
            .bytes()
            .all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let precision = u8::try_from(fraction.len()).ok()?;

    let mut number: i64 = format!("{}{}", whole, fraction)
        .parse()
        .ok()?;
    if negative {
        number = -number;
    }

    Some(Decimal { number, precision })
}

fn convert_superscript(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '⁰' => '0',
            '¹' => '1',
            '²' => '2',
            '³' => '3',
            '⁴' => '4',
            '⁵' => '5',
            '⁶' => '6',
            '⁷' => '7',
            '⁸' => '8',
            '⁹' => '9',
            '⁻' => '-',
            _ => c,
        })
        .collect()
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self
            .number
            .unsigned_abs()
            .to_string();
        let sign = if self.number < 0 { "-" } else { "" };
        let precision = self.precision as usize;

        if precision == 0 {
            return write!(f, "{}{}", sign, digits);
        }

        let digits = format!("{:0>width$}", digits, width = precision + 1);
        let (whole, fraction) = digits.split_at(digits.len() - precision);

        write!(f, "{}{}.{}", sign, whole, fraction)
    }
}

impl fmt::Display for Quantity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mantissa)?;
        if let Some(uncertainty) = &self.uncertainty {
            write!(f, " ± {}", uncertainty)?;
        }
        if let Some(magnitude) = self.magnitude {
            write!(f, " × 10^{}", magnitude)?;
        }
        write!(f, " {}", self.symbol)
    }
}

impl fmt::Display for Numeric<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Integral(number) => write!(f, "{}", number),
            Numeric::Decimal(decimal) => write!(f, "{}", decimal),
            Numeric::Scientific(quantity) => write!(f, "{}", quantity),
        }
    }
}
