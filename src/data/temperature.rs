use super::error::TemperatureError;
use super::model::{DecimalConvention, RawValue};

/// Coerce one temperature cell to a finite `f64`.
///
/// The decimal convention is the file's, not guessed per value: under
/// [`DecimalConvention::Comma`] the text `1.5` is rejected, and under
/// [`DecimalConvention::Period`] the text `1,5` is rejected.
pub fn coerce_temperature(
    value: &RawValue,
    decimal: DecimalConvention,
) -> Result<f64, TemperatureError> {
    match value {
        RawValue::Number(v) if v.is_finite() => Ok(*v),
        RawValue::Number(v) => Err(TemperatureError::NotFinite(v.to_string())),
        RawValue::Text(text) => coerce_text(text, decimal),
    }
}

fn coerce_text(text: &str, decimal: DecimalConvention) -> Result<f64, TemperatureError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TemperatureError::Empty);
    }

    let invalid = || TemperatureError::Invalid(trimmed.to_string());

    let foreign = match decimal {
        DecimalConvention::Comma => '.',
        DecimalConvention::Period => ',',
    };
    if trimmed.contains(foreign) {
        return Err(invalid());
    }

    // Only digits, sign, exponent and the separator may reach `parse`, so
    // words such as "nan" or "inf" never do.
    let normalized: String = trimmed
        .chars()
        .map(|c| match c {
            '\u{2212}' => '-',
            c if c == decimal.separator() => '.',
            c => c,
        })
        .collect();
    if !normalized
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
    {
        return Err(invalid());
    }

    let parsed: f64 = normalized.parse().map_err(|_| invalid())?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(TemperatureError::NotFinite(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawValue {
        RawValue::from(s)
    }

    #[test]
    fn comma_convention() {
        assert_eq!(coerce_temperature(&text("-4,5"), DecimalConvention::Comma), Ok(-4.5));
        assert_eq!(coerce_temperature(&text(" 12 "), DecimalConvention::Comma), Ok(12.0));
        assert_eq!(
            coerce_temperature(&text("-4.5"), DecimalConvention::Comma),
            Err(TemperatureError::Invalid("-4.5".to_string()))
        );
    }

    #[test]
    fn period_convention() {
        assert_eq!(coerce_temperature(&text("-4.5"), DecimalConvention::Period), Ok(-4.5));
        assert!(coerce_temperature(&text("-4,5"), DecimalConvention::Period).is_err());
    }

    #[test]
    fn unicode_minus_is_accepted() {
        assert_eq!(
            coerce_temperature(&text("\u{2212}3,25"), DecimalConvention::Comma),
            Ok(-3.25)
        );
    }

    #[test]
    fn placeholders_are_failures_not_zero() {
        for s in ["N/A", "--", "nan", "inf", "-"] {
            assert!(
                coerce_temperature(&text(s), DecimalConvention::Comma).is_err(),
                "{s}"
            );
        }
        assert_eq!(
            coerce_temperature(&text(""), DecimalConvention::Comma),
            Err(TemperatureError::Empty)
        );
    }

    #[test]
    fn numbers_pass_through() {
        assert_eq!(coerce_temperature(&RawValue::Number(-4.7), DecimalConvention::Comma), Ok(-4.7));
        assert!(matches!(
            coerce_temperature(&RawValue::Number(f64::NAN), DecimalConvention::Period),
            Err(TemperatureError::NotFinite(_))
        ));
    }

    #[test]
    fn huge_exponents_are_not_finite() {
        assert!(matches!(
            coerce_temperature(&text("1e999"), DecimalConvention::Period),
            Err(TemperatureError::NotFinite(_))
        ));
    }
}
