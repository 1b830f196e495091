//! Canonical cell text rendering
//!
//! Every value that reaches a file goes through [`render`], so the workbook,
//! the mirror and the on-screen output always agree on the textual form:
//! fixed decimal places per column, `.` as the decimal separator.
//!
//! Comma-to-dot normalisation is applied to *all* text, including free-text
//! columns such as the tire name. A name like "Conti, soft" therefore exports
//! as "Conti. soft". This matches files written by earlier versions of the
//! tool; do not change it without migrating those files.

use crate::record::{CellValue, Field};

/// Render one cell to its canonical text.
pub fn render(field: Field, value: CellValue<'_>) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Number(n) => format!("{:.*}", field.decimal_places(), n),
        CellValue::Text(s) => s.replace(',', "."),
    }
}

/// Trim a user-entered decimal and normalise its separator to `.`.
pub fn normalize_decimal(text: &str) -> String {
    text.trim().replace(',', ".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numbers_use_per_field_decimal_places() {
        assert_eq!(render(Field::MeanIdleCurrent, CellValue::Number(0.5)), "0.500");
        assert_eq!(render(Field::Speed, CellValue::Number(7.193461)), "7.193");
        assert_eq!(render(Field::IdlePower, CellValue::Number(6.0)), "6.00");
        assert_eq!(render(Field::LoadPower, CellValue::Number(14.4)), "14.40");
        assert_eq!(render(Field::RollingPower, CellValue::Number(8.4)), "8.40");
        assert_eq!(render(Field::TirePressure, CellValue::Number(2.5)), "2.50");
        assert_eq!(
            render(Field::RollingCoefficient, CellValue::Number(0.0243513)),
            "0.024351"
        );
        // unlisted numeric columns default to three places
        assert_eq!(render(Field::LeverWeight, CellValue::Number(2.0)), "2.000");
        assert_eq!(
            render(Field::EffectiveWeight, CellValue::Number(4.8882681)),
            "4.888"
        );
    }

    #[test]
    fn empty_values_render_empty() {
        assert_eq!(render(Field::TireName, CellValue::Empty), "");
        assert_eq!(render(Field::RollingCoefficient, CellValue::Empty), "");
    }

    #[test]
    fn text_commas_become_dots_even_in_names() {
        assert_eq!(render(Field::TirePressure, CellValue::Text("2,5")), "2.5");
        assert_eq!(
            render(Field::TireName, CellValue::Text("Conti, soft")),
            "Conti. soft"
        );
    }

    #[test]
    fn normalize_decimal_trims_and_replaces() {
        assert_eq!(normalize_decimal(" 2,5 "), "2.5");
        assert_eq!(normalize_decimal("3.1"), "3.1");
        assert_eq!(normalize_decimal(""), "");
    }
}
