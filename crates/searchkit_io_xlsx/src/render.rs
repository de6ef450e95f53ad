//! Per-field rendering of raw document values into cell values.

use crate::spec::{EnumCellValue, EnumFieldValue, SpecExportField};
use crate::util::{derive_date_text, derive_field_value_text, join_flattened};

/// Render one field's raw value (absent, scalar or collection) into a cell.
///
/// Multi-valued fields, and any value with more than one element, are
/// flattened to a single text cell. A one-element collection on a
/// single-valued field renders as that element.
pub fn render_cell(field: &SpecExportField, value: Option<&EnumFieldValue>) -> EnumCellValue {
    let Some(value) = value else {
        return EnumCellValue::Empty;
    };
    let n_values = value.count_values();
    if n_values == 0 {
        return EnumCellValue::Empty;
    }

    if field.is_multi_valued() || n_values > 1 {
        return match value {
            EnumFieldValue::List(values) => render_flattened(values),
            scalar => render_flattened(std::slice::from_ref(scalar)),
        };
    }

    match value {
        EnumFieldValue::List(values) => render_scalar(field, &values[0]),
        scalar => render_scalar(field, scalar),
    }
}

/// Join every element's text form with `"; "` into one text cell.
///
/// Numeric typing is not kept. A sequence with no non-null element renders
/// as [`EnumCellValue::Empty`].
pub fn render_flattened(values: &[EnumFieldValue]) -> EnumCellValue {
    let text = join_flattened(values);
    if text.is_empty() {
        EnumCellValue::Empty
    } else {
        EnumCellValue::Text(text)
    }
}

fn render_scalar(field: &SpecExportField, value: &EnumFieldValue) -> EnumCellValue {
    if matches!(value, EnumFieldValue::Null) {
        return EnumCellValue::Empty;
    }
    if field.info.is_none() {
        return EnumCellValue::Text(derive_field_value_text(value));
    }

    match value {
        EnumFieldValue::Null => EnumCellValue::Empty,
        EnumFieldValue::Text(s) | EnumFieldValue::Opaque(s) => EnumCellValue::Text(s.clone()),
        EnumFieldValue::Int(_)
        | EnumFieldValue::Long(_)
        | EnumFieldValue::Float(_)
        | EnumFieldValue::Double(_)
        | EnumFieldValue::Decimal(_) => EnumCellValue::Number(derive_field_value_text(value)),
        EnumFieldValue::Bool(b) => EnumCellValue::Boolean(*b),
        EnumFieldValue::Date(dt) => EnumCellValue::Date(derive_date_text(dt)),
        EnumFieldValue::List(values) => EnumCellValue::Text(join_flattened(values)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::spec::{EnumPrimitiveKind, SpecFieldInfo};

    fn typed(name: &str, info: SpecFieldInfo) -> SpecExportField {
        SpecExportField {
            info: Some(info),
            ..SpecExportField::untyped(name)
        }
    }

    #[test]
    fn multi_valued_field_flattens_in_order() {
        let field = typed(
            "tags",
            SpecFieldInfo::new(EnumPrimitiveKind::Text).multi_valued(),
        );
        let value = EnumFieldValue::from(vec!["a", "b", "c"]);

        assert_eq!(
            render_cell(&field, Some(&value)),
            EnumCellValue::Text("a; b; c".to_string())
        );
    }

    #[test]
    fn multi_valued_numbers_flatten_to_text() {
        let field = typed(
            "sizes",
            SpecFieldInfo::new(EnumPrimitiveKind::Long).multi_valued(),
        );

        assert_eq!(
            render_cell(&field, Some(&EnumFieldValue::from(vec![5i64]))),
            EnumCellValue::Text("5".to_string())
        );
        assert_eq!(
            render_cell(&field, Some(&EnumFieldValue::Long(7))),
            EnumCellValue::Text("7".to_string())
        );
    }

    #[test]
    fn single_valued_field_with_one_element_is_not_flattened() {
        let field = typed("price", SpecFieldInfo::new(EnumPrimitiveKind::Long));

        assert_eq!(
            render_cell(&field, Some(&EnumFieldValue::from(vec![42i64]))),
            EnumCellValue::Number("42".to_string())
        );
        assert_eq!(
            render_cell(&field, Some(&EnumFieldValue::from("a"))),
            EnumCellValue::Text("a".to_string())
        );
    }

    #[test]
    fn several_values_flatten_even_without_multi_valued_flag() {
        let field = typed("price", SpecFieldInfo::new(EnumPrimitiveKind::Long));
        let value = EnumFieldValue::from(vec![1i64, 2]);

        assert_eq!(
            render_cell(&field, Some(&value)),
            EnumCellValue::Text("1; 2".to_string())
        );
    }

    #[test]
    fn null_missing_and_empty_render_empty() {
        let field = typed(
            "tags",
            SpecFieldInfo::new(EnumPrimitiveKind::Text).multi_valued(),
        );

        assert_eq!(render_cell(&field, None), EnumCellValue::Empty);
        assert_eq!(
            render_cell(&field, Some(&EnumFieldValue::Null)),
            EnumCellValue::Empty
        );
        assert_eq!(
            render_cell(&field, Some(&EnumFieldValue::List(vec![]))),
            EnumCellValue::Empty
        );
        assert_eq!(
            render_flattened(&[EnumFieldValue::Null, EnumFieldValue::Null]),
            EnumCellValue::Empty
        );
        assert_eq!(
            render_cell(&SpecExportField::untyped("x"), Some(&EnumFieldValue::Null)),
            EnumCellValue::Empty
        );
    }

    #[test]
    fn typed_scalars_map_to_matching_cells() {
        let field = typed("f", SpecFieldInfo::new(EnumPrimitiveKind::Text));
        let dt = Utc.with_ymd_and_hms(2023, 12, 31, 22, 15, 0).unwrap();

        assert_eq!(
            render_cell(&field, Some(&EnumFieldValue::Bool(true))),
            EnumCellValue::Boolean(true)
        );
        assert_eq!(
            render_cell(&field, Some(&EnumFieldValue::Date(dt))),
            EnumCellValue::Date("2023-12-31".to_string())
        );
        assert_eq!(
            render_cell(&field, Some(&EnumFieldValue::Double(2.5))),
            EnumCellValue::Number("2.5".to_string())
        );
        assert_eq!(
            render_cell(
                &field,
                Some(&EnumFieldValue::Decimal("12345678901234567890".to_string()))
            ),
            EnumCellValue::Number("12345678901234567890".to_string())
        );
    }

    #[test]
    fn untyped_field_renders_natural_text() {
        let field = SpecExportField::untyped("score");

        assert_eq!(
            render_cell(&field, Some(&EnumFieldValue::Float(0.5))),
            EnumCellValue::Text("0.5".to_string())
        );
        assert_eq!(
            render_cell(&field, Some(&EnumFieldValue::Bool(false))),
            EnumCellValue::Text("false".to_string())
        );
    }
}
