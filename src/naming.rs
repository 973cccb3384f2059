//! Formatted name generation
//!
//! A formatted name is `<YYYYMMDD>_` followed by each field value joined to
//! the next one by that field's separator:
//!
//! ```text
//! 20200625_VAN0001-RK-001-002-108-IMS_pos
//! ```

use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::template::{FieldKind, TemplateDefinition};

/// Minimum width of a numeric field
pub const NUMERIC_WIDTH: usize = 3;

/// strftime pattern of the leading date stamp
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Errors that can occur while formatting a name
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamingError {
    #[error("template '{template}' has {expected} fields but {found} values were given")]
    LengthMismatch {
        template: String,
        expected: usize,
        found: usize,
    },
}

/// Format one value according to its kind.
///
/// Numeric values are zero-padded on the left to [`NUMERIC_WIDTH`] characters.
/// No parsing happens, so `"ab"` becomes `"0ab"` and `"-1"` becomes `"0-1"`.
pub fn format_field(value: &str, kind: FieldKind) -> String {
    match kind {
        FieldKind::Numeric => format!("{:0>width$}", value, width = NUMERIC_WIDTH),
        FieldKind::Text => value.to_string(),
    }
}

/// Render the date stamp that prefixes every name
pub fn date_stamp(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Format a name stamped with today's local date
pub fn format_name<S: AsRef<str>>(
    template: &TemplateDefinition,
    values: &[S],
) -> Result<String, NamingError> {
    format_name_on(template, values, Local::now().date_naive())
}

/// Format a name stamped with the given date
pub fn format_name_on<S: AsRef<str>>(
    template: &TemplateDefinition,
    values: &[S],
    date: NaiveDate,
) -> Result<String, NamingError> {
    if values.len() != template.fields.len() {
        return Err(NamingError::LengthMismatch {
            template: template.name.clone(),
            expected: template.fields.len(),
            found: values.len(),
        });
    }

    let mut name = date_stamp(date);
    name.push('_');

    let last = template.fields.len().saturating_sub(1);
    for (idx, (field, value)) in template.fields.iter().zip(values).enumerate() {
        name.push_str(&format_field(value.as_ref(), field.kind));
        if idx < last {
            name.push_str(&field.separator);
        }
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{FieldSpec, TemplateRegistry};
    use pretty_assertions::assert_eq;

    fn june_25() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 6, 25).unwrap()
    }

    fn two_field_template() -> TemplateDefinition {
        TemplateDefinition::new(
            "pair",
            vec![
                FieldSpec::text("HuBMAP ID", "-").with_default("VAN0001"),
                FieldSpec::numeric("Block", "-IMS_").with_default("1"),
            ],
        )
    }

    #[test]
    fn test_numeric_padding() {
        assert_eq!(format_field("", FieldKind::Numeric), "000");
        assert_eq!(format_field("7", FieldKind::Numeric), "007");
        assert_eq!(format_field("42", FieldKind::Numeric), "042");
        assert_eq!(format_field("108", FieldKind::Numeric), "108");
        assert_eq!(format_field("12345", FieldKind::Numeric), "12345");
    }

    #[test]
    fn test_numeric_padding_does_not_parse() {
        assert_eq!(format_field("ab", FieldKind::Numeric), "0ab");
        assert_eq!(format_field("-1", FieldKind::Numeric), "0-1");
        assert_eq!(format_field("-12", FieldKind::Numeric), "-12");
        assert_eq!(format_field("abcd", FieldKind::Numeric), "abcd");
    }

    #[test]
    fn test_text_pass_through() {
        for value in ["", "7", "RK", "  spaced  ", "a-b_c"] {
            assert_eq!(format_field(value, FieldKind::Text), value);
        }
    }

    #[test]
    fn test_date_stamp() {
        assert_eq!(date_stamp(june_25()), "20200625");
        let jan_first = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert_eq!(date_stamp(jan_first), "20210101");
    }

    #[test]
    fn test_last_separator_not_emitted() {
        let name = format_name_on(&two_field_template(), &["VAN0001", "7"], june_25()).unwrap();
        insta::assert_snapshot!(name, @"20200625_VAN0001-007");
    }

    #[test]
    fn test_biomic_template() {
        let registry = TemplateRegistry::with_builtins();
        let biomic = registry.get("BIOMIC").unwrap();
        let name = format_name_on(
            biomic,
            &["VAN0001", "RK", "1", "2", "108", "pos"],
            june_25(),
        )
        .unwrap();
        insta::assert_snapshot!(name, @"20200625_VAN0001-RK-001-002-108-IMS_pos");
    }

    #[test]
    fn test_generic_template_drops_extra_separator() {
        let registry = TemplateRegistry::with_builtins();
        let generic = registry.get("generic").unwrap();
        let name =
            format_name_on(generic, &["myproj1", "samp01", "1", "neg"], june_25()).unwrap();
        assert_eq!(name, "20200625_myproj1-samp01-001-neg");
    }

    #[test]
    fn test_separator_count() {
        let template = TemplateDefinition::new(
            "many",
            (0..5).map(|i| FieldSpec::text(format!("f{}", i), "|")).collect(),
        );
        let values = ["a", "b", "c", "d", "e"];
        let name = format_name_on(&template, &values, june_25()).unwrap();
        assert_eq!(name.matches('|').count(), 4);
        assert_eq!(name, "20200625_a|b|c|d|e");
    }

    #[test]
    fn test_empty_template() {
        let template = TemplateDefinition::new("empty", vec![]);
        let values: [&str; 0] = [];
        let name = format_name_on(&template, &values, june_25()).unwrap();
        assert_eq!(name, "20200625_");
    }

    #[test]
    fn test_length_mismatch() {
        let result = format_name_on(&two_field_template(), &["only one"], june_25());
        assert_eq!(
            result,
            Err(NamingError::LengthMismatch {
                template: "pair".to_string(),
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn test_today_prefix_shape() {
        let name = format_name(&two_field_template(), &["x", "1"]).unwrap();
        let (stamp, rest) = name.split_at(8);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
        assert!(rest.starts_with('_'));
        assert!(rest.ends_with("x-001"));
    }
}
