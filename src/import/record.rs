use super::Delimiter;

const QUOTE: char = '"';

/// Fields of one accepted data line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
}

impl Record {
    /// Parse `line`, returning `None` when it has fewer than two fields.
    /// Columns past the third are ignored.
    pub fn parse(line: &str, delimiter: Delimiter) -> Option<Self> {
        let mut fields = split_fields(line, delimiter.as_char()).into_iter();
        let name = fields.next()?;
        let address = fields.next()?;
        let phone = fields.next().filter(|p| !p.is_empty());
        Some(Self {
            name,
            address,
            phone,
        })
    }
}

/// Split `line` on `delimiter`, skipping delimiters that sit inside a quoted
/// segment, then clean every field.
///
/// A delimiter is a boundary only when an even number of quote characters
/// follows it on the line.
pub fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let total_quotes = line.chars().filter(|&c| c == QUOTE).count();
    let mut seen = 0;
    let mut start = 0;
    let mut fields = Vec::new();

    for (idx, c) in line.char_indices() {
        if c == QUOTE {
            seen += 1;
        } else if c == delimiter && (total_quotes - seen) % 2 == 0 {
            fields.push(clean_field(&line[start..idx]));
            start = idx + c.len_utf8();
        }
    }
    fields.push(clean_field(&line[start..]));
    fields
}

/// Drop one wrapping quote on each side, then trim whitespace.
fn clean_field(raw: &str) -> String {
    let unquoted = raw.strip_prefix(QUOTE).unwrap_or(raw);
    let unquoted = unquoted.strip_suffix(QUOTE).unwrap_or(unquoted);
    unquoted.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_delimiter_is_not_a_boundary() {
        assert_eq!(
            split_fields(r#"Alice,"123 Main, Apt 4",555-1234"#, ','),
            vec!["Alice", "123 Main, Apt 4", "555-1234"]
        );
    }

    #[test]
    fn test_plain_split() {
        assert_eq!(split_fields("a;b;c", ';'), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tab_split_with_spaces() {
        assert_eq!(
            split_fields("  Bob Lee \t 7 Elm St\t", '\t'),
            vec!["Bob Lee", "7 Elm St", ""]
        );
    }

    #[test]
    fn test_every_field_quoted() {
        assert_eq!(
            split_fields(r#""Li, Wei","No. 5, Road 2","138 0000""#, ','),
            vec!["Li, Wei", "No. 5, Road 2", "138 0000"]
        );
    }

    #[test]
    fn test_strip_happens_before_trim() {
        // Whitespace outside the quotes keeps the quotes attached.
        assert_eq!(split_fields(r#" "x" ,y"#, ','), vec![r#""x""#, "y"]);
    }

    #[test]
    fn test_only_one_quote_stripped_per_side() {
        assert_eq!(split_fields(r#"""a"",b"#, ','), vec![r#""a""#, "b"]);
    }

    #[test]
    fn test_no_delimiter_is_single_field() {
        assert_eq!(split_fields("lonely", ','), vec!["lonely"]);
    }

    #[test]
    fn test_multibyte_content() {
        assert_eq!(
            split_fields("张三,北京市,13800000000", ','),
            vec!["张三", "北京市", "13800000000"]
        );
    }

    #[test]
    fn test_record_requires_two_fields() {
        assert_eq!(Record::parse("just a name", Delimiter::Comma), None);
    }

    #[test]
    fn test_record_with_phone() {
        let record = Record::parse("Alice,Main St,555", Delimiter::Comma).unwrap();
        assert_eq!(
            record,
            Record {
                name: "Alice".into(),
                address: "Main St".into(),
                phone: Some("555".into()),
            }
        );
    }

    #[test]
    fn test_record_empty_address_accepted() {
        let record = Record::parse("Alice,  ", Delimiter::Comma).unwrap();
        assert_eq!(record.address, "");
        assert_eq!(record.phone, None);
    }

    #[test]
    fn test_record_empty_phone_is_none() {
        let record = Record::parse("Alice,Main St,", Delimiter::Comma).unwrap();
        assert_eq!(record.phone, None);
    }

    #[test]
    fn test_record_ignores_extra_columns() {
        let record = Record::parse("a,b,c,d,e", Delimiter::Comma).unwrap();
        assert_eq!(record.phone.as_deref(), Some("c"));
    }
}
