//! Quoted-CSV codec for the manifest table.
//!
//! The on-disk format predates this tool: a header row plus one record per
//! file, with fields double-quoted when they contain a comma, quote, or
//! line break. Quoted fields may span lines, so decoding works on the
//! whole document rather than line by line. Only what the manifest table
//! needs is implemented here.

/// Encode one record as a CSV line, without the trailing newline
pub fn encode_record(fields: &[&str]) -> String {
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out
}

/// Decode a CSV document into records. Blank lines between records are
/// skipped; line breaks inside quoted fields belong to the field.
pub fn decode(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    fn end_record(records: &mut Vec<Vec<String>>, fields: &mut Vec<String>, field: &mut String) {
        fields.push(std::mem::take(field));
        // a lone empty field is a blank line, not a record
        if fields.len() > 1 || !fields[0].is_empty() {
            records.push(std::mem::take(fields));
        } else {
            fields.clear();
        }
    }

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut field)),
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    end_record(&mut records, &mut fields, &mut field);
                }
                '\n' => end_record(&mut records, &mut fields, &mut field),
                _ => field.push(c),
            }
        }
    }

    if !fields.is_empty() || !field.is_empty() {
        end_record(&mut records, &mut fields, &mut field);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_plain_fields() {
        assert_eq!(encode_record(&["Path", "FileName", "Hash"]), "Path,FileName,Hash");
    }

    #[test]
    fn test_encode_field_with_comma() {
        assert_eq!(encode_record(&["a,b", "c"]), "\"a,b\",c");
    }

    #[test]
    fn test_encode_field_with_quote() {
        assert_eq!(encode_record(&["say \"hi\""]), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_encode_field_with_newline() {
        assert_eq!(encode_record(&["take\none", "x"]), "\"take\none\",x");
    }

    #[test]
    fn test_decode_plain_records() {
        assert_eq!(
            decode("a,b,c\nd,e,f\n"),
            vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]
        );
    }

    #[test]
    fn test_decode_quoted_field() {
        assert_eq!(decode("\"a,b\",c\n"), vec![vec!["a,b", "c"]]);
    }

    #[test]
    fn test_decode_escaped_quote() {
        assert_eq!(decode("\"say \"\"hi\"\"\"\n"), vec![vec!["say \"hi\""]]);
    }

    #[test]
    fn test_decode_quoted_newline_spans_records() {
        assert_eq!(
            decode("\"take\none\",x\nplain,y\n"),
            vec![vec!["take\none", "x"], vec!["plain", "y"]]
        );
    }

    #[test]
    fn test_decode_crlf_line_endings() {
        assert_eq!(
            decode("a,b\r\nc,d\r\n"),
            vec![vec!["a", "b"], vec!["c", "d"]]
        );
    }

    #[test]
    fn test_decode_skips_blank_lines_and_missing_final_newline() {
        assert_eq!(decode("a,b\n\nc,d"), vec![vec!["a", "b"], vec!["c", "d"]]);
        assert_eq!(decode(""), Vec::<Vec<String>>::new());
    }

    #[test]
    fn test_decode_empty_fields() {
        assert_eq!(decode("a,,c\n"), vec![vec!["a", "", "c"]]);
    }

    #[test]
    fn test_round_trip() {
        let fields = ["/media/Audio, Raw/take\n1.wav", "take\n1.wav", "deadbeef"];
        let encoded = encode_record(&fields);
        let decoded = decode(&encoded);
        assert_eq!(decoded, vec![fields.to_vec()]);
    }
}
