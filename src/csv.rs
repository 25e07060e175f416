// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

/* ---------------- Parsing ---------------- */

/// Minimal CSV/TSV parser (quotes + CRLF tolerant).
/// Blank lines are skipped; an unterminated quote swallows the rest of the text.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == sep && !in_quotes => {
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush a trailing row without newline.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Separator implied by a file extension: `tsv`/`tab` → tab, anything else → comma.
pub fn sep_for_ext(ext: Option<&str>) -> char {
    match ext.map(|e| e.to_ascii_lowercase()) {
        Some(e) if e == "tsv" || e == "tab" => '\t',
        _ => ',',
    }
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Whole table as delimited text; the header line is emitted only when
/// `include_headers` is set and headers exist.
pub fn to_delimited_string(
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
    include_headers: bool,
    sep: char,
) -> String {
    let mut buf: Vec<u8> = Vec::new();

    if include_headers {
        if let Some(h) = headers {
            let _ = write_row(&mut buf, h, sep);
        }
    }
    for r in rows {
        let _ = write_row(&mut buf, r, sep);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_quotes_only_when_needed() {
        let mut buf = Vec::new();
        write_row(&mut buf, &row!["plain", "a,b", "say \"hi\"", "two\nlines"], ',').unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert_eq!(s, "plain,\"a,b\",\"say \"\"hi\"\"\",\"two\nlines\"\n");
    }

    #[test]
    fn tab_separator_leaves_commas_alone() {
        let mut buf = Vec::new();
        write_row(&mut buf, &row!["a,b", "c"], '\t').unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a,b\tc\n");
    }

    #[test]
    fn parser_reads_what_writer_writes() {
        let headers = Some(row!["Customer Name", "Review Body"]);
        let rows = vec![row!["Ann", "Good, really \"good\"\nsecond line"], row!["Bob", ""]];
        let text = to_delimited_string(&headers, &rows, true, ',');
        let parsed = parse_rows(&text, ',');
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], headers.unwrap());
        assert_eq!(parsed[1], rows[0]);
        assert_eq!(parsed[2], rows[1]);
    }

    #[test]
    fn parser_handles_crlf_blank_lines_and_no_trailing_newline() {
        let parsed = parse_rows("a,b\r\n\r\nc,d", ',');
        assert_eq!(parsed, vec![row!["a", "b"], row!["c", "d"]]);
    }

    #[test]
    fn headers_skipped_when_not_requested() {
        let headers = Some(row!["A"]);
        let text = to_delimited_string(&headers, &[row!["1"]], false, ',');
        assert_eq!(text, "1\n");
    }

    #[test]
    fn separator_by_extension() {
        assert_eq!(sep_for_ext(Some("TSV")), '\t');
        assert_eq!(sep_for_ext(Some("csv")), ',');
        assert_eq!(sep_for_ext(None), ',');
    }
}
