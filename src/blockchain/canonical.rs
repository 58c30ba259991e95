use serde::Serialize;
use serde_json::ser::Formatter;
use std::io::{self, Write};

/// Writes JSON byte-for-byte like Python's `json.dumps(obj, sort_keys=True)`:
/// `", "` and `": "` separators, everything outside printable ASCII escaped
/// as lowercase `\uXXXX` (surrogate pairs above the BMP), and floats in
/// `repr` form. Key order comes from `serde_json::Map`, which is sorted.
pub struct PyJsonFormatter;

impl Formatter for PyJsonFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(py_float_repr(value).as_bytes())
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        // Control characters, quotes and backslashes never reach this point;
        // serde_json routes them through `write_char_escape`.
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() && ch != '\x7f' {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Python `repr(float)`: shortest round-trip digits, exponent form outside
/// `[1e-4, 1e16)` written as `e+XX` / `e-XX`.
fn py_float_repr(value: f64) -> String {
    // Rust's `Debug` picks the same digits and the same exponent thresholds.
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        None => repr,
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
    }
}

/// Serialize `value` with [`PyJsonFormatter`].
pub fn to_py_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PyJsonFormatter);
    value.serialize(&mut ser)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{py_float_repr, to_py_json};
    use serde_json::json;

    fn dumps(value: serde_json::Value) -> String {
        String::from_utf8(to_py_json(&value).unwrap()).unwrap()
    }

    #[test]
    fn separators_and_sorted_keys() {
        let v = json!({"b": [1, 2, {"d": null, "c": true}], "a": "x"});
        assert_eq!(
            dumps(v),
            r#"{"a": "x", "b": [1, 2, {"c": true, "d": null}]}"#
        );
    }

    #[test]
    fn empty_containers() {
        assert_eq!(dumps(json!({"a": [], "b": {}})), r#"{"a": [], "b": {}}"#);
    }

    #[test]
    fn escapes_like_ensure_ascii() {
        assert_eq!(dumps(json!("Zoë")), r#""Zo\u00eb""#);
        assert_eq!(dumps(json!("\u{1F600}")), r#""\ud83d\ude00""#);
        assert_eq!(dumps(json!("del\u{7f}")), r#""del\u007f""#);
        assert_eq!(dumps(json!("a\"b\\c\nd\u{1}")), r#""a\"b\\c\nd\u0001""#);
    }

    #[test]
    fn floats_match_python_repr() {
        assert_eq!(py_float_repr(1_700_000_000.5), "1700000000.5");
        assert_eq!(py_float_repr(1.0), "1.0");
        assert_eq!(py_float_repr(0.1), "0.1");
        assert_eq!(py_float_repr(0.0001), "0.0001");
        assert_eq!(py_float_repr(0.00001), "1e-05");
        assert_eq!(py_float_repr(1e16), "1e+16");
        assert_eq!(py_float_repr(1.5e300), "1.5e+300");
        assert_eq!(py_float_repr(-2.5e-7), "-2.5e-07");
    }
}
