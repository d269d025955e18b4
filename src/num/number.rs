use serde_json::Number;

/// Render a JSON number as plain decimal cell text: integers through
/// `itoa`, floats through `ryu` with exponents expanded and integer-valued
/// floats collapsed to integers. Non-finite input renders as the empty
/// string.
pub(crate) fn format_number(number: &Number) -> String {
    if let Some(value) = number.as_i64() {
        let mut buffer = itoa::Buffer::new();
        return buffer.format(value).to_string();
    }
    if let Some(value) = number.as_u64() {
        let mut buffer = itoa::Buffer::new();
        return buffer.format(value).to_string();
    }
    match number.as_f64() {
        Some(value) => format_f64(value),
        None => String::new(),
    }
}

fn format_f64(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() <= i64::MAX as f64 {
        let mut buffer = itoa::Buffer::new();
        return buffer.format(value as i64).to_string();
    }
    let mut buffer = ryu::Buffer::new();
    let raw = buffer.format(value);
    if raw.contains(['e', 'E']) {
        expand_exponent(raw)
    } else {
        raw.to_string()
    }
}

/// Rewrite ryu's `<mantissa>e<exp>` form as plain decimal digits.
fn expand_exponent(raw: &str) -> String {
    let Some((mantissa, exp)) = raw.split_once(['e', 'E']) else {
        return raw.to_string();
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let mut digits = String::with_capacity(int_part.len() + frac_part.len());
    digits.push_str(int_part);
    digits.push_str(frac_part);
    let point = int_part.len() as i32 + exp;

    let mut out = String::new();
    out.push_str(sign);
    if point <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-point) as usize));
        out.push_str(&digits);
    } else if point as usize >= digits.len() {
        out.push_str(&digits);
        out.extend(std::iter::repeat('0').take(point as usize - digits.len()));
    } else {
        out.push_str(&digits[..point as usize]);
        out.push('.');
        out.push_str(&digits[point as usize..]);
    }
    trim_fraction(out)
}

fn trim_fraction(mut value: String) -> String {
    if let Some(dot) = value.find('.') {
        let mut end = value.len();
        while end > dot + 1 && value.as_bytes()[end - 1] == b'0' {
            end -= 1;
        }
        value.truncate(end);
        if value.ends_with('.') {
            value.pop();
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn cell(value: serde_json::Value) -> String {
        match value {
            serde_json::Value::Number(n) => format_number(&n),
            _ => panic!("number fixture expected"),
        }
    }

    #[rstest::rstest]
    fn integers() {
        assert_eq!(cell(json!(42)), "42");
        assert_eq!(cell(json!(-123)), "-123");
        assert_eq!(cell(json!(0)), "0");
        assert_eq!(cell(json!(u64::MAX)), u64::MAX.to_string());
    }

    #[rstest::rstest]
    fn integer_valued_floats_collapse() {
        assert_eq!(cell(json!(1.0)), "1");
        assert_eq!(cell(json!(-42.0)), "-42");
    }

    #[rstest::rstest]
    fn plain_floats() {
        assert_eq!(cell(json!(1.5)), "1.5");
        assert_eq!(cell(json!(-0.25)), "-0.25");
        assert_eq!(cell(json!(0.001)), "0.001");
    }

    #[rstest::rstest]
    fn exponents_expand() {
        assert_eq!(cell(json!(1e30)), format!("1{}", "0".repeat(30)));
        assert_eq!(cell(json!(1.5e-7)), "0.00000015");
        assert_eq!(cell(json!(-2.5e3)), "-2500");
    }

    #[rstest::rstest]
    fn expanded_text_reparses_to_same_value() {
        for value in [1e30_f64, 1.5e-7, -2.5e3, 0.1 + 0.2] {
            let text = format_f64(value);
            assert_eq!(text.parse::<f64>().unwrap(), value, "{text}");
        }
    }
}
