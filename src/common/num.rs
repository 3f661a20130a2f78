//! Compact number formatting for generated XML and scripts.

/// Append `n` rounded to two decimals, without trailing zeros.
///
/// Integers go through `itoa`, everything else through `ryu`.
#[inline]
pub fn write_num(buf: &mut String, n: f64) {
    if !n.is_finite() {
        buf.push('0');
        return;
    }
    let rounded = (n * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        write_int(buf, rounded as i64);
        return;
    }
    let mut buffer = ryu::Buffer::new();
    let s = buffer.format(rounded);
    if s.contains('.') {
        buf.push_str(s.trim_end_matches('0').trim_end_matches('.'));
    } else {
        buf.push_str(s);
    }
}

#[inline]
pub fn write_int(buf: &mut String, n: i64) {
    let mut buffer = itoa::Buffer::new();
    buf.push_str(buffer.format(n));
}
