/// Formats a price with "Trader Precision".
/// - Large (>1000): 2 decimals (95123.50)
/// - Medium (1-1000): 4 decimals (12.4829)
/// - Small (<1): 5-8 decimals (0.00000231)
pub fn format_price(price: f64) -> String {
    if price == 0.0 {
        return "0.00".to_string();
    }

    // Determine magnitude
    let abs_price = price.abs();

    if abs_price >= 1000.0 {
        format!("{:.2}", price)
    } else if abs_price >= 1.0 {
        format!("{:.4}", price)
    } else if abs_price >= 0.01 {
        format!("{:.5}", price)
    } else {
        format!("{:.8}", price)
    }
}

/// Abbreviates large quantities: 1234 -> "1.23K", 5_600_000 -> "5.60M".
pub fn format_volume(volume: f64) -> String {
    let abs = volume.abs();
    if abs >= 1e9 {
        format!("{:.2}B", volume / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", volume / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", volume / 1e3)
    } else {
        format!("{:.0}", volume)
    }
}

/// Two decimals, for bounded oscillators.
pub fn format_oscillator(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_precision_by_magnitude() {
        assert_eq!(format_price(95123.5), "95123.50");
        assert_eq!(format_price(12.48291), "12.4829");
        assert_eq!(format_price(0.5), "0.50000");
        assert_eq!(format_price(0.00000231), "0.00000231");
        assert_eq!(format_price(0.0), "0.00");
    }

    #[test]
    fn volume_abbreviations() {
        assert_eq!(format_volume(999.0), "999");
        assert_eq!(format_volume(1234.0), "1.23K");
        assert_eq!(format_volume(5_600_000.0), "5.60M");
        assert_eq!(format_volume(2.5e9), "2.50B");
    }
}
