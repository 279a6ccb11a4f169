/// Sales arithmetic property tests.
///
/// The binary owns the real pipeline; these tests pin down the money math the
/// reports depend on, with the same decimal type the service uses.

// ---------------------------------------------------------------------------
// Per-line figures
// ---------------------------------------------------------------------------

#[cfg(test)]
mod line_figures {
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    /// revenue = quantity * selling_price
    fn line_revenue(quantity: i32, selling_price: &BigDecimal) -> BigDecimal {
        BigDecimal::from(quantity) * selling_price
    }

    /// profit = quantity * (selling_price - cost_price)
    fn line_profit(quantity: i32, cost: &BigDecimal, selling: &BigDecimal) -> BigDecimal {
        BigDecimal::from(quantity) * (selling - cost)
    }

    #[test]
    fn test_revenue_known_value() {
        assert_eq!(line_revenue(10, &dec("100.0")), dec("1000.0"));
    }

    #[test]
    fn test_profit_known_value() {
        assert_eq!(line_profit(10, &dec("80.0"), &dec("100.0")), dec("200.0"));
    }

    #[test]
    fn test_profit_can_be_negative_when_sold_below_cost() {
        assert_eq!(line_profit(2, &dec("50.0"), &dec("45.0")), dec("-10.0"));
    }

    #[test]
    fn test_decimal_accumulation_is_exact() {
        // 0.1 + 0.2 style drift must not exist with fixed-point money
        let total = line_revenue(1, &dec("0.1")) + line_revenue(1, &dec("0.2"));
        assert_eq!(total, dec("0.3"));
    }

    #[test]
    fn test_revenue_is_additive_over_split_batches() {
        let whole = line_revenue(15, &dec("100.0"));
        let split = line_revenue(10, &dec("100.0")) + line_revenue(5, &dec("100.0"));
        assert_eq!(whole, split);
    }
}

// ---------------------------------------------------------------------------
// Presentation rounding
// ---------------------------------------------------------------------------

#[cfg(test)]
mod rounding {
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn round2(value: &BigDecimal) -> BigDecimal {
        value.round(2).with_scale(2)
    }

    #[test]
    fn test_round_half_up_at_two_places() {
        assert_eq!(round2(&dec("181.665")).to_string(), "181.67");
        assert_eq!(round2(&dec("181.664")).to_string(), "181.66");
    }

    #[test]
    fn test_whole_numbers_render_with_two_places() {
        assert_eq!(round2(&dec("1000")).to_string(), "1000.00");
    }

    #[test]
    fn test_margin_percent() {
        // profit 230 on revenue 1110 -> 20.72%
        let margin = round2(&(dec("230") * dec("100") / dec("1110")));
        assert_eq!(margin.to_string(), "20.72");
    }
}
