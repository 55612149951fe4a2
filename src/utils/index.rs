/// Decimal places of the wallet's atomic unit.
pub const ATOMIC_UNIT_DECIMALS: u32 = 12;

/// Format an amount of atomic units as a decimal string with `decimals` fractional digits.
pub fn format_token_amount(amount: u64, decimals: u32) -> String {
	if decimals == 0 {
		return amount.to_string();
	}
	let scale = 10u128.pow(decimals);
	let amount = u128::from(amount);
	format!(
		"{}.{:0width$}",
		amount / scale,
		amount % scale,
		width = decimals as usize
	)
}

/// Parse a decimal amount reported by the engine.
pub fn parse_atomic_amount(value: &str) -> Option<u64> {
	value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_format_token_amount() {
		assert_eq!(format_token_amount(1_500_000_000_000, ATOMIC_UNIT_DECIMALS), "1.500000000000");
		assert_eq!(format_token_amount(7, ATOMIC_UNIT_DECIMALS), "0.000000000007");
		assert_eq!(format_token_amount(42, 0), "42");
	}

	#[test]
	fn test_format_max_amount_is_exact() {
		assert_eq!(
			format_token_amount(u64::MAX, ATOMIC_UNIT_DECIMALS),
			"18446744.073709551615"
		);
	}

	#[test]
	fn test_parse_atomic_amount() {
		assert_eq!(parse_atomic_amount("18446744073709551615"), Some(u64::MAX));
		assert_eq!(parse_atomic_amount(" 12 "), Some(12));
		assert_eq!(parse_atomic_amount("-1"), None);
		assert_eq!(parse_atomic_amount(""), None);
	}
}
