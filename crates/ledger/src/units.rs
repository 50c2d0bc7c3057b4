//! Conversion between decimal USDC amounts and the token's 6-decimal fixed-point integers.

use alloy_primitives::U256;
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Number of decimals of the USDC token.
pub const USDC_DECIMALS: u32 = 6;

const SCALE: u64 = 10u64.pow(USDC_DECIMALS);
/// Fixed-point units per displayed cent.
const UNITS_PER_CENT: u64 = SCALE / 100;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("invalid amount `{0}`")]
    Malformed(String),
    #[error("amount must be greater than zero")]
    NotPositive,
    #[error("amount `{0}` is too large")]
    Overflow(String),
}

/// A USDC amount in fixed-point units (`10^6` units per token).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(U256);

impl TokenAmount {
    pub const ZERO: Self = Self(U256::ZERO);

    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> U256 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Parses a decimal amount such as `12.5`, rounding half-up to the nearest fixed-point unit.
    ///
    /// The input is parsed exactly, no binary floating point is involved.
    ///
    /// ```
    /// use alloy_primitives::U256;
    /// use flexigift_ledger::TokenAmount;
    ///
    /// assert_eq!(TokenAmount::from_decimal_str("12.5")?.raw(), U256::from(12_500_000));
    /// assert_eq!(TokenAmount::from_decimal_str("0.0000005")?.raw(), U256::from(1));
    /// # Ok::<_, flexigift_ledger::AmountError>(())
    /// ```
    pub fn from_decimal_str(s: &str) -> Result<Self, AmountError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountError::Empty);
        }
        if s.starts_with('-') {
            return Err(AmountError::NotPositive);
        }
        let digits = s.strip_prefix('+').unwrap_or(s);
        let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (int.is_empty() && frac.is_empty()) || !is_digits(int) || !is_digits(frac) {
            return Err(AmountError::Malformed(s.to_string()));
        }

        let overflow = || AmountError::Overflow(s.to_string());
        let int = if int.is_empty() {
            U256::ZERO
        } else {
            U256::from_str_radix(int, 10).map_err(|_| overflow())?
        };

        let precision = USDC_DECIMALS as usize;
        let kept = &frac[..frac.len().min(precision)];
        let mut units: u64 = kept.parse().unwrap_or(0);
        units *= 10u64.pow((precision - kept.len()) as u32);
        let round_up = frac.as_bytes().get(precision).is_some_and(|&digit| digit >= b'5');

        let raw = int
            .checked_mul(U256::from(SCALE))
            .and_then(|raw| raw.checked_add(U256::from(units + u64::from(round_up))))
            .ok_or_else(overflow)?;
        Ok(Self(raw))
    }

    /// Formats the amount with two decimals, rounding half-up to the cent.
    ///
    /// ```
    /// use alloy_primitives::U256;
    /// use flexigift_ledger::TokenAmount;
    ///
    /// assert_eq!(TokenAmount::from_raw(U256::from(12_345_000u64)).to_display(), "12.35");
    /// ```
    pub fn to_display(self) -> String {
        let (cents, rest) = self.0.div_rem(U256::from(UNITS_PER_CENT));
        // `cents` is at most `U256::MAX / 10^4`, so the increment cannot overflow
        let cents = if rest >= U256::from(UNITS_PER_CENT / 2) { cents + U256::from(1) } else { cents };
        let hundred = U256::from(100u64);
        let fraction: u64 = (cents % hundred).to();
        format!("{}.{fraction:02}", cents / hundred)
    }
}

impl From<TokenAmount> for U256 {
    fn from(amount: TokenAmount) -> Self {
        amount.0
    }
}

impl FromStr for TokenAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_str(s)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display())
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_display())
    }
}
