//! Math utilities for safe arithmetic and fixed-decimal price scaling

/// Safe math operations to prevent overflow/underflow
pub struct SafeMath;

impl SafeMath {
    /// Safely add two i128 values, panicking on overflow
    pub fn add(a: i128, b: i128) -> i128 {
        a.checked_add(b).expect("Math: addition overflow")
    }

    /// Safely subtract two i128 values, panicking on underflow
    pub fn sub(a: i128, b: i128) -> i128 {
        a.checked_sub(b).expect("Math: subtraction underflow")
    }

    /// Safely multiply two i128 values, panicking on overflow
    pub fn mul(a: i128, b: i128) -> i128 {
        a.checked_mul(b).expect("Math: multiplication overflow")
    }

    /// Safely divide two i128 values, panicking on division by zero
    pub fn div(a: i128, b: i128) -> i128 {
        if b == 0 {
            panic!("Math: division by zero");
        }
        a.checked_div(b).expect("Math: division overflow")
    }

    /// Compute (a * b) / denom with truncation, panicking on overflow or
    /// zero denominator. All limit math goes through this so scaled
    /// divisions never round up.
    ///
    /// # Arguments
    /// * `a` - First factor
    /// * `b` - Second factor
    /// * `denom` - Denominator
    ///
    /// # Returns
    /// The truncated quotient
    pub fn mul_div(a: i128, b: i128, denom: i128) -> i128 {
        Self::div(Self::mul(a, b), denom)
    }

    /// Rescale a fixed-decimal integer from one decimal count to another
    /// using exact integer arithmetic.
    ///
    /// Scaling down truncates (integer division by the decimal excess);
    /// scaling up multiplies by the decimal deficit. Equal decimal counts
    /// pass the value through unchanged.
    ///
    /// # Arguments
    /// * `value` - The fixed-decimal integer
    /// * `from_decimals` - Decimal count of `value`
    /// * `to_decimals` - Target decimal count
    ///
    /// # Returns
    /// `value` expressed at `to_decimals` decimal places
    pub fn rescale(value: i128, from_decimals: u32, to_decimals: u32) -> i128 {
        if from_decimals == to_decimals {
            value
        } else if from_decimals > to_decimals {
            Self::div(value, Self::pow10(from_decimals - to_decimals))
        } else {
            Self::mul(value, Self::pow10(to_decimals - from_decimals))
        }
    }

    /// 10^exp as i128, panicking on overflow
    pub fn pow10(exp: u32) -> i128 {
        10i128
            .checked_pow(exp)
            .expect("Math: power of ten overflow")
    }
}
