//! Material cost of consumed filament.
//!
//! Cost is proportional to the share of the spool's nominal mass that was
//! used: `price × (mass_used / nominal_weight)`.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::spool::Spool;

/// Error computing a cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CostError {
    /// The spool's nominal weight is zero.
    #[error("spool weight is zero, cannot calculate cost per gram")]
    DivisionByZero,
    /// The consumed mass is negative.
    #[error("filament used cannot be negative ({0} g)")]
    InvalidArgument(Decimal),
    /// The cost does not fit in a [`Decimal`].
    #[error("cost is out of range")]
    Overflow,
}

/// Cost of `mass_used_g` grams from a spool of `nominal_weight_g` grams
/// that cost `spool_price`.
///
/// No upper bound is enforced on `mass_used_g`.
///
/// # Examples
///
/// ```
/// use spoolcost_core::{cost, CostError};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(cost(dec!(50), dec!(1000), dec!(30)), Ok(dec!(1.5)));
/// assert_eq!(cost(dec!(50), dec!(0), dec!(30)), Err(CostError::DivisionByZero));
/// ```
pub fn cost(
    mass_used_g: Decimal,
    nominal_weight_g: Decimal,
    spool_price: Decimal,
) -> Result<Decimal, CostError> {
    if nominal_weight_g.is_zero() {
        return Err(CostError::DivisionByZero);
    }
    if mass_used_g < Decimal::ZERO {
        return Err(CostError::InvalidArgument(mass_used_g));
    }
    mass_used_g
        .checked_div(nominal_weight_g)
        .and_then(|share| spool_price.checked_mul(share))
        .ok_or(CostError::Overflow)
}

impl Spool {
    /// Cost of using `mass_used_g` grams of this spool.
    pub fn cost_of(&self, mass_used_g: Decimal) -> Result<Decimal, CostError> {
        cost(mass_used_g, self.initial_weight, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cost_proportional() {
        assert_eq!(cost(dec!(50), dec!(1000), dec!(30)), Ok(dec!(1.5)));
        assert_eq!(cost(dec!(1000), dec!(1000), dec!(30)), Ok(dec!(30)));
        assert_eq!(cost(dec!(0), dec!(1000), dec!(30)), Ok(dec!(0)));
    }

    #[test]
    fn test_cost_zero_weight() {
        assert_eq!(
            cost(dec!(50), dec!(0), dec!(30)),
            Err(CostError::DivisionByZero)
        );
        // Zero weight wins over a negative mass.
        assert_eq!(
            cost(dec!(-1), dec!(0), dec!(30)),
            Err(CostError::DivisionByZero)
        );
    }

    #[test]
    fn test_cost_negative_mass() {
        assert_eq!(
            cost(dec!(-1), dec!(1000), dec!(30)),
            Err(CostError::InvalidArgument(dec!(-1)))
        );
    }

    #[test]
    fn test_cost_above_nominal_is_not_capped() {
        assert_eq!(cost(dec!(1500), dec!(1000), dec!(20)), Ok(dec!(30)));
    }

    #[test]
    fn test_cost_overflow() {
        assert_eq!(
            cost(dec!(100000000), dec!(0.0000000000000000000001), dec!(20)),
            Err(CostError::Overflow)
        );
    }

    #[test]
    fn test_spool_cost_of() {
        let spool = Spool::new(1, dec!(16.49), dec!(1000), dec!(912.13));
        assert_eq!(spool.cost_of(dec!(100)), Ok(dec!(1.649)));
    }
}
