//! Elementary statistics over sales series
//!
//! Contains the small set of descriptive statistics the prediction
//! pipeline needs:
//! - Mean and population standard deviation
//! - Coefficient of variation (volatility relative to level)
//! - Decimal rounding for presentation values

use crate::{MathError, Result};

/// Calculate the arithmetic mean of a slice of values
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute the mean of an empty slice".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Calculate the population standard deviation of a slice of values
pub fn population_std_dev(values: &[f64]) -> Result<f64> {
    let avg = mean(values)?;

    let variance: f64 = values
        .iter()
        .map(|&value| {
            let diff = value - avg;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;

    Ok(variance.sqrt())
}

/// Calculate the coefficient of variation (population standard deviation
/// over mean) of a slice of values.
///
/// The mean is nudged by a small epsilon in the denominator so a level
/// close to zero does not blow the ratio up to infinity.
pub fn coefficient_of_variation(values: &[f64]) -> Result<f64> {
    if values.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Coefficient of variation needs at least 2 values, have {}.",
            values.len()
        )));
    }

    let avg = mean(values)?;
    if avg <= 0.0 {
        return Err(MathError::CalculationError(
            "Coefficient of variation requires a positive mean".to_string(),
        ));
    }

    let std_dev = population_std_dev(values)?;
    Ok(std_dev / (avg + 1e-6))
}

/// Round a value to the given number of decimal places
pub fn round_dp(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]).unwrap(), 2.0);
        assert!(mean(&[]).is_err());
    }

    #[test]
    fn test_population_std_dev() {
        // Population std of [2, 4, 4, 4, 5, 5, 7, 9] is exactly 2
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(population_std_dev(&values).unwrap(), 2.0);

        // A constant series has zero dispersion
        assert_eq!(population_std_dev(&[3.0, 3.0, 3.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_coefficient_of_variation() {
        let values = [100.0, 110.0, 120.0];
        let cv = coefficient_of_variation(&values).unwrap();
        assert!(cv > 0.0 && cv < 1.0);

        // Too few values
        assert!(matches!(
            coefficient_of_variation(&[5.0]),
            Err(MathError::InsufficientData(_))
        ));

        // Non-positive mean
        assert!(matches!(
            coefficient_of_variation(&[-1.0, 1.0]),
            Err(MathError::CalculationError(_))
        ));
    }

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(123.4567, 2), 123.46);
        assert_eq!(round_dp(0.125, 2), 0.13);
        assert_eq!(round_dp(10.0, 2), 10.0);
    }
}
