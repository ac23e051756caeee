//! Body-mass-index calculator from the public landing page.

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
    ExtremelyObese,
}

impl BmiCategory {
    /// Bands are contiguous: each upper bound is exclusive.
    pub fn classify(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else if bmi < 35.0 {
            BmiCategory::Obese
        } else {
            BmiCategory::ExtremelyObese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
            BmiCategory::ExtremelyObese => "Extremely Obese",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BmiReading {
    pub value: f64,
    pub category: BmiCategory,
}

impl std::fmt::Display for BmiReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Your BMI: {:.2} ({})", self.value, self.category.label())
    }
}

/// Weight in kilograms, height in meters. Missing, zero or NaN inputs count as not entered.
pub fn calculate(weight_kg: Option<f64>, height_m: Option<f64>) -> AppResult<BmiReading> {
    let entered = |v: Option<f64>| v.filter(|x| *x != 0.0 && !x.is_nan());
    let (Some(weight), Some(height)) = (entered(weight_kg), entered(height_m)) else {
        return Err(AppError::user("bmi_missing", "Please enter both weight and height"));
    };
    if weight <= 0.0 || height <= 0.0 {
        return Err(AppError::user("bmi_non_positive", "Weight and height must be greater than 0"));
    }
    if height > 3.0 {
        return Err(AppError::user("bmi_height_units", "Height should be in meters (e.g., 1.75 for 175cm)"));
    }
    let value = weight / (height * height);
    Ok(BmiReading { value, category: BmiCategory::classify(value) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges() {
        assert_eq!(BmiCategory::classify(18.49), BmiCategory::Underweight);
        assert_eq!(BmiCategory::classify(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::classify(24.95), BmiCategory::Normal);
        assert_eq!(BmiCategory::classify(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::classify(29.95), BmiCategory::Overweight);
        assert_eq!(BmiCategory::classify(30.0), BmiCategory::Obese);
        assert_eq!(BmiCategory::classify(34.99), BmiCategory::Obese);
        assert_eq!(BmiCategory::classify(35.0), BmiCategory::ExtremelyObese);
    }

    #[test]
    fn typical_adult() {
        let r = calculate(Some(70.0), Some(1.75)).unwrap();
        assert!((r.value - 22.857).abs() < 0.01);
        assert_eq!(r.category, BmiCategory::Normal);
        assert_eq!(r.to_string(), "Your BMI: 22.86 (Normal)");
    }

    #[test]
    fn validation_messages() {
        assert_eq!(calculate(None, Some(1.8)).unwrap_err().message(), "Please enter both weight and height");
        assert_eq!(calculate(Some(0.0), Some(1.8)).unwrap_err().message(), "Please enter both weight and height");
        assert_eq!(calculate(Some(-70.0), Some(1.8)).unwrap_err().message(), "Weight and height must be greater than 0");
        assert_eq!(
            calculate(Some(70.0), Some(175.0)).unwrap_err().message(),
            "Height should be in meters (e.g., 1.75 for 175cm)"
        );
    }
}
