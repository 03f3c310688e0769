// 🚙 Car Record - the ledger's row type
//
// Two cars are "equal" when they share a brand. Color, price and date are NOT
// part of equality. Adding two cars sums their prices, and only works when both
// brand and color match.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    pub brand: String,
    pub color: String,
    pub price: f64,
    pub date: NaiveDate,
}

impl Car {
    /// Brand and color only; price 0 and today's date
    pub fn new(brand: impl Into<String>, color: impl Into<String>) -> Self {
        Car {
            brand: brand.into(),
            color: color.into(),
            price: 0.0,
            date: Local::now().date_naive(),
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Add a tax amount on top of the current price
    pub fn add_taxes(&mut self, amount: f64) {
        self.price += amount;
    }

    /// Partial-key equality: same brand
    pub fn equals(&self, other: &Car) -> bool {
        self.brand == other.brand
    }

    /// Sum of both prices, only for cars of the same brand and color
    ///
    /// Comparison is case-sensitive. A mismatch is an `Err`, never a zero sum;
    /// callers wanting a neutral value use `CarMismatch::NEUTRAL`.
    pub fn add(a: &Car, b: &Car) -> Result<f64, CarMismatch> {
        let brand_differs = a.brand != b.brand;
        let color_differs = a.color != b.color;

        if brand_differs || color_differs {
            return Err(CarMismatch {
                brand: brand_differs.then(|| (a.brand.clone(), b.brand.clone())),
                color: color_differs.then(|| (a.color.clone(), b.color.clone())),
            });
        }

        Ok(a.price + b.price)
    }
}

impl PartialEq for Car {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Car {}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Brand: {}", self.brand)?;
        writeln!(f, "Color: {}", self.color)?;
        writeln!(f, "Price: ${}", self.price)?;
        write!(f, "Date: {}", self.date.format("%Y-%m-%d"))
    }
}

// ============================================================================
// ADD MISMATCH
// ============================================================================

/// Why two cars could not be added; each differing attribute holds both values
#[derive(Debug, Clone, PartialEq)]
pub struct CarMismatch {
    pub brand: Option<(String, String)>,
    pub color: Option<(String, String)>,
}

impl CarMismatch {
    /// Value the source's callers used in place of a sum
    pub const NEUTRAL: f64 = 0.0;
}

impl fmt::Display for CarMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "only cars of the same brand and color can be added")?;

        let mut details = Vec::new();
        if let Some((a, b)) = &self.brand {
            details.push(format!("brand '{}' vs '{}'", a, b));
        }
        if let Some((a, b)) = &self.color {
            details.push(format!("color '{}' vs '{}'", a, b));
        }

        if !details.is_empty() {
            write!(f, " ({})", details.join(", "))?;
        }
        Ok(())
    }
}

impl Error for CarMismatch {}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_car(brand: &str, color: &str, price: f64) -> Car {
        Car::new(brand, color)
            .with_price(price)
            .with_date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    }

    #[test]
    fn test_constructor_defaults() {
        let car = Car::new("Fiat", "white");

        assert_eq!(car.price, 0.0);
        assert_eq!(car.date, Local::now().date_naive());
    }

    #[test]
    fn test_add_same_brand_and_color() {
        let a = create_test_car("Ford", "red", 20000.0);
        let b = create_test_car("Ford", "red", 5000.0);

        assert_eq!(Car::add(&a, &b), Ok(25000.0));
    }

    #[test]
    fn test_add_different_color_is_mismatch() {
        let a = create_test_car("Ford", "red", 20000.0);
        let b = create_test_car("Ford", "blue", 5000.0);

        let err = Car::add(&a, &b).unwrap_err();

        assert_eq!(err.brand, None);
        assert_eq!(err.color, Some(("red".to_string(), "blue".to_string())));
        assert_eq!(Car::add(&a, &b).unwrap_or(CarMismatch::NEUTRAL), 0.0);
        assert!(err.to_string().contains("color 'red' vs 'blue'"));
    }

    #[test]
    fn test_add_is_case_sensitive() {
        let a = create_test_car("Ford", "red", 1.0);
        let b = create_test_car("ford", "red", 1.0);

        let err = Car::add(&a, &b).unwrap_err();
        assert!(err.brand.is_some());
    }

    #[test]
    fn test_zero_sum_is_not_a_mismatch() {
        let a = create_test_car("Ford", "red", 0.0);
        let b = create_test_car("Ford", "red", 0.0);

        assert_eq!(Car::add(&a, &b), Ok(0.0));
    }

    #[test]
    fn test_equality_is_brand_only() {
        let a = create_test_car("Ford", "red", 20000.0);
        let b = Car::new("Ford", "blue").with_price(1.0);
        let c = create_test_car("Fiat", "red", 20000.0);

        assert!(a.equals(&b));
        assert_eq!(a, b);
        assert!(!a.equals(&c));
        assert_ne!(a, c);
    }

    #[test]
    fn test_add_taxes() {
        let mut car = create_test_car("Peugeot", "grey", 10000.0);
        car.add_taxes(1500.0);

        assert_eq!(car.price, 11500.0);
    }

    #[test]
    fn test_display() {
        let car = create_test_car("Ford", "red", 20000.0);
        assert_eq!(
            car.to_string(),
            "Brand: Ford\nColor: red\nPrice: $20000\nDate: 2024-01-15"
        );
    }
}
