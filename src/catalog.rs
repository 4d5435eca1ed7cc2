//! Sample storefront products offered by the sales assistant.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

pub type ProductId = &'static str;

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: &'static str,
    pub user: &'static str,
    pub rating: u8,
    pub comment: &'static str,
    pub date: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: &'static str,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub rating: f32,
    pub description: &'static str,
    pub in_stock: bool,
    pub features: Vec<&'static str>,
    pub specifications: Vec<(&'static str, &'static str)>,
    pub reviews: Vec<Review>,
}

impl Product {
    /// Whole-percent markdown from the original price, if any.
    pub fn discount_percent(&self) -> Option<Decimal> {
        let original = self.original_price?;
        if original <= self.price || original.is_zero() {
            return None;
        }
        Some(
            ((original - self.price) / original * dec!(100))
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

pub const HEADPHONES: ProductId = "1";
pub const FITNESS_WATCH: ProductId = "2";
pub const LAPTOP_STAND: ProductId = "3";

#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn sample() -> Self {
        let products = vec![
            Product {
                id: HEADPHONES,
                name: "Wireless Bluetooth Headphones",
                price: dec!(99.99),
                original_price: Some(dec!(129.99)),
                rating: 4.5,
                description: "Premium quality wireless headphones with noise cancellation and 30-hour battery life.",
                in_stock: true,
                features: vec!["Noise Cancellation", "30hr Battery", "Quick Charge", "Bluetooth 5.0"],
                specifications: vec![
                    ("Battery Life", "30 hours"),
                    ("Charging Time", "2 hours"),
                    ("Bluetooth Version", "5.0"),
                    ("Weight", "250g"),
                    ("Warranty", "2 years"),
                ],
                reviews: vec![
                    Review {
                        id: "1",
                        user: "John D.",
                        rating: 5,
                        comment: "Amazing sound quality and battery life!",
                        date: "2024-01-15",
                    },
                    Review {
                        id: "2",
                        user: "Sarah M.",
                        rating: 4,
                        comment: "Great headphones, very comfortable for long use.",
                        date: "2024-01-10",
                    },
                ],
            },
            Product {
                id: FITNESS_WATCH,
                name: "Smart Fitness Watch",
                price: dec!(249.99),
                original_price: Some(dec!(299.99)),
                rating: 4.8,
                description: "Advanced fitness tracking with heart rate monitor, GPS, and 7-day battery life.",
                in_stock: true,
                features: vec!["Heart Rate Monitor", "GPS Tracking", "7-day Battery", "Water Resistant"],
                specifications: vec![
                    ("Display", "1.4 inch AMOLED"),
                    ("Battery Life", "7 days"),
                    ("Water Resistance", "5ATM"),
                    ("Sensors", "Heart Rate, GPS, Accelerometer"),
                    ("Compatibility", "iOS & Android"),
                ],
                reviews: vec![Review {
                    id: "1",
                    user: "Mike R.",
                    rating: 5,
                    comment: "Perfect for tracking my workouts and daily activities.",
                    date: "2024-01-20",
                }],
            },
            Product {
                id: LAPTOP_STAND,
                name: "Portable Laptop Stand",
                price: dec!(39.99),
                original_price: Some(dec!(59.99)),
                rating: 4.3,
                description: "Ergonomic aluminum laptop stand that's lightweight and adjustable.",
                in_stock: false,
                features: vec!["Aluminum Build", "Adjustable Height", "Portable", "Heat Dissipation"],
                specifications: vec![
                    ("Material", "Aluminum Alloy"),
                    ("Weight", "1.2kg"),
                    ("Compatibility", "11-17 inch laptops"),
                    ("Adjustable Height", "6 levels"),
                    ("Foldable", "Yes"),
                ],
                reviews: Vec::new(),
            },
        ];
        Self { products }
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.products().len(), 3);
        assert!(catalog.get(HEADPHONES).unwrap().in_stock);
        assert!(!catalog.get(LAPTOP_STAND).unwrap().in_stock);
        assert!(catalog.get("42").is_none());
    }

    #[test]
    fn test_discount_percent() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.get(HEADPHONES).unwrap().discount_percent(), Some(dec!(23)));
        assert_eq!(catalog.get(FITNESS_WATCH).unwrap().discount_percent(), Some(dec!(17)));

        let mut plain = catalog.get(LAPTOP_STAND).unwrap().clone();
        plain.original_price = None;
        assert_eq!(plain.discount_percent(), None);
    }

    #[test]
    fn test_discount_half_rounds_up() {
        let mut product = Catalog::sample().get(HEADPHONES).unwrap().clone();
        product.price = dec!(87.50);
        product.original_price = Some(dec!(100));
        assert_eq!(product.discount_percent(), Some(dec!(13)));

        product.price = dec!(97.50);
        assert_eq!(product.discount_percent(), Some(dec!(3)));
    }
}
