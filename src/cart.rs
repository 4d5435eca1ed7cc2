//! In-memory shopping cart for the preview storefront.

use rust_decimal::Decimal;

use crate::catalog::{Product, ProductId};
use crate::config::Pricing;

#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id: ProductId,
    pub name: &'static str,
    pub price: Decimal,
    pub in_stock: bool,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false, leaving the cart untouched, for out-of-stock products.
    pub fn add(&mut self, product: &Product) -> bool {
        if !product.in_stock {
            return false;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.id == product.id) {
            item.quantity += 1;
        } else {
            self.items.push(CartItem {
                id: product.id,
                name: product.name,
                price: product.price,
                in_stock: product.in_stock,
                quantity: 1,
            });
        }
        true
    }

    /// A quantity of zero removes the row.
    pub fn update_quantity(&mut self, id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove(id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.quantity = quantity;
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.items.retain(|i| i.id != id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn totals(&self, pricing: &Pricing) -> Totals {
        let subtotal: Decimal = self.items.iter().map(CartItem::line_total).sum();
        let shipping = if subtotal > pricing.free_shipping_threshold {
            Decimal::ZERO
        } else {
            pricing.flat_shipping
        };
        let tax = subtotal * pricing.tax_rate;
        Totals {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}

/// Format an amount as dollars and cents.
pub fn money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, FITNESS_WATCH, HEADPHONES, LAPTOP_STAND};
    use rust_decimal_macros::dec;

    #[test]
    fn test_totals_over_free_shipping_threshold() {
        let catalog = Catalog::sample();
        let mut cart = Cart::new();
        assert!(cart.add(catalog.get(HEADPHONES).unwrap()));
        assert!(cart.add(catalog.get(FITNESS_WATCH).unwrap()));

        let totals = cart.totals(&Pricing::default());
        assert_eq!(totals.subtotal, dec!(349.98));
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.tax, dec!(27.9984));
        assert_eq!(totals.total, dec!(377.9784));
        assert_eq!(money(totals.total), "$377.98");
    }

    #[test]
    fn test_flat_shipping_at_or_below_threshold() {
        let mut cart = Cart::new();
        let mut cheap = Catalog::sample().get(LAPTOP_STAND).unwrap().clone();
        cheap.in_stock = true;
        cheap.price = dec!(50);
        cart.add(&cheap);

        let totals = cart.totals(&Pricing::default());
        assert_eq!(totals.shipping, dec!(9.99));
        assert_eq!(totals.tax, dec!(4.00));
        assert_eq!(totals.total, dec!(63.99));
    }

    #[test]
    fn test_add_out_of_stock_is_noop() {
        let catalog = Catalog::sample();
        let mut cart = Cart::new();
        cart.add(catalog.get(HEADPHONES).unwrap());
        let before = cart.items().to_vec();

        assert!(!cart.add(catalog.get(LAPTOP_STAND).unwrap()));
        assert_eq!(cart.items(), before.as_slice());
    }

    #[test]
    fn test_re_add_increments() {
        let catalog = Catalog::sample();
        let mut cart = Cart::new();
        let headphones = catalog.get(HEADPHONES).unwrap();
        cart.add(headphones);
        cart.add(headphones);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(HEADPHONES).unwrap().quantity, 2);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_update_quantity_zero_removes_row() {
        let catalog = Catalog::sample();
        let mut cart = Cart::new();
        cart.add(catalog.get(HEADPHONES).unwrap());
        cart.add(catalog.get(FITNESS_WATCH).unwrap());

        cart.update_quantity(HEADPHONES, 7);
        assert_eq!(cart.get(HEADPHONES).unwrap().quantity, 7);

        cart.update_quantity(HEADPHONES, 0);
        assert!(cart.get(HEADPHONES).is_none());
        assert_eq!(cart.len(), 1);

        cart.remove(FITNESS_WATCH);
        assert!(cart.is_empty());
    }
}
