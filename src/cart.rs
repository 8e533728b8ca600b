//! Session cart. Totals are published on a `watch` channel and recomputed
//! after every mutation.

use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::watch;
use utoipa::ToSchema;

use crate::models::{CartItem, Product};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartTotals {
    pub total_quantity: u32,
    pub total_price: Decimal,
}

impl CartTotals {
    pub fn of(items: &[CartItem]) -> Self {
        items.iter().fold(Self::default(), |acc, item| Self {
            total_quantity: acc.total_quantity + item.quantity,
            total_price: acc.total_price + item.subtotal(),
        })
    }
}

#[derive(Debug)]
pub struct Cart {
    items: Vec<CartItem>,
    totals: watch::Sender<CartTotals>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        let (totals, _) = watch::channel(CartTotals::default());
        Self {
            items: Vec::new(),
            totals,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn totals(&self) -> CartTotals {
        *self.totals.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CartTotals> {
        self.totals.subscribe()
    }

    /// Add one unit of `product`: bump the matching line or append a new one.
    pub fn add(&mut self, product: &Product) -> &CartItem {
        let index = match self.position(product.id) {
            Some(index) => {
                self.items[index].quantity += 1;
                index
            }
            None => {
                self.items.push(CartItem::from_product(product));
                self.items.len() - 1
            }
        };
        self.recompute();
        &self.items[index]
    }

    /// Remove one unit; the line goes away when it reaches zero.
    /// Returns `false` when the product is not in the cart.
    pub fn decrement(&mut self, product_id: i64) -> bool {
        let Some(index) = self.position(product_id) else {
            return false;
        };
        if self.items[index].quantity > 1 {
            self.items[index].quantity -= 1;
        } else {
            self.items.remove(index);
        }
        self.recompute();
        true
    }

    pub fn remove(&mut self, product_id: i64) -> bool {
        let Some(index) = self.position(product_id) else {
            return false;
        };
        self.items.remove(index);
        self.recompute();
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.recompute();
    }

    fn position(&self, product_id: i64) -> Option<usize> {
        self.items.iter().position(|item| item.product_id == product_id)
    }

    fn recompute(&mut self) {
        let totals = CartTotals::of(&self.items);
        tracing::debug!(
            total_quantity = totals.total_quantity,
            total_price = %totals.total_price,
            "cart totals updated"
        );
        self.totals.send_replace(totals);
    }
}
