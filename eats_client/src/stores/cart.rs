use anyhow::{anyhow, Result};
use eats_common::Pkr;
use eats_engine::{
    db_types::{DeliveryDetails, MenuItem},
    order_objects::{CartLine, CheckoutOrder},
};
use serde::{Deserialize, Serialize};

use crate::storage::StateDir;

const CART_STATE: &str = "cart";

/// A menu item in the cart. The name, image and price are only for display; the server prices the order from the
/// restaurant's menu at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub menu_id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub image: String,
    pub price: Pkr,
    pub quantity: i64,
}

impl CartItem {
    pub fn line_total(&self) -> Pkr {
        self.price * self.quantity
    }
}

impl From<&MenuItem> for CartItem {
    fn from(item: &MenuItem) -> Self {
        Self {
            menu_id: item.id,
            restaurant_id: item.restaurant_id,
            name: item.name.clone(),
            image: item.image.clone(),
            price: item.price,
            quantity: 1,
        }
    }
}

/// The cart, keyed by menu item id. Items keep the order in which they were first added.
///
/// A cart only ever holds items from one restaurant, since an order is placed with a single restaurant.
pub struct CartStore {
    dir: StateDir,
    items: Vec<CartItem>,
}

impl CartStore {
    pub fn load(dir: StateDir) -> Result<Self> {
        let items = dir.load(CART_STATE)?;
        Ok(Self { dir, items })
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn restaurant_id(&self) -> Option<i64> {
        self.items.first().map(|i| i.restaurant_id)
    }

    pub fn total(&self) -> Pkr {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn get(&self, menu_id: i64) -> Option<&CartItem> {
        self.items.iter().find(|i| i.menu_id == menu_id)
    }

    /// Adds one of the item to the cart, or one more if it is already there.
    pub fn add(&mut self, item: &MenuItem) -> Result<()> {
        if let Some(id) = self.restaurant_id().filter(|id| *id != item.restaurant_id) {
            return Err(anyhow!(
                "Your cart holds items from restaurant #{id}. Clear the cart before ordering from another restaurant."
            ));
        }
        match self.items.iter_mut().find(|i| i.menu_id == item.id) {
            Some(existing) => existing.quantity += 1,
            None => self.items.push(CartItem::from(item)),
        }
        self.save()
    }

    pub fn increment(&mut self, menu_id: i64) -> Result<()> {
        let item = self.item_mut(menu_id)?;
        item.quantity += 1;
        self.save()
    }

    /// Takes one of the item out of the cart. The item is removed when its quantity reaches zero.
    pub fn decrement(&mut self, menu_id: i64) -> Result<()> {
        let item = self.item_mut(menu_id)?;
        item.quantity -= 1;
        self.items.retain(|i| i.quantity > 0);
        self.save()
    }

    pub fn remove(&mut self, menu_id: i64) -> Result<()> {
        let before = self.items.len();
        self.items.retain(|i| i.menu_id != menu_id);
        if self.items.len() == before {
            return Err(anyhow!("Menu item #{menu_id} is not in your cart"));
        }
        self.save()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.items.clear();
        self.save()
    }

    /// The checkout request for the cart. Only the menu ids and quantities are sent.
    pub fn checkout_order(&self, delivery_details: DeliveryDetails) -> Result<CheckoutOrder> {
        let restaurant_id = self.restaurant_id().ok_or_else(|| anyhow!("Your cart is empty"))?;
        let cart_items =
            self.items.iter().map(|i| CartLine { menu_id: i.menu_id, quantity: i.quantity }).collect::<Vec<_>>();
        Ok(CheckoutOrder { restaurant_id, cart_items, delivery_details })
    }

    fn item_mut(&mut self, menu_id: i64) -> Result<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|i| i.menu_id == menu_id)
            .ok_or_else(|| anyhow!("Menu item #{menu_id} is not in your cart"))
    }

    fn save(&self) -> Result<()> {
        self.dir.save(CART_STATE, &self.items)
    }
}
