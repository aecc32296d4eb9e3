use anyhow::Result;
use eats_engine::{
    db_types::{DeliveryDetails, OrderDetails},
    sales_report::{ReportPeriod, SalesSummary},
    traits::CheckoutSessionInfo,
};
use log::*;
use serde::{Deserialize, Serialize};

use super::CartStore;
use crate::{client::EatsClient, storage::StateDir};

const ORDER_STATE: &str = "orders";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderState {
    orders: Vec<OrderDetails>,
    /// The most recent checkout session, until the customer has paid
    last_session: Option<CheckoutSessionInfo>,
}

/// The customer's order history and their last checkout session.
pub struct OrderStore {
    dir: StateDir,
    state: OrderState,
}

impl OrderStore {
    pub fn load(dir: StateDir) -> Result<Self> {
        let state = dir.load(ORDER_STATE)?;
        Ok(Self { dir, state })
    }

    pub fn orders(&self) -> &[OrderDetails] {
        &self.state.orders
    }

    pub fn last_session(&self) -> Option<&CheckoutSessionInfo> {
        self.state.last_session.as_ref()
    }

    pub async fn fetch(&mut self, client: &EatsClient) -> Result<&[OrderDetails]> {
        let orders = client.my_orders().await?;
        debug!("Fetched {} orders", orders.len());
        self.set_orders(orders)?;
        Ok(self.orders())
    }

    /// Creates a checkout session for the cart. Once the server has accepted it, the order exists (as `pending`) and
    /// the cart is emptied.
    pub async fn checkout(
        &mut self,
        client: &EatsClient,
        cart: &mut CartStore,
        delivery_details: DeliveryDetails,
    ) -> Result<CheckoutSessionInfo> {
        let order = cart.checkout_order(delivery_details)?;
        let session = client.checkout(&order).await?;
        info!("Checkout session {} created", session.id);
        self.state.last_session = Some(session.clone());
        self.save()?;
        cart.clear()?;
        Ok(session)
    }

    /// Sales reports are always fetched fresh.
    pub async fn sales_summary(&self, client: &EatsClient, period: ReportPeriod) -> Result<SalesSummary> {
        client.sales_summary(period).await
    }

    fn set_orders(&mut self, orders: Vec<OrderDetails>) -> Result<()> {
        self.state.orders = orders;
        self.save()
    }

    fn save(&self) -> Result<()> {
        self.dir.save(ORDER_STATE, &self.state)
    }
}
