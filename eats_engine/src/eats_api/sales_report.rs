//! Sales reporting over confirmed orders.
//!
//! Sales figures are always computed from the order line items (`price × quantity`), never from the total the payment
//! provider reported. The report is a single linear pass over the orders, which are expected in ascending
//! `created_at` order.
use std::{collections::HashMap, fmt::Display, str::FromStr};

use eats_common::Pkr;
use serde::{Deserialize, Serialize};

use crate::db_types::{ConversionError, Order};

/// The number of products listed in [`SalesSummary::top_products`].
pub const TOP_PRODUCT_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl FromStr for ReportPeriod {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ConversionError::new(format!("Invalid report period: {s}"))),
        }
    }
}

impl Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSales {
    /// The UTC calendar day, `YYYY-MM-DD`.
    pub period: String,
    pub sales: Pkr,
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub name: String,
    pub total_sales: Pkr,
    pub units_sold: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_sales: Pkr,
    pub total_orders: u64,
    /// `total_sales / total_orders`, truncated to the paisa. Zero when there are no orders.
    pub avg_order_value: Pkr,
    /// The period the caller asked for. Buckets are per day regardless.
    pub period: ReportPeriod,
    pub sales_by_period: Vec<PeriodSales>,
    pub top_products: Vec<ProductSales>,
}

impl SalesSummary {
    /// Builds the summary for the given orders. The caller is responsible for only passing confirmed orders.
    ///
    /// Day buckets and products appear in the order they are first seen. Products are ranked by total sales, and
    /// products with equal sales keep their first-seen order.
    pub fn from_orders(orders: &[Order], period: ReportPeriod) -> Self {
        let mut total_sales = Pkr::default();
        let mut sales_by_period = Vec::<PeriodSales>::new();
        let mut period_index = HashMap::<String, usize>::new();
        let mut products = Vec::<ProductSales>::new();
        let mut product_index = HashMap::<String, usize>::new();

        for order in orders {
            let order_sales = order.items_total();
            total_sales += order_sales;

            let day = order.created_at.format("%Y-%m-%d").to_string();
            let i = *period_index.entry(day.clone()).or_insert_with(|| {
                sales_by_period.push(PeriodSales { period: day, sales: Pkr::default(), orders: 0 });
                sales_by_period.len() - 1
            });
            sales_by_period[i].sales += order_sales;
            sales_by_period[i].orders += 1;

            for item in &order.items {
                let j = *product_index.entry(item.name.clone()).or_insert_with(|| {
                    products.push(ProductSales {
                        name: item.name.clone(),
                        total_sales: Pkr::default(),
                        units_sold: 0,
                    });
                    products.len() - 1
                });
                products[j].total_sales += item.line_total();
                products[j].units_sold += item.quantity;
            }
        }

        let total_orders = orders.len() as u64;
        #[allow(clippy::cast_possible_wrap)]
        let avg_order_value = total_sales.div_or_zero(total_orders as i64);
        // sort_by is stable, so ties keep their first-seen order
        products.sort_by(|a, b| b.total_sales.cmp(&a.total_sales));
        products.truncate(TOP_PRODUCT_COUNT);

        Self { total_sales, total_orders, avg_order_value, period, sales_by_period, top_products: products }
    }
}
