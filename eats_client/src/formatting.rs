use std::fmt::Write;

use anyhow::Result;
use eats_engine::{
    db_types::{OrderDetails, Restaurant, UserAccount},
    restaurant_objects::RestaurantWithMenu,
    sales_report::SalesSummary,
};
use prettytable::{
    format::{LinePosition, LineSeparator, TableFormat},
    row,
    Table,
};

use crate::stores::CartItem;

fn markdown_format() -> TableFormat {
    prettytable::format::FormatBuilder::new()
        .column_separator('|')
        .borders('|')
        .separator(LinePosition::Title, LineSeparator::new('-', '|', '|', '|'))
        .padding(1, 1)
        .build()
}

fn markdown_style(table: &mut Table) {
    table.set_format(markdown_format());
}

pub fn format_user(user: &UserAccount) -> Result<String> {
    let mut f = String::new();
    writeln!(f, "{} <{}>{}", user.fullname, user.email, if user.admin { " (restaurant admin)" } else { "" })?;
    if !user.address.is_empty() {
        writeln!(f, "{}, {}, {}", user.address, user.city, user.country)?;
    }
    if !user.contact.is_empty() {
        writeln!(f, "Contact: {}", user.contact)?;
    }
    Ok(f)
}

pub fn format_restaurants(restaurants: &[Restaurant]) -> String {
    if restaurants.is_empty() {
        return "No restaurants found".to_string();
    }
    let mut table = Table::new();
    table.set_titles(row!["ID", "Name", "City", "Country", "Cuisines", "Delivery (min)"]);
    restaurants.iter().for_each(|r| {
        table.add_row(row![r.id, r.name, r.city, r.country, r.cuisines.join(", "), r.delivery_time]);
    });
    markdown_style(&mut table);
    table.to_string()
}

pub fn format_restaurant(restaurant: &RestaurantWithMenu) -> Result<String> {
    let r = &restaurant.restaurant;
    let mut f = String::new();
    writeln!(f, "===============================================================================")?;
    writeln!(f, "{name} (#{id}) {city}, {country}", name = r.name, id = r.id, city = r.city, country = r.country)?;
    writeln!(f, "{cuisines}. Delivery in about {time} minutes", cuisines = r.cuisines.join(", "), time = r.delivery_time)?;
    writeln!(f, "===============================================================================")?;
    if restaurant.menus.is_empty() {
        writeln!(f, "The menu is empty")?;
        return Ok(f);
    }
    let mut table = Table::new();
    table.set_titles(row!["ID", "Item", "Description", "Price"]);
    restaurant.menus.iter().for_each(|m| {
        table.add_row(row![m.id, m.name, m.description, r->m.price]);
    });
    markdown_style(&mut table);
    write!(f, "{table}")?;
    Ok(f)
}

pub fn format_cart(items: &[CartItem]) -> String {
    if items.is_empty() {
        return "Your cart is empty".to_string();
    }
    let mut table = Table::new();
    table.set_titles(row!["ID", "Item", "Price", "Qty", "Total"]);
    items.iter().for_each(|i| {
        table.add_row(row![i.menu_id, i.name, r->i.price, r->i.quantity, r->i.line_total()]);
    });
    let total = items.iter().map(CartItem::line_total).sum::<eats_common::Pkr>();
    table.add_row(row!["", "Total", "", "", r->total]);
    markdown_style(&mut table);
    table.to_string()
}

pub fn format_orders(orders: &[OrderDetails]) -> String {
    if orders.is_empty() {
        return "No orders".to_string();
    }
    let mut table = Table::new();
    table.set_titles(row!["Order id", "Restaurant", "Customer", "Items", "Total", "Status", "Placed"]);
    orders.iter().for_each(|details| {
        let order = &details.order;
        let items =
            order.items.iter().map(|i| format!("{} x{}", i.name, i.quantity)).collect::<Vec<String>>().join(", ");
        table.add_row(row![
            order.order_id,
            details.restaurant.name,
            details.user.fullname,
            items,
            r->order.items_total(),
            order.status.to_string(),
            order.created_at.format("%Y-%m-%d %H:%M")
        ]);
    });
    markdown_style(&mut table);
    table.to_string()
}

pub fn format_sales_summary(summary: &SalesSummary) -> Result<String> {
    let mut f = String::new();
    writeln!(f, "===============================================================================")?;
    writeln!(f, "Sales report ({period})", period = summary.period)?;
    writeln!(
        f,
        "{orders:>4} orders. Total sales: {sales}. Average order: {avg}",
        orders = summary.total_orders,
        sales = summary.total_sales,
        avg = summary.avg_order_value
    )?;
    writeln!(f, "===============================================================================")?;
    if summary.sales_by_period.is_empty() {
        writeln!(f, "No confirmed orders yet")?;
        return Ok(f);
    }
    let mut by_day = Table::new();
    by_day.set_titles(row!["Day", "Orders", "Sales"]);
    summary.sales_by_period.iter().for_each(|p| {
        by_day.add_row(row![p.period, r->p.orders, r->p.sales]);
    });
    markdown_style(&mut by_day);
    writeln!(f, "{by_day}")?;
    let mut products = Table::new();
    products.set_titles(row!["Product", "Units", "Sales"]);
    summary.top_products.iter().for_each(|p| {
        products.add_row(row![p.name, r->p.units_sold, r->p.total_sales]);
    });
    markdown_style(&mut products);
    writeln!(f, "## Top products\n{products}")?;
    Ok(f)
}
