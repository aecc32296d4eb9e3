use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use eats_client::{
    client::EatsClient,
    config::{default_home, read_config, write_config},
    formatting::{
        format_cart,
        format_orders,
        format_restaurant,
        format_restaurants,
        format_sales_summary,
        format_user,
    },
    storage::StateDir,
    stores::{CartStore, OrderStore, RestaurantStore, SessionStore},
};
use eats_common::Pkr;
use eats_engine::{
    db_types::{DeliveryDetails, MenuItemUpdate, NewMenuItem, NewRestaurant, OrderId, OrderStatusType, ProfileUpdate},
    sales_report::ReportPeriod,
    SignupRequest,
};
use log::*;

#[derive(Parser, Debug)]
#[command(version, about = "EatsOnline from the command line")]
pub struct Arguments {
    /// Where the client keeps its configuration and saved state. Defaults to ~/.eats
    #[arg(long = "home", global = true)]
    home: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the server is up
    Health,
    /// Show or change the server the client talks to
    Server { url: Option<String> },
    Signup(SignupParams),
    Login {
        #[arg(short = 'e', long = "email")]
        email: String,
        #[arg(short = 'p', long = "password")]
        password: String,
    },
    Logout,
    /// Check the saved session with the server and show who you are logged in as
    Whoami,
    /// Update your profile
    Profile(ProfileParams),
    /// Search for restaurants by name, city or cuisine
    Search {
        text: Option<String>,
        /// Only restaurants serving this cuisine. May be repeated
        #[arg(short = 'c', long = "cuisine")]
        cuisines: Vec<String>,
    },
    /// Show a restaurant and its menu, and select it for ordering
    Restaurant { id: i64 },
    #[command(subcommand)]
    Cart(CartCommand),
    /// Pay for the items in your cart
    Checkout(DeliveryParams),
    /// Your order history
    Orders,
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    Show,
    /// Add an item from the selected restaurant's menu
    Add { menu_id: i64 },
    Inc { menu_id: i64 },
    Dec { menu_id: i64 },
    Remove { menu_id: i64 },
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Show your restaurant and its menu
    Restaurant,
    /// Register your restaurant
    CreateRestaurant(RestaurantParams),
    /// Add an item to your restaurant's menu
    AddMenu(MenuParams),
    /// Change an item on your restaurant's menu
    UpdateMenu {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// In rupees
        #[arg(long)]
        price: Option<i64>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Orders placed with your restaurant
    Orders,
    /// Move an order along the delivery pipeline
    Status { order_id: OrderId, status: OrderStatusType },
    /// Sales figures for your restaurant
    Report {
        #[arg(short = 'p', long = "period", default_value = "daily")]
        period: ReportPeriod,
    },
}

#[derive(Debug, Args)]
pub struct SignupParams {
    #[arg(short = 'n', long = "name")]
    fullname: String,
    #[arg(short = 'e', long = "email")]
    email: String,
    #[arg(short = 'p', long = "password")]
    password: String,
    #[arg(short = 'c', long = "contact", default_value = "")]
    contact: String,
}

#[derive(Debug, Args)]
pub struct ProfileParams {
    #[arg(long = "name")]
    fullname: Option<String>,
    #[arg(long)]
    contact: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long = "picture")]
    profile_picture: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeliveryParams {
    #[arg(short = 'n', long = "name")]
    name: String,
    #[arg(short = 'e', long = "email")]
    email: String,
    #[arg(short = 'a', long = "address")]
    address: String,
    #[arg(short = 'c', long = "city")]
    city: String,
}

#[derive(Debug, Args)]
pub struct RestaurantParams {
    #[arg(short = 'n', long = "name")]
    name: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    country: String,
    /// Estimated delivery time, in minutes
    #[arg(short = 't', long = "delivery-time")]
    delivery_time: i64,
    #[arg(short = 'c', long = "cuisine")]
    cuisines: Vec<String>,
    #[arg(long = "image", default_value = "")]
    image_url: String,
}

#[derive(Debug, Args)]
pub struct MenuParams {
    #[arg(short = 'n', long = "name")]
    name: String,
    #[arg(short = 'd', long = "description", default_value = "")]
    description: String,
    /// In rupees
    #[arg(short = 'p', long = "price")]
    price: i64,
    #[arg(long = "image", default_value = "")]
    image: String,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    let cli = Arguments::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Arguments) -> Result<()> {
    let home = match cli.home {
        Some(home) => home,
        None => default_home()?,
    };
    let mut config = read_config(&home)?;
    if let Command::Server { url } = &cli.command {
        if let Some(url) = url {
            EatsClient::new(url)?;
            config.server = url.clone();
            write_config(&home, &config)?;
        }
        println!("Server: {}", config.server);
        return Ok(());
    }
    let state = StateDir::new(&home)?;
    let mut client = EatsClient::new(&config.server)?;
    let mut session = SessionStore::load(state.clone())?;
    client.set_access_token(session.token().map(String::from));
    debug!("Using {client}");

    match cli.command {
        Command::Health => println!("{}", client.health().await?),
        Command::Server { .. } => {},
        Command::Signup(params) => {
            let request = SignupRequest {
                fullname: params.fullname,
                email: params.email,
                password: params.password,
                contact: params.contact,
            };
            let user = session.signup(&mut client, &request).await?;
            println!("Welcome {}", user.fullname);
        },
        Command::Login { email, password } => {
            let user = session.login(&mut client, &email, &password).await?;
            println!("Welcome back {}", user.fullname);
        },
        Command::Logout => {
            session.logout(&mut client).await?;
            println!("Logged out");
        },
        Command::Whoami => match session.check_authentication(&mut client).await? {
            true => {
                let user = session.user().ok_or_else(|| anyhow!("Not logged in"))?;
                print!("{}", format_user(user)?);
            },
            false => println!("Not logged in"),
        },
        Command::Profile(params) => {
            let update = ProfileUpdate {
                fullname: params.fullname,
                contact: params.contact,
                address: params.address,
                city: params.city,
                country: params.country,
                profile_picture: params.profile_picture,
            };
            if update.is_empty() {
                return Err(anyhow!("Nothing to update"));
            }
            let user = session.update_profile(&client, &update).await?;
            print!("{}", format_user(user)?);
        },
        Command::Search { text, cuisines } => {
            let mut restaurants = RestaurantStore::load(state)?;
            let results = restaurants.search(&client, text.as_deref(), &cuisines).await?;
            println!("{}", format_restaurants(results));
        },
        Command::Restaurant { id } => {
            let mut restaurants = RestaurantStore::load(state)?;
            let restaurant = restaurants.select(&client, id).await?;
            println!("{}", format_restaurant(restaurant)?);
        },
        Command::Cart(command) => handle_cart_command(command, state)?,
        Command::Checkout(params) => {
            let mut cart = CartStore::load(state.clone())?;
            let mut orders = OrderStore::load(state)?;
            let delivery =
                DeliveryDetails { name: params.name, email: params.email, address: params.address, city: params.city };
            let checkout = orders.checkout(&client, &mut cart, delivery).await?;
            match checkout.url {
                Some(url) => println!("Complete your payment at {url}"),
                None => println!("Checkout session {} created", checkout.id),
            }
        },
        Command::Orders => {
            let mut orders = OrderStore::load(state)?;
            println!("{}", format_orders(orders.fetch(&client).await?));
        },
        Command::Admin(command) => {
            if !session.is_admin() {
                warn!("The saved session is not a restaurant administrator. The server will probably refuse this.");
            }
            handle_admin_command(command, &client, state).await?;
        },
    }
    Ok(())
}

fn handle_cart_command(command: CartCommand, state: StateDir) -> Result<()> {
    let mut cart = CartStore::load(state.clone())?;
    match command {
        CartCommand::Show => {},
        CartCommand::Add { menu_id } => {
            let restaurants = RestaurantStore::load(state)?;
            cart.add(restaurants.menu_item(menu_id)?)?;
        },
        CartCommand::Inc { menu_id } => cart.increment(menu_id)?,
        CartCommand::Dec { menu_id } => cart.decrement(menu_id)?,
        CartCommand::Remove { menu_id } => cart.remove(menu_id)?,
        CartCommand::Clear => cart.clear()?,
    }
    println!("{}", format_cart(cart.items()));
    Ok(())
}

async fn handle_admin_command(command: AdminCommand, client: &EatsClient, state: StateDir) -> Result<()> {
    let mut restaurants = RestaurantStore::load(state.clone())?;
    match command {
        AdminCommand::Restaurant => {
            let restaurant = restaurants.fetch_my_restaurant(client).await?;
            println!("{}", format_restaurant(restaurant)?);
        },
        AdminCommand::CreateRestaurant(params) => {
            let restaurant = NewRestaurant {
                name: params.name,
                city: params.city,
                country: params.country,
                delivery_time: params.delivery_time,
                cuisines: params.cuisines,
                image_url: params.image_url,
            };
            let restaurant = client.create_restaurant(&restaurant).await?;
            println!("Restaurant {} created with id {}", restaurant.name, restaurant.id);
        },
        AdminCommand::AddMenu(params) => {
            let item = NewMenuItem {
                name: params.name,
                description: params.description,
                price: Pkr::from_rupees(params.price),
                image: params.image,
            };
            let item = client.add_menu_item(&item).await?;
            println!("{} added to the menu with id {}", item.name, item.id);
        },
        AdminCommand::UpdateMenu { id, name, description, price, image } => {
            let update = MenuItemUpdate { name, description, price: price.map(Pkr::from_rupees), image };
            if update.is_empty() {
                return Err(anyhow!("Nothing to update"));
            }
            let item = client.update_menu_item(id, &update).await?;
            println!("{} updated. Price is now {}", item.name, item.price);
        },
        AdminCommand::Orders => {
            println!("{}", format_orders(restaurants.fetch_restaurant_orders(client).await?));
        },
        AdminCommand::Status { order_id, status } => {
            let status = restaurants.update_order_status(client, &order_id, status).await?;
            println!("Order {order_id} is now {status}");
        },
        AdminCommand::Report { period } => {
            let orders = OrderStore::load(state)?;
            let summary = orders.sales_summary(client, period).await?;
            print!("{}", format_sales_summary(&summary)?);
        },
    }
    Ok(())
}
