use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use warehouse_dashboard::{
    client::{HttpBackend, SessionStore, StoredSession},
    config,
    dashboard::{
        notifications::{self, Toast},
        views, Dashboard, Listing, Refreshed, Tab,
    },
    models::LoginCredentials,
    services::{
        checkouts::{CheckoutDraft, CheckoutService},
        inventory::{InventoryService, LocationDraft},
        products::{ProductDraft, ProductService},
        restocks::{RestockDraft, RestockService},
        suppliers::{SupplierDraft, SupplierService},
        transfers::TransferWorkflow,
        warehouses::{WarehouseDraft, WarehouseService},
        Outcome,
    },
    ServiceError,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::load_config().context("failed to load dashboard config")?;
    if let Some(base_url) = cli.base_url.clone() {
        config.base_url = base_url;
    }
    config::init_tracing(config.log_level(), config.log_json);

    let backend = HttpBackend::new(&config).context("failed to build backend client")?;
    let store = SessionStore::new(config.session_file_path());
    restore_session(&backend, &store);

    let (toasts, rx) = notifications::channel(32);
    let printer = tokio::spawn(notifications::process_toasts(rx, std::io::stderr(), cli.json));

    let mut dashboard = Dashboard::new(Arc::new(backend.clone()), config, toasts);
    let result = run(cli.command, &mut dashboard, &backend, &store, cli.json).await;

    // Closing the last sender lets the printer finish.
    drop(dashboard);
    let _ = printer.await;
    result
}

#[derive(Parser)]
#[command(
    name = "warehouse-dashboard",
    about = "Terminal dashboard for the warehouse inventory backend",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Print raw records as pretty JSON instead of tables"
    )]
    json: bool,
    #[arg(long, global = true, env = "APP__BASE_URL", help = "Backend root URL")]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a session and save its cookie
    Login(LoginArgs),
    /// End the session and delete the saved cookie
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Low stock, near-capacity and inventory total cards
    Summary,
    #[command(subcommand)]
    Restocks(RestockCommands),
    #[command(subcommand)]
    Warehouses(WarehouseCommands),
    #[command(subcommand)]
    Products(ProductCommands),
    #[command(subcommand)]
    Suppliers(SupplierCommands),
    #[command(subcommand)]
    Checkouts(CheckoutCommands),
    #[command(subcommand)]
    Inventory(InventoryCommands),
}

#[derive(Args)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "WAREHOUSE_DASHBOARD_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args, Default)]
struct ListArgs {
    #[arg(long, help = "Match rows where any searchable column contains this text")]
    search: Option<String>,
    #[arg(
        long = "filter",
        value_parser = parse_column_query,
        action = ArgAction::Append,
        help = "Column filter as COLUMN=TEXT; repeatable, all must match"
    )]
    filters: Vec<(String, String)>,
    #[arg(
        long = "sort",
        action = ArgAction::Append,
        help = "Toggle sorting on a column; repeat a column to sort descending"
    )]
    sorts: Vec<String>,
}

#[derive(Subcommand)]
enum RestockCommands {
    List(ListArgs),
    /// Show product details and total cost for a restock
    Preview {
        #[arg(long)]
        product: i64,
        #[arg(long)]
        amount: i64,
    },
    Create {
        #[arg(long)]
        product: i64,
        #[arg(long = "warehouse", action = ArgAction::Append, required = true)]
        warehouses: Vec<i64>,
        #[arg(long)]
        amount: String,
    },
}

#[derive(Args)]
struct WarehouseFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    location: String,
    #[arg(long)]
    capacity: String,
}

#[derive(Subcommand)]
enum WarehouseCommands {
    List(ListArgs),
    Create(WarehouseFields),
    Edit {
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        fields: WarehouseFields,
    },
    Delete {
        #[arg(long = "id", action = ArgAction::Append)]
        ids: Vec<i64>,
    },
    /// List the inventory held in one warehouse
    Inventory {
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Args)]
struct ProductFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    price: String,
    #[arg(long)]
    supplier: Option<i64>,
}

#[derive(Subcommand)]
enum ProductCommands {
    List(ListArgs),
    Create(ProductFields),
    Edit {
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        fields: ProductFields,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Args)]
struct SupplierFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
}

#[derive(Subcommand)]
enum SupplierCommands {
    List(ListArgs),
    Create(SupplierFields),
    Edit {
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        fields: SupplierFields,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Subcommand)]
enum CheckoutCommands {
    List(ListArgs),
    Create {
        #[arg(long)]
        warehouse: i64,
        #[arg(long)]
        product: i64,
        #[arg(long)]
        amount: String,
    },
}

#[derive(Subcommand)]
enum InventoryCommands {
    /// Records below their minimum stock
    LowStock,
    /// Move stock to another warehouse; without --to, lists the destinations
    Transfer {
        #[arg(long, help = "Warehouse the stock is in")]
        warehouse: i64,
        #[arg(long)]
        inventory: i64,
        #[arg(long, help = "Destination warehouse")]
        to: Option<i64>,
        #[arg(long)]
        amount: Option<String>,
    },
    /// Change shelf section and minimum stock
    EditLocation {
        #[arg(long)]
        warehouse: i64,
        #[arg(long)]
        inventory: i64,
        #[arg(long)]
        location: String,
        #[arg(long)]
        min_stock: String,
    },
    Delete {
        #[arg(long)]
        inventory: i64,
    },
}

async fn run(
    command: Commands,
    dashboard: &mut Dashboard,
    backend: &HttpBackend,
    store: &SessionStore,
    json: bool,
) -> Result<()> {
    if let Commands::Login(args) = &command {
        return handle_login(dashboard, backend, store, args, json).await;
    }

    if dashboard.require_login().await.is_err() {
        dashboard
            .toast(Toast::from_error(&ServiceError::NotLoggedIn))
            .await;
        bail!("not logged in; run `warehouse-dashboard login --email <EMAIL>` first");
    }

    match command {
        Commands::Login(_) => Ok(()),
        Commands::Logout => {
            let result = dashboard.logout().await;
            store.clear().context("failed to remove saved session")?;
            result.context("logout request failed")?;
            if !json {
                println!("Logged out");
            }
            Ok(())
        }
        Commands::Whoami => {
            let user = dashboard
                .user()
                .cloned()
                .ok_or_else(|| anyhow!("no active session"))?;
            if json {
                print_json(&user)?;
            } else {
                let name = [user.first_name.as_deref(), user.last_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("{} <{}>", name, user.email);
                if let Some(title) = &user.job_title {
                    println!("{}", title);
                }
            }
            Ok(())
        }
        Commands::Summary => {
            let summary = dashboard.summary().await;
            if json {
                print_json(&summary)?;
            } else {
                println!("{}", summary.render());
            }
            Ok(())
        }
        Commands::Restocks(command) => handle_restocks(dashboard, command, json).await,
        Commands::Warehouses(command) => handle_warehouses(dashboard, command, json).await,
        Commands::Products(command) => handle_products(dashboard, command, json).await,
        Commands::Suppliers(command) => handle_suppliers(dashboard, command, json).await,
        Commands::Checkouts(command) => handle_checkouts(dashboard, command, json).await,
        Commands::Inventory(command) => handle_inventory(dashboard, command, json).await,
    }
}

async fn handle_login(
    dashboard: &mut Dashboard,
    backend: &HttpBackend,
    store: &SessionStore,
    args: &LoginArgs,
    json: bool,
) -> Result<()> {
    let credentials = LoginCredentials {
        email: args.email.clone(),
        password: args.password.clone(),
    };
    let user = dashboard
        .login(&credentials)
        .await
        .context("login failed")?
        .clone();

    if let Some(cookie) = backend.session_cookie() {
        store.save(&StoredSession::new(
            user.email.clone(),
            backend.base_url().as_str(),
            cookie,
        ))?;
    }

    if json {
        print_json(&user)?;
    } else {
        println!("Logged in as {}", user.email);
        println!("Session saved to: {}", store.path().display());
    }
    Ok(())
}

async fn handle_restocks(dashboard: &Dashboard, command: RestockCommands, json: bool) -> Result<()> {
    let service = RestockService::new(dashboard.backend());
    match command {
        RestockCommands::List(args) => {
            if json {
                print_json(&service.list().await.context("failed to load restocks")?)?;
                return Ok(());
            }
            show_listing(dashboard.open_tab(Tab::Restocks).await, &args)
        }
        RestockCommands::Preview { product, amount } => {
            let preview = service
                .preview(product, amount)
                .await
                .with_context(|| format!("failed to load product {}", product))?;
            if json {
                print_json(&preview)?;
            } else {
                println!("Product:        {}", preview.product.product_name);
                println!("Category:       {}", preview.product.category_or_na());
                println!(
                    "Price per unit: {}",
                    views::format_price(preview.product.price)
                );
                println!("Supplier:       {}", preview.product.supplier_label());
                println!(
                    "Total cost:     {}",
                    views::format_price(preview.total_cost)
                );
            }
            Ok(())
        }
        RestockCommands::Create {
            product,
            warehouses,
            amount,
        } => {
            let draft = RestockDraft {
                warehouse_ids: warehouses,
                product_id: Some(product),
                amount,
            };
            let result = service.create(draft, dashboard.user_email()).await;
            complete(dashboard, result, json).await
        }
    }
}

async fn handle_warehouses(
    dashboard: &Dashboard,
    command: WarehouseCommands,
    json: bool,
) -> Result<()> {
    let service = WarehouseService::new(dashboard.backend());
    match command {
        WarehouseCommands::List(args) => {
            if json {
                print_json(&service.list().await.context("failed to load warehouses")?)?;
                return Ok(());
            }
            show_listing(dashboard.open_tab(Tab::Warehouses).await, &args)
        }
        WarehouseCommands::Create(fields) => {
            let result = service.create(fields.into()).await;
            complete(dashboard, result, json).await
        }
        WarehouseCommands::Edit { id, fields } => {
            let result = service.edit(id, fields.into()).await;
            complete(dashboard, result, json).await
        }
        WarehouseCommands::Delete { ids } => {
            let result = service.delete_many(&ids).await;
            complete(dashboard, result, json).await
        }
        WarehouseCommands::Inventory { id, list } => {
            if json {
                let records = InventoryService::new(dashboard.backend())
                    .for_warehouse(id)
                    .await
                    .with_context(|| format!("failed to load inventory for warehouse {}", id))?;
                return print_json(&records);
            }
            show_listing(dashboard.warehouse_inventory(id).await, &list)
        }
    }
}

async fn handle_products(dashboard: &Dashboard, command: ProductCommands, json: bool) -> Result<()> {
    let service = ProductService::new(dashboard.backend());
    match command {
        ProductCommands::List(args) => {
            if json {
                print_json(&service.list().await.context("failed to load products")?)?;
                return Ok(());
            }
            show_listing(dashboard.open_tab(Tab::Products).await, &args)
        }
        ProductCommands::Create(fields) => {
            let result = service.create(fields.into()).await;
            complete(dashboard, result, json).await
        }
        ProductCommands::Edit { id, fields } => {
            let result = service.edit(id, fields.into()).await;
            complete(dashboard, result, json).await
        }
        ProductCommands::Delete { id } => {
            let result = service.delete(id).await;
            complete(dashboard, result, json).await
        }
    }
}

async fn handle_suppliers(
    dashboard: &Dashboard,
    command: SupplierCommands,
    json: bool,
) -> Result<()> {
    let service = SupplierService::new(dashboard.backend());
    match command {
        SupplierCommands::List(args) => {
            if json {
                print_json(&service.list().await.context("failed to load suppliers")?)?;
                return Ok(());
            }
            show_listing(dashboard.open_tab(Tab::Suppliers).await, &args)
        }
        SupplierCommands::Create(fields) => {
            let result = service.create(fields.into()).await;
            complete(dashboard, result, json).await
        }
        SupplierCommands::Edit { id, fields } => {
            let result = service.edit(id, fields.into()).await;
            complete(dashboard, result, json).await
        }
        SupplierCommands::Delete { id } => {
            let result = service.delete(id).await;
            complete(dashboard, result, json).await
        }
    }
}

async fn handle_checkouts(
    dashboard: &Dashboard,
    command: CheckoutCommands,
    json: bool,
) -> Result<()> {
    let service = CheckoutService::new(dashboard.backend());
    match command {
        CheckoutCommands::List(args) => {
            if json {
                print_json(&service.list().await.context("failed to load checkouts")?)?;
                return Ok(());
            }
            show_listing(dashboard.open_tab(Tab::Checkouts).await, &args)
        }
        CheckoutCommands::Create {
            warehouse,
            product,
            amount,
        } => {
            let draft = CheckoutDraft {
                warehouse_id: warehouse,
                product_id: product,
                amount,
            };
            let result = service.create(draft, dashboard.user_email()).await;
            complete(dashboard, result, json).await
        }
    }
}

async fn handle_inventory(
    dashboard: &Dashboard,
    command: InventoryCommands,
    json: bool,
) -> Result<()> {
    let service = InventoryService::new(dashboard.backend());
    match command {
        InventoryCommands::LowStock => {
            let records = service
                .below_minimum()
                .await
                .context("failed to load low-stock records")?;
            if json {
                print_json(&records)?;
            } else {
                let table = views::warehouse_inventory_table(&records);
                if table.is_empty() {
                    println!("No items below minimum stock.");
                } else {
                    println!("{}", table.render());
                }
            }
            Ok(())
        }
        InventoryCommands::Transfer {
            warehouse,
            inventory,
            to,
            amount,
        } => {
            let records = service
                .for_warehouse(warehouse)
                .await
                .with_context(|| format!("failed to load inventory for warehouse {}", warehouse))?;
            let record = records
                .into_iter()
                .find(|r| r.inventory_id == inventory)
                .ok_or_else(|| {
                    anyhow!("inventory record {} is not in warehouse {}", inventory, warehouse)
                })?;

            let mut workflow = TransferWorkflow::new(dashboard.backend(), warehouse, record);
            workflow
                .open()
                .await
                .context("failed to load transfer destinations")?;

            let Some(destination) = to else {
                if json {
                    print_json(&workflow.candidates())?;
                } else {
                    println!("Transfer item: {}", workflow.record().product.product_name);
                    for candidate in workflow.candidates() {
                        println!("  {:>6}  {}", candidate.warehouse.warehouse_id, candidate.label());
                    }
                }
                return Ok(());
            };

            let prepared = workflow
                .enter_amount(amount.as_deref().unwrap_or_default())
                .and_then(|()| workflow.select_destination(destination));
            let result = match prepared {
                Ok(()) => workflow.submit().await,
                Err(e) => Err(e),
            };
            complete(dashboard, result, json).await
        }
        InventoryCommands::EditLocation {
            warehouse,
            inventory,
            location,
            min_stock,
        } => {
            let draft = LocationDraft {
                warehouse_location: location,
                minimum_stock: min_stock,
            };
            let result = service.update_location(warehouse, inventory, draft).await;
            complete(dashboard, result, json).await
        }
        InventoryCommands::Delete { inventory } => {
            let result = service.delete(inventory).await;
            complete(dashboard, result, json).await
        }
    }
}

#[derive(Serialize)]
struct Completed<'a> {
    outcome: &'a Outcome,
    refreshed: &'a [Refreshed],
}

/// Toasts the result; on success reloads and prints the views it touched.
async fn complete(
    dashboard: &Dashboard,
    result: Result<Outcome, ServiceError>,
    json: bool,
) -> Result<()> {
    let outcome = dashboard.finish(result).await?;
    let refreshed = dashboard.refresh(&outcome.refresh).await;

    if json {
        return print_json(&Completed {
            outcome: &outcome,
            refreshed: &refreshed,
        });
    }

    for view in &refreshed {
        match view {
            Refreshed::Summary(summary) => println!("{}\n", summary.render()),
            Refreshed::Listing { name, listing } => {
                println!("{}\n{}\n", name, listing.render());
            }
        }
    }
    Ok(())
}

fn show_listing(mut listing: Listing, args: &ListArgs) -> Result<()> {
    if let Some(table) = listing.table_mut() {
        if let Some(search) = &args.search {
            table.set_global_query(search);
        }
        for (column, query) in &args.filters {
            let idx = table
                .column_index(column)
                .ok_or_else(|| anyhow!("unknown column '{}'", column))?;
            table.set_column_query(idx, query);
        }
        for column in &args.sorts {
            let idx = table
                .column_index(column)
                .ok_or_else(|| anyhow!("unknown column '{}'", column))?;
            table.toggle_sort(idx);
        }
    }
    println!("{}", listing.render());
    Ok(())
}

fn restore_session(backend: &HttpBackend, store: &SessionStore) {
    match store.load() {
        Ok(Some(session)) if session.base_url == backend.base_url().as_str() => {
            backend.restore_session_cookie(&session.cookie);
            debug!(email = %session.email, "restored saved session");
        }
        Ok(Some(_)) => debug!("saved session belongs to another backend; ignoring it"),
        Ok(None) => {}
        Err(e) => {
            // A corrupt session file only means logging in again.
            debug!(error = %e, "ignoring unreadable session file");
        }
    }
}

fn parse_column_query(raw: &str) -> Result<(String, String), String> {
    let (column, query) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=TEXT, got '{raw}'"))?;
    if column.trim().is_empty() {
        return Err(format!("missing column name in '{raw}'"));
    }
    Ok((column.trim().to_string(), query.to_string()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

impl From<WarehouseFields> for WarehouseDraft {
    fn from(fields: WarehouseFields) -> Self {
        Self {
            name: fields.name,
            location: fields.location,
            capacity: fields.capacity,
        }
    }
}

impl From<ProductFields> for ProductDraft {
    fn from(fields: ProductFields) -> Self {
        Self {
            product_name: fields.name,
            category: fields.category,
            price: fields.price,
            supplier_id: fields.supplier,
        }
    }
}

impl From<SupplierFields> for SupplierDraft {
    fn from(fields: SupplierFields) -> Self {
        Self {
            name: fields.name,
            contact_email: fields.email,
            phone: fields.phone,
            address: fields.address,
        }
    }
}
