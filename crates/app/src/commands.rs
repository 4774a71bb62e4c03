//! Command execution. Every command yields a JSON document for stdout.

use std::io::BufRead;

use anyhow::{Context, bail};
use serde_json::{Value, json};
use stockroom_application::SearchOutcome;
use stockroom_domain::{MovementFilters, ProductFilters};
use tracing::info;

use crate::cli::{
    Commands, LocationCommands, LoginArgs, MovementCommands, OrderCommands, ProductCommands,
    ReportArgs, SupplierCommands,
};
use crate::runtime::Runtime;

/// Runs one command.
pub async fn execute(runtime: &Runtime, command: Commands) -> anyhow::Result<Value> {
    match command {
        Commands::Login(args) => login(runtime, args).await,
        Commands::Logout => Ok(serde_json::to_value(runtime.auth.logout().await)?),
        Commands::Whoami => whoami(runtime).await,
        Commands::Products(cmd) => products(runtime, cmd).await,
        Commands::Movements(MovementCommands::List(args)) => {
            let filters = MovementFilters {
                product: args.product,
                movement_type: args.movement_type.map(Into::into),
                start_date: args.from,
                end_date: args.to,
                location: args.location,
            };
            Ok(serde_json::to_value(
                runtime.movements.list(&filters, args.page).await?,
            )?)
        }
        Commands::Suppliers(SupplierCommands::List { search }) => Ok(serde_json::to_value(
            runtime.suppliers.list(search.as_deref()).await?,
        )?),
        Commands::Orders(cmd) => orders(runtime, cmd).await,
        Commands::Locations(LocationCommands::List) => {
            Ok(serde_json::to_value(runtime.locations.list().await?)?)
        }
        Commands::Report(args) => report(runtime, args).await,
    }
}

async fn login(runtime: &Runtime, args: LoginArgs) -> anyhow::Result<Value> {
    let password = match args.password {
        Some(password) => password,
        None => read_password().await?,
    };
    let user = runtime.auth.login(&args.username, &password).await?;
    Ok(json!({
        "username": user.username,
        "is_staff": user.is_staff,
        "profile": runtime.auth.profile().await,
    }))
}

async fn read_password() -> anyhow::Result<String> {
    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line).map(|_| line)
    })
    .await
    .context("password reader stopped")?
    .context("reading password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn whoami(runtime: &Runtime) -> anyhow::Result<Value> {
    let auth = &runtime.auth;
    // A failed refresh during the fetch ends the session.
    auth.fetch_profile().await;
    let Some(user) = auth.user().await else {
        bail!("not logged in");
    };
    Ok(json!({
        "user": user,
        "session": auth.status().await,
        "profile": auth.profile().await,
        "is_admin": auth.is_admin().await,
        "is_manager": auth.is_manager().await,
        "can_change_location": auth.can_change_location().await,
        "default_location": auth.get_default_location().await,
        "locations": auth.locations().await,
    }))
}

async fn products(runtime: &Runtime, command: ProductCommands) -> anyhow::Result<Value> {
    match command {
        ProductCommands::List(args) => {
            let filters = ProductFilters {
                search: args.search,
                is_active: args.active,
                low_stock: args.low_stock,
            };
            Ok(serde_json::to_value(
                runtime.products.list(&filters, args.page).await?,
            )?)
        }
        ProductCommands::Get { id } => Ok(serde_json::to_value(runtime.products.get(id).await?)?),
        ProductCommands::Suggest { query } => {
            match runtime.suggestion_search().search(&query).await? {
                SearchOutcome::Applied(products) => Ok(serde_json::to_value(products)?),
                SearchOutcome::Cleared => bail!("type at least two characters to search"),
                SearchOutcome::Superseded => Ok(json!([])),
            }
        }
    }
}

async fn orders(runtime: &Runtime, command: OrderCommands) -> anyhow::Result<Value> {
    match command {
        OrderCommands::List { page } => Ok(serde_json::to_value(runtime.orders.list(page).await?)?),
        OrderCommands::Receive { id } => {
            let order = runtime.orders.get(id).await?;
            if !order.status.can_receive() {
                bail!("order {id} is {:?}; only approved orders can be received", order.status);
            }
            let status = runtime.orders.receive(id).await?;
            info!(order = id, %status, "order received");
            Ok(json!({ "id": id, "status": status }))
        }
    }
}

async fn report(runtime: &Runtime, args: ReportArgs) -> anyhow::Result<Value> {
    let report = runtime.reports.inventory().await?;
    match args.low_stock {
        Some(threshold) => Ok(serde_json::to_value(report.low_stock(threshold))?),
        None => Ok(serde_json::to_value(report)?),
    }
}
