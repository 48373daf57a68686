//! # Console Shell
//!
//! Reads one command per line, runs it and prints the result.
//!
//! ## Line Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items add --name "Blue Pen" --category 1 --supplier 2 --price 1.20    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tokenize  (double quotes group words)                                  │
//! │       │                                                                 │
//! │       ├── single key word? (f1..f4, esc, enter) ──► navigation          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ShellLine::try_parse_from (clap, no binary name)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  runtime.block_on(commands::...)  one command at a time                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  view::... text, or pretty JSON with --json                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failing command prints `error: <message>` and the loop continues.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::commands::inventory::{ItemChanges, MovementRequest};
use crate::commands::{auth, catalog, dashboard, inventory, reports, settings};
use crate::error::ApiError;
use crate::navigation::{key_action, KeyAction, Panel};
use crate::state::{AppState, ConfigState};
use crate::view;
use stockroom_core::{
    InventoryFilter, ItemInput, ItemStatus, Money, MovementType, NewCategory, NewSupplier,
    NewUser, SortField, SortOrder, UserRole,
};

// =============================================================================
// Command Line Grammar
// =============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "stockroom",
    no_binary_name = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct ShellLine {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    /// Sign in
    Login { username: String, password: String },
    /// Sign out (same as esc)
    Logout,
    /// Show who is signed in
    Whoami,
    /// Open a panel by name or key
    Go { panel: Panel },
    /// Dashboard figures (same as f1)
    Dashboard,
    /// Search and maintain items
    #[command(subcommand)]
    Items(ItemsCommand),
    /// Record a stock movement
    Move(MoveArgs),
    /// Recent stock movements
    Movements {
        #[arg(long, help = "Only movements of this item")]
        item: Option<i64>,
        #[arg(long, help = "Maximum rows")]
        limit: Option<u32>,
    },
    /// Item categories
    #[command(subcommand)]
    Categories(CategoriesCommand),
    /// Suppliers
    #[command(subcommand)]
    Suppliers(SuppliersCommand),
    /// Run a report
    Report {
        #[arg(value_enum)]
        kind: ReportKind,
    },
    /// Database connection status
    Status,
    /// Probe the database again (admin)
    Reconnect,
    /// User accounts (admin)
    #[command(subcommand)]
    Users(UsersCommand),
    /// List commands and keys
    Help,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Subcommand)]
enum ItemsCommand {
    /// Active items by name
    List,
    /// Filtered search
    Search(SearchArgs),
    /// Full details of one item
    Show { id: i64 },
    /// Create an item
    Add(ItemFieldArgs),
    /// Change fields of an item
    Edit {
        id: i64,
        #[command(flatten)]
        fields: ItemFieldArgs,
    },
    /// Mark an item inactive
    Delete { id: i64 },
}

#[derive(Debug, Args)]
struct SearchArgs {
    #[arg(help = "Words matched against name, description and SKU")]
    term: Vec<String>,
    #[arg(long, help = "Category id")]
    category: Option<i64>,
    #[arg(long, help = "Supplier id")]
    supplier: Option<i64>,
    #[arg(long, help = "active, inactive or discontinued")]
    status: Option<ItemStatus>,
    #[arg(long, help = "Only items at or below minimum stock")]
    low_stock: bool,
    #[arg(long, help = "Lowest selling price, e.g. 1.50")]
    min_price: Option<Money>,
    #[arg(long, help = "Highest selling price")]
    max_price: Option<Money>,
    #[arg(long, value_parser = parse_start, help = "Created on or after (YYYY-MM-DD or RFC3339)")]
    from: Option<DateTime<Utc>>,
    #[arg(long, value_parser = parse_end, help = "Created on or before (YYYY-MM-DD or RFC3339)")]
    to: Option<DateTime<Utc>>,
    #[arg(long, default_value = "name", help = "Sort column")]
    sort: SortField,
    #[arg(long, help = "Sort descending")]
    desc: bool,
    #[arg(long, help = "Page number (1-indexed)")]
    page: Option<u32>,
    #[arg(long, help = "Rows per page")]
    page_size: Option<u32>,
}

impl SearchArgs {
    fn paged(&self) -> bool {
        self.page.is_some() || self.page_size.is_some()
    }

    fn into_filter(self) -> InventoryFilter {
        let defaults = InventoryFilter::default();
        let term = self.term.join(" ");
        InventoryFilter {
            search_term: (!term.trim().is_empty()).then_some(term),
            category_id: self.category,
            supplier_id: self.supplier,
            status: self.status,
            low_stock_only: self.low_stock,
            min_price: self.min_price,
            max_price: self.max_price,
            created_from: self.from,
            created_to: self.to,
            sort_by: self.sort,
            sort_order: if self.desc {
                SortOrder::Desc
            } else {
                SortOrder::Asc
            },
            page_number: self.page.unwrap_or(defaults.page_number),
            page_size: self.page_size.unwrap_or(defaults.page_size),
        }
    }
}

#[derive(Debug, Args)]
struct ItemFieldArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    sku: Option<String>,
    #[arg(long)]
    barcode: Option<String>,
    #[arg(long, help = "Category id")]
    category: Option<i64>,
    #[arg(long, help = "Supplier id")]
    supplier: Option<i64>,
    #[arg(long = "qty", help = "Quantity on hand")]
    quantity: Option<i64>,
    #[arg(long = "min", help = "Minimum stock")]
    minimum_stock: Option<i64>,
    #[arg(long = "reorder", help = "Reorder level")]
    reorder_level: Option<i64>,
    #[arg(long, help = "Unit of measure (default pcs)")]
    unit: Option<String>,
    #[arg(long, help = "Cost price, e.g. 0.85")]
    cost: Option<Money>,
    #[arg(long, help = "Selling price, e.g. 1.20")]
    price: Option<Money>,
    #[arg(long)]
    status: Option<ItemStatus>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl ItemFieldArgs {
    fn into_input(self) -> ItemInput {
        let defaults = ItemInput::default();
        ItemInput {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            sku: self.sku.unwrap_or_default(),
            barcode: self.barcode.unwrap_or_default(),
            category_id: self.category,
            supplier_id: self.supplier,
            quantity: self.quantity.unwrap_or_default(),
            minimum_stock: self.minimum_stock.unwrap_or_default(),
            reorder_level: self.reorder_level.unwrap_or_default(),
            unit: self.unit.unwrap_or(defaults.unit),
            cost_price_cents: self.cost.map(|m| m.cents()).unwrap_or_default(),
            selling_price_cents: self.price.map(|m| m.cents()).unwrap_or_default(),
            status: self.status.unwrap_or(defaults.status),
            location: self.location.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
        }
    }

    fn into_changes(self) -> ItemChanges {
        ItemChanges {
            name: self.name,
            description: self.description,
            sku: self.sku,
            barcode: self.barcode,
            category_id: self.category,
            supplier_id: self.supplier,
            quantity: self.quantity,
            minimum_stock: self.minimum_stock,
            reorder_level: self.reorder_level,
            unit: self.unit,
            cost_price_cents: self.cost.map(|m| m.cents()),
            selling_price_cents: self.price.map(|m| m.cents()),
            status: self.status,
            location: self.location,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Args)]
struct MoveArgs {
    #[arg(help = "Item id")]
    item: i64,
    #[arg(help = "in, out, adjustment or transfer")]
    kind: MovementType,
    #[arg(allow_negative_numbers = true, help = "Quantity; signed for adjustments")]
    quantity: i64,
    #[arg(long = "ref", default_value = "", help = "PO or invoice number")]
    reference: String,
    #[arg(long, default_value = "")]
    reason: String,
    #[arg(long, default_value = "")]
    notes: String,
}

#[derive(Debug, Subcommand)]
enum CategoriesCommand {
    /// Active categories
    List,
    /// Create a category
    Add {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Debug, Subcommand)]
enum SuppliersCommand {
    /// Active suppliers
    List,
    /// Create a supplier
    Add {
        name: String,
        #[arg(long, default_value = "")]
        contact: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        postal_code: String,
        #[arg(long, default_value = "")]
        country: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
}

#[derive(Debug, Subcommand)]
enum UsersCommand {
    /// All accounts (admin)
    List,
    /// Create an account (admin)
    Add {
        username: String,
        password: String,
        full_name: String,
        #[arg(long, default_value = "user", help = "admin, manager, user or viewer")]
        role: UserRole,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportKind {
    LowStock,
    Reorder,
    Valuation,
}

/// A `--from`/`--to` value: a bare day or an exact instant.
enum DateArg {
    Day(NaiveDate),
    Instant(DateTime<Utc>),
}

fn parse_date_arg(value: &str) -> Result<DateArg, String> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(DateArg::Day(date));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|t| DateArg::Instant(t.with_timezone(&Utc)))
        .map_err(|_| format!("'{}' is not a date (YYYY-MM-DD) or RFC3339 timestamp", value))
}

/// A bare date means the start of that day.
fn parse_start(value: &str) -> Result<DateTime<Utc>, String> {
    Ok(match parse_date_arg(value)? {
        DateArg::Day(date) => date.and_time(NaiveTime::MIN).and_utc(),
        DateArg::Instant(time) => time,
    })
}

/// A bare date means the last nanosecond of that day.
fn parse_end(value: &str) -> Result<DateTime<Utc>, String> {
    Ok(match parse_date_arg(value)? {
        DateArg::Day(date) => {
            date.and_time(NaiveTime::MIN).and_utc() + Duration::days(1) - Duration::nanoseconds(1)
        }
        DateArg::Instant(time) => time,
    })
}

/// Splits a line on whitespace; double quotes group words and may produce
/// an empty argument (`""`).
pub fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if pending {
                    tokens.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }

    if in_quotes {
        return Err("unterminated quote".to_string());
    }
    if pending {
        tokens.push(current);
    }
    Ok(tokens)
}

// =============================================================================
// Shell
// =============================================================================

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    state: AppState,
    runtime: Runtime,
    panel: Option<Panel>,
    json: bool,
}

impl Shell {
    /// `json` makes JSON the default output for every command.
    pub fn new(state: AppState, runtime: Runtime, json: bool) -> Self {
        Shell {
            state,
            runtime,
            panel: None,
            json,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn panel(&self) -> Option<Panel> {
        self.panel
    }

    fn prompt(&self) -> String {
        match (self.state.session.is_signed_in(), self.panel) {
            (false, _) => "login> ".to_string(),
            (true, Some(panel)) => format!("stockroom[{}]> ", panel),
            (true, None) => "stockroom> ".to_string(),
        }
    }

    /// Runs until `quit` or end of input, then closes the database.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        let status = self.runtime.block_on(self.state.db.status_message());
        writeln!(out, "{}", view::banner(&self.state.config.store_name, &status))?;

        let mut lines = input.lines();
        loop {
            write!(out, "{}", self.prompt())?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            if self.execute(&line?, out)? == Flow::Quit {
                break;
            }
        }

        self.runtime.block_on(self.state.db.close());
        Ok(())
    }

    /// Handles one input line.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let tokens = match tokenize(line) {
            Ok(tokens) => tokens,
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                return Ok(Flow::Continue);
            }
        };
        let Some(first) = tokens.first() else {
            return Ok(Flow::Continue);
        };
        // Only the command word is logged; arguments may hold a password.
        debug!(command = %first, "Shell input");

        if tokens.len() == 1 {
            if let Some(action) = key_action(first) {
                return self.on_key(action, out);
            }
        }

        match ShellLine::try_parse_from(&tokens) {
            Ok(parsed) => {
                let json = self.json || parsed.json;
                self.dispatch(parsed.command, json, out)
            }
            Err(e) => {
                writeln!(out, "{}", e.render().to_string().trim_end())?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Esc signs out, or leaves the console from the login prompt.
    fn on_key<W: Write>(&mut self, action: KeyAction, out: &mut W) -> io::Result<Flow> {
        match action {
            KeyAction::Navigate(panel) => self.open_panel(panel, self.json, out)?,
            KeyAction::Logout if !self.state.session.is_signed_in() => {
                writeln!(out, "Bye.")?;
                return Ok(Flow::Quit);
            }
            KeyAction::Logout => self.logout(out)?,
            KeyAction::Submit => match self.panel {
                Some(panel) => self.open_panel(panel, self.json, out)?,
                None => writeln!(out, "Nothing to submit.")?,
            },
        }
        Ok(Flow::Continue)
    }

    fn logout<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.panel = None;
        match auth::logout(&self.state.session) {
            Some(user) => writeln!(out, "Goodbye, {}.", user.full_name),
            None => writeln!(out, "Not signed in."),
        }
    }

    fn open_panel<W: Write>(&mut self, panel: Panel, json: bool, out: &mut W) -> io::Result<()> {
        if !self.state.session.is_signed_in() {
            return self.fail(out, json, &ApiError::not_authenticated());
        }
        self.panel = Some(panel);
        if !json {
            writeln!(out, "{}", view::panel_header(panel))?;
        }

        let (db, session, config) = (&self.state.db, &self.state.session, &self.state.config);
        match panel {
            Panel::Dashboard => {
                let result = self.runtime.block_on(dashboard::dashboard_stats(db, session));
                self.show(out, json, result, view::dashboard)
            }
            Panel::Inventory => {
                let filter = InventoryFilter {
                    status: Some(ItemStatus::Active),
                    ..Default::default()
                };
                let result = self
                    .runtime
                    .block_on(inventory::search_items(db, session, &filter, false));
                self.show(out, json, result, |items, c| view::items(items, c))
            }
            Panel::Reports => {
                if !json {
                    writeln!(out, "Low stock")?;
                }
                let result = self.runtime.block_on(reports::low_stock_report(db, session));
                self.show(out, json, result, |items, c| view::items(items, c))
            }
            Panel::Settings => {
                let status = self.runtime.block_on(settings::connection_status(db, config));
                self.show(out, json, Ok(status), |s, _| view::connection(s))
            }
        }
    }

    fn dispatch<W: Write>(
        &mut self,
        command: ShellCommand,
        json: bool,
        out: &mut W,
    ) -> io::Result<Flow> {
        let (db, session, config) = (&self.state.db, &self.state.session, &self.state.config);

        match command {
            ShellCommand::Login { username, password } => {
                let result = self
                    .runtime
                    .block_on(auth::login(db, session, config, &username, &password));
                let signed_in = result.is_ok();
                self.show(out, json, result, |u, _| format!("Welcome, {}", view::session_user(u)))?;
                if signed_in {
                    if self.runtime.block_on(db.is_demo()) {
                        self.panel = Some(Panel::Dashboard);
                        if !json {
                            writeln!(out, "Demo mode: data panels need a database.")?;
                        }
                    } else {
                        self.open_panel(Panel::Dashboard, json, out)?;
                    }
                }
            }
            ShellCommand::Logout => self.logout(out)?,
            ShellCommand::Whoami => match auth::current_user(session) {
                Some(user) => self.show(out, json, Ok(user), |u, _| view::session_user(u))?,
                None => writeln!(out, "Not signed in.")?,
            },
            ShellCommand::Go { panel } => self.open_panel(panel, json, out)?,
            ShellCommand::Dashboard => self.open_panel(Panel::Dashboard, json, out)?,
            ShellCommand::Items(command) => self.items(command, json, out)?,
            ShellCommand::Move(args) => {
                let request = MovementRequest {
                    item_id: args.item,
                    movement_type: args.kind,
                    quantity: args.quantity,
                    reference: args.reference,
                    reason: args.reason,
                    notes: args.notes,
                };
                let result = self
                    .runtime
                    .block_on(inventory::record_movement(db, session, request));
                self.show(out, json, result, |r, _| {
                    format!(
                        "Recorded movement #{}. {} now has {} {}.",
                        r.movement_id, r.item.name, r.item.quantity, r.item.unit
                    )
                })?;
            }
            ShellCommand::Movements { item, limit } => {
                let limit = limit.unwrap_or(config.recent_movement_limit);
                let result = self
                    .runtime
                    .block_on(inventory::recent_movements(db, session, item, limit));
                self.show(out, json, result, |m, _| view::movements(m))?;
            }
            ShellCommand::Categories(CategoriesCommand::List) => {
                let result = self.runtime.block_on(catalog::list_categories(db, session));
                self.show(out, json, result, |c, _| view::categories(c))?;
            }
            ShellCommand::Categories(CategoriesCommand::Add { name, description }) => {
                let result = self.runtime.block_on(catalog::create_category(
                    db,
                    session,
                    NewCategory { name, description },
                ));
                self.show(out, json, result, |c, _| {
                    format!("Created category #{} {}.", c.id, c.name)
                })?;
            }
            ShellCommand::Suppliers(SuppliersCommand::List) => {
                let result = self.runtime.block_on(catalog::list_suppliers(db, session));
                self.show(out, json, result, |s, _| view::suppliers(s))?;
            }
            ShellCommand::Suppliers(SuppliersCommand::Add {
                name,
                contact,
                phone,
                email,
                address,
                city,
                postal_code,
                country,
                notes,
            }) => {
                let supplier = NewSupplier {
                    name,
                    contact_person: contact,
                    phone,
                    email,
                    address,
                    city,
                    postal_code,
                    country,
                    notes,
                };
                let result = self
                    .runtime
                    .block_on(catalog::create_supplier(db, session, supplier));
                self.show(out, json, result, |s, _| {
                    format!("Created supplier #{} {}.", s.id, s.name)
                })?;
            }
            ShellCommand::Report { kind } => match kind {
                ReportKind::LowStock => {
                    let result = self.runtime.block_on(reports::low_stock_report(db, session));
                    self.show(out, json, result, |items, c| view::items(items, c))?;
                }
                ReportKind::Reorder => {
                    let result = self.runtime.block_on(reports::reorder_report(db, session));
                    self.show(out, json, result, |items, c| view::items(items, c))?;
                }
                ReportKind::Valuation => {
                    let result = self.runtime.block_on(reports::valuation_report(db, session));
                    self.show(out, json, result, view::valuation)?;
                }
            },
            ShellCommand::Status => {
                let status = self.runtime.block_on(settings::connection_status(db, config));
                self.show(out, json, Ok(status), |s, _| view::connection(s))?;
            }
            ShellCommand::Reconnect => {
                let result = self
                    .runtime
                    .block_on(settings::reconnect(db, session, config));
                self.show(out, json, result, |s, _| view::connection(s))?;
                if !self.state.session.is_signed_in() {
                    self.panel = None;
                }
            }
            ShellCommand::Users(UsersCommand::List) => {
                let result = self.runtime.block_on(settings::list_users(db, session));
                self.show(out, json, result, |u, _| view::users(u))?;
            }
            ShellCommand::Users(UsersCommand::Add {
                username,
                password,
                full_name,
                role,
                email,
                phone,
            }) => {
                let user = NewUser {
                    username,
                    password,
                    full_name,
                    email,
                    phone,
                    role,
                };
                let result = self.runtime.block_on(settings::create_user(db, session, user));
                self.show(out, json, result, |u, _| {
                    format!("Created user #{} {} ({}).", u.id, u.username, u.role)
                })?;
            }
            ShellCommand::Help => {
                writeln!(out, "{}", ShellLine::command().render_help().to_string().trim_end())?;
                writeln!(out)?;
                writeln!(
                    out,
                    "Keys: f1 Dashboard, f2 Inventory, f3 Reports, f4 Settings, esc logout (exit at login), enter refresh"
                )?;
            }
            ShellCommand::Quit => {
                writeln!(out, "Bye.")?;
                return Ok(Flow::Quit);
            }
        }

        Ok(Flow::Continue)
    }

    fn items<W: Write>(&mut self, command: ItemsCommand, json: bool, out: &mut W) -> io::Result<()> {
        let (db, session) = (&self.state.db, &self.state.session);

        match command {
            ItemsCommand::List => {
                let filter = InventoryFilter {
                    status: Some(ItemStatus::Active),
                    ..Default::default()
                };
                let result = self
                    .runtime
                    .block_on(inventory::search_items(db, session, &filter, false));
                self.show(out, json, result, |items, c| view::items(items, c))
            }
            ItemsCommand::Search(args) => {
                let paged = args.paged();
                let filter = args.into_filter();
                let result = self
                    .runtime
                    .block_on(inventory::search_items(db, session, &filter, paged));
                self.show(out, json, result, |items, c| view::items(items, c))
            }
            ItemsCommand::Show { id } => {
                let result = self.runtime.block_on(inventory::get_item(db, session, id));
                self.show(out, json, result, |item, c| match item {
                    Some(item) => view::item_detail(item, c),
                    None => format!("No item with id {}.", id),
                })
            }
            ItemsCommand::Add(fields) => {
                let result = self
                    .runtime
                    .block_on(inventory::create_item(db, session, fields.into_input()));
                self.show(out, json, result, |item, c| {
                    format!("Created item #{}.\n{}", item.id, view::item_detail(item, c))
                })
            }
            ItemsCommand::Edit { id, fields } => {
                let result = self.runtime.block_on(inventory::update_item(
                    db,
                    session,
                    id,
                    fields.into_changes(),
                ));
                self.show(out, json, result, |item, c| match item {
                    Some(item) => format!("Updated item #{}.\n{}", item.id, view::item_detail(item, c)),
                    None => format!("No item with id {}.", id),
                })
            }
            ItemsCommand::Delete { id } => {
                let result = self.runtime.block_on(inventory::delete_item(db, session, id));
                self.show(out, json, result, |deleted, _| {
                    if *deleted {
                        format!("Item #{} marked inactive.", id)
                    } else {
                        format!("No item with id {}.", id)
                    }
                })
            }
        }
    }

    /// Prints a command result as text or JSON.
    fn show<T, W, F>(
        &self,
        out: &mut W,
        json: bool,
        result: Result<T, ApiError>,
        render: F,
    ) -> io::Result<()>
    where
        T: Serialize,
        W: Write,
        F: FnOnce(&T, &ConfigState) -> String,
    {
        match result {
            Ok(value) if json => writeln!(out, "{}", serde_json::to_string_pretty(&value)?),
            Ok(value) => writeln!(out, "{}", render(&value, &self.state.config)),
            Err(err) => self.fail(out, json, &err),
        }
    }

    fn fail<W: Write>(&self, out: &mut W, json: bool, err: &ApiError) -> io::Result<()> {
        if json {
            writeln!(out, "{}", serde_json::to_string_pretty(err)?)
        } else {
            writeln!(out, "error: {}", err.message)
        }
    }
}
