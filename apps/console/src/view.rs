//! Plain-text rendering of command results.

use crate::commands::auth::SessionUserDto;
use crate::commands::catalog::{CategoryDto, SupplierDto};
use crate::commands::dashboard::DashboardDto;
use crate::commands::inventory::{ItemDto, MovementDto};
use crate::commands::reports::ValuationReportDto;
use crate::commands::settings::{ConnectionStatusDto, UserDto};
use crate::navigation::Panel;
use crate::state::ConfigState;
use stockroom_core::{ItemStatus, RECENT_MOVEMENT_DAYS};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Pads or cuts `text` to exactly `width` characters.
fn cell(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{:<width$}", text, width = width)
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}

pub fn banner(store_name: &str, status: &str) -> String {
    [
        format!("{} inventory", store_name),
        status.to_string(),
        "Type 'login <username> <password>' to begin, 'help' for commands.".to_string(),
    ]
    .join("\n")
}

pub fn panel_header(panel: Panel) -> String {
    format!("== {} [{}] ==", panel.title(), panel.key())
}

pub fn session_user(user: &SessionUserDto) -> String {
    let mut line = format!("{} ({}) - {}", user.full_name, user.username, user.role);
    if user.demo {
        line.push_str(" [demo]");
    }
    line
}

pub fn dashboard(stats: &DashboardDto, config: &ConfigState) -> String {
    [
        format!(
            "Items {:<8} Low stock {:<8} Out of stock {}",
            stats.total_items, stats.low_stock_items, stats.out_of_stock_items
        ),
        format!(
            "Categories {:<3} Suppliers {:<8} Users {}",
            stats.total_categories, stats.total_suppliers, stats.active_users
        ),
        format!(
            "Inventory value {}",
            config.format_currency(stats.total_inventory_value_cents)
        ),
        format!(
            "Movements ({} days) {}",
            RECENT_MOVEMENT_DAYS, stats.recent_movements
        ),
        format!("As of {}", stats.last_updated.format(TIME_FORMAT)),
    ]
    .join("\n")
}

pub fn items(items: &[ItemDto], config: &ConfigState) -> String {
    if items.is_empty() {
        return "No items found.".to_string();
    }

    let mut lines = vec![format!(
        "{:>5}  {}  {}  {:>6}  {:>5}  {:>10}  {}  {}",
        "ID",
        cell("SKU", 12),
        cell("NAME", 24),
        "QTY",
        "MIN",
        "PRICE",
        cell("CATEGORY", 14),
        "FLAGS"
    )];

    for item in items {
        let mut flags = Vec::new();
        if item.quantity == 0 {
            flags.push("OUT");
        } else if item.is_low_stock {
            flags.push("LOW");
        } else if item.needs_reorder {
            flags.push("REORDER");
        }
        if item.status != ItemStatus::Active {
            flags.push(item.status.as_db_str());
        }

        lines.push(format!(
            "{:>5}  {}  {}  {:>6}  {:>5}  {:>10}  {}  {}",
            item.id,
            cell(or_dash(Some(&item.sku)), 12),
            cell(&item.name, 24),
            item.quantity,
            item.minimum_stock,
            config.format_currency(item.selling_price_cents),
            cell(or_dash(item.category_name.as_deref()), 14),
            flags.join(",")
        ));
    }
    lines.push(format!("{} item(s)", items.len()));
    lines.join("\n")
}

pub fn item_detail(item: &ItemDto, config: &ConfigState) -> String {
    let timestamp = |t: Option<chrono::DateTime<chrono::Utc>>| {
        t.map(|t| t.format(TIME_FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    [
        format!("#{} {} ({})", item.id, item.name, item.status.as_db_str()),
        format!("SKU          {}", or_dash(Some(&item.sku))),
        format!("Barcode      {}", or_dash(Some(&item.barcode))),
        format!("Category     {}", or_dash(item.category_name.as_deref())),
        format!("Supplier     {}", or_dash(item.supplier_name.as_deref())),
        format!(
            "Quantity     {} {} (minimum {}, reorder at {})",
            item.quantity, item.unit, item.minimum_stock, item.reorder_level
        ),
        format!(
            "Cost / Sell  {} / {}",
            config.format_currency(item.cost_price_cents),
            config.format_currency(item.selling_price_cents)
        ),
        format!(
            "Margin       {} ({:.1}%)",
            config.format_currency(item.profit_margin_cents),
            item.profit_percentage
        ),
        format!(
            "Stock value  {}",
            config.format_currency(item.total_value_cents)
        ),
        format!("Location     {}", or_dash(Some(&item.location))),
        format!("Description  {}", or_dash(Some(&item.description))),
        format!("Notes        {}", or_dash(Some(&item.notes))),
        format!(
            "Created {}  Updated {}  Restocked {}",
            item.created_at.format(TIME_FORMAT),
            timestamp(item.last_updated),
            timestamp(item.last_restocked)
        ),
    ]
    .join("\n")
}

pub fn movements(movements: &[MovementDto]) -> String {
    if movements.is_empty() {
        return "No movements recorded.".to_string();
    }

    let mut lines = vec![format!(
        "{}  {}  {}  {:>6}  {}  {}",
        cell("DATE", 16),
        cell("ITEM", 20),
        cell("TYPE", 10),
        "QTY",
        cell("REFERENCE", 12),
        "BY"
    )];
    for m in movements {
        lines.push(format!(
            "{}  {}  {}  {:>6}  {}  {}",
            m.movement_date.format(TIME_FORMAT),
            cell(or_dash(m.item_name.as_deref()), 20),
            cell(&m.movement_type.to_string(), 10),
            m.quantity,
            cell(or_dash(Some(&m.reference)), 12),
            or_dash(m.user_name.as_deref())
        ));
    }
    lines.join("\n")
}

pub fn categories(categories: &[CategoryDto]) -> String {
    if categories.is_empty() {
        return "No categories.".to_string();
    }
    let mut lines = vec![format!("{:>5}  {}  {:>6}", "ID", cell("NAME", 24), "ITEMS")];
    for c in categories {
        lines.push(format!("{:>5}  {}  {:>6}", c.id, cell(&c.name, 24), c.item_count));
    }
    lines.join("\n")
}

pub fn suppliers(suppliers: &[SupplierDto]) -> String {
    if suppliers.is_empty() {
        return "No suppliers.".to_string();
    }
    let mut lines = vec![format!(
        "{:>5}  {}  {}  {}  {:>6}",
        "ID",
        cell("NAME", 22),
        cell("CONTACT", 18),
        cell("EMAIL", 26),
        "ITEMS"
    )];
    for s in suppliers {
        lines.push(format!(
            "{:>5}  {}  {}  {}  {:>6}",
            s.id,
            cell(&s.name, 22),
            cell(or_dash(Some(&s.contact_person)), 18),
            cell(or_dash(Some(&s.email)), 26),
            s.item_count
        ));
    }
    lines.join("\n")
}

pub fn valuation(report: &ValuationReportDto, config: &ConfigState) -> String {
    let mut lines = vec![format!(
        "{}  {:>6}  {:>8}  {:>12}",
        cell("CATEGORY", 24),
        "ITEMS",
        "QTY",
        "VALUE"
    )];
    for row in &report.rows {
        lines.push(format!(
            "{}  {:>6}  {:>8}  {:>12}",
            cell(row.category_name.as_deref().unwrap_or("(uncategorised)"), 24),
            row.item_count,
            row.total_quantity,
            config.format_currency(row.total_value_cents)
        ));
    }
    lines.push(format!(
        "{}  {:>30}",
        cell("TOTAL", 24),
        config.format_currency(report.total_value_cents)
    ));
    lines.join("\n")
}

pub fn users(users: &[UserDto]) -> String {
    let mut lines = vec![format!(
        "{:>5}  {}  {}  {}  {}",
        "ID",
        cell("USERNAME", 16),
        cell("NAME", 22),
        cell("ROLE", 8),
        "LAST LOGIN"
    )];
    for u in users {
        let mut last_login = u
            .last_login
            .map(|t| t.format(TIME_FORMAT).to_string())
            .unwrap_or_else(|| "never".to_string());
        if !u.active {
            last_login.push_str(" (inactive)");
        }
        lines.push(format!(
            "{:>5}  {}  {}  {}  {}",
            u.id,
            cell(&u.username, 16),
            cell(&u.full_name, 22),
            cell(&u.role, 8),
            last_login
        ));
    }
    lines.join("\n")
}

pub fn connection(status: &ConnectionStatusDto) -> String {
    [
        format!("Store      {}", status.store_name),
        format!("Database   {}", status.database_path),
        format!("Status     {}", status.message),
        format!(
            "Demo login {}",
            if status.allow_demo_mode { "allowed" } else { "disabled" }
        ),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_pads_and_cuts() {
        assert_eq!(cell("Pen", 5), "Pen  ");
        assert_eq!(cell("Stapler", 5), "Stap…");
        assert_eq!(cell("Stapl", 5), "Stapl");
    }

    #[test]
    fn test_empty_listings() {
        let config = ConfigState::default();
        assert_eq!(items(&[], &config), "No items found.");
        assert_eq!(movements(&[]), "No movements recorded.");
    }

    #[test]
    fn test_valuation_total_line() {
        let report = ValuationReportDto {
            rows: vec![],
            total_value_cents: 123_456,
        };
        let text = valuation(&report, &ConfigState::default());
        assert!(text.lines().last().unwrap().ends_with("$1234.56"));
    }
}
