use chrono::Utc;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use inven::api::{
    short_id, CmdMessage, ConfigAction, HolderRef, InvenApi, ItemFilter, MessageLevel,
};
use inven::config::InvenConfig;
use inven::error::{InvenError, Result};
use inven::inventory::Inventory;
use inven::model::{
    Binder, Carton, CartonPatch, Container, ContainerPatch, Item, ItemPatch, Location, Rack,
    RackPatch, Shelf, ShelfPatch,
};
use inven::store::fs::FileStore;
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands, ContainerCommands, HolderCommands, ItemCommands, RackCommands, ShelfCommands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: InvenApi<FileStore>,
}

/// Which of the two structurally identical sub-container collections a
/// `carton`/`binder` subcommand should hit.
#[derive(Clone, Copy)]
enum HolderKind {
    Carton,
    Binder,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Item { command }) => handle_item(&mut ctx, command),
        Some(Commands::Rack { command }) => handle_rack(&mut ctx, command),
        Some(Commands::Shelf { command }) => handle_shelf(&mut ctx, command),
        Some(Commands::Carton { command }) => handle_holder(&mut ctx, HolderKind::Carton, command),
        Some(Commands::Binder { command }) => handle_holder(&mut ctx, HolderKind::Binder, command),
        Some(Commands::Container { command }) => handle_container(&mut ctx, command),
        Some(Commands::Search { term }) => handle_search(&ctx, term),
        Some(Commands::Locations) => handle_locations(&ctx),
        Some(Commands::Export) => handle_export(&ctx),
        Some(Commands::Doctor) => handle_doctor(&ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => {
            print_items(&ctx, &ctx.api.list_items(None, &ItemFilter::default()));
            Ok(())
        }
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => match std::env::var_os("INVEN_HOME") {
            Some(dir) => PathBuf::from(dir),
            None => ProjectDirs::from("com", "inven", "inven")
                .ok_or_else(|| InvenError::Store("Could not determine data directory".to_string()))?
                .data_dir()
                .to_path_buf(),
        },
    };

    let config = InvenConfig::load(&data_dir).unwrap_or_default();
    let store = FileStore::new(data_dir.clone()).with_data_file(&config.data_file);
    let inventory = Inventory::load(store)?;
    let mut api = InvenApi::new(inventory, config, data_dir);

    if cli.verbose {
        api.subscribe(|snapshot| {
            eprintln!(
                "{}",
                format!(
                    "saved: {} items, {} racks, {} shelves",
                    snapshot.items.len(),
                    snapshot.racks.len(),
                    snapshot.shelves.len()
                )
                .dimmed()
            );
        });
    }

    Ok(AppContext { api })
}

// --- Items ---

fn handle_item(ctx: &mut AppContext, command: ItemCommands) -> Result<()> {
    match command {
        ItemCommands::Add {
            name,
            description,
            tags,
            images,
            shelf,
            carton,
            binder,
            container,
        } => {
            let holder = holder_ref(carton, binder, container);
            let result = ctx.api.add_item(
                name,
                description,
                parse_tags(tags.as_deref()),
                images,
                &shelf,
                holder,
            )?;
            print_messages(&result.messages);
        }
        ItemCommands::List {
            search,
            rack,
            shelf,
            carton,
            binder,
            container,
        } => {
            let filter = match build_filter(ctx, rack, shelf, carton, binder, container) {
                Ok(filter) => filter,
                Err(message) => {
                    print_messages(&[message]);
                    return Ok(());
                }
            };
            // Whitespace-only terms mean "no filter".
            let term = search.as_deref().map(str::trim).filter(|t| !t.is_empty());
            print_items(ctx, &ctx.api.list_items(term, &filter));
        }
        ItemCommands::Show { ident } => match ctx.api.resolve_item(&ident) {
            Ok(id) => {
                if let Some(item) = ctx.api.inventory().item(id) {
                    print_full_item(ctx, item);
                }
            }
            Err(message) => print_messages(&[message]),
        },
        ItemCommands::Edit {
            ident,
            name,
            description,
            tags,
            images,
            shelf,
            carton,
            binder,
            container,
        } => {
            let patch = ItemPatch {
                name,
                description,
                tags: tags.as_deref().map(parse_tags_str),
                images: if images.is_empty() { None } else { Some(images) },
                location: None,
            };
            let move_to = shelf.map(|s| (s, holder_ref(carton, binder, container)));
            let result = ctx.api.update_item(&ident, patch, move_to)?;
            print_messages(&result.messages);
        }
        ItemCommands::Delete { idents } => {
            for ident in idents {
                let result = ctx.api.delete_item(&ident)?;
                print_messages(&result.messages);
            }
        }
    }
    Ok(())
}

fn holder_ref(
    carton: Option<String>,
    binder: Option<String>,
    container: Option<String>,
) -> Option<HolderRef> {
    // clap's conflict rules guarantee at most one is present
    carton
        .map(HolderRef::Carton)
        .or(binder.map(HolderRef::Binder))
        .or(container.map(HolderRef::Container))
}

fn build_filter(
    ctx: &AppContext,
    rack: Option<String>,
    shelf: Option<String>,
    carton: Option<String>,
    binder: Option<String>,
    container: Option<String>,
) -> std::result::Result<ItemFilter, CmdMessage> {
    let mut filter = ItemFilter::default();
    if let Some(ident) = rack {
        filter.rack_id = Some(ctx.api.resolve_rack(&ident)?);
    }
    if let Some(ident) = shelf {
        filter.shelf_id = Some(ctx.api.resolve_shelf(&ident)?);
    }
    if let Some(ident) = carton {
        filter.carton_id = Some(ctx.api.resolve_carton(&ident)?);
    }
    if let Some(ident) = binder {
        filter.binder_id = Some(ctx.api.resolve_binder(&ident)?);
    }
    if let Some(ident) = container {
        filter.container_id = Some(ctx.api.resolve_container(&ident)?);
    }
    Ok(filter)
}

fn handle_search(ctx: &AppContext, term: Vec<String>) -> Result<()> {
    let term = term.join(" ");
    let term = term.trim();
    let term = if term.is_empty() { None } else { Some(term) };
    print_items(ctx, &ctx.api.list_items(term, &ItemFilter::default()));
    Ok(())
}

// --- Racks ---

fn handle_rack(ctx: &mut AppContext, command: RackCommands) -> Result<()> {
    match command {
        RackCommands::Add {
            number,
            name,
            description,
        } => {
            let result = ctx.api.add_rack(number, name, description)?;
            print_messages(&result.messages);
        }
        RackCommands::List => print_racks(ctx.api.inventory().racks()),
        RackCommands::Edit {
            ident,
            number,
            name,
            description,
        } => {
            let patch = RackPatch {
                number,
                name,
                description,
            };
            let result = ctx.api.update_rack(&ident, patch)?;
            print_messages(&result.messages);
        }
        RackCommands::Delete { idents } => {
            for ident in idents {
                let result = ctx.api.delete_rack(&ident)?;
                print_messages(&result.messages);
            }
        }
    }
    Ok(())
}

// --- Shelves ---

fn handle_shelf(ctx: &mut AppContext, command: ShelfCommands) -> Result<()> {
    match command {
        ShelfCommands::Add {
            rack,
            number,
            description,
        } => {
            let result = ctx.api.add_shelf(&rack, number, description)?;
            print_messages(&result.messages);
        }
        ShelfCommands::List { rack } => {
            let rack_id = match rack {
                Some(ident) => match ctx.api.resolve_rack(&ident) {
                    Ok(id) => Some(id),
                    Err(message) => {
                        print_messages(&[message]);
                        return Ok(());
                    }
                },
                None => None,
            };
            let shelves: Vec<&Shelf> = ctx
                .api
                .inventory()
                .shelves()
                .iter()
                .filter(|s| rack_id.map(|id| s.rack_id == id).unwrap_or(true))
                .collect();
            print_shelves(ctx, &shelves);
        }
        ShelfCommands::Edit {
            ident,
            rack,
            number,
            description,
        } => {
            let rack_id = match rack {
                Some(rack_ident) => match ctx.api.resolve_rack(&rack_ident) {
                    Ok(id) => Some(id),
                    Err(message) => {
                        print_messages(&[message]);
                        return Ok(());
                    }
                },
                None => None,
            };
            let patch = ShelfPatch {
                rack_id,
                number,
                description,
            };
            let result = ctx.api.update_shelf(&ident, patch)?;
            print_messages(&result.messages);
        }
        ShelfCommands::Delete { idents } => {
            for ident in idents {
                let result = ctx.api.delete_shelf(&ident)?;
                print_messages(&result.messages);
            }
        }
    }
    Ok(())
}

// --- Cartons and binders ---

fn handle_holder(ctx: &mut AppContext, kind: HolderKind, command: HolderCommands) -> Result<()> {
    match command {
        HolderCommands::Add {
            shelf,
            number,
            name,
            description,
            color,
        } => {
            let result = match kind {
                HolderKind::Carton => ctx.api.add_carton(&shelf, number, name, description, color),
                HolderKind::Binder => ctx.api.add_binder(&shelf, number, name, description, color),
            }?;
            print_messages(&result.messages);
        }
        HolderCommands::List { shelf } => {
            let shelf_id = match shelf {
                Some(ident) => match ctx.api.resolve_shelf(&ident) {
                    Ok(id) => Some(id),
                    Err(message) => {
                        print_messages(&[message]);
                        return Ok(());
                    }
                },
                None => None,
            };
            match kind {
                HolderKind::Carton => {
                    let cartons: Vec<&Carton> = ctx
                        .api
                        .inventory()
                        .cartons()
                        .iter()
                        .filter(|c| shelf_id.map(|id| c.shelf_id == id).unwrap_or(true))
                        .collect();
                    print_cartons(ctx, &cartons);
                }
                HolderKind::Binder => {
                    let binders: Vec<&Binder> = ctx
                        .api
                        .inventory()
                        .binders()
                        .iter()
                        .filter(|b| shelf_id.map(|id| b.shelf_id == id).unwrap_or(true))
                        .collect();
                    print_binders(ctx, &binders);
                }
            }
        }
        HolderCommands::Edit {
            ident,
            shelf,
            number,
            name,
            description,
            color,
        } => {
            let shelf_id = match shelf {
                Some(shelf_ident) => match ctx.api.resolve_shelf(&shelf_ident) {
                    Ok(id) => Some(id),
                    Err(message) => {
                        print_messages(&[message]);
                        return Ok(());
                    }
                },
                None => None,
            };
            let patch = CartonPatch {
                shelf_id,
                number,
                name,
                description,
                color,
            };
            let result = match kind {
                HolderKind::Carton => ctx.api.update_carton(&ident, patch),
                HolderKind::Binder => ctx.api.update_binder(&ident, patch),
            }?;
            print_messages(&result.messages);
        }
        HolderCommands::Delete { idents } => {
            for ident in idents {
                let result = match kind {
                    HolderKind::Carton => ctx.api.delete_carton(&ident),
                    HolderKind::Binder => ctx.api.delete_binder(&ident),
                }?;
                print_messages(&result.messages);
            }
        }
    }
    Ok(())
}

// --- Containers ---

fn handle_container(ctx: &mut AppContext, command: ContainerCommands) -> Result<()> {
    match command {
        ContainerCommands::Add {
            shelf,
            number,
            name,
            kind,
            description,
            color,
        } => {
            let result = ctx
                .api
                .add_container(&shelf, number, name, kind, description, color)?;
            print_messages(&result.messages);
        }
        ContainerCommands::List { shelf } => {
            let shelf_id = match shelf {
                Some(ident) => match ctx.api.resolve_shelf(&ident) {
                    Ok(id) => Some(id),
                    Err(message) => {
                        print_messages(&[message]);
                        return Ok(());
                    }
                },
                None => None,
            };
            let containers: Vec<&Container> = ctx
                .api
                .inventory()
                .containers()
                .iter()
                .filter(|c| shelf_id.map(|id| c.shelf_id == id).unwrap_or(true))
                .collect();
            print_containers(ctx, &containers);
        }
        ContainerCommands::Edit {
            ident,
            shelf,
            number,
            name,
            kind,
            description,
            color,
        } => {
            let shelf_id = match shelf {
                Some(shelf_ident) => match ctx.api.resolve_shelf(&shelf_ident) {
                    Ok(id) => Some(id),
                    Err(message) => {
                        print_messages(&[message]);
                        return Ok(());
                    }
                },
                None => None,
            };
            let patch = ContainerPatch {
                shelf_id,
                number,
                name,
                kind,
                description,
                color,
            };
            let result = ctx.api.update_container(&ident, patch)?;
            print_messages(&result.messages);
        }
        ContainerCommands::Delete { idents } => {
            for ident in idents {
                let result = ctx.api.delete_container(&ident)?;
                print_messages(&result.messages);
            }
        }
    }
    Ok(())
}

// --- Locations tree ---

fn handle_locations(ctx: &AppContext) -> Result<()> {
    let inventory = ctx.api.inventory();
    if inventory.racks().is_empty() {
        println!("No racks yet.");
        return Ok(());
    }

    let mut racks: Vec<&Rack> = inventory.racks().iter().collect();
    racks.sort_by_key(|r| r.number);

    for rack in racks {
        println!(
            "{} {} {}",
            format!("Rack {}:", rack.number).bold(),
            rack.name,
            format!("({})", short_id(rack.id)).dimmed()
        );

        let mut shelves: Vec<&Shelf> = inventory
            .shelves()
            .iter()
            .filter(|s| s.rack_id == rack.id)
            .collect();
        shelves.sort_by_key(|s| s.number);

        for shelf in shelves {
            let direct = inventory
                .items_by_location(&Location::shelf(shelf.id))
                .count();
            println!(
                "  Shelf {} {} {}",
                shelf.number,
                format!("({})", short_id(shelf.id)).dimmed(),
                occupancy(direct)
            );

            for carton in inventory.cartons().iter().filter(|c| c.shelf_id == shelf.id) {
                let count = inventory
                    .items_by_location(&Location::in_carton(shelf.id, carton.id))
                    .count();
                println!(
                    "    Carton {}: {} {} {}",
                    carton.number,
                    carton.name,
                    format!("({})", short_id(carton.id)).dimmed(),
                    occupancy(count)
                );
            }
            for binder in inventory.binders().iter().filter(|b| b.shelf_id == shelf.id) {
                let count = inventory
                    .items_by_location(&Location::in_binder(shelf.id, binder.id))
                    .count();
                println!(
                    "    Binder {}: {} {} {}",
                    binder.number,
                    binder.name,
                    format!("({})", short_id(binder.id)).dimmed(),
                    occupancy(count)
                );
            }
            for container in inventory
                .containers()
                .iter()
                .filter(|c| c.shelf_id == shelf.id)
            {
                let count = inventory
                    .items_by_location(&Location::in_container(shelf.id, container.id))
                    .count();
                println!(
                    "    Container {}: {} [{}] {} {}",
                    container.number,
                    container.name,
                    container.kind,
                    format!("({})", short_id(container.id)).dimmed(),
                    occupancy(count)
                );
            }
        }
    }
    Ok(())
}

fn occupancy(count: usize) -> ColoredString {
    match count {
        0 => "empty".dimmed(),
        1 => "1 item".normal(),
        n => format!("{} items", n).normal(),
    }
}

// --- Workflow commands ---

fn handle_export(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.export()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_doctor(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.doctor();
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key.as_deref(), value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key.to_string()),
        (Some(key), Some(value)) => ConfigAction::Set {
            key: key.to_string(),
            value,
        },
    };

    let result = ctx.api.config(action)?;
    if let Some(config) = &result.config {
        match key.as_deref() {
            Some("data-file") => println!("data-file = {}", config.data_file),
            Some("backup-prefix") => println!("backup-prefix = {}", config.backup_prefix),
            _ => {
                println!("data-file = {}", config.data_file);
                println!("backup-prefix = {}", config.backup_prefix);
            }
        }
    }
    print_messages(&result.messages);
    Ok(())
}

// --- Printing ---

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;

fn print_items(ctx: &AppContext, items: &[&Item]) {
    if items.is_empty() {
        println!("No items found.");
        return;
    }

    for item in items {
        let id_str = format!("{}  ", short_id(item.id));
        let location = ctx.api.inventory().shelf_location(item.location.shelf_id);

        let mut line = item.name.clone();
        if let Some(holder) = holder_label(ctx, &item.location) {
            line.push_str(&format!(" · {}", holder));
        }
        if !location.is_empty() {
            line.push_str(&format!(" · {}", location));
        }
        if !item.tags.is_empty() {
            line.push_str(&format!("  #{}", item.tags.join(" #")));
        }

        let time_ago = format_time_ago(item.updated_at);
        let fixed_width = id_str.width() + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let display = truncate_to_width(&line, available);
        let padding = available.saturating_sub(display.width());

        println!(
            "{}{}{}{}",
            id_str.dimmed(),
            display,
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

fn print_full_item(ctx: &AppContext, item: &Item) {
    println!("{} {}", short_id(item.id).yellow(), item.name.bold());
    println!("--------------------------------");
    if !item.description.is_empty() {
        println!("{}", item.description);
    }
    let location = ctx.api.inventory().shelf_location(item.location.shelf_id);
    match holder_label(ctx, &item.location) {
        Some(holder) => println!("Location: {} · {}", location, holder),
        None => println!("Location: {}", location),
    }
    if !item.tags.is_empty() {
        println!("Tags: {}", item.tags.join(", "));
    }
    for image in &item.images {
        println!("Image: {}", image);
    }
    println!(
        "{}",
        format!(
            "Created {} · updated {}",
            item.created_at.format("%Y-%m-%d %H:%M"),
            format_time_ago(item.updated_at).trim()
        )
        .dimmed()
    );
    println!("Id: {}", item.id);
}

/// Display name of the sub-container an item sits in, if any survives.
fn holder_label(ctx: &AppContext, location: &Location) -> Option<String> {
    let inventory = ctx.api.inventory();
    if let Some(id) = location.carton_id {
        return inventory
            .cartons()
            .iter()
            .find(|c| c.id == id)
            .map(|c| format!("Carton {}", c.name));
    }
    if let Some(id) = location.binder_id {
        return inventory
            .binders()
            .iter()
            .find(|b| b.id == id)
            .map(|b| format!("Binder {}", b.name));
    }
    if let Some(id) = location.container_id {
        return inventory
            .containers()
            .iter()
            .find(|c| c.id == id)
            .map(|c| format!("{} {}", c.kind, c.name));
    }
    None
}

fn print_racks(racks: &[Rack]) {
    if racks.is_empty() {
        println!("No racks found.");
        return;
    }
    for rack in racks {
        let description = rack.description.as_deref().unwrap_or("");
        println!(
            "{}  Rack {:>3}  {}  {}",
            short_id(rack.id).dimmed(),
            rack.number,
            rack.name.bold(),
            description.dimmed()
        );
    }
}

fn print_shelves(ctx: &AppContext, shelves: &[&Shelf]) {
    if shelves.is_empty() {
        println!("No shelves found.");
        return;
    }
    for shelf in shelves {
        let path = ctx.api.inventory().shelf_location(shelf.id);
        let description = shelf.description.as_deref().unwrap_or("");
        println!(
            "{}  {}  {}",
            short_id(shelf.id).dimmed(),
            path,
            description.dimmed()
        );
    }
}

fn print_cartons(ctx: &AppContext, cartons: &[&Carton]) {
    if cartons.is_empty() {
        println!("No cartons found.");
        return;
    }
    for carton in cartons {
        print_holder_line(
            ctx,
            carton.id,
            carton.shelf_id,
            carton.number,
            &carton.name,
            carton.color.as_deref(),
            None,
        );
    }
}

fn print_binders(ctx: &AppContext, binders: &[&Binder]) {
    if binders.is_empty() {
        println!("No binders found.");
        return;
    }
    for binder in binders {
        print_holder_line(
            ctx,
            binder.id,
            binder.shelf_id,
            binder.number,
            &binder.name,
            binder.color.as_deref(),
            None,
        );
    }
}

fn print_containers(ctx: &AppContext, containers: &[&Container]) {
    if containers.is_empty() {
        println!("No containers found.");
        return;
    }
    for container in containers {
        print_holder_line(
            ctx,
            container.id,
            container.shelf_id,
            container.number,
            &container.name,
            container.color.as_deref(),
            Some(&container.kind),
        );
    }
}

fn print_holder_line(
    ctx: &AppContext,
    id: uuid::Uuid,
    shelf_id: uuid::Uuid,
    number: u32,
    name: &str,
    color: Option<&str>,
    kind: Option<&str>,
) {
    let path = ctx.api.inventory().shelf_location(shelf_id);
    let mut label = format!("#{} {}", number, name);
    if let Some(kind) = kind {
        label.push_str(&format!(" [{}]", kind));
    }
    if let Some(color) = color {
        label.push_str(&format!(" ({})", color));
    }
    println!(
        "{}  {}  {}",
        short_id(id).dimmed(),
        label,
        path.dimmed()
    );
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: chrono::DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(timestamp);

    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

/// Split a comma-separated tag list, trimming and dropping duplicates
/// while preserving first-seen order.
fn parse_tags(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(raw) => parse_tags_str(raw),
        None => Vec::new(),
    }
}

fn parse_tags_str(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',') {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t.as_str() == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_trimmed_and_deduplicated_in_order() {
        assert_eq!(
            parse_tags_str("tools, garage ,tools, ,wood"),
            vec!["tools", "garage", "wood"]
        );
    }

    #[test]
    fn no_tags_is_empty() {
        assert!(parse_tags(None).is_empty());
        assert!(parse_tags(Some("  ,  ")).is_empty());
    }

    #[test]
    fn truncation_respects_width() {
        assert_eq!(truncate_to_width("short", 20), "short");
        let truncated = truncate_to_width("a very long line that will not fit", 10);
        assert!(truncated.ends_with('…'));
        assert!(truncated.width() <= 10);
    }
}
