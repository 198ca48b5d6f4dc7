use chrono::{Local, NaiveDate};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tabled::{settings::Style, Table, Tabled};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use evergreen_ledger::config::config_dir;
use evergreen_ledger::display::{add_summary_footer, format_amount, format_money, format_weight};
use evergreen_ledger::error::{LedgerError, Result};
use evergreen_ledger::model::{
    CollectionForm, Grade, NewSupplier, PaymentForm, PaymentStatus, SupplierPatch,
};
use evergreen_ledger::transfer::{settle_payment, Settlement};
use evergreen_ledger::view::{
    monthly_collection, PageNav, PageSize, PageWindow, PaymentSummary, Period, ProcurementSummary,
    SupplierSummary, ViewState,
};
use evergreen_ledger::weather::{fetch_forecast, HumidityReading};
use evergreen_ledger::workspace::Workspace;

#[derive(Parser)]
#[command(name = "evergreen")]
#[command(
    version,
    about = "Tea-leaf supply ledger: suppliers, procurement and payroll",
    long_about = None
)]
struct Cli {
    /// Path to ledger directory (default: ~/.evergreen or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Search and paging controls shared by every list
#[derive(Args)]
struct ListArgs {
    /// Case-insensitive match on the supplier name
    #[arg(short, long, default_value = "")]
    search: String,

    /// Page to show (out-of-range pages are clamped)
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Rows per page: 5, 10 or 25 (default from config.toml)
    #[arg(long, value_parser = parse_page_size)]
    page_size: Option<PageSize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize ledger directory with a config template
    Init,

    /// Show ledger location, record counts and rates
    Status,

    /// Business overview with recent collections
    Dashboard {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Manage the supplier registry
    Suppliers {
        #[command(subcommand)]
        command: SupplierCommands,
    },

    /// Record and review leaf collections
    Procurement {
        #[command(subcommand)]
        command: ProcurementCommands,
    },

    /// Track supplier payments
    Payroll {
        #[command(subcommand)]
        command: PayrollCommands,
    },

    /// Show or change the rate paid per grade
    Rates {
        #[command(subcommand)]
        command: Option<RateCommands>,
    },

    /// Current weather; caches humidity for procurement intake
    Weather {
        #[arg(long, allow_negative_numbers = true)]
        latitude: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        longitude: Option<f64>,
    },
}

#[derive(Subcommand)]
enum SupplierCommands {
    /// List suppliers
    List {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Show every detail of one supplier
    Show { id: u32 },

    /// Register a new supplier
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        contact: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        bank: String,
        #[arg(long, default_value = "")]
        account_number: String,
        /// Defaults to the supplier name
        #[arg(long, default_value = "")]
        account_name: String,
    },

    /// Change supplier details (only the given fields)
    Edit {
        id: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        bank: Option<String>,
        #[arg(long)]
        account_number: Option<String>,
        #[arg(long)]
        account_name: Option<String>,
    },

    /// Remove a supplier
    Delete { id: u32 },
}

#[derive(Subcommand)]
enum ProcurementCommands {
    /// Record a leaf collection
    Record {
        #[arg(long)]
        supplier: String,

        /// Gross weight in kg
        #[arg(short, long)]
        weight: f64,

        #[arg(short, long, value_parser = parse_grade, default_value = "A")]
        grade: Grade,

        /// Moisture content in percent
        #[arg(short, long, conflicts_with = "use_humidity")]
        moisture: Option<f64>,

        /// Take moisture from the humidity cached by 'evergreen weather'
        #[arg(long)]
        use_humidity: bool,

        /// Collection date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List recorded collections
    List {
        #[command(flatten)]
        list: ListArgs,

        /// all, today, this-week or this-month
        #[arg(long, value_parser = parse_period, default_value = "all")]
        period: Period,
    },

    /// Preview net weight and value without recording
    Calc {
        #[arg(short, long)]
        weight: f64,

        #[arg(short, long, default_value_t = 0.0)]
        moisture: f64,

        #[arg(short, long, value_parser = parse_grade, default_value = "A")]
        grade: Grade,
    },
}

#[derive(Subcommand)]
enum PayrollCommands {
    /// List payments with paid / pending totals
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only paid or only pending payments
        #[arg(long, value_parser = parse_status)]
        status: Option<PaymentStatus>,

        /// all, today, this-week or this-month
        #[arg(long, value_parser = parse_period, default_value = "all")]
        period: Period,
    },

    /// Add a pending payment; amount is weight × grade rate
    Add {
        #[arg(long)]
        supplier: String,

        /// Weight in kg
        #[arg(short, long)]
        weight: f64,

        #[arg(short, long, value_parser = parse_grade)]
        grade: Grade,

        #[arg(long, default_value = "")]
        phone: String,

        /// Payment date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Transfer a pending payment and mark it paid
    MarkPaid {
        id: u32,

        /// Skip the simulated transfer delay
        #[arg(long)]
        no_delay: bool,
    },

    /// Send the payment SMS to the supplier
    Notify { id: u32 },
}

#[derive(Subcommand)]
enum RateCommands {
    /// Set the rate for one grade
    Set {
        #[arg(value_parser = parse_grade)]
        grade: Grade,
        rate: f64,
    },
}

fn parse_page_size(s: &str) -> std::result::Result<PageSize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    PageSize::try_from(n).map_err(|e| e.to_string())
}

fn parse_grade(s: &str) -> std::result::Result<Grade, String> {
    s.parse().map_err(|e: LedgerError| e.to_string())
}

fn parse_period(s: &str) -> std::result::Result<Period, String> {
    s.parse().map_err(|e: LedgerError| e.to_string())
}

fn parse_status(s: &str) -> std::result::Result<PaymentStatus, String> {
    s.parse().map_err(|e: LedgerError| e.to_string())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Determine ledger directory
    let dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&dir),
        command => {
            let mut ws = Workspace::open(&dir)?;
            dispatch(&mut ws, command)
        }
    }
}

fn dispatch(ws: &mut Workspace, command: Commands) -> Result<()> {
    match command {
        Commands::Init => cmd_init(ws.dir()),
        Commands::Status => cmd_status(ws),
        Commands::Dashboard { list } => cmd_dashboard(ws, &list),
        Commands::Suppliers { command } => match command {
            SupplierCommands::List { list } => cmd_suppliers(ws, &list),
            SupplierCommands::Show { id } => cmd_supplier_show(ws, id),
            SupplierCommands::Add {
                name,
                contact,
                address,
                bank,
                account_number,
                account_name,
            } => cmd_supplier_add(
                ws,
                NewSupplier {
                    name,
                    contact,
                    address,
                    bank,
                    bank_account_number: account_number,
                    bank_account_name: account_name,
                },
            ),
            SupplierCommands::Edit {
                id,
                name,
                contact,
                address,
                bank,
                account_number,
                account_name,
            } => cmd_supplier_edit(
                ws,
                id,
                SupplierPatch {
                    name,
                    contact,
                    address,
                    bank,
                    bank_account_number: account_number,
                    bank_account_name: account_name,
                },
            ),
            SupplierCommands::Delete { id } => cmd_supplier_delete(ws, id),
        },
        Commands::Procurement { command } => match command {
            ProcurementCommands::Record {
                supplier,
                weight,
                grade,
                moisture,
                use_humidity,
                date,
            } => cmd_procurement_record(ws, supplier, weight, grade, moisture, use_humidity, date),
            ProcurementCommands::List { list, period } => cmd_procurement_list(ws, &list, period),
            ProcurementCommands::Calc {
                weight,
                moisture,
                grade,
            } => cmd_procurement_calc(ws, weight, moisture, grade),
        },
        Commands::Payroll { command } => match command {
            PayrollCommands::List {
                list,
                status,
                period,
            } => cmd_payroll_list(ws, &list, status, period),
            PayrollCommands::Add {
                supplier,
                weight,
                grade,
                phone,
                date,
            } => cmd_payroll_add(ws, supplier, weight, grade, phone, date),
            PayrollCommands::MarkPaid { id, no_delay } => cmd_mark_paid(ws, id, no_delay),
            PayrollCommands::Notify { id } => cmd_notify(ws, id),
        },
        Commands::Rates { command } => match command {
            None => cmd_rates(ws),
            Some(RateCommands::Set { grade, rate }) => cmd_rate_set(ws, grade, rate),
        },
        Commands::Weather {
            latitude,
            longitude,
        } => cmd_weather(ws, latitude, longitude),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_date(date: Option<String>) -> Result<NaiveDate> {
    match date {
        Some(s) => {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| LedgerError::InvalidDate(s))
        }
        None => Ok(today()),
    }
}

fn view_state(ws: &Workspace, args: &ListArgs, period: Period) -> ViewState {
    let mut view = ViewState::new(args.page_size.unwrap_or(ws.config.view.page_size));
    view.set_search(args.search.as_str());
    view.set_period(period);
    view.go_to(args.page);
    view
}

/// Page line plus the pager moves that are currently enabled
fn print_pager(window: &PageWindow) {
    let moves = [
        ("first", PageNav::First),
        ("prev", PageNav::Prev),
        ("next", PageNav::Next),
        ("last", PageNav::Last),
    ];
    let hints: Vec<String> = moves
        .into_iter()
        .filter(|(_, nav)| window.can(*nav))
        .map(|(label, nav)| format!("{label}: --page {}", window.target(nav)))
        .collect();

    if hints.is_empty() {
        println!("{window}");
    } else {
        println!("{window}  [{}]", hints.join(", "));
    }
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
}

/// Initialize ledger directory with the config template
fn cmd_init(dir: &Path) -> Result<()> {
    Workspace::init(dir)?;

    println!("Initialized ledger at: {}", dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Review business name and grade rates:  $EDITOR {}/config.toml",
        dir.display()
    );
    println!("  2. Register suppliers:  evergreen suppliers add --name <name> --contact <phone>");
    println!(
        "  3. Record collections:  evergreen procurement record --supplier <name> --weight <kg>"
    );

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct SupplierRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "CONTACT")]
    contact: String,
    #[tabled(rename = "BANK")]
    bank: String,
    #[tabled(rename = "COLLECTED")]
    collected: String,
    #[tabled(rename = "PAID")]
    paid: String,
}

#[derive(Tabled)]
struct CollectionRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "SUPPLIER")]
    supplier: String,
    #[tabled(rename = "GROSS")]
    gross: String,
    #[tabled(rename = "MOISTURE")]
    moisture: String,
    #[tabled(rename = "NET")]
    net: String,
    #[tabled(rename = "GRADE")]
    grade: String,
    #[tabled(rename = "VALUE")]
    value: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

#[derive(Tabled)]
struct ActivityRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "SUPPLIER")]
    supplier: String,
    #[tabled(rename = "NET WEIGHT")]
    weight: String,
    #[tabled(rename = "GRADE")]
    grade: String,
}

#[derive(Tabled)]
struct PaymentRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "SUPPLIER")]
    supplier: String,
    #[tabled(rename = "WEIGHT")]
    weight: String,
    #[tabled(rename = "GRADE")]
    grade: String,
    #[tabled(rename = "RATE")]
    rate: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

#[derive(Tabled)]
struct RateRow {
    #[tabled(rename = "GRADE")]
    grade: String,
    #[tabled(rename = "RATE / KG")]
    rate: String,
}

/// Show ledger status
fn cmd_status(ws: &Workspace) -> Result<()> {
    let currency = ws.currency();

    println!("Ledger Status");
    println!("{}", "-".repeat(50));
    println!("Directory:    {}", ws.dir().display());
    println!("Business:     {}", ws.config.business.name);
    println!("Suppliers:    {}", ws.suppliers().len());
    println!("Collections:  {}", ws.procurement().len());
    println!("Payments:     {}", ws.payments().len());
    println!("Page size:    {}", ws.config.view.page_size);
    println!(
        "Rates:        {}",
        Grade::ALL
            .iter()
            .map(|g| format!("{g} {}", format_money(ws.config.rates.rate(*g), currency)))
            .collect::<Vec<_>>()
            .join(" | ")
    );
    match ws.humidity().get() {
        Some(reading) => println!(
            "Humidity:     {}% (observed {})",
            reading.percent,
            reading.observed_at.format("%Y-%m-%d %H:%M")
        ),
        None => println!("Humidity:     not cached (run 'evergreen weather')"),
    }

    Ok(())
}

/// Business overview
fn cmd_dashboard(ws: &Workspace, args: &ListArgs) -> Result<()> {
    let currency = ws.currency();
    let collections = ws.procurement();
    let payments = ws.payments();

    let collected = ProcurementSummary::of(collections.records());
    let pay = PaymentSummary::of(payments.records());

    println!("Dashboard - {}", ws.config.business.name);
    println!("{}", "-".repeat(50));
    println!("Total leaf collected: {} (net)", format_weight(collected.total_net));
    println!("Batches in process:   {}", collected.pending_count);
    println!(
        "Pending payments:     {} ({} suppliers awaiting)",
        format_money(pay.pending_amount, currency),
        pay.suppliers_awaiting
    );

    let trend = monthly_collection(collections.records());
    if !trend.is_empty() {
        println!();
        println!("Collection trend:");
        println!("  {:<10} {:>16} {:>16}", "MONTH", "COLLECTED", "PROCESSED");
        for month in &trend {
            println!(
                "  {:<10} {:>16} {:>16}",
                month.label(),
                format_weight(month.net_weight),
                format_weight(month.processed_weight)
            );
        }
    }

    println!();
    println!("Grade distribution:");
    let busiest = Grade::ALL
        .iter()
        .map(|g| collected.grade_count(*g))
        .max()
        .unwrap_or(0);
    for grade in Grade::ALL {
        let count = collected.grade_count(grade);
        let bar = if busiest == 0 { 0 } else { count * 30 / busiest };
        println!("  Grade {grade}  {count:>4}  {}", "#".repeat(bar));
    }

    // Newest first
    let mut recent: Vec<_> = collections.records().iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

    let view = view_state(ws, args, Period::All);
    let list = view.apply(recent, today());

    println!();
    println!("Recent activity:");
    if list.matched.is_empty() {
        println!("  No collections recorded.");
        return Ok(());
    }

    let rows: Vec<ActivityRow> = list
        .visible()
        .iter()
        .map(|r| ActivityRow {
            id: r.id,
            date: r.date.to_string(),
            supplier: r.supplier.clone(),
            weight: format_weight(r.net_weight),
            grade: r.grade.to_string(),
        })
        .collect();
    print_table(rows);
    print_pager(&list.window);

    Ok(())
}

/// List suppliers
fn cmd_suppliers(ws: &Workspace, args: &ListArgs) -> Result<()> {
    let currency = ws.currency();
    let store = ws.suppliers();
    let view = view_state(ws, args, Period::All);
    let list = view.apply(store.records(), today());

    if list.matched.is_empty() {
        println!("No suppliers match '{}'.", view.search());
        return Ok(());
    }

    let rows: Vec<SupplierRow> = list
        .visible()
        .iter()
        .map(|s| SupplierRow {
            id: s.id,
            name: s.name.clone(),
            contact: s.contact.clone(),
            bank: s.bank.clone(),
            collected: format_weight(s.total_collected_kg),
            paid: format_money(s.total_paid, currency),
        })
        .collect();
    print_table(rows);
    print_pager(&list.window);

    let summary = SupplierSummary::of(store.records());
    println!();
    println!(
        "Total: {} suppliers, {} collected, {} paid",
        summary.count,
        format_weight(summary.total_collected_kg),
        format_money(summary.total_paid, currency)
    );

    Ok(())
}

/// Show one supplier
fn cmd_supplier_show(ws: &Workspace, id: u32) -> Result<()> {
    let store = ws.suppliers();
    let s = store.find(id)?;

    println!("Supplier #{}", s.id);
    println!("  Name:            {}", s.name);
    println!("  Contact:         {}", s.contact);
    println!("  Address:         {}", s.address);
    println!("  Bank:            {}", s.bank);
    println!("  Account number:  {}", s.bank_account_number);
    println!("  Account name:    {}", s.bank_account_name);
    println!("  Total collected: {}", format_weight(s.total_collected_kg));
    println!("  Total paid:      {}", format_money(s.total_paid, ws.currency()));

    Ok(())
}

/// Register a supplier
fn cmd_supplier_add(ws: &Workspace, form: NewSupplier) -> Result<()> {
    form.validate()?;

    let mut store = ws.suppliers();
    let added = store.add(|id| form.into_supplier(id))?;
    info!(id = added.id, name = %added.name, "supplier added");

    println!("Added supplier #{}: {}", added.id, added.name);
    Ok(())
}

/// Edit a supplier
fn cmd_supplier_edit(ws: &Workspace, id: u32, patch: SupplierPatch) -> Result<()> {
    if patch.is_empty() {
        return Err(LedgerError::Validation(
            "Nothing to update. Pass at least one field to change.".to_string(),
        ));
    }
    patch.validate()?;

    let mut store = ws.suppliers();
    let name = store.update(id, |s| {
        patch.apply(s);
        s.name.clone()
    })?;

    println!("Updated supplier #{id}: {name}");
    Ok(())
}

/// Delete a supplier
fn cmd_supplier_delete(ws: &Workspace, id: u32) -> Result<()> {
    let mut store = ws.suppliers();
    let removed = store.delete(id)?;
    info!(id, name = %removed.name, "supplier deleted");

    println!("Deleted supplier #{}: {}", removed.id, removed.name);
    Ok(())
}

/// Record a collection
fn cmd_procurement_record(
    ws: &Workspace,
    supplier: String,
    weight: f64,
    grade: Grade,
    moisture: Option<f64>,
    use_humidity: bool,
    date: Option<String>,
) -> Result<()> {
    let moisture = if use_humidity {
        let reading = ws.humidity().get().ok_or_else(|| {
            LedgerError::Validation(
                "No humidity reading cached. Run 'evergreen weather' first.".to_string(),
            )
        })?;
        f64::from(reading.percent)
    } else {
        moisture.unwrap_or(0.0)
    };

    let form = CollectionForm {
        supplier,
        gross_weight: weight,
        grade,
        moisture,
        date: parse_date(date)?,
    };
    form.validate()?;

    let rates = ws.config.rates;
    let mut store = ws.procurement();
    let record = store.add(|id| form.into_record(id, &rates))?;
    let currency = ws.currency();

    println!("Recorded collection #{}", record.id);
    println!("  Supplier: {}", record.supplier);
    println!("  Gross:    {}", format_weight(record.gross_weight));
    println!("  Moisture: {}%", record.moisture);
    println!("  Net:      {}", format_weight(record.net_weight));
    println!(
        "  Value:    {} (Grade {} @ {}/kg)",
        format_money(record.value, currency),
        record.grade,
        format_money(rates.rate(record.grade), currency)
    );

    Ok(())
}

/// Preview a collection
fn cmd_procurement_calc(ws: &Workspace, weight: f64, moisture: f64, grade: Grade) -> Result<()> {
    let form = CollectionForm {
        supplier: "preview".to_string(),
        gross_weight: weight,
        grade,
        moisture,
        date: today(),
    };
    form.validate()?;

    let currency = ws.currency();
    println!("Net weight: {}", format_weight(form.net_weight()));
    println!("Value:      {}", format_money(form.value(&ws.config.rates), currency));
    Ok(())
}

/// List collections
fn cmd_procurement_list(ws: &Workspace, args: &ListArgs, period: Period) -> Result<()> {
    let currency = ws.currency();
    let store = ws.procurement();
    let view = view_state(ws, args, period);
    let list = view.apply(store.records(), today());

    if list.matched.is_empty() {
        println!("No collections found.");
        return Ok(());
    }

    let rows: Vec<CollectionRow> = list
        .visible()
        .iter()
        .map(|r| CollectionRow {
            id: r.id,
            date: r.date.to_string(),
            supplier: r.supplier.clone(),
            gross: format_weight(r.gross_weight),
            moisture: format!("{}%", r.moisture),
            net: format_weight(r.net_weight),
            grade: r.grade.to_string(),
            value: format_money(r.value, currency),
            status: r.status.to_string(),
        })
        .collect();
    print_table(rows);
    print_pager(&list.window);

    let summary = ProcurementSummary::of(list.matched.iter().copied());
    println!();
    println!(
        "Collections: {}  Net: {}  Value: {}  (A: {}, B: {}, C: {})",
        summary.count,
        format_weight(summary.total_net),
        format_money(summary.total_value, currency),
        summary.grade_count(Grade::A),
        summary.grade_count(Grade::B),
        summary.grade_count(Grade::C),
    );

    Ok(())
}

/// List payments with a TOTAL / PAID / PENDING footer
fn cmd_payroll_list(
    ws: &Workspace,
    args: &ListArgs,
    status: Option<PaymentStatus>,
    period: Period,
) -> Result<()> {
    let currency = ws.currency();
    let store = ws.payments();
    let view = view_state(ws, args, period);
    let by_status = store
        .records()
        .iter()
        .filter(|p| status.map_or(true, |s| p.status == s));
    let list = view.apply(by_status, today());

    if list.matched.is_empty() {
        println!("No payments found.");
        return Ok(());
    }

    // Financial summary covers every matching payment, not just this page
    let summary = PaymentSummary::of(list.matched.iter().copied());
    let footer = [
        ("TOTAL", format_money(summary.total_amount, currency)),
        ("(-) PAID", format_money(summary.paid_amount, currency)),
        ("(=) PENDING", format_money(summary.pending_amount, currency)),
    ];
    let width = footer.iter().map(|(_, v)| v.chars().count()).max().unwrap_or(0);

    let rows: Vec<PaymentRow> = list
        .visible()
        .iter()
        .map(|p| PaymentRow {
            id: p.id,
            date: p.date.to_string(),
            supplier: p.supplier.clone(),
            weight: format_weight(p.weight),
            grade: p.grade.to_string(),
            rate: format_amount(p.rate),
            amount: format!("{:>width$}", format_money(p.amount, currency)),
            status: p.status.to_string(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", add_summary_footer(&table, 6, &footer));
    print_pager(&list.window);
    println!();
    println!(
        "{} completed, {} awaiting",
        summary.paid_count, summary.pending_count
    );

    Ok(())
}

/// Add a pending payment
fn cmd_payroll_add(
    ws: &Workspace,
    supplier: String,
    weight: f64,
    grade: Grade,
    phone: String,
    date: Option<String>,
) -> Result<()> {
    let form = PaymentForm {
        supplier,
        weight,
        grade,
        phone,
        date: parse_date(date)?,
    };
    form.validate()?;

    let rates = ws.config.rates;
    let mut store = ws.payments();
    let record = store.add(|id| form.into_record(id, &rates))?;

    println!(
        "Added payment #{} for {}: {} ({} kg x {}/kg)",
        record.id,
        record.supplier,
        format_money(record.amount, ws.currency()),
        record.weight,
        format_money(record.rate, ws.currency())
    );
    Ok(())
}

/// Transfer a pending payment and mark it paid
fn cmd_mark_paid(ws: &Workspace, id: u32, no_delay: bool) -> Result<()> {
    let currency = ws.currency();
    let mut store = ws.payments();
    let delay = if no_delay {
        Duration::ZERO
    } else {
        Duration::from_millis(ws.config.payroll.transfer_delay_ms)
    };

    if let Some(pending) = store.get(id).filter(|p| !p.is_paid() && !delay.is_zero()) {
        println!(
            "Transferring {} to {}...",
            format_money(pending.amount, currency),
            pending.supplier
        );
    }

    let cancel = CancellationToken::new();
    match settle_payment(&mut store, id, delay, &cancel)? {
        Settlement::AlreadyPaid => println!("Payment #{id} is already paid"),
        Settlement::Transferred { supplier, amount } => {
            println!("Transferred {} to {supplier}", format_money(amount, currency))
        }
    }
    Ok(())
}

/// Send the payment SMS (simulated)
fn cmd_notify(ws: &Workspace, id: u32) -> Result<()> {
    let store = ws.payments();
    let record = store.find(id)?;

    if record.phone.trim().is_empty() {
        return Err(LedgerError::Validation(format!(
            "Payment #{id} has no phone number"
        )));
    }

    let message = record.sms_notice(ws.currency());
    info!(id, phone = %record.phone, "sms sent");
    println!("SMS sent to {}: {}", record.phone, message);
    Ok(())
}

/// Show rates per grade
fn cmd_rates(ws: &Workspace) -> Result<()> {
    let rows: Vec<RateRow> = Grade::ALL
        .iter()
        .map(|g| RateRow {
            grade: g.to_string(),
            rate: format_money(ws.config.rates.rate(*g), ws.currency()),
        })
        .collect();
    print_table(rows);
    Ok(())
}

/// Change one grade's rate
fn cmd_rate_set(ws: &mut Workspace, grade: Grade, rate: f64) -> Result<()> {
    ws.config.rates.set(grade, rate)?;
    ws.save_config()?;

    println!(
        "Grade {} rate set to {}/kg",
        grade,
        format_money(rate, ws.currency())
    );
    Ok(())
}

/// Fetch the weather and cache humidity
fn cmd_weather(ws: &Workspace, latitude: Option<f64>, longitude: Option<f64>) -> Result<()> {
    let latitude = latitude.unwrap_or(ws.config.weather.latitude);
    let longitude = longitude.unwrap_or(ws.config.weather.longitude);
    let now = Local::now().naive_local();

    let forecast = fetch_forecast(latitude, longitude, now)?;

    println!("Weather at {latitude}, {longitude}");
    println!(
        "  Now:      {:.0}°C, {}",
        forecast.temperature, forecast.condition
    );
    if let (Some(high), Some(low)) = (forecast.high, forecast.low) {
        println!("  High/Low: {high:.0}°C / {low:.0}°C");
    }

    if let Some(percent) = forecast.humidity {
        let reading = HumidityReading {
            percent,
            observed_at: now,
        };
        match ws.humidity().set(reading) {
            Ok(()) => println!(
                "  Humidity: {percent}% (cached for 'procurement record --use-humidity')"
            ),
            Err(e) => {
                warn!(error = %e, "failed to cache humidity");
                println!("  Humidity: {percent}%");
            }
        }
    }

    Ok(())
}
