use anyhow::{bail, Result};
use chrono::{NaiveDate, Weekday};
use clap::{Args, Subcommand};

use super::{flush, Context};
use crate::{
    api::{Appointment, AppointmentStatus, Barber, BarberId, ServiceId},
    pages::{
        admin::{analytics::DashboardReport, utils::HistoryFilterForm, AdminViewModel},
        admin_barbers::{BarberEditorViewModel, ServicesViewModel},
    },
    utils::{
        format::{format_currency, format_duration, format_percent},
        time::format_date_time,
    },
};

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Appointments from now on
    Upcoming,
    /// Appointments of one day (today by default)
    Day { date: Option<NaiveDate> },
    /// The next appointment that is not cancelled
    Next,
    /// All appointments, filtered and sorted
    History(HistoryArgs),
    /// Show one appointment
    Show { id: i64 },
    /// Change an appointment's status
    SetStatus {
        id: i64,
        #[arg(value_parser = parse_status)]
        status: AppointmentStatus,
    },
    /// Revenue and booking analytics
    Report {
        #[arg(long)]
        json: bool,
    },
    /// Create a barber
    AddBarber(BarberArgs),
    /// Edit a barber's profile and hours
    EditBarber {
        id: BarberId,
        #[command(flatten)]
        profile: BarberArgs,
    },
    /// Deactivate a barber
    DeactivateBarber { id: BarberId },
    /// List a barber's services, inactive ones included
    Services { barber: BarberId },
    /// Add a service to a barber
    AddService(ServiceArgs),
    /// Switch a service between active and inactive
    ToggleService { barber: BarberId, service: ServiceId },
    /// Delete a service permanently
    DeleteService { barber: BarberId, service: ServiceId },
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Matches client name, email or phone
    #[arg(short, long, default_value = "")]
    pub search: String,

    #[arg(long, default_value = "all")]
    pub status: String,

    #[arg(long, default_value = "all")]
    pub barber: String,

    /// YYYY-MM-DD, inclusive
    #[arg(long, default_value = "")]
    pub from: String,

    /// YYYY-MM-DD, inclusive
    #[arg(long, default_value = "")]
    pub to: String,

    /// date_desc, date_asc, client_name, amount_desc or amount_asc
    #[arg(long, default_value = "date_desc")]
    pub sort: String,
}

impl From<HistoryArgs> for HistoryFilterForm {
    fn from(args: HistoryArgs) -> Self {
        Self {
            search: args.search,
            status: args.status,
            barber: args.barber,
            from: args.from,
            to: args.to,
            sort: args.sort,
        }
    }
}

#[derive(Debug, Args)]
pub struct BarberArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// `day=HH:MM-HH:MM` or `day=closed`; repeat per day
    #[arg(long = "hours", value_parser = parse_day_hours)]
    pub hours: Vec<(Weekday, String)>,
}

#[derive(Debug, Args)]
pub struct ServiceArgs {
    #[arg(long)]
    pub barber: BarberId,

    #[arg(long)]
    pub name: String,

    /// Euros, e.g. 25.00
    #[arg(long)]
    pub price: String,

    /// Minutes
    #[arg(long)]
    pub duration: String,

    #[arg(long)]
    pub description: Option<String>,
}

fn parse_status(raw: &str) -> Result<AppointmentStatus, String> {
    AppointmentStatus::parse(raw)
        .ok_or_else(|| format!("expected pending, confirmed or cancelled, got '{raw}'"))
}

fn parse_day_hours(raw: &str) -> Result<(Weekday, String), String> {
    let (day, hours) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected day=HH:MM-HH:MM, got '{raw}'"))?;
    let weekday = day
        .trim()
        .parse::<Weekday>()
        .map_err(|_| format!("unknown day '{}'", day.trim()))?;
    Ok((weekday, hours.trim().to_string()))
}

pub async fn run(ctx: &Context, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::AddBarber(profile) => save_barber(ctx, None, profile).await,
        AdminCommand::EditBarber { id, profile } => save_barber(ctx, Some(id), profile).await,
        AdminCommand::DeactivateBarber { id } => {
            let mut vm = BarberEditorViewModel::edit_barber(ctx.api.clone(), id);
            let result = vm.deactivate().await;
            flush(&mut vm.notifications);
            Ok(result?)
        }
        AdminCommand::Services { barber } => {
            let mut vm = ServicesViewModel::new(ctx.api.clone(), barber);
            vm.refresh().await?;
            print_services(&vm);
            Ok(())
        }
        AdminCommand::AddService(args) => {
            let mut vm = ServicesViewModel::new(ctx.api.clone(), args.barber);
            vm.form.name = args.name;
            vm.form.price = args.price;
            vm.form.duration_minutes = args.duration;
            vm.form.description = args.description.unwrap_or_default();
            let result = vm.add_service().await;
            flush(&mut vm.notifications);
            result?;
            print_services(&vm);
            Ok(())
        }
        AdminCommand::ToggleService { barber, service } => {
            let mut vm = ServicesViewModel::new(ctx.api.clone(), barber);
            vm.refresh().await?;
            let result = vm.toggle_service(service).await;
            flush(&mut vm.notifications);
            result?;
            print_services(&vm);
            Ok(())
        }
        AdminCommand::DeleteService { barber, service } => {
            let mut vm = ServicesViewModel::new(ctx.api.clone(), barber);
            let result = vm.delete_service(service).await;
            flush(&mut vm.notifications);
            Ok(result?)
        }
        command => dashboard(ctx, command).await,
    }
}

async fn dashboard(ctx: &Context, command: AdminCommand) -> Result<()> {
    let mut vm = AdminViewModel::new(ctx.api.clone(), ctx.config.time_zone);
    vm.refresh().await?;

    match command {
        AdminCommand::Upcoming => print_list(&vm, vm.upcoming_at(vm.now())),
        AdminCommand::Day { date } => {
            let date = date.unwrap_or_else(|| vm.today());
            println!("{}", date.format("%A %d %B %Y"));
            print_list(&vm, vm.on_date(date));
        }
        AdminCommand::Next => match vm.next_at(vm.now()) {
            Some(appointment) => print_appointment(appointment, vm.barbers()),
            None => println!("No upcoming appointments"),
        },
        AdminCommand::History(args) => {
            vm.filters = args.into();
            let rows = vm.history()?;
            print_list(&vm, rows);
        }
        AdminCommand::Show { id } => {
            let appointment = vm.repository().fetch_appointment(id).await?;
            print_details(&appointment, vm.barbers());
        }
        AdminCommand::SetStatus { id, status } => {
            let result = vm.update_status(id, status).await;
            flush(&mut vm.notifications);
            result?;
        }
        AdminCommand::Report { json } => {
            let report = vm.report();
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        other => bail!("{other:?} is not a dashboard command"),
    }
    Ok(())
}

async fn save_barber(ctx: &Context, id: Option<BarberId>, profile: BarberArgs) -> Result<()> {
    let mut vm = match id {
        Some(id) => BarberEditorViewModel::edit_barber(ctx.api.clone(), id),
        None => BarberEditorViewModel::new_barber(ctx.api.clone()),
    };
    vm.load().await?;
    if let Some(name) = profile.name {
        vm.form.name = name;
    }
    if let Some(description) = profile.description {
        vm.form.description = description;
    }
    for (weekday, hours) in &profile.hours {
        vm.form.set_day(*weekday, hours)?;
    }
    let result = vm.save().await;
    flush(&mut vm.notifications);
    let barber = result?;
    print_barber(&barber);
    Ok(())
}

fn barber_name<'a>(appointment: &'a Appointment, barbers: &'a [Barber]) -> &'a str {
    appointment
        .barber_name()
        .or_else(|| {
            barbers
                .iter()
                .find(|barber| barber.id == appointment.barber_id)
                .map(|barber| barber.name.as_str())
        })
        .unwrap_or("Unknown barber")
}

fn print_appointment(appointment: &Appointment, barbers: &[Barber]) {
    println!(
        "#{:<5} {}  {:<20} {:<16} {:>9}  {}",
        appointment.id,
        format_date_time(appointment.scheduled_at),
        appointment.client_name,
        barber_name(appointment, barbers),
        format_currency(appointment.total_price()),
        appointment.status.label()
    );
}

fn print_list(vm: &AdminViewModel, rows: Vec<&Appointment>) {
    if rows.is_empty() {
        println!("No appointments");
    }
    for appointment in rows {
        print_appointment(appointment, vm.barbers());
    }
}

fn print_details(appointment: &Appointment, barbers: &[Barber]) {
    println!("Appointment #{}", appointment.id);
    println!("  When:     {}", format_date_time(appointment.scheduled_at));
    println!("  Barber:   {}", barber_name(appointment, barbers));
    println!("  Client:   {}", appointment.client_name);
    println!("  Email:    {}", appointment.client_email);
    println!("  Phone:    {}", appointment.client_phone);
    println!("  Services: {}", appointment.service_names());
    println!(
        "  Total:    {} ({})",
        format_currency(appointment.total_price()),
        format_duration(appointment.total_duration_minutes())
    );
    println!("  Status:   {}", appointment.status.label());
    if let Some(notes) = appointment.notes.as_deref() {
        println!("  Notes:    {notes}");
    }
}

fn print_barber(barber: &Barber) {
    println!("#{} {}", barber.id, barber.name);
    let hours = crate::api::WorkingHours::for_barber(barber);
    for (day, value) in hours.entries() {
        println!("  {:<10} {}", day, value.to_wire());
    }
}

fn print_services(vm: &ServicesViewModel) {
    if let Some(barber) = vm.barber() {
        println!("Services of {}", barber.name);
    }
    for service in vm.services() {
        println!(
            "  #{:<4} {:<24} {:>9} {:>10}  {}",
            service.id,
            service.name,
            format_currency(service.price),
            format_duration(service.duration_minutes),
            if service.is_active { "active" } else { "inactive" }
        );
    }
}

fn print_report(report: &DashboardReport) {
    println!("Revenue:           {}", format_currency(report.total_revenue));
    println!("Average order:     {}", format_currency(report.average_order_value));
    println!("Cancellation rate: {}", format_percent(report.cancellation_rate, 1));
    println!(
        "Appointments:      {} total, {} pending, {} confirmed, {} cancelled",
        report.counts.total, report.counts.pending, report.counts.confirmed, report.counts.cancelled
    );

    println!("\nBy barber");
    for row in &report.revenue_by_barber {
        println!(
            "  {:<20} {:>10}  {} appointments",
            row.barber_name,
            format_currency(row.revenue),
            row.appointments
        );
    }

    println!("\nPopular services");
    for row in &report.popular_services {
        println!(
            "  {:<20} {:>4}x  {:>10}",
            row.name,
            row.occurrences,
            format_currency(row.revenue)
        );
    }

    println!("\nLast 6 months");
    for row in &report.revenue_by_month {
        println!("  {:<10} {:>10}  {}", row.label, format_currency(row.revenue), row.appointments);
    }

    println!("\nBy weekday");
    for row in &report.revenue_by_day_of_week {
        println!(
            "  {:<10} {:>10}  avg {:>9}  {}",
            row.label,
            format_currency(row.total),
            format_currency(row.average),
            row.appointments
        );
    }
}
