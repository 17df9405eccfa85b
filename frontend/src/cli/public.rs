use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Args;

use super::{flush, Context};
use crate::{
    api::ServiceId,
    pages::{
        booking::{utils::ContactForm, BookingViewModel},
        cancel::{CancelState, CancelViewModel},
        confirm::{ConfirmOutcome, ConfirmViewModel},
    },
    utils::{
        format::{format_currency, format_duration},
        time::{format_date_time, now_in},
    },
};

#[derive(Debug, Args)]
pub struct SlotsArgs {
    #[arg(short, long)]
    pub barber: i64,

    /// Day to look at, YYYY-MM-DD
    #[arg(short, long)]
    pub date: NaiveDate,

    /// Service to include; repeat for several
    #[arg(short, long = "service", required = true)]
    pub services: Vec<ServiceId>,
}

#[derive(Debug, Args)]
pub struct BookArgs {
    #[arg(short, long)]
    pub barber: i64,

    #[arg(short, long = "service", required = true)]
    pub services: Vec<ServiceId>,

    /// Start time, YYYY-MM-DDTHH:MM
    #[arg(long)]
    pub at: String,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub phone: String,

    #[arg(long)]
    pub notes: Option<String>,
}

pub async fn barbers(ctx: &Context) -> Result<()> {
    let mut vm = BookingViewModel::new(ctx.api.clone());
    vm.load_barbers().await?;
    let ids: Vec<i64> = vm.barbers().iter().map(|barber| barber.id).collect();
    if ids.is_empty() {
        println!("No barbers available");
    }
    for id in ids {
        vm.select_barber(id);
        vm.load_services().await?;
        if let Some(barber) = vm.selected_barber() {
            println!("#{} {}", barber.id, barber.name);
            if let Some(description) = barber.description.as_deref() {
                println!("    {description}");
            }
        }
        for service in vm.catalog() {
            println!(
                "  - #{} {} {} ({})",
                service.id,
                service.name,
                format_currency(service.price),
                format_duration(service.duration_minutes)
            );
        }
    }
    Ok(())
}

/// Walks the wizard up to the service selection.
async fn prepare(ctx: &Context, barber: i64, services: &[ServiceId]) -> Result<BookingViewModel> {
    let mut vm = BookingViewModel::new(ctx.api.clone());
    vm.load_barbers().await?;
    vm.select_barber(barber);
    if vm.selected_barber().map(|b| b.id) != Some(barber) {
        bail!("Unknown barber #{barber}");
    }
    vm.load_services().await?;
    for id in services {
        vm.toggle_service(*id);
    }
    if vm.selected_services().len() != services.len() {
        bail!("Some of the services are not offered by this barber");
    }
    Ok(vm)
}

pub async fn slots(ctx: &Context, args: SlotsArgs) -> Result<()> {
    let mut vm = prepare(ctx, args.barber, &args.services).await?;
    let loaded = vm.load_slots(args.date).await;
    flush(&mut vm.notifications);
    loaded?;
    println!(
        "{} for {} ({}):",
        args.date.format("%A %d %B %Y"),
        format_duration(vm.total_duration()),
        format_currency(vm.total_price())
    );
    for slot in vm.slots() {
        let marker = if slot.available { "free" } else { "taken" };
        println!("  {} {}", slot.time, marker);
    }
    Ok(())
}

pub async fn book(ctx: &Context, args: BookArgs) -> Result<()> {
    let mut vm = prepare(ctx, args.barber, &args.services).await?;
    vm.next_step()?;
    vm.set_datetime(&args.at, now_in(ctx.config.time_zone))?;
    vm.next_step()?;
    vm.contact = ContactForm {
        client_name: args.name,
        client_email: args.email,
        client_phone: args.phone,
        notes: args.notes.unwrap_or_default(),
    };
    let result = vm.submit().await;
    flush(&mut vm.notifications);
    let appointment = result?;
    println!(
        "Booking #{} on {}, total {}",
        appointment.id,
        format_date_time(appointment.scheduled_at),
        format_currency(vm.total_price())
    );
    Ok(())
}

pub async fn confirm(ctx: &Context, token: &str) -> Result<()> {
    let mut vm = ConfirmViewModel::new(ctx.api.clone(), token);
    match vm.confirm().await {
        ConfirmOutcome::Confirmed(_) => {
            println!("Appointment confirmed! We look forward to seeing you.");
            Ok(())
        }
        ConfirmOutcome::Failed(message) => bail!("{message}"),
        ConfirmOutcome::Pending => Ok(()),
    }
}

pub async fn cancel(ctx: &Context, token: &str, yes: bool) -> Result<()> {
    let mut vm = CancelViewModel::new(ctx.api.clone(), token);
    if let CancelState::Failed(message) = vm.check().await {
        bail!("{message}");
    }
    if let Some(check) = vm.appointment() {
        println!(
            "Appointment #{} for {} with {} on {}",
            check.appointment_id,
            check.client_name,
            check.barber_name.as_deref().unwrap_or("your barber"),
            format_date_time(check.appointment_datetime)
        );
    }
    if let Some(label) = vm.time_until(now_in(ctx.config.time_zone)) {
        println!("{label}");
    }
    match vm.state() {
        CancelState::AlreadyCancelled(_) => {
            println!("{}", crate::pages::cancel::view_model::ALREADY_CANCELLED);
            return Ok(());
        }
        CancelState::TooLate(_) => {
            bail!("{}", crate::pages::cancel::view_model::OUTSIDE_WINDOW);
        }
        _ => {}
    }
    if !yes {
        println!("Run again with --yes to cancel this appointment.");
        return Ok(());
    }
    if let Err(err) = vm.cancel().await {
        bail!("{}", vm.error().map(str::to_string).unwrap_or_else(|| err.user_message()));
    }
    println!("{}", crate::pages::cancel::view_model::CANCELLED);
    Ok(())
}
