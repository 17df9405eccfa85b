use anyhow::Result;
use clap::Args;

use super::{flush, Context};
use crate::pages::login::LoginViewModel;

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub username: String,

    #[arg(short, long, env = "BARBERSHOP_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn login(ctx: &Context, args: LoginArgs) -> Result<()> {
    let mut vm = LoginViewModel::new(ctx.api.clone());
    vm.form.username = args.username;
    vm.form.password = args.password;
    let result = vm.submit().await;
    flush(&mut vm.notifications);
    result?;
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    let mut vm = LoginViewModel::new(ctx.api.clone());
    vm.logout()?;
    flush(&mut vm.notifications);
    Ok(())
}
