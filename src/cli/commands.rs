use anyhow::{Context, Result};
use colored::Colorize;

use super::args::{AdminCommand, BlogCommand, Cli, Commands, UserCommand};
use super::render::{
    format_blog, format_blog_page, format_distribution, format_message, format_migration,
    format_shards, format_user,
};
use super::OutputFormat;
use crate::{
    api::{LoginRequest, MigrateShardRequest, NewBlog, RegisterRequest, UpdateBlogRequest, UpdateUserRequest},
    app::{init_config, load_config, AppContext},
    forms,
    utils::{notify_error, notify_info, notify_success, BlogdeskError, Reported},
};

/// Parse-independent entry point: load config, open the session, run the command
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }
    let format = cli.output.unwrap_or(config.output.format);

    let ctx = AppContext::open(config, cli.ephemeral)?;
    handle_command(&ctx, &cli.command, format).await
}

fn init() -> Result<()> {
    let (path, created) = init_config()?;
    if created {
        println!("Created default configuration at: {}", path.display());
    } else {
        println!("Configuration already exists at: {}", path.display());
    }
    Ok(())
}

/// Handle CLI subcommands against an opened context
pub async fn handle_command(ctx: &AppContext, command: &Commands, format: OutputFormat) -> Result<()> {
    match command {
        Commands::Init => init(),
        Commands::Status => {
            show_status(ctx, format);
            Ok(())
        }
        Commands::Register {
            name,
            username,
            email,
            password,
        } => {
            let form = RegisterRequest {
                name: name.clone(),
                username: username.clone(),
                email: email.clone(),
                password: password.clone(),
            };
            forms::validate_register(&form).map_err(BlogdeskError::from)?;
            let response = ctx.client.register(&form).await?;
            println!("{}", format_message(&response.message, format));
            notify_info("Account created, you can log in now");
            Ok(())
        }
        Commands::Login {
            username_email,
            password,
        } => {
            let form = LoginRequest {
                username_email: username_email.clone(),
                password: password.clone(),
            };
            forms::validate_login(&form).map_err(BlogdeskError::from)?;
            let response = ctx.session.login(&ctx.client, &form).await?;
            println!("{}", format_message(&response.message, format));
            notify_success(format!("Logged in as {}", username_email));
            Ok(())
        }
        Commands::Logout => {
            ctx.session.logout().context("Failed to clear stored session")?;
            notify_success("Logged out");
            Ok(())
        }
        Commands::User(cmd) => handle_user(ctx, cmd, format).await,
        Commands::Blog(cmd) => handle_blog(ctx, cmd, format).await,
        Commands::Admin(cmd) => handle_admin(ctx, cmd, format).await,
    }
}

/// Report a failed mutation the way the views do, then pass the error on
/// marked as already shown
fn mutation_failed<T>(action: &str, err: BlogdeskError) -> Result<T> {
    notify_error(format!("{}: {}", action, err.user_message()));
    Err(anyhow::Error::new(err).context(Reported))
}

async fn handle_user(ctx: &AppContext, command: &UserCommand, format: OutputFormat) -> Result<()> {
    match command {
        UserCommand::Me => {
            let response = ctx.client.current_user().await?;
            match response.data {
                Some(user) => println!("{}", format_user(&user, format)),
                None => println!("{}", format_message(&response.message, format)),
            }
            Ok(())
        }
        UserCommand::Show { id } => {
            let response = ctx.client.get_user(*id).await?;
            match response.data {
                Some(user) => println!("{}", format_user(&user, format)),
                None => println!("{}", format_message(&response.message, format)),
            }
            Ok(())
        }
        UserCommand::Update {
            username,
            email,
            name,
            password,
        } => {
            let form = forms::normalize_user_update(UpdateUserRequest {
                username: username.clone(),
                email: email.clone(),
                name: name.clone(),
                password: password.clone(),
            });
            forms::validate_user_update(&form, &ctx.session).map_err(BlogdeskError::from)?;
            match ctx.client.update_user(&form).await {
                Ok(response) => {
                    println!("{}", format_message(&response.message, format));
                    notify_success("Profile updated");
                    Ok(())
                }
                Err(err) => mutation_failed("Update failed", err),
            }
        }
        UserCommand::Delete { password } => {
            forms::validate_delete_account(password, &ctx.session).map_err(BlogdeskError::from)?;
            match ctx.client.delete_user(password).await {
                Ok(response) => {
                    ctx.session.logout().context("Account deleted but the local session could not be cleared")?;
                    println!("{}", format_message(&response.message, format));
                    notify_success("Account deleted");
                    Ok(())
                }
                Err(err) => mutation_failed("Delete failed", err),
            }
        }
        UserCommand::Blogs { id, list } => {
            let response = ctx.client.list_user_blogs(*id, &list.params()).await?;
            print_page(response.data, &response.message, format);
            Ok(())
        }
    }
}

fn print_page(page: Option<crate::api::BlogPage>, message: &str, format: OutputFormat) {
    match page {
        Some(page) => println!("{}", format_blog_page(&page, format)),
        None => println!("{}", format_message(message, format)),
    }
}

async fn handle_blog(ctx: &AppContext, command: &BlogCommand, format: OutputFormat) -> Result<()> {
    match command {
        BlogCommand::List(list) => {
            let response = ctx.client.list_blogs(&list.params()).await?;
            print_page(response.data, &response.message, format);
            Ok(())
        }
        BlogCommand::Show { id } => {
            let response = ctx.client.get_blog(*id).await?;
            match response.data {
                Some(blog) => println!("{}", format_blog(&blog, format)),
                None => println!("{}", format_message(&response.message, format)),
            }
            Ok(())
        }
        BlogCommand::Create { title, body } => {
            let form = NewBlog {
                title: title.clone(),
                body: body.read().context("Failed to read post body")?.unwrap_or_default(),
            };
            forms::validate_new_blog(&form, &ctx.session).map_err(BlogdeskError::from)?;
            match ctx.client.create_blog(&form).await {
                Ok(response) => {
                    match &response.data {
                        Some(blog) => println!("{}", format_blog(blog, format)),
                        None => println!("{}", format_message(&response.message, format)),
                    }
                    notify_success("Blog created");
                    Ok(())
                }
                Err(err) => mutation_failed("Save failed", err),
            }
        }
        BlogCommand::Edit { id, title, body } => {
            let form = UpdateBlogRequest {
                title: title.clone(),
                body: body.read().context("Failed to read post body")?,
            };
            forms::validate_blog_update(&form, &ctx.session).map_err(BlogdeskError::from)?;
            match ctx.client.update_blog(*id, &form).await {
                Ok(response) => {
                    println!("{}", format_message(&response.message, format));
                    notify_success("Blog updated");
                    Ok(())
                }
                Err(err) => mutation_failed("Save failed", err),
            }
        }
        BlogCommand::Delete { id } => {
            forms::validate_blog_delete(&ctx.session).map_err(BlogdeskError::from)?;
            match ctx.client.delete_blog(*id).await {
                Ok(response) => {
                    println!("{}", format_message(&response.message, format));
                    notify_success("Blog deleted");
                    Ok(())
                }
                Err(err) => mutation_failed("Delete failed", err),
            }
        }
    }
}

async fn handle_admin(ctx: &AppContext, command: &AdminCommand, format: OutputFormat) -> Result<()> {
    forms::validate_admin_access(&ctx.session).map_err(BlogdeskError::from)?;
    match command {
        AdminCommand::Shards => {
            let shards = ctx.client.list_shards().await?;
            println!("{}", format_shards(&shards, format));
            Ok(())
        }
        AdminCommand::Distribution => {
            let distribution = ctx.client.shard_distribution().await?;
            println!("{}", format_distribution(&distribution, format));
            Ok(())
        }
        AdminCommand::Migrate { entity, id, target } => {
            let request = MigrateShardRequest {
                entity: (*entity).into(),
                id: *id,
                target: target.clone(),
            };
            forms::validate_migration(&request).map_err(BlogdeskError::from)?;
            match ctx.client.migrate_shard(&request).await {
                Ok(result) => {
                    println!("{}", format_migration(&result, format));
                    Ok(())
                }
                Err(err) => mutation_failed("Migration failed", err),
            }
        }
    }
}

/// Show where we talk to and whether we are signed in
fn show_status(ctx: &AppContext, format: OutputFormat) {
    let authenticated = ctx.session.is_authenticated();
    let storage = ctx.session.storage_location();

    if format == OutputFormat::Json {
        let status = serde_json::json!({
            "base_url": ctx.client.base_url(),
            "session_storage": storage,
            "authenticated": authenticated,
        });
        println!("{}", status);
        return;
    }

    println!("Blogdesk v{}", env!("CARGO_PKG_VERSION"));
    println!("  Backend:  {}", ctx.client.base_url());
    println!("  Session:  {}", storage);
    if authenticated {
        println!("  [OK] {}", "Logged in".green());
    } else {
        println!("  [--] {}", "Not logged in".yellow());
    }
}
