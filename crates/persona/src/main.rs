mod cli;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::info;
use serde_json::Value;

use persona_core::feature::{Feature, FeatureManager, FeatureManifest};
use persona_core::kernel::{Application, Error, Result};
use persona_core::menu::{MenuEntry, UserInfo};

use core_logging::LoggingFeature;
use feature_admin_logs::AdminLogsFeature;
use feature_home::HomeFeature;
use feature_task_scheduler::TaskSchedulerFeature;

/// PersonaBar: the administration bar host
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Print "pong" and exit without starting the kernel
    #[arg(long)]
    ping: bool,

    /// Also print debug notifications
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect the menu registry
    Menu {
        #[command(subcommand)]
        command: MenuCommand,
    },
    /// Manage features and their registry records
    Feature {
        #[command(subcommand)]
        command: FeatureCommand,
    },
    /// Drive the panel host
    Panel {
        #[command(subcommand)]
        command: PanelCommand,
    },
    /// Issue a service call and print the response
    Call {
        controller: String,
        action: String,
        /// Send as POST with a JSON body instead of GET
        #[arg(long)]
        post: bool,
        /// Request parameter, repeatable
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

#[derive(Subcommand, Debug)]
enum MenuCommand {
    /// Print the bar as a user sees it
    List {
        #[arg(long, default_value_t = 1)]
        user_id: i32,
        /// Role membership as NAME:ID, repeatable
        #[arg(long = "role", value_parser = parse_role)]
        roles: Vec<(String, i32)>,
        /// Evaluate as a host (super) user
        #[arg(long)]
        host: bool,
    },
    /// Print every registered item, orphans included
    Tree,
}

#[derive(Subcommand, Debug)]
enum FeatureCommand {
    /// List active features
    List,
    /// Install the records of a manifest file
    Install { manifest: PathBuf },
    /// Remove menu items (and their permissions and extensions)
    Uninstall {
        #[arg(required = true)]
        identifiers: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum PanelCommand {
    /// Select a panel twice as the host user: init, then load
    Open {
        identifier: String,
        #[arg(long)]
        mobile: bool,
    },
}

fn parse_role(value: &str) -> std::result::Result<(String, i32), String> {
    let (name, id) = value
        .rsplit_once(':')
        .ok_or_else(|| format!("expected NAME:ID, got '{}'", value))?;
    let id = id
        .trim()
        .parse()
        .map_err(|_| format!("role id '{}' is not a number", id))?;
    Ok((name.trim().to_string(), id))
}

fn parse_param(value: &str) -> std::result::Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", value))
}

fn print_entries(entries: &[MenuEntry]) {
    for entry in entries {
        for (depth, entry) in entry.flatten() {
            println!(
                "{}{} ({})",
                "  ".repeat(depth),
                entry.item.identifier,
                entry.item.module_name
            );
        }
    }
}

fn builtin_features(sku: &str) -> Vec<Arc<dyn Feature>> {
    vec![
        Arc::new(LoggingFeature),
        Arc::new(HomeFeature::new(sku)),
        Arc::new(AdminLogsFeature),
        Arc::new(TaskSchedulerFeature),
    ]
}

/// Activate the built-in features and start the kernel. Records are written
/// on the first run only, so uninstalls persist.
async fn boot(verbose: bool) -> Result<Application> {
    let mut app = Application::new()?;
    app.ui_manager()
        .register_interface(Box::new(cli::CliInterface::new(verbose)))?;

    let features = builtin_features(&app.settings().sku);
    app.activate_features(features).await?;
    app.start().await?;

    if app.menu_manager().tree().await?.is_empty() {
        info!("Empty registry, installing built-in features");
        app.install_features().await?;
        app.install_stored_manifests().await?;
    }
    Ok(app)
}

async fn run(app: &Application, command: Commands) -> Result<()> {
    match command {
        Commands::Menu { command } => match command {
            MenuCommand::List { user_id, roles, host } => {
                let mut user = if host {
                    UserInfo::host(user_id, "host")
                } else {
                    UserInfo::new(user_id, "user")
                };
                for (name, id) in roles {
                    user = user.with_role(id, name);
                }
                user = user.in_portal(app.settings().portal_id);
                let entries = app.menu_manager().visible_menu(&user).await?;
                if entries.is_empty() {
                    println!("No visible menu items.");
                }
                print_entries(&entries);
            }
            MenuCommand::Tree => {
                let tree = app.menu_manager().tree().await?;
                for (depth, item) in tree.walk() {
                    println!("{}{} [{}] {}", "  ".repeat(depth), item.identifier, item.menu_id, item.path);
                }
                for orphan in tree.orphans() {
                    println!("orphan: {}", orphan);
                }
            }
        },
        Commands::Feature { command } => match command {
            FeatureCommand::List => {
                for feature in app.feature_manager().features().await {
                    let kind = if feature.is_core { " (core)" } else { "" };
                    println!("{} v{}{}", feature.name, feature.version, kind);
                }
            }
            FeatureCommand::Install { manifest } => {
                let path = std::path::absolute(&manifest)
                    .map_err(|e| Error::Other(format!("Invalid manifest path {}: {}", manifest.display(), e)))?;
                let manifest = FeatureManifest::load(app.storage_manager().as_ref(), &path)?;
                let report = app.feature_manager().install_manifest(&manifest).await?;
                println!(
                    "Installed {}: {} menu item(s), {} extension(s), {} permission(s)",
                    report.feature,
                    report.menu_items.len(),
                    report.extensions.len(),
                    report.permissions
                );
            }
            FeatureCommand::Uninstall { identifiers } => {
                app.feature_manager().uninstall_identifiers(&identifiers).await?;
                println!("Uninstalled {}", identifiers.join(", "));
            }
        },
        Commands::Panel { command } => match command {
            PanelCommand::Open { identifier, mobile } => {
                let shell = app.host_shell();
                shell.set_mobile(mobile);
                let user = UserInfo::host(1, "host");
                for _ in 0..2 {
                    let outcome = shell.select(&identifier, &user, Value::Null).await?;
                    println!("{}: {:?} ({:?})", outcome.identifier, outcome.action, outcome.state);
                }
            }
        },
        Commands::Call {
            controller,
            action,
            post,
            params,
        } => {
            let client = app.service_client();
            let mut call = if post {
                client.post(&controller, &action)
            } else {
                client.get(&controller, &action)
            };
            for (key, value) in params {
                call = call.param(key, value);
            }
            let response = client.call(call).await?;
            let pretty = serde_json::to_string_pretty(&response.results)
                .map_err(|e| Error::Other(e.to_string()))?;
            println!("{}", pretty);
            if let Some(total) = response.total_results {
                println!("TotalResults: {}", total);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if args.ping {
        println!("pong");
        return ExitCode::SUCCESS;
    }

    let mut app = match boot(args.verbose).await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to initialize application: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match args.command {
        Some(command) => run(&app, command).await,
        None => {
            println!("{} is ready. Run with --help for commands.", persona_core::kernel::constants::APP_NAME);
            Ok(())
        }
    };

    if let Err(e) = app.shutdown().await {
        eprintln!("Error during shutdown: {}", e);
    }
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
