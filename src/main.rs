mod auth;
mod cart;
mod catalog;
mod config;
mod dashboard;
mod data;
mod embed;
mod error;
mod logging;
mod output;
mod preview;
mod responder;
mod template;
mod timer;
mod tui;
mod wizard;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use crate::auth::{AccountType, LoginForm, Notification, SignIn, SignupForm, Variant};
use crate::config::Settings;
use crate::data::{BusinessInfo, DataLibrary, Faq, UploadStatus, Uploader};
use crate::error::{AuthError, Error};
use crate::template::{Template, TemplateSelection};

#[derive(Parser, Debug)]
#[command(name = "chatforge")]
#[command(about = "Build a chatbot in the terminal and try it before you embed it")]
#[command(version)]
struct Args {
    /// Settings file (defaults to the usual search path)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where to write the log
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the chatbot creation wizard (default)
    Create {
        /// Also write the finished form as JSON
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Sign in and show the dashboard for the account
    Login {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Create an account and show its dashboard
    Signup {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
        #[arg(long, default_value = "business")]
        account_type: AccountType,
    },
    /// Ask the preview responder a single question
    Ask {
        /// Active template, repeatable (sales-assistant, customer-support, lead-generation, general-assistant)
        #[arg(short = 't', long = "template")]
        templates: Vec<String>,
        text: String,
    },
    /// Print the embed snippet for a chatbot name
    Snippet { name: String },
    /// Manage the data sources chatbots are trained on
    Data {
        /// Upload documents (simulated) and add them as file sources
        #[arg(long, value_name = "FILE")]
        upload: Vec<PathBuf>,
        /// Save business information for this company
        #[arg(long)]
        company: Option<String>,
        /// Add a question and its answer to the FAQ source, repeatable
        #[arg(long, num_args = 2, value_names = ["QUESTION", "ANSWER"])]
        faq: Vec<String>,
    },
}

fn main() {
    let args = Args::parse();

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(logging::default_log_path);
    if let Err(e) = logging::init(&log_path) {
        eprintln!("Warning: logging disabled ({}): {}", log_path.display(), e);
    }

    if let Err(e) = run(args) {
        error!(error = %e, "exiting with error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let settings = Settings::load(args.config.as_deref())?;

    match args.command.unwrap_or(Command::Create { export: None }) {
        Command::Create { export } => create(settings, export.as_deref()),
        Command::Login { email, password } => {
            let form = LoginForm { email, password };
            auth::simulate_round_trip(settings.timing.sign_in_delay());
            let result = auth::login(&form);
            notify(&Notification::for_login(&result));
            show_dashboard(result)
        }
        Command::Signup {
            name,
            email,
            password,
            account_type,
        } => {
            let form = SignupForm {
                name,
                email,
                password,
                account_type,
            };
            auth::simulate_round_trip(settings.timing.sign_in_delay());
            let result = auth::signup(&form);
            notify(&Notification::for_signup(&result));
            show_dashboard(result)
        }
        Command::Ask { templates, text } => {
            let mut selection = templates
                .iter()
                .map(|t| t.parse::<Template>())
                .collect::<Result<TemplateSelection, _>>()?;
            if selection.is_empty() {
                selection.toggle(Template::GeneralAssistant);
            }
            let reply = responder::respond(&text, &selection);
            println!("{}", reply.message);
            let catalog = catalog::Catalog::sample();
            if let Some(product) = reply.product.and_then(|id| catalog.get(id)) {
                println!(
                    "  ▸ {}  {}{}",
                    product.name,
                    cart::money(product.price),
                    if product.in_stock { "" } else { "  (out of stock)" }
                );
            }
            Ok(())
        }
        Command::Snippet { name } => {
            let issued_at = chrono::Utc::now().timestamp_millis();
            println!("{}", embed::snippet(&name, issued_at));
            Ok(())
        }
        Command::Data {
            upload,
            company,
            faq,
        } => manage_data(&settings, &upload, company, &faq),
    }
}

fn manage_data(
    settings: &Settings,
    uploads: &[PathBuf],
    company: Option<String>,
    faq: &[String],
) -> Result<(), Error> {
    let today = chrono::Local::now().date_naive();
    let mut library = DataLibrary::sample();

    if let Some(company_name) = company {
        let info = BusinessInfo {
            company_name,
            ..BusinessInfo::default()
        };
        library.save_business_info(&info, today)?;
    }
    if !faq.is_empty() {
        let faqs: Vec<Faq> = faq
            .chunks(2)
            .map(|pair| Faq {
                question: pair[0].clone(),
                answer: pair.get(1).cloned().unwrap_or_default(),
            })
            .collect();
        library.save_faqs(&faqs, today)?;
    }

    if !uploads.is_empty() {
        let mut uploader = Uploader::new(settings.timing.upload_step());
        let now = Instant::now();
        for path in uploads {
            let size = fs::metadata(path)?.len();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            uploader.add(&name, size, now);
        }
        while let Some(deadline) = uploader.next_deadline() {
            std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
            uploader.tick(Instant::now());
            let progress: Vec<String> = uploader
                .files()
                .iter()
                .map(|f| format!("{} {}%", f.name, f.progress))
                .collect();
            eprint!("\rUploading: {}", progress.join(", "));
        }
        eprintln!();
        for file in uploader.files() {
            let outcome = match file.status {
                UploadStatus::Complete => "complete",
                UploadStatus::Uploading => "uploading",
                UploadStatus::Error => "error: larger than 10MB",
            };
            eprintln!("  {} ({}) {}", file.name, data::format_size(file.size), outcome);
        }
        let added = uploader.process(&mut library, today);
        info!(added, "uploads processed");
    }

    println!(
        "Data Sources ({} entries)\n{}",
        library.total_entries(),
        data::render_sources(library.sources())
    );
    Ok(())
}

fn notify(toast: &Notification) {
    match toast.variant {
        Variant::Success => println!("{}", toast),
        Variant::Destructive => eprintln!("{}", toast),
    }
}

fn show_dashboard(result: Result<SignIn, AuthError>) -> Result<(), Error> {
    let sign_in = result?;
    info!(route = %sign_in.route, "redirecting");
    println!();
    println!("{}", dashboard::render(sign_in.route));
    Ok(())
}

fn create(settings: Settings, export: Option<&Path>) -> Result<(), Error> {
    let Some(deployment) = tui::run(settings)? else {
        info!("wizard closed without deploying");
        return Ok(());
    };

    if let Some(path) = export {
        let json = serde_json::to_string_pretty(&deployment.form)?;
        fs::write(path, json)?;
        eprintln!("Chatbot settings written to {}", path.display());
    }

    output::handle_output(&deployment.snippet, deployment.mode)
}
