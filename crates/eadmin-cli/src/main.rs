use clap::{Parser, Subcommand};
use dialoguer::{Input, Password, Select};
use dotenvy::dotenv;

use eadmin_auth::Role;
use eadmin_cli::admin::create_admin;
use eadmin_cli::seeder::{SeedConfig, clear_seeded_data, seed_database};
use eadmin_db::init_db_pool;

#[derive(Parser)]
#[command(name = "eadmin-cli")]
#[command(about = "eAdministration CLI - account provisioning and seeding", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a faculty or employment office administrator
    CreateAdmin {
        /// Full name of the administrator
        #[arg(short = 'n', long)]
        fullname: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// facultyadmin or sszadmin
        #[arg(short = 'r', long)]
        role: Option<String>,
    },
    /// Seed the database with fake accounts, a program and its courses
    Seed {
        #[arg(long, default_value = "5")]
        professors: usize,

        #[arg(long, default_value = "50")]
        students: usize,

        #[arg(long, default_value = "20")]
        candidates: usize,

        #[arg(long, default_value = "5")]
        employees: usize,

        #[arg(long, default_value = "40")]
        courses: usize,

        /// ECTS required to graduate
        #[arg(long, default_value = "240")]
        program_ects: i32,
    },
    /// Clear all seeded data (keeps manually created accounts)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("❌ DATABASE_URL must be set");
            std::process::exit(1);
        }
    };

    let pool = match init_db_pool(&database_url, 5).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::CreateAdmin {
            fullname,
            email,
            password,
            role,
        } => handle_create_admin(&pool, fullname, email, password, role).await,
        Commands::Seed {
            professors,
            students,
            candidates,
            employees,
            courses,
            program_ects,
        } => {
            let config = SeedConfig {
                professors,
                students,
                candidates,
                employees,
                courses,
                program_ects,
            };
            if let Err(e) = seed_database(&pool, config).await {
                eprintln!("\n❌ Error seeding database: {}", e);
                std::process::exit(1);
            }
        }
        Commands::ClearSeed => {
            if let Err(e) = clear_seeded_data(&pool).await {
                eprintln!("\n❌ Error clearing seeded data: {}", e);
                std::process::exit(1);
            }
        }
    }
}

async fn handle_create_admin(
    pool: &sqlx::PgPool,
    fullname: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: Option<String>,
) {
    let role = match role {
        Some(raw) => match raw.parse::<Role>() {
            Ok(role) if role.is_admin() => role,
            _ => {
                eprintln!("❌ Role must be facultyadmin or sszadmin");
                std::process::exit(1);
            }
        },
        None => prompt_or_exit(prompt_admin_role()),
    };

    let fullname = match fullname {
        Some(v) => v,
        None => prompt_or_exit(Input::new().with_prompt("Full name").interact_text()),
    };

    let email = match email {
        Some(v) => v,
        None => prompt_or_exit(Input::new().with_prompt("Email address").interact_text()),
    };

    let password = match password {
        Some(v) => v,
        None => prompt_or_exit(
            Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords don't match")
                .interact(),
        ),
    };

    match create_admin(pool, &fullname, &email, &password, role).await {
        Ok(id) => {
            println!("\n✅ Administrator created successfully!");
            println!("   Id: {}", id);
            println!("   Email: {}", email.trim().to_lowercase());
            println!("   Role: {}", role);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating administrator: {}", e);
            std::process::exit(1);
        }
    }
}

fn prompt_admin_role() -> Result<Role, dialoguer::Error> {
    let roles = [Role::FacultyAdmin, Role::SszAdmin];
    let labels = ["facultyadmin (university)", "sszadmin (employment office)"];

    let idx = Select::new()
        .with_prompt("Role")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(roles[idx])
}

fn prompt_or_exit<T>(result: Result<T, dialoguer::Error>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("❌ Failed to read input: {}", e);
            std::process::exit(1);
        }
    }
}
