use std::path::{Path, PathBuf};
use std::sync::Arc;

use campus::api::ApiError;
use campus::api::transport::TransportError;
use campus::config::{ClientConfig, ConfigError};
use campus::context::AppContext;
use campus::guard::NavigationOutcome;
use campus::nav::TracingNavigator;
use campus::services::courses::NewCourse;
use campus::services::schedules::NewScheduleEntry;
use campus::services::users::{ImageUpload, Registration};
use campus::session::{Credentials, LoginError};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Transport(#[from] TransportError),
    #[error("login failed: {0}")]
    Login(#[from] LoginError),
    #[error("{}", .0.message())]
    Api(#[from] ApiError),
    #[error("not logged in; run `campus login` first")]
    NotLoggedIn,
    #[error("could not read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "campus", about = "University course-management client")]
struct Cli {
    /// Overrides `CAMPUS_API_BASE_URL` for this invocation.
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long, env = "CAMPUS_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long, env = "CAMPUS_USERNAME")]
        username: String,
        #[arg(long, env = "CAMPUS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    /// Run the navigation guard against `path` for the stored session.
    Navigate {
        path: String,
    },
    Courses(CoursesCommand),
    Users(UsersCommand),
    Profile(ProfileCommand),
    Enroll(EnrollCommand),
    Schedule(ScheduleCommand),
}

#[derive(Args, Debug)]
struct CoursesCommand {
    #[command(subcommand)]
    command: CoursesSubcommand,
}

#[derive(Subcommand, Debug)]
enum CoursesSubcommand {
    List,
    Teacher {
        teacher_id: String,
    },
    Student {
        student_id: String,
    },
    Common {
        #[arg(required = true)]
        student_ids: Vec<String>,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        credits: i64,
        #[arg(long)]
        department_code: String,
        #[arg(long)]
        semester: String,
        #[arg(long)]
        teacher_id: Option<String>,
    },
    Delete {
        course_id: String,
    },
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    Departments,
    Teachers {
        department: String,
        #[arg(default_value = "")]
        query: String,
    },
    Students {
        department: String,
        #[arg(default_value = "")]
        query: String,
    },
    ByYear {
        year: String,
        department: String,
    },
    AllStudents,
    Stats,
    Register(RegisterArgs),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    role: String,
    #[arg(long)]
    department_code: String,
    #[arg(long, help = "YYYY-MM-DD")]
    date_of_enrollment: String,
    #[arg(long, help = "Profile image to upload")]
    image: PathBuf,
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Show,
    Image,
}

#[derive(Args, Debug)]
struct EnrollCommand {
    #[command(subcommand)]
    command: EnrollSubcommand,
}

#[derive(Subcommand, Debug)]
enum EnrollSubcommand {
    One {
        course_id: String,
        student_id: String,
    },
    Bulk {
        course_id: String,
        #[arg(required = true)]
        student_ids: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct ScheduleCommand {
    #[command(subcommand)]
    command: ScheduleSubcommand,
}

#[derive(Args, Debug, Clone)]
struct Term {
    #[arg(long)]
    academic_year: i32,
    #[arg(long)]
    semester: String,
}

#[derive(Subcommand, Debug)]
enum ScheduleSubcommand {
    Teacher {
        teacher_id: String,
        #[command(flatten)]
        term: Term,
    },
    Student {
        student_id: String,
        #[command(flatten)]
        term: Term,
    },
    Group {
        group_code: String,
        #[command(flatten)]
        term: Term,
    },
    UpdateGroup {
        group_code: String,
        #[command(flatten)]
        term: Term,
        #[arg(long, help = "JSON array of schedule entries")]
        data: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url.trim().trim_end_matches('/').to_owned();
    }
    if let Some(session_file) = cli.session_file {
        config.session_file = session_file;
    }
    let ctx = AppContext::from_config(config, Arc::new(TracingNavigator))?;

    match cli.command {
        Command::Login { username, password } => {
            let session = ctx.session.login(&Credentials::new(username, password)).await?;
            print_json(&serde_json::json!({
                "role": session.role().map(ToString::to_string),
                "user_id": session.user_id(),
            }))
        }
        Command::Logout => {
            ctx.session.logout();
            println!("logged out");
            Ok(())
        }
        Command::Whoami => run_whoami(&ctx),
        Command::Navigate { path } => {
            let outcome = match ctx.guard.navigate(&path) {
                NavigationOutcome::Arrived(path) => serde_json::json!({ "outcome": "arrived", "path": path }),
                NavigationOutcome::Redirected(path) => serde_json::json!({ "outcome": "redirected", "path": path }),
                NavigationOutcome::Denied => serde_json::json!({ "outcome": "denied" }),
            };
            print_json(&outcome)
        }
        Command::Courses(cmd) => run_courses(&ctx, cmd).await,
        Command::Users(cmd) => run_users(&ctx, cmd).await,
        Command::Profile(cmd) => run_profile(&ctx, cmd).await,
        Command::Enroll(cmd) => run_enroll(&ctx, cmd).await,
        Command::Schedule(cmd) => run_schedule(&ctx, cmd).await,
    }
}

fn run_whoami(ctx: &AppContext) -> Result<(), CliError> {
    let claims = ctx.session.claims().ok_or(CliError::NotLoggedIn)?;
    print_json(&serde_json::json!({
        "role": claims.role.as_str(),
        "id": claims.id,
        "exp": claims.exp,
    }))
}

async fn run_courses(ctx: &AppContext, cmd: CoursesCommand) -> Result<(), CliError> {
    match cmd.command {
        CoursesSubcommand::List => print_json(&ctx.courses.all().await?),
        CoursesSubcommand::Teacher { teacher_id } => print_json(&ctx.courses.for_teacher(&teacher_id).await?),
        CoursesSubcommand::Student { student_id } => print_json(&ctx.courses.for_student(&student_id).await?),
        CoursesSubcommand::Common { student_ids } => print_json(&ctx.courses.common(&student_ids).await?),
        CoursesSubcommand::Create {
            name,
            credits,
            department_code,
            semester,
            teacher_id,
        } => {
            let course = NewCourse {
                name,
                credits,
                department_code,
                semester,
                teacher_id,
            };
            print_json(&ctx.courses.create(&course).await?)
        }
        CoursesSubcommand::Delete { course_id } => {
            ctx.courses.delete(&course_id).await?;
            println!("deleted {course_id}");
            Ok(())
        }
    }
}

async fn run_users(ctx: &AppContext, cmd: UsersCommand) -> Result<(), CliError> {
    match cmd.command {
        UsersSubcommand::Departments => print_json(&ctx.users.departments().await?),
        UsersSubcommand::Teachers { department, query } => {
            print_json(&ctx.users.search_teachers(&department, &query).await?)
        }
        UsersSubcommand::Students { department, query } => {
            print_json(&ctx.users.search_students(&department, &query).await?)
        }
        UsersSubcommand::ByYear { year, department } => {
            print_json(&ctx.users.students_by_year(&year, &department).await?)
        }
        UsersSubcommand::AllStudents => print_json(&ctx.users.all_students().await),
        UsersSubcommand::Stats => print_json(&ctx.users.stats().await?),
        UsersSubcommand::Register(args) => {
            let image = read_image(&args.image).await?;
            let registration = Registration {
                email: args.email,
                full_name: args.full_name,
                role: args.role,
                department_code: args.department_code,
                date_of_enrollment: args.date_of_enrollment,
                image,
            };
            print_json(&ctx.users.register(registration.into_form()).await?)
        }
    }
}

async fn run_profile(ctx: &AppContext, cmd: ProfileCommand) -> Result<(), CliError> {
    match cmd.command {
        ProfileSubcommand::Show => print_json(&ctx.profile.profile().await?),
        ProfileSubcommand::Image => {
            println!("{}", ctx.profile.image().await);
            Ok(())
        }
    }
}

async fn run_enroll(ctx: &AppContext, cmd: EnrollCommand) -> Result<(), CliError> {
    match cmd.command {
        EnrollSubcommand::One { course_id, student_id } => {
            print_json(&ctx.enrollments.enroll(&course_id, &student_id).await)
        }
        EnrollSubcommand::Bulk { course_id, student_ids } => {
            print_json(&ctx.enrollments.bulk_enroll(&course_id, &student_ids).await)
        }
    }
}

async fn run_schedule(ctx: &AppContext, cmd: ScheduleCommand) -> Result<(), CliError> {
    match cmd.command {
        ScheduleSubcommand::Teacher { teacher_id, term } => print_json(
            &ctx.schedules
                .for_teacher(&teacher_id, term.academic_year, &term.semester)
                .await?,
        ),
        ScheduleSubcommand::Student { student_id, term } => print_json(
            &ctx.schedules
                .for_student(&student_id, term.academic_year, &term.semester)
                .await?,
        ),
        ScheduleSubcommand::Group { group_code, term } => print_json(
            &ctx.schedules
                .for_group(&group_code, term.academic_year, &term.semester)
                .await?,
        ),
        ScheduleSubcommand::UpdateGroup { group_code, term, data } => {
            let entries = serde_json::from_str::<Vec<NewScheduleEntry>>(&data)?;
            print_json(
                &ctx.schedules
                    .update_group(&group_code, &entries, term.academic_year, &term.semester)
                    .await?,
            )
        }
    }
}

async fn read_image(path: &Path) -> Result<ImageUpload, CliError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let content_type = match extension.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    };
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_owned();
    Ok(ImageUpload {
        file_name,
        content_type: content_type.to_owned(),
        bytes,
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
