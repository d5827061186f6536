//! CLI entry point for cohort-view.
//!
//! Loads a JSON dataset into the in-memory backend and drives the curated
//! cohort and search view models from the command line.
//!
//! # Usage
//!
//! ```bash
//! cohort-view [OPTIONS] <COMMAND>
//!
//! # List the current user's curated groups
//! cohort-view --data demos/dataset.json groups
//!
//! # Show a group in the matrix tab, sorted by GPA
//! cohort-view show 1 --query 'v=matrix&o=gpa'
//!
//! # Search by name or SID prefix
//! cohort-view --department UWASC search "ann" --order-by level
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use cv_api::memory::Dataset;
use cv_api::{CuratedGroupApi, ErrorMessage, MemoryBackend, MemoryStore};
use cv_core::{
    Config, CurrentUser, DepartmentMembership, GroupId, Pagination, SortKey, Student,
};
use cv_view::{
    CuratedCohortView, CuratedMsg, Driver, Location, ORDER_PARAM, PHRASE_PARAM,
    ScatterplotPartitioner, SearchMsg, SearchView, Tab,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

type Api = CuratedGroupApi<MemoryBackend, MemoryStore>;
type MemoryDriver = Driver<MemoryBackend, MemoryStore, ScatterplotPartitioner>;

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Browse curated cohorts and student search results.
#[derive(Parser)]
#[command(name = "cohort-view", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// JSON dataset loaded into the in-memory backend.
    #[arg(short, long, global = true, env = "COHORT_VIEW_DATA", default_value = "demos/dataset.json")]
    data: Utf8PathBuf,

    /// Optional JSON configuration file.
    #[arg(short, long, global = true, env = "COHORT_VIEW_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// UID of the current user. Defaults to the dataset's first user.
    #[arg(short, long, global = true, env = "COHORT_VIEW_UID")]
    uid: Option<String>,

    /// Department the current user belongs to (repeatable).
    #[arg(long = "department", global = true)]
    departments: Vec<String>,

    /// Treat the current user as an admin.
    #[arg(long, global = true)]
    admin: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List the current user's curated groups.
    Groups,

    /// Show one curated group.
    Show {
        /// Curated group id.
        id: String,

        /// URL query string to restore, e.g. `v=matrix&o=gpa`.
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// Search students by name or SID prefix.
    Search {
        /// Search phrase.
        phrase: String,

        /// Sort key (`first_name`, `last_name`, `group_name`, `gpa`, `level`, `major`, `units`).
        #[arg(short, long, value_parser = parse_sort_key)]
        order_by: Option<SortKey>,

        /// Zero-based results page.
        #[arg(short, long, default_value_t = 0)]
        page: usize,
    },

    /// Remove a student from a curated group.
    Remove {
        /// Curated group id.
        id: String,

        /// SID of the student to remove.
        sid: String,
    },

    /// Export a curated group as CSV.
    Export {
        /// Curated group id.
        id: GroupId,

        /// Output file or directory (defaults to stdout).
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },
}

fn parse_sort_key(value: &str) -> Result<SortKey, String> {
    SortKey::parse(value).ok_or_else(|| format!("unknown sort key: {value}"))
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects `RUST_LOG` if set. Otherwise uses `debug` with `--verbose`, or
/// `info` by default.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},tokio=warn"))
    });

    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Everything a command needs: configuration, the current user, and the API.
struct Session {
    config: Config,
    user: CurrentUser,
    api: Api,
}

impl Session {
    /// Loads the configuration and dataset named on the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if either file is missing or malformed.
    fn open(cli: &Cli) -> color_eyre::Result<Self> {
        let config = match &cli.config {
            Some(path) => Config::load(path).wrap_err_with(|| format!("loading {path}"))?,
            None => Config::default(),
        };

        if !cli.data.is_file() {
            return Err(eyre!("Dataset does not exist: {}", cli.data));
        }
        let raw = std::fs::read_to_string(cli.data.as_std_path())?;
        let dataset =
            Dataset::from_json(&raw).wrap_err_with(|| format!("parsing {}", cli.data))?;

        let uid = match &cli.uid {
            Some(uid) => uid.clone(),
            None => dataset
                .users
                .first()
                .map(|user| user.uid.clone())
                .ok_or_else(|| eyre!("No --uid given and the dataset has no users"))?,
        };
        let user = CurrentUser {
            uid: uid.clone(),
            is_admin: cli.admin,
            departments: cli
                .departments
                .iter()
                .map(|code| DepartmentMembership {
                    code: code.clone(),
                    is_advisor: true,
                    is_director: false,
                })
                .collect(),
        };
        info!(%uid, data = %cli.data, "opened dataset");

        let backend = Arc::new(MemoryBackend::new(dataset, uid));
        let api = CuratedGroupApi::new(backend, Arc::new(MemoryStore::default()), config.export.clone());
        Ok(Self { config, user, api })
    }

    fn driver(&self) -> MemoryDriver {
        Driver::new(self.api.clone(), Arc::new(ScatterplotPartitioner))
    }

    fn curated_view(&self, raw_id: &str, query: &str) -> color_eyre::Result<CuratedCohortView> {
        let href = if query.is_empty() {
            format!("/cohort/curated/{raw_id}")
        } else {
            format!("/cohort/curated/{raw_id}?{query}")
        };
        Ok(CuratedCohortView::from_route(
            raw_id,
            Location::parse(&href),
            self.config.curated.clone(),
            &self.user,
            &self.config.search.privileged_department,
        )?)
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Lists the current user's groups.
async fn run_groups(session: &Session) -> color_eyre::Result<()> {
    let Some(groups) = session.api.my_groups().await? else {
        warn!("group list unavailable");
        return Ok(());
    };

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{:>6}  {:<32}  {:>8}", "ID", "NAME", "STUDENTS")?;
    for group in &groups {
        writeln!(handle, "{:>6}  {:<32}  {:>8}", group.id, group.name, group.student_count)?;
    }
    Ok(())
}

/// Loads a group into the curated view and prints it.
async fn run_show(session: &Session, raw_id: &str, query: &str) -> color_eyre::Result<()> {
    let mut view = session.curated_view(raw_id, query)?;
    let mut driver = session.driver();
    let effects = view.update(CuratedMsg::Init);
    driver.run(&mut view, effects).await?;

    print_curated(&view)
}

/// Removes one student through the curated view.
async fn run_remove(session: &Session, raw_id: &str, sid: &str) -> color_eyre::Result<()> {
    let mut view = session.curated_view(raw_id, "")?;
    let mut driver = session.driver();
    let effects = view.update(CuratedMsg::Init);
    driver.run(&mut view, effects).await?;
    if let Some(error) = view.error() {
        return Err(eyre!("{}", error));
    }
    if view.group().is_some_and(|group| !group.contains(sid)) {
        return Err(eyre!("Student {sid} is not in this group"));
    }

    let effects = view.update(CuratedMsg::Remove(sid.to_owned()));
    driver.run(&mut view, effects).await?;
    info!(%sid, "removed student");
    print_curated(&view)
}

/// Runs a search through the search view.
async fn run_search(
    session: &Session,
    phrase: &str,
    order_by: Option<SortKey>,
    page: usize,
) -> color_eyre::Result<()> {
    let mut location = Location::new("/search");
    location.set(PHRASE_PARAM, phrase);
    if let Some(key) = order_by {
        location.set(ORDER_PARAM, key.as_str());
    }
    let mut view = SearchView::new(location, session.config.search.clone(), &session.user);
    if order_by.is_some_and(|key| !view.sort().offers(key)) {
        warn!("sort key not offered to this user; using {}", view.sort().selected());
    }

    let mut driver = session.driver();
    let msg = if page == 0 {
        SearchMsg::Init
    } else {
        SearchMsg::GoToPage(page)
    };
    let effects = view.update(msg);
    driver.run(&mut view, effects).await?;

    if let Some(error) = view.error() {
        return Err(eyre!("{}", error));
    }
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    let total = view.results().map_or(0, |results| results.total_student_count);
    writeln!(
        handle,
        "{total} result(s), page {} of {}, sorted by {}",
        view.current_page().page_index() + 1,
        view.page_count().max(1),
        view.sort().selected().label(),
    )?;
    writeln!(handle)?;
    print_students(&mut handle, &view.displayed())?;
    Ok(())
}

/// Exports a group as CSV to a file or stdout.
async fn run_export(session: &Session, id: GroupId, output: Option<Utf8PathBuf>) -> color_eyre::Result<()> {
    let group = session
        .api
        .get_group(id, SortKey::FirstName, Pagination::first(1))
        .await
        .map_err(|error| eyre!("{}", ErrorMessage::parse(&error)))?;
    let Some(export) = session.api.download_csv(id, &group.name).await? else {
        return Err(eyre!("Export of group {id} is unavailable"));
    };

    match output {
        Some(path) => {
            let path = if path.is_dir() { path.join(&export.file_name) } else { path };
            std::fs::write(path.as_std_path(), &export.contents)?;
            info!(%path, "export written");
        }
        None => {
            info!(file_name = %export.file_name, "export");
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write!(handle, "{}", export.contents)?;
        }
    }
    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Prints the curated view: title, tab, sort, and the active tab's contents.
fn print_curated(view: &CuratedCohortView) -> color_eyre::Result<()> {
    if let Some(error) = view.error() {
        return Err(eyre!("{}", error));
    }
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let title = view.page_title().unwrap_or_default();
    writeln!(handle, "{title}")?;
    writeln!(handle, "{}", "=".repeat(title.len()))?;
    writeln!(
        handle,
        "{} student(s), {} tab, sorted by {}  ({})",
        view.group().map_or(0, |group| group.student_count),
        view.tab(),
        view.sort().selected().label(),
        view.location().href(),
    )?;
    writeln!(handle)?;

    match view.tab() {
        Tab::List => print_students(&mut handle, &view.displayed())?,
        Tab::Matrix => {
            if let Some(plot) = view.plot() {
                let excluded: Vec<&Student> = plot.excluded.iter().collect();
                writeln!(handle, "Plotted by {}. Missing data:", plot.measure)?;
                print_students(&mut handle, &excluded)?;
            } else {
                writeln!(handle, "Matrix not rendered.")?;
            }
        }
    }
    Ok(())
}

fn print_students(handle: &mut impl Write, students: &[&Student]) -> std::io::Result<()> {
    writeln!(
        handle,
        "{:<10}  {:<28}  {:<10}  {:>6}  {:>6}  {}",
        "SID", "NAME", "LEVEL", "GPA", "UNITS", "MAJOR"
    )?;
    for student in students {
        writeln!(
            handle,
            "{:<10}  {:<28}  {:<10}  {:>6}  {:>6}  {}",
            student.sid,
            student.sortable_name(),
            student.level.description().unwrap_or("-"),
            student.cumulative_gpa.map_or_else(|| "-".to_owned(), |gpa| format!("{gpa:.3}")),
            student.cumulative_units.map_or_else(|| "-".to_owned(), |units| format!("{units}")),
            student.first_major().unwrap_or("-"),
        )?;
    }
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color);

    let session = Session::open(&cli)?;
    match &cli.command {
        Commands::Groups => run_groups(&session).await,
        Commands::Show { id, query } => run_show(&session, id, query).await,
        Commands::Search {
            phrase,
            order_by,
            page,
        } => run_search(&session, phrase, *order_by, *page).await,
        Commands::Remove { id, sid } => run_remove(&session, id, sid).await,
        Commands::Export { id, output } => run_export(&session, *id, output.clone()).await,
    }
}
