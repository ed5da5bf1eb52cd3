use course_admin::cli::{Args, Command};
use course_admin::database::Database;
use course_admin::database_factory::{StoreConfig, StoreFactory};
use course_admin::report_format::ReportFormatter;
use course_admin::views::{DashboardSource, DashboardView};
use course_admin::{demo, maintenance};
use log::debug;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse_args();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = StoreConfig::from_args(args)?;
    debug!("Store configuration: {:?}", config);
    let db = StoreFactory::create(config)?;

    match &args.command {
        Command::Report => print_report(&db, args)?,
        Command::SeedDemo => {
            let summary = demo::seed_demo(&db)?;
            if summary.skipped {
                println!("Store already contains courses; nothing seeded.");
            } else {
                println!(
                    "Seeded {} courses, {} modules, {} lessons, {} quizzes, {} assessments, {} users, {} feedback entries.",
                    summary.courses,
                    summary.modules,
                    summary.lessons,
                    summary.quizzes,
                    summary.assessments,
                    summary.users,
                    summary.feedback
                );
            }
            // In-memory runs would otherwise discard the data unseen
            if args.test {
                print_report(&db, args)?;
            }
        }
        Command::BackfillModuleCounts => {
            println!("Module counts: {}", maintenance::backfill_module_counts(&db)?);
        }
        Command::BackfillDailyProblems => {
            println!(
                "Daily problem defaults: {}",
                maintenance::backfill_daily_problem_defaults(&db)?
            );
        }
        Command::NormalizeFeedback => {
            println!("Feedback statuses: {}", maintenance::normalize_feedback_status(&db)?);
        }
        Command::AssignRole { email, role } => {
            let user_id = maintenance::assign_role(&db, email, *role)?;
            println!("User {} ({}) is now {}", user_id, email, role);
        }
    }
    Ok(())
}

fn print_report(db: &Database, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let view = DashboardView::new(db.clone(), DashboardSource { seed: args.seed });
    if let Some(error) = view.error() {
        return Err(error.into());
    }
    let formatter = ReportFormatter::new(!args.no_color);
    print!("{}", formatter.render(view.data()));
    Ok(())
}
