//! Demo data seeding.
//!
//! Everything runs inside a single transaction. Departments, roles and
//! projects are looked up by their natural keys before insert, so running
//! the seeder repeatedly only ever adds employees and their activity.

use crate::db::{recompute_headcount_with, DbClient};
use crate::error::{ApiError, ApiResult};
use chrono::{Days, NaiveDate, Utc};
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use hrm_core::{new_entity_id, AttendanceStatus, Date, EntityId};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::collections::HashSet;
use tokio_postgres::Transaction;

/// Number of employees created when no count is given.
pub const DEFAULT_EMPLOYEES: usize = 5;

/// Days of attendance written per seeded employee, ending today.
pub const ATTENDANCE_DAYS: u64 = 30;

/// Reviews written per seeded employee.
pub const REVIEWS_PER_EMPLOYEE: u64 = 2;

const EMAIL_DOMAIN: &str = "example.com";

/// `(code, name)`
pub const DEPARTMENTS: [(&str, &str); 3] = [
    ("ENG", "Engineering"),
    ("HR", "Human Resources"),
    ("FIN", "Finance"),
];

/// Role catalog: title, level and salary band in whole currency units.
pub const ROLES: [RoleDef; 4] = [
    RoleDef { title: "Software Engineer", level: "L1", band_min: 50_000, band_max: 80_000 },
    RoleDef { title: "Software Engineer", level: "L2", band_min: 80_000, band_max: 120_000 },
    RoleDef { title: "Manager", level: "M1", band_min: 90_000, band_max: 140_000 },
    RoleDef { title: "HR Generalist", level: "L1", band_min: 40_000, band_max: 70_000 },
];

const PROJECT_COUNT: usize = 3;

const PROJECT_ROLES: [&str; 4] = ["Developer", "QA", "Lead", "Analyst"];

const ALLOCATIONS: [i64; 3] = [50, 75, 100];

/// Present is three times as likely as any other status.
const STATUS_WEIGHTS: [AttendanceStatus; 6] = [
    AttendanceStatus::Present,
    AttendanceStatus::Present,
    AttendanceStatus::Present,
    AttendanceStatus::Remote,
    AttendanceStatus::Leave,
    AttendanceStatus::Absent,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleDef {
    pub title: &'static str,
    pub level: &'static str,
    pub band_min: i64,
    pub band_max: i64,
}

/// Seeding parameters, usually taken from the `seed-demo` command line.
#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub employees: usize,
    /// Fixed RNG seed for reproducible data.
    pub rng_seed: Option<u64>,
    /// Reference day for hire dates, attendance and review periods.
    pub today: Date,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            employees: DEFAULT_EMPLOYEES,
            rng_seed: None,
            today: Utc::now().date_naive(),
        }
    }
}

/// Counts of what a seeding run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub departments_created: usize,
    pub roles_created: usize,
    pub projects_created: usize,
    pub employees_created: usize,
    pub assignments_created: usize,
    pub attendance_written: usize,
    pub reviews_written: usize,
}

/// Seed the database with demo records.
pub async fn seed_demo(db: &DbClient, options: &SeedOptions) -> ApiResult<SeedReport> {
    let mut rng = match options.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let today = options.today;
    let mut report = SeedReport::default();

    let mut conn = db.get_conn().await?;
    let tx = conn.transaction().await?;

    let mut departments = Vec::with_capacity(DEPARTMENTS.len());
    for (code, name) in DEPARTMENTS {
        let budget = Decimal::from(rng.random_range(100_000i64..=1_000_000));
        let (id, created) = department_get_or_create(&tx, code, name, budget).await?;
        report.departments_created += usize::from(created);
        departments.push(id);
    }

    let mut roles = Vec::with_capacity(ROLES.len());
    for def in ROLES {
        let (id, created) = role_get_or_create(&tx, &def).await?;
        report.roles_created += usize::from(created);
        roles.push((id, def));
    }

    let mut projects = Vec::with_capacity(PROJECT_COUNT);
    for n in 1..=PROJECT_COUNT {
        let department_id = *pick(&mut rng, &departments)?;
        let start = days_before(today, rng.random_range(30..=180));
        let budget = Decimal::from(rng.random_range(20_000i64..=200_000));
        let (id, created) = project_get_or_create(&tx, n, department_id, start, budget).await?;
        report.projects_created += usize::from(created);
        projects.push(id);
    }

    let mut taken_emails = existing_emails(&tx).await?;
    let mut hired = Vec::with_capacity(options.employees);
    for _ in 0..options.employees {
        let (first, last) = person_name(&mut rng);
        let email = unique_email(&first, &last, &taken_emails);
        taken_emails.insert(email.clone());

        let department_id = *pick(&mut rng, &departments)?;
        let (role_id, def) = *pick(&mut rng, &roles)?;
        let hire_date = days_before(today, rng.random_range(100..=2000));
        let salary = Decimal::from(rng.random_range(def.band_min..=def.band_max));

        let id = new_entity_id();
        tx.execute(
            "INSERT INTO employees (id, first_name, last_name, email, hire_date, \
             department_id, role_id, base_salary, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE)",
            &[&id, &first, &last, &email, &hire_date, &department_id, &role_id, &salary],
        )
        .await?;
        tracing::debug!(employee_id = %id, %email, "Seeded employee");
        hired.push((id, hire_date));
    }
    report.employees_created = hired.len();

    let updated = recompute_headcount_with(&*tx).await?;
    tracing::debug!(updated, "Refreshed department headcount");

    for (employee_id, hire_date) in hired {
        let project_id = *pick(&mut rng, &projects)?;
        let start = hire_date
            .checked_add_days(Days::new(rng.random_range(0..=30)))
            .unwrap_or(hire_date);
        let role_on_project = *pick(&mut rng, &PROJECT_ROLES)?;
        let allocation = Decimal::from(*pick(&mut rng, &ALLOCATIONS)?);
        let created = tx
            .execute(
                "INSERT INTO assignments (id, employee_id, project_id, role_on_project, \
                 start_date, allocation_percent) VALUES ($1, $2, $3, $4, $5, $6) \
                 ON CONFLICT (employee_id, project_id, start_date) DO NOTHING",
                &[&new_entity_id(), &employee_id, &project_id, &role_on_project, &start, &allocation],
            )
            .await?;
        report.assignments_created += created as usize;

        for offset in 0..ATTENDANCE_DAYS {
            let date = days_before(today, offset);
            let status = *pick(&mut rng, &STATUS_WEIGHTS)?;
            let hours = hours_for(status, &mut rng);
            report.attendance_written += tx
                .execute(
                    "INSERT INTO attendance (id, employee_id, date, status, hours_worked) \
                     VALUES ($1, $2, $3, $4, $5) \
                     ON CONFLICT (employee_id, date) \
                     DO UPDATE SET status = EXCLUDED.status, hours_worked = EXCLUDED.hours_worked",
                    &[&new_entity_id(), &employee_id, &date, &status.as_db_str(), &hours],
                )
                .await? as usize;
        }

        for j in 0..REVIEWS_PER_EMPLOYEE {
            let (period_start, period_end) = review_period(today, j);
            let rating = Decimal::new(rng.random_range(25i64..=50), 1);
            let goals_met: i32 = rng.random_range(3..=10);
            let feedback = review_feedback(&mut rng);
            let bonus = Decimal::new(rng.random_range(50_000i64..=500_000), 2);
            report.reviews_written += tx
                .execute(
                    "INSERT INTO performance_reviews (id, employee_id, period_start, period_end, \
                     rating, goals_met, manager_feedback, bonus_amount) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                     ON CONFLICT (employee_id, period_start, period_end) \
                     DO UPDATE SET rating = EXCLUDED.rating, goals_met = EXCLUDED.goals_met, \
                     manager_feedback = EXCLUDED.manager_feedback, \
                     bonus_amount = EXCLUDED.bonus_amount",
                    &[
                        &new_entity_id(),
                        &employee_id,
                        &period_start,
                        &period_end,
                        &rating,
                        &goals_met,
                        &feedback,
                        &bonus,
                    ],
                )
                .await? as usize;
        }
    }

    tx.commit().await?;
    tracing::info!(
        employees = report.employees_created,
        departments_created = report.departments_created,
        roles_created = report.roles_created,
        projects_created = report.projects_created,
        "Seeded demo data"
    );
    Ok(report)
}

async fn department_get_or_create(
    tx: &Transaction<'_>,
    code: &str,
    name: &str,
    budget: Decimal,
) -> ApiResult<(EntityId, bool)> {
    if let Some(row) = tx
        .query_opt("SELECT id FROM departments WHERE code = $1", &[&code])
        .await?
    {
        return Ok((row.try_get(0)?, false));
    }
    let id = new_entity_id();
    tx.execute(
        "INSERT INTO departments (id, name, code, budget) VALUES ($1, $2, $3, $4)",
        &[&id, &name, &code, &budget],
    )
    .await?;
    Ok((id, true))
}

async fn role_get_or_create(tx: &Transaction<'_>, def: &RoleDef) -> ApiResult<(EntityId, bool)> {
    if let Some(row) = tx
        .query_opt(
            "SELECT id FROM roles WHERE title = $1 AND level = $2",
            &[&def.title, &def.level],
        )
        .await?
    {
        return Ok((row.try_get(0)?, false));
    }
    let id = new_entity_id();
    let band_min = Decimal::from(def.band_min);
    let band_max = Decimal::from(def.band_max);
    tx.execute(
        "INSERT INTO roles (id, title, level, salary_band_min, salary_band_max) \
         VALUES ($1, $2, $3, $4, $5)",
        &[&id, &def.title, &def.level, &band_min, &band_max],
    )
    .await?;
    Ok((id, true))
}

async fn project_get_or_create(
    tx: &Transaction<'_>,
    n: usize,
    department_id: EntityId,
    start_date: Date,
    budget: Decimal,
) -> ApiResult<(EntityId, bool)> {
    let code = project_code(n);
    if let Some(row) = tx
        .query_opt("SELECT id FROM projects WHERE code = $1", &[&code])
        .await?
    {
        return Ok((row.try_get(0)?, false));
    }
    let id = new_entity_id();
    let name = format!("Project {}", n);
    tx.execute(
        "INSERT INTO projects (id, name, code, department_id, start_date, budget) \
         VALUES ($1, $2, $3, $4, $5, $6)",
        &[&id, &name, &code, &department_id, &start_date, &budget],
    )
    .await?;
    Ok((id, true))
}

async fn existing_emails(tx: &Transaction<'_>) -> ApiResult<HashSet<String>> {
    let rows = tx.query("SELECT email FROM employees", &[]).await?;
    rows.iter()
        .map(|row| -> ApiResult<String> { Ok(row.try_get::<_, String>(0)?.to_lowercase()) })
        .collect()
}

/// First and last name from the seeded generator.
fn person_name<R: Rng>(rng: &mut R) -> (String, String) {
    (FirstName().fake_with_rng(rng), LastName().fake_with_rng(rng))
}

fn review_feedback<R: Rng>(rng: &mut R) -> String {
    Sentence(6..12).fake_with_rng(rng)
}

fn pick<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> ApiResult<&'a T> {
    items
        .choose(rng)
        .ok_or_else(|| ApiError::internal_error("Seed catalog is empty"))
}

/// `PRJ001`, `PRJ002`, ...
pub fn project_code(n: usize) -> String {
    format!("PRJ{:03}", n)
}

/// Lowercased `first.last@example.com`, with `2`, `3`, ... appended to the
/// local part until the address is not in `taken`. Characters other than
/// ASCII letters, digits and `-` are dropped from the name parts.
pub fn unique_email(first: &str, last: &str, taken: &HashSet<String>) -> String {
    let parts: Vec<String> = [first, last]
        .iter()
        .map(|part| email_part(part))
        .filter(|part| !part.is_empty())
        .collect();
    let local = if parts.is_empty() {
        "employee".to_string()
    } else {
        parts.join(".")
    };
    let base = format!("{}@{}", local, EMAIL_DOMAIN);
    if !taken.contains(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{}{}@{}", local, n, EMAIL_DOMAIN))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(base)
}

fn email_part(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Hours logged for a day: zero on leave or absence, otherwise 6.00 to 9.00.
pub fn hours_for<R: Rng>(status: AttendanceStatus, rng: &mut R) -> Decimal {
    if status.is_working_day() {
        Decimal::new(rng.random_range(600i64..=900), 2)
    } else {
        Decimal::ZERO
    }
}

/// Review period `j` counted back from `today`: it ends `90 * j` days ago
/// and spans the 90 days before that.
pub fn review_period(today: Date, j: u64) -> (Date, Date) {
    let end = days_before(today, 90 * j);
    (days_before(end, 90), end)
}

fn days_before(day: NaiveDate, days: u64) -> NaiveDate {
    day.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}
