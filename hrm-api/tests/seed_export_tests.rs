//! Seeding and export against a live database.
//!
//! Kept in its own test binary: the export row count is compared with the
//! employee count, which other store tests would change concurrently.

#![cfg(feature = "db-tests")]

use hrm_api::routes::reports::render_csv;
use hrm_api::seed::{seed_demo, SeedOptions, DEPARTMENTS, ROLES};
use hrm_api::ApiResult;
use hrm_core::{Department, Employee, Role, CSV_HEADER};

#[path = "support/db.rs"]
mod test_db_support;

#[tokio::test]
async fn test_seed_is_idempotent_for_catalog_and_reports_agree() -> ApiResult<()> {
    let db = test_db_support::test_db_client();
    db.migrate().await?;

    let options = SeedOptions {
        employees: 3,
        rng_seed: Some(7),
        ..SeedOptions::default()
    };
    seed_demo(&db, &options).await?;
    let departments_after_first = db.count::<Department>().await?;
    let roles_after_first = db.count::<Role>().await?;
    let employees_after_first = db.count::<Employee>().await?;

    let second = seed_demo(&db, &options).await?;
    assert_eq!(second.departments_created, 0);
    assert_eq!(second.roles_created, 0);
    assert_eq!(second.projects_created, 0);
    assert_eq!(second.employees_created, 3);
    assert_eq!(second.attendance_written, 3 * 30);
    assert_eq!(second.reviews_written, 3 * 2);

    assert_eq!(db.count::<Department>().await?, departments_after_first);
    assert_eq!(db.count::<Role>().await?, roles_after_first);
    assert!(departments_after_first >= DEPARTMENTS.len() as i64);
    assert!(roles_after_first >= ROLES.len() as i64);
    assert_eq!(db.count::<Employee>().await?, employees_after_first + 3);

    let rows = db.export_rows().await?;
    assert_eq!(rows.len() as i64, db.count::<Employee>().await?);

    let csv = render_csv(&rows)?;
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(CSV_HEADER.join(",").as_str()));
    assert_eq!(lines.count(), rows.len());

    let updated = db.recompute_headcount().await?;
    assert_eq!(updated as i64, db.count::<Department>().await?);

    let live = db.headcount_by_department().await?;
    let total: i64 = live.iter().map(|row| row.c).sum();
    assert_eq!(total, db.count::<Employee>().await?);
    Ok(())
}
