//! Performance review component implementation.

use crate::component::{push_updates, Component, SqlParam};
use crate::error::ApiResult;
use crate::types::{CreateReviewRequest, ReviewFilter, UpdateReviewRequest};
use hrm_core::{rules, EntityKind, PerformanceReview, ValidationError};
use tokio_postgres::Row;

impl Component for PerformanceReview {
    type Create = CreateReviewRequest;
    type Update = UpdateReviewRequest;
    type ListFilter = ReviewFilter;

    const KIND: EntityKind = EntityKind::PerformanceReview;
    const TABLE: &'static str = "performance_reviews";
    const SELECT: &'static str = "SELECT t.id, t.employee_id, t.period_start, t.period_end, \
         t.rating, t.goals_met, t.manager_feedback, t.bonus_amount, t.created_at \
         FROM performance_reviews t JOIN employees e ON e.id = t.employee_id";
    const SEARCH_FIELDS: &'static [&'static str] = &["e.first_name", "e.last_name"];
    const ORDERING_FIELDS: &'static [(&'static str, &'static str)] = &[
        ("rating", "t.rating"),
        ("bonus_amount", "t.bonus_amount"),
        ("period_end", "t.period_end"),
    ];
    const DEFAULT_ORDERING: &'static str = "t.period_end DESC";

    fn create_columns(req: &Self::Create) -> Vec<(&'static str, SqlParam)> {
        vec![
            ("employee_id", SqlParam::Uuid(req.employee_id)),
            ("period_start", SqlParam::Date(req.period_start)),
            ("period_end", SqlParam::Date(req.period_end)),
            ("rating", SqlParam::Decimal(req.rating)),
            ("goals_met", SqlParam::Int(req.goals_met)),
            ("manager_feedback", SqlParam::String(req.manager_feedback.clone())),
            ("bonus_amount", SqlParam::Decimal(req.bonus_amount)),
        ]
    }

    fn update_columns(req: &Self::Update) -> Vec<(&'static str, SqlParam)> {
        let mut cols = Vec::new();
        push_updates!(cols, req, {
            employee_id => SqlParam::Uuid,
            period_start => SqlParam::Date,
            period_end => SqlParam::Date,
            rating => SqlParam::Decimal,
            goals_met => SqlParam::Int,
            manager_feedback => SqlParam::String,
            bonus_amount => SqlParam::Decimal,
        });
        cols
    }

    fn from_row(row: &Row) -> ApiResult<Self> {
        Ok(PerformanceReview {
            id: row.try_get("id")?,
            employee_id: row.try_get("employee_id")?,
            period_start: row.try_get("period_start")?,
            period_end: row.try_get("period_end")?,
            rating: row.try_get("rating")?,
            goals_met: row.try_get("goals_met")?,
            manager_feedback: row.try_get("manager_feedback")?,
            bonus_amount: row.try_get("bonus_amount")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn check_stored(&self) -> Result<(), ValidationError> {
        rules::date_order("period_start", self.period_start, "period_end", Some(self.period_end))
    }
}
