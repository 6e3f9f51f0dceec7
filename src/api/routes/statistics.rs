use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{AcademicYear, Period, PeriodError, Semester, StatisticsResult};

#[derive(Debug, Deserialize)]
pub struct StatisticsParams {
    pub user_id: Option<String>,
    pub semester: Option<String>,
    /// Defaults to the academic year containing today
    pub academic_year: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PeriodsResponse {
    pub user_id: String,
    pub periods: Vec<Period>,
}

pub async fn statistics(
    State(state): State<AppState>,
    Query(params): Query<StatisticsParams>,
) -> Result<Json<StatisticsResult>, ApiError> {
    let user_id = params
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadRequest("user_id is required".to_string()))?;

    let semester: Semester = params
        .semester
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("semester is required".to_string()))?
        .parse()
        .map_err(|e: PeriodError| ApiError::BadRequest(e.to_string()))?;

    let academic_year = match params.academic_year.as_deref() {
        Some(year) => year
            .parse()
            .map_err(|e: PeriodError| ApiError::BadRequest(e.to_string()))?,
        None => AcademicYear::containing(chrono::Local::now().date_naive()),
    };

    let result = state
        .engine
        .compute_statistics(user_id, semester, academic_year)
        .await?;

    Ok(Json(result))
}

pub async fn student_periods(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<PeriodsResponse>, ApiError> {
    let periods = state.engine.student_periods(&user_id).await?;

    Ok(Json(PeriodsResponse { user_id, periods }))
}
