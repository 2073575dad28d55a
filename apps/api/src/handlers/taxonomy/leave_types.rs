use super::*;

pub async fn list_leave_types_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
) -> ApiResult<Json<Vec<LeaveTypeResponse>>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let leave_types = state
        .taxonomy_service
        .list_leave_types()
        .await?
        .into_iter()
        .map(LeaveTypeResponse::from)
        .collect();

    Ok(Json(leave_types))
}

pub async fn get_leave_type_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(leave_type_id): Path<String>,
) -> ApiResult<Json<LeaveTypeResponse>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let leave_type = state
        .taxonomy_service
        .get_leave_type(LeaveTypeId::parse(&leave_type_id)?)
        .await?;

    Ok(Json(LeaveTypeResponse::from(leave_type)))
}

pub async fn create_leave_type_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Json(payload): Json<LeaveTypeRequest>,
) -> ApiResult<(StatusCode, Json<LeaveTypeResponse>)> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let leave_type = state
        .taxonomy_service
        .create_leave_type(payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(LeaveTypeResponse::from(leave_type))))
}

pub async fn update_leave_type_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(leave_type_id): Path<String>,
    Json(payload): Json<LeaveTypeRequest>,
) -> ApiResult<Json<LeaveTypeResponse>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let leave_type = state
        .taxonomy_service
        .update_leave_type(LeaveTypeId::parse(&leave_type_id)?, payload.into())
        .await?;

    Ok(Json(LeaveTypeResponse::from(leave_type)))
}

/// Deletes a type with its subtypes; policies lose their subtype reference.
pub async fn delete_leave_type_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(leave_type_id): Path<String>,
) -> ApiResult<StatusCode> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    state
        .taxonomy_service
        .delete_leave_type(LeaveTypeId::parse(&leave_type_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
