use super::*;

pub async fn list_leave_subtypes_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Query(query): Query<LeaveSubtypeListQuery>,
) -> ApiResult<Json<Vec<LeaveSubtypeResponse>>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let leave_type_id = optional_id(query.leave_type_id, LeaveTypeId::parse)?;
    let subtypes = state
        .taxonomy_service
        .list_leave_subtypes(leave_type_id)
        .await?
        .into_iter()
        .map(LeaveSubtypeResponse::from)
        .collect();

    Ok(Json(subtypes))
}

pub async fn get_leave_subtype_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(leave_subtype_id): Path<String>,
) -> ApiResult<Json<LeaveSubtypeResponse>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let subtype = state
        .taxonomy_service
        .get_leave_subtype(LeaveSubtypeId::parse(&leave_subtype_id)?)
        .await?;

    Ok(Json(LeaveSubtypeResponse::from(subtype)))
}

pub async fn create_leave_subtype_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Json(payload): Json<LeaveSubtypeRequest>,
) -> ApiResult<(StatusCode, Json<LeaveSubtypeResponse>)> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let subtype = state
        .taxonomy_service
        .create_leave_subtype(payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(LeaveSubtypeResponse::from(subtype))))
}

pub async fn update_leave_subtype_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(leave_subtype_id): Path<String>,
    Json(payload): Json<LeaveSubtypeRequest>,
) -> ApiResult<Json<LeaveSubtypeResponse>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let subtype = state
        .taxonomy_service
        .update_leave_subtype(LeaveSubtypeId::parse(&leave_subtype_id)?, payload.into())
        .await?;

    Ok(Json(LeaveSubtypeResponse::from(subtype)))
}

pub async fn delete_leave_subtype_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(leave_subtype_id): Path<String>,
) -> ApiResult<StatusCode> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    state
        .taxonomy_service
        .delete_leave_subtype(LeaveSubtypeId::parse(&leave_subtype_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
