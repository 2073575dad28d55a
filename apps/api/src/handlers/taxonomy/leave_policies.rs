use super::*;

pub async fn list_leave_policies_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Query(query): Query<LeavePolicyListQuery>,
) -> ApiResult<Json<Vec<LeavePolicyResponse>>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let filter = LeavePolicyFilter {
        leave_type_id: optional_id(query.leave_type_id, LeaveTypeId::parse)?,
        leave_subtype_id: optional_id(query.leave_subtype_id, LeaveSubtypeId::parse)?,
    };
    let policies = state
        .taxonomy_service
        .list_leave_policies(filter)
        .await?
        .into_iter()
        .map(LeavePolicyResponse::from)
        .collect();

    Ok(Json(policies))
}

pub async fn get_leave_policy_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(leave_policy_id): Path<String>,
) -> ApiResult<Json<LeavePolicyResponse>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let policy = state
        .taxonomy_service
        .get_leave_policy(LeavePolicyId::parse(&leave_policy_id)?)
        .await?;

    Ok(Json(LeavePolicyResponse::from(policy)))
}

pub async fn create_leave_policy_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Json(payload): Json<LeavePolicyRequest>,
) -> ApiResult<(StatusCode, Json<LeavePolicyResponse>)> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let policy = state
        .taxonomy_service
        .create_leave_policy(payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(LeavePolicyResponse::from(policy))))
}

pub async fn update_leave_policy_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(leave_policy_id): Path<String>,
    Json(payload): Json<LeavePolicyRequest>,
) -> ApiResult<Json<LeavePolicyResponse>> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    let policy = state
        .taxonomy_service
        .update_leave_policy(LeavePolicyId::parse(&leave_policy_id)?, payload.into())
        .await?;

    Ok(Json(LeavePolicyResponse::from(policy)))
}

pub async fn delete_leave_policy_handler(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(leave_policy_id): Path<String>,
) -> ApiResult<StatusCode> {
    require_hr_or_admin(&state.authorization_service, &credential).await?;

    state
        .taxonomy_service
        .delete_leave_policy(LeavePolicyId::parse(&leave_policy_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
