use axum::{
    Json,
    extract::{Query, State},
};

use super::model::{self, GenerateResponse};
use crate::{AppState, error::AppError, utils::first_param};

// 查询参数按键值对提取：重复的键取第一个值，不因重复而拒绝请求

#[axum::debug_handler]
pub async fn generate_excuse(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<GenerateResponse>, AppError> {
    let excuse = model::generate(&state.store, first_param(&params, "category")).await?;
    Ok(Json(GenerateResponse { excuse }))
}

#[axum::debug_handler]
pub async fn search_excuses(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<String>>, AppError> {
    let results = model::search(
        &state.store,
        &state.cache,
        first_param(&params, "q"),
        first_param(&params, "page"),
    )
    .await?;
    Ok(Json(results))
}
