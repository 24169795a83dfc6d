// src/handlers/salidas.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    db::salida_repo::FiltroHistorialSalidas,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermModificarInventario, PermVerInventario, RequirePermission},
    },
    models::salida::{MotivoSalida, NuevaSalida, TipoItem},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct HistorialQuery {
    pub tipo_item: Option<TipoItem>,
    pub motivo_salida: Option<MotivoSalida>,
    pub fecha_desde: Option<DateTime<Utc>>,
    pub fecha_hasta: Option<DateTime<Utc>>,
}

// POST /api/salidas/registrar
#[utoipa::path(
    post,
    path = "/api/salidas/registrar",
    tag = "Salidas",
    request_body = NuevaSalida,
    responses(
        (status = 201, description = "Salida registrada", body = crate::models::salida::RegistroSalida),
        (status = 400, description = "Motivo/tipo inválido, lote no coincide o cantidad insuficiente"),
        (status = 404, description = "Item no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn registrar(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermModificarInventario>,
    Json(payload): Json<NuevaSalida>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let registro = app_state
        .salida_service
        .registrar_salida(&app_state.db_pool, &payload, user.0.id)
        .await?;
    Ok((StatusCode::CREATED, Json(registro)))
}

// GET /api/salidas/historial
#[utoipa::path(
    get,
    path = "/api/salidas/historial",
    tag = "Salidas",
    params(HistorialQuery),
    responses(
        (status = 200, description = "Historial de salidas (más reciente primero)", body = [crate::models::salida::RegistroSalida])
    ),
    security(("api_jwt" = []))
)]
pub async fn historial(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermVerInventario>,
    Query(query): Query<HistorialQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filtro = FiltroHistorialSalidas {
        tipo_item: query.tipo_item,
        motivo_salida: query.motivo_salida,
        fecha_desde: query.fecha_desde,
        fecha_hasta: query.fecha_hasta,
    };
    let registros = app_state.salida_service.historial(&filtro).await?;
    Ok(Json(registros))
}

// GET /api/salidas/codigo/{codigo}
#[utoipa::path(
    get,
    path = "/api/salidas/codigo/{codigo}",
    tag = "Salidas",
    params(("codigo" = String, Path, description = "Código del item")),
    responses(
        (status = 200, description = "Item encontrado por código", body = crate::models::salida::ItemPorCodigo),
        (status = 404, description = "Ningún item con ese código")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar_por_codigo(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermVerInventario>,
    Path(codigo): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let item = app_state.salida_service.buscar_por_codigo(&codigo).await?;
    Ok(Json(item))
}

// GET /api/salidas/lotes/{codigo}
#[utoipa::path(
    get,
    path = "/api/salidas/lotes/{codigo}",
    tag = "Salidas",
    params(("codigo" = String, Path, description = "Código del item")),
    responses(
        (status = 200, description = "Lotes con existencia disponible", body = [crate::models::salida::LoteDisponible])
    ),
    security(("api_jwt" = []))
)]
pub async fn lotes_disponibles(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermVerInventario>,
    Path(codigo): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let lotes = app_state.salida_service.lotes_disponibles(&codigo).await?;
    Ok(Json(lotes))
}

// GET /api/salidas/motivos
#[utoipa::path(
    get,
    path = "/api/salidas/motivos",
    tag = "Salidas",
    responses(
        (status = 200, description = "Motivos de salida válidos", body = [String])
    ),
    security(("api_jwt" = []))
)]
pub async fn motivos(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermVerInventario>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.salida_service.motivos()))
}
