// src/handlers/gastos.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermGestionarGastos, RequirePermission},
    },
    models::gasto::{ActualizarGasto, NuevoGasto},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ReporteQuery {
    pub fecha_desde: Option<DateTime<Utc>>,
    pub fecha_hasta: Option<DateTime<Utc>>,
}

// GET /api/gastos
#[utoipa::path(
    get,
    path = "/api/gastos",
    tag = "Gastos",
    responses(
        (status = 200, description = "Listado de gastos", body = [crate::models::gasto::Gasto])
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermGestionarGastos>,
) -> Result<impl IntoResponse, AppError> {
    let gastos = app_state.gasto_service.listar().await?;
    Ok(Json(gastos))
}

// GET /api/gastos/{id}
#[utoipa::path(
    get,
    path = "/api/gastos/{id}",
    tag = "Gastos",
    params(("id" = Uuid, Path, description = "ID del gasto")),
    responses(
        (status = 200, description = "Gasto", body = crate::models::gasto::Gasto),
        (status = 404, description = "No encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermGestionarGastos>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let gasto = app_state.gasto_service.obtener(id).await?;
    Ok(Json(gasto))
}

// POST /api/gastos
#[utoipa::path(
    post,
    path = "/api/gastos",
    tag = "Gastos",
    request_body = NuevoGasto,
    responses(
        (status = 201, description = "Gasto registrado", body = crate::models::gasto::Gasto)
    ),
    security(("api_jwt" = []))
)]
pub async fn crear(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermGestionarGastos>,
    Json(payload): Json<NuevoGasto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let gasto = app_state
        .gasto_service
        .crear(&app_state.db_pool, &payload, user.0.id)
        .await?;
    Ok((StatusCode::CREATED, Json(gasto)))
}

// PUT /api/gastos/{id}
#[utoipa::path(
    put,
    path = "/api/gastos/{id}",
    tag = "Gastos",
    params(("id" = Uuid, Path, description = "ID del gasto")),
    request_body = ActualizarGasto,
    responses(
        (status = 200, description = "Gasto actualizado", body = crate::models::gasto::Gasto),
        (status = 404, description = "No encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermGestionarGastos>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActualizarGasto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let gasto = app_state
        .gasto_service
        .actualizar(&app_state.db_pool, id, &payload)
        .await?;
    Ok(Json(gasto))
}

// DELETE /api/gastos/{id}
#[utoipa::path(
    delete,
    path = "/api/gastos/{id}",
    tag = "Gastos",
    params(("id" = Uuid, Path, description = "ID del gasto")),
    responses(
        (status = 204, description = "Gasto eliminado"),
        (status = 404, description = "No encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermGestionarGastos>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.gasto_service.eliminar(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/gastos/reportes/por-categoria
#[utoipa::path(
    get,
    path = "/api/gastos/reportes/por-categoria",
    tag = "Gastos",
    params(ReporteQuery),
    responses(
        (status = 200, description = "Totales por categoría", body = [crate::models::gasto::GastoPorCategoria])
    ),
    security(("api_jwt" = []))
)]
pub async fn reporte_por_categoria(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermGestionarGastos>,
    Query(query): Query<ReporteQuery>,
) -> Result<impl IntoResponse, AppError> {
    let reporte = app_state
        .gasto_service
        .reporte_por_categoria(query.fecha_desde, query.fecha_hasta)
        .await?;
    Ok(Json(reporte))
}
