// src/handlers/materias_primas.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermModificarInventario, PermVerInventario, RequirePermission},
    },
    models::materia_prima::{
        ActualizarMateriaPrima, NuevaMateriaPrima, NuevoMovimientoMateriaPrima,
    },
};

// GET /api/materias-primas
#[utoipa::path(
    get,
    path = "/api/materias-primas",
    tag = "Materias Primas",
    responses(
        (status = 200, description = "Listado de materias primas", body = [crate::models::materia_prima::MateriaPrima])
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermVerInventario>,
) -> Result<impl IntoResponse, AppError> {
    let materias = app_state.inventario_service.listar().await?;
    Ok(Json(materias))
}

// GET /api/materias-primas/stock-bajo
#[utoipa::path(
    get,
    path = "/api/materias-primas/stock-bajo",
    tag = "Materias Primas",
    responses(
        (status = 200, description = "Materias primas con stock en o bajo el mínimo", body = [crate::models::materia_prima::MateriaPrima])
    ),
    security(("api_jwt" = []))
)]
pub async fn stock_bajo(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermVerInventario>,
) -> Result<impl IntoResponse, AppError> {
    let materias = app_state.inventario_service.stock_bajo().await?;
    Ok(Json(materias))
}

// GET /api/materias-primas/{id}
#[utoipa::path(
    get,
    path = "/api/materias-primas/{id}",
    tag = "Materias Primas",
    params(("id" = Uuid, Path, description = "ID de la materia prima")),
    responses(
        (status = 200, description = "Materia prima", body = crate::models::materia_prima::MateriaPrima),
        (status = 404, description = "No encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermVerInventario>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let materia = app_state.inventario_service.obtener(id).await?;
    Ok(Json(materia))
}

// POST /api/materias-primas
#[utoipa::path(
    post,
    path = "/api/materias-primas",
    tag = "Materias Primas",
    request_body = NuevaMateriaPrima,
    responses(
        (status = 201, description = "Materia prima creada", body = crate::models::materia_prima::MateriaPrima),
        (status = 409, description = "Código duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermModificarInventario>,
    Json(payload): Json<NuevaMateriaPrima>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let materia = app_state
        .inventario_service
        .crear(&app_state.db_pool, &payload, user.0.id)
        .await?;
    Ok((StatusCode::CREATED, Json(materia)))
}

// PUT /api/materias-primas/{id}
#[utoipa::path(
    put,
    path = "/api/materias-primas/{id}",
    tag = "Materias Primas",
    params(("id" = Uuid, Path, description = "ID de la materia prima")),
    request_body = ActualizarMateriaPrima,
    responses(
        (status = 200, description = "Materia prima actualizada", body = crate::models::materia_prima::MateriaPrima),
        (status = 404, description = "No encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermModificarInventario>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActualizarMateriaPrima>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let materia = app_state
        .inventario_service
        .actualizar(&app_state.db_pool, id, &payload)
        .await?;
    Ok(Json(materia))
}

// DELETE /api/materias-primas/{id}
#[utoipa::path(
    delete,
    path = "/api/materias-primas/{id}",
    tag = "Materias Primas",
    params(("id" = Uuid, Path, description = "ID de la materia prima")),
    responses(
        (status = 204, description = "Materia prima eliminada"),
        (status = 404, description = "No encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermModificarInventario>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .inventario_service
        .eliminar(&app_state.db_pool, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/materias-primas/{id}/movimientos
#[utoipa::path(
    get,
    path = "/api/materias-primas/{id}/movimientos",
    tag = "Materias Primas",
    params(("id" = Uuid, Path, description = "ID de la materia prima")),
    responses(
        (status = 200, description = "Movimientos de la materia prima", body = [crate::models::materia_prima::MovimientoMateriaPrima])
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_movimientos(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermVerInventario>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let movimientos = app_state.inventario_service.listar_movimientos(id).await?;
    Ok(Json(movimientos))
}

// POST /api/materias-primas/movimientos
#[utoipa::path(
    post,
    path = "/api/materias-primas/movimientos",
    tag = "Materias Primas",
    request_body = NuevoMovimientoMateriaPrima,
    responses(
        (status = 201, description = "Movimiento registrado", body = crate::models::materia_prima::MovimientoMateriaPrima),
        (status = 400, description = "Cantidad insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn registrar_movimiento(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermModificarInventario>,
    Json(payload): Json<NuevoMovimientoMateriaPrima>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let movimiento = app_state
        .inventario_service
        .registrar_movimiento(&app_state.db_pool, &payload, user.0.id)
        .await?;
    Ok((StatusCode::CREATED, Json(movimiento)))
}
