// src/handlers/productos_terminados.rs

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
    models::producto_terminado::{
        ActualizarProductoTerminado, NuevoMovimientoProducto, NuevoProductoTerminado,
    },
};

// GET /api/productos-terminados
#[utoipa::path(
    get,
    path = "/api/productos-terminados",
    tag = "Productos Terminados",
    responses(
        (status = 200, description = "Listado de productos terminados", body = [crate::models::producto_terminado::ProductoTerminado])
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermVerInventario>,
) -> Result<impl IntoResponse, AppError> {
    let productos = app_state.producto_terminado_service.listar().await?;
    Ok(Json(productos))
}

// GET /api/productos-terminados/stock-bajo
#[utoipa::path(
    get,
    path = "/api/productos-terminados/stock-bajo",
    tag = "Productos Terminados",
    responses(
        (status = 200, description = "Productos terminados con stock en o bajo el mínimo", body = [crate::models::producto_terminado::ProductoTerminado])
    ),
    security(("api_jwt" = []))
)]
pub async fn stock_bajo(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermVerInventario>,
) -> Result<impl IntoResponse, AppError> {
    let productos = app_state.producto_terminado_service.stock_bajo().await?;
    Ok(Json(productos))
}

// GET /api/productos-terminados/{id}
#[utoipa::path(
    get,
    path = "/api/productos-terminados/{id}",
    tag = "Productos Terminados",
    params(("id" = Uuid, Path, description = "ID del producto terminado")),
    responses(
        (status = 200, description = "Producto terminado", body = crate::models::producto_terminado::ProductoTerminado),
        (status = 404, description = "No encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermVerInventario>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let producto = app_state.producto_terminado_service.obtener(id).await?;
    Ok(Json(producto))
}

// POST /api/productos-terminados
#[utoipa::path(
    post,
    path = "/api/productos-terminados",
    tag = "Productos Terminados",
    request_body = NuevoProductoTerminado,
    responses(
        (status = 201, description = "Producto terminado registrado (descuenta empaques si aplica)", body = crate::models::producto_terminado::ProductoTerminado),
        (status = 400, description = "Material de empaque insuficiente"),
        (status = 409, description = "Código y lote duplicados")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermModificarInventario>,
    Json(payload): Json<NuevoProductoTerminado>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let producto = app_state
        .producto_terminado_service
        .crear(&app_state.db_pool, &payload, user.0.id)
        .await?;
    Ok((StatusCode::CREATED, Json(producto)))
}

// PUT /api/productos-terminados/{id}
#[utoipa::path(
    put,
    path = "/api/productos-terminados/{id}",
    tag = "Productos Terminados",
    params(("id" = Uuid, Path, description = "ID del producto terminado")),
    request_body = ActualizarProductoTerminado,
    responses(
        (status = 200, description = "Producto terminado actualizado", body = crate::models::producto_terminado::ProductoTerminado),
        (status = 404, description = "No encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermModificarInventario>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActualizarProductoTerminado>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let producto = app_state
        .producto_terminado_service
        .actualizar(&app_state.db_pool, id, &payload)
        .await?;
    Ok(Json(producto))
}

// DELETE /api/productos-terminados/{id}
#[utoipa::path(
    delete,
    path = "/api/productos-terminados/{id}",
    tag = "Productos Terminados",
    params(("id" = Uuid, Path, description = "ID del producto terminado")),
    responses(
        (status = 204, description = "Producto terminado eliminado"),
        (status = 404, description = "No encontrado")
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
        .producto_terminado_service
        .eliminar(&app_state.db_pool, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/productos-terminados/{id}/movimientos
#[utoipa::path(
    get,
    path = "/api/productos-terminados/{id}/movimientos",
    tag = "Productos Terminados",
    params(("id" = Uuid, Path, description = "ID del producto terminado")),
    responses(
        (status = 200, description = "Movimientos del producto terminado", body = [crate::models::producto_terminado::MovimientoProducto])
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_movimientos(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermVerInventario>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let movimientos = app_state
        .producto_terminado_service
        .listar_movimientos(id)
        .await?;
    Ok(Json(movimientos))
}

// POST /api/productos-terminados/movimientos
#[utoipa::path(
    post,
    path = "/api/productos-terminados/movimientos",
    tag = "Productos Terminados",
    request_body = NuevoMovimientoProducto,
    responses(
        (status = 201, description = "Movimiento registrado", body = crate::models::producto_terminado::MovimientoProducto),
        (status = 400, description = "Cantidad insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn registrar_movimiento(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermModificarInventario>,
    Json(payload): Json<NuevoMovimientoProducto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let movimiento = app_state
        .producto_terminado_service
        .registrar_movimiento(&app_state.db_pool, &payload, user.0.id)
        .await?;
    Ok((StatusCode::CREATED, Json(movimiento)))
}
