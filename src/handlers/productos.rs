// src/handlers/productos.rs

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
    models::producto::{ActualizarProducto, NuevoProducto, RegistrarProduccionInput},
};

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Productos",
    responses(
        (status = 200, description = "Listado de productos", body = [crate::models::producto::Producto])
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermVerInventario>,
) -> Result<impl IntoResponse, AppError> {
    let productos = app_state.producto_service.listar().await?;
    Ok(Json(productos))
}

// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID del producto")),
    responses(
        (status = 200, description = "Producto con composición e inventarios", body = crate::models::producto::ProductoDetalle),
        (status = 404, description = "No encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn detalle(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermVerInventario>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detalle = app_state.producto_service.detalle(id).await?;
    Ok(Json(detalle))
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Productos",
    request_body = NuevoProducto,
    responses(
        (status = 201, description = "Producto creado", body = crate::models::producto::Producto),
        (status = 409, description = "Código duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequirePermission<PermModificarInventario>,
    Json(payload): Json<NuevoProducto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let producto = app_state
        .producto_service
        .crear(&app_state.db_pool, &payload, user.0.id)
        .await?;
    Ok((StatusCode::CREATED, Json(producto)))
}

// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID del producto")),
    request_body = ActualizarProducto,
    responses(
        (status = 200, description = "Producto actualizado", body = crate::models::producto::Producto),
        (status = 404, description = "No encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermModificarInventario>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActualizarProducto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let producto = app_state
        .producto_service
        .actualizar(&app_state.db_pool, id, &payload)
        .await?;
    Ok(Json(producto))
}

// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID del producto")),
    responses(
        (status = 204, description = "Producto eliminado"),
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
        .producto_service
        .eliminar(&app_state.db_pool, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/inventarios
#[utoipa::path(
    get,
    path = "/api/inventarios",
    tag = "Productos",
    responses(
        (status = 200, description = "Inventarios de negocio", body = [crate::models::producto::Inventario])
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_inventarios(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermVerInventario>,
) -> Result<impl IntoResponse, AppError> {
    let inventarios = app_state.producto_service.listar_inventarios().await?;
    Ok(Json(inventarios))
}

// POST /api/products/{producto_id}/registrar-produccion
#[utoipa::path(
    post,
    path = "/api/products/{producto_id}/registrar-produccion",
    tag = "Productos",
    params(("producto_id" = Uuid, Path, description = "ID del producto")),
    request_body = RegistrarProduccionInput,
    responses(
        (status = 200, description = "Producción registrada con sus consumos", body = crate::models::producto::RegistroProduccionResponse),
        (status = 400, description = "Cantidad insuficiente en el inventario destino"),
        (status = 404, description = "Producto no encontrado"),
        (status = 409, description = "Conflicto de concurrencia, reintentar")
    ),
    security(("api_jwt" = []))
)]
pub async fn registrar_produccion(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermModificarInventario>,
    Path(producto_id): Path<Uuid>,
    Json(payload): Json<RegistrarProduccionInput>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let respuesta = app_state
        .produccion_service
        .registrar_produccion(&app_state.db_pool, producto_id, &payload)
        .await?;
    Ok(Json(respuesta))
}

// GET /api/products/{id}/historial-descuentos
#[utoipa::path(
    get,
    path = "/api/products/{id}/historial-descuentos",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID del producto")),
    responses(
        (status = 200, description = "Historial de descuentos de producción", body = [crate::models::producto::HistorialDescuentoMateriaPrima]),
        (status = 404, description = "Producto no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn historial_descuentos(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequirePermission<PermVerInventario>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let historial = app_state.producto_service.historial_descuentos(id).await?;
    Ok(Json(historial))
}
