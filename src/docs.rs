// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Materias Primas ---
        handlers::materias_primas::listar,
        handlers::materias_primas::stock_bajo,
        handlers::materias_primas::obtener,
        handlers::materias_primas::crear,
        handlers::materias_primas::actualizar,
        handlers::materias_primas::eliminar,
        handlers::materias_primas::listar_movimientos,
        handlers::materias_primas::registrar_movimiento,

        // --- Productos ---
        handlers::productos::listar,
        handlers::productos::detalle,
        handlers::productos::crear,
        handlers::productos::actualizar,
        handlers::productos::eliminar,
        handlers::productos::listar_inventarios,
        handlers::productos::registrar_produccion,
        handlers::productos::historial_descuentos,

        // --- Productos Terminados ---
        handlers::productos_terminados::listar,
        handlers::productos_terminados::stock_bajo,
        handlers::productos_terminados::obtener,
        handlers::productos_terminados::crear,
        handlers::productos_terminados::actualizar,
        handlers::productos_terminados::eliminar,
        handlers::productos_terminados::listar_movimientos,
        handlers::productos_terminados::registrar_movimiento,

        // --- Salidas ---
        handlers::salidas::registrar,
        handlers::salidas::historial,
        handlers::salidas::buscar_por_codigo,
        handlers::salidas::lotes_disponibles,
        handlers::salidas::motivos,

        // --- Gastos ---
        handlers::gastos::listar,
        handlers::gastos::obtener,
        handlers::gastos::crear,
        handlers::gastos::actualizar,
        handlers::gastos::eliminar,
        handlers::gastos::reporte_por_categoria,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,

            // --- Materias Primas ---
            models::materia_prima::TipoInventario,
            models::materia_prima::TipoMovimiento,
            models::materia_prima::MateriaPrima,
            models::materia_prima::MovimientoMateriaPrima,
            models::materia_prima::NuevaMateriaPrima,
            models::materia_prima::ActualizarMateriaPrima,
            models::materia_prima::NuevoMovimientoMateriaPrima,

            // --- Productos ---
            models::producto::UnidadNegocio,
            models::producto::Producto,
            models::producto::Inventario,
            models::producto::ComposicionMateriaPrima,
            models::producto::HistorialDescuentoMateriaPrima,
            models::producto::ConsumoMateriaPrima,
            models::producto::MateriaPrimaAsociadaInput,
            models::producto::NuevoProducto,
            models::producto::ActualizarProducto,
            models::producto::RegistrarProduccionInput,
            models::producto::RegistroProduccionResponse,
            models::producto::ProductoDetalle,

            // --- Productos Terminados ---
            models::producto_terminado::ProductoTerminado,
            models::producto_terminado::MovimientoProducto,
            models::producto_terminado::MaterialesEmpaque,
            models::producto_terminado::NuevoProductoTerminado,
            models::producto_terminado::ActualizarProductoTerminado,
            models::producto_terminado::NuevoMovimientoProducto,

            // --- Salidas ---
            models::salida::MotivoSalida,
            models::salida::TipoItem,
            models::salida::RegistroSalida,
            models::salida::NuevaSalida,
            models::salida::ItemPorCodigo,
            models::salida::LoteDisponible,

            // --- Gastos ---
            models::gasto::Gasto,
            models::gasto::GastoPorCategoria,
            models::gasto::NuevoGasto,
            models::gasto::ActualizarGasto,
        )
    ),
    tags(
        (name = "Materias Primas", description = "Inventario de materias primas y sus movimientos"),
        (name = "Productos", description = "Fórmulas magistrales, composición y producción"),
        (name = "Productos Terminados", description = "Stock de productos acabados"),
        (name = "Salidas", description = "Registro y consulta de salidas de stock"),
        (name = "Gastos", description = "Gastos de producción y reportes")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
