// src/models/producto_terminado.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::materia_prima::TipoMovimiento;

// Produto acabado em estoque, identificado por código + lote.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductoTerminado {
    pub id: Uuid,
    pub codigo: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub unidad_medida: String,
    pub cantidad_actual: f64,
    pub cantidad_minima: f64,
    pub precio_produccion: f64,
    pub precio_venta: Option<f64>,
    pub lote: Option<String>,
    pub fecha_produccion: Option<DateTime<Utc>>,
    pub fecha_vencimiento: Option<DateTime<Utc>>,
    pub ubicacion: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Lançamento do livro-razão de produtos acabados. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovimientoProducto {
    pub id: Uuid,
    pub producto_id: Uuid,
    pub tipo: TipoMovimiento,
    pub cantidad: f64,
    pub motivo: Option<String>,
    pub destino: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// ---
// Payloads / comandos
// ---

use std::collections::HashMap;
use validator::Validate;

use crate::models::validar_no_negativo;

// Códigos das matérias-primas de embalagem a descontar quando o produto
// é medido em unidades.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialesEmpaque {
    pub envase: Option<String>,
    pub gotero: Option<String>,
    pub caja: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NuevoProductoTerminado {
    #[validate(length(min = 1, message = "El código es obligatorio."))]
    pub codigo: String,

    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub nombre: String,

    pub descripcion: Option<String>,

    #[validate(length(min = 1, message = "La unidad de medida es obligatoria."))]
    pub unidad_medida: String,

    #[validate(custom(function = "validar_no_negativo"))]
    #[serde(default)]
    pub cantidad_actual: f64,

    #[validate(custom(function = "validar_no_negativo"))]
    #[serde(default)]
    pub cantidad_minima: f64,

    #[validate(custom(function = "validar_no_negativo"))]
    #[serde(default)]
    pub precio_produccion: f64,

    #[validate(custom(function = "validar_no_negativo"))]
    pub precio_venta: Option<f64>,

    pub lote: Option<String>,
    pub fecha_produccion: Option<DateTime<Utc>>,
    pub fecha_vencimiento: Option<DateTime<Utc>>,
    pub ubicacion: Option<String>,

    // Unidades por apresentação (ex.: {"30mL": 10, "60mL": 5}); a soma
    // define quantas embalagens serão descontadas.
    pub presentaciones: Option<HashMap<String, i64>>,
    pub materiales: Option<MaterialesEmpaque>,
}

// Comando de atualização com os campos mutáveis explícitos.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarProductoTerminado {
    pub codigo: Option<String>,
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub unidad_medida: Option<String>,

    #[validate(custom(function = "validar_no_negativo"))]
    pub cantidad_actual: Option<f64>,

    #[validate(custom(function = "validar_no_negativo"))]
    pub cantidad_minima: Option<f64>,

    #[validate(custom(function = "validar_no_negativo"))]
    pub precio_produccion: Option<f64>,

    #[validate(custom(function = "validar_no_negativo"))]
    pub precio_venta: Option<f64>,

    pub lote: Option<String>,
    pub fecha_produccion: Option<DateTime<Utc>>,
    pub fecha_vencimiento: Option<DateTime<Utc>>,
    pub ubicacion: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NuevoMovimientoProducto {
    pub producto_id: Uuid,

    pub tipo: TipoMovimiento,

    #[validate(range(exclusive_min = 0.0, message = "La cantidad debe ser mayor que cero."))]
    pub cantidad: f64,

    pub motivo: Option<String>,
    pub destino: Option<String>,
}
