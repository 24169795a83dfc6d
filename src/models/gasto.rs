// src/models/gasto.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// Gasto de produção (mano_obra, servicios, mantenimiento, otros...).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Gasto {
    pub id: Uuid,
    pub concepto: String,
    pub descripcion: Option<String>,
    pub categoria: String,
    pub monto: f64,
    pub fecha_gasto: DateTime<Utc>,
    pub orden_produccion: Option<String>,
    pub comprobante: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha do relatório agregado por categoria.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GastoPorCategoria {
    pub categoria: String,
    pub total: f64,
    pub cantidad: i64,
}

// ---
// Payloads / comandos
// ---

use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NuevoGasto {
    #[validate(length(min = 1, message = "El concepto es obligatorio."))]
    pub concepto: String,

    pub descripcion: Option<String>,

    #[validate(length(min = 1, message = "La categoría es obligatoria."))]
    pub categoria: String,

    #[validate(range(exclusive_min = 0.0, message = "El monto debe ser mayor que cero."))]
    pub monto: f64,

    pub fecha_gasto: DateTime<Utc>,
    pub orden_produccion: Option<String>,
    pub comprobante: Option<String>,
}

// Comando de atualização com os campos mutáveis explícitos.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarGasto {
    pub concepto: Option<String>,
    pub descripcion: Option<String>,
    pub categoria: Option<String>,

    #[validate(range(exclusive_min = 0.0, message = "El monto debe ser mayor que cero."))]
    pub monto: Option<f64>,

    pub fecha_gasto: Option<DateTime<Utc>>,
    pub orden_produccion: Option<String>,
    pub comprobante: Option<String>,
}
