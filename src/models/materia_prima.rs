// src/models/materia_prima.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// --- Sub-inventário (partição física do estoque) ---
// Os dois rótulos são os que o domínio usa desde sempre; a produção roteia
// o consumo para um deles a partir da unidade de negócio do produto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum TipoInventario {
    #[sqlx(rename = "BPE - Magistrales")]
    #[serde(rename = "BPE - Magistrales")]
    Magistral,
    #[sqlx(rename = "Fabricación de derivados")]
    #[serde(rename = "Fabricación de derivados")]
    Fabricacion,
}

impl TipoInventario {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoInventario::Magistral => "BPE - Magistrales",
            TipoInventario::Fabricacion => "Fabricación de derivados",
        }
    }
}

impl std::fmt::Display for TipoInventario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Matéria-prima ---
// Registro de estoque: a mesma matéria (mesmo nombre) pode existir em mais
// de um sub-inventário como linhas distintas.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MateriaPrima {
    pub id: Uuid,
    pub codigo: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub unidad_medida: String,
    pub cantidad_actual: f64,
    pub cantidad_minima: f64,
    pub lote: Option<String>,
    pub proveedor: Option<String>,
    pub fecha_ingreso: Option<NaiveDate>,
    pub ubicacion: Option<String>,
    pub tipo_inventario: TipoInventario,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Movimentação genérica (entrada/salida) ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TipoMovimiento {
    Entrada,
    Salida,
}

impl TipoMovimiento {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoMovimiento::Entrada => "entrada",
            TipoMovimiento::Salida => "salida",
        }
    }
}

// Lançamento do livro-razão de matérias-primas. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovimientoMateriaPrima {
    pub id: Uuid,
    pub materia_prima_id: Uuid,
    pub tipo: TipoMovimiento,
    pub cantidad: f64,
    pub motivo: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// ---
// Payloads / comandos
// ---

use validator::Validate;

use crate::models::validar_no_negativo;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NuevaMateriaPrima {
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

    pub lote: Option<String>,
    pub proveedor: Option<String>,
    pub fecha_ingreso: Option<NaiveDate>,
    pub ubicacion: Option<String>,
    pub tipo_inventario: TipoInventario,
}

// Comando de atualização: enumera explicitamente os campos mutáveis.
// Código e sub-inventário não trocam depois de criados.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarMateriaPrima {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub unidad_medida: Option<String>,

    #[validate(custom(function = "validar_no_negativo"))]
    pub cantidad_actual: Option<f64>,

    #[validate(custom(function = "validar_no_negativo"))]
    pub cantidad_minima: Option<f64>,

    pub lote: Option<String>,
    pub proveedor: Option<String>,
    pub ubicacion: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NuevoMovimientoMateriaPrima {
    pub materia_prima_id: Uuid,

    pub tipo: TipoMovimiento,

    #[validate(range(exclusive_min = 0.0, message = "La cantidad debe ser mayor que cero."))]
    pub cantidad: f64,

    pub motivo: Option<String>,
}
