// src/models/producto.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::materia_prima::TipoInventario;

// --- Unidade de negócio ---
// O roteamento para o sub-inventário é uma tabela explícita (e testada),
// não comparação de strings espalhada pelo código.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum UnidadNegocio {
    #[sqlx(rename = "BPE - Magistrales")]
    #[serde(rename = "BPE - Magistrales")]
    Magistrales,
    #[sqlx(rename = "Droguería")]
    #[serde(rename = "Droguería")]
    Drogueria,
    #[sqlx(rename = "Fabricación de derivados")]
    #[serde(rename = "Fabricación de derivados")]
    Fabricacion,
}

impl UnidadNegocio {
    // Mapeamento de duas vias: Magistrales consome do estoque magistral;
    // qualquer outra unidade consome do estoque de fabricação.
    pub fn inventario_destino(&self) -> TipoInventario {
        match self {
            UnidadNegocio::Magistrales => TipoInventario::Magistral,
            UnidadNegocio::Drogueria | UnidadNegocio::Fabricacion => TipoInventario::Fabricacion,
        }
    }
}

// --- Produto composto (fórmula magistral) ---
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Producto {
    pub id: Uuid,
    pub codigo: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio_produccion: f64,
    pub precio_venta: Option<f64>,
    pub unidad_negocio: UnidadNegocio,
    // Unidade do volume produzido informada na fórmula (ex.: "mL").
    // O contrato mL -> gramas fica declarado no produto, não embutido.
    pub unidad_volumen: String,
    pub meses_vencimiento: i32,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Inventario {
    pub id: Uuid,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Uma linha da composição do produto, já com o nome da matéria-prima
// (a concentração pertence à associação, não à matéria).
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComposicionMateriaPrima {
    pub materia_prima_id: Uuid,
    pub nombre: String,
    pub concentracion: f64,
}

// Lançamento da trilha de auditoria dos descontos de produção. Imutável.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistorialDescuentoMateriaPrima {
    pub id: Uuid,
    pub materia_prima_id: Uuid,
    pub producto_id: Uuid,
    pub producto_nombre: String,
    pub cantidad_descontada: f64,
    pub concentracion: f64,
    pub volumen_producido: f64,
    pub unidad_volumen: String,
    pub fecha_produccion: DateTime<Utc>,
    pub fecha_descuento: DateTime<Utc>,
}

// Item consumido numa corrida de produção (parte da resposta da API).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsumoMateriaPrima {
    pub materia_prima_id: Uuid,
    pub nombre: String,
    pub cantidad_descontada: f64,
    pub concentracion: f64,
}

// ---
// Payloads / comandos
// ---

use validator::Validate;

use crate::models::validar_no_negativo;

// Associação enviada na criação/edição da fórmula.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MateriaPrimaAsociadaInput {
    pub materia_prima_id: Uuid,

    #[validate(range(
        exclusive_min = 0.0,
        max = 100.0,
        message = "La concentración debe estar entre 0 y 100."
    ))]
    pub concentracion: f64,
}

fn unidad_volumen_default() -> String {
    "mL".to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NuevoProducto {
    #[validate(length(min = 1, message = "El código es obligatorio."))]
    pub codigo: String,

    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub nombre: String,

    pub descripcion: Option<String>,

    #[validate(custom(function = "validar_no_negativo"))]
    #[serde(default)]
    pub precio_produccion: f64,

    #[validate(custom(function = "validar_no_negativo"))]
    pub precio_venta: Option<f64>,

    pub unidad_negocio: UnidadNegocio,

    #[serde(default = "unidad_volumen_default")]
    pub unidad_volumen: String,

    pub meses_vencimiento: Option<i32>,

    #[validate(nested)]
    #[serde(default)]
    pub materias_primas: Vec<MateriaPrimaAsociadaInput>,

    #[serde(default)]
    pub inventarios: Vec<Uuid>,
}

// Comando de atualização com os campos mutáveis explícitos. As listas de
// composição/inventários, quando presentes, substituem o conjunto inteiro.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarProducto {
    pub codigo: Option<String>,
    pub nombre: Option<String>,
    pub descripcion: Option<String>,

    #[validate(custom(function = "validar_no_negativo"))]
    pub precio_produccion: Option<f64>,

    #[validate(custom(function = "validar_no_negativo"))]
    pub precio_venta: Option<f64>,

    pub unidad_negocio: Option<UnidadNegocio>,
    pub unidad_volumen: Option<String>,
    pub meses_vencimiento: Option<i32>,

    #[validate(nested)]
    pub materias_primas: Option<Vec<MateriaPrimaAsociadaInput>>,

    pub inventarios: Option<Vec<Uuid>>,
}

// Gatilho de uma corrida de produção. Efêmero: dispara o desconto e os
// lançamentos de histórico, mas não é persistido.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarProduccionInput {
    #[validate(range(exclusive_min = 0.0, message = "La cantidad debe ser mayor que cero."))]
    pub cantidad: f64,

    pub lote: Option<String>,
    pub fecha_produccion: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistroProduccionResponse {
    pub success: bool,
    pub message: String,
    pub inventario_utilizado: TipoInventario,
    pub consumos: Vec<ConsumoMateriaPrima>,
}

// Produto com as relações carregadas (resposta de detalhe).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductoDetalle {
    #[serde(flatten)]
    pub producto: Producto,
    pub materias_primas: Vec<ComposicionMateriaPrima>,
    pub inventarios: Vec<Inventario>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magistrales_consome_do_estoque_magistral() {
        assert_eq!(
            UnidadNegocio::Magistrales.inventario_destino(),
            TipoInventario::Magistral
        );
    }

    #[test]
    fn demais_unidades_consomem_da_fabricacion() {
        assert_eq!(
            UnidadNegocio::Drogueria.inventario_destino(),
            TipoInventario::Fabricacion
        );
        assert_eq!(
            UnidadNegocio::Fabricacion.inventario_destino(),
            TipoInventario::Fabricacion
        );
    }

    #[test]
    fn rotulos_do_dominio_sao_exatos() {
        let v = serde_json::to_value(UnidadNegocio::Drogueria).unwrap();
        assert_eq!(v, serde_json::json!("Droguería"));
        let v = serde_json::to_value(TipoInventario::Magistral).unwrap();
        assert_eq!(v, serde_json::json!("BPE - Magistrales"));
    }
}
