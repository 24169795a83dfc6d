// src/models/salida.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// --- Motivo de saída ---
// Conjunto fechado, comparado por igualdade exata (sem case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum MotivoSalida {
    #[sqlx(rename = "Venta")]
    #[serde(rename = "Venta")]
    Venta,
    #[sqlx(rename = "Entrega de muestras")]
    #[serde(rename = "Entrega de muestras")]
    Muestras,
    #[sqlx(rename = "Rechazo de control de calidad")]
    #[serde(rename = "Rechazo de control de calidad")]
    RechazoQa,
    #[sqlx(rename = "Pruebas de control de calidad")]
    #[serde(rename = "Pruebas de control de calidad")]
    PruebasQa,
}

impl MotivoSalida {
    pub fn as_str(&self) -> &'static str {
        match self {
            MotivoSalida::Venta => "Venta",
            MotivoSalida::Muestras => "Entrega de muestras",
            MotivoSalida::RechazoQa => "Rechazo de control de calidad",
            MotivoSalida::PruebasQa => "Pruebas de control de calidad",
        }
    }

    pub const TODOS: [MotivoSalida; 4] = [
        MotivoSalida::Venta,
        MotivoSalida::Muestras,
        MotivoSalida::RechazoQa,
        MotivoSalida::PruebasQa,
    ];
}

// --- Tipo de item (discriminador da saída) ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TipoItem {
    MateriaPrima,
    ProductoTerminado,
}

// Registro de saída. Append-only; saldo_anterior/saldo_actual capturam a
// transição exata do estoque no instante do desconto.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistroSalida {
    pub id: Uuid,
    pub tipo_item: TipoItem,
    pub materia_prima_id: Option<Uuid>,
    pub producto_terminado_id: Option<Uuid>,
    pub codigo_item: String,
    pub nombre_item: String,
    pub lote: String,
    pub cantidad_salida: f64,
    pub unidad_medida: String,
    pub motivo_salida: MotivoSalida,
    pub saldo_anterior: f64,
    pub saldo_actual: f64,
    pub observaciones: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl std::str::FromStr for MotivoSalida {
    type Err = ();

    // Igualdade exata com o conjunto fechado de motivos.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MotivoSalida::TODOS
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or(())
    }
}

impl std::str::FromStr for TipoItem {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "materia_prima" => Ok(TipoItem::MateriaPrima),
            "producto_terminado" => Ok(TipoItem::ProductoTerminado),
            _ => Err(()),
        }
    }
}

// ---
// Payloads / DTOs
// ---

use validator::Validate;

// Os discriminadores chegam como texto e são validados por igualdade na
// ordem do contrato: motivo, tipo de item, existência, lote, suficiência.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NuevaSalida {
    pub tipo_item: String,

    pub materia_prima_id: Option<Uuid>,
    pub producto_terminado_id: Option<Uuid>,

    #[validate(length(min = 1, message = "El lote es obligatorio."))]
    pub lote: String,

    #[validate(range(exclusive_min = 0.0, message = "La cantidad debe ser mayor que cero."))]
    pub cantidad_salida: f64,

    pub motivo_salida: String,

    pub observaciones: Option<String>,
}

// Resultado da busca de item por código (tela de registro de saída).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPorCodigo {
    pub id: Uuid,
    pub codigo: String,
    pub nombre: String,
    pub lote: Option<String>,
    pub cantidad_actual: f64,
    pub unidad_medida: String,
    pub tipo_item: TipoItem,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoteDisponible {
    pub id: Uuid,
    pub lote: Option<String>,
    pub cantidad_disponible: f64,
    pub unidad_medida: String,
    pub fecha_produccion: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn motivos_sao_as_quatro_strings_exatas() {
        let nombres: Vec<&str> = MotivoSalida::TODOS.iter().map(|m| m.as_str()).collect();
        assert_eq!(
            nombres,
            vec![
                "Venta",
                "Entrega de muestras",
                "Rechazo de control de calidad",
                "Pruebas de control de calidad",
            ]
        );
    }

    #[test]
    fn motivo_nao_aceita_variacao_de_caixa() {
        // Igualdade exata: "venta" minúsculo não é um motivo válido.
        assert!(MotivoSalida::from_str("venta").is_err());
        assert!(MotivoSalida::from_str("Venta ").is_err());
        assert_eq!(MotivoSalida::from_str("Venta"), Ok(MotivoSalida::Venta));
    }

    #[test]
    fn tipo_item_parse_por_igualdade() {
        assert_eq!(
            TipoItem::from_str("producto_terminado"),
            Ok(TipoItem::ProductoTerminado)
        );
        assert!(TipoItem::from_str("producto").is_err());
    }

    #[test]
    fn tipo_item_usa_snake_case() {
        let v = serde_json::to_value(TipoItem::MateriaPrima).unwrap();
        assert_eq!(v, serde_json::json!("materia_prima"));
    }
}
