use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// As mensagens voltadas à API ficam em espanhol (idioma do domínio e do
// frontend); a taxonomia cobre os modos de falha do motor de estoque.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Recurso referenciado não existe (produto, matéria-prima, item...).
    // A mensagem carrega o nome do recurso, ex.: "Materia prima no encontrada".
    #[error("{0}")]
    NoEncontrado(String),

    // Valor de enum malformado, quantidade não positiva, etc.
    #[error("{0}")]
    EntradaInvalida(String),

    #[error("Lote no coincide")]
    LoteNoCoincide,

    // Falha de suficiência na produção: nomeia o item e o sub-inventário.
    #[error("Cantidad insuficiente de {nombre} en {inventario}")]
    CantidadInsuficiente { nombre: String, inventario: String },

    // Falha de suficiência em saídas/movimentações genéricas.
    #[error("Cantidad insuficiente en inventario")]
    CantidadInsuficienteInventario,

    #[error("{0}")]
    CodigoYaExiste(String),

    // Lock timeout / statement timeout em linha de estoque disputada.
    // O chamador pode re-tentar um número limitado de vezes.
    #[error("Conflicto de concurrencia en el inventario, intente nuevamente")]
    ConflictoConcurrencia,

    #[error("No se pudo validar las credenciales")]
    InvalidToken,

    #[error("Usuario inactivo")]
    UsuarioInactivo,

    #[error("{0}")]
    Forbidden(String),

    // Variante para erros de banco de dados (sqlx). A conversão é manual
    // (ver From abaixo) para interceptar os códigos de timeout de lock.
    #[error("Erro de banco de dados")]
    DatabaseError(sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

// 55P03 = lock_not_available (lock_timeout estourou esperando FOR UPDATE)
// 57014 = query_canceled (statement_timeout abortou a transação)
const PG_LOCK_NOT_AVAILABLE: &str = "55P03";
const PG_QUERY_CANCELED: &str = "57014";

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(code) = db_err.code() {
                if code == PG_LOCK_NOT_AVAILABLE || code == PG_QUERY_CANCELED {
                    return AppError::ConflictoConcurrencia;
                }
            }
        }
        AppError::DatabaseError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Uno o más campos son inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::NoEncontrado(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::EntradaInvalida(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::LoteNoCoincide => (StatusCode::BAD_REQUEST, self.to_string()),
            ref e @ AppError::CantidadInsuficiente { .. } => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::CantidadInsuficienteInventario => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::CodigoYaExiste(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ConflictoConcurrencia => (StatusCode::CONFLICT, self.to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::UsuarioInactivo => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocurrió un error inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cantidad_insuficiente_nombra_item_e_inventario() {
        let err = AppError::CantidadInsuficiente {
            nombre: "Minoxidil".into(),
            inventario: "BPE - Magistrales".into(),
        };
        assert_eq!(
            err.to_string(),
            "Cantidad insuficiente de Minoxidil en BPE - Magistrales"
        );
    }

    #[test]
    fn row_not_found_nao_vira_conflito() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::DatabaseError(_)));
    }
}
