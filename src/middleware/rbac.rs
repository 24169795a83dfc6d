// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::AppError, models::auth::{Role, User}};

// O Trait que define o que é uma Permissão: quem pode, e a mensagem do 403.
pub trait PermisoDef: Send + Sync + 'static {
    fn roles_permitidos() -> &'static [Role];
    fn mensaje_denegado() -> &'static str;
}

// O Extractor (Guardião). Depende do auth_guard já ter posto o User nas
// extensions da requisição.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermisoDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<User>().ok_or(AppError::InvalidToken)?;

        if !T::roles_permitidos().contains(&user.role) {
            return Err(AppError::Forbidden(T::mensaje_denegado().to_string()));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

// Alterar estoque, produtos e produção.
pub struct PermModificarInventario;
impl PermisoDef for PermModificarInventario {
    fn roles_permitidos() -> &'static [Role] {
        &[Role::Gerente, Role::JefePlanta, Role::DirectorTecnico]
    }
    fn mensaje_denegado() -> &'static str {
        "No tiene permisos para modificar el inventario"
    }
}

// Consultar estoque e histórico: todos os papéis da planta.
pub struct PermVerInventario;
impl PermisoDef for PermVerInventario {
    fn roles_permitidos() -> &'static [Role] {
        &[
            Role::Gerente,
            Role::Operario,
            Role::JefePlanta,
            Role::DirectorTecnico,
        ]
    }
    fn mensaje_denegado() -> &'static str {
        "No tiene permisos para consultar el inventario"
    }
}

// Gastos de produção.
pub struct PermGestionarGastos;
impl PermisoDef for PermGestionarGastos {
    fn roles_permitidos() -> &'static [Role] {
        &[Role::Gerente, Role::DirectorTecnico]
    }
    fn mensaje_denegado() -> &'static str {
        "No tiene permisos para gestionar gastos"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operario_solo_lectura() {
        assert!(!PermModificarInventario::roles_permitidos().contains(&Role::Operario));
        assert!(PermVerInventario::roles_permitidos().contains(&Role::Operario));
    }

    #[test]
    fn gastos_restringidos_a_direccion() {
        assert!(PermGestionarGastos::roles_permitidos().contains(&Role::Gerente));
        assert!(PermGestionarGastos::roles_permitidos().contains(&Role::DirectorTecnico));
        assert!(!PermGestionarGastos::roles_permitidos().contains(&Role::JefePlanta));
        assert!(!PermGestionarGastos::roles_permitidos().contains(&Role::Operario));
    }
}
