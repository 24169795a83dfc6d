// src/config.rs

use std::time::Duration;

use anyhow::Context;
use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};

use crate::{
    db::{
        GastoRepository, MateriaPrimaRepository, ProductoRepository,
        ProductoTerminadoRepository, SalidaRepository, UserRepository,
    },
    services::{
        auth::AuthService, gasto_service::GastoService, inventario_service::InventarioService,
        produccion_service::ProduccionService, producto_service::ProductoService,
        producto_terminado_service::ProductoTerminadoService, salida_service::SalidaService,
    },
};

// Estado compartilhado da aplicação: pool + serviços já ligados aos seus
// repositórios. Clone barato (tudo Arc/Pool por dentro).
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub bind_addr: String,
    pub auth_service: AuthService,
    pub inventario_service: InventarioService,
    pub producto_service: ProductoService,
    pub produccion_service: ProduccionService,
    pub producto_terminado_service: ProductoTerminadoService,
    pub salida_service: SalidaService,
    pub gasto_service: GastoService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL deve estar definida")?;
        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET deve estar definida")?;
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        // Timeouts de sessão: uma transação presa num lock não segura a
        // fila indefinidamente; o conflito volta como 409 e é retentável.
        let connect_options: PgConnectOptions = database_url
            .parse::<PgConnectOptions>()
            .context("DATABASE_URL inválida")?
            .options([("statement_timeout", "5000"), ("lock_timeout", "3000")]);

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(connect_options)
            .await
            .context("falha al conectar con la base de datos")?;

        let user_repo = UserRepository::new(db_pool.clone());
        let materia_prima_repo = MateriaPrimaRepository::new(db_pool.clone());
        let producto_repo = ProductoRepository::new(db_pool.clone());
        let producto_terminado_repo = ProductoTerminadoRepository::new(db_pool.clone());
        let salida_repo = SalidaRepository::new(db_pool.clone());
        let gasto_repo = GastoRepository::new(db_pool.clone());

        Ok(Self {
            auth_service: AuthService::new(user_repo, jwt_secret),
            inventario_service: InventarioService::new(materia_prima_repo.clone()),
            producto_service: ProductoService::new(
                producto_repo.clone(),
                materia_prima_repo.clone(),
            ),
            produccion_service: ProduccionService::new(
                producto_repo,
                materia_prima_repo.clone(),
            ),
            producto_terminado_service: ProductoTerminadoService::new(
                producto_terminado_repo.clone(),
                materia_prima_repo.clone(),
            ),
            salida_service: SalidaService::new(
                salida_repo,
                materia_prima_repo,
                producto_terminado_repo,
            ),
            gasto_service: GastoService::new(gasto_repo),
            db_pool,
            bind_addr,
        })
    }
}
