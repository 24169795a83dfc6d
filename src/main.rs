//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let materias_primas_routes = Router::new()
        .route(
            "/",
            post(handlers::materias_primas::crear).get(handlers::materias_primas::listar),
        )
        .route("/stock-bajo", get(handlers::materias_primas::stock_bajo))
        .route(
            "/movimientos",
            post(handlers::materias_primas::registrar_movimiento),
        )
        .route(
            "/{id}",
            get(handlers::materias_primas::obtener)
                .put(handlers::materias_primas::actualizar)
                .delete(handlers::materias_primas::eliminar),
        )
        .route(
            "/{id}/movimientos",
            get(handlers::materias_primas::listar_movimientos),
        );

    let productos_routes = Router::new()
        .route(
            "/products",
            post(handlers::productos::crear).get(handlers::productos::listar),
        )
        .route(
            "/products/{id}",
            get(handlers::productos::detalle)
                .put(handlers::productos::actualizar)
                .delete(handlers::productos::eliminar),
        )
        .route(
            "/products/{producto_id}/registrar-produccion",
            post(handlers::productos::registrar_produccion),
        )
        .route(
            "/products/{id}/historial-descuentos",
            get(handlers::productos::historial_descuentos),
        )
        .route("/inventarios", get(handlers::productos::listar_inventarios));

    let productos_terminados_routes = Router::new()
        .route(
            "/",
            post(handlers::productos_terminados::crear).get(handlers::productos_terminados::listar),
        )
        .route(
            "/stock-bajo",
            get(handlers::productos_terminados::stock_bajo),
        )
        .route(
            "/movimientos",
            post(handlers::productos_terminados::registrar_movimiento),
        )
        .route(
            "/{id}",
            get(handlers::productos_terminados::obtener)
                .put(handlers::productos_terminados::actualizar)
                .delete(handlers::productos_terminados::eliminar),
        )
        .route(
            "/{id}/movimientos",
            get(handlers::productos_terminados::listar_movimientos),
        );

    let salidas_routes = Router::new()
        .route("/registrar", post(handlers::salidas::registrar))
        .route("/historial", get(handlers::salidas::historial))
        .route("/codigo/{codigo}", get(handlers::salidas::buscar_por_codigo))
        .route("/lotes/{codigo}", get(handlers::salidas::lotes_disponibles))
        .route("/motivos", get(handlers::salidas::motivos));

    let gastos_routes = Router::new()
        .route(
            "/",
            post(handlers::gastos::crear).get(handlers::gastos::listar),
        )
        .route(
            "/reportes/por-categoria",
            get(handlers::gastos::reporte_por_categoria),
        )
        .route(
            "/{id}",
            get(handlers::gastos::obtener)
                .put(handlers::gastos::actualizar)
                .delete(handlers::gastos::eliminar),
        );

    // Tudo sob /api (menos o health) exige token válido.
    let api_routes = Router::new()
        .nest("/materias-primas", materias_primas_routes)
        .nest("/productos-terminados", productos_terminados_routes)
        .nest("/salidas", salidas_routes)
        .nest("/gastos", gastos_routes)
        .merge(productos_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let addr = app_state.bind_addr.clone();

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
