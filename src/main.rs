// src/main.rs

use std::sync::Arc;

use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

// Importa os módulos da aplicação
mod avaliacoes;   // Módulo de avaliações
mod categorias;   // Módulo de categorias
mod jogos;        // Módulo de jogos
mod notificacoes; // Módulo do notificador de e-mail
mod shared;       // Módulo shared
mod usuarios;     // Módulo de usuários

use notificacoes::notificador::{criar_notificador, Notificador};
use shared::config::Config;

/// Estado compartilhado da aplicação: pool de conexões, configuração lida do
/// ambiente na inicialização e o notificador de e-mail.
pub struct AppState {
    pub db_pool: Pool<Postgres>,
    pub config: Config,
    pub notificador: Arc<dyn Notificador>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Carrega o .env e inicializa o logger (nível via RUST_LOG).
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    // Conecta ao banco de dados com um pool de conexões.
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Falha ao conectar ao banco PostgreSQL");

    // Garante o diretório de uploads antes de aceitar requisições.
    std::fs::create_dir_all(&config.diretorio_uploads)?;

    let notificador = criar_notificador(&config);
    let endereco = (config.endereco.clone(), config.porta);
    let diretorio_uploads = config.diretorio_uploads.clone();

    let app_state = web::Data::new(AppState { db_pool, config, notificador });

    log::info!("Iniciando API GameVerse em {}:{}...", endereco.0, endereco.1);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::default())

            // Módulo de Usuários (rotas públicas)
            .service(usuarios::usuario_router::cadastrar_usuario)
            .service(usuarios::usuario_router::login_usuario)
            .service(usuarios::usuario_router::verificar_codigo)
            .service(usuarios::usuario_router::solicitar_redefinicao_senha)
            .service(usuarios::usuario_router::confirmar_redefinicao_senha)

            // Módulo de Usuários (rotas autenticadas de perfil)
            .service(usuarios::usuario_router::buscar_usuarios)
            .service(usuarios::usuario_router::buscar_usuario_por_id)
            .service(usuarios::usuario_router::atualizar_usuario)
            .service(usuarios::usuario_router::deletar_usuario)

            // Módulo de Jogos
            .service(jogos::jogo_router::buscar_todos_jogos)
            .service(jogos::jogo_router::buscar_jogos)
            .service(jogos::jogo_router::cadastrar_jogo)
            .service(jogos::jogo_router::adicionar_ao_catalogo)
            .service(jogos::jogo_router::alterar_privacidade)
            .service(jogos::jogo_router::atualizar_jogo)
            .service(jogos::jogo_router::deletar_jogo)

            // Módulo de Categorias (a busca por nome vem antes da rota por ID)
            .service(categorias::categoria_router::buscar_categoria_por_nome)
            .service(categorias::categoria_router::cadastrar_categoria)
            .service(categorias::categoria_router::buscar_categorias)
            .service(categorias::categoria_router::buscar_categoria_por_id)
            .service(categorias::categoria_router::atualizar_categoria)
            .service(categorias::categoria_router::deletar_categoria)
            .service(categorias::categoria_router::vincular_categorias)
            .service(categorias::categoria_router::desvincular_categoria)

            // Módulo de Avaliações
            .service(avaliacoes::avaliacao_router::enviar_avaliacao)
            .service(avaliacoes::avaliacao_router::buscar_avaliacoes)
            .service(avaliacoes::avaliacao_router::deletar_avaliacao)

            // Imagens enviadas, servidas estaticamente
            .service(Files::new("/uploads", diretorio_uploads.clone()))
    })
    .bind(endereco)?
    .run()
    .await
}
