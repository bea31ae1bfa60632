// src/shared/config.rs

use std::env;

/// Configuração da aplicação, lida uma única vez do ambiente na inicialização.
/// Variáveis obrigatórias: DATABASE_URL e JWT_SECRET. As demais possuem
/// padrões adequados para desenvolvimento local.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub endereco: String,
    pub porta: u16,
    /// Diretório onde as imagens enviadas são gravadas e servidas em /uploads.
    pub diretorio_uploads: String,
    /// URL base do cliente, usada para montar o link de redefinição de senha.
    pub url_frontend: String,
    /// API HTTP de e-mail. Quando ausente, os e-mails são apenas logados.
    pub mail_api_url: Option<String>,
    pub mail_api_token: Option<String>,
    pub mail_remetente: String,
}

impl Config {
    /// Lê a configuração do ambiente. Entra em pânico se uma variável
    /// obrigatória estiver ausente, abortando a inicialização.
    pub fn from_env() -> Config {
        Config {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL deve estar definida"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET deve estar definida"),
            endereco: env::var("ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),
            porta: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            diretorio_uploads: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            url_frontend: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            mail_api_url: env::var("MAIL_API_URL").ok(),
            mail_api_token: env::var("MAIL_API_TOKEN").ok(),
            mail_remetente: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "gameverse@localhost".to_string()),
        }
    }
}
