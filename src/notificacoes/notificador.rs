// src/notificacoes/notificador.rs

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

use crate::shared::config::Config;

#[derive(Debug, Error)]
pub enum ErroNotificacao {
    #[error("falha ao chamar a API de e-mail: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API de e-mail respondeu com status {0}")]
    StatusInesperado(u16),
}

/// Contrato do serviço de e-mail. O restante da aplicação só depende de
/// `enviar(para, assunto, corpo)`; o transporte é um detalhe da implementação.
#[async_trait]
pub trait Notificador: Send + Sync {
    async fn enviar(&self, para: &str, assunto: &str, corpo: &str) -> Result<(), ErroNotificacao>;
}

/// Notificador que entrega via uma API HTTP de e-mail (POST JSON com
/// autenticação Bearer).
pub struct NotificadorHttp {
    cliente: reqwest::Client,
    url: String,
    token: Option<String>,
    remetente: String,
}

#[async_trait]
impl Notificador for NotificadorHttp {
    async fn enviar(&self, para: &str, assunto: &str, corpo: &str) -> Result<(), ErroNotificacao> {
        let mut requisicao = self.cliente.post(&self.url).json(&json!({
            "from": self.remetente,
            "to": para,
            "subject": assunto,
            "text": corpo,
        }));

        if let Some(token) = &self.token {
            requisicao = requisicao.bearer_auth(token);
        }

        let resposta = requisicao.send().await?;
        if !resposta.status().is_success() {
            return Err(ErroNotificacao::StatusInesperado(resposta.status().as_u16()));
        }

        Ok(())
    }
}

/// Notificador de desenvolvimento: apenas registra a mensagem no log.
/// Usado quando MAIL_API_URL não está configurada, para que o fluxo de
/// verificação continue utilizável sem um serviço de e-mail real.
pub struct NotificadorLog;

#[async_trait]
impl Notificador for NotificadorLog {
    async fn enviar(&self, para: &str, assunto: &str, corpo: &str) -> Result<(), ErroNotificacao> {
        log::info!("[e-mail simulado] para={} assunto={} corpo={}", para, assunto, corpo);
        Ok(())
    }
}

/// Constrói o notificador adequado à configuração.
pub fn criar_notificador(config: &Config) -> Arc<dyn Notificador> {
    match &config.mail_api_url {
        Some(url) => Arc::new(NotificadorHttp {
            cliente: reqwest::Client::new(),
            url: url.clone(),
            token: config.mail_api_token.clone(),
            remetente: config.mail_remetente.clone(),
        }),
        None => {
            log::warn!("MAIL_API_URL não definida; e-mails serão apenas logados.");
            Arc::new(NotificadorLog)
        }
    }
}
